//! Record model and its write path.

pub mod manager;
pub mod record;

pub use manager::{RecordError, RecordManager};
pub use record::{PostSave, Record};
