//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers.rs (view → RecordManager → post_save receivers)
//!     → response.rs (errors mapped to 500)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use handlers::{CREATED_BODY, RECORD_NAME};
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::AppError;
pub use server::{AppState, HttpServer};
