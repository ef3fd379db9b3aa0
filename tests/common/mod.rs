//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use post_save_demo::config::{AppConfig, DispatchMode};
use post_save_demo::lifecycle::{build_services_with, Shutdown};
use post_save_demo::signals::SlowReceiver;
use post_save_demo::{HttpServer, PostSave, RecordManager, Signal};

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub records: Arc<RecordManager>,
    pub handler: Arc<SlowReceiver>,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config with a short handler delay so tests stay fast.
pub fn test_config(delay: Duration, dispatch: DispatchMode) -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.signals.handler_delay_ms = delay.as_millis() as u64;
    config.signals.dispatch = dispatch;
    config.timeouts.request_secs = 10;
    config
}

/// Start a server; `connect` may add receivers after the built-in one.
pub async fn start_server<F>(config: AppConfig, connect: F) -> TestServer
where
    F: FnOnce(&mut Signal<PostSave>),
{
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let services = build_services_with(&config, connect).unwrap();
    let records = services.records.clone();
    let handler = services.handler.clone();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, services);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        records,
        handler,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
