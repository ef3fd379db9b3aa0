//! Background dispatch: the response no longer waits for the handler.

use std::time::{Duration, Instant};

use post_save_demo::config::DispatchMode;

mod common;

const DELAY: Duration = Duration::from_millis(500);

#[tokio::test]
async fn test_response_does_not_wait_for_handler() {
    let server = common::start_server(common::test_config(DELAY, DispatchMode::Background), |_| {}).await;

    let start = Instant::now();
    let res = common::client().get(server.url("/create")).send().await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "Model created");
    assert!(elapsed < DELAY, "response waited {:?}", elapsed);
    assert_eq!(server.records.count(), 1);

    // The handler still runs, exactly once.
    tokio::time::sleep(DELAY * 2).await;
    assert_eq!(server.handler.invocations(), 1);
}

#[tokio::test]
async fn test_health_reports_background_mode() {
    let server = common::start_server(
        common::test_config(Duration::from_millis(10), DispatchMode::Background),
        |_| {},
    )
    .await;

    let health: serde_json::Value = common::client()
        .get(server.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["dispatch"], "background");
}
