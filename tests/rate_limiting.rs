//! Rate limiter behavior through the full pipeline.

use std::time::Duration;

use serde_json::Value;

mod common;
use common::spawn_app_with;

#[tokio::test]
async fn over_limit_returns_429_problem_with_retry_after() {
    let app = spawn_app_with(|config| {
        config.rate_limit.requests_per_window = 5;
        // Wide window so slow CI cannot let entries expire mid-test.
        config.rate_limit.window_ms = 10_000;
    })
    .await;

    let mut rejected = None;
    for _ in 0..8 {
        let res = app.client.get(app.url("/features")).send().await.unwrap();
        if res.status() == 429 {
            rejected = Some(res);
            break;
        }
    }

    let res = rejected.expect("expected a 429 after exceeding the limit");
    assert_eq!(res.headers().get("retry-after").unwrap(), "1");
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "application/problem+json"
    );
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], 429);
    assert_eq!(body["title"], "Too Many Requests");
    assert!(body["type"]
        .as_str()
        .unwrap()
        .ends_with("/problems/rate_limited"));
    assert_eq!(body["detail"], "Rate limit exceeded");
    assert!(!body["correlation_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn request_over_threshold_is_the_first_rejected() {
    let app = spawn_app_with(|config| {
        config.rate_limit.requests_per_window = 5;
        config.rate_limit.window_ms = 10_000;
    })
    .await;

    for i in 0..5 {
        let res = app.client.get(app.url("/features")).send().await.unwrap();
        assert_eq!(res.status(), 200, "request {i} should be accepted");
    }
    let res = app.client.get(app.url("/features")).send().await.unwrap();
    assert_eq!(res.status(), 429);
}

#[tokio::test]
async fn health_is_never_rate_limited() {
    let app = spawn_app_with(|config| {
        config.rate_limit.requests_per_window = 2;
        config.rate_limit.window_ms = 10_000;
    })
    .await;

    for _ in 0..20 {
        let res = app.client.get(app.url("/health")).send().await.unwrap();
        assert_eq!(res.status(), 200);
    }
}

#[tokio::test]
async fn window_slides_and_admits_again() {
    let app = spawn_app_with(|config| {
        config.rate_limit.requests_per_window = 2;
        config.rate_limit.window_ms = 2000;
    })
    .await;

    assert_eq!(
        app.client.get(app.url("/features")).send().await.unwrap().status(),
        200
    );
    assert_eq!(
        app.client.get(app.url("/features")).send().await.unwrap().status(),
        200
    );
    assert_eq!(
        app.client.get(app.url("/features")).send().await.unwrap().status(),
        429
    );

    tokio::time::sleep(Duration::from_millis(2300)).await;

    assert_eq!(
        app.client.get(app.url("/features")).send().await.unwrap().status(),
        200
    );
}
