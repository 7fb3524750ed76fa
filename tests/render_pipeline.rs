//! Pipeline behavior against a fake browser

mod common;

use std::sync::Arc;
use std::time::Duration;

use codeshot::{Error, PipelineConfig, SessionStatus};
use common::{fake_pipeline, fake_pipeline_with_highlighter, PanicOnceHighlighter, FAKE_PNG};
use serde_json::json;

#[tokio::test]
async fn renders_with_all_defaults() {
    let (pipeline, browser) = fake_pipeline(PipelineConfig::default());

    let png = pipeline.render(json!({ "code": "const a = 1;" })).await.unwrap();
    assert_eq!(&png[..], FAKE_PNG);
    assert_eq!(browser.launches(), 1);
    assert_eq!(browser.pages_opened(), 1);
    assert_eq!(browser.pages_closed(), 1);

    let (selector, scale) = browser.last_capture.lock().unwrap().clone().unwrap();
    assert_eq!(selector, ".snapshot-frame");
    assert_eq!(scale, 2.0);

    let html = browser.last_html.lock().unwrap().clone().unwrap();
    assert!(html.contains("class=\"snapshot-frame\""));
    assert!(html.contains("script.js"));
}

#[tokio::test]
async fn repeated_payload_is_served_from_cache() {
    let (pipeline, browser) = fake_pipeline(PipelineConfig::default());
    let payload = json!({ "code": "print('hi')", "language": "python", "theme": "nord" });

    let first = pipeline.render(payload.clone()).await.unwrap();
    let second = pipeline.render(payload).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(browser.launches(), 1);
    assert_eq!(browser.pages_opened(), 1);
    assert_eq!(pipeline.cache().len(), 1);
}

#[tokio::test]
async fn field_order_does_not_defeat_the_cache() {
    let (pipeline, browser) = fake_pipeline(PipelineConfig::default());
    let a: serde_json::Value = serde_json::from_str(r#"{"code":"x","theme":"dracula"}"#).unwrap();
    let b: serde_json::Value = serde_json::from_str(r#"{"theme":"dracula","code":"x"}"#).unwrap();

    pipeline.render(a).await.unwrap();
    pipeline.render(b).await.unwrap();
    assert_eq!(browser.pages_opened(), 1);
}

#[tokio::test]
async fn invalid_payloads_never_reach_the_browser() {
    let (pipeline, browser) = fake_pipeline(PipelineConfig::default());

    for payload in [
        json!({ "theme": "nord" }),
        json!({ "code": "" }),
        json!({ "code": 42 }),
        json!(["code"]),
    ] {
        let err = pipeline.render(payload).await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)), "got {:?}", err);
    }

    let err = pipeline.render(json!({})).await.unwrap_err();
    assert_eq!(err, Error::InvalidRequest("Code required".into()));

    assert_eq!(browser.launches(), 0);
    assert_eq!(pipeline.sessions().status(), SessionStatus::Unset);
}

#[tokio::test]
async fn page_is_closed_when_capture_fails_and_failure_is_not_cached() {
    let (pipeline, browser) = fake_pipeline(PipelineConfig::default());
    browser.set(&browser.fail_capture, true);

    let err = pipeline.render(json!({ "code": "x" })).await.unwrap_err();
    assert!(matches!(err, Error::RenderFailed(_)));
    assert_eq!(browser.pages_opened(), 1);
    assert_eq!(browser.pages_closed(), 1);
    assert!(pipeline.cache().is_empty());

    browser.set(&browser.fail_capture, false);
    pipeline.render(json!({ "code": "x" })).await.unwrap();
    assert_eq!(browser.pages_opened(), 2);
    assert_eq!(browser.launches(), 1);
}

#[tokio::test(start_paused = true)]
async fn stalled_render_times_out_and_closes_its_page() {
    let config = PipelineConfig {
        render_timeout: Duration::from_secs(1),
        ..Default::default()
    };
    let (pipeline, browser) = fake_pipeline(config);
    browser.set(&browser.stall_capture, true);

    let err = pipeline.render(json!({ "code": "loop {}" })).await.unwrap_err();
    assert_eq!(err, Error::RenderTimeout(1000));
    assert_eq!(browser.pages_closed(), 1);
    assert!(pipeline.cache().is_empty());
}

#[tokio::test(start_paused = true)]
async fn stalled_page_open_is_bounded_by_the_deadline() {
    let config = PipelineConfig {
        render_timeout: Duration::from_secs(2),
        ..Default::default()
    };
    let (pipeline, browser) = fake_pipeline(config);
    browser.set(&browser.stall_open, true);

    let err = pipeline.render(json!({ "code": "x" })).await.unwrap_err();
    assert_eq!(err, Error::RenderTimeout(2000));
    assert_eq!(browser.pages_opened(), 0);
    assert_eq!(browser.pages_closed(), 0);

    browser.set(&browser.stall_open, false);
    let png = pipeline.render(json!({ "code": "x" })).await.unwrap();
    assert_eq!(&png[..], FAKE_PNG);
    assert_eq!(browser.pages_closed(), 1);
}

#[tokio::test]
async fn panicked_render_is_retried_by_the_next_request() {
    let (pipeline, browser) = fake_pipeline_with_highlighter(
        PipelineConfig::default(),
        Arc::new(PanicOnceHighlighter::default()),
    );
    let payload = json!({ "code": "x" });

    let err = pipeline.render(payload.clone()).await.unwrap_err();
    assert!(matches!(err, Error::RenderFailed(_)));
    assert_eq!(browser.pages_opened(), 0);

    let png = pipeline.render(payload).await.unwrap();
    assert_eq!(&png[..], FAKE_PNG);
    assert_eq!(browser.pages_opened(), 1);
    assert_eq!(pipeline.cache().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn concurrent_identical_requests_share_one_render() {
    let (pipeline, browser) = fake_pipeline(PipelineConfig::default());
    browser.set_capture_delay(Duration::from_millis(200));
    let payload = json!({ "code": "fn main() {}", "language": "rust" });

    let results =
        futures::future::join_all((0..6).map(|_| pipeline.render(payload.clone()))).await;

    assert!(results.iter().all(|r| r.as_ref().is_ok_and(|png| &png[..] == FAKE_PNG)));
    assert_eq!(browser.launches(), 1);
    assert_eq!(browser.pages_opened(), 1);
}

#[tokio::test(start_paused = true)]
async fn concurrent_distinct_requests_share_one_browser() {
    let (pipeline, browser) = fake_pipeline(PipelineConfig::default());
    browser.set_capture_delay(Duration::from_millis(200));

    let results = futures::future::join_all(
        (0..4).map(|i| pipeline.render(json!({ "code": format!("let v = {};", i) }))),
    )
    .await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(browser.launches(), 1);
    assert_eq!(browser.pages_opened(), 4);
    assert_eq!(browser.pages_closed(), 4);
}

#[tokio::test]
async fn disconnect_leads_to_exactly_one_relaunch() {
    let (pipeline, browser) = fake_pipeline(PipelineConfig::default());
    pipeline.render(json!({ "code": "a" })).await.unwrap();
    assert_eq!(browser.launches(), 1);

    browser.disconnect();
    assert_eq!(pipeline.sessions().status(), SessionStatus::Unset);

    pipeline.render(json!({ "code": "b" })).await.unwrap();
    pipeline.render(json!({ "code": "c" })).await.unwrap();
    assert_eq!(browser.launches(), 2);
}

#[tokio::test]
async fn launch_failure_is_sticky() {
    let (pipeline, browser) = fake_pipeline(PipelineConfig::default());
    browser.set(&browser.fail_launch, true);

    let first = pipeline.render(json!({ "code": "a" })).await.unwrap_err();
    assert!(matches!(first, Error::SessionLaunchFailed(_)));

    browser.set(&browser.fail_launch, false);
    let second = pipeline.render(json!({ "code": "b" })).await.unwrap_err();
    assert_eq!(first, second);
    assert_eq!(browser.launches(), 1);
    assert_eq!(pipeline.sessions().status(), SessionStatus::Failed);
}

#[tokio::test(start_paused = true)]
async fn cached_image_expires_after_ttl() {
    let config = PipelineConfig {
        cache_ttl: Duration::from_secs(60),
        ..Default::default()
    };
    let (pipeline, browser) = fake_pipeline(config);
    let payload = json!({ "code": "x" });

    pipeline.render(payload.clone()).await.unwrap();
    tokio::time::advance(Duration::from_secs(61)).await;
    pipeline.render(payload).await.unwrap();

    assert_eq!(browser.pages_opened(), 2);
}
