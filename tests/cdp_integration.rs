//! End-to-end rendering through headless Chrome
#![cfg(feature = "cdp")]

use std::sync::Arc;

use codeshot::cdp::CdpLauncher;
use codeshot::config::ExecutionProfile;
use codeshot::{LaunchProfile, PipelineConfig, RenderPipeline, SessionManager, SessionStatus};
use serde_json::json;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

fn pipeline() -> RenderPipeline {
    let sessions = SessionManager::new(
        Arc::new(CdpLauncher::new()),
        LaunchProfile::new(ExecutionProfile::detect(), None),
    );
    RenderPipeline::new(sessions, PipelineConfig::default())
}

#[tokio::test(flavor = "multi_thread")]
#[ignore] // Requires Chrome to be installed
async fn renders_a_png_snippet() {
    let pipeline = pipeline();
    let png = pipeline
        .render(json!({
            "code": "function greet(name) {\nreturn `Hello, ${name}`;\n}",
            "theme": "dracula",
            "fileName": "greet.js"
        }))
        .await
        .expect("render failed");

    assert!(png.starts_with(PNG_SIGNATURE));
    assert_eq!(pipeline.sessions().status(), SessionStatus::Ready);
    pipeline.sessions().shutdown().await;
}

#[tokio::test(flavor = "multi_thread")]
#[ignore] // Requires Chrome to be installed
async fn browser_is_reused_across_renders() {
    let pipeline = pipeline();
    for i in 0..3 {
        let png = pipeline
            .render(json!({ "code": format!("x = {}", i), "language": "python" }))
            .await
            .expect("render failed");
        assert!(png.starts_with(PNG_SIGNATURE));
    }
    assert_eq!(pipeline.sessions().launch_count(), 1);
    pipeline.sessions().shutdown().await;
}

#[tokio::test(flavor = "multi_thread")]
#[ignore] // Requires Chrome to be installed
async fn square_image_is_square() {
    let pipeline = pipeline();
    let png = pipeline
        .render(json!({ "code": "a\nb\nc", "squareImage": true }))
        .await
        .expect("render failed");

    // IHDR: width and height are big-endian u32s at bytes 16..24
    let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
    assert!(width.abs_diff(height) <= 2, "{}x{}", width, height);
    pipeline.sessions().shutdown().await;
}
