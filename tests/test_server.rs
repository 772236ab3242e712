//! HTTP tests for the dashboard router.

mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use detection_dashboard::server::router;
use tower::ServiceExt;

use common::*;

async fn get(app: &Router, uri: &str) -> anyhow::Result<(StatusCode, String)> {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, String::from_utf8_lossy(&body).into_owned()))
}

#[tokio::test]
async fn test_index_page_links_every_stem() -> anyhow::Result<()> {
    let (dashboard, _renderer, _temp_dir) = create_test_dashboard();
    add_image(dashboard.config(), Pipeline::Raw, "a.png");
    add_image(dashboard.config(), Pipeline::Raw, "b.jpg");
    let app = router(dashboard);

    let (status, body) = get(&app, "/").await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("href=\"/compare/a\""));
    assert!(body.contains("href=\"/compare/b\""));
    assert!(body.find("/compare/a").unwrap() < body.find("/compare/b").unwrap());
    Ok(())
}

#[tokio::test]
async fn test_index_page_without_images() -> anyhow::Result<()> {
    let (dashboard, _renderer, _temp_dir) = create_test_dashboard();
    let app = router(dashboard);

    let (status, body) = get(&app, "/").await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No images found"));
    Ok(())
}

#[tokio::test]
async fn test_compare_page_shows_stats_images_and_charts() -> anyhow::Result<()> {
    let (dashboard, _renderer, _temp_dir) = create_test_dashboard();
    let config = dashboard.config().clone();
    write_labels(&config, Pipeline::Raw, "x", "0 0 0 0.9\n0 0 0 0.5");
    write_labels(&config, Pipeline::AodNet, "x", "0 0 0 0.8");
    add_image(&config, Pipeline::Raw, "x.png");
    let app = router(dashboard);

    let (status, body) = get(&app, "/compare/x").await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<img src=\"/raw_images/x.png\""));
    assert!(body.contains("No image"));
    assert!(body.contains("Detections: 2"));
    assert!(body.contains("Confidence sum: 1.40"));
    assert!(body.contains("Confidence sum: 0.80"));
    assert!(body.contains("/static/plots/counts_x.png"));
    assert!(body.contains("/static/plots/conf_x.png"));

    // Charts written by the request are served from the plots route
    let (status, _) = get(&app, "/static/plots/counts_x.png").await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, "/static/plots/conf_x.png").await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_compare_page_sanitizes_encoded_traversal() -> anyhow::Result<()> {
    let (dashboard, _renderer, _temp_dir) = create_test_dashboard();
    let config = dashboard.config().clone();
    write_labels(&config, Pipeline::Raw, "passwd", "0 0 0 0.5\n");
    let app = router(dashboard);

    let (status, body) = get(&app, "/compare/..%2F..%2Fetc%2Fpasswd").await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>passwd</h1>"));
    assert!(body.contains("Detections: 1"));
    assert!(config.plots_dir.join("counts_passwd.png").is_file());
    Ok(())
}

#[tokio::test]
async fn test_compare_page_escapes_stem() -> anyhow::Result<()> {
    let (dashboard, _renderer, _temp_dir) = create_test_dashboard();
    let app = router(dashboard);

    let (status, body) = get(&app, "/compare/%3Ci%3Ex").await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>&lt;i&gt;x</h1>"));
    assert!(!body.contains("<i>x"));
    assert!(body.contains("/static/plots/counts_%3Ci%3Ex.png"));
    Ok(())
}

#[tokio::test]
async fn test_image_routes_serve_pipeline_files() -> anyhow::Result<()> {
    let (dashboard, _renderer, _temp_dir) = create_test_dashboard();
    let config = dashboard.config().clone();
    add_image(&config, Pipeline::Raw, "img1.png");
    add_image(&config, Pipeline::Clahe, "img1.jpg");
    add_image(&config, Pipeline::AodNet, "img1.jpeg");
    let app = router(dashboard);

    for uri in [
        "/raw_images/img1.png",
        "/clahe_images/img1.jpg",
        "/aodnet_images/img1.jpeg",
    ] {
        let (status, _) = get(&app, uri).await?;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_files_are_not_found() -> anyhow::Result<()> {
    let (dashboard, _renderer, _temp_dir) = create_test_dashboard();
    add_image(dashboard.config(), Pipeline::Clahe, "img1.png");
    let app = router(dashboard);

    for uri in [
        "/raw_images/img1.png",
        "/clahe_images/img2.png",
        "/aodnet_images/nothing.jpg",
        "/static/plots/counts_never.png",
    ] {
        let (status, _) = get(&app, uri).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
    Ok(())
}

#[tokio::test]
async fn test_healthz() -> anyhow::Result<()> {
    let (dashboard, _renderer, _temp_dir) = create_test_dashboard();
    let app = router(dashboard);

    let (status, body) = get(&app, "/healthz").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    Ok(())
}
