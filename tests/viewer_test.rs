use anyhow::Result;
use chrono::{FixedOffset, TimeZone};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use campus_wififlow::pipeline::{self, PipelineOptions};
use campus_wififlow::routes::{self, ViewerState};
use campus_wififlow::visual::{spring_layout, SceneStyle};
use campus_wififlow::{RawClientRecord, SnapshotTable};

#[derive(Debug, Deserialize)]
struct Health {
    status: String,
    frames: usize,
}

#[derive(Debug, Deserialize)]
struct Summary {
    frame_count: usize,
    nodes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Edge {
    origin: String,
    destination: String,
    devices: usize,
}

#[derive(Debug, Deserialize)]
struct Scene {
    index: usize,
    total: usize,
    edges: Vec<Edge>,
}

fn state() -> ViewerState {
    // ---
    let tz = FixedOffset::east_opt(2 * 3600).unwrap();
    let rows = [
        ("a", "AP-CIEN-01", 0),
        ("b", "AP-VET-01", 0),
        ("a", "AP-VET-02", 5),
        ("b", "AP-CIEN-04", 5),
        ("a", "AP-MED-01", 10),
        ("b", "AP-CIEN-04", 10),
    ];
    let mut table = SnapshotTable::new(
        rows.iter()
            .map(|(mac, ap, minute)| {
                RawClientRecord {
                    device_id: mac.to_string(),
                    access_point: ap.to_string(),
                }
                .at(tz.with_ymd_and_hms(2025, 4, 3, 10, *minute, 0).unwrap())
            })
            .collect(),
    );
    table.sort_by_timestamp();

    let flows = pipeline::run(&table, &PipelineOptions::default()).flows;
    let layout = spring_layout(flows.nodes(), 42);
    ViewerState {
        flows,
        layout,
        style: SceneStyle::default(),
    }
}

async fn serve(state: ViewerState) -> Result<String> {
    // ---
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = routes::router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    Ok(format!("http://{}", addr))
}

#[tokio::test]
async fn frames_are_served() -> Result<()> {
    // ---
    let base = serve(state()).await?;
    let client = Client::new();

    let health: Health = client.get(format!("{base}/health")).send().await?.json().await?;
    assert_eq!(health.status, "ok");
    assert_eq!(health.frames, 2);

    let summary: Summary = client.get(format!("{base}/frames")).send().await?.json().await?;
    assert_eq!(summary.frame_count, 2);
    assert_eq!(summary.nodes, vec!["CIEN", "MED", "VET"]);

    let scene: Scene = client.get(format!("{base}/frames/0")).send().await?.json().await?;
    assert_eq!(scene.index, 0);
    assert_eq!(scene.total, 2);
    assert_eq!(scene.edges.len(), 2);
    for edge in &scene.edges {
        assert_eq!(edge.devices, 1);
        assert_ne!(edge.origin, edge.destination);
    }

    let svg = client.get(format!("{base}/frames/1/svg")).send().await?;
    assert_eq!(svg.status(), StatusCode::OK);
    assert_eq!(
        svg.headers().get("content-type").and_then(|v| v.to_str().ok()),
        Some("image/svg+xml")
    );
    assert!(svg.text().await?.contains("<svg"));

    let page = client.get(format!("{base}/")).send().await?.text().await?;
    assert!(page.contains("type=\"range\""));
    Ok(())
}

#[tokio::test]
async fn missing_frames_are_not_found() -> Result<()> {
    // ---
    let base = serve(state()).await?;
    let client = Client::new();

    let response = client.get(format!("{base}/frames/2")).send().await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client.get(format!("{base}/frames/99/svg")).send().await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn empty_corpus_still_serves() -> Result<()> {
    // ---
    let flows = pipeline::run(&SnapshotTable::default(), &PipelineOptions::default()).flows;
    let base = serve(ViewerState {
        layout: spring_layout(flows.nodes(), 42),
        flows,
        style: SceneStyle::default(),
    })
    .await?;
    let client = Client::new();

    let health: Health = client.get(format!("{base}/health")).send().await?.json().await?;
    assert_eq!(health.frames, 0);

    let response = client.get(format!("{base}/frames/0")).send().await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let page = client.get(format!("{base}/")).send().await?.text().await?;
    assert!(page.contains("No frames"));
    Ok(())
}
