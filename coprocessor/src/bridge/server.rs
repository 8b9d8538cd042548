use serde_json::json;
use std::{net::SocketAddr, sync::Arc, thread};
use tokio::runtime::Builder;
use visioncore::segmentation::Frame;
use visioncore::telemetry::{FrameMetrics, MemorySink};
use warp::{http::StatusCode, Filter};

use crate::bridge::model::{IngestRequest, SourceRequest, StatusModel};
use crate::generator::shapes::{build_scene_contours, SceneConfig};
use crate::workflow::context::WorkerContext;
use crate::workflow::processor::Pipeline;

/// Bridge that mirrors the telemetry store over HTTP and accepts pushed
/// contours while no robot-side store is attached.
pub struct TelemetryBridge {
    context: Arc<WorkerContext>,
    metrics: Arc<FrameMetrics>,
}

impl TelemetryBridge {
    pub fn new(
        addr: SocketAddr,
        pipeline: Arc<Pipeline>,
        sink: Arc<MemorySink>,
        context: Arc<WorkerContext>,
        metrics: Arc<FrameMetrics>,
    ) -> Self {
        let sink_for_filter = sink.clone();
        let sink_filter = warp::any().map(move || sink_for_filter.clone());
        let context_for_filter = context.clone();
        let context_filter = warp::any().map(move || context_for_filter.clone());
        let metrics_for_filter = metrics.clone();
        let metrics_filter = warp::any().map(move || metrics_for_filter.clone());
        let pipeline_filter = warp::any().map(move || pipeline.clone());

        let tables_route = warp::path("tables")
            .and(warp::get())
            .and(sink_filter.clone())
            .map(|sink: Arc<MemorySink>| warp::reply::json(&sink.snapshot()));

        let status_route = warp::path("status")
            .and(warp::get())
            .and(context_filter.clone())
            .and(metrics_filter)
            .map(|context: Arc<WorkerContext>, metrics: Arc<FrameMetrics>| {
                warp::reply::json(&StatusModel::collect(&context, &metrics))
            });

        let ingest_route = warp::path("ingest")
            .and(warp::post())
            .and(warp::body::json())
            .and(sink_filter.clone())
            .and(pipeline_filter.clone())
            .and_then(
                |request: IngestRequest, sink: Arc<MemorySink>, pipeline: Arc<Pipeline>| async move {
                    let (targets, cargo) = pipeline.process_and_publish(&request.contours, &*sink);
                    Ok::<_, warp::Rejection>(warp::reply::with_status(
                        warp::reply::json(&json!({
                            "status": "ok",
                            "left_matched": !targets.left.is_sentinel(),
                            "right_matched": !targets.right.is_sentinel(),
                            "cargo": cargo.detections.len(),
                        })),
                        StatusCode::OK,
                    ))
                },
            );

        let scenario_route = warp::path("ingest-config")
            .and(warp::post())
            .and(warp::body::json())
            .and(sink_filter)
            .and(pipeline_filter)
            .and_then(
                |config: SceneConfig, sink: Arc<MemorySink>, pipeline: Arc<Pipeline>| async move {
                    let frame = Frame::new(0, 0.0, config.frame_width, config.frame_height);
                    let contours = build_scene_contours(&config, &frame);
                    let (targets, cargo) = pipeline.process_and_publish(&contours, &*sink);
                    if let Some(name) = config.scenario.as_ref() {
                        println!(
                            "[bridge] Scenario {} -> left {} right {} cargo {}",
                            name,
                            !targets.left.is_sentinel(),
                            !targets.right.is_sentinel(),
                            cargo.detections.len()
                        );
                    }
                    Ok::<_, warp::Rejection>(warp::reply::with_status(
                        warp::reply::json(&json!({
                            "status": "ok",
                            "contours": contours.len(),
                            "cargo": cargo.detections.len(),
                            "description": config.description.clone().unwrap_or_default()
                        })),
                        StatusCode::OK,
                    ))
                },
            );

        let source_route = warp::path("source")
            .and(warp::post())
            .and(warp::body::json())
            .and(context_filter)
            .map(|request: SourceRequest, context: Arc<WorkerContext>| {
                context.set_source(request.source);
                warp::reply::json(&json!({
                    "status": "ok",
                    "source": context.source(),
                    "camera": context.camera(),
                }))
            });

        thread::spawn(move || {
            let routes = tables_route
                .or(status_route)
                .or(ingest_route)
                .or(scenario_route)
                .or(source_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(addr).await;
            });
        });

        Self { context, metrics }
    }

    pub fn status(&self) -> StatusModel {
        StatusModel::collect(&self.context, &self.metrics)
    }

    pub fn publish_status(&self, message: &str) {
        println!("[bridge] {}", message);
    }
}
