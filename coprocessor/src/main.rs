use anyhow::Context;
use bridge::server::TelemetryBridge;
use clap::Parser;
use generator::shapes::{SceneChannel, SyntheticScene};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use visioncore::classify::{publish_report, CargoPolicy, TargetPolicy};
use visioncore::framebuf::{FrameBuffer, FrameHandoff};
use visioncore::segmentation::Frame;
use visioncore::telemetry::{FrameMetrics, MemorySink};
use workflow::acquisition::{self, SyntheticCamera};
use workflow::config::VisionConfig;
use workflow::context::WorkerContext;
use workflow::processor::{self, Channel, FrameProcessor, Pipeline};

mod bridge;
mod generator;
mod workflow;

fn parse_handoff(value: &str) -> Result<FrameHandoff, String> {
    match value {
        "unsynchronized" => Ok(FrameHandoff::Unsynchronized),
        "locked" => Ok(FrameHandoff::Locked),
        other => Err(format!(
            "unknown handoff mode {:?} (expected unsynchronized or locked)",
            other
        )),
    }
}

#[derive(Parser)]
#[command(author, version, about = "Vision coprocessor driver for the robot telemetry store")]
struct Args {
    /// Classify a fixed number of synthetic frames and emit a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a vision config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 1)]
    cameras: usize,
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Frame count for --offline
    #[arg(long, default_value_t = 8)]
    frames: usize,
    /// Override the frame handoff mode (unsynchronized | locked)
    #[arg(long, value_parser = parse_handoff)]
    handoff: Option<FrameHandoff>,
    /// Override the telemetry bridge port
    #[arg(long)]
    port: Option<u16>,
    /// Keep the worker loops and the telemetry bridge alive
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = args.config {
        VisionConfig::load(path)?
    } else {
        VisionConfig::from_args(args.cameras, args.seed)
    };
    if let Some(handoff) = args.handoff {
        config.handoff = handoff;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let sink = Arc::new(MemorySink::new());
    let metrics = Arc::new(FrameMetrics::new());
    let context = Arc::new(WorkerContext::new(config.cameras));
    let pipeline = Arc::new(Pipeline::new(config.target.clone()));
    let telemetry_bridge = TelemetryBridge::new(
        config.bridge_addr(),
        Arc::clone(&pipeline),
        Arc::clone(&sink),
        Arc::clone(&context),
        Arc::clone(&metrics),
    );

    if args.offline {
        let mut target_channel = Channel::new(
            Box::new(SyntheticScene::for_channel(
                config.scene.clone(),
                SceneChannel::Tapes,
            )),
            TargetPolicy::new(config.target.clone()),
        );
        let mut cargo_channel = Channel::new(
            Box::new(SyntheticScene::for_channel(
                config.scene.clone(),
                SceneChannel::Cargo,
            )),
            CargoPolicy,
        );
        let frame_period = 1.0 / f64::from(config.scene.fps.max(1));
        let mut left_matches = 0usize;
        let mut cargo_total = 0usize;
        for seq in 1..=args.frames as u64 {
            let frame = Frame::new(
                seq,
                seq as f64 * frame_period,
                config.scene.frame_width,
                config.scene.frame_height,
            );
            let (tape_candidates, targets) = target_channel.classify_frame(&frame);
            let (ring_candidates, cargo) = cargo_channel.classify_frame(&frame);
            publish_report(&targets, &*sink);
            publish_report(&cargo, &*sink);
            metrics.record_frame(frame.seq, tape_candidates + ring_candidates);
            if !targets.left.is_sentinel() {
                left_matches += 1;
            }
            cargo_total += cargo.detections.len();
        }

        let status = telemetry_bridge.status();
        println!(
            "Offline run -> frames {}, candidates {}, left matches {}, cargo detections {}",
            status.frames, status.candidates, left_matches, cargo_total
        );
        telemetry_bridge.publish_status("Offline classification results ready.");

        let report = format!(
            "frames={} candidates={} left_matches={} cargo={}\n",
            status.frames, status.candidates, left_matches, cargo_total
        );
        let report_path = PathBuf::from("tools/data/offline_report.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;
    }
    if args.serve {
        context.start();
        let buffer = Arc::new(FrameBuffer::new(config.handoff));

        let acquisition_worker = {
            let context = Arc::clone(&context);
            let buffer = Arc::clone(&buffer);
            let scene = config.scene.clone();
            thread::spawn(move || {
                let mut camera = SyntheticCamera::from_config(&scene);
                acquisition::run_acquisition(&context, &mut camera, &buffer);
            })
        };
        let processing_worker = {
            let context = Arc::clone(&context);
            let buffer = Arc::clone(&buffer);
            let sink = Arc::clone(&sink);
            let metrics = Arc::clone(&metrics);
            let scene = config.scene.clone();
            let target_params = config.target.clone();
            thread::spawn(move || {
                let mut channels: Vec<Box<dyn FrameProcessor>> = vec![
                    Box::new(Channel::new(
                        Box::new(SyntheticScene::for_channel(
                            scene.clone(),
                            SceneChannel::Tapes,
                        )),
                        TargetPolicy::new(target_params),
                    )),
                    Box::new(Channel::new(
                        Box::new(SyntheticScene::for_channel(scene, SceneChannel::Cargo)),
                        CargoPolicy,
                    )),
                ];
                processor::run_processing(&context, &mut channels, &buffer, &*sink, &metrics);
            })
        };

        telemetry_bridge.publish_status("Telemetry bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;

        context.stop();
        for worker in [acquisition_worker, processing_worker] {
            if worker.join().is_err() {
                log::warn!("worker thread panicked during shutdown");
            }
        }
    }

    Ok(())
}
