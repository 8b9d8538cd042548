use log::info;
use visioncore::classify::{publish_report, CargoPolicy, Classifier, TargetParams, TargetPolicy};
use visioncore::framebuf::FrameBuffer;
use visioncore::segmentation::{Contour, Frame, ShapeExtractor};
use visioncore::telemetry::{CargoReport, FrameMetrics, TargetReport, TelemetrySink};
use visioncore::{ClassifyPolicy, TelemetryReport};

use crate::workflow::context::WorkerContext;

/// Both classifiers over one already-segmented candidate set. This is the
/// ingest path: pushed contours carry no channel split, so both policies see
/// the same candidates and publish to their own tables.
pub struct Pipeline {
    targets: Classifier<TargetPolicy>,
    cargo: Classifier<CargoPolicy>,
}

impl Pipeline {
    pub fn new(params: TargetParams) -> Self {
        Self {
            targets: Classifier::new(TargetPolicy::new(params)),
            cargo: Classifier::new(CargoPolicy),
        }
    }

    pub fn process(&self, contours: &[Contour]) -> (TargetReport, CargoReport) {
        (self.targets.classify(contours), self.cargo.classify(contours))
    }

    pub fn process_and_publish(
        &self,
        contours: &[Contour],
        sink: &dyn TelemetrySink,
    ) -> (TargetReport, CargoReport) {
        let (targets, cargo) = self.process(contours);
        publish_report(&targets, sink);
        publish_report(&cargo, sink);
        (targets, cargo)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(TargetParams::default())
    }
}

/// One classification channel run against a frame. Returns the number of
/// candidates its segmentation produced.
pub trait FrameProcessor: Send {
    fn process(&mut self, frame: &Frame, sink: &dyn TelemetrySink) -> usize;
}

/// An extractor paired with the classifier it feeds. Each channel segments
/// the frame its own way, mirroring the per-threshold pipelines on the real
/// coprocessor.
pub struct Channel<P: ClassifyPolicy> {
    extractor: Box<dyn ShapeExtractor>,
    classifier: Classifier<P>,
}

impl<P: ClassifyPolicy> Channel<P> {
    pub fn new(extractor: Box<dyn ShapeExtractor>, policy: P) -> Self {
        Self {
            extractor,
            classifier: Classifier::new(policy),
        }
    }

    /// Segment and classify one frame without publishing.
    pub fn classify_frame(&mut self, frame: &Frame) -> (usize, P::Resolved) {
        let contours = self.extractor.extract(frame);
        (contours.len(), self.classifier.classify(&contours))
    }
}

impl<P> FrameProcessor for Channel<P>
where
    P: ClassifyPolicy + Send,
    P::Resolved: TelemetryReport,
{
    fn process(&mut self, frame: &Frame, sink: &dyn TelemetrySink) -> usize {
        let (candidates, report) = self.classify_frame(frame);
        publish_report(&report, sink);
        candidates
    }
}

/// Processing worker: runs every channel over whatever frame is currently in
/// the shared buffer, publishes, and re-reads. One frame always runs to
/// completion before the buffer is consulted again; an empty buffer spins the
/// loop until the acquisition side publishes something.
pub fn run_processing(
    context: &WorkerContext,
    channels: &mut [Box<dyn FrameProcessor>],
    buffer: &FrameBuffer,
    sink: &dyn TelemetrySink,
    metrics: &FrameMetrics,
) {
    info!("processing loop starting");
    while context.is_running() {
        let view = buffer.view();
        let Some(frame) = view.frame() else {
            continue;
        };
        let mut candidates = 0;
        for channel in channels.iter_mut() {
            candidates += channel.process(frame, sink);
        }
        metrics.record_frame(frame.seq, candidates);
    }
    info!("processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::shapes::{SceneChannel, SceneConfig, SyntheticScene};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};
    use visioncore::framebuf::FrameHandoff;
    use visioncore::telemetry::{MemorySink, TelemetryValue, CARGO_TABLE, TARGETS_TABLE};

    fn scene_channels() -> Vec<Box<dyn FrameProcessor>> {
        vec![
            Box::new(Channel::new(
                Box::new(SyntheticScene::for_channel(
                    SceneConfig::default(),
                    SceneChannel::Tapes,
                )),
                TargetPolicy::new(TargetParams::default()),
            )),
            Box::new(Channel::new(
                Box::new(SyntheticScene::for_channel(
                    SceneConfig::default(),
                    SceneChannel::Cargo,
                )),
                CargoPolicy,
            )),
        ]
    }

    #[test]
    fn pipeline_publishes_both_tables_for_a_synthetic_scene() {
        let pipeline = Pipeline::default();
        let sink = MemorySink::new();
        let mut scene = SyntheticScene::new(SceneConfig::default());
        let frame = Frame::new(1, 0.0, 320, 240);
        let extracted = scene.extract(&frame);
        let (targets, cargo) = pipeline.process_and_publish(&extracted, &sink);

        assert_eq!(targets.left.matched.as_deref(), Some("left"));
        assert_eq!(targets.right.matched.as_deref(), Some("right"));
        // The circle policy has no admissibility filter, so on the combined
        // candidate set the tape contours rank as round candidates too.
        assert_eq!(cargo.detections.len(), extracted.len());
        match sink.get(TARGETS_TABLE, "contour_left") {
            Some(TelemetryValue::NumberArray(values)) => {
                assert_eq!(values.len(), 6);
                assert!(values.iter().any(|v| *v != 0.0));
            }
            other => panic!("unexpected contour_left value: {:?}", other),
        }
        match sink.get(CARGO_TABLE, "r") {
            Some(TelemetryValue::NumberArray(values)) => {
                assert_eq!(values.len(), cargo.detections.len());
            }
            other => panic!("unexpected r value: {:?}", other),
        }
    }

    #[test]
    fn empty_candidates_publish_the_sentinel_pair() {
        let pipeline = Pipeline::default();
        let sink = MemorySink::new();
        let (targets, cargo) = pipeline.process_and_publish(&[], &sink);
        assert!(targets.left.is_sentinel());
        assert!(targets.right.is_sentinel());
        assert!(cargo.detections.is_empty());
        assert_eq!(
            sink.get(TARGETS_TABLE, "contour_right"),
            Some(TelemetryValue::NumberArray(vec![0.0; 6]))
        );
    }

    #[test]
    fn channels_keep_their_own_segmentation() {
        let sink = MemorySink::new();
        let config = SceneConfig::default();
        let mut target_channel = Channel::new(
            Box::new(SyntheticScene::for_channel(
                config.clone(),
                SceneChannel::Tapes,
            )),
            TargetPolicy::new(TargetParams::default()),
        );
        let mut cargo_channel = Channel::new(
            Box::new(SyntheticScene::for_channel(
                config.clone(),
                SceneChannel::Cargo,
            )),
            CargoPolicy,
        );
        let frame = Frame::new(1, 0.0, 320, 240);
        assert_eq!(target_channel.process(&frame, &sink), 2);
        assert_eq!(cargo_channel.process(&frame, &sink), config.cargo_pieces);

        // The cargo table only carries the ring contours, not the tapes.
        match sink.get(CARGO_TABLE, "r") {
            Some(TelemetryValue::NumberArray(values)) => {
                assert_eq!(values.len(), config.cargo_pieces);
            }
            other => panic!("unexpected r value: {:?}", other),
        }
        match sink.get(TARGETS_TABLE, "contour_left") {
            Some(TelemetryValue::NumberArray(values)) => {
                assert!(values.iter().any(|v| *v != 0.0));
            }
            other => panic!("unexpected contour_left value: {:?}", other),
        }
    }

    #[test]
    fn loop_classifies_frames_until_stopped() {
        let context = Arc::new(WorkerContext::new(1));
        let buffer = Arc::new(FrameBuffer::new(FrameHandoff::Unsynchronized));
        let sink = Arc::new(MemorySink::new());
        let metrics = Arc::new(FrameMetrics::new());
        context.start();
        buffer.publish(Frame::new(9, 0.3, 320, 240));

        let worker = {
            let context = Arc::clone(&context);
            let buffer = Arc::clone(&buffer);
            let sink = Arc::clone(&sink);
            let metrics = Arc::clone(&metrics);
            thread::spawn(move || {
                let mut channels = scene_channels();
                run_processing(&context, &mut channels, &buffer, &*sink, &metrics);
            })
        };

        let deadline = Instant::now() + Duration::from_secs(5);
        while metrics.snapshot().frames < 2 {
            assert!(Instant::now() < deadline, "loop never classified the frame");
            thread::yield_now();
        }
        context.stop();
        worker.join().unwrap();

        let snapshot = metrics.snapshot();
        assert!(snapshot.frames >= 2);
        assert_eq!(snapshot.last_seq, Some(9));
        // Two tapes plus two rings per frame across the two channels.
        assert_eq!(snapshot.candidates, snapshot.frames * 4);
        assert!(sink.get(CARGO_TABLE, "x").is_some());
    }

    #[test]
    fn stopped_context_classifies_nothing() {
        let context = WorkerContext::new(1);
        let buffer = FrameBuffer::new(FrameHandoff::Unsynchronized);
        let sink = MemorySink::new();
        let metrics = FrameMetrics::new();
        let mut channels = scene_channels();
        run_processing(&context, &mut channels, &buffer, &sink, &metrics);
        assert_eq!(metrics.snapshot().frames, 0);
        assert!(sink.get(TARGETS_TABLE, "contour_left").is_none());
    }
}
