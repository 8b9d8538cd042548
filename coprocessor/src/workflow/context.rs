use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Shared state for the two worker loops: the running flag both loops poll
/// and the camera source index the robot switches remotely.
///
/// The stored source keeps the legacy wrap rule `index % (cameras | 1)` and
/// is clamped to a valid camera only when read, matching how the robot-side
/// switcher always behaved.
pub struct WorkerContext {
    running: AtomicBool,
    source: AtomicUsize,
    camera_count: usize,
}

impl WorkerContext {
    pub fn new(camera_count: usize) -> Self {
        Self {
            running: AtomicBool::new(false),
            source: AtomicUsize::new(0),
            camera_count,
        }
    }

    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn set_source(&self, index: usize) {
        self.source
            .store(index % (self.camera_count | 1), Ordering::SeqCst);
    }

    /// Raw source index as last stored.
    pub fn source(&self) -> usize {
        self.source.load(Ordering::SeqCst)
    }

    /// Camera index to grab from, clamped into range.
    pub fn camera(&self) -> usize {
        let source = self.source();
        if self.camera_count == 0 {
            0
        } else {
            source.min(self.camera_count - 1)
        }
    }
}
