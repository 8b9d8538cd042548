//! Shared single-slot frame buffer between the acquisition and processing
//! loops.
//!
//! The acquisition loop overwrites the slot with the newest frame; the
//! processing loop reads whatever is current. Two handoff modes cover the
//! latency/consistency trade-off: `Unsynchronized` takes a cheap snapshot of
//! the slot and releases it immediately, so the writer is never blocked
//! while a frame is being classified and the reader may see the slot change
//! between iterations. `Locked` holds the read lock for as long as the view
//! lives, stalling the writer until classification finishes.

use std::sync::{Arc, RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};

use crate::segmentation::Frame;

/// Handoff discipline between the two worker loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameHandoff {
    Unsynchronized,
    Locked,
}

impl Default for FrameHandoff {
    fn default() -> Self {
        FrameHandoff::Unsynchronized
    }
}

/// Latest-frame slot shared by reference between the worker loops.
pub struct FrameBuffer {
    mode: FrameHandoff,
    slot: RwLock<Option<Arc<Frame>>>,
}

impl FrameBuffer {
    pub fn new(mode: FrameHandoff) -> Self {
        Self {
            mode,
            slot: RwLock::new(None),
        }
    }

    pub fn mode(&self) -> FrameHandoff {
        self.mode
    }

    /// Publish the newest frame, replacing whatever was in the slot. In
    /// `Locked` mode this waits for any live processing view to drop first.
    pub fn publish(&self, frame: Frame) {
        let mut slot = self.slot.write().unwrap();
        *slot = Some(Arc::new(frame));
    }

    /// Current view of the slot per the configured handoff mode. `None`
    /// inside the view means no frame has been published yet.
    pub fn view(&self) -> FrameView<'_> {
        match self.mode {
            FrameHandoff::Unsynchronized => {
                let snapshot = self.slot.read().unwrap().clone();
                FrameView::Snapshot(snapshot)
            }
            FrameHandoff::Locked => FrameView::Guarded(self.slot.read().unwrap()),
        }
    }
}

/// Borrowed or snapshotted frame, depending on the handoff mode.
pub enum FrameView<'a> {
    Snapshot(Option<Arc<Frame>>),
    Guarded(RwLockReadGuard<'a, Option<Arc<Frame>>>),
}

impl FrameView<'_> {
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            FrameView::Snapshot(snapshot) => snapshot.as_deref(),
            FrameView::Guarded(guard) => guard.as_deref(),
        }
    }
}
