//! Boundary to the external landmark detector.
//!
//! The detector itself is a black box behind [`LandmarkSource`]. The
//! [`SourceMonitor`] turns its failures into the degraded-but-running
//! behavior the frame loop needs: only the initial acquisition may fail
//! outright; later errors are reported once and polling continues.

use crate::error::SourceError;
use crate::landmarks::FrameInput;

/// Anything that can deliver one [`FrameInput`] per processed video frame.
pub trait LandmarkSource {
    /// Open the camera stream / tracking backend.
    fn acquire(&mut self) -> Result<(), SourceError>;

    /// Latest detector result. An empty frame is a valid result.
    fn poll(&mut self) -> Result<FrameInput, SourceError>;

    /// Release camera and tracker handles.
    fn release(&mut self) {}
}

pub struct SourceMonitor<S: LandmarkSource> {
    source: S,
    degraded: bool,
    failures: u64,
    released: bool,
}

impl<S: LandmarkSource> SourceMonitor<S> {
    /// Acquire `source`. This is the only failure surfaced to the caller.
    pub fn acquire(mut source: S) -> Result<Self, SourceError> {
        source.acquire()?;
        log::info!("[source] landmark source acquired");
        Ok(Self {
            source,
            degraded: false,
            failures: 0,
            released: false,
        })
    }

    /// Poll once. Errors yield an empty frame so consumers settle instead of freezing.
    pub fn next_frame(&mut self) -> FrameInput {
        if self.released {
            return FrameInput::empty();
        }
        match self.source.poll() {
            Ok(frame) => {
                if self.degraded {
                    self.degraded = false;
                    log::info!(
                        "[source] landmark source recovered after {} failed polls",
                        self.failures
                    );
                }
                frame
            }
            Err(e) => {
                self.failures += 1;
                if !self.degraded {
                    self.degraded = true;
                    log::warn!("[source] {e}; continuing in degraded mode");
                }
                FrameInput::empty()
            }
        }
    }

    #[inline]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Failed polls since acquisition.
    #[inline]
    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Stop polling and release the source's handles.
    pub fn release(&mut self) {
        if !self.released {
            self.source.release();
            self.released = true;
            log::info!("[source] landmark source released");
        }
    }
}

impl<S: LandmarkSource> Drop for SourceMonitor<S> {
    fn drop(&mut self) {
        self.release();
    }
}
