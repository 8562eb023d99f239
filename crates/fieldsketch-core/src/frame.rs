//! Render-on-next-frame scheduling.
//!
//! Mutations only mark the scene dirty. The host registers one frame callback
//! while a frame is pending, and the paint pass runs once per frame however
//! many mutations happened since the last one.

/// Dirty flag plus at most one outstanding frame request.
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    dirty: bool,
    pending: bool,
    frames: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the scene dirty. Returns `true` when the caller must register a
    /// new frame callback, `false` if one is already pending.
    pub fn request_frame(&mut self) -> bool {
        self.dirty = true;
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Called from the frame callback. Returns whether to paint.
    pub fn begin_frame(&mut self) -> bool {
        self.pending = false;
        let paint = std::mem::take(&mut self.dirty);
        if paint {
            self.frames += 1;
        }
        paint
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Frames painted so far.
    pub fn frames_painted(&self) -> u64 {
        self.frames
    }
}
