//! Bounded buffer of SSE frames.

use crate::events::SseEvent;

/// Frames accumulated for one response.
///
/// Pushing a frame that would take the body past the limit fails and leaves the
/// buffer untouched. [`SseBuffer::push_overflow_error`] then appends the one
/// error frame allowed to exceed the limit.
#[derive(Debug)]
pub struct SseBuffer {
    body: String,
    limit: usize,
    frames: usize,
}

/// The next frame did not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overflow {
    pub limit: usize,
}

impl SseBuffer {
    pub fn new(limit: usize) -> Self {
        Self {
            body: String::new(),
            limit,
            frames: 0,
        }
    }

    pub fn push(&mut self, event: &SseEvent) -> Result<(), Overflow> {
        let frame = event.to_frame();
        if self.body.len() + frame.len() > self.limit {
            return Err(Overflow { limit: self.limit });
        }
        self.append(&frame);
        Ok(())
    }

    /// Append an error frame regardless of the limit.
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.append(&SseEvent::error(message).to_frame());
    }

    /// Append the truncation notice for an overflow.
    pub fn push_overflow_error(&mut self, overflow: Overflow) {
        self.push_error(format!("response exceeded {} bytes", overflow.limit));
    }

    fn append(&mut self, frame: &str) {
        self.body.push_str(frame);
        self.frames += 1;
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.body.len()
    }

    pub fn frame_count(&self) -> usize {
        self.frames
    }

    pub fn into_body(self) -> String {
        self.body
    }
}
