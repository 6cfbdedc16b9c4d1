//! Frame scheduling with an explicit cancellation token.
//!
//! Scheduling hands out a [`FrameToken`]; the host passes it back with its own
//! monotonic timestamp on every frame. A frame carrying a revoked token (the
//! loop was cancelled or rescheduled since) yields nothing.

/// Identifies one scheduled run of the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameToken(u64);

#[derive(Debug, Default)]
pub struct FrameLoop {
    current: Option<FrameToken>,
    last_ms: Option<f64>,
    next_id: u64,
}

impl FrameLoop {
    /// Schedule a fresh run. Any previous token is revoked and the timestamp
    /// baseline is reset, so the first frame after scheduling reports zero.
    pub fn schedule(&mut self) -> FrameToken {
        self.next_id += 1;
        let token = FrameToken(self.next_id);
        self.current = Some(token);
        self.last_ms = None;
        token
    }

    pub fn cancel(&mut self) {
        self.current = None;
        self.last_ms = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<FrameToken> {
        self.current
    }

    /// Elapsed milliseconds since the previous frame of this run, or `None`
    /// when `token` is not the live one.
    pub fn delta(&mut self, token: FrameToken, now_ms: f64) -> Option<f64> {
        if self.current != Some(token) {
            return None;
        }
        let delta = match self.last_ms {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        Some(delta)
    }
}
