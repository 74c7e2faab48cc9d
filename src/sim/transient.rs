use std::collections::VecDeque;

/// Sliding-window step-change detector over instantaneous demand.
///
/// Keeps a bounded FIFO of past samples (ring semantics: the oldest sample
/// is silently evicted on overflow). A transient is flagged once the window
/// is full and the newest sample differs from the *oldest* by more than the
/// configured threshold.
#[derive(Debug, Clone)]
pub struct TransientDetector {
    threshold_w: f32,
    window_len: usize,
    history: VecDeque<f32>,
}

impl TransientDetector {
    /// Creates a detector with the given threshold (W) and window length
    /// in samples.
    ///
    /// # Panics
    ///
    /// Panics if `window_len` is zero.
    pub fn new(threshold_w: f32, window_len: usize) -> Self {
        assert!(window_len > 0, "window_len must be > 0");
        Self {
            threshold_w,
            window_len,
            history: VecDeque::with_capacity(window_len),
        }
    }

    /// Pushes a demand sample and reports whether it completes a transient.
    ///
    /// Returns `false` until the window has filled, regardless of sample
    /// magnitude.
    pub fn detect(&mut self, demand_w: f32) -> bool {
        if self.history.len() == self.window_len {
            self.history.pop_front();
        }
        self.history.push_back(demand_w);

        if self.history.len() < self.window_len {
            return false;
        }

        let oldest = self.history.front().copied().unwrap_or(demand_w);
        (demand_w - oldest).abs() > self.threshold_w
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether no samples have been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
