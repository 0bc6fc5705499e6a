//! Elapsed time and best-time comparison for a session

/// Tick-driven session timer.
#[derive(Clone, Debug, Default)]
pub struct Scorekeeper {
    elapsed: f32,
    running: bool,
}

impl Scorekeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset elapsed time to zero and start running
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    /// Accumulate `delta` seconds while running.
    ///
    /// Negative or non-finite deltas are ignored so elapsed time never
    /// decreases.
    pub fn tick(&mut self, delta: f32) {
        if self.running && delta.is_finite() && delta > 0.0 {
            self.elapsed += delta;
        }
    }

    /// Stop running; elapsed time stays readable
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// New best if `elapsed` strictly beats `current_best`.
    ///
    /// `None` as the current best means no record yet. Ties keep the old
    /// record.
    pub fn on_session_complete(elapsed: f32, current_best: Option<f32>) -> Option<f32> {
        match current_best {
            Some(best) if elapsed >= best => None,
            _ => Some(elapsed),
        }
    }
}

/// Format seconds the way the timer label shows them
pub fn format_seconds(secs: f32) -> String {
    format!("{:.2}s", secs)
}

/// Format a best record, `--` when unset
pub fn format_best(best: Option<f32>) -> String {
    best.map(format_seconds).unwrap_or_else(|| "--".to_string())
}
