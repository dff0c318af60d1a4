use serde::Serialize;

/// Outcome counts of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Items whose procedure was started
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Started but stopped before completing
    pub interrupted: usize,
    /// Selected but never started
    pub not_started: usize,
    pub stopped_early: bool,
}

impl RunSummary {
    /// Human readable one-liner
    pub fn message(&self) -> String {
        let mut message = if self.stopped_early {
            format!(
                "Stopped. {} succeeded, {} failed of {} attempted.",
                self.succeeded, self.failed, self.attempted
            )
        } else {
            format!("Finished. {} succeeded, {} failed.", self.succeeded, self.failed)
        };
        if self.interrupted > 0 {
            message.push_str(&format!(" {} interrupted.", self.interrupted));
        }
        message
    }
}
