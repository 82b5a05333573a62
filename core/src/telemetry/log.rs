use log::{info, warn};

/// Stage-scoped logger; every line is prefixed with the stage name.
pub struct LogManager {
    stage: &'static str,
}

impl LogManager {
    pub fn new(stage: &'static str) -> Self {
        Self { stage }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.stage, message);
    }

    pub fn anomaly(&self, message: &str) {
        warn!("[{}] {}", self.stage, message);
    }
}

