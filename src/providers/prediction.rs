use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

// Prediction statuses as reported by the job API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl PredictionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

/// Follows one prediction through `starting -> processing -> terminal`.
///
/// Polling may skip intermediate statuses or observe the same one repeatedly;
/// moving backwards or leaving a terminal status is rejected.
pub struct PredictionTracker {
    id: String,
    state: PredictionStatus,
}

impl PredictionTracker {
    pub fn new(id: impl Into<String>, initial: PredictionStatus) -> Self {
        let id = id.into();
        debug!("Tracking prediction {} from {:?}", id, initial);
        Self { id, state: initial }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn current_state(&self) -> PredictionStatus {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn observe(&mut self, status: PredictionStatus) -> Result<()> {
        use PredictionStatus::*;

        let old_state = self.state;
        let allowed = match (old_state, status) {
            (from, to) if from == to => true,
            (Starting, Processing) => true,
            (Starting | Processing, to) if to.is_terminal() => true,
            _ => false,
        };

        if !allowed {
            warn!(
                "Invalid prediction transition for {}: {:?} -> {:?}",
                self.id, old_state, status
            );
            return Err(Error::InvalidTransition {
                current: format!("{:?}", old_state),
                requested: format!("{:?}", status),
            });
        }

        if old_state != status {
            info!(
                "Prediction {} state transition: {:?} -> {:?}",
                self.id, old_state, status
            );
        }

        self.state = status;
        Ok(())
    }
}
