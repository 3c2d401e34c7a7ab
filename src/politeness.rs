use rand::Rng;
use std::time::Duration;

use crate::error::{HarvestError, Result};

/// Randomized pause taken after every navigation-inducing action.
///
/// The delay is drawn uniformly from `[min, max]` seconds on each call.
#[derive(Debug, Clone, Copy)]
pub struct Governor {
    min_secs: f64,
    max_secs: f64,
}

impl Default for Governor {
    fn default() -> Self {
        Self {
            min_secs: 3.0,
            max_secs: 7.0,
        }
    }
}

impl Governor {
    pub fn new(min_secs: f64, max_secs: f64) -> Result<Self> {
        let governor = Self { min_secs, max_secs };
        governor.check_range()?;
        Ok(governor)
    }

    /// A governor that never pauses
    pub fn disabled() -> Self {
        Self {
            min_secs: 0.0,
            max_secs: 0.0,
        }
    }

    fn check_range(&self) -> Result<()> {
        let (min, max) = (self.min_secs, self.max_secs);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(HarvestError::SamplingFault(format!(
                "cannot sample a delay from [{min}, {max}]"
            )));
        }
        Ok(())
    }

    /// Draws the next delay without sleeping
    pub fn sample(&self) -> Result<Duration> {
        self.check_range()?;
        let secs = if self.min_secs == self.max_secs {
            self.min_secs
        } else {
            rand::thread_rng().gen_range(self.min_secs..=self.max_secs)
        };
        Duration::try_from_secs_f64(secs).map_err(|e| HarvestError::SamplingFault(e.to_string()))
    }

    /// Suspends the caller for a freshly sampled delay
    pub async fn wait(&self) -> Result<()> {
        let delay = self.sample()?;
        ::log::trace!("Politeness pause of {:.2}s", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
        Ok(())
    }
}
