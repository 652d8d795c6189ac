//! Summary of posterior rotation-period samples.
//!
//! The Gaussian-process model and its sampler live outside this crate; only
//! their period samples are consumed here. The summary is the median with
//! the 16th/84th percentiles as an asymmetric 1σ interval.

use serde::{Deserialize, Serialize};

use crate::domain::{EstimateQuality, Method, PeriodEstimate};
use crate::error::PeriodError;
use crate::math::percentile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosteriorSummary {
    pub median: f64,
    pub p16: f64,
    pub p84: f64,
    pub samples: usize,
}

impl PosteriorSummary {
    pub fn from_samples(samples: &[f64]) -> Result<Self, PeriodError> {
        if samples.is_empty() {
            return Err(PeriodError::InvalidConfig("no posterior samples".to_string()));
        }
        if let Some(bad) = samples.iter().find(|s| !s.is_finite()) {
            return Err(PeriodError::InvalidConfig(format!(
                "non-finite posterior sample {bad}"
            )));
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Ok(Self {
            median: percentile(&sorted, 50.0),
            p16: percentile(&sorted, 16.0),
            p84: percentile(&sorted, 84.0),
            samples: sorted.len(),
        })
    }

    pub fn to_estimate(&self) -> PeriodEstimate {
        PeriodEstimate {
            method: Method::Gp,
            period: self.median,
            lower_error: Some(self.median - self.p16),
            upper_error: Some(self.p84 - self.median),
            quality: EstimateQuality::Posterior {
                samples: self.samples,
            },
        }
    }
}
