//! Summary statistic of the variation column.

use super::{AnalysisError, NormalFit};
use crate::domain::AugmentedSeries;
use chrono::NaiveDate;

/// An observed extreme and the session it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extreme {
    pub value: f64,
    pub date: NaiveDate,
}

/// Max, min, and normal fit over the non-missing variations.
///
/// Not persisted; each chart computes its own from the augmented series.
#[derive(Debug, Clone, PartialEq)]
pub struct VariationStatistic {
    pub max: Extreme,
    pub min: Extreme,
    pub fit: NormalFit,
    pub observations: usize,
}

impl VariationStatistic {
    pub fn compute(series: &AugmentedSeries) -> Result<Self, AnalysisError> {
        let mut observations = 0usize;
        let mut max: Option<Extreme> = None;
        let mut min: Option<Extreme> = None;

        // Ties keep the earliest date.
        for (date, value) in series.variations() {
            observations += 1;
            if max.map_or(true, |m| value > m.value) {
                max = Some(Extreme { value, date });
            }
            if min.map_or(true, |m| value < m.value) {
                min = Some(Extreme { value, date });
            }
        }

        let (Some(max), Some(min)) = (max, min) else {
            return Err(AnalysisError::DegenerateRange {
                observations: 0,
                span: 0.0,
            });
        };
        if max.value <= min.value {
            return Err(AnalysisError::DegenerateRange {
                observations,
                span: 0.0,
            });
        }

        let fit = NormalFit::fit(&series.variation_values())?;

        Ok(Self {
            max,
            min,
            fit,
            observations,
        })
    }

    pub fn span(&self) -> f64 {
        self.max.value - self.min.value
    }

    pub fn max_label(&self) -> String {
        format!(
            "Max Variation: {:.2}% on {}",
            self.max.value, self.max.date
        )
    }

    pub fn min_label(&self) -> String {
        format!(
            "Min Variation: {:.2}% on {}",
            self.min.value, self.min.date
        )
    }
}
