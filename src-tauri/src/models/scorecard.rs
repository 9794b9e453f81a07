use crate::error::ScorecardError;
use crate::models::scale::{self, ScaleVersion};
use serde::{Deserialize, Serialize};

/// Hard upper bound on competitors; settings may only lower it.
pub const MAX_COMPETITORS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Competitor {
    pub name: String,
    /// Derived total, overwritten by every aggregation pass.
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Metric {
    pub name: String,
    pub description: String,
    /// One slot per competitor, index-aligned with `Scorecard::competitors`.
    pub scores: Vec<Option<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Category {
    pub name: String,
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scorecard {
    pub competitors: Vec<Competitor>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    Removed(Competitor),
    /// The last competitor is never removed.
    Refused,
}

impl Scorecard {
    pub fn list_competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn list_categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn metrics(&self) -> impl Iterator<Item = &Metric> {
        self.categories.iter().flat_map(|c| c.metrics.iter())
    }

    fn metrics_mut(&mut self) -> impl Iterator<Item = &mut Metric> {
        self.categories.iter_mut().flat_map(|c| c.metrics.iter_mut())
    }

    /// Appends a competitor and one `default_score` slot to every metric.
    pub fn add_competitor(
        &mut self,
        name: &str,
        default_score: u8,
        max_competitors: usize,
    ) -> Result<usize, ScorecardError> {
        let cap = max_competitors.min(MAX_COMPETITORS);
        if self.competitors.len() >= cap {
            return Err(ScorecardError::CapacityExceeded { max: cap });
        }
        let name = self.checked_name(name, None)?;
        let default_score = scale::validate_score(default_score as i64)?;

        self.competitors.push(Competitor { name, score: 0 });
        for metric in self.metrics_mut() {
            metric.scores.push(Some(default_score));
        }

        Ok(self.competitors.len() - 1)
    }

    pub fn remove_competitor(&mut self, index: usize) -> Result<Removal, ScorecardError> {
        let len = self.competitors.len();
        if index >= len {
            return Err(ScorecardError::index("competitor", index, len));
        }
        if len <= 1 {
            return Ok(Removal::Refused);
        }

        let removed = self.competitors.remove(index);
        for metric in self.metrics_mut() {
            if index < metric.scores.len() {
                metric.scores.remove(index);
            }
        }

        Ok(Removal::Removed(removed))
    }

    pub fn rename_competitor(&mut self, index: usize, name: &str) -> Result<(), ScorecardError> {
        let len = self.competitors.len();
        if index >= len {
            return Err(ScorecardError::index("competitor", index, len));
        }
        let name = self.checked_name(name, Some(index))?;
        self.competitors[index].name = name;
        Ok(())
    }

    /// Writes one cell and returns its previous value. `None` clears the cell.
    pub fn set_score(
        &mut self,
        category_idx: usize,
        metric_idx: usize,
        competitor_idx: usize,
        value: Option<i64>,
    ) -> Result<Option<u8>, ScorecardError> {
        let value = value.map(scale::validate_score).transpose()?;
        let competitor_count = self.competitors.len();

        let category_count = self.categories.len();
        let category = self
            .categories
            .get_mut(category_idx)
            .ok_or_else(|| ScorecardError::index("category", category_idx, category_count))?;

        let metric_count = category.metrics.len();
        let metric = category
            .metrics
            .get_mut(metric_idx)
            .ok_or_else(|| ScorecardError::index("metric", metric_idx, metric_count))?;

        if competitor_idx >= competitor_count || competitor_idx >= metric.scores.len() {
            return Err(ScorecardError::index(
                "competitor",
                competitor_idx,
                competitor_count,
            ));
        }

        let previous = std::mem::replace(&mut metric.scores[competitor_idx], value);
        Ok(previous)
    }

    /// Checks every structural invariant, returning a description of the first breach.
    pub fn validate(&self, max_competitors: usize) -> Result<(), String> {
        let count = self.competitors.len();
        let cap = max_competitors.min(MAX_COMPETITORS);
        if count == 0 {
            return Err("at least one competitor is required".to_string());
        }
        if count > cap {
            return Err(format!("{count} competitors exceeds the maximum of {cap}"));
        }

        for (idx, competitor) in self.competitors.iter().enumerate() {
            if competitor.name.trim().is_empty() {
                return Err(format!("competitor {} has an empty name", idx + 1));
            }
            if self.competitors[..idx]
                .iter()
                .any(|other| other.name == competitor.name)
            {
                return Err(format!("duplicate competitor name `{}`", competitor.name));
            }
        }

        for category in &self.categories {
            for metric in &category.metrics {
                if metric.scores.len() != count {
                    return Err(format!(
                        "metric `{}` in `{}` has {} scores for {} competitors",
                        metric.name,
                        category.name,
                        metric.scores.len(),
                        count
                    ));
                }
                if let Some(bad) = metric
                    .scores
                    .iter()
                    .flatten()
                    .find(|v| !scale::is_in_domain(**v))
                {
                    return Err(format!(
                        "metric `{}` in `{}` has out-of-range score {bad}",
                        metric.name, category.name
                    ));
                }
            }
        }

        Ok(())
    }

    /// Rewrites every stored value from `from` onto the unified scale.
    /// Returns how many cells changed.
    pub fn migrate_scale(&mut self, from: ScaleVersion) -> usize {
        let mut changed = 0;
        for metric in self.metrics_mut() {
            for slot in metric.scores.iter_mut() {
                if let Some(value) = slot {
                    let migrated = scale::migrate_value(from, *value);
                    if migrated != *value {
                        *value = migrated;
                        changed += 1;
                    }
                }
            }
        }
        changed
    }

    fn checked_name(&self, name: &str, except: Option<usize>) -> Result<String, ScorecardError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ScorecardError::InvalidName(
                "name must not be empty".to_string(),
            ));
        }
        let taken = self
            .competitors
            .iter()
            .enumerate()
            .any(|(idx, c)| Some(idx) != except && c.name == trimmed);
        if taken {
            return Err(ScorecardError::InvalidName(format!(
                "`{trimmed}` is already a competitor"
            )));
        }
        Ok(trimmed.to_string())
    }
}
