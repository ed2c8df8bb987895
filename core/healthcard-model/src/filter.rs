//! List filters: server-side query parameters and local category filtering.

use crate::entities::HealthAssessment;
use serde::{Deserialize, Serialize};

/// Query parameters a module's list endpoint accepts.
pub trait ListQuery {
    /// `(name, value)` pairs to append to the list URL. Empty values are
    /// omitted.
    fn params(&self) -> Vec<(&'static str, String)>;
}

/// No query parameters.
impl ListQuery for () {
    fn params(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Search and filter state of the family history list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub q: String,
    pub relation: String,
    pub condition: String,
}

impl HistoryQuery {
    pub fn search(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Self::default()
        }
    }

    /// Clears every filter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl ListQuery for HistoryQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        [
            ("q", &self.q),
            ("relation", &self.relation),
            ("condition", &self.condition),
        ]
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k, v.clone()))
        .collect()
    }
}

/// Days of vitals history shown by default.
pub const DEFAULT_VITALS_DAYS: u32 = 7;

/// Time window of the vitals list. Zero means all history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalsQuery {
    pub days: u32,
}

impl Default for VitalsQuery {
    fn default() -> Self {
        Self {
            days: DEFAULT_VITALS_DAYS,
        }
    }
}

impl ListQuery for VitalsQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        if self.days == 0 {
            Vec::new()
        } else {
            vec![("days", self.days.to_string())]
        }
    }
}

/// The assessment tab currently selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssessmentCategory {
    #[default]
    All,
    /// Matches assessments whose type contains this text, ignoring case.
    Named(String),
}

impl AssessmentCategory {
    pub fn parse(s: &str) -> Self {
        if s.is_empty() || s == "all" {
            Self::All
        } else {
            Self::Named(s.to_string())
        }
    }

    pub fn matches(&self, assessment: &HealthAssessment) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => assessment
                .assessment_type
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(&name.to_lowercase())),
        }
    }

    /// The subset of `assessments` in this category, in order.
    pub fn apply(&self, assessments: &[HealthAssessment]) -> Vec<HealthAssessment> {
        assessments
            .iter()
            .filter(|a| self.matches(a))
            .cloned()
            .collect()
    }
}
