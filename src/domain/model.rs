use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Credit a participant can receive on a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Explorer,
    Surveyor,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Explorer, Role::Surveyor];

    /// Pseudo-tag name used inside `EX` text.
    pub fn tag(self) -> &'static str {
        match self {
            Role::Explorer => "Explorer",
            Role::Surveyor => "Surveyor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Explorer => f.write_str("explorer"),
            Role::Surveyor => f.write_str("surveyor"),
        }
    }
}

/// How role names are pulled out of `EX` text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMode {
    /// Every `<Role>...</Role>` block.
    #[default]
    Pattern,
    /// Legacy: first opening tag to first closing tag, wherever they are.
    FirstOccurrence,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// One `SRVD` entry: the `EX` annotation plus every `LG` sibling, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegRecord {
    pub source: String,
    pub text: String,
    pub lengths: Vec<String>,
}

impl LegRecord {
    /// The companion length used for name attribution.
    pub fn length_text(&self) -> Option<&str> {
        self.lengths.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameTotal {
    pub name: String,
    pub length: f64,
}

/// Running length per participant name. Only ever grows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameTotals {
    totals: HashMap<String, f64>,
}

impl NameTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, length: f64) {
        *self.totals.entry(name.to_string()).or_insert(0.0) += length;
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.totals.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Totals descending; equal totals fall back to name ascending.
    pub fn ranked(&self) -> Vec<NameTotal> {
        let mut ranked: Vec<NameTotal> = self
            .totals
            .iter()
            .map(|(name, length)| NameTotal {
                name: name.clone(),
                length: *length,
            })
            .collect();
        ranked.sort_by(|a, b| match b.length.total_cmp(&a.length) {
            Ordering::Equal => a.name.cmp(&b.name),
            other => other,
        });
        ranked
    }
}

/// The two accumulators a tally run threads through the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    pub explorers: NameTotals,
    pub surveyors: NameTotals,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn totals(&self, role: Role) -> &NameTotals {
        match role {
            Role::Explorer => &self.explorers,
            Role::Surveyor => &self.surveyors,
        }
    }

    pub fn totals_mut(&mut self, role: Role) -> &mut NameTotals {
        match role {
            Role::Explorer => &mut self.explorers,
            Role::Surveyor => &mut self.surveyors,
        }
    }

    pub fn report(&self) -> TallyReport {
        TallyReport {
            explorers: self.explorers.ranked(),
            surveyors: self.surveyors.ranked(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyReport {
    pub explorers: Vec<NameTotal>,
    pub surveyors: Vec<NameTotal>,
}

/// Result of the substring-filter run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSummary {
    pub matched_legs: Vec<String>,
    pub total: f64,
}
