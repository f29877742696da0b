//! Esports match histories as team edge lists
//!
//! Turns a flat table of map results into weighted, directed team-to-team
//! edges for graph analysis, optionally bucketed into date intervals.

pub mod data;
pub mod edges;
pub mod pipeline;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single map result as read from the match table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: NaiveDateTime,
    pub team1_name: String,
    pub team1_score: f64,
    pub team2_name: String,
    pub team2_score: f64,
    pub map_name: String,
}

impl MatchRecord {
    /// Returns the winning team name, or None for a draw
    pub fn winner(&self) -> Option<&str> {
        if self.team1_score > self.team2_score {
            Some(self.team1_name.as_str())
        } else if self.team2_score > self.team1_score {
            Some(self.team2_name.as_str())
        } else {
            None
        }
    }
}

/// A match whose raw scores have been replaced by per-team weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledMatchRecord {
    pub date: NaiveDateTime,
    pub team1_name: String,
    pub team1_weight: f64,
    pub team2_name: String,
    pub team2_weight: f64,
    pub map_name: String,
}

/// One directed edge per match: winner -> loser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub date: NaiveDateTime,
    pub source: String,
    pub target: String,
    pub weight_diff: f64,
    pub map_name: String,
}

/// One of the two mirrored rows emitted per match in double-edge mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoubleEdge {
    pub date: NaiveDateTime,
    pub source: String,
    pub target: String,
    pub scaled_score: f64,
    pub map_name: String,
}

/// Common view over both edge row kinds, used by filtering and partitioning
pub trait EdgeRow {
    fn date(&self) -> NaiveDateTime;
    fn source(&self) -> &str;
    fn target(&self) -> &str;
    fn map_name(&self) -> &str;
}

impl EdgeRow for Edge {
    fn date(&self) -> NaiveDateTime {
        self.date
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn map_name(&self) -> &str {
        &self.map_name
    }
}

impl EdgeRow for DoubleEdge {
    fn date(&self) -> NaiveDateTime {
        self.date
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn map_name(&self) -> &str {
        &self.map_name
    }
}

/// How raw scores become weights
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightMode {
    /// score / max(score1, score2)
    #[default]
    Max,
    /// 1.0 for the winner, 0.0 for the loser; ties go to team 1
    Binary,
}

impl fmt::Display for WeightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightMode::Max => write!(f, "max"),
            WeightMode::Binary => write!(f, "binary"),
        }
    }
}

impl std::str::FromStr for WeightMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "max" => Ok(WeightMode::Max),
            "binary" => Ok(WeightMode::Binary),
            _ => Err(format!("Unknown weighting: {}. Use max or binary.", s)),
        }
    }
}

/// What max-normalization does with a 0-0 match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroScorePolicy {
    /// Both weights become 0.0
    #[default]
    Zero,
    /// Fail the run
    Reject,
}

impl fmt::Display for ZeroScorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZeroScorePolicy::Zero => write!(f, "zero"),
            ZeroScorePolicy::Reject => write!(f, "reject"),
        }
    }
}

impl std::str::FromStr for ZeroScorePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zero" => Ok(ZeroScorePolicy::Zero),
            "reject" => Ok(ZeroScorePolicy::Reject),
            _ => Err(format!("Unknown zero-score policy: {}. Use zero or reject.", s)),
        }
    }
}

/// Which team becomes the edge source when both weights are equal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    Team1,
    /// Historical behaviour of the edge lists
    #[default]
    Team2,
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TieBreak::Team1 => write!(f, "team1"),
            TieBreak::Team2 => write!(f, "team2"),
        }
    }
}

impl std::str::FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "team1" => Ok(TieBreak::Team1),
            "team2" => Ok(TieBreak::Team2),
            _ => Err(format!("Unknown tie-break: {}. Use team1 or team2.", s)),
        }
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum EdgeError {
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Row {row}, column {column}: {message}")]
    Malformed {
        row: usize,
        column: String,
        message: String,
    },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Row {row}: both scores are zero and zero-score matches are rejected")]
    ZeroScores { row: usize },

    #[error("No cut date falls inside the data's date range")]
    NoCutPoints,

    #[error("Output already exists: {0}")]
    OutputExists(String),

    #[error("Output {0} is requested by both channels")]
    OutputConflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EdgeError>;

/// Application configuration loaded from edgelist.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scaling: ScalingConfig,
    #[serde(default)]
    pub edges: EdgeConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalingConfig {
    #[serde(default)]
    pub mode: WeightMode,
    #[serde(default)]
    pub zero_scores: ZeroScorePolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeConfig {
    #[serde(default)]
    pub tie_break: TieBreak,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EdgeError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| EdgeError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| EdgeError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
