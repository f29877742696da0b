//! Score scaling
//!
//! Replaces each side's raw score with a weight relative to the match.

use crate::{
    EdgeError, MatchRecord, Result, ScaledMatchRecord, ScalingConfig, WeightMode, ZeroScorePolicy,
};

/// Converts raw scores into per-team weights
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightScaler {
    mode: WeightMode,
    zero_scores: ZeroScorePolicy,
}

impl WeightScaler {
    pub fn new(mode: WeightMode, zero_scores: ZeroScorePolicy) -> Self {
        WeightScaler { mode, zero_scores }
    }

    pub fn from_config(config: &ScalingConfig) -> Self {
        Self::new(config.mode, config.zero_scores)
    }

    /// Compute (team1_weight, team2_weight) for a pair of raw scores.
    ///
    /// Returns None for a 0-0 match under max-normalization when the policy
    /// is to reject it.
    pub fn weights(&self, team1_score: f64, team2_score: f64) -> Option<(f64, f64)> {
        match self.mode {
            WeightMode::Max => {
                let max = team1_score.max(team2_score);
                if max == 0.0 {
                    return match self.zero_scores {
                        ZeroScorePolicy::Zero => Some((0.0, 0.0)),
                        ZeroScorePolicy::Reject => None,
                    };
                }
                Some((team1_score / max, team2_score / max))
            }
            WeightMode::Binary => {
                let team1_won = team1_score >= team2_score;
                let team2_won = team2_score > team1_score;
                Some((indicator(team1_won), indicator(team2_won)))
            }
        }
    }

    /// Scale a single record. `row` is only used for error reporting.
    pub fn scale(&self, record: &MatchRecord, row: usize) -> Result<ScaledMatchRecord> {
        let (team1_weight, team2_weight) = self
            .weights(record.team1_score, record.team2_score)
            .ok_or(EdgeError::ZeroScores { row })?;

        Ok(ScaledMatchRecord {
            date: record.date,
            team1_name: record.team1_name.clone(),
            team1_weight,
            team2_name: record.team2_name.clone(),
            team2_weight,
            map_name: record.map_name.clone(),
        })
    }

    /// Scale every record, keeping order and cardinality
    pub fn scale_all(&self, records: &[MatchRecord]) -> Result<Vec<ScaledMatchRecord>> {
        let scaled = records
            .iter()
            .enumerate()
            .map(|(i, record)| self.scale(record, i + 1))
            .collect::<Result<Vec<_>>>()?;

        let zero_matches = records
            .iter()
            .filter(|r| r.team1_score == 0.0 && r.team2_score == 0.0)
            .count();
        if zero_matches > 0 && self.mode == WeightMode::Max {
            log::warn!("{} matches had no score on either side; weighted 0.0", zero_matches);
        }

        log::debug!("Scaled {} matches ({} weighting)", scaled.len(), self.mode);
        Ok(scaled)
    }
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}
