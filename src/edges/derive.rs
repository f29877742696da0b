//! Edge derivation from scaled matches

use crate::{DoubleEdge, Edge, ScaledMatchRecord, TieBreak};

/// Builds single (winner -> loser) or double (mirrored) edge lists
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDeriver {
    tie_break: TieBreak,
}

impl EdgeDeriver {
    pub fn new(tie_break: TieBreak) -> Self {
        EdgeDeriver { tie_break }
    }

    /// One edge for a match; the heavier side is the source
    pub fn single_edge(&self, record: &ScaledMatchRecord) -> Edge {
        let team1_is_source = if record.team1_weight == record.team2_weight {
            self.tie_break == TieBreak::Team1
        } else {
            record.team1_weight > record.team2_weight
        };

        let (source, target, source_weight, target_weight) = if team1_is_source {
            (
                &record.team1_name,
                &record.team2_name,
                record.team1_weight,
                record.team2_weight,
            )
        } else {
            (
                &record.team2_name,
                &record.team1_name,
                record.team2_weight,
                record.team1_weight,
            )
        };

        Edge {
            date: record.date,
            source: source.clone(),
            target: target.clone(),
            weight_diff: source_weight - target_weight,
            map_name: record.map_name.clone(),
        }
    }

    /// Both directions for a match, team 1's row first
    pub fn double_edges(&self, record: &ScaledMatchRecord) -> [DoubleEdge; 2] {
        [
            DoubleEdge {
                date: record.date,
                source: record.team1_name.clone(),
                target: record.team2_name.clone(),
                scaled_score: record.team1_weight,
                map_name: record.map_name.clone(),
            },
            DoubleEdge {
                date: record.date,
                source: record.team2_name.clone(),
                target: record.team1_name.clone(),
                scaled_score: record.team2_weight,
                map_name: record.map_name.clone(),
            },
        ]
    }

    pub fn to_single(&self, records: &[ScaledMatchRecord]) -> Vec<Edge> {
        records.iter().map(|r| self.single_edge(r)).collect()
    }

    /// Rows for record `i` land at positions `2i` and `2i + 1`
    pub fn to_double(&self, records: &[ScaledMatchRecord]) -> Vec<DoubleEdge> {
        let mut edges = Vec::with_capacity(records.len() * 2);
        for record in records {
            edges.extend(self.double_edges(record));
        }
        edges
    }
}
