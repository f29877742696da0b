//! Overview of a match table

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::MatchRecord;

/// Counts and date range of a set of matches
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableStats {
    pub match_count: usize,
    pub earliest_match: Option<NaiveDateTime>,
    pub latest_match: Option<NaiveDateTime>,
    pub teams: Vec<String>,
    /// Map name -> number of matches played on it
    pub maps: BTreeMap<String, usize>,
    pub draws: usize,
    pub zero_score_matches: usize,
}

impl TableStats {
    pub fn from_matches(matches: &[MatchRecord]) -> Self {
        let mut teams = BTreeSet::new();
        let mut maps = BTreeMap::new();
        for m in matches {
            teams.insert(m.team1_name.clone());
            teams.insert(m.team2_name.clone());
            *maps.entry(m.map_name.clone()).or_insert(0) += 1;
        }

        TableStats {
            match_count: matches.len(),
            earliest_match: matches.iter().map(|m| m.date).min(),
            latest_match: matches.iter().map(|m| m.date).max(),
            teams: teams.into_iter().collect(),
            maps,
            draws: matches.iter().filter(|m| m.winner().is_none()).count(),
            zero_score_matches: matches
                .iter()
                .filter(|m| m.team1_score == 0.0 && m.team2_score == 0.0)
                .count(),
        }
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn make_match(day: u32, team1: &str, s1: f64, team2: &str, s2: f64, map: &str) -> MatchRecord {
        MatchRecord {
            date: NaiveDate::from_ymd_opt(2022, 2, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            team1_name: team1.to_string(),
            team1_score: s1,
            team2_name: team2.to_string(),
            team2_score: s2,
            map_name: map.to_string(),
        }
    }

    #[test]
    fn test_empty_table() {
        let stats = TableStats::from_matches(&[]);
        assert_eq!(stats.match_count, 0);
        assert_eq!(stats.earliest_match, None);
        assert_eq!(stats.team_count(), 0);
    }

    #[test]
    fn test_counts() {
        let matches = vec![
            make_match(9, "NaVi", 16.0, "G2", 14.0, "Dust2"),
            make_match(3, "G2", 15.0, "FaZe", 15.0, "Dust2"),
            make_match(5, "FaZe", 0.0, "NaVi", 0.0, "Ancient"),
        ];
        let stats = TableStats::from_matches(&matches);
        assert_eq!(stats.match_count, 3);
        assert_eq!(stats.teams, vec!["FaZe", "G2", "NaVi"]);
        assert_eq!(stats.maps.get("Dust2"), Some(&2));
        assert_eq!(stats.draws, 2);
        assert_eq!(stats.zero_score_matches, 1);
        assert_eq!(stats.earliest_match, Some(matches[1].date));
        assert_eq!(stats.latest_match, Some(matches[0].date));
    }
}
