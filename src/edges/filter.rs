//! Team and map filters over edge rows

use crate::EdgeRow;

/// Optional team / map predicates; an unset field matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeFilter {
    /// Exact team name, matched against source or target
    pub team: Option<String>,
    /// Case-sensitive substring of the map name
    pub map: Option<String>,
}

impl EdgeFilter {
    pub fn new(team: Option<String>, map: Option<String>) -> Self {
        EdgeFilter { team, map }
    }

    pub fn is_empty(&self) -> bool {
        self.team.is_none() && self.map.is_none()
    }

    pub fn matches<R: EdgeRow>(&self, row: &R) -> bool {
        let map_ok = self
            .map
            .as_deref()
            .map_or(true, |m| row.map_name().contains(m));
        let team_ok = self
            .team
            .as_deref()
            .map_or(true, |t| row.source() == t || row.target() == t);
        map_ok && team_ok
    }

    /// Keep matching rows in their original order
    pub fn apply<R: EdgeRow>(&self, rows: Vec<R>) -> Vec<R> {
        if self.is_empty() {
            return rows;
        }
        let before = rows.len();
        let kept: Vec<R> = rows.into_iter().filter(|r| self.matches(r)).collect();
        log::debug!("Filter kept {} of {} rows", kept.len(), before);
        kept
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{DoubleEdge, Edge};

    fn make_edge(source: &str, target: &str, map: &str) -> Edge {
        Edge {
            date: NaiveDate::from_ymd_opt(2021, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            source: source.to_string(),
            target: target.to_string(),
            weight_diff: 0.5,
            map_name: map.to_string(),
        }
    }

    fn sample() -> Vec<Edge> {
        vec![
            make_edge("A", "B", "de_inferno"),
            make_edge("C", "A", "de_nuke"),
            make_edge("B", "C", "Inferno"),
            make_edge("AA", "C", "de_inferno"),
        ]
    }

    #[test]
    fn test_no_filter_keeps_everything() {
        let kept = EdgeFilter::default().apply(sample());
        assert_eq!(kept, sample());
    }

    #[test]
    fn test_map_filter_is_case_sensitive_substring() {
        let kept = EdgeFilter::new(None, Some("inferno".to_string())).apply(sample());
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|e| e.map_name == "de_inferno"));
    }

    #[test]
    fn test_team_filter_exact_on_either_side() {
        let kept = EdgeFilter::new(Some("A".to_string()), None).apply(sample());
        assert_eq!(kept, vec![make_edge("A", "B", "de_inferno"), make_edge("C", "A", "de_nuke")]);
    }

    #[test]
    fn test_filters_compose() {
        let filter = EdgeFilter::new(Some("C".to_string()), Some("Inferno".to_string()));
        let kept = filter.apply(sample());
        assert_eq!(kept, vec![make_edge("B", "C", "Inferno")]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filter = EdgeFilter::new(Some("C".to_string()), Some("in".to_string()));
        let once = filter.apply(sample());
        let twice = filter.apply(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_double_edges() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let rows = vec![
            DoubleEdge {
                date,
                source: "A".to_string(),
                target: "B".to_string(),
                scaled_score: 1.0,
                map_name: "Mirage".to_string(),
            },
            DoubleEdge {
                date,
                source: "B".to_string(),
                target: "A".to_string(),
                scaled_score: 0.5,
                map_name: "Mirage".to_string(),
            },
        ];
        let kept = EdgeFilter::new(Some("B".to_string()), None).apply(rows.clone());
        assert_eq!(kept, rows);
        assert!(EdgeFilter::new(Some("Z".to_string()), None).apply(rows).is_empty());
    }
}
