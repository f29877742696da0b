//! Date-interval partitioning
//!
//! Splits an edge list into consecutive `[start, end]` buckets bounded by cut
//! dates. Both ends are inclusive, so a row dated exactly on a cut belongs to
//! the buckets on either side of it.

use chrono::NaiveDateTime;

use crate::{EdgeError, EdgeRow, Result};

/// A borrowed slice of the edge list between two boundaries
#[derive(Debug, Clone)]
pub struct Partition<'a, R> {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub rows: Vec<&'a R>,
}

impl<R> Partition<'_, R> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, date: NaiveDateTime) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Earliest and latest row dates, or None for an empty list
pub fn date_range<R: EdgeRow>(rows: &[R]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let first = rows.first()?.date();
    Some(rows.iter().fold((first, first), |(lo, hi), r| {
        let d = r.date();
        (lo.min(d), hi.max(d))
    }))
}

/// Interval boundaries for the given data range.
///
/// Cuts outside `[start, end]` are dropped; the rest are sorted and wrapped
/// by `start` and `end`. Equal boundaries are kept, so a cut on `start` or
/// `end` (or a repeated cut) yields a zero-length `[d, d]` interval.
pub fn boundaries(
    start: NaiveDateTime,
    end: NaiveDateTime,
    cuts: &[NaiveDateTime],
) -> Result<Vec<NaiveDateTime>> {
    let mut inside: Vec<NaiveDateTime> = cuts
        .iter()
        .copied()
        .filter(|c| start <= *c && *c <= end)
        .collect();

    if inside.is_empty() {
        return Err(EdgeError::NoCutPoints);
    }
    if inside.len() < cuts.len() {
        log::warn!(
            "Ignoring {} cut dates outside {} .. {}",
            cuts.len() - inside.len(),
            start,
            end
        );
    }

    inside.sort();

    let mut bounds = Vec::with_capacity(inside.len() + 2);
    bounds.push(start);
    bounds.extend(inside);
    bounds.push(end);

    Ok(bounds)
}

/// Slice `rows` into one partition per pair of consecutive boundaries
pub fn partition_by_dates<'a, R: EdgeRow>(
    rows: &'a [R],
    cuts: &[NaiveDateTime],
) -> Result<Vec<Partition<'a, R>>> {
    let (start, end) = date_range(rows).ok_or(EdgeError::NoCutPoints)?;
    let bounds = boundaries(start, end, cuts)?;

    let partitions: Vec<Partition<'a, R>> = bounds
        .windows(2)
        .map(|pair| {
            let (lo, hi) = (pair[0], pair[1]);
            Partition {
                start: lo,
                end: hi,
                rows: rows
                    .iter()
                    .filter(|r| lo <= r.date() && r.date() <= hi)
                    .collect(),
            }
        })
        .collect();

    log::debug!(
        "Split {} rows into {} partitions between {} and {}",
        rows.len(),
        partitions.len(),
        start,
        end
    );
    Ok(partitions)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::Edge;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn make_edge(date: NaiveDateTime, source: &str) -> Edge {
        Edge {
            date,
            source: source.to_string(),
            target: "X".to_string(),
            weight_diff: 0.25,
            map_name: "Dust2".to_string(),
        }
    }

    fn year_of_edges() -> Vec<Edge> {
        vec![
            make_edge(day(2021, 1, 1), "a"),
            make_edge(day(2021, 3, 15), "b"),
            make_edge(day(2021, 6, 1), "c"),
            make_edge(day(2021, 9, 9), "d"),
            make_edge(day(2021, 12, 31), "e"),
        ]
    }

    #[test]
    fn test_single_cut_gives_two_partitions() {
        let edges = year_of_edges();
        let parts = partition_by_dates(&edges, &[day(2021, 6, 1)]).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!((parts[0].start, parts[0].end), (day(2021, 1, 1), day(2021, 6, 1)));
        assert_eq!((parts[1].start, parts[1].end), (day(2021, 6, 1), day(2021, 12, 31)));
    }

    #[test]
    fn test_boundary_rows_appear_in_both_partitions() {
        let edges = year_of_edges();
        let parts = partition_by_dates(&edges, &[day(2021, 6, 1)]).unwrap();
        let names = |p: &Partition<Edge>| p.rows.iter().map(|e| e.source.clone()).collect::<Vec<_>>();
        assert_eq!(names(&parts[0]), vec!["a", "b", "c"]);
        assert_eq!(names(&parts[1]), vec!["c", "d", "e"]);
    }

    #[test]
    fn test_out_of_range_cuts_are_ignored() {
        let edges = year_of_edges();
        let cuts = [day(2020, 1, 1), day(2021, 9, 1), day(2022, 5, 5), day(2021, 4, 1)];
        let parts = partition_by_dates(&edges, &cuts).unwrap();
        let ends: Vec<_> = parts.iter().map(|p| p.end).collect();
        assert_eq!(ends, vec![day(2021, 4, 1), day(2021, 9, 1), day(2021, 12, 31)]);
    }

    #[test]
    fn test_no_cut_in_range_fails() {
        let edges = year_of_edges();
        assert!(matches!(
            partition_by_dates(&edges, &[day(2019, 1, 1)]),
            Err(EdgeError::NoCutPoints)
        ));
        assert!(matches!(partition_by_dates(&edges, &[]), Err(EdgeError::NoCutPoints)));
    }

    #[test]
    fn test_empty_rows_fail() {
        let edges: Vec<Edge> = Vec::new();
        assert!(matches!(
            partition_by_dates(&edges, &[day(2021, 6, 1)]),
            Err(EdgeError::NoCutPoints)
        ));
    }

    #[test]
    fn test_cut_on_data_start_keeps_zero_length_interval() {
        let edges = year_of_edges();
        let parts = partition_by_dates(&edges, &[day(2021, 1, 1)]).unwrap();
        let bounds: Vec<_> = parts.iter().map(|p| (p.start, p.end)).collect();
        assert_eq!(
            bounds,
            vec![
                (day(2021, 1, 1), day(2021, 1, 1)),
                (day(2021, 1, 1), day(2021, 12, 31)),
            ]
        );
        assert_eq!(parts[0].len(), 1);
        assert_eq!(parts[1].len(), edges.len());
    }

    #[test]
    fn test_cut_on_data_end_and_repeated_cuts() {
        let edges = year_of_edges();
        let cuts = [day(2021, 12, 31), day(2021, 6, 1), day(2021, 6, 1)];
        let parts = partition_by_dates(&edges, &cuts).unwrap();
        let bounds: Vec<_> = parts.iter().map(|p| (p.start, p.end)).collect();
        assert_eq!(
            bounds,
            vec![
                (day(2021, 1, 1), day(2021, 6, 1)),
                (day(2021, 6, 1), day(2021, 6, 1)),
                (day(2021, 6, 1), day(2021, 12, 31)),
                (day(2021, 12, 31), day(2021, 12, 31)),
            ]
        );
        assert_eq!(parts[1].len(), 1);
        assert_eq!(parts[3].len(), 1);
    }

    #[test]
    fn test_single_instant_data() {
        let edges = vec![make_edge(day(2021, 5, 5), "a"), make_edge(day(2021, 5, 5), "b")];
        let parts = partition_by_dates(&edges, &[day(2021, 5, 5)]).unwrap();
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|p| p.start == p.end && p.len() == 2));
    }

    #[test]
    fn test_partitions_cover_input_and_respect_bounds() {
        // Unsorted input with several cuts
        let edges = vec![
            make_edge(day(2021, 7, 4), "a"),
            make_edge(day(2021, 2, 2), "b"),
            make_edge(day(2021, 11, 30), "c"),
            make_edge(day(2021, 5, 1), "d"),
            make_edge(day(2021, 8, 1), "e"),
        ];
        let cuts = [day(2021, 8, 1), day(2021, 5, 1)];
        let parts = partition_by_dates(&edges, &cuts).unwrap();
        assert_eq!(parts.len(), 3);

        let mut seen: Vec<String> = Vec::new();
        for part in &parts {
            for row in &part.rows {
                assert!(part.contains(row.date));
                if !seen.contains(&row.source) {
                    seen.push(row.source.clone());
                }
            }
        }
        seen.sort();
        assert_eq!(seen, vec!["a", "b", "c", "d", "e"]);

        // Relative order within a partition follows the input
        let first: Vec<_> = parts[1].rows.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(first, vec!["a", "d", "e"]);
    }
}
