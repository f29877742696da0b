//! Edge list CSV output

use std::io::Write;

use chrono::{NaiveDateTime, Timelike};

use super::codec::join_fields;
use crate::{DoubleEdge, Edge, Result};

/// A row type that can be written as one CSV line
pub trait TableRow {
    const HEADER: [&'static str; 5];

    fn fields(&self) -> [String; 5];
}

impl TableRow for Edge {
    const HEADER: [&'static str; 5] = ["Date", "Source", "Target", "Score_Diff", "Map_Name"];

    fn fields(&self) -> [String; 5] {
        [
            format_date(self.date),
            self.source.clone(),
            self.target.clone(),
            format_weight(self.weight_diff),
            self.map_name.clone(),
        ]
    }
}

impl TableRow for DoubleEdge {
    const HEADER: [&'static str; 5] = ["Date", "Source", "Target", "Scaled_Score", "Map_Name"];

    fn fields(&self) -> [String; 5] {
        [
            format_date(self.date),
            self.source.clone(),
            self.target.clone(),
            format_weight(self.scaled_score),
            self.map_name.clone(),
        ]
    }
}

/// Date only at midnight, full timestamp otherwise
pub fn format_date(date: NaiveDateTime) -> String {
    if date.num_seconds_from_midnight() == 0 && date.nanosecond() == 0 {
        date.format("%Y-%m-%d").to_string()
    } else {
        date.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Shortest round-trip form, always with a decimal point for whole numbers.
/// Very small weights use Rust's exponent form (`1e-7`, not `1e-07`).
pub fn format_weight(weight: f64) -> String {
    format!("{:?}", weight)
}

/// Write a header and one line per row. Returns the number of rows written.
pub fn write_rows<'a, R, I, W>(writer: &mut W, rows: I) -> Result<usize>
where
    R: TableRow + 'a,
    I: IntoIterator<Item = &'a R>,
    W: Write,
{
    writeln!(writer, "{}", join_fields(&R::HEADER))?;

    let mut count = 0;
    for row in rows {
        writeln!(writer, "{}", join_fields(&row.fields()))?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}
