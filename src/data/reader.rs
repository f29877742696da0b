//! Match table reader
//!
//! Reads the flat CSV produced by the workbook extractor. Columns are looked up
//! by header name, so the extractor's extra columns (IDs, raw cell text,
//! tournament) can stay in the file.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use super::codec::parse_records;
use crate::{EdgeError, MatchRecord, Result};

pub const DATE: &str = "Date";
pub const TEAM1_NAME: &str = "Team1_Name";
pub const TEAM1_SCORE: &str = "Team1_Score";
pub const TEAM2_NAME: &str = "Team2_Name";
pub const TEAM2_SCORE: &str = "Team2_Score";
pub const MAP_NAME: &str = "Map_Name";

/// Raw cell text columns written by the extractor, e.g. "Astralis (16)"
pub const TEAM1_TEXT: &str = "Team1_Text";
pub const TEAM2_TEXT: &str = "Team2_Text";

const REQUIRED_COLUMNS: [&str; 6] = [DATE, TEAM1_NAME, TEAM1_SCORE, TEAM2_NAME, TEAM2_SCORE, MAP_NAME];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
// Slash dates are month-first; two-digit years tried first since %Y takes any width
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];

/// Parse a timestamp in any of the accepted date or date-time layouts.
/// Plain dates are taken as midnight.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(dt);
        }
    }
    // pandas may append fractional seconds
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(dt);
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, format) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt);
            }
        }
    }

    Err(EdgeError::InvalidDate(text.to_string()))
}

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    team1_name: usize,
    team1_score: usize,
    team2_name: usize,
    team2_score: usize,
    map_name: usize,
    team1_text: Option<usize>,
    team2_text: Option<usize>,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self> {
        let find = |name: &str| header.iter().position(|h| h.trim() == name);
        let require = |name: &str| find(name).ok_or_else(|| EdgeError::MissingColumn(name.to_string()));

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| find(*c).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(EdgeError::MissingColumn(missing.join(", ")));
        }

        Ok(Columns {
            date: require(DATE)?,
            team1_name: require(TEAM1_NAME)?,
            team1_score: require(TEAM1_SCORE)?,
            team2_name: require(TEAM2_NAME)?,
            team2_score: require(TEAM2_SCORE)?,
            map_name: require(MAP_NAME)?,
            team1_text: find(TEAM1_TEXT),
            team2_text: find(TEAM2_TEXT),
        })
    }
}

/// Reads match records from the extractor's CSV
pub struct MatchTableReader {
    /// Score as written in the raw cell text: "Team Name (16)"
    score_pattern: Regex,
}

impl Default for MatchTableReader {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchTableReader {
    pub fn new() -> Self {
        MatchTableReader {
            score_pattern: Regex::new(r"\((\d+)\)").expect("valid score pattern"),
        }
    }

    /// Read every match from a CSV file
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<MatchRecord>> {
        let path = path.as_ref();
        log::info!("Reading matches from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        self.parse(&content)
    }

    /// Parse CSV text. Any bad row fails the whole table.
    pub fn parse(&self, content: &str) -> Result<Vec<MatchRecord>> {
        let mut records = parse_records(content).into_iter();
        let header = records
            .next()
            .ok_or_else(|| EdgeError::MissingColumn(REQUIRED_COLUMNS.join(", ")))?;
        let columns = Columns::from_header(&header)?;

        let matches = records
            .enumerate()
            .map(|(i, fields)| self.parse_row(&columns, &fields, i + 1))
            .collect::<Result<Vec<_>>>()?;

        log::info!("Read {} matches", matches.len());
        Ok(matches)
    }

    fn parse_row(&self, columns: &Columns, fields: &[String], row: usize) -> Result<MatchRecord> {
        let cell = |index: usize, name: &str| field(fields, index, row, name);
        let text = |index: Option<usize>| index.and_then(|i| fields.get(i)).map(|s| s.trim());

        let date = parse_timestamp(cell(columns.date, DATE)?)
            .map_err(|e| malformed(row, DATE, &e.to_string()))?;

        let team1_text = text(columns.team1_text);
        let team2_text = text(columns.team2_text);

        let team1_name = self.team_name(cell(columns.team1_name, TEAM1_NAME)?, team1_text, row, TEAM1_NAME)?;
        let team2_name = self.team_name(cell(columns.team2_name, TEAM2_NAME)?, team2_text, row, TEAM2_NAME)?;
        let team1_score = self.score(cell(columns.team1_score, TEAM1_SCORE)?, team1_text, row, TEAM1_SCORE)?;
        let team2_score = self.score(cell(columns.team2_score, TEAM2_SCORE)?, team2_text, row, TEAM2_SCORE)?;

        Ok(MatchRecord {
            date,
            team1_name,
            team1_score,
            team2_name,
            team2_score,
            map_name: cell(columns.map_name, MAP_NAME)?.to_string(),
        })
    }

    /// Score from its own column, or recovered from the raw cell text
    fn score(&self, value: &str, raw_text: Option<&str>, row: usize, column: &str) -> Result<f64> {
        let value = if value.is_empty() {
            let recovered = raw_text
                .and_then(|t| self.score_pattern.captures(t))
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str());
            match recovered {
                Some(v) => {
                    log::debug!("Row {}: recovered {} from raw text", row, column);
                    v
                }
                None => return Err(malformed(row, column, "empty score")),
            }
        } else {
            value
        };

        let score: f64 = value
            .parse()
            .map_err(|_| malformed(row, column, &format!("not a number: {}", value)))?;
        if !score.is_finite() || score < 0.0 {
            return Err(malformed(row, column, &format!("invalid score: {}", value)));
        }
        Ok(score)
    }

    /// Team name from its own column, or the raw cell text minus the score
    fn team_name(&self, value: &str, raw_text: Option<&str>, row: usize, column: &str) -> Result<String> {
        if !value.is_empty() {
            return Ok(value.to_string());
        }
        let recovered = raw_text
            .map(|t| self.score_pattern.replace(t, "").trim().to_string())
            .filter(|t| !t.is_empty());
        recovered.ok_or_else(|| malformed(row, column, "empty team name"))
    }
}

fn field<'a>(fields: &'a [String], index: usize, row: usize, column: &str) -> Result<&'a str> {
    fields
        .get(index)
        .map(|s| s.trim())
        .ok_or_else(|| malformed(row, column, "missing field"))
}

fn malformed(row: usize, column: &str, message: &str) -> EdgeError {
    EdgeError::Malformed {
        row,
        column: column.to_string(),
        message: message.to_string(),
    }
}

/// Read matches from a CSV file with the default reader
pub fn read_matches<P: AsRef<Path>>(path: P) -> Result<Vec<MatchRecord>> {
    MatchTableReader::new().read_path(path)
}
