//! Tabular input and output
//!
//! Reading the extracted match table and writing edge lists as CSV.

pub mod codec;
pub mod reader;
pub mod summary;
pub mod writer;

pub use reader::{parse_timestamp, read_matches, MatchTableReader};
pub use summary::TableStats;
pub use writer::{write_rows, TableRow};
