//! Match-to-edge transformation
//!
//! Scales raw scores into weights, derives directed edges, filters them and
//! slices them into date intervals.

pub mod derive;
pub mod filter;
pub mod partition;
pub mod scale;

pub use derive::EdgeDeriver;
pub use filter::EdgeFilter;
pub use partition::{partition_by_dates, Partition};
pub use scale::WeightScaler;
