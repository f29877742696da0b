//! Conversion pipeline
//!
//! read -> scale -> derive -> filter -> (partition) -> write, once per
//! requested output channel. Everything that can fail on the input is checked
//! before the first file is written.

pub mod output;

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::data::writer::TableRow;
use crate::data::read_matches;
use crate::edges::{partition_by_dates, EdgeDeriver, EdgeFilter, Partition, WeightScaler};
use crate::{Config, DoubleEdge, Edge, EdgeError, EdgeRow, MatchRecord, Result};

/// Everything a conversion run needs
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub input: PathBuf,
    pub out_single: Option<PathBuf>,
    pub out_double: Option<PathBuf>,
    /// Partition boundaries; empty means one file per channel
    pub cut_dates: Vec<NaiveDateTime>,
    pub filter: EdgeFilter,
    pub scaler: WeightScaler,
    pub deriver: EdgeDeriver,
}

impl PipelineOptions {
    /// Options with the scaling and tie-break policies taken from config
    pub fn from_config<P: AsRef<Path>>(config: &Config, input: P) -> Self {
        PipelineOptions {
            input: input.as_ref().to_path_buf(),
            out_single: None,
            out_double: None,
            cut_dates: Vec::new(),
            filter: EdgeFilter::default(),
            scaler: WeightScaler::from_config(&config.scaling),
            deriver: EdgeDeriver::new(config.edges.tie_break),
        }
    }

    pub fn is_partitioned(&self) -> bool {
        !self.cut_dates.is_empty()
    }
}

/// What one output channel produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelSummary {
    /// Rows after filtering (boundary duplicates not counted twice)
    pub rows: usize,
    pub files: Vec<PathBuf>,
}

/// Result of a conversion run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub matches: usize,
    pub single: Option<ChannelSummary>,
    pub double: Option<ChannelSummary>,
}

/// Run the whole pipeline from the input file
pub fn run(options: &PipelineOptions) -> Result<RunSummary> {
    let matches = read_matches(&options.input)?;
    convert(&matches, options)
}

/// Run the pipeline over matches already in memory
pub fn convert(matches: &[MatchRecord], options: &PipelineOptions) -> Result<RunSummary> {
    let scaled = options.scaler.scale_all(matches)?;

    let single = options
        .out_single
        .as_ref()
        .map(|path| (path, options.filter.apply(options.deriver.to_single(&scaled))));
    let double = options
        .out_double
        .as_ref()
        .map(|path| (path, options.filter.apply(options.deriver.to_double(&scaled))));

    if single.is_none() && double.is_none() {
        log::warn!("No output requested; nothing written");
    } else if options.is_partitioned() {
        log::info!("Partitioning output at {} cut dates", options.cut_dates.len());
    }

    let single_plan = single
        .as_ref()
        .map(|(path, edges)| plan(path.as_path(), edges.as_slice(), &options.cut_dates))
        .transpose()?;
    let double_plan = double
        .as_ref()
        .map(|(path, edges)| plan(path.as_path(), edges.as_slice(), &options.cut_dates))
        .transpose()?;

    if let (Some(single), Some(double)) = (&single_plan, &double_plan) {
        if single.target == double.target {
            return Err(EdgeError::OutputConflict(single.target.display().to_string()));
        }
    }

    Ok(RunSummary {
        matches: matches.len(),
        single: single_plan.map(|p| p.write()).transpose()?,
        double: double_plan.map(|p| p.write()).transpose()?,
    })
}

/// A channel whose rows and partitions are computed but not yet written
struct ChannelPlan<'a, R> {
    path: &'a Path,
    /// The file, or the partition directory, this channel will create
    target: PathBuf,
    rows: &'a [R],
    partitions: Option<Vec<Partition<'a, R>>>,
}

fn plan<'a, R: EdgeRow>(
    path: &'a Path,
    rows: &'a [R],
    cut_dates: &[NaiveDateTime],
) -> Result<ChannelPlan<'a, R>> {
    let (target, partitions) = if cut_dates.is_empty() {
        (path.to_path_buf(), None)
    } else {
        let dir = output::partition_target(path).0;
        output::ensure_absent(&dir)?;
        let partitions = partition_by_dates(rows, cut_dates)?;
        output::partition_files(path, &partitions)?;
        (dir, Some(partitions))
    };
    Ok(ChannelPlan {
        path,
        target,
        rows,
        partitions,
    })
}

impl<R: TableRow> ChannelPlan<'_, R> {
    fn write(self) -> Result<ChannelSummary> {
        let files = match &self.partitions {
            Some(partitions) => output::write_partitions(self.path, partitions)?,
            None => {
                output::write_file(self.path, self.rows)?;
                vec![self.path.to_path_buf()]
            }
        };
        Ok(ChannelSummary {
            rows: self.rows.len(),
            files,
        })
    }
}

/// Single-edge list for a set of matches, filtered
pub fn single_edges(matches: &[MatchRecord], options: &PipelineOptions) -> Result<Vec<Edge>> {
    let scaled = options.scaler.scale_all(matches)?;
    Ok(options.filter.apply(options.deriver.to_single(&scaled)))
}

/// Double-edge list for a set of matches, filtered
pub fn double_edges(matches: &[MatchRecord], options: &PipelineOptions) -> Result<Vec<DoubleEdge>> {
    let scaled = options.scaler.scale_all(matches)?;
    Ok(options.filter.apply(options.deriver.to_double(&scaled)))
}
