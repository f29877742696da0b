//! Edge list CLI
//!
//! Converts an extracted match table into single or double team edge lists.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use edgelist::{Config, Result, TieBreak, WeightMode, ZeroScorePolicy};

#[derive(Parser)]
#[command(name = "edgelist")]
#[command(about = "Convert esports match histories into team edge lists", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "edgelist.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a match table into edge lists
    Convert {
        /// Match table (CSV) produced by the workbook extractor
        #[arg(long)]
        input: PathBuf,
        /// Output file with one edge per match (winner -> loser)
        #[arg(long)]
        out_single: Option<PathBuf>,
        /// Output file with two mirrored edges per match
        #[arg(long)]
        out_double: Option<PathBuf>,
        /// Split output at this date (repeatable); outputs become directories
        #[arg(long = "cut-date", value_parser = parse_cut_date)]
        cut_dates: Vec<NaiveDateTime>,
        /// Keep only edges involving this team (exact name)
        #[arg(long)]
        team: Option<String>,
        /// Keep only edges whose map name contains this text
        #[arg(long)]
        map: Option<String>,
        /// Score weighting: max or binary (overrides config)
        #[arg(long)]
        weighting: Option<WeightMode>,
        /// 0-0 matches under max weighting: zero or reject (overrides config)
        #[arg(long)]
        zero_scores: Option<ZeroScorePolicy>,
        /// Source team on equal weights: team1 or team2 (overrides config)
        #[arg(long)]
        tie_break: Option<TieBreak>,
    },
    /// Show what a match table contains
    Inspect {
        /// Match table (CSV)
        #[arg(long)]
        input: PathBuf,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Write a default config file
    Init,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table or json.", s)),
        }
    }
}

fn parse_cut_date(s: &str) -> std::result::Result<NaiveDateTime, String> {
    edgelist::data::parse_timestamp(s).map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or fall back to defaults
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Convert {
            input,
            out_single,
            out_double,
            cut_dates,
            team,
            map,
            weighting,
            zero_scores,
            tie_break,
        } => {
            let mut config = config;
            if let Some(mode) = weighting {
                config.scaling.mode = mode;
            }
            if let Some(policy) = zero_scores {
                config.scaling.zero_scores = policy;
            }
            if let Some(tie) = tie_break {
                config.edges.tie_break = tie;
            }
            commands::convert(
                &config,
                commands::ConvertArgs {
                    input,
                    out_single,
                    out_double,
                    cut_dates,
                    team,
                    map,
                },
            )
        }
        Commands::Inspect { input, format } => commands::inspect(&input, format),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use std::path::{Path, PathBuf};

    use chrono::NaiveDateTime;
    use edgelist::data::{MatchTableReader, TableStats};
    use edgelist::edges::EdgeFilter;
    use edgelist::pipeline::{self, ChannelSummary, PipelineOptions};

    use super::*;

    pub struct ConvertArgs {
        pub input: PathBuf,
        pub out_single: Option<PathBuf>,
        pub out_double: Option<PathBuf>,
        pub cut_dates: Vec<NaiveDateTime>,
        pub team: Option<String>,
        pub map: Option<String>,
    }

    pub fn init(config_path: &str) -> Result<()> {
        if Path::new(config_path).exists() {
            return Err(edgelist::EdgeError::OutputExists(config_path.to_string()));
        }
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        println!("\nNext steps:");
        println!("  1. Edit {} to choose weighting and tie-break", config_path);
        println!("  2. Run 'edgelist inspect --input matches.csv' to check the table");
        println!("  3. Run 'edgelist convert --input matches.csv --out-single single.csv'");

        Ok(())
    }

    pub fn convert(config: &Config, args: ConvertArgs) -> Result<()> {
        let mut options = PipelineOptions::from_config(config, &args.input);
        options.out_single = args.out_single;
        options.out_double = args.out_double;
        options.cut_dates = args.cut_dates;
        options.filter = EdgeFilter::new(args.team, args.map);

        log::debug!(
            "Weighting: {}, zero scores: {}, tie-break: {}",
            config.scaling.mode,
            config.scaling.zero_scores,
            config.edges.tie_break
        );

        let summary = pipeline::run(&options)?;

        println!("Converted {} matches", summary.matches);
        if let Some(single) = &summary.single {
            print_channel("Single", single);
        }
        if let Some(double) = &summary.double {
            print_channel("Double", double);
        }

        Ok(())
    }

    fn print_channel(label: &str, channel: &ChannelSummary) {
        println!("  {} edges: {} rows in {} file(s)", label, channel.rows, channel.files.len());
        for file in &channel.files {
            println!("    {}", file.display());
        }
    }

    pub fn inspect(input: &Path, format: OutputFormat) -> Result<()> {
        let matches = MatchTableReader::new().read_path(input)?;
        let stats = TableStats::from_matches(&matches);

        match format {
            OutputFormat::Table => {
                println!("Match Table");
                println!("───────────────────────────────");
                println!("  Path:     {}", input.display());
                println!("  Matches:  {}", stats.match_count);
                println!("  Teams:    {}", stats.team_count());
                println!("  Draws:    {}", stats.draws);
                println!("  0-0:      {}", stats.zero_score_matches);
                if let (Some(earliest), Some(latest)) = (stats.earliest_match, stats.latest_match) {
                    println!("  Range:    {} to {}", earliest, latest);
                }
                if !stats.maps.is_empty() {
                    println!("  Maps:");
                    for (map, count) in &stats.maps {
                        println!("    {:<16}{}", map, count);
                    }
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            }
        }

        Ok(())
    }
}
