//! drive-schema: infer schemas and sample values from a folder of data files

mod output;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use drive_schema_sdk::collector::{CollectorConfig, DriveCollector};
use drive_schema_sdk::models::DataContainer;
use drive_schema_sdk::processors::SampleRequest;
use drive_schema_sdk::storage::LocalDriveStorage;

use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "drive-schema", version, about)]
struct Cli {
    /// Root folder to scan
    root: PathBuf,

    /// Configuration file (YAML, or JSON by `.json` extension)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Only scan below this folder
    #[arg(long, global = true)]
    prefix: Option<String>,

    /// Leading folders that form a collection name
    #[arg(long, global = true)]
    folder_levels: Option<usize>,

    /// Append file names to folder-based collection names
    #[arg(long, global = true)]
    use_file_name: bool,

    /// Delimited files have no header line
    #[arg(long, global = true)]
    no_header: bool,

    /// Delimited file separator
    #[arg(long, global = true)]
    delimiter: Option<char>,

    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List collections and their inferred fields
    Schema,
    /// Sample values of one field
    Sample {
        /// Collection name
        collection: String,
        /// Field name (dotted path for nested documents)
        field: String,
        /// Maximum values per file
        #[arg(short = 'n', long, default_value_t = 10)]
        max: usize,
        /// Keep each delimited row with this probability
        #[arg(long)]
        probability: Option<f64>,
    },
    /// Row counts and sizes per collection
    Metrics,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<CollectorConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let is_json = path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("json"));
            if is_json {
                CollectorConfig::from_json_str(&content)?
            } else {
                CollectorConfig::from_yaml_str(&content)?
            }
        }
        None => CollectorConfig::default(),
    };

    if let Some(prefix) = &cli.prefix {
        config.prefix = Some(prefix.clone());
    }
    if let Some(levels) = cli.folder_levels {
        config.folder_levels = levels;
    }
    if cli.use_file_name {
        config.use_file_name_in_name = true;
    }
    if cli.no_header {
        config.csv.has_header = false;
    }
    if let Some(delimiter) = cli.delimiter {
        config.csv.delimiter = delimiter;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let storage = LocalDriveStorage::new(&cli.root);
    let container = DataContainer::new(cli.root.display().to_string());
    let mut collector = DriveCollector::new(storage, config);

    let rendered = match &cli.command {
        Command::Schema => {
            let (collections, entities) = collector.get_schema(&container)?;
            output::format_schema(cli.format, &collections, &entities)?
        }
        Command::Sample {
            collection,
            field,
            max,
            probability,
        } => {
            let entity = collector
                .snapshot(&container)?
                .collection(collection)
                .and_then(|c| c.entities.iter().find(|e| &e.name == field))
                .cloned();
            let Some(entity) = entity else {
                bail!("No field {field} in collection {collection}");
            };

            let mut request = SampleRequest::new(*max);
            if let Some(p) = probability {
                request = request.with_probability(*p);
            }
            let report = collector.collect_sample_report(&entity, &request)?;
            output::format_samples(cli.format, field, &report)?
        }
        Command::Metrics => {
            let metrics = collector.get_collection_metrics(&container)?;
            output::format_metrics(cli.format, &metrics)?
        }
    };

    print!("{rendered}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}
