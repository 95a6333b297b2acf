//! TLD Filter CLI Application
//!
//! A command-line interface that classifies domain records by TLD and keeps
//! the ones matching a suffix. This CLI application provides a user-friendly
//! interface to the tld-filter-lib library.

mod logger;
mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use std::collections::BTreeMap;
use std::process;
use tld_filter_lib::{
    load_env_config, load_records_from_file, records_from_domains, sample_batch, validate_suffix,
    ConfigManager, EnvConfig, FileConfig, FilterConfig, Record, TldFilter, TldFilterError,
};
use tracing::{debug, info, warn};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for tld-filter
#[derive(Parser, Debug)]
#[command(name = "tld-filter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Sai Dutt G.V <gvs46@protonmail.com>")]
#[command(about = "Classify domain records by TLD and keep those matching a suffix")]
#[command(
    long_about = "Classify domain records by TLD and keep those matching a suffix.\n\nEvery record is validated and classified concurrently. If any record is rejected, the whole batch fails and every reason is reported."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Domain names to classify (each becomes a valid record)
    #[arg(value_name = "DOMAINS", help_heading = "Input")]
    pub domains: Vec<String>,

    /// Batch file: JSON array of records, or one `domain[,valid[,ref_count]]` per line
    #[arg(short = 'f', long = "file", value_name = "FILE", action = clap::ArgAction::Append, help_heading = "Input")]
    pub files: Vec<String>,

    /// Include the built-in six-record sample batch
    #[arg(long = "sample", help_heading = "Input")]
    pub sample: bool,

    /// TLD suffix records must end with (default: .com)
    #[arg(short = 's', long = "suffix", value_name = "SUFFIX", allow_hyphen_values = true, help_heading = "Filtering")]
    pub suffix: Option<String>,

    /// Output accepted records as JSON
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Enable colored, structured output with a header and summary
    #[arg(short = 'p', long = "pretty", help_heading = "Output Format")]
    pub pretty: bool,

    /// Show rank and reference count next to each record's TLD mapping
    #[arg(short = 'i', long = "info", help_heading = "Output Format")]
    pub info: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Debug logging and per-record failure details
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

/// Effective settings after merging defaults, config files, env and CLI.
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    suffix: String,
    localized_tlds: BTreeMap<String, String>,
    json: bool,
    pretty: bool,
    info: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            suffix: FilterConfig::default().target_suffix,
            localized_tlds: BTreeMap::new(),
            json: false,
            pretty: false,
            info: false,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    logger::init_cli_logger(args.verbose, args.debug);

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if args.domains.is_empty() && args.files.is_empty() && !args.sample {
        return Err(
            "You must specify domain names, a batch file with --file, or --sample".to_string(),
        );
    }

    if args.json && args.pretty {
        return Err("Cannot combine --json with --pretty".to_string());
    }

    if let Some(suffix) = &args.suffix {
        validate_suffix(suffix).map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// Main classification logic
async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let env_config = load_env_config();
    let file_config = load_file_config(&args, &env_config)?;
    let settings = build_settings(&args, file_config, &env_config);
    debug!(?settings, "resolved settings");

    let records = gather_records(&args)?;
    info!(records = records.len(), suffix = %settings.suffix, "classifying batch");

    let filter = TldFilter::with_config(FilterConfig {
        target_suffix: settings.suffix.clone(),
        localized_tlds: settings.localized_tlds.clone(),
    })?;
    if args.debug {
        ui::print_table(filter.table());
    }

    let total = records.len();
    let start_time = std::time::Instant::now();

    let mut accepted = match filter.filter_and_classify(records).await {
        Ok(accepted) => accepted,
        Err(err) => {
            if let TldFilterError::BatchFailed { failures } = &err {
                warn!(failed = failures.len(), "batch rejected");
                if args.debug {
                    ui::print_failures(failures);
                }
            }
            return Err(err.into());
        }
    };

    let duration = start_time.elapsed();
    info!(accepted = accepted.len(), elapsed_ms = duration.as_millis() as u64, "batch complete");

    // Workers report in arbitrary order; print in input order.
    accepted.sort_by_key(|record| record.rank);

    display_results(&accepted, total, &settings, duration)?;

    Ok(())
}

/// Load config files: `--config`, then `TF_CONFIG`, then discovery.
fn load_file_config(
    args: &Args,
    env_config: &EnvConfig,
) -> Result<FileConfig, Box<dyn std::error::Error>> {
    let config_manager = ConfigManager::new();

    if let Some(explicit_config_path) = &args.config {
        info!(path = %explicit_config_path, "using explicit config file (--config)");
        let file_config = config_manager
            .load_file(explicit_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", explicit_config_path, e))?;
        return Ok(file_config);
    }

    if let Some(env_config_path) = &env_config.config {
        info!(path = %env_config_path, "using explicit config file (TF_CONFIG)");
        let file_config = config_manager
            .load_file(env_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", env_config_path, e))?;
        return Ok(file_config);
    }

    debug!("discovering config files");
    match config_manager.discover_and_load() {
        Ok(file_config) => Ok(file_config),
        Err(e) => {
            warn!(error = %e, "config discovery failed, using defaults");
            Ok(FileConfig::default())
        }
    }
}

/// Merge settings. Precedence (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables (TF_*)
/// 3. Config files
/// 4. Built-in defaults
fn build_settings(args: &Args, file_config: FileConfig, env_config: &EnvConfig) -> Settings {
    let mut settings = Settings::default();

    if let Some(defaults) = file_config.defaults {
        if let Some(suffix) = defaults.suffix {
            settings.suffix = suffix;
        }
        if let Some(pretty) = defaults.pretty {
            settings.pretty = pretty;
        }
        if let Some(info) = defaults.info {
            settings.info = info;
        }
    }
    if let Some(pairs) = file_config.localized_tlds {
        settings.localized_tlds = pairs;
    }
    if let Some(json) = file_config.output.and_then(|o| o.json) {
        settings.json = json;
    }

    if let Some(suffix) = &env_config.suffix {
        settings.suffix = suffix.clone();
    }
    if let Some(pretty) = env_config.pretty {
        settings.pretty = pretty;
    }
    if let Some(info) = env_config.info {
        settings.info = info;
    }
    if let Some(json) = env_config.json {
        settings.json = json;
    }

    if let Some(suffix) = &args.suffix {
        settings.suffix = suffix.clone();
    }
    // Flags only switch things on.
    if args.json {
        settings.json = true;
        settings.pretty = false;
    }
    if args.pretty {
        settings.pretty = true;
        settings.json = false;
    }
    if args.info {
        settings.info = true;
    }

    settings
}

/// Build the batch from `--sample`, `--file` and positional domains, in that order.
///
/// Every source is numbered from 1, so each is shifted past the records
/// already gathered to keep ranks unique across the combined batch.
fn gather_records(args: &Args) -> Result<Vec<Record>, Box<dyn std::error::Error>> {
    let mut records = Vec::new();

    if args.sample {
        append_batch(&mut records, sample_batch());
    }

    for path in &args.files {
        let loaded = load_records_from_file(path)?;
        debug!(path = %path, records = loaded.len(), "loaded batch file");
        append_batch(&mut records, loaded);
    }

    if !args.domains.is_empty() {
        append_batch(&mut records, records_from_domains(&args.domains));
    }

    Ok(records)
}

fn append_batch(records: &mut Vec<Record>, batch: Vec<Record>) {
    let offset = records.len() as u32;
    records.extend(batch.into_iter().map(|mut record| {
        record.rank += offset;
        record
    }));
}

fn display_results(
    accepted: &[Record],
    total: usize,
    settings: &Settings,
    duration: std::time::Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    if settings.json {
        println!("{}", serde_json::to_string_pretty(accepted)?);
    } else if settings.pretty {
        ui::print_header(total, &settings.suffix);
        for record in accepted {
            ui::print_record(record, settings.info);
        }
        println!();
        ui::print_summary(total, accepted.len(), duration);
    } else {
        for record in accepted {
            ui::print_record_default(record, settings.info);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tld_filter_lib::{DefaultsConfig, OutputConfig};

    fn create_test_args() -> Args {
        Args {
            domains: vec![],
            files: vec![],
            sample: false,
            suffix: None,
            json: false,
            pretty: false,
            info: false,
            config: None,
            debug: false,
            verbose: false,
        }
    }

    #[test]
    fn test_validate_args_requires_input() {
        let args = create_test_args();
        assert!(validate_args(&args).is_err());

        let mut args = create_test_args();
        args.sample = true;
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_json_pretty_conflict() {
        let mut args = create_test_args();
        args.domains = vec!["google.com".to_string()];
        args.json = true;
        args.pretty = true;
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_bad_suffix() {
        let mut args = create_test_args();
        args.domains = vec!["google.com".to_string()];
        args.suffix = Some(".c om".to_string());
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_build_settings_defaults() {
        let settings = build_settings(&create_test_args(), FileConfig::default(), &EnvConfig::default());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.suffix, ".com");
    }

    #[test]
    fn test_build_settings_precedence() {
        let file_config = FileConfig {
            defaults: Some(DefaultsConfig {
                suffix: Some(".org".to_string()),
                pretty: Some(true),
                info: Some(true),
            }),
            localized_tlds: Some(BTreeMap::from([(".net".to_string(), ".net.id".to_string())])),
            output: Some(OutputConfig { json: Some(false) }),
        };
        let env_config = EnvConfig {
            suffix: Some(".gov".to_string()),
            info: Some(false),
            ..Default::default()
        };

        let settings = build_settings(&create_test_args(), file_config.clone(), &env_config);
        assert_eq!(settings.suffix, ".gov"); // env beats file
        assert!(settings.pretty); // file preserved
        assert!(!settings.info); // env beats file
        assert_eq!(settings.localized_tlds.len(), 1);

        let mut args = create_test_args();
        args.suffix = Some(".io".to_string());
        args.json = true;
        let settings = build_settings(&args, file_config, &env_config);
        assert_eq!(settings.suffix, ".io"); // CLI beats env
        assert!(settings.json);
        assert!(!settings.pretty); // --json switches pretty off
    }

    #[test]
    fn test_gather_records_ranks_continue_after_sample() {
        let mut args = create_test_args();
        args.sample = true;
        args.domains = vec!["rust-lang.org".to_string()];

        let records = gather_records(&args).unwrap();
        assert_eq!(records.len(), 7);
        assert_eq!(records[6].rank, 7);
        assert_eq!(records[6].domain, "rust-lang.org");
    }

    #[test]
    fn test_gather_records_ranks_unique_across_files() {
        let mut first = NamedTempFile::new().unwrap();
        writeln!(first, "first.com").unwrap();
        let mut second = NamedTempFile::new().unwrap();
        writeln!(second, "second.com").unwrap();
        writeln!(second, "third.org,true,5").unwrap();

        let mut args = create_test_args();
        args.sample = true;
        args.files = vec![
            first.path().to_str().unwrap().to_string(),
            second.path().to_str().unwrap().to_string(),
        ];
        args.domains = vec!["rust-lang.org".to_string()];

        let records = gather_records(&args).unwrap();
        let ranks: Vec<u32> = records.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, (1..=10).collect::<Vec<u32>>());
        assert_eq!(records[6].domain, "first.com");
        assert_eq!(records[7].domain, "second.com");
        assert_eq!(records[8].domain, "third.org");
        assert_eq!(records[9].domain, "rust-lang.org");
    }

    #[test]
    fn test_gather_records_missing_file() {
        let mut args = create_test_args();
        args.files = vec!["/nonexistent/batch.txt".to_string()];
        assert!(gather_records(&args).is_err());
    }
}
