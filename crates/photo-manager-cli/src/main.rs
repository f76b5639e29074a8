use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{error, info, LevelFilter};
use std::path::PathBuf;
use std::process::ExitCode;

use photo_manager_core::logging::init_logger;
use photo_manager_core::{
    CommandUploader, Config, IngestOutcome, IngestRequest, Ingester, RecordQuery, RecordStore,
};

mod args;

use args::parse_annotations;

#[derive(Parser)]
#[command(name = "photo-manager")]
#[command(about = "Fingerprint, rename, thumbnail, upload and record photos")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that reads configuration
#[derive(clap::Args)]
struct ConfigArgs {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Load environment overrides from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Directory holding the monthly record files
    #[arg(long)]
    record_dir: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest one image
    Upload {
        /// Image to ingest
        image: PathBuf,

        /// Free-form tags and description: `tags:a,b`, `desc:text`,
        /// `a,b` or a trailing description
        #[arg(trailing_var_arg = true)]
        extra: Vec<String>,

        /// Comma separated tags
        #[arg(short, long)]
        tags: Vec<String>,

        /// Description
        #[arg(short, long)]
        desc: Option<String>,

        /// Thumbnail width in pixels
        #[arg(long)]
        thumb_width: Option<u32>,

        /// Undo the rename and thumbnail if a later step fails
        #[arg(long)]
        rollback: bool,

        /// Skip the uploader `--version` check
        #[arg(long)]
        no_check: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Search recorded photos
    List {
        /// Substring of the file name
        #[arg(long)]
        name: Option<String>,

        /// Substring of any tag
        #[arg(long)]
        tag: Option<String>,

        /// Substring of the description
        #[arg(long)]
        desc: Option<String>,

        /// Only this month, YYYY-MM
        #[arg(long)]
        month: Option<String>,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Show the effective configuration and verify the uploader
    Check {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "photo-manager.json")]
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let staged = e
                .downcast_ref::<photo_manager_core::Error>()
                .and_then(|err| err.stage().map(|stage| (stage, err.cause())));
            match staged {
                Some((stage, cause)) => {
                    error!("Ingest failed at {}: {}", stage, cause);
                    eprintln!("Error at stage {}: {}", stage, cause);
                }
                None => {
                    error!("{:#}", e);
                    eprintln!("Error: {:#}", e);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Upload {
            image,
            extra,
            tags,
            desc,
            thumb_width,
            rollback,
            no_check,
            config: config_args,
        } => {
            let mut config = load_config(&config_args)?;
            if let Some(width) = thumb_width {
                config.thumb_width = width;
            }
            config.rollback_on_failure |= rollback;
            config.check_uploader &= !no_check;
            config.validate()?;
            setup_logging(&config, config_args.verbose)?;

            let uploader = CommandUploader::from_config(&config);
            if config.check_uploader {
                let version = uploader.check_executable()?;
                info!("Using uploader {}", version);
            }

            let annotations = parse_annotations(&extra, &tags, desc.as_deref());
            let request = IngestRequest::new(image)
                .with_tags(annotations.tags)
                .with_desc(annotations.desc);

            let ingester = Ingester::with_uploader(config, uploader)?;
            match ingester.ingest(&request)? {
                IngestOutcome::Duplicate(existing) => {
                    println!("Already uploaded, skipping.");
                    println!("{}", serde_json::to_string_pretty(&existing)?);
                }
                IngestOutcome::Done { record, shard_path } => {
                    println!("Record file: {}", shard_path.display());
                    println!("File:        {}", record.filename);
                    println!("URL:         {}", record.url);
                    println!("Thumbnail:   {}", record.thumb_url);
                }
            }
            Ok(())
        }

        Commands::List {
            name,
            tag,
            desc,
            month,
            config: config_args,
        } => {
            let config = load_config(&config_args)?;
            setup_logging(&config, config_args.verbose)?;

            let store = RecordStore::new(&config.record_dir);
            let query = RecordQuery {
                name,
                tag,
                desc,
                month,
            };
            let records = store.query(&query)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }

        Commands::Check {
            config: config_args,
        } => {
            let config = load_config(&config_args)?;
            config.validate()?;
            setup_logging(&config, config_args.verbose)?;

            println!("{}", serde_json::to_string_pretty(&config)?);

            let store = RecordStore::new(&config.record_dir);
            println!("Record shards: {}", store.shards()?.len());

            let version = CommandUploader::from_config(&config).check_executable()?;
            println!("Uploader: {}", version);
            Ok(())
        }

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}

/// Defaults, then the config file, then environment, then flags
fn load_config(args: &ConfigArgs) -> anyhow::Result<Config> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };

    let mut config = config.with_env(args.env_file.as_deref())?;
    if let Some(dir) = &args.record_dir {
        config.record_dir = photo_manager_core::config::expand_home(dir);
    }
    Ok(config)
}

fn setup_logging(config: &Config, verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 if config.debug => LevelFilter::Debug,
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    match &config.log_dir {
        Some(dir) => init_logger(dir, level)?,
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_default_env()
                .init();
        }
    }
    Ok(())
}
