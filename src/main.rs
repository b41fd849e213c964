use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use zone_labeler::batch::{discover_jobs, run_batch, run_job, LabelingJob};
use zone_labeler::enhance::enhance;
use zone_labeler::export::export_directory;
use zone_labeler::interchange::read_document;
use zone_labeler::logging::{TracingObserver, BATCH};
use zone_labeler::{label_document, GroundTruth, LabelingConfig, ZoneLabeler};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Label geometric document zones from ground-truth metadata.",
    arg_required_else_help = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// JSON labeling configuration. Defaults apply to every missing field.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Maximum number of worker threads for batch labeling
    #[arg(long, global = true)]
    pub threads: Option<usize>,

    /// Directory for the log file
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Label every `<stem>.geometry.json` + `<stem>.gt.json` pair in a directory
    Label {
        dir: PathBuf,
    },

    /// Label a single document
    LabelOne {
        #[arg(long)]
        geometry: PathBuf,

        #[arg(long)]
        ground_truth: PathBuf,

        /// Output file path. If omitted, writes to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write LibSVM training files from `*.labeled.json` documents
    Export {
        dir: PathBuf,

        /// Output file name suffix. Defaults to the input directory name.
        #[arg(long)]
        prefix: Option<String>,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Print metadata extracted from a labeled document as JSON
    Enhance {
        file: PathBuf,
    },
}

fn load_config(args: &Args) -> Result<LabelingConfig> {
    let config = match &args.config {
        Some(path) => LabelingConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => LabelingConfig::default(),
    };
    Ok(match args.threads {
        Some(threads) => config.with_max_threads(Some(threads)),
        None => config,
    })
}

fn directory_name(dir: &Path) -> String {
    dir.canonicalize()
        .ok()
        .and_then(|dir| dir.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "corpus".to_string())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging with optional log directory and keep the guard alive
    let _guard = match &args.log_dir {
        Some(log_dir) => zone_labeler::logging::init_logging_with_dir(args.verbose, log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?,
        None => zone_labeler::logging::init_logging(args.verbose),
    };

    let config = load_config(&args)?;

    match &args.command {
        Command::Label { dir } => {
            let jobs = discover_jobs(dir)?;
            let labeler = ZoneLabeler::new(config);
            let summary = run_batch(&jobs, &labeler, &TracingObserver)?;
            for line in summary.lines() {
                println!("{line}");
            }
        }
        Command::LabelOne {
            geometry,
            ground_truth,
            output,
        } => match output {
            Some(output) => {
                let name = geometry
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let job = LabelingJob::new(name, geometry.clone(), ground_truth.clone(), output.clone());
                let report = run_job(&ZoneLabeler::new(config), &job, &TracingObserver)?;
                println!("{}", report.summary_line());
                info!(target: BATCH, output = %output.display(), "Output written");
            }
            None => {
                let mut doc = read_document(geometry)?;
                let gt = GroundTruth::from_path(ground_truth)?;
                label_document(&mut doc, &gt, &config)?;
                println!("{}", serde_json::to_string_pretty(&doc.to_record())?);
            }
        },
        Command::Export {
            dir,
            prefix,
            out_dir,
        } => {
            let prefix = prefix.clone().unwrap_or_else(|| directory_name(dir));
            let documents = export_directory(dir, out_dir, &prefix)?;
            println!("Exported {documents} documents");
        }
        Command::Enhance { file } => {
            let doc = read_document(file)?;
            println!("{}", serde_json::to_string_pretty(&enhance(&doc))?);
        }
    }

    Ok(())
}
