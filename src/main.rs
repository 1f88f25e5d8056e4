use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{Level, error, warn};

use fastq_inventory::logging;
use fastq_inventory::options::DEFAULT_BLOCK_SIZE;
use fastq_inventory::{
    CancelToken, JsonWriter, LogDiagnostics, RecordWriter, ScanError, ScanOptions, Scanner,
    TsvWriter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Tsv,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "fastq-inventory",
    version,
    about = "List FASTQ files with format, sizes, MD5 and first header line"
)]
struct Cli {
    /// Directories (or files) to scan.
    #[arg(required = true)]
    roots: Vec<PathBuf>,

    /// Descend into subdirectories.
    #[arg(short, long)]
    recursive: bool,

    /// Follow symbolic links.
    #[arg(short = 'L', long)]
    follow_links: bool,

    /// File name suffix to include (repeatable).
    #[arg(short, long = "extension", value_name = "EXT", default_values_t = [".fastq".to_string(), ".fastq.gz".to_string()])]
    extensions: Vec<String>,

    /// Compute decompressed size and MD5.
    #[arg(short = 'c', long)]
    checksum: bool,

    /// Digest block size in bytes.
    #[arg(short, long, value_name = "BYTES", default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tsv)]
    output: OutputFormat,

    /// Print a row of column names (tsv only).
    #[arg(long)]
    column_names: bool,

    /// More diagnostics on stderr (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Errors only.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

const EXIT_FAILURE: u8 = 2;
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let base = logging::level_from_env().unwrap_or(Level::Warn);
    logging::init(logging::level_for(base, cli.verbose, cli.quiet)).ok();

    let opts = ScanOptions {
        extensions: cli.extensions,
        compute_checksum: cli.checksum,
        block_size: cli.block_size,
        recursive: cli.recursive,
        follow_links: cli.follow_links,
    };
    if let Err(e) = opts.validate() {
        error!("invalid options: {e}");
        return ExitCode::from(EXIT_FAILURE);
    }

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        warn!("cannot install interrupt handler: {e}");
    }

    let stdout = BufWriter::new(io::stdout().lock());
    let mut writer: Box<dyn RecordWriter> = match cli.output {
        OutputFormat::Tsv => Box::new(TsvWriter::new(stdout).with_column_names(cli.column_names)),
        OutputFormat::Json => Box::new(JsonWriter::new(stdout)),
    };

    let diag = LogDiagnostics;
    let records = Scanner::new(&opts, &diag, &cancel).scan(cli.roots);
    for item in records {
        let result = match item {
            Ok(record) => writer.write_record(&record),
            Err(ScanError::Cancelled(_)) => {
                warn!("interrupted; output is incomplete");
                return ExitCode::from(EXIT_INTERRUPTED);
            }
        };
        if let Err(e) = result {
            error!("{e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    }

    match writer.finish() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
