use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use codeview_core::prelude::*;
use codeview_utils::{info, init_logging, LogLevel, LoggingConfig};

/// Decode CodeView type-record streams and print them as text.
#[derive(Parser, Debug)]
#[command(name = "codeview")]
#[command(version)]
#[command(about = "Decode CodeView type-record streams and print them as text", long_about = None)]
struct Cli
{
    #[command(subcommand)]
    command: Commands,

    /// Log level (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Write logs to a dated file in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Print every record of a type-record stream
    Dump(StreamArgs),
    /// Print every reference edge reported while decoding a stream
    Edges(StreamArgs),
}

#[derive(Args, Debug)]
struct StreamArgs
{
    /// Raw type-record stream (records only, no stream header)
    file: PathBuf,

    /// Index of the first record (hex with 0x prefix, or decimal)
    #[arg(long, default_value = "0x1000", value_parser = parse_index)]
    first_index: RecordIndex,

    /// Character set for names: latin1, ascii or utf8
    #[arg(long, default_value = "latin1")]
    charset: OneByteCharset,

    /// Record alignment in bytes
    #[arg(long, default_value_t = codeview_core::config::DEFAULT_ALIGNMENT)]
    alignment: usize,

    /// Stop at the first record that fails to decode or render
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Reject vftables whose name block is empty
    #[arg(long, default_value_t = false)]
    require_table_name: bool,

    /// Print placeholders for unresolved references instead of failing
    #[arg(long, default_value_t = false)]
    placeholders: bool,
}

impl StreamArgs
{
    fn options(&self) -> ReaderOptions
    {
        let name_policy = if self.require_table_name {
            NamePolicy::RequireTableName
        } else {
            NamePolicy::AllowUnnamed
        };
        ReaderOptions::default()
            .with_first_index(self.first_index)
            .with_charset(self.charset)
            .with_alignment(self.alignment)
            .with_name_policy(name_policy)
            .with_strict(self.strict)
            .with_placeholders(self.placeholders)
    }

    fn decode(&self) -> CodeViewResult<(DecodedStream, DependencyTracker)>
    {
        info!("Decoding type stream {}", self.file.display());
        let bytes = fs::read(&self.file)?;
        let mut tracker = DependencyTracker::new();
        let decoded = RecordDispatcher::new().decode_stream(&bytes, &self.options(), &mut tracker)?;
        Ok((decoded, tracker))
    }
}

fn parse_index(value: &str) -> Result<RecordIndex, String>
{
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse::<u32>(),
    };
    parsed
        .map(RecordIndex::new)
        .map_err(|err| format!("invalid record index '{value}': {err}"))
}

fn main()
{
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if let Some(level) = cli.log_level {
        logging = logging.with_level(level);
    }
    if let Some(dir) = &cli.log_dir {
        logging = logging.with_log_dir(dir);
    }
    let _guard = match init_logging(&logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_command(cli: Cli) -> CodeViewResult<()>
{
    match cli.command {
        Commands::Dump(args) => dump(&args),
        Commands::Edges(args) => edges(&args),
    }
}

fn dump(args: &StreamArgs) -> CodeViewResult<()>
{
    let (decoded, _) = args.decode()?;
    let catalog = &decoded.catalog;

    for (index, _) in catalog.iter() {
        match catalog.render(index) {
            Ok(text) => println!("{index}: {text}"),
            Err(e) if args.strict => return Err(e),
            Err(e) => println!("{index}: <error: {e}>"),
        }
    }

    for failure in &decoded.report.failures {
        eprintln!("skipped {failure}");
    }
    eprintln!(
        "{} records ({} decoded, {} unknown, {} failed)",
        catalog.len() + decoded.report.failures.len(),
        decoded.report.decoded,
        decoded.report.unknown,
        decoded.report.failures.len()
    );
    Ok(())
}

fn edges(args: &StreamArgs) -> CodeViewResult<()>
{
    let (_, tracker) = args.decode()?;

    for edge in tracker.edges() {
        println!("{}", edge_line(edge));
    }

    eprintln!(
        "{} edges, {} forward, {} self",
        tracker.edges().len(),
        tracker.forward_references().count(),
        tracker.self_references().count()
    );
    Ok(())
}

fn edge_line(edge: &ReferenceEdge) -> String
{
    let note = if edge.is_sentinel() {
        " (none)"
    } else if edge.is_self_reference() {
        " (self)"
    } else if edge.is_forward() {
        " (forward)"
    } else {
        ""
    };
    format!("{} -> {}{note}", edge.from, edge.to)
}
