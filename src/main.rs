use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use tabcursor::input::{self, SourceMode};
use tabcursor::scan::{self, ScanOptions, ScanReport};
use tabcursor::Host;

/// Inspect and scan columnar files through row cursors
#[derive(Parser, Debug)]
#[command(name = "tabcursor", version, about)]
struct Cli {
    /// Show info-level logs (honours RUST_LOG if set)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all logs
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the schema and row count of an input
    Schema(SchemaArgs),

    /// Read rows through a cursor set and print them
    Scan(ScanArgs),
}

#[derive(Parser, Debug)]
struct SchemaArgs {
    /// Input path (.parquet)
    #[arg(required = true)]
    input: PathBuf,
}

#[derive(Parser, Debug)]
struct ScanArgs {
    /// Input path (.parquet)
    #[arg(required = true)]
    input: PathBuf,

    /// Column to read (repeatable; default: all columns)
    #[arg(short, long = "column")]
    columns: Vec<String>,

    /// Number of cursors to request
    #[arg(short, long, default_value_t = 1)]
    partitions: usize,

    /// Shuffle rows with this seed
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum rows to print per cursor
    #[arg(long)]
    limit: Option<usize>,

    /// Read only the schema and scan an empty source
    #[arg(long)]
    schema_only: bool,
}

impl From<&ScanArgs> for ScanOptions {
    fn from(args: &ScanArgs) -> Self {
        Self {
            columns: (!args.columns.is_empty()).then(|| args.columns.clone()),
            partitions: args.partitions,
            seed: args.seed,
            limit: args.limit,
        }
    }
}

fn init_tracing(cli: &Cli) {
    // --quiet → off, --verbose → RUST_LOG or info, default → warnings only.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    let host = Host::new("tabcursor");
    match cli.command {
        Commands::Schema(args) => run_schema(&host, args),
        Commands::Scan(args) => run_scan(&host, args),
    }
}

fn run_schema(host: &Host, args: SchemaArgs) -> ExitCode {
    let source = match input::open_source(host, &args.input, SourceMode::Full) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for (i, field) in source.schema().fields().iter().enumerate() {
        let nullable = if field.is_nullable() { "nullable" } else { "required" };
        println!("{}\t{}\t{}\t{}", i, field.name(), field.data_type(), nullable);
    }
    match source.row_count() {
        Some(n) => println!("rows: {}", n),
        None => println!("rows: unknown"),
    }
    ExitCode::SUCCESS
}

fn run_scan(host: &Host, args: ScanArgs) -> ExitCode {
    let mode = if args.schema_only {
        SourceMode::SchemaOnly
    } else {
        SourceMode::Full
    };

    let source = match input::open_source(host, &args.input, mode) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match scan::scan(host, &*source, &ScanOptions::from(&args)) {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_report(report: &ScanReport) {
    println!("#cursor\trow_id\t{}", report.columns.join("\t"));
    for part in &report.partitions {
        for (id, row) in part.row_ids.iter().zip(&part.rows) {
            let values: Vec<String> = row.iter().map(ToString::to_string).collect();
            println!("{}\t{}\t{}", part.batch, id, values.join("\t"));
        }
    }
    eprintln!(
        "{} row(s) from {} cursor(s)",
        report.total_rows(),
        report.partitions.len()
    );
}
