mod check;
mod report;

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Context;
use check::check_path;
use clap::Parser;
use report::{Reporter, Tally};
use savecheck_format::{ChunkCount, SaveVersions};
use tracing::{debug, error, info, info_span, metadata::LevelFilter};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Check that compressed save files decode from start to end.
#[derive(Parser)]
#[clap(version)]
struct Args {
    /// Save files to check. Each one is checked independently, in order.
    files: Vec<PathBuf>,

    /// Display only error messages.
    #[clap(short, long)]
    quiet: bool,

    /// Log progress to stderr. `RUST_LOG` takes precedence.
    #[clap(short, long)]
    verbose: bool,

    /// Count the final end-of-file check as a chunk, as older releases of this tool did.
    #[clap(long)]
    legacy_chunk_count: bool,

    /// Additional save versions, one `<version> <label>` pair per line.
    #[clap(long, value_name = "FILE")]
    versions: Option<PathBuf>,
}

fn fallible_main(args: Args) -> anyhow::Result<()> {
    let mut versions = SaveVersions::builtin();
    if let Some(path) = &args.versions {
        let table = fs::read_to_string(path)
            .with_context(|| format!("cannot read version table {}", path.display()))?;
        let added = versions
            .extend_from_table(&table)
            .with_context(|| format!("invalid version table {}", path.display()))?;
        info!(added, "Loaded version table");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.files.is_empty() {
        writeln!(out, "{}: No save file(s) given", env!("CARGO_BIN_NAME"))?;
        return Ok(());
    }

    let reporter = Reporter {
        quiet: args.quiet,
        chunk_count: if args.legacy_chunk_count {
            ChunkCount::Iterations
        } else {
            ChunkCount::Decoded
        },
    };
    let mut tally = Tally::default();
    for path in &args.files {
        let _span = info_span!("check", path = %path.display()).entered();
        let report = check_path(path, &versions);
        tally.record(&report);
        reporter
            .report(&mut out, path, &report)
            .context("cannot write report")?;
    }
    info!(checked = tally.checked, failed = tally.failed, "Done");

    Ok(())
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let subscriber = tracing_subscriber::registry()
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(io::stderr),
        );
    tracing::subscriber::set_global_default(subscriber)
        .expect("cannot set default tracing subscriber");

    debug!("Save checker version {}", env!("CARGO_PKG_VERSION"));

    match fallible_main(args) {
        Ok(_) => (),
        Err(err) => {
            error!("in fallible_main: {err:?}");
        }
    }
}
