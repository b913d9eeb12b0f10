//! make-man-rules — generate automake alias rules from DocBook man page sources.
//!
//! Every `refname` of every page becomes a `man/{name}.{section}` target. The
//! first name of a page is its real target; the others get a make rule
//! pointing at it. Pages are grouped by their `conditional` attribute:
//!
//! ```text
//! make-man-rules man/*.xml man/*.xml.in > Makefile-man.am
//! ```
//!
//! A source `P` for which `P.in` is also given is generated from that template
//! and is only listed in `CLEANFILES`.

mod collect;
mod error;
mod model;
mod parser;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Suffix of templates that generate another source at build time.
const TEMPLATE_SUFFIX: &str = ".in";

#[derive(Parser)]
#[command(
    name = "make-man-rules",
    about = "Generate automake alias rules from DocBook man page sources"
)]
struct Cli {
    /// Man page sources (refentry XML). Put paths starting with `-` after `--`
    #[arg(required = true)]
    files: Vec<String>,

    /// Write the fragment to this file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Log every parsed page and generated rule to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (sources, spares) = partition_sources(&cli.files);
    tracing::debug!(sources = sources.len(), spares = spares.len(), "inputs");

    let rules = collect::collect(&sources)?;
    let fragment = render::render(&rules, &spares);

    // Nothing is written until the whole fragment has rendered
    match cli.output {
        Some(ref path) => fs::write(path, &fragment)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(fragment.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write stdout")?;
        }
    }

    tracing::debug!(groups = rules.len(), "done");
    Ok(())
}

/// Log to stderr. `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .without_time()
                .with_target(false),
        )
        .init();
}

/// Split inputs into sources to parse and spares generated from a `.in` template.
///
/// Inputs are deduplicated. Spares keep their path exactly as given.
fn partition_sources(files: &[String]) -> (Vec<String>, BTreeSet<String>) {
    let all: BTreeSet<&str> = files.iter().map(String::as_str).collect();
    let mut sources = Vec::new();
    let mut spares = BTreeSet::new();

    for file in &all {
        if all.contains(format!("{}{}", file, TEMPLATE_SUFFIX).as_str()) {
            tracing::debug!(spare = %file, "generated from template");
            spares.insert(file.to_string());
        } else {
            sources.push(file.to_string());
        }
    }

    (sources, spares)
}
