use std::io::{self, BufWriter, Read, Write};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use doormap::config::Config;
use doormap::ingest::parse_input;
use doormap::matrix::{AdjacencyTable, Renderer};
use doormap::Result;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = Config::load();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("doormap: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<()> {
    let text = match &config.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let set = parse_input(&text, config.format)?;
    let labels = set.labels.as_deref();
    let table = AdjacencyTable::build(&set.connections, config.room_count(labels))?;
    tracing::info!(
        rooms = table.room_count(),
        connections = set.connections.len(),
        unresolved = table.unresolved().len(),
        "Converted connection records"
    );

    let mut renderer = Renderer::new(config.render);
    if let Some(labels) = labels {
        renderer = renderer.with_labels(labels);
    }
    tracing::debug!(mode = ?renderer.mode(), labeled = labels.is_some(), "Rendering table");

    let mut out = BufWriter::new(io::stdout().lock());
    for line in renderer.render(&table) {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}
