//! graph-query CLI: validate graph documents and answer path/cycle queries.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use graph_query::config::{
    DEFAULT_GRAPH_DIR, DEFAULT_MAX_MEMORY_MB, ENV_GRAPH_DIR, ENV_MAX_MEMORY_MB,
};
use graph_query::{ingest, load_snapshot, DirectoryStore, Dispatcher, Error, Settings};
use graph_query_core::CycleEnumerator;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "graph-query")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory of XML graph documents
    #[arg(long, global = true, env = ENV_GRAPH_DIR, default_value = DEFAULT_GRAPH_DIR)]
    graph_dir: PathBuf,

    /// Memory cap for one loaded graph, in MB
    #[arg(long, global = true, env = ENV_MAX_MEMORY_MB, default_value_t = DEFAULT_MAX_MEMORY_MB)]
    max_memory_mb: u32,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate one XML graph document
    Parse {
        /// Path to the document
        file: PathBuf,
    },

    /// Answer a JSON request read from stdin; the response goes to stdout
    Query,

    /// List every elementary cycle of a stored graph
    Cycles {
        /// Graph identifier
        graph_id: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stdout is reserved for command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = Settings::new(cli.graph_dir, cli.max_memory_mb).and_then(|settings| {
        match cli.command {
            Commands::Parse { file } => run_parse(&file),
            Commands::Query => run_query(&settings),
            Commands::Cycles { graph_id } => run_cycles(&settings, &graph_id),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}

fn run_parse(file: &Path) -> Result<(), Error> {
    let doc = ingest::parse_file(file)?;
    println!("Parsing successful! Graph structure:");
    println!("Graph ID: {}", doc.id);
    println!("Graph Name: {}", doc.name);
    println!("Number of nodes: {}", doc.nodes.len());
    println!("Number of edges: {}", doc.edges.len());
    Ok(())
}

fn run_query(settings: &Settings) -> Result<(), Error> {
    let store = DirectoryStore::open(&settings.graph_dir)?;
    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    Dispatcher::new(&store, settings).run(stdin, stdout)?;
    Ok(())
}

fn run_cycles(settings: &Settings, graph_id: &str) -> Result<(), Error> {
    let store = DirectoryStore::open(&settings.graph_dir)?;
    let graph = load_snapshot(&store, graph_id, settings)?
        .ok_or_else(|| Error::GraphNotFound(graph_id.to_string()))?;

    let cycles = CycleEnumerator::new(&graph).find_cycles();
    if cycles.is_empty() {
        println!("No cycles in graph '{graph_id}'.");
        return Ok(());
    }

    println!("Found {} cycles in graph '{graph_id}':", cycles.len());
    for (i, cycle) in cycles.iter().enumerate() {
        println!("  {:>4}: {}", i + 1, cycle.join(" → "));
    }
    Ok(())
}
