use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use avldb::command::parse_line;
use avldb::{IndexedStore, Record, StoreConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "avldb", about = "In-memory record store indexed by an AVL tree")]
struct Cli {
    /// Default log filter when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Check tree invariants after every mutation (default in debug builds).
    #[arg(long, global = true, overrides_with = "no_verify")]
    verify: bool,

    /// Skip the per-mutation invariant check.
    #[arg(long, global = true, overrides_with = "verify")]
    no_verify: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a command script (one command per line).
    Run {
        /// Script file; reads stdin when omitted.
        script: Option<PathBuf>,
        /// Keep going after a malformed line instead of aborting.
        #[arg(long)]
        keep_going: bool,
    },
    /// Replay the reference scenarios and print the results.
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = store_config(&cli);
    let mut store = IndexedStore::with_config(config).context("failed to create store")?;

    match cli.command {
        Commands::Run { script, keep_going } => run_script(&mut store, script, keep_going)?,
        Commands::Demo => run_demo(&mut store)?,
    }

    Ok(())
}

fn store_config(cli: &Cli) -> StoreConfig {
    let config = StoreConfig::default();
    if cli.verify {
        config.with_verify_invariants(true)
    } else if cli.no_verify {
        config.with_verify_invariants(false)
    } else {
        config
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_script(store: &mut IndexedStore, script: Option<PathBuf>, keep_going: bool) -> Result<()> {
    let reader: Box<dyn BufRead> = match &script {
        Some(path) => Box::new(BufReader::new(File::open(path).with_context(|| {
            format!("failed to open script {}", path.display())
        })?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", line_no + 1))?;
        match parse_line(&line) {
            Ok(Some(command)) => println!("{}", command.execute(store)),
            Ok(None) => {}
            Err(err) if keep_going => {
                tracing::warn!(line = line_no + 1, %err, "skipping malformed command");
            }
            Err(err) => {
                return Err(err).with_context(|| format!("line {}: '{}'", line_no + 1, line.trim()));
            }
        }
    }

    store.verify().context("index left in an inconsistent state")?;
    Ok(())
}

fn run_demo(store: &mut IndexedStore) -> Result<()> {
    println!("== ascending inserts 10, 20, 30");
    store.extend([10, 20, 30].map(|v| Record::new(format!("k{v}"), v)));
    let root = store.tree().root().map(|node| node.record().to_string());
    println!("root={}", root.as_deref().unwrap_or("-"));
    println!("height={}", store.tree_height());
    println!("comparisons(k30)={}", store.search_comparisons("k30", 30));
    store.clear();

    println!("== range 4..=8 over 5, 3, 8, 1, 4, 7, 9");
    store.extend([5, 3, 8, 1, 4, 7, 9].map(|v| Record::new(format!("k{v}"), v)));
    let in_range: Vec<String> = store.range_query(4, 8).iter().map(|r| r.to_string()).collect();
    println!("{}", in_range.join(", "));

    println!("== delete root k5");
    store.delete("k5", 5);
    let root = store.tree().root().map(|node| node.record().to_string());
    println!("root={}", root.as_deref().unwrap_or("-"));
    println!("height={} count={}", store.tree_height(), store.len());

    store.verify().context("demo left the index unbalanced")?;
    Ok(())
}
