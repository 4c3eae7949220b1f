mod config;
mod output;
mod parse;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use teamsplit_core::{
    evaluate, swap_slots, LadderTiers, Mode, Participant, Session, Slot, TeamBuilder, TeamResult,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "teamsplit", version, about = "Split a roster into two balanced teams")]
struct Cli {
    /// Log search progress to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Build balanced teams from a roster
    Split(SplitArgs),
    /// Swap the occupants of two slots in a saved result
    Swap(SwapArgs),
    /// Create a default config file at ~/.config/teamsplit/config.toml
    Init,
}

#[derive(Parser)]
struct SplitArgs {
    /// Roster file: JSON array or one "name; rating-or-rank; roles; flags" per line.
    /// Read from stdin when omitted.
    #[arg(long)]
    roster: Option<PathBuf>,

    /// "roles" (10 players, one per role per side) or "free" (any even roster)
    #[arg(long)]
    mode: Option<Mode>,

    /// A result saved earlier for this roster. The new split avoids its grouping.
    #[arg(long)]
    previous: Option<PathBuf>,

    /// Reroll this many times after the first split, each avoiding the one before
    #[arg(long, default_value_t = 0)]
    rerolls: usize,

    /// Write the final result as JSON (input for --previous and `swap`)
    #[arg(long)]
    save_result: Option<PathBuf>,

    /// Seed for a reproducible split
    #[arg(long)]
    seed: Option<u64>,

    /// Output JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Path to config file (default: ~/.config/teamsplit/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct SwapArgs {
    /// Result file written by `split --save-result`
    #[arg(long)]
    result: PathBuf,

    /// First slot, e.g. blue:top or red:2
    first: Slot,

    /// Second slot, e.g. red:jungle
    second: Slot,

    /// Write the updated result here
    #[arg(long)]
    save_result: Option<PathBuf>,

    /// Output JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Path to config file (default: ~/.config/teamsplit/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Split(args) => run_split(args),
        Commands::Swap(args) => run_swap(args),
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your default mode and search settings.");
        }
    }
}

/// RUST_LOG wins; otherwise warnings only, or debug for this crate with --verbose.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "teamsplit=debug,teamsplit_core=debug,warn"
        } else {
            "warn"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run_split(args: SplitArgs) {
    // Load config file, merge with CLI args (CLI wins)
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let mode = match (args.mode, cfg.mode.as_deref()) {
        (Some(mode), _) => mode,
        (None, Some(name)) => name
            .parse()
            .unwrap_or_else(|e| bail(format!("{e} (in {})", config_path.display()))),
        (None, None) => Mode::default(),
    };

    let search = cfg
        .search_config()
        .unwrap_or_else(|e| bail(format!("{e} (in {})", config_path.display())));
    let roster = load_roster(args.roster.as_deref());
    let builder = TeamBuilder::new(search);
    let weights = builder.config().weights;

    let mut session = Session::new(builder, mode);
    for participant in roster {
        session.add_participant(participant).unwrap_or_else(|e| bail(e));
    }
    info!(participants = session.roster().len(), %mode, "roster loaded");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let first = match &args.previous {
        Some(path) => {
            session.restore_result(load_result(path)).unwrap_or_else(|e| {
                bail(format!("{} does not match this roster: {e}", path.display()))
            });
            session.reroll_with_rng(&mut rng)
        }
        None => session.build_with_rng(&mut rng),
    };
    if let Err(e) = first {
        bail(e);
    }

    for round in 0..args.rerolls {
        debug!(round = round + 1, "rerolling");
        if let Err(e) = session.reroll_with_rng(&mut rng) {
            bail(e);
        }
    }

    let Some(result) = session.result() else {
        bail("no teams were built");
    };

    if let Some(path) = &args.save_result {
        save_result(path, result);
    }

    let balance = evaluate(&result.blue.members, &result.red.members, &weights);
    if args.json {
        output::print_json(result, &balance);
    } else {
        output::print_table(result, &balance);
    }
}

fn run_swap(args: SwapArgs) {
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let weights = config::load_config(&config_path)
        .search_config()
        .unwrap_or_else(|e| bail(format!("{e} (in {})", config_path.display())))
        .weights;

    let mut result = load_result(&args.result);
    swap_slots(&mut result, args.first, args.second, &LadderTiers).unwrap_or_else(|e| bail(e));
    info!(first = %args.first, second = %args.second, "slots swapped");

    if let Some(path) = &args.save_result {
        save_result(path, &result);
    }

    let balance = evaluate(&result.blue.members, &result.red.members, &weights);
    if args.json {
        output::print_json(&result, &balance);
    } else {
        output::print_table(&result, &balance);
    }
}

/// Load the roster from --roster, or stdin when it is piped.
fn load_roster(path: Option<&Path>) -> Vec<Participant> {
    let content = match path {
        Some(path) => std::fs::read_to_string(path)
            .unwrap_or_else(|e| bail(format!("Failed to read roster file {}: {e}", path.display()))),
        None => {
            let mut stdin = io::stdin();
            if stdin.is_terminal() {
                bail("No roster provided. Use --roster <file> or pipe the roster via stdin.");
            }
            let mut content = String::new();
            stdin
                .read_to_string(&mut content)
                .unwrap_or_else(|e| bail(format!("Failed to read roster from stdin: {e}")));
            content
        }
    };

    let roster = parse::parse_roster(&content).unwrap_or_else(|e| bail(format!("Invalid roster: {e}")));
    if roster.is_empty() {
        bail("Roster is empty");
    }
    roster
}

fn load_result(path: &Path) -> TeamResult {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| bail(format!("Failed to read result file {}: {e}", path.display())));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| bail(format!("Failed to parse result file {}: {e}", path.display())))
}

fn save_result(path: &Path, result: &TeamResult) {
    let json = serde_json::to_string_pretty(result)
        .unwrap_or_else(|e| bail(format!("Failed to serialize result: {e}")));
    std::fs::write(path, json)
        .unwrap_or_else(|e| bail(format!("Failed to write result to {}: {e}", path.display())));
    info!(path = %path.display(), "result saved");
}
