// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for self-play games and stored sessions
// ═══════════════════════════════════════════════════════════════════════

use clap::{Parser, Subcommand};
use palisade_agents::AgentKind;
use palisade_engine::setup::{create_initial_state, GameConfig};
use palisade_engine::visibility::view_for;
use palisade_engine::PlayerId;
use palisade_sessions::{make_agents, play_out, run_batch, run_game, GameResult, SessionError, SessionStore};
use std::collections::HashMap;
use tracing::error;

/// Safety limit on agent decisions per game.
const MAX_DECISIONS: usize = 10_000;

#[derive(Parser)]
#[command(name = "palisade", about = "Palisade territory game: self-play and session tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game between agents
    Play {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=4))]
        players: u8,
        /// Agent type: "random" or "greedy"
        #[arg(short, long, default_value = "random")]
        agent: AgentKind,
        /// Store the game as a session (and its result) in this database
        #[arg(long)]
        db: Option<String>,
        /// Session id to store under; defaults to game-<seed>
        #[arg(long, requires = "db")]
        session: Option<String>,
    },
    /// Play N games in parallel and record the results
    Batch {
        #[arg(short, long, default_value_t = 100)]
        games: u32,
        #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=4))]
        players: u8,
        #[arg(short, long, default_value = "random")]
        agent: AgentKind,
        #[arg(short, long, default_value = "results.db")]
        db: String,
    },
    /// Print a stored session as JSON, as seen by one player (or everything)
    Show {
        #[arg(short, long, default_value = "results.db")]
        db: String,
        #[arg(short, long)]
        session: String,
        /// Player id to view as; omit for the full spectator view
        #[arg(short, long)]
        viewer: Option<String>,
    },
    /// Show win counts from the database
    Results {
        #[arg(short, long, default_value = "results.db")]
        db: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "palisade=info".to_string()))
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Play { seed, players, agent, db, session } => {
            cmd_play(seed, players.into(), agent, db.as_deref(), session)
        }
        Commands::Batch { games, players, agent, db } => cmd_batch(games, players.into(), agent, &db),
        Commands::Show { db, session, viewer } => cmd_show(&db, &session, viewer.map(PlayerId::new)),
        Commands::Results { db } => cmd_results(&db),
    };

    if let Err(e) = outcome {
        error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn cmd_play(
    seed: u64,
    players: usize,
    agent: AgentKind,
    db: Option<&str>,
    session: Option<String>,
) -> Result<(), SessionError> {
    println!("=== Palisade ===\n");
    println!("Running single game: seed={seed}, players={players}, agent={agent}\n");

    let config = GameConfig::shuffled(seed);
    let mut agents = make_agents(agent, players, seed);

    let result = match db {
        None => run_game(&mut agents, &config, MAX_DECISIONS)?,
        Some(path) => {
            let mut store = SessionStore::open(path)?;
            let id = session.unwrap_or_else(|| format!("game-{seed}"));
            store.save(&id, &create_initial_state(&config)?)?;
            let (state, decisions) = play_out(&mut store.session(id.as_str()), &mut agents, MAX_DECISIONS)?;
            let result = GameResult::from_state(&state, Some(seed), decisions);
            store.record_result(&id, &result)?;
            println!("Stored as session '{id}' in {path}\n");
            result
        }
    };

    print_result(&result);
    Ok(())
}

fn print_result(result: &GameResult) {
    println!("Game finished!");
    println!("  Winner: {}", result.winner_name.as_deref().unwrap_or("nobody"));
    println!("  Decisions: {}", result.decisions);
    println!();
    println!("  Final standings:");
    for s in &result.scores {
        println!("    {:12} ({}) -- {} points", s.name, s.player, s.score);
    }
}

fn cmd_batch(games: u32, players: usize, agent: AgentKind, db_path: &str) -> Result<(), SessionError> {
    println!("=== Batch: {games} games, {players} players, agent={agent} ===\n");

    let store = SessionStore::open(db_path)?;
    let seeds: Vec<u64> = (0..u64::from(games)).map(|g| 42 + g * 1000).collect();

    let mut wins: HashMap<String, u32> = HashMap::new();
    let mut errors = 0u32;
    for (seed, result) in run_batch(&seeds, agent, players, MAX_DECISIONS) {
        match result {
            Ok(result) => {
                let winner = result.winner_name.clone().unwrap_or_else(|| "nobody".to_string());
                *wins.entry(winner).or_insert(0) += 1;
                store.record_result(&format!("batch-{seed}"), &result)?;
            }
            Err(e) => {
                errors += 1;
                eprintln!("Seed {seed}: ERROR -- {e}");
            }
        }
    }

    println!("--- Summary ({games} games, {errors} errors) ---");
    let mut table: Vec<(String, u32)> = wins.into_iter().collect();
    table.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (name, w) in &table {
        let pct = if games > 0 { f64::from(*w) / f64::from(games) * 100.0 } else { 0.0 };
        println!("  {name:12}: {w:>4} wins ({pct:.1}%)");
    }
    println!("\nResults saved to: {db_path}");
    println!("Total results in DB: {}", store.result_count()?);
    Ok(())
}

fn cmd_show(db_path: &str, session: &str, viewer: Option<PlayerId>) -> Result<(), SessionError> {
    let store = SessionStore::open(db_path)?;
    let state = store.load(session)?;
    let view = view_for(&state, viewer.as_ref());
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

fn cmd_results(db_path: &str) -> Result<(), SessionError> {
    let store = SessionStore::open(db_path)?;
    let counts = store.win_counts()?;
    if counts.is_empty() {
        println!("No results found. Play some games first.");
        return Ok(());
    }
    println!("=== Wins ===\n");
    println!("{:<20} {:>8}", "Player", "Wins");
    println!("{}", "-".repeat(29));
    for (name, w) in &counts {
        println!("{name:<20} {w:>8}");
    }
    Ok(())
}
