// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for running episodes and batches
// ═══════════════════════════════════════════════════════════════════════

use cavern_agents::{Agent, HunterAgent, RandomAgent};
use cavern_engine::{Cell, GridConfig};
use cavern_harness::database::outcome_label;
use cavern_harness::{run_batch, run_episode_observed, summarize, Database};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cavern-runner", about = "Cavern Strategy Lab")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single episode
    Play {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Grid side length
        #[arg(long, default_value_t = 4)]
        size: u8,
        /// Agent type: "hunter" or "random"
        #[arg(short, long, default_value = "hunter")]
        agent: String,
        /// Print every turn
        #[arg(short, long)]
        trace: bool,
        /// Dump the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a batch of episodes in parallel
    Batch {
        #[arg(short, long, default_value_t = 100)]
        episodes: u32,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 4)]
        size: u8,
        #[arg(short, long, default_value = "results.db")]
        db: String,
        /// Agent type: "hunter" or "random"
        #[arg(short, long, default_value = "hunter")]
        agent: String,
    },
    /// Show per-agent aggregates from the database
    Stats {
        #[arg(short, long, default_value = "results.db")]
        db: String,
    },
}

/// Safety limit: generous for any sane episode on small grids.
const MAX_MOVES: u32 = 2000;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play { seed, size, agent, trace, json } => {
            cmd_play(seed, size, &agent, trace, json)
        }
        Commands::Batch { episodes, seed, size, db, agent } => {
            cmd_batch(episodes, seed, size, &db, &agent)
        }
        Commands::Stats { db } => cmd_stats(&db),
    }
}

fn grid_config(size: u8) -> GridConfig {
    GridConfig {
        size,
        start: Cell::new(1, 1),
        ..GridConfig::default()
    }
}

fn make_agent(kind: &str, config: &GridConfig, seed: u64) -> Box<dyn Agent> {
    match kind {
        "random" => Box::new(RandomAgent::new(seed)),
        _ => Box::new(HunterAgent::new(config, seed)),
    }
}

fn cmd_play(seed: u64, size: u8, agent_type: &str, trace: bool, json: bool) {
    println!("=== Cavern Strategy Lab ===\n");
    println!(
        "Running single episode: seed={}, size={}x{}, agent={}\n",
        seed, size, size, agent_type
    );

    let config = grid_config(size);
    let mut agent = make_agent(agent_type, &config, seed);
    let outcome = run_episode_observed(agent.as_mut(), &config, seed, MAX_MOVES, |turn, view, action| {
        if trace {
            println!(
                "  turn {:>3}: at {} facing {:?} percept {:?} -> {}",
                turn + 1,
                view.player_loc,
                view.facing,
                view.percept,
                action
            );
        }
    });

    match outcome {
        Ok(result) => {
            println!("Episode finished!");
            println!("  Outcome: {}", outcome_label(result.outcome));
            println!("  Score:   {}", result.score);
            println!("  Moves:   {}", result.moves);
            println!("  Visited: {} cells", result.cells_visited);
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&result).expect("result serializes")
                );
            }
        }
        Err(e) => eprintln!("Episode error: {}", e),
    }
}

fn cmd_batch(episodes: u32, first_seed: u64, size: u8, db_path: &str, agent_type: &str) {
    println!(
        "=== Batch: {} episodes, {}x{} grid, agent={} ===\n",
        episodes, size, size, agent_type
    );

    let config = grid_config(size);
    let results = run_batch(
        |seed| make_agent(agent_type, &config, seed),
        &config,
        first_seed,
        episodes,
        MAX_MOVES,
    );

    let db = Database::new(db_path);
    let agent_name = make_agent(agent_type, &config, 0).name().to_string();
    let agent_id = db.register_agent(&agent_name);
    for result in results.iter().flatten() {
        db.store_episode(agent_id, result);
    }

    let summary = summarize(&results);
    println!("--- Summary ({} episodes) ---", summary.episodes);
    println!("  escaped with treasure: {:>5}", summary.treasure_escapes);
    println!("  escaped empty-handed:  {:>5}", summary.empty_escapes);
    println!("  killed by pit:         {:>5}", summary.pit_deaths);
    println!("  killed by monster:     {:>5}", summary.monster_deaths);
    println!("  stalled (move limit):  {:>5}", summary.stalled);
    println!("  mean score: {:.1}", summary.mean_score);
    println!("  mean moves: {:.1}", summary.mean_moves);
    println!("\nResults saved to: {}", db_path);
    println!("Total episodes in DB: {}", db.episode_count());
}

fn cmd_stats(db_path: &str) {
    let db = Database::new(db_path);
    let summary = db.summary();
    if summary.is_empty() {
        println!("No agents found. Run some batches first.");
        return;
    }
    println!("=== Agent stats ===\n");
    println!(
        "{:<12} {:>9} {:>10} {:>8} {:>11}",
        "Agent", "Episodes", "Treasure", "Deaths", "Mean score"
    );
    println!("{}", "-".repeat(54));
    for stats in &summary {
        println!(
            "{:<12} {:>9} {:>10} {:>8} {:>11.1}",
            stats.name, stats.episodes, stats.treasure_escapes, stats.deaths, stats.mean_score
        );
    }
}
