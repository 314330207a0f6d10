// ═══════════════════════════════════════════════════════════════════════
// Database — SQLite storage for episode results and per-agent tallies
// ═══════════════════════════════════════════════════════════════════════

use crate::runner::EpisodeResult;
use cavern_engine::world::{Hazard, Outcome};
use rusqlite::{params, Connection};

pub struct Database {
    conn: Connection,
}

/// Stable text label for an outcome, used as the stored value.
pub fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Escaped { with_treasure: true } => "escaped+treasure",
        Outcome::Escaped { with_treasure: false } => "escaped",
        Outcome::Killed(Hazard::Pit) => "killed:pit",
        Outcome::Killed(Hazard::Monster) => "killed:monster",
    }
}

/// One row of the per-agent summary.
#[derive(Debug, Clone)]
pub struct AgentStats {
    pub name: String,
    pub episodes: u32,
    pub treasure_escapes: u32,
    pub deaths: u32,
    pub mean_score: f64,
}

impl Database {
    /// Open (or create) a database at the given path.
    pub fn new(path: &str) -> Self {
        let conn = Connection::open(path).expect("Failed to open database");
        let db = Database { conn };
        db.create_schema();
        db
    }

    /// In-memory database (useful for tests).
    pub fn in_memory() -> Self {
        let conn = Connection::open_in_memory().expect("Failed to open in-memory database");
        let db = Database { conn };
        db.create_schema();
        db
    }

    fn create_schema(&self) {
        self.conn
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS agents (
                id               INTEGER PRIMARY KEY,
                name             TEXT NOT NULL UNIQUE,
                episodes         INTEGER NOT NULL DEFAULT 0,
                treasure_escapes INTEGER NOT NULL DEFAULT 0,
                deaths           INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS episodes (
                id            INTEGER PRIMARY KEY,
                agent_id      INTEGER NOT NULL REFERENCES agents(id),
                seed          INTEGER NOT NULL,
                outcome       TEXT NOT NULL,
                score         INTEGER NOT NULL,
                moves         INTEGER NOT NULL,
                cells_visited INTEGER NOT NULL,
                played_at     TEXT NOT NULL DEFAULT (datetime('now'))
            );
        ",
            )
            .expect("Failed to create schema");
    }

    /// Register an agent (or return the existing ID).
    pub fn register_agent(&self, name: &str) -> i64 {
        self.conn
            .execute("INSERT OR IGNORE INTO agents (name) VALUES (?1)", params![name])
            .expect("Failed to register agent");
        self.conn
            .query_row("SELECT id FROM agents WHERE name = ?1", params![name], |row| {
                row.get(0)
            })
            .expect("Failed to get agent id")
    }

    /// Store a completed episode and update the agent's tallies.
    pub fn store_episode(&self, agent_id: i64, result: &EpisodeResult) -> i64 {
        self.conn
            .execute(
                "INSERT INTO episodes (agent_id, seed, outcome, score, moves, cells_visited)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    agent_id,
                    result.seed as i64,
                    outcome_label(result.outcome),
                    result.score as i64,
                    result.moves as i64,
                    result.cells_visited as i64,
                ],
            )
            .expect("Failed to store episode");
        let episode_id = self.conn.last_insert_rowid();

        let treasure = matches!(result.outcome, Outcome::Escaped { with_treasure: true });
        let died = matches!(result.outcome, Outcome::Killed(_));
        self.conn
            .execute(
                "UPDATE agents
                 SET episodes = episodes + 1,
                     treasure_escapes = treasure_escapes + ?1,
                     deaths = deaths + ?2
                 WHERE id = ?3",
                params![treasure as i64, died as i64, agent_id],
            )
            .expect("Failed to update agent tallies");

        episode_id
    }

    /// Per-agent aggregates, best treasure rate first.
    pub fn summary(&self) -> Vec<AgentStats> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT a.name, a.episodes, a.treasure_escapes, a.deaths,
                        COALESCE(AVG(e.score), 0.0)
                 FROM agents a
                 LEFT JOIN episodes e ON e.agent_id = a.id
                 GROUP BY a.id
                 ORDER BY a.treasure_escapes DESC, a.name ASC",
            )
            .expect("Failed to prepare summary query");

        stmt.query_map([], |row| {
            Ok(AgentStats {
                name: row.get::<_, String>(0)?,
                episodes: row.get::<_, u32>(1)?,
                treasure_escapes: row.get::<_, u32>(2)?,
                deaths: row.get::<_, u32>(3)?,
                mean_score: row.get::<_, f64>(4)?,
            })
        })
        .expect("Failed to query summary")
        .filter_map(|r| r.ok())
        .collect()
    }

    /// Total number of episodes stored.
    pub fn episode_count(&self) -> u32 {
        self.conn
            .query_row("SELECT COUNT(*) FROM episodes", [], |row| row.get(0))
            .unwrap_or(0)
    }
}
