//! Runtime configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// How a batch's groups map onto storage transactions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Atomicity {
    /// One transaction per operation-kind group. A failure leaves earlier
    /// groups committed.
    #[default]
    PerGroup,
    /// One transaction for the whole batch.
    Batch,
}

impl FromStr for Atomicity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "group" | "per-group" | "per_group" => Ok(Self::PerGroup),
            "batch" => Ok(Self::Batch),
            other => Err(format!("unknown atomicity `{}`", other)),
        }
    }
}

/// Settings shared by editing sessions and the CLI.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// SQLite connection string; `None` keeps edits in an in-memory store.
    pub database_url: Option<String>,
    pub atomicity: Atomicity,
    /// Directory holding `shard_{n}.json` creature files.
    pub shard_dir: Option<PathBuf>,
    /// Draws allowed when generating a collision-free team member id.
    pub team_id_attempts: usize,
    pub log_dir: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            atomicity: Atomicity::default(),
            shard_dir: None,
            team_id_attempts: Self::DEFAULT_TEAM_ID_ATTEMPTS,
            log_dir: None,
        }
    }
}

impl RuntimeConfig {
    pub const DEFAULT_TEAM_ID_ATTEMPTS: usize = 8;

    /// Construct configuration from process environment variables.
    ///
    /// - `MOVESET_DATABASE_URL` - SQLite connection string (default: in-memory store)
    /// - `MOVESET_ATOMICITY` - `group` or `batch` (default: `group`)
    /// - `MOVESET_SHARD_DIR` - Directory for creature shard files
    /// - `MOVESET_TEAM_ID_ATTEMPTS` - Team member id draws (default: 8, minimum 1)
    /// - `MOVESET_LOG_DIR` - Directory for the CLI log file
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        config.database_url = lookup("MOVESET_DATABASE_URL").filter(|url| !url.is_empty());

        if let Some(atomicity) = read_env::<Atomicity>(&lookup, "MOVESET_ATOMICITY") {
            config.atomicity = atomicity;
        }

        config.shard_dir = lookup("MOVESET_SHARD_DIR").map(PathBuf::from);

        if let Some(attempts) = read_env::<usize>(&lookup, "MOVESET_TEAM_ID_ATTEMPTS") {
            config.team_id_attempts = attempts.max(1);
        }

        config.log_dir = lookup("MOVESET_LOG_DIR").map(PathBuf::from);

        config
    }

    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn with_atomicity(mut self, atomicity: Atomicity) -> Self {
        self.atomicity = atomicity;
        self
    }

    pub fn with_shard_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.shard_dir = Some(dir.into());
        self
    }

    pub fn with_team_id_attempts(mut self, attempts: usize) -> Self {
        self.team_id_attempts = attempts.max(1);
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }
}

fn read_env<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
{
    lookup(key)?.parse().ok()
}
