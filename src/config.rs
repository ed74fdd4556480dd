//! Configuration file handling for the expense tracker.
//!
//! The configuration file is stored at `$EXPENSES_HOME/config.json`. Next to it live the SQLite
//! database and, while a user is logged in, the session file.

use crate::db::Db;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "expenses";
const CONFIG_VERSION: u8 = 1;
const RECENT_LIMIT: u32 = 5;
const CONFIG_JSON: &str = "config.json";
const EXPENSES_SQLITE: &str = "expenses.sqlite";
const SESSION_JSON: &str = "session.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$EXPENSES_HOME` and from there it loads `$EXPENSES_HOME/config.json`. It provides
/// paths to the other files that are expected in the data directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    db: Db,
    sqlite_path: PathBuf,
    session_path: PathBuf,
}

impl Config {
    /// Creates the data directory and:
    /// - Creates an initial `config.json` file with default settings
    /// - Creates the SQLite database with an empty schema
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/expenses`
    ///
    /// # Errors
    /// - Returns an error if any file operations fail, or if the directory already holds a
    ///   `config.json` or a database. Existing files are left untouched.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the expenses home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        let sqlite_path = root.join(EXPENSES_SQLITE);
        for existing in [&config_path, &sqlite_path] {
            if existing.exists() {
                bail!(
                    "The expenses home directory is already initialized, found '{}'",
                    existing.display()
                )
            }
        }

        let db = Db::init(&sqlite_path)
            .await
            .context("Unable to create SQLite DB")?;

        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        Ok(Self {
            session_path: root.join(SESSION_JSON),
            root,
            config_path,
            config_file,
            db,
            sqlite_path,
        })
    }

    /// This will
    /// - validate that `expenses_home` exists and that the config file exists
    /// - load the config file
    /// - load the SQLite database, recreating its tables if they were written by a different
    ///   schema version
    /// - return the loaded configuration object
    pub async fn load(expenses_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = expenses_home.into();
        if !maybe_relative.is_dir() {
            bail!(
                "The expenses home directory is missing '{}'. Run 'expenses init' first.",
                maybe_relative.display()
            )
        }
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let sqlite_path = root.join(EXPENSES_SQLITE);
        let db = Db::load(&sqlite_path)
            .await
            .context("Unable to load SQLite DB")?;

        Ok(Self {
            session_path: root.join(SESSION_JSON),
            root,
            config_path,
            config_file,
            db,
            sqlite_path,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }

    /// How many expenses the dashboard lists when no limit is given.
    pub fn recent_limit(&self) -> u32 {
        self.config_file.recent_limit
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expenses",
///   "config_version": 1,
///   "recent_limit": 5
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expenses"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Number of recent expenses shown on the dashboard
    #[serde(default = "default_recent_limit")]
    recent_limit: u32,
}

fn default_recent_limit() -> u32 {
    RECENT_LIMIT
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            recent_limit: RECENT_LIMIT,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        utils::serialize(path.as_ref(), self)
            .await
            .context("Unable to write config file")
    }
}
