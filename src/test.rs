//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Amount, Category, Expense, User, UserId};
use crate::session::Session;
use crate::Config;
use chrono::NaiveDate;
use tempfile::TempDir;

/// The password every test user is registered with.
pub const PASSWORD: &str = "password1";

/// Test environment that sets up an expenses home directory with Config and database.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with Config and initialized database.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("expenses");
        let config = Config::create(&root).await.unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Registers `username` with [`PASSWORD`] and returns the stored user.
    pub async fn register(&self, username: &str) -> User {
        let db = self.config.db();
        assert!(db.register_user(username, PASSWORD).await.unwrap());
        db.authenticate(username, PASSWORD).await.unwrap().unwrap()
    }

    /// Registers `username` and writes a session for them, as `login` would.
    pub async fn login(&self, username: &str) -> User {
        let user = self.register(username).await;
        Session::new(&user).save(&self.config).await.unwrap();
        user
    }

    /// Inserts an expense and returns it as stored. `date` is `YYYY-MM-DD`.
    pub async fn add_expense(
        &self,
        user_id: UserId,
        amount: f64,
        category: Category,
        date: &str,
        note: Option<&str>,
    ) -> Expense {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        let db = self.config.db();
        let added = db
            .add_expense(user_id, Amount::new(amount), category, date, note)
            .await
            .unwrap();
        assert!(added);
        db.list_recent_expenses(user_id, None, u32::MAX)
            .await
            .unwrap()
            .into_iter()
            .max_by_key(|e| e.id())
            .unwrap()
    }
}
