//! The logged-in user of this device.
//!
//! `login` writes `session.json` into the data directory and `logout` removes it. Every command
//! that acts for a user reads it back with [`Session::require`].

use crate::error::{ErrorType, IntoResult};
use crate::model::{User, UserId};
use crate::{utils, Config, Result};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Session {
    user_id: UserId,
    username: String,
}

impl Session {
    pub fn new(user: &User) -> Self {
        Self {
            user_id: user.id(),
            username: user.username().to_string(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Writes the session file, replacing any previous session.
    pub(crate) async fn save(&self, config: &Config) -> Result<()> {
        utils::serialize(config.session_path(), self).await?;
        debug!("Saved session for user {} ({})", self.user_id, self.username);
        Ok(())
    }

    /// Reads the session file. Returns `None` when nobody is logged in.
    pub(crate) async fn load(config: &Config) -> Result<Option<Self>> {
        let path = config.session_path();
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(utils::deserialize(path).await?))
    }

    /// Reads the session file and fails with an auth error when nobody is logged in.
    pub(crate) async fn require(config: &Config) -> Result<Self> {
        match Self::load(config).await? {
            Some(session) => Ok(session),
            None => Err(anyhow!("Not logged in. Run 'expenses login' first."))
                .pub_result(ErrorType::Auth),
        }
    }

    /// Removes the session file. Returns `true` if somebody was logged in.
    pub(crate) async fn clear(config: &Config) -> Result<bool> {
        utils::remove_file(config.session_path()).await
    }
}
