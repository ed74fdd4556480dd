use serde::{Deserialize, Serialize};

/// The identifier the database assigns to a user.
pub type UserId = i64;

/// A registered user. The password is stored and compared as plain text.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub(crate) id: UserId,
    pub(crate) username: String,
    #[serde(skip_serializing)]
    pub(crate) password: String,
}

impl User {
    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}
