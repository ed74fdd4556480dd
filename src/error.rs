//! Error types shared by the library and the `expenses` binary.
//!
//! Internally everything is an `anyhow::Error`. At the command boundary an `ErrorType` is attached
//! to the error so that callers can tell a bad request apart from a broken database.

use serde::{Deserialize, Serialize};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of a failure that is reported to the user.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The data directory or its configuration files are missing or invalid.
    Config,
    /// The SQLite database could not be read or written.
    Database,
    /// There is no logged-in user, or the credentials were rejected.
    Auth,
    /// The input given by the user is malformed or refers to something that does not exist.
    Request,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// Attaches an `ErrorType` to the error of a `Result`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T> IntoResult<T> for Result<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| tag(e, error_type))
    }
}

/// Attaches `error_type` to `e` unless it already carries one.
pub(crate) fn tag(e: Error, error_type: ErrorType) -> Error {
    if error_type_of(&e).is_some() {
        return e;
    }
    Error::new(Tagged { error_type, inner: e })
}

/// Returns the `ErrorType` attached to `e`, if any. Context added after the type was attached
/// does not hide it.
pub fn error_type_of(e: &Error) -> Option<ErrorType> {
    e.downcast_ref::<Tagged>().map(|tagged| tagged.error_type)
}

/// Carries an `ErrorType` alongside the error it classifies. It displays as the wrapped error so
/// that messages read the same with or without a type attached.
#[derive(Debug)]
struct Tagged {
    error_type: ErrorType,
    inner: Error,
}

impl std::fmt::Display for Tagged {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::error::Error for Tagged {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn test_pub_result_attaches_error_type() {
        let result: Result<()> = Err(anyhow!("boom"));
        let e = result.pub_result(ErrorType::Database).unwrap_err();
        assert_eq!(error_type_of(&e), Some(ErrorType::Database));
        assert_eq!(e.to_string(), "boom");
    }

    #[test]
    fn test_first_error_type_wins() {
        let result: Result<()> = Err(anyhow!("bad month"));
        let e = result
            .pub_result(ErrorType::Request)
            .pub_result(ErrorType::Database)
            .unwrap_err();
        assert_eq!(error_type_of(&e), Some(ErrorType::Request));
    }

    #[test]
    fn test_error_type_survives_context() {
        let result: Result<()> = Err(anyhow!("disk full"));
        let e = result
            .pub_result(ErrorType::Database)
            .context("Unable to save")
            .unwrap_err();
        assert_eq!(error_type_of(&e), Some(ErrorType::Database));
        assert_eq!(format!("{e:#}"), "Unable to save: disk full");
    }

    #[test]
    fn test_untagged_error() {
        let e = anyhow!("plain");
        assert_eq!(error_type_of(&e), None);
    }

    #[test]
    fn test_error_type_display() {
        assert_eq!(ErrorType::Auth.to_string(), "auth");
        assert_eq!("request".parse::<ErrorType>().unwrap(), ErrorType::Request);
    }
}
