use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory with an initial `config.json` and an empty SQLite database.
///
/// # Arguments
/// - `expenses_home` - The directory that will be the root of data directory, e.g.
///   `$HOME/expenses`
///
/// # Errors
/// - Returns an error if any file operations fail or if the directory already holds a database.
pub async fn init(expenses_home: &Path) -> Result<Out<()>> {
    let config = Config::create(expenses_home)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the expenses directory at {}",
        config.root().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_type_of;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let out = init(&home).await.unwrap();
        assert!(out.message().contains("Successfully created"));
        assert!(Config::load(&home).await.is_ok());

        let e = init(&home).await.unwrap_err();
        assert_eq!(error_type_of(&e), Some(ErrorType::Config));
    }
}
