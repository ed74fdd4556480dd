//! This module is responsible for reading, writing and managing the SQLite database.
//!
//! Every operation opens its own connection, runs a single statement and closes the connection
//! again before returning. There is no pool and no transaction spanning several operations.
//!
//! None of the operations validate their inputs. Rows rejected by a constraint of the schema
//! (duplicate username, unknown user, negative amount) are reported as `Ok(false)`. Only failures
//! of the database itself are returned as errors.

pub(crate) mod migrations;

use crate::model::{
    Amount, Category, CategoryTotal, Expense, ExpenseId, MonthYear, User, UserId,
};
use crate::Result;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqliteQueryResult, SqliteRow};
use sqlx::{Connection, Row, SqliteConnection};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// The text format of the `date` column.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

const EXPENSE_COLUMNS: &str = "id, user_id, amount, category, date, note";

#[derive(Debug, Clone)]
pub(crate) struct Db {
    path: PathBuf,
    options: SqliteConnectOptions,
}

impl Db {
    /// - Validates that there is a SQLite file at `path`
    /// - Recreates the schema if it was written by a different schema version
    /// - Returns a constructed `Db` object for further operations
    pub(crate) async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("The SQLite database is missing '{}'", path.display());
        }
        let db = Self::new(path, false);
        let mut conn = db.connect().await?;
        let result = async {
            let current = migrations::version(&mut conn).await?;
            migrations::run(&mut conn, current, migrations::CURRENT_VERSION).await
        }
        .await;
        release(conn).await;
        result?;
        debug!("Loaded the SQLite database {}", db.path().display());
        Ok(db)
    }

    /// - Validates that no file currently exists at `path`
    /// - Creates a new SQLite file at `path`
    /// - Initializes the database schema
    /// - Returns a constructed `Db` object for further operations
    pub(crate) async fn init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            bail!("A file already exists at '{}'", path.display());
        }
        let db = Self::new(path, true);
        let mut conn = db.connect().await?;
        let result = async {
            migrations::bootstrap(&mut conn).await?;
            migrations::run(&mut conn, 0, migrations::CURRENT_VERSION).await
        }
        .await;
        release(conn).await;
        result?;
        Ok(Self::new(path, false))
    }

    fn new(path: &Path, create: bool) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(create)
            .foreign_keys(true);
        Self {
            path: path.to_path_buf(),
            options,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        SqliteConnection::connect_with(&self.options)
            .await
            .with_context(|| format!("Unable to open the SQLite database {}", self.path.display()))
    }

    // ---------------------------------------------------------------------------------------------
    // users
    // ---------------------------------------------------------------------------------------------

    /// Inserts a new user. Returns `false` if the username is already taken.
    pub(crate) async fn register_user(&self, username: &str, password: &str) -> Result<bool> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
            .bind(username)
            .bind(password)
            .execute(&mut conn)
            .await;
        release(conn).await;
        let registered = written(result).context("Failed to insert user")?;
        debug!("Registering user '{username}' returned {registered}");
        Ok(registered)
    }

    /// Finds the user whose username and password both match exactly.
    pub(crate) async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(
            r#"
            SELECT id, username, password
            FROM users
            WHERE username = ? AND password = ?
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(username)
        .bind(password)
        .fetch_optional(&mut conn)
        .await;
        release(conn).await;

        let row = result.context("Failed to query users")?;
        match row {
            Some(r) => Ok(Some(User {
                id: r.try_get("id")?,
                username: r.try_get("username")?,
                password: r.try_get("password")?,
            })),
            None => Ok(None),
        }
    }

    /// Returns the number of rows in the users table.
    pub(crate) async fn count_users(&self) -> Result<u64> {
        let mut conn = self.connect().await?;
        let result: std::result::Result<(i64,), _> = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&mut conn)
            .await;
        release(conn).await;
        let row = result.context("Failed to count users")?;
        Ok(row.0 as u64)
    }

    // ---------------------------------------------------------------------------------------------
    // expenses
    // ---------------------------------------------------------------------------------------------

    /// Inserts a new expense for `user_id`. Returns `false` if the row is rejected by the schema,
    /// e.g. because the user does not exist.
    pub(crate) async fn add_expense(
        &self,
        user_id: UserId,
        amount: Amount,
        category: Category,
        date: NaiveDate,
        note: Option<&str>,
    ) -> Result<bool> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO expenses (user_id, amount, category, date, note)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(amount.value())
        .bind(category.to_string())
        .bind(date_text(date))
        .bind(note)
        .execute(&mut conn)
        .await;
        release(conn).await;
        let added = written(result).context("Failed to insert expense")?;
        debug!("Adding {category} expense of {amount} on {date} for user {user_id}: {added}");
        Ok(added)
    }

    /// Overwrites the fields of an existing expense. Returns `false` if no expense has the id.
    pub(crate) async fn update_expense(
        &self,
        expense_id: ExpenseId,
        amount: Amount,
        category: Category,
        date: NaiveDate,
        note: Option<&str>,
    ) -> Result<bool> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(
            r#"
            UPDATE expenses
            SET amount = ?, category = ?, date = ?, note = ?
            WHERE id = ?
            "#,
        )
        .bind(amount.value())
        .bind(category.to_string())
        .bind(date_text(date))
        .bind(note)
        .bind(expense_id)
        .execute(&mut conn)
        .await;
        release(conn).await;
        let updated = written(result).context("Failed to update expense")?;
        debug!("Updating expense {expense_id} returned {updated}");
        Ok(updated)
    }

    /// Removes an expense. Returns `false` if no expense has the id.
    pub(crate) async fn delete_expense(&self, expense_id: ExpenseId) -> Result<bool> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(expense_id)
            .execute(&mut conn)
            .await;
        release(conn).await;
        let deleted = written(result).context("Failed to delete expense")?;
        debug!("Deleting expense {expense_id} returned {deleted}");
        Ok(deleted)
    }

    pub(crate) async fn get_expense_by_id(&self, expense_id: ExpenseId) -> Result<Option<Expense>> {
        let mut conn = self.connect().await?;
        let sql = format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?");
        let result = sqlx::query(&sql)
            .bind(expense_id)
            .fetch_optional(&mut conn)
            .await;
        release(conn).await;

        let row = result.context("Failed to query expense")?;
        row.as_ref().map(expense_from_row).transpose()
    }

    /// The most recent expenses of `user_id`, newest first, at most `limit` of them. When `month`
    /// is given only expenses dated in that month are considered.
    pub(crate) async fn list_recent_expenses(
        &self,
        user_id: UserId,
        month: Option<MonthYear>,
        limit: u32,
    ) -> Result<Vec<Expense>> {
        let mut conn = self.connect().await?;
        let result = match month {
            Some(month) => {
                let sql = format!(
                    "SELECT {EXPENSE_COLUMNS} FROM expenses \
                    WHERE user_id = ? AND strftime('%Y-%m', date) = ? \
                    ORDER BY date DESC, id DESC \
                    LIMIT ?"
                );
                sqlx::query(&sql)
                    .bind(user_id)
                    .bind(month.to_string())
                    .bind(i64::from(limit))
                    .fetch_all(&mut conn)
                    .await
            }
            None => {
                let sql = format!(
                    "SELECT {EXPENSE_COLUMNS} FROM expenses \
                    WHERE user_id = ? \
                    ORDER BY date DESC, id DESC \
                    LIMIT ?"
                );
                sqlx::query(&sql)
                    .bind(user_id)
                    .bind(i64::from(limit))
                    .fetch_all(&mut conn)
                    .await
            }
        };
        release(conn).await;

        let rows = result.context("Failed to query recent expenses")?;
        rows.iter().map(expense_from_row).collect()
    }

    /// The expenses of `user_id` dated from `start` through `end`, newest first.
    pub(crate) async fn list_expenses_in_range(
        &self,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Expense>> {
        let mut conn = self.connect().await?;
        let sql = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses \
            WHERE user_id = ? AND date BETWEEN ? AND ? \
            ORDER BY date DESC, id DESC"
        );
        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(date_text(start))
            .bind(date_text(end))
            .fetch_all(&mut conn)
            .await;
        release(conn).await;

        let rows = result.context("Failed to query expenses in range")?;
        rows.iter().map(expense_from_row).collect()
    }

    /// The amount spent per category by `user_id` in `month`. Categories without expenses are not
    /// present in the map.
    pub(crate) async fn category_totals(
        &self,
        user_id: UserId,
        month: MonthYear,
    ) -> Result<BTreeMap<Category, Amount>> {
        let totals = self.query_category_totals(user_id, month, false).await?;
        Ok(totals
            .into_iter()
            .map(|t| (t.category, t.total))
            .collect())
    }

    /// The amount spent per category by `user_id` in `month`, largest first.
    pub(crate) async fn category_summary_ranked(
        &self,
        user_id: UserId,
        month: MonthYear,
    ) -> Result<Vec<CategoryTotal>> {
        self.query_category_totals(user_id, month, true).await
    }

    async fn query_category_totals(
        &self,
        user_id: UserId,
        month: MonthYear,
        ranked: bool,
    ) -> Result<Vec<CategoryTotal>> {
        let order_by = if ranked {
            "ORDER BY total DESC, category ASC"
        } else {
            "ORDER BY category ASC"
        };
        let sql = format!(
            "SELECT category, SUM(amount) AS total FROM expenses \
            WHERE user_id = ? AND strftime('%Y-%m', date) = ? \
            GROUP BY category \
            {order_by}"
        );

        let mut conn = self.connect().await?;
        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(month.to_string())
            .fetch_all(&mut conn)
            .await;
        release(conn).await;

        let rows = result.context("Failed to query category totals")?;
        rows.iter()
            .map(|row| {
                let category: String = row.try_get("category")?;
                Ok(CategoryTotal {
                    category: parse_category(&category)?,
                    total: Amount::new(row.try_get("total")?),
                })
            })
            .collect()
    }

    /// Returns the number of expenses recorded by `user_id`.
    pub(crate) async fn count_expenses(&self, user_id: UserId) -> Result<u64> {
        let mut conn = self.connect().await?;
        let result: std::result::Result<(i64,), _> =
            sqlx::query_as("SELECT COUNT(*) FROM expenses WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&mut conn)
                .await;
        release(conn).await;
        let row = result.context("Failed to count expenses")?;
        Ok(row.0 as u64)
    }
}

/// Closes a connection. A failure to close is logged, not returned, so that the outcome of the
/// statement that already ran is not lost.
async fn release(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        warn!("Failed to close the SQLite connection: {e}");
    }
}

/// Interprets the result of an `INSERT`, `UPDATE` or `DELETE`. Constraint violations and
/// statements that touched no rows are `Ok(false)`.
fn written(
    result: std::result::Result<SqliteQueryResult, sqlx::Error>,
) -> std::result::Result<bool, sqlx::Error> {
    match result {
        Ok(done) => Ok(done.rows_affected() > 0),
        Err(e) if is_constraint_violation(&e) => {
            debug!("Statement rejected by a constraint: {e}");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

fn is_constraint_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_error) => matches!(
            db_error.kind(),
            ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation
        ),
        _ => false,
    }
}

fn date_text(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_category(s: &str) -> Result<Category> {
    Category::from_str(s).with_context(|| format!("Unknown category '{s}' in the expenses table"))
}

fn expense_from_row(row: &SqliteRow) -> Result<Expense> {
    let category: String = row.try_get("category")?;
    let date: String = row.try_get("date")?;
    Ok(Expense {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        amount: Amount::new(row.try_get("amount")?),
        category: parse_category(&category)?,
        date: NaiveDate::parse_from_str(&date, DATE_FORMAT)
            .with_context(|| format!("Invalid date '{date}' in the expenses table"))?,
        note: row.try_get("note")?,
    })
}
