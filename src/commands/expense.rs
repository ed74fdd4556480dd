//! Expense command handlers: `add`, `edit`, `delete` and `show`.
//!
//! Every handler acts for the logged-in user. An expense that belongs to somebody else is treated
//! as if it did not exist.

use crate::args::{AddArgs, EditArgs, IdArgs};
use crate::commands::Out;
use crate::db::DATE_FORMAT;
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, Expense, ExpenseId, UserId};
use crate::session::Session;
use crate::{Config, Result};
use anyhow::{anyhow, Context};
use chrono::{Local, NaiveDate};
use std::str::FromStr;

/// Records a new expense for the logged-in user. Without a date the expense is dated today.
pub async fn add(config: Config, args: AddArgs) -> Result<Out<()>> {
    let session = Session::require(&config).await?;
    let amount = parse_amount(args.amount())?;
    let date = match args.date() {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };
    let note = clean_note(args.note());

    let added = config
        .db()
        .add_expense(session.user_id(), amount, args.category(), date, note)
        .await
        .pub_result(ErrorType::Database)?;
    if !added {
        return Err(anyhow!("Failed to add expense.")).pub_result(ErrorType::Database);
    }
    Ok(format!("Expense added! {} {amount} on {date}", args.category()).into())
}

/// Changes an expense in place. Fields missing from `args` keep their stored value.
pub async fn edit(config: Config, args: EditArgs) -> Result<Out<Expense>> {
    let session = Session::require(&config).await?;
    let mut expense = owned_expense(&config, session.user_id(), args.id()).await?;

    if let Some(amount) = args.amount() {
        expense.amount = parse_amount(amount)?;
    }
    if let Some(category) = args.category() {
        expense.category = category;
    }
    if let Some(date) = args.date() {
        expense.date = parse_date(date)?;
    }
    if let Some(note) = args.note() {
        expense.note = clean_note(Some(note)).map(str::to_string);
    }

    let updated = config
        .db()
        .update_expense(
            expense.id(),
            expense.amount(),
            expense.category(),
            expense.date(),
            expense.note(),
        )
        .await
        .pub_result(ErrorType::Database)?;
    if !updated {
        return Err(anyhow!("Failed to update expense.")).pub_result(ErrorType::Database);
    }
    Ok(Out::new(format!("Expense updated! {expense}"), expense))
}

/// Removes an expense of the logged-in user.
pub async fn delete(config: Config, args: IdArgs) -> Result<Out<ExpenseId>> {
    let session = Session::require(&config).await?;
    let expense = owned_expense(&config, session.user_id(), args.id()).await?;
    let deleted = config
        .db()
        .delete_expense(expense.id())
        .await
        .pub_result(ErrorType::Database)?;
    if !deleted {
        return Err(anyhow!("Failed to delete expense.")).pub_result(ErrorType::Database);
    }
    Ok(Out::new(format!("Expense deleted! {expense}"), expense.id()))
}

/// Prints one expense of the logged-in user.
pub async fn show(config: Config, args: IdArgs) -> Result<Out<Expense>> {
    let session = Session::require(&config).await?;
    let expense = owned_expense(&config, session.user_id(), args.id()).await?;
    Ok(Out::new(expense.to_string(), expense))
}

async fn owned_expense(config: &Config, user_id: UserId, id: ExpenseId) -> Result<Expense> {
    let expense = config
        .db()
        .get_expense_by_id(id)
        .await
        .pub_result(ErrorType::Database)?;
    match expense {
        Some(e) if e.user_id() == user_id => Ok(e),
        _ => Err(anyhow!("Expense {id} not found")).pub_result(ErrorType::Request),
    }
}

fn parse_amount(s: &str) -> Result<Amount> {
    Amount::from_str(s)
        .map_err(anyhow::Error::from)
        .pub_result(ErrorType::Request)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .with_context(|| format!("Invalid date '{s}', expected the form YYYY-MM-DD"))
        .pub_result(ErrorType::Request)
}

/// An empty note is stored as no note.
fn clean_note(note: Option<&str>) -> Option<&str> {
    note.map(str::trim).filter(|n| !n.is_empty())
}
