use crate::args::DetailArgs;
use crate::commands::{parse_month, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{weeks_of, Amount, CategoryTotal, Expense, MonthYear, WeekWindow};
use crate::session::Session;
use crate::{Config, Result};
use anyhow::anyhow;
use serde::Serialize;
use tracing::debug;

/// The category breakdown of a month and the expenses of one of its weeks.
#[derive(Debug, Clone, Serialize)]
pub struct Detail {
    pub month: MonthYear,
    /// Categories with spending this month, largest total first.
    pub ranked: Vec<CategoryTotal>,
    pub weeks: Vec<WeekWindow>,
    /// 1-based index into `weeks`.
    pub selected_week: usize,
    pub week_expenses: Vec<Expense>,
    pub week_total: Amount,
}

/// Ranks the month's categories and lists the expenses of the selected week.
///
/// # Errors
/// - `ErrorType::Auth` if nobody is logged in.
/// - `ErrorType::Request` if the month is malformed or the week number is not one of the
///   month's weeks.
pub async fn detail(config: Config, args: DetailArgs) -> Result<Out<Detail>> {
    let session = Session::require(&config).await?;
    let month = parse_month(args.month())?;
    let weeks = weeks_of(month);

    let selected_week = args.week().unwrap_or(1);
    let week = selected_week
        .checked_sub(1)
        .and_then(|ix| weeks.get(ix))
        .copied();
    let Some(week) = week else {
        return Err(anyhow!(
            "Week {selected_week} is out of range, {month} has weeks 1 to {}",
            weeks.len()
        ))
        .pub_result(ErrorType::Request);
    };
    debug!("Showing week {selected_week} of {month}: {week}");

    let db = config.db();
    let ranked = db
        .category_summary_ranked(session.user_id(), month)
        .await
        .pub_result(ErrorType::Database)?;
    let week_expenses = db
        .list_expenses_in_range(session.user_id(), week.start(), week.end())
        .await
        .pub_result(ErrorType::Database)?;
    let week_total = week_expenses.iter().map(Expense::amount).sum();

    let detail = Detail {
        month,
        ranked,
        weeks,
        selected_week,
        week_expenses,
        week_total,
    };
    Ok(Out::new(render(&detail), detail))
}

fn render(d: &Detail) -> String {
    let mut lines = vec![format!("Category Breakdown for {}", d.month.display_name())];
    if d.ranked.is_empty() {
        lines.push("  No expenses this month.".to_string());
    }
    lines.extend(d.ranked.iter().map(|total| {
        format!(
            "  {:<12} {:>12}",
            total.category().to_string(),
            total.total().to_string()
        )
    }));

    lines.push("Weeks:".to_string());
    for (ix, week) in d.weeks.iter().enumerate() {
        let marker = if ix + 1 == d.selected_week { '*' } else { ' ' };
        lines.push(format!(" {marker}{}. {}", ix + 1, week.label()));
    }

    if let Some(week) = d.weeks.get(d.selected_week - 1) {
        lines.push(format!("Transactions: {week}"));
    }
    if d.week_expenses.is_empty() {
        lines.push("  No expenses this week.".to_string());
    } else {
        lines.extend(d.week_expenses.iter().map(|expense| format!("  {expense}")));
        lines.push(format!("Week total: {}", d.week_total));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_type_of;
    use crate::model::Category;
    use crate::test::TestEnv;

    async fn october(env: &TestEnv) {
        let user = env.login("wes@example.com").await;
        let id = user.id();
        env.add_expense(id, 12.5, Category::Food, "2025-10-03", Some("lunch"))
            .await;
        env.add_expense(id, 800.0, Category::Rent, "2025-10-01", None)
            .await;
        env.add_expense(id, 30.0, Category::Electricity, "2025-10-05", None)
            .await;
        env.add_expense(id, 7.5, Category::Food, "2025-10-11", None)
            .await;
        env.add_expense(id, 4.0, Category::Transport, "2025-10-31", None)
            .await;
    }

    #[tokio::test]
    async fn test_detail_first_week_by_default() {
        let env = TestEnv::new().await;
        october(&env).await;

        let out = detail(env.config(), DetailArgs::new(Some("2025-10"), None))
            .await
            .unwrap();
        let d = out.structure().unwrap();

        let ranked: Vec<Category> = d.ranked.iter().map(|t| t.category()).collect();
        assert_eq!(
            ranked,
            vec![
                Category::Rent,
                Category::Electricity,
                Category::Food,
                Category::Transport
            ]
        );
        assert_eq!(d.ranked[2].total(), Amount::new(20.0));

        assert_eq!(d.weeks.len(), 5);
        assert_eq!(d.selected_week, 1);
        let dates: Vec<String> = d.week_expenses.iter().map(|e| e.date().to_string()).collect();
        assert_eq!(dates, vec!["2025-10-03", "2025-10-01"]);
        assert_eq!(d.week_total, Amount::new(812.5));

        let message = out.message();
        assert!(message.starts_with("Category Breakdown for October 2025"));
        assert!(message.contains(" *1. Oct 01 - Oct 04"));
        assert!(message.contains("Transactions: 2025-10-01 to 2025-10-04"));
    }

    #[tokio::test]
    async fn test_detail_selected_week() {
        let env = TestEnv::new().await;
        october(&env).await;

        let out = detail(env.config(), DetailArgs::new(Some("2025-10"), Some(2)))
            .await
            .unwrap();
        let d = out.structure().unwrap();
        let amounts: Vec<Amount> = d.week_expenses.iter().map(|e| e.amount()).collect();
        assert_eq!(amounts, vec![Amount::new(7.5), Amount::new(30.0)]);

        let out = detail(env.config(), DetailArgs::new(Some("2025-10"), Some(5)))
            .await
            .unwrap();
        let d = out.structure().unwrap();
        assert_eq!(d.week_expenses.len(), 1);
        assert_eq!(d.week_expenses[0].category(), Category::Transport);
    }

    #[tokio::test]
    async fn test_detail_week_out_of_range() {
        let env = TestEnv::new().await;
        october(&env).await;
        for week in [0, 6] {
            let args = DetailArgs::new(Some("2025-10"), Some(week));
            let e = detail(env.config(), args).await.unwrap_err();
            assert_eq!(error_type_of(&e), Some(ErrorType::Request));
            assert!(e.to_string().contains("out of range"));
        }
    }

    #[tokio::test]
    async fn test_detail_empty_month() {
        let env = TestEnv::new().await;
        env.login("xena@example.com").await;
        let out = detail(env.config(), DetailArgs::new(Some("2026-02"), Some(4)))
            .await
            .unwrap();
        let d = out.structure().unwrap();
        assert!(d.ranked.is_empty());
        assert!(d.week_expenses.is_empty());
        assert!(d.week_total.is_zero());
        assert!(out.message().contains("No expenses this month."));
        assert!(out.message().contains("No expenses this week."));
    }

    #[tokio::test]
    async fn test_detail_empty_month_layout() {
        let env = TestEnv::new().await;
        env.login("xena@example.com").await;
        let out = detail(env.config(), DetailArgs::new(Some("2026-02"), Some(4)))
            .await
            .unwrap();
        let lines: Vec<&str> = out.message().lines().collect();
        assert_eq!(
            lines,
            vec![
                "Category Breakdown for February 2026",
                "  No expenses this month.",
                "Weeks:",
                "  1. Feb 01 - Feb 07",
                "  2. Feb 08 - Feb 14",
                "  3. Feb 15 - Feb 21",
                " *4. Feb 22 - Feb 28",
                "Transactions: 2026-02-22 to 2026-02-28",
                "  No expenses this week.",
            ]
        );
    }

    #[tokio::test]
    async fn test_detail_malformed_month() {
        let env = TestEnv::new().await;
        env.login("yuri@example.com").await;
        let args = DetailArgs::new(Some("2025/10"), None);
        let e = detail(env.config(), args).await.unwrap_err();
        assert_eq!(error_type_of(&e), Some(ErrorType::Request));
    }
}
