use crate::args::DashboardArgs;
use crate::commands::{parse_month, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, Category, Expense, MonthYear};
use crate::session::Session;
use crate::{Config, Result};
use serde::Serialize;

/// What the dashboard shows for one month.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub username: String,
    pub month: MonthYear,
    pub total: Amount,
    /// One entry per category with spending this month, in category order.
    pub categories: Vec<CategoryShare>,
    /// The newest expenses of the month, newest first.
    pub recent: Vec<Expense>,
    pub previous_month: MonthYear,
    pub next_month: MonthYear,
}

/// A slice of the month's spending.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub total: Amount,
    /// Percentage of the month's total, from 0 to 100.
    pub percent: f64,
}

/// Summarizes a month for the logged-in user: total, per-category shares and recent expenses.
///
/// # Errors
/// - `ErrorType::Auth` if nobody is logged in.
/// - `ErrorType::Request` if the month is malformed.
pub async fn dashboard(config: Config, args: DashboardArgs) -> Result<Out<Dashboard>> {
    let session = Session::require(&config).await?;
    let month = parse_month(args.month())?;
    let limit = args.limit().unwrap_or_else(|| config.recent_limit());

    let db = config.db();
    let totals = db
        .category_totals(session.user_id(), month)
        .await
        .pub_result(ErrorType::Database)?;
    let recent = db
        .list_recent_expenses(session.user_id(), Some(month), limit)
        .await
        .pub_result(ErrorType::Database)?;

    let total: Amount = totals.values().copied().sum();
    let categories = totals
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category,
            total: amount,
            percent: amount.share_of(total),
        })
        .collect();

    let dashboard = Dashboard {
        username: session.username().to_string(),
        month,
        total,
        categories,
        recent,
        previous_month: month.prev(),
        next_month: month.next(),
    };
    Ok(Out::new(render(&dashboard), dashboard))
}

fn render(d: &Dashboard) -> String {
    let mut lines = vec![
        format!("{} ({})", d.month.display_name(), d.username),
        format!("Total: {}", d.total),
    ];

    if d.recent.is_empty() && d.categories.is_empty() {
        lines.push("No expenses this month.".to_string());
    } else {
        lines.push("By category:".to_string());
        lines.extend(d.categories.iter().map(|share| {
            format!(
                "  {:<12} {:>12} {:>6.1}%",
                share.category.to_string(),
                share.total.to_string(),
                share.percent
            )
        }));
        lines.push("Recent expenses:".to_string());
        lines.extend(d.recent.iter().map(|expense| format!("  {expense}")));
        lines.push(format!("See more: expenses detail --month {}", d.month));
    }

    lines.push(format!(
        "Previous month: {}, next month: {}",
        d.previous_month, d.next_month
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_type_of;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_dashboard_requires_login() {
        let env = TestEnv::new().await;
        let e = dashboard(env.config(), DashboardArgs::default())
            .await
            .unwrap_err();
        assert_eq!(error_type_of(&e), Some(ErrorType::Auth));
    }

    #[tokio::test]
    async fn test_dashboard_month() {
        let env = TestEnv::new().await;
        let user = env.login("quinn@example.com").await;
        let id = user.id();
        env.add_expense(id, 60.0, Category::Food, "2025-10-02", Some("groceries"))
            .await;
        env.add_expense(id, 20.0, Category::Transport, "2025-10-09", None)
            .await;
        env.add_expense(id, 20.0, Category::Food, "2025-10-20", None)
            .await;
        env.add_expense(id, 500.0, Category::Rent, "2025-11-01", None)
            .await;

        let args = DashboardArgs::new(Some("2025-10"), Some(2));
        let out = dashboard(env.config(), args).await.unwrap();
        let d = out.structure().unwrap();

        assert_eq!(d.total, Amount::new(100.0));
        assert_eq!(
            d.categories,
            vec![
                CategoryShare {
                    category: Category::Food,
                    total: Amount::new(80.0),
                    percent: 80.0,
                },
                CategoryShare {
                    category: Category::Transport,
                    total: Amount::new(20.0),
                    percent: 20.0,
                },
            ]
        );
        assert_eq!(d.recent.len(), 2);
        assert_eq!(d.recent[0].date().to_string(), "2025-10-20");
        assert_eq!(d.recent[1].date().to_string(), "2025-10-09");
        assert_eq!(d.previous_month.to_string(), "2025-09");
        assert_eq!(d.next_month.to_string(), "2025-11");

        let message = out.message();
        assert!(message.starts_with("October 2025 (quinn@example.com)"));
        assert!(message.contains("Total: $100.00"));
        assert!(message.contains("80.0%"));
        assert!(message.contains("expenses detail --month 2025-10"));
    }

    #[tokio::test]
    async fn test_dashboard_uses_configured_limit() {
        let env = TestEnv::new().await;
        let user = env.login("rita@example.com").await;
        for day in 1..=7 {
            let date = format!("2025-10-{day:02}");
            env.add_expense(user.id(), 1.0, Category::Others, &date, None)
                .await;
        }
        let args = DashboardArgs::new(Some("2025-10"), None);
        let out = dashboard(env.config(), args).await.unwrap();
        let d = out.structure().unwrap();
        assert_eq!(d.recent.len(), env.config().recent_limit() as usize);
        assert_eq!(d.total, Amount::new(7.0));
    }

    #[tokio::test]
    async fn test_dashboard_empty_month() {
        let env = TestEnv::new().await;
        env.login("sam@example.com").await;
        let args = DashboardArgs::new(Some("2024-02"), None);
        let out = dashboard(env.config(), args).await.unwrap();
        let d = out.structure().unwrap();
        assert!(d.total.is_zero());
        assert!(d.categories.is_empty());
        assert!(out.message().contains("No expenses this month."));
    }

    #[tokio::test]
    async fn test_dashboard_empty_month_layout() {
        let env = TestEnv::new().await;
        env.login("sam@example.com").await;
        let args = DashboardArgs::new(Some("2024-02"), None);
        let out = dashboard(env.config(), args).await.unwrap();
        let lines: Vec<&str> = out.message().lines().collect();
        assert_eq!(
            lines,
            vec![
                "February 2024 (sam@example.com)",
                "Total: $0.00",
                "No expenses this month.",
                "Previous month: 2024-01, next month: 2024-03",
            ]
        );
        assert!(!out.message().ends_with('\n'));
    }

    #[tokio::test]
    async fn test_dashboard_only_shows_own_expenses() {
        let env = TestEnv::new().await;
        let other = env.register("tom@example.com").await;
        env.add_expense(other.id(), 9.0, Category::Food, "2025-10-02", None)
            .await;
        env.login("uma@example.com").await;

        let args = DashboardArgs::new(Some("2025-10"), None);
        let out = dashboard(env.config(), args).await.unwrap();
        assert!(out.structure().unwrap().recent.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_bad_month() {
        let env = TestEnv::new().await;
        env.login("vic@example.com").await;
        let args = DashboardArgs::new(Some("10-2025"), None);
        let e = dashboard(env.config(), args).await.unwrap_err();
        assert_eq!(error_type_of(&e), Some(ErrorType::Request));
    }
}
