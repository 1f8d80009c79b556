use chrono::Local;
use colored::Colorize;
use comfy_table::{Cell, Table};
use serde::Serialize;

use crate::analytics;
use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::models::{Period, TxKind};
use crate::settings::db_path;
use crate::store::{self, SqliteLedger};

fn parse_period(from: Option<&str>, to: Option<&str>) -> Result<Period> {
    if from.is_none() && to.is_none() {
        return Ok(Period::all_time());
    }
    Ok(Period::new(
        from.map(store::parse_date).transpose()?,
        to.map(store::parse_date).transpose()?,
    ))
}

fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .map_err(|e| crate::error::TallyError::Other(e.to_string()))?
    );
    Ok(())
}

pub fn summary(user: &str, from: Option<&str>, to: Option<&str>, json: bool) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let user = store::find_user(&conn, user)?;
    let period = parse_period(from, to)?;
    let ledger = SqliteLedger::new(&conn);
    let summary = analytics::financial_summary(&ledger, user.id, &period)?;

    if json {
        return emit_json(&summary);
    }

    let mut table = Table::new();
    table.set_header(vec!["", "Amount"]);
    table.add_row(vec![
        Cell::new("Income".green().to_string()),
        Cell::new(money(summary.total_income)),
    ]);
    table.add_row(vec![
        Cell::new("Expenses".red().to_string()),
        Cell::new(money(summary.total_expenses)),
    ]);
    let balance_label = if summary.balance >= 0.0 {
        "Balance".green().bold()
    } else {
        "Balance".red().bold()
    };
    table.add_row(vec![
        Cell::new(balance_label.to_string()),
        Cell::new(money(summary.balance)),
    ]);

    println!(
        "Summary for {} ({} to {})\n{table}",
        user.name, summary.period.start_date, summary.period.end_date
    );
    Ok(())
}

pub fn breakdown(
    user: &str,
    kind: &str,
    from: Option<&str>,
    to: Option<&str>,
    json: bool,
) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let user = store::find_user(&conn, user)?;
    let kind: TxKind = kind.parse()?;
    let period = parse_period(from, to)?;
    let ledger = SqliteLedger::new(&conn);
    let breakdown = analytics::category_breakdown(&ledger, user.id, &period, kind)?;

    if json {
        return emit_json(&breakdown);
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "Count", "Share"]);
    for cat in &breakdown.categories {
        table.add_row(vec![
            Cell::new(&cat.category_name),
            Cell::new(money(cat.amount)),
            Cell::new(cat.count),
            Cell::new(format!("{:.2}%", cat.percentage.value())),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold().to_string()),
        Cell::new(money(breakdown.total)),
        Cell::new(""),
        Cell::new(""),
    ]);

    println!("{} breakdown for {}\n{table}", kind, user.name);
    Ok(())
}

pub fn trends(user: &str, months: u32, json: bool) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let user = store::find_user(&conn, user)?;
    let ledger = SqliteLedger::new(&conn);
    let trends = analytics::monthly_trends(&ledger, user.id, months, Local::now().date_naive())?;

    if json {
        return emit_json(&trends);
    }

    let mut table = Table::new();
    table.set_header(vec!["Month", "Income", "Expense", "Balance"]);
    for entry in &trends {
        table.add_row(vec![
            Cell::new(format!("{} {}", entry.month_name, entry.year)),
            Cell::new(money(entry.income)),
            Cell::new(money(entry.expense)),
            Cell::new(money(entry.balance)),
        ]);
    }
    println!("Monthly trends for {} (last {months} months)\n{table}", user.name);
    Ok(())
}

pub fn anomalies(user: &str, json: bool) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let user = store::find_user(&conn, user)?;
    let ledger = SqliteLedger::new(&conn);
    let anomalies = analytics::detect_anomalies(&ledger, user.id, Local::now().date_naive())?;

    if json {
        return emit_json(&anomalies);
    }

    if anomalies.is_empty() {
        println!("No unusual spending detected for {}.", user.name);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "This Month", "Monthly Avg", "Increase"]);
    for a in &anomalies {
        table.add_row(vec![
            Cell::new(&a.category),
            Cell::new(money(a.current_spending)),
            Cell::new(money(a.average_spending)),
            Cell::new(format!("{}%", a.percentage_increase).red().to_string()),
        ]);
    }
    println!("Unusual spending for {}\n{table}", user.name);
    Ok(())
}

pub fn insights(user: &str, json: bool) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let user = store::find_user(&conn, user)?;
    let ledger = SqliteLedger::new(&conn);
    let insights = analytics::generate_insights(&ledger, user.id, Local::now().date_naive())?;

    if json {
        return emit_json(&insights);
    }

    println!("Insights for {}", user.name.bold());
    println!("  {}", insights.summary.message);
    println!("  {}", insights.top_spending.message);
    println!("  {}", insights.trend.message);
    println!("  {}", insights.anomalies.message);
    Ok(())
}
