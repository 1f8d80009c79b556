use chrono::{Datelike, Local, Months, NaiveDate};
use rusqlite::Connection;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::models::TxKind;
use crate::settings::db_path;
use crate::store;

const DEMO_USER: &str = "demo";

struct MonthlyTxn {
    day: u32,
    title: &'static str,
    amount: f64,
    kind: TxKind,
    category: &'static str,
}

/// Generated for every demo month.
const RECURRING: &[MonthlyTxn] = &[
    MonthlyTxn { day: 1, title: "Monthly salary", amount: 4200.0, kind: TxKind::Income, category: "Salary" },
    MonthlyTxn { day: 3, title: "Rent and utilities", amount: 1450.0, kind: TxKind::Expense, category: "Bills" },
    MonthlyTxn { day: 7, title: "Groceries", amount: 310.0, kind: TxKind::Expense, category: "Food" },
    MonthlyTxn { day: 12, title: "Metro card", amount: 90.0, kind: TxKind::Expense, category: "Transport" },
    MonthlyTxn { day: 18, title: "Online order", amount: 120.0, kind: TxKind::Expense, category: "Shopping" },
    MonthlyTxn { day: 25, title: "Side project invoice", amount: 600.0, kind: TxKind::Income, category: "Freelance" },
];

/// Current-month extras: enough Food spending to trip anomaly detection.
const CURRENT_MONTH: &[MonthlyTxn] = &[
    MonthlyTxn { day: 9, title: "Birthday dinner", amount: 260.0, kind: TxKind::Expense, category: "Food" },
    MonthlyTxn { day: 14, title: "Restaurant week", amount: 180.0, kind: TxKind::Expense, category: "Food" },
];

pub fn run() -> Result<()> {
    let conn = get_connection(&db_path())?;
    init_db(&conn)?;
    let today = Local::now().date_naive();
    seed(&conn, today)?;

    println!("Seeded demo user '{DEMO_USER}' with 5 months of transactions.");
    println!("Try: tally insights --user {DEMO_USER}");
    Ok(())
}

fn seed(conn: &Connection, today: NaiveDate) -> Result<()> {
    let user = match store::find_user(conn, DEMO_USER) {
        Ok(user) => user.id,
        Err(_) => store::add_user(conn, DEMO_USER)?,
    };

    for months_back in (0..5u32).rev() {
        let month_start = today
            .checked_sub_months(Months::new(months_back))
            .unwrap_or(today)
            .with_day(1)
            .unwrap_or(today);
        for txn in RECURRING {
            insert(conn, user, month_start, txn, today)?;
        }
    }
    for txn in CURRENT_MONTH {
        insert(conn, user, today.with_day(1).unwrap_or(today), txn, today)?;
    }
    Ok(())
}

fn insert(
    conn: &Connection,
    user: i64,
    month_start: NaiveDate,
    txn: &MonthlyTxn,
    today: NaiveDate,
) -> Result<()> {
    let date = month_start.with_day(txn.day).unwrap_or(month_start);
    // Keep the demo ledger in the past.
    if date > today {
        return Ok(());
    }
    let category = store::find_category(conn, txn.category, user)?;
    store::insert_transaction(conn, user, txn.title, txn.amount, txn.kind, category.id, date)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics;
    use crate::store::SqliteLedger;

    #[test]
    fn test_demo_seed_supports_all_analytics() {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        // Pinned mid-month date so every recurring day <= 18 lands.
        let today = NaiveDate::parse_from_str("2024-06-20", "%Y-%m-%d").unwrap();
        seed(&conn, today).unwrap();

        let user = store::find_user(&conn, DEMO_USER).unwrap();
        let ledger = SqliteLedger::new(&conn);

        let trends = analytics::monthly_trends(&ledger, user.id, 6, today).unwrap();
        assert_eq!(trends.len(), 5);

        let anomalies = analytics::detect_anomalies(&ledger, user.id, today).unwrap();
        assert!(anomalies.iter().any(|a| a.category == "Food"));

        let insights = analytics::generate_insights(&ledger, user.id, today).unwrap();
        assert!(insights.anomalies.count >= 1);
    }
}
