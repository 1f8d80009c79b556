use chrono::Local;
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::models::{Period, TxKind};
use crate::settings::db_path;
use crate::store::{self, Ledger, SqliteLedger, TxFilter};

pub fn add(
    user: &str,
    title: &str,
    amount: f64,
    kind: &str,
    category: &str,
    date: Option<&str>,
) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let user = store::find_user(&conn, user)?;
    let kind: TxKind = kind.parse()?;
    let category = store::find_category(&conn, category, user.id)?;
    let date = match date {
        Some(s) => store::parse_date(s)?,
        None => Local::now().date_naive(),
    };
    store::insert_transaction(&conn, user.id, title, amount, kind, category.id, date)?;
    println!("Recorded {} {} ({}) for {}", kind, money(amount), category.name, user.name);
    Ok(())
}

pub fn list(user: &str, from: Option<&str>, to: Option<&str>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let user = store::find_user(&conn, user)?;
    let period = Period::new(
        from.map(store::parse_date).transpose()?,
        to.map(store::parse_date).transpose()?,
    );

    let ledger = SqliteLedger::new(&conn);
    let mut txs = ledger.query_transactions(user.id, &TxFilter::for_period(period))?;
    txs.sort_by(|a, b| (a.date, a.id).cmp(&(b.date, b.id)));

    let mut table = Table::new();
    table.set_header(vec!["Date", "Title", "Kind", "Category", "Amount"]);
    for tx in &txs {
        let name = ledger
            .resolve_category_name(tx.category_id)?
            .unwrap_or_else(|| "(deleted)".to_string());
        let kind_cell = match tx.kind {
            TxKind::Income => Cell::new("income".green().to_string()),
            TxKind::Expense => Cell::new("expense".red().to_string()),
        };
        table.add_row(vec![
            Cell::new(tx.date.format("%Y-%m-%d")),
            Cell::new(&tx.title),
            kind_cell,
            Cell::new(name),
            Cell::new(money(tx.amount)),
        ]);
    }
    println!("Transactions for {} ({})\n{table}", user.name, txs.len());
    Ok(())
}
