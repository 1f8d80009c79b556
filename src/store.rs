use chrono::NaiveDate;
use rusqlite::types::ToSql;
use rusqlite::Connection;

use crate::error::{Result, TallyError};
use crate::models::{Category, CategoryKind, Period, Transaction, TxKind, User};

/// Narrow filter the analytics engine hands to the ledger. The store only
/// filters; grouping and ordering are the engine's job.
#[derive(Debug, Clone, Copy, Default)]
pub struct TxFilter {
    pub kind: Option<TxKind>,
    pub category: Option<i64>,
    pub period: Period,
}

impl TxFilter {
    pub fn for_period(period: Period) -> Self {
        TxFilter { period, ..Default::default() }
    }

    pub fn kind(mut self, kind: TxKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// The query boundary between the analytics engine and whatever owns the
/// transaction ledger. Returned transactions are unordered.
pub trait Ledger {
    fn query_transactions(&self, user_id: i64, filter: &TxFilter) -> Result<Vec<Transaction>>;

    /// Translate a category id to its display name. `None` when the
    /// category no longer exists.
    fn resolve_category_name(&self, category_id: i64) -> Result<Option<String>>;
}

// ---------------------------------------------------------------------------
// SQLite-backed ledger
// ---------------------------------------------------------------------------

pub struct SqliteLedger<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteLedger<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        SqliteLedger { conn }
    }
}

impl Ledger for SqliteLedger<'_> {
    fn query_transactions(&self, user_id: i64, filter: &TxFilter) -> Result<Vec<Transaction>> {
        let mut clauses = vec!["user_id = ?1".to_string()];
        let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(user_id)];

        if let Some(kind) = filter.kind {
            params.push(Box::new(kind.as_str()));
            clauses.push(format!("tx_type = ?{}", params.len()));
        }
        if let Some(category) = filter.category {
            params.push(Box::new(category));
            clauses.push(format!("category_id = ?{}", params.len()));
        }
        if let Some(start) = filter.period.start {
            params.push(Box::new(store_date(start)));
            clauses.push(format!("date >= ?{}", params.len()));
        }
        if let Some(end) = filter.period.end {
            params.push(Box::new(store_date(end)));
            clauses.push(format!("date <= ?{}", params.len()));
        }

        let sql = format!(
            "SELECT id, user_id, title, amount, tx_type, category_id, date \
             FROM transactions WHERE {}",
            clauses.join(" AND ")
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let raw: Vec<(i64, i64, String, f64, String, i64, String)> = stmt
            .query_map(param_refs.as_slice(), |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(id, user_id, title, amount, kind, category_id, date)| {
                Ok(Transaction {
                    id,
                    user_id,
                    title,
                    amount,
                    kind: kind.parse()?,
                    category_id,
                    date: parse_date(&date)?,
                })
            })
            .collect()
    }

    fn resolve_category_name(&self, category_id: i64) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM categories WHERE id = ?1")?;
        let mut rows = stmt.query_map([category_id], |row| row.get::<_, String>(0))?;
        match rows.next() {
            Some(name) => Ok(Some(name?)),
            None => Ok(None),
        }
    }
}

fn store_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| TallyError::InvalidDate(s.to_string()))
}

// ---------------------------------------------------------------------------
// Ledger CRUD used by the CLI plumbing
// ---------------------------------------------------------------------------

pub fn add_user(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute("INSERT INTO users (name) VALUES (?1)", [name])?;
    Ok(conn.last_insert_rowid())
}

pub fn find_user(conn: &Connection, name: &str) -> Result<User> {
    let mut stmt = conn.prepare("SELECT id, name FROM users WHERE name = ?1")?;
    let mut rows = stmt.query_map([name], |row| {
        Ok(User { id: row.get(0)?, name: row.get(1)? })
    })?;
    match rows.next() {
        Some(user) => Ok(user?),
        None => Err(TallyError::UnknownUser(name.to_string())),
    }
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, name FROM users ORDER BY name")?;
    let users = stmt
        .query_map([], |row| Ok(User { id: row.get(0)?, name: row.get(1)? }))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(users)
}

pub fn add_category(
    conn: &Connection,
    name: &str,
    kind: CategoryKind,
    user_id: Option<i64>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO categories (name, category_type, user_id) VALUES (?1, ?2, ?3)",
        rusqlite::params![name, kind.as_str(), user_id],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Shared categories plus the user's own, shared first.
pub fn list_categories(conn: &Connection, user_id: Option<i64>) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, category_type, user_id FROM categories \
         WHERE user_id IS NULL OR user_id = ?1 \
         ORDER BY user_id IS NOT NULL, name",
    )?;
    let raw: Vec<(i64, String, String, Option<i64>)> = stmt
        .query_map([user_id], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    raw.into_iter()
        .map(|(id, name, kind, user_id)| {
            Ok(Category { id, name, kind: kind.parse()?, user_id })
        })
        .collect()
}

/// Look up a category by name for a user: their own first, then shared.
pub fn find_category(conn: &Connection, name: &str, user_id: i64) -> Result<Category> {
    let mut stmt = conn.prepare(
        "SELECT id, name, category_type, user_id FROM categories \
         WHERE name = ?1 AND (user_id = ?2 OR user_id IS NULL) \
         ORDER BY user_id IS NULL LIMIT 1",
    )?;
    let mut rows = stmt.query_map(rusqlite::params![name, user_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<i64>>(3)?,
        ))
    })?;
    match rows.next() {
        Some(row) => {
            let (id, name, kind, user_id) = row?;
            Ok(Category { id, name, kind: kind.parse()?, user_id })
        }
        None => Err(TallyError::UnknownCategory(name.to_string())),
    }
}

pub fn insert_transaction(
    conn: &Connection,
    user_id: i64,
    title: &str,
    amount: f64,
    kind: TxKind,
    category_id: i64,
    date: NaiveDate,
) -> Result<i64> {
    if amount <= 0.0 {
        return Err(TallyError::BadRequest(format!(
            "amount must be positive, got {amount}"
        )));
    }
    conn.execute(
        "INSERT INTO transactions (user_id, title, amount, tx_type, category_id, date) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![user_id, title, amount, kind.as_str(), category_id, store_date(date)],
    )?;
    Ok(conn.last_insert_rowid())
}
