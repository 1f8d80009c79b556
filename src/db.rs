use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    category_type TEXT NOT NULL CHECK (category_type IN ('income', 'expense', 'both')),
    user_id INTEGER,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (user_id) REFERENCES users(id),
    UNIQUE (name, user_id)
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    amount REAL NOT NULL CHECK (amount > 0),
    tx_type TEXT NOT NULL CHECK (tx_type IN ('income', 'expense')),
    category_id INTEGER NOT NULL,
    date TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (user_id) REFERENCES users(id),
    FOREIGN KEY (category_id) REFERENCES categories(id)
);
";

// Shared categories available to every user (user_id NULL). "Other" keeps
// the legacy 'both' type: it accepts income and expense transactions alike.
const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Food", "expense"),
    ("Transport", "expense"),
    ("Shopping", "expense"),
    ("Bills", "expense"),
    ("Other", "both"),
    ("Salary", "income"),
    ("Freelance", "income"),
    ("Investment", "income"),
];

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let count: i64 = conn.query_row(
        "SELECT count(*) FROM categories WHERE user_id IS NULL",
        [],
        |row| row.get(0),
    )?;
    if count == 0 {
        for (name, kind) in DEFAULT_CATEGORIES {
            conn.execute(
                "INSERT INTO categories (name, category_type, user_id) VALUES (?1, ?2, NULL)",
                rusqlite::params![name, kind],
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &["users", "categories", "transactions"] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT count(*) FROM categories WHERE user_id IS NULL", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 8);
    }

    #[test]
    fn test_init_db_seeds_shared_categories() {
        let (_dir, conn) = test_db();
        let income: i64 = conn.query_row(
            "SELECT count(*) FROM categories WHERE category_type = 'income'", [], |r| r.get(0),
        ).unwrap();
        let expense: i64 = conn.query_row(
            "SELECT count(*) FROM categories WHERE category_type = 'expense'", [], |r| r.get(0),
        ).unwrap();
        let both: i64 = conn.query_row(
            "SELECT count(*) FROM categories WHERE category_type = 'both'", [], |r| r.get(0),
        ).unwrap();
        assert_eq!(income, 3);
        assert_eq!(expense, 4);
        assert_eq!(both, 1);
    }

    #[test]
    fn test_transactions_reject_non_positive_amounts() {
        let (_dir, conn) = test_db();
        conn.execute("INSERT INTO users (name) VALUES ('alice')", []).unwrap();
        let result = conn.execute(
            "INSERT INTO transactions (user_id, title, amount, tx_type, category_id, date) \
             VALUES (1, 'bad', -5.0, 'expense', 1, '2024-01-01')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_transactions_reject_unknown_kind() {
        let (_dir, conn) = test_db();
        conn.execute("INSERT INTO users (name) VALUES ('alice')", []).unwrap();
        let result = conn.execute(
            "INSERT INTO transactions (user_id, title, amount, tx_type, category_id, date) \
             VALUES (1, 'bad', 5.0, 'transfer', 1, '2024-01-01')",
            [],
        );
        assert!(result.is_err());
    }
}
