use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::models::CategoryKind;
use crate::settings::db_path;
use crate::store;

pub fn add(name: &str, kind: &str, user: Option<&str>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let kind: CategoryKind = kind.parse()?;
    let user_id = match user {
        Some(name) => Some(store::find_user(&conn, name)?.id),
        None => None,
    };
    store::add_category(&conn, name, kind, user_id)?;
    match user {
        Some(owner) => println!("Added category for {owner}: {name}"),
        None => println!("Added shared category: {name}"),
    }
    Ok(())
}

pub fn list(user: Option<&str>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let user_id = match user {
        Some(name) => Some(store::find_user(&conn, name)?.id),
        None => None,
    };
    let categories = store::list_categories(&conn, user_id)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Kind", "Owner"]);
    for cat in categories {
        table.add_row(vec![
            Cell::new(cat.id),
            Cell::new(cat.name),
            Cell::new(cat.kind.as_str()),
            Cell::new(if cat.user_id.is_some() { "own" } else { "shared" }),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}
