use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::db_path;
use crate::store;

pub fn add(name: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    store::add_user(&conn, name)?;
    println!("Added user: {name}");
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let users = store::list_users(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name"]);
    for user in users {
        table.add_row(vec![Cell::new(user.id), Cell::new(user.name)]);
    }
    println!("Users\n{table}");
    Ok(())
}
