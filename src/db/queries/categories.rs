use crate::models::category::{Category, NewCategory};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

const SELECT_CATEGORY: &str = "SELECT c.id, c.user_id, c.name, c.description, c.category_type,
        c.record_type_id, rt.name
     FROM categories c
     LEFT JOIN record_types rt ON c.record_type_id = rt.id";

fn map_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        category_type: row.get(4)?,
        record_type_id: row.get(5)?,
        record_type_name: row.get(6)?,
    })
}

pub fn list_categories(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Category>> {
    let mut stmt = conn.prepare(&format!(
        "{} WHERE c.user_id = ? ORDER BY c.name, c.id",
        SELECT_CATEGORY
    ))?;

    let categories = stmt
        .query_map([user_id], map_category)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(user_id, count = categories.len(), "Listed categories");
    Ok(categories)
}

/// Looks a category up only within the given user's categories.
pub fn get_category(
    conn: &Connection,
    user_id: i64,
    id: i64,
) -> rusqlite::Result<Option<Category>> {
    conn.query_row(
        &format!("{} WHERE c.user_id = ? AND c.id = ?", SELECT_CATEGORY),
        [user_id, id],
        map_category,
    )
    .optional()
}

pub fn create_category(conn: &Connection, category: &NewCategory) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO categories (user_id, name, description, category_type, record_type_id)
         VALUES (?, ?, ?, ?, ?)",
        params![
            category.user_id,
            category.name,
            category.description,
            category.category_type,
            category.record_type_id
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(category_id = id, name = %category.name, "Created category");
    Ok(id)
}
