use rusqlite::Connection;
use tracing::debug;

pub fn create_record_type(conn: &Connection, name: &str) -> rusqlite::Result<i64> {
    conn.execute("INSERT INTO record_types (name) VALUES (?)", [name])?;
    let id = conn.last_insert_rowid();
    debug!(record_type_id = id, name = %name, "Created record type");
    Ok(id)
}
