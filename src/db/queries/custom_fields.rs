use std::collections::{HashMap, HashSet};

use crate::db::queries::{placeholders, IN_CLAUSE_CHUNK};
use crate::models::custom_field::{
    CustomFieldDefinition, CustomFieldType, NewCustomFieldDefinition, StoredFieldValue,
};
use rusqlite::{params, params_from_iter, Connection};
use tracing::debug;

/// Definitions visible to a category: owned by the user, matching its record
/// type, and either global to that record type or pinned to this category.
pub fn list_definitions(
    conn: &Connection,
    record_type_id: Option<i64>,
    category_id: i64,
    user_id: i64,
) -> rusqlite::Result<Vec<CustomFieldDefinition>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, record_type_id, category_id, label, field_type
         FROM custom_field_definitions
         WHERE user_id = ?1
           AND record_type_id IS ?2
           AND (category_id IS NULL OR category_id = ?3)
         ORDER BY id",
    )?;

    let definitions = stmt
        .query_map(params![user_id, record_type_id, category_id], |row| {
            let field_type: String = row.get(5)?;
            Ok(CustomFieldDefinition {
                id: row.get(0)?,
                user_id: row.get(1)?,
                record_type_id: row.get(2)?,
                category_id: row.get(3)?,
                label: row.get(4)?,
                field_type: field_type.parse().unwrap_or(CustomFieldType::Unknown),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(user_id, category_id, count = definitions.len(), "Listed field definitions");
    Ok(definitions)
}

pub fn create_definition(
    conn: &Connection,
    definition: &NewCustomFieldDefinition,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO custom_field_definitions (user_id, record_type_id, category_id, label, field_type)
         VALUES (?, ?, ?, ?, ?)",
        params![
            definition.user_id,
            definition.record_type_id,
            definition.category_id,
            definition.label,
            definition.field_type.as_str()
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(field_id = id, label = %definition.label, "Created field definition");
    Ok(id)
}

/// Values for a whole set of transactions grouped by transaction id, queried
/// in chunks of `IN_CLAUSE_CHUNK` ids. Transactions without values are
/// absent from the map.
pub fn list_values_for_transactions(
    conn: &Connection,
    transaction_ids: &HashSet<i64>,
) -> rusqlite::Result<HashMap<i64, Vec<StoredFieldValue>>> {
    let mut grouped: HashMap<i64, Vec<StoredFieldValue>> = HashMap::new();
    let ids: Vec<i64> = transaction_ids.iter().copied().collect();

    for chunk in ids.chunks(IN_CLAUSE_CHUNK) {
        let sql = format!(
            "SELECT id, transaction_id, field_id, value
             FROM custom_field_values
             WHERE transaction_id IN ({})
             ORDER BY transaction_id, field_id, id",
            placeholders(chunk.len())
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
            Ok(StoredFieldValue {
                id: row.get(0)?,
                transaction_id: row.get(1)?,
                field_id: row.get(2)?,
                value: row.get(3)?,
            })
        })?;

        for row in rows {
            let value = row?;
            grouped.entry(value.transaction_id).or_default().push(value);
        }
    }

    debug!(transactions = transaction_ids.len(), with_values = grouped.len(), "Listed field values");
    Ok(grouped)
}

/// Insert or replace the stored text of one field on one transaction.
pub fn set_value(
    conn: &Connection,
    transaction_id: i64,
    field_id: i64,
    value: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO custom_field_values (transaction_id, field_id, value) VALUES (?, ?, ?)
         ON CONFLICT(transaction_id, field_id) DO UPDATE SET value = excluded.value",
        params![transaction_id, field_id, value],
    )?;
    debug!(transaction_id, field_id, "Stored field value");
    Ok(())
}
