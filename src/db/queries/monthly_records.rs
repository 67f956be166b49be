use crate::amount_utils::{amount_from_sql, optional_amount_from_sql};
use crate::models::monthly_record::{MonthlyRecord, NewMonthlyRecord};
use rusqlite::{params, Connection};
use tracing::debug;

/// Records of one category, scoped to its owner, oldest month first.
pub fn list_monthly_records(
    conn: &Connection,
    user_id: i64,
    category_id: i64,
) -> rusqlite::Result<Vec<MonthlyRecord>> {
    let mut stmt = conn.prepare(
        "SELECT mr.id, mr.category_id, mr.title, mr.goal, mr.initial_balance,
                mr.month, mr.year, mr.status
         FROM monthly_records mr
         JOIN categories c ON mr.category_id = c.id
         WHERE c.user_id = ? AND mr.category_id = ?
         ORDER BY mr.year, mr.month, mr.id",
    )?;

    let records = stmt
        .query_map([user_id, category_id], |row| {
            Ok(MonthlyRecord {
                id: row.get(0)?,
                category_id: row.get(1)?,
                title: row.get(2)?,
                goal: optional_amount_from_sql(row.get_ref(3)?),
                initial_balance: amount_from_sql(row.get_ref(4)?),
                month: row.get(5)?,
                year: row.get(6)?,
                status: row.get(7)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(user_id, category_id, count = records.len(), "Listed monthly records");
    Ok(records)
}

pub fn create_monthly_record(
    conn: &Connection,
    record: &NewMonthlyRecord,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO monthly_records (category_id, title, goal, initial_balance, month, year, status)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            record.category_id,
            record.title,
            record.goal,
            record.initial_balance,
            record.month,
            record.year,
            record.status
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(monthly_record_id = id, title = %record.title, "Created monthly record");
    Ok(id)
}
