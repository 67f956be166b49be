use std::collections::HashMap;

use crate::amount_utils::amount_from_sql;
use crate::db::queries::{placeholders, IN_CLAUSE_CHUNK};
use crate::models::transaction::{NewTransaction, Transaction};
use rusqlite::{params, params_from_iter, Connection};
use tracing::debug;

/// Transactions of several monthly records grouped by record id, queried in
/// chunks of `IN_CLAUSE_CHUNK` ids. Each group is ordered by date, then id.
pub fn list_transactions_for_records(
    conn: &Connection,
    record_ids: &[i64],
) -> rusqlite::Result<HashMap<i64, Vec<Transaction>>> {
    let mut grouped: HashMap<i64, Vec<Transaction>> = HashMap::new();
    let mut count = 0;

    // A record's transactions all come back from the chunk holding its id.
    for chunk in record_ids.chunks(IN_CLAUSE_CHUNK) {
        let sql = format!(
            "SELECT id, monthly_record_id, title, description, amount, transaction_date
             FROM transactions
             WHERE monthly_record_id IN ({})
             ORDER BY transaction_date, id",
            placeholders(chunk.len())
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
            Ok(Transaction {
                id: row.get(0)?,
                monthly_record_id: row.get(1)?,
                title: row.get(2)?,
                description: row.get(3)?,
                amount: amount_from_sql(row.get_ref(4)?),
                transaction_date: row.get(5)?,
            })
        })?;

        for row in rows {
            let transaction = row?;
            grouped
                .entry(transaction.monthly_record_id)
                .or_default()
                .push(transaction);
            count += 1;
        }
    }

    debug!(records = record_ids.len(), count, "Listed transactions");
    Ok(grouped)
}

pub fn create_transaction(conn: &Connection, transaction: &NewTransaction) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO transactions (monthly_record_id, title, description, amount, transaction_date)
         VALUES (?, ?, ?, ?, ?)",
        params![
            transaction.monthly_record_id,
            transaction.title,
            transaction.description,
            transaction.amount,
            transaction.transaction_date
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(transaction_id = id, "Created transaction");
    Ok(id)
}
