pub mod categories;
pub mod custom_fields;
pub mod monthly_records;
pub mod record_types;
pub mod transactions;
pub mod users;

/// Upper bound on ids bound into one `IN (...)` clause. SQLite rejects
/// statements with more than 32766 variables.
pub(crate) const IN_CLAUSE_CHUNK: usize = 500;

/// `?, ?, ?` with one placeholder per id, for `IN (...)` clauses.
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
