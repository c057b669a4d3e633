use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::MySqlConnection;


/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    U64(u64),
    Decimal(Decimal),
    Bool(bool),
    Json(Value),
    Null,
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::String(value.to_string())
    }
}

impl From<Option<u64>> for SqlValue {
    fn from(value: Option<u64>) -> Self {
        value.map_or(SqlValue::Null, SqlValue::U64)
    }
}


/// ===============================
/// SQL insert container
/// ===============================
#[derive(Debug)]
pub struct SqlInsert {
    pub sql: String,
    pub values: Vec<SqlValue>,
}


/// ===============================
/// Build multi-row INSERT SQL
/// ===============================
/// Returns `None` when there is nothing to insert. Every row has exactly
/// one value per column.
pub fn build_insert_sql<const N: usize>(
    table: &str,
    columns: [&str; N],
    rows: Vec<[SqlValue; N]>,
) -> Option<SqlInsert> {
    if rows.is_empty() || N == 0 {
        return None;
    }

    let placeholders = format!("({})", vec!["?"; N].join(", "));
    let sql = format!(
        "INSERT INTO {} ({}) VALUES {}",
        table,
        columns.join(", "),
        vec![placeholders.as_str(); rows.len()].join(", ")
    );

    let values = rows.into_iter().flatten().collect();

    Some(SqlInsert { sql, values })
}


/// ===============================
/// Execute the insert
/// ===============================
pub async fn execute_insert(
    conn: &mut MySqlConnection,
    insert: SqlInsert,
) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&insert.sql);

    for value in insert.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::U64(v) => query.bind(v),
            SqlValue::Decimal(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Json(v) => query.bind(sqlx::types::Json(v)),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(conn).await?;
    Ok(result.rows_affected())
}
