//! Relational store primitives
//!
//! Two primitives cover everything the maintenance tooling needs:
//! - read rows for a column projection, invoking a callback per row
//! - apply a batch of parameterized updates inside one transaction
//!
//! Table and column names cannot be bound as parameters, so they are
//! validated as plain identifiers before being interpolated.

use crate::{Error, Result};
use futures::TryStreamExt;
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use tracing::debug;

/// Reject anything that is not a plain SQL identifier
pub fn validate_identifier(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(name)
    } else {
        Err(Error::InvalidInput(format!("invalid SQL identifier: {:?}", name)))
    }
}

fn projection(columns: &[&str]) -> Result<String> {
    if columns.is_empty() {
        return Err(Error::InvalidInput("empty column projection".to_string()));
    }
    let columns = columns
        .iter()
        .map(|c| validate_identifier(c))
        .collect::<Result<Vec<_>>>()?;
    Ok(columns.join(","))
}

/// Read a single text value, e.g. with `modifier = "LIMIT 1"`
///
/// Returns `None` when no row matches or the value is NULL. Non-text values
/// are cast, so numeric columns read back as their decimal text.
pub async fn read_string(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    modifier: &str,
) -> Result<Option<String>> {
    let sql = format!(
        "SELECT CAST({} AS TEXT) FROM {} {}",
        validate_identifier(column)?,
        validate_identifier(table)?,
        modifier
    );

    let value: Option<Option<String>> = sqlx::query_scalar(&sql).fetch_optional(pool).await?;
    Ok(value.flatten())
}

/// Stream every row of `table` projected onto `columns` through `on_row`
///
/// Rows are delivered in storage order; returns the number of rows read.
/// The callback cannot fail the read: per-row problems are the caller's to record.
pub async fn read_rows<F>(
    pool: &SqlitePool,
    table: &str,
    columns: &[&str],
    modifier: &str,
    mut on_row: F,
) -> Result<u64>
where
    F: FnMut(&SqliteRow),
{
    let sql = format!(
        "SELECT {} FROM {} {}",
        projection(columns)?,
        validate_identifier(table)?,
        modifier
    );

    let mut rows = sqlx::query(&sql).fetch(pool);
    let mut count = 0u64;
    while let Some(row) = rows.try_next().await? {
        on_row(&row);
        count += 1;
    }

    debug!("Read {} rows from {}", count, table);
    Ok(count)
}

/// Apply `UPDATE table SET set_column = value WHERE key_column = key` for every
/// `(key, value)` pair in one transaction
///
/// Either every update lands or none does: any failure drops the transaction,
/// which rolls it back. Returns the number of rows affected.
pub async fn update_batch(
    pool: &SqlitePool,
    table: &str,
    set_column: &str,
    key_column: &str,
    updates: &[(i64, i64)],
) -> Result<u64> {
    let sql = format!(
        "UPDATE {} SET {}=? WHERE {}=?",
        validate_identifier(table)?,
        validate_identifier(set_column)?,
        validate_identifier(key_column)?
    );

    let mut tx = pool.begin().await?;
    let mut affected = 0u64;
    for (key, value) in updates {
        let result = sqlx::query(&sql).bind(value).bind(key).execute(&mut *tx).await?;
        affected += result.rows_affected();
    }
    tx.commit().await?;

    Ok(affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::Row;

    async fn setup_players() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query("CREATE TABLE Players (ID INTEGER PRIMARY KEY, Name TEXT, TimeSpent TEXT)")
            .execute(&pool)
            .await
            .unwrap();

        for (id, name, time) in [(1, "alice", "10"), (2, "bob", "20"), (3, "carol", "30")] {
            sqlx::query("INSERT INTO Players (ID, Name, TimeSpent) VALUES (?, ?, ?)")
                .bind(id)
                .bind(name)
                .bind(time)
                .execute(&pool)
                .await
                .unwrap();
        }
        pool
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("Players").is_ok());
        assert!(validate_identifier("time_spent2").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("2col").is_err());
        assert!(validate_identifier("Players; DROP TABLE x").is_err());
    }

    #[tokio::test]
    async fn test_read_string_first_row() {
        let pool = setup_players().await;
        let value = read_string(&pool, "Players", "TimeSpent", "ORDER BY ID LIMIT 1")
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some("10"));
    }

    #[tokio::test]
    async fn test_read_string_empty_table() {
        let pool = setup_players().await;
        sqlx::query("DELETE FROM Players").execute(&pool).await.unwrap();

        let value = read_string(&pool, "Players", "TimeSpent", "LIMIT 1").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_read_rows_invokes_callback_per_row() {
        let pool = setup_players().await;
        let mut names = Vec::new();

        let count = read_rows(&pool, "Players", &["ID", "Name"], "ORDER BY ID", |row| {
            names.push(row.get::<String, _>(1));
        })
        .await
        .unwrap();

        assert_eq!(count, 3);
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_read_rows_rejects_bad_projection() {
        let pool = setup_players().await;
        let result = read_rows(&pool, "Players", &["ID, Name"], "", |_| {}).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_update_batch_applies_all() {
        let pool = setup_players().await;
        let affected = update_batch(&pool, "Players", "TimeSpent", "ID", &[(1, 100), (3, 300)])
            .await
            .unwrap();
        assert_eq!(affected, 2);

        let values: Vec<String> = sqlx::query_scalar("SELECT TimeSpent FROM Players ORDER BY ID")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(values, vec!["100", "20", "300"]);
    }

    #[tokio::test]
    async fn test_update_batch_rolls_back_on_failure() {
        let pool = setup_players().await;
        sqlx::query(
            r#"
            CREATE TRIGGER reject_bob BEFORE UPDATE ON Players
            WHEN NEW.ID = 2
            BEGIN
                SELECT RAISE(ABORT, 'rejected');
            END
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let result = update_batch(&pool, "Players", "TimeSpent", "ID", &[(1, 100), (2, 200)]).await;
        assert!(matches!(result, Err(Error::Database(_))));

        // First update must not survive
        let first: String = sqlx::query_scalar("SELECT TimeSpent FROM Players WHERE ID = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(first, "10");
    }
}
