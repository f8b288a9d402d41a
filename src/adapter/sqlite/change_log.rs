//! SQLite change log.
//!
//! Appends one row to `changes` per accepted mutation. The facade calls
//! [`ChangeLog::append`] inside the same transaction as the record write, so
//! a failed append rolls the write back.

use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;

use super::database::model::{ChangeRow, NewChangeRow};
use super::database::schema::changes;
use crate::domain::change::{ChangeRecord, Operation, PendingChange};
use crate::error::{Error, Result};

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    #[diesel(column_name = "id")]
    id: i64,
}

/// Append-only change log over the `changes` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeLog;

impl ChangeLog {
    /// Append a change, stamping it with the current time.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn append(conn: &mut SqliteConnection, change: &PendingChange<'_>) -> Result<ChangeRecord> {
        let timestamp = Utc::now().timestamp_millis();
        let row = NewChangeRow {
            entity_type: change.entity_type,
            business_id: change.business_id,
            operation: change.operation.as_str(),
            source: &change.context.source,
            actor: change.context.actor.as_deref(),
            reason: change.context.reason.as_deref(),
            timestamp,
        };

        diesel::insert_into(changes::table)
            .values(&row)
            .execute(conn)?;

        let id = diesel::sql_query("SELECT last_insert_rowid() AS id")
            .get_result::<LastInsertRowId>(conn)?
            .id;

        Ok(ChangeRecord {
            id,
            entity_type: change.entity_type.to_string(),
            business_id: change.business_id.to_string(),
            operation: change.operation,
            source: change.context.source.clone(),
            actor: change.context.actor.clone(),
            reason: change.context.reason.clone(),
            timestamp,
        })
    }

    /// Changes with an id greater than `after`, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored operation is unknown.
    pub fn list(
        conn: &mut SqliteConnection,
        after: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<ChangeRecord>> {
        let mut query = changes::table
            .select(ChangeRow::as_select())
            .order(changes::id.asc())
            .into_boxed();
        if let Some(after) = after {
            query = query.filter(changes::id.gt(after));
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let rows: Vec<ChangeRow> = query.load(conn)?;
        rows.into_iter().map(Self::from_row).collect()
    }

    /// Changes recorded for one record, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored operation is unknown.
    pub fn for_record(
        conn: &mut SqliteConnection,
        entity_type: &str,
        business_id: &str,
    ) -> Result<Vec<ChangeRecord>> {
        let rows: Vec<ChangeRow> = changes::table
            .filter(changes::entity_type.eq(entity_type))
            .filter(changes::business_id.eq(business_id))
            .select(ChangeRow::as_select())
            .order(changes::id.asc())
            .load(conn)?;
        rows.into_iter().map(Self::from_row).collect()
    }

    /// Total number of changes recorded.
    ///
    /// # Errors
    /// Returns an error if the count fails.
    pub fn count(conn: &mut SqliteConnection) -> Result<i64> {
        Ok(changes::table.count().get_result(conn)?)
    }

    fn from_row(row: ChangeRow) -> Result<ChangeRecord> {
        let operation: Operation = row
            .operation
            .parse()
            .map_err(|e: String| Error::Storage(format!("change #{}: {e}", row.id)))?;
        Ok(ChangeRecord {
            id: row.id,
            entity_type: row.entity_type,
            business_id: row.business_id,
            operation,
            source: row.source,
            actor: row.actor,
            reason: row.reason,
            timestamp: row.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::sqlite::database::connection::MIGRATIONS;
    use crate::domain::context::MutationContext;
    use diesel_migrations::MigrationHarness;

    fn setup() -> SqliteConnection {
        let mut conn = SqliteConnection::establish(":memory:").expect("open in-memory db");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Failed to run migrations");
        conn
    }

    fn append(conn: &mut SqliteConnection, id: &str, operation: Operation) -> ChangeRecord {
        let ctx = MutationContext::new("sync").with_actor("peer-1");
        ChangeLog::append(
            conn,
            &PendingChange {
                entity_type: "task",
                business_id: id,
                operation,
                context: &ctx,
            },
        )
        .unwrap()
    }

    #[test]
    fn append_assigns_increasing_ids_and_timestamp() {
        let mut conn = setup();
        let before = Utc::now().timestamp_millis();

        let first = append(&mut conn, "t-1", Operation::Create);
        let second = append(&mut conn, "t-1", Operation::Update);

        assert!(second.id > first.id);
        assert!(first.timestamp >= before);
        assert_eq!(first.source, "sync");
        assert_eq!(first.actor.as_deref(), Some("peer-1"));
        assert!(first.reason.is_none());
    }

    #[test]
    fn list_returns_changes_in_append_order() {
        let mut conn = setup();
        append(&mut conn, "t-1", Operation::Create);
        append(&mut conn, "t-1", Operation::Update);
        append(&mut conn, "t-2", Operation::Delete);

        let all = ChangeLog::list(&mut conn, None, None).unwrap();
        let ops: Vec<_> = all
            .iter()
            .map(|c| (c.operation, c.business_id.as_str()))
            .collect();
        assert_eq!(
            ops,
            vec![
                (Operation::Create, "t-1"),
                (Operation::Update, "t-1"),
                (Operation::Delete, "t-2"),
            ]
        );
    }

    #[test]
    fn list_pages_with_after_and_limit() {
        let mut conn = setup();
        let first = append(&mut conn, "a", Operation::Create);
        append(&mut conn, "b", Operation::Create);
        append(&mut conn, "c", Operation::Create);

        let page = ChangeLog::list(&mut conn, Some(first.id), Some(1)).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].business_id, "b");
        assert_eq!(ChangeLog::count(&mut conn).unwrap(), 3);
    }

    #[test]
    fn for_record_filters_by_entity_and_id() {
        let mut conn = setup();
        append(&mut conn, "t-1", Operation::Create);
        append(&mut conn, "t-2", Operation::Create);
        append(&mut conn, "t-1", Operation::Delete);

        let history = ChangeLog::for_record(&mut conn, "task", "t-1").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].operation, Operation::Delete);
    }

    #[test]
    fn unknown_operation_is_a_storage_error() {
        let mut conn = setup();
        diesel::sql_query(
            "INSERT INTO changes (entity_type, business_id, operation, source, timestamp) VALUES ('task', 't-1', 'PATCH', 'ui', 0)",
        )
        .execute(&mut conn)
        .unwrap();

        let result = ChangeLog::list(&mut conn, None, None);
        assert!(matches!(result, Err(Error::Storage(_))));
    }
}
