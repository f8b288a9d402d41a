//! SQLite record collections.
//!
//! Resolves records by business identifier, never by a storage key. Each
//! collection is the set of `records` rows sharing a collection name; the
//! record itself is kept as a JSON object in the `payload` column.
//!
//! No validation happens here: callers hand in records whose identity has
//! already been checked, and change recording is left to the caller.

use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;

use super::database::model::RecordRow;
use super::database::schema::records;
use super::query::select_records;
use crate::domain::entity::Record;
use crate::domain::filter::Predicate;
use crate::error::{Error, Result};

/// One named collection of records of type `T`'s shape.
#[derive(Debug, Clone, Copy)]
pub struct Collection<'a> {
    name: &'a str,
    id_field: &'a str,
}

impl<'a> Collection<'a> {
    #[must_use]
    pub fn new(name: &'a str, id_field: &'a str) -> Self {
        Self { name, id_field }
    }

    /// Insert the record, replacing any record with the same identifier.
    ///
    /// # Errors
    /// Returns an error if the record cannot be encoded or written.
    pub fn put<T: Record>(&self, conn: &mut SqliteConnection, record: &T) -> Result<()> {
        let payload = serde_json::to_string(record)
            .map_err(|e| Error::Storage(format!("failed to encode record: {e}")))?;
        let row = RecordRow {
            collection: self.name.to_string(),
            business_id: record.business_id().to_string(),
            payload,
            updated_at: Utc::now().timestamp_millis(),
        };

        diesel::replace_into(records::table)
            .values(&row)
            .execute(conn)?;
        Ok(())
    }

    /// Remove every record whose identifier is in `ids`. Returns how many
    /// were removed; zero matches is not an error.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn remove_by_ids(&self, conn: &mut SqliteConnection, ids: &[String]) -> Result<usize> {
        let in_collection = records::table.filter(records::collection.eq(self.name));
        let removed = match ids {
            [] => 0,
            [id] => diesel::delete(in_collection.filter(records::business_id.eq(id)))
                .execute(conn)?,
            _ => diesel::delete(in_collection.filter(records::business_id.eq_any(ids)))
                .execute(conn)?,
        };
        Ok(removed)
    }

    /// All records matching every predicate, ordered by identifier.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored record no longer
    /// decodes as `T`.
    pub fn query<T: Record>(
        &self,
        conn: &mut SqliteConnection,
        predicates: &[Predicate],
    ) -> Result<Vec<T>> {
        let rows: Vec<RecordRow> = select_records(self.name, self.id_field, predicates)
            .into_query()
            .load(conn)?;
        rows.into_iter().map(decode).collect()
    }

    /// The record with exactly this identifier, if any.
    ///
    /// # Errors
    /// Returns an error if the lookup fails or the stored record no longer
    /// decodes as `T`.
    pub fn get_by_id<T: Record>(&self, conn: &mut SqliteConnection, id: &str) -> Result<Option<T>> {
        let row: Option<RecordRow> = records::table
            .find((self.name, id))
            .select(RecordRow::as_select())
            .first(conn)
            .optional()?;
        row.map(decode).transpose()
    }

    /// Number of records in the collection.
    ///
    /// # Errors
    /// Returns an error if the count fails.
    pub fn count(&self, conn: &mut SqliteConnection) -> Result<i64> {
        let count = records::table
            .filter(records::collection.eq(self.name))
            .count()
            .get_result(conn)?;
        Ok(count)
    }
}

fn decode<T: Record>(row: RecordRow) -> Result<T> {
    serde_json::from_str(&row.payload).map_err(|e| {
        Error::Storage(format!(
            "stored record {}/{} does not decode: {e}",
            row.collection, row.business_id
        ))
    })
}
