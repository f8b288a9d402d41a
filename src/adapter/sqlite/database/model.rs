//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{changes, records};

/// Database row for a stored record.
#[derive(Queryable, QueryableByName, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecordRow {
    pub collection: String,
    pub business_id: String,
    pub payload: String,
    pub updated_at: i64,
}

/// Database row for a change log entry (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = changes)]
pub struct NewChangeRow<'a> {
    pub entity_type: &'a str,
    pub business_id: &'a str,
    pub operation: &'a str,
    pub source: &'a str,
    pub actor: Option<&'a str>,
    pub reason: Option<&'a str>,
    pub timestamp: i64,
}

/// Database row for a change log entry (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = changes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ChangeRow {
    pub id: i64,
    pub entity_type: String,
    pub business_id: String,
    pub operation: String,
    pub source: String,
    pub actor: Option<String>,
    pub reason: Option<String>,
    pub timestamp: i64,
}
