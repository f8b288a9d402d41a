//! Translation of filter predicates into SQL over stored JSON payloads.
//!
//! Records live in one `records` table as JSON objects. A predicate on field
//! `a.b` becomes a typed comparison on `json_extract(payload, '$."a"."b"')`,
//! guarded by `json_type` so that, say, a string `"5"` never equals the
//! integer `5`. Predicates on the record type's identifier field compare the
//! indexed `business_id` column instead.

use diesel::query_builder::BoxedSqlQuery;
use diesel::sql_types::{BigInt, Text};
use diesel::sqlite::Sqlite;

use crate::domain::filter::{Predicate, Scalar};

/// A value bound to a `?` placeholder, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bind {
    Text(String),
    Integer(i64),
}

/// Parameterized SQL ready to be handed to Diesel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlPlan {
    pub sql: String,
    pub binds: Vec<Bind>,
}

impl SqlPlan {
    /// Box the plan into a Diesel query with its binds attached.
    #[must_use]
    pub fn into_query<'f>(self) -> BoxedSqlQuery<'f, Sqlite, diesel::query_builder::SqlQuery> {
        let mut query = diesel::sql_query(self.sql).into_boxed::<Sqlite>();
        for bind in self.binds {
            query = match bind {
                Bind::Text(value) => query.bind::<Text, _>(value),
                Bind::Integer(value) => query.bind::<BigInt, _>(value),
            };
        }
        query
    }
}

/// JSON path for a dotted field name, each segment quoted.
#[must_use]
pub fn json_path(field: &str) -> String {
    let mut path = String::from("$");
    for segment in field.split('.') {
        path.push_str(".\"");
        path.push_str(segment);
        path.push('"');
    }
    path
}

/// Build the `SELECT` for all records of `collection` matching every
/// predicate. Results are ordered by business identifier.
#[must_use]
pub fn select_records(collection: &str, id_field: &str, predicates: &[Predicate]) -> SqlPlan {
    let mut sql = String::from(
        "SELECT collection, business_id, payload, updated_at FROM records WHERE collection = ?",
    );
    let mut binds = vec![Bind::Text(collection.to_string())];

    for predicate in predicates {
        sql.push_str(" AND ");
        if predicate.field() == id_field {
            if let Some(clause) = identifier_clause(predicate, &mut binds) {
                sql.push_str(&clause);
                continue;
            }
        }
        sql.push_str(&payload_clause(predicate, &mut binds));
    }

    sql.push_str(" ORDER BY business_id");
    SqlPlan { sql, binds }
}

/// Text comparisons on the identifier use the column. Anything else on that
/// field falls back to the payload, where it simply will not match.
fn identifier_clause(predicate: &Predicate, binds: &mut Vec<Bind>) -> Option<String> {
    match predicate {
        Predicate::Eq {
            value: Scalar::Text(id),
            ..
        } => {
            binds.push(Bind::Text(id.clone()));
            Some("business_id = ?".into())
        }
        Predicate::In { values, .. } => {
            let ids: Vec<&String> = values
                .iter()
                .filter_map(|v| match v {
                    Scalar::Text(id) => Some(id),
                    _ => None,
                })
                .collect();
            if ids.len() != values.len() {
                return None;
            }
            binds.extend(ids.into_iter().map(|id| Bind::Text(id.clone())));
            Some(format!("business_id IN ({})", placeholders(values.len())))
        }
        _ => None,
    }
}

fn payload_clause(predicate: &Predicate, binds: &mut Vec<Bind>) -> String {
    let path = json_path(predicate.field());
    match predicate {
        Predicate::Eq {
            value: Scalar::Boolean(flag),
            ..
        } => {
            binds.push(Bind::Text(path));
            let json_type = if *flag { "true" } else { "false" };
            format!("json_type(payload, ?) = '{json_type}'")
        }
        Predicate::Eq { value, .. } => {
            binds.push(Bind::Text(path.clone()));
            binds.push(Bind::Text(path));
            binds.push(scalar_bind(value));
            format!(
                "(json_type(payload, ?) = '{}' AND json_extract(payload, ?) = ?)",
                scalar_json_type(value)
            )
        }
        Predicate::In { values, .. } => {
            let json_type = values.first().map_or("text", scalar_json_type);
            binds.push(Bind::Text(path.clone()));
            binds.push(Bind::Text(path));
            binds.extend(values.iter().map(scalar_bind));
            format!(
                "(json_type(payload, ?) = '{json_type}' AND json_extract(payload, ?) IN ({}))",
                placeholders(values.len())
            )
        }
        Predicate::Gt { bound, .. } | Predicate::Lt { bound, .. } => {
            let op = if matches!(predicate, Predicate::Gt { .. }) {
                ">"
            } else {
                "<"
            };
            binds.push(Bind::Text(path.clone()));
            binds.push(Bind::Text(path));
            binds.push(Bind::Integer(*bound));
            format!(
                "(json_type(payload, ?) IN ('integer', 'real') AND json_extract(payload, ?) {op} ?)"
            )
        }
    }
}

fn scalar_bind(value: &Scalar) -> Bind {
    match value {
        Scalar::Text(s) => Bind::Text(s.clone()),
        Scalar::Integer(i) => Bind::Integer(*i),
        Scalar::Boolean(b) => Bind::Integer(i64::from(*b)),
    }
}

fn scalar_json_type(value: &Scalar) -> &'static str {
    match value {
        Scalar::Text(_) => "text",
        Scalar::Integer(_) => "integer",
        Scalar::Boolean(true) => "true",
        Scalar::Boolean(false) => "false",
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
