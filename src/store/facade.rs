//! The store facade: the only way records get in or out of a store.
//!
//! Every mutation follows the same pipeline:
//!
//! 1. resolve the record type's identity binding,
//! 2. decode the payload with the store's [`Serializer`],
//! 3. validate the business identifier,
//! 4. in one immediate transaction, write the record and append the change.
//!
//! Validation failures return before a connection is checked out, and the
//! write and the change record commit together or not at all.

use std::sync::Arc;

use diesel::SqliteConnection;
use tracing::{debug, warn};

use super::handle::StoreHandle;
use super::identity::{IdentityTable, TypeBinding};
use crate::adapter::json::JsonSerializer;
use crate::adapter::sqlite::change_log::ChangeLog;
use crate::adapter::sqlite::collection::Collection;
use crate::domain::change::{ChangeRecord, Operation, PendingChange};
use crate::domain::context::MutationContext;
use crate::domain::entity::{EntityDescriptor, Record};
use crate::domain::filter::{compile, Filter};
use crate::error::{Error, Result};
use crate::port::serializer::Serializer;

/// Controlled entry point for one named store.
#[derive(Debug)]
pub struct StoreFacade<S: Serializer = JsonSerializer> {
    handle: StoreHandle,
    serializer: Arc<S>,
    identities: IdentityTable,
}

impl<S: Serializer> StoreFacade<S> {
    #[must_use]
    pub fn new(handle: StoreHandle, serializer: Arc<S>) -> Self {
        Self {
            handle,
            serializer,
            identities: IdentityTable::new(),
        }
    }

    /// Name of the store this facade writes to.
    #[must_use]
    pub fn name(&self) -> &str {
        self.handle.name()
    }

    #[must_use]
    pub fn handle(&self) -> &StoreHandle {
        &self.handle
    }

    #[must_use]
    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    /// Decode `payload` as a `T`, store it and record a `CREATE`.
    ///
    /// A record with the same identifier is replaced.
    ///
    /// # Errors
    /// Returns [`Error::Payload`] if the payload does not decode,
    /// [`Error::InvalidIdentifier`] if its identifier is blank, or a storage
    /// error if the write fails.
    pub fn create<T: Record>(
        &self,
        entity: &EntityDescriptor<T>,
        payload: &[u8],
        ctx: &MutationContext,
    ) -> Result<String> {
        let binding = self.identities.resolve(entity)?;
        let record: T = self.decode(entity, payload)?;
        let business_id = require_identifier(entity.name(), record.business_id())?.to_string();

        debug!(
            store = %self.name(),
            entity = %entity.name(),
            business_id = %business_id,
            source = %ctx.source,
            actor = ?ctx.actor,
            reason = ?ctx.reason,
            "CREATE"
        );
        self.write(entity, &binding, &record, Operation::Create, ctx)?;
        Ok(business_id)
    }

    /// Replace the record `business_id` with the decoded payload and record
    /// an `UPDATE`.
    ///
    /// # Errors
    /// Returns [`Error::IdentifierMismatch`] if the payload carries another
    /// identifier, [`Error::Payload`] if it does not decode, or a storage
    /// error if the write fails.
    pub fn update<T: Record>(
        &self,
        entity: &EntityDescriptor<T>,
        business_id: &str,
        payload: &[u8],
        ctx: &MutationContext,
    ) -> Result<()> {
        let binding = self.identities.resolve(entity)?;
        require_identifier(entity.name(), business_id)?;
        let record: T = self.decode(entity, payload)?;
        if record.business_id() != business_id {
            return Err(Error::IdentifierMismatch {
                expected: business_id.to_string(),
                actual: record.business_id().to_string(),
            });
        }

        debug!(
            store = %self.name(),
            entity = %entity.name(),
            business_id = %business_id,
            source = %ctx.source,
            actor = ?ctx.actor,
            reason = ?ctx.reason,
            "UPDATE"
        );
        self.write(entity, &binding, &record, Operation::Update, ctx)
    }

    /// Remove the record `business_id` and record a `DELETE`, whether or not
    /// the record existed.
    ///
    /// # Errors
    /// Returns [`Error::InvalidIdentifier`] for a blank identifier, or a
    /// storage error if the delete fails.
    pub fn delete<T: Record>(
        &self,
        entity: &EntityDescriptor<T>,
        business_id: &str,
        ctx: &MutationContext,
    ) -> Result<()> {
        let binding = self.identities.resolve(entity)?;
        require_identifier(entity.name(), business_id)?;

        debug!(
            store = %self.name(),
            entity = %entity.name(),
            business_id = %business_id,
            source = %ctx.source,
            actor = ?ctx.actor,
            reason = ?ctx.reason,
            "DELETE"
        );
        let collection = Collection::new(entity.name(), binding.id_field);
        let ids = [business_id.to_string()];
        self.in_transaction(entity.name(), business_id, Operation::Delete, |conn| {
            let removed = collection.remove_by_ids(conn, &ids)?;
            let change = ChangeLog::append(
                conn,
                &PendingChange {
                    entity_type: entity.name(),
                    business_id,
                    operation: Operation::Delete,
                    context: ctx,
                },
            )?;
            debug!(change_id = change.id, removed, "Change recorded");
            Ok(())
        })
    }

    /// Records matching every filter. Has no change-log side effect.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedFilterValue`] or
    /// [`Error::InvalidFilterField`] for a bad filter, before any storage
    /// access, or a storage error if the query fails.
    pub fn query<T: Record>(
        &self,
        entity: &EntityDescriptor<T>,
        filters: &[Filter],
    ) -> Result<Vec<T>> {
        let binding = self.identities.resolve(entity)?;
        let predicates = compile(filters)?;

        debug!(
            store = %self.name(),
            entity = %entity.name(),
            filters = %display_filters(filters),
            "QUERY"
        );
        let mut conn = self.handle.connection()?;
        Collection::new(entity.name(), binding.id_field).query(&mut conn, &predicates)
    }

    /// The record with this identifier, if present.
    ///
    /// # Errors
    /// Returns a storage error if the lookup fails.
    pub fn get<T: Record>(
        &self,
        entity: &EntityDescriptor<T>,
        business_id: &str,
    ) -> Result<Option<T>> {
        let binding = self.identities.resolve(entity)?;
        debug!(
            store = %self.name(),
            entity = %entity.name(),
            business_id = %business_id,
            "GET"
        );
        let mut conn = self.handle.connection()?;
        Collection::new(entity.name(), binding.id_field).get_by_id(&mut conn, business_id)
    }

    /// Change records with an id greater than `after`, oldest first.
    ///
    /// # Errors
    /// Returns a storage error if the read fails.
    pub fn changes(&self, after: Option<i64>, limit: Option<i64>) -> Result<Vec<ChangeRecord>> {
        let mut conn = self.handle.connection()?;
        ChangeLog::list(&mut conn, after, limit)
    }

    /// Change records for one record, oldest first.
    ///
    /// # Errors
    /// Returns a storage error if the read fails.
    pub fn history<T: Record>(
        &self,
        entity: &EntityDescriptor<T>,
        business_id: &str,
    ) -> Result<Vec<ChangeRecord>> {
        let mut conn = self.handle.connection()?;
        ChangeLog::for_record(&mut conn, entity.name(), business_id)
    }

    /// # Errors
    /// Returns a storage error if the count fails.
    pub fn change_count(&self) -> Result<i64> {
        let mut conn = self.handle.connection()?;
        ChangeLog::count(&mut conn)
    }

    fn decode<T: Record>(&self, entity: &EntityDescriptor<T>, payload: &[u8]) -> Result<T> {
        self.serializer
            .deserialize(payload)
            .map_err(|reason| Error::Payload {
                entity: entity.name().to_string(),
                reason,
            })
    }

    fn write<T: Record>(
        &self,
        entity: &EntityDescriptor<T>,
        binding: &TypeBinding,
        record: &T,
        operation: Operation,
        ctx: &MutationContext,
    ) -> Result<()> {
        let collection = Collection::new(entity.name(), binding.id_field);
        let business_id = record.business_id();
        self.in_transaction(entity.name(), business_id, operation, |conn| {
            collection.put(conn, record)?;
            let change = ChangeLog::append(
                conn,
                &PendingChange {
                    entity_type: entity.name(),
                    business_id,
                    operation,
                    context: ctx,
                },
            )?;
            debug!(change_id = change.id, "Change recorded");
            Ok(())
        })
    }

    fn in_transaction<F>(
        &self,
        entity: &str,
        business_id: &str,
        operation: Operation,
        f: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<()>,
    {
        let result = self
            .handle
            .connection()
            .and_then(|mut conn| conn.immediate_transaction(f));
        if let Err(e) = &result {
            warn!(
                store = %self.name(),
                entity = %entity,
                business_id = %business_id,
                operation = %operation,
                error = %e,
                "Mutation failed"
            );
        }
        result
    }
}

fn require_identifier<'a>(entity: &str, business_id: &'a str) -> Result<&'a str> {
    if business_id.trim().is_empty() {
        return Err(Error::InvalidIdentifier {
            entity: entity.to_string(),
            reason: "business identifier is missing, not a string, or blank".into(),
        });
    }
    Ok(business_id)
}

fn display_filters(filters: &[Filter]) -> String {
    let parts: Vec<String> = filters.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}
