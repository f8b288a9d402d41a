//! Record subcommands: create, update, delete, get and query.

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;
use tabled::Tabled;

use super::output;
use super::command::{CreateArgs, DeleteArgs, GetArgs, Provenance, QueryArgs, Target, UpdateArgs};
use crate::domain::context::MutationContext;
use crate::domain::document::Document;
use crate::domain::entity::EntityDescriptor;
use crate::store::facade::StoreFacade;
use crate::store::registry::StoreRegistry;

#[derive(Tabled)]
struct DocumentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Fields")]
    fields: String,
}

impl From<&Document> for DocumentRow {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.business_id.clone(),
            fields: Value::Object(doc.fields.clone()).to_string(),
        }
    }
}

fn open(
    registry: &StoreRegistry,
    target: &Target,
) -> Result<(Arc<StoreFacade>, EntityDescriptor<Document>)> {
    let store = registry
        .get_or_create(&target.store)
        .with_context(|| format!("failed to open store '{}'", target.store))?;
    Ok((store, EntityDescriptor::named(target.entity.clone())))
}

fn context(provenance: &Provenance) -> MutationContext {
    MutationContext {
        source: provenance.source.clone(),
        actor: provenance.actor.clone(),
        reason: provenance.reason.clone(),
    }
}

/// The payload argument, or standard input when it is absent or `-`.
fn read_payload(arg: Option<&str>) -> Result<Vec<u8>> {
    match arg {
        Some(text) if text != "-" => Ok(text.as_bytes().to_vec()),
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read payload from stdin")?;
            Ok(buf)
        }
    }
}

pub fn create(registry: &StoreRegistry, args: &CreateArgs) -> Result<()> {
    let payload = read_payload(args.payload.as_deref())?;
    let (store, entity) = open(registry, &args.target)?;
    let id = store.create(&entity, &payload, &context(&args.provenance))?;
    output::value("created", "businessId", id);
    Ok(())
}

pub fn update(registry: &StoreRegistry, args: &UpdateArgs) -> Result<()> {
    let payload = read_payload(args.payload.as_deref())?;
    let (store, entity) = open(registry, &args.target)?;
    store.update(&entity, &args.id, &payload, &context(&args.provenance))?;
    output::success(&format!("Updated {}/{}", entity.name(), output::highlight(&args.id)));
    Ok(())
}

pub fn delete(registry: &StoreRegistry, args: &DeleteArgs) -> Result<()> {
    let (store, entity) = open(registry, &args.target)?;
    store.delete(&entity, &args.id, &context(&args.provenance))?;
    output::success(&format!("Deleted {}/{}", entity.name(), output::highlight(&args.id)));
    Ok(())
}

pub fn get(registry: &StoreRegistry, args: &GetArgs) -> Result<()> {
    let (store, entity) = open(registry, &args.target)?;
    match store.get(&entity, &args.id)? {
        Some(doc) => {
            let rows = [DocumentRow::from(&doc)];
            output::items("record", std::slice::from_ref(&doc), rows, "");
            Ok(())
        }
        None => anyhow::bail!("no {} record with id '{}'", entity.name(), args.id),
    }
}

pub fn query(registry: &StoreRegistry, args: &QueryArgs) -> Result<()> {
    let filters = super::filter::parse_all(&args.eq, &args.is_in, &args.gt, &args.lt)?;
    let (store, entity) = open(registry, &args.target)?;
    let docs = store.query(&entity, &filters)?;

    output::items(
        "record",
        &docs,
        docs.iter().map(DocumentRow::from),
        &format!("No {} records", entity.name()),
    );
    if !output::is_json() && !docs.is_empty() {
        output::note(&format!("{} record(s)", docs.len()));
    }
    Ok(())
}
