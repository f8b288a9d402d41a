//! The `changes` subcommand.

use anyhow::{Context, Result};
use tabled::Tabled;

use super::output;
use super::command::ChangesArgs;
use crate::domain::change::ChangeRecord;
use crate::store::registry::StoreRegistry;

#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "#")]
    id: i64,
    #[tabled(rename = "Operation")]
    operation: String,
    #[tabled(rename = "Entity")]
    entity: String,
    #[tabled(rename = "ID")]
    business_id: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Actor")]
    actor: String,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(rename = "Recorded")]
    recorded: String,
}

impl From<&ChangeRecord> for ChangeRow {
    fn from(change: &ChangeRecord) -> Self {
        Self {
            id: change.id,
            operation: change.operation.to_string(),
            entity: change.entity_type.clone(),
            business_id: change.business_id.clone(),
            source: change.source.clone(),
            actor: change.actor.clone().unwrap_or_default(),
            reason: change.reason.clone().unwrap_or_default(),
            recorded: change
                .recorded_at()
                .map_or_else(|| change.timestamp.to_string(), |t| t.to_rfc3339()),
        }
    }
}

pub fn list(registry: &StoreRegistry, args: &ChangesArgs) -> Result<()> {
    let store = registry
        .get_or_create(&args.store)
        .with_context(|| format!("failed to open store '{}'", args.store))?;
    let changes = store.changes(args.after, args.limit)?;

    output::items(
        "change",
        &changes,
        changes.iter().map(ChangeRow::from),
        "No changes recorded",
    );
    if output::verbosity() > 0 && !output::is_json() {
        output::field("total", store.change_count()?);
    }
    Ok(())
}
