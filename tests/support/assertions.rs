use edgestore::domain::change::{ChangeRecord, Operation};

/// `(operation, business id)` pairs of a change log, in order.
pub fn operations(changes: &[ChangeRecord]) -> Vec<(Operation, String)> {
    changes
        .iter()
        .map(|c| (c.operation, c.business_id.clone()))
        .collect()
}

/// Business identifiers of records, sorted.
pub fn sorted_ids<T, F>(records: &[T], id: F) -> Vec<String>
where
    F: Fn(&T) -> &str,
{
    let mut ids: Vec<String> = records.iter().map(|r| id(r).to_string()).collect();
    ids.sort();
    ids
}
