use {
    super::AbiMapping,
    itertools::Either,
    serde_json::Value,
    std::iter::once,
    tap::Pipe,
};

/// Entries a single group contributes: the elements of an array, or the value itself.
///
/// Only the top level of a group is unpacked, arrays nested inside a sequence stay intact.
pub fn group_entries(value: Value) -> impl Iterator<Item = Value> {
    match value {
        Value::Array(entries) => entries.into_iter().pipe(Either::Left),
        single => once(single).pipe(Either::Right),
    }
}

/// Borrowed counterpart of [`group_entries`].
pub fn group_entries_ref(value: &Value) -> impl Iterator<Item = &Value> {
    match value {
        Value::Array(entries) => entries.iter().pipe(Either::Left),
        single => once(single).pipe(Either::Right),
    }
}

pub fn union_iter(mapping: AbiMapping) -> impl Iterator<Item = Value> {
    mapping.into_inner().into_values().flat_map(group_entries)
}

pub fn union(mapping: AbiMapping) -> Vec<Value> {
    union_iter(mapping).collect()
}

pub fn union_ref(mapping: &AbiMapping) -> Vec<Value> {
    mapping.values().flat_map(group_entries_ref).cloned().collect()
}
