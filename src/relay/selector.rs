use crate::domain::fields::{FieldKey, FIELD_CATALOG};

/// Effective field set: the stored selection plus every always-include field,
/// in catalog order. Unknown keys are ignored, so the result is never empty.
pub fn resolve_selected_fields<S: AsRef<str>>(selected: &[S]) -> Vec<FieldKey> {
    let chosen: Vec<FieldKey> = selected
        .iter()
        .filter_map(|key| FieldKey::parse(key.as_ref()))
        .collect();

    FIELD_CATALOG
        .iter()
        .filter(|def| def.always_include || chosen.contains(&def.key))
        .map(|def| def.key)
        .collect()
}
