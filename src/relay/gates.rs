use crate::domain::order::{CategoryDirectory, OrderRecord};
use crate::domain::settings::Settings;

/// Passes when the new status is one of the trigger statuses.
pub fn status_gate(settings: &Settings, new_status: &str) -> bool {
    settings.trigger_statuses.contains(new_status)
}

/// Passes when no category filter is set, or when any line item's product
/// sits in a filtered category. Items without a resolvable product are skipped.
pub fn category_gate(
    settings: &Settings,
    order: &OrderRecord,
    directory: &dyn CategoryDirectory,
) -> bool {
    if settings.category_filter.is_empty() {
        return true;
    }

    order
        .line_items
        .iter()
        .filter_map(|item| item.product_id)
        .filter_map(|product_id| directory.categories_for(product_id))
        .any(|cats| cats.iter().any(|c| settings.category_filter.contains(&c.id)))
}
