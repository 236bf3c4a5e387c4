use crate::domain::currency::{decode_entities, symbol_for};
use crate::domain::fields::FieldKey;
use crate::domain::order::{CategoryDirectory, OrderRecord};
use indexmap::IndexMap;

pub const ORDER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Flat record sent to the sheet. Key order is column order.
pub type Payload = IndexMap<String, String>;

/// Map the order onto `fields`, in the order given (catalog order once the
/// selection has been resolved). Fields without a value rule are omitted.
pub fn build_payload(
    order: &OrderRecord,
    fields: &[FieldKey],
    directory: &dyn CategoryDirectory,
) -> Payload {
    let mut payload = Payload::with_capacity(fields.len());
    for key in fields {
        if let Some(value) = field_value(*key, order, directory) {
            payload.insert(key.as_str().to_string(), value);
        }
    }
    payload
}

pub fn field_value(
    key: FieldKey,
    order: &OrderRecord,
    directory: &dyn CategoryDirectory,
) -> Option<String> {
    let b = &order.billing;
    let value = match key {
        FieldKey::OrderId => order.id.to_string(),
        FieldKey::BillingName => join_present(&[&b.first_name, &b.last_name], " "),
        FieldKey::BillingEmail => b.email.clone(),
        FieldKey::BillingPhone => b.phone.clone(),
        FieldKey::BillingAddress => join_present(
            &[
                &b.address_1,
                &b.address_2,
                &b.city,
                &b.state,
                &b.postcode,
                &b.country,
            ],
            ", ",
        ),
        FieldKey::ProductName => order
            .line_items
            .iter()
            .map(|item| item.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        FieldKey::OrderAmountWithCurrency => amount_with_currency(order),
        FieldKey::OrderCurrency => order.currency.clone(),
        FieldKey::OrderStatus => order.status.clone(),
        FieldKey::OrderDate => order
            .date_created
            .map(|ts| ts.format(ORDER_DATE_FORMAT).to_string())
            .unwrap_or_default(),
        FieldKey::ProductCategories => category_names(order, directory).join(", "),
    };
    Some(value)
}

/// Symbol glued to the total, with any character reference decoded.
pub fn amount_with_currency(order: &OrderRecord) -> String {
    let symbol = match order.currency_symbol.as_deref() {
        Some(sym) if !sym.is_empty() => sym,
        _ => symbol_for(&order.currency),
    };
    format!("{}{}", decode_entities(symbol), order.total)
}

/// Names of every category touched by the order, first occurrence wins.
fn category_names(order: &OrderRecord, directory: &dyn CategoryDirectory) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for product_id in order.line_items.iter().filter_map(|item| item.product_id) {
        for cat in directory.categories_for(product_id).unwrap_or_default() {
            if !names.contains(&cat.name) {
                names.push(cat.name);
            }
        }
    }
    names
}

fn join_present(parts: &[&String], sep: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}
