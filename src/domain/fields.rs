// src/domain/fields.rs
use serde::{Deserialize, Serialize};

/// Every order field the relay knows how to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    OrderId,
    BillingName,
    BillingEmail,
    BillingPhone,
    BillingAddress,
    ProductName,
    OrderAmountWithCurrency,
    OrderCurrency,
    OrderStatus,
    OrderDate,
    ProductCategories,
}

impl FieldKey {
    /// Key used in the JSON payload and in stored settings.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::OrderId => "order_id",
            FieldKey::BillingName => "billing_name",
            FieldKey::BillingEmail => "billing_email",
            FieldKey::BillingPhone => "billing_phone",
            FieldKey::BillingAddress => "billing_address",
            FieldKey::ProductName => "product_name",
            FieldKey::OrderAmountWithCurrency => "order_amount_with_currency",
            FieldKey::OrderCurrency => "order_currency",
            FieldKey::OrderStatus => "order_status",
            FieldKey::OrderDate => "order_date",
            FieldKey::ProductCategories => "product_categories",
        }
    }

    pub fn parse(key: &str) -> Option<FieldKey> {
        FIELD_CATALOG
            .iter()
            .map(|def| def.key)
            .find(|k| k.as_str() == key.trim())
    }

    pub fn definition(self) -> &'static FieldDefinition {
        // Catalog holds one entry per variant, in declaration order.
        &FIELD_CATALOG[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.definition().label
    }
}

#[derive(Debug)]
pub struct FieldDefinition {
    pub key: FieldKey,
    pub label: &'static str,
    /// Shown with a marker in the settings form.
    pub required: bool,
    /// Sent no matter what the stored selection says.
    pub always_include: bool,
}

const fn field(
    key: FieldKey,
    label: &'static str,
    required: bool,
    always_include: bool,
) -> FieldDefinition {
    FieldDefinition {
        key,
        label,
        required,
        always_include,
    }
}

/// Declaration order is the payload key order and the sheet column order.
pub const FIELD_CATALOG: [FieldDefinition; 11] = [
    field(FieldKey::OrderId, "Order ID", true, true),
    field(FieldKey::BillingName, "Billing Name", true, true),
    field(FieldKey::BillingEmail, "Email Address", false, false),
    field(FieldKey::BillingPhone, "Phone", false, false),
    field(FieldKey::BillingAddress, "Billing Address", false, false),
    field(FieldKey::ProductName, "Product Name", true, true),
    field(FieldKey::OrderAmountWithCurrency, "Order Amount", true, true),
    field(FieldKey::OrderCurrency, "Order Currency", false, false),
    field(FieldKey::OrderStatus, "Order Status", true, true),
    field(FieldKey::OrderDate, "Order Date", true, true),
    field(FieldKey::ProductCategories, "Product Categories", false, false),
];

/// All catalog keys, as stored by default.
pub fn all_field_keys() -> Vec<String> {
    FIELD_CATALOG
        .iter()
        .map(|def| def.key.as_str().to_string())
        .collect()
}
