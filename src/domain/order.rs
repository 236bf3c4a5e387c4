// src/domain/order.rs
use crate::domain::settings::normalize_status;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Body of `POST /hooks/order-status`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusChanged {
    pub order_id: u64,
    #[serde(default, deserialize_with = "status")]
    pub old_status: String,
    #[serde(deserialize_with = "status")]
    pub new_status: String,
    pub order: OrderRecord,
}

/// Read-only view of a store order at event time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderRecord {
    pub id: u64,
    #[serde(default, deserialize_with = "status")]
    pub status: String,
    /// ISO 4217 code, e.g. `USD`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub currency: String,
    /// Symbol as the store renders it; may be an HTML entity.
    #[serde(default)]
    pub currency_symbol: Option<String>,
    /// Formatted decimal total, e.g. `25.00`.
    #[serde(default, deserialize_with = "amount")]
    pub total: String,
    /// Store-local wall clock. Unreadable values become `None`.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub date_created: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub billing: Billing,
    #[serde(default, deserialize_with = "null_as_default")]
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Billing {
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address_1: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address_2: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub postcode: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// `None` when the product was deleted from the store.
    #[serde(default)]
    pub product_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Resolves a product to the categories it belongs to.
pub trait CategoryDirectory {
    /// `None` when the product is unknown.
    fn categories_for(&self, product_id: i64) -> Option<Vec<Category>>;
}

fn status<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.map(|s| normalize_status(&s)).unwrap_or_default())
}

/// Stores emit `null` for blank text and empty collections.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS` already in the store's own
/// time zone (kept as-is with a zero offset). Anything else is `None`.
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<DateTime<FixedOffset>>, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(value.as_str().and_then(parse_timestamp))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Stores send totals either as `"25.00"` or `25.0`; keep strings verbatim.
fn amount<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Amount>::deserialize(d)? {
        Some(Amount::Text(s)) => s.trim().to_string(),
        Some(Amount::Number(n)) => n.to_string(),
        None => String::new(),
    })
}
