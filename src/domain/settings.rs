// src/domain/settings.rs
use crate::domain::fields::{all_field_keys, FieldKey};
use serde_json::Value;
use std::collections::BTreeSet;

pub const OPT_ORDER_STATUSES: &str = "order_statuses";
pub const OPT_SCRIPT_URL: &str = "script_url";
pub const OPT_PRODUCT_CATEGORIES: &str = "product_categories";
pub const OPT_SELECTED_FIELDS: &str = "selected_fields";

pub const DEFAULT_TRIGGER_STATUSES: [&str; 2] = ["completed", "processing"];

/// Store order statuses offered in the settings form, `wc-` prefix removed.
pub const ORDER_STATUSES: [(&str, &str); 8] = [
    ("pending", "Pending payment"),
    ("processing", "Processing"),
    ("on-hold", "On hold"),
    ("completed", "Completed"),
    ("cancelled", "Cancelled"),
    ("refunded", "Refunded"),
    ("failed", "Failed"),
    ("checkout-draft", "Draft"),
];

/// Option values exactly as they sit in storage. `None` means the row is missing.
#[derive(Debug, Default, Clone)]
pub struct RawSettings {
    pub order_statuses: Option<String>,
    pub script_url: Option<String>,
    pub product_categories: Option<String>,
    pub selected_fields: Option<String>,
}

/// Typed relay configuration. Built only through [`Settings::from_raw`] or
/// [`Settings::from_form`], so every field is already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub trigger_statuses: BTreeSet<String>,
    pub script_url: String,
    /// Empty means every order passes the category gate.
    pub category_filter: BTreeSet<i64>,
    /// Stored selection, before the always-include fields are forced in.
    pub selected_fields: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trigger_statuses: default_statuses(),
            script_url: String::new(),
            category_filter: BTreeSet::new(),
            selected_fields: all_field_keys(),
        }
    }
}

fn default_statuses() -> BTreeSet<String> {
    DEFAULT_TRIGGER_STATUSES.iter().map(|s| s.to_string()).collect()
}

impl Settings {
    /// Never fails: missing or corrupt values fall back to their defaults.
    pub fn from_raw(raw: &RawSettings) -> Self {
        let trigger_statuses = match raw.order_statuses.as_deref().and_then(parse_list) {
            Some(list) => list
                .iter()
                .map(|s| normalize_status(s))
                .filter(|s| !s.is_empty())
                .collect(),
            None => default_statuses(),
        };

        let script_url = raw
            .script_url
            .as_deref()
            .map(parse_scalar)
            .unwrap_or_default();

        let category_filter = raw
            .product_categories
            .as_deref()
            .and_then(parse_list)
            .map(|list| parse_category_ids(&list))
            .unwrap_or_default();

        let selected_fields = match raw.selected_fields.as_deref() {
            None => all_field_keys(),
            Some(text) => parse_list(text)
                .map(|list| {
                    list.into_iter()
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        };

        Self {
            trigger_statuses,
            script_url,
            category_filter,
            selected_fields,
        }
    }

    /// Sanitize an admin form submission (`application/x-www-form-urlencoded`
    /// pairs). Unchecked boxes are simply absent, so every list starts empty.
    pub fn from_form<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut trigger_statuses = BTreeSet::new();
        let mut categories = Vec::new();
        let mut selected_fields = Vec::new();
        let mut script_url = String::new();

        for (name, value) in pairs {
            match name.trim_end_matches("[]") {
                OPT_ORDER_STATUSES => {
                    let status = normalize_status(value);
                    if !status.is_empty() {
                        trigger_statuses.insert(status);
                    }
                }
                OPT_PRODUCT_CATEGORIES => categories.push(value.to_string()),
                OPT_SELECTED_FIELDS => {
                    if let Some(key) = FieldKey::parse(value) {
                        let key = key.as_str().to_string();
                        if !selected_fields.contains(&key) {
                            selected_fields.push(key);
                        }
                    }
                }
                OPT_SCRIPT_URL => script_url = sanitize_url(value),
                _ => {}
            }
        }

        Self {
            trigger_statuses,
            script_url,
            category_filter: parse_category_ids(&categories),
            selected_fields,
        }
    }

    /// `(option name, JSON text)` rows, ready to store.
    pub fn to_stored(&self) -> Vec<(&'static str, String)> {
        vec![
            (OPT_ORDER_STATUSES, Value::from_iter(self.trigger_statuses.iter().cloned()).to_string()),
            (OPT_SCRIPT_URL, Value::String(self.script_url.clone()).to_string()),
            (OPT_PRODUCT_CATEGORIES, Value::from_iter(self.category_filter.iter().copied()).to_string()),
            (OPT_SELECTED_FIELDS, Value::from_iter(self.selected_fields.iter().cloned()).to_string()),
        ]
    }
}

/// `wc-completed`, ` Completed ` and `completed` all mean the same status.
pub fn normalize_status(status: &str) -> String {
    let s = status.trim().to_ascii_lowercase();
    match s.strip_prefix("wc-") {
        Some(rest) => rest.to_string(),
        None => s,
    }
}

/// Only absolute http(s) URLs are kept.
pub fn sanitize_url(input: &str) -> String {
    match url::Url::parse(input.trim()) {
        Ok(u) if matches!(u.scheme(), "http" | "https") && u.has_host() => u.to_string(),
        _ => String::new(),
    }
}

fn parse_category_ids(items: &[String]) -> BTreeSet<i64> {
    items
        .iter()
        .filter_map(|s| s.trim().parse::<i64>().ok())
        .collect()
}

/// Accepts a JSON array, a JSON string holding a comma list, or a bare comma
/// list. A lone number is a one-item list. Anything else is not a list.
fn parse_list(text: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
        ),
        Ok(Value::String(s)) => split_commas(&s),
        Ok(Value::Number(n)) => Some(vec![n.to_string()]),
        Ok(_) => None,
        Err(_) => split_commas(text),
    }
}

fn split_commas(text: &str) -> Option<Vec<String>> {
    if text.trim().is_empty() {
        return None;
    }
    Some(text.split(',').map(|s| s.trim().to_string()).collect())
}

fn parse_scalar(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::String(s)) => s.trim().to_string(),
        Ok(_) => String::new(),
        Err(_) => text.trim().to_string(),
    }
}
