use crate::db::deliveries::DeliveryRecord;
use crate::domain::fields::{FieldKey, FIELD_CATALOG};
use crate::domain::order::Category;
use crate::domain::settings::{
    Settings, OPT_ORDER_STATUSES, OPT_PRODUCT_CATEGORIES, OPT_SCRIPT_URL, OPT_SELECTED_FIELDS,
    ORDER_STATUSES,
};
use crate::templates::components::checkbox_row;
use crate::templates::{card, desktop_layout};
use chrono::DateTime;
use maud::{html, Markup};

/// Sent with the generate button so an empty selection is not mistaken for
/// "use the stored fields".
pub const FIELDS_SUBMITTED: &str = "fields_submitted";

pub struct SettingsVm {
    pub settings: Settings,
    /// Stored selection with the always-include fields forced in.
    pub effective_fields: Vec<FieldKey>,
    pub categories: Vec<Category>,
    pub deliveries: Vec<DeliveryRecord>,
}

pub fn settings_page(vm: &SettingsVm) -> Markup {
    desktop_layout(
        "WooCommerce to Google Sheets",
        html! {
            main class="container settings-wrapper" {
                h1 { "WooCommerce to Google Sheets" }
                p { "Configure the settings for Google Sheets integration." }

                form action="/settings" method="post" {
                    (card("Trigger Order Statuses", status_checkboxes(&vm.settings)))
                    (card("Product Categories Filter", category_checkboxes(vm)))
                    (card("Checkout Fields", field_checkboxes(vm)))
                    (card("Google Apps Script URL", script_url_input(&vm.settings)))

                    button type="submit" class="button button-primary" { "Save Changes" }
                }

                (card("Generate Google Apps Script", script_generator()))
                (summary(vm))
                (recent_deliveries(&vm.deliveries))
            }
        },
    )
}

fn status_checkboxes(settings: &Settings) -> Markup {
    let name = format!("{OPT_ORDER_STATUSES}[]");
    html! {
        @for (status, label) in ORDER_STATUSES {
            (checkbox_row(&name, status, label, settings.trigger_statuses.contains(status), false))
        }
        p class="description" { "Select order statuses that should trigger sending data to Google Sheets" }
    }
}

fn category_checkboxes(vm: &SettingsVm) -> Markup {
    let name = format!("{OPT_PRODUCT_CATEGORIES}[]");
    html! {
        @if vm.categories.is_empty() {
            p { "No product categories found." }
        } @else {
            div class="field-checkboxes" {
                @for cat in &vm.categories {
                    (checkbox_row(&name, &cat.id.to_string(), &cat.name, vm.settings.category_filter.contains(&cat.id), false))
                }
            }
            p class="description" {
                "Select product categories. Orders will only be sent if they contain at least one product from selected categories. Leave empty to include all categories."
            }
        }
    }
}

fn field_checkboxes(vm: &SettingsVm) -> Markup {
    let name = format!("{OPT_SELECTED_FIELDS}[]");
    html! {
        div class="field-checkboxes" {
            @for def in &FIELD_CATALOG {
                div class="field-item" {
                    label {
                        input
                            type="checkbox"
                            name=(name)
                            value=(def.key.as_str())
                            checked[vm.effective_fields.contains(&def.key)]
                            disabled[def.always_include];
                        (def.label)
                        @if def.required {
                            span class="required" { "*" }
                        }
                        @if def.always_include {
                            " " em { "(Required)" }
                        }
                    }
                }
            }
        }
        p class="description" { "Select fields to include in Google Sheets. Required fields (*) are always included." }
    }
}

fn script_url_input(settings: &Settings) -> Markup {
    html! {
        input
            type="url"
            name=(OPT_SCRIPT_URL)
            value=(settings.script_url)
            class="url-input"
            placeholder="https://script.google.com/macros/s/...";
        p class="description" { "Enter your Google Apps Script web app URL. Get this from Google Apps Script deployment." }
    }
}

fn script_generator() -> Markup {
    html! {
        p { "Click the button below to generate a Google Apps Script code based on your selected fields:" }
        button
            type="button"
            id="generate-script"
            class="button button-primary"
            hx-post="/settings/script"
            hx-include=(format!("[name='{OPT_SELECTED_FIELDS}[]'], [name='{FIELDS_SUBMITTED}']"))
            hx-target="#script-output"
            hx-swap="innerHTML"
        {
            "Generate Google Apps Script"
        }
        input type="hidden" name=(FIELDS_SUBMITTED) value="1";
        div id="script-output" {}
    }
}

fn summary(vm: &SettingsVm) -> Markup {
    let statuses: Vec<String> = vm.settings.trigger_statuses.iter().map(|s| capitalize(s)).collect();
    let field_labels: Vec<&str> = vm.effective_fields.iter().map(|k| k.label()).collect();
    let category_names: Vec<&str> = vm
        .categories
        .iter()
        .filter(|c| vm.settings.category_filter.contains(&c.id))
        .map(|c| c.name.as_str())
        .collect();

    html! {
        section class="summary" {
            h3 { "Current Configuration Summary:" }
            p {
                strong { "Trigger Statuses:" } " "
                @if statuses.is_empty() { "None selected" } @else { (statuses.join(", ")) }
            }
            p {
                strong { "Selected Fields (" (field_labels.len()) "):" } " "
                (field_labels.join(", "))
            }
            p {
                strong { "Selected Categories:" } " "
                @if vm.settings.category_filter.is_empty() {
                    "All categories (no filter)"
                } @else if category_names.is_empty() {
                    "All categories"
                } @else {
                    (category_names.join(", "))
                }
            }
        }
    }
}

fn recent_deliveries(deliveries: &[DeliveryRecord]) -> Markup {
    html! {
        section class="card" {
            h3 { "Recent Deliveries" }
            @if deliveries.is_empty() {
                p class="description" { "No orders sent yet." }
            } @else {
                table class="deliveries" {
                    thead {
                        tr {
                            th { "Order" }
                            th { "Status" }
                            th { "Attempted" }
                            th { "Result" }
                        }
                    }
                    tbody {
                        @for d in deliveries {
                            tr {
                                td { (d.order_id) }
                                td { (d.status) }
                                td { (format_timestamp(d.attempted_at)) }
                                td {
                                    @if d.success {
                                        span class="ok" { "Sent" }
                                    } @else {
                                        span class="failed" { "Failed" }
                                        @if let Some(err) = &d.error_message {
                                            br; span class="detail" { (err) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn format_timestamp(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}
