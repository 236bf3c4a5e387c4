use crate::auth::{require_admin, require_hook_token};
use crate::config::AppConfig;
use crate::db::categories::{list_categories, replace_catalog, CatalogSync};
use crate::db::connection::Database;
use crate::db::deliveries::get_recent_deliveries;
use crate::db::settings::{load_settings, save_settings};
use crate::domain::order::OrderStatusChanged;
use crate::domain::settings::{Settings, OPT_SELECTED_FIELDS};
use crate::errors::ServerError;
use crate::relay::{generate_apps_script, resolve_selected_fields, Dispatcher};
use crate::responses::{css_response, html_response, json_response, redirect, ResultResp};
use crate::templates::pages::{
    generated_script_fragment, settings_page, SettingsVm, FIELDS_SUBMITTED,
};
use astra::Request;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::io::Read;

const ADMIN_CSS: &str = include_str!("../static/admin.css");
const RECENT_DELIVERIES: usize = 25;
const MAX_BODY_BYTES: u64 = 1024 * 1024;

/// Everything a request handler needs. Shared by all server workers.
pub struct AppState {
    pub db: Database,
    pub config: AppConfig,
    pub dispatcher: Dispatcher,
}

pub fn handle(mut req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => redirect("/settings"),
        ("GET", "/static/admin.css") => css_response(ADMIN_CSS),

        ("POST", "/hooks/order-status") => {
            require_hook_token(&req, state.config.hook_token.as_deref())?;
            let event: OrderStatusChanged = read_json(&mut req)?;
            let outcome = state.dispatcher.dispatch(&event);
            json_response(200, &outcome)
        }
        ("PUT", "/hooks/catalog") => {
            require_hook_token(&req, state.config.hook_token.as_deref())?;
            let sync: CatalogSync = read_json(&mut req)?;
            state.db.with_conn(|conn| replace_catalog(conn, &sync))?;
            log::info!(
                "catalog synced: {} categories, {} products",
                sync.categories.len(),
                sync.products.len()
            );
            json_response(200, &json!({ "status": "ok" }))
        }

        ("GET", "/settings") => {
            require_admin(&req, state.config.admin_token.as_deref())?;
            let vm = load_settings_vm(&state.db)?;
            html_response(settings_page(&vm))
        }
        ("POST", "/settings") => {
            require_admin(&req, state.config.admin_token.as_deref())?;
            let body = read_body(&mut req)?;
            let pairs = form_pairs(&body);
            let settings = Settings::from_form(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            state.db.with_conn(|conn| save_settings(conn, &settings))?;
            log::info!("settings saved");
            redirect("/settings")
        }
        ("POST", "/settings/script") => {
            require_admin(&req, state.config.admin_token.as_deref())?;
            let body = read_body(&mut req)?;
            let pairs = form_pairs(&body);
            let from_page = pairs.iter().any(|(k, _)| k == FIELDS_SUBMITTED);
            let posted: Vec<String> = pairs
                .into_iter()
                .filter(|(k, _)| {
                    let name = k.trim_end_matches("[]");
                    name == "fields" || name == OPT_SELECTED_FIELDS
                })
                .map(|(_, v)| v)
                .collect();

            let selection = if posted.is_empty() && !from_page {
                state.db.with_conn(|conn| load_settings(conn))?.selected_fields
            } else {
                posted
            };
            let fields = resolve_selected_fields(selection.as_slice());
            html_response(generated_script_fragment(&generate_apps_script(&fields)))
        }

        _ => Err(ServerError::NotFound),
    }
}

fn load_settings_vm(db: &Database) -> Result<SettingsVm, ServerError> {
    db.with_conn(|conn| {
        let settings = load_settings(conn)?;
        let effective_fields = resolve_selected_fields(settings.selected_fields.as_slice());
        Ok(SettingsVm {
            effective_fields,
            categories: list_categories(conn)?,
            deliveries: get_recent_deliveries(conn, RECENT_DELIVERIES)?,
            settings,
        })
    })
}

fn read_body(req: &mut Request) -> Result<String, ServerError> {
    let mut body = String::new();
    req.body_mut()
        .reader()
        .take(MAX_BODY_BYTES)
        .read_to_string(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("unreadable body: {e}")))?;
    Ok(body)
}

fn read_json<T: DeserializeOwned>(req: &mut Request) -> Result<T, ServerError> {
    let body = read_body(req)?;
    serde_json::from_str(&body).map_err(|e| ServerError::BadRequest(format!("invalid JSON: {e}")))
}

fn form_pairs(body: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(body.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
