// src/relay/dispatcher.rs
use crate::db::categories::DbCategoryDirectory;
use crate::db::connection::Database;
use crate::db::deliveries::record_delivery;
use crate::db::settings::load_settings;
use crate::domain::order::{CategoryDirectory, OrderStatusChanged};
use crate::domain::settings::Settings;
use crate::relay::gates::{category_gate, status_gate};
use crate::relay::selector::resolve_selected_fields;
use crate::relay::transform::build_payload;
use crate::relay::transport::WebhookTransport;
use serde::Serialize;
use std::sync::Arc;

/// What happened to one status-change event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    StatusSkipped,
    CategorySkipped,
    Unconfigured,
    Sent { order_id: u64, status: u16 },
    Failed { order_id: u64, error: String },
}

pub struct Dispatcher {
    db: Database,
    transport: Arc<dyn WebhookTransport>,
}

impl Dispatcher {
    pub fn new(db: Database, transport: Arc<dyn WebhookTransport>) -> Self {
        Self { db, transport }
    }

    /// Handle one status change. Never fails: every problem ends up in the log
    /// and in the returned outcome, so the store's transition is never blocked.
    pub fn dispatch(&self, event: &OrderStatusChanged) -> DispatchOutcome {
        let directory = DbCategoryDirectory::new(&self.db);
        self.dispatch_with(event, &directory)
    }

    pub fn dispatch_with(
        &self,
        event: &OrderStatusChanged,
        directory: &dyn CategoryDirectory,
    ) -> DispatchOutcome {
        let settings = self.current_settings();

        if !status_gate(&settings, &event.new_status) {
            log::debug!(
                "order {}: status {:?} is not a trigger status",
                event.order_id,
                event.new_status
            );
            return DispatchOutcome::StatusSkipped;
        }

        if !category_gate(&settings, &event.order, directory) {
            log::debug!("order {}: no product in the category filter", event.order_id);
            return DispatchOutcome::CategorySkipped;
        }

        if settings.script_url.is_empty() {
            log::warn!("Google Apps Script URL not configured; order {} not sent", event.order_id);
            self.journal(event, false, Some("script URL not configured"));
            return DispatchOutcome::Unconfigured;
        }

        let fields = resolve_selected_fields(settings.selected_fields.as_slice());
        let payload = build_payload(&event.order, &fields, directory);
        let body = match serde_json::to_string(&payload) {
            Ok(body) => body,
            Err(e) => {
                let error = format!("payload serialization failed: {e}");
                log::error!("order {}: {error}", event.order_id);
                self.journal(event, false, Some(&error));
                return DispatchOutcome::Failed {
                    order_id: event.order_id,
                    error,
                };
            }
        };

        match self.transport.post_json(&settings.script_url, body) {
            Ok(receipt) => {
                log::info!("order {} sent to Google Sheets", event.order_id);
                self.journal(event, true, None);
                DispatchOutcome::Sent {
                    order_id: event.order_id,
                    status: receipt.status,
                }
            }
            Err(e) => {
                log::error!("order {} could not be sent to Google Sheets: {e}", event.order_id);
                self.journal(event, false, Some(&e.to_string()));
                DispatchOutcome::Failed {
                    order_id: event.order_id,
                    error: e.to_string(),
                }
            }
        }
    }

    fn current_settings(&self) -> Settings {
        match self.db.with_conn(|conn| load_settings(conn)) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("could not read settings, using defaults: {e}");
                Settings::default()
            }
        }
    }

    fn journal(&self, event: &OrderStatusChanged, success: bool, error: Option<&str>) {
        let now = chrono::Utc::now().timestamp();
        let written = self.db.with_conn(|conn| {
            record_delivery(conn, event.order_id, &event.new_status, now, success, error)
        });
        if let Err(e) = written {
            log::warn!("delivery journal write failed for order {}: {e}", event.order_id);
        }
    }
}
