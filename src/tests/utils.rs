use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::domain::order::OrderStatusChanged;
use crate::errors::{DeliveryError, ServerError};
use crate::relay::transport::{DeliveryReceipt, WebhookTransport};
use crate::relay::Dispatcher;
use crate::router::AppState;
use rusqlite::{params, Connection};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Fresh temp-file database with the production schema applied.
pub fn init_test_db() -> Database {
    let path = std::env::temp_dir().join(format!(
        "sheets_relay_test_{}_{}_{}.sqlite",
        std::process::id(),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos(),
        DB_COUNTER.fetch_add(1, Ordering::SeqCst)
    ));
    let db = Database::new(path.to_string_lossy().to_string());

    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    db
}

/// Overwrite one option with arbitrary text, as if the row had been hand-edited.
pub fn put_raw_option(conn: &Connection, name: &str, value: &str) -> Result<(), ServerError> {
    conn.execute(
        "insert into options (name, value) values (?, ?) on conflict(name) do update set value = excluded.value",
        params![name, value],
    )?;
    Ok(())
}

/// Records every POST instead of sending it.
pub struct RecordingTransport {
    pub calls: Mutex<Vec<(String, String)>>,
    pub reply: Result<DeliveryReceipt, DeliveryError>,
}

impl RecordingTransport {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(DeliveryReceipt { status: 200 }),
        })
    }

    pub fn failing(err: DeliveryError) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Err(err),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Body of the only recorded call, parsed.
    pub fn single_body(&self) -> serde_json::Value {
        let calls = self.calls.lock().unwrap();
        assert_eq!(calls.len(), 1, "expected exactly one POST");
        serde_json::from_str(&calls[0].1).unwrap()
    }
}

impl WebhookTransport for RecordingTransport {
    fn post_json(&self, url: &str, body: String) -> Result<DeliveryReceipt, DeliveryError> {
        self.calls.lock().unwrap().push((url.to_string(), body));
        self.reply.clone()
    }
}

pub fn test_state(db: Database, transport: Arc<RecordingTransport>, config: AppConfig) -> AppState {
    AppState {
        dispatcher: Dispatcher::new(db.clone(), transport),
        db,
        config,
    }
}

/// Two line items "A" (product 10) and "B" (product 11), 25.00 USD.
pub fn sample_event(new_status: &str) -> OrderStatusChanged {
    serde_json::from_value(serde_json::json!({
        "order_id": 1001,
        "old_status": "pending",
        "new_status": new_status,
        "order": {
            "id": 1001,
            "status": new_status,
            "currency": "USD",
            "total": "25.00",
            "date_created": "2024-03-09T14:05:07+00:00",
            "billing": {
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "city": "London",
                "country": "GB"
            },
            "line_items": [
                {"name": "A", "product_id": 10},
                {"name": "B", "product_id": 11}
            ]
        }
    }))
    .unwrap()
}
