pub mod dispatcher;
pub mod gates;
pub mod script;
pub mod selector;
pub mod transform;
pub mod transport;

pub use dispatcher::Dispatcher;
pub use script::generate_apps_script;
pub use selector::resolve_selected_fields;
pub use transport::HttpTransport;
