pub mod script;
pub mod settings;

pub use script::generated_script_fragment;
pub use settings::{settings_page, SettingsVm, FIELDS_SUBMITTED};
