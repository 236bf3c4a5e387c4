pub mod guard;
pub mod token;

pub use guard::{require_admin, require_hook_token};
