pub mod errors;
pub mod html;
pub mod json;

pub use crate::errors::ResultResp;
pub use errors::error_to_response;

pub use html::{css_response, html_response, redirect};
pub use json::json_response;
