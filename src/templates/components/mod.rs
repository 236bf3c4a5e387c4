use maud::{html, Markup};

pub mod error;

pub use error::error_page;

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// One labelled checkbox row, as used by every list in the settings form.
pub fn checkbox_row(name: &str, value: &str, label: &str, checked: bool, disabled: bool) -> Markup {
    html! {
        div class="field-item" {
            label {
                input type="checkbox" name=(name) value=(value) checked[checked] disabled[disabled];
                (label)
            }
        }
    }
}
