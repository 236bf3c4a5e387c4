use maud::{html, Markup};

/// Fragment swapped into the settings page by the generate button.
pub fn generated_script_fragment(script: &str) -> Markup {
    html! {
        div class="script-output" {
            textarea id="generated-script" class="generated-script" rows="24" readonly { (script) }
            p {
                button
                    type="button"
                    class="button button-secondary"
                    onclick="navigator.clipboard.writeText(document.getElementById('generated-script').value).then(function(){document.getElementById('copy-status').hidden=false;})"
                {
                    "Copy to Clipboard"
                }
                span id="copy-status" class="ok" hidden { "Copied!" }
            }
        }
    }
}
