use crate::domain::fields::FieldKey;
use indexmap::IndexMap;
use serde::Serialize;

/// Column layout baked into the generated script.
#[derive(Debug, Serialize)]
pub struct ScriptColumns {
    pub headers: Vec<&'static str>,
    pub label_to_key: IndexMap<&'static str, &'static str>,
}

impl ScriptColumns {
    pub fn for_fields(fields: &[FieldKey]) -> Self {
        Self {
            headers: fields.iter().map(|k| k.label()).collect(),
            label_to_key: fields.iter().map(|k| (k.label(), k.as_str())).collect(),
        }
    }
}

const TEMPLATE: &str = r#"// Google Apps Script for the WooCommerce order sheet
// Generated by sheets_relay
// Fields: __FIELD_LIST__

const HEADERS = __HEADERS__;

const FIELD_KEYS = __FIELD_KEYS__;

function doPost(e) {
    try {
        const data = JSON.parse(e.postData.contents);
        const sheet = SpreadsheetApp.getActiveSpreadsheet().getActiveSheet();

        initializeSheet(sheet);

        const rowIndex = findOrderRow(sheet, data.order_id);
        if (rowIndex !== -1) {
            updateExistingRow(sheet, rowIndex, data);
        } else {
            addNewRow(sheet, data);
        }

        return jsonResponse({ status: 'success', message: 'Order data saved successfully' });
    } catch (error) {
        return jsonResponse({ status: 'error', message: error.toString() });
    }
}

function jsonResponse(body) {
    return ContentService.createTextOutput(JSON.stringify(body))
        .setMimeType(ContentService.MimeType.JSON);
}

function initializeSheet(sheet) {
    if (sheet.getLastRow() === 0) {
        sheet.appendRow(HEADERS);
    }
}

// Row number (1-based) holding the order, or -1.
function findOrderRow(sheet, orderId) {
    const lastRow = sheet.getLastRow();
    if (lastRow < 2 || orderId === undefined) {
        return -1;
    }
    const ids = sheet.getRange(2, 1, lastRow - 1, 1).getValues().flat().map(String);
    const index = ids.indexOf(String(orderId));
    return index === -1 ? -1 : index + 2;
}

function getFieldKeyFromLabel(label) {
    if (Object.prototype.hasOwnProperty.call(FIELD_KEYS, label)) {
        return FIELD_KEYS[label];
    }
    return label.toLowerCase().replace(/ /g, '_');
}

function updateExistingRow(sheet, row, data) {
    HEADERS.forEach((label, index) => {
        const key = getFieldKeyFromLabel(label);
        if (data[key] !== undefined) {
            sheet.getRange(row, index + 1).setValue(data[key]);
        }
    });
}

function addNewRow(sheet, data) {
    const rowData = HEADERS.map((label) => {
        const key = getFieldKeyFromLabel(label);
        return data[key] !== undefined ? data[key] : '';
    });
    sheet.appendRow(rowData);
}

// Run once from the editor to write the header row.
function manualInitialize() {
    initializeSheet(SpreadsheetApp.getActiveSpreadsheet().getActiveSheet());
}
"#;

/// Render the receiving script for an already resolved field list.
pub fn generate_apps_script(fields: &[FieldKey]) -> String {
    render(&ScriptColumns::for_fields(fields))
}

pub fn render(columns: &ScriptColumns) -> String {
    let headers = serde_json::to_string_pretty(&columns.headers).unwrap_or_else(|_| "[]".into());
    let keys = serde_json::to_string_pretty(&columns.label_to_key).unwrap_or_else(|_| "{}".into());

    TEMPLATE
        .replace("__FIELD_LIST__", &columns.headers.join(", "))
        .replace("__HEADERS__", &headers)
        .replace("__FIELD_KEYS__", &keys)
}
