// src/domain/currency.rs

/// Store-style symbols, kept in the HTML-entity form stores emit them in.
const SYMBOLS: &[(&str, &str)] = &[
    ("AED", "&#x62f;.&#x625;"),
    ("AUD", "&#36;"),
    ("BDT", "&#2547;&nbsp;"),
    ("BRL", "&#82;&#36;"),
    ("CAD", "&#36;"),
    ("CHF", "&#67;&#72;&#70;"),
    ("CNY", "&yen;"),
    ("CZK", "&#75;&#269;"),
    ("DKK", "kr."),
    ("EUR", "&euro;"),
    ("GBP", "&pound;"),
    ("HKD", "&#36;"),
    ("ILS", "&#8362;"),
    ("INR", "&#8377;"),
    ("JPY", "&yen;"),
    ("KRW", "&#8361;"),
    ("MXN", "&#36;"),
    ("NGN", "&#8358;"),
    ("NOK", "&#107;&#114;"),
    ("NZD", "&#36;"),
    ("PHP", "&#8369;"),
    ("PKR", "&#8360;"),
    ("PLN", "&#122;&#322;"),
    ("RUB", "&#8381;"),
    ("SEK", "&#107;&#114;"),
    ("SGD", "&#36;"),
    ("THB", "&#3647;"),
    ("TRY", "&#8378;"),
    ("UAH", "&#8372;"),
    ("USD", "&#36;"),
    ("VND", "&#8363;"),
    ("ZAR", "&#82;"),
];

/// Raw (possibly entity-encoded) symbol for a currency code, `""` if unknown.
pub fn symbol_for(code: &str) -> &'static str {
    let code = code.trim();
    SYMBOLS
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, sym)| *sym)
        .unwrap_or("")
}

/// Replace character references (`&#36;`, `&#x20B9;`, `&euro;`, ...) with the
/// characters they stand for. Unknown or malformed references are left as is.
pub fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match tail.find(';').and_then(|end| decode_one(&tail[1..end]).map(|c| (c, end))) {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_one(entity: &str) -> Option<char> {
    if let Some(num) = entity.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    let c = match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "euro" => '€',
        "pound" => '£',
        "yen" => '¥',
        "cent" => '¢',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollar_reference_decodes() {
        assert_eq!(decode_entities("&#36;"), "$");
        assert_eq!(decode_entities(symbol_for("USD")), "$");
    }

    #[test]
    fn hex_and_named_references() {
        assert_eq!(decode_entities("&#x20B9;"), "₹");
        assert_eq!(decode_entities(symbol_for("eur")), "€");
        assert_eq!(decode_entities(symbol_for("BRL")), "R$");
        assert_eq!(decode_entities(symbol_for("BDT")), "৳\u{a0}");
    }

    #[test]
    fn plain_text_and_stray_ampersands_survive() {
        assert_eq!(decode_entities("kr."), "kr.");
        assert_eq!(decode_entities("A & B"), "A & B");
        assert_eq!(decode_entities("&bogus;x"), "&bogus;x");
        assert_eq!(decode_entities("&#;"), "&#;");
    }

    #[test]
    fn unknown_currency_has_no_symbol() {
        assert_eq!(symbol_for("XXX"), "");
    }
}
