/// Folds known spelling variants of an answer onto the canonical token.
pub(crate) fn canonical_severity(value: &str) -> &str {
    match value {
        "Sever" => "Severe",
        other => other,
    }
}

/// Pulls the spacing around a range separator tight, so `"121 - 130"`,
/// `"121- 130"` and `"121 -130"` all read `"121-130"`.
pub(crate) fn tighten_range(value: &str) -> String {
    value
        .replace("- ", "-")
        .replace(" -", "-")
        .trim()
        .to_string()
}

pub(crate) fn strip_spaces(value: &str) -> String {
    value.replace(' ', "")
}

/// Removes byte-order marks and zero-width characters spreadsheet exports leave behind.
pub(crate) fn clean_header(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}
