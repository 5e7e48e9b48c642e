/// Escapes text for HTML element and attribute content.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// `1716` → `$1,716`, `-525` → `-$525`.
pub fn format_dollars(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// CSS class for High/Moderate/Low style labels. Unknown labels map to `medium`.
pub fn strength_class(label: &str) -> &'static str {
    let label = label.to_lowercase();
    if label.starts_with("high") || label.starts_with("strong") {
        "high"
    } else if label.starts_with("low") || label.starts_with("weak") {
        "low"
    } else {
        "medium"
    }
}
