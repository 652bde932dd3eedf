/// Whether a URI already carries a scheme and must not be joined to a base URL
pub fn has_scheme(uri: &str) -> bool {
    let trimmed = uri.trim();

    if trimmed.starts_with("data:")
        || trimmed.starts_with("about:")
        || trimmed.starts_with("javascript:")
        || trimmed.starts_with("mailto:")
    {
        return true;
    }

    match trimmed.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Join a relative URI to the base URL with exactly one slash between them
pub fn full_url(base_url: &str, uri: &str) -> String {
    if has_scheme(uri) {
        return uri.trim().to_string();
    }

    format!("{}/{}", base_url.trim().trim_end_matches('/'), uri.trim().trim_matches('/'))
}

pub fn strip_trailing_slash(url: &str) -> &str {
    url.trim().trim_end_matches('/')
}

/// The URL itself plus its http/https forms when it has no scheme
pub fn url_variants(url: &str) -> Vec<String> {
    let trimmed = strip_trailing_slash(url);

    if has_scheme(trimmed) {
        return vec![trimmed.to_string()];
    }

    vec![
        trimmed.to_string(),
        format!("http://{}", trimmed),
        format!("https://{}", trimmed),
    ]
}

/// Escape the characters that are special in HTML text and attribute values
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
