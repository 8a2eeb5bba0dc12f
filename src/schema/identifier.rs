/// Fallback identifier when the text carries no letters or digits.
pub const FALLBACK_IDENTIFIER: &str = "field";

/// Turn free text (a label, placeholder or title) into a camelCase identifier.
///
/// Every run of characters outside `[A-Za-z0-9]` acts as a single separator.
/// The first token is lowercased, the rest are title-cased, and the tokens
/// are joined without separators. Text with no usable token maps to
/// [`FALLBACK_IDENTIFIER`].
pub fn to_camel(text: &str) -> String {
    let tokens: Vec<&str> = text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let Some((first, rest)) = tokens.split_first() else {
        return FALLBACK_IDENTIFIER.to_string();
    };

    let mut out = first.to_ascii_lowercase();
    for token in rest {
        out.push_str(&title_case(token));
    }
    out
}

fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(head) => {
            let mut s = head.to_ascii_uppercase().to_string();
            s.push_str(&chars.as_str().to_ascii_lowercase());
            s
        }
        None => String::new(),
    }
}
