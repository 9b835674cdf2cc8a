//! Plain-text extraction from HTML submissions.
//!
//! Word-category grading checks spelling on the visible text only, so the
//! markup has to go first: comments, then tags, then entity decoding, then
//! whitespace normalization. Comments and tags are removed before entities
//! are decoded so that entities inside stripped content do not leak into the
//! cleaned text.

/// Extract the visible plain text from an HTML fragment.
pub fn extract_text(html: &str) -> String {
    let without_comments = strip_comments(html);
    let without_tags = strip_tags(&without_comments);
    let decoded = decode_entities(&without_tags);
    collapse_whitespace(&decoded)
}

/// Remove `<!-- ... -->` comments, replacing each with a space.
///
/// Comments may span newlines. An unterminated comment is left as-is.
fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("<!--") {
        match rest[start + 4..].find("-->") {
            Some(end) => {
                out.push_str(&rest[..start]);
                out.push(' ');
                rest = &rest[start + 4 + end + 3..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

/// Remove `<...>` tag spans with a non-empty interior, replacing each with a
/// space. A `<` without a matching `>` is kept literally.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('<') {
        match rest[start + 1..].find('>') {
            Some(end) if end > 0 => {
                out.push_str(&rest[..start]);
                out.push(' ');
                rest = &rest[start + 1 + end + 1..];
            }
            _ => {
                // empty <> or unterminated: keep the bracket and move on
                out.push_str(&rest[..start + 1]);
                rest = &rest[start + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decode HTML entities: the common named set plus numeric references.
/// Unrecognized entities are left literally.
fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];

        match candidate[1..].find(';') {
            // entity names are short; anything longer is not an entity
            Some(end) if end > 0 && end <= 10 => {
                let name = &candidate[1..end + 1];
                match decode_entity(name) {
                    Some(ch) => {
                        out.push(ch);
                        rest = &candidate[end + 2..];
                    }
                    None => {
                        out.push('&');
                        rest = &candidate[1..];
                    }
                }
            }
            _ => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decode a single entity name (without `&` and `;`).
fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)
        }
    }
}

/// Collapse runs of Unicode whitespace (including U+00A0 from `&nbsp;`) to a
/// single space and trim the ends.
fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
