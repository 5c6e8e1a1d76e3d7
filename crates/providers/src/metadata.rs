use serde::{Deserialize, Serialize};

use crate::ProviderError;

/// Structured metadata extracted from a paper.
///
/// All four fields are required; the parser rejects any reply missing one
/// rather than producing a partial record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperMetadata {
    pub title: String,
    pub authors: String,
    #[serde(rename = "abstract")]
    pub abstract_: String,
    pub keywords: Vec<String>,
}

/// Parse the extraction model's reply into [`PaperMetadata`].
///
/// The extraction contract asks the model for a braced block of the form
///
/// ```text
/// {
///   title: "Paper Title" or 0x-hex when non-ASCII,
///   authors: "Author Names" or 0x-hex when non-ASCII,
///   abstract: "Abstract text",
///   keywords: ["k1", "k2", "k3", "k4", "k5"]
/// }
/// ```
///
/// Field keys may be bare or double-quoted; surrounding prose outside the
/// braces is ignored. `title` and `authors` values carrying a `0x` prefix
/// are hex-decoded back to UTF-8 (lossy on invalid sequences). A reply
/// missing the braces or any of the four fields fails with
/// [`ProviderError::MalformedReply`].
pub fn parse_metadata_reply(raw: &str) -> Result<PaperMetadata, ProviderError> {
    let start = raw
        .find('{')
        .ok_or_else(|| malformed("no braced block in reply"))?;
    let end = raw
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| malformed("unterminated braced block in reply"))?;
    let block = &raw[start + 1..end];

    let title = decode_hex_field(&string_field(block, "title")?);
    let authors = decode_hex_field(&string_field(block, "authors")?);
    let abstract_ = string_field(block, "abstract")?;
    let keywords = keywords_field(block)?;

    Ok(PaperMetadata {
        title,
        authors,
        abstract_,
        keywords,
    })
}

fn malformed(msg: impl Into<String>) -> ProviderError {
    ProviderError::MalformedReply(msg.into())
}

/// Byte offset just past the colon of `key:` / `"key":`, or `None` when the
/// key does not start a field in `block`.
fn locate_value(block: &str, key: &str) -> Option<usize> {
    for pattern in [format!("\"{key}\""), key.to_string()] {
        let mut from = 0;
        while let Some(found) = block[from..].find(&pattern) {
            let at = from + found;
            // A field key is preceded only by whitespace, a comma, or the
            // end of the previous value; anything else is prose or part of
            // another value.
            let before = block[..at].trim_end();
            let starts_field = before.is_empty() || before.ends_with([',', ']']);
            let after_key = block[at + pattern.len()..].trim_start();
            if starts_field && after_key.starts_with(':') {
                let colon_at = block.len() - after_key.len();
                return Some(colon_at + 1);
            }
            from = at + pattern.len();
        }
    }
    None
}

fn string_field(block: &str, key: &str) -> Result<String, ProviderError> {
    let at = locate_value(block, key)
        .ok_or_else(|| malformed(format!("missing `{key}` field")))?;
    let rest = block[at..].trim_start();

    let value = if let Some(quoted) = rest.strip_prefix('"') {
        quoted
            .split('"')
            .next()
            .unwrap_or_default()
            .to_string()
    } else {
        // Unquoted value (the contract allows bare 0x-hex): runs to the
        // end of the line or the next field separator.
        rest.split([',', '\n'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    };

    if value.is_empty() {
        return Err(malformed(format!("field `{key}` is empty")));
    }
    Ok(value)
}

fn keywords_field(block: &str) -> Result<Vec<String>, ProviderError> {
    let at = locate_value(block, "keywords")
        .ok_or_else(|| malformed("missing `keywords` field"))?;
    let rest = &block[at..];
    let open = rest
        .find('[')
        .ok_or_else(|| malformed("`keywords` is not an array"))?;
    let close = rest[open..]
        .find(']')
        .ok_or_else(|| malformed("unterminated `keywords` array"))?
        + open;

    let keywords: Vec<String> = serde_json::from_str(&rest[open..=close])
        .map_err(|err| malformed(format!("`keywords` array: {err}")))?;
    if keywords.is_empty() {
        return Err(malformed("`keywords` array is empty"));
    }
    Ok(keywords)
}

/// Decode a `0x`-prefixed hex value back to UTF-8; non-hex values pass
/// through unchanged.
fn decode_hex_field(value: &str) -> String {
    let Some(digits) = value.strip_prefix("0x") else {
        return value.to_string();
    };
    match hex::decode(digits) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => value.to_string(),
    }
}
