//! URL parameter helpers: percent-encoding and tolerant typed readers.
//!
//! Every reader returns `None` for a missing or malformed value; callers
//! decide what "absent" falls back to.

use std::collections::BTreeSet;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use search_common::{content_type::ContentTypeSelection, facet_state::split_filter_values};
use tracing::trace;

use super::query_params::QueryParams;

/// Characters escaped in a single URL component. Leaves the same unreserved
/// punctuation untouched as a browser's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Returns `None` for a truncated or non-hex escape, or when the decoded
/// bytes are not UTF-8.
pub fn decode_component(value: &str) -> Option<String> {
    if !has_valid_escapes(value) {
        return None;
    }
    percent_decode_str(value).decode_utf8().ok().map(|decoded| decoded.into_owned())
}

fn has_valid_escapes(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' {
            let escape = bytes.get(index + 1..index + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return false;
            }
            index += 3;
        } else {
            index += 1;
        }
    }
    true
}

/// Percent-decoded text; an empty value counts as absent.
pub fn string_param(params: &QueryParams, key: &str) -> Option<String> {
    let raw = params.get(key)?;
    let decoded = decode_component(raw);
    if decoded.is_none() {
        trace!(key, raw, "ignoring undecodable url parameter");
    }
    decoded.filter(|value| !value.is_empty())
}

/// Comma separated values, trimmed, without empties, deduplicated and
/// sorted. An empty list counts as absent.
pub fn string_list_param(params: &QueryParams, key: &str) -> Option<Vec<String>> {
    let value = string_param(params, key)?;
    let values = split_filter_values(&value).map(str::to_string).collect::<BTreeSet<_>>();
    if values.is_empty() {
        return None;
    }
    Some(values.into_iter().collect())
}

/// A positive integer written with ASCII digits only.
pub fn int_param(params: &QueryParams, key: &str) -> Option<u32> {
    let raw = params.get(key)?;
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        trace!(key, raw, "ignoring non-numeric url parameter");
        return None;
    }
    match raw.parse::<u32>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            trace!(key, raw, "ignoring out of range url parameter");
            None
        }
    }
}

pub fn content_type_param(params: &QueryParams, key: &str) -> Option<ContentTypeSelection> {
    let value = string_param(params, key)?;
    match value.parse() {
        Ok(selection) => Some(selection),
        Err(err) => {
            trace!(key, %err, "ignoring unknown content type");
            None
        }
    }
}
