//! Payload codec - turns whatever the store returned into plain bytes.
//!
//! Three encodings are recognised, tried in this order:
//! 1. `JsonWrapped`: a JSON object with `data` (+ optional `mimeType`), either
//!    flat or nested under `inlineData` / `inline_data`.
//! 2. `Base64Text`: the store returned a string that decodes as base64.
//! 3. `RawBytes`: anything else, taken literally. This includes JSON
//!    documents whose `data` field holds something other than bytes.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_MIME_TYPE, PayloadEncoding, ResolveError};
use crate::ports::StoredPayload;

/// Canonical in-memory form of a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub encoding: PayloadEncoding,
}

#[derive(Debug, Deserialize, Serialize)]
struct WrappedData {
    data: serde_json::Value,
    #[serde(
        default,
        rename = "mimeType",
        alias = "mime_type",
        skip_serializing_if = "Option::is_none"
    )]
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Wrapper {
    Inline {
        #[serde(rename = "inlineData", alias = "inline_data")]
        inline_data: WrappedData,
    },
    Flat(WrappedData),
}

impl Wrapper {
    fn into_data(self) -> WrappedData {
        match self {
            Wrapper::Inline { inline_data } => inline_data,
            Wrapper::Flat(data) => data,
        }
    }
}

/// Decode a payload fetched from `key`.
///
/// A JSON object whose `data` is neither a string nor a byte array is an
/// ordinary JSON document and is returned as raw bytes.
///
/// # Errors
/// `Decode` when a `data:` URL declares base64 but its body is not base64.
pub fn decode_payload(key: &str, payload: &StoredPayload) -> Result<DecodedPayload, ResolveError> {
    if let Ok(wrapper) = serde_json::from_slice::<Wrapper>(payload.as_bytes())
        && let Some(decoded) = decode_wrapped(key, wrapper.into_data(), payload.len())?
    {
        return Ok(decoded);
    }

    let decoded = match payload {
        StoredPayload::Bytes(bytes) => DecodedPayload {
            bytes: bytes.clone(),
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            encoding: PayloadEncoding::RawBytes,
        },
        StoredPayload::Text(text) => match decode_base64(text) {
            Some(bytes) => DecodedPayload {
                bytes,
                mime_type: DEFAULT_MIME_TYPE.to_string(),
                encoding: PayloadEncoding::Base64Text,
            },
            None => DecodedPayload {
                bytes: text.as_bytes().to_vec(),
                mime_type: DEFAULT_MIME_TYPE.to_string(),
                encoding: PayloadEncoding::RawBytes,
            },
        },
    };
    Ok(decoded)
}

/// `Ok(None)` when `data` does not hold bytes; the caller takes the payload raw.
fn decode_wrapped(
    key: &str,
    wrapped: WrappedData,
    payload_len: usize,
) -> Result<Option<DecodedPayload>, ResolveError> {
    let mut mime_type = wrapped.mime_type.filter(|m| !m.trim().is_empty());

    let bytes = match wrapped.data {
        serde_json::Value::String(text) => match split_data_url(&text) {
            Some((url_mime, body)) => {
                if mime_type.is_none() && !url_mime.is_empty() {
                    mime_type = Some(url_mime.to_string());
                }
                decode_base64(body).ok_or_else(|| ResolveError::Decode {
                    key: key.to_string(),
                    mime_type: mime_type.clone().unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
                    size_bytes: payload_len,
                    reason: "data URL declares base64 but its body is not base64".to_string(),
                })?
            }
            None => decode_base64(&text).unwrap_or_else(|| text.as_bytes().to_vec()),
        },
        serde_json::Value::Array(items) => match byte_array(&items) {
            Some(bytes) => bytes,
            None => {
                tracing::debug!(key, "data array is not a byte array, reading payload raw");
                return Ok(None);
            }
        },
        other => {
            tracing::debug!(key, kind = json_kind(&other), "data field holds no bytes, reading payload raw");
            return Ok(None);
        }
    };

    Ok(Some(DecodedPayload {
        bytes,
        mime_type: mime_type.unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
        encoding: PayloadEncoding::JsonWrapped,
    }))
}

/// Standard alphabet first, then URL-safe. Surrounding whitespace is ignored.
fn decode_base64(text: &str) -> Option<Vec<u8>> {
    let trimmed = text.trim();
    STANDARD
        .decode(trimmed)
        .or_else(|_| URL_SAFE.decode(trimmed))
        .ok()
}

/// `data:image/png;base64,AAAA` -> `("image/png", "AAAA")`.
fn split_data_url(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix("data:")?;
    let (meta, body) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    Some((mime, body))
}

fn byte_array(items: &[serde_json::Value]) -> Option<Vec<u8>> {
    items
        .iter()
        .map(|v| v.as_u64().and_then(|n| u8::try_from(n).ok()))
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Wrap bytes the way the host framework persists inline parts.
pub fn encode_json_wrapped(bytes: &[u8], mime_type: &str) -> Vec<u8> {
    let wrapped = WrappedData {
        data: serde_json::Value::String(STANDARD.encode(bytes)),
        mime_type: Some(mime_type.to_string()),
    };
    // A struct of a string and an optional string always serialises.
    serde_json::to_vec(&wrapped).unwrap_or_default()
}

pub fn encode_base64_text(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn bytes_payload(value: serde_json::Value) -> StoredPayload {
        StoredPayload::Bytes(serde_json::to_vec(&value).unwrap())
    }

    #[test]
    fn json_wrapper_with_base64_data() {
        let payload = bytes_payload(json!({
            "data": STANDARD.encode(b"\x89PNG\r\n"),
            "mimeType": "image/png",
        }));

        let decoded = decode_payload("k", &payload).unwrap();
        assert_eq!(decoded.bytes, b"\x89PNG\r\n");
        assert_eq!(decoded.mime_type, "image/png");
        assert_eq!(decoded.encoding, PayloadEncoding::JsonWrapped);
    }

    #[test]
    fn json_wrapper_nested_inline_data_and_snake_case() {
        let payload = bytes_payload(json!({
            "inline_data": { "data": STANDARD.encode(b"abc"), "mime_type": "audio/wav" }
        }));

        let decoded = decode_payload("k", &payload).unwrap();
        assert_eq!(decoded.bytes, b"abc");
        assert_eq!(decoded.mime_type, "audio/wav");
    }

    #[test]
    fn json_wrapper_with_byte_array() {
        let payload = bytes_payload(json!({ "data": [0, 1, 255], "mimeType": "video/mp4" }));
        let decoded = decode_payload("k", &payload).unwrap();
        assert_eq!(decoded.bytes, vec![0, 1, 255]);
        assert_eq!(decoded.mime_type, "video/mp4");
    }

    #[test]
    fn json_wrapper_without_mime_defaults_to_octet_stream() {
        let payload = bytes_payload(json!({ "data": STANDARD.encode(b"x") }));
        let decoded = decode_payload("k", &payload).unwrap();
        assert_eq!(decoded.mime_type, DEFAULT_MIME_TYPE);
    }

    #[test]
    fn json_wrapper_with_data_url_takes_mime_from_url() {
        let payload = bytes_payload(json!({
            "data": format!("data:image/jpeg;base64,{}", STANDARD.encode(b"jpg")),
        }));
        let decoded = decode_payload("k", &payload).unwrap();
        assert_eq!(decoded.bytes, b"jpg");
        assert_eq!(decoded.mime_type, "image/jpeg");
    }

    #[test]
    fn json_wrapper_with_plain_text_data_falls_back_to_utf8() {
        let payload = bytes_payload(json!({ "data": "hello, world!", "mimeType": "text/plain" }));
        let decoded = decode_payload("k", &payload).unwrap();
        assert_eq!(decoded.bytes, b"hello, world!");
        assert_eq!(decoded.encoding, PayloadEncoding::JsonWrapped);
    }

    #[rstest]
    #[case::object(json!({ "data": { "rows": [1, 2] }, "title": "q1" }))]
    #[case::number(json!({ "data": 42, "mimeType": "image/png" }))]
    #[case::boolean(json!({ "data": true }))]
    #[case::null(json!({ "data": null }))]
    #[case::out_of_range_array(json!({ "data": [1, 256] }))]
    #[case::nested_object(json!({ "inlineData": { "data": { "k": "v" } } }))]
    fn json_document_with_unusable_data_is_raw_bytes(#[case] document: serde_json::Value) {
        let payload = bytes_payload(document);
        let decoded = decode_payload("o/s/report.json/v1", &payload).unwrap();
        assert_eq!(decoded.encoding, PayloadEncoding::RawBytes);
        assert_eq!(decoded.bytes, payload.as_bytes());
        assert_eq!(decoded.mime_type, DEFAULT_MIME_TYPE);
    }

    #[test]
    fn text_json_document_with_unusable_data_is_utf8() {
        let text = r#"{"data":{"rows":[1,2]}}"#.to_string();
        let payload = StoredPayload::Text(text.clone());
        let decoded = decode_payload("k", &payload).unwrap();
        assert_eq!(decoded.encoding, PayloadEncoding::RawBytes);
        assert_eq!(decoded.bytes, text.into_bytes());
    }

    #[test]
    fn data_url_with_corrupt_base64_is_a_decode_error() {
        let payload = bytes_payload(json!({ "data": "data:image/png;base64,%%not base64%%" }));
        let err = decode_payload("o/s/a.png/v1", &payload).unwrap_err();
        match err {
            ResolveError::Decode {
                key,
                mime_type,
                size_bytes,
                reason,
            } => {
                assert_eq!(key, "o/s/a.png/v1");
                assert_eq!(mime_type, "image/png");
                assert_eq!(size_bytes, payload.len());
                assert!(reason.contains("base64"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn plain_json_document_is_raw_bytes() {
        let payload = bytes_payload(json!({ "name": "config", "values": [1, 2] }));
        let decoded = decode_payload("k", &payload).unwrap();
        assert_eq!(decoded.encoding, PayloadEncoding::RawBytes);
        assert_eq!(decoded.bytes, payload.as_bytes());
        assert_eq!(decoded.mime_type, DEFAULT_MIME_TYPE);
    }

    #[test]
    fn binary_bytes_are_taken_literally() {
        let payload = StoredPayload::Bytes(vec![0xff, 0x00, 0x10]);
        let decoded = decode_payload("k", &payload).unwrap();
        assert_eq!(decoded.bytes, vec![0xff, 0x00, 0x10]);
        assert_eq!(decoded.encoding, PayloadEncoding::RawBytes);
    }

    #[test]
    fn text_payload_is_base64_decoded() {
        let payload = StoredPayload::Text(encode_base64_text(b"\x00\x01binary"));
        let decoded = decode_payload("k", &payload).unwrap();
        assert_eq!(decoded.bytes, b"\x00\x01binary");
        assert_eq!(decoded.encoding, PayloadEncoding::Base64Text);
    }

    #[test]
    fn text_payload_that_is_not_base64_is_utf8() {
        let payload = StoredPayload::Text("not base64!".to_string());
        let decoded = decode_payload("k", &payload).unwrap();
        assert_eq!(decoded.bytes, b"not base64!");
        assert_eq!(decoded.encoding, PayloadEncoding::RawBytes);
    }

    #[test]
    fn url_safe_base64_is_accepted() {
        let raw = [0xfb_u8, 0xff, 0xfe];
        let payload = StoredPayload::Text(URL_SAFE.encode(raw));
        let decoded = decode_payload("k", &payload).unwrap();
        assert_eq!(decoded.bytes, raw);
    }

    #[test]
    fn json_wrapped_round_trip() {
        let original: Vec<u8> = (0..=255u8).collect();
        let payload = StoredPayload::Bytes(encode_json_wrapped(&original, "application/zip"));
        let decoded = decode_payload("k", &payload).unwrap();
        assert_eq!(decoded.bytes, original);
        assert_eq!(decoded.mime_type, "application/zip");
    }

    #[test]
    fn base64_text_round_trip() {
        let original: Vec<u8> = (0..=255u8).rev().collect();
        let payload = StoredPayload::Text(encode_base64_text(&original));
        assert_eq!(decode_payload("k", &payload).unwrap().bytes, original);
    }
}
