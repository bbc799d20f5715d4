use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

/// Where the encoding of a body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSource {
    ByteOrderMark,
    Charset,
    /// JSON without a charset is UTF-8 by definition.
    JsonDefault,
    Sniffed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding: &'static str,
    pub origin: EncodingSource,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("body is not valid {encoding} ({origin:?})")]
pub struct DecodeError {
    pub encoding: &'static str,
    pub origin: EncodingSource,
}

/// Lower-cased media type without parameters, e.g. `text/html`.
pub(crate) fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub fn is_json_media_type(content_type: &str) -> bool {
    let essence = media_type(content_type);
    essence == "application/json" || essence.ends_with("+json")
}

/// Decode a response body to text.
///
/// A byte order mark wins over a declared charset, which wins over the JSON
/// default. Anything else is sniffed.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedBody, DecodeError> {
    let (encoding, origin) = detect(bytes, content_type);
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError {
            encoding: encoding.name(),
            origin,
        });
    }
    Ok(DecodedBody {
        text: text.into_owned(),
        encoding: encoding.name(),
        origin,
    })
}

fn detect(bytes: &[u8], content_type: Option<&str>) -> (&'static Encoding, EncodingSource) {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return (encoding, EncodingSource::ByteOrderMark);
    }
    let declared = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()));
    if let Some(encoding) = declared {
        return (encoding, EncodingSource::Charset);
    }
    if content_type.is_some_and(is_json_media_type) {
        return (UTF_8, EncodingSource::JsonDefault);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    (detector.guess(None, true), EncodingSource::Sniffed)
}

fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(|c| c == '"' || c == '\''))
    })
}
