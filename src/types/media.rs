//! Inline media payloads and data-URL bridging.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};

/// An image carried inline in a request or a result.
///
/// The bytes are kept decoded; base64 only exists at the wire and data-URL edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    pub mime_type: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Wrap raw bytes, sniffing the MIME type from magic numbers (PNG when unknown).
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let mime_type = crate::utils::mime::guess_mime_from_bytes(&data)
            .unwrap_or_else(|| "image/png".to_string());
        Self { mime_type, data }
    }

    /// Decode a base64 payload as returned by the provider.
    pub fn from_base64(mime_type: impl Into<String>, b64: &str) -> Result<Self> {
        Ok(Self::new(mime_type, STANDARD.decode(b64.trim())?))
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    ///
    /// A bare base64 string (no `data:` prefix) is accepted and sniffed.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let Some(rest) = url.trim().strip_prefix("data:") else {
            let data = STANDARD.decode(url.trim())?;
            return Ok(Self::from_bytes(data));
        };
        let (meta, payload) = rest.split_once(',').ok_or_else(|| {
            GenerationError::ParseError("data URL is missing the ',' separator".to_string())
        })?;
        let mime_type = meta
            .strip_suffix(";base64")
            .ok_or_else(|| {
                GenerationError::ParseError("only base64 data URLs are supported".to_string())
            })?
            .to_string();
        let mime_type = if mime_type.is_empty() {
            "application/octet-stream".to_string()
        } else {
            mime_type
        };
        Self::from_base64(mime_type, payload)
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// Render as a data URL suitable for an `<img src>`.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn parses_png_data_url() {
        let url = format!("data:image/png;base64,{}", STANDARD.encode(PNG_HEADER));
        let img = InlineImage::from_data_url(&url).unwrap();
        assert_eq!(img.mime_type, "image/png");
        assert_eq!(img.data, PNG_HEADER.to_vec());
        assert_eq!(img.to_data_url(), url);
    }

    #[test]
    fn bare_base64_is_sniffed() {
        let img = InlineImage::from_data_url(&STANDARD.encode(PNG_HEADER)).unwrap();
        assert_eq!(img.mime_type, "image/png");
    }

    #[test]
    fn rejects_non_base64_data_url() {
        let err = InlineImage::from_data_url("data:text/plain,hello").unwrap_err();
        assert!(matches!(err, GenerationError::ParseError(_)));
    }

    #[test]
    fn serde_uses_base64() {
        let img = InlineImage::new("image/jpeg", vec![1, 2, 3]);
        let json = serde_json::to_value(&img).unwrap();
        assert_eq!(json["data"], "AQID");
        let back: InlineImage = serde_json::from_value(json).unwrap();
        assert_eq!(back, img);
    }
}
