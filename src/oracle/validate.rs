//! Input checks that run before anything is sent upstream.

use super::types::{ChatRequest, HistoryTurn};
use crate::{
    error::ValidationKind,
    llm::{InlineImage, Turn},
};
use base64::{
    Engine,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

/// Mime type assumed when the caller sends a bare base64 payload.
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Chat input after validation: trimmed message, normalized history.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidChat {
    pub message: String,
    pub history: Vec<Turn>,
    pub name: Option<String>,
    pub birth_date: Option<String>,
}

/// Maps a declared image subtype (or full mime type) to the canonical mime type.
pub fn normalize_mime(declared: &str) -> Result<&'static str, ValidationKind> {
    let subtype = declared.trim().to_ascii_lowercase();
    let subtype = subtype.strip_prefix("image/").unwrap_or(&subtype);
    match subtype {
        "png" => Ok("image/png"),
        "jpeg" | "jpg" => Ok("image/jpeg"),
        _ => Err(ValidationKind::InvalidImageFormat),
    }
}

/// Accepts `data:image/<png|jpeg|jpg>;base64,<payload>` or a bare base64 payload.
pub fn image_payload(image_data: Option<&str>) -> Result<InlineImage, ValidationKind> {
    let raw = image_data
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ValidationKind::InvalidImageFormat)?;

    let (mime_type, payload) = match raw.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest
                .split_once(',')
                .ok_or(ValidationKind::InvalidImageFormat)?;
            let declared = header
                .strip_suffix(";base64")
                .ok_or(ValidationKind::InvalidImageFormat)?;
            (normalize_mime(declared)?, payload.trim())
        }
        None => (DEFAULT_IMAGE_MIME, raw),
    };

    if payload.is_empty() || PAYLOAD_ENGINE.decode(payload).is_err() {
        return Err(ValidationKind::InvalidImageFormat);
    }

    Ok(InlineImage {
        mime_type: mime_type.to_string(),
        data: payload.to_string(),
    })
}

pub fn chat_request(request: ChatRequest) -> Result<ValidChat, ValidationKind> {
    let message = request
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or(ValidationKind::MissingMessage)?
        .to_string();

    let history = request
        .history
        .into_iter()
        .filter_map(HistoryTurn::into_turn)
        .collect();

    Ok(ValidChat {
        message,
        history,
        name: non_blank(request.name),
        birth_date: non_blank(request.birth_date),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
