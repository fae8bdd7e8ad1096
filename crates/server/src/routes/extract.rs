//! Request extractors with API-shaped rejections.

use std::str::FromStr;

use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;

use crate::error::AppError;
use crate::models::EntityKind;

/// JSON body extractor that rejects with `400 { message }`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Parse an ID taken from the path.
///
/// A malformed ID can never name a stored record, so it is reported as
/// not found rather than as a bad request.
///
/// # Errors
///
/// Returns `AppError::NotFound` for `kind` if `raw` does not parse.
pub fn parse_id<T: FromStr>(raw: &str, kind: EntityKind) -> Result<T, AppError> {
    raw.parse().map_err(|_| AppError::NotFound(kind))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vetcare_core::OwnerId;

    use super::*;

    #[test]
    fn test_parse_id() {
        let id = OwnerId::generate();
        let parsed: OwnerId = parse_id(&id.to_string(), EntityKind::Owner).unwrap();
        assert_eq!(parsed, id);

        let err = parse_id::<OwnerId>("abc", EntityKind::Owner).unwrap_err();
        assert!(matches!(err, AppError::NotFound(EntityKind::Owner)));
    }
}
