//! # ELBv2 Error Mapping
//!
//! Maps service error codes to `ProviderError` kinds.

use crate::constants::{ERR_CODE_TARGET_GROUP_NOT_FOUND, TRANSIENT_CLIENT_ERROR_CODES};
use crate::provider::ProviderError;
use aws_sdk_elasticloadbalancingv2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

/// Classify an error by its service code
///
/// A missing code means the request never produced a service response.
#[must_use]
pub fn classify_error(code: Option<&str>, message: Option<&str>, display: String) -> ProviderError {
    let Some(code) = code else {
        return ProviderError::Transport(display);
    };
    let message = message.map_or(display, ToString::to_string);

    if code == ERR_CODE_TARGET_GROUP_NOT_FOUND {
        ProviderError::GroupNotFound { message }
    } else if TRANSIENT_CLIENT_ERROR_CODES.contains(&code) {
        ProviderError::TransientClient {
            code: code.to_string(),
            message,
        }
    } else {
        ProviderError::Api {
            code: code.to_string(),
            message,
        }
    }
}

/// Convert an SDK error into a `ProviderError`
pub fn from_sdk_error<E, R>(err: &SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    classify_error(
        err.code(),
        err.message(),
        DisplayErrorContext(err).to_string(),
    )
}
