//! Conversions from external infrastructure errors into domain errors.

use gantry_domain::GantryError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub GantryError);

impl From<InfraError> for GantryError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<GantryError> for InfraError {
    fn from(value: GantryError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoGantryError {
    fn into_gantry(self) -> GantryError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → GantryError */
/* -------------------------------------------------------------------------- */

impl IntoGantryError for HttpError {
    fn into_gantry(self) -> GantryError {
        if self.is_timeout() {
            return GantryError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return GantryError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return GantryError::Internal(format!("failed to decode response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => GantryError::Auth(message),
                404 => GantryError::NotFound(message),
                429 => GantryError::Network(message),
                400..=499 => GantryError::InvalidInput(message),
                _ => GantryError::Network(message),
            };
        }

        GantryError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_gantry())
    }
}

/// Shorthand for mapping a raw reqwest failure straight to the domain error.
pub(crate) fn http_err(err: HttpError) -> GantryError {
    InfraError::from(err).into()
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
