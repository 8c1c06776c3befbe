//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON extractor with automatic validation.
///
/// Deserializes the request body and runs the `validator` crate's
/// `Validate` on the result. The first violation's message is passed
/// through verbatim as a 400 response, so DTOs can pin exact
/// user-facing messages on their `#[validate]` attributes.
pub struct ValidatedJson<T>(pub T);

/// Pick the message of the first violation, falling back to a generic one
fn first_validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for field '{}'.", field))
            })
        })
        .next()
        .unwrap_or_else(|| "Request validation failed.".to_string())
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;

        data.validate()
            .map_err(|e| AppError::BadRequest(first_validation_message(&e)))?;

        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Validate)]
    struct Payload {
        #[validate(range(min = 1, message = "Quantity must be a positive number."))]
        quantity: i32,
    }

    #[test]
    fn test_first_validation_message_is_verbatim() {
        let payload = Payload { quantity: -5 };
        let errors = payload.validate().unwrap_err();
        assert_eq!(
            first_validation_message(&errors),
            "Quantity must be a positive number."
        );
    }

    #[test]
    fn test_valid_payload_passes() {
        let payload = Payload { quantity: 3 };
        assert!(payload.validate().is_ok());
    }
}
