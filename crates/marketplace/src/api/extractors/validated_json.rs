//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use common::AppError;

/// JSON body that has passed its `validator` rules.
///
/// Malformed bodies and rule violations both surface as a 400 carrying the
/// first message.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(first_validation_message(&e)))?;

        Ok(ValidatedJson(value))
    }
}

fn first_validation_message(errors: &ValidationErrors) -> String {
    first_message(errors).unwrap_or_else(|| "Invalid request body".to_string())
}

/// Depth-first over fields in name order, descending into nested structs and lists.
fn first_message(errors: &ValidationErrors) -> Option<String> {
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    entries.into_iter().find_map(|(field, kind)| match kind {
        ValidationErrorsKind::Field(errs) => errs.first().map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid", field))
        }),
        ValidationErrorsKind::Struct(inner) => first_message(inner),
        ValidationErrorsKind::List(items) => items.values().find_map(|inner| first_message(inner)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Signup {
        #[validate(email(message = "Invalid email format"))]
        email: String,
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
    }

    #[test]
    fn reports_first_field_message() {
        let signup = Signup {
            email: "not-an-email".to_string(),
            name: String::new(),
        };
        let errors = signup.validate().unwrap_err();
        assert_eq!(first_validation_message(&errors), "Invalid email format");
    }

    #[derive(serde::Serialize, Validate)]
    struct Line {
        #[validate(range(min = 1, max = 10, message = "Quantity out of range"))]
        quantity: u32,
    }

    #[derive(Validate)]
    struct Basket {
        #[validate(length(min = 1, message = "Basket is empty"), nested)]
        lines: Vec<Line>,
    }

    #[test]
    fn reports_nested_list_message() {
        let basket = Basket {
            lines: vec![Line { quantity: 2 }, Line { quantity: 11 }],
        };
        let errors = basket.validate().unwrap_err();
        assert_eq!(first_validation_message(&errors), "Quantity out of range");

        let empty = Basket { lines: vec![] };
        let errors = empty.validate().unwrap_err();
        assert_eq!(first_validation_message(&errors), "Basket is empty");
    }
}
