//! Request validation helpers.
//!
//! Request DTOs derive [`validator::Validate`]; [`validate`] turns the
//! resulting error tree into a single [`CoreError::Validation`] message.

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Run `validator` checks on `input`, mapping failures to [`CoreError::Validation`].
pub fn validate<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(describe(&errors)))
}

/// Flatten field errors into `field: message` pairs, sorted by field name.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let message = errs
                .iter()
                .find_map(|e| e.message.as_ref().map(ToString::to_string))
                .unwrap_or_else(|| format!("{field} is invalid"));
            format!("{field}: {message}")
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
