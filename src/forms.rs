//! Client-side form checks. A form that fails here is never sent.
//!
//! Field rules live on the request types as `validator` derives; this
//! module holds what the derives cannot express.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{ImageUpload, NewPost};

/// Passwords are ASCII letters and digits only.
pub static ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("valid regex"));

/// Single-field error for checks that happen outside a derived form.
pub fn field_error(field: &'static str, code: &'static str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, ValidationError::new(code));
    errors
}

fn check_image(image: Option<&ImageUpload>) -> Result<(), ValidationError> {
    match image {
        None => Err(ValidationError::new("required")),
        Some(img) if !img.is_png_or_jpeg() => Err(ValidationError::new("png_or_jpeg")),
        Some(_) => Ok(()),
    }
}

/// Title rules from the derive, plus a required PNG or JPEG image.
pub fn validate_new_post(post: &NewPost) -> Result<(), ValidationErrors> {
    let mut errors = match post.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };
    if let Err(e) = check_image(post.image.as_ref()) {
        errors.add("img", e);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
