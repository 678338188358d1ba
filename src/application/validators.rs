use validator::ValidateEmail;

use crate::app_error::{AppError, AppResult, FieldError};

pub const EMAIL_MAX: usize = 250;
pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 50;
pub const NAME_MIN: usize = 1;
pub const NAME_MAX: usize = 50;

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.len() <= EMAIL_MAX && email.validate_email()
}

/// Accumulates field errors and turns them into `ValidationFailed`.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) {
        match value.map(str::trim) {
            None | Some("") => self.add(field, "must not be blank"),
            Some(v) if !is_valid_email(v) => self.add(field, "not a well-formed email address"),
            Some(_) => {}
        }
    }

    pub fn length(&mut self, field: &str, value: Option<&str>, min: usize, max: usize) {
        match value {
            None => self.add(field, "must not be blank"),
            Some(v) if v.trim().is_empty() => self.add(field, "must not be blank"),
            Some(v) => {
                let len = v.chars().count();
                if len < min || len > max {
                    self.add(field, &format!("size must be between {min} and {max}"));
                }
            }
        }
    }

    pub fn password(&mut self, field: &str, value: Option<&str>) {
        self.length(field, value, PASSWORD_MIN, PASSWORD_MAX);
    }

    pub fn finish(self) -> AppResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationFailed(self.0))
        }
    }
}

/// Checks a new password and its confirmation. A mismatch flags both fields.
pub fn check_new_password(
    errors: &mut FieldErrors,
    password: Option<&str>,
    retype_password: Option<&str>,
) {
    errors.password("password", password);
    errors.password("retype_password", retype_password);

    if let (Some(p), Some(r)) = (password, retype_password)
        && p != r
    {
        errors.add("password", "passwords do not match");
        errors.add("retype_password", "passwords do not match");
    }
}
