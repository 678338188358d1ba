//! Transactional email bodies.

pub fn verify_email(link: &str) -> (&'static str, String) {
    (
        "Please verify your email",
        format!(
            "<p>Welcome! Please confirm your email address.</p>\
             <p><a href=\"{link}\">Verify email</a></p>"
        ),
    )
}

pub fn reset_password(link: &str) -> (&'static str, String) {
    (
        "Reset your password",
        format!(
            "<p>We received a request to reset your password.</p>\
             <p><a href=\"{link}\">Choose a new password</a></p>\
             <p>If you did not ask for this, you can ignore this email.</p>"
        ),
    )
}
