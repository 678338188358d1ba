pub mod change_password;
pub mod forgot_password;
pub mod session;
pub mod signup;
pub mod user;
pub mod verification;
