pub mod log;
pub mod resend;
