//! One-time, time-boxed password reset tokens.

pub mod flow;

pub use flow::PasswordResetFlow;
