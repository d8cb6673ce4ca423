//! Traits for external collaborators reached from the auth core.

pub mod mailer;

pub use mailer::{Mailer, NullMailer};
