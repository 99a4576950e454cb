//! Email delivery adapters.

mod resend;

pub use resend::ResendMailer;
