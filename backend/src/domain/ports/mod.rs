//! Ports connecting the domain to the outside world.
//!
//! Each port is an async trait plus its error enum and an always-compiled
//! fixture implementation. Persistence and email adapters live under
//! `outbound/`; tests use the fixtures or the generated mocks.

mod event_repository;
mod guest_repository;
mod mailer;
mod suggestion_repository;

pub use event_repository::{EventRepository, EventRepositoryError, FixtureEventRepository};
pub use guest_repository::{FixtureGuestRepository, GuestRepository, GuestRepositoryError};
pub use mailer::{ConfirmationMailer, FixtureMailer, MailReceipt, MailerError, RenderedEmail};
pub use suggestion_repository::{
    FixtureSuggestionRepository, SuggestionRepository, SuggestionRepositoryError,
};

#[cfg(test)]
pub use event_repository::MockEventRepository;
#[cfg(test)]
pub use guest_repository::MockGuestRepository;
#[cfg(test)]
pub use mailer::MockConfirmationMailer;
#[cfg(test)]
pub use suggestion_repository::MockSuggestionRepository;
