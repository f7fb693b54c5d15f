//! Sign-up flow adapters.

mod registration;

pub use registration::RegistrationPathFlow;
