pub mod registration;
pub mod roster;

pub use registration::{Module, RegistrationPayload, RegistrationResult};
pub use roster::{BaseRow, RosterRow};
