pub mod config;
pub mod domain;
pub mod errors;

pub use config::{AppConfig, ConfigError, LoadOptions, RegistrationScope};
pub use domain::mode::{Mode, MODE_KEY};
pub use errors::{ApplicationError, DomainError, InterfaceError};
