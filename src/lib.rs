pub mod config;
pub mod core;
pub mod domain;
pub mod fixtures;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::core::invoker::{Invocation, Invoker};
pub use crate::core::verifier::{VerificationDefinition, Verifier, VerifierOptions};
pub use crate::domain::model::{CaseResult, Value, ValueType, VerificationReport};
pub use crate::domain::ports::Fixture;
pub use crate::fixtures::{create_fixture, FixtureSettings, GuessRandom, MockedClass};
pub use crate::utils::error::{FixtureError, HarnessError, Result};
