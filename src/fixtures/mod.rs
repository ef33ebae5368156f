pub mod guess_random;
pub mod mocked_class;

use crate::domain::ports::Fixture;
use crate::utils::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};

pub use guess_random::GuessRandom;
pub use mocked_class::MockedClass;

pub const AVAILABLE_CLASSES: &[&str] = &[GuessRandom::CLASS_NAME, MockedClass::CLASS_NAME];

/// 夾具的固定暫停時間與亂數種子
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureSettings {
    pub memory_and_time_pause_ms: u64,
    pub memory_usage_pause_ms: u64,
    pub seed: Option<u64>,
}

impl Default for FixtureSettings {
    fn default() -> Self {
        Self {
            memory_and_time_pause_ms: 1000,
            memory_usage_pause_ms: 200,
            seed: None,
        }
    }
}

pub fn create_fixture(class_name: &str, settings: &FixtureSettings) -> Result<Box<dyn Fixture>> {
    match class_name {
        GuessRandom::CLASS_NAME => Ok(Box::new(GuessRandom::new(settings))),
        MockedClass::CLASS_NAME => Ok(Box::new(MockedClass::new(settings))),
        _ => Err(HarnessError::ClassNotFound {
            class_name: class_name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_known_fixtures() {
        let settings = FixtureSettings::default();
        for name in AVAILABLE_CLASSES {
            let fixture = create_fixture(name, &settings).unwrap();
            assert_eq!(fixture.class_name(), *name);
            assert!(!fixture.methods().is_empty());
        }
    }

    #[test]
    fn test_unknown_class() {
        let err = create_fixture("Nope", &FixtureSettings::default())
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "The class Nope cannot be found");
    }

    #[test]
    fn test_settings_defaults_fill_missing_fields() {
        let settings: FixtureSettings = serde_json::from_str(r#"{"seed": 3}"#).unwrap();
        assert_eq!(settings.memory_and_time_pause_ms, 1000);
        assert_eq!(settings.memory_usage_pause_ms, 200);
        assert_eq!(settings.seed, Some(3));
    }
}
