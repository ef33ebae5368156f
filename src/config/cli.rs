use crate::config::toml_config::TomlConfig;
use crate::core::signature::find_method_by_name;
use crate::core::verifier::{VerificationDefinition, VerifierOptions};
use crate::fixtures::{create_fixture, FixtureSettings};
use crate::utils::error::{HarnessError, Result};
use crate::utils::validation::Validate;
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "verification-fixtures")]
#[command(about = "Invoke verification fixtures and report score, time and memory")]
pub struct CliConfig {
    /// Path to a TOML verification file
    #[arg(short, long, conflicts_with_all = ["class_name", "method"])]
    pub config: Option<String>,

    /// Fixture class to invoke directly
    #[arg(long = "class")]
    pub class_name: Option<String>,

    /// Method name on the fixture class
    #[arg(long, requires = "class_name")]
    pub method: Option<String>,

    /// Positional argument as JSON; bare text is taken as a string
    #[arg(long = "arg", allow_hyphen_values = true)]
    pub args: Vec<String>,

    #[arg(long, help = "Seed for guess() and scoring")]
    pub seed: Option<u64>,

    #[arg(long)]
    pub time_limit_ms: Option<u64>,

    #[arg(long)]
    pub max_memory_mb: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

fn parse_arg(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

impl CliConfig {
    /// 產生驗證定義與執行選項；命令列的設定覆蓋設定檔
    pub fn to_verification(&self) -> Result<(VerificationDefinition, VerifierOptions)> {
        let (definition, mut options) = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading verification from: {}", path);
                let config = TomlConfig::from_file(path)?;
                config.validate()?;
                (config.verification.clone(), config.verifier_options())
            }
            None => (self.direct_definition()?, VerifierOptions::default()),
        };

        if let Some(seed) = self.seed {
            options.settings.seed = Some(seed);
        }
        if let Some(limit) = self.time_limit_ms {
            options.time_limit = Some(Duration::from_millis(limit));
        }
        if let Some(limit) = self.max_memory_mb {
            options.max_memory_mb = Some(limit);
        }
        Ok((definition, options))
    }

    fn direct_definition(&self) -> Result<VerificationDefinition> {
        let (class_name, method) = match (&self.class_name, &self.method) {
            (Some(class_name), Some(method)) => (class_name, method),
            _ => {
                return Err(HarnessError::ConfigValidationError {
                    field: "cli".to_string(),
                    message: "--class and --method are required without --config".to_string(),
                })
            }
        };
        let fixture = create_fixture(class_name, &FixtureSettings::default())?;
        let signature = find_method_by_name(fixture.as_ref(), method)?;
        let args = self.args.iter().map(|raw| parse_arg(raw)).collect();

        Ok(VerificationDefinition {
            class_name: class_name.clone(),
            methods: vec![signature.to_definition()],
            inputs: vec![serde_json::Value::Array(args)],
        })
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.config.is_none() && (self.class_name.is_none() || self.method.is_none()) {
            return Err(HarnessError::ConfigValidationError {
                field: "cli".to_string(),
                message: "either --config or both --class and --method are required".to_string(),
            });
        }
        if let Some(limit) = self.time_limit_ms {
            crate::utils::validation::validate_positive_number("--time-limit-ms", limit, 1)?;
        }
        if let Some(limit) = self.max_memory_mb {
            crate::utils::validation::validate_positive_number("--max-memory-mb", limit, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_invocation_definition() {
        let config = CliConfig::parse_from([
            "verification-fixtures",
            "--class",
            "MockedClass",
            "--method",
            "testTimeUsage",
            "--arg",
            "-5",
            "--seed",
            "3",
        ]);
        assert!(config.validate().is_ok());

        let (definition, options) = config.to_verification().unwrap();
        assert_eq!(definition.methods[0].input, vec!["int".to_string()]);
        assert_eq!(definition.inputs, vec![json!([-5])]);
        assert_eq!(options.settings.seed, Some(3));
    }

    #[test]
    fn test_bare_text_argument_is_a_string() {
        assert_eq!(parse_arg("hello world"), json!("hello world"));
        assert_eq!(parse_arg("[1,2]"), json!([1, 2]));
        assert_eq!(parse_arg("\"7\""), json!("7"));
    }

    #[test]
    fn test_validation_requires_a_target() {
        let config = CliConfig::parse_from(["verification-fixtures", "--class", "MockedClass"]);
        assert!(config.validate().is_err());
    }
}
