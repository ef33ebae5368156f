use crate::core::verifier::{VerificationDefinition, VerifierOptions};
use crate::fixtures::FixtureSettings;
use crate::utils::error::{HarnessError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const MAX_PAUSE_MS: u64 = 60_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub harness: HarnessConfig,
    #[serde(default)]
    pub fixtures: FixtureSettings,
    pub verification: VerificationDefinition,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    pub time_limit_ms: Option<u64>,
    /// 記憶體上限 (MB)，比對的是整個行程的峰值 RSS，包含 harness 本身的佔用，
    /// 不只是夾具呼叫配置的記憶體
    pub max_memory_mb: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HarnessError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HarnessError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FIXTURE_SEED})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HarnessError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn verifier_options(&self) -> VerifierOptions {
        VerifierOptions {
            settings: self.fixtures.clone(),
            time_limit: self.harness.time_limit_ms.map(Duration::from_millis),
            max_memory_mb: self.harness.max_memory_mb,
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("verification.class_name", &self.verification.class_name)?;

        if self.verification.methods.is_empty() {
            return Err(HarnessError::ConfigValidationError {
                field: "verification.methods".to_string(),
                message: "at least one method is required".to_string(),
            });
        }
        for method in &self.verification.methods {
            validate_non_empty_string("verification.methods.name", &method.name)?;
        }

        if let Some(limit) = self.harness.time_limit_ms {
            validate_positive_number("harness.time_limit_ms", limit, 1)?;
        }
        if let Some(limit) = self.harness.max_memory_mb {
            validate_positive_number("harness.max_memory_mb", limit, 1)?;
        }

        validate_range(
            "fixtures.memory_and_time_pause_ms",
            self.fixtures.memory_and_time_pause_ms,
            0,
            MAX_PAUSE_MS,
        )?;
        validate_range(
            "fixtures.memory_usage_pause_ms",
            self.fixtures.memory_usage_pause_ms,
            0,
            MAX_PAUSE_MS,
        )?;

        Ok(())
    }
}
