use crate::core::invoker::{Invocation, Invoker};
use crate::core::scoring::Scorer;
use crate::core::signature::find_method;
use crate::domain::model::{CaseResult, MethodDefinition, MethodSignature, VerificationReport};
use crate::domain::ports::Fixture;
use crate::fixtures::{create_fixture, FixtureSettings};
use crate::utils::error::{HarnessError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// 一次驗證：類別、方法與所有輸入案例
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationDefinition {
    pub class_name: String,
    pub methods: Vec<MethodDefinition>,
    /// 每個案例是一個依位置排列的參數陣列
    #[serde(default)]
    pub inputs: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default)]
pub struct VerifierOptions {
    pub settings: FixtureSettings,
    pub time_limit: Option<Duration>,
    pub max_memory_mb: Option<u64>,
}

pub struct Verifier {
    options: VerifierOptions,
    invoker: Arc<Invoker>,
}

type CaseOutcome = (Option<Box<dyn Fixture>>, Result<Invocation>);

fn case_arguments(
    signature: &MethodSignature,
    input: &serde_json::Value,
) -> Result<Vec<serde_json::Value>> {
    if signature.input.is_empty() {
        return Ok(Vec::new());
    }
    input
        .as_array()
        .cloned()
        .ok_or_else(|| HarnessError::ArgumentMismatch {
            method: signature.name.to_string(),
            reason: format!("case input must be an array of arguments, got {}", input),
        })
}

impl Verifier {
    pub fn new(options: VerifierOptions) -> Self {
        Self::with_invoker(options, Invoker::default())
    }

    pub fn with_invoker(options: VerifierOptions, invoker: Invoker) -> Self {
        Self {
            options,
            invoker: Arc::new(invoker),
        }
    }

    pub async fn run(&self, definition: &VerificationDefinition) -> VerificationReport {
        let started_at = Utc::now();
        let method_name = definition
            .methods
            .first()
            .map(|m| m.name.clone())
            .unwrap_or_default();
        tracing::info!(
            "🚀 Verifying {}.{} with {} case(s)",
            definition.class_name,
            method_name,
            definition.inputs.len()
        );

        let results = match self.resolve(definition) {
            Ok((fixture, signature)) => self.run_cases(definition, fixture, signature).await,
            Err(e) => {
                tracing::error!("❌ Signature check failed: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                definition
                    .inputs
                    .iter()
                    .map(|_| CaseResult::failed(e.to_string()))
                    .collect()
            }
        };

        VerificationReport {
            class_name: definition.class_name.clone(),
            method: method_name,
            started_at,
            results,
        }
    }

    fn resolve(
        &self,
        definition: &VerificationDefinition,
    ) -> Result<(Box<dyn Fixture>, &'static MethodSignature)> {
        let method = definition
            .methods
            .first()
            .ok_or_else(|| HarnessError::ConfigValidationError {
                field: "verification.methods".to_string(),
                message: "at least one method is required".to_string(),
            })?;
        let fixture = create_fixture(&definition.class_name, &self.options.settings)?;
        let signature = find_method(fixture.as_ref(), method)?;
        Ok((fixture, signature))
    }

    async fn run_cases(
        &self,
        definition: &VerificationDefinition,
        fixture: Box<dyn Fixture>,
        signature: &'static MethodSignature,
    ) -> Vec<CaseResult> {
        let mut scorer = Scorer::new(self.options.settings.seed);
        let mut fixture = Some(fixture);
        let mut results = Vec::with_capacity(definition.inputs.len());

        for (index, input) in definition.inputs.iter().enumerate() {
            let current = match fixture.take() {
                Some(current) => current,
                None => match create_fixture(&definition.class_name, &self.options.settings) {
                    Ok(fresh) => fresh,
                    Err(e) => {
                        results.push(CaseResult::failed(e.to_string()));
                        continue;
                    }
                },
            };

            let (returned, outcome) = self.run_case(current, signature, input).await;
            fixture = returned;

            let result = match outcome.and_then(|inv| self.check_limits(inv)) {
                Ok(invocation) => {
                    let score = scorer.score(&invocation.output);
                    tracing::info!(
                        "✅ Case {} scored {} ({} ms, {} bytes)",
                        index,
                        score,
                        invocation.statistics.execute_time_ms,
                        invocation.statistics.memory_bytes
                    );
                    CaseResult::succeeded(score, invocation.statistics)
                }
                Err(e) => {
                    tracing::warn!("⚠️ Case {} failed: {}", index, e);
                    CaseResult::failed(e.to_string())
                }
            };
            results.push(result);
        }

        results
    }

    async fn run_case(
        &self,
        fixture: Box<dyn Fixture>,
        signature: &'static MethodSignature,
        input: &serde_json::Value,
    ) -> CaseOutcome {
        let args = match case_arguments(signature, input) {
            Ok(args) => args,
            Err(e) => return (Some(fixture), Err(e)),
        };

        let invoker = Arc::clone(&self.invoker);
        let mut task = tokio::task::spawn_blocking(move || {
            let mut fixture = fixture;
            let result = invoker.invoke(fixture.as_mut(), signature, &args);
            (fixture, result)
        });

        let joined = match self.options.time_limit {
            Some(limit) => match tokio::time::timeout(limit, &mut task).await {
                Ok(joined) => joined,
                Err(_) => {
                    // 阻塞中的工作無法中止；放棄這個實例，下一個案例重新建立
                    let limit_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                    return (None, Err(HarnessError::TimeLimitExceeded { limit_ms }));
                }
            },
            None => task.await,
        };

        match joined {
            Ok((fixture, result)) => (Some(fixture), result),
            Err(e) => (
                None,
                Err(HarnessError::WorkerError {
                    message: e.to_string(),
                }),
            ),
        }
    }

    fn check_limits(&self, invocation: Invocation) -> Result<Invocation> {
        if let Some(limit_mb) = self.options.max_memory_mb {
            if invocation.statistics.memory_bytes > limit_mb.saturating_mul(1024 * 1024) {
                return Err(HarnessError::MemoryLimitExceeded { limit_mb });
            }
        }
        Ok(invocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fast_options() -> VerifierOptions {
        VerifierOptions {
            settings: FixtureSettings {
                memory_and_time_pause_ms: 5,
                memory_usage_pause_ms: 5,
                seed: Some(42),
            },
            ..VerifierOptions::default()
        }
    }

    fn definition(
        class_name: &str,
        method: MethodDefinition,
        inputs: Vec<serde_json::Value>,
    ) -> VerificationDefinition {
        VerificationDefinition {
            class_name: class_name.to_string(),
            methods: vec![method],
            inputs,
        }
    }

    fn method(name: &str, input: &[&str], output: &str) -> MethodDefinition {
        MethodDefinition {
            name: name.to_string(),
            input: input.iter().map(|s| s.to_string()).collect(),
            output: output.to_string(),
        }
    }

    #[tokio::test]
    async fn test_runs_every_case() {
        let verifier = Verifier::new(fast_options());
        let def = definition(
            "MockedClass",
            method("testTimeUsage", &["int"], "int"),
            vec![json!([10]), json!([0]), json!([20])],
        );
        let report = verifier.run(&def).await;

        assert_eq!(report.method, "testTimeUsage");
        assert_eq!(report.results.len(), 3);
        assert!(!report.results[0].is_error());
        assert!(report.results[0].execute_time >= 10);
        assert_eq!(
            report.results[1],
            CaseResult::failed("sleep time must be positive")
        );
        assert!(!report.results[2].is_error());
    }

    #[tokio::test]
    async fn test_signature_failure_marks_all_cases() {
        let verifier = Verifier::new(fast_options());
        let def = definition(
            "MockedClass",
            method("testVectorStrInOutReverse", &["int[]"], "string[]"),
            vec![json!([[1]]), json!([[2]])],
        );
        let report = verifier.run(&def).await;
        assert_eq!(report.results.len(), 2);
        for result in &report.results {
            assert_eq!(
                result.error.as_deref(),
                Some("The match public method testVectorStrInOutReverse in class MockedClass cannot be found")
            );
            assert_eq!((result.score, result.execute_time, result.memory), (0, -1, -1));
        }
    }

    #[tokio::test]
    async fn test_time_limit_replaces_fixture() {
        let verifier = Verifier::new(VerifierOptions {
            time_limit: Some(Duration::from_millis(50)),
            ..fast_options()
        });
        let def = definition(
            "MockedClass",
            method("testTimeUsage", &["int"], "int"),
            vec![json!([400]), json!([5])],
        );
        let report = verifier.run(&def).await;
        assert_eq!(
            report.results[0].error.as_deref(),
            Some("time limit of 50 ms exceeded")
        );
        assert!(!report.results[1].is_error());
    }

    #[tokio::test]
    async fn test_zero_argument_method_ignores_case_input() {
        let verifier = Verifier::new(fast_options());
        let def = definition(
            "GuessRandom",
            method("guess", &[], "int"),
            vec![json!(null), json!([1, 2, 3])],
        );
        let report = verifier.run(&def).await;
        assert!(report.results.iter().all(|r| !r.is_error()));
    }

    #[tokio::test]
    async fn test_missing_methods_is_an_error() {
        let verifier = Verifier::new(fast_options());
        let def = VerificationDefinition {
            class_name: "GuessRandom".to_string(),
            methods: vec![],
            inputs: vec![json!([])],
        };
        let report = verifier.run(&def).await;
        assert!(report.results[0].is_error());
    }

    #[tokio::test]
    async fn test_memory_limit_fails_case() {
        // 沒有 sysinfo 時記憶體一律回報 0，無從超過上限
        if !crate::utils::monitor::MemorySampler::default().is_enabled() {
            return;
        }
        let verifier = Verifier::new(VerifierOptions {
            max_memory_mb: Some(1),
            ..fast_options()
        });
        let def = definition(
            "MockedClass",
            method("testMemoryUsage", &["int"], "int"),
            vec![json!([64]), json!([0])],
        );
        let report = verifier.run(&def).await;

        assert_eq!(
            report.results[0],
            CaseResult::failed("memory limit of 1 MB exceeded")
        );
        let r = &report.results[0];
        assert_eq!((r.score, r.execute_time, r.memory), (0, -1, -1));
        // 之後的案例照常執行
        assert_eq!(
            report.results[1],
            CaseResult::failed("memory size must be positive")
        );
    }

    #[tokio::test]
    async fn test_memory_limit_above_peak_passes() {
        let verifier = Verifier::new(VerifierOptions {
            max_memory_mb: Some(u64::MAX / (1024 * 1024)),
            ..fast_options()
        });
        let def = definition(
            "MockedClass",
            method("testMemoryUsage", &["int"], "int"),
            vec![json!([1])],
        );
        let report = verifier.run(&def).await;
        assert!(!report.results[0].is_error());
    }
}
