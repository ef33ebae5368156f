use crate::domain::model::{ExecutionStatistics, MethodSignature, Value};
use crate::domain::ports::Fixture;
use crate::utils::error::{HarnessError, Result};
use crate::utils::monitor::MemorySampler;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub output: Value,
    pub statistics: ExecutionStatistics,
}

/// 呼叫夾具方法並量測執行時間與記憶體峰值
#[derive(Debug, Clone, Default)]
pub struct Invoker {
    sampler: MemorySampler,
}

impl Invoker {
    pub fn new(sampler: MemorySampler) -> Self {
        Self { sampler }
    }

    pub fn coerce_args(
        signature: &MethodSignature,
        args: &[serde_json::Value],
    ) -> Result<Vec<Value>> {
        if args.len() != signature.input.len() {
            return Err(HarnessError::ArgumentMismatch {
                method: signature.name.to_string(),
                reason: format!(
                    "expected {} argument(s), got {}",
                    signature.input.len(),
                    args.len()
                ),
            });
        }

        signature
            .input
            .iter()
            .zip(args)
            .enumerate()
            .map(|(i, (ty, json))| {
                Value::from_json(json, *ty).map_err(|reason| HarnessError::ArgumentMismatch {
                    method: signature.name.to_string(),
                    reason: format!("argument {}: {}", i, reason),
                })
            })
            .collect()
    }

    pub fn invoke(
        &self,
        fixture: &mut dyn Fixture,
        signature: &MethodSignature,
        args: &[serde_json::Value],
    ) -> Result<Invocation> {
        let values = Self::coerce_args(signature, args)?;
        tracing::debug!("▶️ Invoking {}.{}", fixture.class_name(), signature.name);

        let ((output, elapsed), memory_bytes) = self.sampler.sample_during(|| {
            let start = Instant::now();
            let output = fixture.invoke(signature.name, values);
            (output, start.elapsed())
        });
        let output = output?;

        let statistics = ExecutionStatistics {
            execute_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            memory_bytes,
        };
        tracing::debug!(
            "⏱️ {}.{} finished in {} ms, peak memory {} bytes",
            fixture.class_name(),
            signature.name,
            statistics.execute_time_ms,
            statistics.memory_bytes
        );
        Ok(Invocation { output, statistics })
    }
}
