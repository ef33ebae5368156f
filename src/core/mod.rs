pub mod invoker;
pub mod scoring;
pub mod signature;
pub mod verifier;

pub use crate::domain::model::{
    CaseResult, ExecutionStatistics, MethodDefinition, MethodSignature, Value, ValueType,
    VerificationReport,
};
pub use crate::domain::ports::{Args, Fixture};
pub use crate::utils::error::Result;
