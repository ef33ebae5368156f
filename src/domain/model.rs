use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 夾具方法支援的參數與回傳型別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValueType {
    Void,
    Int,
    Double,
    String,
    IntArray,
    DoubleArray,
    StringArray,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown value type <{0}>")]
pub struct UnknownValueType(pub String);

impl ValueType {
    pub const ALL: [ValueType; 7] = [
        ValueType::Void,
        ValueType::Int,
        ValueType::Double,
        ValueType::String,
        ValueType::IntArray,
        ValueType::DoubleArray,
        ValueType::StringArray,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Void => "void",
            ValueType::Int => "int",
            ValueType::Double => "double",
            ValueType::String => "string",
            ValueType::IntArray => "int[]",
            ValueType::DoubleArray => "double[]",
            ValueType::StringArray => "string[]",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = UnknownValueType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // C++ 的型別寫法可能帶空白，例如 "vector< int >"
        let compact: String = s.split_whitespace().collect();
        let name = compact.strip_prefix("std::").unwrap_or(&compact);
        let ty = match name {
            "void" => ValueType::Void,
            "int" => ValueType::Int,
            "double" => ValueType::Double,
            "string" => ValueType::String,
            "int[]" | "vector<int>" => ValueType::IntArray,
            "double[]" | "vector<double>" => ValueType::DoubleArray,
            "string[]" | "vector<string>" | "vector<std::string>" => ValueType::StringArray,
            _ => return Err(UnknownValueType(s.to_string())),
        };
        Ok(ty)
    }
}

impl TryFrom<String> for ValueType {
    type Error = UnknownValueType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ValueType> for String {
    fn from(value: ValueType) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Void,
    Int(i32),
    Double(f64),
    Str(String),
    IntArray(Vec<i32>),
    DoubleArray(Vec<f64>),
    StringArray(Vec<String>),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Void => ValueType::Void,
            Value::Int(_) => ValueType::Int,
            Value::Double(_) => ValueType::Double,
            Value::Str(_) => ValueType::String,
            Value::IntArray(_) => ValueType::IntArray,
            Value::DoubleArray(_) => ValueType::DoubleArray,
            Value::StringArray(_) => ValueType::StringArray,
        }
    }

    /// 將一個 JSON 參數轉成指定型別，失敗時回傳原因
    pub fn from_json(json: &serde_json::Value, ty: ValueType) -> Result<Self, String> {
        let mismatch = || format!("expected {}, got {}", ty, json);
        match ty {
            ValueType::Void => json.is_null().then_some(Value::Void).ok_or_else(mismatch),
            ValueType::Int => json_to_int(json).map(Value::Int).ok_or_else(mismatch),
            ValueType::Double => json.as_f64().map(Value::Double).ok_or_else(mismatch),
            ValueType::String => json
                .as_str()
                .map(|s| Value::Str(s.to_string()))
                .ok_or_else(mismatch),
            ValueType::IntArray => json_array(json, json_to_int)
                .map(Value::IntArray)
                .ok_or_else(mismatch),
            ValueType::DoubleArray => json_array(json, serde_json::Value::as_f64)
                .map(Value::DoubleArray)
                .ok_or_else(mismatch),
            ValueType::StringArray => json_array(json, |v| v.as_str().map(str::to_string))
                .map(Value::StringArray)
                .ok_or_else(mismatch),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Void => serde_json::Value::Null,
            Value::Int(v) => serde_json::json!(v),
            Value::Double(v) => serde_json::json!(v),
            Value::Str(v) => serde_json::json!(v),
            Value::IntArray(v) => serde_json::json!(v),
            Value::DoubleArray(v) => serde_json::json!(v),
            Value::StringArray(v) => serde_json::json!(v),
        }
    }
}

fn json_to_int(json: &serde_json::Value) -> Option<i32> {
    json.as_i64().and_then(|v| i32::try_from(v).ok())
}

fn json_array<T>(
    json: &serde_json::Value,
    element: impl Fn(&serde_json::Value) -> Option<T>,
) -> Option<Vec<T>> {
    json.as_array()?.iter().map(element).collect()
}

/// 夾具靜態宣告的公開方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: &'static str,
    pub input: &'static [ValueType],
    pub output: ValueType,
}

impl MethodSignature {
    pub fn to_definition(&self) -> MethodDefinition {
        MethodDefinition {
            name: self.name.to_string(),
            input: self.input.iter().map(|t| t.to_string()).collect(),
            output: self.output.to_string(),
        }
    }
}

/// 驗證設定中要求的方法；型別名稱保留原字串，由簽章檢查負責解析
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDefinition {
    pub name: String,
    #[serde(default)]
    pub input: Vec<String>,
    pub output: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionStatistics {
    pub execute_time_ms: u64,
    pub memory_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseResult {
    pub score: i64,
    pub execute_time: i64,
    pub memory: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaseResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            score: 0,
            execute_time: -1,
            memory: -1,
            error: Some(error.into()),
        }
    }

    pub fn succeeded(score: i64, stats: ExecutionStatistics) -> Self {
        Self {
            score,
            execute_time: i64::try_from(stats.execute_time_ms).unwrap_or(i64::MAX),
            memory: i64::try_from(stats.memory_bytes).unwrap_or(i64::MAX),
            error: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub class_name: String,
    pub method: String,
    pub started_at: DateTime<Utc>,
    pub results: Vec<CaseResult>,
}
