use crate::domain::model::{MethodSignature, Value};
use crate::utils::error::{HarnessError, Result};

/// 可由驗證工具呼叫的測試夾具
pub trait Fixture: Send {
    fn class_name(&self) -> &'static str;

    /// 公開方法表；不在表上的方法對驗證工具不可見
    fn methods(&self) -> &'static [MethodSignature];

    fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value>;
}

/// 依位置取出型別化參數
pub struct Args {
    method: String,
    values: std::vec::IntoIter<Value>,
    position: usize,
}

impl Args {
    pub fn new(method: &str, values: Vec<Value>) -> Self {
        Self {
            method: method.to_string(),
            values: values.into_iter(),
            position: 0,
        }
    }

    fn mismatch(&self, reason: String) -> HarnessError {
        HarnessError::ArgumentMismatch {
            method: self.method.clone(),
            reason,
        }
    }

    fn next_value(&mut self, expected: &str) -> Result<Value> {
        let position = self.position;
        self.position += 1;
        self.values.next().ok_or_else(|| {
            self.mismatch(format!("missing argument {} ({})", position, expected))
        })
    }

    fn wrong_type(&self, expected: &str, got: &Value) -> HarnessError {
        self.mismatch(format!(
            "argument {} expected {}, got {}",
            self.position - 1,
            expected,
            got.value_type()
        ))
    }

    pub fn int(&mut self) -> Result<i32> {
        match self.next_value("int")? {
            Value::Int(v) => Ok(v),
            other => Err(self.wrong_type("int", &other)),
        }
    }

    pub fn double(&mut self) -> Result<f64> {
        match self.next_value("double")? {
            Value::Double(v) => Ok(v),
            other => Err(self.wrong_type("double", &other)),
        }
    }

    pub fn string(&mut self) -> Result<String> {
        match self.next_value("string")? {
            Value::Str(v) => Ok(v),
            other => Err(self.wrong_type("string", &other)),
        }
    }

    pub fn int_array(&mut self) -> Result<Vec<i32>> {
        match self.next_value("int[]")? {
            Value::IntArray(v) => Ok(v),
            other => Err(self.wrong_type("int[]", &other)),
        }
    }

    pub fn double_array(&mut self) -> Result<Vec<f64>> {
        match self.next_value("double[]")? {
            Value::DoubleArray(v) => Ok(v),
            other => Err(self.wrong_type("double[]", &other)),
        }
    }

    pub fn string_array(&mut self) -> Result<Vec<String>> {
        match self.next_value("string[]")? {
            Value::StringArray(v) => Ok(v),
            other => Err(self.wrong_type("string[]", &other)),
        }
    }

    /// 所有參數都已取出後呼叫，多餘參數視為錯誤
    pub fn finish(mut self) -> Result<()> {
        let extra = self.values.by_ref().count();
        if extra > 0 {
            return Err(self.mismatch(format!("{} unexpected extra argument(s)", extra)));
        }
        Ok(())
    }
}
