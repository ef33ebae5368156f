use crate::domain::model::{MethodSignature, Value, ValueType};
use crate::domain::ports::{Args, Fixture};
use crate::fixtures::FixtureSettings;
use crate::utils::error::{FixtureError, HarnessError, Result};
use std::time::Duration;

type FixtureResult<T> = std::result::Result<T, FixtureError>;

const METHODS: &[MethodSignature] = &[
    MethodSignature {
        name: "testFullParameter",
        input: &[
            ValueType::Int,
            ValueType::Double,
            ValueType::String,
            ValueType::IntArray,
            ValueType::DoubleArray,
            ValueType::StringArray,
        ],
        output: ValueType::Int,
    },
    MethodSignature {
        name: "testVectorIntInOutSort",
        input: &[ValueType::IntArray],
        output: ValueType::IntArray,
    },
    MethodSignature {
        name: "testVectorDoubleInOutX2",
        input: &[ValueType::DoubleArray],
        output: ValueType::DoubleArray,
    },
    MethodSignature {
        name: "testVectorStrInOutReverse",
        input: &[ValueType::StringArray],
        output: ValueType::StringArray,
    },
    MethodSignature {
        name: "testReturnComplexStrAsItIs",
        input: &[ValueType::String],
        output: ValueType::String,
    },
    MethodSignature {
        name: "testMemoryUsage",
        input: &[ValueType::Int],
        output: ValueType::Int,
    },
    MethodSignature {
        name: "testTimeUsage",
        input: &[ValueType::Int],
        output: ValueType::Int,
    },
];

/// 涵蓋各種參數型別、錯誤路徑、記憶體與執行時間的夾具
pub struct MockedClass {
    memory_pause: Duration,
}

impl MockedClass {
    pub const CLASS_NAME: &'static str = "MockedClass";

    pub fn new(settings: &FixtureSettings) -> Self {
        Self {
            memory_pause: Duration::from_millis(settings.memory_usage_pause_ms),
        }
    }

    pub fn test_full_parameter(
        &self,
        a: i32,
        b: f64,
        c: &str,
        d: &[i32],
        e: &[f64],
        f: &[String],
    ) -> FixtureResult<i32> {
        if d.is_empty() {
            return Err(FixtureError::invalid_input("vector<int> must not be empty"));
        }
        if e.is_empty() {
            return Err(FixtureError::invalid_input("vector<double> must not be empty"));
        }
        if c == "INVALID" {
            return Err(FixtureError::invalid_input("string parameter is invalid"));
        }

        let mut ret = a.wrapping_add(b as i32).wrapping_add(c.len() as i32);
        ret = d.iter().fold(ret, |acc, x| acc.wrapping_add(*x));
        ret = e.iter().fold(ret, |acc, x| acc.wrapping_add(*x as i32));
        Ok(ret.wrapping_add(f.len() as i32))
    }

    pub fn test_vector_int_in_out_sort(&self, mut values: Vec<i32>) -> Vec<i32> {
        values.sort_unstable();
        values
    }

    pub fn test_vector_double_in_out_x2(&self, values: Vec<f64>) -> Vec<f64> {
        values.into_iter().map(|x| x * 2.0).collect()
    }

    pub fn test_vector_str_in_out_reverse(&self, mut values: Vec<String>) -> Vec<String> {
        values.reverse();
        values
    }

    pub fn test_return_complex_str_as_it_is(&self, s: String) -> String {
        s
    }

    pub fn test_memory_usage(&self, num_mb: i32) -> FixtureResult<i32> {
        if num_mb <= 0 {
            return Err(FixtureError::invalid_input("memory size must be positive"));
        }

        let requested = (num_mb as usize)
            .checked_mul(1 << 20)
            .ok_or(FixtureError::Allocation { requested: usize::MAX })?;
        let mut buffer: Vec<u8> = Vec::new();
        buffer
            .try_reserve_exact(requested)
            .map_err(|_| FixtureError::Allocation { requested })?;
        buffer.resize(requested, 0);

        // 每個位元組都要實際寫入，否則配置可能被最佳化掉
        buffer[0] = 1;
        for i in 0..requested - 1 {
            buffer[i + 1] = buffer[i].wrapping_add(buffer[i]);
        }
        let buffer = std::hint::black_box(buffer);

        std::thread::sleep(self.memory_pause);
        let ret = buffer[requested - 1] as i8 as i32;
        drop(buffer);
        std::thread::sleep(self.memory_pause);
        Ok(ret)
    }

    pub fn test_time_usage(&self, ms: i32) -> FixtureResult<i32> {
        if ms <= 0 {
            return Err(FixtureError::invalid_input("sleep time must be positive"));
        }
        std::thread::sleep(Duration::from_millis(ms as u64));
        Ok(ms)
    }
}

impl Default for MockedClass {
    fn default() -> Self {
        Self::new(&FixtureSettings::default())
    }
}

impl Fixture for MockedClass {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn methods(&self) -> &'static [MethodSignature] {
        METHODS
    }

    fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value> {
        let mut args = Args::new(method, args);
        let value = match method {
            "testFullParameter" => {
                let a = args.int()?;
                let b = args.double()?;
                let c = args.string()?;
                let d = args.int_array()?;
                let e = args.double_array()?;
                let f = args.string_array()?;
                args.finish()?;
                Value::Int(self.test_full_parameter(a, b, &c, &d, &e, &f)?)
            }
            "testVectorIntInOutSort" => {
                let values = args.int_array()?;
                args.finish()?;
                Value::IntArray(self.test_vector_int_in_out_sort(values))
            }
            "testVectorDoubleInOutX2" => {
                let values = args.double_array()?;
                args.finish()?;
                Value::DoubleArray(self.test_vector_double_in_out_x2(values))
            }
            "testVectorStrInOutReverse" => {
                let values = args.string_array()?;
                args.finish()?;
                Value::StringArray(self.test_vector_str_in_out_reverse(values))
            }
            "testReturnComplexStrAsItIs" => {
                let s = args.string()?;
                args.finish()?;
                Value::Str(self.test_return_complex_str_as_it_is(s))
            }
            "testMemoryUsage" => {
                let num_mb = args.int()?;
                args.finish()?;
                Value::Int(self.test_memory_usage(num_mb)?)
            }
            "testTimeUsage" => {
                let ms = args.int()?;
                args.finish()?;
                Value::Int(self.test_time_usage(ms)?)
            }
            _ => {
                return Err(HarnessError::MethodNotFound {
                    method: method.to_string(),
                    class_name: Self::CLASS_NAME.to_string(),
                })
            }
        };
        Ok(value)
    }
}
