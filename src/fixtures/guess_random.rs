use crate::domain::model::{MethodSignature, Value, ValueType};
use crate::domain::ports::{Args, Fixture};
use crate::fixtures::FixtureSettings;
use crate::utils::error::{FixtureError, HarnessError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

pub const SIZE: usize = 2 * 1024 * 1024;

const METHODS: &[MethodSignature] = &[
    MethodSignature {
        name: "voidMethod",
        input: &[],
        output: ValueType::Void,
    },
    MethodSignature {
        name: "testError",
        input: &[],
        output: ValueType::Int,
    },
    MethodSignature {
        name: "guess",
        input: &[],
        output: ValueType::Int,
    },
    MethodSignature {
        name: "testArrayOfInt",
        input: &[ValueType::IntArray],
        output: ValueType::Int,
    },
    MethodSignature {
        name: "testMemoryAndTime",
        input: &[],
        output: ValueType::Int,
    },
    MethodSignature {
        name: "testArrayOfString",
        input: &[ValueType::StringArray],
        output: ValueType::Int,
    },
];

pub struct GuessRandom {
    rng: StdRng,
    pause: Duration,
}

impl GuessRandom {
    pub const CLASS_NAME: &'static str = "GuessRandom";

    pub fn new(settings: &FixtureSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            pause: Duration::from_millis(settings.memory_and_time_pause_ms),
        }
    }

    // 不在公開方法表上
    #[allow(dead_code)]
    fn private_method(&self) -> i32 {
        1
    }

    pub fn void_method(&self) {}

    pub fn test_error(&self) -> std::result::Result<i32, FixtureError> {
        Err(FixtureError::VerificationFailed)
    }

    pub fn guess(&mut self) -> i32 {
        self.rng.random_range(0..100)
    }

    pub fn test_array_of_int(&self, values: &[i32]) -> i32 {
        values.iter().fold(0i32, |total, v| total.wrapping_add(*v))
    }

    pub fn test_memory_and_time(&self) -> i32 {
        let buffer = vec![0i32; SIZE];
        std::thread::sleep(self.pause);
        (std::hint::black_box(&buffer).len() % 100) as i32
    }

    pub fn test_array_of_string(&self, _values: &[String]) -> i32 {
        (SIZE % 100) as i32
    }
}

impl Default for GuessRandom {
    fn default() -> Self {
        Self::new(&FixtureSettings::default())
    }
}

impl Fixture for GuessRandom {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn methods(&self) -> &'static [MethodSignature] {
        METHODS
    }

    fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value> {
        let mut args = Args::new(method, args);
        let value = match method {
            "voidMethod" => {
                args.finish()?;
                self.void_method();
                Value::Void
            }
            "testError" => {
                args.finish()?;
                Value::Int(self.test_error()?)
            }
            "guess" => {
                args.finish()?;
                Value::Int(self.guess())
            }
            "testArrayOfInt" => {
                let values = args.int_array()?;
                args.finish()?;
                Value::Int(self.test_array_of_int(&values))
            }
            "testMemoryAndTime" => {
                args.finish()?;
                Value::Int(self.test_memory_and_time())
            }
            "testArrayOfString" => {
                let values = args.string_array()?;
                args.finish()?;
                Value::Int(self.test_array_of_string(&values))
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
