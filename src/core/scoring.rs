use crate::domain::model::Value;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 依整數值 x 與隨機值 y 計分：y > x 得 0 分，否則 100 - x + y
pub fn score_from(x: i64, y: i64) -> i64 {
    if y > x {
        0
    } else {
        100i64.saturating_sub(x).saturating_add(y)
    }
}

// 取字串開頭的整數部分，例如 "42abc" -> 42
fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|v| sign * v)
}

fn truncate(v: f64) -> Option<i64> {
    (v.is_finite() && v.abs() < i64::MAX as f64).then(|| v.trunc() as i64)
}

/// 輸出值的整數解讀；void、非數字字串、空序列沒有整數值
pub fn integer_view(value: &Value) -> Option<i64> {
    match value {
        Value::Void => None,
        Value::Int(v) => Some(i64::from(*v)),
        Value::Double(v) => truncate(*v),
        Value::Str(s) => leading_integer(s),
        Value::IntArray(v) => v.first().map(|x| i64::from(*x)),
        Value::DoubleArray(v) => v.first().and_then(|x| truncate(*x)),
        Value::StringArray(v) => v.first().and_then(|s| leading_integer(s)),
    }
}

pub struct Scorer {
    rng: StdRng,
}

impl Scorer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }

    pub fn score(&mut self, output: &Value) -> i64 {
        let x = integer_view(output).unwrap_or_else(|| self.rng.random_range(0..100));
        let factor: f64 = self.rng.random();
        let y = truncate(x as f64 * factor).unwrap_or(0);
        score_from(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_from() {
        assert_eq!(score_from(40, 10), 70);
        assert_eq!(score_from(0, 0), 100);
        assert_eq!(score_from(10, 11), 0);
    }

    #[test]
    fn test_integer_view() {
        assert_eq!(integer_view(&Value::Int(7)), Some(7));
        assert_eq!(integer_view(&Value::Double(-2.9)), Some(-2));
        assert_eq!(integer_view(&Value::Double(f64::NAN)), None);
        assert_eq!(integer_view(&Value::Str(" 42abc".to_string())), Some(42));
        assert_eq!(integer_view(&Value::Str("-5".to_string())), Some(-5));
        assert_eq!(integer_view(&Value::Str("abc".to_string())), None);
        assert_eq!(integer_view(&Value::IntArray(vec![3, 9])), Some(3));
        assert_eq!(integer_view(&Value::IntArray(vec![])), None);
        assert_eq!(integer_view(&Value::Void), None);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let mut scorer = Scorer::new(Some(11));
        for x in 0..=100 {
            let score = scorer.score(&Value::Int(x));
            assert!((0..=100).contains(&score), "x={} score={}", x, score);
        }
        for _ in 0..100 {
            let score = scorer.score(&Value::Void);
            assert!((0..=100).contains(&score));
        }
    }

    #[test]
    fn test_negative_output_scores_zero() {
        let mut scorer = Scorer::new(Some(1));
        assert_eq!(scorer.score(&Value::Int(-10)), 0);
    }
}
