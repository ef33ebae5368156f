use crate::domain::model::{MethodDefinition, MethodSignature, ValueType};
use crate::domain::ports::Fixture;
use crate::utils::error::{HarnessError, Result};

fn parse_type(kind: &str, name: &str) -> Result<ValueType> {
    name.parse().map_err(|_| HarnessError::UnsupportedType {
        kind: kind.to_string(),
        type_name: name.to_string(),
    })
}

/// 檢查夾具是否有符合名稱、參數型別與回傳型別的公開方法
pub fn find_method(
    fixture: &dyn Fixture,
    definition: &MethodDefinition,
) -> Result<&'static MethodSignature> {
    // 只有帶參數的方法才先檢查回傳型別是否支援；無參數方法留到比對回傳型別時才報錯
    let output = if definition.input.is_empty() {
        definition.output.parse::<ValueType>().ok()
    } else {
        Some(parse_type("output", &definition.output)?)
    };
    let input = definition
        .input
        .iter()
        .map(|name| parse_type("input", name))
        .collect::<Result<Vec<_>>>()?;

    let method = fixture
        .methods()
        .iter()
        .find(|m| m.name == definition.name && m.input == input.as_slice())
        .ok_or_else(|| HarnessError::MethodNotFound {
            method: definition.name.clone(),
            class_name: fixture.class_name().to_string(),
        })?;

    if output != Some(method.output) {
        return Err(HarnessError::OutputMismatch {
            type_name: definition.output.clone(),
        });
    }

    tracing::debug!(
        "Resolved {}.{}({}) -> {}",
        fixture.class_name(),
        method.name,
        definition.input.join(", "),
        method.output
    );
    Ok(method)
}

pub fn find_method_by_name(fixture: &dyn Fixture, name: &str) -> Result<&'static MethodSignature> {
    fixture
        .methods()
        .iter()
        .find(|m| m.name == name)
        .ok_or_else(|| HarnessError::MethodNotFound {
            method: name.to_string(),
            class_name: fixture.class_name().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{FixtureSettings, GuessRandom, MockedClass};

    fn definition(name: &str, input: &[&str], output: &str) -> MethodDefinition {
        MethodDefinition {
            name: name.to_string(),
            input: input.iter().map(|s| s.to_string()).collect(),
            output: output.to_string(),
        }
    }

    #[test]
    fn test_finds_method_with_cpp_type_names() {
        let fixture = MockedClass::new(&FixtureSettings::default());
        let def = definition(
            "testFullParameter",
            &[
                "int",
                "double",
                "string",
                "vector<int>",
                "vector<double>",
                "vector<string>",
            ],
            "int",
        );
        let method = find_method(&fixture, &def).unwrap();
        assert_eq!(method.name, "testFullParameter");
    }

    #[test]
    fn test_signature_errors() {
        let fixture = MockedClass::new(&FixtureSettings::default());

        let err =
            find_method(&fixture, &definition("testTimeUsage", &["int"], "long")).unwrap_err();
        assert_eq!(err.to_string(), "output value type <long> is not accepted");

        let err =
            find_method(&fixture, &definition("testTimeUsage", &["char"], "int")).unwrap_err();
        assert_eq!(err.to_string(), "input value type <char> is not accepted");

        let err = find_method(
            &fixture,
            &definition("testVectorStrInOutReverse", &["int[]"], "string[]"),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The match public method testVectorStrInOutReverse in class MockedClass cannot be found"
        );

        let err =
            find_method(&fixture, &definition("testTimeUsage", &["int"], "double")).unwrap_err();
        assert_eq!(err.to_string(), "The output type double does not match");
    }

    #[test]
    fn test_zero_input_method_reports_output_mismatch() {
        let fixture = GuessRandom::new(&FixtureSettings::default());

        let err = find_method(&fixture, &definition("guess", &[], "long")).unwrap_err();
        assert_eq!(err.to_string(), "The output type long does not match");

        let err = find_method(&fixture, &definition("guess", &[], "string")).unwrap_err();
        assert_eq!(err.to_string(), "The output type string does not match");

        assert!(find_method(&fixture, &definition("guess", &[], "int")).is_ok());
    }

    #[test]
    fn test_find_by_name() {
        let fixture = GuessRandom::new(&FixtureSettings::default());
        assert_eq!(find_method_by_name(&fixture, "guess").unwrap().input.len(), 0);
        assert!(find_method_by_name(&fixture, "privateMethod").is_err());
    }
}
