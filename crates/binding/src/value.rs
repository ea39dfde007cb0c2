use crate::{BindingError, Object, Result};

/// A value passed between the host runtime and native code
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// The absence of a value
    #[default]
    Null,
    /// True or false
    Bool(bool),
    /// An integer
    Number(i64),
    /// A string
    Str(String),
    /// An instance of a registered class
    Object(Object),
}

impl Value {
    /// Returns the name of the value's type, or the class name for objects
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::Str(_) => "String",
            Value::Object(object) => object.class_name(),
        }
    }

    fn unexpected(&self, expected: &str) -> BindingError {
        BindingError::UnexpectedType {
            expected: expected.into(),
            found: self.type_name().into(),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

impl TryFrom<Value> for bool {
    type Error = BindingError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            unexpected => Err(unexpected.unexpected("Bool")),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = BindingError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Number(n) => Ok(n),
            unexpected => Err(unexpected.unexpected("Number")),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = BindingError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Str(s) => Ok(s),
            unexpected => Err(unexpected.unexpected("String")),
        }
    }
}

impl TryFrom<Value> for Object {
    type Error = BindingError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(o) => Ok(o),
            unexpected => Err(unexpected.unexpected("Object")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Value::Null, "Null")]
    #[test_case(true.into(), "Bool")]
    #[test_case(42i64.into(), "Number")]
    #[test_case("x".into(), "String")]
    fn type_names(value: Value, expected: &str) {
        assert_eq!(value.type_name(), expected);
    }

    #[test]
    fn conversion_failure() {
        let result = i64::try_from(Value::from("99"));

        assert_eq!(
            result,
            Err(BindingError::UnexpectedType {
                expected: "Number".into(),
                found: "String".into(),
            })
        );
    }
}
