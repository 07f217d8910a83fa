use crate::Value;

/// Numeric literal as written in the statement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

/// Value assigned to a column by an INSERT
#[derive(Debug, Clone, PartialEq)]
pub enum SqlExpr {
    /// Numeric literal
    Number(Number),
    /// Character literal
    Text(String),
    /// Explicit NULL; never routes
    Ignore,
    /// `?` marker with its ordinal and the parameter bound to it
    Placeholder { index: usize, value: Value },
}

impl SqlExpr {
    /// Value the router should use, None for NULL
    pub fn routing_value(&self) -> Option<Value> {
        match self {
            SqlExpr::Number(Number::Int(n)) => Some(Value::Int(*n)),
            SqlExpr::Number(Number::Float(f)) => Some(Value::Float(*f)),
            SqlExpr::Text(s) => Some(Value::Text(s.clone())),
            SqlExpr::Ignore => None,
            SqlExpr::Placeholder { value, .. } => {
                if value.is_null() {
                    None
                } else {
                    Some(value.clone())
                }
            }
        }
    }

    pub fn is_ignore(&self) -> bool {
        matches!(self, SqlExpr::Ignore)
    }
}
