/// Result type alias for everything in this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or calling functions
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A function was called with the wrong number of positional arguments
    #[error("{name}() takes {expected} positional argument(s) but {given} were given")]
    Arity {
        name: String,
        expected: usize,
        given: usize,
    },

    /// A curried function was forced while parameters were still unbound
    #[error("{name}() is missing required argument(s): {}", .missing.join(", "))]
    MissingArguments { name: String, missing: Vec<String> },

    #[error("{name}() got an unexpected keyword argument '{keyword}'")]
    UnexpectedKeyword { name: String, keyword: String },

    #[error("{name}() got multiple values for argument '{parameter}'")]
    DuplicateArgument { name: String, parameter: String },

    /// Operands of an operator have kinds the operator does not support
    #[error("unsupported operand type(s) for {op}: '{left}' and '{right}'")]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("bad operand type for {op}: '{operand}'")]
    BadOperand {
        op: &'static str,
        operand: &'static str,
    },

    #[error("division by zero")]
    ZeroDivision,

    #[error("integer overflow in {op}")]
    Overflow { op: &'static str },

    /// The operation exists but is not defined for these operands,
    /// e.g. repeating a function a negative number of times
    #[error("operation not supported: {operation}")]
    NotImplemented { operation: String },

    /// Failure reported by a user supplied function
    #[error("{0}")]
    Failed(String),

    #[error("interrupted")]
    Interrupted,

    #[error("evaluation budget of {budget} call(s) exhausted")]
    Exhausted { budget: u64 },

    #[error("{position}: {message}")]
    Parse { position: usize, message: String },

    #[error("name '{0}' is not defined")]
    Undefined(String),

    #[error("{0} already defined")]
    AlreadyDefined(String),

    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    pub fn failed(message: impl Into<String>) -> Self {
        Error::Failed(message.into())
    }

    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Error::NotImplemented {
            operation: operation.into(),
        }
    }

    /// true for errors that stem from how a function was called rather than
    /// from what it computed
    pub fn is_signature_error(&self) -> bool {
        matches!(
            self,
            Error::Arity { .. }
                | Error::MissingArguments { .. }
                | Error::UnexpectedKeyword { .. }
                | Error::DuplicateArgument { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_read_like_call_errors() {
        let e = Error::Arity {
            name: "inc".into(),
            expected: 1,
            given: 2,
        };
        assert_eq!(
            e.to_string(),
            "inc() takes 1 positional argument(s) but 2 were given"
        );
        let e = Error::MissingArguments {
            name: "f".into(),
            missing: vec!["arg1".into(), "arg2".into()],
        };
        assert_eq!(
            e.to_string(),
            "f() is missing required argument(s): arg1, arg2"
        );
        assert!(e.is_signature_error());
        assert!(!Error::ZeroDivision.is_signature_error());
    }
}
