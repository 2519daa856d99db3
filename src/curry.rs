//! Curried functions with declared signatures.
//!
//! A curried function behaves like a partial application where the partial
//! arguments are supplied by calling it: every call adds its arguments to the
//! ones collected so far, and the underlying function runs as soon as all of
//! its parameters are bound.
//!
//! ```
//! use functional::{curry, Signature, Value};
//!
//! let f = curry(
//!     Signature::new("f").param("arg1").param("arg2").optional("arg3", "defult"),
//!     |args| args[0].add(&args[1])?.add(&args[2]),
//! );
//! let f1 = f
//!     .call_with([Value::from("a")], [("arg3", Value::from(" other"))])
//!     .unwrap()
//!     .partial()
//!     .unwrap();
//! assert_eq!(f1.call([Value::from("b")]).unwrap().value(), Some(Value::from("ab other")));
//! ```
//!
//! Whether a call is complete is decided from the [`Signature`] before the
//! function runs, so an error raised by the function itself is never
//! mistaken for a missing argument.

use crate::error::{Error, Result};
use crate::rich::Callable;
use crate::value::Value;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

pub type Keywords = BTreeMap<String, Value>;

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<Value>,
}

/// Parameter names and defaults of a curried function, in declaration order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Signature {
    name: String,
    params: Vec<Param>,
}

enum Binding {
    Complete(Vec<Value>),
    Incomplete(Vec<String>),
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Signature {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// a signature whose parameters are all required
    pub fn of(name: impl Into<String>, params: &[&str]) -> Self {
        params
            .iter()
            .fold(Signature::new(name), |sig, p| sig.param(*p))
    }

    /// add a required parameter
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: None,
        });
        self
    }

    /// add a parameter with a default value
    pub fn optional(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: Some(default.into()),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    /// Bind arguments to parameters.
    ///
    /// Unbound required parameters make the binding incomplete. Surplus
    /// positionals, unknown keywords and parameters bound twice are
    /// reported as errors, which [`Curry::call_with`] keeps as a partial
    /// application.
    fn bind(&self, args: &[Value], kwargs: &Keywords) -> Result<Binding> {
        if args.len() > self.params.len() {
            return Err(Error::Arity {
                name: self.name.clone(),
                expected: self.params.len(),
                given: args.len(),
            });
        }
        for keyword in kwargs.keys() {
            match self.position(keyword) {
                None => {
                    return Err(Error::UnexpectedKeyword {
                        name: self.name.clone(),
                        keyword: keyword.clone(),
                    })
                }
                Some(i) if i < args.len() => {
                    return Err(Error::DuplicateArgument {
                        name: self.name.clone(),
                        parameter: keyword.clone(),
                    })
                }
                Some(_) => {}
            }
        }
        let mut bound = Vec::with_capacity(self.params.len());
        let mut missing = Vec::new();
        for (i, param) in self.params.iter().enumerate() {
            let value = args
                .get(i)
                .or_else(|| kwargs.get(&param.name))
                .or(param.default.as_ref());
            match value {
                Some(v) => bound.push(v.clone()),
                None => missing.push(param.name.clone()),
            }
        }
        if missing.is_empty() {
            Ok(Binding::Complete(bound))
        } else {
            Ok(Binding::Incomplete(missing))
        }
    }
}

/// A function in curry form, see the [module documentation](self).
///
/// Curried values are immutable snapshots: every call or added argument
/// yields a new `Curry`, the receiver keeps its arguments.
#[derive(Clone)]
pub struct Curry {
    func: Arc<Callable>,
    signature: Arc<Signature>,
    args: Vec<Value>,
    kwargs: Keywords,
}

/// Outcome of calling a curried function.
#[derive(Clone, Debug)]
pub enum Applied {
    /// all parameters were bound and the function returned this
    Value(Value),
    /// parameters are still missing
    Partial(Curry),
}

impl Applied {
    pub fn value(self) -> Option<Value> {
        match self {
            Applied::Value(v) => Some(v),
            Applied::Partial(_) => None,
        }
    }

    pub fn partial(self) -> Option<Curry> {
        match self {
            Applied::Value(_) => None,
            Applied::Partial(c) => Some(c),
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Applied::Partial(_))
    }

    /// the value, or what keeps a partial application from being called
    /// (see [`Curry::pending`])
    pub fn into_value(self) -> Result<Value> {
        match self {
            Applied::Value(v) => Ok(v),
            Applied::Partial(c) => Err(c.pending()),
        }
    }
}

/// Put `f` in curry form.
pub fn curry(
    signature: Signature,
    f: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
) -> Curry {
    Curry::new(signature, f)
}

impl Curry {
    /// `f` receives exactly one value per parameter of `signature`, in
    /// declaration order, defaults filled in.
    pub fn new(
        signature: Signature,
        f: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Curry {
            func: Arc::new(f),
            signature: Arc::new(signature),
            args: Vec::new(),
            kwargs: Keywords::new(),
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// positional arguments collected so far
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// keyword arguments collected so far
    pub fn kwargs(&self) -> &Keywords {
        &self.kwargs
    }

    /// names of the required parameters nothing is bound to yet
    pub fn missing(&self) -> Vec<String> {
        match self.signature.bind(&self.args, &self.kwargs) {
            Ok(Binding::Incomplete(missing)) => missing,
            _ => Vec::new(),
        }
    }

    fn extended<K: Into<String>>(
        &self,
        args: impl IntoIterator<Item = Value>,
        kwargs: impl IntoIterator<Item = (K, Value)>,
    ) -> (Vec<Value>, Keywords) {
        let mut merged_args = self.args.clone();
        merged_args.extend(args);
        let mut merged_kwargs = self.kwargs.clone();
        merged_kwargs.extend(kwargs.into_iter().map(|(k, v)| (k.into(), v)));
        (merged_args, merged_kwargs)
    }

    /// add positional arguments without calling
    pub fn with_args(&self, args: impl IntoIterator<Item = Value>) -> Curry {
        let (args, kwargs) = self.extended(args, std::iter::empty::<(String, Value)>());
        Curry {
            args,
            kwargs,
            ..self.clone()
        }
    }

    /// add a keyword argument without calling, replacing an earlier one of
    /// the same name
    pub fn with_keyword(&self, name: impl Into<String>, value: impl Into<Value>) -> Curry {
        let keyword: (String, Value) = (name.into(), value.into());
        let (args, kwargs) = self.extended(std::iter::empty(), [keyword]);
        Curry {
            args,
            kwargs,
            ..self.clone()
        }
    }

    pub fn call(&self, args: impl IntoIterator<Item = Value>) -> Result<Applied> {
        self.call_with(args, std::iter::empty::<(String, Value)>())
    }

    /// Call with positional and keyword arguments.
    ///
    /// New positional arguments go after the collected ones, new keywords
    /// replace collected ones of the same name.
    pub fn call_with<K: Into<String>>(
        &self,
        args: impl IntoIterator<Item = Value>,
        kwargs: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<Applied> {
        let (args, kwargs) = self.extended(args, kwargs);
        match self.signature.bind(&args, &kwargs) {
            Ok(Binding::Complete(bound)) => return (self.func)(&bound).map(Applied::Value),
            Ok(Binding::Incomplete(missing)) => debug!(
                function = %self.signature.name,
                missing = ?missing,
                "curried call is partial"
            ),
            Err(mismatch) => debug!(
                function = %self.signature.name,
                error = %mismatch,
                "curried call does not fit the signature, kept partial"
            ),
        }
        Ok(Applied::Partial(Curry {
            func: self.func.clone(),
            signature: self.signature.clone(),
            args,
            kwargs,
        }))
    }

    /// Why the collected arguments do not make a call: the signature
    /// mismatch, or the required parameters still unbound.
    pub fn pending(&self) -> Error {
        match self.signature.bind(&self.args, &self.kwargs) {
            Err(mismatch) => mismatch,
            Ok(_) => Error::MissingArguments {
                name: self.signature.name.clone(),
                missing: self.missing(),
            },
        }
    }
}

impl fmt::Debug for Curry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Curry")
            .field("name", &self.signature.name)
            .field("args", &self.args)
            .field("kwargs", &self.kwargs)
            .finish()
    }
}

impl fmt::Display for Curry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<curried {}(", self.signature.name)?;
        let mut first = true;
        for arg in &self.args {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
            first = false;
        }
        for (k, v) in &self.kwargs {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", k, v)?;
            first = false;
        }
        write!(f, ")>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat3() -> Curry {
        curry(
            Signature::new("f")
                .param("arg1")
                .param("arg2")
                .optional("arg3", "defult"),
            |args| args[0].add(&args[1])?.add(&args[2]),
        )
    }

    fn s(x: &str) -> Value {
        Value::from(x)
    }

    #[test]
    fn test_curry() {
        let f = concat3();
        let f1 = f
            .call_with([s("a")], [("arg3", s(" other"))])
            .unwrap();
        assert!(f1.is_partial());
        let f1 = f1.partial().unwrap();
        assert_eq!(f1.call([s("b")]).unwrap().value(), Some(s("ab other")));
    }

    #[test]
    fn test_curry2() {
        let fc = concat3().with_args([s("a")]);
        let fc2 = fc.call_with(std::iter::empty(), [("arg3", s(" other"))]).unwrap();
        assert!(fc2.is_partial());
        let x = fc2.partial().unwrap().call([s("b")]).unwrap();
        assert_eq!(x.value(), Some(s("ab other")));
    }

    #[test]
    fn defaults_complete_a_call() {
        let r = concat3().call([s("a"), s("b")]).unwrap();
        assert_eq!(r.value(), Some(s("abdefult")));
    }

    #[test]
    fn partial_application_is_associative() {
        let add = curry(Signature::of("add", &["a", "b"]), |args| args[0].add(&args[1]));
        let one = Value::Int(1);
        let two = Value::Int(2);
        let direct = add.call([one.clone(), two.clone()]).unwrap().value();
        let seeded = add.with_args([one.clone()]).call([two.clone()]).unwrap().value();
        let stepped = add
            .call([one])
            .unwrap()
            .partial()
            .unwrap()
            .call([two])
            .unwrap()
            .value();
        assert_eq!(direct, Some(Value::Int(3)));
        assert_eq!(seeded, direct);
        assert_eq!(stepped, direct);
    }

    #[test]
    fn calls_never_mutate_the_receiver() {
        let f = concat3();
        let partial = f.call([s("a")]).unwrap().partial().unwrap();
        assert!(f.args().is_empty());
        assert_eq!(partial.args(), &[s("a")]);
        let again = partial.call(std::iter::empty()).unwrap().partial().unwrap();
        assert_eq!(again.args(), partial.args());
        assert_eq!(partial.missing(), vec!["arg2".to_string()]);
    }

    #[test]
    fn later_keywords_win() {
        let f = concat3().with_keyword("arg3", "!").with_keyword("arg3", "?");
        assert_eq!(f.kwargs().len(), 1);
        let r = f.call([s("a"), s("b")]).unwrap();
        assert_eq!(r.value(), Some(s("ab?")));
    }

    #[test]
    fn keyword_can_bind_required_parameter() {
        let r = concat3()
            .call_with([s("a")], [("arg2", s("b"))])
            .unwrap();
        assert_eq!(r.value(), Some(s("abdefult")));
    }

    #[test]
    fn mismatched_calls_stay_partial() {
        let f = concat3();
        let over = f.call([s("a"), s("b"), s("c"), s("d")]).unwrap();
        assert!(over.is_partial());
        assert_eq!(
            over.into_value(),
            Err(Error::Arity {
                name: "f".into(),
                expected: 3,
                given: 4
            })
        );

        let unknown = f.call_with([s("a")], [("nope", s("x"))]).unwrap();
        let unknown = unknown.partial().unwrap();
        assert_eq!(unknown.args(), &[s("a")]);
        assert!(matches!(
            unknown.pending(),
            Error::UnexpectedKeyword { .. }
        ));

        let twice = f.call_with([s("a")], [("arg1", s("x"))]).unwrap();
        assert!(matches!(
            twice.into_value(),
            Err(Error::DuplicateArgument { .. })
        ));
        // the receiver is untouched and still usable
        assert_eq!(f.call([s("a"), s("b")]).unwrap().value(), Some(s("abdefult")));
    }

    #[test]
    fn function_errors_propagate() {
        let f = curry(Signature::of("fail", &["x"]), |_| {
            Err(Error::Arity {
                name: "inner".into(),
                expected: 9,
                given: 1,
            })
        });
        // an arity error raised inside the body is not a partial application
        assert!(matches!(
            f.call([Value::None]),
            Err(Error::Arity { expected: 9, .. })
        ));
    }

    #[test]
    fn partial_into_value_reports_missing() {
        let r = concat3().call([s("a")]).unwrap();
        assert_eq!(
            r.into_value(),
            Err(Error::MissingArguments {
                name: "f".into(),
                missing: vec!["arg2".into()]
            })
        );
    }

    #[test]
    fn display_shows_collected_arguments() {
        let f = concat3().with_args([s("a")]).with_keyword("arg3", "!");
        assert_eq!(f.to_string(), "<curried f('a', arg3='!')>");
    }
}
