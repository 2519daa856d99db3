//! Functions that compose with operators.
//!
//! A [`FunctionRich`] wraps a callable over [`Value`]s. Operators on rich
//! functions never call anything, they build a new rich function that calls
//! its operands once it is called itself:
//!
//! | expression       | meaning                                   |
//! |------------------|-------------------------------------------|
//! | `f & x`          | apply `f` to `x` (a tuple is spread)      |
//! | `f % g`          | `f` after `g`, tuple results are spread   |
//! | `f << g`         | `f` after `g`, result passed as is        |
//! | `f >> g`         | `f` then `g`, result passed as is         |
//! | `f ^ n`          | `f % f % ... % f`, n times                |
//! | `f + g`, `-f` .. | pointwise arithmetic on the results       |
//!
//! Comparisons are pointwise too, but Rust reserves `==` and `<` for
//! boolean answers, so they are the named builders [`FunctionRich::less`]
//! and friends.

use crate::curry::Curry;
use crate::error::{Error, Result};
use crate::value::Value;

use std::fmt;
use std::ops::{Add, BitAnd, BitXor, Div, Mul, Neg, Rem, Shl, Shr, Sub};
use std::sync::{Arc, LazyLock};

pub(crate) type Callable = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

#[derive(Clone)]
pub struct FunctionRich {
    func: Arc<Callable>,
    name: Arc<str>,
}

/// The identity function, `identity & x == x`.
pub static IDENTITY: LazyLock<FunctionRich> =
    LazyLock::new(|| FunctionRich::unary("identity", |x| Ok(x.clone())));

pub fn identity() -> FunctionRich {
    IDENTITY.clone()
}

/// call `f` with `value`, spreading a tuple into positional arguments
fn spread(f: &Callable, value: Value) -> Result<Value> {
    match value {
        Value::Tuple(items) => f(&items),
        other => f(std::slice::from_ref(&other)),
    }
}

fn check_arity(name: &str, expected: usize, args: &[Value]) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(Error::Arity {
            name: name.to_string(),
            expected,
            given: args.len(),
        })
    }
}

impl FunctionRich {
    /// wrap a callable taking any number of arguments
    pub fn new(f: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static) -> Self {
        FunctionRich::named("<lambda>", f)
    }

    pub fn named(
        name: impl AsRef<str>,
        f: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        FunctionRich {
            func: Arc::new(f),
            name: Arc::from(name.as_ref()),
        }
    }

    /// wrap a function of exactly one argument
    pub fn unary(
        name: impl AsRef<str>,
        f: impl Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        let label: Arc<str> = Arc::from(name.as_ref());
        let checked = label.clone();
        FunctionRich {
            func: Arc::new(move |args: &[Value]| {
                check_arity(&checked, 1, args)?;
                f(&args[0])
            }),
            name: label,
        }
    }

    /// wrap a function of exactly two arguments
    pub fn binary(
        name: impl AsRef<str>,
        f: impl Fn(&Value, &Value) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        let label: Arc<str> = Arc::from(name.as_ref());
        let checked = label.clone();
        FunctionRich {
            func: Arc::new(move |args: &[Value]| {
                check_arity(&checked, 2, args)?;
                f(&args[0], &args[1])
            }),
            name: label,
        }
    }

    /// a function ignoring its arguments and always returning `value`
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        let name = value.to_string();
        FunctionRich::named(name, move |_| Ok(value.clone()))
    }

    /// `f` with `args` bound in front of the arguments of every call
    pub fn partial(f: impl Into<FunctionRich>, args: impl IntoIterator<Item = Value>) -> Self {
        let f = f.into();
        let bound: Vec<Value> = args.into_iter().collect();
        if bound.is_empty() {
            return f;
        }
        let shown: Vec<String> = bound.iter().map(Value::to_string).collect();
        let inner = f.func.clone();
        f.derive(format!("{}({}, ...)", f.name, shown.join(", ")), move |args| {
            let mut all = bound.clone();
            all.extend_from_slice(args);
            inner(&all)
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(self, name: impl AsRef<str>) -> Self {
        FunctionRich {
            func: self.func,
            name: Arc::from(name.as_ref()),
        }
    }

    /// true when both share the very same callable
    pub fn ptr_eq(&self, other: &FunctionRich) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.func)(args)
    }

    /// Call with a single argument; a [`Value::Tuple`] is spread into
    /// positional arguments. This is what `f & x` does.
    pub fn apply(&self, arg: impl Into<Value>) -> Result<Value> {
        spread(self.func.as_ref(), arg.into())
    }

    fn derive(
        &self,
        name: String,
        f: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    ) -> FunctionRich {
        FunctionRich {
            func: Arc::new(f),
            name: Arc::from(name),
        }
    }

    /// `self` after `other`: the result of `other` is spread into `self`
    /// when it is a tuple.
    pub fn compose(&self, other: impl Into<FunctionRich>) -> FunctionRich {
        let other = other.into();
        let outer = self.func.clone();
        let inner = other.func.clone();
        self.derive(format!("({} % {})", self.name, other.name), move |args| {
            spread(outer.as_ref(), inner(args)?)
        })
    }

    /// `self` after `other`, the result of `other` is passed as a single
    /// argument.
    pub fn after(&self, other: impl Into<FunctionRich>) -> FunctionRich {
        let other = other.into();
        let outer = self.func.clone();
        let inner = other.func.clone();
        self.derive(format!("({} << {})", self.name, other.name), move |args| {
            let x = inner(args)?;
            outer(std::slice::from_ref(&x))
        })
    }

    /// `self` then `other`, the result of `self` is passed as a single
    /// argument.
    pub fn then(&self, other: impl Into<FunctionRich>) -> FunctionRich {
        let other = other.into();
        let first = self.func.clone();
        let second = other.func.clone();
        self.derive(format!("({} >> {})", self.name, other.name), move |args| {
            let x = first(args)?;
            second(std::slice::from_ref(&x))
        })
    }

    /// `self` composed with itself `n` times.
    ///
    /// `n == 0` gives [`identity`], `n == 1` gives `self` back, a negative
    /// `n` is not supported.
    pub fn repeat(&self, n: i64) -> Result<FunctionRich> {
        match n {
            n if n < 0 => Err(Error::not_implemented(format!(
                "repeating {} a negative number of times ({})",
                self.name, n
            ))),
            0 => Ok(identity()),
            1 => Ok(self.clone()),
            n => {
                tracing::trace!(function = %self.name, times = n, "repeat");
                let f = self.func.clone();
                Ok(self.derive(format!("({} ^ {})", self.name, n), move |args| {
                    let mut x = f(args)?;
                    for _ in 1..n {
                        x = spread(f.as_ref(), x)?;
                    }
                    Ok(x)
                }))
            }
        }
    }

    /// [`FunctionRich::repeat`] with a dynamic exponent, anything but an
    /// integer (or zero) is not supported
    pub fn repeat_value(&self, n: &Value) -> Result<FunctionRich> {
        match n {
            Value::Int(_) | Value::Bool(_) => self.repeat(n.as_int().unwrap_or(0)),
            Value::Float(x) if *x == 0.0 => Ok(identity()),
            other => Err(Error::not_implemented(format!(
                "repeating {} by a {}",
                self.name,
                other.type_name()
            ))),
        }
    }

    fn map_result(
        &self,
        name: String,
        op: impl Fn(Value) -> Result<Value> + Send + Sync + 'static,
    ) -> FunctionRich {
        let f = self.func.clone();
        self.derive(name, move |args| op(f(args)?))
    }

    fn pointwise(
        &self,
        other: FunctionRich,
        symbol: &str,
        op: fn(&Value, &Value) -> Result<Value>,
    ) -> FunctionRich {
        let left = self.func.clone();
        let right = other.func.clone();
        self.derive(
            format!("({} {} {})", self.name, symbol, other.name),
            move |args| {
                let a = left(args)?;
                let b = right(args)?;
                op(&a, &b)
            },
        )
    }

    /// raise the result to a constant power
    pub fn pow(&self, n: impl Into<Value>) -> FunctionRich {
        let n = n.into();
        self.map_result(format!("({} ** {})", self.name, n), move |x| x.pow(&n))
    }

    pub fn pos(&self) -> FunctionRich {
        self.clone()
    }

    pub fn abs(&self) -> FunctionRich {
        self.map_result(format!("abs({})", self.name), |x| x.abs())
    }

    pub fn less(&self, other: impl Into<FunctionRich>) -> FunctionRich {
        self.pointwise(other.into(), "<", Value::less)
    }

    pub fn less_eq(&self, other: impl Into<FunctionRich>) -> FunctionRich {
        self.pointwise(other.into(), "<=", Value::less_eq)
    }

    pub fn equal(&self, other: impl Into<FunctionRich>) -> FunctionRich {
        self.pointwise(other.into(), "==", Value::equal)
    }

    pub fn not_equal(&self, other: impl Into<FunctionRich>) -> FunctionRich {
        self.pointwise(other.into(), "!=", Value::not_equal)
    }

    pub fn greater_eq(&self, other: impl Into<FunctionRich>) -> FunctionRich {
        self.pointwise(other.into(), ">=", Value::greater_eq)
    }

    pub fn greater(&self, other: impl Into<FunctionRich>) -> FunctionRich {
        self.pointwise(other.into(), ">", Value::greater)
    }
}

impl fmt::Debug for FunctionRich {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionRich({})", self.name)
    }
}

impl fmt::Display for FunctionRich {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.name)
    }
}

impl From<&FunctionRich> for FunctionRich {
    fn from(f: &FunctionRich) -> Self {
        f.clone()
    }
}

impl From<Value> for FunctionRich {
    fn from(value: Value) -> Self {
        FunctionRich::constant(value)
    }
}

impl From<Curry> for FunctionRich {
    /// Calls that leave parameters of the curried function unbound fail with
    /// [`Error::MissingArguments`].
    fn from(curried: Curry) -> Self {
        let name = curried.signature().name().to_string();
        FunctionRich::named(name, move |args| {
            curried.call(args.iter().cloned())?.into_value()
        })
    }
}

macro_rules! constant_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FunctionRich {
                fn from(x: $t) -> Self {
                    FunctionRich::constant(x)
                }
            }
        )*
    };
}

constant_from!(bool, i32, i64, f64, &str, String);

/// `Trait<R> for FunctionRich` and `&FunctionRich`, plus the reflected forms
/// with a constant on the left hand side.
macro_rules! binary_operator {
    ($trait:ident, $method:ident, $build:expr) => {
        impl<R: Into<FunctionRich>> $trait<R> for FunctionRich {
            type Output = FunctionRich;

            fn $method(self, other: R) -> FunctionRich {
                $build(&self, other.into())
            }
        }

        impl<R: Into<FunctionRich>> $trait<R> for &FunctionRich {
            type Output = FunctionRich;

            fn $method(self, other: R) -> FunctionRich {
                $build(self, other.into())
            }
        }

        binary_operator!(@reflected $trait, $method, $build, Value, bool, i32, i64, f64, &str);
    };
    (@reflected $trait:ident, $method:ident, $build:expr, $($t:ty),*) => {
        $(
            impl $trait<FunctionRich> for $t {
                type Output = FunctionRich;

                fn $method(self, other: FunctionRich) -> FunctionRich {
                    $build(&FunctionRich::from(self), other)
                }
            }
        )*
    };
}

binary_operator!(Rem, rem, |f: &FunctionRich, g: FunctionRich| f.compose(g));
binary_operator!(Shl, shl, |f: &FunctionRich, g: FunctionRich| f.after(g));
binary_operator!(Shr, shr, |f: &FunctionRich, g: FunctionRich| f.then(g));
binary_operator!(Add, add, |f: &FunctionRich, g: FunctionRich| f
    .pointwise(g, "+", Value::add));
binary_operator!(Sub, sub, |f: &FunctionRich, g: FunctionRich| f
    .pointwise(g, "-", Value::sub));
binary_operator!(Mul, mul, |f: &FunctionRich, g: FunctionRich| f
    .pointwise(g, "*", Value::mul));
binary_operator!(Div, div, |f: &FunctionRich, g: FunctionRich| f
    .pointwise(g, "/", Value::div));

impl BitXor<i64> for FunctionRich {
    type Output = Result<FunctionRich>;

    fn bitxor(self, n: i64) -> Result<FunctionRich> {
        self.repeat(n)
    }
}

impl BitXor<i64> for &FunctionRich {
    type Output = Result<FunctionRich>;

    fn bitxor(self, n: i64) -> Result<FunctionRich> {
        self.repeat(n)
    }
}

impl BitXor<Value> for FunctionRich {
    type Output = Result<FunctionRich>;

    fn bitxor(self, n: Value) -> Result<FunctionRich> {
        self.repeat_value(&n)
    }
}

impl BitXor<Value> for &FunctionRich {
    type Output = Result<FunctionRich>;

    fn bitxor(self, n: Value) -> Result<FunctionRich> {
        self.repeat_value(&n)
    }
}

impl<V: Into<Value>> BitAnd<V> for FunctionRich {
    type Output = Result<Value>;

    fn bitand(self, arg: V) -> Result<Value> {
        self.apply(arg)
    }
}

impl<V: Into<Value>> BitAnd<V> for &FunctionRich {
    type Output = Result<Value>;

    fn bitand(self, arg: V) -> Result<Value> {
        self.apply(arg)
    }
}

impl Neg for FunctionRich {
    type Output = FunctionRich;

    fn neg(self) -> FunctionRich {
        -&self
    }
}

impl Neg for &FunctionRich {
    type Output = FunctionRich;

    fn neg(self) -> FunctionRich {
        self.map_result(format!("-{}", self.name), |x| x.neg())
    }
}
