//! Dynamic values flowing through rich and curried functions.
//!
//! Functions in this crate take a slice of [`Value`]s and return a
//! [`Value`]. A [`Value::Tuple`] result is what gets spread into positional
//! arguments when functions are composed.

use crate::error::{Error, Result};
use crate::traits::Truthy;

use std::cmp::Ordering;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<Value>),
    List(Vec<Value>),
}

#[derive(Clone, Copy)]
enum Num {
    I(i64),
    F(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::I(i) => i as f64,
            Num::F(f) => f,
        }
    }
}

impl Value {
    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// integer view, booleans count as 0 and 1
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(*b as i64),
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        self.num().map(Num::as_f64)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    fn num(&self) -> Option<Num> {
        match self {
            Value::Bool(b) => Some(Num::I(*b as i64)),
            Value::Int(i) => Some(Num::I(*i)),
            Value::Float(f) => Some(Num::F(*f)),
            _ => None,
        }
    }

    fn mismatch(&self, op: &'static str, other: &Value) -> Error {
        Error::TypeMismatch {
            op,
            left: self.type_name(),
            right: other.type_name(),
        }
    }

    fn bad_operand(&self, op: &'static str) -> Error {
        Error::BadOperand {
            op,
            operand: self.type_name(),
        }
    }

    fn numeric(
        &self,
        op: &'static str,
        other: &Value,
        int: fn(i64, i64) -> Option<i64>,
        float: fn(f64, f64) -> f64,
    ) -> Result<Value> {
        match (self.num(), other.num()) {
            (Some(Num::I(a)), Some(Num::I(b))) => {
                int(a, b).map(Value::Int).ok_or(Error::Overflow { op })
            }
            (Some(a), Some(b)) => Ok(Value::Float(float(a.as_f64(), b.as_f64()))),
            _ => Err(self.mismatch(op, other)),
        }
    }

    pub fn add(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b))),
            (Value::Tuple(a), Value::Tuple(b)) => Ok(Value::tuple(a.iter().chain(b).cloned())),
            (Value::List(a), Value::List(b)) => Ok(Value::list(a.iter().chain(b).cloned())),
            _ => self.numeric("+", other, i64::checked_add, |a, b| a + b),
        }
    }

    pub fn sub(&self, other: &Value) -> Result<Value> {
        self.numeric("-", other, i64::checked_sub, |a, b| a - b)
    }

    pub fn mul(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Str(s), n) | (n, Value::Str(s)) if n.as_int().is_some() => {
                repeated_str(s, n.as_int().unwrap_or(0)).map(Value::Str)
            }
            (Value::Tuple(items), n) | (n, Value::Tuple(items)) if n.as_int().is_some() => {
                repeated(items, n.as_int().unwrap_or(0)).map(Value::Tuple)
            }
            (Value::List(items), n) | (n, Value::List(items)) if n.as_int().is_some() => {
                repeated(items, n.as_int().unwrap_or(0)).map(Value::List)
            }
            _ => self.numeric("*", other, i64::checked_mul, |a, b| a * b),
        }
    }

    /// true division, the result is always a float
    pub fn div(&self, other: &Value) -> Result<Value> {
        match (self.num(), other.num()) {
            (Some(_), Some(b)) if b.as_f64() == 0.0 => Err(Error::ZeroDivision),
            (Some(a), Some(b)) => Ok(Value::Float(a.as_f64() / b.as_f64())),
            _ => Err(self.mismatch("/", other)),
        }
    }

    pub fn pow(&self, other: &Value) -> Result<Value> {
        match (self.num(), other.num()) {
            (Some(Num::I(a)), Some(Num::I(b))) if b >= 0 => u32::try_from(b)
                .ok()
                .and_then(|b| a.checked_pow(b))
                .map(Value::Int)
                .ok_or(Error::Overflow { op: "**" }),
            (Some(a), Some(b)) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                if a == 0.0 && b < 0.0 {
                    Err(Error::ZeroDivision)
                } else if a < 0.0 && b.fract() != 0.0 {
                    Err(Error::not_implemented("fractional power of a negative number"))
                } else {
                    Ok(Value::Float(a.powf(b)))
                }
            }
            _ => Err(self.mismatch("**", other)),
        }
    }

    pub fn neg(&self) -> Result<Value> {
        match self.num() {
            Some(Num::I(i)) => i
                .checked_neg()
                .map(Value::Int)
                .ok_or(Error::Overflow { op: "unary -" }),
            Some(Num::F(f)) => Ok(Value::Float(-f)),
            None => Err(self.bad_operand("unary -")),
        }
    }

    pub fn abs(&self) -> Result<Value> {
        match self.num() {
            Some(Num::I(i)) => i
                .checked_abs()
                .map(Value::Int)
                .ok_or(Error::Overflow { op: "abs()" }),
            Some(Num::F(f)) => Ok(Value::Float(f.abs())),
            None => Err(self.bad_operand("abs()")),
        }
    }

    /// Equality across kinds the way comparisons see it: `1 == 1.0 == True`,
    /// values of unrelated kinds are simply unequal.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) | (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            _ => match (self.num(), other.num()) {
                (Some(Num::I(a)), Some(Num::I(b))) => a == b,
                (Some(a), Some(b)) => a.as_f64() == b.as_f64(),
                _ => false,
            },
        }
    }

    /// Ordering of two values, `None` when they are unordered (NaN).
    pub fn compare(&self, op: &'static str, other: &Value) -> Result<Option<Ordering>> {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
            (Value::Tuple(a), Value::Tuple(b)) | (Value::List(a), Value::List(b)) => {
                match a.iter().zip(b).find(|(x, y)| !x.loose_eq(y)) {
                    Some((x, y)) => x.compare(op, y),
                    None => Ok(Some(a.len().cmp(&b.len()))),
                }
            }
            _ => match (self.num(), other.num()) {
                (Some(Num::I(a)), Some(Num::I(b))) => Ok(Some(a.cmp(&b))),
                (Some(a), Some(b)) => Ok(a.as_f64().partial_cmp(&b.as_f64())),
                _ => Err(self.mismatch(op, other)),
            },
        }
    }

    pub fn less(&self, other: &Value) -> Result<Value> {
        let ord = self.compare("<", other)?;
        Ok(Value::Bool(ord == Some(Ordering::Less)))
    }

    pub fn less_eq(&self, other: &Value) -> Result<Value> {
        let ord = self.compare("<=", other)?;
        Ok(Value::Bool(matches!(
            ord,
            Some(Ordering::Less | Ordering::Equal)
        )))
    }

    pub fn greater(&self, other: &Value) -> Result<Value> {
        let ord = self.compare(">", other)?;
        Ok(Value::Bool(ord == Some(Ordering::Greater)))
    }

    pub fn greater_eq(&self, other: &Value) -> Result<Value> {
        let ord = self.compare(">=", other)?;
        Ok(Value::Bool(matches!(
            ord,
            Some(Ordering::Greater | Ordering::Equal)
        )))
    }

    pub fn equal(&self, other: &Value) -> Result<Value> {
        Ok(Value::Bool(self.loose_eq(other)))
    }

    pub fn not_equal(&self, other: &Value) -> Result<Value> {
        Ok(Value::Bool(!self.loose_eq(other)))
    }
}

/// copies and total length of `times` repetitions of `len` elements
fn repeat_count(len: usize, times: i64) -> Result<(usize, usize)> {
    let overflow = Error::Overflow { op: "*" };
    let times = usize::try_from(times.max(0)).map_err(|_| overflow.clone())?;
    let total = len.checked_mul(times).ok_or_else(|| overflow.clone())?;
    if total == 0 {
        return Ok((0, 0));
    }
    Ok((times, total))
}

fn repeated(items: &[Value], times: i64) -> Result<Vec<Value>> {
    let (times, total) = repeat_count(items.len(), times)?;
    let mut out = Vec::new();
    out.try_reserve_exact(total)
        .map_err(|_| Error::Overflow { op: "*" })?;
    for _ in 0..times {
        out.extend_from_slice(items);
    }
    Ok(out)
}

fn repeated_str(s: &str, times: i64) -> Result<String> {
    let (times, total) = repeat_count(s.len(), times)?;
    let mut out = String::new();
    out.try_reserve_exact(total)
        .map_err(|_| Error::Overflow { op: "*" })?;
    for _ in 0..times {
        out.push_str(s);
    }
    Ok(out)
}

impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Tuple(items) | Value::List(items) => !items.is_empty(),
        }
    }

    fn is_nothing(&self) -> bool {
        self.is_none()
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "'{}'", s),
            Value::Tuple(items) => {
                write!(f, "(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::List(items) => {
                write!(f, "[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::None
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(x: Option<T>) -> Self {
        x.map_or(Value::None, Into::into)
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    fn from((a, b): (A, B)) -> Self {
        Value::Tuple(vec![a.into(), b.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> From<(A, B, C)> for Value {
    fn from((a, b, c): (A, B, C)) -> Self {
        Value::Tuple(vec![a.into(), b.into(), c.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_follows_operand_kinds() {
        let v = |x: i64| Value::Int(x);
        assert_eq!(v(2).add(&v(3)), Ok(v(5)));
        assert_eq!(v(2).add(&Value::Float(0.5)), Ok(Value::Float(2.5)));
        assert_eq!(Value::Bool(true).add(&v(1)), Ok(v(2)));
        assert_eq!(Value::from("ab").add(&Value::from("c")), Ok(Value::from("abc")));
        assert_eq!(
            Value::from((1, 2)).add(&Value::tuple([v(3)])),
            Ok(Value::tuple([v(1), v(2), v(3)]))
        );
        assert_eq!(
            Value::from("a").add(&v(1)),
            Err(Error::TypeMismatch {
                op: "+",
                left: "str",
                right: "int"
            })
        );
        assert_eq!(
            v(i64::MAX).add(&v(1)),
            Err(Error::Overflow { op: "+" })
        );
    }

    #[test]
    fn multiplication_repeats_sequences() {
        assert_eq!(
            Value::from("ab").mul(&Value::Int(3)),
            Ok(Value::from("ababab"))
        );
        assert_eq!(Value::Int(2).mul(&Value::from("x")), Ok(Value::from("xx")));
        assert_eq!(Value::from("x").mul(&Value::Int(-1)), Ok(Value::from("")));
        assert_eq!(
            Value::list([Value::Int(1)]).mul(&Value::Int(2)),
            Ok(Value::list([Value::Int(1), Value::Int(1)]))
        );
        assert!(Value::from("x").mul(&Value::from("y")).is_err());
    }

    #[test]
    fn huge_repetition_is_an_overflow() {
        let huge = Value::Int(i64::MAX);
        assert_eq!(Value::from("ab").mul(&huge), Err(Error::Overflow { op: "*" }));
        assert_eq!(
            Value::tuple([Value::None, Value::None]).mul(&huge),
            Err(Error::Overflow { op: "*" })
        );
        assert_eq!(
            huge.mul(&Value::list([Value::Int(1)])),
            Err(Error::Overflow { op: "*" })
        );
        assert_eq!(Value::from("").mul(&huge), Ok(Value::from("")));
    }

    #[test]
    fn division_is_true_division() {
        assert_eq!(Value::Int(7).div(&Value::Int(2)), Ok(Value::Float(3.5)));
        assert_eq!(Value::Int(1).div(&Value::Int(0)), Err(Error::ZeroDivision));
        assert_eq!(
            Value::Float(1.0).div(&Value::Float(0.0)),
            Err(Error::ZeroDivision)
        );
    }

    #[test]
    fn powers() {
        assert_eq!(Value::Int(2).pow(&Value::Int(10)), Ok(Value::Int(1024)));
        assert_eq!(Value::Int(2).pow(&Value::Int(-1)), Ok(Value::Float(0.5)));
        assert_eq!(Value::Int(0).pow(&Value::Int(-1)), Err(Error::ZeroDivision));
        assert_eq!(Value::Int(2).pow(&Value::Int(64)), Err(Error::Overflow { op: "**" }));
        assert!(matches!(
            Value::Int(-8).pow(&Value::Float(0.5)),
            Err(Error::NotImplemented { .. })
        ));
    }

    #[test]
    fn unary_operations() {
        assert_eq!(Value::Int(3).neg(), Ok(Value::Int(-3)));
        assert_eq!(Value::Float(-1.5).abs(), Ok(Value::Float(1.5)));
        assert_eq!(Value::Bool(true).neg(), Ok(Value::Int(-1)));
        assert_eq!(
            Value::from("s").abs(),
            Err(Error::BadOperand {
                op: "abs()",
                operand: "str"
            })
        );
    }

    #[test]
    fn comparisons() {
        assert!(Value::Int(1).loose_eq(&Value::Float(1.0)));
        assert!(Value::Int(1).loose_eq(&Value::Bool(true)));
        assert!(!Value::Int(1).loose_eq(&Value::from("1")));
        assert!(!Value::tuple([Value::Int(1)]).loose_eq(&Value::list([Value::Int(1)])));
        assert_eq!(Value::Int(1).less(&Value::Float(1.5)), Ok(Value::Bool(true)));
        assert_eq!(Value::from("b").greater_eq(&Value::from("a")), Ok(Value::Bool(true)));
        assert_eq!(
            Value::from((1, 2)).less(&Value::from((1, 3))),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            Value::tuple([Value::Int(1)]).less(&Value::from((1, 0))),
            Ok(Value::Bool(true))
        );
        assert_eq!(Value::Float(f64::NAN).less_eq(&Value::Float(f64::NAN)), Ok(Value::Bool(false)));
        assert!(Value::None.less(&Value::Int(0)).is_err());
        assert_eq!(Value::None.equal(&Value::None), Ok(Value::Bool(true)));
        assert_eq!(Value::None.not_equal(&Value::Int(0)), Ok(Value::Bool(true)));
    }

    #[test]
    fn truthiness() {
        for falsy in [
            Value::None,
            Value::Bool(false),
            Value::Int(0),
            Value::Float(0.0),
            Value::from(""),
            Value::tuple([]),
            Value::list([]),
        ] {
            assert!(!falsy.is_truthy(), "{} should be falsy", falsy);
        }
        assert!(Value::from(" ").is_truthy());
        assert!(Value::tuple([Value::None]).is_truthy());
        assert!(Value::None.is_nothing());
        assert!(!Value::Int(0).is_nothing());
    }

    #[test]
    fn display_uses_literal_notation() {
        assert_eq!(Value::None.to_string(), "None");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::from("x").to_string(), "'x'");
        assert_eq!(Value::tuple([Value::Int(1)]).to_string(), "(1,)");
        assert_eq!(Value::from((1, "a")).to_string(), "(1, 'a')");
        assert_eq!(Value::list([]).to_string(), "[]");
        assert_eq!(Value::from(None::<i64>), Value::None);
    }
}
