//! Single values treated as functors with a fallback chain.

use crate::traits::Truthy;

use std::ops::BitOr;

/// Wraps a single (non-collection) value, e.g. `None`, a number or a string.
///
/// `a | b | c` yields the first truthy link of the chain, or the last link
/// when none is truthy. Each right hand operand is wrapped only when the
/// chain reaches it:
///
/// ```
/// use functional::{Kind, Value};
///
/// let last = Kind::new(Value::Int(0)) | Value::None | Value::from("") | Value::Int(0);
/// assert_eq!(last.extract(), Value::Int(0));
///
/// let first = Kind::new(0i64) | 100 | 0 | 1;
/// assert_eq!(first.extract(), 100);
/// ```
///
/// Rust evaluates both operands of `|` before the operator runs, so every
/// link of a chain is computed even when only its wrapping is skipped. Use
/// [`Kind::or_else`] when computing an operand has side effects.
///
/// [`Kind::fmap`] is the only mutating operation and takes `&mut self`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Kind<T> {
    wrap: T,
}

impl<T> Kind<T> {
    pub fn new(value: T) -> Self {
        Kind { wrap: value }
    }

    /// the held raw value
    pub fn extract(self) -> T {
        self.wrap
    }

    pub fn get(&self) -> &T {
        &self.wrap
    }
}

impl<T: Truthy> Kind<T> {
    pub fn is_truthy(&self) -> bool {
        self.wrap.is_truthy()
    }

    /// Lazy form of `|`: `other` is only called when `self` is falsy.
    pub fn or_else<U, F>(self, other: F) -> Kind<T>
    where
        U: Into<Kind<T>>,
        F: FnOnce() -> U,
    {
        if self.is_truthy() {
            self
        } else {
            other().into()
        }
    }

    /// Replace the held value by `f(value)`, unless it is nothing.
    ///
    /// ```
    /// use functional::Kind;
    ///
    /// let mut k = Kind::new(Some(5));
    /// k.fmap(|x| x.map(|x| x + 1)).fmap(|x| x.map(|x| x * 2));
    /// assert_eq!(k.extract(), Some(12));
    ///
    /// let mut none = Kind::new(None::<i32>);
    /// none.fmap(|_| Some(1));
    /// assert_eq!(none.extract(), None);
    /// ```
    pub fn fmap(&mut self, f: impl FnOnce(&T) -> T) -> &mut Self {
        if !self.wrap.is_nothing() {
            self.wrap = f(&self.wrap);
        }
        self
    }

    /// [`Kind::fmap`] for fallible functions; on error the held value is kept.
    pub fn try_fmap<E>(&mut self, f: impl FnOnce(&T) -> Result<T, E>) -> Result<&mut Self, E> {
        if !self.wrap.is_nothing() {
            self.wrap = f(&self.wrap)?;
        }
        Ok(self)
    }
}

impl<T> From<T> for Kind<T> {
    fn from(value: T) -> Self {
        Kind::new(value)
    }
}

impl<T, U> BitOr<U> for Kind<T>
where
    T: Truthy,
    U: Into<Kind<T>>,
{
    type Output = Kind<T>;

    fn bitor(self, other: U) -> Kind<T> {
        if self.is_truthy() {
            self
        } else {
            other.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::value::Value;

    use std::cell::Cell;

    #[test]
    fn fallback_chain_yields_first_truthy() {
        // no truthy link, the last one is what remains
        let k = Kind::new(Value::Int(0)) | Value::None | Value::from("") | Value::Int(0);
        assert_eq!(k.extract(), Value::Int(0));
        let k = Kind::new(Value::Int(0)) | Value::None | Value::Int(0) | Value::from("");
        assert_eq!(k.extract(), Value::from(""));

        let k = Kind::new(Value::Int(0)) | Value::Int(100) | Value::None | Value::Bool(true);
        assert_eq!(k.extract(), Value::Int(100));

        let k = Kind::new(Value::Int(0))
            | Value::Int(100)
            | Kind::new(Value::None)
            | Kind::new(Value::Bool(true));
        assert_eq!(k.extract(), Value::Int(100));
    }

    #[test]
    fn wrapping_a_kind_is_idempotent() {
        let k = Kind::new("x");
        assert_eq!(Kind::from(k.clone()), k);
        assert_eq!((Kind::new("") | k.clone()).extract(), "x");
    }

    #[test]
    fn typed_chains() {
        assert_eq!((Kind::new(0i64) | 0 | 7 | 9).extract(), 7);
        assert_eq!((Kind::new(String::new()) | "a".to_string()).extract(), "a");
        assert_eq!((Kind::new(None::<i32>) | Some(0) | None).extract(), None);
    }

    #[test]
    fn or_else_skips_untaken_operands() {
        let calls = Cell::new(0);
        let k = Kind::new(1).or_else(|| {
            calls.set(calls.get() + 1);
            2
        });
        assert_eq!(k.extract(), 1);
        assert_eq!(calls.get(), 0);

        let k = Kind::new(0).or_else(|| {
            calls.set(calls.get() + 1);
            2
        });
        assert_eq!(k.extract(), 2);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn fmap_skips_nothing() {
        let mut k = Kind::new(Value::None);
        k.fmap(|_| Value::Int(1));
        assert_eq!(k.extract(), Value::None);

        let mut k = Kind::new(Value::Int(5));
        k.try_fmap(|v| v.add(&Value::Int(1))).unwrap();
        assert_eq!(k.extract(), Value::Int(6));
    }

    #[test]
    fn fmap_maps_falsy_values_too() {
        let mut k = Kind::new(0);
        k.fmap(|x| x + 1);
        assert_eq!(k.get(), &1);
    }

    #[test]
    fn try_fmap_keeps_value_on_error() {
        let mut k = Kind::new(Value::from("s"));
        let err = k.try_fmap(|v| v.add(&Value::Int(1))).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert_eq!(k.extract(), Value::from("s"));
    }
}
