/// Truth testing for values that take part in fallback chains.
///
/// Follows the usual dynamic-language rules: `false`, zero, empty strings,
/// empty collections and the "no value" inhabitant are falsy, everything
/// else is truthy.
pub trait Truthy {
    fn is_truthy(&self) -> bool;

    /// `true` only for the "no value" inhabitant, e.g. `None`.
    ///
    /// A value can be falsy without being nothing (`0`, `""`).
    fn is_nothing(&self) -> bool {
        false
    }
}

macro_rules! truthy_number {
    ($($t:ty),*) => {
        $(
            impl Truthy for $t {
                fn is_truthy(&self) -> bool {
                    *self != 0 as $t
                }
            }
        )*
    };
}

truthy_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for char {
    fn is_truthy(&self) -> bool {
        true
    }
}

impl Truthy for str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for [T] {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().map_or(false, Truthy::is_truthy)
    }

    fn is_nothing(&self) -> bool {
        self.is_none()
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }

    fn is_nothing(&self) -> bool {
        (**self).is_nothing()
    }
}

impl Truthy for () {
    fn is_truthy(&self) -> bool {
        false
    }

    fn is_nothing(&self) -> bool {
        true
    }
}

#[test]
pub fn test_truthiness() {
    assert!(!0.is_truthy());
    assert!(7u8.is_truthy());
    assert!(!0.0f64.is_truthy());
    assert!(!"".is_truthy());
    assert!("x".is_truthy());
    assert!(!Vec::<u8>::new().is_truthy());
    assert!(!Some(0).is_truthy());
    assert!(Some(1).is_truthy());
    assert!(None::<i32>.is_nothing());
    assert!(!Some(0).is_nothing());
    assert!(!0.is_nothing());
}
