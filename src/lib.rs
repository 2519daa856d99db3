//! Function composition in Rust.
//!
//! - [`curry`] puts a function in curry form: call it with some arguments and
//!   get back a function waiting for the rest.
//! - [`FunctionRich`] wraps a function so it composes with operators
//!   (`f % g`, `f >> g`, `f ^ 3`, `f + g`, ...).
//! - [`Kind`] wraps a single value and supports fallback chains
//!   (`Kind::new(a) | b | c`) and `fmap`.
//!
//! The `functional` binary is a small REPL over these.

pub mod config;
pub mod curry;
pub mod error;
pub mod interpreter;
pub mod interruption;
pub mod kind;
pub mod parser;
pub mod rich;
pub mod traits;
pub mod value;

pub use curry::{curry, Applied, Curry, Signature};
pub use error::{Error, Result};
pub use kind::Kind;
pub use rich::{identity, FunctionRich, IDENTITY};
pub use traits::Truthy;
pub use value::Value;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The first item of `items` satisfying `predicate`, `None` if there is none.
///
/// ```
/// use functional::find_first;
///
/// assert_eq!(find_first(|x: &i32| *x > 3, [1, 2, 3, 4, 5]), Some(4));
/// assert_eq!(find_first(|x: &i32| *x > 10, [1, 2, 3]), None);
/// ```
pub fn find_first<I, P>(predicate: P, items: I) -> Option<I::Item>
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
    items.into_iter().find(predicate)
}

#[test]
fn test_find_first_stops_at_first_match() {
    let mut seen = Vec::new();
    let found = find_first(
        |x: &&str| {
            seen.push(*x);
            x.starts_with('b')
        },
        vec!["a", "b1", "b2"],
    );
    assert_eq!(found, Some("b1"));
    assert_eq!(seen, vec!["a", "b1"]);
}
