//! Parser combinators over byte slices.
//!
//! A parser reports how many items it consumed together with its result,
//! also when it fails. The REPL uses that count to point at the spot where
//! a line stopped making sense.

use std::rc::Rc;
use std::str::from_utf8;

pub trait Parser<S, R, E> {
    /// Run a parser. The result is a tuple, whose first component
    /// indicates the number of items consumed.
    /// The second is the actual result.
    ///
    /// For string parsers the number of consumed items is bytes, not chars.
    fn parse_raw(&self, src: &[S]) -> (usize, Result<R, E>);
    fn parse(&self, src: &[S]) -> Result<R, E> {
        let (_, it) = self.parse_raw(src);
        it
    }
}

/// Parsers run on `str` slices, which are `u8` slices holding valid UTF-8.
///
/// Consumed counts always point at the start of a UTF-8 sequence, but a
/// visible character may still consist of several code points (`e` followed
/// by a combining accent), so an error can be reported "inside" what looks
/// like one character.
pub trait StrParser<R, E>: Parser<u8, R, E> {
    fn parse_str_raw(&self, src: &str) -> (usize, Result<R, E>) {
        self.parse_raw(src.as_bytes())
    }
    fn parse_str(&self, src: &str) -> Result<R, E> {
        self.parse(src.as_bytes())
    }
}

pub type ParseResult<R, E> = (usize, Result<R, E>);
type ParserFunc<S, R, E> = Rc<dyn Fn(&[S]) -> ParseResult<R, E>>;

pub struct GenericP<S, R, E> {
    run: ParserFunc<S, R, E>,
}

impl<S, R, E> Clone for GenericP<S, R, E> {
    fn clone(&self) -> Self {
        GenericP {
            run: self.run.clone(),
        }
    }
}

impl<S, R, E> GenericP<S, R, E>
where
    S: 'static,
    R: 'static,
    E: 'static,
{
    pub fn new(run: impl Fn(&[S]) -> ParseResult<R, E> + 'static) -> Self {
        GenericP { run: Rc::new(run) }
    }

    /// succeed with `value` without consuming anything
    pub fn pure(value: R) -> Self
    where
        R: Clone,
    {
        GenericP::new(move |_| (0, Ok(value.clone())))
    }

    pub fn map<T>(self, f: impl Fn(R) -> T + 'static) -> GenericP<S, T, E>
    where
        T: 'static,
    {
        GenericP::new(move |array| {
            let (u, r) = (self.run)(array);
            (u, r.map(&f))
        })
    }

    /// The monadic bind operation.
    ///
    /// First, `p` is run. When that fails, the whole expression fails.
    /// Otherwise, the value produced by `p` is passed to the closure, which
    /// constructs the parser for the rest of the input.
    ///
    /// Constructing the second parser only when it is needed is also how
    /// recursive grammars are tied together.
    pub fn and_then<T>(self, f: impl Fn(R) -> GenericP<S, T, E> + 'static) -> GenericP<S, T, E>
    where
        T: 'static,
    {
        GenericP::new(move |array| match (self.run)(array) {
            (u, Ok(a)) => match (f(a).run)(&array[u..]) {
                (v, r) => (u + v, r),
            },
            (u, Err(err)) => (u, Err(err)),
        })
    }

    /// `p.then(q)` runs `p`, then `q`, and keeps only the value of `q`.
    /// If you want to keep both values, use `p.and(q)`.
    /// If you want only the value of `p`, use `p.before(q)`
    pub fn then<T>(self, r: GenericP<S, T, E>) -> GenericP<S, T, E>
    where
        T: 'static,
    {
        self.and(r).map(|(_, b)| b)
    }

    /// `p.and(q)` succeeds when both p and q succeed and it returns a tuple
    /// of the results of p and q.
    pub fn and<T>(self, r: GenericP<S, T, E>) -> GenericP<S, (R, T), E>
    where
        T: 'static,
    {
        GenericP::new(move |array| match (self.run)(array) {
            (u, Ok(a)) => match (r.run)(&array[u..]) {
                (v, Ok(b)) => (u + v, Ok((a, b))),
                (v, Err(e)) => (u + v, Err(e)),
            },
            (u, Err(e)) => (u, Err(e)),
        })
    }

    /// `p.before(q)` succeeds when both p and q succeed and returns
    /// the result of p.
    pub fn before<T>(self, r: GenericP<S, T, E>) -> GenericP<S, R, E>
    where
        T: 'static,
    {
        self.and(r).map(|(a, _)| a)
    }

    /// Try `p`, and when it fails, `q` on the same input.
    ///
    /// If both fail, the error of the one that got further is reported.
    pub fn or(self, other: GenericP<S, R, E>) -> GenericP<S, R, E> {
        GenericP::new(move |array| match (self.run)(array) {
            (u, Ok(a)) => (u, Ok(a)),
            (u, Err(e)) => match (other.run)(array) {
                (v, Ok(b)) => (v, Ok(b)),
                (v, Err(_)) if u > v => (u, Err(e)),
                (v, Err(f)) => (v, Err(f)),
            },
        })
    }

    /// Like `p`, but a failure consumes nothing.
    pub fn attempt(self) -> GenericP<S, R, E> {
        GenericP::new(move |array| match (self.run)(array) {
            (_, Err(e)) => (0, Err(e)),
            ok => ok,
        })
    }

    /// Zero or more `p`.
    ///
    /// Stops at the first failure of `p` that consumed nothing; a failure
    /// after consuming input fails the whole repetition.
    pub fn many(self) -> GenericP<S, Vec<R>, E> {
        GenericP::new(move |array| {
            let mut used = 0;
            let mut out = Vec::new();
            loop {
                match (self.run)(&array[used..]) {
                    (0, Err(_)) => return (used, Ok(out)),
                    (u, Err(e)) => return (used + u, Err(e)),
                    (0, Ok(r)) => {
                        out.push(r);
                        return (used, Ok(out));
                    }
                    (u, Ok(r)) => {
                        used += u;
                        out.push(r);
                    }
                }
            }
        })
    }

    /// One or more `p`.
    pub fn some(self) -> GenericP<S, Vec<R>, E> {
        self.clone().and(self.many()).map(|(first, mut rest)| {
            rest.insert(0, first);
            rest
        })
    }

    /// `p` or nothing; fails only when `p` fails after consuming input.
    pub fn optional(self) -> GenericP<S, Option<R>, E> {
        GenericP::new(move |array| match (self.run)(array) {
            (u, Ok(r)) => (u, Ok(Some(r))),
            (0, Err(_)) => (0, Ok(None)),
            (u, Err(e)) => (u, Err(e)),
        })
    }
}

impl<S, R, E> Parser<S, R, E> for GenericP<S, R, E> {
    fn parse_raw(&self, src: &[S]) -> (usize, Result<R, E>) {
        (self.run)(src)
    }
}

impl<R, E> StrParser<R, E> for GenericP<u8, R, E> {}

/// the first character of `array`, if it starts with a valid one
fn first_char(array: &[u8]) -> Option<char> {
    let valid = match from_utf8(array) {
        Ok(s) => s,
        Err(e) => from_utf8(&array[..e.valid_up_to()]).unwrap_or(""),
    };
    valid.chars().next()
}

/// expect and consume a certain character
pub fn expect(c: char) -> GenericP<u8, char, String> {
    let mut buffer = [0u8; 4];
    let encoded = c.encode_utf8(&mut buffer).as_bytes().to_vec();
    GenericP::new(move |array| {
        if array.starts_with(&encoded) {
            (encoded.len(), Ok(c))
        } else {
            (0, Err(format!("'{}' expected", c)))
        }
    })
}

/// expect and consume a certain string, nothing is consumed if it is absent
pub fn keyword(word: &'static str) -> GenericP<u8, &'static str, String> {
    GenericP::new(move |array| {
        if array.starts_with(word.as_bytes()) {
            (word.len(), Ok(word))
        } else {
            (0, Err(format!("'{}' expected", word)))
        }
    })
}

pub fn satisfy(f: impl Fn(char) -> bool + 'static) -> GenericP<u8, char, String> {
    GenericP::new(move |array| match first_char(array) {
        None if array.is_empty() => (0, Err("unexpected end of input".to_string())),
        None => (0, Err("invalid UTF-8".to_string())),
        Some(c) if f(c) => (c.len_utf8(), Ok(c)),
        Some(c) => (0, Err(format!("unexpected '{}'", c))),
    })
}

/// succeeds without consuming when the next character is not `c`
pub fn peek_not(c: char) -> GenericP<u8, (), String> {
    GenericP::new(move |array| match first_char(array) {
        Some(d) if d == c => (0, Err(format!("unexpected '{}'", c))),
        _ => (0, Ok(())),
    })
}

/// the longest (possibly empty) prefix of characters satisfying `f`
pub fn take(f: impl Fn(char) -> bool + 'static) -> GenericP<u8, String, String> {
    satisfy(f)
        .many()
        .map(|cs| cs.into_iter().collect::<String>())
}

pub fn spaces() -> GenericP<u8, (), String> {
    take(char::is_whitespace).map(|_| ())
}

pub fn end_of_input() -> GenericP<u8, (), String> {
    GenericP::new(|array: &[u8]| {
        if array.is_empty() {
            (0, Ok(()))
        } else {
            (0, Err(format!("end of input expected, found {:?}", String::from_utf8_lossy(array))))
        }
    })
}

/// `word` after optional white space; nothing is consumed when it is absent
pub fn symbol(word: &'static str) -> GenericP<u8, &'static str, String> {
    spaces().then(keyword(word)).attempt()
}
