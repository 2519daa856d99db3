//! REPL language: parsing and evaluation of command lines.
//!
//! Terms are values, rich functions or curried functions. Operators between
//! two values compute right away, as soon as a function is involved they
//! build a new rich function instead.

use crate::curry::{curry, Applied, Curry, Signature};
use crate::error::{Error, Result};
use crate::interruption::{self, Budget};
use crate::kind::Kind;
use crate::parser::{
    end_of_input, expect, peek_not, satisfy, spaces, symbol, take, GenericP, StrParser,
};
use crate::rich::FunctionRich;
use crate::traits::Truthy;
use crate::value::Value;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

type P<R> = GenericP<u8, R, String>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Fallback,
    Apply,
    Less,
    LessEq,
    Equal,
    NotEqual,
    GreaterEq,
    Greater,
    Then,
    After,
    Add,
    Sub,
    Mul,
    Div,
    Compose,
    Repeat,
}

impl Op {
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Fallback => "|",
            Op::Apply => "&",
            Op::Less => "<",
            Op::LessEq => "<=",
            Op::Equal => "==",
            Op::NotEqual => "!=",
            Op::GreaterEq => ">=",
            Op::Greater => ">",
            Op::Then => ">>",
            Op::After => "<<",
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Compose => "%",
            Op::Repeat => "^",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Lit(Value),
    Name(String),
    /// `_`, the previous result
    Last,
    Tuple(Vec<Expr>),
    Neg(Box<Expr>),
    Bin(Op, Box<Expr>, Box<Expr>),
}

impl Expr {
    fn bin(op: Op, left: Expr, right: Expr) -> Expr {
        Expr::Bin(op, Box::new(left), Box::new(right))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Eval(Expr),
    Let(String, Expr),
}

pub use Command::*;

fn fail<R: 'static>(message: String) -> P<R> {
    GenericP::new(move |_| (0, Err(message.clone())))
}

fn identifier() -> P<String> {
    spaces()
        .then(satisfy(|c| c.is_alphabetic() || c == '_'))
        .and(take(|c| c.is_alphanumeric() || c == '_'))
        .map(|(first, rest)| format!("{}{}", first, rest))
}

fn number() -> P<Value> {
    spaces()
        .then(satisfy(|c| c.is_ascii_digit()).some())
        .and(expect('.').then(take(|c| c.is_ascii_digit())).optional())
        .and_then(|(digits, fraction)| {
            let int: String = digits.into_iter().collect();
            match fraction {
                Some(fraction) => match format!("{}.{}", int, fraction).parse::<f64>() {
                    Ok(x) => GenericP::pure(Value::Float(x)),
                    Err(e) => fail(e.to_string()),
                },
                None => match int.parse::<i64>() {
                    Ok(i) => GenericP::pure(Value::Int(i)),
                    Err(_) => fail(format!("integer literal {} is too large", int)),
                },
            }
        })
}

fn quoted(quote: char) -> P<String> {
    expect(quote)
        .then(take(move |c| c != quote))
        .before(expect(quote))
}

fn string() -> P<Value> {
    spaces()
        .then(quoted('\'').or(quoted('"')))
        .map(Value::Str)
}

fn atom() -> P<Expr> {
    number()
        .map(Expr::Lit)
        .or(string().map(Expr::Lit))
        .or(identifier().map(|name| match name.as_str() {
            "None" => Expr::Lit(Value::None),
            "True" => Expr::Lit(Value::Bool(true)),
            "False" => Expr::Lit(Value::Bool(false)),
            "_" => Expr::Last,
            _ => Expr::Name(name),
        }))
        .or(parenthesized())
        .or(fail("value, name or '(' expected".to_string()))
}

/// `()`, `(x)`, `(x,)`, `(x, y, ...)`
fn parenthesized() -> P<Expr> {
    symbol("(").and_then(|_| {
        let empty = symbol(")").map(|_| Expr::Tuple(Vec::new()));
        let items = chain()
            .and(symbol(",").then(chain()).attempt().many())
            .and(symbol(",").optional())
            .before(symbol(")"))
            .map(|((first, rest), trailing)| {
                if rest.is_empty() && trailing.is_none() {
                    first
                } else {
                    let mut all = vec![first];
                    all.extend(rest);
                    Expr::Tuple(all)
                }
            });
        empty.or(items)
    })
}

fn op(word: &'static str, op: Op) -> P<Op> {
    symbol(word).map(move |_| op)
}

fn left_assoc(operand: P<Expr>, ops: P<Op>) -> P<Expr> {
    operand
        .clone()
        .and(ops.and(operand).many())
        .map(|(first, rest)| {
            rest.into_iter()
                .fold(first, |left, (op, right)| Expr::bin(op, left, right))
        })
}

fn unary() -> P<Expr> {
    symbol("-")
        .and_then(|_| unary())
        .map(|e| Expr::Neg(Box::new(e)))
        .or(atom())
}

fn power() -> P<Expr> {
    let operand = unary();
    operand
        .clone()
        .and(op("^", Op::Repeat).then(operand).optional())
        .map(|(base, n)| match n {
            Some(n) => Expr::bin(Op::Repeat, base, n),
            None => base,
        })
}

fn product() -> P<Expr> {
    left_assoc(
        power(),
        op("*", Op::Mul)
            .or(op("/", Op::Div))
            .or(op("%", Op::Compose)),
    )
}

fn sum() -> P<Expr> {
    left_assoc(product(), op("+", Op::Add).or(op("-", Op::Sub)))
}

fn pipe() -> P<Expr> {
    left_assoc(sum(), op(">>", Op::Then).or(op("<<", Op::After)))
}

fn compare() -> P<Expr> {
    let operand = pipe();
    let ops = op("<=", Op::LessEq)
        .or(op(">=", Op::GreaterEq))
        .or(op("==", Op::Equal))
        .or(op("!=", Op::NotEqual))
        .or(op("<", Op::Less))
        .or(op(">", Op::Greater));
    operand
        .clone()
        .and(ops.and(operand).optional())
        .map(|(left, rest)| match rest {
            Some((op, right)) => Expr::bin(op, left, right),
            None => left,
        })
}

fn apply() -> P<Expr> {
    left_assoc(compare(), op("&", Op::Apply))
}

/// a whole expression
pub fn chain() -> P<Expr> {
    left_assoc(apply(), op("|", Op::Fallback))
}

/// `name = expression` or an expression, up to the end of the line
pub fn command() -> P<Command> {
    identifier()
        .before(symbol("="))
        .before(peek_not('='))
        .attempt()
        .optional()
        .and_then(|name| match name {
            Some(name) => chain().map(move |e| Let(name.clone(), e)),
            None => chain().map(Eval),
        })
        .before(spaces())
        .before(end_of_input())
}

/// Anything an expression evaluates to.
#[derive(Clone, Debug)]
pub enum Term {
    Value(Value),
    Function(FunctionRich),
    Curried(Curry),
}

impl Term {
    pub fn into_function(self) -> FunctionRich {
        match self {
            Term::Value(v) => FunctionRich::constant(v),
            Term::Function(f) => f,
            Term::Curried(c) => FunctionRich::from(c),
        }
    }

    pub fn into_value(self) -> Result<Value> {
        match self {
            Term::Value(v) => Ok(v),
            other => Err(Error::not_implemented(format!(
                "{} used where a value is needed",
                other
            ))),
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Term::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Applied> for Term {
    fn from(applied: Applied) -> Self {
        match applied {
            Applied::Value(v) => Term::Value(v),
            Applied::Partial(c) => Term::Curried(c),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Value(v) => write!(f, "{}", v),
            Term::Function(func) => write!(f, "{}", func),
            Term::Curried(c) => write!(f, "{}", c),
        }
    }
}

/// What executing a command produced.
#[derive(Clone, Debug)]
pub enum Outcome {
    Evaluated(Term),
    Defined(String, Term),
}

impl Outcome {
    pub fn term(&self) -> &Term {
        match self {
            Outcome::Evaluated(t) | Outcome::Defined(_, t) => t,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Evaluated(t) => write!(f, "{}", t),
            Outcome::Defined(name, t) => write!(f, "{} = {}", name, t),
        }
    }
}

pub struct Interpreter {
    pub last: Term,
    pub env: HashMap<String, Term>,
    prelude: BTreeMap<&'static str, Term>,
    budget: Arc<Budget>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

fn value_op(op: Op, a: &Value, b: &Value) -> Result<Value> {
    match op {
        Op::Add => a.add(b),
        Op::Sub => a.sub(b),
        Op::Mul => a.mul(b),
        Op::Div => a.div(b),
        Op::Less => a.less(b),
        Op::LessEq => a.less_eq(b),
        Op::Equal => a.equal(b),
        Op::NotEqual => a.not_equal(b),
        Op::GreaterEq => a.greater_eq(b),
        Op::Greater => a.greater(b),
        other => Err(Error::not_implemented(format!(
            "'{}' between {} and {}",
            other.symbol(),
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn function_op(op: Op, f: FunctionRich, g: FunctionRich) -> Result<FunctionRich> {
    Ok(match op {
        Op::Add => f + g,
        Op::Sub => f - g,
        Op::Mul => f * g,
        Op::Div => f / g,
        Op::Compose => f % g,
        Op::Then => f >> g,
        Op::After => f << g,
        Op::Less => f.less(g),
        Op::LessEq => f.less_eq(g),
        Op::Equal => f.equal(g),
        Op::NotEqual => f.not_equal(g),
        Op::GreaterEq => f.greater_eq(g),
        Op::Greater => f.greater(g),
        other => {
            return Err(Error::not_implemented(format!(
                "'{}' between functions",
                other.symbol()
            )))
        }
    })
}

fn len(x: &Value) -> Result<Value> {
    match x {
        Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
        Value::Tuple(items) | Value::List(items) => Ok(Value::Int(items.len() as i64)),
        other => Err(Error::BadOperand {
            op: "len()",
            operand: other.type_name(),
        }),
    }
}

fn upper(x: &Value) -> Result<Value> {
    match x {
        Value::Str(s) => Ok(Value::Str(s.to_uppercase())),
        other => Err(Error::BadOperand {
            op: "upper()",
            operand: other.type_name(),
        }),
    }
}

fn clamp(args: &[Value]) -> Result<Value> {
    let (x, lo, hi) = (&args[0], &args[1], &args[2]);
    if x.less(lo)?.is_truthy() {
        Ok(lo.clone())
    } else if x.greater(hi)?.is_truthy() {
        Ok(hi.clone())
    } else {
        Ok(x.clone())
    }
}

/// The builtin functions; each call draws from `budget`.
fn prelude(budget: &Arc<Budget>) -> BTreeMap<&'static str, Term> {
    let unary = |name: &'static str, f: fn(&Value) -> Result<Value>| {
        let budget = budget.clone();
        Term::Function(FunctionRich::unary(name, move |x| {
            budget.consume()?;
            f(x)
        }))
    };
    let curried = |signature: Signature, f: fn(&[Value]) -> Result<Value>| {
        let budget = budget.clone();
        Term::Curried(curry(signature, move |args| {
            budget.consume()?;
            f(args)
        }))
    };
    BTreeMap::from([
        ("id", unary("id", |x| Ok(x.clone()))),
        ("inc", unary("inc", |x| x.add(&Value::Int(1)))),
        ("dec", unary("dec", |x| x.sub(&Value::Int(1)))),
        ("double", unary("double", |x| x.mul(&Value::Int(2)))),
        ("square", unary("square", |x| x.mul(x))),
        ("neg", unary("neg", |x| x.neg())),
        ("abs", unary("abs", |x| x.abs())),
        ("not", unary("not", |x| Ok(Value::Bool(!x.is_truthy())))),
        ("len", unary("len", len)),
        ("upper", unary("upper", upper)),
        (
            "swap",
            curried(Signature::of("swap", &["a", "b"]), |args| {
                Ok(Value::tuple([args[1].clone(), args[0].clone()]))
            }),
        ),
        (
            "pair",
            curried(Signature::of("pair", &["a", "b"]), |args| {
                Ok(Value::tuple(args.iter().cloned()))
            }),
        ),
        (
            "add",
            curried(Signature::of("add", &["a", "b"]), |args| args[0].add(&args[1])),
        ),
        (
            "mul",
            curried(Signature::of("mul", &["a", "b"]), |args| args[0].mul(&args[1])),
        ),
        (
            "concat",
            curried(
                Signature::new("concat").param("a").param("b").optional("sep", ""),
                |args| args[0].add(&args[2])?.add(&args[1]),
            ),
        ),
        (
            "clamp",
            curried(Signature::of("clamp", &["x", "lo", "hi"]), clamp),
        ),
    ])
}

impl Interpreter {
    pub fn new() -> Self {
        let budget = Arc::new(Budget::unlimited());
        let prelude = prelude(&budget);
        Interpreter {
            last: Term::Value(Value::None),
            env: HashMap::new(),
            prelude,
            budget,
        }
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    pub fn parse(line: &str) -> Result<Command> {
        match command().parse_str_raw(line) {
            (_, Ok(cmd)) => Ok(cmd),
            (position, Err(message)) => Err(Error::Parse { position, message }),
        }
    }

    /// Parse and execute a line without any call limit.
    pub fn evaluate(&mut self, line: &str) -> Result<Outcome> {
        interruption::reset();
        self.budget.start(None);
        let cmd = Interpreter::parse(line)?;
        self.execute(cmd)
    }

    /// Evaluate an expression line with at most `budget` builtin calls,
    /// leaving the interpreter state alone. Definitions are not previewed.
    pub fn preview(&self, line: &str, budget: u64) -> Option<Term> {
        match Interpreter::parse(line).ok()? {
            Eval(expr) => {
                self.budget.start(Some(budget));
                let result = self.eval(&expr);
                self.budget.start(None);
                result.ok()
            }
            Let(..) => None,
        }
    }

    pub fn execute(&mut self, cmd: Command) -> Result<Outcome> {
        match cmd {
            Eval(expr) => {
                let current = self.eval(&expr)?;
                self.last = current.clone();
                Ok(Outcome::Evaluated(current))
            }
            Let(name, expr) => {
                if name == "_"
                    || self.env.contains_key(&name)
                    || self.prelude.contains_key(name.as_str())
                {
                    return Err(Error::AlreadyDefined(name));
                }
                let current = self.eval(&expr)?;
                tracing::debug!(name = %name, term = %current, "defined");
                self.env.insert(name.clone(), current.clone());
                self.last = current.clone();
                Ok(Outcome::Defined(name, current))
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Result<Term> {
        self.env
            .get(name)
            .or_else(|| self.prelude.get(name))
            .cloned()
            .ok_or_else(|| Error::Undefined(name.to_string()))
    }

    pub fn eval(&self, expr: &Expr) -> Result<Term> {
        match expr {
            Expr::Lit(v) => Ok(Term::Value(v.clone())),
            Expr::Name(name) => self.lookup(name),
            Expr::Last => Ok(self.last.clone()),
            Expr::Tuple(items) => items
                .iter()
                .map(|e| self.eval(e).and_then(Term::into_value))
                .collect::<Result<Vec<_>>>()
                .map(|vs| Term::Value(Value::Tuple(vs))),
            Expr::Neg(e) => match self.eval(e)? {
                Term::Value(v) => v.neg().map(Term::Value),
                other => Ok(Term::Function(-other.into_function())),
            },
            Expr::Bin(op, left, right) => self.binary(*op, left, right),
        }
    }

    fn binary(&self, op: Op, left: &Expr, right: &Expr) -> Result<Term> {
        match op {
            Op::Fallback => self.fallback(left, right),
            Op::Apply => {
                let f = self.eval(left)?;
                let arg = self.eval(right)?.into_value()?;
                self.apply(f, arg)
            }
            Op::Repeat => {
                let f = self.eval(left)?;
                let n = self.eval(right)?.into_value()?;
                match f {
                    Term::Value(v) => Err(Error::not_implemented(format!(
                        "'^' on {}",
                        v.type_name()
                    ))),
                    f => f.into_function().repeat_value(&n).map(Term::Function),
                }
            }
            _ => match (self.eval(left)?, self.eval(right)?) {
                (Term::Value(a), Term::Value(b)) => value_op(op, &a, &b).map(Term::Value),
                (f, g) => function_op(op, f.into_function(), g.into_function()).map(Term::Function),
            },
        }
    }

    /// `left | right`, where `right` is only evaluated when `left` is falsy
    fn fallback(&self, left: &Expr, right: &Expr) -> Result<Term> {
        let first = Kind::new(self.eval(left)?.into_value()?);
        let mut failure = None;
        let chosen = first.or_else(|| match self.eval(right).and_then(Term::into_value) {
            Ok(v) => v,
            Err(e) => {
                failure = Some(e);
                Value::None
            }
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(Term::Value(chosen.extract())),
        }
    }

    fn apply(&self, f: Term, arg: Value) -> Result<Term> {
        match f {
            Term::Function(f) => f.apply(arg).map(Term::Value),
            Term::Curried(c) => {
                let args = match arg {
                    Value::Tuple(items) => items,
                    other => vec![other],
                };
                c.call(args).map(Term::from)
            }
            Term::Value(v) => Err(Error::not_implemented(format!(
                "applying {}, which is not a function",
                v
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(interp: &mut Interpreter, line: &str) -> Result<Value> {
        interp
            .evaluate(line)
            .and_then(|outcome| outcome.term().clone().into_value())
    }

    fn value_of(line: &str) -> Result<Value> {
        eval(&mut Interpreter::new(), line)
    }

    #[test]
    fn parse_test() {
        assert_eq!(
            Interpreter::parse("1 + 2 * 3"),
            Ok(Eval(Expr::bin(
                Op::Add,
                Expr::Lit(Value::Int(1)),
                Expr::bin(Op::Mul, Expr::Lit(Value::Int(2)), Expr::Lit(Value::Int(3)))
            )))
        );
        assert_eq!(
            Interpreter::parse("f = inc"),
            Ok(Let("f".into(), Expr::Name("inc".into())))
        );
        assert_eq!(
            Interpreter::parse("(1,)"),
            Ok(Eval(Expr::Tuple(vec![Expr::Lit(Value::Int(1))])))
        );
        assert_eq!(
            Interpreter::parse(" ( 'a' ) "),
            Ok(Eval(Expr::Lit(Value::from("a"))))
        );
        assert_eq!(Interpreter::parse("()"), Ok(Eval(Expr::Tuple(vec![]))));
        assert_eq!(
            Interpreter::parse("x == None"),
            Ok(Eval(Expr::bin(
                Op::Equal,
                Expr::Name("x".into()),
                Expr::Lit(Value::None)
            )))
        );
        for bad in ["1 +", "(1, 2", "f = ", "'open", "1 2", "#"] {
            assert!(
                matches!(Interpreter::parse(bad), Err(Error::Parse { .. })),
                "{:?} should not parse",
                bad
            );
        }
    }

    #[test]
    fn arithmetic_on_values() {
        assert_eq!(value_of("1 + 2 * 3"), Ok(Value::Int(7)));
        assert_eq!(value_of("7 / 2"), Ok(Value::Float(3.5)));
        assert_eq!(value_of("-(1 - 3)"), Ok(Value::Int(2)));
        assert_eq!(value_of("'ab' * 2"), Ok(Value::from("abab")));
        assert_eq!(value_of("1.5 < 2"), Ok(Value::Bool(true)));
        assert!(matches!(value_of("1 % 2"), Err(Error::NotImplemented { .. })));
    }

    #[test]
    fn composition() {
        assert_eq!(value_of("inc % double & 5"), Ok(Value::Int(11)));
        assert_eq!(value_of("(inc >> double) & 5"), Ok(Value::Int(12)));
        assert_eq!(value_of("(inc << double) & 5"), Ok(Value::Int(11)));
        assert_eq!(value_of("swap % pair & (1, 2)"), Ok(Value::from((2, 1))));
        assert_eq!(value_of("(double ^ 3) & 1"), Ok(Value::Int(8)));
        assert_eq!(value_of("(inc ^ 0) & 'x'"), Ok(Value::from("x")));
        assert!(matches!(
            value_of("double ^ -1"),
            Err(Error::NotImplemented { .. })
        ));
        assert!(matches!(
            value_of("double ^ 0.5"),
            Err(Error::NotImplemented { .. })
        ));
    }

    #[test]
    fn pointwise() {
        assert_eq!(value_of("(inc + double) & 2"), Ok(Value::Int(7)));
        assert_eq!(value_of("(10 - inc) & 2"), Ok(Value::Int(7)));
        assert_eq!(value_of("(inc < double) & 2"), Ok(Value::Bool(true)));
        assert_eq!(value_of("(inc == 3) & 2"), Ok(Value::Bool(true)));
        assert_eq!(value_of("-inc & 1"), Ok(Value::Int(-2)));
    }

    #[test]
    fn curried_builtins() {
        let mut interp = Interpreter::new();
        assert!(matches!(
            interp.evaluate("add & 1").map(|o| o.term().clone()),
            Ok(Term::Curried(_))
        ));
        assert_eq!(eval(&mut interp, "_ & 2"), Ok(Value::Int(3)));
        assert_eq!(value_of("add & (1, 2)"), Ok(Value::Int(3)));
        assert_eq!(value_of("concat & ('a', 'b')"), Ok(Value::from("ab")));
        assert_eq!(value_of("clamp & (15, 0, 10)"), Ok(Value::Int(10)));
        assert_eq!(value_of("(add & 1) % inc & 1"), Ok(Value::Int(3)));
        assert!(matches!(
            value_of("add % inc & 1"),
            Err(Error::MissingArguments { .. })
        ));
        assert!(matches!(
            interp.evaluate("add & (1, 2, 3)").map(|o| o.term().clone()),
            Ok(Term::Curried(_))
        ));
        assert!(matches!(
            eval(&mut interp, "_ % id & 0"),
            Err(Error::Arity {
                expected: 2,
                given: 4,
                ..
            })
        ));
    }

    #[test]
    fn fallback_chain_is_lazy() {
        assert_eq!(value_of("0 | None | '' | 0"), Ok(Value::Int(0)));
        assert_eq!(value_of("0 | None | 'x' | 0"), Ok(Value::from("x")));
        assert_eq!(value_of("0 | 100 | None | True"), Ok(Value::Int(100)));
        assert_eq!(value_of("1 | nowhere"), Ok(Value::Int(1)));
        assert_eq!(
            value_of("0 | nowhere"),
            Err(Error::Undefined("nowhere".into()))
        );
    }

    #[test]
    fn definitions() {
        let mut interp = Interpreter::new();
        let outcome = interp.evaluate("f = inc % double").unwrap();
        assert_eq!(outcome.to_string(), "f = <function (inc % double)>");
        assert_eq!(eval(&mut interp, "f & 1"), Ok(Value::Int(3)));
        assert_eq!(
            interp.evaluate("f = inc").map(|_| ()),
            Err(Error::AlreadyDefined("f".into()))
        );
        assert_eq!(
            interp.evaluate("inc = 1").map(|_| ()),
            Err(Error::AlreadyDefined("inc".into()))
        );
        assert_eq!(
            eval(&mut interp, "g == 1"),
            Err(Error::Undefined("g".into()))
        );
    }

    #[test]
    fn builtin_errors() {
        assert_eq!(value_of("len & 'abc'"), Ok(Value::Int(3)));
        assert!(matches!(value_of("len & 5"), Err(Error::BadOperand { .. })));
        assert!(matches!(value_of("1 & 2"), Err(Error::NotImplemented { .. })));
        assert!(matches!(value_of("inc & 'a'"), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn preview_is_bounded() {
        let interp = Interpreter::new();
        assert_eq!(
            interp.preview("inc & 1", 128).and_then(|t| t.as_value().cloned()),
            Some(Value::Int(2))
        );
        assert!(interp.preview("(inc ^ 1000) & 0", 128).is_none());
        assert!(interp.preview("x = 1", 128).is_none());
        let mut interp = interp;
        assert_eq!(eval(&mut interp, "(inc ^ 1000) & 0"), Ok(Value::Int(1000)));
        assert_eq!(interp.budget().used(), 1000);
    }

    #[test]
    fn cancelled_evaluation() {
        let interp = Interpreter::new();
        interp.budget().cancel();
        let expr = match Interpreter::parse("inc & 1") {
            Ok(Eval(expr)) => expr,
            other => panic!("unexpected {:?}", other),
        };
        assert!(matches!(interp.eval(&expr), Err(Error::Interrupted)));
    }
}
