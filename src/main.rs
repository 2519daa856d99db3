use functional::config::ReplConfig;
use functional::interpreter::{command, Interpreter};
use functional::interruption;
use functional::parser::StrParser;
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Config, Editor, Helper};
use std::borrow::Cow;
use std::process;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub const RED: &str = "\x1b\x5b31m";
pub const YELLOW: &str = "\x1b\x5b32m";
pub const BLUE: &str = "\x1b\x5b34m";
pub const NORMAL: &str = "\x1b\x5b0m";

pub fn main() {
    let config = match ReplConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}{}{}", RED, e, NORMAL);
            process::exit(2);
        }
    };
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    info!(version = functional::VERSION, history = %config.history_file.display(), "starting");

    let rl_config = Config::builder().auto_add_history(true).build();
    let mut rl = Editor::<ReplHelper>::with_config(rl_config);
    rl.set_helper(Some(ReplHelper {
        interpreter: Interpreter::new(),
        hint_budget: config.hint_budget,
    }));
    if rl.load_history(&config.history_file).is_err() {
        println!(
            "No previous history in {}",
            config.history_file.display()
        );
    }
    if let Err(e) = interruption::initialize() {
        warn!(error = %e, "Ctrl-C will end the session");
    }
    loop {
        let readline = rl.readline("λ ");
        match readline {
            Ok(line) if line.trim().is_empty() => {}
            Ok(line) => {
                let outcome = match rl.helper_mut() {
                    Some(helper) => helper.interpreter.evaluate(&line),
                    None => break,
                };
                match outcome {
                    Ok(outcome) => println!("{}{}{}", YELLOW, outcome, NORMAL),
                    Err(e) => println!("{}{}{}", RED, e, NORMAL),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    if let Err(e) = rl.save_history(&config.history_file) {
        warn!(error = %e, file = %config.history_file.display(), "could not save history");
    }
}

struct ReplHelper {
    interpreter: Interpreter,
    hint_budget: u64,
}

impl ReplHelper {
    /// where parsing `line` stopped, if it failed somewhere inside
    fn error_offset(&self, line: &str) -> Option<usize> {
        match command().parse_str_raw(line) {
            (u, Err(_)) if u > 0 && u < line.len() && line.is_char_boundary(u) => Some(u),
            _ => None,
        }
    }
}

impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = String;
}

impl Validator for ReplHelper {}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        if line.trim().is_empty() {
            return None;
        }
        self.interpreter
            .preview(line, self.hint_budget)
            .map(|term| format!("{} → {}{}", BLUE, term, NORMAL))
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        match self.error_offset(line) {
            Some(u) => {
                let (a, b) = line.split_at(u);
                Cow::Owned(a.to_string() + RED + b + NORMAL)
            }
            None => Cow::Borrowed(line),
        }
    }

    fn highlight_char(&self, line: &str, _pos: usize) -> bool {
        self.error_offset(line).is_some()
    }
}
