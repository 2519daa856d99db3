#![allow(non_upper_case_globals)]

//! Ctrl-C handling and call budgets for REPL evaluations.

use crate::error::{Error, Result};

use ctrlc::set_handler;
use std::sync::atomic::{self, AtomicBool, AtomicU64};

static sigint_received: AtomicBool = AtomicBool::new(false);

pub fn reset() {
    sigint_received.store(false, atomic::Ordering::SeqCst);
}

pub fn was_interrupted() -> bool {
    sigint_received.load(atomic::Ordering::SeqCst)
}

pub fn initialize() -> Result<()> {
    set_handler(|| sigint_received.store(true, atomic::Ordering::SeqCst)).map_err(|e| {
        Error::Configuration {
            message: format!("setting Ctrl-C handler: {}", e),
        }
    })
}

/// Number of builtin calls an evaluation may still make.
///
/// Every builtin function calls [`Budget::consume`] before doing its work,
/// which also notices a pending Ctrl-C.
#[derive(Debug)]
pub struct Budget {
    limit: AtomicU64,
    used: AtomicU64,
    cancelled: AtomicBool,
}

impl Default for Budget {
    fn default() -> Self {
        Budget::unlimited()
    }
}

impl Budget {
    pub fn unlimited() -> Self {
        Budget {
            limit: AtomicU64::new(u64::MAX),
            used: AtomicU64::new(0),
            cancelled: AtomicBool::new(false),
        }
    }

    /// start counting from zero, `None` means no limit
    pub fn start(&self, limit: Option<u64>) {
        self.limit
            .store(limit.unwrap_or(u64::MAX), atomic::Ordering::SeqCst);
        self.used.store(0, atomic::Ordering::SeqCst);
        self.cancelled.store(false, atomic::Ordering::SeqCst);
    }

    /// stop the running evaluation at its next builtin call
    pub fn cancel(&self) {
        self.cancelled.store(true, atomic::Ordering::SeqCst);
    }

    pub fn used(&self) -> u64 {
        self.used.load(atomic::Ordering::SeqCst)
    }

    pub fn consume(&self) -> Result<()> {
        if self.cancelled.load(atomic::Ordering::SeqCst) || was_interrupted() {
            return Err(Error::Interrupted);
        }
        let limit = self.limit.load(atomic::Ordering::SeqCst);
        let used = self.used.fetch_add(1, atomic::Ordering::SeqCst) + 1;
        if used > limit {
            Err(Error::Exhausted { budget: limit })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_runs_out() {
        let budget = Budget::unlimited();
        budget.start(Some(2));
        assert_eq!(budget.consume(), Ok(()));
        assert_eq!(budget.consume(), Ok(()));
        assert_eq!(budget.consume(), Err(Error::Exhausted { budget: 2 }));
        budget.start(None);
        assert_eq!(budget.consume(), Ok(()));
        assert_eq!(budget.used(), 1);
    }

    #[test]
    fn cancel_interrupts_until_restart() {
        let budget = Budget::default();
        budget.cancel();
        assert_eq!(budget.consume(), Err(Error::Interrupted));
        budget.start(None);
        assert_eq!(budget.consume(), Ok(()));
    }
}
