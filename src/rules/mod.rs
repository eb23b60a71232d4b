//! Rule Base subsystem
//!
//! An ordered list of production rules over the evidence store. Each rule
//! either asks a yes/no question or finalizes the session with a
//! recommendation.
//!
//! # Invariants
//!
//! - Selection is deterministic: the first matching rule in declaration order
//! - Every ask rule requires its own key to be unanswered, so no question is
//!   asked twice
//! - From the empty state, every reachable evidence state selects a rule and
//!   every path ends in a finalize action
//!
//! The last two are checked when the rule base is built; a rule base that
//! fails them is a configuration error.

mod base;
mod errors;
mod selector;
mod types;

pub use base::{RuleBase, RuleBaseReport, MAX_EXPLORED_STATES};
pub use errors::{RuleError, RuleErrorCode, RuleResult};
pub use selector::{describe, Firing, ForwardChainingSelector};
pub use types::{Action, Expectation, Precondition, Rule};
