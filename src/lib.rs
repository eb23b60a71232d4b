//! vehidiag - interactive vehicle fault diagnosis
//!
//! Forward-chaining rules pick the next question; a Bayesian network scores
//! the fault categories once the rules reach a recommendation.

pub mod cli;
pub mod domain;
pub mod errors;
pub mod evidence;
pub mod http_server;
pub mod network;
pub mod observability;
pub mod rules;
pub mod session;
