//! tactlog: reasoning about temporal action domains.
//!
//! A domain description names fluents, the effects actions cause under
//! conditions, when actions are impossible, and how long they take. A
//! scenario places observations and action occurrences on a timeline; the
//! engine decides whether that narrative is consistent with the domain and
//! answers point-in-time queries. Fluent values and answers are
//! three-valued: `Unknown` marks what the causal laws leave undetermined.

pub mod config;
pub mod domain;
pub mod error;
pub mod formula;
pub mod oracle;
pub mod parser;
pub mod scenario;
pub mod syntax;

pub use config::EngineConfig;
pub use domain::{DomainDescription, TimeDomainDescription};
pub use error::{Error, Result};
pub use formula::Formula;
pub use scenario::{Evaluation, Failure, Scenario};
pub use syntax::{Expr, Fluent, Ternary};
