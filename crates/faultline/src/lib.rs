//! # faultline
//!
//! Typed failure signalling: closed taxonomies of error conditions, structured
//! context with templated messages, and combinators that classify whatever a
//! computation raises.
//!
//! ## Architecture
//!
//! ```text
//!   computation ──Err(E: Into<Fault>)──┐
//!                                      ▼
//!                        ┌───────────────────────────┐
//!                        │  ClassificationTable      │  ← ordered rules, exact
//!                        │  (collect / ignore)       │    then ancestor match
//!                        └─────┬──────────────┬──────┘
//!                     matched  │              │ unmatched
//!                              ▼              ▼
//!                   Outcome::Failure     Err(Fault) wrapped as
//!                   (signal + cause)     Generic::UncaughtException
//!                              │
//!                              ▼
//!                   Failure::message()  ← Context renders {tokens};
//!                                         {cause} via ContextLedger
//! ```
//!
//! ## Key Principles
//!
//! - **Signals are data**: every condition is a case of a closed enum with a
//!   stable `code()`; carriers hold a signal, a context and a cause.
//! - **Rendering never fails**: an unresolved `{token}` degrades the message
//!   to the signal's description or bare code.
//! - **Construction never fails**: a carrier that cannot be built as declared
//!   falls back to a generic carrier with the same signal, context and cause.
//! - **Bounded state**: the context ledger keeps only the most recent pairs.

#![deny(unsafe_code)]

pub mod attempt;
pub mod carrier;
pub mod classify;
pub mod config;
pub mod context;
pub mod error;
pub mod fault;
pub mod hook;
pub mod infer;
pub mod kind;
pub mod ledger;
pub mod outcome;
pub mod signal;
pub mod taxonomy;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use carrier::{Carrier, CarrierFactory, CarrierParts, CarrierRegistry};
pub use classify::{Classification, ClassificationTable, MatchKind, MatchPolicy, Rule, RuleMatcher};
pub use config::FaultlineConfig;
pub use context::{Context, ContextBuilder, ContextId, ContextRecord};
pub use error::{FaultlineError, FaultlineResult};
pub use fault::{Fault, NativeFailure};
pub use hook::{clear_on_ignored, set_on_ignored};
pub use kind::{CarrierKind, FailureKind, FailureType};
pub use ledger::{ContextLedger, LedgerEntry, DEFAULT_LEDGER_CAPACITY};
pub use outcome::{Failure, Outcome};
pub use signal::{Signal, SignalExt, SignalId, SignalRef};
pub use taxonomy::{
    FileNotFound, Generic, IllegalArgument, Io, Parse, Runtime, Security, Socket, UnknownHost,
};
