//! Combinators that run a computation and classify what it raises.
//!
//! | combinator | success        | classified failure | unclassified failure |
//! |------------|----------------|--------------------|----------------------|
//! | [`collect`]| `Ok(Success)`  | `Ok(Failure)`      | `Err(escalated)`     |
//! | [`ignore`] | `Ok(Some(v))`  | `Ok(None)` + hook  | `Err(escalated)`     |
//! | [`result`] | `Success`      | `Failure`          | `Failure`            |
//!
//! [`assume`] runs a computation that already yields an [`Outcome`] and
//! unwraps it, escalating a failure. Escalated faults are wrapped as
//! `Generic::UncaughtException` unless they already carry it. Nothing is
//! retried; panics are not caught.

use tracing::debug;

use crate::classify::ClassificationTable;
use crate::fault::Fault;
use crate::hook;
use crate::outcome::{Failure, Outcome};

/// Run `f`, turning classified failures into [`Outcome::Failure`].
pub fn collect<T, E>(
    f: impl FnOnce() -> Result<T, E>,
    table: &ClassificationTable,
) -> Result<Outcome<T>, Fault>
where
    E: Into<Fault>,
{
    match f() {
        Ok(value) => Ok(Outcome::Success(value)),
        Err(err) => {
            let fault = err.into();
            match table.classify(&fault) {
                Some(classification) => Ok(Outcome::Failure(classification.into_failure(fault))),
                None => Err(fault.escalate()),
            }
        }
    }
}

/// Run `f`, discarding classified failures.
///
/// A discarded failure is handed to the on-ignored hook.
pub fn ignore<T, E>(f: impl FnOnce() -> Result<T, E>, table: &ClassificationTable) -> Result<Option<T>, Fault>
where
    E: Into<Fault>,
{
    match f() {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            let fault = err.into();
            match table.classify(&fault) {
                Some(classification) => {
                    debug!(
                        failure = %fault.failure_type(),
                        signal = %classification.signal,
                        "Ignoring classified failure"
                    );
                    hook::notify_ignored(&fault);
                    Ok(None)
                }
                None => Err(fault.escalate()),
            }
        }
    }
}

/// Run `f` and unwrap its outcome; a failure escalates.
pub fn assume<T>(f: impl FnOnce() -> Outcome<T>) -> Result<T, Fault> {
    f().assume()
}

/// Run `f`, capturing any failure as data with an inferred signal.
pub fn result<T, E>(f: impl FnOnce() -> Result<T, E>) -> Outcome<T>
where
    E: Into<Fault>,
{
    match f() {
        Ok(value) => Outcome::Success(value),
        Err(err) => Outcome::Failure(Failure::from_fault(err.into())),
    }
}

impl ClassificationTable {
    /// [`collect`] against this table.
    pub fn collect<T, E: Into<Fault>>(&self, f: impl FnOnce() -> Result<T, E>) -> Result<Outcome<T>, Fault> {
        collect(f, self)
    }

    /// [`ignore`] against this table.
    pub fn ignore<T, E: Into<Fault>>(&self, f: impl FnOnce() -> Result<T, E>) -> Result<Option<T>, Fault> {
        ignore(f, self)
    }
}
