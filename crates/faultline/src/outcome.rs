//! Success/failure values.
//!
//! An [`Outcome`] is a computation's result with failures kept as data: a
//! [`Failure`] always names a signal and may carry a context and the cause it
//! was classified from. `assume()` turns a failure back into a raised
//! [`Fault`], escalated as uncaught.

use std::fmt;
use std::sync::Arc;

use crate::carrier;
use crate::context::Context;
use crate::fault::Fault;
use crate::ledger::ContextLedger;
use crate::signal::{SignalExt, SignalId, SignalRef};
use crate::taxonomy::Generic;

// ── Failure ─────────────────────────────────────────────────────────────

/// A failure held as a value.
#[derive(Clone, Debug)]
pub struct Failure {
    signal: SignalRef,
    context: Option<Context>,
    cause: Option<Arc<Fault>>,
}

impl Failure {
    /// Build a failure, inferring a missing signal.
    ///
    /// Without a signal, the cause's signal is used; without a cause either,
    /// `Generic::UnknownError`.
    pub fn new(signal: Option<SignalRef>, context: Option<Context>, cause: Option<Fault>) -> Self {
        let signal = signal.unwrap_or_else(|| match &cause {
            Some(cause) => cause.signal(),
            None => Generic::UnknownError.into(),
        });
        Self {
            signal,
            context,
            cause: cause.map(Arc::new),
        }
    }

    /// A failure for `signal`.
    pub fn of(signal: impl Into<SignalRef>, context: Option<Context>, cause: Option<Fault>) -> Self {
        Self::new(Some(signal.into()), context, cause)
    }

    /// A failure carrying `fault` as its cause, signal inferred from it.
    pub fn from_fault(fault: Fault) -> Self {
        Self::new(None, None, Some(fault))
    }

    pub fn signal(&self) -> &SignalRef {
        &self.signal
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    pub fn cause(&self) -> Option<&Fault> {
        self.cause.as_deref()
    }

    /// Is `signal` this failure's signal?
    pub fn is(&self, signal: impl Into<SignalId>) -> bool {
        self.signal.is(signal)
    }

    /// Rendered message.
    ///
    /// With a context, the `(context, cause)` pair is staged in the ledger
    /// first so `{cause}` can resolve.
    pub fn message(&self) -> String {
        match &self.context {
            Some(ctx) => match &self.cause {
                Some(cause) => {
                    ContextLedger::global().stage(ctx, cause);
                    let staged = ContextLedger::single(ctx, cause);
                    ctx.render_using(None, &staged)
                        .unwrap_or_else(|| self.signal.message_in(Some(ctx), &staged))
                }
                None => ctx
                    .message()
                    .unwrap_or_else(|| self.signal.message(Some(ctx))),
            },
            None => self.signal.message(None),
        }
    }

    /// This failure's own carrier, caused by its cause.
    pub fn into_fault(self) -> Fault {
        carrier::materialize(self.signal, self.context, self.cause).into()
    }

    /// Raise this failure as uncaught.
    ///
    /// A cause already tagged uncaught is raised as is; any other cause is
    /// wrapped. Without a cause the same rule applies to this failure's own
    /// carrier.
    pub fn escalate(self) -> Fault {
        match self.cause {
            Some(cause) => Arc::unwrap_or_clone(cause).escalate(),
            None => self.into_fault().escalate(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl From<Fault> for Failure {
    fn from(fault: Fault) -> Self {
        Self::from_fault(fault)
    }
}

// ── Outcome ─────────────────────────────────────────────────────────────

/// Either a value or a [`Failure`].
#[derive(Clone, Debug)]
pub enum Outcome<V> {
    Success(V),
    Failure(Failure),
}

impl<V> Outcome<V> {
    /// Failure for `signal`.
    pub fn failure(signal: impl Into<SignalRef>, context: Option<Context>, cause: Option<Fault>) -> Self {
        Outcome::Failure(Failure::of(signal, context, cause))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            Outcome::Success(v) => Some(v),
            Outcome::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(f) => Some(f),
        }
    }

    pub fn signal(&self) -> Option<&SignalRef> {
        self.as_failure().map(Failure::signal)
    }

    pub fn context(&self) -> Option<&Context> {
        self.as_failure().and_then(Failure::context)
    }

    pub fn cause(&self) -> Option<&Fault> {
        self.as_failure().and_then(Failure::cause)
    }

    /// Failure message; `None` for a success.
    pub fn message(&self) -> Option<String> {
        self.as_failure().map(Failure::message)
    }

    /// Unwrap a success, or raise the failure as uncaught.
    pub fn assume(self) -> Result<V, Fault> {
        match self {
            Outcome::Success(v) => Ok(v),
            Outcome::Failure(f) => Err(f.escalate()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(v) => Outcome::Success(f(v)),
            Outcome::Failure(failure) => Outcome::Failure(failure),
        }
    }

    /// Convert to a `Result` holding the failure as data.
    pub fn into_result(self) -> Result<V, Failure> {
        match self {
            Outcome::Success(v) => Ok(v),
            Outcome::Failure(f) => Err(f),
        }
    }
}

impl<V, E: Into<Fault>> From<Result<V, E>> for Outcome<V> {
    fn from(result: Result<V, E>) -> Self {
        match result {
            Ok(v) => Outcome::Success(v),
            Err(e) => Outcome::Failure(Failure::from_fault(e.into())),
        }
    }
}
