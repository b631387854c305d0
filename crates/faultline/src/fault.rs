//! Raisable failures.
//!
//! [`Fault`] is what computations return in `Err`: either a signal-bearing
//! [`Carrier`] or a [`NativeFailure`] from code that knows nothing about
//! signals. Conversions from common std, serde and anyhow errors map each
//! error onto a [`FailureKind`] and keep the original as the failure's
//! origin, so `source()` chains still reach it.

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::num::{ParseFloatError, ParseIntError, TryFromIntError};
use std::str::{ParseBoolError, Utf8Error};
use std::string::FromUtf8Error;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::carrier::Carrier;
use crate::infer;
use crate::kind::{FailureKind, FailureType};
use crate::signal::{SignalExt, SignalId, SignalRef};
use crate::taxonomy::Generic;

type Origin = Arc<dyn StdError + Send + Sync + 'static>;

// ── Fault ───────────────────────────────────────────────────────────────

/// A raised failure.
#[derive(Debug, Clone, Error)]
pub enum Fault {
    #[error(transparent)]
    Carrier(Box<Carrier>),

    #[error(transparent)]
    Native(NativeFailure),
}

impl Fault {
    /// Shorthand for a native failure of `kind`.
    pub fn native(kind: FailureKind, message: impl Into<String>) -> Self {
        Fault::Native(NativeFailure::new(kind, message))
    }

    pub fn as_carrier(&self) -> Option<&Carrier> {
        match self {
            Fault::Carrier(c) => Some(c),
            Fault::Native(_) => None,
        }
    }

    pub fn as_native(&self) -> Option<&NativeFailure> {
        match self {
            Fault::Carrier(_) => None,
            Fault::Native(n) => Some(n),
        }
    }

    pub fn is_carrier(&self) -> bool {
        matches!(self, Fault::Carrier(_))
    }

    /// Concrete type identity for type-based rules.
    pub fn failure_type(&self) -> FailureType {
        match self {
            Fault::Carrier(c) => c.failure_type(),
            Fault::Native(n) => FailureType::Native(n.kind()),
        }
    }

    /// Native kind this failure is, or extends.
    pub fn native_kind(&self) -> FailureKind {
        match self {
            Fault::Carrier(c) => c.native_kind(),
            Fault::Native(n) => n.kind(),
        }
    }

    /// Strict ancestor types, nearest first.
    pub fn ancestry(&self) -> Vec<FailureType> {
        let native = self.native_kind();
        let mut out = Vec::new();
        if self.is_carrier() {
            out.push(FailureType::Native(native));
        }
        out.extend(native.ancestors().map(FailureType::Native));
        out
    }

    /// The carrier's own signal, or the default inferred for a native kind.
    pub fn signal(&self) -> SignalRef {
        infer::infer_signal(self)
    }

    /// Is this a carrier whose own signal is `signal`?
    pub fn is(&self, signal: impl Into<SignalId>) -> bool {
        self.as_carrier().is_some_and(|c| c.is(signal))
    }

    /// Does `signal` appear anywhere along this failure's carrier chain?
    pub fn has(&self, signal: impl Into<SignalId>) -> bool {
        self.as_carrier().is_some_and(|c| c.has(signal))
    }

    /// Last link of the `source()` chain, or this failure itself.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }

    /// Wrap as an uncaught-failure carrier unless already so tagged.
    pub fn escalate(self) -> Fault {
        if self.is(Generic::UncaughtException) {
            return self;
        }
        debug!(failure = %self.failure_type(), "Escalating unclassified failure");
        Generic::UncaughtException.fault(None, Some(self))
    }
}

impl From<Carrier> for Fault {
    fn from(carrier: Carrier) -> Self {
        Fault::Carrier(Box::new(carrier))
    }
}

impl From<NativeFailure> for Fault {
    fn from(native: NativeFailure) -> Self {
        Fault::Native(native)
    }
}

// ── Native failures ─────────────────────────────────────────────────────

/// A failure with no signal attached.
#[derive(Debug, Clone)]
pub struct NativeFailure {
    kind: FailureKind,
    message: String,
    source: Option<Arc<Fault>>,
    origin: Option<Origin>,
}

impl NativeFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            origin: None,
        }
    }

    /// Wrap a foreign error, keeping it as the origin.
    pub fn from_error<E>(kind: FailureKind, error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            kind,
            message: error.to_string(),
            source: None,
            origin: Some(Arc::new(error)),
        }
    }

    /// Same failure, caused by `source`.
    pub fn with_source(mut self, source: Fault) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_fault(&self) -> Option<&Fault> {
        self.source.as_deref()
    }

    /// The foreign error this failure was converted from.
    pub fn origin(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.origin.as_deref()
    }

    fn with_origin(kind: FailureKind, origin: Origin) -> Self {
        Self {
            kind,
            message: origin.to_string(),
            source: None,
            origin: Some(origin),
        }
    }
}

impl fmt::Display for NativeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl StdError for NativeFailure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        if let Some(fault) = self.source.as_deref() {
            return Some(fault);
        }
        self.origin
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

// ── Conversions ─────────────────────────────────────────────────────────

/// Native kind for an I/O error kind.
pub fn io_failure_kind(kind: io::ErrorKind) -> FailureKind {
    use io::ErrorKind as K;
    match kind {
        K::NotFound => FailureKind::FileNotFound,
        K::ConnectionRefused
        | K::ConnectionReset
        | K::ConnectionAborted
        | K::NotConnected
        | K::AddrInUse
        | K::AddrNotAvailable
        | K::BrokenPipe => FailureKind::Socket,
        K::TimedOut | K::Interrupted | K::WouldBlock => FailureKind::Interrupted,
        K::PermissionDenied => FailureKind::Security,
        K::InvalidInput => FailureKind::IllegalArgument,
        K::Unsupported => FailureKind::Unsupported,
        _ => FailureKind::Io,
    }
}

fn json_failure_kind(error: &serde_json::Error) -> FailureKind {
    use serde_json::error::Category;
    match error.classify() {
        Category::Io => FailureKind::Io,
        Category::Syntax | Category::Eof => FailureKind::Parse,
        Category::Data => FailureKind::IllegalArgument,
    }
}

/// Best native kind for an arbitrary error, by downcasting known types.
fn sniff_kind(error: &(dyn StdError + 'static)) -> Option<FailureKind> {
    if let Some(e) = error.downcast_ref::<io::Error>() {
        return Some(io_failure_kind(e.kind()));
    }
    if error.is::<ParseIntError>() || error.is::<ParseFloatError>() {
        return Some(FailureKind::NumberFormat);
    }
    if error.is::<ParseBoolError>() || error.is::<Utf8Error>() || error.is::<FromUtf8Error>() {
        return Some(FailureKind::Parse);
    }
    if error.is::<TryFromIntError>() {
        return Some(FailureKind::Arithmetic);
    }
    if let Some(e) = error.downcast_ref::<serde_json::Error>() {
        return Some(json_failure_kind(e));
    }
    None
}

impl From<io::Error> for Fault {
    fn from(error: io::Error) -> Self {
        let kind = io_failure_kind(error.kind());
        NativeFailure::from_error(kind, error).into()
    }
}

impl From<ParseIntError> for Fault {
    fn from(error: ParseIntError) -> Self {
        NativeFailure::from_error(FailureKind::NumberFormat, error).into()
    }
}

impl From<ParseFloatError> for Fault {
    fn from(error: ParseFloatError) -> Self {
        NativeFailure::from_error(FailureKind::NumberFormat, error).into()
    }
}

impl From<ParseBoolError> for Fault {
    fn from(error: ParseBoolError) -> Self {
        NativeFailure::from_error(FailureKind::Parse, error).into()
    }
}

impl From<Utf8Error> for Fault {
    fn from(error: Utf8Error) -> Self {
        NativeFailure::from_error(FailureKind::Parse, error).into()
    }
}

impl From<FromUtf8Error> for Fault {
    fn from(error: FromUtf8Error) -> Self {
        NativeFailure::from_error(FailureKind::Parse, error).into()
    }
}

impl From<TryFromIntError> for Fault {
    fn from(error: TryFromIntError) -> Self {
        NativeFailure::from_error(FailureKind::Arithmetic, error).into()
    }
}

impl From<serde_json::Error> for Fault {
    fn from(error: serde_json::Error) -> Self {
        let kind = json_failure_kind(&error);
        NativeFailure::from_error(kind, error).into()
    }
}

impl From<Box<dyn StdError + Send + Sync + 'static>> for Fault {
    fn from(error: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        match error.downcast::<Fault>() {
            Ok(fault) => *fault,
            Err(error) => {
                let kind = sniff_kind(error.as_ref()).unwrap_or(FailureKind::Exception);
                NativeFailure::with_origin(kind, Arc::from(error)).into()
            }
        }
    }
}

impl From<anyhow::Error> for Fault {
    fn from(error: anyhow::Error) -> Self {
        if let Some(fault) = error.downcast_ref::<Fault>() {
            return fault.clone();
        }
        let kind = error
            .chain()
            .find_map(sniff_kind)
            .unwrap_or(FailureKind::Exception);
        let origin: Box<dyn StdError + Send + Sync + 'static> = error.into();
        NativeFailure::with_origin(kind, Arc::from(origin)).into()
    }
}
