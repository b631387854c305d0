//! Error carriers: a signal, its context and its cause.
//!
//! A [`Carrier`] is the pure-data half of a signalled failure; wrapped in
//! [`Fault::Carrier`] it becomes an ordinary Rust error. Carriers are built
//! through [`materialize`], which dispatches on the signal's
//! [`CarrierKind`]: built-in kinds always assemble, custom kinds go through
//! the [`CarrierRegistry`]. Any failure to build the declared kind falls back
//! to a generic carrier that still reports the original signal, context and
//! cause. Building a carrier never fails.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::context::{Context, CAUSE_TOKEN};
use crate::error::{FaultlineError, FaultlineResult};
use crate::fault::Fault;
use crate::kind::{CarrierKind, FailureKind, FailureType};
use crate::ledger::ContextLedger;
use crate::signal::{SignalId, SignalRef};

lazy_static! {
    static ref GLOBAL_REGISTRY: CarrierRegistry = CarrierRegistry::new();
}

// ── Carrier ─────────────────────────────────────────────────────────────

/// A signalled failure value.
#[derive(Clone, Debug)]
pub struct Carrier {
    kind: CarrierKind,
    native: FailureKind,
    signal: SignalRef,
    context: Option<Context>,
    cause: Option<Arc<Fault>>,
    message: String,
}

impl Carrier {
    /// Build a carrier for `signal`.
    pub fn new(signal: impl Into<SignalRef>, context: Option<Context>, cause: Option<Fault>) -> Self {
        materialize(signal.into(), context, cause.map(Arc::new))
    }

    /// Build a carrier, inferring the signal when none is given.
    ///
    /// Without a signal the cause's own signal is used (or its inferred
    /// default); without either, `Generic::UnknownError`.
    pub fn build(signal: Option<SignalRef>, context: Option<Context>, cause: Option<Fault>) -> Self {
        let signal = signal.unwrap_or_else(|| match &cause {
            Some(cause) => cause.signal(),
            None => crate::taxonomy::Generic::UnknownError.into(),
        });
        materialize(signal, context, cause.map(Arc::new))
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

    /// Shared handle to the cause.
    pub fn cause_arc(&self) -> Option<&Arc<Fault>> {
        self.cause.as_ref()
    }

    /// Message rendered when the carrier was built.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> CarrierKind {
        self.kind
    }

    pub fn native_kind(&self) -> FailureKind {
        self.native
    }

    pub fn failure_type(&self) -> FailureType {
        FailureType::Carrier(self.kind)
    }

    /// Was this carrier raised for exactly `signal`?
    pub fn is(&self, signal: impl Into<SignalId>) -> bool {
        self.signal.id() == signal.into()
    }

    /// Does `signal` appear on this carrier or any carrier it was caused by?
    ///
    /// The walk ends at the first non-carrier cause.
    pub fn has(&self, signal: impl Into<SignalId>) -> bool {
        let id = signal.into();
        self.chain().any(|c| c.signal.id() == id)
    }

    /// This carrier followed by each carrier in its cause chain.
    pub fn chain(&self) -> impl Iterator<Item = &Carrier> {
        std::iter::successors(Some(self), |c| c.cause.as_deref().and_then(Fault::as_carrier))
    }

    /// Last link of the `source()` chain, or this carrier itself.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Carrier {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_deref().map(|f| f as &(dyn StdError + 'static))
    }
}

// ── Construction ────────────────────────────────────────────────────────

/// The three construction arguments every carrier accepts.
#[derive(Clone, Debug)]
pub struct CarrierParts {
    pub signal: SignalRef,
    pub context: Option<Context>,
    pub cause: Option<Arc<Fault>>,
}

impl CarrierParts {
    /// Assemble a carrier of `kind`, freezing its message.
    ///
    /// When the template refers to `{cause}` and the caller supplied a
    /// context, that context and the cause are staged in the global ledger
    /// first. A signal's default context is never staged.
    pub fn assemble(self, kind: CarrierKind, native: FailureKind) -> Carrier {
        let rendering = self
            .context
            .clone()
            .or_else(|| self.signal.default_context());
        let message = match (&rendering, &self.cause) {
            (Some(ctx), Some(cause)) if self.uses_cause(ctx) => {
                if let Some(supplied) = &self.context {
                    ContextLedger::global().stage(supplied, cause);
                }
                self.signal
                    .message_in(Some(ctx), &ContextLedger::single(ctx, cause))
            }
            _ => self.signal.message(rendering.as_ref()),
        };
        Carrier {
            kind,
            native,
            signal: self.signal,
            context: self.context,
            cause: self.cause,
            message,
        }
    }

    fn uses_cause(&self, ctx: &Context) -> bool {
        ctx.template()
            .or(self.signal.template())
            .is_some_and(|t| t.contains(CAUSE_TOKEN))
    }

    /// Assemble the generic fallback carrier.
    pub fn fallback(self) -> Carrier {
        self.assemble(CarrierKind::Generic, CarrierKind::Generic.native_kind())
    }
}

/// Build the carrier declared by `signal`.
pub fn materialize(signal: SignalRef, context: Option<Context>, cause: Option<Arc<Fault>>) -> Carrier {
    let parts = CarrierParts {
        signal,
        context,
        cause,
    };
    match parts.signal.carrier_kind() {
        CarrierKind::Custom(name) => CarrierRegistry::global().build(name, parts),
        builtin => parts.assemble(builtin, builtin.native_kind()),
    }
}

// ── Custom carriers ─────────────────────────────────────────────────────

/// Builds carriers for a custom [`CarrierKind`].
pub trait CarrierFactory: Send + Sync {
    /// Native kind carriers of this type extend.
    fn native_kind(&self) -> FailureKind {
        FailureKind::Exception
    }

    /// Build a carrier from the construction arguments.
    ///
    /// The result must report the requested signal and this factory's kind;
    /// anything else is treated as a contract violation.
    fn build(&self, kind: CarrierKind, parts: CarrierParts) -> FaultlineResult<Carrier>;
}

/// Process-wide table of custom carrier factories.
pub struct CarrierRegistry {
    factories: RwLock<HashMap<&'static str, Arc<dyn CarrierFactory>>>,
}

impl CarrierRegistry {
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }

    pub fn global() -> &'static CarrierRegistry {
        &GLOBAL_REGISTRY
    }

    /// Register (or replace) the factory for `name`.
    pub fn register(&self, name: &'static str, factory: impl CarrierFactory + 'static) {
        debug!(carrier = name, "Registered carrier factory");
        self.factories.write().insert(name, Arc::new(factory));
    }

    pub fn unregister(&self, name: &str) -> bool {
        self.factories.write().remove(name).is_some()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.read().contains_key(name)
    }

    pub fn native_kind(&self, name: &str) -> Option<FailureKind> {
        self.factories.read().get(name).map(|f| f.native_kind())
    }

    /// Build a `Custom(name)` carrier, falling back to a generic one.
    pub fn build(&self, name: &'static str, parts: CarrierParts) -> Carrier {
        match self.try_build(name, parts.clone()) {
            Ok(carrier) => carrier,
            Err(err) => {
                warn!(
                    carrier = name,
                    signal = %parts.signal,
                    error = %err,
                    "Carrier construction failed, using generic carrier"
                );
                parts.fallback()
            }
        }
    }

    fn try_build(&self, name: &'static str, parts: CarrierParts) -> FaultlineResult<Carrier> {
        let factory = self.factories.read().get(name).cloned();
        let factory = factory.ok_or_else(|| FaultlineError::UnregisteredCarrier(name.to_string()))?;

        let kind = CarrierKind::Custom(name);
        let requested = parts.signal.id();
        let carrier = factory.build(kind, parts)?;
        if carrier.signal.id() != requested {
            return Err(FaultlineError::CarrierContract {
                carrier: name.to_string(),
                reason: format!("built {} instead of {}", carrier.signal.id(), requested),
            });
        }
        if carrier.kind != kind {
            return Err(FaultlineError::CarrierContract {
                carrier: name.to_string(),
                reason: format!("built a {} carrier", carrier.kind),
            });
        }
        Ok(carrier)
    }
}

impl Default for CarrierRegistry {
    fn default() -> Self {
        Self::new()
    }
}
