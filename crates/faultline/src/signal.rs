//! Signals: enumerable error conditions.
//!
//! A taxonomy is a closed enum whose cases implement [`Signal`]. Each case
//! carries static metadata: the taxonomy name, the case name, a message
//! template with `{token}` placeholders, and the [`CarrierKind`] its carriers
//! are built as. The pair `(taxonomy, name)` is the case's [`SignalId`]; its
//! string form is the signal's `code()`.
//!
//! ```
//! use faultline::{CarrierKind, Signal};
//!
//! #[derive(Clone, Copy, Debug)]
//! enum Ledger {
//!     Overdrawn,
//! }
//!
//! impl Signal for Ledger {
//!     fn taxonomy(&self) -> &'static str {
//!         "bank.Ledger"
//!     }
//!     fn name(&self) -> &'static str {
//!         "Overdrawn"
//!     }
//!     fn template(&self) -> Option<&str> {
//!         Some("account {account} is short by {amount}")
//!     }
//!     fn carrier_kind(&self) -> CarrierKind {
//!         CarrierKind::Runtime
//!     }
//! }
//!
//! assert_eq!(Ledger::Overdrawn.code(), "bank.Ledger.Overdrawn");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use crate::carrier::{self, Carrier};
use crate::context::{has_token, Context};
use crate::fault::Fault;
use crate::kind::CarrierKind;
use crate::ledger::ContextLedger;

// ── Identity ────────────────────────────────────────────────────────────

/// Identity of a signal case: taxonomy name plus case name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SignalId {
    pub taxonomy: &'static str,
    pub name: &'static str,
}

impl SignalId {
    pub const fn new(taxonomy: &'static str, name: &'static str) -> Self {
        Self { taxonomy, name }
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.taxonomy, self.name)
    }
}

impl<S: Signal> From<S> for SignalId {
    fn from(signal: S) -> Self {
        signal.id()
    }
}

impl From<&SignalRef> for SignalId {
    fn from(signal: &SignalRef) -> Self {
        signal.id()
    }
}

// ── Signal ──────────────────────────────────────────────────────────────

/// One case of a closed error taxonomy.
pub trait Signal: fmt::Debug + Send + Sync + 'static {
    /// Taxonomy name; shared by every case of the enum.
    fn taxonomy(&self) -> &'static str;

    /// Case name, unique within the taxonomy.
    fn name(&self) -> &'static str;

    /// Message template, possibly with `{token}`s filled from context.
    fn template(&self) -> Option<&str> {
        None
    }

    /// Untemplated fallback used when context cannot render.
    ///
    /// Defaults to the template when it has no tokens.
    fn description(&self) -> Option<String> {
        self.template()
            .filter(|t| !has_token(t))
            .map(str::to_string)
    }

    /// Carrier type this case materializes into.
    fn carrier_kind(&self) -> CarrierKind {
        CarrierKind::Generic
    }

    /// Context used for rendering when none is supplied.
    fn default_context(&self) -> Option<Context> {
        None
    }

    fn id(&self) -> SignalId {
        SignalId::new(self.taxonomy(), self.name())
    }

    /// Stable identifier: `<taxonomy>.<name>`.
    fn code(&self) -> String {
        self.id().to_string()
    }

    /// `code()`, suffixed with `": <text>"` when a message can be rendered.
    ///
    /// The text comes from the context (or the default context) when its
    /// template fully resolves, else from [`Signal::description`]; if neither
    /// yields anything the bare code is returned. Rendering never fails.
    fn message(&self, context: Option<&Context>) -> String {
        self.message_in(context, ContextLedger::global())
    }

    /// [`Signal::message`], resolving `{cause}` through `ledger`.
    fn message_in(&self, context: Option<&Context>, ledger: &ContextLedger) -> String {
        let code = self.code();
        let fallback;
        let context = match context {
            Some(ctx) => Some(ctx),
            None => {
                fallback = self.default_context();
                fallback.as_ref()
            }
        };
        let rendered = context
            .and_then(|ctx| ctx.render_using(self.template(), ledger))
            .or_else(|| self.description());
        match rendered {
            Some(text) if !text.is_empty() => format!("{}: {}", code, text),
            _ => code,
        }
    }
}

/// Conveniences for concrete signal types.
pub trait SignalExt: Signal + Clone + Sized {
    /// Type-erased handle to this case.
    fn erase(&self) -> SignalRef {
        SignalRef::new(self.clone())
    }

    /// Build this case's carrier.
    fn carrier(&self, context: Option<Context>, cause: Option<Fault>) -> Carrier {
        self.erase().carrier(context, cause)
    }

    /// Build this case's carrier, wrapped as a raisable [`Fault`].
    fn fault(&self, context: Option<Context>, cause: Option<Fault>) -> Fault {
        self.carrier(context, cause).into()
    }
}

impl<S: Signal + Clone> SignalExt for S {}

// ── Erased handle ───────────────────────────────────────────────────────

/// Shared, type-erased signal. Equality and hashing follow [`SignalId`].
#[derive(Clone)]
pub struct SignalRef(Arc<dyn Signal>);

impl SignalRef {
    pub fn new<S: Signal>(signal: S) -> Self {
        Self(Arc::new(signal))
    }

    /// Is this the same case as `other`?
    pub fn is(&self, other: impl Into<SignalId>) -> bool {
        self.id() == other.into()
    }

    /// Materialize this signal's carrier, falling back to a generic carrier
    /// if the declared carrier type cannot be built.
    pub fn carrier(&self, context: Option<Context>, cause: Option<Fault>) -> Carrier {
        carrier::materialize(self.clone(), context, cause.map(Arc::new))
    }

    pub fn fault(&self, context: Option<Context>, cause: Option<Fault>) -> Fault {
        self.carrier(context, cause).into()
    }
}

impl Deref for SignalRef {
    type Target = dyn Signal;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl<S: Signal> From<S> for SignalRef {
    fn from(signal: S) -> Self {
        Self::new(signal)
    }
}

impl PartialEq for SignalRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for SignalRef {}

impl Hash for SignalRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for SignalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignalRef({})", self.id())
    }
}

impl fmt::Display for SignalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}
