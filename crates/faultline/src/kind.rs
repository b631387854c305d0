//! Failure categories and type identities.
//!
//! [`FailureKind`] is the closed set of lower-level failure categories a
//! computation can raise without a signal attached. Kinds form a fixed
//! single-parent tree rooted at [`FailureKind::Throwable`]:
//!
//! ```text
//! Throwable
//! ├── Fatal
//! └── Exception
//!     ├── Runtime
//!     │   ├── IllegalArgument
//!     │   │   └── NumberFormat
//!     │   ├── IllegalState, IndexOutOfBounds, NullReference,
//!     │   ├── Arithmetic, ClassCast, Unsupported, Security
//!     ├── Io
//!     │   └── FileNotFound, Socket, UnknownHost, Interrupted
//!     └── Parse
//! ```
//!
//! [`FailureType`] is the identity type rules match against: either a native
//! kind or a carrier kind. Carrier kinds extend one native kind each, which is
//! how a rule naming `Native(Runtime)` catches a Runtime carrier by ancestry.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Native Kinds ────────────────────────────────────────────────────────

/// Closed set of native failure categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    Throwable,
    Fatal,
    Exception,
    Runtime,
    IllegalArgument,
    NumberFormat,
    IllegalState,
    IndexOutOfBounds,
    NullReference,
    Arithmetic,
    ClassCast,
    Unsupported,
    Security,
    Io,
    FileNotFound,
    Socket,
    UnknownHost,
    Interrupted,
    Parse,
}

impl FailureKind {
    /// Direct parent in the kind tree; `None` only for the root.
    pub const fn parent(self) -> Option<FailureKind> {
        use FailureKind::*;
        match self {
            Throwable => None,
            Fatal | Exception => Some(Throwable),
            Runtime | Io | Parse => Some(Exception),
            IllegalArgument | IllegalState | IndexOutOfBounds | NullReference | Arithmetic
            | ClassCast | Unsupported | Security => Some(Runtime),
            NumberFormat => Some(IllegalArgument),
            FileNotFound | Socket | UnknownHost | Interrupted => Some(Io),
        }
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(self) -> impl Iterator<Item = FailureKind> {
        std::iter::successors(self.parent(), |k| k.parent())
    }

    /// Is this kind `other`, or a descendant of it?
    pub fn is_a(self, other: FailureKind) -> bool {
        self == other || self.ancestors().any(|k| k == other)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ── Carrier Kinds ───────────────────────────────────────────────────────

/// The carrier type a signal materializes into.
///
/// Built-in kinds always construct. `Custom` kinds are resolved through the
/// [`CarrierRegistry`](crate::carrier::CarrierRegistry).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CarrierKind {
    Generic,
    Runtime,
    IllegalArgument,
    Io,
    FileNotFound,
    Socket,
    UnknownHost,
    Parse,
    Security,
    Custom(&'static str),
}

impl CarrierKind {
    /// The native kind a built-in carrier extends.
    ///
    /// Custom kinds report the kind declared by their factory; without one
    /// they extend `Exception`.
    pub fn native_kind(self) -> FailureKind {
        match self {
            CarrierKind::Generic => FailureKind::Exception,
            CarrierKind::Runtime => FailureKind::Runtime,
            CarrierKind::IllegalArgument => FailureKind::IllegalArgument,
            CarrierKind::Io => FailureKind::Io,
            CarrierKind::FileNotFound => FailureKind::FileNotFound,
            CarrierKind::Socket => FailureKind::Socket,
            CarrierKind::UnknownHost => FailureKind::UnknownHost,
            CarrierKind::Parse => FailureKind::Parse,
            CarrierKind::Security => FailureKind::Security,
            CarrierKind::Custom(name) => crate::carrier::CarrierRegistry::global()
                .native_kind(name)
                .unwrap_or(FailureKind::Exception),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CarrierKind::Generic => "Generic",
            CarrierKind::Runtime => "Runtime",
            CarrierKind::IllegalArgument => "IllegalArgument",
            CarrierKind::Io => "Io",
            CarrierKind::FileNotFound => "FileNotFound",
            CarrierKind::Socket => "Socket",
            CarrierKind::UnknownHost => "UnknownHost",
            CarrierKind::Parse => "Parse",
            CarrierKind::Security => "Security",
            CarrierKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for CarrierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Type Identities ─────────────────────────────────────────────────────

/// Concrete failure-type identity used by type-based classification rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureType {
    Native(FailureKind),
    Carrier(CarrierKind),
}

impl FailureType {
    /// Direct parent type.
    pub fn parent(self) -> Option<FailureType> {
        match self {
            FailureType::Native(kind) => kind.parent().map(FailureType::Native),
            FailureType::Carrier(kind) => Some(FailureType::Native(kind.native_kind())),
        }
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(self) -> impl Iterator<Item = FailureType> {
        std::iter::successors(self.parent(), |t| t.parent())
    }
}

impl From<FailureKind> for FailureType {
    fn from(kind: FailureKind) -> Self {
        FailureType::Native(kind)
    }
}

impl From<CarrierKind> for FailureType {
    fn from(kind: CarrierKind) -> Self {
        FailureType::Carrier(kind)
    }
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Native(kind) => write!(f, "native:{}", kind),
            FailureType::Carrier(kind) => write!(f, "carrier:{}", kind),
        }
    }
}
