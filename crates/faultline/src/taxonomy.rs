//! Built-in taxonomies.
//!
//! One taxonomy per built-in carrier kind. Each has an `UncaughtException`
//! case, used when a failure of that category escapes unclassified, plus one
//! general-purpose case.

use serde::Serialize;

use crate::context::{Context, ContextRecord};
use crate::kind::CarrierKind;
use crate::signal::Signal;

const UNCAUGHT_TEMPLATE: &str = "Uncaught exception: {cause}";
const UNCAUGHT_RUNTIME_TEMPLATE: &str = "Uncaught runtime exception: {cause}";
const UNKNOWN_TEMPLATE: &str = "Unknown error.";
const BAD_VALUE_TEMPLATE: &str = "'{name}' must be {requirement}; '{value}' provided.";
const NOT_FOUND_TEMPLATE: &str = "'{path}' was not found.";

macro_rules! taxonomy {
    (
        $(#[$meta:meta])*
        $name:ident {
            kind: $kind:ident,
            uncaught: $uncaught:expr,
            $case:ident => $template:expr,
            default_context: $default:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            UncaughtException,
            $case,
        }

        impl Signal for $name {
            fn taxonomy(&self) -> &'static str {
                concat!("faultline.", stringify!($name))
            }

            fn name(&self) -> &'static str {
                match self {
                    $name::UncaughtException => "UncaughtException",
                    $name::$case => stringify!($case),
                }
            }

            fn template(&self) -> Option<&str> {
                match self {
                    $name::UncaughtException => Some($uncaught),
                    $name::$case => Some($template),
                }
            }

            fn carrier_kind(&self) -> CarrierKind {
                CarrierKind::$kind
            }

            fn default_context(&self) -> Option<Context> {
                let uncaught = matches!(self, $name::UncaughtException);
                ($default)(uncaught)
            }
        }
    };
}

/// Empty context for `UncaughtException`, so `{cause}` has something to key on.
fn uncaught_only(uncaught: bool) -> Option<Context> {
    uncaught.then(Context::empty)
}

fn at_offset_zero(_: bool) -> Option<Context> {
    Some(Context::builder().field("offset", 0).build())
}

taxonomy! {
    /// General-purpose signals; `UncaughtException` is the escalation signal.
    Generic {
        kind: Generic,
        uncaught: UNCAUGHT_TEMPLATE,
        UnknownError => UNKNOWN_TEMPLATE,
        default_context: uncaught_only,
    }
}

taxonomy! {
    Runtime {
        kind: Runtime,
        uncaught: UNCAUGHT_RUNTIME_TEMPLATE,
        UnknownError => UNKNOWN_TEMPLATE,
        default_context: uncaught_only,
    }
}

taxonomy! {
    /// Invalid arguments.
    IllegalArgument {
        kind: IllegalArgument,
        uncaught: UNCAUGHT_TEMPLATE,
        BadValue => BAD_VALUE_TEMPLATE,
        default_context: uncaught_only,
    }
}

taxonomy! {
    Io {
        kind: Io,
        uncaught: UNCAUGHT_TEMPLATE,
        UnknownError => UNKNOWN_TEMPLATE,
        default_context: uncaught_only,
    }
}

taxonomy! {
    FileNotFound {
        kind: FileNotFound,
        uncaught: UNCAUGHT_TEMPLATE,
        NotFound => NOT_FOUND_TEMPLATE,
        default_context: uncaught_only,
    }
}

taxonomy! {
    /// Socket failures: refused or reset connections, broken pipes.
    Socket {
        kind: Socket,
        uncaught: UNCAUGHT_TEMPLATE,
        UnknownError => UNKNOWN_TEMPLATE,
        default_context: uncaught_only,
    }
}

taxonomy! {
    /// Host name resolution failures.
    UnknownHost {
        kind: UnknownHost,
        uncaught: UNCAUGHT_TEMPLATE,
        UnknownError => UNKNOWN_TEMPLATE,
        default_context: uncaught_only,
    }
}

taxonomy! {
    /// Parse failures. Contexts carry the input `offset`.
    Parse {
        kind: Parse,
        uncaught: UNCAUGHT_TEMPLATE,
        UnknownError => UNKNOWN_TEMPLATE,
        default_context: at_offset_zero,
    }
}

taxonomy! {
    Security {
        kind: Security,
        uncaught: UNCAUGHT_TEMPLATE,
        UnknownError => UNKNOWN_TEMPLATE,
        default_context: uncaught_only,
    }
}

// ── Records ─────────────────────────────────────────────────────────────

/// Context for [`IllegalArgument::BadValue`].
#[derive(Clone, Debug, Serialize)]
pub struct BadValue<V: Serialize> {
    pub name: String,
    pub value: V,
    pub requirement: String,
}

impl<V: Serialize> BadValue<V> {
    pub fn new(name: impl Into<String>, value: V, requirement: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            requirement: requirement.into(),
        }
    }
}

impl<V: Serialize> ContextRecord for BadValue<V> {
    fn template(&self) -> Option<&str> {
        Some(BAD_VALUE_TEMPLATE)
    }
}

/// Context for [`FileNotFound::NotFound`].
#[derive(Clone, Debug, Serialize)]
pub struct MissingPath {
    pub path: String,
}

impl ContextRecord for MissingPath {}

/// Context for [`Parse`] signals.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ParseOffset {
    pub offset: usize,
}

impl ContextRecord for ParseOffset {}
