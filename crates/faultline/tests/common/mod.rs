//! Shared fixtures for integration tests.

#![allow(dead_code)]

use faultline::{CarrierKind, Fault, Outcome, Signal, SignalExt};

/// Install a test subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ---------------------------------------------------------------------------
// A small application taxonomy
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trier {
    Six,
    Seven,
}

impl Signal for Trier {
    fn taxonomy(&self) -> &'static str {
        "hotel.Trier"
    }

    fn name(&self) -> &'static str {
        match self {
            Trier::Six => "Six",
            Trier::Seven => "Seven",
        }
    }

    fn template(&self) -> Option<&str> {
        match self {
            Trier::Six => Some("He's in the hotel!"),
            Trier::Seven => Some("room {room} is empty"),
        }
    }

    fn carrier_kind(&self) -> CarrierKind {
        CarrierKind::Runtime
    }
}

pub fn value() -> String {
    "foo!".to_string()
}

pub fn success() -> Outcome<String> {
    Outcome::Success(value())
}

pub fn signalled() -> Outcome<String> {
    Outcome::failure(Trier::Six, None, None)
}

pub fn throw_happy() -> Result<String, Fault> {
    Err(Trier::Six.fault(None, None))
}
