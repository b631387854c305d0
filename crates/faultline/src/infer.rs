//! Signal inference for failures raised without one.

use crate::fault::Fault;
use crate::kind::FailureKind;
use crate::signal::SignalRef;
use crate::taxonomy::{
    FileNotFound, Generic, IllegalArgument, Io, Parse, Runtime, Security, Socket, UnknownHost,
};

/// The `UncaughtException` signal standing in for a native `kind`.
///
/// Checked most specific first, by ancestry, so `NumberFormat` lands on
/// `IllegalArgument` and `Interrupted` on `Io`.
pub fn default_signal(kind: FailureKind) -> SignalRef {
    if kind.is_a(FailureKind::IllegalArgument) {
        IllegalArgument::UncaughtException.into()
    } else if kind.is_a(FailureKind::FileNotFound) {
        FileNotFound::UncaughtException.into()
    } else if kind.is_a(FailureKind::Socket) {
        Socket::UncaughtException.into()
    } else if kind.is_a(FailureKind::UnknownHost) {
        UnknownHost::UncaughtException.into()
    } else if kind.is_a(FailureKind::Parse) {
        Parse::UncaughtException.into()
    } else if kind.is_a(FailureKind::Security) {
        Security::UncaughtException.into()
    } else if kind.is_a(FailureKind::Io) {
        Io::UncaughtException.into()
    } else if kind.is_a(FailureKind::Runtime) {
        Runtime::UncaughtException.into()
    } else {
        Generic::UncaughtException.into()
    }
}

/// The signal a failure reports: its own for carriers, inferred otherwise.
pub fn infer_signal(fault: &Fault) -> SignalRef {
    match fault {
        Fault::Carrier(carrier) => carrier.signal().clone(),
        Fault::Native(native) => default_signal(native.kind()),
    }
}
