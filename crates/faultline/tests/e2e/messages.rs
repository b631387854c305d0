//! End-to-end test: message rendering across signals, contexts and causes.

use faultline::taxonomy::{BadValue, MissingPath};
use faultline::{
    Context, ContextLedger, ContextRecord, FailureKind, Fault, Failure, FileNotFound, Generic,
    IllegalArgument, Io, Outcome, Signal, SignalExt,
};

use crate::common::Trier;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn product_of_six_and_seven() -> Context {
    BadValue::new("foo", 41, "the product of 6 and 7")
        .to_context()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn carrier_message_is_code_and_rendered_text() {
    let carrier = IllegalArgument::BadValue.carrier(Some(product_of_six_and_seven()), None);
    assert_eq!(
        carrier.to_string(),
        "faultline.IllegalArgument.BadValue: 'foo' must be the product of 6 and 7; '41' provided."
    );
}

#[test]
fn missing_field_degrades_to_code() {
    let ctx = Context::builder().field("name", "foo").field("value", 41).build();
    let carrier = IllegalArgument::BadValue.carrier(Some(ctx), None);
    assert_eq!(carrier.message(), "faultline.IllegalArgument.BadValue");
}

#[test]
fn untemplated_signal_uses_its_text() {
    assert_eq!(Trier::Six.message(None), "hotel.Trier.Six: He's in the hotel!");
    assert_eq!(Trier::Seven.message(None), "hotel.Trier.Seven");

    let ctx = Context::builder().field("room", 237).build();
    assert_eq!(Trier::Seven.message(Some(&ctx)), "hotel.Trier.Seven: room 237 is empty");
}

#[test]
fn layered_context_fills_from_more() {
    let base = Context::builder().field("room", 101).build();
    let ctx = Context::builder().field("floor", 1).more(base).build();
    assert_eq!(Trier::Seven.message(Some(&ctx)), "hotel.Trier.Seven: room 101 is empty");
}

#[test]
fn sequences_render_bracketed() {
    let ctx = Context::builder()
        .field("name", "ids")
        .field("value", vec![1, 2, 3])
        .field("requirement", "non-empty")
        .build();
    assert_eq!(
        IllegalArgument::BadValue.message(Some(&ctx)),
        "faultline.IllegalArgument.BadValue: 'ids' must be non-empty; '[1, 2, 3]' provided."
    );
}

#[test]
fn not_found_record() {
    let ctx = MissingPath {
        path: "config.toml".into(),
    }
    .to_context()
    .unwrap();
    let fault = FileNotFound::NotFound.fault(Some(ctx), None);
    assert_eq!(
        fault.to_string(),
        "faultline.FileNotFound.NotFound: 'config.toml' was not found."
    );
}

#[test]
fn failure_message_resolves_cause() {
    let ctx = Context::builder()
        .template("could not load settings: {cause}")
        .build();
    let cause = Fault::native(FailureKind::Io, "disk unplugged");
    let outcome: Outcome<()> = Outcome::failure(Io::UnknownError, Some(ctx), Some(cause));
    assert_eq!(
        outcome.message().as_deref(),
        Some("could not load settings: Io: disk unplugged")
    );
}

#[test]
fn unstaged_cause_token_stays_unresolved() {
    let ctx = Context::builder().template("because {cause}").build();
    assert_eq!(ctx.message(), None);
    let failure = Failure::of(Generic::UnknownError, Some(ctx), None);
    assert_eq!(failure.message(), "faultline.Generic.UnknownError: Unknown error.");
}

#[test]
fn escalated_message_names_the_cause() {
    let fault = Fault::native(FailureKind::IllegalState, "closed").escalate();
    assert_eq!(
        fault.to_string(),
        "faultline.Generic.UncaughtException: Uncaught exception: IllegalState: closed"
    );
}

#[test]
fn evicted_context_loses_its_cause() {
    let ledger = ContextLedger::new(5);
    let template = "failed: {cause}";
    let contexts: Vec<Context> = (0..6).map(|_| Context::builder().template(template).build()).collect();
    for (i, ctx) in contexts.iter().enumerate() {
        let cause = std::sync::Arc::new(Fault::native(FailureKind::Io, format!("#{}", i)));
        ledger.stage(ctx, &cause);
    }
    assert_eq!(contexts[0].render_in(template, &ledger), None);
    assert_eq!(
        contexts[5].render_in(template, &ledger).as_deref(),
        Some("failed: Io: #5")
    );
}

#[test]
fn root_cause_reaches_std_error() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no access");
    let fault = Generic::UncaughtException.fault(None, Some(io.into()));
    assert_eq!(fault.root_cause().to_string(), "no access");
    assert!(fault.as_carrier().unwrap().cause().unwrap().native_kind().is_a(FailureKind::Runtime));
}
