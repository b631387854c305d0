//! Property tests: classification and escalation over arbitrary failure chains.

use faultline::{
    attempt, ClassificationTable, FailureKind, Fault, Generic, IllegalArgument, Io, MatchPolicy,
    Rule, Runtime, SignalExt, SignalRef,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn arb_kind() -> impl Strategy<Value = FailureKind> {
    prop_oneof![
        Just(FailureKind::Exception),
        Just(FailureKind::Runtime),
        Just(FailureKind::IllegalArgument),
        Just(FailureKind::NumberFormat),
        Just(FailureKind::IllegalState),
        Just(FailureKind::Security),
        Just(FailureKind::Io),
        Just(FailureKind::FileNotFound),
        Just(FailureKind::Socket),
        Just(FailureKind::Parse),
        Just(FailureKind::Fatal),
    ]
}

fn arb_signal() -> impl Strategy<Value = SignalRef> {
    prop_oneof![
        Just(Runtime::UnknownError.erase()),
        Just(IllegalArgument::BadValue.erase()),
        Just(Io::UnknownError.erase()),
        Just(Generic::UnknownError.erase()),
    ]
}

/// A native failure wrapped in a chain of signalled carriers, innermost first.
fn build_chain(root: FailureKind, signals: &[SignalRef]) -> Fault {
    signals.iter().fold(Fault::native(root, "root"), |cause, signal| {
        signal.fault(None, Some(cause))
    })
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Every signal placed in a chain is found by `has` on the outermost fault.
    #[test]
    fn has_finds_every_chained_signal(
        root in arb_kind(),
        signals in prop::collection::vec(arb_signal(), 1..6),
    ) {
        let fault = build_chain(root, &signals);
        for signal in &signals {
            prop_assert!(fault.has(signal));
        }
        prop_assert!(fault.is(signals.last().unwrap()));
    }

    /// A rule naming `Throwable` catches any failure.
    #[test]
    fn throwable_rule_catches_everything(
        root in arb_kind(),
        signals in prop::collection::vec(arb_signal(), 0..4),
    ) {
        let table = ClassificationTable::from(Rule::types([FailureKind::Throwable], Generic::UnknownError));
        let outcome = attempt::collect(|| Err::<(), _>(build_chain(root, &signals)), &table).unwrap();
        prop_assert!(outcome.signal().unwrap().is(Generic::UnknownError));
    }

    /// An empty table escalates every failure, wrapping it exactly once.
    #[test]
    fn escalation_wraps_once(
        root in arb_kind(),
        signals in prop::collection::vec(arb_signal(), 0..4),
    ) {
        let err = attempt::collect(|| Err::<(), _>(build_chain(root, &signals)), &ClassificationTable::empty())
            .unwrap_err();
        prop_assert!(err.is(Generic::UncaughtException));
        let again = err.clone().escalate();
        prop_assert_eq!(again.to_string(), err.to_string());
    }

    /// Both policies agree on whether a failure is caught at all.
    #[test]
    fn policies_agree_on_coverage(
        root in arb_kind(),
        rule_kinds in prop::collection::vec(arb_kind(), 0..4),
    ) {
        let rules: Vec<Rule> = rule_kinds
            .into_iter()
            .map(|k| Rule::types([k], Generic::UnknownError))
            .collect();
        let fault = Fault::native(root, "x");
        let ordered = ClassificationTable::new(rules.clone());
        let exact_first = ClassificationTable::new(rules).with_policy(MatchPolicy::ExactFirst);
        prop_assert_eq!(
            ordered.classify(&fault).is_some(),
            exact_first.classify(&fault).is_some()
        );
    }

    /// `result` never escalates and always keeps the raised failure as cause.
    #[test]
    fn result_captures_everything(root in arb_kind()) {
        let outcome = attempt::result(|| Err::<(), _>(Fault::native(root, "x")));
        prop_assert!(outcome.is_failure());
        prop_assert_eq!(outcome.cause().unwrap().native_kind(), root);
    }
}
