//! Property tests: message rendering is total and prefixed by the signal code.

use faultline::{Context, ContextLedger, IllegalArgument, Outcome, Signal, SignalExt};
use proptest::prelude::*;

use crate::common::Trier;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Field names drawn from the tokens the templates use, plus noise.
fn arb_field_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("name".to_string()),
        Just("value".to_string()),
        Just("requirement".to_string()),
        Just("room".to_string()),
        "[a-z]{1,8}",
    ]
}

fn arb_context() -> impl Strategy<Value = Context> {
    prop::collection::vec((arb_field_name(), "[ -~]{0,16}"), 0..6).prop_map(|fields| {
        fields
            .into_iter()
            .fold(Context::builder(), |b, (name, value)| b.field(name, value))
            .build()
    })
}

/// Printable text with no `{identifier}` tokens.
fn arb_plain_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,;:!'-]{0,40}"
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Whatever the context holds, the message starts with the code.
    #[test]
    fn message_always_starts_with_code(ctx in arb_context()) {
        for msg in [
            IllegalArgument::BadValue.message(Some(&ctx)),
            Trier::Seven.message(Some(&ctx)),
            Trier::Six.message(Some(&ctx)),
        ] {
            prop_assert!(msg.starts_with("faultline.") || msg.starts_with("hotel."));
        }
        let bad_value = IllegalArgument::BadValue.message(Some(&ctx));
        prop_assert!(bad_value.starts_with(&IllegalArgument::BadValue.code()));
    }

    /// A rendered message never leaves a token behind.
    #[test]
    fn rendered_text_has_no_tokens(ctx in arb_context()) {
        if let Some(text) = ctx.render_with(Trier::Seven.template()) {
            prop_assert!(!faultline::context::has_token(&text));
        }
    }

    /// Token-free templates are returned verbatim.
    #[test]
    fn plain_templates_render_verbatim(text in arb_plain_text(), ctx in arb_context()) {
        let ledger = ContextLedger::new(1);
        prop_assert_eq!(ctx.render_in(&text, &ledger), Some(text.clone()));
    }

    /// Carriers freeze exactly the signal's message for their context.
    #[test]
    fn carrier_message_matches_signal(ctx in arb_context()) {
        let expected = Trier::Seven.message(Some(&ctx));
        let carrier = Trier::Seven.carrier(Some(ctx), None);
        prop_assert_eq!(carrier.message(), expected.as_str());
    }

    /// `assume` on a success returns the value unchanged.
    #[test]
    fn success_assume_roundtrip(value in any::<i64>()) {
        prop_assert_eq!(Outcome::Success(value).assume().unwrap(), value);
    }

    /// Rendering is stable across repeated calls.
    #[test]
    fn rendering_is_idempotent(ctx in arb_context()) {
        let first = IllegalArgument::BadValue.message(Some(&ctx));
        let second = IllegalArgument::BadValue.message(Some(&ctx));
        prop_assert_eq!(first, second);
    }
}
