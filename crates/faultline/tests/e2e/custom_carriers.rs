//! End-to-end test: application-defined carrier types.
//!
//! A `Billing` taxonomy declares its own carrier kind. Registered, its
//! carriers extend `IllegalState` and classify by that ancestry; unregistered
//! kinds and misbehaving factories degrade to generic carriers.

use faultline::{
    attempt, Carrier, CarrierFactory, CarrierKind, CarrierParts, CarrierRegistry,
    ClassificationTable, FailureKind, FailureType, FaultlineError, FaultlineResult, Generic,
    MatchKind, Rule, Signal, SignalExt,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const BILLING: &str = "billing.carrier";
const REFUSING: &str = "billing.refusing";

#[derive(Clone, Copy, Debug)]
enum Billing {
    Declined,
    Refused,
    Unbound,
}

impl Signal for Billing {
    fn taxonomy(&self) -> &'static str {
        "billing.Billing"
    }

    fn name(&self) -> &'static str {
        match self {
            Billing::Declined => "Declined",
            Billing::Refused => "Refused",
            Billing::Unbound => "Unbound",
        }
    }

    fn template(&self) -> Option<&str> {
        Some("card ending {last4} was declined")
    }

    fn carrier_kind(&self) -> CarrierKind {
        match self {
            Billing::Declined => CarrierKind::Custom(BILLING),
            Billing::Refused => CarrierKind::Custom(REFUSING),
            Billing::Unbound => CarrierKind::Custom("billing.unbound"),
        }
    }
}

struct BillingCarrier;

impl CarrierFactory for BillingCarrier {
    fn native_kind(&self) -> FailureKind {
        FailureKind::IllegalState
    }

    fn build(&self, kind: CarrierKind, parts: CarrierParts) -> FaultlineResult<Carrier> {
        Ok(parts.assemble(kind, self.native_kind()))
    }
}

struct RefusingCarrier;

impl CarrierFactory for RefusingCarrier {
    fn build(&self, kind: CarrierKind, _parts: CarrierParts) -> FaultlineResult<Carrier> {
        Err(FaultlineError::CarrierContract {
            carrier: kind.to_string(),
            reason: "refuses to build".into(),
        })
    }
}

fn register() {
    crate::common::init_tracing();
    CarrierRegistry::global().register(BILLING, BillingCarrier);
    CarrierRegistry::global().register(REFUSING, RefusingCarrier);
}

fn card() -> faultline::Context {
    faultline::Context::builder().field("last4", "4242").build()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn registered_carrier_extends_declared_kind() {
    register();
    let fault = Billing::Declined.fault(Some(card()), None);
    assert_eq!(fault.failure_type(), FailureType::Carrier(CarrierKind::Custom(BILLING)));
    assert_eq!(fault.native_kind(), FailureKind::IllegalState);
    assert_eq!(fault.to_string(), "billing.Billing.Declined: card ending 4242 was declined");
}

#[test]
fn custom_carrier_classifies_by_ancestry() {
    register();
    let table = ClassificationTable::new(vec![Rule::types([FailureKind::Runtime], Generic::UnknownError)]);
    let fault = Billing::Declined.fault(None, None);
    let classification = table.classify(&fault).unwrap();
    assert_eq!(classification.matched, MatchKind::Ancestor);

    let outcome = table.collect(|| Err::<(), _>(fault)).unwrap();
    assert!(outcome.signal().unwrap().is(Generic::UnknownError));
}

#[test]
fn custom_carrier_classifies_exactly() {
    register();
    let table = ClassificationTable::from(Rule::types([CarrierKind::Custom(BILLING)], Generic::UnknownError));
    let classification = table.classify(&Billing::Declined.fault(None, None)).unwrap();
    assert_eq!(classification.matched, MatchKind::Exact);
}

#[test]
fn refusing_factory_falls_back() {
    register();
    let fault = Billing::Refused.fault(Some(card()), None);
    let carrier = fault.as_carrier().unwrap();
    assert_eq!(carrier.kind(), CarrierKind::Generic);
    assert!(carrier.is(Billing::Refused));
    assert_eq!(carrier.message(), "billing.Billing.Refused: card ending 4242 was declined");
}

#[test]
fn unbound_kind_falls_back() {
    let outcome = attempt::result(|| Err::<(), _>(Billing::Unbound.fault(None, None)));
    let failure = outcome.as_failure().unwrap();
    assert!(failure.is(Billing::Unbound));
    assert_eq!(
        failure.cause().unwrap().failure_type(),
        FailureType::Carrier(CarrierKind::Generic)
    );
}
