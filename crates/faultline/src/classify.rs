//! Classification rules: mapping raised failures onto signals.
//!
//! A [`ClassificationTable`] is an ordered list of [`Rule`]s. Each rule names
//! either failure types or signals to catch, and the signal a caught failure
//! is reported as. Type rules match exactly first, then by ancestry; signal
//! rules match when the failure carries the signal anywhere along its carrier
//! chain.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FaultlineConfig;
use crate::fault::Fault;
use crate::kind::FailureType;
use crate::outcome::Failure;
use crate::signal::{SignalId, SignalRef};

// ── Rules ───────────────────────────────────────────────────────────────

/// What a rule catches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleMatcher {
    /// Failures of these concrete types (or their descendants).
    Types(Vec<FailureType>),
    /// Failures carrying any of these signals.
    Signals(Vec<SignalId>),
}

/// One classification rule.
#[derive(Clone, Debug)]
pub struct Rule {
    matcher: RuleMatcher,
    if_caught: SignalRef,
}

impl Rule {
    /// Catch failures of any of `types`, reporting them as `if_caught`.
    pub fn types<T: Into<FailureType>>(
        types: impl IntoIterator<Item = T>,
        if_caught: impl Into<SignalRef>,
    ) -> Self {
        Self {
            matcher: RuleMatcher::Types(types.into_iter().map(Into::into).collect()),
            if_caught: if_caught.into(),
        }
    }

    /// Catch failures carrying any of `signals`, reporting them as `if_caught`.
    pub fn signals<S: Into<SignalId>>(
        signals: impl IntoIterator<Item = S>,
        if_caught: impl Into<SignalRef>,
    ) -> Self {
        Self {
            matcher: RuleMatcher::Signals(signals.into_iter().map(Into::into).collect()),
            if_caught: if_caught.into(),
        }
    }

    pub fn matcher(&self) -> &RuleMatcher {
        &self.matcher
    }

    pub fn if_caught(&self) -> &SignalRef {
        &self.if_caught
    }

    fn matches_exact(&self, fault: &Fault) -> bool {
        match &self.matcher {
            RuleMatcher::Types(types) => types.contains(&fault.failure_type()),
            RuleMatcher::Signals(signals) => signals.iter().any(|id| carries(fault, *id)),
        }
    }

    fn matches_ancestor(&self, fault: &Fault) -> bool {
        match &self.matcher {
            RuleMatcher::Types(types) => fault.ancestry().iter().any(|t| types.contains(t)),
            RuleMatcher::Signals(_) => false,
        }
    }
}

/// A native failure carries the signal it would be inferred as.
fn carries(fault: &Fault, id: SignalId) -> bool {
    match fault {
        Fault::Carrier(carrier) => carrier.has(id),
        Fault::Native(_) => fault.signal().id() == id,
    }
}

// ── Policy ──────────────────────────────────────────────────────────────

/// Order in which rules are tried.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Rules in order; each tries an exact match, then an ancestor match.
    #[default]
    RuleOrder,
    /// Exact matches across all rules, then ancestor matches across all rules.
    ExactFirst,
}

/// How a rule matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Ancestor,
}

/// A successful classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub rule_index: usize,
    pub signal: SignalRef,
    pub matched: MatchKind,
}

impl Classification {
    /// The failure value for `cause` under this classification.
    pub fn into_failure(self, cause: Fault) -> Failure {
        Failure::of(self.signal, None, Some(cause))
    }
}

// ── Table ───────────────────────────────────────────────────────────────

/// Ordered rules plus the policy for applying them.
#[derive(Clone, Debug)]
pub struct ClassificationTable {
    rules: Vec<Rule>,
    policy: MatchPolicy,
    trace: bool,
}

impl ClassificationTable {
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
            policy: MatchPolicy::default(),
            trace: true,
        }
    }

    /// A table that classifies nothing; every failure escalates.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn from_config(rules: impl IntoIterator<Item = Rule>, config: &FaultlineConfig) -> Self {
        Self {
            policy: config.match_policy,
            trace: config.trace_classification,
            ..Self::new(rules)
        }
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Append a rule after the existing ones.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Find the rule that catches `fault`, if any.
    pub fn classify(&self, fault: &Fault) -> Option<Classification> {
        let hit = match self.policy {
            MatchPolicy::RuleOrder => self.rules.iter().enumerate().find_map(|(i, rule)| {
                if rule.matches_exact(fault) {
                    Some((i, MatchKind::Exact))
                } else if rule.matches_ancestor(fault) {
                    Some((i, MatchKind::Ancestor))
                } else {
                    None
                }
            }),
            MatchPolicy::ExactFirst => self
                .rules
                .iter()
                .position(|rule| rule.matches_exact(fault))
                .map(|i| (i, MatchKind::Exact))
                .or_else(|| {
                    self.rules
                        .iter()
                        .position(|rule| rule.matches_ancestor(fault))
                        .map(|i| (i, MatchKind::Ancestor))
                }),
        };

        let classification = hit.map(|(rule_index, matched)| Classification {
            rule_index,
            signal: self.rules[rule_index].if_caught.clone(),
            matched,
        });

        if self.trace {
            match &classification {
                Some(c) => debug!(
                    failure = %fault.failure_type(),
                    rule = c.rule_index,
                    matched = ?c.matched,
                    signal = %c.signal,
                    "Failure classified"
                ),
                None => debug!(
                    failure = %fault.failure_type(),
                    rules = self.rules.len(),
                    "No rule matched"
                ),
            }
        }
        classification
    }
}

impl Default for ClassificationTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Rule> for ClassificationTable {
    fn from(rule: Rule) -> Self {
        Self::new([rule])
    }
}

impl From<Vec<Rule>> for ClassificationTable {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}

impl FromIterator<Rule> for ClassificationTable {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::new(iter)
    }
}
