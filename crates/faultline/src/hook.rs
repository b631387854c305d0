//! Diagnostic hook for ignored failures.
//!
//! [`attempt::ignore`](crate::attempt::ignore) discards classified failures;
//! a process may register one callback to observe them. The hook never
//! affects control flow.

use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;

use crate::fault::Fault;

type OnIgnored = Arc<dyn Fn(&Fault) + Send + Sync>;

lazy_static! {
    static ref ON_IGNORED: RwLock<Option<OnIgnored>> = RwLock::new(None);
}

/// Install the on-ignored hook, replacing any previous one.
pub fn set_on_ignored(hook: impl Fn(&Fault) + Send + Sync + 'static) {
    *ON_IGNORED.write() = Some(Arc::new(hook));
}

pub fn clear_on_ignored() {
    *ON_IGNORED.write() = None;
}

pub fn has_on_ignored() -> bool {
    ON_IGNORED.read().is_some()
}

/// Call the hook, if any, with an ignored failure.
pub fn notify_ignored(fault: &Fault) {
    // Called outside the lock so the hook may replace itself.
    let hook = ON_IGNORED.read().clone();
    if let Some(hook) = hook {
        hook(fault);
    }
}
