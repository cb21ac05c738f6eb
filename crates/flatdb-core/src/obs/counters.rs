use serde::Serialize;
use std::{cell::RefCell, collections::BTreeMap};

///
/// AdvisoryReport
///
/// Point-in-time snapshot of the process-local advisory counters, both in
/// aggregate and per record class.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct AdvisoryReport {
    pub unique_key_collisions: u64,
    pub missing_index_scans: u64,
    pub classes: BTreeMap<String, ClassAdvisoryCounters>,
}

///
/// ClassAdvisoryCounters
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct ClassAdvisoryCounters {
    pub unique_key_collisions: u64,
    pub missing_index_scans: u64,
}

thread_local! {
    static STATE: RefCell<AdvisoryReport> = RefCell::new(AdvisoryReport::default());
}

pub(crate) fn with_state<R>(f: impl FnOnce(&AdvisoryReport) -> R) -> R {
    STATE.with(|cell| f(&cell.borrow()))
}

pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut AdvisoryReport) -> R) -> R {
    STATE.with(|cell| f(&mut cell.borrow_mut()))
}

/// Snapshot the current advisory counters.
#[must_use]
pub(crate) fn report() -> AdvisoryReport {
    with_state(Clone::clone)
}

/// Reset all advisory counters.
pub(crate) fn reset_all() {
    with_state_mut(|state| *state = AdvisoryReport::default());
}
