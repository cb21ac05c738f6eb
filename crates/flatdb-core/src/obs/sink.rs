//! Advisory sink boundary.
//!
//! The default sink accumulates process-local counters; tests and embedding
//! hosts can install a scoped override to capture events directly.

use crate::obs::counters;
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn AdvisorySink>> = const { RefCell::new(None) };
}

///
/// AdvisoryEvent
///
/// Non-fatal conditions reported during store builds and query resolution.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AdvisoryEvent {
    /// A unique index displaced an existing record for a key. The newest
    /// record wins; the event preserves the fact that a collision happened.
    UniqueKeyCollision {
        class: String,
        attribute: String,
        key: String,
    },

    /// A single-attribute lookup fell back to a linear scan because no
    /// index is configured on the attribute.
    MissingIndexScan { class: String, attribute: String },
}

///
/// AdvisorySink
///

pub trait AdvisorySink {
    fn record(&self, event: &AdvisoryEvent);
}

/// GlobalAdvisorySink
/// Default process-local sink that writes into the advisory counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalAdvisorySink;

impl AdvisorySink for GlobalAdvisorySink {
    fn record(&self, event: &AdvisoryEvent) {
        counters::with_state_mut(|state| match event {
            AdvisoryEvent::UniqueKeyCollision { class, .. } => {
                state.unique_key_collisions = state.unique_key_collisions.saturating_add(1);
                let entry = state.classes.entry(class.clone()).or_default();
                entry.unique_key_collisions = entry.unique_key_collisions.saturating_add(1);
            }
            AdvisoryEvent::MissingIndexScan { class, .. } => {
                state.missing_index_scans = state.missing_index_scans.saturating_add(1);
                let entry = state.classes.entry(class.clone()).or_default();
                entry.missing_index_scans = entry.missing_index_scans.saturating_add(1);
            }
        });
    }
}

pub(crate) const GLOBAL_ADVISORY_SINK: GlobalAdvisorySink = GlobalAdvisorySink;

pub(crate) fn record(event: AdvisoryEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` was produced from a valid `&dyn AdvisorySink` in
        //   `with_advisory_sink`, which always restores the previous pointer
        //   before returning, including unwind paths via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        // - Only a shared reference is materialized, matching the shared
        //   borrow used to install the override.
        unsafe { (&*ptr).record(&event) };
    } else {
        GLOBAL_ADVISORY_SINK.record(&event);
    }
}

/// Snapshot the process-local advisory counters.
#[must_use]
pub fn advisory_report() -> counters::AdvisoryReport {
    counters::report()
}

/// Reset the process-local advisory counters.
pub fn advisory_reset_all() {
    counters::reset_all();
}

/// Run a closure with a temporary advisory sink override.
pub fn with_advisory_sink<T>(sink: &dyn AdvisorySink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn AdvisorySink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - `sink_ptr` is installed only for this dynamic scope; `Guard` always
    //   restores the previous slot on all exits, including panic.
    // - `record` only dereferences synchronously and never persists the
    //   pointer, so it cannot outlive the borrowed sink.
    let sink_ptr =
        unsafe { std::mem::transmute::<&dyn AdvisorySink, *const dyn AdvisorySink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn collision(class: &str) -> AdvisoryEvent {
        AdvisoryEvent::UniqueKeyCollision {
            class: class.to_string(),
            attribute: "_id".to_string(),
            key: "7".to_string(),
        }
    }

    struct CountingSink<'a> {
        calls: &'a AtomicUsize,
    }

    impl AdvisorySink for CountingSink<'_> {
        fn record(&self, _: &AdvisoryEvent) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn with_advisory_sink_routes_and_restores_nested_overrides() {
        SINK_OVERRIDE.with(|cell| {
            *cell.borrow_mut() = None;
        });
        advisory_reset_all();

        let outer_calls = AtomicUsize::new(0);
        let inner_calls = AtomicUsize::new(0);
        let outer = CountingSink {
            calls: &outer_calls,
        };
        let inner = CountingSink {
            calls: &inner_calls,
        };

        with_advisory_sink(&outer, || {
            record(collision("a"));
            assert_eq!(outer_calls.load(Ordering::SeqCst), 1);

            with_advisory_sink(&inner, || {
                record(collision("b"));
            });

            // inner override was restored to outer override
            record(collision("c"));
        });

        assert_eq!(outer_calls.load(Ordering::SeqCst), 2);
        assert_eq!(inner_calls.load(Ordering::SeqCst), 1);

        // outer override was restored to previous (none), so events hit the
        // global counters again
        SINK_OVERRIDE.with(|cell| {
            assert!(cell.borrow().is_none());
        });
        record(collision("d"));
        assert_eq!(advisory_report().unique_key_collisions, 1);
    }

    #[test]
    fn with_advisory_sink_restores_override_on_panic() {
        SINK_OVERRIDE.with(|cell| {
            *cell.borrow_mut() = None;
        });

        let calls = AtomicUsize::new(0);
        let sink = CountingSink { calls: &calls };

        let panicked = catch_unwind(AssertUnwindSafe(|| {
            with_advisory_sink(&sink, || {
                record(collision("a"));
                panic!("intentional panic for guard test");
            });
        }))
        .is_err();
        assert!(panicked);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // guard restored the slot after unwind
        SINK_OVERRIDE.with(|cell| {
            assert!(cell.borrow().is_none());
        });
    }

    #[test]
    fn global_sink_accumulates_per_class_counters() {
        SINK_OVERRIDE.with(|cell| {
            *cell.borrow_mut() = None;
        });
        advisory_reset_all();

        record(collision("orders"));
        record(collision("orders"));
        record(AdvisoryEvent::MissingIndexScan {
            class: "customers".to_string(),
            attribute: "_name".to_string(),
        });

        let report = advisory_report();
        assert_eq!(report.unique_key_collisions, 2);
        assert_eq!(report.missing_index_scans, 1);
        assert_eq!(
            report
                .classes
                .get("orders")
                .map(|c| c.unique_key_collisions),
            Some(2)
        );
        assert_eq!(
            report
                .classes
                .get("customers")
                .map(|c| c.missing_index_scans),
            Some(1)
        );
    }

    #[test]
    fn report_serializes_for_endpoint_plumbing() {
        advisory_reset_all();
        SINK_OVERRIDE.with(|cell| {
            *cell.borrow_mut() = None;
        });
        record(collision("orders"));

        let json = serde_json::to_value(advisory_report()).expect("report should serialize");
        assert_eq!(json["unique_key_collisions"], 1);
        assert_eq!(json["classes"]["orders"]["unique_key_collisions"], 1);
    }
}
