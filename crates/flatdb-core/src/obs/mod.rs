//! Observability: advisory events and sink abstractions.
//!
//! Store and query logic MUST NOT touch the counter state directly.
//! All advisories flow through `AdvisoryEvent` and `AdvisorySink`; this
//! module is the only bridge between runtime logic and the process-local
//! advisory state. Advisories are never errors.

pub(crate) mod counters;
pub(crate) mod sink;

pub use counters::{AdvisoryReport, ClassAdvisoryCounters};
pub use sink::{AdvisoryEvent, AdvisorySink, advisory_report, advisory_reset_all, with_advisory_sink};

pub(crate) use sink::record;
