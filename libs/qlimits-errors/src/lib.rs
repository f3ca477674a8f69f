//! Error data types shared by the qlimits crates
//!
//! Pure data, no HTTP framework dependencies:
//! - RFC 9457 Problem Details (`Problem`)
//! - Error catalog entries (`ErrDef`)
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod catalog;
pub mod problem;

pub use catalog::ErrDef;
pub use problem::Problem;

/// Attach instance and `trace_id` to a Problem before it leaves the pipeline.
pub fn finalize(mut p: Problem, instance: &str, trace_id: Option<String>) -> Problem {
    p = p.with_instance(instance);
    if let Some(tid) = trace_id {
        p = p.with_trace_id(tid);
    }
    p
}
