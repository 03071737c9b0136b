#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

//! Core: search request validation, trace model, and step generation.
//!
//! This crate is the pure heart of Stepscope. Raw text goes in through
//! [`validate`], typed [`SearchRequest`]s come out, and the generators in
//! [`linear`] and [`binary`] turn a request into an immutable [`Trace`] of
//! [`Step`]s that a playback layer can walk at its own pace.
//!
//! Nothing here touches timers, threads, or the terminal.

pub mod binary;
pub mod linear;
pub mod request;
pub mod step;
pub mod validate;

pub use binary::generate_binary;
pub use linear::generate_linear;
pub use request::{Algorithm, SearchRequest};
pub use step::{Bounds, Step, StepOutcome, Trace};
pub use validate::{Field, ValidateError, validate};

/// Generate a trace for a validated request, dispatching on its algorithm.
#[must_use]
pub fn generate(request: &SearchRequest) -> Trace {
    match request.algorithm {
        Algorithm::Linear => generate_linear(request),
        Algorithm::Binary => generate_binary(request),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_dispatches_on_algorithm() {
        let linear = SearchRequest::new(vec![1, 2, 3], 2, Algorithm::Linear);
        let binary = SearchRequest::new(vec![1, 2, 3], 2, Algorithm::Binary);

        let lt = generate(&linear);
        let bt = generate(&binary);

        // Linear steps carry no bounds; binary probes carry the window.
        assert!(lt.steps().iter().all(|s| s.bounds.is_none()));
        assert!(bt.steps().iter().all(|s| s.bounds.is_some()));
        assert_eq!(lt.terminal().outcome, StepOutcome::Found { at: 1 });
        assert_eq!(bt.terminal().outcome, StepOutcome::Found { at: 1 });
    }
}
