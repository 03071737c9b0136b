#![forbid(unsafe_code)]

//! Linear-search step generation.

use crate::request::SearchRequest;
use crate::step::{Step, StepOutcome, Trace};

/// Generate the step trace for a left-to-right scan.
///
/// One step is emitted per inspected index: a `Searching` step for a
/// mismatch, or a single terminal `Found` step at the first match (no
/// separate searching step for that index). An exhausted or empty array
/// yields one terminal `NotFound` step, so the trace is never empty.
#[must_use]
pub fn generate_linear(request: &SearchRequest) -> Trace {
    let mut steps = Vec::new();

    for (i, &value) in request.values.iter().enumerate() {
        if value == request.target {
            steps.push(Step {
                index: steps.len(),
                outcome: StepOutcome::Found { at: i },
                bounds: None,
                description: format!(
                    "Index {i} holds {value}, which equals the target {}. Found it!",
                    request.target
                ),
            });
            return Trace::from_steps(steps);
        }
        steps.push(Step {
            index: steps.len(),
            outcome: StepOutcome::Searching { compared: i },
            bounds: None,
            description: format!(
                "Comparing index {i}: {value} is not {}. Moving right.",
                request.target
            ),
        });
    }

    let description = if request.values.is_empty() {
        format!("The array is empty, so {} cannot be present.", request.target)
    } else {
        format!(
            "Reached the end of the array without finding {}. Not found.",
            request.target
        )
    };
    steps.push(Step {
        index: steps.len(),
        outcome: StepOutcome::NotFound,
        bounds: None,
        description,
    });
    Trace::from_steps(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Algorithm;
    use proptest::prelude::*;

    fn request(values: Vec<i64>, target: i64) -> SearchRequest {
        SearchRequest::new(values, target, Algorithm::Linear)
    }

    #[test]
    fn finds_target_mid_array() {
        // Scenario A: [1..=9], target 5 -> 5 steps, last Found at index 4.
        let trace = generate_linear(&request((1..=9).collect(), 5));
        assert_eq!(trace.len(), 5);
        assert_eq!(trace.terminal().outcome, StepOutcome::Found { at: 4 });
        for step in &trace.steps()[..4] {
            assert!(matches!(step.outcome, StepOutcome::Searching { .. }));
        }
    }

    #[test]
    fn found_at_first_index_is_single_step() {
        let trace = generate_linear(&request(vec![7, 8, 9], 7));
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.terminal().outcome, StepOutcome::Found { at: 0 });
    }

    #[test]
    fn found_at_last_index_scans_whole_array() {
        let trace = generate_linear(&request(vec![3, 1, 4], 4));
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.terminal().outcome, StepOutcome::Found { at: 2 });
    }

    #[test]
    fn absent_target_yields_n_plus_one_steps() {
        let trace = generate_linear(&request(vec![3, 1, 4], 9));
        assert_eq!(trace.len(), 4);
        assert_eq!(trace.terminal().outcome, StepOutcome::NotFound);
        assert_eq!(trace.terminal().outcome.compared_index(), None);
    }

    #[test]
    fn empty_array_yields_single_not_found_step() {
        // Scenario C.
        let trace = generate_linear(&request(vec![], 5));
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.terminal().outcome, StepOutcome::NotFound);
    }

    #[test]
    fn first_match_wins_with_duplicates() {
        let trace = generate_linear(&request(vec![2, 5, 5, 5], 5));
        assert_eq!(trace.terminal().outcome, StepOutcome::Found { at: 1 });
        assert_eq!(trace.len(), 2);
    }

    #[test]
    fn linear_steps_carry_no_bounds() {
        let trace = generate_linear(&request(vec![1, 2, 3], 9));
        assert!(trace.steps().iter().all(|s| s.bounds.is_none()));
    }

    #[test]
    fn step_indices_are_dense() {
        let trace = generate_linear(&request(vec![1, 2, 3, 4], 4));
        for (i, step) in trace.steps().iter().enumerate() {
            assert_eq!(step.index, i);
        }
    }

    proptest! {
        #[test]
        fn matches_reference_scan(values in prop::collection::vec(-20i64..20, 0..32), target in -20i64..20) {
            let trace = generate_linear(&request(values.clone(), target));
            match values.iter().position(|&v| v == target) {
                Some(first) => {
                    prop_assert_eq!(trace.terminal().outcome, StepOutcome::Found { at: first });
                    prop_assert_eq!(trace.len(), first + 1);
                }
                None => {
                    prop_assert_eq!(trace.terminal().outcome, StepOutcome::NotFound);
                    prop_assert_eq!(trace.len(), values.len() + 1);
                }
            }
        }

        #[test]
        fn only_last_step_is_terminal(values in prop::collection::vec(-20i64..20, 0..32), target in -20i64..20) {
            let trace = generate_linear(&request(values, target));
            let last = trace.last_index();
            for (i, step) in trace.steps().iter().enumerate() {
                prop_assert_eq!(step.outcome.is_terminal(), i == last);
            }
        }
    }
}
