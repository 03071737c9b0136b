#![forbid(unsafe_code)]

//! Binary-search step generation.
//!
//! Precondition (enforced upstream by [`crate::validate`]): the request's
//! array is non-decreasing.

use crate::request::SearchRequest;
use crate::step::{Bounds, Step, StepOutcome, Trace};

/// Generate the step trace for a halving search.
///
/// Each iteration emits one `Searching` step carrying the active window and
/// the probe at `low + (high - low) / 2` (overflow-safe form). A match then
/// emits the terminal `Found` step with the same window, so the probe and the
/// verdict are separate observable moments. When the window collapses the
/// terminal `NotFound` step carries the final window with `mid` unset, or no
/// bounds at all when the window fell below index 0 or the array was empty
/// (no representable window exists in either case).
///
/// Trace length is at most `floor(log2(max(n, 1))) + 2`.
#[must_use]
pub fn generate_binary(request: &SearchRequest) -> Trace {
    let values = &request.values;
    let target = request.target;
    let mut steps = Vec::new();

    if values.is_empty() {
        steps.push(Step {
            index: 0,
            outcome: StepOutcome::NotFound,
            bounds: None,
            description: format!("The array is empty, so {target} cannot be present."),
        });
        return Trace::from_steps(steps);
    }

    let mut low = 0usize;
    let mut high = values.len() - 1;

    let final_window = loop {
        let mid = low + (high - low) / 2;
        let value = values[mid];
        let bounds = Bounds {
            low,
            high,
            mid: Some(mid),
        };

        if value == target {
            steps.push(Step {
                index: steps.len(),
                outcome: StepOutcome::Searching { compared: mid },
                bounds: Some(bounds),
                description: format!(
                    "Window is indices {low}..{high}; comparing target {target} \
                     with the midpoint, index {mid}, which holds {value}."
                ),
            });
            steps.push(Step {
                index: steps.len(),
                outcome: StepOutcome::Found { at: mid },
                bounds: Some(bounds),
                description: format!(
                    "Index {mid} holds {value}, equal to the target {target}. Found it!"
                ),
            });
            return Trace::from_steps(steps);
        }

        let (description, next) = if value < target {
            (
                format!(
                    "Window is indices {low}..{high}; the midpoint, index {mid}, holds {value}. \
                     {value} is less than {target}, so the search moves to the right half."
                ),
                window_above(mid, high),
            )
        } else {
            (
                format!(
                    "Window is indices {low}..{high}; the midpoint, index {mid}, holds {value}. \
                     {value} is greater than {target}, so the search moves to the left half."
                ),
                window_below(low, mid),
            )
        };

        steps.push(Step {
            index: steps.len(),
            outcome: StepOutcome::Searching { compared: mid },
            bounds: Some(bounds),
            description,
        });

        match next {
            Window::Open { low: l, high: h } => {
                low = l;
                high = h;
            }
            Window::Collapsed { low, high } => break Some(Bounds { low, high, mid: None }),
            Window::BelowZero => break None,
        }
    };

    let description = match final_window {
        Some(Bounds { low, high, .. }) => format!(
            "The low pointer ({low}) has passed the high pointer ({high}); \
             {target} is not in the array."
        ),
        None => format!("The window has shrunk past the start of the array; {target} is not in it."),
    };
    steps.push(Step {
        index: steps.len(),
        outcome: StepOutcome::NotFound,
        bounds: final_window,
        description,
    });
    Trace::from_steps(steps)
}

enum Window {
    Open { low: usize, high: usize },
    /// `low > high`, both still valid indices into the array.
    Collapsed { low: usize, high: usize },
    /// The high pointer would move below index 0.
    BelowZero,
}

fn window_above(mid: usize, high: usize) -> Window {
    if mid + 1 > high {
        Window::Collapsed { low: mid + 1, high }
    } else {
        Window::Open { low: mid + 1, high }
    }
}

fn window_below(low: usize, mid: usize) -> Window {
    if mid == 0 {
        Window::BelowZero
    } else if low > mid - 1 {
        Window::Collapsed { low, high: mid - 1 }
    } else {
        Window::Open { low, high: mid - 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Algorithm;
    use proptest::prelude::*;

    fn request(values: Vec<i64>, target: i64) -> SearchRequest {
        SearchRequest::new(values, target, Algorithm::Binary)
    }

    fn max_len(n: usize) -> usize {
        (n.max(1) as f64).log2().floor() as usize + 2
    }

    #[test]
    fn scenario_b_two_probes_then_found() {
        // [1,3,5,7,9,11,13,15], target 11: mid 3 (7 < 11), then window 4..7
        // with mid 5 (11). Two probe steps plus the terminal Found at 5.
        let trace = generate_binary(&request(vec![1, 3, 5, 7, 9, 11, 13, 15], 11));
        assert_eq!(trace.len(), 3);

        let first = trace.get(0).unwrap();
        assert_eq!(first.outcome, StepOutcome::Searching { compared: 3 });
        assert_eq!(first.bounds, Some(Bounds { low: 0, high: 7, mid: Some(3) }));

        let second = trace.get(1).unwrap();
        assert_eq!(second.outcome, StepOutcome::Searching { compared: 5 });
        assert_eq!(second.bounds, Some(Bounds { low: 4, high: 7, mid: Some(5) }));

        let last = trace.terminal();
        assert_eq!(last.outcome, StepOutcome::Found { at: 5 });
        assert_eq!(last.bounds, second.bounds);
    }

    #[test]
    fn empty_array_yields_single_not_found_step() {
        // Scenario C.
        let trace = generate_binary(&request(vec![], 5));
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.terminal().outcome, StepOutcome::NotFound);
        assert_eq!(trace.terminal().bounds, None);
    }

    #[test]
    fn single_element_hit_is_probe_plus_found() {
        let trace = generate_binary(&request(vec![7], 7));
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.get(0).unwrap().outcome, StepOutcome::Searching { compared: 0 });
        assert_eq!(trace.terminal().outcome, StepOutcome::Found { at: 0 });
    }

    #[test]
    fn target_below_all_elements() {
        // The window falls below index 0; the terminal step has no bounds.
        let trace = generate_binary(&request(vec![10, 20, 30], 1));
        assert_eq!(trace.terminal().outcome, StepOutcome::NotFound);
        assert_eq!(trace.terminal().bounds, None);
        assert!(trace.terminal().description.contains("past the start"));
    }

    #[test]
    fn target_above_all_elements() {
        let trace = generate_binary(&request(vec![10, 20, 30], 99));
        let terminal = trace.terminal();
        assert_eq!(terminal.outcome, StepOutcome::NotFound);
        let bounds = terminal.bounds.unwrap();
        assert!(bounds.low > bounds.high);
        assert_eq!(bounds.mid, None);
    }

    #[test]
    fn target_between_elements() {
        let trace = generate_binary(&request(vec![1, 3, 5, 7], 4));
        assert_eq!(trace.terminal().outcome, StepOutcome::NotFound);
    }

    #[test]
    fn searching_bounds_keep_mid_in_window() {
        let trace = generate_binary(&request((0..100).map(|i| i * 2).collect(), 37));
        for step in trace.steps() {
            if let Some(Bounds { low, high, mid: Some(mid) }) = step.bounds {
                assert!(low <= mid && mid <= high);
            }
        }
    }

    #[test]
    fn descriptions_reflect_probed_values() {
        let trace = generate_binary(&request(vec![1, 3, 5, 7, 9, 11, 13, 15], 11));
        let first = trace.get(0).unwrap();
        assert!(first.description.contains("index 3"));
        assert!(first.description.contains("less than 11"));
        assert!(trace.terminal().description.contains("Found it!"));
    }

    #[test]
    fn length_bound_examples() {
        for n in [0usize, 1, 2, 3, 7, 8, 9, 100] {
            let values: Vec<i64> = (0..n as i64).collect();
            let trace = generate_binary(&request(values, -1));
            assert!(
                trace.len() <= max_len(n),
                "n={n}: {} > {}",
                trace.len(),
                max_len(n)
            );
        }
    }

    proptest! {
        #[test]
        fn matches_linear_ground_truth(
            mut values in prop::collection::vec(-50i64..50, 0..64),
            target in -50i64..50,
        ) {
            values.sort_unstable();
            let trace = generate_binary(&request(values.clone(), target));
            match trace.terminal().outcome {
                StepOutcome::Found { at } => prop_assert_eq!(values[at], target),
                StepOutcome::NotFound => prop_assert!(!values.contains(&target)),
                StepOutcome::Searching { .. } => prop_assert!(false, "terminal step cannot be Searching"),
            }
        }

        #[test]
        fn length_bound_holds(
            mut values in prop::collection::vec(-50i64..50, 0..64),
            target in -50i64..50,
        ) {
            values.sort_unstable();
            let n = values.len();
            let trace = generate_binary(&request(values, target));
            prop_assert!(trace.len() <= max_len(n));
        }

        #[test]
        fn windows_shrink_monotonically(
            mut values in prop::collection::vec(-50i64..50, 1..64),
            target in -50i64..50,
        ) {
            values.sort_unstable();
            let trace = generate_binary(&request(values, target));
            let mut prev: Option<(usize, usize)> = None;
            for step in trace.steps() {
                if let (StepOutcome::Searching { .. }, Some(Bounds { low, high, mid: Some(_) })) =
                    (step.outcome, step.bounds)
                {
                    if let Some((plow, phigh)) = prev {
                        prop_assert!(low >= plow && high <= phigh);
                        prop_assert!((high - low) < (phigh - plow));
                    }
                    prev = Some((low, high));
                }
            }
        }
    }
}
