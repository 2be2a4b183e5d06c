use rayon::prelude::*;

/// Outcome of one unit of work, tagged with the target it ran for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome<T> {
    pub function_name: String,
    pub result: Result<T, String>,
}

/// Run one unit of work per target on a dedicated bounded worker pool.
///
/// Every target's outcome is captured individually and collected at a single
/// point, in dispatch order; a failing target never interrupts its siblings,
/// and the call returns only after the full set has completed.
pub fn run_for_each_target<T, F>(
    targets: Vec<String>,
    pool_size: usize,
    work: F,
) -> Result<Vec<TargetOutcome<T>>, String>
where
    T: Send,
    F: Fn(&str) -> Result<T, String> + Sync,
{
    if targets.is_empty() {
        return Ok(Vec::new());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(pool_size)
        .build()
        .map_err(|error| format!("failed to build worker pool: {error}"))?;

    Ok(pool.install(|| {
        targets
            .par_iter()
            .map(|function_name| TargetOutcome {
                function_name: function_name.clone(),
                result: work(function_name),
            })
            .collect()
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    fn targets(count: usize) -> Vec<String> {
        (0..count).map(|index| format!("function-{index}")).collect()
    }

    #[test]
    fn outcomes_keep_dispatch_order() {
        let outcomes = run_for_each_target(targets(5), 3, |name| Ok::<_, String>(name.len()))
            .expect("pool should run");

        let names: Vec<&str> = outcomes
            .iter()
            .map(|outcome| outcome.function_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "function-0",
                "function-1",
                "function-2",
                "function-3",
                "function-4"
            ]
        );
    }

    #[test]
    fn one_failure_never_cancels_siblings() {
        let outcomes = run_for_each_target(targets(4), 2, |name| {
            if name == "function-2" {
                Err("boom".to_string())
            } else {
                Ok(())
            }
        })
        .expect("pool should run");

        assert_eq!(outcomes.len(), 4);
        assert_eq!(
            outcomes
                .iter()
                .filter(|outcome| outcome.result.is_ok())
                .count(),
            3
        );
        assert_eq!(outcomes[2].result, Err("boom".to_string()));
    }

    #[test]
    fn in_flight_work_never_exceeds_pool_size() {
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        run_for_each_target(targets(8), 2, |_| {
            let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(current, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok::<_, String>(())
        })
        .expect("pool should run");

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn empty_target_list_completes_without_a_pool() {
        let outcomes = run_for_each_target(Vec::new(), 4, |_| Ok::<_, String>(()))
            .expect("pool should run");

        assert!(outcomes.is_empty());
    }
}
