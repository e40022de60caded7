//! Consecutive-run partitioning
//!
//! Sibling tasks are scheduled in batches: a run of adjacent concurrent
//! tasks executes together, a run of sequential tasks executes one by one.
//! Batches keep declaration order; tasks are never reordered or dropped.

use serde::Serialize;

use super::task::Task;

/// A maximal run of sibling tasks sharing a concurrency flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Batch<'a> {
    /// Concurrency flag shared by every task in the batch
    pub concurrent: bool,
    /// Tasks in declaration order (never empty)
    pub tasks: Vec<&'a Task>,
}

impl Batch<'_> {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Split `items` into maximal runs of adjacent elements with equal keys.
///
/// An item joins the open run when its key equals the key of the run's
/// first item; otherwise the run is closed and a new one starts.
pub fn partition_runs<T, K, F>(items: &[T], mut key: F) -> Vec<Vec<&T>>
where
    F: FnMut(&T) -> K,
    K: PartialEq,
{
    let mut runs: Vec<Vec<&T>> = Vec::new();
    let mut current: Vec<&T> = Vec::new();
    let mut current_key: Option<K> = None;

    for item in items {
        let item_key = key(item);
        let starts_new = matches!(&current_key, Some(open) if *open != item_key);

        if starts_new {
            runs.push(std::mem::take(&mut current));
        }
        if starts_new || current_key.is_none() {
            current_key = Some(item_key);
        }
        current.push(item);
    }

    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

/// Group a suite's direct children by consecutive concurrency flag.
pub fn partition_suite_children(suite: &Task) -> Vec<Vec<&Task>> {
    partition_runs(&suite.tasks, Task::is_concurrent)
}

/// Same runs as [`partition_suite_children`], labelled with their flag.
pub fn batches(suite: &Task) -> Vec<Batch<'_>> {
    let batches: Vec<Batch<'_>> = partition_suite_children(suite)
        .into_iter()
        .filter_map(|tasks| {
            let concurrent = tasks.first()?.is_concurrent();
            Some(Batch { concurrent, tasks })
        })
        .collect();

    tracing::debug!(
        suite = %suite.name,
        children = suite.tasks.len(),
        batches = batches.len(),
        "partitioned suite children"
    );

    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(pattern: &[bool]) -> Task {
        Task::suite(
            "suite",
            pattern
                .iter()
                .enumerate()
                .map(|(i, flag)| Task::test(format!("t{}", i)).with_concurrent(*flag))
                .collect(),
        )
    }

    fn group_flags(groups: &[Vec<&Task>]) -> Vec<Vec<bool>> {
        groups
            .iter()
            .map(|g| g.iter().map(|t| t.is_concurrent()).collect())
            .collect()
    }

    #[test]
    fn test_alternating_runs() {
        let suite = flags(&[true, true, false, false, false, true]);
        let groups = partition_suite_children(&suite);

        assert_eq!(
            group_flags(&groups),
            vec![vec![true, true], vec![false, false, false], vec![true]]
        );
    }

    #[test]
    fn test_concatenation_reproduces_input() {
        let suite = flags(&[false, true, true, false, true]);
        let groups = partition_suite_children(&suite);

        let names: Vec<&str> = groups
            .iter()
            .flatten()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["t0", "t1", "t2", "t3", "t4"]);
    }

    #[test]
    fn test_empty_and_single() {
        assert!(partition_suite_children(&flags(&[])).is_empty());

        let suite = flags(&[true]);
        let groups = partition_suite_children(&suite);
        assert_eq!(group_flags(&groups), vec![vec![true]]);
    }

    #[test]
    fn test_unset_flag_groups_with_sequential() {
        let suite = Task::suite(
            "suite",
            vec![
                Task::test("a"),
                Task::test("b").with_concurrent(false),
                Task::test("c").with_concurrent(true),
            ],
        );
        let groups = partition_suite_children(&suite);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_runs_compare_key_only() {
        let items = [1, 3, 5, 2, 4, 7];
        let runs = partition_runs(&items, |n| n % 2);
        assert_eq!(runs, vec![vec![&1, &3, &5], vec![&2, &4], vec![&7]]);
    }

    #[test]
    fn test_batches_labelled() {
        let suite = flags(&[false, true, true]);
        let batches = batches(&suite);

        assert_eq!(batches.len(), 2);
        assert!(!batches[0].concurrent);
        assert!(batches[1].concurrent);
        assert_eq!(batches[1].len(), 2);
        assert!(batches.iter().all(|b| !b.is_empty()));
    }
}
