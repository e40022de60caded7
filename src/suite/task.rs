//! Suite tree model
//!
//! A collected test file is a tree of suites and tests. Only the name, the
//! kind and the concurrency flag matter to scheduling.

use serde::{Deserialize, Serialize};

/// Separator between the names of a task and its ancestors
pub const NAME_SEPARATOR: &str = " > ";

/// Kind of task in a suite tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// A single test case
    #[default]
    Test,
    /// A group of tasks
    Suite,
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskKind::Test => write!(f, "test"),
            TaskKind::Suite => write!(f, "suite"),
        }
    }
}

/// A suite or test, with its children in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Display name (may be empty for anonymous file-level suites)
    #[serde(default)]
    pub name: String,

    /// Test or suite
    #[serde(default, rename = "type")]
    pub kind: TaskKind,

    /// Run concurrently with adjacent concurrent siblings.
    /// None means inherit from the parent suite.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrent: Option<bool>,

    /// Children in declaration order (suites only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<Task>,
}

impl Task {
    /// Create a test case
    pub fn test(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TaskKind::Test,
            concurrent: None,
            tasks: Vec::new(),
        }
    }

    /// Create a suite holding `tasks`
    pub fn suite(name: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            name: name.into(),
            kind: TaskKind::Suite,
            concurrent: None,
            tasks,
        }
    }

    /// Set the concurrency flag
    pub fn with_concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = Some(concurrent);
        self
    }

    pub fn is_suite(&self) -> bool {
        self.kind == TaskKind::Suite
    }

    /// Effective concurrency flag; unset means sequential
    pub fn is_concurrent(&self) -> bool {
        self.concurrent.unwrap_or(false)
    }

    /// Resolve unset concurrency flags from the enclosing suite.
    ///
    /// `default` applies to this task when its own flag is unset; every
    /// descendant without a flag takes its parent's effective value.
    pub fn inherit_concurrency(&mut self, default: bool) {
        let mut pending: Vec<(&mut Task, bool)> = vec![(self, default)];

        while let Some((task, parent)) = pending.pop() {
            let effective = task.concurrent.unwrap_or(parent);
            task.concurrent = Some(effective);
            for child in task.tasks.iter_mut() {
                pending.push((child, effective));
            }
        }
    }

    /// Full names of every descendant, depth-first in declaration order.
    ///
    /// Each name is the chain of non-empty ancestor names (this task
    /// included) joined with [`NAME_SEPARATOR`].
    pub fn full_names(&self) -> Vec<(String, &Task)> {
        let mut names = Vec::new();
        let root: Vec<&str> = if self.name.is_empty() {
            Vec::new()
        } else {
            vec![self.name.as_str()]
        };

        let mut pending: Vec<(Vec<&str>, &Task)> = self
            .tasks
            .iter()
            .rev()
            .map(|child| (root.clone(), child))
            .collect();

        while let Some((mut ancestry, task)) = pending.pop() {
            if !task.name.is_empty() {
                ancestry.push(task.name.as_str());
            }
            names.push((full_name(&ancestry), task));
            for child in task.tasks.iter().rev() {
                pending.push((ancestry.clone(), child));
            }
        }

        names
    }

    /// Number of test cases in this subtree
    pub fn test_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(task) = pending.pop() {
            if task.kind == TaskKind::Test {
                count += 1;
            }
            pending.extend(task.tasks.iter());
        }
        count
    }
}

/// Join a chain of task names, outermost first. Empty names are skipped.
pub fn full_name(names: &[&str]) -> String {
    let named: Vec<&str> = names.iter().copied().filter(|name| !name.is_empty()).collect();
    named.join(NAME_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file() -> Task {
        Task::suite(
            "math.test.ts",
            vec![
                Task::suite(
                    "add",
                    vec![Task::test("positive"), Task::test("negative").with_concurrent(false)],
                )
                .with_concurrent(true),
                Task::test("sub"),
            ],
        )
    }

    #[test]
    fn test_full_names() {
        let file = sample_file();
        let names: Vec<String> = file.full_names().into_iter().map(|(name, _)| name).collect();

        assert_eq!(
            names,
            vec![
                "math.test.ts > add",
                "math.test.ts > add > positive",
                "math.test.ts > add > negative",
                "math.test.ts > sub",
            ]
        );
    }

    #[test]
    fn test_full_names_skip_empty() {
        let file = Task::suite("", vec![Task::suite("", vec![Task::test("only")])]);
        let names: Vec<String> = file.full_names().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["", "only"]);
    }

    #[test]
    fn test_full_name_anonymous_file_suite() {
        assert_eq!(full_name(&["", "t0"]), "t0");
        assert_eq!(full_name(&["file.test.ts", "", "t0"]), "file.test.ts > t0");
        assert_eq!(full_name(&[]), "");
    }

    #[test]
    fn test_inherit_concurrency() {
        let mut file = sample_file();
        file.inherit_concurrency(false);

        assert_eq!(file.concurrent, Some(false));
        let add = &file.tasks[0];
        assert_eq!(add.concurrent, Some(true));
        // inherits from "add"
        assert_eq!(add.tasks[0].concurrent, Some(true));
        // explicit flag kept
        assert_eq!(add.tasks[1].concurrent, Some(false));
        // inherits from the file
        assert_eq!(file.tasks[1].concurrent, Some(false));
    }

    #[test]
    fn test_test_count() {
        assert_eq!(sample_file().test_count(), 3);
    }

    #[test]
    fn test_deserialize_defaults() {
        let task: Task = serde_json::from_str(
            r#"{"name": "root", "type": "suite", "tasks": [{"name": "a", "concurrent": true}]}"#,
        )
        .unwrap();

        assert!(task.is_suite());
        assert_eq!(task.concurrent, None);
        assert_eq!(task.tasks[0].kind, TaskKind::Test);
        assert!(task.tasks[0].is_concurrent());
    }
}
