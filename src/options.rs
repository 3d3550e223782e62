//! Cascading selection helpers: class -> topic -> question.
//!
//! The data side of question selection. Each helper returns sorted distinct
//! values straight from the dataset, so a caller's menus always use the
//! exact text the file contains; empty and missing cells are skipped.

use std::collections::BTreeSet;

use crate::dataset::{cell, Dataset};

/// Distinct survey classes, sorted.
pub fn class_options(dataset: &Dataset) -> Vec<String> {
    let Some(class_col) = dataset.column("Class") else {
        return Vec::new();
    };
    distinct_where(dataset, class_col, |_| true)
}

/// Distinct topics within a class, sorted. Unknown class yields nothing.
pub fn topic_options(dataset: &Dataset, class: &str) -> Vec<String> {
    if class.is_empty() {
        return Vec::new();
    }
    let (Some(class_col), Some(topic_col)) = (dataset.column("Class"), dataset.column("Topic"))
    else {
        return Vec::new();
    };
    distinct_where(dataset, topic_col, |row| cell(row, Some(class_col)) == class)
}

/// Distinct questions within a (class, topic) pair, sorted.
pub fn question_options(dataset: &Dataset, class: &str, topic: &str) -> Vec<String> {
    if class.is_empty() || topic.is_empty() {
        return Vec::new();
    }
    let (Some(class_col), Some(topic_col), Some(question_col)) = (
        dataset.column("Class"),
        dataset.column("Topic"),
        dataset.column("Question"),
    ) else {
        return Vec::new();
    };
    distinct_where(dataset, question_col, |row| {
        cell(row, Some(class_col)) == class && cell(row, Some(topic_col)) == topic
    })
}

fn distinct_where<F>(dataset: &Dataset, col: usize, keep: F) -> Vec<String>
where
    F: Fn(&[String]) -> bool,
{
    let mut seen = BTreeSet::new();
    for row in dataset.rows() {
        if !keep(row) {
            continue;
        }
        let value = cell(row, Some(col));
        if value.is_empty() {
            continue;
        }
        seen.insert(value.to_string());
    }
    seen.into_iter().collect()
}
