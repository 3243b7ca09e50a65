//! # Sort order for todos
//!
//! Todos sort for display by the first rule that tells them apart:
//!
//! 1. Open todos before done todos.
//! 2. Priority, `A` first. The default priority (`O`) is just another letter.
//! 3. Completion date, missing first, then earlier first; ties broken by the
//!    `dtime` metadata value.
//! 4. Creation date, missing first, then earlier first; ties broken by the
//!    `ctime` metadata value.
//! 5. The `id` metadata value.
//! 6. The description text.
//!
//! Every rule compares optional values with "missing" sorting first, so the
//! order is total. Todos that agree on all six rules are finally compared on
//! the remaining fields, which keeps `Ord` consistent with `Eq`.

use crate::grammar::{CTIME_KEY, DTIME_KEY};
use crate::model::Todo;
use std::cmp::Ordering;

const ID_KEY: &str = "id";

impl Ord for Todo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.done()
            .cmp(&other.done())
            .then_with(|| self.priority().cmp(&other.priority()))
            .then_with(|| self.done_date().cmp(&other.done_date()))
            .then_with(|| compare_metadata(self, other, DTIME_KEY))
            .then_with(|| self.create_date().cmp(&other.create_date()))
            .then_with(|| compare_metadata(self, other, CTIME_KEY))
            .then_with(|| compare_metadata(self, other, ID_KEY))
            .then_with(|| self.desc().cmp(other.desc()))
            .then_with(|| compare_remaining(self, other))
    }
}

impl PartialOrd for Todo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare_metadata(a: &Todo, b: &Todo, key: &str) -> Ordering {
    a.metadata_value(key).cmp(&b.metadata_value(key))
}

fn compare_remaining(a: &Todo, b: &Todo) -> Ordering {
    a.contexts()
        .cmp(b.contexts())
        .then_with(|| a.projects().cmp(b.projects()))
        .then_with(|| a.epics().cmp(b.epics()))
        .then_with(|| a.metadata().cmp(b.metadata()))
}
