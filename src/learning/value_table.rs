//! State → action value table.
//!
//! Every state row is a fixed-size array indexed by [`ActionId::index`], so a
//! row is always complete: the first reference to a state inserts a row of
//! zeros for the whole catalog.
//!
//! On disk the table is a JSON object of objects:
//!
//! ```json
//! { "RHYTHM_normal|HEALTH_healthy|...": { "deep_work_mode": 0.12, "none": 0.0, ... } }
//! ```

use std::collections::{BTreeMap, HashMap};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::actions::ActionId;

/// Values for every action in one state.
pub type ActionValues = [f64; ActionId::COUNT];

type TableDocument = BTreeMap<String, BTreeMap<String, f64>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "TableDocument", into = "TableDocument")]
pub struct ValueTable {
    rows: HashMap<String, ActionValues>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row for `state`, inserting zeros on first reference.
    pub fn row_mut(&mut self, state: &str) -> &mut ActionValues {
        self.rows
            .entry(state.to_string())
            .or_insert([0.0; ActionId::COUNT])
    }

    pub fn row(&self, state: &str) -> Option<&ActionValues> {
        self.rows.get(state)
    }

    pub fn value(&self, state: &str, action: ActionId) -> f64 {
        self.row(state).map_or(0.0, |row| row[action.index()])
    }

    pub fn contains(&self, state: &str) -> bool {
        self.rows.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }
}

/// Highest-valued action; ties go to the earliest in catalog order.
pub fn best_of(row: &ActionValues) -> ActionId {
    let mut best = 0;
    for (i, v) in row.iter().enumerate().skip(1) {
        if *v > row[best] {
            best = i;
        }
    }
    ActionId::ALL[best]
}

/// Largest value in a row.
pub fn max_of(row: &ActionValues) -> f64 {
    row.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

impl From<TableDocument> for ValueTable {
    fn from(doc: TableDocument) -> Self {
        let mut rows = HashMap::with_capacity(doc.len());
        for (state, values) in doc {
            let mut row = [0.0; ActionId::COUNT];
            for (name, value) in values {
                match name.parse::<ActionId>() {
                    Ok(action) => row[action.index()] = value,
                    Err(_) => warn!("Skipping unknown action {:?} in state {}", name, state),
                }
            }
            rows.insert(state, row);
        }
        Self { rows }
    }
}

impl From<ValueTable> for TableDocument {
    fn from(table: ValueTable) -> Self {
        table
            .rows
            .into_iter()
            .map(|(state, row)| {
                let values = ActionId::ALL
                    .iter()
                    .map(|a| (a.as_str().to_string(), row[a.index()]))
                    .collect();
                (state, values)
            })
            .collect()
    }
}
