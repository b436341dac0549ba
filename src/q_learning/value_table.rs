//! State-action value table for tabular self-play learning

use std::collections::{HashMap, hash_map::Entry};

use serde::{Deserialize, Serialize};

use crate::types::StateKey;

/// Value table mapping each state key to one value per action.
///
/// Every stored vector has exactly [`ValueTable::action_space`] entries.
/// States that were never written read as all-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTable {
    /// state -> value of each row-major cell index
    values: HashMap<StateKey, Vec<f64>>,
    /// Number of actions per state
    action_space: usize,
}

impl ValueTable {
    /// Create an empty table for a board with `action_space` cells
    pub fn new(action_space: usize) -> Self {
        Self {
            values: HashMap::new(),
            action_space,
        }
    }

    pub fn action_space(&self) -> usize {
        self.action_space
    }

    /// Stored values for a state, if the state has been seen
    pub fn values(&self, state: &str) -> Option<&[f64]> {
        self.values.get(state).map(Vec::as_slice)
    }

    /// Value of a state-action pair, zero when unseen
    pub fn value(&self, state: &str, action: usize) -> f64 {
        self.values(state).map_or(0.0, |values| values[action])
    }

    /// Values of a state, inserting an all-zero vector first if it is unseen
    pub fn get_or_init(&mut self, state: &StateKey) -> &mut [f64] {
        let action_space = self.action_space;
        match self.values.entry(state.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(vec![0.0; action_space]),
        }
    }

    /// Insert a full value vector for a state, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ActionSpaceMismatch`] if `values` does not have
    /// one entry per action.
    pub fn insert(&mut self, state: StateKey, values: Vec<f64>) -> Result<(), crate::Error> {
        if values.len() != self.action_space {
            return Err(crate::Error::ActionSpaceMismatch {
                expected: self.action_space,
                found: values.len(),
            });
        }
        self.values.insert(state, values);
        Ok(())
    }

    /// Select the greedy action (highest value) among legal actions.
    ///
    /// Ties go to the action listed first. Returns `None` only when there are
    /// no legal actions.
    pub fn best_action(&self, state: &str, legal_actions: &[usize]) -> Option<usize> {
        let values = self.values(state);
        let mut best: Option<(usize, f64)> = None;
        for &action in legal_actions {
            let value = values.map_or(0.0, |values| values[action]);
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((action, value));
            }
        }
        best.map(|(action, _)| action)
    }

    /// Add `delta` to a state-action value, inserting the state if absent
    pub fn update(&mut self, state: &StateKey, action: usize, delta: f64) {
        self.get_or_init(state)[action] += delta;
    }

    /// Temporal difference step toward `target`
    ///
    /// Q(s,a) ← Q(s,a) + α[target - Q(s,a)]
    ///
    /// Returns the new value.
    pub fn td_update(
        &mut self,
        state: &StateKey,
        action: usize,
        target: f64,
        learning_rate: f64,
    ) -> f64 {
        let value = &mut self.get_or_init(state)[action];
        *value += learning_rate * (target - *value);
        *value
    }

    /// Iterate over all stored states and their values
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &[f64])> {
        self.values
            .iter()
            .map(|(state, values)| (state, values.as_slice()))
    }

    /// Get total number of states stored
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Average several tables into one.
    ///
    /// Each state's vector is the element-wise mean over only the tables that
    /// contain that state. Tables are folded in iteration order, so a fixed
    /// input order gives a bit-identical result. `action_space` is used when
    /// there are no tables at all.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ActionSpaceMismatch`] if the tables disagree on
    /// the action space.
    pub fn merge_mean<I>(tables: I, action_space: usize) -> Result<ValueTable, crate::Error>
    where
        I: IntoIterator<Item = ValueTable>,
    {
        let mut sums: HashMap<StateKey, (Vec<f64>, usize)> = HashMap::new();
        for table in tables {
            if table.action_space != action_space {
                return Err(crate::Error::ActionSpaceMismatch {
                    expected: action_space,
                    found: table.action_space,
                });
            }
            for (state, values) in table.values {
                match sums.entry(state) {
                    Entry::Occupied(mut entry) => {
                        let (sum, count) = entry.get_mut();
                        sum.iter_mut().zip(&values).for_each(|(s, v)| *s += v);
                        *count += 1;
                    }
                    Entry::Vacant(entry) => {
                        entry.insert((values, 1));
                    }
                }
            }
        }

        let values = sums
            .into_iter()
            .map(|(state, (mut sum, count))| {
                let divisor = count as f64;
                sum.iter_mut().for_each(|v| *v /= divisor);
                (state, sum)
            })
            .collect();

        Ok(ValueTable {
            values,
            action_space,
        })
    }
}
