//! ε-greedy tabular Q-learner.

use log::{debug, error, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::store::ValueTableStore;
use super::value_table::{best_of, max_of, ActionValues, ValueTable};
use crate::actions::ActionId;
use crate::config::LearnerConfig;
use crate::error::StoreError;

/// Value-table learner.
///
/// Not internally synchronized; the owner serializes access.
#[derive(Debug)]
pub struct QLearner {
    config: LearnerConfig,
    epsilon: f64,
    table: ValueTable,
    store: Box<dyn ValueTableStore>,
    rng: StdRng,
}

impl QLearner {
    /// Build a learner and load its table from `store`.
    ///
    /// A failed load is logged and the learner starts from an empty table.
    /// An initial epsilon below `min_epsilon` lowers the floor to match.
    pub fn new(mut config: LearnerConfig, store: Box<dyn ValueTableStore>) -> Self {
        if config.epsilon < config.min_epsilon {
            warn!(
                "epsilon {} is below min_epsilon {}, lowering the floor",
                config.epsilon, config.min_epsilon
            );
            config.min_epsilon = config.epsilon;
        }

        let table = match store.load() {
            Ok(table) => {
                debug!("Loaded value table with {} states", table.len());
                table
            }
            Err(e) => {
                warn!("Could not load value table, starting empty: {}", e);
                ValueTable::new()
            }
        };

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            epsilon: config.epsilon,
            config,
            table,
            store,
            rng,
        }
    }

    /// ε-greedy choice for `state`.
    pub fn select(&mut self, state: &str) -> ActionId {
        if self.rng.gen::<f64>() < self.epsilon {
            let i = self.rng.gen_range(0..ActionId::COUNT);
            return ActionId::ALL[i];
        }
        self.greedy(state)
    }

    /// Highest-valued action for `state`, without exploration.
    pub fn greedy(&mut self, state: &str) -> ActionId {
        best_of(self.table.row_mut(state))
    }

    /// Temporal-difference update.
    ///
    /// `target = reward` for a terminal step, else
    /// `reward + gamma * max(next_state)`.  Decays epsilon and persists the
    /// whole table.  Returns the new value.
    pub fn update(
        &mut self,
        state: &str,
        action: ActionId,
        reward: f64,
        next_state: Option<&str>,
    ) -> f64 {
        let target = match next_state {
            Some(next) => reward + self.config.gamma * max_of(self.table.row_mut(next)),
            None => reward,
        };

        let alpha = self.config.alpha;
        let cell = &mut self.table.row_mut(state)[action.index()];
        let updated = *cell + alpha * (target - *cell);
        *cell = updated;

        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.min_epsilon);
        trace!("Updated Q({}, {}) = {:.4}, epsilon {:.4}", state, action, updated, self.epsilon);

        if let Err(e) = self.save() {
            error!("Failed to save value table: {}", e);
        }
        updated
    }

    /// Persist the table now.
    pub fn save(&self) -> Result<(), StoreError> {
        self.store.save(&self.table)
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Override the exploration rate, e.g. 0.0 for evaluation runs.
    ///
    /// A rate below `min_epsilon` lowers the floor with it, so later
    /// updates never raise epsilon again.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
        if self.epsilon < self.config.min_epsilon {
            self.config.min_epsilon = self.epsilon;
        }
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    /// Row for `state`, if it has been referenced.
    pub fn q_values(&self, state: &str) -> Option<ActionValues> {
        self.table.row(state).copied()
    }

    pub fn best_action(&self, state: &str) -> Option<ActionId> {
        self.table.row(state).map(best_of)
    }

    pub fn state_count(&self) -> usize {
        self.table.len()
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }
}
