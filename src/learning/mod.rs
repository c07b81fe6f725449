//! Tabular reinforcement learning fallback.
//!
//! ```text
//! select(s):  ε  → uniform random action
//!             1-ε → argmax Q(s, ·), ties to the first action in catalog order
//!
//! update(s, a, r, s'):
//!     target  = r                      (no s')
//!             = r + γ · max Q(s', ·)   (otherwise)
//!     Q(s, a) ← Q(s, a) + α · (target − Q(s, a))
//!     ε       ← max(ε_min, ε · ε_decay)
//!     persist the whole table
//! ```

pub mod learner;
pub mod store;
pub mod value_table;

pub use learner::QLearner;
pub use store::{JsonFileStore, MemoryStore, ValueTableStore};
pub use value_table::{ActionValues, ValueTable};
