//! Tabular self-play learning
//!
//! Both players of a self-play game read and write one shared
//! [`ValueTable`]. An [`EpisodeSimulator`] plays a full game with an
//! ε-greedy policy, and a [`CreditAssignment`] strategy then walks the
//! recorded history backwards, nudging every visited state-action value
//! toward a discounted terminal reward.
//!
//! ## Usage Example
//!
//! ```
//! use rand::{SeedableRng, rngs::StdRng};
//! use xxo::{
//!     app::LearningConfig,
//!     q_learning::{EpisodeSimulator, ValueTable},
//! };
//!
//! let config = LearningConfig::default();
//! let simulator = EpisodeSimulator::new(config.clone())?;
//! let mut table = ValueTable::new(config.action_space());
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! for _ in 0..100 {
//!     simulator.run(&mut table, &mut rng)?;
//! }
//! assert!(table.values("---------X").is_some());
//! # Ok::<(), xxo::Error>(())
//! ```

pub mod credit;
pub mod episode;
pub mod value_table;

pub use credit::{CreditAssignment, RewardSchedule, assign_for_player};
pub use episode::{Episode, EpisodeHistory, EpisodeSimulator, Step};
pub use value_table::ValueTable;
