//! Shared data types for the Grimoire habit game.
//!
//! Pure serde shapes with no behavior beyond construction helpers and a few
//! state accessors. All game rules (leveling, cooldowns, goal claims) live
//! in `grimoire-core`; the UI layer consumes these types directly.

pub mod formatting;
pub mod goal;
pub mod rewards;
pub mod spell;
pub mod task;
pub mod wizard;

// Re-exports for convenience
pub use goal::{Goal, GoalKind};
pub use rewards::Rewards;
pub use spell::{Spell, UnlockRequirement};
pub use task::{RecurrenceKind, Task};
pub use wizard::Wizard;
