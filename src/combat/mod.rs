//! Combat resolution.
//!
//! Dice, activation rolls, target selection and the per-turn loop that ties
//! them together. Every function that rolls dice takes the generator as an
//! argument so battles replay exactly from a seed.

pub mod activation;
pub mod dice;
pub mod targeting;
pub mod turn;

pub use activation::activation_chance;
pub use dice::{
    chance_at_least, dice_count, roll_d6, AttackProfile, MELEE_DEFENSE_THRESHOLD,
    RANGED_DEFENSE_THRESHOLD,
};
pub use targeting::{find_target, TargetScoring};
pub use turn::{TurnEvent, TurnReport};
