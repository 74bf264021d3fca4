pub mod weapon_bases;

pub use weapon_bases::{WeaponBase, WeaponBaseDatabase};
