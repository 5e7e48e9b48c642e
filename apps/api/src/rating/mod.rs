// VA rating math: combined rating calculation and the compensation rate table.
// Pure functions only. No I/O, no configuration.

pub mod combined;
pub mod compensation;

pub use combined::{combination_steps, combine, CombinationStep};
pub use compensation::{monthly_compensation, CompensationDelta};
