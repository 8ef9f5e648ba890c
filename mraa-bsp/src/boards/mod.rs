//! Per-board pin tables and initializers

#[cfg(feature = "roscube-x-580")]
pub mod roscube_x_580;
