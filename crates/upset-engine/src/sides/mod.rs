//! Side A (favorite weakness) and Side B (underdog strength) scoring.

pub mod calculator;

pub use calculator::{SideCalculator, SideScore};
