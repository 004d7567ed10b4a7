pub mod indicators;
pub mod risk;
pub mod strategy;


pub use indicators::*;
pub use risk::*;
pub use strategy::*;
