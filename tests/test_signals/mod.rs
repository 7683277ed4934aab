pub mod generate;

pub use generate::{constant, interleave, ramp, tone};
