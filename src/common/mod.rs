mod fs;
mod round;

pub(crate) use fs::*;
pub use round::round_half_up;
