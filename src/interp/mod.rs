//! Fractional-delay filter bank and 1-D sample-set interpolators.

mod filter_bank;
mod interp_set;

pub use filter_bank::{bessel_i0, FilterBank, FilterRow, InterpError, DEFAULT_FILTER_BANK};
pub use interp_set::InterpSet;
