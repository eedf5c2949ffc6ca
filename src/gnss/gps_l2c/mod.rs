pub const CM_CODE_LENGTH:usize = 10_230;
pub const CL_CODE_LENGTH:usize = 767_250;

/// CM and CL chips are interleaved, so the composite L2C chip rate is twice each code's rate
pub const CHIP_RATE_HZ:u64 = 1_023_000;

pub mod signal_modulation;

pub use signal_modulation::{cm_code, cl_code};
