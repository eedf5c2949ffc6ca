
/// Signal identifiers and per-signal rates
pub mod signal;

/// Word assembly shared by the navigation message generators
pub mod navigation;

pub mod gps_l1_ca;
pub mod cnav;
pub mod gps_l2c;
pub mod gps_l5;
pub mod gps_p;
pub mod gps_m;

/// This module contains the chip-level signal generators that combine spreading codes with navigation data
pub mod modulation;

/// This module contains the per-run caches and the per-signal dispatch table
pub mod constellation;

pub mod observation;
pub mod troposphere;
