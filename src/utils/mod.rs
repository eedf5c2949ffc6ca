
pub mod bits;
pub mod bits_to_int;
pub mod kinematics;
pub mod sync;

use std::f64::consts;

/// Wrap an angle into (-pi, pi].
pub fn normalize_angle(rad:f64) -> f64 {
	let wrapped = rad.rem_euclid(2.0 * consts::PI);
	if wrapped > consts::PI { wrapped - 2.0 * consts::PI } else { wrapped }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn angles_land_in_half_open_range() {
		assert!((normalize_angle(3.0 * consts::PI) - consts::PI).abs() < 1e-12);
		assert!((normalize_angle(-consts::PI) - consts::PI).abs() < 1e-12);
		assert!((normalize_angle(0.5) - 0.5).abs() < 1e-12);
		assert!((normalize_angle(-7.0) - (-7.0 + 2.0 * consts::PI)).abs() < 1e-12);
	}
}
