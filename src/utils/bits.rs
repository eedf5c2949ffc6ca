
// Integer and scaled-float to big-endian bit arrays, one 0/1 value per byte.
// Scale factors follow IS-GPS-200 / IS-GPS-705; callers pass the power of two.

use std::f64::consts;

/// Two's complement big-endian encoding of `value` over exactly `bit_count` bits.
/// Out-of-range values wrap silently, the same way a fixed-width ICD field would.
pub fn dec2bin(value:i64, bit_count:usize) -> Vec<u8> {
	(0..bit_count).rev().map(|shift| {
		if shift >= 64 { if value < 0 { 1 } else { 0 } }
		else { ((value >> shift) & 1) as u8 }
	}).collect()
}

/// Round `value * 2^pow2` to the nearest integer.
pub fn scale(value:f64, pow2:i32) -> i64 {
	(value * 2.0_f64.powi(pow2)).round() as i64
}

/// Radians to semicircles.
pub fn semicircles(rad:f64) -> f64 { rad / consts::PI }

/// Bits of `value` scaled by `2^pow2`, the usual form of an ICD field with LSB `2^-pow2`.
pub fn scaled(value:f64, pow2:i32, bit_count:usize) -> Vec<u8> {
	dec2bin(scale(value, pow2), bit_count)
}

/// Alternating 1/0 pattern used to fill reserved or unavailable fields.
pub fn filler(bit_count:usize) -> Vec<u8> {
	(0..bit_count).map(|i| if i % 2 == 0 { 1 } else { 0 }).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::utils::bits_to_int;
	use rand::Rng;

	#[test]
	fn fixed_values() {
		assert_eq!(dec2bin(0x8B, 8), vec![1, 0, 0, 0, 1, 0, 1, 1]);
		assert_eq!(dec2bin(-1, 4), vec![1, 1, 1, 1]);
		assert_eq!(dec2bin(5, 6), vec![0, 0, 0, 1, 0, 1]);
		// 9 does not fit in a signed nibble, so it wraps to -7
		assert_eq!(dec2bin(9, 4), vec![1, 0, 0, 1]);
		assert_eq!(bits_to_int::to_i64(&dec2bin(9, 4)).unwrap(), -7);
	}

	#[test]
	fn scaled_values_recover_within_one_lsb() {
		let mut rng = rand::thread_rng();
		for _ in 0..500 {
			// Mean anomaly in semicircles, 32 bits with LSB 2^-31
			let m0:f64 = rng.gen_range(-1.0, 1.0 - 2.0_f64.powi(-31));
			let bits = scaled(m0, 31, 32);
			let back = (bits_to_int::to_i64(&bits).unwrap() as f64) * 2.0_f64.powi(-31);
			assert!((back - m0).abs() <= 2.0_f64.powi(-32) + 1e-15);

			// Clock bias, 22 bits with LSB 2^-31
			let af0:f64 = rng.gen_range(-9.0e-4, 9.0e-4);
			let bits = scaled(af0, 31, 22);
			let back = (bits_to_int::to_i64(&bits).unwrap() as f64) * 2.0_f64.powi(-31);
			assert!((back - af0).abs() <= 2.0_f64.powi(-32) + 1e-18);
		}
	}

	#[test]
	fn filler_alternates() {
		assert_eq!(filler(5), vec![1, 0, 1, 0, 1]);
	}
}
