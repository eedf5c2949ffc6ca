// The M code itself is not public, so this module produces a stand-in with the same
// spectral shape: a deterministic pseudo-random spreading sequence at 5.115 Mcps on a
// BOC(10,5) square-wave subcarrier, sampled at twice the subcarrier rate.

use crate::{GnssSimErr, Result};

pub const SPREADING_RATE_HZ:u64 = 5_115_000;
pub const SUBCARRIER_RATE_HZ:u64 = 10_230_000;

/// Samples per second of the stand-in: one per subcarrier half period
pub const SAMPLE_RATE_HZ:u64 = 2 * SUBCARRIER_RATE_HZ;

const SAMPLES_PER_SPREADING_CHIP:i64 = (SAMPLE_RATE_HZ / SPREADING_RATE_HZ) as i64;

pub const MAX_PRN:u8 = 63;

// splitmix64 finalizer; random access keeps arbitrary time slices consistent
fn mix(mut z:u64) -> u64 {
	z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
	z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
	z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
	z ^ (z >> 31)
}

/// Spreading chip `idx` (counted from the GPS epoch) of `prn`, logic level 0/1.
pub fn spreading_chip(prn:u8, idx:i64) -> u8 {
	(mix(((prn as u64) << 56) ^ (idx as u64)) & 1) as u8
}

/// `count` samples of the subcarrier-modulated stand-in, +1/-1, starting at `first_sample`.
pub fn m_code_samples(prn:u8, first_sample:i64, count:usize) -> Result<Vec<i8>> {
	if prn < 1 || prn > MAX_PRN {
		return Err(GnssSimErr::InvalidArgument(format!("invalid PRN {} for M code generation", prn)));
	}
	Ok((0..count as i64).map(|n| {
		let sample = first_sample + n;
		let chip:i8 = if spreading_chip(prn, sample.div_euclid(SAMPLES_PER_SPREADING_CHIP)) == 0 { 1 } else { -1 };
		let subcarrier:i8 = if sample.rem_euclid(2) == 0 { 1 } else { -1 };
		chip * subcarrier
	}).collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn subcarrier_alternates_within_a_chip() {
		let s = m_code_samples(3, 1000, 8).unwrap();
		assert_eq!(s[0], -s[1]);
		assert_eq!(s[0], s[2]);
		assert_eq!(s[1], s[3]);
		assert_eq!(SAMPLES_PER_SPREADING_CHIP, 4);
	}

	#[test]
	fn deterministic_and_prn_dependent() {
		let a = m_code_samples(5, -400, 4000).unwrap();
		assert_eq!(a, m_code_samples(5, -400, 4000).unwrap());
		assert_ne!(a, m_code_samples(6, -400, 4000).unwrap());
		assert_eq!(&a[400..], &m_code_samples(5, 0, 3600).unwrap()[..]);

		let ones = (0..10_000).filter(|i| spreading_chip(5, *i) == 1).count();
		assert!(ones > 4_700 && ones < 5_300);
		assert!(m_code_samples(0, 0, 1).is_err());
	}
}
