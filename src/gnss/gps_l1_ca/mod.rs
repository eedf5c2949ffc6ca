
use crate::{GnssSimErr, Result};
use crate::time::GnssTimeSpan;

pub mod parity;
pub mod subframe;
pub mod navigation_data;

pub use navigation_data::NavigationDataL1CA;

pub const CODE_LENGTH:usize = 1023;
pub const CHIP_RATE_HZ:u64 = 1_023_000;
pub const CHIPS_PER_BIT:usize = 20 * CODE_LENGTH;

pub const SUBFRAME_PERIOD:GnssTimeSpan = GnssTimeSpan::from_whole_seconds(6);
pub const FRAME_PERIOD:GnssTimeSpan = GnssTimeSpan::from_whole_seconds(30);
pub const SUBFRAME_BITS:usize = 300;
pub const PAGES_PER_SUPERFRAME:i64 = 25;

// IS-GPS-200, Table 3-Ia: G2 delay in chips for PRN 1 through 32
const G2_DELAY:[usize; 32] = [
	  5,   6,   7,   8,  17,  18, 139, 140, 141, 251, 252, 254, 255, 256, 257, 258,
	469, 470, 471, 472, 473, 474, 509, 512, 513, 514, 515, 516, 859, 860, 861, 862,
];

/// One period of the C/A Gold code, logic levels 0/1.
pub fn ca_code(prn:u8) -> Result<Vec<u8>> {
	if prn < 1 || prn > 32 {
		return Err(GnssSimErr::InvalidArgument(format!("invalid PRN {} for C/A code generation", prn)));
	}

	let mut r1:[u8; 10] = [1; 10];
	let mut r2:[u8; 10] = [1; 10];
	let mut g1:Vec<u8> = Vec::with_capacity(CODE_LENGTH);
	let mut g2:Vec<u8> = Vec::with_capacity(CODE_LENGTH);

	for _ in 0..CODE_LENGTH {
		g1.push(r1[9]);
		g2.push(r2[9]);
		let f1 = r1[2] ^ r1[9];
		let f2 = r2[1] ^ r2[2] ^ r2[5] ^ r2[7] ^ r2[8] ^ r2[9];
		r1.rotate_right(1);
		r2.rotate_right(1);
		r1[0] = f1;
		r2[0] = f2;
	}

	let delay = G2_DELAY[(prn - 1) as usize];
	Ok((0..CODE_LENGTH).map(|i| g1[i] ^ g2[(i + CODE_LENGTH - delay) % CODE_LENGTH]).collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn first_ten_octal(code:&[u8]) -> u32 {
		code.iter().take(10).fold(0u32, |acc, b| (acc << 1) | (*b as u32))
	}

	#[test]
	fn first_chips_match_icd_table() {
		// First 10 chips in octal, IS-GPS-200 Table 3-Ia
		assert_eq!(first_ten_octal(&ca_code(1).unwrap()), 0o1440);
		assert_eq!(first_ten_octal(&ca_code(2).unwrap()), 0o1620);
		assert_eq!(first_ten_octal(&ca_code(32).unwrap()), 0o1712);
	}

	#[test]
	fn codes_are_balanced_and_distinct() {
		let a = ca_code(7).unwrap();
		let b = ca_code(8).unwrap();
		assert_eq!(a.len(), CODE_LENGTH);
		assert_eq!(a.iter().filter(|c| **c == 1).count(), 512);
		assert_ne!(a, b);
		assert!(ca_code(0).is_err());
		assert!(ca_code(33).is_err());
	}
}
