
use crate::{GnssSimErr, Result};

pub const CODE_LENGTH:usize = 10_230;
pub const CHIP_RATE_HZ:u64 = 10_230_000;

// XA is short-cycled so that it restarts with the all-ones state at this chip
const XA_RESET_CHIP:usize = 8190;

// IS-GPS-705, Table 3-Ia: XB advance (chips) for I5 and Q5, PRN 1 through 32
const I5_XB_ADVANCE:[usize; 32] = [
	 266,  365,  804, 1138, 1509, 1559, 1756, 2084, 2170, 2303, 2527, 2687, 2930, 3471, 3940, 4132,
	4332, 4924, 5343, 5443, 5641, 5816, 5898, 5918, 5955, 6243, 6345, 6477, 6518, 6875, 7168, 7187,
];

const Q5_XB_ADVANCE:[usize; 32] = [
	1701,  323, 5292, 2020, 5429, 7136, 1041, 5947, 4315,  148,  535, 1939, 5206, 5910, 3595, 5135,
	6082, 6990, 3546, 1523, 4548, 4484, 1893, 3961, 7106, 5299, 4660,  276, 4389, 3783, 1591, 1601,
];

/// Neumann-Hoffman secondary code on I5, one chip per 1 ms primary period
pub const NH10:[i8; 10] = [1, 1, 1, 1, -1, -1, 1, -1, 1, -1];

/// Neumann-Hoffman secondary code on Q5
pub const NH20:[i8; 20] = [1, 1, 1, 1, 1, -1, 1, 1, -1, -1, 1, -1, 1, -1, 1, -1, -1, -1, 1, 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum L5Component {
	I5,
	Q5,
}

impl L5Component {

	pub fn secondary_code(&self) -> &'static [i8] {
		match self {
			L5Component::I5 => &NH10,
			L5Component::Q5 => &NH20,
		}
	}

}

// 13-stage Fibonacci register, stage 1 at index 0, output from stage 13
#[derive(Debug, Clone, Copy)]
struct Register13 {
	stages:[u8; 13],
	taps:&'static [usize],
}

const XA_TAPS:[usize; 4] = [12, 11, 9, 8];
const XB_TAPS:[usize; 8] = [12, 11, 7, 6, 5, 3, 2, 0];

impl Register13 {

	fn all_ones(taps:&'static [usize]) -> Self { Self{ stages: [1; 13], taps } }

	fn output(&self) -> u8 { self.stages[12] }

	fn shift(&mut self) {
		let feedback = self.taps.iter().fold(0u8, |acc, t| acc ^ self.stages[*t]);
		self.stages.rotate_right(1);
		self.stages[0] = feedback;
	}

}

/// One 1 ms period of the I5 or Q5 primary code, logic levels 0/1.
pub fn primary_code(component:L5Component, prn:u8) -> Result<Vec<u8>> {
	if prn < 1 || prn > 32 {
		return Err(GnssSimErr::InvalidArgument(format!("invalid PRN {} for L5 {:?} code generation", prn, component)));
	}
	let advance = match component {
		L5Component::I5 => I5_XB_ADVANCE[(prn - 1) as usize],
		L5Component::Q5 => Q5_XB_ADVANCE[(prn - 1) as usize],
	};

	let mut xa = Register13::all_ones(&XA_TAPS);
	let mut xb = Register13::all_ones(&XB_TAPS);
	for _ in 0..advance { xb.shift(); }

	let mut code:Vec<u8> = Vec::with_capacity(CODE_LENGTH);
	for idx in 0..CODE_LENGTH {
		if idx == XA_RESET_CHIP { xa = Register13::all_ones(&XA_TAPS); }
		code.push(xa.output() ^ xb.output());
		xa.shift();
		xb.shift();
	}
	Ok(code)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn octal_of(chips:&[u8]) -> u32 {
		chips.iter().fold(0u32, |acc, b| (acc << 1) | (*b as u32))
	}

	#[test]
	fn xb_initial_state_for_i5_prn1() {
		// IS-GPS-705 lists the advanced XB state for I5 PRN 1 as 0101011100100
		let mut xb = Register13::all_ones(&XB_TAPS);
		for _ in 0..I5_XB_ADVANCE[0] { xb.shift(); }
		assert_eq!(xb.stages, [0, 1, 0, 1, 0, 1, 1, 1, 0, 0, 1, 0, 0]);
	}

	#[test]
	fn first_and_last_chips() {
		let i5 = primary_code(L5Component::I5, 1).unwrap();
		assert_eq!(i5.len(), CODE_LENGTH);
		assert_eq!(octal_of(&i5[..10]), 0o1542);
		assert_eq!(octal_of(&i5[CODE_LENGTH - 10..]), 0o0756);

		let q5 = primary_code(L5Component::Q5, 1).unwrap();
		assert_eq!(octal_of(&q5[..10]), 0o1462);
		assert_eq!(octal_of(&q5[CODE_LENGTH - 10..]), 0o0353);

		assert_eq!(octal_of(&primary_code(L5Component::I5, 32).unwrap()[..10]), 0o0613);
	}

	#[test]
	fn invalid_prn_is_rejected() {
		assert!(primary_code(L5Component::I5, 0).is_err());
		assert!(primary_code(L5Component::Q5, 33).is_err());
	}

	#[test]
	fn secondary_codes() {
		assert_eq!(L5Component::I5.secondary_code().len(), 10);
		assert_eq!(L5Component::Q5.secondary_code().iter().filter(|c| **c < 0).count(), 8);
	}
}
