
use once_cell::sync::Lazy;

use crate::{GnssSimErr, Result};

pub const CHIP_RATE_HZ:u64 = 10_230_000;

/// Chips in one X1 epoch (1.5 s)
pub const X1_EPOCH_CHIPS:i64 = 15_345_000;
/// X2 epochs are 37 chips longer than X1 epochs
pub const X2_EPOCH_CHIPS:i64 = 15_345_037;
/// The P code restarts at the start of every GPS week
pub const CHIPS_PER_WEEK:i64 = 403_200 * X1_EPOCH_CHIPS;

pub const MAX_PRN:u8 = 37;

// IS-GPS-200, section 3.3.2.2: the A registers are short-cycled after 4092 chips and the
// B registers after 4093; X1B holds after 3749 cycles until the X1A epoch completes, and
// both X2 registers hold for the extra 37 chips.
const A_CYCLE:usize = 4092;
const B_CYCLE:usize = 4093;
const A_CYCLES_PER_EPOCH:usize = 3750;
const B_CYCLES_PER_EPOCH:usize = 3749;

// Stage n is bit n-1; initial fills read as in the ICD, stage 12 first
const X1A:(u16, u16) = (0b0010_0100_1000, 0xCA0);	// 1 + x^6 + x^8 + x^11 + x^12
const X1B:(u16, u16) = (0b0101_0101_0100, 0xF93);	// 1 + x + x^2 + x^5 + x^8 + x^9 + x^10 + x^11 + x^12
const X2A:(u16, u16) = (0b1001_0010_0101, 0xFDD);	// 1 + x + x^3 + x^4 + x^5 + x^7 + x^8 + x^9 + x^10 + x^11 + x^12
const X2B:(u16, u16) = (0b0101_0101_0100, 0x98E);	// 1 + x^2 + x^3 + x^4 + x^8 + x^9 + x^12

/// 0/1 chips packed 64 to a word.
#[derive(Debug, Clone)]
pub struct PackedChips {
	words:Vec<u64>,
	len:usize,
}

impl PackedChips {

	fn from_fn<F: Fn(usize) -> u8>(len:usize, chip:F) -> Self {
		let mut words:Vec<u64> = vec![0; (len + 63) / 64];
		for idx in 0..len {
			if chip(idx) != 0 { words[idx / 64] |= 1 << (idx % 64); }
		}
		Self{ words, len }
	}

	pub fn len(&self) -> usize { self.len }

	pub fn is_empty(&self) -> bool { self.len == 0 }

	pub fn get(&self, idx:usize) -> u8 { ((self.words[idx / 64] >> (idx % 64)) & 1) as u8 }

}

// One epoch of a short-cycled 12-stage register, holding its last chip once the cycles run out
fn short_cycled(register:(u16, u16), cycle:usize, cycles:usize, epoch_len:usize) -> Vec<u8> {
	let (fill, taps) = register;
	let mut chips:Vec<u8> = Vec::with_capacity(epoch_len);
	let mut state:u16 = fill;
	for idx in 0..(cycle * cycles) {
		if idx % cycle == 0 { state = fill; }
		chips.push(((state >> 11) & 1) as u8);
		let feedback = ((state & taps).count_ones() & 1) as u16;
		state = ((state << 1) | feedback) & 0xFFF;
	}
	let last = chips.last().copied().unwrap_or(0);
	chips.resize(epoch_len, last);
	chips
}

static X1: Lazy<PackedChips> = Lazy::new(|| {
	let len = X1_EPOCH_CHIPS as usize;
	let a = short_cycled(X1A, A_CYCLE, A_CYCLES_PER_EPOCH, len);
	let b = short_cycled(X1B, B_CYCLE, B_CYCLES_PER_EPOCH, len);
	PackedChips::from_fn(len, |i| a[i] ^ b[i])
});

static X2: Lazy<PackedChips> = Lazy::new(|| {
	let len = X2_EPOCH_CHIPS as usize;
	let a = short_cycled(X2A, A_CYCLE, A_CYCLES_PER_EPOCH, len);
	let b = short_cycled(X2B, B_CYCLE, B_CYCLES_PER_EPOCH, len);
	PackedChips::from_fn(len, |i| a[i] ^ b[i])
});

// X2 delayed by `prn` chips; before the week starts it sits in its held end state
fn x2_delayed(chip_of_week:i64, prn:u8) -> u8 {
	let j = chip_of_week - prn as i64;
	if j < 0 { 1 } else { X2.get((j % X2_EPOCH_CHIPS) as usize) }
}

/// `count` P-code chips of `prn`, the first one `first_chip` chips after the GPS epoch.
pub fn p_code(prn:u8, first_chip:i64, count:usize) -> Result<Vec<u8>> {
	if prn < 1 || prn > MAX_PRN {
		return Err(GnssSimErr::InvalidArgument(format!("invalid PRN {} for P code generation", prn)));
	}
	Ok((0..count as i64).map(|n| {
		let chip_of_week = (first_chip + n).rem_euclid(CHIPS_PER_WEEK);
		X1.get((chip_of_week % X1_EPOCH_CHIPS) as usize) ^ x2_delayed(chip_of_week, prn)
	}).collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn octal_of(chips:&[u8]) -> u32 {
		chips.iter().fold(0u32, |acc, b| (acc << 1) | (*b as u32))
	}

	#[test]
	fn first_chips_of_the_week() {
		// First 12 chips in octal, IS-GPS-200 Table 3-Ia
		let expected:[u32; 9] = [0o4444, 0o4000, 0o4222, 0o4333, 0o4377, 0o4355, 0o4344, 0o4340, 0o4342];
		let week_start = 2201 * CHIPS_PER_WEEK;
		for (idx, e) in expected.iter().enumerate() {
			let chips = p_code((idx + 1) as u8, week_start, 12).unwrap();
			assert_eq!(octal_of(&chips), *e, "PRN {}", idx + 1);
		}
	}

	#[test]
	fn registers_short_cycle() {
		let a = short_cycled(X1A, A_CYCLE, 2, 2 * A_CYCLE + 5);
		assert_eq!(&a[..A_CYCLE], &a[A_CYCLE..2 * A_CYCLE]);
		assert!(a[2 * A_CYCLE..].iter().all(|c| *c == a[2 * A_CYCLE - 1]));
		assert_eq!(X1.len(), X1_EPOCH_CHIPS as usize);
		assert_eq!(X2.len(), X2_EPOCH_CHIPS as usize);
	}

	#[test]
	fn code_is_continuous_across_calls() {
		let start = 2201 * CHIPS_PER_WEEK + X1_EPOCH_CHIPS - 50;
		let whole = p_code(12, start, 100).unwrap();
		let mut split = p_code(12, start, 37).unwrap();
		split.extend(p_code(12, start + 37, 63).unwrap());
		assert_eq!(whole, split);
		assert!(p_code(38, start, 1).is_err());
	}
}
