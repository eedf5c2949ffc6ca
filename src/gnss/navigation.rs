
use serde::{Serialize, Deserialize};

use crate::{GnssSimErr, Result};
use crate::time::{GnssTime, GnssTimeSpan, LeapSecondTable, TimeInterval, SECONDS_PER_DAY};
use crate::utils::bits;

/// Broadcast parameters that do not come from the almanac.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct NavigationParameters {
	/// Klobuchar alpha terms [s, s/sc, s/sc^2, s/sc^3]
	pub klobuchar_alpha:[f64; 4],
	/// Klobuchar beta terms [s, s/sc, s/sc^2, s/sc^3]
	pub klobuchar_beta:[f64; 4],
	pub utc_a0:f64,
	pub utc_a1:f64,
	pub utc_a2:f64,
	pub group_delay:f64,
	pub special_message:String,
}

impl Default for NavigationParameters {
	fn default() -> Self {
		Self {
			klobuchar_alpha: [1.1176e-8, 7.4506e-9, -5.9605e-8, -5.9605e-8],
			klobuchar_beta: [90112.0, 0.0, -196608.0, -65536.0],
			utc_a0: 0.0,
			utc_a1: 0.0,
			utc_a2: 0.0,
			group_delay: 0.0,
			special_message: String::new(),
		}
	}
}

// A scheduled leap second is announced once it is no more than this far ahead
const LEAP_SECOND_ANNOUNCEMENT:GnssTimeSpan = GnssTimeSpan::from_whole_seconds(180 * SECONDS_PER_DAY);

/// UTC leap-second fields shared by the LNAV page 18 and CNAV type 33 messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeapSecondFields {
	pub delta_t_ls:i32,
	/// Full GPS week of the (last) scheduled step; each format truncates it
	pub wn_lsf:u32,
	/// Day of week 1 through 7 at whose end the step takes effect
	pub dn:u8,
	pub delta_t_lsf:i32,
}

pub fn leap_second_fields(table:&LeapSecondTable, t:GnssTime) -> LeapSecondFields {
	let current = table.current(t);
	let delta_t_ls = current.map(|e| e.count).unwrap_or(0);

	let announced = match table.next(t) {
		Some(next) if next.time - t <= LEAP_SECOND_ANNOUNCEMENT => Some(next),
		_ => current,
	};

	match announced {
		Some(event) => {
			// The step happens at the end of UTC day DN; step back to the last UTC second before it
			let prior = table.count_at(event.time - GnssTimeSpan::from_nanos(1)) as i64;
			let last_day = event.time - GnssTimeSpan::from_whole_seconds(prior + 1);
			LeapSecondFields{ delta_t_ls, wn_lsf: last_day.week(), dn: (last_day.day_of_week() + 1) as u8, delta_t_lsf: event.count }
		},
		None => LeapSecondFields{ delta_t_ls, wn_lsf: 0, dn: 1, delta_t_lsf: delta_t_ls },
	}
}

/// Per-format hook that turns a word of payload bits into transmitted bits (payload plus parity or CRC).
pub trait WordEncoder {
	fn encode_word(&mut self, word:&[u8], out:&mut Vec<u8>);
}

/// A source of navigation symbols for one satellite.
pub trait NavigationData: Send + Sync {

	/// Symbols per second of the produced stream
	fn symbol_rate(&self) -> u64;

	/// Exactly round(width * symbol_rate) values, each 0 or 1, covering `interval`.
	fn generate(&self, interval:TimeInterval) -> Result<Vec<u8>>;

}

/// Accumulates ICD fields, most significant bit first, one 0/1 value per byte.
#[derive(Debug, Clone, Default)]
pub struct BitAccumulator {
	bits: Vec<u8>,
}

impl BitAccumulator {

	pub fn new() -> Self { Self{ bits: vec![] } }

	pub fn with_capacity(n:usize) -> Self { Self{ bits: Vec::with_capacity(n) } }

	pub fn len(&self) -> usize { self.bits.len() }

	pub fn is_empty(&self) -> bool { self.bits.is_empty() }

	pub fn bits(&self) -> &[u8] { &self.bits }

	/// Integer field over `bit_count` bits, two's complement when negative.
	pub fn push(&mut self, value:i64, bit_count:usize) -> &mut Self {
		self.bits.extend(bits::dec2bin(value, bit_count));
		self
	}

	/// `value * 2^pow2`, rounded, over `bit_count` bits.
	pub fn push_scaled(&mut self, value:f64, pow2:i32, bit_count:usize) -> &mut Self {
		self.push(bits::scale(value, pow2), bit_count)
	}

	pub fn push_bits(&mut self, b:&[u8]) -> &mut Self {
		self.bits.extend_from_slice(b);
		self
	}

	pub fn push_filler(&mut self, bit_count:usize) -> &mut Self {
		self.bits.extend(bits::filler(bit_count));
		self
	}

	/// Split the accumulated payload into `word_len` words and pass each through `encoder`.
	pub fn finish_words(self, word_len:usize, encoder:&mut dyn WordEncoder, out:&mut Vec<u8>) -> Result<()> {
		if word_len == 0 || self.bits.len() % word_len != 0 {
			return Err(GnssSimErr::Generation(format!("{} payload bits do not split into {}-bit words", self.bits.len(), word_len)));
		}
		for word in self.bits.chunks_exact(word_len) {
			encoder.encode_word(word, out);
		}
		Ok(())
	}

}

/// Cut `interval` out of `buffer`, whose first value is transmitted at `buffer_start`.
pub fn slice_to_interval(buffer:&[u8], buffer_start:GnssTime, interval:TimeInterval, rate_hz:u64) -> Result<Vec<u8>> {
	let offset = interval.start.sample_index(rate_hz) - buffer_start.sample_index(rate_hz);
	let len = interval.width.samples(rate_hz);
	if len == 0 { return Ok(vec![]); }
	if offset < 0 || len < 0 || (offset + len) as usize > buffer.len() {
		return Err(GnssSimErr::Generation(format!("interval [{}, +{}) not covered by a buffer of {} values", offset, len, buffer.len())));
	}
	Ok(buffer[(offset as usize)..((offset + len) as usize)].to_vec())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::time::LeapSecond;

	struct Passthrough;

	impl WordEncoder for Passthrough {
		fn encode_word(&mut self, word:&[u8], out:&mut Vec<u8>) {
			out.extend_from_slice(word);
			out.push(9);
		}
	}

	#[test]
	fn words_pass_through_encoder() {
		let mut acc = BitAccumulator::new();
		acc.push(0b101, 3).push(-1, 3).push_filler(2);
		assert_eq!(acc.bits(), &[1, 0, 1, 1, 1, 1, 1, 0]);

		let mut out = vec![];
		acc.finish_words(4, &mut Passthrough, &mut out).unwrap();
		assert_eq!(out, vec![1, 0, 1, 1, 9, 1, 1, 1, 0, 9]);
	}

	#[test]
	fn partial_word_is_rejected() {
		let mut acc = BitAccumulator::new();
		acc.push(1, 5);
		assert!(acc.finish_words(4, &mut Passthrough, &mut vec![]).is_err());
	}

	#[test]
	fn distant_leap_second_is_not_announced() {
		let t0 = GnssTime::from_week_seconds(2201, 0.0);
		let table = LeapSecondTable::new(vec![
			LeapSecond{ time: t0 - GnssTimeSpan::from_whole_seconds(1000 * SECONDS_PER_DAY), count: 18 },
			LeapSecond{ time: t0 + GnssTimeSpan::from_whole_seconds(200 * SECONDS_PER_DAY), count: 19 },
		]);
		let f = leap_second_fields(&table, t0);
		assert_eq!((f.delta_t_ls, f.delta_t_lsf), (18, 18));

		let f = leap_second_fields(&table, t0 + GnssTimeSpan::from_whole_seconds(100 * SECONDS_PER_DAY));
		assert_eq!((f.delta_t_ls, f.delta_t_lsf), (18, 19));
		let last_day = t0 + GnssTimeSpan::from_whole_seconds(200 * SECONDS_PER_DAY - 19);
		assert_eq!(f.wn_lsf, last_day.week());
		assert_eq!(f.dn as u32, last_day.day_of_week() + 1);
	}

	#[test]
	fn day_number_is_the_utc_day_ending_with_the_step() {
		// 2017-01-01 UTC midnight was a Sunday; the step closes Saturday, DN 7, of week 1929
		let table = LeapSecondTable::default();
		let t = GnssTime::from_date(2016, 10, 1).unwrap();
		let f = leap_second_fields(&table, t);
		assert_eq!((f.delta_t_ls, f.delta_t_lsf), (17, 18));
		assert_eq!(f.wn_lsf, 1929);
		assert_eq!(f.dn, 7);
	}

	#[test]
	fn slice_uses_rounded_bounds() {
		let buffer:Vec<u8> = (0..100).map(|i| i as u8).collect();
		let start = GnssTime::from_week_seconds(10, 0.0);
		let interval = TimeInterval::new(start + GnssTimeSpan::from_seconds(0.1), GnssTimeSpan::from_seconds(0.5));
		let s = slice_to_interval(&buffer, start, interval, 50).unwrap();
		assert_eq!(s.len(), 25);
		assert_eq!(s[0], 5);

		let late = TimeInterval::new(start + GnssTimeSpan::from_seconds(1.9), GnssTimeSpan::from_seconds(0.5));
		assert!(slice_to_interval(&buffer, start, late, 50).is_err());
	}
}
