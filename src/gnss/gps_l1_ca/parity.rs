
use crate::{GnssSimErr, Result};
use crate::gnss::navigation::WordEncoder;

pub const WORD_BITS:usize = 30;
pub const WORD_DATA_BITS:usize = 24;
pub const WORDS_PER_SUBFRAME:usize = 10;

// IS-GPS-200, Table 20-XIV; `d` holds the source data bits d1..d24
fn parity_bits(d:&[u8], last_d29:u8, last_d30:u8) -> [u8; 6] {
	[
		last_d29 ^ d[0] ^ d[1] ^ d[2] ^ d[4] ^ d[5] ^ d[9]  ^ d[10] ^ d[11] ^ d[12] ^ d[13] ^ d[16] ^ d[17] ^ d[19] ^ d[22],
		last_d30 ^ d[1] ^ d[2] ^ d[3] ^ d[5] ^ d[6] ^ d[10] ^ d[11] ^ d[12] ^ d[13] ^ d[14] ^ d[17] ^ d[18] ^ d[20] ^ d[23],
		last_d29 ^ d[0] ^ d[2] ^ d[3] ^ d[4] ^ d[6] ^ d[7]  ^ d[11] ^ d[12] ^ d[13] ^ d[14] ^ d[15] ^ d[18] ^ d[19] ^ d[21],
		last_d30 ^ d[1] ^ d[3] ^ d[4] ^ d[5] ^ d[7] ^ d[8]  ^ d[12] ^ d[13] ^ d[14] ^ d[15] ^ d[16] ^ d[19] ^ d[20] ^ d[22],
		last_d30 ^ d[0] ^ d[2] ^ d[4] ^ d[5] ^ d[6] ^ d[8]  ^ d[9]  ^ d[13] ^ d[14] ^ d[15] ^ d[16] ^ d[17] ^ d[20] ^ d[21] ^ d[23],
		last_d29 ^ d[2] ^ d[4] ^ d[5] ^ d[7] ^ d[8] ^ d[9]  ^ d[10] ^ d[12] ^ d[14] ^ d[18] ^ d[21] ^ d[22] ^ d[23],
	]
}

/// LNAV word encoder: six parity bits per word, data bits inverted by the previous D30,
/// and the two non-information bits of words 2 and 10 chosen so that D29 = D30 = 0.
#[derive(Debug, Clone)]
pub struct LnavParity {
	last_d29:u8,
	last_d30:u8,
	word_index:usize,
}

impl Default for LnavParity {
	fn default() -> Self { Self::new() }
}

impl LnavParity {

	pub fn new() -> Self { Self::with_previous(0, 0) }

	/// Start a subframe after a word that ended in `last_d29`, `last_d30`.
	pub fn with_previous(last_d29:u8, last_d30:u8) -> Self { Self{ last_d29, last_d30, word_index: 0 } }

	pub fn last_bits(&self) -> (u8, u8) { (self.last_d29, self.last_d30) }

}

impl WordEncoder for LnavParity {

	fn encode_word(&mut self, word:&[u8], out:&mut Vec<u8>) {
		let mut d:Vec<u8> = word.to_vec();

		if self.word_index == 1 || self.word_index == WORDS_PER_SUBFRAME - 1 {
			for combo in 0..4u8 {
				d[22] = combo >> 1;
				d[23] = combo & 1;
				let p = parity_bits(&d, self.last_d29, self.last_d30);
				if p[4] == 0 && p[5] == 0 { break; }
			}
		}

		let p = parity_bits(&d, self.last_d29, self.last_d30);
		out.extend(d.iter().map(|b| b ^ self.last_d30));
		out.extend_from_slice(&p);

		self.last_d29 = p[4];
		self.last_d30 = p[5];
		self.word_index = (self.word_index + 1) % WORDS_PER_SUBFRAME;
	}

}

/// Check one transmitted 30-bit word against the last two bits of the word before it.
pub fn parity_check(word:&[u8], last_d29:u8, last_d30:u8) -> bool {
	if word.len() != WORD_BITS { return false; }
	let d:Vec<u8> = word.iter().take(WORD_DATA_BITS).map(|b| b ^ last_d30).collect();
	word[WORD_DATA_BITS..] == parity_bits(&d, last_d29, last_d30)
}

/// Verify a transmitted 300-bit subframe and return its 240 source data bits.
pub fn data_recover(subframe:&[u8], last_d29:u8, last_d30:u8) -> Result<Vec<u8>> {
	if subframe.len() != WORD_BITS * WORDS_PER_SUBFRAME {
		return Err(GnssSimErr::InvalidArgument(format!("subframe of {} bits", subframe.len())));
	}

	let mut ans:Vec<u8> = Vec::with_capacity(WORD_DATA_BITS * WORDS_PER_SUBFRAME);
	let (mut d29, mut d30) = (last_d29, last_d30);
	for (idx, word) in subframe.chunks_exact(WORD_BITS).enumerate() {
		if !parity_check(word, d29, d30) {
			return Err(GnssSimErr::Generation(format!("parity failure in word {}", idx + 1)));
		}
		ans.extend(word.iter().take(WORD_DATA_BITS).map(|b| b ^ d30));
		d29 = word[28];
		d30 = word[29];
	}

	Ok(ans)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::Rng;

	#[test]
	fn random_subframes_pass_parity() {
		let mut rng = rand::thread_rng();
		for _ in 0..50 {
			let data:Vec<u8> = (0..240).map(|_| rng.gen_range(0, 2)).collect();
			let mut enc = LnavParity::new();
			let mut out = vec![];
			for w in data.chunks_exact(WORD_DATA_BITS) { enc.encode_word(w, &mut out); }
			assert_eq!(out.len(), 300);

			// Words 2 and 10 end with zero parity bits
			assert_eq!(&out[58..60], &[0, 0]);
			assert_eq!(&out[298..300], &[0, 0]);
			assert_eq!(enc.last_bits(), (0, 0));

			let recovered = data_recover(&out, 0, 0).unwrap();
			for (idx, (a, b)) in recovered.iter().zip(data.iter()).enumerate() {
				// Positions 46, 47, 238 and 239 are solved for parity and may differ
				if idx == 46 || idx == 47 || idx == 238 || idx == 239 { continue; }
				assert_eq!(a, b, "bit {}", idx);
			}
		}
	}

	#[test]
	fn corrupted_bit_is_detected() {
		let mut enc = LnavParity::new();
		let mut out = vec![];
		for _ in 0..10 { enc.encode_word(&[1, 0, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 0, 0], &mut out); }
		assert!(data_recover(&out, 0, 0).is_ok());
		out[100] ^= 1;
		assert!(data_recover(&out, 0, 0).is_err());
	}
}
