
use crate::gnss::navigation::WordEncoder;

pub const CRC_24Q_POLYNOMIAL:[u8; 25] = [1, 1, 0, 0, 0, 0, 1, 1, 0, 0, 1, 0,
	0, 1, 1, 0, 0, 1, 1, 1, 1, 1, 0, 1, 1];

pub const CRC_BITS:usize = 24;

// Remainder of the polynomial division of `m` by the generator, left in the last 24 positions
fn divide(m:&mut [u8]) {
	for i in 0..(m.len() - CRC_24Q_POLYNOMIAL.len() + 1) {
		if m[i] != 0 {
			for j in 0..CRC_24Q_POLYNOMIAL.len() {
				m[i+j] ^= CRC_24Q_POLYNOMIAL[j];
			}
		}
	}
}

/// CRC-24Q parity bits of `message`, most significant first.
pub fn crc24q(message:&[u8]) -> [u8; CRC_BITS] {
	let mut m:Vec<u8> = Vec::with_capacity(message.len() + CRC_BITS);
	m.extend_from_slice(message);
	m.extend_from_slice(&[0; CRC_BITS]);
	divide(&mut m);

	let mut ans = [0u8; CRC_BITS];
	ans.copy_from_slice(&m[message.len()..]);
	ans
}

pub fn is_crc_ok(message_w_crc:&[u8]) -> bool {
	if message_w_crc.len() < CRC_24Q_POLYNOMIAL.len() { return false; }

	// Make a copy of the slice because we'll need to mutate it
	let mut m:Vec<u8> = message_w_crc.to_vec();
	divide(&mut m);
	m.iter().all(|b| *b == 0)
}

/// Word encoder for CNAV: each 276-bit message is followed by its CRC.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc24q;

impl WordEncoder for Crc24q {
	fn encode_word(&mut self, word:&[u8], out:&mut Vec<u8>) {
		out.extend_from_slice(word);
		out.extend_from_slice(&crc24q(word));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::utils::bits::dec2bin;

	#[test]
	fn standard_check_value() {
		let message:Vec<u8> = b"123456789".iter().flat_map(|c| dec2bin(*c as i64, 8)).collect();
		assert_eq!(crc24q(&message).to_vec(), dec2bin(0xCDE703, 24));
	}

	#[test]
	fn appended_crc_verifies() {
		let message:Vec<u8> = (0..276).map(|i| ((i * 7 + i / 3) % 2) as u8).collect();
		let mut out = vec![];
		Crc24q.encode_word(&message, &mut out);
		assert_eq!(out.len(), 300);
		assert!(is_crc_ok(&out));
		out[17] ^= 1;
		assert!(!is_crc_ok(&out));
	}
}
