
use crate::GnssSimErr;

// Big-endian bit slices (one 0/1 value per byte) back to integers

pub fn to_byte_vec(x:&[u8]) -> Result<Vec<u8>, GnssSimErr> {
	if x.len()%8 == 0 {
		x.chunks_exact(8).map(to_u8).collect()
	} else {
		Err(GnssSimErr::InvalidArgument(format!("bit count {} is not a multiple of 8 in bits_to_int::to_byte_vec", x.len())))
	}
}

pub fn to_u8(bits:&[u8]) -> Result<u8, GnssSimErr> {
	if bits.len() <= 8 { Ok(to_u64(bits)? as u8) }
	else { Err(GnssSimErr::InvalidArgument("x.len() > 8 in bits_to_int::to_u8".into())) }
}

pub fn to_u16(bits:&[u8]) -> Result<u16, GnssSimErr> {
	if bits.len() <= 16 { Ok(to_u64(bits)? as u16) }
	else { Err(GnssSimErr::InvalidArgument("x.len() > 16 in bits_to_int::to_u16".into())) }
}

pub fn to_u32(bits:&[u8]) -> Result<u32, GnssSimErr> {
	if bits.len() <= 32 { Ok(to_u64(bits)? as u32) }
	else { Err(GnssSimErr::InvalidArgument("x.len() > 32 in bits_to_int::to_u32".into())) }
}

pub fn to_u64(bits:&[u8]) -> Result<u64, GnssSimErr> {
	if bits.len() <= 64 {
		Ok(bits.iter().fold(0u64, |acc, b| (acc << 1) | ((*b & 1) as u64)))
	} else {
		Err(GnssSimErr::InvalidArgument("x.len() > 64 in bits_to_int::to_u64".into()))
	}
}

/// Two's complement interpretation over exactly `bits.len()` bits.
pub fn to_i64(bits:&[u8]) -> Result<i64, GnssSimErr> {
	let n = bits.len();
	if n == 0 { return Ok(0); }
	if n <= 64 {
		let raw = to_u64(bits)?;
		if bits[0] != 0 && n < 64 { Ok((raw as i64) - (1i64 << n)) }
		else { Ok(raw as i64) }
	} else {
		Err(GnssSimErr::InvalidArgument("x.len() > 64 in bits_to_int::to_i64".into()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unsigned_and_signed() {
		assert_eq!(to_u8(&[1, 0, 0, 0, 1, 0, 1, 1]).unwrap(), 0x8B);
		assert_eq!(to_i64(&[1, 1, 1, 1]).unwrap(), -1);
		assert_eq!(to_i64(&[1, 0, 0, 0]).unwrap(), -8);
		assert_eq!(to_i64(&[0, 1, 1, 1]).unwrap(), 7);
		assert!(to_u8(&[0; 9]).is_err());
	}

	#[test]
	fn byte_vec() {
		assert_eq!(to_byte_vec(&[1, 0, 0, 0, 1, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 1]).unwrap(), vec![0x8B, 0x01]);
		assert!(to_byte_vec(&[1, 0, 1]).is_err());
	}
}
