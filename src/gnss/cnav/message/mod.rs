use serde::{Serialize, Deserialize};

use crate::{GnssSimErr, Result};
use crate::almanac::Satellite;
use crate::gnss::navigation::BitAccumulator;

pub mod type10;
pub mod type11;
pub mod type30;
pub mod type33;

pub const PREAMBLE:[u8; 8] = [1, 0, 0, 0, 1, 0, 1, 1];

/// Message length with the CRC removed
pub const MESSAGE_BITS:usize = 276;
pub const BODY_BITS:usize = 238;

/// Broadcast order of the message types, one per packet
pub const MESSAGE_CYCLE:[u8; 4] = [10, 11, 30, 33];

pub fn message_type_for_packet(packet:i64) -> u8 {
	MESSAGE_CYCLE[packet.rem_euclid(MESSAGE_CYCLE.len() as i64) as usize]
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct Message {
	pub prn: u8,
	pub time_of_week_truncated:u32,
	pub alert_flag:bool,
	pub body:MessageBody,
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub enum MessageBody {
	Type10(type10::Body),
	Type11(type11::Body),
	Type30(type30::Body),
	Type33(type33::Body),
}

impl MessageBody {

	pub fn type_id(&self) -> u8 {
		match self {
			MessageBody::Type10(_) => 10,
			MessageBody::Type11(_) => 11,
			MessageBody::Type30(_) => 30,
			MessageBody::Type33(_) => 33,
		}
	}

}

impl Message {

	pub fn type_id(&self) -> u8 { self.body.type_id() }

	/// The 276 message bits that precede the CRC.
	pub fn encode(&self) -> Result<BitAccumulator> {
		let mut acc = BitAccumulator::with_capacity(MESSAGE_BITS);
		acc.push_bits(&PREAMBLE)
			.push(self.prn as i64, 6)
			.push(self.type_id() as i64, 6)
			.push(self.time_of_week_truncated as i64, 17)
			.push(self.alert_flag as i64, 1);

		match &self.body {
			MessageBody::Type10(b) => b.encode(&mut acc),
			MessageBody::Type11(b) => b.encode(&mut acc),
			MessageBody::Type30(b) => b.encode(&mut acc),
			MessageBody::Type33(b) => b.encode(&mut acc),
		}

		if acc.len() == MESSAGE_BITS { Ok(acc) }
		else { Err(GnssSimErr::Generation(format!("type {} message has {} bits instead of {}", self.type_id(), acc.len(), MESSAGE_BITS))) }
	}

}

/// Clock correction and accuracy block common to message types 30 through 37 (IS-GPS-200, Table 30-III)
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct ClockData {
	pub t_op: u32,
	pub ura_ned0: i8, pub ura_ned1: u8, pub ura_ned2: u8,
	pub t_oc: u32,
	pub a_f0n: f64, pub a_f1n: f64, pub a_f2n: f64,
}

impl ClockData {

	pub fn from_ephemeris(eph:&Satellite) -> Self {
		let t_oe = eph.time_of_applicability.round() as u32;
		Self {
			t_op: t_oe,
			ura_ned0: 0, ura_ned1: 0, ura_ned2: 0,
			t_oc: t_oe,
			a_f0n: eph.af0, a_f1n: eph.af1, a_f2n: eph.af2,
		}
	}

	pub fn encode(&self, acc:&mut BitAccumulator) {
		acc.push((self.t_op / 300) as i64, 11)		// CEI data sequence propagation time of week
			.push(self.ura_ned0 as i64, 5)			// NED accuracy index
			.push(self.ura_ned1 as i64, 3)			// NED accuracy change index
			.push(self.ura_ned2 as i64, 3)			// NED accuracy change rate index
			.push((self.t_oc / 300) as i64, 11)		// Clock data reference time of week
			.push_scaled(self.a_f0n, 35, 26)			// [sec]
			.push_scaled(self.a_f1n, 48, 20)			// [sec/sec]
			.push_scaled(self.a_f2n, 60, 10);			// [sec/sec^2]
	}

}

#[cfg(test)]
mod tests;
