
use serde::{Serialize, Deserialize};

use crate::{GnssSimErr, Result};
use crate::almanac::Satellite;
use crate::gnss::navigation::BitAccumulator;
use crate::utils::bits;

pub mod subframe1;
pub mod subframe2;
pub mod subframe3;
pub mod subframe4;
pub mod subframe5;

pub const PREAMBLE:[u8; 8] = [1, 0, 0, 0, 1, 0, 1, 1];
pub const SUBFRAME_DATA_BITS:usize = 240;

// Data ID of the LNAV almanac pages
pub const DATA_ID:u8 = 1;

// SV ID of a dummy almanac page
pub const DUMMY_SV_ID:u8 = 0;

/// Contents of the TLM and HOW words.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct Subframe {
	pub tlm_message:u16,
	pub integrity_status:bool,
	pub time_of_week_truncated:u32,
	pub alert:bool,
	pub anti_spoof:bool,
	pub subframe_id:u8,
	pub body:SubframeBody,
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub enum SubframeBody {
	Subframe1(subframe1::Body),
	Subframe2(subframe2::Body),
	Subframe3(subframe3::Body),
	Subframe4(subframe4::Body),
	Subframe5(subframe5::Body),
}

impl Subframe {

	pub fn time_of_week(&self) -> f64 { (self.time_of_week_truncated as f64) * 6.0 }

	/// The 240 source data bits, non-information bits left at zero for the parity encoder.
	pub fn encode(&self) -> Result<BitAccumulator> {
		let mut acc = BitAccumulator::with_capacity(SUBFRAME_DATA_BITS);

		acc.push_bits(&PREAMBLE)
			.push(self.tlm_message as i64, 14)
			.push(self.integrity_status as i64, 1)
			.push(0, 1);

		acc.push(self.time_of_week_truncated as i64, 17)
			.push(self.alert as i64, 1)
			.push(self.anti_spoof as i64, 1)
			.push(self.subframe_id as i64, 3)
			.push(0, 2);

		match &self.body {
			SubframeBody::Subframe1(b) => b.encode(&mut acc),
			SubframeBody::Subframe2(b) => b.encode(&mut acc),
			SubframeBody::Subframe3(b) => b.encode(&mut acc),
			SubframeBody::Subframe4(b) => b.encode(&mut acc),
			SubframeBody::Subframe5(b) => b.encode(&mut acc),
		}

		acc.push(0, 2);

		if acc.len() != SUBFRAME_DATA_BITS {
			return Err(GnssSimErr::Generation(format!("subframe {} encoded to {} bits", self.subframe_id, acc.len())));
		}
		Ok(acc)
	}

}

/// Almanac page body shared by subframes 4 and 5. Angles in semicircles.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct AlmanacData {
	pub e:f64,
	pub t_oa:u32,
	pub delta_i:f64,
	pub omega_dot:f64,
	pub sv_health:u8,
	pub sqrt_a:f64,
	pub omega0:f64,
	pub omega:f64,
	pub m0:f64,
	pub af0:f64,
	pub af1:f64,
}

// IS-GPS-200, 20.3.3.5.2.1: reference inclination i0 = 0.30 semicircles
pub const REFERENCE_INCLINATION:f64 = 0.30;

impl AlmanacData {

	pub fn from_satellite(alm:&Satellite) -> Self {
		Self {
			e: alm.eccentricity,
			t_oa: alm.time_of_applicability.round() as u32,
			delta_i: bits::semicircles(alm.inclination) - REFERENCE_INCLINATION,
			omega_dot: bits::semicircles(alm.rate_of_longitude_of_ascending_node),
			sv_health: alm.health,
			sqrt_a: alm.sqrt_a,
			omega0: bits::semicircles(alm.longitude_of_ascending_node),
			omega: bits::semicircles(alm.argument_of_perigee),
			m0: bits::semicircles(alm.mean_anomaly),
			af0: alm.af0,
			af1: alm.af1,
		}
	}

	pub fn encode(&self, acc:&mut BitAccumulator) {
		let af0 = bits::scaled(self.af0, 20, 11);
		acc.push_scaled(self.e, 21, 16)
			.push((self.t_oa >> 12) as i64, 8)
			.push_scaled(self.delta_i, 19, 16)
			.push_scaled(self.omega_dot, 38, 16)
			.push(self.sv_health as i64, 8)
			.push_scaled(self.sqrt_a, 11, 24)
			.push_scaled(self.omega0, 23, 24)
			.push_scaled(self.omega, 23, 24)
			.push_scaled(self.m0, 23, 24)
			.push_bits(&af0[0..8])
			.push_scaled(self.af1, 38, 11)
			.push_bits(&af0[8..11]);
	}

}

/// 6-bit health summary value, all ones when no data is loaded for the PRN.
pub fn summary_health(sat:Option<&Satellite>) -> u8 {
	match sat {
		Some(s) => s.health & 0x3F,
		None => 0x3F,
	}
}
