use serde::{Serialize, Deserialize};

use crate::almanac::Satellite;
use crate::gnss::navigation::{BitAccumulator, LeapSecondFields, NavigationParameters};
use crate::time::GnssTime;
use super::ClockData;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct Body {
	pub clock: ClockData,
	pub a0: f64, pub a1: f64, pub a2: f64,
	pub delta_t_ls: i32,
	pub t_ot: u32,
	pub wn_ot: u16,
	pub wn_lsf: u16,
	pub dn: u8,
	pub delta_t_lsf: i32,
}

impl Body {

	/// UTC parameters referenced to `t_ot`, normally the broadcast almanac reference time.
	pub fn new(eph:&Satellite, params:&NavigationParameters, t_ot:GnssTime, leap:LeapSecondFields) -> Self {
		Self {
			clock: ClockData::from_ephemeris(eph),
			a0: params.utc_a0, a1: params.utc_a1, a2: params.utc_a2,
			delta_t_ls: leap.delta_t_ls,
			t_ot: t_ot.seconds_of_week().round() as u32,
			wn_ot: (t_ot.week() % 8192) as u16,
			wn_lsf: (leap.wn_lsf % 8192) as u16,
			dn: leap.dn,
			delta_t_lsf: leap.delta_t_lsf,
		}
	}

	pub fn encode(&self, acc:&mut BitAccumulator) {
		self.clock.encode(acc);

		// UTC parameters, IS-GPS-200 Table 30-IX
		acc.push_scaled(self.a0, 35, 16)		// [sec]
			.push_scaled(self.a1, 51, 13)		// [sec/sec]
			.push_scaled(self.a2, 68, 7)		// [sec/sec^2]
			.push(self.delta_t_ls as i64, 8)
			.push((self.t_ot >> 4) as i64, 16)
			.push(self.wn_ot as i64, 13)
			.push(self.wn_lsf as i64, 13)
			.push(self.dn as i64, 4)
			.push(self.delta_t_lsf as i64, 8)
			.push_filler(51);
	}

}
