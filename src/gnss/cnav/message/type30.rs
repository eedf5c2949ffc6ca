use serde::{Serialize, Deserialize};

use crate::almanac::Satellite;
use crate::gnss::navigation::{BitAccumulator, NavigationParameters};
use super::ClockData;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct Body {
	pub clock: ClockData,
	pub t_gd: f64,
	pub isc_l1ca: f64, pub isc_l2c: f64, pub isc_l5i5: f64, pub isc_l5q5: f64,
	pub alpha: [f64; 4],
	pub beta:  [f64; 4],
	pub wn_op: u8
}

impl Body {

	pub fn from_ephemeris(eph:&Satellite, params:&NavigationParameters) -> Self {
		Self {
			clock: ClockData::from_ephemeris(eph),
			t_gd: params.group_delay,
			isc_l1ca: 0.0, isc_l2c: 0.0, isc_l5i5: 0.0, isc_l5q5: 0.0,
			alpha: params.klobuchar_alpha,
			beta:  params.klobuchar_beta,
			wn_op: (eph.week % 256) as u8,
		}
	}

	pub fn encode(&self, acc:&mut BitAccumulator) {
		self.clock.encode(acc);

		// Group delay differential parameters, IS-GPS-200 Table 30-IV [sec]
		for d in [self.t_gd, self.isc_l1ca, self.isc_l2c, self.isc_l5i5, self.isc_l5q5].iter() {
			acc.push_scaled(*d, 35, 13);
		}

		// Ionospheric parameters, IS-GPS-200 Table 20-X
		acc.push_scaled(self.alpha[0], 30, 8)
			.push_scaled(self.alpha[1], 27, 8)
			.push_scaled(self.alpha[2], 24, 8)
			.push_scaled(self.alpha[3], 24, 8)
			.push_scaled(self.beta[0], -11, 8)
			.push_scaled(self.beta[1], -14, 8)
			.push_scaled(self.beta[2], -16, 8)
			.push_scaled(self.beta[3], -16, 8)
			.push(self.wn_op as i64, 8)
			.push_filler(12);
	}

}
