use serde::{Serialize, Deserialize};

use crate::almanac::Satellite;
use crate::gnss::navigation::BitAccumulator;
use crate::utils::bits::semicircles;

// Angles and rates in semicircles and semicircles/s, as broadcast
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct Body {
	pub iode:u8,
	pub crs:f64,
	pub dn:f64,
	pub m0:f64,
	pub cuc:f64,
	pub e:f64,
	pub cus:f64,
	pub sqrt_a:f64,
	pub t_oe:u32,
	pub fit_interval:bool,
	pub aodo:u8,
}

impl Body {

	pub fn from_ephemeris(eph:&Satellite) -> Body {
		Body {
			iode: (eph.issue_of_data_clock & 0xFF) as u8,
			crs: 0.0,
			dn: semicircles(eph.mean_motion_correction),
			m0: semicircles(eph.mean_anomaly),
			cuc: 0.0,
			e: eph.eccentricity,
			cus: 0.0,
			sqrt_a: eph.sqrt_a,
			t_oe: eph.time_of_applicability.round() as u32,
			fit_interval: false,
			aodo: 0,
		}
	}

	pub fn encode(&self, acc:&mut BitAccumulator) {
		acc.push(self.iode as i64, 8)
			.push_scaled(self.crs, 5, 16)
			.push_scaled(self.dn, 43, 16)
			.push_scaled(self.m0, 31, 32)
			.push_scaled(self.cuc, 29, 16)
			.push_scaled(self.e, 33, 32)
			.push_scaled(self.cus, 29, 16)
			.push_scaled(self.sqrt_a, 19, 32)
			.push((self.t_oe >> 4) as i64, 16)
			.push(self.fit_interval as i64, 1)
			.push(self.aodo as i64, 5);
	}

}
