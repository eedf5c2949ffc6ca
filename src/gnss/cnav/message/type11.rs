use serde::{Serialize, Deserialize};

use crate::almanac::Satellite;
use crate::gnss::navigation::BitAccumulator;
use crate::utils::bits::semicircles;

/// Reference rate of right ascension [semicircles/sec]
pub const OMEGA_DOT_REF:f64 = -2.6e-9;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct Body {
	pub t_oe: u32,
	pub omega0: f64, pub i0: f64,
	pub d_omega_dot: f64, pub i0_dot: f64,
	pub c_is: f64, pub c_ic: f64,
	pub c_rs: f64, pub c_rc: f64,
	pub c_us: f64, pub c_uc: f64,
}

impl Body {

	pub fn from_ephemeris(eph:&Satellite) -> Self {
		Self {
			t_oe: eph.time_of_applicability.round() as u32,
			omega0: semicircles(eph.longitude_of_ascending_node),
			i0: semicircles(eph.inclination),
			d_omega_dot: semicircles(eph.rate_of_longitude_of_ascending_node) - OMEGA_DOT_REF,
			i0_dot: semicircles(eph.rate_of_inclination),
			c_is: 0.0, c_ic: 0.0,
			c_rs: 0.0, c_rc: 0.0,
			c_us: 0.0, c_uc: 0.0,
		}
	}

	pub fn encode(&self, acc:&mut BitAccumulator) {
		// IS-GPS-200, Table 30-II
		acc.push((self.t_oe / 300) as i64, 11)
			.push_scaled(self.omega0, 32, 33)		// [semicircles]
			.push_scaled(self.i0, 32, 33)			// [semicircles]
			.push_scaled(self.d_omega_dot, 44, 17)	// [semicircles/sec]
			.push_scaled(self.i0_dot, 44, 15)		// [semicircles/sec]
			.push_scaled(self.c_is, 30, 16)		// [radians]
			.push_scaled(self.c_ic, 30, 16)
			.push_scaled(self.c_rs, 8, 24)			// [meters]
			.push_scaled(self.c_rc, 8, 24)
			.push_scaled(self.c_us, 30, 21)		// [radians]
			.push_scaled(self.c_uc, 30, 21)
			.push_filler(7);
	}

}
