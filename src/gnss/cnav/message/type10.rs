use serde::{Serialize, Deserialize};

use crate::almanac::Satellite;
use crate::gnss::navigation::BitAccumulator;
use crate::utils::bits::semicircles;

/// Reference semi-major axis for the broadcast difference [meters]
pub const A_REF:f64 = 26_559_710.0;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct Body {
	pub week_num: u16,
	pub l1_health: bool, pub l2_health: bool, pub l5_health: bool,
	pub t_op:  u32, pub ura_ed: i8,  pub t_oe:     u32, pub d_a:  f64,
	pub a_dot: f64, pub d_n0:   f64, pub d_n0_dot: f64, pub m0_n: f64,
	pub e_n:   f64, pub om_n:   f64,
	pub integrity_status_flag: bool, pub l2c_phasing: bool
}

impl Body {

	pub fn from_ephemeris(eph:&Satellite) -> Self {
		let t_oe = eph.time_of_applicability.round() as u32;
		let unhealthy = !eph.is_healthy();
		Self {
			week_num: (eph.week % 8192) as u16,
			l1_health: unhealthy, l2_health: unhealthy, l5_health: unhealthy,
			t_op: t_oe,
			ura_ed: 0,
			t_oe,
			d_a: eph.semi_major_axis() - A_REF,
			a_dot: 0.0,
			d_n0: semicircles(eph.mean_motion_correction),
			d_n0_dot: 0.0,
			m0_n: semicircles(eph.mean_anomaly),
			e_n: eph.eccentricity,
			om_n: semicircles(eph.argument_of_perigee),
			integrity_status_flag: false,
			l2c_phasing: false,
		}
	}

	pub fn encode(&self, acc:&mut BitAccumulator) {
		// Scale factors given in IS-GPS-200, Table 30-I
		acc.push(self.week_num as i64, 13)
			// true indicates "Signal bad or unavailable"
			.push(self.l1_health as i64, 1)
			.push(self.l2_health as i64, 1)
			.push(self.l5_health as i64, 1)
			.push((self.t_op / 300) as i64, 11)
			.push(self.ura_ed as i64, 5)
			.push((self.t_oe / 300) as i64, 11)
			.push_scaled(self.d_a, 9, 26)			// [meters]
			.push_scaled(self.a_dot, 21, 25)		// [meters/sec]
			.push_scaled(self.d_n0, 44, 17)		// [semicircles/sec]
			.push_scaled(self.d_n0_dot, 57, 23)	// [semicircles/sec^2]
			.push_scaled(self.m0_n, 32, 33)		// [semicircles]
			.push_scaled(self.e_n, 34, 33)
			.push_scaled(self.om_n, 32, 33)		// [semicircles]
			.push(self.integrity_status_flag as i64, 1)
			.push(self.l2c_phasing as i64, 1)
			.push_filler(3);
	}

}
