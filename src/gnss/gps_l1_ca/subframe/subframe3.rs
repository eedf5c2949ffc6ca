use serde::{Serialize, Deserialize};

use crate::almanac::Satellite;
use crate::gnss::navigation::BitAccumulator;
use crate::utils::bits::semicircles;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct Body {
	pub cic:f64,
	pub omega0:f64,
	pub cis:f64,
	pub i0:f64,
	pub crc:f64,
	pub omega:f64,
	pub omega_dot:f64,
	pub iode:u8,
	pub idot:f64
}

impl Body {

	pub fn from_ephemeris(eph:&Satellite) -> Body {
		Body {
			cic: 0.0,
			omega0: semicircles(eph.longitude_of_ascending_node),
			cis: 0.0,
			i0: semicircles(eph.inclination),
			crc: 0.0,
			omega: semicircles(eph.argument_of_perigee),
			omega_dot: semicircles(eph.rate_of_longitude_of_ascending_node),
			iode: (eph.issue_of_data_clock & 0xFF) as u8,
			idot: semicircles(eph.rate_of_inclination),
		}
	}

	pub fn encode(&self, acc:&mut BitAccumulator) {
		acc.push_scaled(self.cic, 29, 16)
			.push_scaled(self.omega0, 31, 32)
			.push_scaled(self.cis, 29, 16)
			.push_scaled(self.i0, 31, 32)
			.push_scaled(self.crc, 5, 16)
			.push_scaled(self.omega, 31, 32)
			.push_scaled(self.omega_dot, 43, 24)
			.push(self.iode as i64, 8)
			.push_scaled(self.idot, 43, 14);
	}

}
