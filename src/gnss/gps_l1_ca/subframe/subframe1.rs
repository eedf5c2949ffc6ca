use serde::{Serialize, Deserialize};

use crate::almanac::Satellite;
use crate::gnss::navigation::BitAccumulator;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
#[allow(non_camel_case_types)]
pub enum CodeOnL2 {
	Reserved,
	P_Code,
	CA_Code,
}

impl CodeOnL2 {
	fn bits(&self) -> i64 {
		match self {
			CodeOnL2::Reserved => 0,
			CodeOnL2::P_Code   => 1,
			CodeOnL2::CA_Code  => 2,
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct Body {
	pub week_number:u16,
	pub code_on_l2:CodeOnL2,
	pub ura_index:u8,
	pub sv_health:u8,
	pub iodc:u16,
	pub t_gd:f64,
	pub t_oc:u32,
	pub a_f2:f64,
	pub a_f1:f64,
	pub a_f0:f64
}

impl Body {

	pub fn from_ephemeris(eph:&Satellite, t_gd:f64) -> Body {
		Body {
			week_number: (eph.week % 1024) as u16,
			code_on_l2: CodeOnL2::P_Code,
			ura_index: 0,
			sv_health: eph.health & 0x3F,
			iodc: eph.issue_of_data_clock % 1024,
			t_gd,
			t_oc: eph.time_of_applicability.round() as u32,
			a_f2: eph.af2,
			a_f1: eph.af1,
			a_f0: eph.af0,
		}
	}

	pub fn encode(&self, acc:&mut BitAccumulator) {
		acc.push(self.week_number as i64, 10)
			.push(self.code_on_l2.bits(), 2)
			.push(self.ura_index as i64, 4)
			.push(self.sv_health as i64, 6)
			.push((self.iodc >> 8) as i64, 2)
			// L2 P data flag, then reserved words 4 through 7
			.push(0, 1)
			.push_filler(23 + 24 + 24 + 16)
			.push_scaled(self.t_gd, 31, 8)
			.push((self.iodc & 0xFF) as i64, 8)
			.push((self.t_oc >> 4) as i64, 16)
			.push_scaled(self.a_f2, 55, 8)
			.push_scaled(self.a_f1, 43, 16)
			.push_scaled(self.a_f0, 31, 22);
	}

}
