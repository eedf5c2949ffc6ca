use serde::{Serialize, Deserialize};

use crate::gnss::navigation::BitAccumulator;
use super::AlmanacData;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct Body {
	pub data_id:u8,
	pub sv_id:u8,
	pub page:Page
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub enum Page {
	AlmanacData(AlmanacData),
	NavigationMessageCorrectionTable{ availability:u8, erd:[u8; 30] },
	SpecialMessages([u8; 22]),
	Page18{ alpha0:f64, alpha1:f64, alpha2:f64, alpha3:f64, beta0:f64, beta1:f64, beta2:f64, beta3:f64,
		a1:f64, a0:f64, t_ot:u32, wn_t:u8, delta_t_ls:i8, wn_lsf:u8, dn:u8, delta_t_lsf:i8 },
	Page25{ antispoof_and_config:[u8; 32], sv_health:[u8; 8] },
	Reserved,
	Dummy,
}

// IS-GPS-200, Table 20-V
const PAGE_SV_ID:[u8; 25] = [
	57, 25, 26, 27, 28, 57, 29, 30, 31, 32, 57, 62, 52,
	53, 54, 57, 55, 56, 62, 62, 57, 62, 62, 62, 63,
];

/// SV ID carried by subframe 4 page `page` (1 through 25).
pub fn sv_id_for_page(page:u8) -> u8 {
	PAGE_SV_ID[((page as usize).max(1) - 1) % PAGE_SV_ID.len()]
}

impl Body {

	pub fn encode(&self, acc:&mut BitAccumulator) {
		acc.push(self.data_id as i64, 2).push(self.sv_id as i64, 6);
		match &self.page {
			Page::AlmanacData(alm) => alm.encode(acc),
			Page::NavigationMessageCorrectionTable{ availability, erd } => {
				acc.push(*availability as i64, 2);
				for e in erd.iter() { acc.push(*e as i64, 6); }
			},
			Page::SpecialMessages(message) => {
				for c in message.iter() { acc.push(*c as i64, 8); }
				acc.push_filler(6);
			},
			Page::Page18{ alpha0, alpha1, alpha2, alpha3, beta0, beta1, beta2, beta3, a1, a0, t_ot, wn_t, delta_t_ls, wn_lsf, dn, delta_t_lsf } => {
				acc.push_scaled(*alpha0, 30, 8)
					.push_scaled(*alpha1, 27, 8)
					.push_scaled(*alpha2, 24, 8)
					.push_scaled(*alpha3, 24, 8)
					.push_scaled(*beta0, -11, 8)
					.push_scaled(*beta1, -14, 8)
					.push_scaled(*beta2, -16, 8)
					.push_scaled(*beta3, -16, 8)
					.push_scaled(*a1, 50, 24)
					.push_scaled(*a0, 30, 32)
					.push((*t_ot >> 12) as i64, 8)
					.push(*wn_t as i64, 8)
					.push(*delta_t_ls as i64, 8)
					.push(*wn_lsf as i64, 8)
					.push(*dn as i64, 8)
					.push(*delta_t_lsf as i64, 8)
					.push_filler(14);
			},
			Page::Page25{ antispoof_and_config, sv_health } => {
				for c in antispoof_and_config.iter() { acc.push(*c as i64, 4); }
				acc.push_filler(2);
				for h in sv_health.iter() { acc.push(*h as i64, 6); }
				acc.push_filler(4);
			},
			Page::Reserved | Page::Dummy => { acc.push_filler(182); },
		}
	}

}
