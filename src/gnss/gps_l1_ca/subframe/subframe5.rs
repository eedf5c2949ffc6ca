use serde::{Serialize, Deserialize};

use crate::gnss::navigation::BitAccumulator;
use super::AlmanacData;

pub const HEALTH_PAGE_SV_ID:u8 = 51;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct Body {
	pub data_id:u8,
	pub sv_id:u8,
	pub page:Page
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub enum Page {
	AlmanacData(AlmanacData),
	Page25{ t_oa:u32, wn_a:u8, sv_health:[u8; 24] },
	Dummy,
}

impl Body {

	pub fn encode(&self, acc:&mut BitAccumulator) {
		acc.push(self.data_id as i64, 2).push(self.sv_id as i64, 6);
		match &self.page {
			Page::AlmanacData(alm) => alm.encode(acc),
			Page::Page25{ t_oa, wn_a, sv_health } => {
				acc.push((*t_oa >> 12) as i64, 8).push(*wn_a as i64, 8);
				for h in sv_health.iter() { acc.push(*h as i64, 6); }
				acc.push_filler(6 + 16);
			},
			Page::Dummy => { acc.push_filler(182); },
		}
	}

}
