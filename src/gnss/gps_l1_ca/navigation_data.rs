
use crate::{GnssSimErr, Result};
use crate::almanac::{self, Almanac, Satellite};
use crate::gnss::navigation::{NavigationData, NavigationParameters, leap_second_fields, slice_to_interval};
use crate::gnss::signal::{NavFormat, LNAV_BIT_RATE};
use crate::time::{GnssTime, LeapSecondTable, TimeInterval, NANOS_PER_SECOND, SECONDS_PER_WEEK};

use super::{SUBFRAME_PERIOD, FRAME_PERIOD, SUBFRAME_BITS, PAGES_PER_SUPERFRAME};
use super::parity::{LnavParity, WORD_DATA_BITS};
use super::subframe::{Subframe, SubframeBody, AlmanacData, DATA_ID, DUMMY_SV_ID, summary_health};
use super::subframe::{subframe1, subframe2, subframe3, subframe4, subframe5};

const TOW_COUNTS_PER_WEEK:i64 = 100_800;
const SUBFRAMES_PER_FRAME:i64 = 5;

/// Subframe ID (1 through 5) transmitted at `t`.
pub fn subframe_id(t:GnssTime) -> u8 {
	(t.nanos().div_euclid(SUBFRAME_PERIOD.nanos()).rem_euclid(SUBFRAMES_PER_FRAME) + 1) as u8
}

/// Page (1 through 25) of subframes 4 and 5 transmitted at `t`, counted from the start of the week.
pub fn page_number(t:GnssTime) -> u8 {
	let frame_in_week = t.nanos().rem_euclid(SECONDS_PER_WEEK * NANOS_PER_SECOND) / FRAME_PERIOD.nanos();
	(frame_in_week.rem_euclid(PAGES_PER_SUPERFRAME) + 1) as u8
}

/// Truncated TOW count of the subframe that follows the one starting at `t`.
pub fn next_tow_count(t:GnssTime) -> u32 {
	(t.nanos().div_euclid(SUBFRAME_PERIOD.nanos()) + 1).rem_euclid(TOW_COUNTS_PER_WEEK) as u32
}

/// Legacy navigation message generator for one satellite on L1 C/A.
pub struct NavigationDataL1CA<'a> {
	almanac:&'a Almanac,
	sat_index:usize,
	parameters:&'a NavigationParameters,
	leap_seconds:&'a LeapSecondTable,
}

impl<'a> NavigationDataL1CA<'a> {

	pub fn new(almanac:&'a Almanac, sat_index:usize, parameters:&'a NavigationParameters, leap_seconds:&'a LeapSecondTable) -> Result<Self> {
		if almanac.baseline(sat_index).is_none() {
			return Err(GnssSimErr::InvalidArgument(format!("no almanac data for satellite index {}", sat_index)));
		}
		Ok(Self{ almanac, sat_index, parameters, leap_seconds })
	}

	fn ephemeris(&self, t:GnssTime) -> Result<Satellite> {
		self.almanac.create_ephemeris(self.sat_index, t, NavFormat::Lnav)?
			.ok_or_else(|| GnssSimErr::Generation(format!("ephemeris for satellite index {} disappeared", self.sat_index)))
	}

	fn almanac_page(&self, prn:u8, t:GnssTime) -> Result<(u8, Option<AlmanacData>)> {
		let alm = self.almanac.create_almanac((prn as usize) - 1, t)?;
		Ok(match alm {
			Some(a) => (prn, Some(AlmanacData::from_satellite(&a))),
			None    => (DUMMY_SV_ID, None),
		})
	}

	fn subframe4(&self, page:u8, t:GnssTime) -> Result<subframe4::Body> {
		let sv_id = subframe4::sv_id_for_page(page);
		let (sv_id, page) = match sv_id {
			25..=32 => match self.almanac_page(sv_id, t)? {
				(id, Some(alm)) => (id, subframe4::Page::AlmanacData(alm)),
				(id, None)      => (id, subframe4::Page::Dummy),
			},
			52 => (sv_id, subframe4::Page::NavigationMessageCorrectionTable{ availability: 2, erd: [0b100000; 30] }),
			55 => {
				let mut message = [b' '; 22];
				for (dst, src) in message.iter_mut().zip(self.parameters.special_message.bytes().filter(|c| c.is_ascii())) { *dst = src; }
				(sv_id, subframe4::Page::SpecialMessages(message))
			},
			56 => (sv_id, self.utc_page(t)?),
			63 => {
				let baseline = self.almanac.baseline_satellites();
				let mut antispoof_and_config = [0u8; 32];
				for (idx, c) in antispoof_and_config.iter_mut().enumerate() {
					if baseline.get(idx).copied().flatten().is_some() { *c = 0b0001; }
				}
				let mut sv_health = [0u8; 8];
				for (idx, h) in sv_health.iter_mut().enumerate() {
					*h = summary_health(baseline.get(24 + idx).and_then(|s| s.as_ref()));
				}
				(sv_id, subframe4::Page::Page25{ antispoof_and_config, sv_health })
			},
			_ => (sv_id, subframe4::Page::Reserved),
		};
		Ok(subframe4::Body{ data_id: DATA_ID, sv_id, page })
	}

	/// Almanac reference time (t_oa, WN_a) quoted by the UTC and health pages: this satellite's own
	/// almanac when it is healthy, otherwise the first healthy satellite's.
	pub fn almanac_reference(&self, t:GnssTime) -> Result<GnssTime> {
		let source = self.almanac.baseline(self.sat_index)
			.filter(|s| s.is_healthy())
			.or_else(|| self.almanac.first_healthy());
		let alm = match source {
			Some(sat) => self.almanac.create_almanac(sat.index(), t)?,
			None => None,
		};
		Ok(alm.map(|a| a.reference_time()).unwrap_or_else(|| almanac::time_of_almanac(t)))
	}

	fn utc_page(&self, t:GnssTime) -> Result<subframe4::Page> {
		let reference = self.almanac_reference(t)?;
		let leap = leap_second_fields(self.leap_seconds, t);
		let p = self.parameters;
		Ok(subframe4::Page::Page18 {
			alpha0: p.klobuchar_alpha[0], alpha1: p.klobuchar_alpha[1], alpha2: p.klobuchar_alpha[2], alpha3: p.klobuchar_alpha[3],
			beta0: p.klobuchar_beta[0], beta1: p.klobuchar_beta[1], beta2: p.klobuchar_beta[2], beta3: p.klobuchar_beta[3],
			a1: p.utc_a1,
			a0: p.utc_a0,
			t_ot: reference.seconds_of_week().round() as u32,
			wn_t: (reference.week() % 256) as u8,
			delta_t_ls: leap.delta_t_ls as i8,
			wn_lsf: (leap.wn_lsf % 256) as u8,
			dn: leap.dn,
			delta_t_lsf: leap.delta_t_lsf as i8,
		})
	}

	fn subframe5(&self, page:u8, t:GnssTime) -> Result<subframe5::Body> {
		if page as i64 == PAGES_PER_SUPERFRAME {
			let reference = self.almanac_reference(t)?;
			let baseline = self.almanac.baseline_satellites();
			let mut sv_health = [0u8; 24];
			for (idx, h) in sv_health.iter_mut().enumerate() {
				*h = summary_health(baseline.get(idx).and_then(|s| s.as_ref()));
			}
			let page = subframe5::Page::Page25{ t_oa: reference.seconds_of_week().round() as u32, wn_a: (reference.week() % 256) as u8, sv_health };
			return Ok(subframe5::Body{ data_id: DATA_ID, sv_id: subframe5::HEALTH_PAGE_SV_ID, page });
		}

		Ok(match self.almanac_page(page, t)? {
			(sv_id, Some(alm)) => subframe5::Body{ data_id: DATA_ID, sv_id, page: subframe5::Page::AlmanacData(alm) },
			(sv_id, None)      => subframe5::Body{ data_id: DATA_ID, sv_id, page: subframe5::Page::Dummy },
		})
	}

	/// The subframe whose first bit is transmitted at `t` (a multiple of 6 s).
	pub fn subframe(&self, t:GnssTime) -> Result<Subframe> {
		let id = subframe_id(t);
		let page = page_number(t);
		let body = match id {
			1 => SubframeBody::Subframe1(subframe1::Body::from_ephemeris(&self.ephemeris(t)?, self.parameters.group_delay)),
			2 => SubframeBody::Subframe2(subframe2::Body::from_ephemeris(&self.ephemeris(t)?)),
			3 => SubframeBody::Subframe3(subframe3::Body::from_ephemeris(&self.ephemeris(t)?)),
			4 => SubframeBody::Subframe4(self.subframe4(page, t)?),
			_ => SubframeBody::Subframe5(self.subframe5(page, t)?),
		};

		Ok(Subframe {
			tlm_message: 0,
			integrity_status: false,
			time_of_week_truncated: next_tow_count(t),
			alert: false,
			anti_spoof: false,
			subframe_id: id,
			body,
		})
	}

}

impl<'a> NavigationData for NavigationDataL1CA<'a> {

	fn symbol_rate(&self) -> u64 { LNAV_BIT_RATE }

	fn generate(&self, interval:TimeInterval) -> Result<Vec<u8>> {
		let first = interval.start.floor_to(SUBFRAME_PERIOD);
		let needed = (interval.start.sample_index(LNAV_BIT_RATE) - first.sample_index(LNAV_BIT_RATE)) + interval.width.samples(LNAV_BIT_RATE);
		let subframe_count = (needed.max(0) as usize + SUBFRAME_BITS - 1) / SUBFRAME_BITS;

		// Word 10 always ends with D29 = D30 = 0, so every subframe starts from a clean parity state
		let mut parity = LnavParity::new();
		let mut buffer:Vec<u8> = Vec::with_capacity(subframe_count * SUBFRAME_BITS);
		let mut t = first;
		for _ in 0..subframe_count {
			let sf = self.subframe(t)?;
			log::debug!("PRN {:02} subframe {} at TOW {}", self.sat_index + 1, sf.subframe_id, t.seconds_of_week());
			sf.encode()?.finish_words(WORD_DATA_BITS, &mut parity, &mut buffer)?;
			t = t + SUBFRAME_PERIOD;
		}

		slice_to_interval(&buffer, first, interval, LNAV_BIT_RATE)
	}

}
