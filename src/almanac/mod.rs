
use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::{Serialize, Deserialize};

use crate::GnssSimErr;
use crate::gnss::signal::NavFormat;
use crate::time::{GnssTime, GnssTimeSpan, TimeInterval, SECONDS_PER_WEEK};
use crate::utils::normalize_angle;

pub mod yuma;

#[cfg(test)]
mod tests;

pub const MU:f64 = 3.986005e14;                  // [m^3/s^2] WGS-84 value of the earth's gravitational constant
pub const OMEGA_DOT_E:f64 = 7.2921151467e-5;     // [rad/s] WGS-84 value of the earth's rotation rate

pub const MAX_SATELLITES:usize = 50;

// IS-GPS-200, 20.3.3.5.2.2: almanac reference times are multiples of 2^12 s; the
// operational schedule places seven of them per week, 86016 s apart
pub const ALMANAC_FIRST_TOA:i64 = 61_440;
pub const ALMANAC_TOA_SPACING:i64 = 86_016;
pub const ALMANAC_TOAS_PER_WEEK:i64 = 7;
const ALMANAC_LEAD_TIME:GnssTimeSpan = GnssTimeSpan::from_whole_seconds(70 * 3600);

const EPHEMERIS_BUCKET:GnssTimeSpan = GnssTimeSpan::from_whole_seconds(7200);
const EPHEMERIS_OFFSET_LNAV:GnssTimeSpan = GnssTimeSpan::from_whole_seconds(7200);
const EPHEMERIS_OFFSET_CNAV:GnssTimeSpan = GnssTimeSpan::from_whole_seconds(5400);

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PropagationGrade {
	Almanac,
	Ephemeris,
}

/// Orbit and clock state of one satellite, valid for `transmission_interval`.
/// Angles are in radians, rates in rad/s, clock terms in s, s/s and s/s^2.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Satellite {
	pub id:u8,
	pub health:u8,
	pub is_enabled:bool,
	pub week:u32,
	pub time_of_applicability:f64,
	pub issue_of_data_clock:u16,
	pub sqrt_a:f64,
	pub eccentricity:f64,
	pub inclination:f64,
	pub longitude_of_ascending_node:f64,
	pub argument_of_perigee:f64,
	pub mean_anomaly:f64,
	pub mean_motion_correction:f64,
	pub rate_of_longitude_of_ascending_node:f64,
	pub rate_of_inclination:f64,
	pub af0:f64,
	pub af1:f64,
	pub af2:f64,
	pub transmission_interval:TimeInterval,
}

impl Satellite {

	pub fn index(&self) -> usize { (self.id as usize) - 1 }

	pub fn is_healthy(&self) -> bool { self.is_enabled && self.health == 0 }

	pub fn reference_time(&self) -> GnssTime { GnssTime::from_week_seconds(self.week, self.time_of_applicability) }

	pub fn semi_major_axis(&self) -> f64 { self.sqrt_a * self.sqrt_a }

	/// Uncorrected mean motion sqrt(GM / A^3) [rad/s].
	pub fn computed_mean_motion(&self) -> f64 { MU.sqrt() / self.sqrt_a.powi(3) }

	pub fn mean_motion(&self) -> f64 { self.computed_mean_motion() + self.mean_motion_correction }

	/// A new snapshot referenced to `reference`. The Earth-rotation term that moves the node
	/// parameter from one weekly epoch to the next is only applied within one week for
	/// almanac-grade data; ephemeris-grade data always receives it.
	pub fn propagate(&self, reference:GnssTime, grade:PropagationGrade) -> Satellite {
		let dt:f64 = (reference - self.reference_time()).as_seconds();
		let week_delta:i64 = (reference.week() as i64) - (self.week as i64);

		let mean_anomaly = normalize_angle(self.mean_anomaly + self.mean_motion() * dt);

		let mut node = self.longitude_of_ascending_node + self.rate_of_longitude_of_ascending_node * dt;
		if grade == PropagationGrade::Ephemeris || week_delta.abs() <= 1 {
			node -= OMEGA_DOT_E * (SECONDS_PER_WEEK as f64) * (week_delta as f64);
		}

		Satellite {
			week: reference.week(),
			time_of_applicability: reference.seconds_of_week(),
			mean_anomaly,
			longitude_of_ascending_node: normalize_angle(node),
			inclination: self.inclination + self.rate_of_inclination * dt,
			af0: self.af0 + self.af1 * dt + self.af2 * dt * dt,
			af1: self.af1 + 2.0 * self.af2 * dt,
			..*self
		}
	}

}

/// Reference time of the ephemeris broadcast at `t`.
pub fn time_of_ephemeris(t:GnssTime, format:NavFormat) -> GnssTime {
	let offset = match format {
		NavFormat::Lnav => EPHEMERIS_OFFSET_LNAV,
		NavFormat::Cnav(_) => EPHEMERIS_OFFSET_CNAV,
	};
	t.floor_to(EPHEMERIS_BUCKET) + offset
}

/// The standard almanac reference times of `week`.
pub fn standard_almanac_times(week:u32) -> Vec<GnssTime> {
	(0..ALMANAC_TOAS_PER_WEEK).map(|k| GnssTime::from_week_seconds(week, (ALMANAC_FIRST_TOA + k*ALMANAC_TOA_SPACING) as f64)).collect()
}

/// Reference time of the almanac broadcast at `t`: the latest standard almanac time not more than
/// 70 hours ahead of `t`, searched over the previous, current and next week.
pub fn time_of_almanac(t:GnssTime) -> GnssTime {
	let limit = t + ALMANAC_LEAD_TIME;
	let week = t.week();
	let first_week = if week > 0 { week - 1 } else { 0 };
	(first_week..=(week + 1))
		.flat_map(standard_almanac_times)
		.filter(|toa| *toa <= limit)
		.max()
		.unwrap_or_else(|| standard_almanac_times(first_week)[0])
}

fn next_almanac_time(toa:GnssTime) -> GnssTime {
	(toa.week()..=(toa.week() + 1))
		.flat_map(standard_almanac_times)
		.find(|t| *t > toa)
		.unwrap_or(toa + GnssTimeSpan::from_whole_seconds(ALMANAC_TOA_SPACING))
}

fn issue_of_data_for(toe:GnssTime) -> u16 {
	(toe.nanos().div_euclid(EPHEMERIS_BUCKET.nanos()) % 1024) as u16
}

/// Satellites as loaded plus the working set propagated to the current almanac epoch.
/// Slot `i` always holds satellite id `i + 1`.
#[derive(Debug)]
pub struct Almanac {
	original_satellites: Vec<Option<Satellite>>,
	baseline_satellites: RwLock<Arc<Vec<Option<Satellite>>>>,
}

impl Almanac {

	pub fn new(satellites:Vec<Satellite>) -> Result<Self, GnssSimErr> {
		let mut slots:Vec<Option<Satellite>> = vec![None; MAX_SATELLITES];
		for sat in satellites {
			if sat.id == 0 || (sat.id as usize) > MAX_SATELLITES {
				return Err(GnssSimErr::InvalidArgument(format!("satellite id {} outside 1..={}", sat.id, MAX_SATELLITES)));
			}
			if slots[sat.index()].is_some() {
				log::warn!("duplicate almanac entry for PRN {}, keeping the last one", sat.id);
			}
			slots[sat.index()] = Some(sat);
		}
		Self::from_baseline(slots)
	}

	/// Build from slot-indexed snapshots; a snapshot stored in the wrong slot is a wiring error.
	pub fn from_baseline(slots:Vec<Option<Satellite>>) -> Result<Self, GnssSimErr> {
		if slots.len() != MAX_SATELLITES {
			return Err(GnssSimErr::InvalidArgument(format!("expected {} almanac slots, got {}", MAX_SATELLITES, slots.len())));
		}
		for (idx, slot) in slots.iter().enumerate() {
			if let Some(sat) = slot {
				if sat.index() != idx {
					return Err(GnssSimErr::InvalidArgument(format!("satellite id {} stored in slot {}", sat.id, idx)));
				}
			}
		}
		let baseline = Arc::new(slots.clone());
		Ok(Self{ original_satellites: slots, baseline_satellites: RwLock::new(baseline) })
	}

	pub fn from_yuma(text:&str, gps_week:u32) -> Result<Self, GnssSimErr> {
		let sats = yuma::parse(text, gps_week)?;
		log::info!("loaded {} satellites from Yuma almanac", sats.len());
		Self::new(sats)
	}

	pub fn from_yuma_file<P: AsRef<Path>>(path:P, gps_week:u32) -> Result<Self, GnssSimErr> {
		let text = std::fs::read_to_string(path)?;
		Self::from_yuma(&text, gps_week)
	}

	pub fn original_satellites(&self) -> &[Option<Satellite>] { &self.original_satellites }

	/// The current working set. The returned snapshot is never mutated; a later
	/// `update_almanac_for_time` swaps in a new one.
	pub fn baseline_satellites(&self) -> Arc<Vec<Option<Satellite>>> {
		match self.baseline_satellites.read() {
			Ok(guard) => guard.clone(),
			Err(poisoned) => poisoned.into_inner().clone(),
		}
	}

	pub fn baseline(&self, index:usize) -> Option<Satellite> {
		self.baseline_satellites().get(index).copied().flatten()
	}

	pub fn has_satellites(&self) -> bool { self.original_satellites.iter().any(|s| s.is_some()) }

	pub fn satellite_indices(&self) -> Vec<usize> {
		self.original_satellites.iter().enumerate().filter(|(_, s)| s.is_some()).map(|(i, _)| i).collect()
	}

	pub fn first_healthy(&self) -> Option<Satellite> {
		self.baseline_satellites().iter().flatten().find(|s| s.is_healthy()).copied()
	}

	/// Propagate every loaded satellite to one shared almanac reference time.
	pub fn update_almanac_for_time(&self, reference:GnssTime) {
		let current = self.baseline_satellites();
		let updated:Vec<Option<Satellite>> = current.iter()
			.map(|slot| slot.map(|sat| sat.propagate(reference, PropagationGrade::Almanac)))
			.collect();
		log::info!("almanac baseline moved to week {} toa {:.0}", reference.week(), reference.seconds_of_week());
		match self.baseline_satellites.write() {
			Ok(mut guard) => *guard = Arc::new(updated),
			Err(poisoned) => *poisoned.into_inner() = Arc::new(updated),
		}
	}

	fn check_index(index:usize) -> Result<(), GnssSimErr> {
		if index < MAX_SATELLITES { Ok(()) }
		else { Err(GnssSimErr::InvalidArgument(format!("satellite index {} outside 0..{}", index, MAX_SATELLITES))) }
	}

	/// Ephemeris broadcast by satellite `index` at `transmission_time`, or `None` when the slot is empty.
	pub fn create_ephemeris(&self, index:usize, transmission_time:GnssTime, format:NavFormat) -> Result<Option<Satellite>, GnssSimErr> {
		Self::check_index(index)?;
		Ok(self.baseline(index).map(|sat| {
			let toe = time_of_ephemeris(transmission_time, format);
			let mut eph = sat.propagate(toe, PropagationGrade::Ephemeris);
			eph.issue_of_data_clock = issue_of_data_for(toe);
			eph.transmission_interval = TimeInterval::new(transmission_time.floor_to(EPHEMERIS_BUCKET), EPHEMERIS_BUCKET);
			eph
		}))
	}

	/// Almanac entry for satellite `index` as broadcast at `transmission_time`.
	pub fn create_almanac(&self, index:usize, transmission_time:GnssTime) -> Result<Option<Satellite>, GnssSimErr> {
		Self::check_index(index)?;
		Ok(self.baseline(index).map(|sat| {
			let toa = time_of_almanac(transmission_time);
			let mut alm = sat.propagate(toa, PropagationGrade::Almanac);
			alm.transmission_interval = TimeInterval::new(toa - ALMANAC_LEAD_TIME, next_almanac_time(toa) - toa);
			alm
		}))
	}

}
