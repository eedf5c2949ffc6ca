
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::Satellite;
use crate::GnssSimErr;
use crate::time::{GnssTime, GnssTimeSpan, TimeInterval};

static KEY_VALUE:Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([^:]+?)\s*:\s*(\S+)").expect("static regex"));

// Recognized keys, matched as case-sensitive prefixes of the text before the colon
const KEYS:[&str; 13] = [
	"ID", "Health", "Eccentricity", "Time of Applicability", "Orbital Inclination",
	"Rate of Right Ascen", "SQRT(A)", "Right Ascen", "Argument of Perigee",
	"Mean Anom", "Af0", "Af1", "week",
];

const MANDATORY:[&str; 9] = [
	"ID", "Eccentricity", "Time of Applicability", "Orbital Inclination", "SQRT(A)",
	"Right Ascen", "Argument of Perigee", "Mean Anom", "week",
];

struct Block {
	first_line: usize,
	values: HashMap<&'static str, f64>,
}

impl Block {

	fn new(first_line:usize) -> Self { Self{ first_line, values: HashMap::new() } }

	fn get(&self, key:&'static str) -> f64 { self.values.get(key).copied().unwrap_or(0.0) }

	fn into_satellite(self, gps_week:u32) -> Result<Satellite, GnssSimErr> {
		for key in MANDATORY.iter() {
			if !self.values.contains_key(key) {
				return Err(GnssSimErr::AlmanacParse{ line: self.first_line, reason: format!("missing field '{}'", key) });
			}
		}

		let id = self.get("ID");
		if id < 1.0 || id > 255.0 {
			return Err(GnssSimErr::AlmanacParse{ line: self.first_line, reason: format!("invalid satellite id {}", id) });
		}

		// Resolve the 10-bit week number ambiguity relative to the simulation week
		let mut week = self.get("week") as i64;
		while week < (gps_week as i64) - 512 { week += 1024; }

		let time_of_applicability = self.get("Time of Applicability");
		let start = GnssTime::from_week_seconds(week as u32, time_of_applicability);

		Ok(Satellite {
			id: id as u8,
			health: self.get("Health") as u8,
			is_enabled: true,
			week: week as u32,
			time_of_applicability,
			issue_of_data_clock: 0,
			sqrt_a: self.get("SQRT(A)"),
			eccentricity: self.get("Eccentricity"),
			inclination: self.get("Orbital Inclination"),
			longitude_of_ascending_node: self.get("Right Ascen"),
			argument_of_perigee: self.get("Argument of Perigee"),
			mean_anomaly: self.get("Mean Anom"),
			mean_motion_correction: 0.0,
			rate_of_longitude_of_ascending_node: self.get("Rate of Right Ascen"),
			rate_of_inclination: 0.0,
			af0: self.get("Af0"),
			af1: self.get("Af1"),
			af2: 0.0,
			transmission_interval: TimeInterval::new(start, GnssTimeSpan::from_whole_seconds(super::ALMANAC_TOA_SPACING)),
		})
	}

}

/// Parse a Yuma almanac. `gps_week` is the full week number of the simulation, used to
/// unwrap truncated week fields.
pub fn parse(text:&str, gps_week:u32) -> Result<Vec<Satellite>, GnssSimErr> {
	let mut ans:Vec<Satellite> = vec![];
	let mut current:Option<Block> = None;

	for (line_idx, line) in text.lines().enumerate() {
		let line_no = line_idx + 1;

		if line.trim().is_empty() {
			if let Some(block) = current.take() { ans.push(block.into_satellite(gps_week)?); }
			continue;
		}

		// Header lines such as "******** Week 150 almanac for PRN-01 ********"
		if line.trim_start().starts_with('*') { continue; }

		if let Some(capts) = KEY_VALUE.captures(line) {
			let label = &capts[1];
			if let Some(key) = KEYS.iter().find(|k| label.starts_with(*k)) {
				let value:f64 = capts[2].parse().map_err(|_| GnssSimErr::AlmanacParse{ line: line_no, reason: format!("cannot parse '{}' as a number", &capts[2]) })?;
				current.get_or_insert_with(|| Block::new(line_no)).values.insert(*key, value);
			}
		}
	}

	if let Some(block) = current.take() { ans.push(block.into_satellite(gps_week)?); }

	Ok(ans)
}
