
use std::ops::{Add, Sub};

use chrono::NaiveDate;
use serde::{Serialize, Deserialize};

pub const NANOS_PER_SECOND:i64 = 1_000_000_000;
pub const SECONDS_PER_DAY:i64 = 86_400;
pub const SECONDS_PER_WEEK:i64 = 604_800;

/// Continuous GPS time, nanoseconds since 1980-01-06 00:00:00 GPS.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GnssTime {
	nanos: i64,
}

/// Signed duration in nanoseconds.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GnssTimeSpan {
	nanos: i64,
}

fn round_div(num:i128, den:i128) -> i128 {
	// Round half away from zero
	if (num < 0) ^ (den < 0) { (num - den/2) / den } else { (num + den/2) / den }
}

impl GnssTimeSpan {

	pub const fn from_nanos(nanos:i64) -> Self { Self{ nanos } }
	pub const fn from_whole_seconds(s:i64) -> Self { Self{ nanos: s * NANOS_PER_SECOND } }
	pub fn from_seconds(s:f64) -> Self { Self{ nanos: (s * NANOS_PER_SECOND as f64).round() as i64 } }

	pub fn nanos(&self) -> i64 { self.nanos }
	pub fn as_seconds(&self) -> f64 { (self.nanos as f64) / (NANOS_PER_SECOND as f64) }

	/// Number of samples at `rate_hz` that fit in this span, rounded to the nearest sample.
	pub fn samples(&self, rate_hz:u64) -> i64 {
		round_div((self.nanos as i128) * (rate_hz as i128), NANOS_PER_SECOND as i128) as i64
	}

}

impl GnssTime {

	pub const fn from_nanos(nanos:i64) -> Self { Self{ nanos } }
	pub fn from_seconds(s:f64) -> Self { Self{ nanos: (s * NANOS_PER_SECOND as f64).round() as i64 } }

	pub fn from_week_seconds(week:u32, seconds_of_week:f64) -> Self {
		let whole = (week as i64) * SECONDS_PER_WEEK * NANOS_PER_SECOND;
		Self{ nanos: whole + (seconds_of_week * NANOS_PER_SECOND as f64).round() as i64 }
	}

	/// GPS time at midnight (UTC calendar date interpreted on the GPS time scale).
	pub fn from_date(year:i32, month:u32, day:u32) -> Option<Self> {
		let epoch = NaiveDate::from_ymd_opt(1980, 1, 6)?;
		let date  = NaiveDate::from_ymd_opt(year, month, day)?;
		let days  = date.signed_duration_since(epoch).num_days();
		Some(Self{ nanos: days * SECONDS_PER_DAY * NANOS_PER_SECOND })
	}

	pub fn nanos(&self) -> i64 { self.nanos }
	pub fn as_seconds(&self) -> f64 { (self.nanos as f64) / (NANOS_PER_SECOND as f64) }

	pub fn week(&self) -> u32 { self.nanos.div_euclid(SECONDS_PER_WEEK * NANOS_PER_SECOND) as u32 }

	pub fn seconds_of_week(&self) -> f64 {
		(self.nanos.rem_euclid(SECONDS_PER_WEEK * NANOS_PER_SECOND) as f64) / (NANOS_PER_SECOND as f64)
	}

	/// Day of the GPS week, 0 = Sunday.
	pub fn day_of_week(&self) -> u32 { (self.seconds_of_week() as i64 / SECONDS_PER_DAY) as u32 }

	/// Day of year (1-based) of the calendar date this instant falls on.
	pub fn day_of_year(&self) -> u32 {
		use chrono::Datelike;
		let days = self.nanos.div_euclid(SECONDS_PER_DAY * NANOS_PER_SECOND);
		NaiveDate::from_ymd_opt(1980, 1, 6)
			.and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(days)))
			.map(|d| d.ordinal())
			.unwrap_or(1)
	}

	/// Largest multiple of `step` (counted from the GPS epoch) not after this instant.
	pub fn floor_to(&self, step:GnssTimeSpan) -> Self {
		Self{ nanos: self.nanos.div_euclid(step.nanos) * step.nanos }
	}

	/// Index of the sample at `rate_hz` closest to this instant, counted from the GPS epoch.
	pub fn sample_index(&self, rate_hz:u64) -> i64 {
		round_div((self.nanos as i128) * (rate_hz as i128), NANOS_PER_SECOND as i128) as i64
	}

	/// Instant of sample `idx` at `rate_hz`, rounded to the nearest nanosecond.
	pub fn from_sample_index(idx:i64, rate_hz:u64) -> Self {
		Self{ nanos: round_div((idx as i128) * (NANOS_PER_SECOND as i128), rate_hz as i128) as i64 }
	}

}

impl Add<GnssTimeSpan> for GnssTime {
	type Output = GnssTime;
	fn add(self, rhs:GnssTimeSpan) -> GnssTime { GnssTime{ nanos: self.nanos + rhs.nanos } }
}

impl Sub<GnssTimeSpan> for GnssTime {
	type Output = GnssTime;
	fn sub(self, rhs:GnssTimeSpan) -> GnssTime { GnssTime{ nanos: self.nanos - rhs.nanos } }
}

impl Sub<GnssTime> for GnssTime {
	type Output = GnssTimeSpan;
	fn sub(self, rhs:GnssTime) -> GnssTimeSpan { GnssTimeSpan{ nanos: self.nanos - rhs.nanos } }
}

impl Add for GnssTimeSpan {
	type Output = GnssTimeSpan;
	fn add(self, rhs:GnssTimeSpan) -> GnssTimeSpan { GnssTimeSpan{ nanos: self.nanos + rhs.nanos } }
}

/// Half-open interval [start, start + width) of continuous GPS time.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeInterval {
	pub start: GnssTime,
	pub width: GnssTimeSpan,
}

impl TimeInterval {

	pub fn new(start:GnssTime, width:GnssTimeSpan) -> Self { Self{ start, width } }

	pub fn end(&self) -> GnssTime { self.start + self.width }

	pub fn contains(&self, t:GnssTime) -> bool { t >= self.start && t < self.end() }

}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct LeapSecond {
	pub time: GnssTime,
	pub count: i32,
}

/// GPS-UTC offsets in force from each listed instant onwards.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LeapSecondTable {
	events: Vec<LeapSecond>,
}

// UTC dates on which each GPS-UTC step took effect
const LEAP_SECOND_DATES:[(i32, u32); 18] = [
	(1981, 7), (1982, 7), (1983, 7), (1985, 7), (1988, 1), (1990, 1),
	(1991, 1), (1992, 7), (1993, 7), (1994, 7), (1996, 1), (1997, 7),
	(1999, 1), (2006, 1), (2009, 1), (2012, 7), (2015, 7), (2017, 1),
];

impl Default for LeapSecondTable {
	fn default() -> Self {
		// UTC midnight falls `idx` seconds after GPS midnight, idx being the count before the step
		let events = LEAP_SECOND_DATES.iter().enumerate()
			.filter_map(|(idx, (y, m))| GnssTime::from_date(*y, *m, 1).map(|midnight| LeapSecond {
				time: midnight + GnssTimeSpan::from_whole_seconds(idx as i64),
				count: (idx as i32) + 1,
			}))
			.collect();
		Self{ events }
	}
}

impl LeapSecondTable {

	pub fn new(mut events:Vec<LeapSecond>) -> Self {
		events.sort_by_key(|e| e.time);
		Self{ events }
	}

	/// The most recent event at or before `t`, if any.
	pub fn current(&self, t:GnssTime) -> Option<LeapSecond> {
		self.events.iter().rev().find(|e| e.time <= t).copied()
	}

	/// The first event strictly after `t`, if any.
	pub fn next(&self, t:GnssTime) -> Option<LeapSecond> {
		self.events.iter().find(|e| e.time > t).copied()
	}

	pub fn count_at(&self, t:GnssTime) -> i32 { self.current(t).map(|e| e.count).unwrap_or(0) }

}
