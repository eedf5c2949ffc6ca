
use std::path::Path;
use std::time::Duration;

use serde::{Serialize, Deserialize};

use crate::Result;
use crate::gnss::navigation::NavigationParameters;
use crate::gnss::signal::SignalType;
use crate::time::GnssTimeSpan;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ConstellationConfig {
	/// Satellites below this elevation [deg] are not observed
	pub elevation_mask_deg:f64,
	/// Upper bound on signal travel time [s]; every modulation window reaches back this far
	pub max_travel_time:f64,
	/// Intervals kept per cache
	pub library_capacity:usize,
	/// Packets of encoder state kept per CNAV flavour
	pub fec_capacity:usize,
	pub lock_timeout_secs:f64,
	pub signals:Vec<SignalType>,
	pub navigation:NavigationParameters,
	/// Day of year used by the troposphere model; taken from the receiver time when unset
	pub day_of_year:Option<u32>,
}

impl Default for ConstellationConfig {
	fn default() -> Self {
		Self {
			elevation_mask_deg: 5.0,
			max_travel_time: 0.09,
			library_capacity: 16,
			fec_capacity: 256,
			lock_timeout_secs: 10.0,
			signals: SignalType::ALL.to_vec(),
			navigation: NavigationParameters::default(),
			day_of_year: None,
		}
	}
}

impl ConstellationConfig {

	pub fn from_json_file<P: AsRef<Path>>(path:P) -> Result<Self> {
		let text = std::fs::read_to_string(path)?;
		Ok(serde_json::from_str(&text)?)
	}

	pub fn max_travel_time(&self) -> GnssTimeSpan { GnssTimeSpan::from_seconds(self.max_travel_time) }

	pub fn lock_timeout(&self) -> Duration { Duration::from_secs_f64(self.lock_timeout_secs.max(0.0)) }

	pub fn elevation_mask(&self) -> f64 { self.elevation_mask_deg.to_radians() }

}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_fields_take_defaults() {
		let cfg:ConstellationConfig = serde_json::from_str(r#"{ "elevation_mask_deg": 10.0, "signals": ["L1CA", "L5I"] }"#).unwrap();
		assert_eq!(cfg.elevation_mask_deg, 10.0);
		assert_eq!(cfg.signals, vec![SignalType::L1CA, SignalType::L5I]);
		assert_eq!(cfg.library_capacity, 16);
		assert_eq!(cfg.max_travel_time().nanos(), 90_000_000);
		assert_eq!(cfg.lock_timeout(), Duration::from_secs(10));
	}

	#[test]
	fn reads_file() {
		let path = std::env::temp_dir().join(format!("gnss_baseband_config_{}.json", std::process::id()));
		let cfg = ConstellationConfig{ day_of_year: Some(42), ..ConstellationConfig::default() };
		std::fs::write(&path, serde_json::to_string_pretty(&cfg).unwrap()).unwrap();
		let back = ConstellationConfig::from_json_file(&path).unwrap();
		std::fs::remove_file(&path).unwrap();
		assert_eq!(back, cfg);
		assert!(ConstellationConfig::from_json_file(&path).is_err());
	}
}
