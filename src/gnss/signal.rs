
use serde::{Serialize, Deserialize};

use crate::time::GnssTimeSpan;

pub const L1_CARRIER_HZ:f64 = 1575.42e6;
pub const L2_CARRIER_HZ:f64 = 1227.60e6;
pub const L5_CARRIER_HZ:f64 = 1176.45e6;

pub const LNAV_BIT_RATE:u64 = 50;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalType {
	L1CA,
	L1P,
	L1M,
	L2C,
	L2P,
	L2M,
	L5I,
	L5Q,
}

/// Flavour of the civil navigation message; the two differ in rate and packet period only.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CnavSignal {
	L2C,
	L5,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavFormat {
	Lnav,
	Cnav(CnavSignal),
}

impl SignalType {

	pub const ALL:[SignalType; 8] = [
		SignalType::L1CA, SignalType::L1P, SignalType::L1M,
		SignalType::L2C, SignalType::L2P, SignalType::L2M,
		SignalType::L5I, SignalType::L5Q,
	];

	pub fn carrier_frequency(&self) -> f64 {
		match self {
			SignalType::L1CA | SignalType::L1P | SignalType::L1M => L1_CARRIER_HZ,
			SignalType::L2C  | SignalType::L2P | SignalType::L2M => L2_CARRIER_HZ,
			SignalType::L5I  | SignalType::L5Q => L5_CARRIER_HZ,
		}
	}

	/// Rate of the chips produced by the modulation for this signal [Hz]
	pub fn chip_rate(&self) -> u64 {
		match self {
			SignalType::L1CA | SignalType::L2C => 1_023_000,
			SignalType::L1P  | SignalType::L2P | SignalType::L5I | SignalType::L5Q => 10_230_000,
			SignalType::L1M  | SignalType::L2M => 20_460_000,
		}
	}

	/// Navigation message carried by the signal, or `None` for a pilot.
	pub fn nav_format(&self) -> Option<NavFormat> {
		match self {
			SignalType::L2C => Some(NavFormat::Cnav(CnavSignal::L2C)),
			SignalType::L5I => Some(NavFormat::Cnav(CnavSignal::L5)),
			SignalType::L5Q => None,
			_ => Some(NavFormat::Lnav),
		}
	}

}

impl CnavSignal {

	/// Information bits per second before convolutional encoding
	pub fn bit_rate(&self) -> u64 {
		match self {
			CnavSignal::L2C => 25,
			CnavSignal::L5  => 50,
		}
	}

	/// Coded symbols per second
	pub fn symbol_rate(&self) -> u64 { 2 * self.bit_rate() }

	pub fn packet_period(&self) -> GnssTimeSpan {
		match self {
			CnavSignal::L2C => GnssTimeSpan::from_whole_seconds(12),
			CnavSignal::L5  => GnssTimeSpan::from_whole_seconds(6),
		}
	}

}

impl NavFormat {

	/// Rate of the 0/1 values produced by the generator for this format
	pub fn symbol_rate(&self) -> u64 {
		match self {
			NavFormat::Lnav => LNAV_BIT_RATE,
			NavFormat::Cnav(s) => s.symbol_rate(),
		}
	}

}
