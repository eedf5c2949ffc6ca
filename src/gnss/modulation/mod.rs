
use std::sync::Arc;

use crate::{GnssSimErr, Result};
use crate::gnss::constellation::SimulationContext;
use crate::gnss::observation::Observation;
use crate::gnss::signal::SignalType;
use crate::gnss::{gps_l1_ca, gps_l2c, gps_l5};
use crate::time::{GnssTime, GnssTimeSpan, TimeInterval};

pub mod bpsk;
pub mod cmcl;
pub mod tiered;
pub mod p;
pub mod m;

pub use bpsk::ModulationBPSK;
pub use cmcl::ModulationCMCL;
pub use tiered::ModulationTiered;
pub use p::ModulationP;
pub use m::ModulationM;

/// Chips of one satellite's signal covering an interval, as +1/-1 values.
#[derive(Debug, Clone, PartialEq)]
pub struct ModulationSignal {
	/// Chips transmitted over [start - max travel time, end)
	pub chips:Arc<Vec<i8>>,
	/// Leading chips to skip so that chip `offset_samples` is the one arriving at the interval start
	pub offset_samples:usize,
	pub chip_rate:u64,
}

impl ModulationSignal {

	/// The chips received during the first `width` of the interval.
	pub fn slice(&self, width:GnssTimeSpan) -> Result<&[i8]> {
		let n = width.samples(self.chip_rate);
		let end = (self.offset_samples as i64) + n;
		if n < 0 || end > self.chips.len() as i64 {
			return Err(GnssSimErr::InvalidArgument(format!("{} chips after offset {} exceed the {} available", n, self.offset_samples, self.chips.len())));
		}
		Ok(&self.chips[self.offset_samples..(end as usize)])
	}

}

/// One signal family's chip generator.
pub trait Modulation: Send + Sync {

	fn signal_type(&self) -> SignalType;

	fn modulate(&self, ctx:&SimulationContext, interval:TimeInterval, observation:&Observation) -> Result<ModulationSignal>;

}

/// Periodic spreading codes that are generated once per PRN and shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpreadingCode {
	Ca,
	Cm,
	Cl,
	I5,
	Q5,
}

impl SpreadingCode {

	pub fn generate(&self, prn:u8) -> Result<Vec<u8>> {
		match self {
			SpreadingCode::Ca => gps_l1_ca::ca_code(prn),
			SpreadingCode::Cm => gps_l2c::cm_code(prn),
			SpreadingCode::Cl => gps_l2c::cl_code(prn),
			SpreadingCode::I5 => gps_l5::primary_code(gps_l5::L5Component::I5, prn),
			SpreadingCode::Q5 => gps_l5::primary_code(gps_l5::L5Component::Q5, prn),
		}
	}

}

/// Chip span of one modulation request, chip indices counted from the GPS epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipWindow {
	pub first_chip:i64,
	pub count:usize,
	pub offset_samples:usize,
}

impl ChipWindow {

	pub fn new(interval:TimeInterval, max_travel_time:GnssTimeSpan, travel_time:GnssTimeSpan, chip_rate:u64) -> Result<Self> {
		if travel_time > max_travel_time || travel_time.nanos() < 0 {
			return Err(GnssSimErr::InvalidArgument(format!("travel time {:.6} s outside [0, {:.6}] s", travel_time.as_seconds(), max_travel_time.as_seconds())));
		}
		let first_chip = (interval.start - max_travel_time).sample_index(chip_rate);
		let count = interval.end().sample_index(chip_rate) - first_chip;
		let offset = GnssTimeSpan::from_nanos(max_travel_time.nanos() - travel_time.nanos()).samples(chip_rate);
		Ok(Self{ first_chip, count: count.max(0) as usize, offset_samples: offset as usize })
	}

	pub fn chips(&self) -> impl Iterator<Item = i64> {
		let first = self.first_chip;
		(0..self.count as i64).map(move |n| first + n)
	}

	/// Symbols at `symbol_rate` spanned by this window, as the data interval and the index of its first symbol.
	pub fn symbol_window(&self, chips_per_symbol:i64, symbol_rate:u64) -> (TimeInterval, i64) {
		let first_symbol = self.first_chip.div_euclid(chips_per_symbol);
		let end_symbol = if self.count == 0 { first_symbol }
			else { (self.first_chip + self.count as i64 - 1).div_euclid(chips_per_symbol) + 1 };
		let start = GnssTime::from_sample_index(first_symbol, symbol_rate);
		let end = GnssTime::from_sample_index(end_symbol, symbol_rate);
		(TimeInterval::new(start, end - start), first_symbol)
	}

}

/// Logic level to chip value: 0 -> +1, 1 -> -1.
pub fn level(bit:u8) -> i8 { if bit & 1 == 0 { 1 } else { -1 } }

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn window_covers_worst_case_travel_time() {
		let interval = TimeInterval::new(GnssTime::from_week_seconds(2201, 100.0), GnssTimeSpan::from_seconds(0.01));
		let max = GnssTimeSpan::from_seconds(0.09);
		let w = ChipWindow::new(interval, max, GnssTimeSpan::from_seconds(0.07), 1_023_000).unwrap();
		assert_eq!(w.count, 102_300);
		assert_eq!(w.offset_samples, 20_460);
		assert_eq!(w.first_chip, interval.start.sample_index(1_023_000) - 92_070);

		assert!(ChipWindow::new(interval, max, GnssTimeSpan::from_seconds(0.1), 1_023_000).is_err());
	}

	#[test]
	fn symbol_window_spans_partial_symbols() {
		let w = ChipWindow{ first_chip: 25, count: 50, offset_samples: 0 };
		let (interval, first) = w.symbol_window(20, 1000);
		assert_eq!(first, 1);
		assert_eq!(interval.start, GnssTime::from_nanos(1_000_000));
		assert_eq!(interval.width.samples(1000), 3);
	}

	#[test]
	fn slice_starts_at_offset() {
		let sig = ModulationSignal{ chips: Arc::new(vec![1, 1, -1, -1, 1]), offset_samples: 2, chip_rate: 1000 };
		assert_eq!(sig.slice(GnssTimeSpan::from_nanos(3_000_000)).unwrap(), &[-1, -1, 1]);
		assert!(sig.slice(GnssTimeSpan::from_nanos(4_000_000)).is_err());
		assert_eq!(level(0), 1);
		assert_eq!(level(1), -1);
	}
}
