
use std::sync::Arc;

use crate::Result;
use crate::gnss::constellation::SimulationContext;
use crate::gnss::gps_m::{self, SAMPLE_RATE_HZ};
use crate::gnss::observation::Observation;
use crate::gnss::signal::{SignalType, LNAV_BIT_RATE};
use crate::time::TimeInterval;

use super::{ChipWindow, Modulation, ModulationSignal, level};

const SAMPLES_PER_BIT:i64 = (SAMPLE_RATE_HZ / LNAV_BIT_RATE) as i64;

/// M code stand-in on L1 or L2 with the LNAV bits, cached like the P code.
#[derive(Debug, Clone, Copy)]
pub struct ModulationM {
	signal:SignalType,
}

impl ModulationM {

	pub fn new(signal:SignalType) -> Self { Self{ signal } }

}

impl Modulation for ModulationM {

	fn signal_type(&self) -> SignalType { self.signal }

	fn modulate(&self, ctx:&SimulationContext, interval:TimeInterval, observation:&Observation) -> Result<ModulationSignal> {
		let window = ChipWindow::new(interval, ctx.max_travel_time(), observation.travel_time, SAMPLE_RATE_HZ)?;

		let chips = ctx.modulation_m().get_or_create((interval, observation.sat_index), || {
			let (data_interval, first_bit) = window.symbol_window(SAMPLES_PER_BIT, LNAV_BIT_RATE);
			let bits = ctx.navigation_data_ca(data_interval, observation.sat_index)?;
			let samples = gps_m::m_code_samples(observation.prn, window.first_chip, window.count)?;

			let chips:Vec<i8> = window.chips().zip(samples.iter()).map(|(c, s)| {
				s * level(bits[(c.div_euclid(SAMPLES_PER_BIT) - first_bit) as usize])
			}).collect();
			Ok(Arc::new(chips))
		})?;

		Ok(ModulationSignal{ chips, offset_samples: window.offset_samples, chip_rate: SAMPLE_RATE_HZ })
	}

}
