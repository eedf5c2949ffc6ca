
use std::sync::Arc;

use crate::Result;
use crate::gnss::constellation::SimulationContext;
use crate::gnss::gps_p::{self, CHIP_RATE_HZ};
use crate::gnss::observation::Observation;
use crate::gnss::signal::{SignalType, LNAV_BIT_RATE};
use crate::time::TimeInterval;

use super::{ChipWindow, Modulation, ModulationSignal, level};

const CHIPS_PER_BIT:i64 = (CHIP_RATE_HZ / LNAV_BIT_RATE) as i64;

/// P code on L1 or L2, carrying the same LNAV bits as C/A. The chips depend only on the
/// interval and satellite, so both carriers share one cached copy.
#[derive(Debug, Clone, Copy)]
pub struct ModulationP {
	signal:SignalType,
}

impl ModulationP {

	pub fn new(signal:SignalType) -> Self { Self{ signal } }

}

impl Modulation for ModulationP {

	fn signal_type(&self) -> SignalType { self.signal }

	fn modulate(&self, ctx:&SimulationContext, interval:TimeInterval, observation:&Observation) -> Result<ModulationSignal> {
		let window = ChipWindow::new(interval, ctx.max_travel_time(), observation.travel_time, CHIP_RATE_HZ)?;

		let chips = ctx.modulation_p().get_or_create((interval, observation.sat_index), || {
			let (data_interval, first_bit) = window.symbol_window(CHIPS_PER_BIT, LNAV_BIT_RATE);
			let bits = ctx.navigation_data_ca(data_interval, observation.sat_index)?;
			let code = gps_p::p_code(observation.prn, window.first_chip, window.count)?;
			log::debug!("PRN {:02} P code over {} chips", observation.prn, window.count);

			let chips:Vec<i8> = window.chips().zip(code.iter()).map(|(c, code_chip)| {
				level(code_chip ^ bits[(c.div_euclid(CHIPS_PER_BIT) - first_bit) as usize])
			}).collect();
			Ok(Arc::new(chips))
		})?;

		Ok(ModulationSignal{ chips, offset_samples: window.offset_samples, chip_rate: CHIP_RATE_HZ })
	}

}
