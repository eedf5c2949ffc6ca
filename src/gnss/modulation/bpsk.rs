
use std::sync::Arc;

use crate::Result;
use crate::gnss::constellation::SimulationContext;
use crate::gnss::gps_l1_ca::{CHIPS_PER_BIT, CHIP_RATE_HZ, CODE_LENGTH};
use crate::gnss::observation::Observation;
use crate::gnss::signal::{SignalType, LNAV_BIT_RATE};
use crate::time::TimeInterval;

use super::{ChipWindow, Modulation, ModulationSignal, SpreadingCode, level};

/// L1 C/A: the Gold code times the LNAV data bits.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModulationBPSK;

impl Modulation for ModulationBPSK {

	fn signal_type(&self) -> SignalType { SignalType::L1CA }

	fn modulate(&self, ctx:&SimulationContext, interval:TimeInterval, observation:&Observation) -> Result<ModulationSignal> {
		let window = ChipWindow::new(interval, ctx.max_travel_time(), observation.travel_time, CHIP_RATE_HZ)?;
		let code = ctx.spreading_code(SpreadingCode::Ca, observation.prn)?;
		let (data_interval, first_bit) = window.symbol_window(CHIPS_PER_BIT as i64, LNAV_BIT_RATE);
		let bits = ctx.navigation_data_ca(data_interval, observation.sat_index)?;

		let chips:Vec<i8> = window.chips().map(|c| {
			let code_chip = code[c.rem_euclid(CODE_LENGTH as i64) as usize];
			let bit = bits[(c.div_euclid(CHIPS_PER_BIT as i64) - first_bit) as usize];
			level(code_chip ^ bit)
		}).collect();

		Ok(ModulationSignal{ chips: Arc::new(chips), offset_samples: window.offset_samples, chip_rate: CHIP_RATE_HZ })
	}

}
