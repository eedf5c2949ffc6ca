
use std::sync::Arc;

use crate::Result;
use crate::gnss::constellation::SimulationContext;
use crate::gnss::gps_l2c::{CHIP_RATE_HZ, CL_CODE_LENGTH, CM_CODE_LENGTH};
use crate::gnss::observation::Observation;
use crate::gnss::signal::{CnavSignal, SignalType};
use crate::time::TimeInterval;

use super::{ChipWindow, Modulation, ModulationSignal, SpreadingCode, level};

// One CM period (20 ms) per CNAV symbol; CM and CL alternate chip by chip
const CHIPS_PER_SYMBOL:i64 = 2 * CM_CODE_LENGTH as i64;

/// L2C: CM chips carrying the CNAV symbols, time-multiplexed with the data-free CL chips.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModulationCMCL;

impl Modulation for ModulationCMCL {

	fn signal_type(&self) -> SignalType { SignalType::L2C }

	fn modulate(&self, ctx:&SimulationContext, interval:TimeInterval, observation:&Observation) -> Result<ModulationSignal> {
		let window = ChipWindow::new(interval, ctx.max_travel_time(), observation.travel_time, CHIP_RATE_HZ)?;
		let cm = ctx.spreading_code(SpreadingCode::Cm, observation.prn)?;
		let cl = ctx.spreading_code(SpreadingCode::Cl, observation.prn)?;
		let (data_interval, first_symbol) = window.symbol_window(CHIPS_PER_SYMBOL, CnavSignal::L2C.symbol_rate());
		let symbols = ctx.navigation_data_cnav(CnavSignal::L2C, data_interval, observation.sat_index)?;

		let chips:Vec<i8> = window.chips().map(|c| {
			let half = c.div_euclid(2);
			if c.rem_euclid(2) == 0 {
				let symbol = symbols[(c.div_euclid(CHIPS_PER_SYMBOL) - first_symbol) as usize];
				level(cm[half.rem_euclid(CM_CODE_LENGTH as i64) as usize] ^ symbol)
			} else {
				level(cl[half.rem_euclid(CL_CODE_LENGTH as i64) as usize])
			}
		}).collect();

		Ok(ModulationSignal{ chips: Arc::new(chips), offset_samples: window.offset_samples, chip_rate: CHIP_RATE_HZ })
	}

}
