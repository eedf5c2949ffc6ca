
use std::sync::Arc;

use crate::Result;
use crate::gnss::constellation::SimulationContext;
use crate::gnss::gps_l5::{L5Component, CHIP_RATE_HZ, CODE_LENGTH};
use crate::gnss::observation::Observation;
use crate::gnss::signal::{CnavSignal, SignalType};
use crate::time::TimeInterval;

use super::{ChipWindow, Modulation, ModulationSignal, SpreadingCode, level};

/// L5: primary code times the Neumann-Hoffman secondary code, times the CNAV symbols on I5 only.
#[derive(Debug, Clone, Copy)]
pub struct ModulationTiered {
	component:L5Component,
}

impl ModulationTiered {

	pub fn new(component:L5Component) -> Self { Self{ component } }

	pub fn component(&self) -> L5Component { self.component }

}

impl Modulation for ModulationTiered {

	fn signal_type(&self) -> SignalType {
		match self.component {
			L5Component::I5 => SignalType::L5I,
			L5Component::Q5 => SignalType::L5Q,
		}
	}

	fn modulate(&self, ctx:&SimulationContext, interval:TimeInterval, observation:&Observation) -> Result<ModulationSignal> {
		let window = ChipWindow::new(interval, ctx.max_travel_time(), observation.travel_time, CHIP_RATE_HZ)?;
		let code_kind = match self.component {
			L5Component::I5 => SpreadingCode::I5,
			L5Component::Q5 => SpreadingCode::Q5,
		};
		let primary = ctx.spreading_code(code_kind, observation.prn)?;
		let secondary = self.component.secondary_code();

		let chips_per_symbol = (CHIP_RATE_HZ / CnavSignal::L5.symbol_rate()) as i64;
		let data = match self.component {
			L5Component::I5 => {
				let (data_interval, first_symbol) = window.symbol_window(chips_per_symbol, CnavSignal::L5.symbol_rate());
				Some((ctx.navigation_data_cnav(CnavSignal::L5, data_interval, observation.sat_index)?, first_symbol))
			},
			L5Component::Q5 => None,
		};

		let code_len = CODE_LENGTH as i64;
		let chips:Vec<i8> = window.chips().map(|c| {
			let symbol = match &data {
				Some((symbols, first)) => symbols[(c.div_euclid(chips_per_symbol) - first) as usize],
				None => 0,
			};
			let nh = secondary[c.div_euclid(code_len).rem_euclid(secondary.len() as i64) as usize];
			level(primary[c.rem_euclid(code_len) as usize] ^ symbol) * nh
		}).collect();

		Ok(ModulationSignal{ chips: Arc::new(chips), offset_samples: window.offset_samples, chip_rate: CHIP_RATE_HZ })
	}

}
