
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use nalgebra::Vector3;

use crate::{GnssSimErr, Result};
use crate::almanac::{self, Almanac};
use crate::gnss::cnav::{self, NavigationDataCNav, fec::FecLibrary};
use crate::gnss::gps_l1_ca::NavigationDataL1CA;
use crate::gnss::gps_l5::L5Component;
use crate::gnss::modulation::{Modulation, ModulationSignal, SpreadingCode,
	ModulationBPSK, ModulationCMCL, ModulationTiered, ModulationP, ModulationM};
use crate::gnss::navigation::{NavigationData, NavigationParameters};
use crate::gnss::observation::{self, Observation};
use crate::gnss::signal::{CnavSignal, NavFormat, SignalType};
use crate::time::{GnssTime, GnssTimeSpan, LeapSecondTable, TimeInterval};
use crate::utils::sync::lock_named;

pub mod config;
pub mod library;

pub use config::ConstellationConfig;
pub use library::Library;

// Every PRN of every periodic code fits
const CODE_CACHE_CAPACITY:usize = 5 * 64;

/// Everything shared by the generation calls of one simulation run.
pub struct SimulationContext {
	almanac:Arc<Almanac>,
	parameters:NavigationParameters,
	leap_seconds:LeapSecondTable,
	max_travel_time:GnssTimeSpan,
	navigation_data_ca:Library<(TimeInterval, usize), Arc<Vec<u8>>>,
	modulation_p:Library<(TimeInterval, usize), Arc<Vec<i8>>>,
	modulation_m:Library<(TimeInterval, usize), Arc<Vec<i8>>>,
	codes:Library<(SpreadingCode, u8), Arc<Vec<u8>>>,
	fec_l2c:FecLibrary,
	fec_l5:FecLibrary,
}

impl SimulationContext {

	/// The CNAV encoders of a run starting at `start` begin from the zero state at the first
	/// packet any modulation window can reach.
	pub fn new(almanac:Arc<Almanac>, config:&ConstellationConfig, leap_seconds:LeapSecondTable, start:GnssTime) -> Self {
		let timeout = config.lock_timeout();
		let capacity = config.library_capacity;
		let earliest = start - config.max_travel_time();
		Self {
			almanac,
			parameters: config.navigation.clone(),
			leap_seconds,
			max_travel_time: config.max_travel_time(),
			navigation_data_ca: Library::new("NavigationDataLibraryCA", capacity * almanac::MAX_SATELLITES, timeout),
			modulation_p: Library::new("ModulationLibraryP", capacity * almanac::MAX_SATELLITES, timeout),
			modulation_m: Library::new("ModulationLibraryM", capacity * almanac::MAX_SATELLITES, timeout),
			codes: Library::new("SpreadingCodeLibrary", CODE_CACHE_CAPACITY, timeout),
			fec_l2c: FecLibrary::new("FecLibraryL2C", cnav::packet_index(earliest, CnavSignal::L2C), config.fec_capacity, timeout),
			fec_l5: FecLibrary::new("FecLibraryL5", cnav::packet_index(earliest, CnavSignal::L5), config.fec_capacity, timeout),
		}
	}

	pub fn almanac(&self) -> &Almanac { &self.almanac }

	pub fn max_travel_time(&self) -> GnssTimeSpan { self.max_travel_time }

	pub fn leap_seconds(&self) -> &LeapSecondTable { &self.leap_seconds }

	pub fn navigation_data_ca_library(&self) -> &Library<(TimeInterval, usize), Arc<Vec<u8>>> { &self.navigation_data_ca }

	pub fn modulation_p(&self) -> &Library<(TimeInterval, usize), Arc<Vec<i8>>> { &self.modulation_p }

	pub fn modulation_m(&self) -> &Library<(TimeInterval, usize), Arc<Vec<i8>>> { &self.modulation_m }

	pub fn fec(&self, signal:CnavSignal) -> &FecLibrary {
		match signal {
			CnavSignal::L2C => &self.fec_l2c,
			CnavSignal::L5  => &self.fec_l5,
		}
	}

	pub fn spreading_code(&self, code:SpreadingCode, prn:u8) -> Result<Arc<Vec<u8>>> {
		self.codes.get_or_create((code, prn), || Ok(Arc::new(code.generate(prn)?)))
	}

	/// LNAV bits of satellite `sat_index` over `interval`, generated once per run and shared
	/// by the C/A, P and M modulations.
	pub fn navigation_data_ca(&self, interval:TimeInterval, sat_index:usize) -> Result<Arc<Vec<u8>>> {
		self.navigation_data_ca.get_or_create((interval, sat_index), || {
			let generator = NavigationDataL1CA::new(&self.almanac, sat_index, &self.parameters, &self.leap_seconds)?;
			Ok(Arc::new(generator.generate(interval)?))
		})
	}

	/// CNAV symbols over `interval`; the encoder state carries over between calls through the FEC library.
	pub fn navigation_data_cnav(&self, signal:CnavSignal, interval:TimeInterval, sat_index:usize) -> Result<Vec<u8>> {
		let generator = NavigationDataCNav::new(&self.almanac, sat_index, signal, &self.parameters, &self.leap_seconds, self.fec(signal))?;
		generator.generate(interval)
	}

	pub fn finalize(&self) -> Result<()> {
		self.fec_l2c.finalize()?;
		self.fec_l5.finalize()
	}

}

fn build_modulation(signal:SignalType) -> Box<dyn Modulation> {
	match signal {
		SignalType::L1CA => Box::new(ModulationBPSK),
		SignalType::L2C  => Box::new(ModulationCMCL),
		SignalType::L5I  => Box::new(ModulationTiered::new(L5Component::I5)),
		SignalType::L5Q  => Box::new(ModulationTiered::new(L5Component::Q5)),
		SignalType::L1P | SignalType::L2P => Box::new(ModulationP::new(signal)),
		SignalType::L1M | SignalType::L2M => Box::new(ModulationM::new(signal)),
	}
}

/// GPS space segment of one simulation run: the almanac, the caches and one modulation per configured signal.
pub struct Constellation {
	config:ConstellationConfig,
	context:SimulationContext,
	modulations:HashMap<SignalType, Box<dyn Modulation>>,
	almanac_epoch:Mutex<Option<GnssTime>>,
}

impl Constellation {

	pub fn new(almanac:Arc<Almanac>, config:ConstellationConfig, start:GnssTime) -> Result<Self> {
		Self::with_leap_seconds(almanac, config, start, LeapSecondTable::default())
	}

	pub fn with_leap_seconds(almanac:Arc<Almanac>, config:ConstellationConfig, start:GnssTime, leap_seconds:LeapSecondTable) -> Result<Self> {
		if !almanac.has_satellites() {
			return Err(GnssSimErr::InvalidArgument("almanac holds no satellites".to_string()));
		}
		let modulations:HashMap<SignalType, Box<dyn Modulation>> = config.signals.iter()
			.map(|s| (*s, build_modulation(*s)))
			.collect();
		log::info!("constellation with {} satellites, signals {:?}", almanac.satellite_indices().len(), config.signals);

		let context = SimulationContext::new(almanac, &config, leap_seconds, start);
		let constellation = Self{ config, context, modulations, almanac_epoch: Mutex::new(None) };
		constellation.update_for_time(start)?;
		Ok(constellation)
	}

	pub fn config(&self) -> &ConstellationConfig { &self.config }

	pub fn context(&self) -> &SimulationContext { &self.context }

	pub fn almanac(&self) -> &Almanac { self.context.almanac() }

	pub fn signals(&self) -> Vec<SignalType> {
		let mut signals:Vec<SignalType> = self.modulations.keys().copied().collect();
		signals.sort();
		signals
	}

	/// Move the almanac baseline to the almanac reference time in force at `t`, if it changed.
	pub fn update_for_time(&self, t:GnssTime) -> Result<()> {
		let toa = almanac::time_of_almanac(t);
		let mut epoch = lock_named(&self.almanac_epoch, "AlmanacEpoch", self.config.lock_timeout())?;
		if *epoch != Some(toa) {
			self.context.almanac().update_almanac_for_time(toa);
			*epoch = Some(toa);
		}
		Ok(())
	}

	pub fn get_or_create_navigation_data_ca(&self, interval:TimeInterval, sat_index:usize) -> Result<Arc<Vec<u8>>> {
		self.context.navigation_data_ca(interval, sat_index)
	}

	pub fn get_modulation(&self, signal:SignalType, interval:TimeInterval, observation:&Observation) -> Result<ModulationSignal> {
		let modulation = self.modulations.get(&signal).ok_or(GnssSimErr::UnsupportedSignal(signal))?;
		modulation.modulate(&self.context, interval, observation)
	}

	/// Release every thread still waiting on encoder state; call once the run is over.
	pub fn finalize(&self) -> Result<()> { self.context.finalize() }

	/// Observation of satellite `sat_index` from `receiver` (ECEF), or `None` when the slot is
	/// empty or the satellite is below the elevation mask.
	pub fn observe(&self, sat_index:usize, receiver:&Vector3<f64>, receiver_time:GnssTime) -> Result<Option<Observation>> {
		let eph = match self.almanac().create_ephemeris(sat_index, receiver_time, NavFormat::Lnav)? {
			Some(eph) => eph,
			None => return Ok(None),
		};
		let day_of_year = self.config.day_of_year.unwrap_or_else(|| receiver_time.day_of_year());
		Ok(observation::observe(&eph, receiver, receiver_time, self.config.elevation_mask(), day_of_year))
	}

	pub fn observe_all(&self, receiver:&Vector3<f64>, receiver_time:GnssTime) -> Result<Vec<Observation>> {
		let mut visible = vec![];
		for idx in self.almanac().satellite_indices() {
			if let Some(obs) = self.observe(idx, receiver, receiver_time)? { visible.push(obs); }
		}
		Ok(visible)
	}

}
