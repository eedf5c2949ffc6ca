
use crate::{GnssSimErr, Result};
use crate::almanac::{self, Almanac, Satellite};
use crate::gnss::navigation::{NavigationData, NavigationParameters, leap_second_fields, slice_to_interval};
use crate::gnss::signal::{CnavSignal, NavFormat};
use crate::time::{GnssTime, GnssTimeSpan, LeapSecondTable, TimeInterval};

pub mod error_detection;
pub mod fec;
pub mod message;

use error_detection::Crc24q;
use fec::{ConvolutionalEncoder, FecLibrary};
use message::{Message, MessageBody, MESSAGE_BITS};

/// Bits per packet including the CRC, before convolutional encoding
pub const PACKET_BITS:usize = 300;

const TOW_COUNTS_PER_WEEK:i64 = 100_800;
const TOW_COUNT_PERIOD:GnssTimeSpan = GnssTimeSpan::from_whole_seconds(6);

/// Index of the packet transmitted at `t`, counted from the GPS epoch.
pub fn packet_index(t:GnssTime, signal:CnavSignal) -> i64 {
	t.nanos().div_euclid(signal.packet_period().nanos())
}

pub fn packet_start(packet:i64, signal:CnavSignal) -> GnssTime {
	GnssTime::from_nanos(packet * signal.packet_period().nanos())
}

/// TOW count (6 s units) of the start of the packet following `packet`.
pub fn next_tow_count(packet:i64, signal:CnavSignal) -> u32 {
	let next = packet_start(packet + 1, signal);
	next.nanos().div_euclid(TOW_COUNT_PERIOD.nanos()).rem_euclid(TOW_COUNTS_PER_WEEK) as u32
}

/// Civil navigation message generator (L2C or L5) for one satellite.
pub struct NavigationDataCNav<'a> {
	almanac:&'a Almanac,
	sat_index:usize,
	signal:CnavSignal,
	parameters:&'a NavigationParameters,
	leap_seconds:&'a LeapSecondTable,
	fec:&'a FecLibrary,
}

impl<'a> NavigationDataCNav<'a> {

	pub fn new(almanac:&'a Almanac, sat_index:usize, signal:CnavSignal, parameters:&'a NavigationParameters,
		leap_seconds:&'a LeapSecondTable, fec:&'a FecLibrary) -> Result<Self> {
		if almanac.baseline(sat_index).is_none() {
			return Err(GnssSimErr::InvalidArgument(format!("no almanac data for satellite index {}", sat_index)));
		}
		Ok(Self{ almanac, sat_index, signal, parameters, leap_seconds, fec })
	}

	fn prn(&self) -> u8 { (self.sat_index + 1) as u8 }

	fn ephemeris(&self, t:GnssTime) -> Result<Satellite> {
		self.almanac.create_ephemeris(self.sat_index, t, NavFormat::Cnav(self.signal))?
			.ok_or_else(|| GnssSimErr::Generation(format!("ephemeris for satellite index {} disappeared", self.sat_index)))
	}

	/// The unencoded message carried by `packet`.
	pub fn message(&self, packet:i64) -> Result<Message> {
		let t = packet_start(packet, self.signal);
		let eph = self.ephemeris(t)?;
		let body = match message::message_type_for_packet(packet) {
			10 => MessageBody::Type10(message::type10::Body::from_ephemeris(&eph)),
			11 => MessageBody::Type11(message::type11::Body::from_ephemeris(&eph)),
			30 => MessageBody::Type30(message::type30::Body::from_ephemeris(&eph, self.parameters)),
			_  => MessageBody::Type33(message::type33::Body::new(&eph, self.parameters, almanac::time_of_almanac(t), leap_second_fields(self.leap_seconds, t))),
		};
		Ok(Message {
			prn: self.prn(),
			time_of_week_truncated: next_tow_count(packet, self.signal),
			alert_flag: false,
			body,
		})
	}

	/// Message bits of `packet` followed by its CRC.
	pub fn packet_bits(&self, packet:i64) -> Result<Vec<u8>> {
		let mut bits:Vec<u8> = Vec::with_capacity(PACKET_BITS);
		self.message(packet)?.encode()?.finish_words(MESSAGE_BITS, &mut Crc24q, &mut bits)?;
		Ok(bits)
	}

}

impl<'a> NavigationData for NavigationDataCNav<'a> {

	fn symbol_rate(&self) -> u64 { self.signal.symbol_rate() }

	fn generate(&self, interval:TimeInterval) -> Result<Vec<u8>> {
		let rate = self.signal.symbol_rate();
		let first_packet = packet_index(interval.start, self.signal);
		let first = packet_start(first_packet, self.signal);
		let symbols_per_packet = self.signal.packet_period().samples(rate) as usize;

		let needed = (interval.start.sample_index(rate) - first.sample_index(rate)) + interval.width.samples(rate);
		let packet_count = (needed.max(0) as usize + symbols_per_packet - 1) / symbols_per_packet;
		if packet_count == 0 { return Ok(vec![]); }

		// Resume the encoder where the packet before this one left it
		let mut encoder = ConvolutionalEncoder::new(self.fec.state(first_packet, self.prn())?);
		let mut buffer:Vec<u8> = Vec::with_capacity(packet_count * symbols_per_packet);
		for k in 0..(packet_count as i64) {
			let packet = first_packet + k;
			let bits = self.packet_bits(packet)?;
			log::debug!("PRN {:02} {:?} packet {} type {}", self.prn(), self.signal, packet, message::message_type_for_packet(packet));
			encoder.encode(&bits, &mut buffer);
			self.fec.publish(packet + 1, self.prn(), encoder.state())?;
		}

		slice_to_interval(&buffer, first, interval, rate)
	}

}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;
	use crate::time::LeapSecond;
	use crate::utils::bits_to_int::{to_u32, to_u8};

	fn test_almanac() -> Almanac {
		let sats = (1..=8u8).map(|id| Satellite {
			id,
			health: 0,
			is_enabled: true,
			week: 2200,
			time_of_applicability: 405_504.0,
			issue_of_data_clock: 0,
			sqrt_a: 5153.6,
			eccentricity: 0.01,
			inclination: 0.96,
			longitude_of_ascending_node: (id as f64) * 0.7 - 3.0,
			argument_of_perigee: 0.5,
			mean_anomaly: (id as f64) * 0.3,
			mean_motion_correction: 4.0e-9,
			rate_of_longitude_of_ascending_node: -8.0e-9,
			rate_of_inclination: 1.0e-10,
			af0: 2.0e-5,
			af1: 1.0e-12,
			af2: 0.0,
			transmission_interval: TimeInterval::new(GnssTime::from_week_seconds(2200, 405_504.0), GnssTimeSpan::from_whole_seconds(86_016)),
		}).collect();
		Almanac::new(sats).unwrap()
	}

	fn fec_for(start:GnssTime, signal:CnavSignal) -> FecLibrary {
		FecLibrary::new("test fec", packet_index(start, signal), 64, Duration::from_secs(1))
	}

	// Viterbi-free inversion for a known starting state: the G1 stream alone determines the input
	fn decode_from(state:u8, symbols:&[u8]) -> Vec<u8> {
		let mut enc = ConvolutionalEncoder::new(state);
		symbols.chunks_exact(2).map(|pair| {
			let mut probe = enc;
			let (g1, _) = probe.encode_bit(0);
			let bit = if g1 == pair[0] { 0 } else { 1 };
			enc.encode_bit(bit);
			bit
		}).collect()
	}

	#[test]
	fn packets_carry_crc_and_cycle_types() {
		let alm = test_almanac();
		let params = NavigationParameters::default();
		let leaps = LeapSecondTable::default();
		let start = GnssTime::from_week_seconds(2201, 120.0);
		let fec = fec_for(start, CnavSignal::L2C);
		let nav = NavigationDataCNav::new(&alm, 2, CnavSignal::L2C, &params, &leaps, &fec).unwrap();

		let first = packet_index(start, CnavSignal::L2C);
		let mut types = vec![];
		for packet in first..(first + 8) {
			let bits = nav.packet_bits(packet).unwrap();
			assert_eq!(bits.len(), PACKET_BITS);
			assert!(error_detection::is_crc_ok(&bits));
			assert_eq!(&bits[0..8], &message::PREAMBLE);
			assert_eq!(to_u8(&bits[8..14]).unwrap(), 3);
			types.push(to_u8(&bits[14..20]).unwrap());
		}
		assert_eq!(types, vec![30, 33, 10, 11, 30, 33, 10, 11]);
	}

	#[test]
	fn tow_count_refers_to_next_packet() {
		// L2C packet starting at 120 s is followed by one at 132 s
		let packet = packet_index(GnssTime::from_week_seconds(2201, 120.0), CnavSignal::L2C);
		assert_eq!(next_tow_count(packet, CnavSignal::L2C), 22);
		let packet = packet_index(GnssTime::from_week_seconds(2201, 120.0), CnavSignal::L5);
		assert_eq!(next_tow_count(packet, CnavSignal::L5), 21);
		let last = packet_index(GnssTime::from_week_seconds(2201, 604_794.0), CnavSignal::L5);
		assert_eq!(next_tow_count(last, CnavSignal::L5), 0);
	}

	#[test]
	fn one_period_is_600_symbols() {
		let alm = test_almanac();
		let params = NavigationParameters::default();
		let leaps = LeapSecondTable::default();
		for signal in [CnavSignal::L2C, CnavSignal::L5].iter() {
			let start = GnssTime::from_week_seconds(2201, 36.0);
			let fec = fec_for(start, *signal);
			let nav = NavigationDataCNav::new(&alm, 0, *signal, &params, &leaps, &fec).unwrap();
			let symbols = nav.generate(TimeInterval::new(start, signal.packet_period())).unwrap();
			assert_eq!(symbols.len(), 600);

			// The first packet starts from the zero state, so it decodes back to a valid packet
			let bits = decode_from(0, &symbols);
			assert!(error_detection::is_crc_ok(&bits));
			assert_eq!(to_u32(&bits[20..37]).unwrap(), next_tow_count(packet_index(start, *signal), *signal));
		}
	}

	#[test]
	fn split_generation_keeps_encoder_continuous() {
		let alm = test_almanac();
		let params = NavigationParameters::default();
		let leaps = LeapSecondTable::new(vec![LeapSecond{ time: GnssTime::from_week_seconds(1900, 0.0), count: 18 }]);
		let start = GnssTime::from_week_seconds(2201, 600.0);

		let whole_fec = fec_for(start, CnavSignal::L5);
		let whole_nav = NavigationDataCNav::new(&alm, 4, CnavSignal::L5, &params, &leaps, &whole_fec).unwrap();
		let whole = whole_nav.generate(TimeInterval::new(start, GnssTimeSpan::from_whole_seconds(30))).unwrap();
		assert_eq!(whole.len(), 3000);

		let split_fec = fec_for(start, CnavSignal::L5);
		let split_nav = NavigationDataCNav::new(&alm, 4, CnavSignal::L5, &params, &leaps, &split_fec).unwrap();
		let mut pieces = vec![];
		let mut t = start;
		for width in [1.3, 4.7, 0.02, 6.0, 9.98, 8.0].iter() {
			let span = GnssTimeSpan::from_seconds(*width);
			pieces.extend(split_nav.generate(TimeInterval::new(t, span)).unwrap());
			t = t + span;
		}
		assert_eq!(whole, pieces);

		// Later packets decode from the state published at their boundary
		let state = whole_fec.state(packet_index(start, CnavSignal::L5) + 2, 5).unwrap();
		let bits = decode_from(state, &whole[1200..1800]);
		assert!(error_detection::is_crc_ok(&bits));
	}

	#[test]
	fn empty_slot_is_rejected() {
		let alm = test_almanac();
		let params = NavigationParameters::default();
		let leaps = LeapSecondTable::default();
		let fec = fec_for(GnssTime::from_week_seconds(2201, 0.0), CnavSignal::L2C);
		assert!(NavigationDataCNav::new(&alm, 20, CnavSignal::L2C, &params, &leaps, &fec).is_err());
	}
}
