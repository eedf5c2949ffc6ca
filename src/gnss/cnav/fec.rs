
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::{GnssSimErr, Result};
use crate::utils::sync::lock_named;

/// Encoder shift registers stored per packet, one slot per PRN 1 through 63
pub const FEC_SLOTS:usize = 63;

const STATE_MASK:u8 = 0x3F;
const WAIT_WARNING_INTERVAL:Duration = Duration::from_secs(5);

// `x` holds the current input in bit 6 and the six previous inputs below it, most recent first
fn cnav_fec(x:u8) -> (u8, u8) {

	let bit6:u8 = (x >> 6) & 1;
	let bit5:u8 = (x >> 5) & 1;
	let bit4:u8 = (x >> 4) & 1;
	let bit3:u8 = (x >> 3) & 1;

	// Both G1 and G2 skip bit2

	let bit1:u8 = (x >> 1) & 1;
	let bit0:u8 =  x       & 1;

	let g1:u8 = bit6 ^ bit5 ^ bit4 ^ bit3 ^        bit0;
	let g2:u8 = bit6 ^        bit4 ^ bit3 ^ bit1 ^ bit0;

	(g1, g2)

}

/// Rate 1/2, constraint length 7 convolutional encoder (G1 = 171, G2 = 133 octal), G1 symbol first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvolutionalEncoder {
	state:u8,
}

impl ConvolutionalEncoder {

	pub fn new(state:u8) -> Self { Self{ state: state & STATE_MASK } }

	/// The six most recent inputs, most recent in bit 5.
	pub fn state(&self) -> u8 { self.state }

	pub fn encode_bit(&mut self, bit:u8) -> (u8, u8) {
		let x:u8 = ((bit & 1) << 6) | self.state;
		let symbols = cnav_fec(x);
		self.state = x >> 1;
		symbols
	}

	pub fn encode(&mut self, bits:&[u8], out:&mut Vec<u8>) {
		out.reserve(2 * bits.len());
		for b in bits {
			let (g1, g2) = self.encode_bit(*b);
			out.push(g1);
			out.push(g2);
		}
	}

}

#[derive(Debug)]
struct FecTable {
	entries: HashMap<i64, [Option<u8>; FEC_SLOTS]>,
	order: VecDeque<i64>,
	awaited: HashSet<i64>,
	// First packet each PRN was requested or published at
	first_packet: [Option<i64>; FEC_SLOTS],
	finalized: bool,
}

impl Default for FecTable {
	fn default() -> Self {
		Self {
			entries: HashMap::new(),
			order: VecDeque::new(),
			awaited: HashSet::new(),
			first_packet: [None; FEC_SLOTS],
			finalized: false,
		}
	}
}

/// Encoder state at each packet boundary, shared by every generation call of one run.
/// Each (packet, PRN) slot is written once; readers block until it is present. A PRN's
/// encoder starts from the zero state at the run origin or, for a satellite first
/// requested later, at the packet of its first request.
#[derive(Debug)]
pub struct FecLibrary {
	name:&'static str,
	origin_packet:i64,
	capacity:usize,
	lock_timeout:Duration,
	table:Mutex<FecTable>,
	published:Condvar,
}

impl FecLibrary {

	/// Packets at or before `origin_packet` start from the all-zero state.
	pub fn new(name:&'static str, origin_packet:i64, capacity:usize, lock_timeout:Duration) -> Self {
		Self {
			name,
			origin_packet,
			capacity: capacity.max(2),
			lock_timeout,
			table: Mutex::new(FecTable::default()),
			published: Condvar::new(),
		}
	}

	pub fn origin_packet(&self) -> i64 { self.origin_packet }

	fn slot(prn:u8) -> Result<usize> {
		if prn >= 1 && (prn as usize) <= FEC_SLOTS { Ok((prn as usize) - 1) }
		else { Err(GnssSimErr::InvalidArgument(format!("PRN {} has no FEC slot", prn))) }
	}

	/// Encoder state at the start of `packet` for `prn`, waiting for the call that produces it.
	pub fn state(&self, packet:i64, prn:u8) -> Result<u8> {
		let slot = Self::slot(prn)?;
		let mut table = lock_named(&self.table, self.name, self.lock_timeout)?;
		if packet <= self.origin_packet {
			if table.first_packet[slot].is_none() { table.first_packet[slot] = Some(self.origin_packet); }
			return Ok(0);
		}

		loop {
			if let Some(state) = table.entries.get(&packet).and_then(|e| e[slot]) {
				return Ok(state);
			}
			match table.first_packet[slot] {
				None => {
					log::debug!("{}: PRN {} first requested at packet {}, encoder starts from zero", self.name, prn, packet);
					table.first_packet[slot] = Some(packet);
					return Ok(0);
				},
				Some(first) if packet <= first => return Ok(0),
				Some(_) => {},
			}
			if table.finalized {
				log::error!("{}: no encoder state for PRN {} at packet {} after finalization", self.name, prn, packet);
				return Ok(0);
			}
			table.awaited.insert(packet);

			let (guard, wait) = match self.published.wait_timeout(table, WAIT_WARNING_INTERVAL) {
				Ok(r) => r,
				Err(poisoned) => poisoned.into_inner(),
			};
			table = guard;
			if wait.timed_out() {
				log::warn!("{}: still waiting for the encoder state of PRN {} at packet {}", self.name, prn, packet);
			}
		}
	}

	/// Record the encoder state at the start of `packet`. The first value written wins.
	pub fn publish(&self, packet:i64, prn:u8, state:u8) -> Result<()> {
		let slot = Self::slot(prn)?;
		{
			let mut table = lock_named(&self.table, self.name, self.lock_timeout)?;
			if table.first_packet[slot].is_none() {
				table.first_packet[slot] = Some(packet);
			}
			if !table.entries.contains_key(&packet) {
				table.entries.insert(packet, [None; FEC_SLOTS]);
				table.order.push_back(packet);
				while table.order.len() > self.capacity {
					if let Some(oldest) = table.order.pop_front() {
						table.entries.remove(&oldest);
						table.awaited.remove(&oldest);
					}
				}
			}
			if let Some(entry) = table.entries.get_mut(&packet) {
				match entry[slot] {
					None => entry[slot] = Some(state & STATE_MASK),
					Some(existing) if existing != (state & STATE_MASK) => {
						log::error!("{}: conflicting encoder state for PRN {} at packet {} ({} kept, {} dropped)", self.name, prn, packet, existing, state);
					},
					Some(_) => {},
				}
			}
		}
		self.published.notify_all();
		Ok(())
	}

	/// Default every unset slot to the zero state and release all waiters.
	pub fn finalize(&self) -> Result<()> {
		{
			let mut table = lock_named(&self.table, self.name, self.lock_timeout)?;
			table.finalized = true;

			let missing:Vec<i64> = table.awaited.iter().copied().filter(|p| !table.entries.contains_key(p)).collect();
			for packet in missing {
				log::error!("{}: encoder state for packet {} was awaited but never produced", self.name, packet);
				table.entries.insert(packet, [Some(0); FEC_SLOTS]);
			}
			for entry in table.entries.values_mut() {
				for s in entry.iter_mut().filter(|s| s.is_none()) { *s = Some(0); }
			}
		}
		self.published.notify_all();
		Ok(())
	}

}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use std::thread;

	#[test]
	fn impulse_response_is_generator_taps() {
		let mut enc = ConvolutionalEncoder::new(0);
		let mut out = vec![];
		enc.encode(&[1, 0, 0, 0, 0, 0, 0], &mut out);
		let g1:Vec<u8> = out.iter().step_by(2).copied().collect();
		let g2:Vec<u8> = out.iter().skip(1).step_by(2).copied().collect();
		assert_eq!(g1, vec![1, 1, 1, 1, 0, 0, 1]);
		assert_eq!(g2, vec![1, 0, 1, 1, 0, 1, 1]);
		assert_eq!(enc.state(), 0);
	}

	#[test]
	fn resumed_encoder_matches_continuous_run() {
		let bits:Vec<u8> = (0..120).map(|i| ((i * i + 3) % 5 % 2) as u8).collect();
		let mut whole = vec![];
		ConvolutionalEncoder::new(0).encode(&bits, &mut whole);

		let mut first = ConvolutionalEncoder::new(0);
		let mut split = vec![];
		first.encode(&bits[..50], &mut split);
		ConvolutionalEncoder::new(first.state()).encode(&bits[50..], &mut split);
		assert_eq!(whole, split);
	}

	#[test]
	fn origin_and_earlier_packets_are_zero() {
		let lib = FecLibrary::new("fec", 100, 8, Duration::from_secs(1));
		assert_eq!(lib.state(100, 5).unwrap(), 0);
		assert_eq!(lib.state(42, 5).unwrap(), 0);
		assert!(lib.state(101, 0).is_err());
	}

	#[test]
	fn first_request_of_a_prn_starts_from_zero() {
		let lib = FecLibrary::new("fec", 0, 8, Duration::from_secs(1));
		assert_eq!(lib.state(50, 3).unwrap(), 0);
		assert_eq!(lib.state(49, 3).unwrap(), 0);

		// Another PRN keeps its own starting packet
		lib.publish(12, 4, 0x15).unwrap();
		assert_eq!(lib.state(12, 4).unwrap(), 0x15);
		assert_eq!(lib.state(7, 4).unwrap(), 0);
	}

	#[test]
	fn first_write_wins_and_wakes_reader() {
		let lib = Arc::new(FecLibrary::new("fec", 0, 8, Duration::from_secs(1)));
		lib.publish(1, 7, 0x01).unwrap();
		let reader = {
			let lib = lib.clone();
			thread::spawn(move || lib.state(3, 7).unwrap())
		};
		thread::sleep(Duration::from_millis(20));
		lib.publish(3, 7, 0x2A).unwrap();
		lib.publish(3, 7, 0x11).unwrap();
		assert_eq!(reader.join().unwrap(), 0x2A);
		assert_eq!(lib.state(3, 7).unwrap(), 0x2A);
	}

	#[test]
	fn finalize_releases_waiters() {
		let lib = Arc::new(FecLibrary::new("fec", 0, 8, Duration::from_secs(1)));
		lib.publish(2, 1, 9).unwrap();
		let reader = {
			let lib = lib.clone();
			thread::spawn(move || lib.state(5, 1).unwrap())
		};
		thread::sleep(Duration::from_millis(20));
		lib.finalize().unwrap();
		assert_eq!(reader.join().unwrap(), 0);
		assert_eq!(lib.state(2, 2).unwrap(), 0);
		assert_eq!(lib.state(2, 1).unwrap(), 9);
	}
}
