
extern crate byteorder;
extern crate clap;
extern crate colored;
extern crate env_logger;
extern crate gnss_baseband;
extern crate serde;
extern crate serde_json;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

use byteorder::WriteBytesExt;
use clap::{Arg, App};
use colored::*;
use serde::Serialize;

use gnss_baseband::almanac::Almanac;
use gnss_baseband::gnss::constellation::{Constellation, ConstellationConfig};
use gnss_baseband::gnss::signal::{NavFormat, SignalType};
use gnss_baseband::time::{GnssTime, GnssTimeSpan, TimeInterval};
use gnss_baseband::utils::kinematics::{PositionWGS84, wgs84_to_ecef};

#[derive(Debug, Serialize)]
struct NavBitsReport {
	prn:u8,
	signal:SignalType,
	week:u32,
	seconds_of_week:f64,
	symbol_rate:u64,
	symbols:Vec<u8>,
}

fn parse_signal(s:&str) -> SignalType {
	match s {
		"L1CA" => SignalType::L1CA,
		"L1P"  => SignalType::L1P,
		"L1M"  => SignalType::L1M,
		"L2C"  => SignalType::L2C,
		"L2P"  => SignalType::L2P,
		"L2M"  => SignalType::L2M,
		"L5I"  => SignalType::L5I,
		"L5Q"  => SignalType::L5Q,
		x => panic!("{} isn't a valid signal", x),
	}
}

fn main() {

	env_logger::init();

	let matches = App::new("GPS Navigation Bits")
		.version("0.1.0")
		.about("Loads a Yuma almanac and prints the navigation symbols one satellite broadcasts, optionally writing its chips")
		.arg(Arg::with_name("almanac")
			.short("a").long("almanac")
			.help("Yuma almanac filename")
			.required(true).takes_value(true))
		.arg(Arg::with_name("week")
			.short("w").long("week")
			.help("Full GPS week number")
			.required(true).takes_value(true))
		.arg(Arg::with_name("tow")
			.short("t").long("tow")
			.help("Start time [seconds of week]")
			.required(true).takes_value(true))
		.arg(Arg::with_name("duration")
			.short("d").long("duration")
			.help("Duration [sec]")
			.takes_value(true).default_value("6"))
		.arg(Arg::with_name("prn")
			.long("prn")
			.takes_value(true).required(true))
		.arg(Arg::with_name("signal")
			.short("s").long("signal")
			.takes_value(true).default_value("L1CA")
			.possible_values(&["L1CA", "L1P", "L1M", "L2C", "L2P", "L2M", "L5I", "L5Q"]))
		.arg(Arg::with_name("config")
			.short("c").long("config")
			.help("Constellation configuration (JSON)")
			.takes_value(true))
		.arg(Arg::with_name("json")
			.long("json")
			.help("Print the symbols as JSON"))
		.arg(Arg::with_name("chips")
			.long("chips")
			.help("Write the received chips (one i8 each) to this file; needs --lat and --lon")
			.takes_value(true))
		.arg(Arg::with_name("lat").long("lat").help("Receiver latitude [deg]").takes_value(true))
		.arg(Arg::with_name("lon").long("lon").help("Receiver longitude [deg]").takes_value(true))
		.arg(Arg::with_name("height").long("height").help("Receiver height [m]").takes_value(true).default_value("0"))
		.get_matches();

	let week:u32 = matches.value_of("week").unwrap().parse().unwrap();
	let tow:f64 = matches.value_of("tow").unwrap().parse().unwrap();
	let duration:f64 = matches.value_of("duration").unwrap().parse().unwrap();
	let prn:u8 = matches.value_of("prn").unwrap().parse().unwrap();
	let signal = parse_signal(matches.value_of("signal").unwrap());

	let almanac = match Almanac::from_yuma_file(matches.value_of("almanac").unwrap(), week) {
		Ok(a) => Arc::new(a),
		Err(e) => {
			eprintln!("{}", format!("Unable to load almanac: {}", e).red());
			std::process::exit(1);
		}
	};
	if !almanac.has_satellites() {
		eprintln!("{}", "Almanac holds no satellites".red());
		std::process::exit(1);
	}

	let mut config = match matches.value_of("config") {
		Some(path) => ConstellationConfig::from_json_file(path).unwrap(),
		None => ConstellationConfig::default(),
	};
	config.signals = vec![signal];

	let start = GnssTime::from_week_seconds(week, tow);
	let interval = TimeInterval::new(start, GnssTimeSpan::from_seconds(duration));
	// The CNAV encoders start from zero at the packet holding `start` rather than one a travel time earlier
	let run_start = start + config.max_travel_time();
	let constellation = Constellation::new(almanac, config, run_start).unwrap();
	let sat_index = (prn as usize) - 1;

	let (symbols, symbol_rate) = match signal.nav_format() {
		Some(format) => {
			let symbols = match format {
				NavFormat::Lnav => constellation.get_or_create_navigation_data_ca(interval, sat_index).map(|b| b.to_vec()),
				NavFormat::Cnav(s) => constellation.context().navigation_data_cnav(s, interval, sat_index),
			};
			match symbols {
				Ok(s) => (s, format.symbol_rate()),
				Err(e) => {
					eprintln!("{}", format!("PRN {:02}: {}", prn, e).red());
					std::process::exit(1);
				}
			}
		},
		None => (vec![], 0),
	};

	eprintln!("{}", format!("PRN {:02} {:?}: {} symbols at {} [sym/sec] from week {} TOW {}", prn, signal, symbols.len(), symbol_rate, week, tow).green());

	if matches.is_present("json") {
		let report = NavBitsReport{ prn, signal, week, seconds_of_week: tow, symbol_rate, symbols };
		println!("{}", serde_json::to_string_pretty(&report).unwrap());
	} else {
		for line in symbols.chunks(60) {
			println!("{}", line.iter().map(|b| if *b == 0 { '0' } else { '1' }).collect::<String>());
		}
	}

	if let Some(path) = matches.value_of("chips") {
		let receiver = wgs84_to_ecef(&PositionWGS84 {
			latitude: matches.value_of("lat").expect("--chips needs --lat").parse::<f64>().unwrap().to_radians(),
			longitude: matches.value_of("lon").expect("--chips needs --lon").parse::<f64>().unwrap().to_radians(),
			height_above_ellipsoid: matches.value_of("height").unwrap().parse().unwrap(),
		});

		let obs = match constellation.observe(sat_index, &receiver, start).unwrap() {
			Some(obs) => obs,
			None => {
				eprintln!("{}", format!("PRN {:02} is not visible from the receiver", prn).yellow());
				std::process::exit(2);
			}
		};
		eprintln!("{}", format!("Elevation {:5.1} [deg], azimuth {:5.1} [deg], pseudorange {:.1} [m], Doppler {:.1} [Hz]",
			obs.elevation.to_degrees(), obs.azimuth.to_degrees(), obs.pseudorange, obs.doppler(signal.carrier_frequency())).cyan());

		let modulation = constellation.get_modulation(signal, interval, &obs).unwrap();
		let chips = modulation.slice(interval.width).unwrap();
		let mut out = BufWriter::new(File::create(path).unwrap());
		for c in chips { out.write_i8(*c).unwrap(); }
		out.flush().unwrap();
		eprintln!("{}", format!("Wrote {} chips at {} [chips/sec] to {}", chips.len(), modulation.chip_rate, path).green());
	}

	constellation.finalize().unwrap();
}
