
use super::*;
use crate::gnss::navigation::{LeapSecondFields, NavigationParameters};
use crate::time::{GnssTime, GnssTimeSpan, TimeInterval};
use crate::utils::bits_to_int::{to_i64, to_u32, to_u64};

const SC:f64 = std::f64::consts::PI;

fn ephemeris() -> Satellite {
	Satellite {
		id: 7,
		health: 0,
		is_enabled: true,
		week: 2245,
		time_of_applicability: 86_400.0,
		issue_of_data_clock: 12,
		sqrt_a: 5153.7,
		eccentricity: 0.0123,
		inclination: 0.97,
		longitude_of_ascending_node: -2.1,
		argument_of_perigee: 1.3,
		mean_anomaly: -0.7,
		mean_motion_correction: 4.5e-9,
		rate_of_longitude_of_ascending_node: -8.1e-9,
		rate_of_inclination: 2.0e-10,
		af0: -1.2e-4,
		af1: 3.0e-12,
		af2: 0.0,
		transmission_interval: TimeInterval::new(GnssTime::from_week_seconds(2245, 79_200.0), GnssTimeSpan::from_whole_seconds(7200)),
	}
}

fn encoded(body:MessageBody) -> Vec<u8> {
	let msg = Message{ prn: 7, time_of_week_truncated: 12_345, alert_flag: false, body };
	msg.encode().unwrap().bits().to_vec()
}

fn signed(bits:&[u8], pow2:i32) -> f64 { (to_i64(bits).unwrap() as f64) * 2.0_f64.powi(pow2) }
fn unsigned(bits:&[u8], pow2:i32) -> f64 { (to_u64(bits).unwrap() as f64) * 2.0_f64.powi(pow2) }

#[test]
fn header_fields() {
	let bits = encoded(MessageBody::Type10(type10::Body::from_ephemeris(&ephemeris())));
	assert_eq!(bits.len(), MESSAGE_BITS);
	assert_eq!(&bits[0..8], &PREAMBLE);
	assert_eq!(to_u32(&bits[8..14]).unwrap(), 7);
	assert_eq!(to_u32(&bits[14..20]).unwrap(), 10);
	assert_eq!(to_u32(&bits[20..37]).unwrap(), 12_345);
	assert_eq!(bits[37], 0);
}

#[test]
fn type10_ephemeris_fields() {
	let eph = ephemeris();
	let b = &encoded(MessageBody::Type10(type10::Body::from_ephemeris(&eph)))[38..];
	assert_eq!(b.len(), BODY_BITS);
	assert_eq!(to_u32(&b[0..13]).unwrap(), 2245);
	assert_eq!(&b[13..16], &[0, 0, 0]);
	assert_eq!(to_u32(&b[32..43]).unwrap() * 300, 86_400);
	assert!((signed(&b[43..69], -9) + type10::A_REF - eph.semi_major_axis()).abs() <= 2.0_f64.powi(-9));
	assert!((signed(&b[94..111], -44) * SC - eph.mean_motion_correction).abs() < 1e-12);
	assert!((signed(&b[134..167], -32) * SC - eph.mean_anomaly).abs() < 1e-9);
	assert!((unsigned(&b[167..200], -34) - eph.eccentricity).abs() <= 2.0_f64.powi(-34));
	assert!((signed(&b[200..233], -32) * SC - eph.argument_of_perigee).abs() < 1e-9);
}

#[test]
fn unhealthy_satellite_flags_every_signal() {
	let mut eph = ephemeris();
	eph.health = 0x3F;
	let b = &encoded(MessageBody::Type10(type10::Body::from_ephemeris(&eph)))[38..];
	assert_eq!(&b[13..16], &[1, 1, 1]);
}

#[test]
fn type11_orientation_fields() {
	let eph = ephemeris();
	let b = &encoded(MessageBody::Type11(type11::Body::from_ephemeris(&eph)))[38..];
	assert_eq!(to_u32(&b[0..11]).unwrap() * 300, 86_400);
	assert!((signed(&b[11..44], -32) * SC - eph.longitude_of_ascending_node).abs() < 1e-9);
	assert!((signed(&b[44..77], -32) * SC - eph.inclination).abs() < 1e-9);
	let omega_dot = signed(&b[77..94], -44) + type11::OMEGA_DOT_REF;
	assert!((omega_dot * SC - eph.rate_of_longitude_of_ascending_node).abs() < 1e-12);
	assert!((signed(&b[94..109], -44) * SC - eph.rate_of_inclination).abs() < 1e-12);
}

#[test]
fn type30_clock_and_iono_fields() {
	let eph = ephemeris();
	let mut params = NavigationParameters::default();
	params.group_delay = -5.12e-9;
	let b = &encoded(MessageBody::Type30(type30::Body::from_ephemeris(&eph, &params)))[38..];
	assert_eq!(to_u32(&b[22..33]).unwrap() * 300, 86_400);
	assert!((signed(&b[33..59], -35) - eph.af0).abs() <= 2.0_f64.powi(-35));
	assert!((signed(&b[59..79], -48) - eph.af1).abs() <= 2.0_f64.powi(-48));
	assert!((signed(&b[89..102], -35) - params.group_delay).abs() <= 2.0_f64.powi(-35));
	assert!((signed(&b[154..162], -30) - params.klobuchar_alpha[0]).abs() <= 2.0_f64.powi(-30));
	assert!((signed(&b[186..194], 11) - params.klobuchar_beta[0]).abs() <= 2048.0);
	assert!((signed(&b[202..210], 16) - params.klobuchar_beta[2]).abs() <= 65536.0);
	assert_eq!(to_u32(&b[218..226]).unwrap(), 2245 % 256);
}

#[test]
fn type33_utc_fields() {
	let eph = ephemeris();
	let mut params = NavigationParameters::default();
	params.utc_a0 = 1.9e-9;
	let leap = LeapSecondFields{ delta_t_ls: 18, wn_lsf: 2300, dn: 3, delta_t_lsf: 19 };
	let t_ot = GnssTime::from_week_seconds(2245, 147_456.0);
	let b = &encoded(MessageBody::Type33(type33::Body::new(&eph, &params, t_ot, leap)))[38..];
	assert!((signed(&b[89..105], -35) - 1.9e-9).abs() <= 2.0_f64.powi(-35));
	assert_eq!(to_i64(&b[125..133]).unwrap(), 18);
	assert_eq!(to_u32(&b[133..149]).unwrap() * 16, 147_456);
	assert_eq!(to_u32(&b[149..162]).unwrap(), 2245);
	assert_eq!(to_u32(&b[162..175]).unwrap(), 2300);
	assert_eq!(to_u32(&b[175..179]).unwrap(), 3);
	assert_eq!(to_i64(&b[179..187]).unwrap(), 19);
}

#[test]
fn broadcast_cycle() {
	assert_eq!(message_type_for_packet(0), 10);
	assert_eq!(message_type_for_packet(7), 33);
	assert_eq!(message_type_for_packet(-1), 33);
}
