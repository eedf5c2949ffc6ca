
use nalgebra::Vector3;

use crate::almanac::{Satellite, MU, OMEGA_DOT_E};
use crate::time::{GnssTime, GnssTimeSpan};
use crate::gnss::troposphere;
use crate::utils::kinematics;

pub const C:f64 = 2.99792458e8;					 // [m/s] speed of light
pub const F:f64 = -4.442807633e-10;				 // [sec/root-meter]

const KEPLER_ITERATIONS:usize = 10;
const TRAVEL_TIME_ITERATIONS:usize = 4;
const INITIAL_TRAVEL_TIME:f64 = 0.075;
const VELOCITY_STEP:f64 = 0.5;

/// Receiver-side view of one satellite at one receiver time.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
	pub sat_index:usize,
	pub prn:u8,
	pub receiver_time:GnssTime,
	/// GPS time at which the received signal left the satellite
	pub transmission_time:GnssTime,
	/// Apparent delay of the received code, pseudorange / c
	pub travel_time:GnssTimeSpan,
	pub satellite_position:Vector3<f64>,	// [m] ECEF at the receive epoch
	pub geometric_range:f64,				// [m]
	pub pseudorange:f64,					// [m]
	pub range_rate:f64,					// [m/s]
	pub elevation:f64,						// [rad]
	pub azimuth:f64,						// [rad]
	pub tropospheric_delay:f64,			// [m]
	pub relativistic_delay:f64,			// [s]
	pub clock_offset:f64,					// [s] satellite clock minus GPS time, relativistic term included
}

impl Observation {

	/// Doppler shift [Hz] on a carrier at `carrier_hz`.
	pub fn doppler(&self, carrier_hz:f64) -> f64 { -self.range_rate * carrier_hz / C }

}

/// ECEF position of `sat` at `t` and its eccentric anomaly, from the Keplerian elements alone.
pub fn satellite_position(sat:&Satellite, t:GnssTime) -> (Vector3<f64>, f64) {
	let a:f64 = sat.semi_major_axis();
	let e:f64 = sat.eccentricity;
	let n:f64 = (MU / a.powi(3)).sqrt() + sat.mean_motion_correction;
	let tk:f64 = (t - sat.reference_time()).as_seconds();

	let mk:f64 = sat.mean_anomaly + n*tk;
	let mut ek:f64 = mk;
	for _ in 0..KEPLER_ITERATIONS {
		// Newton-Raphson on Kepler's equation
		ek = ek - (ek - e*ek.sin() - mk)/(1.0 - e*ek.cos());
	}

	let nu_k:f64 = {
		let y:f64 = ((1.0 - e.powi(2)).sqrt() * ek.sin()) / (1.0 - (e*ek.cos()));
		let x:f64 = (ek.cos() - e) / (1.0 - (e*ek.cos()));
		y.atan2(x)
	};

	let u_k:f64 = nu_k + sat.argument_of_perigee;
	let r_k:f64 = a*(1.0 - e*ek.cos());
	let i_k:f64 = sat.inclination + sat.rate_of_inclination*tk;

	let x_kp:f64 = r_k * u_k.cos();
	let y_kp:f64 = r_k * u_k.sin();

	let omega_k:f64 = sat.longitude_of_ascending_node + (sat.rate_of_longitude_of_ascending_node - OMEGA_DOT_E)*tk
		- OMEGA_DOT_E*sat.time_of_applicability;

	let x_k:f64 = (x_kp * omega_k.cos()) - (y_kp * i_k.cos() * omega_k.sin());
	let y_k:f64 = (x_kp * omega_k.sin()) + (y_kp * i_k.cos() * omega_k.cos());
	let z_k:f64 = y_kp * (i_k.sin());

	(Vector3::new(x_k, y_k, z_k), ek)
}

// Rotate an ECEF position by the Earth's rotation during `travel_time` seconds
fn sagnac(pos:&Vector3<f64>, travel_time:f64) -> Vector3<f64> {
	let (s, c) = (OMEGA_DOT_E * travel_time).sin_cos();
	Vector3::new(c*pos.x + s*pos.y, -s*pos.x + c*pos.y, pos.z)
}

// Position at transmission, expressed in the ECEF frame of the receive epoch, and the geometric range
fn light_time_solution(sat:&Satellite, receiver:&Vector3<f64>, receiver_time:GnssTime) -> (Vector3<f64>, f64, f64) {
	let mut tau:f64 = INITIAL_TRAVEL_TIME;
	let mut pos = Vector3::zeros();
	let mut ek = 0.0;
	for _ in 0..TRAVEL_TIME_ITERATIONS {
		let (p, e) = satellite_position(sat, receiver_time - GnssTimeSpan::from_seconds(tau));
		pos = sagnac(&p, tau);
		ek = e;
		tau = (pos - receiver).norm() / C;
	}
	(pos, tau * C, ek)
}

/// Observe `sat` from `receiver` (ECEF) at `receiver_time`. `None` below `elevation_mask` [rad].
pub fn observe(sat:&Satellite, receiver:&Vector3<f64>, receiver_time:GnssTime, elevation_mask:f64, day_of_year:u32) -> Option<Observation> {
	let (pos, range, ek) = light_time_solution(sat, receiver, receiver_time);
	let (elevation, azimuth) = kinematics::elevation_azimuth(receiver, &pos);
	if elevation < elevation_mask {
		return None;
	}

	let transmission_time = receiver_time - GnssTimeSpan::from_seconds(range / C);
	let relativistic_delay = F * sat.eccentricity * sat.sqrt_a * ek.sin();
	let dt = (transmission_time - sat.reference_time()).as_seconds();
	let clock_offset = sat.af0 + sat.af1*dt + sat.af2*dt*dt + relativistic_delay;

	let tropospheric_delay = troposphere::slant_delay(&kinematics::ecef_to_wgs84(receiver), elevation, day_of_year);
	let pseudorange = range + tropospheric_delay - C*clock_offset;

	let range_rate = {
		let step = GnssTimeSpan::from_seconds(VELOCITY_STEP);
		let (ahead, _, _) = light_time_solution(sat, receiver, receiver_time + step);
		let (behind, _, _) = light_time_solution(sat, receiver, receiver_time - step);
		((ahead - receiver).norm() - (behind - receiver).norm()) / (2.0 * VELOCITY_STEP)
	};

	Some(Observation {
		sat_index: sat.index(),
		prn: sat.id,
		receiver_time,
		transmission_time,
		travel_time: GnssTimeSpan::from_seconds(pseudorange / C),
		satellite_position: pos,
		geometric_range: range,
		pseudorange,
		range_rate,
		elevation,
		azimuth,
		tropospheric_delay,
		relativistic_delay,
		clock_offset,
	})
}
