// UNB3m zenith delays (Leandro, Santos and Langley, 2006) mapped to the line of sight with
// the Niell (1996) hydrostatic and wet mapping functions.

use std::f64::consts;

use crate::utils::kinematics::PositionWGS84;

const LATITUDE_BANDS_DEG:[f64; 5] = [15.0, 30.0, 45.0, 60.0, 75.0];

// Pressure [hPa], temperature [K], relative humidity [%], temperature lapse rate [K/m], water vapour lapse rate
const MET_AVERAGE:[[f64; 5]; 5] = [
	[1013.25, 299.65, 75.0, 6.30e-3, 2.77],
	[1017.25, 294.15, 80.0, 6.05e-3, 3.15],
	[1015.75, 283.15, 76.0, 5.58e-3, 2.57],
	[1011.75, 272.15, 77.5, 5.39e-3, 1.81],
	[1013.00, 263.65, 82.5, 4.53e-3, 1.55],
];

const MET_AMPLITUDE:[[f64; 5]; 5] = [
	[ 0.00,  0.00,  0.0, 0.00e-3, 0.00],
	[-3.75,  7.00,  0.0, 0.25e-3, 0.33],
	[-2.25, 11.00, -1.0, 0.32e-3, 0.46],
	[-1.75, 15.00, -2.5, 0.81e-3, 0.74],
	[-0.50, 14.50,  2.5, 0.62e-3, 0.30],
];

const NIELL_HYDROSTATIC_AVERAGE:[[f64; 3]; 5] = [
	[1.2769934e-3, 2.9153695e-3, 62.610505e-3],
	[1.2683230e-3, 2.9152299e-3, 62.837393e-3],
	[1.2465397e-3, 2.9288445e-3, 63.721774e-3],
	[1.2196049e-3, 2.9022565e-3, 63.824265e-3],
	[1.2045996e-3, 2.9024912e-3, 64.258455e-3],
];

const NIELL_HYDROSTATIC_AMPLITUDE:[[f64; 3]; 5] = [
	[0.0,          0.0,          0.0        ],
	[1.2709626e-5, 2.1414979e-5, 9.0128400e-5],
	[2.6523662e-5, 3.0160779e-5, 4.3497037e-5],
	[3.4000452e-5, 7.2562722e-5, 84.795348e-5],
	[4.1202191e-5, 11.723375e-5, 170.37206e-5],
];

const NIELL_HEIGHT:[f64; 3] = [2.53e-5, 5.49e-3, 1.14e-3];

const NIELL_WET:[[f64; 3]; 5] = [
	[5.8021897e-4, 1.4275268e-3, 4.3472961e-2],
	[5.6794847e-4, 1.5138625e-3, 4.6729510e-2],
	[5.8118019e-4, 1.4572752e-3, 4.3908931e-2],
	[5.9727542e-4, 1.5007428e-3, 4.4626982e-2],
	[6.1641693e-4, 1.7599082e-3, 5.4736038e-2],
];

const R:f64 = 8314.34;          // [J/(kmol K)] universal gas constant
const MD:f64 = 28.9644;         // [kg/kmol] molar mass of dry air
const MW:f64 = 18.0152;         // [kg/kmol] molar mass of water vapour
const K1:f64 = 77.604;          // [K/hPa]
const K2:f64 = 64.79;           // [K/hPa]
const K3:f64 = 377_600.0;       // [K^2/hPa]
const G:f64 = 9.80665;          // [m/s^2]
const DAY_OF_MINIMUM:f64 = 28.0;
const DAYS_PER_YEAR:f64 = 365.25;

/// Zenith delays [m].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZenithDelay {
	pub hydrostatic:f64,
	pub wet:f64,
}

// Linear interpolation in |latitude| between the 15 degree bands, clamped at both ends
fn by_latitude<F: Fn(usize) -> f64>(latitude_deg:f64, value:F) -> f64 {
	let lat = latitude_deg.abs();
	if lat <= LATITUDE_BANDS_DEG[0] { return value(0); }
	if lat >= LATITUDE_BANDS_DEG[4] { return value(4); }
	let idx = ((lat - LATITUDE_BANDS_DEG[0]) / 15.0).floor() as usize;
	let frac = (lat - LATITUDE_BANDS_DEG[idx]) / 15.0;
	value(idx) + (value(idx + 1) - value(idx)) * frac
}

// Cosine of the seasonal phase, shifted half a year in the southern hemisphere
fn seasonal(latitude:f64, day_of_year:u32) -> f64 {
	let mut phase = ((day_of_year as f64) - DAY_OF_MINIMUM) * 2.0 * consts::PI / DAYS_PER_YEAR;
	if latitude < 0.0 { phase += consts::PI; }
	phase.cos()
}

fn saturation_vapour_pressure(temperature:f64, pressure:f64) -> f64 {
	let es = 0.01 * (1.2378847e-5 * temperature.powi(2) - 1.9121316e-2 * temperature + 33.93711047 - 6.3431645e3 / temperature).exp();
	let enhancement = 1.00062 + 3.14e-6 * pressure + 5.6e-7 * (temperature - 273.15).powi(2);
	es * enhancement
}

/// UNB3m zenith hydrostatic and wet delays at `pos` on `day_of_year`.
pub fn zenith_delay(pos:&PositionWGS84, day_of_year:u32) -> ZenithDelay {
	let lat_deg = pos.latitude.to_degrees();
	let height = pos.height_above_ellipsoid;
	let cos_phase = seasonal(pos.latitude, day_of_year);

	let met = |col:usize| by_latitude(lat_deg, |row| MET_AVERAGE[row][col] - MET_AMPLITUDE[row][col] * cos_phase);
	let (p0, t0, rh, beta, lambda) = (met(0), met(1), met(2), met(3), met(4));
	let e0 = rh / 100.0 * saturation_vapour_pressure(t0, p0);

	let rd = R / MD;
	let gm = 9.784 * (1.0 - 2.66e-3 * (2.0 * pos.latitude).cos() - 2.8e-7 * height);
	let lambda1 = lambda + 1.0;

	let temperature = t0 - beta * height;
	let pressure = p0 * (temperature / t0).powf(G / (rd * beta));
	let vapour = e0 * (temperature / t0).powf(lambda1 * G / (rd * beta));
	let mean_temperature = temperature * (1.0 - beta * rd / (gm * lambda1));

	let hydrostatic = 1.0e-6 * K1 * rd / gm * pressure;
	let k2_prime = K2 - K1 * (MW / MD);
	let wet = 1.0e-6 * (mean_temperature * k2_prime + K3) * rd / (gm * lambda1 - beta * rd) * vapour / temperature;

	ZenithDelay{ hydrostatic, wet }
}

// Marini continued fraction normalised to one at zenith
fn marini(sin_el:f64, abc:[f64; 3]) -> f64 {
	let [a, b, c] = abc;
	(1.0 + a / (1.0 + b / (1.0 + c))) / (sin_el + a / (sin_el + b / (sin_el + c)))
}

/// Niell hydrostatic and wet mapping functions at `elevation` [rad].
pub fn niell_mapping(pos:&PositionWGS84, elevation:f64, day_of_year:u32) -> (f64, f64) {
	let lat_deg = pos.latitude.to_degrees();
	let cos_phase = seasonal(pos.latitude, day_of_year);
	let sin_el = elevation.sin();

	let hydro_coeff = |col:usize| by_latitude(lat_deg, |row| NIELL_HYDROSTATIC_AVERAGE[row][col] - NIELL_HYDROSTATIC_AMPLITUDE[row][col] * cos_phase);
	let wet_coeff = |col:usize| by_latitude(lat_deg, |row| NIELL_WET[row][col]);

	let height_km = pos.height_above_ellipsoid / 1000.0;
	let hydrostatic = marini(sin_el, [hydro_coeff(0), hydro_coeff(1), hydro_coeff(2)])
		+ (1.0 / sin_el - marini(sin_el, NIELL_HEIGHT)) * height_km;
	let wet = marini(sin_el, [wet_coeff(0), wet_coeff(1), wet_coeff(2)]);

	(hydrostatic, wet)
}

/// Slant tropospheric delay [m] along a path at `elevation` [rad].
pub fn slant_delay(pos:&PositionWGS84, elevation:f64, day_of_year:u32) -> f64 {
	let zenith = zenith_delay(pos, day_of_year);
	let (mh, mw) = niell_mapping(pos, elevation, day_of_year);
	zenith.hydrostatic * mh + zenith.wet * mw
}

#[cfg(test)]
mod tests {
	use super::*;

	fn site(lat_deg:f64, height:f64) -> PositionWGS84 {
		PositionWGS84{ latitude: lat_deg.to_radians(), longitude: 0.3, height_above_ellipsoid: height }
	}

	#[test]
	fn sea_level_zenith_delay() {
		let z = zenith_delay(&site(45.0, 0.0), 180);
		assert!(z.hydrostatic > 2.25 && z.hydrostatic < 2.35, "{:?}", z);
		assert!(z.wet > 0.05 && z.wet < 0.40, "{:?}", z);
	}

	#[test]
	fn delay_falls_with_height() {
		let low = zenith_delay(&site(30.0, 0.0), 10);
		let high = zenith_delay(&site(30.0, 2000.0), 10);
		assert!(high.hydrostatic < low.hydrostatic);
		assert!(high.wet < low.wet);
	}

	#[test]
	fn mapping_is_unity_at_zenith_and_grows_toward_horizon() {
		let pos = site(-35.0, 0.0);
		let (mh, mw) = niell_mapping(&pos, consts::FRAC_PI_2, 100);
		assert!((mh - 1.0).abs() < 1e-9);
		assert!((mw - 1.0).abs() < 1e-9);

		let d90 = slant_delay(&pos, consts::FRAC_PI_2, 100);
		let d30 = slant_delay(&pos, 30f64.to_radians(), 100);
		let d5 = slant_delay(&pos, 5f64.to_radians(), 100);
		assert!((d30 / d90 - 2.0).abs() < 0.02);
		assert!(d5 > 20.0 && d5 < 30.0, "{}", d5);
	}

	#[test]
	fn latitude_interpolation_is_clamped() {
		assert_eq!(by_latitude(5.0, |row| row as f64), 0.0);
		assert_eq!(by_latitude(-80.0, |row| row as f64), 4.0);
		assert!((by_latitude(37.5, |row| row as f64) - 1.5).abs() < 1e-12);
	}
}
