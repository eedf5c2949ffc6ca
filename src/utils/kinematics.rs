
use nalgebra::{Matrix3, Vector3};

pub const WGS84_SEMI_MAJOR_AXIS_METERS:f64 = 6378137.0;
pub const WGS84_SEMI_MINOR_AXIS_METERS:f64 = 6356752.314245;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionWGS84 {
	pub latitude:f64,
	pub longitude:f64,
	pub height_above_ellipsoid:f64,
}

fn eccentricity_sq() -> f64 {
	let a_sq:f64 = WGS84_SEMI_MAJOR_AXIS_METERS.powi(2);
	let b_sq:f64 = WGS84_SEMI_MINOR_AXIS_METERS.powi(2);
	(a_sq - b_sq) / a_sq
}

pub fn ecef_to_wgs84(ecef:&Vector3<f64>) -> PositionWGS84 {
	let (e1, e2, e3) = (ecef.x, ecef.y, ecef.z);
	let a_sq:f64 = WGS84_SEMI_MAJOR_AXIS_METERS.powi(2);
	let b_sq:f64 = WGS84_SEMI_MINOR_AXIS_METERS.powi(2);

	let e_sq:f64  = (a_sq - b_sq) / a_sq;
	let ep_sq:f64 = (a_sq - b_sq) / b_sq;

	let p:f64 = (e1*e1 + e2*e2).sqrt();
	let r:f64 = (p*p   + e3*e3).sqrt();

	let beta:f64 = (((WGS84_SEMI_MINOR_AXIS_METERS*e3)/(WGS84_SEMI_MAJOR_AXIS_METERS*p)) * (1.0 + ep_sq*(WGS84_SEMI_MINOR_AXIS_METERS/r))).atan();

	let latitude:f64 = {
		let num:f64 = e3 + (ep_sq * WGS84_SEMI_MINOR_AXIS_METERS * beta.sin().powi(3));
		let denom:f64 = p - (e_sq * WGS84_SEMI_MAJOR_AXIS_METERS * beta.cos().powi(3));
		(num/denom).atan()
	};
	let longitude:f64 = e2.atan2(e1);

	let v = WGS84_SEMI_MAJOR_AXIS_METERS / (1.0 - (e_sq*latitude.sin().powi(2))).sqrt();
	let height_above_ellipsoid = p*latitude.cos() + e3*latitude.sin() - (WGS84_SEMI_MAJOR_AXIS_METERS.powi(2) / v);

	PositionWGS84{ latitude, longitude, height_above_ellipsoid }
}

pub fn wgs84_to_ecef(pos:&PositionWGS84) -> Vector3<f64> {
	let e_sq = eccentricity_sq();
	let (sin_lat, cos_lat) = pos.latitude.sin_cos();
	let (sin_lon, cos_lon) = pos.longitude.sin_cos();
	let v = WGS84_SEMI_MAJOR_AXIS_METERS / (1.0 - e_sq*sin_lat.powi(2)).sqrt();

	Vector3::new((v + pos.height_above_ellipsoid) * cos_lat * cos_lon,
	             (v + pos.height_above_ellipsoid) * cos_lat * sin_lon,
	             (v*(1.0 - e_sq) + pos.height_above_ellipsoid) * sin_lat)
}

/// Rotation taking ECEF vectors into the local east-north-up frame at `pos`.
pub fn ecef_to_enu_rotation(pos:&PositionWGS84) -> Matrix3<f64> {
	let (sin_lat, cos_lat) = pos.latitude.sin_cos();
	let (sin_lon, cos_lon) = pos.longitude.sin_cos();
	Matrix3::new(
		-sin_lon,            cos_lon,           0.0,
		-sin_lat*cos_lon,   -sin_lat*sin_lon,   cos_lat,
		 cos_lat*cos_lon,    cos_lat*sin_lon,   sin_lat)
}

/// Elevation and azimuth [rad] of `target` seen from `observer`, both ECEF.
pub fn elevation_azimuth(observer:&Vector3<f64>, target:&Vector3<f64>) -> (f64, f64) {
	let rot = ecef_to_enu_rotation(&ecef_to_wgs84(observer));
	let enu = rot * (target - observer);
	let horizontal = (enu.x*enu.x + enu.y*enu.y).sqrt();
	let elevation = enu.z.atan2(horizontal);
	let azimuth = enu.x.atan2(enu.y).rem_euclid(2.0 * std::f64::consts::PI);
	(elevation, azimuth)
}
