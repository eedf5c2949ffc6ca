
use std::f64::consts;

use super::*;
use crate::gnss::signal::{NavFormat, CnavSignal};

const SINGLE_SATELLITE:&str = "\
******** Week 0 almanac for PRN-01 ********
ID:                         01
Health:                     000
Eccentricity:               0.0000000000E+000
Time of Applicability(s):  61440.0000
Orbital Inclination(rad):   0.0000000000
Rate of Right Ascen(r/s):   0.0000000000E+000
SQRT(A)  (m 1/2):           5153.649
Right Ascen at Week(rad):   0.0000000000E+000
Argument of Perigee(rad):   0.000000000
Mean Anom(rad):             0.0000000000E+000
Af0(s):                     0.0000000000E+000
Af1(s/s):                   0.0000000000E+000
week:                       0

";

const TWO_SATELLITES:&str = "\
******** Week 150 almanac for PRN-03 ********
ID:                         03
Health:                     000
Eccentricity:               0.4892349243E-002
Time of Applicability(s):  405504.0000
Orbital Inclination(rad):   0.9646025658
Rate of Right Ascen(r/s):  -0.7680319916E-008
SQRT(A)  (m 1/2):           5153.602539
Right Ascen at Week(rad):  -0.1062478445E+001
Argument of Perigee(rad):   1.088634005
Mean Anom(rad):             0.2986425003E+001
Af0(s):                    -0.1049041748E-004
Af1(s/s):                   0.0000000000E+000
week:                        150

******** Week 150 almanac for PRN-07 ********
ID:                         07
Health:                     063
Eccentricity:               0.1556110382E-001
Time of Applicability(s):  405504.0000
Orbital Inclination(rad):   0.9493184030
Rate of Right Ascen(r/s):  -0.8068907762E-008
SQRT(A)  (m 1/2):           5153.604980
Right Ascen at Week(rad):   0.2110474706E+001
Argument of Perigee(rad):  -2.257845215
Mean Anom(rad):            -0.2632436991E+001
Af0(s):                     0.3719329834E-003
Af1(s/s):                   0.3637978807E-011
week:                        150
";

fn sample_almanac() -> Almanac { Almanac::from_yuma(TWO_SATELLITES, 2198).unwrap() }

#[test]
fn mean_anomaly_advances_to_next_almanac_time() {
	let alm = Almanac::from_yuma(SINGLE_SATELLITE, 0).unwrap();
	let before = alm.baseline(0).unwrap();
	alm.update_almanac_for_time(GnssTime::from_week_seconds(0, 147_456.0));
	let after = alm.baseline(0).unwrap();

	let mean_motion = MU.sqrt() / 5153.649_f64.powi(3);
	let expected = normalize_angle(before.mean_anomaly + mean_motion * 86_016.0);
	assert!((after.mean_anomaly - expected).abs() < 1e-9);
	assert_eq!(after.week, 0);
	assert!((after.time_of_applicability - 147_456.0).abs() < 1e-9);
	// The loaded data is untouched
	assert_eq!(alm.original_satellites()[0], Some(before));
}

#[test]
fn week_numbers_are_rolled_forward() {
	let alm = sample_almanac();
	assert_eq!(alm.baseline(2).unwrap().week, 150 + 2048);
	assert_eq!(alm.satellite_indices(), vec![2, 6]);
	assert!(alm.baseline(0).is_none());
	assert!(alm.has_satellites());
	assert!(!alm.baseline(6).unwrap().is_healthy());
	assert_eq!(alm.first_healthy().map(|s| s.id), Some(3));
}

#[test]
fn missing_field_is_a_parse_error() {
	let text = "ID: 05\nEccentricity: 0.01\n\n";
	match Almanac::from_yuma(text, 2000) {
		Err(GnssSimErr::AlmanacParse{ line, .. }) => assert_eq!(line, 1),
		other => panic!("unexpected {:?}", other.map(|_| ())),
	}
}

#[test]
fn satellite_in_wrong_slot_is_rejected() {
	let alm = sample_almanac();
	let mut slots = alm.original_satellites().to_vec();
	slots.swap(2, 4);
	assert!(matches!(Almanac::from_baseline(slots), Err(GnssSimErr::InvalidArgument(_))));
}

#[test]
fn propagated_angles_are_normalized() {
	let alm = sample_almanac();
	let mut t = GnssTime::from_week_seconds(2198, 0.0);
	for _ in 0..200 {
		t = t + GnssTimeSpan::from_whole_seconds(4321);
		for idx in alm.satellite_indices() {
			let formats = [NavFormat::Lnav, NavFormat::Cnav(CnavSignal::L5)];
			for format in formats.iter() {
				let eph = alm.create_ephemeris(idx, t, *format).unwrap().unwrap();
				assert!(eph.mean_anomaly > -consts::PI && eph.mean_anomaly <= consts::PI);
				assert!(eph.longitude_of_ascending_node > -consts::PI && eph.longitude_of_ascending_node <= consts::PI);
			}
			let alm_sat = alm.create_almanac(idx, t).unwrap().unwrap();
			assert!(alm_sat.mean_anomaly > -consts::PI && alm_sat.mean_anomaly <= consts::PI);
			assert!(alm_sat.longitude_of_ascending_node > -consts::PI && alm_sat.longitude_of_ascending_node <= consts::PI);
		}
	}
}

#[test]
fn ephemeris_reference_time_is_quantized() {
	let t = GnssTime::from_week_seconds(2198, 7300.0);
	assert_eq!(time_of_ephemeris(t, NavFormat::Lnav), GnssTime::from_week_seconds(2198, 14_400.0));
	assert_eq!(time_of_ephemeris(t, NavFormat::Cnav(CnavSignal::L2C)), GnssTime::from_week_seconds(2198, 12_600.0));

	let alm = sample_almanac();
	let eph = alm.create_ephemeris(2, t, NavFormat::Lnav).unwrap().unwrap();
	assert!((eph.time_of_applicability - 14_400.0).abs() < 1e-9);
	assert_eq!(eph.transmission_interval.start, GnssTime::from_week_seconds(2198, 7200.0));
	assert!(alm.create_ephemeris(50, t, NavFormat::Lnav).is_err());
}

#[test]
fn almanac_reference_time_leads_transmission() {
	// 70 hours after 10000 s lands in day 3, past 233472 but before 319488
	let t = GnssTime::from_week_seconds(2198, 10_000.0);
	assert_eq!(time_of_almanac(t), GnssTime::from_week_seconds(2198, 233_472.0));

	// Late in the week the search continues into the next week
	let t = GnssTime::from_week_seconds(2198, 600_000.0);
	assert_eq!(time_of_almanac(t), GnssTime::from_week_seconds(2199, 233_472.0));
}

#[test]
fn node_rollover_term_depends_on_grade() {
	let alm = sample_almanac();
	let sat = alm.baseline(2).unwrap();
	let far = GnssTime::from_week_seconds(sat.week + 3, sat.time_of_applicability);
	let as_almanac = sat.propagate(far, PropagationGrade::Almanac);
	let as_ephemeris = sat.propagate(far, PropagationGrade::Ephemeris);

	let dt = (far - sat.reference_time()).as_seconds();
	let expected_almanac = normalize_angle(sat.longitude_of_ascending_node + sat.rate_of_longitude_of_ascending_node * dt);
	let expected_ephemeris = normalize_angle(expected_almanac - OMEGA_DOT_E * 3.0 * 604_800.0);
	assert!((as_almanac.longitude_of_ascending_node - expected_almanac).abs() < 1e-9);
	assert!((as_ephemeris.longitude_of_ascending_node - expected_ephemeris).abs() < 1e-9);

	// Within one week both grades agree
	let near = GnssTime::from_week_seconds(sat.week + 1, 1000.0);
	let a = sat.propagate(near, PropagationGrade::Almanac);
	let e = sat.propagate(near, PropagationGrade::Ephemeris);
	assert!((a.longitude_of_ascending_node - e.longitude_of_ascending_node).abs() < 1e-12);
}
