//! Analytic planetary positions from mean orbital elements.
//!
//! Elements and linear rates follow JPL's "Keplerian Elements for Approximate Positions of the
//! Major Planets" (E. M. Standish), table 1, valid 1800 AD – 2050 AD and referred to the mean
//! ecliptic and equinox of J2000. Accuracy is of order arc-minutes for the inner planets, which
//! is ample for launch-window exploration.

use slingshot_core::angle::wrap_two_pi;
use slingshot_core::time::julian_centuries_since_j2000;
use slingshot_core::units::au_to_km;

use crate::kepler::{solve_kepler, true_anomaly_from_eccentric};
use crate::{Body, EphemerisError, EphemerisProvider, KeplerianElements};

/// One row of the mean-element table: value at J2000 and rate per Julian century.
#[derive(Debug, Clone, Copy)]
struct MeanElementRow {
    /// Semi-major axis (AU).
    a: [f64; 2],
    /// Eccentricity.
    e: [f64; 2],
    /// Inclination (deg).
    i: [f64; 2],
    /// Mean longitude (deg).
    l: [f64; 2],
    /// Longitude of perihelion (deg).
    varpi: [f64; 2],
    /// Longitude of the ascending node (deg).
    node: [f64; 2],
}

const MEAN_ELEMENTS: [MeanElementRow; 9] = [
    // Mercury
    MeanElementRow {
        a: [0.387_099_27, 0.000_000_37],
        e: [0.205_635_93, 0.000_019_06],
        i: [7.004_979_02, -0.005_947_49],
        l: [252.250_323_50, 149_472.674_111_75],
        varpi: [77.457_796_28, 0.160_476_89],
        node: [48.330_765_93, -0.125_340_81],
    },
    // Venus
    MeanElementRow {
        a: [0.723_335_66, 0.000_003_90],
        e: [0.006_776_72, -0.000_041_07],
        i: [3.394_676_05, -0.000_788_90],
        l: [181.979_099_50, 58_517.815_387_29],
        varpi: [131.602_467_18, 0.002_683_29],
        node: [76.679_842_55, -0.277_694_18],
    },
    // Earth-Moon barycentre
    MeanElementRow {
        a: [1.000_002_61, 0.000_005_62],
        e: [0.016_711_23, -0.000_043_92],
        i: [-0.000_015_31, -0.012_946_68],
        l: [100.464_571_66, 35_999.372_449_81],
        varpi: [102.937_681_93, 0.323_273_64],
        node: [0.0, 0.0],
    },
    // Mars
    MeanElementRow {
        a: [1.523_710_34, 0.000_018_47],
        e: [0.093_394_10, 0.000_078_82],
        i: [1.849_691_42, -0.008_131_31],
        l: [-4.553_432_05, 19_140.302_684_99],
        varpi: [-23.943_629_59, 0.444_410_88],
        node: [49.559_538_91, -0.292_573_43],
    },
    // Jupiter
    MeanElementRow {
        a: [5.202_887_00, -0.000_116_07],
        e: [0.048_386_24, -0.000_132_53],
        i: [1.304_396_95, -0.001_837_14],
        l: [34.396_440_51, 3_034.746_127_75],
        varpi: [14.728_479_83, 0.212_526_68],
        node: [100.473_909_09, 0.204_691_06],
    },
    // Saturn
    MeanElementRow {
        a: [9.536_675_94, -0.001_250_60],
        e: [0.053_861_79, -0.000_509_91],
        i: [2.485_991_87, 0.001_936_09],
        l: [49.954_244_23, 1_222.493_622_01],
        varpi: [92.598_878_31, -0.418_972_16],
        node: [113.662_424_48, -0.288_677_94],
    },
    // Uranus
    MeanElementRow {
        a: [19.189_164_64, -0.001_961_76],
        e: [0.047_257_44, -0.000_043_97],
        i: [0.772_637_83, -0.002_429_39],
        l: [313.238_104_51, 428.482_027_85],
        varpi: [170.954_276_30, 0.408_052_81],
        node: [74.016_925_03, 0.042_405_89],
    },
    // Neptune
    MeanElementRow {
        a: [30.069_922_76, 0.000_262_91],
        e: [0.008_590_48, 0.000_051_05],
        i: [1.770_043_47, 0.000_353_72],
        l: [-55.120_029_69, 218.459_453_25],
        varpi: [44.964_762_27, -0.322_414_64],
        node: [131.784_225_74, -0.005_086_64],
    },
    // Pluto
    MeanElementRow {
        a: [39.482_116_75, -0.000_315_96],
        e: [0.248_827_30, 0.000_051_70],
        i: [17.140_012_06, 0.000_048_18],
        l: [238.929_038_33, 145.207_805_15],
        varpi: [224.068_916_29, -0.040_629_42],
        node: [110.303_936_84, -0.011_834_82],
    },
];

/// Ephemeris backed by the linear mean-element model.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanElementEphemeris;

impl MeanElementEphemeris {
    pub fn new() -> Self {
        Self
    }
}

impl EphemerisProvider for MeanElementEphemeris {
    fn elements(
        &self,
        epoch_mjd2000: f64,
        body: Body,
    ) -> Result<KeplerianElements, EphemerisError> {
        if !epoch_mjd2000.is_finite() {
            return Err(EphemerisError::InvalidEpoch(epoch_mjd2000));
        }

        let row = &MEAN_ELEMENTS[usize::from(body.id() - 1)];
        let t = julian_centuries_since_j2000(epoch_mjd2000);
        let at = |pair: [f64; 2]| pair[0] + pair[1] * t;

        let a_km = au_to_km(at(row.a));
        let e = at(row.e);
        let inclination = at(row.i).to_radians();
        let mean_longitude = at(row.l).to_radians();
        let varpi = at(row.varpi).to_radians();
        let node = at(row.node).to_radians();

        let mean_anomaly = mean_longitude - varpi;
        let eccentric_anomaly = solve_kepler(mean_anomaly, e)?;

        let (inclination, node) = if inclination < 0.0 {
            // Keep i in [0, π]: a negative table inclination flips the node by π.
            (-inclination, node + std::f64::consts::PI)
        } else {
            (inclination, node)
        };

        Ok(KeplerianElements {
            semi_major_axis_km: a_km,
            eccentricity: e,
            inclination_rad: inclination,
            raan_rad: wrap_two_pi(node),
            arg_periapsis_rad: wrap_two_pi(varpi - node),
            true_anomaly_rad: wrap_two_pi(true_anomaly_from_eccentric(eccentric_anomaly, e)),
        })
    }
}
