//! Moist air property functions (ASHRAE Handbook of Fundamentals, chapter 1).
//!
//! Only the relations needed to describe peak conditions are provided: saturation pressure,
//! humidity ratio from dry- and wet-bulb temperature, wet-bulb temperature from humidity ratio,
//! and relative humidity from humidity ratio.

const KELVIN_OFFSET: f64 = 273.15;

/// Ratio of the molecular mass of water vapour to dry air
const MOLECULAR_MASS_RATIO: f64 = 0.621_945;

const WET_BULB_TOLERANCE: f64 = 1e-4; // in deg C
const MAX_WET_BULB_ITERATIONS: usize = 200;
const LOWEST_WET_BULB: f64 = -100.; // in deg C

/// Saturation pressure of water vapour over ice (below 0 C) or liquid water, in Pa
///
/// Arguments:
/// * `temp` - dry-bulb temperature, in deg C
pub fn saturation_pressure(temp: f64) -> f64 {
    let t = temp + KELVIN_OFFSET;
    let ln_p = if temp < 0. {
        -5.674_535_9e3 / t + 6.392_524_7 - 9.677_843e-3 * t + 6.221_570_1e-7 * t.powi(2)
            + 2.074_782_5e-9 * t.powi(3)
            - 9.484_024e-13 * t.powi(4)
            + 4.163_501_9 * t.ln()
    } else {
        -5.800_220_6e3 / t + 1.391_499_3 - 4.864_023_9e-2 * t + 4.176_476_8e-5 * t.powi(2)
            - 1.445_209_3e-8 * t.powi(3)
            + 6.545_967_3 * t.ln()
    };
    ln_p.exp()
}

/// Humidity ratio of saturated air, in kg water / kg dry air
pub fn saturation_humidity_ratio(temp: f64, pressure: f64) -> f64 {
    let p_sat = saturation_pressure(temp);
    MOLECULAR_MASS_RATIO * p_sat / (pressure - p_sat)
}

/// Humidity ratio from dry-bulb and thermodynamic wet-bulb temperature, in kg / kg
///
/// Arguments:
/// * `dry_bulb` - in deg C
/// * `wet_bulb` - in deg C
/// * `pressure` - barometric pressure, in Pa
pub fn humidity_ratio_from_wet_bulb(dry_bulb: f64, wet_bulb: f64, pressure: f64) -> f64 {
    let w_sat_wet_bulb = saturation_humidity_ratio(wet_bulb, pressure);
    let w = if wet_bulb >= 0. {
        ((2501. - 2.326 * wet_bulb) * w_sat_wet_bulb - 1.006 * (dry_bulb - wet_bulb))
            / (2501. + 1.86 * dry_bulb - 4.186 * wet_bulb)
    } else {
        ((2830. - 0.24 * wet_bulb) * w_sat_wet_bulb - 1.006 * (dry_bulb - wet_bulb))
            / (2830. + 1.86 * dry_bulb - 2.1 * wet_bulb)
    };
    w.max(0.)
}

/// Thermodynamic wet-bulb temperature from dry-bulb temperature and humidity ratio, in deg C
///
/// Solved by bisection between a very low bound and the dry-bulb temperature. Air at or above
/// saturation returns the dry-bulb temperature.
pub fn wet_bulb_from_humidity_ratio(dry_bulb: f64, humidity_ratio: f64, pressure: f64) -> f64 {
    if humidity_ratio >= saturation_humidity_ratio(dry_bulb, pressure) {
        return dry_bulb;
    }

    let mut low = LOWEST_WET_BULB.min(dry_bulb);
    let mut high = dry_bulb;
    let mut wet_bulb = 0.5 * (low + high);
    for _ in 0..MAX_WET_BULB_ITERATIONS {
        wet_bulb = 0.5 * (low + high);
        if humidity_ratio_from_wet_bulb(dry_bulb, wet_bulb, pressure) > humidity_ratio {
            high = wet_bulb;
        } else {
            low = wet_bulb;
        }
        if high - low < WET_BULB_TOLERANCE {
            break;
        }
    }
    wet_bulb
}

/// Relative humidity as a fraction (0-1) from dry-bulb temperature and humidity ratio
pub fn relative_humidity(dry_bulb: f64, humidity_ratio: f64, pressure: f64) -> f64 {
    let p_vapour = pressure * humidity_ratio / (MOLECULAR_MASS_RATIO + humidity_ratio);
    (p_vapour / saturation_pressure(dry_bulb)).clamp(0., 1.)
}
