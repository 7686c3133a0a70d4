use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

pub const MINUTES_PER_HOUR: u32 = 60;
pub const SECONDS_PER_HOUR: u32 = 3_600;
pub const HOURS_PER_DAY: u32 = 24;

/// Standard sea-level barometric pressure, in Pa. Sizing data does not track air pressure.
pub const STANDARD_BAROMETRIC_PRESSURE: f64 = 101_325.;

pub(crate) const BTU_PER_HOUR_PER_WATT: f64 = 3.412_141_633;
pub(crate) const SQUARE_FEET_PER_SQUARE_METRE: f64 = 10.763_910_42;
pub(crate) const CFM_PER_CUBIC_METRE_PER_SECOND: f64 = 2_118.880_003;

pub(crate) fn celsius_to_fahrenheit(temp_c: f64) -> f64 {
    temp_c * 1.8 + 32.
}

/// Reporting unit system for tabular output.
///
/// The energy styles only rescale energy quantities; load component tables are reported as
/// rates (W), so only the inch-pound styles change their values.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub enum UnitsStyle {
    #[default]
    None,
    JtoKWH,
    JtoMJ,
    JtoGJ,
    InchPound,
    InchPoundExceptElectricity,
}

impl UnitsStyle {
    pub fn is_inch_pound(&self) -> bool {
        matches!(
            self,
            UnitsStyle::InchPound | UnitsStyle::InchPoundExceptElectricity
        )
    }

    pub(crate) fn units(&self) -> ReportUnits {
        if self.is_inch_pound() {
            ReportUnits {
                power: "Btu/h",
                area: "ft2",
                power_per_area: "Btu/h-ft2",
                temperature: "F",
                air_flow: "ft3/min",
                air_flow_per_area: "ft3/min-ft2",
                air_flow_per_power: "ft3/min-Btu/h",
                area_per_power: "ft2/Btu/h",
            }
        } else {
            ReportUnits {
                power: "W",
                area: "m2",
                power_per_area: "W/m2",
                temperature: "C",
                air_flow: "m3/s",
                air_flow_per_area: "m3/s-m2",
                air_flow_per_power: "m3/s-W",
                area_per_power: "m2/W",
            }
        }
    }
}

impl Display for UnitsStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UnitsStyle::None => "None",
            UnitsStyle::JtoKWH => "JtoKWH",
            UnitsStyle::JtoMJ => "JtoMJ",
            UnitsStyle::JtoGJ => "JtoGJ",
            UnitsStyle::InchPound => "InchPound",
            UnitsStyle::InchPoundExceptElectricity => "InchPoundExceptElectricity",
        };
        write!(f, "{name}")
    }
}

impl FromStr for UnitsStyle {
    type Err = UnitsStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "si" => Ok(UnitsStyle::None),
            "jtokwh" => Ok(UnitsStyle::JtoKWH),
            "jtomj" => Ok(UnitsStyle::JtoMJ),
            "jtogj" => Ok(UnitsStyle::JtoGJ),
            "inchpound" | "ip" => Ok(UnitsStyle::InchPound),
            "inchpoundexceptelectricity" => Ok(UnitsStyle::InchPoundExceptElectricity),
            _ => Err(UnitsStyleError(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, Error)]
#[error("Unrecognised units style '{0}'")]
pub struct UnitsStyleError(String);

/// Unit labels used in report headings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ReportUnits {
    pub(crate) power: &'static str,
    pub(crate) area: &'static str,
    pub(crate) power_per_area: &'static str,
    pub(crate) temperature: &'static str,
    pub(crate) air_flow: &'static str,
    pub(crate) air_flow_per_area: &'static str,
    pub(crate) air_flow_per_power: &'static str,
    pub(crate) area_per_power: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(0., 32.)]
    #[case(100., 212.)]
    #[case(-40., -40.)]
    #[case(23.9, 75.02)]
    fn should_convert_celsius_to_fahrenheit(#[case] temp_c: f64, #[case] expected: f64) {
        assert_relative_eq!(celsius_to_fahrenheit(temp_c), expected, max_relative = 1e-12);
    }

    #[rstest]
    #[case("InchPound", UnitsStyle::InchPound)]
    #[case("ip", UnitsStyle::InchPound)]
    #[case("None", UnitsStyle::None)]
    #[case("JtoKWH", UnitsStyle::JtoKWH)]
    fn should_parse_units_style(#[case] value: &str, #[case] expected: UnitsStyle) {
        assert_eq!(value.parse::<UnitsStyle>().unwrap(), expected);
    }

    #[rstest]
    fn should_reject_unknown_units_style() {
        assert!("furlongs".parse::<UnitsStyle>().is_err());
    }

    #[rstest]
    fn should_only_treat_inch_pound_styles_as_ip() {
        assert!(UnitsStyle::InchPound.is_inch_pound());
        assert!(UnitsStyle::InchPoundExceptElectricity.is_inch_pound());
        assert!(!UnitsStyle::JtoKWH.is_inch_pound());
        assert_eq!(UnitsStyle::JtoMJ.units().power, "W");
        assert_eq!(UnitsStyle::InchPound.units().power, "Btu/h");
    }
}
