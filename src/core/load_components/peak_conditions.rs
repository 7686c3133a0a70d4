use crate::core::building::Building;
use crate::core::load_components::sizing::SizingResults;
use crate::core::load_components::table::{ComponentLoadTable, DesignLoad};
use crate::core::psychrometrics::{relative_humidity, wet_bulb_from_humidity_ratio};
use crate::core::units::STANDARD_BAROMETRIC_PRESSURE;
use crate::sizing_time::SizingTime;

/// Fill the peak conditions and engineering checks of a zone's table from sizing results.
///
/// Loads and flows are per single zone, so they are divided by the zone's multiplier.
/// Heating loads are reported with a negative sign. Nothing is filled in when there is no
/// peak timestep.
///
/// Arguments:
/// * `table` - table for the zone, built at the same peak
/// * `building`
/// * `sizing` - sizing results for the zone
/// * `sizing_time` - used for the date and time of the peak
/// * `design_day`, `peak_timestep` - selected peak
/// * `zone` - index of the zone
/// * `load` - whether this is the cooling or heating peak
pub fn collect_peak_conditions(
    table: &mut ComponentLoadTable,
    building: &Building,
    sizing: &impl SizingResults,
    sizing_time: &SizingTime,
    design_day: Option<usize>,
    peak_timestep: Option<usize>,
    zone: usize,
    load: DesignLoad,
) {
    let (Some(day), Some(timestep)) = (design_day, peak_timestep) else {
        return;
    };
    let multiplier = building.zone(zone).effective_multiplier();
    let sign = match load {
        DesignLoad::Cooling => 1.,
        DesignLoad::Heating => -1.,
    };
    let peak = &mut table.peak;

    peak.peak_date_time = sizing_time.peak_date_time(day, timestep);

    if let Some(conditions) = sizing.zone_conditions(day, zone) {
        let value_at = |series: &[f64]| series.get(timestep).copied().unwrap_or_default();

        peak.outside_dry_bulb = value_at(&conditions.outside_dry_bulb);
        peak.outside_hum_ratio = value_at(&conditions.outside_hum_ratio);
        peak.outside_wet_bulb = (peak.outside_hum_ratio > 0. && peak.outside_hum_ratio < 1.)
            .then(|| {
                wet_bulb_from_humidity_ratio(
                    peak.outside_dry_bulb,
                    peak.outside_hum_ratio,
                    STANDARD_BAROMETRIC_PRESSURE,
                )
            });

        peak.zone_dry_bulb = value_at(&conditions.zone_dry_bulb);
        peak.zone_hum_ratio = value_at(&conditions.zone_hum_ratio);
        peak.zone_rel_hum = relative_humidity(
            peak.zone_dry_bulb,
            peak.zone_hum_ratio,
            STANDARD_BAROMETRIC_PRESSURE,
        );
    }

    if let Some(design) = sizing.zone_design(zone, load) {
        peak.supply_air_temp = design
            .supply_air
            .supply_air_temperature(peak.zone_dry_bulb, load);
        peak.main_fan_air_flow = design.design_air_flow / multiplier;
        peak.outside_air_flow = design.minimum_outdoor_air_flow / multiplier;
        peak.peak_des_sens_load = sign * design.calculated_load / multiplier;
        peak.design_peak_load = sign * design.design_load / multiplier;
    }

    table.checks.floor_area = building.zone(zone).floor_area;
    table.checks.number_of_people = building.number_of_people(zone);
    table.compute_engineering_checks();
}
