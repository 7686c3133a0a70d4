use crate::core::load_components::table::{
    ComponentLoadTable, LoadComponentColumn, LoadComponentRow,
};
use crate::core::units::{
    celsius_to_fahrenheit, UnitsStyle, BTU_PER_HOUR_PER_WATT, CFM_PER_CUBIC_METRE_PER_SECOND,
    SQUARE_FEET_PER_SQUARE_METRE,
};
use strum::IntoEnumIterator;

/// Conversion factors from SI to the reporting units
struct ConversionFactors {
    power: f64,
    area: f64,
    air_flow: f64,
}

impl ConversionFactors {
    fn for_style(units_style: UnitsStyle) -> Option<Self> {
        units_style.is_inch_pound().then_some(Self {
            power: BTU_PER_HOUR_PER_WATT,
            area: SQUARE_FEET_PER_SQUARE_METRE,
            air_flow: CFM_PER_CUBIC_METRE_PER_SECOND,
        })
    }

    fn power_per_area(&self) -> f64 {
        self.power / self.area
    }

    fn air_flow_per_area(&self) -> f64 {
        self.air_flow / self.area
    }
}

/// Convert a finished table from SI to the units of `units_style`. The table keeps its
/// structure and unused cells are left alone. Only the inch-pound styles change any values.
pub fn convert_table_units(table: &mut ComponentLoadTable, units_style: UnitsStyle) {
    let Some(factors) = ConversionFactors::for_style(units_style) else {
        return;
    };

    use LoadComponentColumn as Column;
    for row in LoadComponentRow::iter() {
        for column in [
            Column::SensibleInstant,
            Column::SensibleDelayed,
            Column::SensibleReturnAir,
            Column::Latent,
            Column::Total,
        ] {
            table.scale_if_used(column, row, factors.power);
        }
        table.scale_if_used(Column::RelatedArea, row, factors.area);
        table.scale_if_used(Column::TotalPerArea, row, factors.power_per_area());
    }

    if table.has_peak() {
        convert_peak_conditions(table, &factors);
    }

    let checks = &mut table.checks;
    checks.airflow_per_floor_area *= factors.air_flow_per_area();
    checks.airflow_per_total_cap *= factors.air_flow / factors.power;
    checks.area_per_total_cap *= factors.area / factors.power;
    checks.total_cap_per_area *= factors.power_per_area();
    checks.floor_area *= factors.area;
}

fn convert_peak_conditions(table: &mut ComponentLoadTable, factors: &ConversionFactors) {
    let peak = &mut table.peak;
    peak.outside_dry_bulb = celsius_to_fahrenheit(peak.outside_dry_bulb);
    peak.outside_wet_bulb = peak.outside_wet_bulb.map(celsius_to_fahrenheit);
    peak.zone_dry_bulb = celsius_to_fahrenheit(peak.zone_dry_bulb);
    peak.supply_air_temp = celsius_to_fahrenheit(peak.supply_air_temp);
    peak.mixed_air_temp = peak.mixed_air_temp.map(celsius_to_fahrenheit);
    peak.main_fan_air_flow *= factors.air_flow;
    peak.outside_air_flow *= factors.air_flow;
    for load in [
        &mut peak.peak_des_sens_load,
        &mut peak.design_peak_load,
        &mut peak.diff_design_peak,
        &mut peak.est_inst_del_sens_load,
        &mut peak.diff_peak_est,
    ] {
        *load *= factors.power;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use LoadComponentColumn as Column;
    use LoadComponentRow as Row;

    #[fixture]
    fn table() -> ComponentLoadTable {
        let mut table = ComponentLoadTable::new();
        table.design_day = Some(0);
        table.peak_timestep = Some(14);
        table.set(Column::SensibleInstant, Row::People, 1000.);
        table.set(Column::Total, Row::People, 1000.);
        table.set(Column::PercentGrandTotal, Row::People, 100.);
        table.set(Column::RelatedArea, Row::People, 100.);
        table.set(Column::TotalPerArea, Row::People, 10.);
        table.peak.outside_dry_bulb = 35.;
        table.peak.outside_wet_bulb = Some(24.);
        table.peak.zone_dry_bulb = 24.;
        table.peak.zone_rel_hum = 0.5;
        table.peak.supply_air_temp = 13.;
        table.peak.main_fan_air_flow = 1.;
        table.peak.peak_des_sens_load = 1000.;
        table.checks.airflow_per_floor_area = 0.01;
        table.checks.floor_area = 100.;
        table.checks.outside_air_ratio = 0.2;
        table
    }

    #[rstest]
    #[case(UnitsStyle::None)]
    #[case(UnitsStyle::JtoKWH)]
    #[case(UnitsStyle::JtoGJ)]
    fn should_leave_si_and_energy_styles_unchanged(
        table: ComponentLoadTable,
        #[case] units_style: UnitsStyle,
    ) {
        let mut converted = table.clone();
        convert_table_units(&mut converted, units_style);
        assert_eq!(converted, table);
    }

    #[rstest]
    fn should_convert_to_inch_pound(mut table: ComponentLoadTable) {
        convert_table_units(&mut table, UnitsStyle::InchPound);

        assert_relative_eq!(
            table.cell(Column::SensibleInstant, Row::People),
            3412.141633,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            table.cell(Column::Total, Row::People),
            3412.141633,
            max_relative = 1e-12
        );
        assert_relative_eq!(table.cell(Column::PercentGrandTotal, Row::People), 100.);
        assert_relative_eq!(
            table.cell(Column::RelatedArea, Row::People),
            1076.391042,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            table.cell(Column::TotalPerArea, Row::People),
            3.170,
            max_relative = 1e-3
        );
        assert_relative_eq!(table.peak.outside_dry_bulb, 95., max_relative = 1e-12);
        assert_relative_eq!(table.peak.outside_wet_bulb.unwrap(), 75.2, max_relative = 1e-12);
        assert_relative_eq!(table.peak.zone_rel_hum, 0.5);
        assert_relative_eq!(table.peak.main_fan_air_flow, 2118.880003, max_relative = 1e-12);
        assert_relative_eq!(table.checks.airflow_per_floor_area, 1.968503937, max_relative = 1e-6);
        assert_relative_eq!(table.checks.outside_air_ratio, 0.2);
    }

    #[rstest]
    fn should_leave_unused_cells_untouched(mut table: ComponentLoadTable) {
        convert_table_units(&mut table, UnitsStyle::InchPoundExceptElectricity);

        assert!(!table.is_used(Column::Latent, Row::People));
        assert_eq!(table.cell(Column::Latent, Row::People), 0.);
        assert!(!table.is_used(Column::SensibleInstant, Row::Roof));
    }

    #[rstest]
    fn should_leave_blank_peak_conditions_of_table_without_peak() {
        let mut table = ComponentLoadTable::new();
        table.checks.floor_area = 100.;
        convert_table_units(&mut table, UnitsStyle::InchPound);

        assert_eq!(table.peak.outside_dry_bulb, 0.);
        assert_eq!(table.peak.zone_dry_bulb, 0.);
        assert_eq!(table.peak.supply_air_temp, 0.);
        assert_eq!(table.peak.mixed_air_temp, None);
        assert_relative_eq!(table.checks.floor_area, 1076.391042, max_relative = 1e-9);
    }
}
