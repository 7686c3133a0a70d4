use crate::core::building::Building;
use crate::core::load_components::decay_curve::DecayCurves;
use crate::core::load_components::delay_sequence::DelaySequenceResolver;
use crate::core::load_components::peak_conditions::collect_peak_conditions;
use crate::core::load_components::sequence_store::SequenceStore;
use crate::core::load_components::sizing::{PeakSelection, SizingResults};
use crate::core::load_components::table::{ComponentLoadTable, DesignLoad};
use crate::core::load_components::table_builder::{add_area_column, build_load_table};
use crate::core::load_components::unit_conversion::convert_table_units;
use crate::core::moving_average::{MovingAverage, MovingAverageAlignment};
use crate::core::units::UnitsStyle;
use crate::sizing_time::SizingTime;
use serde::Deserialize;
use tracing::{info, instrument, warn};

/// A peak sensible load this far from the sum of its instant and delayed components is
/// logged as a warning
const RECONCILIATION_WARNING_FRACTION: f64 = 0.1;

/// Which scopes of the load component summary to produce, and how.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoadComponentSummaryOptions {
    #[serde(default = "default_true")]
    pub zone: bool,
    #[serde(default = "default_true")]
    pub air_loop: bool,
    #[serde(default = "default_true")]
    pub facility: bool,
    #[serde(default)]
    pub units_style: UnitsStyle,
    #[serde(default)]
    pub moving_average_alignment: MovingAverageAlignment,
    #[serde(default)]
    pub show_decay_curves: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoadComponentSummaryOptions {
    fn default() -> Self {
        Self {
            zone: true,
            air_loop: true,
            facility: true,
            units_style: Default::default(),
            moving_average_alignment: Default::default(),
            show_decay_curves: false,
        }
    }
}

/// Cooling and heating tables for one zone, air loop or the facility
#[derive(Clone, Debug, PartialEq)]
pub struct PeakLoadTables {
    pub name: String,
    pub cooling: ComponentLoadTable,
    pub heating: ComponentLoadTable,
}

impl PeakLoadTables {
    pub fn table(&self, load: DesignLoad) -> &ComponentLoadTable {
        match load {
            DesignLoad::Cooling => &self.cooling,
            DesignLoad::Heating => &self.heating,
        }
    }

    fn table_mut(&mut self, load: DesignLoad) -> &mut ComponentLoadTable {
        match load {
            DesignLoad::Cooling => &mut self.cooling,
            DesignLoad::Heating => &mut self.heating,
        }
    }
}

/// Finished, unit-converted tables of the load component summary
#[derive(Clone, Debug, PartialEq)]
pub struct LoadComponentSummary {
    pub units_style: UnitsStyle,
    pub zones: Vec<PeakLoadTables>,
    pub air_loops: Vec<PeakLoadTables>,
    pub facility: Option<PeakLoadTables>,
}

/// Builds the zone, air loop and facility tables from the sequences recorded during sizing.
pub struct LoadComponentSummaryBuilder<'a, S: SizingResults> {
    building: &'a Building,
    sizing_time: &'a SizingTime,
    sizing: &'a S,
    options: &'a LoadComponentSummaryOptions,
    moving_average: MovingAverage,
    resolver: DelaySequenceResolver<'a>,
}

impl<'a, S: SizingResults> LoadComponentSummaryBuilder<'a, S> {
    pub fn new(
        building: &'a Building,
        sizing_time: &'a SizingTime,
        sizing: &'a S,
        curves: &'a DecayCurves,
        options: &'a LoadComponentSummaryOptions,
    ) -> Self {
        Self {
            building,
            sizing_time,
            sizing,
            options,
            moving_average: MovingAverage::new(
                sizing.moving_average_window(),
                options.moving_average_alignment,
            ),
            resolver: DelaySequenceResolver::new(building, curves),
        }
    }

    /// Table for one zone at a given peak, before totals
    fn zone_table(
        &mut self,
        store: &mut SequenceStore,
        zone: usize,
        peak: PeakSelection,
        load: DesignLoad,
    ) -> ComponentLoadTable {
        let delays = self.resolver.resolve(store, peak.design_day, load, zone);
        let mut table = build_load_table(
            store,
            self.building,
            peak.design_day,
            peak.peak_timestep,
            zone,
            &delays,
            &self.moving_average,
        );
        collect_peak_conditions(
            &mut table,
            self.building,
            self.sizing,
            self.sizing_time,
            peak.design_day,
            peak.peak_timestep,
            zone,
            load,
        );
        add_area_column(&mut table, &self.building.component_areas(zone));
        table
    }

    /// Combine zone tables into one at a shared peak. A zone table built at the same peak
    /// is reused, otherwise the zone is rebuilt at the shared peak.
    fn combined_table(
        &mut self,
        store: &mut SequenceStore,
        zone_tables: &[Option<PeakLoadTables>],
        zones: &[usize],
        peak: PeakSelection,
        load: DesignLoad,
    ) -> ComponentLoadTable {
        let mut combined = ComponentLoadTable::new();
        for zone in zones.iter().copied() {
            let multiplier = self.building.zone(zone).effective_multiplier();
            let existing = zone_tables
                .get(zone)
                .and_then(|tables| tables.as_ref())
                .map(|tables| tables.table(load))
                .filter(|table| table.matches_peak(peak.design_day, peak.peak_timestep));
            match existing {
                Some(table) => combined.combine(table, multiplier),
                None => {
                    let table = self.zone_table(store, zone, peak, load);
                    combined.combine(&table, multiplier);
                }
            }
        }
        combined.design_day = peak.design_day;
        combined.peak_timestep = peak.peak_timestep;
        combined
    }

    fn finish(&self, table: &mut ComponentLoadTable, name: &str, load: DesignLoad) {
        table.add_totals_and_percentages();
        table.compute_peak_difference();
        table.compute_engineering_checks();

        let peak = table.peak.peak_des_sens_load;
        if peak != 0.
            && table.peak.diff_peak_est.abs() > RECONCILIATION_WARNING_FRACTION * peak.abs()
        {
            warn!(
                object = name,
                load = load.label(),
                peak_sensible_load = peak,
                difference = table.peak.diff_peak_est,
                "Estimated instant and delayed sensible load differs from the peak sensible load by more than 10%"
            );
        }

        convert_table_units(table, self.options.units_style);
    }

    /// Produce every requested table. Zone tables are needed to build air loop and facility
    /// tables, so they are always computed, but only returned when requested.
    #[instrument(skip_all)]
    pub fn build(mut self, store: &mut SequenceStore) -> LoadComponentSummary {
        let building = self.building;
        let sizing = self.sizing;

        let zone_tables: Vec<Option<PeakLoadTables>> = (0..building.zones().len())
            .map(|zone| {
                building.zone(zone).is_controlled.then(|| PeakLoadTables {
                    name: building.zone(zone).name.clone(),
                    cooling: self.zone_table(
                        store,
                        zone,
                        sizing.zone_peak(zone, DesignLoad::Cooling),
                        DesignLoad::Cooling,
                    ),
                    heating: self.zone_table(
                        store,
                        zone,
                        sizing.zone_peak(zone, DesignLoad::Heating),
                        DesignLoad::Heating,
                    ),
                })
            })
            .collect();
        info!(
            zones = zone_tables.iter().flatten().count(),
            "Built zone component load tables"
        );

        let mut air_loops = vec![];
        if self.options.air_loop {
            for (air_loop_idx, air_loop) in building.air_loops().iter().enumerate() {
                let mut tables = PeakLoadTables {
                    name: air_loop.name.clone(),
                    cooling: self.combined_table(
                        store,
                        &zone_tables,
                        &air_loop.zones_cooled,
                        sizing.air_loop_peak(air_loop_idx, DesignLoad::Cooling),
                        DesignLoad::Cooling,
                    ),
                    heating: self.combined_table(
                        store,
                        &zone_tables,
                        &air_loop.zones_heated,
                        sizing.air_loop_peak(air_loop_idx, DesignLoad::Heating),
                        DesignLoad::Heating,
                    ),
                };
                let zones_served = air_loop.zones_served();
                for load in [DesignLoad::Cooling, DesignLoad::Heating] {
                    let table = tables.table_mut(load);
                    table.zone_indices = zones_served.clone();
                    if let Some(design) = sizing.air_loop_design(air_loop_idx, load) {
                        let peak = &mut table.peak;
                        peak.supply_air_temp = design.supply_air_temp.unwrap_or(peak.supply_air_temp);
                        peak.mixed_air_temp = design.mixed_air_temp.or(peak.mixed_air_temp);
                        peak.main_fan_air_flow =
                            design.main_fan_air_flow.unwrap_or(peak.main_fan_air_flow);
                        peak.outside_air_flow =
                            design.outside_air_flow.unwrap_or(peak.outside_air_flow);
                    }
                }
                air_loops.push(tables);
            }
            info!(air_loops = air_loops.len(), "Built air loop component load tables");
        }

        let mut facility = self.options.facility.then(|| {
            let controlled: Vec<usize> = building.controlled_zones().collect();
            PeakLoadTables {
                name: "Facility".to_string(),
                cooling: self.combined_table(
                    store,
                    &zone_tables,
                    &controlled,
                    sizing.facility_peak(DesignLoad::Cooling),
                    DesignLoad::Cooling,
                ),
                heating: self.combined_table(
                    store,
                    &zone_tables,
                    &controlled,
                    sizing.facility_peak(DesignLoad::Heating),
                    DesignLoad::Heating,
                ),
            }
        });

        let mut zones: Vec<PeakLoadTables> = if self.options.zone {
            zone_tables.into_iter().flatten().collect()
        } else {
            vec![]
        };

        for tables in zones
            .iter_mut()
            .chain(air_loops.iter_mut())
            .chain(facility.iter_mut())
        {
            for load in [DesignLoad::Cooling, DesignLoad::Heating] {
                let name = tables.name.clone();
                self.finish(tables.table_mut(load), &name, load);
            }
        }

        LoadComponentSummary {
            units_style: self.options.units_style,
            zones,
            air_loops,
            facility,
        }
    }
}
