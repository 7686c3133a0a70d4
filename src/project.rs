use crate::core::building::{AirLoop, Building, OutsideBoundary, People, Surface, Zone};
use crate::core::load_components::report::LoadComponentSummaryOptions;
use crate::core::load_components::sequence_store::SequenceStore;
use crate::core::load_components::sizing::{
    PeakSelection, RecordedSizingResults, ZoneConditionSequences,
};
use crate::core::load_components::table::DesignLoad;
use crate::core::units::MINUTES_PER_HOUR;
use crate::errors::InputError;
use crate::input::{Input, PeakDesignInput, PeakInput};
use crate::sizing_time::SizingTime;
use indexmap::IndexSet;
use tracing::debug;

/// Everything the load component summary needs, resolved from an input document.
#[derive(Debug)]
pub struct Project {
    pub options: LoadComponentSummaryOptions,
    pub sizing_time: SizingTime,
    pub building: Building,
    pub sizing: RecordedSizingResults,
    pub store: SequenceStore,
}

impl Project {
    pub fn from_input(input: Input) -> Result<Self, InputError> {
        validate_sizing_time(&input.sizing_time)?;

        let names = NameIndex::new(&input);
        let check = RecordCheck {
            days: input.sizing_time.number_of_days(),
            timesteps_per_day: input.sizing_time.timesteps_per_day(),
        };
        let report_requested = input.load_component_summary.is_some();

        let building = building_from_input(&input, &names)?;
        let sizing = sizing_from_input(&input, &names, &check)?;
        let store = store_from_input(&input, &names, &check, &building, report_requested)?;
        debug!(
            zones = building.zones().len(),
            surfaces = building.surfaces().len(),
            air_loops = building.air_loops().len(),
            days = check.days,
            "Resolved load component input"
        );

        Ok(Self {
            options: input.load_component_summary.unwrap_or_default(),
            sizing_time: input.sizing_time,
            building,
            sizing,
            store,
        })
    }
}

fn validate_sizing_time(sizing_time: &SizingTime) -> Result<(), InputError> {
    let timesteps_per_hour = sizing_time.timesteps_per_hour();
    if timesteps_per_hour == 0 || MINUTES_PER_HOUR as usize % timesteps_per_hour != 0 {
        return Err(InputError::InvalidTimestepsPerHour(timesteps_per_hour));
    }
    let mut day_names = IndexSet::new();
    for day in sizing_time.days() {
        if !day_names.insert(day.name.as_str()) {
            return Err(InputError::DuplicateName {
                kind: "Sizing day",
                name: day.name.clone(),
            });
        }
    }
    Ok(())
}

/// Index of each named object, in input order
struct NameIndex {
    zones: IndexSet<String>,
    surfaces: IndexSet<String>,
    air_loops: IndexSet<String>,
    enclosures: IndexSet<String>,
}

impl NameIndex {
    fn new(input: &Input) -> Self {
        Self {
            zones: input.zone.keys().cloned().collect(),
            surfaces: input.surface.keys().cloned().collect(),
            air_loops: input.air_loop.keys().cloned().collect(),
            // numbered in order of first appearance
            enclosures: input
                .zone
                .iter()
                .map(|(name, zone)| zone.radiant_enclosure.as_ref().unwrap_or(name).clone())
                .collect(),
        }
    }

    fn zone(&self, name: &str, referenced_by: &str) -> Result<usize, InputError> {
        self.zones
            .get_index_of(name)
            .ok_or_else(|| InputError::UnknownZone {
                name: name.to_string(),
                referenced_by: referenced_by.to_string(),
            })
    }

    fn surface(&self, name: &str, referenced_by: &str) -> Result<usize, InputError> {
        self.surfaces
            .get_index_of(name)
            .ok_or_else(|| InputError::UnknownSurface {
                name: name.to_string(),
                referenced_by: referenced_by.to_string(),
            })
    }

    fn air_loop(&self, name: &str, referenced_by: &str) -> Result<usize, InputError> {
        self.air_loops
            .get_index_of(name)
            .ok_or_else(|| InputError::UnknownAirLoop {
                name: name.to_string(),
                referenced_by: referenced_by.to_string(),
            })
    }

    fn enclosure(&self, name: &str, referenced_by: &str) -> Result<usize, InputError> {
        self.enclosures
            .get_index_of(name)
            .ok_or_else(|| InputError::UnknownEnclosure {
                name: name.to_string(),
                referenced_by: referenced_by.to_string(),
            })
    }
}

/// Bounds every day, timestep and sequence in the input must respect
struct RecordCheck {
    days: usize,
    timesteps_per_day: usize,
}

impl RecordCheck {
    fn day(&self, day: usize, referenced_by: &str) -> Result<usize, InputError> {
        if day < self.days {
            Ok(day)
        } else {
            Err(InputError::DayOutOfRange {
                day,
                days: self.days,
                referenced_by: referenced_by.to_string(),
            })
        }
    }

    fn timestep(&self, timestep: usize, referenced_by: &str) -> Result<usize, InputError> {
        if timestep < self.timesteps_per_day {
            Ok(timestep)
        } else {
            Err(InputError::TimestepOutOfRange {
                timestep,
                timesteps_per_day: self.timesteps_per_day,
                referenced_by: referenced_by.to_string(),
            })
        }
    }

    fn peak(&self, peak: PeakSelection, referenced_by: &str) -> Result<PeakSelection, InputError> {
        Ok(PeakSelection {
            design_day: peak
                .design_day
                .map(|day| self.day(day, referenced_by))
                .transpose()?,
            peak_timestep: peak
                .peak_timestep
                .map(|timestep| self.timestep(timestep, referenced_by))
                .transpose()?,
        })
    }

    fn sequence<'a>(&self, values: &'a [f64], name: &str) -> Result<&'a [f64], InputError> {
        if values.len() == self.timesteps_per_day {
            Ok(values)
        } else {
            Err(InputError::SequenceLength {
                name: name.to_string(),
                expected: self.timesteps_per_day,
                actual: values.len(),
            })
        }
    }
}

fn building_from_input(input: &Input, names: &NameIndex) -> Result<Building, InputError> {
    let zones = input
        .zone
        .iter()
        .map(|(name, zone)| {
            let enclosure = zone.radiant_enclosure.as_ref().unwrap_or(name);
            Ok(Zone {
                name: name.clone(),
                floor_area: zone.floor_area,
                multiplier: zone.multiplier,
                list_multiplier: zone.list_multiplier,
                is_controlled: zone.is_controlled,
                radiant_enclosure: names.enclosure(enclosure, &format!("zone '{name}'"))?,
            })
        })
        .collect::<Result<Vec<_>, InputError>>()?;

    let surfaces = input
        .surface
        .iter()
        .map(|(name, surface)| {
            let referenced_by = format!("surface '{name}'");
            if let OutsideBoundary::Interzone { adjacent_surface } = &surface.outside_boundary {
                names.surface(adjacent_surface, &referenced_by)?;
            }
            Ok(Surface {
                name: name.clone(),
                zone: names.zone(&surface.zone, &referenced_by)?,
                class: surface.class,
                outside_boundary: surface.outside_boundary.clone(),
                gross_area: surface.gross_area,
                area: surface.area.unwrap_or(surface.gross_area),
                heat_transfer: surface.heat_transfer,
            })
        })
        .collect::<Result<Vec<_>, InputError>>()?;

    let people = input
        .people
        .iter()
        .map(|(name, people)| {
            Ok(People {
                name: name.clone(),
                zone: names.zone(&people.zone, &format!("people '{name}'"))?,
                number_of_people: people.number_of_people,
            })
        })
        .collect::<Result<Vec<_>, InputError>>()?;

    let air_loops = input
        .air_loop
        .iter()
        .map(|(name, air_loop)| {
            let referenced_by = format!("air loop '{name}'");
            let resolve = |zones: &[String]| {
                zones
                    .iter()
                    .map(|zone| names.zone(zone, &referenced_by))
                    .collect::<Result<Vec<_>, InputError>>()
            };
            Ok(AirLoop {
                name: name.clone(),
                zones_cooled: resolve(&air_loop.zones_cooled)?,
                zones_heated: resolve(&air_loop.zones_heated)?,
            })
        })
        .collect::<Result<Vec<_>, InputError>>()?;

    Ok(Building::new(zones, surfaces, people, air_loops))
}

fn sizing_from_input(
    input: &Input,
    names: &NameIndex,
    check: &RecordCheck,
) -> Result<RecordedSizingResults, InputError> {
    let sizing_input = &input.sizing;
    let mut sizing = RecordedSizingResults::new(
        sizing_input.moving_average_window,
        check.days,
        names.zones.len(),
        names.air_loops.len(),
    );

    for (name, zone_sizing) in &sizing_input.zones {
        let referenced_by = format!("zone sizing for '{name}'");
        let zone = names.zone(name, &referenced_by)?;
        for (load, peak_input) in peaks_by_load(zone_sizing) {
            sizing.set_zone_sizing(
                zone,
                load,
                check.peak(peak_input.peak(), &referenced_by)?,
                peak_input.design.clone(),
            );
        }
    }

    for (name, air_loop_sizing) in &sizing_input.air_loops {
        let referenced_by = format!("air loop sizing for '{name}'");
        let air_loop = names.air_loop(name, &referenced_by)?;
        for (load, peak_input) in peaks_by_load(air_loop_sizing) {
            sizing.set_air_loop_sizing(
                air_loop,
                load,
                check.peak(peak_input.peak(), &referenced_by)?,
                peak_input.design.clone(),
            );
        }
    }

    for (load, peak_input) in peaks_by_load(&sizing_input.facility) {
        sizing.set_facility_peak(load, check.peak(peak_input.peak(), "facility sizing")?);
    }

    for conditions in &sizing_input.zone_conditions {
        let referenced_by = format!("zone conditions for '{}'", conditions.zone);
        let zone = names.zone(&conditions.zone, &referenced_by)?;
        let day = check.day(conditions.day, &referenced_by)?;
        let sequence = |values: &[f64]| check.sequence(values, &referenced_by).map(<[f64]>::to_vec);
        sizing.set_zone_conditions(
            day,
            zone,
            ZoneConditionSequences {
                outside_dry_bulb: sequence(&conditions.outside_dry_bulb)?,
                outside_hum_ratio: sequence(&conditions.outside_hum_ratio)?,
                zone_dry_bulb: sequence(&conditions.zone_dry_bulb)?,
                zone_hum_ratio: sequence(&conditions.zone_hum_ratio)?,
            },
        );
    }

    Ok(sizing)
}

fn peaks_by_load<T>(
    peak_design: &PeakDesignInput<T>,
) -> impl Iterator<Item = (DesignLoad, &PeakInput<T>)> {
    [
        (DesignLoad::Cooling, peak_design.cooling.as_ref()),
        (DesignLoad::Heating, peak_design.heating.as_ref()),
    ]
    .into_iter()
    .filter_map(|(load, peak)| peak.map(|peak| (load, peak)))
}

fn store_from_input(
    input: &Input,
    names: &NameIndex,
    check: &RecordCheck,
    building: &Building,
    report_requested: bool,
) -> Result<SequenceStore, InputError> {
    let mut store =
        SequenceStore::for_building(report_requested, check.days, check.timesteps_per_day, building);
    let sequences = &input.sequences;

    for record in &sequences.zones {
        let referenced_by = format!("{:?} sequence of zone '{}'", record.sequence, record.zone);
        let zone = names.zone(&record.zone, &referenced_by)?;
        let day = check.day(record.day, &referenced_by)?;
        let values = check.sequence(&record.values, &referenced_by)?;
        store
            .zone_series_mut(record.sequence, day, zone)
            .copy_from_slice(values);
    }

    for record in &sequences.surfaces {
        let referenced_by = format!(
            "{:?} sequence of surface '{}'",
            record.sequence, record.surface
        );
        let surface = names.surface(&record.surface, &referenced_by)?;
        let day = check.day(record.day, &referenced_by)?;
        let values = check.sequence(&record.values, &referenced_by)?;
        store
            .surface_series_mut(record.sequence, day, surface)
            .copy_from_slice(values);
    }

    for record in &sequences.radiant_distribution {
        let referenced_by = format!("radiant distribution of enclosure '{}'", record.enclosure);
        let enclosure = names.enclosure(&record.enclosure, &referenced_by)?;
        let day = check.day(record.day, &referenced_by)?;
        let values = check.sequence(&record.values, &referenced_by)?;
        store
            .radiant_distribution_series_mut(day, enclosure)
            .copy_from_slice(values);
    }

    let mut pulse_records = vec![];
    for record in &sequences.pulses {
        let referenced_by = format!("radiant pulse in zone '{}'", record.zone);
        let zone = names.zone(&record.zone, &referenced_by)?;
        let day = check.day(record.day, &referenced_by)?;
        let timestep = check.timestep(record.timestep, &referenced_by)?;
        let received = record
            .received
            .iter()
            .map(|(surface, received)| Ok((names.surface(surface, &referenced_by)?, *received)))
            .collect::<Result<Vec<_>, InputError>>()?;
        pulse_records.push((day, zone, timestep, received));
    }

    let mut with_pulse_records = vec![];
    for record in &sequences.load_convected_with_pulse {
        let referenced_by = format!("convected load with pulse of surface '{}'", record.surface);
        let surface = names.surface(&record.surface, &referenced_by)?;
        let day = check.day(record.day, &referenced_by)?;
        let values = check.sequence(&record.values, &referenced_by)?;
        with_pulse_records.push((day, surface, values));
    }

    if let Some(pulse) = store.pulse_mut() {
        for (day, zone, timestep, received) in pulse_records {
            pulse.set_pulse(day, zone, timestep);
            for (surface, received) in received {
                pulse.set_pulse_received(day, surface, received);
            }
        }
        for (day, surface, values) in with_pulse_records {
            for (timestep, value) in values.iter().enumerate() {
                pulse.set_load_convected_with_pulse(day, surface, timestep, *value);
            }
        }
    }

    Ok(store)
}
