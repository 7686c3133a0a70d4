use crate::core::building::Building;
use crate::core::load_components::sequence_store::{PulseSequences, SequenceStore, SurfaceSequence};
use crate::core::load_components::sizing::SizingResults;
use crate::core::load_components::table::DesignLoad;
use itertools::Itertools;
use std::io::{self, Write};
use tracing::{debug, instrument, warn};

/// Number of decay curve values written to the diagnostic output per surface
const DIAGNOSTIC_TIMESTEPS: usize = 36;

/// Radiant to convective decay curves for every surface.
///
/// Value `i` of a curve is the fraction of a radiant pulse absorbed by the surface that is
/// convected back to the zone air `i` timesteps after the pulse (0 being the pulse timestep
/// itself). One curve is derived from the zone's cooling design day and one from its heating
/// design day.
#[derive(Clone, Debug, PartialEq)]
pub struct DecayCurves {
    timesteps_per_day: usize,
    cooling: Vec<f64>,
    heating: Vec<f64>,
}

impl DecayCurves {
    pub fn new(surfaces: usize, timesteps_per_day: usize) -> Self {
        Self {
            timesteps_per_day,
            cooling: vec![0.; surfaces * timesteps_per_day],
            heating: vec![0.; surfaces * timesteps_per_day],
        }
    }

    pub fn timesteps_per_day(&self) -> usize {
        self.timesteps_per_day
    }

    pub fn curve(&self, load: DesignLoad, surface: usize) -> &[f64] {
        let start = surface * self.timesteps_per_day;
        let values = match load {
            DesignLoad::Cooling => &self.cooling,
            DesignLoad::Heating => &self.heating,
        };
        &values[start..start + self.timesteps_per_day]
    }

    fn curve_mut(&mut self, load: DesignLoad, surface: usize) -> &mut [f64] {
        let start = surface * self.timesteps_per_day;
        let values = match load {
            DesignLoad::Cooling => &mut self.cooling,
            DesignLoad::Heating => &mut self.heating,
        };
        &mut values[start..start + self.timesteps_per_day]
    }
}

/// Timestep at which the radiant pulse was injected into a zone, for use with a given design
/// day.
///
/// The pulse recorded on `day` itself is preferred. If there was none, the closest earlier
/// day with a pulse is used, and if no earlier day has one either the first timestep of the
/// day is assumed.
pub fn find_pulse_timestep(pulse: &PulseSequences, day: usize, zone: usize) -> usize {
    (0..=day)
        .rev()
        .find_map(|candidate| pulse.pulse_timestep(candidate, zone))
        .unwrap_or(0)
}

/// Derive the decay curves from the pulse pass, then release the pulse bookkeeping held by
/// the store.
///
/// Surfaces of zones without HVAC equipment keep all-zero curves.
#[instrument(skip_all)]
pub fn compute_decay_curves(
    store: &mut SequenceStore,
    building: &Building,
    sizing: &impl SizingResults,
) -> DecayCurves {
    let timesteps_per_day = store.timesteps_per_day();
    let mut curves = DecayCurves::new(building.surfaces().len(), timesteps_per_day);

    let Some(pulse) = store.take_pulse() else {
        warn!("Radiant pulse sequences were already released, decay curves are all zero");
        return curves;
    };

    for zone in building.controlled_zones() {
        for load in [DesignLoad::Cooling, DesignLoad::Heating] {
            let Some(day) = sizing.zone_peak(zone, load).design_day else {
                continue;
            };
            let pulse_timestep = find_pulse_timestep(&pulse, day, zone);

            for surface in building.zone_surfaces(zone).iter().copied() {
                let received = pulse.pulse_received(day, surface);
                if received == 0. {
                    debug!(
                        surface = building.surface(surface).name.as_str(),
                        "Surface received no radiant pulse"
                    );
                    continue;
                }
                let with_pulse = pulse.load_convected_with_pulse(day, surface);
                let normal = store.surface_series(SurfaceSequence::LoadConvected, day, surface);
                let curve = curves.curve_mut(load, surface);
                for timestep in pulse_timestep..timesteps_per_day {
                    // convected load is negative into the zone
                    curve[timestep - pulse_timestep] =
                        (normal[timestep] - with_pulse[timestep]) / received;
                }
            }
        }
    }

    curves
}

/// Write the start of every controlled surface's decay curves, cooling curves first.
pub fn write_decay_curve_diagnostics(
    curves: &DecayCurves,
    building: &Building,
    writer: &mut impl Write,
) -> io::Result<()> {
    let timesteps = DIAGNOSTIC_TIMESTEPS.min(curves.timesteps_per_day());
    let time_headers = (1..=timesteps).map(|i| format!(" Time {i}")).join(",");

    for load in [DesignLoad::Cooling, DesignLoad::Heating] {
        let label = format!("Radiant to Convective Decay Curves for {}", load.label());
        writeln!(writer, "! <{label}>,Zone Name, Surface Name,{time_headers}")?;

        for zone in building.controlled_zones() {
            let zone_name = &building.zone(zone).name;
            for surface in building.zone_surfaces(zone).iter().copied() {
                let values: String = curves.curve(load, surface)[..timesteps]
                    .iter()
                    .map(|value| format!(",{value:6.3}"))
                    .collect();
                writeln!(
                    writer,
                    "{label},{zone_name},{}{values}",
                    building.surface(surface).name
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::building::tests::{surface, zone};
    use crate::core::building::{OutsideBoundary, SurfaceClass};
    use crate::core::load_components::sequence_store::SizingPass;
    use crate::core::load_components::sizing::{PeakSelection, RecordedSizingResults};
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    const TIMESTEPS: usize = 24;

    #[fixture]
    fn building() -> Building {
        let mut uncontrolled = zone("Plenum", 30.);
        uncontrolled.is_controlled = false;
        Building::new(
            vec![zone("Office", 30.), uncontrolled],
            vec![
                surface("Wall", 0, SurfaceClass::Wall, OutsideBoundary::ExternalEnvironment, 10.),
                surface("Floor", 0, SurfaceClass::Floor, OutsideBoundary::Ground, 30.),
                surface("Plenum Wall", 1, SurfaceClass::Wall, OutsideBoundary::ExternalEnvironment, 10.),
            ],
            vec![],
            vec![],
        )
    }

    #[fixture]
    fn sizing() -> RecordedSizingResults {
        let mut sizing = RecordedSizingResults::new(1, 3, 2, 0);
        sizing.set_zone_sizing(0, DesignLoad::Cooling, PeakSelection::new(0, 15), None);
        sizing.set_zone_sizing(0, DesignLoad::Heating, PeakSelection::new(2, 6), None);
        sizing.set_zone_sizing(1, DesignLoad::Cooling, PeakSelection::new(0, 15), None);
        sizing
    }

    /// A single pulse of `received` W on the wall at timestep 9 of day 0, half of which comes
    /// back one timestep later
    fn store_with_single_pulse(building: &Building, received: f64) -> SequenceStore {
        let mut store = SequenceStore::for_building(true, 3, TIMESTEPS, building);
        store.set_sizing_pass(SizingPass::PulseZoneSizing);
        store.record_radiant_pulse(0, 0, 9, &[(0, received), (2, received)]);
        let pulse = store.pulse_mut().unwrap();
        for timestep in 0..TIMESTEPS {
            pulse.set_load_convected_with_pulse(0, 0, timestep, -40.);
            pulse.set_load_convected_with_pulse(0, 2, timestep, -40.);
        }
        pulse.set_load_convected_with_pulse(0, 0, 10, -40. - 0.5 * received);
        pulse.set_load_convected_with_pulse(0, 2, 10, -40. - 0.5 * received);
        for timestep in 0..TIMESTEPS {
            store.set_surface_value(SurfaceSequence::LoadConvected, 0, 0, timestep, -40.);
            store.set_surface_value(SurfaceSequence::LoadConvected, 0, 2, timestep, -40.);
        }
        store
    }

    #[rstest]
    fn should_derive_curve_from_single_pulse(building: Building, sizing: RecordedSizingResults) {
        let mut store = store_with_single_pulse(&building, 80.);
        let curves = compute_decay_curves(&mut store, &building, &sizing);

        let cooling = curves.curve(DesignLoad::Cooling, 0);
        for (offset, value) in cooling.iter().enumerate() {
            let expected = if offset == 1 { 0.5 } else { 0. };
            assert_relative_eq!(*value, expected);
        }
    }

    #[rstest]
    fn should_not_exceed_pulse_energy(building: Building, sizing: RecordedSizingResults) {
        let mut store = store_with_single_pulse(&building, 80.);
        let curves = compute_decay_curves(&mut store, &building, &sizing);

        let total: f64 = curves.curve(DesignLoad::Cooling, 0).iter().sum();
        assert!(total <= 1. + 1e-9);
    }

    #[rstest]
    fn should_leave_zero_curve_for_surface_without_pulse(
        building: Building,
        sizing: RecordedSizingResults,
    ) {
        let mut store = store_with_single_pulse(&building, 80.);
        let curves = compute_decay_curves(&mut store, &building, &sizing);

        assert!(curves.curve(DesignLoad::Cooling, 1).iter().all(|v| *v == 0.));
    }

    #[rstest]
    fn should_skip_uncontrolled_zones(building: Building, sizing: RecordedSizingResults) {
        let mut store = store_with_single_pulse(&building, 80.);
        let curves = compute_decay_curves(&mut store, &building, &sizing);

        assert!(curves.curve(DesignLoad::Cooling, 2).iter().all(|v| *v == 0.));
    }

    #[rstest]
    fn should_use_earlier_day_pulse_for_heating(building: Building, sizing: RecordedSizingResults) {
        let mut store = store_with_single_pulse(&building, 80.);
        let pulse = store.pulse_mut().unwrap();
        pulse.set_pulse_received(2, 0, 100.);
        for timestep in 0..TIMESTEPS {
            pulse.set_load_convected_with_pulse(2, 0, timestep, -(timestep as f64));
        }
        let curves = compute_decay_curves(&mut store, &building, &sizing);

        // no pulse recorded on day 2, so the day 0 pulse timestep (9) applies
        let heating = curves.curve(DesignLoad::Heating, 0);
        assert_relative_eq!(heating[0], 0.09);
        assert_relative_eq!(heating[14], 0.23);
        assert!(heating[15..].iter().all(|v| *v == 0.));
    }

    #[rstest]
    fn should_release_pulse_sequences(building: Building, sizing: RecordedSizingResults) {
        let mut store = store_with_single_pulse(&building, 80.);
        compute_decay_curves(&mut store, &building, &sizing);
        assert!(store.pulse().is_none());
    }

    #[rstest]
    fn should_find_pulse_timestep() {
        let mut store = SequenceStore::new(true, 4, TIMESTEPS, 2, 1, 1);
        let pulse = store.pulse_mut().unwrap();
        pulse.set_pulse(1, 0, 7);
        pulse.set_pulse(3, 0, 11);

        let pulse = store.pulse().unwrap();
        assert_eq!(find_pulse_timestep(pulse, 3, 0), 11);
        assert_eq!(find_pulse_timestep(pulse, 2, 0), 7);
        assert_eq!(find_pulse_timestep(pulse, 1, 0), 7);
        assert_eq!(find_pulse_timestep(pulse, 0, 0), 0);
        assert_eq!(find_pulse_timestep(pulse, 3, 1), 0);
    }

    #[rstest]
    fn should_write_diagnostics(building: Building, sizing: RecordedSizingResults) {
        let mut store = store_with_single_pulse(&building, 80.);
        let curves = compute_decay_curves(&mut store, &building, &sizing);

        let mut buffer = Vec::new();
        write_decay_curve_diagnostics(&curves, &building, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with(
            "! <Radiant to Convective Decay Curves for Cooling>,Zone Name, Surface Name, Time 1,"
        ));
        assert!(lines[0].ends_with(" Time 24"));
        assert!(lines[1].starts_with(
            "Radiant to Convective Decay Curves for Cooling,Office,Wall, 0.000, 0.500, 0.000,"
        ));
        assert_eq!(lines[1].split(',').count(), 3 + TIMESTEPS);
        assert!(lines[3].starts_with("! <Radiant to Convective Decay Curves for Heating>"));
    }
}
