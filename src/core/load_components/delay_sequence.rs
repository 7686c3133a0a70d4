use crate::core::building::Building;
use crate::core::load_components::decay_curve::DecayCurves;
use crate::core::load_components::sequence_store::{SequenceStore, SurfaceSequence, ZoneSequence};
use crate::core::load_components::table::DesignLoad;
use std::collections::HashSet;
use tracing::instrument;

/// Convective heat reaching a zone's air after a delay, in W, one value per timestep of the
/// sizing day.
#[derive(Clone, Debug, PartialEq)]
pub struct DelaySequences {
    pub people: Vec<f64>,
    /// long-wave and short-wave together
    pub lights: Vec<f64>,
    pub equipment: Vec<f64>,
    pub hvac_loss: Vec<f64>,
    pub power_generation: Vec<f64>,
    pub fenestration_solar: Vec<f64>,
    /// Remaining delayed heat leaving each of the zone's surfaces, as (surface index, sequence)
    pub surfaces: Vec<(usize, Vec<f64>)>,
}

impl DelaySequences {
    pub fn zero(timesteps_per_day: usize) -> Self {
        Self {
            people: vec![0.; timesteps_per_day],
            lights: vec![0.; timesteps_per_day],
            equipment: vec![0.; timesteps_per_day],
            hvac_loss: vec![0.; timesteps_per_day],
            power_generation: vec![0.; timesteps_per_day],
            fenestration_solar: vec![0.; timesteps_per_day],
            surfaces: vec![],
        }
    }
}

/// Radiant gain reaching one surface from each source, for one timestep
#[derive(Default)]
struct SurfaceRadiantShares {
    people: f64,
    equipment: f64,
    hvac_loss: f64,
    power_generation: f64,
    lights_long_wave: f64,
    lights_short_wave: f64,
    fenestration_solar: f64,
}

impl SurfaceRadiantShares {
    fn total(&self) -> f64 {
        self.people
            + self.equipment
            + self.hvac_loss
            + self.power_generation
            + self.lights_long_wave
            + self.lights_short_wave
            + self.fenestration_solar
    }
}

/// Convolves decay curves with the radiant parts of a zone's gains.
///
/// Resolving also removes the net radiant exchange of the zone's windows from the zone's
/// fenestration conduction sequence. That adjustment is made at most once for each
/// (day, timestep, zone) however many times the same zone and day are resolved.
pub struct DelaySequenceResolver<'a> {
    building: &'a Building,
    curves: &'a DecayCurves,
    adjusted: HashSet<(usize, usize, usize)>,
}

impl<'a> DelaySequenceResolver<'a> {
    pub fn new(building: &'a Building, curves: &'a DecayCurves) -> Self {
        Self {
            building,
            curves,
            adjusted: Default::default(),
        }
    }

    /// Delay sequences for a zone on a sizing day, using the decay curves for `load`.
    /// Gives all-zero sequences when there is no design day.
    #[instrument(skip(self, store))]
    pub fn resolve(
        &mut self,
        store: &mut SequenceStore,
        design_day: Option<usize>,
        load: DesignLoad,
        zone: usize,
    ) -> DelaySequences {
        let timesteps = store.timesteps_per_day();
        let mut delays = DelaySequences::zero(timesteps);
        let Some(day) = design_day else {
            return delays;
        };

        let enclosure = self.building.zone(zone).radiant_enclosure;
        let zone_surfaces = self.building.zone_surfaces(zone);
        delays.surfaces = zone_surfaces
            .iter()
            .map(|surface| (*surface, vec![0.; timesteps]))
            .collect();

        let people = store.zone_series(ZoneSequence::PeopleRadiant, day, zone);
        let equipment = store.zone_series(ZoneSequence::EquipmentRadiant, day, zone);
        let hvac_loss = store.zone_series(ZoneSequence::HvacLossRadiant, day, zone);
        let power_generation = store.zone_series(ZoneSequence::PowerGenerationRadiant, day, zone);
        let lights = store.zone_series(ZoneSequence::LightsRadiant, day, zone);

        let mut window_net_radiation = vec![0.; timesteps];

        for (position, surface_idx) in zone_surfaces.iter().copied().enumerate() {
            let surface = self.building.surface(surface_idx);
            let curve = self.curves.curve(load, surface_idx);
            let absorbed_fraction = store.surface_series(
                SurfaceSequence::AbsorbedThermalRadiationFraction,
                day,
                surface_idx,
            );
            let short_wave = store.surface_series(SurfaceSequence::ShortWaveLightRadiation, day, surface_idx);
            let solar = store.surface_series(SurfaceSequence::TransmittedSolarRadiation, day, surface_idx);
            let net_radiation = store.surface_series(SurfaceSequence::NetRadiantFlux, day, surface_idx);
            let convected = store.surface_series(SurfaceSequence::LoadConvected, day, surface_idx);

            for timestep in 0..timesteps {
                let mut shares = SurfaceRadiantShares::default();
                for (steps_back, decay) in curve[..=timestep].iter().enumerate() {
                    let source = timestep - steps_back;
                    let multiplier = store.radiant_distribution(day, enclosure, source)
                        * absorbed_fraction[source]
                        * surface.area
                        * decay;
                    shares.people += people[source] * multiplier;
                    shares.equipment += equipment[source] * multiplier;
                    shares.hvac_loss += hvac_loss[source] * multiplier;
                    shares.power_generation += power_generation[source] * multiplier;
                    shares.lights_long_wave += lights[source] * multiplier;
                    shares.lights_short_wave += short_wave[source] * decay;
                    shares.fenestration_solar += solar[source] * decay;
                }

                delays.people[timestep] += shares.people;
                delays.equipment[timestep] += shares.equipment;
                delays.hvac_loss[timestep] += shares.hvac_loss;
                delays.power_generation[timestep] += shares.power_generation;
                delays.lights[timestep] += shares.lights_long_wave + shares.lights_short_wave;
                delays.fenestration_solar[timestep] += shares.fenestration_solar;

                delays.surfaces[position].1[timestep] =
                    -convected[timestep] - net_radiation[timestep] - shares.total();

                if surface.is_window() {
                    window_net_radiation[timestep] += net_radiation[timestep];
                }
            }
        }

        let fenestration =
            store.zone_series_mut(ZoneSequence::FenestrationConductionInstant, day, zone);
        for (timestep, adjustment) in window_net_radiation.into_iter().enumerate() {
            if self.adjusted.insert((day, timestep, zone)) {
                fenestration[timestep] -= adjustment;
            }
        }

        delays
    }
}
