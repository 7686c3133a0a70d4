use crate::core::building::Building;
use serde::Deserialize;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount as EnumCountMacro, EnumIter};

/// Which simulation pass is currently driving the gather hooks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SizingPass {
    #[default]
    Simulation,
    ZoneSizing,
    /// Zone sizing repeated with a small radiant pulse injected into each zone
    PulseZoneSizing,
}

/// Values over (sizing day, item, timestep of day). Each day's series for one item is stored
/// contiguously.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceGrid {
    items: usize,
    timesteps: usize,
    values: Vec<f64>,
}

impl SequenceGrid {
    pub fn new(days: usize, items: usize, timesteps: usize) -> Self {
        Self {
            items,
            timesteps,
            values: vec![0.; days * items * timesteps],
        }
    }

    fn offset(&self, day: usize, item: usize) -> usize {
        (day * self.items + item) * self.timesteps
    }

    pub fn get(&self, day: usize, item: usize, timestep: usize) -> f64 {
        self.values[self.offset(day, item) + timestep]
    }

    pub fn set(&mut self, day: usize, item: usize, timestep: usize, value: f64) {
        let offset = self.offset(day, item);
        self.values[offset + timestep] = value;
    }

    pub fn add(&mut self, day: usize, item: usize, timestep: usize, value: f64) {
        let offset = self.offset(day, item);
        self.values[offset + timestep] += value;
    }

    /// The whole day's series for one item
    pub fn series(&self, day: usize, item: usize) -> &[f64] {
        let offset = self.offset(day, item);
        &self.values[offset..offset + self.timesteps]
    }

    pub fn series_mut(&mut self, day: usize, item: usize) -> &mut [f64] {
        let offset = self.offset(day, item);
        &mut self.values[offset..offset + self.timesteps]
    }
}

/// Per-zone sequences recorded during zone sizing, in W.
///
/// Instant and return air values are convective gains, radiant values are the long-wave
/// radiant part of a gain before it is distributed to the zone's surfaces.
#[derive(Clone, Copy, Debug, Deserialize, EnumCountMacro, EnumIter, Eq, Hash, PartialEq)]
pub enum ZoneSequence {
    PeopleInstant,
    PeopleLatent,
    PeopleRadiant,
    LightsInstant,
    LightsReturnAir,
    LightsRadiant,
    EquipmentInstant,
    EquipmentLatent,
    EquipmentRadiant,
    RefrigerationInstant,
    RefrigerationReturnAir,
    RefrigerationLatent,
    WaterUseInstant,
    WaterUseLatent,
    HvacLossInstant,
    HvacLossRadiant,
    PowerGenerationInstant,
    PowerGenerationRadiant,
    DoasInstant,
    DoasLatent,
    InfiltrationInstant,
    InfiltrationLatent,
    ZoneVentilationInstant,
    ZoneVentilationLatent,
    InterzoneMixingInstant,
    InterzoneMixingLatent,
    FenestrationConductionInstant,
}

/// Per-surface sequences recorded during zone sizing.
#[derive(Clone, Copy, Debug, Deserialize, EnumCountMacro, EnumIter, Eq, Hash, PartialEq)]
pub enum SurfaceSequence {
    /// share of the enclosure's long-wave radiant gains absorbed by the surface
    AbsorbedThermalRadiationFraction,
    /// short-wave radiation from lights absorbed by the surface, in W
    ShortWaveLightRadiation,
    /// transmitted solar radiation absorbed by the surface, in W
    TransmittedSolarRadiation,
    /// net long-wave radiant exchange with other surfaces, in W
    NetRadiantFlux,
    /// heat convected from the surface to the zone air, in W
    LoadConvected,
}

/// Bookkeeping only needed while the pulse pass runs and the decay curves are computed.
#[derive(Clone, Debug, PartialEq)]
pub struct PulseSequences {
    zones: usize,
    surfaces: usize,
    /// convected load per surface during the pulse pass
    load_convected_with_pulse: SequenceGrid,
    /// indexed by day, then zone
    pulse_timestep: Vec<Option<usize>>,
    /// radiant heat received from the pulse, indexed by day, then surface
    pulse_received: Vec<f64>,
}

impl PulseSequences {
    fn new(days: usize, zones: usize, surfaces: usize, timesteps: usize) -> Self {
        Self {
            zones,
            surfaces,
            load_convected_with_pulse: SequenceGrid::new(days, surfaces, timesteps),
            pulse_timestep: vec![None; days * zones],
            pulse_received: vec![0.; days * surfaces],
        }
    }

    pub fn pulse_timestep(&self, day: usize, zone: usize) -> Option<usize> {
        self.pulse_timestep[day * self.zones + zone]
    }

    pub fn pulse_received(&self, day: usize, surface: usize) -> f64 {
        self.pulse_received[day * self.surfaces + surface]
    }

    pub fn load_convected_with_pulse(&self, day: usize, surface: usize) -> &[f64] {
        self.load_convected_with_pulse.series(day, surface)
    }

    pub fn set_pulse(&mut self, day: usize, zone: usize, timestep: usize) {
        self.pulse_timestep[day * self.zones + zone] = Some(timestep);
    }

    pub fn set_pulse_received(&mut self, day: usize, surface: usize, received: f64) {
        self.pulse_received[day * self.surfaces + surface] = received;
    }

    pub fn set_load_convected_with_pulse(
        &mut self,
        day: usize,
        surface: usize,
        timestep: usize,
        value: f64,
    ) {
        self.load_convected_with_pulse
            .set(day, surface, timestep, value);
    }
}

/// Convective gains from the room side of a window, in W
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindowConvectiveGains {
    pub glazing: f64,
    /// natural convection from the gap between glazing and an interior shade
    pub gap_convection: f64,
    pub shade: f64,
    pub frame_and_divider: f64,
}

impl WindowConvectiveGains {
    fn total(&self) -> f64 {
        self.glazing + self.gap_convection + self.shade + self.frame_and_divider
    }
}

pub trait FenestrationConvectionSource {
    fn window_convective_gains(&self, surface: usize) -> WindowConvectiveGains;

    /// Convective gain to a zone from its tubular daylighting devices, in W
    fn tubular_daylighting_gain(&self, zone: usize) -> f64;
}

/// Sensible and latent heat gained and lost through one air exchange path
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeatExchange {
    pub sensible_gain: f64,
    pub sensible_loss: f64,
    pub latent_gain: f64,
    pub latent_loss: f64,
}

impl HeatExchange {
    fn net_sensible(&self) -> f64 {
        self.sensible_gain - self.sensible_loss
    }

    fn net_latent(&self) -> f64 {
        self.latent_gain - self.latent_loss
    }
}

pub trait ZoneAirExchangeSource {
    /// Length of the HVAC system timestep, in seconds
    fn system_timestep_seconds(&self) -> f64;

    /// Energy over the system timestep, in J
    fn infiltration(&self, zone: usize) -> HeatExchange;

    /// Energy over the system timestep, in J
    fn ventilation(&self, zone: usize) -> HeatExchange;

    /// Energy over the system timestep, in J
    fn mixing(&self, zone: usize) -> HeatExchange;

    /// Infiltration rates from the airflow network model, in W, when it is active for the zone
    fn airflow_network_infiltration(&self, zone: usize) -> Option<HeatExchange>;

    /// Mixing rates from the airflow network model, in W, when it is active for the zone
    fn airflow_network_mixing(&self, zone: usize) -> Option<HeatExchange>;
}

#[derive(Clone, Copy, Debug, EnumCountMacro, EnumIter, Eq, PartialEq)]
pub enum InternalGainCategory {
    People,
    Lights,
    Equipment,
    Refrigeration,
    WaterUse,
    HvacLoss,
    PowerGeneration,
}

/// How an internal gain is split between heat paths, in W
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InternalGainSplit {
    pub convective: f64,
    pub return_air: f64,
    pub latent: f64,
    pub radiant: f64,
}

struct GainSequences {
    instant: ZoneSequence,
    return_air: Option<ZoneSequence>,
    latent: Option<ZoneSequence>,
    radiant: Option<ZoneSequence>,
}

impl InternalGainCategory {
    fn sequences(&self) -> GainSequences {
        use ZoneSequence::*;

        match self {
            InternalGainCategory::People => GainSequences {
                instant: PeopleInstant,
                return_air: None,
                latent: Some(PeopleLatent),
                radiant: Some(PeopleRadiant),
            },
            InternalGainCategory::Lights => GainSequences {
                instant: LightsInstant,
                return_air: Some(LightsReturnAir),
                latent: None,
                radiant: Some(LightsRadiant),
            },
            InternalGainCategory::Equipment => GainSequences {
                instant: EquipmentInstant,
                return_air: None,
                latent: Some(EquipmentLatent),
                radiant: Some(EquipmentRadiant),
            },
            InternalGainCategory::Refrigeration => GainSequences {
                instant: RefrigerationInstant,
                return_air: Some(RefrigerationReturnAir),
                latent: Some(RefrigerationLatent),
                radiant: None,
            },
            InternalGainCategory::WaterUse => GainSequences {
                instant: WaterUseInstant,
                return_air: None,
                latent: Some(WaterUseLatent),
                radiant: None,
            },
            InternalGainCategory::HvacLoss => GainSequences {
                instant: HvacLossInstant,
                return_air: None,
                latent: None,
                radiant: Some(HvacLossRadiant),
            },
            InternalGainCategory::PowerGeneration => GainSequences {
                instant: PowerGenerationInstant,
                return_air: None,
                latent: None,
                radiant: Some(PowerGenerationRadiant),
            },
        }
    }
}

pub trait InternalGainSource {
    fn internal_gains(&self, zone: usize, category: InternalGainCategory) -> InternalGainSplit;
}

/// Per-surface results of the surface heat balance for the current timestep
pub trait SurfaceHeatBalanceSource {
    fn absorbed_thermal_radiation_fraction(&self, surface: usize) -> f64;

    /// in W
    fn short_wave_light_radiation(&self, surface: usize) -> f64;

    /// in W
    fn transmitted_solar_radiation(&self, surface: usize) -> f64;

    /// in W
    fn net_radiant_flux(&self, surface: usize) -> f64;

    /// in W
    fn load_convected(&self, surface: usize) -> f64;

    /// Multiplier distributing an enclosure's radiant gains over its surfaces
    fn radiant_distribution_multiplier(&self, enclosure: usize) -> f64;
}

/// Owns every sequence recorded during sizing for the load component report.
///
/// Sequences are indexed by sizing day, zone/surface/enclosure and timestep of day. The
/// gather hooks only record while the report has been requested and a sizing pass is running.
#[derive(Clone, Debug)]
pub struct SequenceStore {
    report_requested: bool,
    sizing_pass: SizingPass,
    timesteps_per_day: usize,
    zones: usize,
    zone_sequences: Vec<SequenceGrid>,
    surface_sequences: Vec<SequenceGrid>,
    radiant_distribution: SequenceGrid,
    pulse: Option<PulseSequences>,
}

impl SequenceStore {
    /// Arguments:
    /// * `report_requested` - whether the load component report was asked for
    /// * `days` - number of sizing days, design days followed by weather file sizing periods
    /// * `timesteps_per_day` - zone timesteps in each sizing day
    /// * `zones`, `surfaces`, `enclosures` - counts from the building model
    pub fn new(
        report_requested: bool,
        days: usize,
        timesteps_per_day: usize,
        zones: usize,
        surfaces: usize,
        enclosures: usize,
    ) -> Self {
        Self {
            report_requested,
            sizing_pass: SizingPass::Simulation,
            timesteps_per_day,
            zones,
            zone_sequences: (0..ZoneSequence::COUNT)
                .map(|_| SequenceGrid::new(days, zones, timesteps_per_day))
                .collect(),
            surface_sequences: (0..SurfaceSequence::COUNT)
                .map(|_| SequenceGrid::new(days, surfaces, timesteps_per_day))
                .collect(),
            radiant_distribution: SequenceGrid::new(days, enclosures, timesteps_per_day),
            pulse: Some(PulseSequences::new(
                days,
                zones,
                surfaces,
                timesteps_per_day,
            )),
        }
    }

    /// Sized for a building model
    pub fn for_building(
        report_requested: bool,
        days: usize,
        timesteps_per_day: usize,
        building: &Building,
    ) -> Self {
        Self::new(
            report_requested,
            days,
            timesteps_per_day,
            building.zones().len(),
            building.surfaces().len(),
            building.number_of_enclosures(),
        )
    }

    pub fn report_requested(&self) -> bool {
        self.report_requested
    }

    pub fn timesteps_per_day(&self) -> usize {
        self.timesteps_per_day
    }

    pub fn set_sizing_pass(&mut self, sizing_pass: SizingPass) {
        self.sizing_pass = sizing_pass;
    }

    fn recording(&self) -> bool {
        self.report_requested && self.sizing_pass == SizingPass::ZoneSizing
    }

    fn recording_pulse(&self) -> bool {
        self.report_requested && self.sizing_pass == SizingPass::PulseZoneSizing
    }

    pub fn zone_value(&self, sequence: ZoneSequence, day: usize, zone: usize, timestep: usize) -> f64 {
        self.zone_sequences[sequence as usize].get(day, zone, timestep)
    }

    pub fn zone_series(&self, sequence: ZoneSequence, day: usize, zone: usize) -> &[f64] {
        self.zone_sequences[sequence as usize].series(day, zone)
    }

    pub fn zone_series_mut(
        &mut self,
        sequence: ZoneSequence,
        day: usize,
        zone: usize,
    ) -> &mut [f64] {
        self.zone_sequences[sequence as usize].series_mut(day, zone)
    }

    pub fn set_zone_value(
        &mut self,
        sequence: ZoneSequence,
        day: usize,
        zone: usize,
        timestep: usize,
        value: f64,
    ) {
        self.zone_sequences[sequence as usize].set(day, zone, timestep, value);
    }

    pub fn surface_value(
        &self,
        sequence: SurfaceSequence,
        day: usize,
        surface: usize,
        timestep: usize,
    ) -> f64 {
        self.surface_sequences[sequence as usize].get(day, surface, timestep)
    }

    pub fn surface_series(&self, sequence: SurfaceSequence, day: usize, surface: usize) -> &[f64] {
        self.surface_sequences[sequence as usize].series(day, surface)
    }

    pub fn surface_series_mut(
        &mut self,
        sequence: SurfaceSequence,
        day: usize,
        surface: usize,
    ) -> &mut [f64] {
        self.surface_sequences[sequence as usize].series_mut(day, surface)
    }

    pub fn set_surface_value(
        &mut self,
        sequence: SurfaceSequence,
        day: usize,
        surface: usize,
        timestep: usize,
        value: f64,
    ) {
        self.surface_sequences[sequence as usize].set(day, surface, timestep, value);
    }

    pub fn radiant_distribution(&self, day: usize, enclosure: usize, timestep: usize) -> f64 {
        self.radiant_distribution.get(day, enclosure, timestep)
    }

    pub fn radiant_distribution_series_mut(&mut self, day: usize, enclosure: usize) -> &mut [f64] {
        self.radiant_distribution.series_mut(day, enclosure)
    }

    pub fn pulse(&self) -> Option<&PulseSequences> {
        self.pulse.as_ref()
    }

    pub fn pulse_mut(&mut self) -> Option<&mut PulseSequences> {
        self.pulse.as_mut()
    }

    /// Release the pulse bookkeeping, which is not needed once decay curves exist
    pub fn take_pulse(&mut self) -> Option<PulseSequences> {
        self.pulse.take()
    }

    /// Convective gains from windows and tubular daylighting devices into each zone.
    /// Call exactly once per zone timestep.
    pub fn gather_surface_sequences(
        &mut self,
        day: usize,
        timestep: usize,
        building: &Building,
        source: &impl FenestrationConvectionSource,
    ) {
        if !self.recording() {
            return;
        }

        let grid = &mut self.zone_sequences[ZoneSequence::FenestrationConductionInstant as usize];
        for zone in 0..self.zones {
            grid.set(day, zone, timestep, 0.);
        }
        for (surface_idx, surface) in building.heat_transfer_surfaces() {
            if surface.is_window() {
                let gains = source.window_convective_gains(surface_idx);
                grid.add(day, surface.zone, timestep, gains.total());
            }
        }
        for zone in 0..self.zones {
            grid.add(day, zone, timestep, source.tubular_daylighting_gain(zone));
        }
    }

    /// Net infiltration, zone ventilation and interzone mixing rates for each zone
    pub fn gather_hvac_sequences(
        &mut self,
        day: usize,
        timestep: usize,
        source: &impl ZoneAirExchangeSource,
    ) {
        if !self.recording() {
            return;
        }

        let seconds = source.system_timestep_seconds();
        if seconds <= 0. {
            return;
        }

        for zone in 0..self.zones {
            let infiltration = source.infiltration(zone);
            let ventilation = source.ventilation(zone);
            let mixing = source.mixing(zone);

            let mut infiltration_sensible = infiltration.net_sensible() / seconds;
            let mut infiltration_latent = infiltration.net_latent() / seconds;
            let mut mixing_sensible = mixing.net_sensible() / seconds;
            let mut mixing_latent = mixing.net_latent() / seconds;

            if let Some(network) = source.airflow_network_infiltration(zone) {
                infiltration_sensible += network.net_sensible();
                infiltration_latent += network.net_latent();
            }
            if let Some(network) = source.airflow_network_mixing(zone) {
                mixing_sensible += network.net_sensible();
                mixing_latent += network.net_latent();
            }

            let values = [
                (ZoneSequence::InfiltrationInstant, infiltration_sensible),
                (ZoneSequence::InfiltrationLatent, infiltration_latent),
                (
                    ZoneSequence::ZoneVentilationInstant,
                    ventilation.net_sensible() / seconds,
                ),
                (
                    ZoneSequence::ZoneVentilationLatent,
                    ventilation.net_latent() / seconds,
                ),
                (ZoneSequence::InterzoneMixingInstant, mixing_sensible),
                (ZoneSequence::InterzoneMixingLatent, mixing_latent),
            ];
            for (sequence, value) in values {
                self.set_zone_value(sequence, day, zone, timestep, value);
            }
        }
    }

    /// Split of each internal gain category between convective, return air, latent and
    /// radiant heat for each zone
    pub fn gather_internal_gain_sequences(
        &mut self,
        day: usize,
        timestep: usize,
        source: &impl InternalGainSource,
    ) {
        if !self.recording() {
            return;
        }

        for zone in 0..self.zones {
            for category in InternalGainCategory::iter() {
                let gains = source.internal_gains(zone, category);
                let sequences = category.sequences();
                self.set_zone_value(sequences.instant, day, zone, timestep, gains.convective);
                if let Some(sequence) = sequences.return_air {
                    self.set_zone_value(sequence, day, zone, timestep, gains.return_air);
                }
                if let Some(sequence) = sequences.latent {
                    self.set_zone_value(sequence, day, zone, timestep, gains.latent);
                }
                if let Some(sequence) = sequences.radiant {
                    self.set_zone_value(sequence, day, zone, timestep, gains.radiant);
                }
            }
        }
    }

    /// Surface heat balance results. During the pulse pass only the convected load is kept,
    /// as the pulsed counterpart of the ordinary sizing value.
    pub fn gather_surface_heat_balance_sequences(
        &mut self,
        day: usize,
        timestep: usize,
        building: &Building,
        source: &impl SurfaceHeatBalanceSource,
    ) {
        if self.recording_pulse() {
            if let Some(pulse) = self.pulse.as_mut() {
                for (surface_idx, _) in building.heat_transfer_surfaces() {
                    pulse.set_load_convected_with_pulse(
                        day,
                        surface_idx,
                        timestep,
                        source.load_convected(surface_idx),
                    );
                }
            }
            return;
        }
        if !self.recording() {
            return;
        }

        for enclosure in 0..building.number_of_enclosures() {
            self.radiant_distribution.set(
                day,
                enclosure,
                timestep,
                source.radiant_distribution_multiplier(enclosure),
            );
        }
        for (surface_idx, _) in building.heat_transfer_surfaces() {
            let values = [
                (
                    SurfaceSequence::AbsorbedThermalRadiationFraction,
                    source.absorbed_thermal_radiation_fraction(surface_idx),
                ),
                (
                    SurfaceSequence::ShortWaveLightRadiation,
                    source.short_wave_light_radiation(surface_idx),
                ),
                (
                    SurfaceSequence::TransmittedSolarRadiation,
                    source.transmitted_solar_radiation(surface_idx),
                ),
                (
                    SurfaceSequence::NetRadiantFlux,
                    source.net_radiant_flux(surface_idx),
                ),
                (
                    SurfaceSequence::LoadConvected,
                    source.load_convected(surface_idx),
                ),
            ];
            for (sequence, value) in values {
                self.set_surface_value(sequence, day, surface_idx, timestep, value);
            }
        }
    }

    /// Note the timestep a zone's radiant pulse was injected on a sizing day and how much of it
    /// each surface received
    pub fn record_radiant_pulse(
        &mut self,
        day: usize,
        zone: usize,
        timestep: usize,
        received_by_surface: &[(usize, f64)],
    ) {
        if !self.recording_pulse() {
            return;
        }
        if let Some(pulse) = self.pulse.as_mut() {
            pulse.set_pulse(day, zone, timestep);
            for (surface, received) in received_by_surface {
                pulse.set_pulse_received(day, *surface, *received);
            }
        }
    }

    /// Sensible and latent heat delivered directly to a zone by a dedicated outdoor air system
    pub fn record_doas_direct_to_zone(
        &mut self,
        day: usize,
        timestep: usize,
        zone: usize,
        sensible: f64,
        latent: f64,
    ) {
        if !self.recording() {
            return;
        }
        self.set_zone_value(ZoneSequence::DoasInstant, day, zone, timestep, sensible);
        self.set_zone_value(ZoneSequence::DoasLatent, day, zone, timestep, latent);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::building::tests::{surface, zone};
    use crate::core::building::{OutsideBoundary, SurfaceClass};
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    pub(crate) fn building() -> Building {
        Building::new(
            vec![zone("Office", 50.), zone("Store", 20.)],
            vec![
                surface("Office Wall", 0, SurfaceClass::Wall, OutsideBoundary::ExternalEnvironment, 20.),
                surface("Office Window", 0, SurfaceClass::Window, OutsideBoundary::ExternalEnvironment, 4.),
                surface("Store Window", 1, SurfaceClass::Window, OutsideBoundary::ExternalEnvironment, 2.),
            ],
            vec![],
            vec![],
        )
    }

    struct Windows;

    impl FenestrationConvectionSource for Windows {
        fn window_convective_gains(&self, surface: usize) -> WindowConvectiveGains {
            WindowConvectiveGains {
                glazing: 10. * surface as f64,
                gap_convection: 1.,
                shade: 2.,
                frame_and_divider: 3.,
            }
        }

        fn tubular_daylighting_gain(&self, zone: usize) -> f64 {
            if zone == 1 {
                5.
            } else {
                0.
            }
        }
    }

    struct AirExchange {
        airflow_network: bool,
    }

    impl ZoneAirExchangeSource for AirExchange {
        fn system_timestep_seconds(&self) -> f64 {
            900.
        }

        fn infiltration(&self, _zone: usize) -> HeatExchange {
            HeatExchange {
                sensible_gain: 90_000.,
                sensible_loss: 180_000.,
                latent_gain: 9_000.,
                latent_loss: 0.,
            }
        }

        fn ventilation(&self, _zone: usize) -> HeatExchange {
            HeatExchange {
                sensible_gain: 45_000.,
                ..Default::default()
            }
        }

        fn mixing(&self, _zone: usize) -> HeatExchange {
            HeatExchange::default()
        }

        fn airflow_network_infiltration(&self, _zone: usize) -> Option<HeatExchange> {
            self.airflow_network.then_some(HeatExchange {
                sensible_gain: 20.,
                sensible_loss: 5.,
                latent_gain: 0.,
                latent_loss: 3.,
            })
        }

        fn airflow_network_mixing(&self, _zone: usize) -> Option<HeatExchange> {
            self.airflow_network.then_some(HeatExchange {
                sensible_gain: 7.,
                ..Default::default()
            })
        }
    }

    struct HeatBalance;

    impl SurfaceHeatBalanceSource for HeatBalance {
        fn absorbed_thermal_radiation_fraction(&self, _surface: usize) -> f64 {
            0.4
        }

        fn short_wave_light_radiation(&self, _surface: usize) -> f64 {
            3.
        }

        fn transmitted_solar_radiation(&self, _surface: usize) -> f64 {
            12.
        }

        fn net_radiant_flux(&self, _surface: usize) -> f64 {
            -1.
        }

        fn load_convected(&self, surface: usize) -> f64 {
            -100. - surface as f64
        }

        fn radiant_distribution_multiplier(&self, _enclosure: usize) -> f64 {
            0.02
        }
    }

    struct Gains;

    impl InternalGainSource for Gains {
        fn internal_gains(&self, zone: usize, category: InternalGainCategory) -> InternalGainSplit {
            let base = 100. * (zone + 1) as f64 + category as usize as f64;
            InternalGainSplit {
                convective: base,
                return_air: base + 0.1,
                latent: base + 0.2,
                radiant: base + 0.3,
            }
        }
    }

    #[fixture]
    fn store(building: Building) -> SequenceStore {
        let mut store = SequenceStore::for_building(true, 2, 24, &building);
        store.set_sizing_pass(SizingPass::ZoneSizing);
        store
    }

    #[rstest]
    fn should_lay_out_each_day_contiguously() {
        let mut grid = SequenceGrid::new(2, 3, 4);
        grid.set(1, 2, 3, 5.);
        grid.add(1, 2, 3, 1.);
        assert_eq!(grid.get(1, 2, 3), 6.);
        assert_eq!(grid.series(1, 2), &[0., 0., 0., 6.]);
        assert_eq!(grid.series(0, 2), &[0.; 4]);
    }

    #[rstest]
    fn should_sum_window_and_tubular_gains(building: Building, mut store: SequenceStore) {
        store.set_zone_value(ZoneSequence::FenestrationConductionInstant, 0, 0, 5, 999.);
        store.gather_surface_sequences(0, 5, &building, &Windows);

        assert_eq!(
            store.zone_value(ZoneSequence::FenestrationConductionInstant, 0, 0, 5),
            16.
        );
        assert_eq!(
            store.zone_value(ZoneSequence::FenestrationConductionInstant, 0, 1, 5),
            31.
        );
    }

    #[rstest]
    fn should_convert_air_exchange_energy_to_rates(mut store: SequenceStore) {
        store.gather_hvac_sequences(1, 3, &AirExchange { airflow_network: false });

        assert_relative_eq!(store.zone_value(ZoneSequence::InfiltrationInstant, 1, 0, 3), -100.);
        assert_relative_eq!(store.zone_value(ZoneSequence::InfiltrationLatent, 1, 0, 3), 10.);
        assert_relative_eq!(store.zone_value(ZoneSequence::ZoneVentilationInstant, 1, 1, 3), 50.);
        assert_relative_eq!(store.zone_value(ZoneSequence::InterzoneMixingInstant, 1, 1, 3), 0.);
    }

    #[rstest]
    fn should_add_airflow_network_rates(mut store: SequenceStore) {
        store.gather_hvac_sequences(1, 3, &AirExchange { airflow_network: true });

        assert_relative_eq!(store.zone_value(ZoneSequence::InfiltrationInstant, 1, 0, 3), -85.);
        assert_relative_eq!(store.zone_value(ZoneSequence::InfiltrationLatent, 1, 0, 3), 7.);
        assert_relative_eq!(store.zone_value(ZoneSequence::InterzoneMixingInstant, 1, 0, 3), 7.);
    }

    #[rstest]
    fn should_not_record_outside_zone_sizing(building: Building) {
        let mut store = SequenceStore::for_building(true, 1, 24, &building);
        store.gather_hvac_sequences(0, 0, &AirExchange { airflow_network: false });
        assert_eq!(store.zone_value(ZoneSequence::InfiltrationInstant, 0, 0, 0), 0.);

        let mut unrequested = SequenceStore::for_building(false, 1, 24, &building);
        unrequested.set_sizing_pass(SizingPass::ZoneSizing);
        unrequested.gather_surface_sequences(0, 0, &building, &Windows);
        assert_eq!(
            unrequested.zone_value(ZoneSequence::FenestrationConductionInstant, 0, 1, 0),
            0.
        );
    }

    #[rstest]
    fn should_keep_pulsed_convection_apart_from_normal(building: Building, mut store: SequenceStore) {
        store.gather_surface_heat_balance_sequences(0, 2, &building, &HeatBalance);
        store.set_sizing_pass(SizingPass::PulseZoneSizing);
        store.gather_surface_heat_balance_sequences(0, 2, &building, &HeatBalance);
        store.record_radiant_pulse(0, 0, 2, &[(0, 50.)]);

        assert_eq!(store.surface_value(SurfaceSequence::LoadConvected, 0, 1, 2), -101.);
        assert_eq!(store.surface_value(SurfaceSequence::TransmittedSolarRadiation, 0, 2, 2), 12.);
        assert_eq!(store.radiant_distribution(0, 0, 2), 0.02);

        let pulse = store.pulse().unwrap();
        assert_eq!(pulse.load_convected_with_pulse(0, 1)[2], -101.);
        assert_eq!(pulse.pulse_timestep(0, 0), Some(2));
        assert_eq!(pulse.pulse_timestep(0, 1), None);
        assert_eq!(pulse.pulse_received(0, 0), 50.);
    }

    #[rstest]
    fn should_split_internal_gains_by_heat_path(mut store: SequenceStore) {
        store.gather_internal_gain_sequences(1, 7, &Gains);

        assert_relative_eq!(store.zone_value(ZoneSequence::PeopleInstant, 1, 0, 7), 100.);
        assert_relative_eq!(store.zone_value(ZoneSequence::PeopleLatent, 1, 0, 7), 100.2);
        assert_relative_eq!(store.zone_value(ZoneSequence::PeopleRadiant, 1, 0, 7), 100.3);
        assert_relative_eq!(store.zone_value(ZoneSequence::LightsInstant, 1, 1, 7), 201.);
        assert_relative_eq!(store.zone_value(ZoneSequence::LightsReturnAir, 1, 1, 7), 201.1);
        assert_relative_eq!(store.zone_value(ZoneSequence::LightsRadiant, 1, 1, 7), 201.3);
        assert_relative_eq!(store.zone_value(ZoneSequence::RefrigerationReturnAir, 1, 0, 7), 103.1);
        assert_relative_eq!(store.zone_value(ZoneSequence::RefrigerationLatent, 1, 0, 7), 103.2);
        assert_relative_eq!(store.zone_value(ZoneSequence::WaterUseLatent, 1, 1, 7), 204.2);
        assert_relative_eq!(store.zone_value(ZoneSequence::HvacLossRadiant, 1, 0, 7), 105.3);
        assert_relative_eq!(store.zone_value(ZoneSequence::PowerGenerationInstant, 1, 1, 7), 206.);

        assert_eq!(store.zone_value(ZoneSequence::PeopleInstant, 1, 0, 6), 0.);
        assert_eq!(store.zone_value(ZoneSequence::PeopleInstant, 0, 0, 7), 0.);
    }

    #[rstest]
    fn should_not_record_internal_gains_outside_zone_sizing(building: Building) {
        let mut store = SequenceStore::for_building(true, 1, 24, &building);
        store.set_sizing_pass(SizingPass::PulseZoneSizing);
        store.gather_internal_gain_sequences(0, 0, &Gains);
        assert_eq!(store.zone_value(ZoneSequence::PeopleInstant, 0, 0, 0), 0.);

        let mut unrequested = SequenceStore::for_building(false, 1, 24, &building);
        unrequested.set_sizing_pass(SizingPass::ZoneSizing);
        unrequested.gather_internal_gain_sequences(0, 0, &Gains);
        assert_eq!(unrequested.zone_value(ZoneSequence::LightsRadiant, 0, 1, 0), 0.);
    }

    #[rstest]
    fn should_record_doas_delivered_to_zone(mut store: SequenceStore) {
        store.record_doas_direct_to_zone(0, 4, 1, 250., -30.);

        assert_eq!(store.zone_value(ZoneSequence::DoasInstant, 0, 1, 4), 250.);
        assert_eq!(store.zone_value(ZoneSequence::DoasLatent, 0, 1, 4), -30.);
        assert_eq!(store.zone_value(ZoneSequence::DoasInstant, 0, 0, 4), 0.);
    }

    #[rstest]
    fn should_not_record_doas_outside_zone_sizing(building: Building) {
        let mut store = SequenceStore::for_building(true, 1, 24, &building);
        store.record_doas_direct_to_zone(0, 4, 1, 250., -30.);
        assert_eq!(store.zone_value(ZoneSequence::DoasInstant, 0, 1, 4), 0.);

        let mut unrequested = SequenceStore::for_building(false, 1, 24, &building);
        unrequested.set_sizing_pass(SizingPass::ZoneSizing);
        unrequested.record_doas_direct_to_zone(0, 4, 1, 250., -30.);
        assert_eq!(unrequested.zone_value(ZoneSequence::DoasLatent, 0, 1, 4), 0.);
    }

    #[rstest]
    fn should_release_pulse_sequences(mut store: SequenceStore) {
        assert!(store.take_pulse().is_some());
        assert!(store.pulse().is_none());
        assert!(store.take_pulse().is_none());
    }
}
