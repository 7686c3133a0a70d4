use crate::core::load_components::table::DesignLoad;
use serde::Deserialize;

/// Day and timestep at which a zone, air loop or the facility reached its design peak.
/// Either part is None when that object never drove a design capacity.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct PeakSelection {
    pub design_day: Option<usize>,
    pub peak_timestep: Option<usize>,
}

impl PeakSelection {
    pub fn new(design_day: usize, peak_timestep: usize) -> Self {
        Self {
            design_day: Some(design_day),
            peak_timestep: Some(peak_timestep),
        }
    }
}

/// How the zone supply air temperature was specified for sizing
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub enum SupplyAirDesign {
    /// Fixed supply air temperature, in deg C
    Temperature(f64),
    /// Supply air temperature offset from the zone temperature, in K
    TemperatureDifference(f64),
}

impl Default for SupplyAirDesign {
    fn default() -> Self {
        SupplyAirDesign::TemperatureDifference(0.)
    }
}

impl SupplyAirDesign {
    /// Supply air temperature given the zone air temperature at the time of the peak.
    /// Cooling supply air is below the zone temperature, heating supply air above it.
    pub fn supply_air_temperature(&self, zone_temp_at_peak: f64, load: DesignLoad) -> f64 {
        match (self, load) {
            (SupplyAirDesign::Temperature(temp), _) => *temp,
            (SupplyAirDesign::TemperatureDifference(diff), DesignLoad::Cooling) => {
                zone_temp_at_peak - diff.abs()
            }
            (SupplyAirDesign::TemperatureDifference(diff), DesignLoad::Heating) => {
                zone_temp_at_peak + diff.abs()
            }
        }
    }
}

/// Design values from zone sizing for one of the cooling or heating peaks. Loads are positive
/// magnitudes for both cooling and heating.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ZoneDesignSizing {
    /// calculated peak sensible load, before the sizing factor, in W
    pub calculated_load: f64,
    /// design sensible load, after the sizing factor, in W
    pub design_load: f64,
    /// design air flow, in m3/s
    pub design_air_flow: f64,
    /// minimum outdoor air flow, in m3/s
    #[serde(default)]
    pub minimum_outdoor_air_flow: f64,
    #[serde(default)]
    pub supply_air: SupplyAirDesign,
}

/// Outside and zone air conditions over one sizing day, one value per zone timestep
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZoneConditionSequences {
    /// in deg C
    pub outside_dry_bulb: Vec<f64>,
    /// in kg water / kg dry air
    pub outside_hum_ratio: Vec<f64>,
    /// in deg C
    pub zone_dry_bulb: Vec<f64>,
    /// in kg water / kg dry air
    pub zone_hum_ratio: Vec<f64>,
}

/// Values from air loop sizing that replace the sums over the loop's zones
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AirLoopDesignSizing {
    /// in deg C
    pub supply_air_temp: Option<f64>,
    /// in deg C
    pub mixed_air_temp: Option<f64>,
    /// in m3/s
    pub main_fan_air_flow: Option<f64>,
    /// in m3/s
    pub outside_air_flow: Option<f64>,
}

/// What the load component report needs from the sizing calculation.
pub trait SizingResults {
    fn zone_peak(&self, zone: usize, load: DesignLoad) -> PeakSelection;

    fn air_loop_peak(&self, air_loop: usize, load: DesignLoad) -> PeakSelection;

    fn facility_peak(&self, load: DesignLoad) -> PeakSelection;

    /// Number of timesteps averaged when the sizing calculation picked its peaks
    fn moving_average_window(&self) -> usize;

    fn zone_design(&self, zone: usize, load: DesignLoad) -> Option<&ZoneDesignSizing>;

    fn zone_conditions(&self, day: usize, zone: usize) -> Option<&ZoneConditionSequences>;

    fn air_loop_design(&self, air_loop: usize, load: DesignLoad) -> Option<&AirLoopDesignSizing>;
}

/// Sizing results for one zone, or air loop, keyed by design load
#[derive(Clone, Debug, Default)]
pub struct PeakDesign<T> {
    pub cooling_peak: PeakSelection,
    pub heating_peak: PeakSelection,
    pub cooling: Option<T>,
    pub heating: Option<T>,
}

impl<T> PeakDesign<T> {
    fn peak(&self, load: DesignLoad) -> PeakSelection {
        match load {
            DesignLoad::Cooling => self.cooling_peak,
            DesignLoad::Heating => self.heating_peak,
        }
    }

    fn design(&self, load: DesignLoad) -> Option<&T> {
        match load {
            DesignLoad::Cooling => self.cooling.as_ref(),
            DesignLoad::Heating => self.heating.as_ref(),
        }
    }
}

/// Sizing results held in memory, with every reference resolved to an index.
#[derive(Clone, Debug, Default)]
pub struct RecordedSizingResults {
    moving_average_window: usize,
    zones: Vec<PeakDesign<ZoneDesignSizing>>,
    air_loops: Vec<PeakDesign<AirLoopDesignSizing>>,
    facility: PeakDesign<()>,
    /// indexed by day, then zone
    zone_conditions: Vec<Vec<Option<ZoneConditionSequences>>>,
}

impl RecordedSizingResults {
    pub fn new(
        moving_average_window: usize,
        number_of_days: usize,
        number_of_zones: usize,
        number_of_air_loops: usize,
    ) -> Self {
        Self {
            moving_average_window,
            zones: (0..number_of_zones).map(|_| Default::default()).collect(),
            air_loops: (0..number_of_air_loops)
                .map(|_| Default::default())
                .collect(),
            facility: Default::default(),
            zone_conditions: vec![vec![None; number_of_zones]; number_of_days],
        }
    }

    pub fn set_zone_sizing(
        &mut self,
        zone: usize,
        load: DesignLoad,
        peak: PeakSelection,
        design: Option<ZoneDesignSizing>,
    ) {
        let zone = &mut self.zones[zone];
        match load {
            DesignLoad::Cooling => {
                zone.cooling_peak = peak;
                zone.cooling = design;
            }
            DesignLoad::Heating => {
                zone.heating_peak = peak;
                zone.heating = design;
            }
        }
    }

    pub fn set_air_loop_sizing(
        &mut self,
        air_loop: usize,
        load: DesignLoad,
        peak: PeakSelection,
        design: Option<AirLoopDesignSizing>,
    ) {
        let air_loop = &mut self.air_loops[air_loop];
        match load {
            DesignLoad::Cooling => {
                air_loop.cooling_peak = peak;
                air_loop.cooling = design;
            }
            DesignLoad::Heating => {
                air_loop.heating_peak = peak;
                air_loop.heating = design;
            }
        }
    }

    pub fn set_facility_peak(&mut self, load: DesignLoad, peak: PeakSelection) {
        match load {
            DesignLoad::Cooling => self.facility.cooling_peak = peak,
            DesignLoad::Heating => self.facility.heating_peak = peak,
        }
    }

    pub fn set_zone_conditions(
        &mut self,
        day: usize,
        zone: usize,
        conditions: ZoneConditionSequences,
    ) {
        self.zone_conditions[day][zone] = Some(conditions);
    }
}

impl SizingResults for RecordedSizingResults {
    fn zone_peak(&self, zone: usize, load: DesignLoad) -> PeakSelection {
        self.zones
            .get(zone)
            .map(|zone| zone.peak(load))
            .unwrap_or_default()
    }

    fn air_loop_peak(&self, air_loop: usize, load: DesignLoad) -> PeakSelection {
        self.air_loops
            .get(air_loop)
            .map(|air_loop| air_loop.peak(load))
            .unwrap_or_default()
    }

    fn facility_peak(&self, load: DesignLoad) -> PeakSelection {
        self.facility.peak(load)
    }

    fn moving_average_window(&self) -> usize {
        self.moving_average_window
    }

    fn zone_design(&self, zone: usize, load: DesignLoad) -> Option<&ZoneDesignSizing> {
        self.zones.get(zone).and_then(|zone| zone.design(load))
    }

    fn zone_conditions(&self, day: usize, zone: usize) -> Option<&ZoneConditionSequences> {
        self.zone_conditions
            .get(day)
            .and_then(|zones| zones.get(zone))
            .and_then(|conditions| conditions.as_ref())
    }

    fn air_loop_design(&self, air_loop: usize, load: DesignLoad) -> Option<&AirLoopDesignSizing> {
        self.air_loops
            .get(air_loop)
            .and_then(|air_loop| air_loop.design(load))
    }
}
