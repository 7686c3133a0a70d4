use crate::core::building::{OutsideBoundary, SurfaceClass};
use crate::core::load_components::report::LoadComponentSummaryOptions;
use crate::core::load_components::sequence_store::{SurfaceSequence, ZoneSequence};
use crate::core::load_components::sizing::{
    AirLoopDesignSizing, PeakSelection, ZoneDesignSizing,
};
use crate::core::units::UnitsStyle;
use crate::sizing_time::SizingTime;
use indexmap::IndexMap;
use serde::Deserialize;
use std::io::{BufReader, Read};

pub fn ingest_for_processing(json: impl Read) -> Result<InputForProcessing, anyhow::Error> {
    InputForProcessing::init_with_json(json)
}

/// A whole sizing run as recorded for the load component summary, with every cross reference
/// given by name.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Input {
    /// Absent when the load component summary was not requested
    pub load_component_summary: Option<LoadComponentSummaryOptions>,
    pub sizing_time: SizingTime,
    pub zone: ZoneDictionary,
    #[serde(default)]
    pub surface: SurfaceDictionary,
    #[serde(default)]
    pub people: PeopleDictionary,
    #[serde(default)]
    pub air_loop: AirLoopDictionary,
    pub sizing: SizingInput,
    #[serde(default)]
    pub sequences: SequencesInput,
}

pub type ZoneDictionary = IndexMap<String, ZoneInput>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneInput {
    /// in m2
    pub floor_area: f64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default = "default_multiplier")]
    pub list_multiplier: f64,
    #[serde(default = "default_true")]
    pub is_controlled: bool,
    /// Name of the radiant enclosure holding the zone; each zone is its own enclosure when
    /// not given
    pub radiant_enclosure: Option<String>,
}

fn default_multiplier() -> f64 {
    1.
}

fn default_true() -> bool {
    true
}

pub type SurfaceDictionary = IndexMap<String, SurfaceInput>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurfaceInput {
    pub zone: String,
    pub class: SurfaceClass,
    pub outside_boundary: OutsideBoundary,
    /// gross area including subsurfaces, in m2
    pub gross_area: f64,
    /// net area, in m2; the gross area when not given
    pub area: Option<f64>,
    #[serde(default = "default_true")]
    pub heat_transfer: bool,
}

pub type PeopleDictionary = IndexMap<String, PeopleInput>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeopleInput {
    pub zone: String,
    pub number_of_people: f64,
}

pub type AirLoopDictionary = IndexMap<String, AirLoopInput>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AirLoopInput {
    #[serde(default)]
    pub zones_cooled: Vec<String>,
    #[serde(default)]
    pub zones_heated: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizingInput {
    #[serde(default = "default_moving_average_window")]
    pub moving_average_window: usize,
    #[serde(default)]
    pub zones: IndexMap<String, PeakDesignInput<ZoneDesignSizing>>,
    #[serde(default)]
    pub air_loops: IndexMap<String, PeakDesignInput<AirLoopDesignSizing>>,
    #[serde(default)]
    pub facility: PeakDesignInput<()>,
    #[serde(default)]
    pub zone_conditions: Vec<ZoneConditionsInput>,
}

fn default_moving_average_window() -> usize {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeakDesignInput<T> {
    #[serde(default)]
    pub cooling: Option<PeakInput<T>>,
    #[serde(default)]
    pub heating: Option<PeakInput<T>>,
}

impl<T> Default for PeakDesignInput<T> {
    fn default() -> Self {
        Self {
            cooling: None,
            heating: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeakInput<T> {
    pub design_day: Option<usize>,
    pub peak_timestep: Option<usize>,
    pub design: Option<T>,
}

impl<T> PeakInput<T> {
    pub fn peak(&self) -> PeakSelection {
        PeakSelection {
            design_day: self.design_day,
            peak_timestep: self.peak_timestep,
        }
    }
}

/// Outside and zone air conditions for one zone on one sizing day
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneConditionsInput {
    pub day: usize,
    pub zone: String,
    pub outside_dry_bulb: Vec<f64>,
    pub outside_hum_ratio: Vec<f64>,
    pub zone_dry_bulb: Vec<f64>,
    pub zone_hum_ratio: Vec<f64>,
}

/// Sequences recorded during zone sizing. Only the days and objects that recorded anything
/// need to be listed, everything else is zero.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SequencesInput {
    #[serde(default)]
    pub zones: Vec<ZoneSequenceInput>,
    #[serde(default)]
    pub surfaces: Vec<SurfaceSequenceInput>,
    #[serde(default)]
    pub radiant_distribution: Vec<EnclosureSequenceInput>,
    #[serde(default)]
    pub pulses: Vec<PulseInput>,
    #[serde(default)]
    pub load_convected_with_pulse: Vec<SurfacePulseSequenceInput>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneSequenceInput {
    pub day: usize,
    pub zone: String,
    pub sequence: ZoneSequence,
    pub values: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurfaceSequenceInput {
    pub day: usize,
    pub surface: String,
    pub sequence: SurfaceSequence,
    pub values: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnclosureSequenceInput {
    pub day: usize,
    pub enclosure: String,
    pub values: Vec<f64>,
}

/// The radiant pulse injected into a zone on a sizing day
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PulseInput {
    pub day: usize,
    pub zone: String,
    pub timestep: usize,
    /// pulse heat received, keyed by surface name
    #[serde(default)]
    pub received: IndexMap<String, f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurfacePulseSequenceInput {
    pub day: usize,
    pub surface: String,
    pub values: Vec<f64>,
}

pub struct InputForProcessing {
    input: Input,
}

/// Access to the parsed input for adjustments made on the command line before the project
/// is built.
impl InputForProcessing {
    pub fn init_with_json(json: impl Read) -> Result<Self, anyhow::Error> {
        let reader = BufReader::new(json);

        let input: Input = serde_json::from_reader(reader)?;

        Ok(Self { input })
    }

    pub fn finalize(self) -> Input {
        self.input
    }

    pub fn load_component_summary_requested(&self) -> bool {
        self.input.load_component_summary.is_some()
    }

    /// Request the summary with default options, unless already requested
    pub fn request_load_component_summary(&mut self) -> &Self {
        self.input
            .load_component_summary
            .get_or_insert_with(Default::default);
        self
    }

    pub fn set_units_style(&mut self, units_style: UnitsStyle) -> &Self {
        if let Some(options) = self.input.load_component_summary.as_mut() {
            options.units_style = units_style;
        }
        self
    }

    pub fn set_show_decay_curves(&mut self, show_decay_curves: bool) -> &Self {
        if let Some(options) = self.input.load_component_summary.as_mut() {
            options.show_decay_curves = show_decay_curves;
        }
        self
    }
}
