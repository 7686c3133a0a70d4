use crate::core::building::{Building, ZoneComponentAreas};
use crate::core::load_components::delay_sequence::DelaySequences;
use crate::core::load_components::sequence_store::{SequenceStore, ZoneSequence};
use crate::core::load_components::table::{
    ComponentLoadTable, LoadComponentColumn, LoadComponentRow,
};
use crate::core::moving_average::MovingAverage;

use LoadComponentColumn as Column;
use LoadComponentRow as Row;

/// Cells read straight from a recorded zone sequence
const INSTANT_CELLS: [(Row, Column, ZoneSequence); 22] = [
    (Row::People, Column::SensibleInstant, ZoneSequence::PeopleInstant),
    (Row::People, Column::Latent, ZoneSequence::PeopleLatent),
    (Row::Lights, Column::SensibleInstant, ZoneSequence::LightsInstant),
    (Row::Lights, Column::SensibleReturnAir, ZoneSequence::LightsReturnAir),
    (Row::Equipment, Column::SensibleInstant, ZoneSequence::EquipmentInstant),
    (Row::Equipment, Column::Latent, ZoneSequence::EquipmentLatent),
    (Row::Refrigeration, Column::SensibleInstant, ZoneSequence::RefrigerationInstant),
    (Row::Refrigeration, Column::SensibleReturnAir, ZoneSequence::RefrigerationReturnAir),
    (Row::Refrigeration, Column::Latent, ZoneSequence::RefrigerationLatent),
    (Row::WaterUse, Column::SensibleInstant, ZoneSequence::WaterUseInstant),
    (Row::WaterUse, Column::Latent, ZoneSequence::WaterUseLatent),
    (Row::HvacLoss, Column::SensibleInstant, ZoneSequence::HvacLossInstant),
    (Row::PowerGeneration, Column::SensibleInstant, ZoneSequence::PowerGenerationInstant),
    (Row::Doas, Column::SensibleInstant, ZoneSequence::DoasInstant),
    (Row::Doas, Column::Latent, ZoneSequence::DoasLatent),
    (Row::Infiltration, Column::SensibleInstant, ZoneSequence::InfiltrationInstant),
    (Row::Infiltration, Column::Latent, ZoneSequence::InfiltrationLatent),
    (Row::ZoneVentilation, Column::SensibleInstant, ZoneSequence::ZoneVentilationInstant),
    (Row::ZoneVentilation, Column::Latent, ZoneSequence::ZoneVentilationLatent),
    (Row::InterzoneMixing, Column::SensibleInstant, ZoneSequence::InterzoneMixingInstant),
    (Row::InterzoneMixing, Column::Latent, ZoneSequence::InterzoneMixingLatent),
    (
        Row::FenestrationConduction,
        Column::SensibleInstant,
        ZoneSequence::FenestrationConductionInstant,
    ),
];

const OPAQUE_ROWS: [Row; 12] = [
    Row::Roof,
    Row::InterzoneCeiling,
    Row::OtherRoof,
    Row::ExteriorWall,
    Row::InterzoneWall,
    Row::GroundContactWall,
    Row::OtherWall,
    Row::ExteriorFloor,
    Row::InterzoneFloor,
    Row::GroundContactFloor,
    Row::OtherFloor,
    Row::OpaqueDoor,
];

/// Fill the component cells of a zone's table with smoothed values at the peak timestep.
///
/// Returns an empty table, with no cell in use, when either the design day or the peak
/// timestep is missing.
///
/// Arguments:
/// * `store` - sequences recorded during sizing
/// * `building`
/// * `design_day` - sizing day of the peak
/// * `peak_timestep` - timestep of the peak within the day
/// * `zone` - index of the zone
/// * `delays` - delay sequences resolved for the zone on the design day
/// * `moving_average` - smoothing matching that used to pick the peak
pub fn build_load_table(
    store: &SequenceStore,
    building: &Building,
    design_day: Option<usize>,
    peak_timestep: Option<usize>,
    zone: usize,
    delays: &DelaySequences,
    moving_average: &MovingAverage,
) -> ComponentLoadTable {
    let mut table = ComponentLoadTable::new();
    let (Some(day), Some(timestep)) = (design_day, peak_timestep) else {
        return table;
    };
    table.design_day = Some(day);
    table.peak_timestep = Some(timestep);

    let at_peak = |series: &[f64]| moving_average.value_at(series, timestep);

    for (row, column, sequence) in INSTANT_CELLS {
        table.set(column, row, at_peak(store.zone_series(sequence, day, zone)));
    }

    let delayed = [
        (Row::People, delays.people.as_slice()),
        (Row::Lights, delays.lights.as_slice()),
        (Row::Equipment, delays.equipment.as_slice()),
        (Row::HvacLoss, delays.hvac_loss.as_slice()),
        (Row::PowerGeneration, delays.power_generation.as_slice()),
        (Row::FenestrationSolar, delays.fenestration_solar.as_slice()),
    ];
    for (row, series) in delayed {
        table.set(Column::SensibleDelayed, row, at_peak(series));
    }

    for row in OPAQUE_ROWS {
        table.set(Column::SensibleDelayed, row, 0.);
    }
    for (surface, series) in &delays.surfaces {
        if let Some(row) = building.surface(*surface).opaque_row() {
            table.add(Column::SensibleDelayed, row, at_peak(series.as_slice()));
        }
    }

    table
}

/// Fill the related area column of a zone's table
pub fn add_area_column(table: &mut ComponentLoadTable, areas: &ZoneComponentAreas) {
    for row in Row::components() {
        if let Some(area) = areas.area_for(row) {
            table.set(Column::RelatedArea, row, area);
        }
    }
}
