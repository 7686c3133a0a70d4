use serde::Serialize;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount as EnumCountMacro, EnumIter, IntoStaticStr};

/// Rows of a load component table, in report order.
#[derive(
    Clone, Copy, Debug, EnumCountMacro, EnumIter, Eq, Hash, IntoStaticStr, PartialEq, Serialize,
)]
pub enum LoadComponentRow {
    #[strum(serialize = "People")]
    People,
    #[strum(serialize = "Lights")]
    Lights,
    #[strum(serialize = "Equipment")]
    Equipment,
    #[strum(serialize = "Refrigeration Equipment")]
    Refrigeration,
    #[strum(serialize = "Water Use Equipment")]
    WaterUse,
    #[strum(serialize = "HVAC Equipment Losses")]
    HvacLoss,
    #[strum(serialize = "Power Generation Equipment")]
    PowerGeneration,
    #[strum(serialize = "DOAS Direct to Zone")]
    Doas,
    #[strum(serialize = "Infiltration")]
    Infiltration,
    #[strum(serialize = "Zone Ventilation")]
    ZoneVentilation,
    #[strum(serialize = "Interzone Mixing")]
    InterzoneMixing,
    #[strum(serialize = "Roof")]
    Roof,
    #[strum(serialize = "Interzone Ceiling")]
    InterzoneCeiling,
    #[strum(serialize = "Other Roof")]
    OtherRoof,
    #[strum(serialize = "Exterior Wall")]
    ExteriorWall,
    #[strum(serialize = "Interzone Wall")]
    InterzoneWall,
    #[strum(serialize = "Ground Contact Wall")]
    GroundContactWall,
    #[strum(serialize = "Other Wall")]
    OtherWall,
    #[strum(serialize = "Exterior Floor")]
    ExteriorFloor,
    #[strum(serialize = "Interzone Floor")]
    InterzoneFloor,
    #[strum(serialize = "Ground Contact Floor")]
    GroundContactFloor,
    #[strum(serialize = "Other Floor")]
    OtherFloor,
    #[strum(serialize = "Fenestration Conduction")]
    FenestrationConduction,
    #[strum(serialize = "Fenestration Solar")]
    FenestrationSolar,
    #[strum(serialize = "Opaque Door")]
    OpaqueDoor,
    #[strum(serialize = "Grand Total")]
    GrandTotal,
}

impl LoadComponentRow {
    /// Every row except the grand total
    pub fn components() -> impl Iterator<Item = LoadComponentRow> {
        Self::iter().filter(|row| *row != LoadComponentRow::GrandTotal)
    }

    pub fn label(&self) -> &'static str {
        (*self).into()
    }
}

/// Energy flow categories of a load component table.
#[derive(
    Clone, Copy, Debug, EnumCountMacro, EnumIter, Eq, Hash, IntoStaticStr, PartialEq, Serialize,
)]
pub enum LoadComponentColumn {
    #[strum(serialize = "Sensible - Instant")]
    SensibleInstant,
    #[strum(serialize = "Sensible - Delayed")]
    SensibleDelayed,
    #[strum(serialize = "Sensible - Return Air")]
    SensibleReturnAir,
    #[strum(serialize = "Latent")]
    Latent,
    #[strum(serialize = "Total")]
    Total,
    #[strum(serialize = "%Grand Total")]
    PercentGrandTotal,
    #[strum(serialize = "Related Area")]
    RelatedArea,
    #[strum(serialize = "Total per Area")]
    TotalPerArea,
}

impl LoadComponentColumn {
    /// Columns that add up to the total column
    pub const SUMMED: [LoadComponentColumn; 4] = [
        LoadComponentColumn::SensibleInstant,
        LoadComponentColumn::SensibleDelayed,
        LoadComponentColumn::SensibleReturnAir,
        LoadComponentColumn::Latent,
    ];

    pub fn label(&self) -> &'static str {
        (*self).into()
    }
}

/// Whether a table describes the cooling or the heating peak.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum DesignLoad {
    Cooling,
    Heating,
}

impl DesignLoad {
    pub fn is_cooling(&self) -> bool {
        matches!(self, DesignLoad::Cooling)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DesignLoad::Cooling => "Cooling",
            DesignLoad::Heating => "Heating",
        }
    }
}

/// Environmental and load conditions at the time of the peak.
/// Temperatures in deg C, humidity ratios in kg/kg, flows in m3/s, loads in W.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PeakConditions {
    pub peak_date_time: String,
    pub outside_dry_bulb: f64,
    pub outside_wet_bulb: Option<f64>,
    pub outside_hum_ratio: f64,
    pub zone_dry_bulb: f64,
    /// fraction, 0-1
    pub zone_rel_hum: f64,
    pub zone_hum_ratio: f64,
    pub supply_air_temp: f64,
    pub mixed_air_temp: Option<f64>,
    pub main_fan_air_flow: f64,
    pub outside_air_flow: f64,
    /// calculated peak sensible load, before the sizing factor
    pub peak_des_sens_load: f64,
    /// design sensible load, after the sizing factor
    pub design_peak_load: f64,
    pub diff_design_peak: f64,
    pub est_inst_del_sens_load: f64,
    pub diff_peak_est: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EngineeringChecks {
    pub outside_air_ratio: f64,
    /// in m3/s-m2
    pub airflow_per_floor_area: f64,
    /// in m3/s-W
    pub airflow_per_total_cap: f64,
    /// in m2/W
    pub area_per_total_cap: f64,
    /// in W/m2
    pub total_cap_per_area: f64,
    pub number_of_people: f64,
    pub floor_area: f64,
}

const ROWS: usize = LoadComponentRow::COUNT;
const COLUMNS: usize = LoadComponentColumn::COUNT;

/// Peak load component breakdown for one zone, air loop or the facility, for one of the
/// cooling or heating peaks.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComponentLoadTable {
    cells: [[f64; COLUMNS]; ROWS],
    cell_used: [[bool; COLUMNS]; ROWS],
    pub design_day: Option<usize>,
    pub peak_timestep: Option<usize>,
    pub peak: PeakConditions,
    pub checks: EngineeringChecks,
    /// zones included in an air loop table
    pub zone_indices: Vec<usize>,
}

impl Default for ComponentLoadTable {
    fn default() -> Self {
        Self {
            cells: [[0.; COLUMNS]; ROWS],
            cell_used: [[false; COLUMNS]; ROWS],
            design_day: None,
            peak_timestep: None,
            peak: Default::default(),
            checks: Default::default(),
            zone_indices: vec![],
        }
    }
}

impl ComponentLoadTable {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn cell(&self, column: LoadComponentColumn, row: LoadComponentRow) -> f64 {
        self.cells[row as usize][column as usize]
    }

    pub fn is_used(&self, column: LoadComponentColumn, row: LoadComponentRow) -> bool {
        self.cell_used[row as usize][column as usize]
    }

    /// Value of a cell if it applies to this row/column combination
    pub fn used_cell(&self, column: LoadComponentColumn, row: LoadComponentRow) -> Option<f64> {
        self.is_used(column, row).then(|| self.cell(column, row))
    }

    /// Set a cell value and mark it as used
    pub fn set(&mut self, column: LoadComponentColumn, row: LoadComponentRow, value: f64) {
        self.cells[row as usize][column as usize] = value;
        self.cell_used[row as usize][column as usize] = true;
    }

    pub(crate) fn add(&mut self, column: LoadComponentColumn, row: LoadComponentRow, value: f64) {
        self.cells[row as usize][column as usize] += value;
        self.cell_used[row as usize][column as usize] = true;
    }

    pub(crate) fn scale_if_used(
        &mut self,
        column: LoadComponentColumn,
        row: LoadComponentRow,
        factor: f64,
    ) {
        if self.is_used(column, row) {
            self.cells[row as usize][column as usize] *= factor;
        }
    }

    pub fn any_used(&self) -> bool {
        self.cell_used.iter().flatten().any(|used| *used)
    }

    pub fn has_peak(&self) -> bool {
        self.design_day.is_some() && self.peak_timestep.is_some()
    }

    /// Whether this table was built at the given peak selection
    pub fn matches_peak(&self, design_day: Option<usize>, peak_timestep: Option<usize>) -> bool {
        self.design_day == design_day && self.peak_timestep == peak_timestep
    }

    /// Accumulate a partial (zone) table into this one, weighted by `multiplier`.
    ///
    /// Cells and used flags are combined element-wise. Peak conditions describing a moment in
    /// time are taken from the partial table as is; loads, flows, floor area and occupancy are
    /// summed.
    pub fn combine(&mut self, partial: &ComponentLoadTable, multiplier: f64) {
        for row in 0..ROWS {
            for column in 0..COLUMNS {
                self.cells[row][column] += partial.cells[row][column] * multiplier;
                self.cell_used[row][column] |= partial.cell_used[row][column];
            }
        }

        self.design_day = partial.design_day;
        self.peak_timestep = partial.peak_timestep;
        self.peak.peak_date_time = partial.peak.peak_date_time.clone();
        self.peak.outside_dry_bulb = partial.peak.outside_dry_bulb;
        self.peak.outside_wet_bulb = partial.peak.outside_wet_bulb;
        self.peak.outside_hum_ratio = partial.peak.outside_hum_ratio;
        self.peak.zone_dry_bulb = partial.peak.zone_dry_bulb;
        self.peak.zone_rel_hum = partial.peak.zone_rel_hum;
        self.peak.zone_hum_ratio = partial.peak.zone_hum_ratio;
        self.peak.supply_air_temp = partial.peak.supply_air_temp;

        self.peak.design_peak_load += partial.peak.design_peak_load * multiplier;
        self.peak.diff_design_peak += partial.peak.diff_design_peak * multiplier;
        self.peak.peak_des_sens_load += partial.peak.peak_des_sens_load * multiplier;
        self.peak.est_inst_del_sens_load += partial.peak.est_inst_del_sens_load * multiplier;
        self.peak.diff_peak_est += partial.peak.diff_peak_est * multiplier;
        self.peak.main_fan_air_flow += partial.peak.main_fan_air_flow * multiplier;
        self.peak.outside_air_flow += partial.peak.outside_air_flow * multiplier;

        self.checks.number_of_people += partial.checks.number_of_people * multiplier;
        self.checks.floor_area += partial.checks.floor_area * multiplier;
    }

    /// Recompute the total column, the grand total row, the percentage of grand total and the
    /// total per area columns from the component cells.
    pub fn add_totals_and_percentages(&mut self) {
        use LoadComponentColumn as Column;
        use LoadComponentRow as Row;

        self.set(Column::Total, Row::GrandTotal, 0.);
        for column in Column::SUMMED {
            self.set(column, Row::GrandTotal, 0.);
        }

        for row in Row::components() {
            self.set(Column::Total, row, 0.);
            for column in Column::SUMMED {
                if let Some(value) = self.used_cell(column, row) {
                    self.add(Column::Total, row, value);
                    self.add(column, Row::GrandTotal, value);
                    self.add(Column::Total, Row::GrandTotal, value);
                }
            }
        }

        let grand_total = self.cell(Column::Total, Row::GrandTotal);
        if grand_total != 0. {
            for row in Row::iter() {
                let percentage = 100. * self.cell(Column::Total, row) / grand_total;
                self.set(Column::PercentGrandTotal, row, percentage);
            }
        }

        for row in Row::components() {
            if let Some(area) = self.used_cell(Column::RelatedArea, row) {
                if area != 0. {
                    let per_area = self.cell(Column::Total, row) / area;
                    self.set(Column::TotalPerArea, row, per_area);
                }
            }
        }
    }

    /// Compare the sum of instant and delayed sensible components against the peak load
    pub fn compute_peak_difference(&mut self) {
        use LoadComponentColumn as Column;
        use LoadComponentRow as Row;

        self.peak.est_inst_del_sens_load = self.cell(Column::SensibleInstant, Row::GrandTotal)
            + self.cell(Column::SensibleDelayed, Row::GrandTotal);
        self.peak.diff_peak_est = self.peak.peak_des_sens_load - self.peak.est_inst_del_sens_load;
        self.peak.diff_design_peak = self.peak.design_peak_load - self.peak.peak_des_sens_load;
    }

    /// Recompute the engineering check ratios from the (aggregated) peak values.
    /// A ratio whose denominator is zero is left as it is.
    pub fn compute_engineering_checks(&mut self) {
        let main_fan_air_flow = self.peak.main_fan_air_flow;
        let design_peak_load = self.peak.design_peak_load;
        let floor_area = self.checks.floor_area;

        if main_fan_air_flow != 0. {
            self.checks.outside_air_ratio = self.peak.outside_air_flow / main_fan_air_flow;
        }
        if floor_area != 0. {
            self.checks.airflow_per_floor_area = main_fan_air_flow / floor_area;
            if design_peak_load != 0. {
                self.checks.total_cap_per_area = design_peak_load / floor_area;
            }
        }
        if design_peak_load != 0. {
            self.checks.airflow_per_total_cap = main_fan_air_flow / design_peak_load;
            self.checks.area_per_total_cap = floor_area / design_peak_load;
        }
    }
}
