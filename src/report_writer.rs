use crate::core::building::Building;
use crate::core::load_components::report::{LoadComponentSummary, PeakLoadTables};
use crate::core::load_components::table::{
    ComponentLoadTable, DesignLoad, LoadComponentColumn, LoadComponentRow,
};
use crate::core::units::{ReportUnits, UnitsStyle};
use csv::WriterBuilder;
use std::io::Write;
use strum::IntoEnumIterator;

/// Somewhere titled grids of text can be written.
pub trait TableWriter {
    fn write_table(
        &mut self,
        title: &str,
        column_headers: &[String],
        row_headers: &[String],
        cells: &[Vec<String>],
    ) -> anyhow::Result<()>;
}

/// Writes each table as a title record, a header record and one record per row.
pub struct CsvTableWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvTableWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: WriterBuilder::new().flexible(true).from_writer(writer),
        }
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        Ok(self.writer.flush()?)
    }
}

impl<W: Write> TableWriter for CsvTableWriter<W> {
    fn write_table(
        &mut self,
        title: &str,
        column_headers: &[String],
        row_headers: &[String],
        cells: &[Vec<String>],
    ) -> anyhow::Result<()> {
        self.writer.write_record([title])?;

        let mut headings = vec![""];
        headings.extend(column_headers.iter().map(String::as_str));
        self.writer.write_record(&headings)?;

        for (row_header, row) in row_headers.iter().zip(cells) {
            let mut record = vec![row_header.as_str()];
            record.extend(row.iter().map(String::as_str));
            self.writer.write_record(&record)?;
        }
        Ok(())
    }
}

/// The three levels the load component summary is reported at
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportScope {
    Zone,
    AirLoop,
    Facility,
}

impl ReportScope {
    pub fn report_name(&self) -> &'static str {
        match self {
            ReportScope::Zone => "Zone Component Load Summary",
            ReportScope::AirLoop => "AirLoop Component Load Summary",
            ReportScope::Facility => "Facility Component Load Summary",
        }
    }

    /// Output location key for one object's report
    pub fn location_key(&self, name: &str) -> String {
        let prefix = match self {
            ReportScope::Zone => "zone_component_load_summary",
            ReportScope::AirLoop => "air_loop_component_load_summary",
            ReportScope::Facility => "facility_component_load_summary",
        };
        let name: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{prefix}__{name}")
    }
}

/// A table ready for a [`TableWriter`]
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedTable {
    pub title: String,
    pub column_headers: Vec<String>,
    pub row_headers: Vec<String>,
    pub cells: Vec<Vec<String>>,
}

impl RenderedTable {
    fn single_column(title: String, column_header: &str, rows: Vec<(String, String)>) -> Self {
        let (row_headers, values): (Vec<String>, Vec<String>) = rows.into_iter().unzip();
        Self {
            title,
            column_headers: vec![column_header.to_string()],
            row_headers,
            cells: values.into_iter().map(|value| vec![value]).collect(),
        }
    }

    pub fn write_to(&self, writer: &mut impl TableWriter) -> anyhow::Result<()> {
        writer.write_table(
            &self.title,
            &self.column_headers,
            &self.row_headers,
            &self.cells,
        )
    }
}

fn with_unit(label: &str, unit: &str) -> String {
    format!("{label} [{unit}]")
}

fn fixed(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

fn column_unit(column: LoadComponentColumn, units: &ReportUnits) -> &'static str {
    match column {
        LoadComponentColumn::PercentGrandTotal => "%",
        LoadComponentColumn::RelatedArea => units.area,
        LoadComponentColumn::TotalPerArea => units.power_per_area,
        _ => units.power,
    }
}

/// Estimated peak load components, with unused cells left blank
pub fn render_component_table(
    table: &ComponentLoadTable,
    load: DesignLoad,
    units_style: UnitsStyle,
) -> RenderedTable {
    let units = units_style.units();
    RenderedTable {
        title: format!("Estimated {} Peak Load Components", load.label()),
        column_headers: LoadComponentColumn::iter()
            .map(|column| with_unit(column.label(), column_unit(column, &units)))
            .collect(),
        row_headers: LoadComponentRow::iter()
            .map(|row| row.label().to_string())
            .collect(),
        cells: LoadComponentRow::iter()
            .map(|row| {
                LoadComponentColumn::iter()
                    .map(|column| {
                        table
                            .used_cell(column, row)
                            .map(|value| fixed(value, 2))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect(),
    }
}

/// Conditions at the time of the peak. The mixed air temperature is only reported for
/// air loops.
pub fn render_peak_conditions(
    table: &ComponentLoadTable,
    load: DesignLoad,
    units_style: UnitsStyle,
    scope: ReportScope,
) -> RenderedTable {
    let units = units_style.units();
    let peak = &table.peak;
    let optional = |value: Option<f64>| value.map(|value| fixed(value, 2)).unwrap_or_default();

    let mut rows = vec![
        ("Time of Peak Load".to_string(), peak.peak_date_time.clone()),
        (
            with_unit("Outside Dry Bulb Temperature", units.temperature),
            fixed(peak.outside_dry_bulb, 2),
        ),
        (
            with_unit("Outside Wet Bulb Temperature", units.temperature),
            optional(peak.outside_wet_bulb),
        ),
        (
            with_unit("Outside Humidity Ratio at Peak", "kgWater/kgDryAir"),
            fixed(peak.outside_hum_ratio, 5),
        ),
        (
            with_unit("Zone Dry Bulb Temperature", units.temperature),
            fixed(peak.zone_dry_bulb, 2),
        ),
        (
            with_unit("Zone Relative Humidity", "%"),
            fixed(peak.zone_rel_hum * 100., 2),
        ),
        (
            with_unit("Zone Humidity Ratio at Peak", "kgWater/kgDryAir"),
            fixed(peak.zone_hum_ratio, 5),
        ),
        (
            with_unit("Supply Air Temperature", units.temperature),
            fixed(peak.supply_air_temp, 2),
        ),
    ];
    if scope == ReportScope::AirLoop {
        rows.push((
            with_unit("Mixed Air Temperature", units.temperature),
            optional(peak.mixed_air_temp),
        ));
    }
    rows.extend([
        (
            with_unit("Main Fan Air Flow", units.air_flow),
            fixed(peak.main_fan_air_flow, 4),
        ),
        (
            with_unit("Outside Air Flow", units.air_flow),
            fixed(peak.outside_air_flow, 4),
        ),
        (
            with_unit("Peak Sensible Load with Sizing Factor", units.power),
            fixed(peak.design_peak_load, 2),
        ),
        (
            with_unit("Difference Due to Sizing Factor", units.power),
            fixed(peak.diff_design_peak, 2),
        ),
        (
            with_unit("Peak Sensible Load", units.power),
            fixed(peak.peak_des_sens_load, 2),
        ),
        (
            with_unit("Estimated Instant + Delayed Sensible Load", units.power),
            fixed(peak.est_inst_del_sens_load, 2),
        ),
        (
            with_unit("Difference Between Peak and Estimated Sensible Load", units.power),
            fixed(peak.diff_peak_est, 2),
        ),
    ]);

    RenderedTable::single_column(format!("{} Peak Conditions", load.label()), "Value", rows)
}

pub fn render_engineering_checks(
    table: &ComponentLoadTable,
    load: DesignLoad,
    units_style: UnitsStyle,
) -> RenderedTable {
    let units = units_style.units();
    let checks = &table.checks;
    let rows = vec![
        (
            with_unit("Outside Air", "%"),
            fixed(checks.outside_air_ratio * 100., 2),
        ),
        (
            with_unit("Airflow per Floor Area", units.air_flow_per_area),
            fixed(checks.airflow_per_floor_area, 4),
        ),
        (
            with_unit("Airflow per Total Capacity", units.air_flow_per_power),
            fixed(checks.airflow_per_total_cap, 6),
        ),
        (
            with_unit("Floor Area per Total Capacity", units.area_per_power),
            fixed(checks.area_per_total_cap, 4),
        ),
        (
            with_unit("Total Capacity per Floor Area", units.power_per_area),
            fixed(checks.total_cap_per_area, 2),
        ),
        ("Number of People".to_string(), fixed(checks.number_of_people, 2)),
    ];

    RenderedTable::single_column(
        format!("Engineering Checks for {}", load.label()),
        "Value",
        rows,
    )
}

pub fn render_zones_included(table: &ComponentLoadTable, building: &Building) -> RenderedTable {
    let rows = table
        .zone_indices
        .iter()
        .enumerate()
        .map(|(i, zone)| ((i + 1).to_string(), building.zone(*zone).name.clone()))
        .collect();
    RenderedTable::single_column("Zones Included".to_string(), "Zone Name", rows)
}

/// Every table of one object's report, cooling first
pub fn render_object_report(
    tables: &PeakLoadTables,
    scope: ReportScope,
    units_style: UnitsStyle,
    building: &Building,
) -> Vec<RenderedTable> {
    let mut rendered = vec![];
    for load in [DesignLoad::Cooling, DesignLoad::Heating] {
        let table = tables.table(load);
        rendered.push(render_component_table(table, load, units_style));
        rendered.push(render_peak_conditions(table, load, units_style, scope));
        rendered.push(render_engineering_checks(table, load, units_style));
    }
    if scope == ReportScope::AirLoop {
        rendered.push(render_zones_included(&tables.cooling, building));
    }
    rendered
}

/// Each object's tables in scope order, with the scope they belong to
pub fn objects_by_scope(
    summary: &LoadComponentSummary,
) -> impl Iterator<Item = (ReportScope, &PeakLoadTables)> {
    summary
        .zones
        .iter()
        .map(|tables| (ReportScope::Zone, tables))
        .chain(
            summary
                .air_loops
                .iter()
                .map(|tables| (ReportScope::AirLoop, tables)),
        )
        .chain(
            summary
                .facility
                .iter()
                .map(|tables| (ReportScope::Facility, tables)),
        )
}
