use approx::assert_relative_eq;
use indexmap::IndexMap;
use load_components::core::load_components::table::{
    DesignLoad, LoadComponentColumn as Column, LoadComponentRow as Row,
};
use load_components::core::units::UnitsStyle;
use load_components::output::{Output, SinkOutput};
use load_components::{run_project, LoadComponentSummary, ProjectFlags};
use pretty_assertions::assert_eq;
use rstest::*;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Keeps everything written, keyed by "<location key>.<extension>"
#[derive(Clone, Debug, Default)]
struct MemoryOutput {
    files: Rc<RefCell<IndexMap<String, Vec<u8>>>>,
}

impl MemoryOutput {
    fn file(&self, name: &str) -> Option<String> {
        self.files
            .borrow()
            .get(name)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    fn file_names(&self) -> Vec<String> {
        self.files.borrow().keys().cloned().collect()
    }
}

struct MemoryFile {
    name: String,
    files: Rc<RefCell<IndexMap<String, Vec<u8>>>>,
}

impl Write for MemoryFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.files
            .borrow_mut()
            .entry(self.name.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Output for MemoryOutput {
    fn writer_for_location_key(
        &self,
        location_key: &str,
        file_extension: &str,
    ) -> anyhow::Result<impl Write> {
        Ok(MemoryFile {
            name: format!("{location_key}.{file_extension}"),
            files: self.files.clone(),
        })
    }
}

/// One office zone with a roof and a window, served by one air loop, sized on a summer and
/// a winter design day at hourly timesteps.
///
/// A radiant pulse at 12:00 on the summer day gives the roof a cooling decay curve of
/// [0.3, 0.2, 0.1, 0, ...].
#[fixture]
fn input_json() -> Value {
    let values = |value: f64| vec![value; 24];
    let mut with_pulse = values(-500.);
    with_pulse[12] = -800.;
    with_pulse[13] = -700.;
    with_pulse[14] = -600.;

    json!({
        "LoadComponentSummary": {"show_decay_curves": true},
        "SizingTime": {
            "timesteps_per_hour": 1,
            "days": [
                {"name": "Summer Design Day", "month": 7, "day_of_month": 21},
                {"name": "Winter Design Day", "month": 1, "day_of_month": 21}
            ]
        },
        "Zone": {
            "Office": {"floor_area": 100.0}
        },
        "Surface": {
            "Office Roof": {
                "zone": "Office",
                "class": "Roof",
                "outside_boundary": {"type": "ExternalEnvironment"},
                "gross_area": 100.0
            },
            "Office Window": {
                "zone": "Office",
                "class": "Window",
                "outside_boundary": {"type": "ExternalEnvironment"},
                "gross_area": 10.0
            }
        },
        "People": {
            "Office Occupants": {"zone": "Office", "number_of_people": 10.0}
        },
        "AirLoop": {
            "VAV 1": {"zones_cooled": ["Office"], "zones_heated": ["Office"]}
        },
        "Sizing": {
            "zones": {
                "Office": {
                    "cooling": {
                        "design_day": 0,
                        "peak_timestep": 15,
                        "design": {
                            "calculated_load": 1200.0,
                            "design_load": 1500.0,
                            "design_air_flow": 0.1,
                            "minimum_outdoor_air_flow": 0.02,
                            "supply_air": {"Temperature": 13.0}
                        }
                    },
                    "heating": {"design_day": 1, "peak_timestep": 6}
                }
            },
            "air_loops": {
                "VAV 1": {
                    "cooling": {
                        "design_day": 0,
                        "peak_timestep": 15,
                        "design": {"mixed_air_temp": 26.0}
                    }
                }
            },
            "facility": {
                "cooling": {"design_day": 0, "peak_timestep": 15},
                "heating": {"design_day": 1, "peak_timestep": 6}
            },
            "zone_conditions": [
                {
                    "day": 0,
                    "zone": "Office",
                    "outside_dry_bulb": values(32.0),
                    "outside_hum_ratio": values(0.012),
                    "zone_dry_bulb": values(24.0),
                    "zone_hum_ratio": values(0.009)
                }
            ]
        },
        "Sequences": {
            "zones": [
                {"day": 0, "zone": "Office", "sequence": "PeopleInstant", "values": values(700.0)},
                {"day": 0, "zone": "Office", "sequence": "PeopleLatent", "values": values(450.0)},
                {"day": 0, "zone": "Office", "sequence": "PeopleRadiant", "values": values(300.0)}
            ],
            "surfaces": [
                {"day": 0, "surface": "Office Roof", "sequence": "AbsorbedThermalRadiationFraction", "values": values(0.01)},
                {"day": 0, "surface": "Office Roof", "sequence": "LoadConvected", "values": values(-500.0)}
            ],
            "radiant_distribution": [
                {"day": 0, "enclosure": "Office", "values": values(1.0)}
            ],
            "pulses": [
                {"day": 0, "zone": "Office", "timestep": 12, "received": {"Office Roof": 1000.0}}
            ],
            "load_convected_with_pulse": [
                {"day": 0, "surface": "Office Roof", "values": with_pulse}
            ]
        }
    })
}

fn run(input: &Value, output: impl Output, flags: ProjectFlags) -> Option<LoadComponentSummary> {
    run_project(input.to_string().as_bytes(), output, flags).unwrap()
}

#[rstest]
fn should_decompose_zone_cooling_peak(input_json: Value) {
    let summary = run(&input_json, SinkOutput, Default::default()).unwrap();

    assert_eq!(summary.zones.len(), 1);
    let table = summary.zones[0].table(DesignLoad::Cooling);
    assert_eq!(table.design_day, Some(0));
    assert_eq!(table.peak_timestep, Some(15));

    assert_relative_eq!(table.cell(Column::SensibleInstant, Row::People), 700.);
    assert_relative_eq!(
        table.cell(Column::SensibleDelayed, Row::People),
        180.,
        max_relative = 1e-9
    );
    assert_relative_eq!(table.cell(Column::Latent, Row::People), 450.);
    assert_relative_eq!(
        table.cell(Column::SensibleDelayed, Row::Roof),
        320.,
        max_relative = 1e-9
    );
    assert_relative_eq!(
        table.cell(Column::Total, Row::GrandTotal),
        1650.,
        max_relative = 1e-9
    );
    assert_relative_eq!(table.cell(Column::RelatedArea, Row::Roof), 100.);
    assert_relative_eq!(
        table.cell(Column::TotalPerArea, Row::Roof),
        3.2,
        max_relative = 1e-9
    );

    let peak = &table.peak;
    assert_eq!(peak.peak_date_time, "7/21 16:00:00");
    assert_relative_eq!(peak.supply_air_temp, 13.);
    assert_relative_eq!(peak.peak_des_sens_load, 1200.);
    assert_relative_eq!(peak.diff_design_peak, 300.);
    assert_relative_eq!(peak.est_inst_del_sens_load, 1200., max_relative = 1e-9);
    assert_relative_eq!(peak.diff_peak_est, 0., epsilon = 1e-9);

    assert_relative_eq!(table.checks.outside_air_ratio, 0.2, max_relative = 1e-9);
    assert_relative_eq!(table.checks.total_cap_per_area, 15.);
    assert_eq!(table.checks.number_of_people, 10.);
}

#[rstest]
fn should_report_heating_peak_without_pulse_as_undelayed(input_json: Value) {
    let summary = run(&input_json, SinkOutput, Default::default()).unwrap();

    let table = summary.zones[0].table(DesignLoad::Heating);
    assert_eq!(table.design_day, Some(1));
    assert_eq!(table.cell(Column::SensibleDelayed, Row::People), 0.);
    assert_eq!(table.cell(Column::Total, Row::GrandTotal), 0.);
    assert_eq!(table.peak.peak_date_time, "1/21 07:00:00");
}

#[rstest]
fn should_build_air_loop_and_facility_tables(input_json: Value) {
    let summary = run(&input_json, SinkOutput, Default::default()).unwrap();

    let zone_cooling = summary.zones[0].table(DesignLoad::Cooling);

    assert_eq!(summary.air_loops.len(), 1);
    let air_loop = &summary.air_loops[0];
    assert_eq!(air_loop.name, "VAV 1");
    let air_loop_cooling = air_loop.table(DesignLoad::Cooling);
    assert_eq!(air_loop_cooling.zone_indices, vec![0]);
    assert_eq!(air_loop.table(DesignLoad::Heating).zone_indices, vec![0]);
    assert_eq!(air_loop_cooling.peak.mixed_air_temp, Some(26.));
    assert_relative_eq!(
        air_loop_cooling.cell(Column::Total, Row::GrandTotal),
        zone_cooling.cell(Column::Total, Row::GrandTotal),
        max_relative = 1e-12
    );
    // no air loop heating peak was recorded
    assert_eq!(air_loop.table(DesignLoad::Heating).design_day, None);

    let facility = summary.facility.as_ref().unwrap();
    assert_relative_eq!(
        facility.cooling.cell(Column::SensibleDelayed, Row::People),
        180.,
        max_relative = 1e-9
    );
    assert_eq!(facility.heating.design_day, Some(1));
}

#[rstest]
fn should_write_report_files(input_json: Value) {
    let output = MemoryOutput::default();
    run(&input_json, output.clone(), Default::default());

    assert_eq!(
        output.file_names(),
        vec![
            "decay_curves.csv",
            "zone_component_load_summary__Office.csv",
            "air_loop_component_load_summary__VAV_1.csv",
            "facility_component_load_summary__Facility.csv",
        ]
    );

    let decay_curves = output.file("decay_curves.csv").unwrap();
    let mut lines = decay_curves.lines();
    assert!(lines
        .next()
        .unwrap()
        .starts_with("! <Radiant to Convective Decay Curves for Cooling>,Zone Name, Surface Name, Time 1,"));
    assert!(lines
        .next()
        .unwrap()
        .starts_with("Radiant to Convective Decay Curves for Cooling,Office,Office Roof, 0.300, 0.200, 0.100, 0.000,"));

    let zone_report = output
        .file("zone_component_load_summary__Office.csv")
        .unwrap();
    let zone_lines: Vec<&str> = zone_report.lines().collect();
    assert_eq!(zone_lines[0], "Estimated Cooling Peak Load Components");
    assert_eq!(
        zone_lines[1],
        ",Sensible - Instant [W],Sensible - Delayed [W],Sensible - Return Air [W],Latent [W],Total [W],%Grand Total [%],Related Area [m2],Total per Area [W/m2]"
    );
    assert_eq!(
        zone_lines[2],
        "People,700.00,180.00,,450.00,1330.00,80.61,100.00,13.30"
    );
    assert!(zone_lines.contains(&"Time of Peak Load,7/21 16:00:00"));
    assert!(zone_lines.contains(&"Engineering Checks for Heating"));
    assert!(!zone_lines.contains(&"Zones Included"));

    let air_loop_report = output
        .file("air_loop_component_load_summary__VAV_1.csv")
        .unwrap();
    assert!(air_loop_report.contains("Mixed Air Temperature [C],26.00"));
    assert!(air_loop_report.ends_with("Zones Included\n,Zone Name\n1,Office\n"));
}

#[rstest]
fn should_apply_units_style_override(input_json: Value) {
    let flags = ProjectFlags {
        units_style: Some(UnitsStyle::InchPound),
        ..Default::default()
    };
    let output = MemoryOutput::default();
    let summary = run(&input_json, output.clone(), flags).unwrap();

    let table = summary.zones[0].table(DesignLoad::Cooling);
    assert_relative_eq!(
        table.cell(Column::SensibleInstant, Row::People),
        700. * 3.412141633,
        max_relative = 1e-12
    );
    assert_relative_eq!(table.peak.outside_dry_bulb, 89.6, max_relative = 1e-12);

    let zone_report = output
        .file("zone_component_load_summary__Office.csv")
        .unwrap();
    assert!(zone_report.contains("Sensible - Instant [Btu/h]"));
    assert!(zone_report.contains("Outside Dry Bulb Temperature [F],89.60"));
}

#[rstest]
fn should_do_nothing_when_summary_not_requested(mut input_json: Value) {
    input_json
        .as_object_mut()
        .unwrap()
        .remove("LoadComponentSummary");
    let output = MemoryOutput::default();

    assert_eq!(run(&input_json, output.clone(), Default::default()), None);
    assert!(output.file_names().is_empty());

    let forced = ProjectFlags {
        force_report: true,
        ..Default::default()
    };
    assert!(run(&input_json, output.clone(), forced).is_some());
    assert!(output.file("decay_curves.csv").is_none());
}

#[rstest]
fn should_reject_invalid_input(mut input_json: Value) {
    input_json["AirLoop"]["VAV 1"]["zones_cooled"] = json!(["Lobby"]);
    let error = run_project(
        input_json.to_string().as_bytes(),
        SinkOutput,
        Default::default(),
    )
    .unwrap_err();
    assert_eq!(
        error.to_string(),
        "Zone 'Lobby' referenced by air loop 'VAV 1' was not provided"
    );
}
