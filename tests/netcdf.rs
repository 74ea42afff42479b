mod common;

use chrono::NaiveDate;
use common::*;
use ooiplot::config::PlotConfig;
use ooiplot::data::{AggregateDataset, DatasetHandle, NetcdfDataset};
use ooiplot::pipeline::{process_dataset, process_directory};
use ooiplot::plot::DryRunPlotter;
use ooiplot::segment::{CalendarUnit, SegmentMode};
use ooiplot::select::{ExclusionPreset, ExclusionSet};
use ooiplot::OoiPlotError;
use tempfile::TempDir;

#[test]
fn test_open_reads_identity_and_time() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dosta.nc");
    write_dosta(&path, 24);

    let dataset = NetcdfDataset::open(path.to_str().unwrap()).unwrap();
    let identity = dataset.identity();
    assert_eq!(identity.subsite, SUBSITE);
    assert_eq!(identity.node, NODE);
    assert_eq!(identity.sensor, SENSOR);
    assert_eq!(identity.stream, STREAM);
    assert_eq!(identity.deployment, 1);

    let time = dataset.time();
    assert_eq!(time.len(), 24);
    let midnight = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    assert_eq!(time[0], midnight);
    assert_eq!(time[23], midnight + chrono::TimeDelta::hours(23));
}

#[test]
fn test_coordinate_variables_are_not_listed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dosta.nc");
    write_dosta(&path, 4);

    let dataset = NetcdfDataset::open(path.to_str().unwrap()).unwrap();
    let names = dataset.variable_names();
    assert!(!names.contains(&"bin".to_string()));
    // Time and the names in `coordinates` attributes are coordinates too.
    assert!(!names.contains(&"time".to_string()));
    assert!(!names.contains(&"lat".to_string()));
    assert!(!names.contains(&"lon".to_string()));
    assert!(names.contains(&"dissolved_oxygen".to_string()));
    assert!(names.contains(&"beam_velocity".to_string()));
}

#[test]
fn test_fill_values_become_nan_and_attributes_are_kept() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dosta.nc");
    write_dosta(&path, 4);

    let dataset = NetcdfDataset::open(path.to_str().unwrap()).unwrap();
    let variable = dataset.load_variable("dissolved_oxygen").unwrap();
    assert_eq!(variable.meta.label(), "Dissolved Oxygen Concentration");
    assert_eq!(variable.meta.units(), "umol kg-1");

    let series = variable.series(4).unwrap();
    assert_eq!(series[0], 250.0);
    assert!(series[2].is_nan());
    assert_eq!(series[3], 253.0);
}

#[test]
fn test_missing_identity_attribute_fails_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bare.nc");
    {
        let mut file = netcdf::create(&path).unwrap();
        file.add_attribute("subsite", SUBSITE).unwrap();
        file.add_dimension("obs", 1).unwrap();
        {
            let mut var = file.add_variable::<f64>("time", &["obs"]).unwrap();
            var.put_attribute("units", "seconds since 1900-01-01").unwrap();
            var.put_values(&[EPOCH_2020], ..).unwrap();
        }
        {
            let mut var = file.add_variable::<i32>("deployment", &["obs"]).unwrap();
            var.put_values(&[2i32], ..).unwrap();
        }
    }

    let err = NetcdfDataset::open(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, OoiPlotError::MissingAttribute { ref name } if name == "node"));
}

#[test]
fn test_unreadable_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("not-netcdf.nc");
    std::fs::write(&path, "plain text").unwrap();
    assert!(NetcdfDataset::open(path.to_str().unwrap()).is_err());
}

#[test]
fn test_bisect_dry_run_plan() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dosta.nc");
    write_dosta(&path, 24);
    let dataset = NetcdfDataset::open(path.to_str().unwrap()).unwrap();

    let config = PlotConfig::new(dir.path().join("plots")).unwrap();
    let mut plotter = DryRunPlotter::default();
    let summary = process_dataset(&dataset, &config, &mut plotter).unwrap();

    // 3 windows x (dissolved_oxygen, pressure) x (all data, outliers removed);
    // beam_velocity is two-dimensional and skipped in every window.
    assert_eq!(summary.figures, 12);
    assert_eq!(summary.skipped, 3);

    let expected_dir = dir
        .path()
        .join("plots")
        .join(SUBSITE)
        .join("D00001")
        .join(NODE)
        .join(SENSOR)
        .join(STREAM)
        .join("timeseries");
    assert_eq!(
        plotter.planned[0],
        expected_dir.join(
            "CE09OSSM-RID27-04-DOSTAD000_dissolved_oxygen_2020-01-01T000000-2020-01-01T230000.png"
        )
    );
    assert_eq!(
        plotter.planned[1],
        expected_dir.join(
            "CE09OSSM-RID27-04-DOSTAD000_dissolved_oxygen_2020-01-01T000000-2020-01-01T230000_outliers_removed.png"
        )
    );
    assert_eq!(
        plotter.planned[4],
        expected_dir.join(
            "CE09OSSM-RID27-04-DOSTAD000_dissolved_oxygen_2020-01-01T000000-2020-01-01T113000.png"
        )
    );
    // Dry runs create nothing.
    assert!(!dir.path().join("plots").exists());
}

#[test]
fn test_hourly_windows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dosta.nc");
    write_dosta(&path, 6);
    let dataset = NetcdfDataset::open(path.to_str().unwrap()).unwrap();

    let mut config = PlotConfig::new(dir.path()).unwrap();
    config.segment_mode = SegmentMode::CalendarUnit(CalendarUnit::Hour);
    let mut plotter = DryRunPlotter::default();
    let summary = process_dataset(&dataset, &config, &mut plotter).unwrap();

    // Hour 2 has a fill value for dissolved_oxygen, so that window only has pressure.
    assert_eq!(summary.figures, 6 * 4 - 2);
}

#[test]
fn test_minimal_preset_never_plots_coordinates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dosta.nc");
    write_dosta(&path, 24);
    let dataset = NetcdfDataset::open(path.to_str().unwrap()).unwrap();

    let mut config = PlotConfig::new(dir.path().join("plots")).unwrap();
    config.exclusions =
        ExclusionSet::from_preset(ExclusionPreset::Minimal, Vec::<String>::new()).unwrap();
    let mut plotter = DryRunPlotter::default();
    let summary = process_dataset(&dataset, &config, &mut plotter).unwrap();

    assert_eq!(summary.figures, 12);
    for planned in &plotter.planned {
        let name = planned.file_name().unwrap().to_string_lossy();
        assert!(!name.contains("_time_"), "{}", name);
        assert!(!name.contains("_lat_"), "{}", name);
        assert!(!name.contains("_lon_"), "{}", name);
    }
}

#[test]
fn test_stream_specific_time_variable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("metbk.nc");
    write_dosta_with(&path, 0, 6, "met_timeflx");
    let source = path.to_str().unwrap();

    assert!(matches!(
        NetcdfDataset::open(source),
        Err(OoiPlotError::MissingVariable { ref name }) if name == "time"
    ));

    let dataset = NetcdfDataset::open_with_time(source, "met_timeflx").unwrap();
    assert_eq!(dataset.time().len(), 6);
    let names = dataset.variable_names();
    assert!(!names.contains(&"met_timeflx".to_string()));
    assert!(names.contains(&"pressure".to_string()));
}

const PART_A: &str = "deployment0001_CE09OSSM-RID27-04-DOSTAD000-recovered_host-dosta_a";
const PART_B: &str = "deployment0001_CE09OSSM-RID27-04-DOSTAD000-recovered_host-dosta_b";

#[test]
fn test_directory_is_joined_along_time() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("deployment0001");
    std::fs::create_dir(&data).unwrap();
    write_dosta_with(&data.join(format!("{}.nc", PART_B)), 6, 6, "time");
    write_dosta_with(&data.join(format!("{}.nc", PART_A)), 0, 6, "time");
    std::fs::write(data.join("notes.txt"), "not a dataset").unwrap();

    let dataset = AggregateDataset::open_dir(&data, "time").unwrap();
    assert_eq!(dataset.files().len(), 2);
    assert!(dataset.files()[0].ends_with(format!("{}.nc", PART_A)));

    let time = dataset.time();
    assert_eq!(time.len(), 12);
    assert!(time.windows(2).all(|w| w[0] < w[1]));

    let oxygen = dataset.load_variable("dissolved_oxygen").unwrap().series(12).unwrap();
    assert!(oxygen[2].is_nan());
    assert!(oxygen[8].is_nan());
    assert_eq!(oxygen[6], 250.0);
}

#[test]
fn test_directory_figures_are_named_after_first_file() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("deployment0001");
    std::fs::create_dir(&data).unwrap();
    write_dosta_with(&data.join(format!("{}.nc", PART_A)), 0, 6, "time");
    write_dosta_with(&data.join(format!("{}.nc", PART_B)), 6, 6, "time");

    let config = PlotConfig::new(dir.path().join("plots")).unwrap();
    let mut plotter = DryRunPlotter::default();
    let summary = process_directory(&data, &config, &mut plotter).unwrap();

    // One window: (dissolved_oxygen, pressure) x (all data, outliers removed).
    assert_eq!(summary.figures, 4);
    let expected_dir = dir.path().join("plots").join("timeseries").join("deployment0001");
    assert_eq!(
        plotter.planned[0],
        expected_dir.join(format!("{}_dissolved_oxygen.png", PART_A))
    );
    assert_eq!(
        plotter.planned[3],
        expected_dir.join(format!("{}_pressure_outliers_removed.png", PART_A))
    );
}

#[test]
fn test_directory_without_datasets_is_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a dataset").unwrap();
    assert!(matches!(
        AggregateDataset::open_dir(dir.path(), "time"),
        Err(OoiPlotError::NoDatasets { .. })
    ));
}
