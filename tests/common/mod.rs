#![allow(dead_code)]

use std::path::Path;

pub const SUBSITE: &str = "CE09OSSM";
pub const NODE: &str = "RID27";
pub const SENSOR: &str = "04-DOSTAD000";
pub const STREAM: &str = "dosta_abcdjm_dcl_instrument_recovered";

/// Seconds from 1900-01-01 to 2020-01-01.
pub const EPOCH_2020: f64 = 3_786_825_600.0;
pub const FILL: f32 = -9999.0;

/// Write a small dissolved-oxygen dataset with `hours` hourly samples
/// starting 2020-01-01. Sample 2 of `dissolved_oxygen` is a fill value.
pub fn write_dosta(path: &Path, hours: usize) {
    write_dosta_with(path, 0, hours, "time");
}

/// Like [`write_dosta`], starting `start_hour` hours after 2020-01-01 and
/// storing time in `time_name`.
pub fn write_dosta_with(path: &Path, start_hour: usize, hours: usize, time_name: &str) {
    let mut file = netcdf::create(path).unwrap();
    file.add_attribute("subsite", SUBSITE).unwrap();
    file.add_attribute("node", NODE).unwrap();
    file.add_attribute("sensor", SENSOR).unwrap();
    file.add_attribute("stream", STREAM).unwrap();

    file.add_dimension("obs", hours).unwrap();
    file.add_dimension("bin", 2).unwrap();

    let time: Vec<f64> = (start_hour..start_hour + hours)
        .map(|h| EPOCH_2020 + 3600.0 * h as f64)
        .collect();
    {
        let mut var = file.add_variable::<f64>(time_name, &["obs"]).unwrap();
        var.put_attribute("units", "seconds since 1900-01-01 0:00:00").unwrap();
        var.put_attribute("standard_name", "time").unwrap();
        var.put_values(&time, ..).unwrap();
    }

    let deployment = vec![1i32; hours];
    {
        let mut var = file.add_variable::<i32>("deployment", &["obs"]).unwrap();
        var.put_values(&deployment, ..).unwrap();
    }

    let mut oxygen: Vec<f32> = (0..hours).map(|h| 250.0 + h as f32).collect();
    if hours > 2 {
        oxygen[2] = FILL;
    }
    {
        let mut var = file.add_variable::<f32>("dissolved_oxygen", &["obs"]).unwrap();
        var.put_attribute("_FillValue", FILL).unwrap();
        var.put_attribute("long_name", "Dissolved Oxygen Concentration").unwrap();
        var.put_attribute("units", "umol kg-1").unwrap();
        var.put_attribute("coordinates", format!("{} lat lon", time_name))
            .unwrap();
        var.put_values(&oxygen, ..).unwrap();
    }

    let qc = vec![0i32; hours];
    {
        let mut var = file
            .add_variable::<i32>("dissolved_oxygen_qc_executed", &["obs"])
            .unwrap();
        var.put_values(&qc, ..).unwrap();
    }

    let pressure: Vec<f64> = (0..hours).map(|h| 10.0 + (h % 5) as f64).collect();
    {
        let mut var = file.add_variable::<f64>("pressure", &["obs"]).unwrap();
        var.put_attribute("standard_name", "sea_water_pressure").unwrap();
        var.put_attribute("units", "dbar").unwrap();
        var.put_values(&pressure, ..).unwrap();
    }

    let lat = vec![46.85f64; hours];
    {
        let mut var = file.add_variable::<f64>("lat", &["obs"]).unwrap();
        var.put_attribute("units", "degrees_north").unwrap();
        var.put_values(&lat, ..).unwrap();
    }

    let lon = vec![-124.97f64; hours];
    {
        let mut var = file.add_variable::<f64>("lon", &["obs"]).unwrap();
        var.put_attribute("units", "degrees_east").unwrap();
        var.put_values(&lon, ..).unwrap();
    }

    let bins = vec![1.0f64, 2.0];
    {
        let mut var = file.add_variable::<f64>("bin", &["bin"]).unwrap();
        var.put_values(&bins, ..).unwrap();
    }

    let beams = vec![0.5f64; hours * 2];
    {
        let mut var = file
            .add_variable::<f64>("beam_velocity", &["obs", "bin"])
            .unwrap();
        var.put_values(&beams, ..).unwrap();
    }
}
