//! Correct command: load, prepare, correct and write.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use qmbc_correct::correct;
use qmbc_grid::GriddedSeries;
use qmbc_io::{
    NetcdfSink, ReaderConfig, add_offset, drop_leap_days, read_netcdf, regrid_bilinear,
    slice_period, subset_window, validate_alignment,
};

use crate::cli::CorrectArgs;
use crate::config::{PreprocessToml, QmbcConfig};
use crate::convert;

/// Run the bias-correction pipeline.
pub fn run(args: CorrectArgs) -> Result<()> {
    let _cmd = info_span!("correct").entered();

    // 1. Load project TOML
    let toml_str = fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: QmbcConfig = toml::from_str(&toml_str).context("failed to parse TOML config")?;
    let correction_cfg = convert::build_correction_config(&config, args.region.as_deref())?;

    // 2. Read the three inputs
    let input = &config.input;
    let model_reader = convert::build_reader_config(input, &input.variable);
    let obs_reader = convert::build_reader_config(
        input,
        input.obs_variable.as_deref().unwrap_or(&input.variable),
    );
    let hist = load(&input.hist, &model_reader)?;
    let fut = load(&input.fut, &model_reader)?;
    let obs = load(&input.obs, &obs_reader)?;

    // 3. Prepare
    let pre = &config.preprocess;
    let hist = prepare(hist, pre, pre.hist_period.as_ref(), Grid::Model)
        .context("preparing historical run")?;
    let fut = prepare(fut, pre, pre.fut_period.as_ref(), Grid::Model)
        .context("preparing future run")?;
    let obs_period = pre.obs_period.as_ref().or(pre.hist_period.as_ref());
    let mut obs = prepare(obs, pre, obs_period, Grid::Observation)
        .context("preparing observations")?;
    if pre.obs_offset != 0.0 {
        obs = add_offset(&obs, pre.obs_offset);
    }
    validate_alignment(&[("hist", &hist), ("fut", &fut), ("obs", &obs)])
        .context("inputs are not on a common grid")?;

    // 4. Correct
    let result = correct(&hist, &fut, &obs, &correction_cfg)?;

    // 5. Write artifacts and report
    let out_dir = args.output_dir.unwrap_or_else(|| config.output.dir.clone());
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create output directory: {}", out_dir.display()))?;
    let mut sink = NetcdfSink::new(&out_dir, convert::build_writer_config(&config.output, input));
    result.persist(&mut sink)?;

    if let Some(path) = args.report.or_else(|| config.output.report.clone()) {
        let json = serde_json::to_string_pretty(result.report())
            .context("failed to serialise correction report")?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write report: {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }

    info!(
        output = %out_dir.display(),
        corrected = result.report().total_corrected(),
        skipped = result.report().total_skipped(),
        "correction finished"
    );
    Ok(())
}

fn load(path: &Path, reader: &ReaderConfig) -> Result<GriddedSeries> {
    info!(path = %path.display(), variable = reader.variable(), "reading input");
    read_netcdf(path, reader).with_context(|| format!("failed to read NetCDF: {}", path.display()))
}

/// Native grid of an input; index windows refer to the model grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grid {
    Model,
    Observation,
}

/// Leap days, period, index window and target grid, in that order.
///
/// The index window is skipped for observations, which reach the common
/// grid by regridding alone.
fn prepare(
    mut series: GriddedSeries,
    pre: &PreprocessToml,
    period: Option<&[String; 2]>,
    grid: Grid,
) -> Result<GriddedSeries> {
    if pre.drop_leap_days {
        series = drop_leap_days(&series);
    }
    if let Some(period) = period {
        let (start, end) = convert::parse_period(period)?;
        series = slice_period(&series, start, end)?;
    }
    if grid == Grid::Model && (pre.lat_window.is_some() || pre.lon_window.is_some()) {
        let (ny, nx) = series.spatial_shape();
        let [y0, y1] = pre.lat_window.unwrap_or([0, ny]);
        let [x0, x1] = pre.lon_window.unwrap_or([0, nx]);
        series = subset_window(&series, y0..y1, x0..x1)?;
    }
    if let Some(grid) = &pre.target_grid {
        let lats = convert::axis_from_range(&grid.lat)?;
        let lons = convert::axis_from_range(&grid.lon)?;
        series = regrid_bilinear(&series, &lats, &lons)?;
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetGridToml;
    use chrono::{Days, NaiveDate};
    use qmbc_correct::{FUT_CORRECTED, HIST_CORRECTED};
    use qmbc_io::{WriterConfig, write_netcdf};
    use tempfile::tempdir;

    fn year_of_days(year: i32) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
        (0..365).map(|d| start + Days::new(d)).collect()
    }

    fn write_input(dir: &Path, name: &str, year: i32, offset: f64) -> std::path::PathBuf {
        let times = year_of_days(year);
        let data: Vec<f64> = (0..times.len() * 2)
            .map(|k| 290.0 + ((k * 37) % 101) as f64 / 8.0 + ((k * 11) % 7) as f64 + offset)
            .collect();
        let series = GriddedSeries::from_flat(times, vec![20.0], vec![78.0, 79.0], data).unwrap();
        let path = dir.join(format!("{name}.nc"));
        write_netcdf(&path, &series, &WriterConfig::default()).unwrap();
        path
    }

    #[test]
    fn end_to_end_writes_artifacts_and_report() {
        let dir = tempdir().unwrap();
        let hist = write_input(dir.path(), "hist", 2001, 0.0);
        let fut = write_input(dir.path(), "fut", 2041, 1.0);
        let obs = write_input(dir.path(), "obs", 2001, 4.0);
        let out = dir.path().join("out");
        let report = dir.path().join("report.json");
        let config = dir.path().join("qmbc.toml");
        fs::write(
            &config,
            format!(
                "[input]\nhist = {hist:?}\nfut = {fut:?}\nobs = {obs:?}\n\n\
                 [seasons]\nregion = \"India\"\n"
            ),
        )
        .unwrap();

        run(CorrectArgs {
            config,
            output_dir: Some(out.clone()),
            region: None,
            report: Some(report.clone()),
        })
        .unwrap();

        assert!(out.join(format!("{HIST_CORRECTED}.nc")).exists());
        assert!(out.join(format!("{FUT_CORRECTED}.nc")).exists());
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(json["catalog"], "India");
        assert_eq!(json["seasons"].as_array().unwrap().len(), 4);

        let corrected = read_netcdf(
            &out.join(format!("{HIST_CORRECTED}.nc")),
            &ReaderConfig::default(),
        )
        .unwrap();
        assert_eq!(corrected.n_times(), 365);
        assert_eq!(corrected.spatial_shape(), (1, 2));
    }

    fn on_grid(lats: Vec<f64>, lons: Vec<f64>) -> GriddedSeries {
        let times = year_of_days(2001);
        let n = times.len() * lats.len() * lons.len();
        let data: Vec<f64> = (0..n).map(|k| 280.0 + (k % 13) as f64).collect();
        GriddedSeries::from_flat(times, lats, lons, data).unwrap()
    }

    #[test]
    fn index_window_applies_to_model_grid_only() {
        let pre = PreprocessToml {
            lat_window: Some([1, 3]),
            lon_window: Some([1, 3]),
            target_grid: Some(TargetGridToml {
                lat: [19.0, 20.5, 1.0],
                lon: [77.0, 78.5, 1.0],
            }),
            ..PreprocessToml::default()
        };
        let model = on_grid(vec![18.0, 19.0, 20.0, 21.0], vec![76.0, 77.0, 78.0, 79.0]);
        let obs = on_grid(vec![19.0, 19.5, 20.0], vec![77.0, 77.25, 77.5, 77.75, 78.0]);

        let model = prepare(model, &pre, None, Grid::Model).unwrap();
        let obs = prepare(obs, &pre, None, Grid::Observation).unwrap();

        assert_eq!(model.lats(), &[19.0, 20.0]);
        assert_eq!(obs.lats(), &[19.0, 20.0]);
        assert_eq!(obs.lons(), &[77.0, 78.0]);
        assert!(obs.values().iter().all(|v| v.is_finite()));
        validate_alignment(&[("hist", &model), ("obs", &obs)]).unwrap();
    }

    #[test]
    fn missing_config_file_is_reported() {
        let dir = tempdir().unwrap();
        let err = run(CorrectArgs {
            config: dir.path().join("absent.toml"),
            output_dir: None,
            region: None,
            report: None,
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config file"));
    }
}
