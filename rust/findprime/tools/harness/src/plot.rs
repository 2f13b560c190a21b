//! HTML charts of CPU time per benchmark.
//!
//! Bars show every run of each result set side by side. Lines split names of
//! the form `name/arg` and plot the argument on the x axis, one line per name,
//! which is how the repetition-count variants are compared.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::{debug, info};
use plotly::common::{DashType, Line, Mode, Title};
use plotly::layout::{Axis, BarMode, Layout};
use plotly::{Bar, Plot, Scatter};

use crate::error::{HarnessError, Result};
use crate::results::{BenchmarkResults, Run};
use crate::time_unit::TimeUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotKind {
    #[default]
    Bars,
    Lines,
}

impl PlotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlotKind::Bars => "bars",
            PlotKind::Lines => "lines",
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PlotKind {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bars" | "bar" => Ok(PlotKind::Bars),
            "lines" | "line" => Ok(PlotKind::Lines),
            other => Err(HarnessError::InvalidArgument(format!(
                "unknown plot kind '{}', expected bars or lines",
                other
            ))),
        }
    }
}

/// One bar trace: the runs of a single result set.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub labels: Vec<String>,
    pub cpu_times: Vec<f64>,
}

/// One line trace: a benchmark name with CPU time per argument.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub name: String,
    pub args: Vec<u64>,
    pub cpu_times: Vec<f64>,
}

/// Splits `name/arg` into its base name and numeric argument.
pub fn split_argument(name: &str) -> Option<(&str, u64)> {
    let (base, arg) = name.split_once('/')?;
    let arg = arg.parse().ok()?;
    Some((base, arg))
}

fn cpu_time_in(run: &Run, unit: TimeUnit) -> f64 {
    unit.from_duration(run.cpu_duration())
}

/// Display name of a result set: its executable's file name, or its position.
fn results_name(results: &BenchmarkResults, index: usize) -> String {
    results
        .context
        .executable
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("results #{}", index + 1))
}

/// Per-iteration CPU times of every non-aggregate run, one series per result set.
pub fn bar_series(all_results: &[BenchmarkResults], unit: TimeUnit) -> Vec<BarSeries> {
    all_results
        .iter()
        .enumerate()
        .map(|(index, results)| {
            let runs: Vec<&Run> = results.benchmarks.iter().filter(|run| !run.is_aggregate()).collect();
            BarSeries {
                name: results_name(results, index),
                labels: runs.iter().map(|run| run.name.clone()).collect(),
                cpu_times: runs.iter().map(|run| cpu_time_in(run, unit)).collect(),
            }
        })
        .collect()
}

/// Groups `name/arg` runs by name, in order of first appearance.
///
/// Aggregates and runs without a numeric argument are left out.
pub fn line_series(all_results: &[BenchmarkResults], unit: TimeUnit) -> Vec<LineSeries> {
    let mut series: Vec<LineSeries> = Vec::new();

    for run in all_results.iter().flat_map(|results| &results.benchmarks) {
        if run.is_aggregate() {
            continue;
        }
        let Some((base, arg)) = split_argument(&run.name) else {
            debug!("'{}' has no numeric argument, not plotted as a line", run.name);
            continue;
        };

        let cpu_time = cpu_time_in(run, unit);
        match series.iter_mut().find(|line| line.name == base) {
            Some(line) => {
                line.args.push(arg);
                line.cpu_times.push(cpu_time);
            }
            None => series.push(LineSeries {
                name: base.to_string(),
                args: vec![arg],
                cpu_times: vec![cpu_time],
            }),
        }
    }

    series
}

/// Builds the chart for `all_results`, with CPU times shown in `unit`.
pub fn build_plot(all_results: &[BenchmarkResults], kind: PlotKind, unit: TimeUnit) -> Result<Plot> {
    // All result sets are expected to come from the same machine.
    let first = all_results.first().ok_or_else(|| {
        HarnessError::InvalidArgument("no benchmark results to plot".to_string())
    })?;
    let title = format!(
        "CPU count: {}, MHz/CPU: {}",
        first.context.num_cpus, first.context.mhz_per_cpu
    );
    let y_title = format!("CPU time [{}]", unit);

    let mut plot = Plot::new();
    let layout = match kind {
        PlotKind::Bars => {
            for series in bar_series(all_results, unit) {
                plot.add_trace(Bar::new(series.labels, series.cpu_times).name(&series.name));
            }
            Layout::new()
                .title(Title::new(&title))
                .bar_mode(BarMode::Group)
                .bar_group_gap(0.1)
                .x_axis(Axis::new().auto_margin(true))
                .y_axis(Axis::new().title(Title::new(&y_title)))
        }
        PlotKind::Lines => {
            let series = line_series(all_results, unit);
            if series.is_empty() {
                return Err(HarnessError::InvalidArgument(
                    "no benchmark has a numeric argument to plot as lines".to_string(),
                ));
            }
            for line in series {
                plot.add_trace(
                    Scatter::new(line.args, line.cpu_times)
                        .mode(Mode::LinesMarkers)
                        .name(&line.name)
                        .line(Line::new().dash(DashType::Dash)),
                );
            }
            Layout::new()
                .title(Title::new(&title))
                .x_axis(Axis::new().title(Title::new("Argument")))
                .y_axis(Axis::new().title(Title::new(&y_title)))
        }
    };
    plot.set_layout(layout);
    Ok(plot)
}

/// Renders the chart as a standalone HTML page at `path`.
pub fn write_plot<P: AsRef<Path>>(
    path: P,
    all_results: &[BenchmarkResults],
    kind: PlotKind,
    unit: TimeUnit,
) -> Result<()> {
    let plot = build_plot(all_results, kind, unit)?;
    fs::write(path.as_ref(), plot.to_html())?;
    info!("{} plot written to {}", kind, path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Context;
    use std::path::PathBuf;
    use std::time::Duration;

    fn run(name: &str, cpu_ms: u64) -> Run {
        Run::from_totals(
            name,
            1,
            Duration::from_millis(cpu_ms),
            Duration::from_millis(cpu_ms),
            TimeUnit::Millisecond,
        )
    }

    fn results(executable: &str, runs: Vec<Run>) -> BenchmarkResults {
        BenchmarkResults::new(
            Context {
                date: "2026-10-16T09:00:00+00:00".to_string(),
                executable: PathBuf::from(executable),
                num_cpus: 4,
                mhz_per_cpu: 3000,
                library_build_type: "release".to_string(),
            },
            runs,
        )
    }

    fn suite() -> BenchmarkResults {
        results(
            "build/findprime-benchmark",
            vec![
                run("calc_nth_prime", 10),
                run("calc_nth_prime_args/2", 20),
                run("calc_nth_prime_args/4", 40),
                run("calc_nth_prime_args_x2/2", 40),
                run("calc_nth_prime_args/6", 60),
                run("calc_nth_prime_args_x2/4", 80),
            ],
        )
    }

    #[test]
    fn test_split_argument() {
        assert_eq!(split_argument("calc_nth_prime_args/4"), Some(("calc_nth_prime_args", 4)));
        assert_eq!(split_argument("calc_nth_prime"), None);
        assert_eq!(split_argument("bm/real_time"), None);
    }

    #[test]
    fn test_lines_group_by_name_before_slash() {
        let lines = line_series(&[suite()], TimeUnit::Microsecond);
        assert_eq!(
            lines,
            vec![
                LineSeries {
                    name: "calc_nth_prime_args".to_string(),
                    args: vec![2, 4, 6],
                    cpu_times: vec![20_000.0, 40_000.0, 60_000.0],
                },
                LineSeries {
                    name: "calc_nth_prime_args_x2".to_string(),
                    args: vec![2, 4],
                    cpu_times: vec![40_000.0, 80_000.0],
                },
            ]
        );
    }

    #[test]
    fn test_lines_skip_aggregates() {
        let mut set = suite();
        let reps = vec![run("calc_nth_prime_args/2", 20), run("calc_nth_prime_args/2", 22)];
        set.benchmarks.extend(crate::results::aggregate(&reps));
        let lines = line_series(&[set], TimeUnit::Millisecond);
        assert_eq!(lines[0].args, vec![2, 4, 6]);
    }

    #[test]
    fn test_bars_per_result_set() {
        let other = results("", vec![run("calc_nth_prime", 12)]);
        let bars = bar_series(&[suite(), other], TimeUnit::Millisecond);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].name, "findprime-benchmark");
        assert_eq!(bars[0].labels.len(), 6);
        assert_eq!(bars[0].cpu_times[0], 10.0);
        assert_eq!(bars[1].name, "results #2");
        assert_eq!(bars[1].labels, vec!["calc_nth_prime"]);
    }

    #[test]
    fn test_plot_kind_parse() {
        assert_eq!("lines".parse::<PlotKind>().unwrap(), PlotKind::Lines);
        assert_eq!("Bars".parse::<PlotKind>().unwrap(), PlotKind::Bars);
        assert!("pie".parse::<PlotKind>().is_err());
    }

    #[test]
    fn test_build_plot_errors() {
        assert!(build_plot(&[], PlotKind::Bars, TimeUnit::Millisecond).is_err());
        let flat = results("bench", vec![run("calc_nth_prime", 1)]);
        assert!(build_plot(&[flat], PlotKind::Lines, TimeUnit::Millisecond).is_err());
    }

    #[test]
    fn test_write_plot_html() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.html");
        write_plot(&path, &[suite()], PlotKind::Lines, TimeUnit::Millisecond).unwrap();

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("<html"));
        assert!(html.contains("calc_nth_prime_args_x2"));
    }
}
