use std::io::Write;

use crate::error::Result;
use crate::results::{BenchmarkResults, Context, Run};

const NAME_COLUMN_WIDTH: usize = 36;

/// Receives benchmark results as they are produced.
pub trait Reporter {
    /// Called once before any benchmark runs.
    fn report_context(&mut self, context: &Context) -> Result<()>;

    /// Called after each benchmark with its repetitions and any aggregates.
    fn report_runs(&mut self, runs: &[Run]) -> Result<()>;

    /// Called once after the last benchmark.
    fn finalize(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Human-readable table, in the layout google-benchmark prints to a terminal.
pub struct ConsoleReporter<W: Write> {
    writer: W,
    header_printed: bool,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_printed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn print_header(&mut self) -> Result<()> {
        let rule = "-".repeat(NAME_COLUMN_WIDTH + 48);
        writeln!(self.writer, "{}", rule)?;
        writeln!(
            self.writer,
            "{:<width$} {:>15} {:>15} {:>15}",
            "Benchmark",
            "Time",
            "CPU",
            "Iterations",
            width = NAME_COLUMN_WIDTH
        )?;
        writeln!(self.writer, "{}", rule)?;
        self.header_printed = true;
        Ok(())
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report_context(&mut self, context: &Context) -> Result<()> {
        writeln!(self.writer, "{}", context.date)?;
        writeln!(self.writer, "Running {}", context.executable.display())?;
        writeln!(
            self.writer,
            "Run on ({} X {} MHz CPU s)",
            context.num_cpus, context.mhz_per_cpu
        )?;
        if context.library_build_type == "debug" {
            writeln!(
                self.writer,
                "***WARNING*** Harness was built as DEBUG. Timings may be affected."
            )?;
        }
        Ok(())
    }

    fn report_runs(&mut self, runs: &[Run]) -> Result<()> {
        if !self.header_printed {
            self.print_header()?;
        }

        for run in runs {
            let unit = run.unit();
            let iterations = if run.is_aggregate() {
                String::new()
            } else {
                run.iterations.to_string()
            };
            writeln!(
                self.writer,
                "{:<width$} {:>12.3} {:<2} {:>12.3} {:<2} {:>15}",
                run.name,
                run.real_time,
                unit,
                run.cpu_time,
                unit,
                iterations,
                width = NAME_COLUMN_WIDTH
            )?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Collects everything and writes one JSON document on [`finalize`](Reporter::finalize).
pub struct JsonReporter<W: Write> {
    writer: W,
    context: Option<Context>,
    runs: Vec<Run>,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            context: None,
            runs: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report_context(&mut self, context: &Context) -> Result<()> {
        self.context = Some(context.clone());
        Ok(())
    }

    fn report_runs(&mut self, runs: &[Run]) -> Result<()> {
        self.runs.extend_from_slice(runs);
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        let context = self.context.take().unwrap_or_else(Context::current);
        let results = BenchmarkResults::new(context, std::mem::take(&mut self.runs));
        serde_json::to_writer_pretty(&mut self.writer, &results)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// One CSV line per run.
pub struct CsvReporter<W: Write> {
    writer: W,
    header_printed: bool,
}

impl<W: Write> CsvReporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_printed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Reporter for CsvReporter<W> {
    fn report_context(&mut self, _context: &Context) -> Result<()> {
        Ok(())
    }

    fn report_runs(&mut self, runs: &[Run]) -> Result<()> {
        if !self.header_printed {
            writeln!(self.writer, "name,iterations,real_time,cpu_time,time_unit")?;
            self.header_printed = true;
        }

        for run in runs {
            writeln!(
                self.writer,
                "\"{}\",{},{},{},{}",
                run.name.replace('"', "\"\""),
                run.iterations,
                run.real_time,
                run.cpu_time,
                run.unit()
            )?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Forwards every call to each wrapped reporter in order.
#[derive(Default)]
pub struct MultiReporter<'a> {
    reporters: Vec<&'a mut dyn Reporter>,
}

impl<'a> MultiReporter<'a> {
    pub fn new() -> Self {
        Self {
            reporters: Vec::new(),
        }
    }

    pub fn with(mut self, reporter: &'a mut dyn Reporter) -> Self {
        self.reporters.push(reporter);
        self
    }
}

impl Reporter for MultiReporter<'_> {
    fn report_context(&mut self, context: &Context) -> Result<()> {
        for reporter in self.reporters.iter_mut() {
            reporter.report_context(context)?;
        }
        Ok(())
    }

    fn report_runs(&mut self, runs: &[Run]) -> Result<()> {
        for reporter in self.reporters.iter_mut() {
            reporter.report_runs(runs)?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        for reporter in self.reporters.iter_mut() {
            reporter.finalize()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_unit::TimeUnit;
    use std::path::PathBuf;
    use std::time::Duration;

    fn context() -> Context {
        Context {
            date: "2026-10-16T09:00:00+00:00".to_string(),
            executable: PathBuf::from("/tmp/findprime-bench"),
            num_cpus: 8,
            mhz_per_cpu: 2400,
            library_build_type: "release".to_string(),
        }
    }

    fn sample_run() -> Run {
        Run::from_totals(
            "calc_nth_prime_args/2",
            10,
            Duration::from_millis(250),
            Duration::from_millis(240),
            TimeUnit::Millisecond,
        )
    }

    #[test]
    fn test_console_layout() {
        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.report_context(&context()).unwrap();
        reporter.report_runs(&[sample_run()]).unwrap();
        reporter.finalize().unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains("Run on (8 X 2400 MHz CPU s)"));
        assert!(text.contains("Benchmark"));
        let row = text
            .lines()
            .find(|line| line.starts_with("calc_nth_prime_args/2"))
            .unwrap();
        assert!(row.contains("25.000 ms"));
        assert!(row.contains("24.000 ms"));
        assert!(row.trim_end().ends_with("10"));
    }

    #[test]
    fn test_json_document() {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.report_context(&context()).unwrap();
        reporter.report_runs(&[sample_run()]).unwrap();
        reporter.finalize().unwrap();

        let parsed: BenchmarkResults = serde_json::from_slice(&reporter.into_inner()).unwrap();
        assert_eq!(parsed.context, context());
        assert_eq!(parsed.benchmarks, vec![sample_run()]);
    }

    #[test]
    fn test_csv_lines() {
        let mut reporter = CsvReporter::new(Vec::new());
        reporter.report_context(&context()).unwrap();
        reporter.report_runs(&[sample_run()]).unwrap();
        reporter.report_runs(&[sample_run()]).unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "name,iterations,real_time,cpu_time,time_unit");
        assert_eq!(lines[1], "\"calc_nth_prime_args/2\",10,25,24,ms");
    }

    #[test]
    fn test_multi_reporter_fans_out() {
        let mut csv = CsvReporter::new(Vec::new());
        let mut json = JsonReporter::new(Vec::new());
        {
            let mut multi = MultiReporter::new().with(&mut csv).with(&mut json);
            multi.report_context(&context()).unwrap();
            multi.report_runs(&[sample_run()]).unwrap();
            multi.finalize().unwrap();
        }
        assert!(!csv.into_inner().is_empty());
        assert!(!json.into_inner().is_empty());
    }
}
