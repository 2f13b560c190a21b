use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::debug;

use findprime::config::target_from_signed;
use findprime::{FinderConfig, NthPrimeFinder, PrimalityMode};
use findprime_harness::{
    default_registry, execute_benchmarks, find_executable_benchmarks, parse_results_file,
    parse_results_sets, write_plot, write_results_sets, BenchmarkResults, ConsoleReporter,
    CsvReporter, HarnessConfig, JsonReporter, MultiReporter, PlotKind, Reporter, Runner, TimeUnit,
    Workload, DEFAULT_EXECUTABLE_PATTERN,
};

/// Benchmarks a naive trial-division Nth prime search
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the registered benchmarks
    Run(RunArgs),

    /// List registered benchmark names
    List {
        /// Only list benchmarks matching this regular expression
        #[arg(long)]
        filter: Option<String>,
    },

    /// Find the Nth prime once and print the report line
    Nth {
        /// 1-indexed position of the prime
        #[arg(allow_negative_numbers = true)]
        n: i64,

        /// Primality test: naive (every divisor) or sqrt
        #[arg(long, default_value = "naive")]
        mode: PrimalityMode,
    },

    /// Print a JSON result file
    Show {
        file: PathBuf,

        /// Unit to display times in (ns, us, ms, s)
        #[arg(long, default_value = "ms")]
        time_unit: TimeUnit,
    },

    /// Chart CPU times from one or more result files as HTML
    Plot {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// bars: every run per file; lines: CPU time over the "/arg" suffix
        #[arg(long, default_value = "bars")]
        kind: PlotKind,

        /// Unit for the CPU time axis (ns, us, ms, s)
        #[arg(long, default_value = "ms")]
        time_unit: TimeUnit,

        /// HTML file to write
        #[arg(short, long, default_value = "findprime-plot.html")]
        out: PathBuf,
    },

    /// Find google-benchmark executables under a directory and run them
    Exec {
        root: PathBuf,

        /// Glob the executable's path must match
        #[arg(long, default_value = DEFAULT_EXECUTABLE_PATTERN)]
        pattern: String,

        /// Only list what would be run
        #[arg(long)]
        dry_run: bool,

        /// Write all collected results to this JSON file
        #[arg(long)]
        out: Option<PathBuf>,

        /// Unit to display times in (ns, us, ms, s)
        #[arg(long, default_value = "ms")]
        time_unit: TimeUnit,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Only run benchmarks matching this regular expression
    #[arg(long)]
    filter: Option<String>,

    /// Minimum measured time per benchmark (e.g. "500ms", "2s")
    #[arg(long, default_value = "500ms")]
    min_time: humantime::Duration,

    /// Measure each benchmark this many times and report aggregates
    #[arg(long, default_value_t = 1)]
    repetitions: u32,

    /// Prime to find; defaults to the build-time value or 2000
    #[arg(long, allow_negative_numbers = true)]
    n: Option<i64>,

    /// Primality test: naive (every divisor) or sqrt
    #[arg(long, default_value = "naive")]
    mode: PrimalityMode,

    /// Discard the per-invocation report lines
    #[arg(short, long)]
    quiet: bool,

    /// Also write results to this file
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutFormat::Json)]
    out_format: OutFormat,

    /// Unit for recorded times (ns, us, ms, s)
    #[arg(long, default_value = "ms")]
    time_unit: TimeUnit,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum OutFormat {
    Json,
    Csv,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn resolve_finder_config(n: Option<i64>, mode: PrimalityMode) -> Result<FinderConfig> {
    let config = match n {
        Some(n) => FinderConfig::new().with_target(target_from_signed(i128::from(n))?),
        None => FinderConfig::from_build_env()
            .context("invalid build-time target (FINDPRIME_N_VALUE)")?,
    };
    Ok(config.with_mode(mode))
}

fn run_benchmarks(args: RunArgs) -> Result<()> {
    let finder_config = resolve_finder_config(args.n, args.mode)?;

    let mut harness_config = HarnessConfig::new()
        .with_min_time(args.min_time.into())
        .with_repetitions(args.repetitions)
        .with_time_unit(args.time_unit);
    if let Some(filter) = args.filter {
        harness_config = harness_config.with_filter(filter);
    }

    let runner = Runner::new(harness_config)?;
    let mut workload = if args.quiet {
        Workload::quiet(finder_config)?
    } else {
        Workload::stdout(finder_config)?
    };
    debug!("finder config: {:?}", workload.config());
    let registry = default_registry();

    let mut console = ConsoleReporter::new(io::stdout());
    match args.out {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("could not create result file {}", path.display()))?;
            let writer = BufWriter::new(file);
            let mut exporter: Box<dyn Reporter> = match args.out_format {
                OutFormat::Json => Box::new(JsonReporter::new(writer)),
                OutFormat::Csv => Box::new(CsvReporter::new(writer)),
            };
            let mut reporter = MultiReporter::new()
                .with(&mut console)
                .with(exporter.as_mut());
            runner.run(&registry, &mut workload, &mut reporter)?;
            debug!("results written to {}", path.display());
        }
        None => {
            runner.run(&registry, &mut workload, &mut console)?;
        }
    }

    Ok(())
}

fn list_benchmarks(filter: Option<String>) -> Result<()> {
    let mut config = HarnessConfig::new();
    if let Some(filter) = filter {
        config = config.with_filter(filter);
    }
    let runner = Runner::new(config)?;
    let filter = runner.filter()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for instance in default_registry().matching(filter.as_ref()) {
        writeln!(out, "{}", instance.name)?;
    }
    Ok(())
}

fn find_once(n: i64, mode: PrimalityMode) -> Result<()> {
    let target = target_from_signed(i128::from(n))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    NthPrimeFinder::<u64>::new(target)
        .with_mode(mode)
        .report(&mut out)?;
    Ok(())
}

fn show_results(file: PathBuf, time_unit: TimeUnit) -> Result<()> {
    let results = parse_results_file(&file)
        .with_context(|| format!("could not read result file {}", file.display()))?
        .in_unit(time_unit);

    print_results(&[results])
}

fn print_results(sets: &[BenchmarkResults]) -> Result<()> {
    let mut console = ConsoleReporter::new(io::stdout());
    for results in sets {
        console.report_context(&results.context)?;
        console.report_runs(&results.benchmarks)?;
    }
    console.finalize()?;
    Ok(())
}

fn plot_results(files: Vec<PathBuf>, kind: PlotKind, time_unit: TimeUnit, out: PathBuf) -> Result<()> {
    let mut sets = Vec::new();
    for file in &files {
        let parsed = parse_results_sets(file)
            .with_context(|| format!("could not read result file {}", file.display()))?;
        sets.extend(parsed);
    }
    write_plot(&out, &sets, kind, time_unit)?;

    let stdout = io::stdout();
    writeln!(stdout.lock(), "plot written to {}", out.display())?;
    Ok(())
}

fn exec_benchmarks(
    root: PathBuf,
    pattern: &str,
    dry_run: bool,
    out: Option<PathBuf>,
    time_unit: TimeUnit,
) -> Result<()> {
    let executables = find_executable_benchmarks(&root, pattern)?;
    if executables.is_empty() {
        anyhow::bail!("no executables matching '{}' under {}", pattern, root.display());
    }
    if dry_run {
        let stdout = io::stdout();
        let mut listing = stdout.lock();
        for executable in &executables {
            writeln!(listing, "{}", executable.display())?;
        }
        return Ok(());
    }

    let sets = execute_benchmarks(&executables)?;
    if let Some(path) = out {
        write_results_sets(&path, &sets)
            .with_context(|| format!("could not write result file {}", path.display()))?;
        debug!("results written to {}", path.display());
    }

    let sets: Vec<BenchmarkResults> = sets.iter().map(|results| results.in_unit(time_unit)).collect();
    print_results(&sets)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Run(args) => run_benchmarks(args),
        Command::List { filter } => list_benchmarks(filter),
        Command::Nth { n, mode } => find_once(n, mode),
        Command::Show { file, time_unit } => show_results(file, time_unit),
        Command::Plot {
            files,
            kind,
            time_unit,
            out,
        } => plot_results(files, kind, time_unit, out),
        Command::Exec {
            root,
            pattern,
            dry_run,
            out,
            time_unit,
        } => exec_benchmarks(root, &pattern, dry_run, out, time_unit),
    }
}
