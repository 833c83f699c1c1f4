mod common;
mod logic;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use polarroute_core::{
    Catalog, PolarRegion, RngBundle, assemble_route, decode_to_seed, generate_code_from_entropy,
};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::scenario::{get_scenario, list_scenarios, scenario_keys};
use common::{load_catalog, split_csv};
use logic::{LogicTester, RouteReport, SeedInfo, parse_seed_token, resolve_seed_inputs};

#[derive(Debug, Parser)]
#[command(name = "polarroute", version)]
#[command(about = "Synthesise polar shipping routes and check their invariants")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Load ports and corridors from a JSON catalog instead of the built-in one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List catalog ports
    Ports,
    /// Plan a single route between two ports
    Route(RouteArgs),
    /// Run invariant scenarios across seeds
    Check(CheckArgs),
}

#[derive(Debug, Clone, Args)]
struct RouteArgs {
    /// Departure port id
    #[arg(long)]
    from: String,

    /// Arrival port id
    #[arg(long)]
    to: String,

    /// Seed as an integer or voyage code; a fresh voyage code is drawn when omitted
    #[arg(long)]
    seed: Option<String>,

    /// Plan as if in this month (1-12) of the current year
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CheckArgs {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated integers or voyage codes, or `all`)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 1)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Command::Check(args) = &cli.command
        && maybe_list_scenarios(args)?
    {
        return Ok(());
    }

    let catalog = load_catalog(cli.catalog.as_deref())?;
    let ok = match &cli.command {
        Command::Ports => {
            list_ports(&catalog, &mut OutputTarget::new(None)?)?;
            true
        }
        Command::Route(args) => run_route(&catalog, args, cli.verbose)?,
        Command::Check(args) => run_check(&catalog, args, cli.verbose)?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn announce_banner() {
    println!("{}", "🧊 PolarRoute Invariant Checks".bright_cyan().bold());
    println!("{}", "==============================".cyan());
}

fn list_ports(catalog: &Catalog, output: &mut OutputTarget) -> Result<()> {
    for port in catalog.ports() {
        writeln!(
            output.writer(),
            "{:4} {:26} {:12} {:>8.3} {:>8.3}  {:>5.1}%",
            port.id,
            port.name,
            port.country,
            port.position.lon,
            port.position.lat,
            port.congestion
        )?;
    }
    output.flush_inner()?;
    Ok(())
}

fn maybe_list_scenarios(args: &CheckArgs) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s.eq_ignore_ascii_case("all")) {
        scenarios.retain(|s| !s.eq_ignore_ascii_case("all"));
        scenarios.extend(scenario_keys().map(str::to_string));
    }
    scenarios
}

/// Midnight UTC today, or on the first of `month` this year.
///
/// Hazard timestamps derive from this instant, so it is fixed per day to keep
/// seeded routes replayable.
fn planning_time(month: Option<u32>) -> Result<DateTime<Utc>> {
    let today = Utc::now().date_naive();
    let date = match month {
        Some(month) => today
            .with_day(1)
            .and_then(|day| day.with_month(month))
            .with_context(|| format!("invalid month {month}"))?,
        None => today,
    };
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("no midnight on {date}"))?;
    Ok(Utc.from_utc_datetime(&midnight))
}

fn route_seed(token: Option<&str>, departure_lat: f64) -> Result<SeedInfo> {
    if let Some(token) = token {
        return parse_seed_token(token);
    }
    let region = PolarRegion::of_latitude(departure_lat);
    let code = generate_code_from_entropy(region, rand::random());
    let (region, seed) =
        decode_to_seed(&code).with_context(|| format!("generated unreadable code {code}"))?;
    Ok(SeedInfo::from_voyage_code(seed, region, code))
}

/// Returns `false` when either port id is not in the catalog.
fn run_route(catalog: &Catalog, args: &RouteArgs, verbose: bool) -> Result<bool> {
    let Some(departure) = catalog.port(&args.from) else {
        eprintln!("{}", format!("Unknown departure port: {}", args.from).red());
        return Ok(false);
    };
    let info = route_seed(args.seed.as_deref(), departure.position.lat)?;
    let departure_region = PolarRegion::of_latitude(departure.position.lat);
    if let (Some(code), Some(region)) = (&info.code, info.hemisphere_mismatch(departure_region)) {
        log::warn!(
            "voyage code {code} is a {region:?} code but {} departs from the {departure_region:?}",
            departure.name
        );
    }
    let now = planning_time(args.month)?;
    let rngs = RngBundle::from_user_seed(info.seed);

    let Some(route) = assemble_route(catalog, &args.from, &args.to, &rngs, now) else {
        eprintln!("{}", format!("Unknown arrival port: {}", args.to).red());
        return Ok(false);
    };
    if verbose {
        log::info!(
            "{} assembled with seed {} after {} draws",
            route.id,
            info.seed,
            rngs.total_draws()
        );
    }

    let report = RouteReport::new(&route, info.code)?;
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report.as_str() {
        "json" => logic::route_report::generate_json_report(&mut output_target, &report)?,
        "markdown" => logic::route_report::generate_markdown_report(&mut output_target, &report)?,
        _ => logic::route_report::generate_console_report(&mut output_target, &report)?,
    }
    output_target.flush_inner()?;
    Ok(true)
}

/// Returns `false` when any scenario run failed.
fn run_check(catalog: &Catalog, args: &CheckArgs, verbose: bool) -> Result<bool> {
    if args.report == "console" && args.output.is_none() {
        announce_banner();
    }
    let start_time = Instant::now();

    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let seed_pairs: Vec<(u64, Option<String>)> =
        seeds.into_iter().map(|info| (info.seed, info.code)).collect();
    let tester = LogicTester::new(catalog, Utc::now(), verbose);

    let mut results = Vec::new();
    for name in expand_scenarios(&args.scenarios) {
        let Some(scenario) = get_scenario(&name) else {
            eprintln!("{}", format!("Unknown scenario: {name}").yellow());
            continue;
        };
        results.extend(tester.run_scenario(&scenario, &seed_pairs, args.iterations));
    }

    write_reports(args, &results, start_time)?;
    Ok(results.iter().all(|r| r.passed))
}

fn write_reports(
    args: &CheckArgs,
    results: &[logic::ScenarioResult],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            if results.is_empty() {
                writeln!(&mut output_target, "[]")?;
            } else {
                logic::reports::generate_json_report(&mut output_target, results)?;
            }
        }
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# PolarRoute Check Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(
                &mut output_target,
                "🏁 Total time: {:?}",
                start_time.elapsed()
            )?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::util::temp_path;
    use crate::logic::ScenarioResult;
    use std::time::Duration;

    fn base_check_args() -> CheckArgs {
        CheckArgs {
            scenarios: "smoke".to_string(),
            list_scenarios: false,
            seeds: "1337".to_string(),
            iterations: 1,
            report: "json".to_string(),
            output: None,
        }
    }

    fn base_route_args() -> RouteArgs {
        RouteArgs {
            from: "p1".to_string(),
            to: "p3".to_string(),
            seed: Some("AR-WALRUS19".to_string()),
            month: Some(7),
            report: "json".to_string(),
            output: None,
        }
    }

    fn sample_result(passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: "Smoke Test".to_string(),
            seed: 1337,
            voyage_code: None,
            passed,
            iterations_run: 1,
            successful_iterations: usize::from(passed),
            failures: Vec::new(),
            average_duration: Duration::from_millis(1),
            performance_data: vec![Duration::from_millis(1)],
        }
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "polarroute",
            "route",
            "--from",
            "p1",
            "--to",
            "p2",
            "--month",
            "12",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Route(ref r) if r.month == Some(12)));
        let bad_month = [
            "polarroute",
            "route",
            "--from",
            "p1",
            "--to",
            "p2",
            "--month",
            "13",
        ];
        assert!(Cli::try_parse_from(bad_month).is_err());

        let cli = Cli::try_parse_from(["polarroute", "check", "--scenarios", "all"]).unwrap();
        let Command::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.seeds, "1337");
        assert_eq!(args.iterations, 1);
    }

    #[test]
    fn expands_all_scenarios_keyword() {
        let scenarios = expand_scenarios("all");
        assert_eq!(scenarios.len(), list_scenarios().len());
        assert!(scenarios.contains(&"water-invariant".to_string()));
    }

    #[test]
    fn expand_scenarios_without_all_preserves_order() {
        assert_eq!(expand_scenarios("unknown, smoke"), vec!["unknown", "smoke"]);
    }

    #[test]
    fn planning_time_moves_to_requested_month() {
        let july = planning_time(Some(7)).unwrap();
        assert_eq!(july.month(), 7);
        assert_eq!(july.day(), 1);
        assert_eq!(planning_time(None).unwrap().year(), Utc::now().year());
    }

    #[test]
    fn planning_time_is_pinned_to_midnight() {
        use chrono::Timelike;
        for month in [None, Some(2), Some(11)] {
            let at = planning_time(month).unwrap();
            assert_eq!(
                (at.hour(), at.minute(), at.second(), at.nanosecond()),
                (0, 0, 0, 0)
            );
        }
    }

    #[test]
    fn run_route_replays_identically() {
        let first = temp_path("replay-a.json");
        let second = temp_path("replay-b.json");
        for path in [&first, &second] {
            let args = RouteArgs {
                output: Some(path.clone()),
                ..base_route_args()
            };
            assert!(run_route(Catalog::builtin(), &args, false).unwrap());
        }
        let read = |path: &std::path::Path| -> serde_json::Value {
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
        };
        let (a, b) = (read(&first), read(&second));
        assert_eq!(a["fingerprint"], b["fingerprint"]);
        assert_eq!(a["route"]["icebergs"], b["route"]["icebergs"]);
    }

    #[test]
    fn route_seed_prefers_given_token() {
        let info = route_seed(Some("42"), 70.0).unwrap();
        assert_eq!(info, SeedInfo::from_numeric(42));

        let drawn = route_seed(None, -70.0).unwrap();
        let code = drawn.code.unwrap();
        assert!(code.starts_with("AN-"));
        assert_eq!(decode_to_seed(&code).map(|(_, seed)| seed), Some(drawn.seed));
    }

    #[test]
    fn run_route_writes_json_report() {
        let temp = temp_path("route-report.json");
        let args = RouteArgs {
            output: Some(temp.clone()),
            ..base_route_args()
        };
        assert!(run_route(Catalog::builtin(), &args, false).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["route"]["id"], "p1-p3");
        assert_eq!(value["voyage_code"], "AR-WALRUS19");
    }

    #[test]
    fn run_route_reports_unknown_ports() {
        let args = RouteArgs {
            to: "p42".to_string(),
            ..base_route_args()
        };
        assert!(!run_route(Catalog::builtin(), &args, false).unwrap());
        let args = RouteArgs {
            from: "nowhere".to_string(),
            ..base_route_args()
        };
        assert!(!run_route(Catalog::builtin(), &args, false).unwrap());
    }

    #[test]
    fn list_ports_writes_every_port() {
        let temp = temp_path("ports.txt");
        let mut target = OutputTarget::new(Some(temp.clone())).unwrap();
        list_ports(Catalog::builtin(), &mut target).unwrap();
        drop(target);
        let content = std::fs::read_to_string(temp).unwrap();
        assert_eq!(content.lines().count(), Catalog::builtin().ports().len());
        assert!(content.contains("Murmansk"));
    }

    #[test]
    fn run_check_passes_on_builtin_catalog() {
        let temp = temp_path("check.json");
        let args = CheckArgs {
            scenarios: "smoke,curated,unknown".to_string(),
            seeds: "7,AN-PETREL07".to_string(),
            output: Some(temp.clone()),
            ..base_check_args()
        };
        assert!(run_check(Catalog::builtin(), &args, false).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        let results: Vec<ScenarioResult> = serde_json::from_str(&content).unwrap();
        assert_eq!(results.len(), 6);
    }

    #[test]
    fn write_reports_emits_json_output() {
        let temp = temp_path("empty-report.json");
        let args = CheckArgs {
            output: Some(temp.clone()),
            ..base_check_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("[]"));
    }

    #[test]
    fn write_reports_markdown_empty_results() {
        let temp = temp_path("empty-report.md");
        let args = CheckArgs {
            report: "markdown".to_string(),
            output: Some(temp.clone()),
            ..base_check_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("No scenarios executed"));
    }

    #[test]
    fn write_reports_console_includes_total_time() {
        let temp = temp_path("report.txt");
        let args = CheckArgs {
            report: "console".to_string(),
            output: Some(temp.clone()),
            ..base_check_args()
        };
        write_reports(&args, &[sample_result(false)], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Smoke Test"));
        assert!(content.contains("Total time"));
    }

    #[test]
    fn maybe_list_scenarios_writes_output() {
        let temp = temp_path("scenarios.txt");
        let args = CheckArgs {
            list_scenarios: true,
            output: Some(temp.clone()),
            ..base_check_args()
        };
        assert!(maybe_list_scenarios(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available scenarios"));
        assert!(content.contains("deterministic-replay"));
        assert!(!maybe_list_scenarios(&base_check_args()).unwrap());
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        target.write_all(b"ok").unwrap();
        target.flush().unwrap();
    }
}
