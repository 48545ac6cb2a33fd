//! Hazard twin entry point: CLI wiring and config-driven engine construction.

use std::path::Path;
use std::process;

use hazard_twin::config::ScenarioConfig;
use hazard_twin::data::{BuildingTable, demo_records, read_building_table_from_path};
use hazard_twin::io::export::export_csv;
use hazard_twin::twin::engine::Engine;
use hazard_twin::twin::kpi::RecoveryReport;
use hazard_twin::twin::policy::{BaselinePolicy, PolicyKind, RecoveryPolicy};
use hazard_twin::twin::state::DigitalTwin;
use hazard_twin::twin::types::StepResult;

/// Parsed CLI arguments.
struct CliArgs {
    buildings_path: Option<String>,
    scenario_path: Option<String>,
    preset: Option<String>,
    policy_override: Option<PolicyKind>,
    feeders_override: Option<usize>,
    telemetry_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("hazard-twin: post-disaster power recovery digital twin");
    eprintln!();
    eprintln!("Usage: hazard-twin [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --buildings <path>       Building table CSV (id, lat, lon, ...)");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!(
        "  --policy <name>          Override recovery policy ({})",
        PolicyKind::NAMES.join(", ")
    );
    eprintln!("  --feeders <n>            Override requested feeder count");
    eprintln!("  --telemetry-out <path>   Export step results to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after simulation");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("Without --buildings a built-in demo table is used.");
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

/// Returns the value following flag `name`, or exits with an error.
fn flag_value(args: &[String], i: usize, name: &str, what: &str) -> String {
    match args.get(i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {name} requires {what}");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        buildings_path: None,
        scenario_path: None,
        preset: None,
        policy_override: None,
        feeders_override: None,
        telemetry_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--buildings" => {
                i += 1;
                cli.buildings_path = Some(flag_value(&args, i, "--buildings", "a path argument"));
            }
            "--scenario" => {
                i += 1;
                cli.scenario_path = Some(flag_value(&args, i, "--scenario", "a path argument"));
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(flag_value(&args, i, "--preset", "a name argument"));
            }
            "--policy" => {
                i += 1;
                let v = flag_value(&args, i, "--policy", "a name argument");
                match v.parse::<PolicyKind>() {
                    Ok(kind) => cli.policy_override = Some(kind),
                    Err(e) => {
                        eprintln!("error: {e}");
                        process::exit(1);
                    }
                }
            }
            "--feeders" => {
                i += 1;
                let v = flag_value(&args, i, "--feeders", "a count argument");
                if let Ok(n) = v.parse::<usize>() {
                    cli.feeders_override = Some(n);
                } else {
                    eprintln!("error: --feeders value \"{v}\" is not a valid count");
                    process::exit(1);
                }
            }
            "--telemetry-out" => {
                i += 1;
                cli.telemetry_out =
                    Some(flag_value(&args, i, "--telemetry-out", "a path argument"));
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let v = flag_value(&args, i, "--port", "a u16 argument");
                if let Ok(p) = v.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{v}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Runs the engine with the given policy and returns the final twin,
/// step results, and report.
fn run_with<P: RecoveryPolicy>(
    cfg: &ScenarioConfig,
    twin: DigitalTwin,
    policy: P,
) -> (DigitalTwin, Vec<StepResult>, RecoveryReport) {
    let name = policy.name();
    let mut engine = Engine::new(cfg.sim_config(), twin, policy);
    let results = if cfg.simulation.stop_when_restored {
        engine.run_until_restored()
    } else {
        engine.run()
    };
    let twin = engine.into_twin();
    let report = RecoveryReport::from_run(name, twin.graph(), &results);
    (twin, results, report)
}

fn load_table(path: Option<&str>) -> BuildingTable {
    match path {
        Some(p) => match read_building_table_from_path(Path::new(p)) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        },
        None => BuildingTable::from_records(&demo_records()),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();

    // --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(kind) = cli.policy_override {
        scenario.simulation.policy = kind;
    }
    if let Some(n) = cli.feeders_override {
        scenario.network.feeder_count = n;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let table = load_table(cli.buildings_path.as_deref());
    let twin = match DigitalTwin::from_table(&table, scenario.network.feeder_count) {
        Ok(twin) => twin,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    tracing::info!(
        buildings = table.len(),
        nodes = twin.graph().node_count(),
        edges = twin.graph().edge_count(),
        policy = %scenario.simulation.policy,
        "twin built"
    );

    #[cfg_attr(not(feature = "api"), expect(unused_variables))]
    let (twin, results, report) = match scenario.simulation.policy {
        PolicyKind::Baseline => run_with(&scenario, twin, BaselinePolicy),
        PolicyKind::Equity => run_with(&scenario, twin, scenario.equity_policy()),
    };

    for r in &results {
        println!("{r}");
    }

    println!("\n{report}");

    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&results, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(hazard_twin::api::AppState::from_run(
            scenario, &twin, report, results,
        ));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(hazard_twin::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
