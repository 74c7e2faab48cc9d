//! HBESS simulator entry point: CLI wiring and config-driven engine construction.

use std::path::Path;
use std::process;

use hbess_sim::config::ScenarioConfig;
use hbess_sim::degradation::{AgingPolicy, StressAging, ThroughputAging};
use hbess_sim::devices::{Battery, CommunityLoad, FastStorage, NullStorage, Supercapacitor};
use hbess_sim::io::export::export_csv;
use hbess_sim::sim::dispatcher::EnergyManagementDispatcher;
use hbess_sim::sim::engine::Engine;
use hbess_sim::sim::kpi::KpiReport;
use hbess_sim::sim::types::SimConfig;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    telemetry_out: Option<String>,
    quiet: bool,
}

fn print_help() {
    eprintln!("hbess-sim: hybrid battery + supercapacitor storage simulator");
    eprintln!();
    eprintln!("Usage: hbess-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --telemetry-out <path>   Export step snapshots to CSV");
    eprintln!("  --quiet                  Suppress per-step log lines");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        telemetry_out: None,
        quiet: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--telemetry-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --telemetry-out requires a path argument");
                    process::exit(1);
                }
                cli.telemetry_out = Some(args[i].clone());
            }
            "--quiet" => {
                cli.quiet = true;
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

/// Builds the engine from a validated scenario: demand profile, devices,
/// dispatcher, and the selected aging policy.
fn build_engine(cfg: &ScenarioConfig) -> Engine {
    let s = &cfg.simulation;
    let sim_config = SimConfig::new(s.steps_per_day, s.days, s.seed);

    let l = &cfg.load;
    let mut community = CommunityLoad::new(
        l.num_houses,
        l.daily_kwh_per_house,
        s.steps_per_day,
        l.noise_std_kw,
        l.transients_per_house,
        l.transient_kw_min,
        l.transient_kw_max,
        l.transient_steps_min,
        l.transient_steps_max,
        s.seed,
    );
    let demand_w: Vec<f32> = community.generate().iter().map(|kw| kw * 1000.0).collect();

    let b = &cfg.battery;
    let battery = Battery::new(
        b.capacity_kwh,
        b.voltage_v,
        b.discharge_rate_kw * 1000.0,
        b.soc_init,
        b.internal_resistance_ohm,
        b.discharge_efficiency,
    );

    let sc = &cfg.supercap;
    let storage = if sc.enabled {
        FastStorage::Supercap(Supercapacitor::new(
            sc.capacitance_f,
            sc.voltage_init_v,
            sc.internal_resistance_ohm,
            sc.max_voltage_v,
            sc.discharge_rate_kw * 1000.0,
        ))
    } else {
        FastStorage::Null(NullStorage)
    };

    let dispatcher = EnergyManagementDispatcher::new(
        battery,
        storage,
        cfg.dispatch.transient_threshold_w,
        cfg.dispatch.window_steps,
    );

    let aging = match s.aging.as_str() {
        "throughput" => Some(AgingPolicy::Throughput(ThroughputAging {
            rate_per_kwh: cfg.degradation.rate_per_kwh,
        })),
        "stress" => Some(AgingPolicy::Stress(StressAging::new(
            cfg.degradation.stress_rate_per_kwh,
            sc.enabled,
        ))),
        _ => None,
    };

    Engine::new(sim_config, demand_w, dispatcher, aging)
}

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline default
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

    // Apply seed override
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Build and run
    let mut engine = build_engine(&scenario);
    let results = engine.run();
    let kpi = KpiReport::from_snapshots(
        &results,
        engine.config().dt_s,
        engine.battery().initial_capacity_kwh,
    );

    // Print per-step results
    if !cli.quiet {
        for r in &results {
            println!("{r}");
        }
    }

    // Print KPI report
    println!("\n{kpi}");

    // Export CSV if requested
    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&results, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {path}");
    }
}
