//! Schedule toolkit entry point — CLI wiring for build and eval modes.

use std::io::{self, Write};
use std::path::Path;
use std::process;

use epsched::config::EvalConfig;
use epsched::document::Document;
use epsched::io::export::{export_csv, import_csv, write_csv};
use epsched::schedule::builder::{DEFAULT_TOLERANCE, create_compact_schedule};
use epsched::schedule::holidays::special_day_options;
use epsched::schedule::{annual_values_with_timestep, find_schedule};

/// Default name for schedules built from a value file.
const DEFAULT_SCHEDULE_NAME: &str = "Imported Schedule";

/// CLI mode selected by the leading subcommand.
enum Command {
    /// Compress an hourly CSV into a compact schedule document.
    Build,
    /// Evaluate a named schedule from a document into hourly CSV.
    Eval,
    /// Serve the document over the REST API.
    #[cfg(feature = "api")]
    Serve,
}

/// Parsed CLI arguments.
struct CliArgs {
    command: Command,
    values_path: Option<String>,
    model_path: Option<String>,
    schedule_name: Option<String>,
    config_path: Option<String>,
    name: Option<String>,
    type_limits: Option<String>,
    year: Option<i32>,
    tolerance: Option<f64>,
    out: Option<String>,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("epsched — schedule toolkit for EnergyPlus building models");
    eprintln!();
    eprintln!("Usage: epsched <command> [OPTIONS]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  build   Compress an hourly value CSV into a Schedule:Compact document");
    eprintln!("  eval    Evaluate a named schedule into hourly values");
    #[cfg(feature = "api")]
    eprintln!("  serve   Serve a document's schedules over a REST API");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --values <path>       Hourly CSV input (build)");
    eprintln!("  --model <path>        JSON document input (eval, serve)");
    eprintln!("  --schedule <name>     Schedule to evaluate (eval)");
    eprintln!("  --config <path>       TOML evaluation config");
    eprintln!("  --name <name>         Name for the built schedule (build)");
    eprintln!("  --type-limits <name>  ScheduleTypeLimits reference (build)");
    eprintln!("  --year <i32>          Override the evaluation/build year");
    eprintln!("  --tolerance <f64>     Day-grouping tolerance (build, default 1e-6)");
    eprintln!("  --out <path>          Output file (default: stdout)");
    #[cfg(feature = "api")]
    eprintln!("  --port <u16>          API server port (default: 3000)");
    eprintln!("  --help                Show this help message");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();

    let command = match args.get(1).map(String::as_str) {
        Some("build") => Command::Build,
        Some("eval") => Command::Eval,
        #[cfg(feature = "api")]
        Some("serve") => Command::Serve,
        Some("--help") | Some("-h") | None => {
            print_help();
            process::exit(if args.len() > 1 { 0 } else { 1 });
        }
        Some(other) => {
            eprintln!("error: unknown command \"{other}\"");
            print_help();
            process::exit(1);
        }
    };

    let mut cli = CliArgs {
        command,
        values_path: None,
        model_path: None,
        schedule_name: None,
        config_path: None,
        name: None,
        type_limits: None,
        year: None,
        tolerance: None,
        out: None,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--values" => cli.values_path = Some(take_value(&args, &mut i)),
            "--model" => cli.model_path = Some(take_value(&args, &mut i)),
            "--schedule" => cli.schedule_name = Some(take_value(&args, &mut i)),
            "--config" => cli.config_path = Some(take_value(&args, &mut i)),
            "--name" => cli.name = Some(take_value(&args, &mut i)),
            "--type-limits" => cli.type_limits = Some(take_value(&args, &mut i)),
            "--out" => cli.out = Some(take_value(&args, &mut i)),
            "--year" => {
                let raw = take_value(&args, &mut i);
                match raw.parse() {
                    Ok(year) => cli.year = Some(year),
                    Err(_) => {
                        eprintln!("error: --year value \"{raw}\" is not a valid year");
                        process::exit(1);
                    }
                }
            }
            "--tolerance" => {
                let raw = take_value(&args, &mut i);
                match raw.parse() {
                    Ok(tol) => cli.tolerance = Some(tol),
                    Err(_) => {
                        eprintln!("error: --tolerance value \"{raw}\" is not a valid number");
                        process::exit(1);
                    }
                }
            }
            #[cfg(feature = "api")]
            "--port" => {
                let raw = take_value(&args, &mut i);
                match raw.parse() {
                    Ok(port) => cli.port = port,
                    Err(_) => {
                        eprintln!("error: --port value \"{raw}\" is not a valid u16");
                        process::exit(1);
                    }
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

/// Consumes the value following a flag, exiting with a message if absent.
fn take_value(args: &[String], i: &mut usize) -> String {
    let flag = args[*i].clone();
    *i += 1;
    match args.get(*i) {
        Some(value) => value.clone(),
        None => {
            eprintln!("error: {flag} requires a value");
            process::exit(1);
        }
    }
}

/// Loads the TOML config, falling back to the defaults, and applies the
/// CLI year override.
fn load_config(cli: &CliArgs) -> EvalConfig {
    let mut cfg = match cli.config_path {
        Some(ref path) => match EvalConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => EvalConfig::default(),
    };
    if let Some(year) = cli.year {
        cfg.evaluation.year = year;
    }
    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    cfg
}

fn run_build(cli: &CliArgs) {
    let Some(ref values_path) = cli.values_path else {
        eprintln!("error: build requires --values <path>");
        process::exit(1);
    };
    let values = match import_csv(Path::new(values_path)) {
        Ok(values) => values,
        Err(e) => {
            eprintln!("error: cannot read \"{values_path}\": {e}");
            process::exit(1);
        }
    };

    let cfg = load_config(cli);
    let name = cli.name.as_deref().unwrap_or(DEFAULT_SCHEDULE_NAME);
    let type_limits = cli.type_limits.as_deref().unwrap_or("");
    let tolerance = cli.tolerance.unwrap_or(DEFAULT_TOLERANCE);

    let mut doc = Document::new();
    if let Err(e) =
        create_compact_schedule(&mut doc, name, &values, cfg.evaluation.year, type_limits, tolerance)
    {
        eprintln!("error: {e}");
        process::exit(1);
    }

    let json = match doc.to_json_string() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("error: cannot serialize document: {e}");
            process::exit(1);
        }
    };
    match cli.out {
        Some(ref path) => {
            if let Err(e) = std::fs::write(path, json) {
                eprintln!("error: cannot write \"{path}\": {e}");
                process::exit(1);
            }
            eprintln!("Document written to {path}");
        }
        None => println!("{json}"),
    }
}

fn run_eval(cli: &CliArgs) {
    let values = evaluate_from_cli(cli);
    let hours = values.len();

    match cli.out {
        Some(ref path) => {
            if let Err(e) = export_csv(&values, Path::new(path)) {
                eprintln!("error: failed to write CSV: {e}");
                process::exit(1);
            }
            eprintln!("{hours} hourly values written to {path}");
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            if let Err(e) = write_csv(&values, &mut lock) {
                eprintln!("error: failed to write CSV: {e}");
                process::exit(1);
            }
            let _ = lock.flush();
        }
    }
}

/// Shared eval-mode front half: load document, resolve options, evaluate.
fn evaluate_from_cli(cli: &CliArgs) -> Vec<f64> {
    let Some(ref model_path) = cli.model_path else {
        eprintln!("error: eval requires --model <path>");
        process::exit(1);
    };
    let Some(ref schedule_name) = cli.schedule_name else {
        eprintln!("error: eval requires --schedule <name>");
        process::exit(1);
    };

    let doc = load_document(model_path);
    let cfg = load_config(cli);
    let options = resolve_options(&cfg, &doc);

    let Some(obj) = find_schedule(&doc, schedule_name) else {
        eprintln!("error: no schedule named \"{schedule_name}\" in {model_path}");
        process::exit(1);
    };

    let e = &cfg.evaluation;
    match annual_values_with_timestep(obj, &doc, e.year, e.timestep, &options) {
        Ok(values) => {
            log::info!("evaluated {:?} over {}", obj.name, e.year);
            values
        }
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    }
}

fn load_document(path: &str) -> Document {
    match Document::from_json_file(Path::new(path)) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("error: cannot load \"{path}\": {e}");
            process::exit(1);
        }
    }
}

/// Builds evaluation options from config, falling back to the document's
/// own special-day declarations when the config lists none.
fn resolve_options(cfg: &EvalConfig, doc: &Document) -> epsched::schedule::EvalOptions {
    let mut options = match cfg.to_options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };
    let sd = &cfg.special_days;
    if sd.holidays.is_empty() && sd.custom_day_1.is_empty() && sd.custom_day_2.is_empty() {
        let from_doc = special_day_options(doc, cfg.evaluation.year);
        options.holidays = from_doc.holidays;
        options.custom_day_1 = from_doc.custom_day_1;
        options.custom_day_2 = from_doc.custom_day_2;
    }
    options
}

#[cfg(feature = "api")]
fn run_serve(cli: &CliArgs) {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let Some(ref model_path) = cli.model_path else {
        eprintln!("error: serve requires --model <path>");
        process::exit(1);
    };
    let doc = load_document(model_path);
    let cfg = load_config(cli);
    let options = resolve_options(&cfg, &doc);

    let state = Arc::new(epsched::api::AppState {
        document: doc,
        year: cfg.evaluation.year,
        options,
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("error: failed to create tokio runtime: {e}");
        process::exit(1);
    });
    rt.block_on(epsched::api::serve(state, addr));
}

fn main() {
    env_logger::init();
    let cli = parse_args();
    match cli.command {
        Command::Build => run_build(&cli),
        Command::Eval => run_eval(&cli),
        #[cfg(feature = "api")]
        Command::Serve => run_serve(&cli),
    }
}
