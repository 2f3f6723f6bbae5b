//! CLI entry point for the binding generator.
//!
//! Commands: `init`, `config`, `generate`, `inspect`. Settings are loaded
//! once, CLI flags are applied on top, then the command runs.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use console::style;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stkbind::io::{ExitCode, JsonResponse, OutputFormat, OutputSink};
use stkbind::render::{RenderOptions, render_class};
use stkbind::{BatchReport, BindError, BindResult, BindingGenerator, ClassModel, Settings, SkipReason};

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// LuaBridge binding generator for C++ library headers
#[derive(Parser)]
#[command(
    name = "stkbind",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate LuaBridge class registrations from C++ headers",
    long_about = "Scan a header directory, extract the public interface of each class and \
                  write a LuaBridge registration script.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize project
    #[command(about = "Set up .stkbind directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings")]
    Config,

    /// Generate the registration script for a header directory
    #[command(
        about = "Write LuaBridge registrations for every header in a directory",
        after_help = "Examples:\n  stkbind generate include/stk -o mappings.cpp\n  stkbind generate include/stk --class ADSR --class BiQuad\n  stkbind generate include/dsp --namespace dsp --all"
    )]
    Generate {
        /// Header directory (defaults to input.include_dir)
        dir: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only process these header stems
        #[arg(long = "class", value_name = "NAME")]
        classes: Vec<String>,

        /// Namespace the classes live in
        #[arg(long)]
        namespace: Option<String>,

        /// Keep classes without the required method
        #[arg(long)]
        all: bool,
    },

    /// Show the class model extracted from one header
    #[command(about = "Print the model of a single header or tree dump")]
    Inspect {
        /// Header or JSON tree dump
        file: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match Settings::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if cli.config.is_none() => {
            eprintln!(
                "{} {e}, using default configuration",
                style("warning:").for_stderr().yellow()
            );
            Settings::default()
        }
        Err(e) => std::process::exit(report_error(&e).into()),
    };

    stkbind::logging::init(cli.verbose || config.debug);

    if cli.config.is_none() && !matches!(cli.command, Commands::Init { .. }) {
        if let Err(warning) = Settings::check_init() {
            tracing::debug!("{warning}, using default configuration");
        }
    }

    let code = match cli.command {
        Commands::Init { force } => run_init(force),
        Commands::Config => run_config(&config),
        Commands::Generate {
            dir,
            output,
            classes,
            namespace,
            all,
        } => {
            let mut config = config;
            apply_generate_overrides(&mut config, output, classes, namespace, all);
            let dir = dir.unwrap_or_else(|| config.input.include_dir.clone());
            report_result(run_generate(Arc::new(config), &dir))
        }
        Commands::Inspect { file, json } => {
            run_inspect(Arc::new(config), &file, OutputFormat::from_json_flag(json))
        }
    };

    std::process::exit(code.into());
}

fn run_init(force: bool) -> ExitCode {
    match Settings::init_config_file(force) {
        Ok(path) => {
            println!("Created configuration file at: {}", path.display());
            println!("Edit this file to customize your settings.");
            ExitCode::Success
        }
        Err(e) => report_error(&BindError::ConfigError {
            reason: e.to_string(),
        }),
    }
}

fn run_config(config: &Settings) -> ExitCode {
    match toml::to_string_pretty(config) {
        Ok(toml_str) => {
            println!("{toml_str}");
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error displaying config: {e}");
            ExitCode::GeneralError
        }
    }
}

fn apply_generate_overrides(
    config: &mut Settings,
    output: Option<PathBuf>,
    classes: Vec<String>,
    namespace: Option<String>,
    all: bool,
) {
    if output.is_some() {
        config.output.path = output;
    }
    if !classes.is_empty() {
        config.filter.only = classes;
    }
    if let Some(ns) = namespace {
        config.render.namespace = ns;
    }
    if all {
        config.filter.require_method.clear();
    }
}

fn run_generate(settings: Arc<Settings>, dir: &Path) -> BindResult<ExitCode> {
    if !dir.is_dir() {
        return Err(BindError::FileRead {
            path: dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let mut generator = BindingGenerator::new(Arc::clone(&settings))?;
    let report = generator.run(dir);

    let mut sink = OutputSink::open(settings.output.path.as_deref())?;
    sink.write_str(&report.script())?;
    let destination = sink.describe();
    sink.finish()?;

    print_summary(&report, &destination);
    Ok(ExitCode::Success)
}

fn print_summary(report: &BatchReport, destination: &str) {
    eprintln!(
        "{} {} class registrations into {destination}",
        style("Generated").for_stderr().green().bold(),
        report.rendered.len()
    );
    eprintln!(
        "  skipped: {} filtered, {} without required method, {} duplicate inputs",
        report.skipped_for(SkipReason::Filtered),
        report.skipped_for(SkipReason::NoRequiredMethod),
        report.skipped_for(SkipReason::Duplicate)
    );
    if report.dropped_params > 0 {
        eprintln!(
            "  dropped parameters with unsupported types: {}",
            report.dropped_params
        );
    }
    if !report.failures.is_empty() {
        eprintln!(
            "  {} {}",
            style("failed:").for_stderr().yellow(),
            report.failures.len()
        );
        for failure in &report.failures {
            eprintln!(
                "    {} [{}] {}",
                style(&failure.header).for_stderr().bold(),
                failure.error.kind_code(),
                failure.error
            );
        }
    }
}

#[derive(Debug, Serialize)]
struct InspectOutput<'a> {
    file: String,
    class: &'a ClassModel,
    registration: String,
}

fn run_inspect(settings: Arc<Settings>, file: &Path, format: OutputFormat) -> ExitCode {
    let result = inspect_file(&settings, file);

    match (result, format) {
        (Ok((model, registration)), OutputFormat::Json) => {
            let payload = InspectOutput {
                file: file.display().to_string(),
                class: &model,
                registration,
            };
            print_json(&JsonResponse::success(payload))
        }
        (Ok((model, registration)), OutputFormat::Text) => {
            print_model(&model);
            println!();
            println!("{registration}");
            ExitCode::Success
        }
        (Err(e), OutputFormat::Json) => {
            let response = JsonResponse::from_error(&e);
            print_json(&response);
            ExitCode::from_error(&e)
        }
        (Err(e), OutputFormat::Text) => report_error(&e),
    }
}

fn inspect_file(settings: &Arc<Settings>, file: &Path) -> BindResult<(ClassModel, String)> {
    let mut generator = BindingGenerator::new(Arc::clone(settings))?;
    let model = generator
        .process_file(file)
        .map_err(|source| BindError::Header {
            header: file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            source,
        })?;
    let registration = render_class(&model, &RenderOptions::from(&settings.render));
    Ok((model, registration))
}

fn print_model(model: &ClassModel) {
    println!("class {}", model.name);
    if let Some(dtor) = &model.destructor_name {
        println!("  destructor: {dtor}");
    }
    for ctor in &model.constructors {
        println!("  constructor({})", format_params(&ctor.params));
    }
    for method in &model.methods {
        let returns = method.returns.as_deref().unwrap_or("?");
        let marker = if method.is_overloaded { " [overloaded]" } else { "" };
        println!(
            "  {returns} {}({}){marker}",
            method.name,
            format_params(&method.params)
        );
    }
    if model.dropped_params > 0 {
        println!("  dropped parameters: {}", model.dropped_params);
    }
}

fn format_params(params: &[stkbind::Parameter]) -> String {
    params
        .iter()
        .map(|p| {
            let amp = if p.is_reference() { "&" } else { "" };
            if p.name().is_empty() {
                format!("{}{amp}", p.ty())
            } else {
                format!("{}{amp} {}", p.ty(), p.name())
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_json<T: Serialize>(response: &JsonResponse<T>) -> ExitCode {
    match serde_json::to_string_pretty(response) {
        Ok(json) => {
            println!("{json}");
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            ExitCode::GeneralError
        }
    }
}

fn report_result(result: BindResult<ExitCode>) -> ExitCode {
    result.unwrap_or_else(|e| report_error(&e))
}

fn report_error(error: &BindError) -> ExitCode {
    eprintln!("{} {error}", style("Error:").for_stderr().red().bold());
    for suggestion in error.recovery_suggestions() {
        eprintln!("  {} {suggestion}", style("hint:").for_stderr().cyan());
    }
    ExitCode::from_error(error)
}
