use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "molmovie", version)]
struct Cli {
    /// Log level (overridden by RUST_LOG).
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,

    /// Log format.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile the movie into a PyMOL script.
    Build(BuildArgs),
    /// Dry run in memory and print diagnostics only.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Input movie configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Output PyMOL script path.
    #[arg(long)]
    script: PathBuf,

    /// Root for relative trajectory directories (defaults to the config's directory).
    #[arg(long)]
    frames_root: Option<PathBuf>,

    /// Frame file extension.
    #[arg(long, default_value = molmovie::DEFAULT_FRAME_EXTENSION)]
    frame_ext: String,

    /// Run the script with `pymol -cq` afterwards (requires `pymol` on PATH).
    #[arg(long)]
    run: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input movie configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Root for relative trajectory directories (defaults to the config's directory).
    #[arg(long)]
    frames_root: Option<PathBuf>,

    /// Frame file extension.
    #[arg(long, default_value = molmovie::DEFAULT_FRAME_EXTENSION)]
    frame_ext: String,

    /// Print diagnostics as JSON on stdout.
    #[arg(long)]
    json: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_format)?;

    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn init_logging(level: LogLevel, format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.as_str().parse().context("parse log level")?)
        .from_env_lossy();
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
    Ok(())
}

fn read_config(path: &Path) -> anyhow::Result<molmovie::MovieConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    let config = molmovie::MovieConfig::from_json_str(&text)
        .with_context(|| format!("load config '{}'", path.display()))?;
    Ok(config)
}

fn compile_opts(
    config_path: &Path,
    frames_root: Option<PathBuf>,
    frame_ext: String,
) -> molmovie::CompileOpts {
    let frames_root = frames_root.unwrap_or_else(|| {
        config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    });
    molmovie::CompileOpts {
        frames_root,
        frame_extension: frame_ext,
    }
}

fn print_report(report: &molmovie::Report) {
    for d in &report.diagnostics {
        eprintln!("warning: {d}");
    }
    if let Some(e) = &report.error {
        eprintln!("error: {e}");
    }
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<ExitCode> {
    if args.run && !molmovie::is_pymol_on_path() {
        anyhow::bail!(
            "--run needs `{}` on PATH; drop --run to only write the script",
            molmovie::PYMOL_BIN
        );
    }
    let config = read_config(&args.config)?;
    let opts = compile_opts(&args.config, args.frames_root, args.frame_ext);

    let mut engine = molmovie::PmlScriptEngine::with_output(&args.script);
    let report = molmovie::compile(&config, &mut engine, &opts);
    print_report(&report);
    if !report.succeeded() {
        return Ok(report.exit_code());
    }

    let script = engine.out_path().unwrap_or(&args.script);
    eprintln!(
        "wrote {} ({} commands, {} timeline entries)",
        script.display(),
        engine.commands().len(),
        report.timeline.len()
    );

    if args.run {
        if let Err(e) = molmovie::run_pymol(script) {
            eprintln!("error: {e}");
            return Ok(ExitCode::FAILURE);
        }
        if let Some(settings) = &report.settings {
            eprintln!("produced {}", settings.output_path().display());
        }
    }

    Ok(report.exit_code())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let config = read_config(&args.config)?;
    let opts = compile_opts(&args.config, args.frames_root, args.frame_ext);

    let mut engine = molmovie::PmlScriptEngine::new();
    let report = molmovie::compile(&config, &mut engine, &opts);

    if args.json {
        let out = serde_json::to_string_pretty(&report.diagnostics)
            .context("serialize diagnostics")?;
        println!("{out}");
        if let Some(e) = &report.error {
            eprintln!("error: {e}");
        }
    } else {
        print_report(&report);
        if report.succeeded() {
            eprintln!(
                "ok: {} scenes, {} timeline entries, {} diagnostics",
                report.timeline.boundary_count(),
                report.timeline.len(),
                report.diagnostics.len()
            );
        }
    }

    Ok(report.exit_code())
}
