use anyhow::{bail, Context, Result};
use log::LevelFilter;
use redsmith::{
    DirLoader, Family, FileLoader, FileTree, InstallError, InstallPlan, Installer, LayoutConfig,
    UnitInfo, ZipLoader,
};
use serde::Serialize;
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "json" => Some(OutputFormat::Json),
            "text" => Some(OutputFormat::Text),
            _ => None,
        }
    }
}

struct GlobalOptions {
    format: OutputFormat,
    config: Option<PathBuf>,
    verbosity: u8,
}

enum CliCommand {
    Detect(PathBuf),
    Plan(PlanOptions),
    Help,
    Version,
}

struct PlanOptions {
    path: PathBuf,
    family: Option<Family>,
    name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlanStatus {
    Accepted,
    Rejected,
}

impl PlanStatus {
    fn exit_code(self) -> ExitCode {
        match self {
            PlanStatus::Accepted => ExitCode::SUCCESS,
            PlanStatus::Rejected => ExitCode::FAILURE,
        }
    }
}

pub fn run() -> Result<ExitCode> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (global, tokens) = parse_global_options(&args)?;
    let command = parse_command(&tokens)?;
    init_logging(global.verbosity);

    match command {
        CliCommand::Help => {
            print_help();
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Version => {
            println!("redsmith v{}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Detect(path) => {
            let config = LayoutConfig::load(global.config.as_deref())?;
            with_source(&path, |tree, loader| detect(config, tree, loader, global.format))?;
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Plan(options) => {
            let config = LayoutConfig::load(global.config.as_deref())?;
            let path = options.path.clone();
            let status = with_source(&path, |tree, loader| {
                plan(config, tree, loader, &options, global.format)
            })?;
            Ok(status.exit_code())
        }
    }
}

fn parse_global_options(args: &[String]) -> Result<(GlobalOptions, Vec<String>)> {
    let mut format = OutputFormat::Text;
    let mut config = None;
    let mut verbosity = 0u8;
    let mut tokens = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(value) = arg.strip_prefix("--format=") {
            format = parse_format(value)?;
            continue;
        }
        if arg == "--format" {
            let Some(value) = iter.next() else {
                bail!("--format requires a value");
            };
            format = parse_format(value)?;
            continue;
        }
        if let Some(value) = arg.strip_prefix("--config=") {
            config = Some(PathBuf::from(value));
            continue;
        }
        if arg == "--config" {
            let Some(value) = iter.next() else {
                bail!("--config requires a path");
            };
            config = Some(PathBuf::from(value));
            continue;
        }
        if arg.starts_with("-v") && !arg.starts_with("--") {
            let count = arg.chars().filter(|ch| *ch == 'v').count();
            verbosity = verbosity.saturating_add(count as u8);
            continue;
        }
        tokens.push(arg.to_string());
    }
    Ok((
        GlobalOptions {
            format,
            config,
            verbosity,
        },
        tokens,
    ))
}

fn parse_format(value: &str) -> Result<OutputFormat> {
    match OutputFormat::parse(value) {
        Some(format) => Ok(format),
        None => bail!("Unknown format: {value} (use 'text' or 'json')"),
    }
}

fn parse_command(tokens: &[String]) -> Result<CliCommand> {
    let Some(head) = tokens.first() else {
        return Ok(CliCommand::Help);
    };
    match head.as_str() {
        "--help" | "-h" | "help" => Ok(CliCommand::Help),
        "--version" | "-V" | "version" => Ok(CliCommand::Version),
        "detect" => {
            let path = tokens
                .get(1)
                .ok_or_else(|| anyhow::anyhow!("detect requires a path"))?;
            Ok(CliCommand::Detect(PathBuf::from(path)))
        }
        "plan" => parse_plan(tokens.get(1..).unwrap_or(&[])).map(CliCommand::Plan),
        other => bail!("Unknown command: {other} (try --help)"),
    }
}

fn parse_plan(args: &[String]) -> Result<PlanOptions> {
    let mut path = None;
    let mut family = None;
    let mut name = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--family" => {
                let Some(value) = iter.next() else {
                    bail!("--family requires a value");
                };
                family = Some(parse_family(value)?);
            }
            value if value.starts_with("--family=") => {
                family = Some(parse_family(value.trim_start_matches("--family="))?);
            }
            "--name" => {
                let Some(value) = iter.next() else {
                    bail!("--name requires a value");
                };
                name = Some(value.to_string());
            }
            value if value.starts_with("--name=") => {
                name = Some(value.trim_start_matches("--name=").to_string());
            }
            value if value.starts_with('-') => bail!("Unknown plan option: {value}"),
            value => {
                if path.is_some() {
                    bail!("plan takes a single path");
                }
                path = Some(PathBuf::from(value));
            }
        }
    }
    let Some(path) = path else {
        bail!("plan requires a path");
    };
    Ok(PlanOptions { path, family, name })
}

fn parse_family(value: &str) -> Result<Family> {
    match Family::parse(value) {
        Some(family) => Ok(family),
        None => bail!("Unknown family: {value} (use 'redmod' or 'preset')"),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false)
}

/// Indexes `path` and hands the tree to `action` with a matching loader.
fn with_source<T, F>(path: &Path, action: F) -> Result<T>
where
    F: FnOnce(FileTree, SourceLoader) -> Result<T>,
{
    if path.is_dir() {
        let tree = FileTree::from_dir(path)?;
        return action(tree, SourceLoader::Dir(DirLoader::new(path)));
    }
    if path.is_file() && is_zip(path) {
        let tree = FileTree::from_zip(path)?;
        let loader = ZipLoader::open(path)
            .with_context(|| format!("open {}", path.display()))?;
        return action(tree, SourceLoader::Zip(loader));
    }
    bail!("{} is neither a directory nor a .zip archive", path.display())
}

enum SourceLoader {
    Dir(DirLoader),
    Zip(ZipLoader),
}

#[async_trait::async_trait]
impl FileLoader for SourceLoader {
    async fn load(&self, path: &str) -> std::io::Result<Vec<u8>> {
        match self {
            SourceLoader::Dir(loader) => loader.load(path).await,
            SourceLoader::Zip(loader) => loader.load(path).await,
        }
    }
}

#[derive(Serialize)]
struct DetectReport {
    families: Vec<Family>,
    files: usize,
}

fn detect(
    config: LayoutConfig,
    tree: FileTree,
    loader: SourceLoader,
    format: OutputFormat,
) -> Result<()> {
    let installer = Installer::new(config, loader)?;
    let families = installer.detect(&tree);
    match format {
        OutputFormat::Json => {
            let report = DetectReport {
                families,
                files: tree.files().count(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if families.is_empty() {
                println!("No supported layout");
            }
            for family in families {
                println!("{}", family.label());
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct Rejection<'a> {
    kind: &'a str,
    error: String,
}

fn plan(
    config: LayoutConfig,
    tree: FileTree,
    loader: SourceLoader,
    options: &PlanOptions,
    format: OutputFormat,
) -> Result<PlanStatus> {
    let installer = Installer::new(config, loader)?;
    let family = match options.family {
        Some(family) => family,
        None => match installer.detect(&tree).first() {
            Some(family) => *family,
            None => bail!("No supported layout in {}", options.path.display()),
        },
    };
    let unit = UnitInfo::new(options.name.clone().unwrap_or_else(|| {
        options
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default()
    }));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start runtime")?;
    match runtime.block_on(installer.install(family, &tree, &unit)) {
        Ok(plan) => {
            print_plan(&plan, format)?;
            Ok(PlanStatus::Accepted)
        }
        Err(err) => {
            print_rejection(&err, format)?;
            Ok(PlanStatus::Rejected)
        }
    }
}

fn print_plan(plan: &InstallPlan, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(plan)?;
            if let Some(map) = value.as_object_mut() {
                map.insert("fingerprint".to_string(), plan.fingerprint().into());
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!(
                "{} ({}): {} file(s)",
                plan.family.label(),
                plan.layout,
                plan.instructions.len()
            );
            for instruction in &plan.instructions {
                if instruction.source == instruction.destination {
                    println!("  {}", instruction.source);
                } else {
                    println!("  {} -> {}", instruction.source, instruction.destination);
                }
            }
            println!("fingerprint {}", plan.fingerprint());
        }
    }
    Ok(())
}

fn print_rejection(err: &InstallError, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let rejection = Rejection {
                kind: err.kind(),
                error: err.to_string(),
            };
            eprintln!("{}", serde_json::to_string_pretty(&rejection)?);
        }
        OutputFormat::Text => eprintln!("Rejected ({}): {err}", err.kind()),
    }
    Ok(())
}

fn print_help() {
    println!("redsmith v{}", env!("CARGO_PKG_VERSION"));
    println!("Usage:");
    println!("  redsmith detect <path>           List mod families found in a folder or .zip");
    println!("  redsmith plan <path>             Print the install plan");
    println!();
    println!("Plan options:");
    println!("  --family <redmod|preset>         Family to plan for (default: first detected)");
    println!("  --name <label>                   Mod name used in warnings");
    println!();
    println!("Global options:");
    println!("  --format <json|text>             Output format");
    println!("  --config <file>                  Layout config (default: per-user layout.json)");
    println!("  -v, -vv                          Increase log verbosity");
    println!("  -h, --help                       Show help");
    println!("  -V, --version                    Show version");
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
