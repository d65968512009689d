use crate::cli::{Cli, Commands, OutputFormat};
use crate::compose::{Analysis, ComposeOptions, ScenarioComposer};
use crate::errors::LitmusError;
use crate::model::{SourceClass, TestScenario};
use crate::parser::CSharpParser;
use crate::utils::config::{self, Config};
use crate::utils::file_walker::{self, ComponentPair};
use crate::utils::table;
use clap::CommandFactory;
use clap_complete::generate;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Component name used when the class text declares no class.
pub const UNKNOWN_COMPONENT: &str = "UnknownComponent";

#[derive(Debug, Serialize)]
struct GenerateReport<'a> {
    component: &'a str,
    class_file: String,
    markup_file: String,
    scenarios: Vec<TestScenario>,
}

/// Inputs of one component run, read into memory.
struct Sources {
    class_path: PathBuf,
    markup_path: PathBuf,
    class_text: String,
    markup_text: String,
}

/// Run the CLI logic in-process.
///
/// Returns an exit code (0 = success).
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    // An explicit --config must load; the implicit ./litmus.toml is optional.
    let cfg = match cli.config.as_deref() {
        Some(path) => match config::read_config(path) {
            Ok(cfg) => cfg,
            Err(e) => return report(&e),
        },
        None => config::load_config_near(Path::new(".")).unwrap_or_default(),
    };
    let mut options = ComposeOptions::default();
    cfg.apply(&mut options);

    let result = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "litmus", &mut io::stdout());
            Ok(())
        }
        Commands::Generate { class_file, markup_file, dir, no_ignore, component, format, output } => {
            let format = resolve_format(format, &cfg);
            resolve_sources(class_file, markup_file, &dir, no_ignore, cli.quiet).and_then(|src| {
                run_generate(&options, &src, component.as_deref(), format, output.as_deref())
            })
        }
        Commands::Inspect { class_file, markup_file, dir, no_ignore, format } => {
            let format = resolve_format(format, &cfg);
            resolve_sources(class_file, markup_file, &dir, no_ignore, cli.quiet)
                .and_then(|src| run_inspect(&options, &src, format))
        }
        Commands::Batch { path, no_ignore, out_dir } => {
            run_batch(&options, &path, no_ignore, out_dir.as_deref(), cli.quiet)
        }
    };

    match result {
        Ok(()) => 0,
        Err(e) => report(&e),
    }
}

/// Print `e` on stderr and return the failure exit code.
fn report(e: &LitmusError) -> i32 {
    eprintln!("Error: {e}");
    if matches!(e, LitmusError::Discovery { .. }) {
        eprintln!("Please specify the file paths like this:");
        eprintln!("  litmus generate <ComponentClass.cs> <ComponentRazor.razor>");
    }
    1
}

fn resolve_format(flag: Option<OutputFormat>, cfg: &Config) -> OutputFormat {
    flag.unwrap_or(match cfg.default_format() {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Text,
    })
}

fn resolve_sources(
    class_file: Option<PathBuf>,
    markup_file: Option<PathBuf>,
    dir: &Path,
    no_ignore: bool,
    quiet: bool,
) -> Result<Sources, LitmusError> {
    let (class_path, markup_path) = match (class_file, markup_file) {
        (Some(c), Some(m)) => (c, m),
        _ => {
            let (c, m) = file_walker::discover_pair(dir, no_ignore)?;
            if !quiet {
                eprintln!("Auto-discovered files:\n  Class: {}\n  Razor: {}", c.display(), m.display());
            }
            (c, m)
        }
    };
    if !class_path.is_file() {
        return Err(LitmusError::MissingFile { kind: "Class", path: class_path });
    }
    if !markup_path.is_file() {
        return Err(LitmusError::MissingFile { kind: "Razor", path: markup_path });
    }
    tracing::info!(class = %class_path.display(), markup = %markup_path.display(), "processing files");
    let class_text = fs::read_to_string(&class_path)?;
    let markup_text = fs::read_to_string(&markup_path)?;
    Ok(Sources { class_path, markup_path, class_text, markup_text })
}

fn component_name(explicit: Option<&str>, options: &ComposeOptions, class_text: &str) -> String {
    explicit.map(str::to_string).unwrap_or_else(|| {
        CSharpParser::with_parameter_marker(options.parameter_marker.clone())
            .detect_class_name(class_text)
            .unwrap_or_else(|| UNKNOWN_COMPONENT.to_string())
    })
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), LitmusError> {
    match output {
        Some(path) => fs::write(path, content).map_err(LitmusError::from),
        None => {
            print!("{content}");
            Ok(())
        }
    }
}

fn run_generate(
    options: &ComposeOptions,
    src: &Sources,
    component: Option<&str>,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), LitmusError> {
    let name = component_name(component, options, &src.class_text);
    let analysis = Analysis::run(options, &src.class_text, &src.markup_text);
    let composer = ScenarioComposer::new(options.clone());
    let scenarios = composer.compose(analysis.class.as_ref(), &name, &analysis.facts);
    let content = match format {
        OutputFormat::Text => composer.render(&scenarios),
        OutputFormat::Json => {
            let report = GenerateReport {
                component: &name,
                class_file: src.class_path.display().to_string(),
                markup_file: src.markup_path.display().to_string(),
                scenarios,
            };
            let mut s = serde_json::to_string_pretty(&report)?;
            s.push('\n');
            s
        }
    };
    write_or_print(output, &content)
}

fn member_rows(class: &SourceClass) -> Vec<Vec<String>> {
    class
        .members
        .iter()
        .map(|m| {
            vec![
                m.order.to_string(),
                m.name.clone(),
                (if m.is_bindable_parameter { "yes" } else { "no" }).to_string(),
            ]
        })
        .collect()
}

fn run_inspect(options: &ComposeOptions, src: &Sources, format: OutputFormat) -> Result<(), LitmusError> {
    let analysis = Analysis::run(options, &src.class_text, &src.markup_text);
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }
    match &analysis.class {
        Some(class) => {
            println!("Class: {}", class.name);
            println!("{}", table::render(&["Order", "Member", "Parameter"], &member_rows(class)));
        }
        None => println!("<no class declaration found>"),
    }
    if analysis.facts.is_empty() {
        println!("<no @ref attributes found>");
    } else {
        let rows: Vec<Vec<String>> = analysis
            .facts
            .iter()
            .map(|f| {
                vec![
                    f.reference.clone(),
                    f.key.clone(),
                    f.value.type_hint().to_string(),
                    f.value.literal.clone(),
                ]
            })
            .collect();
        println!("{}", table::render(&["Reference", "Attribute", "Type", "Literal"], &rows));
    }
    Ok(())
}

fn generate_pair(options: &ComposeOptions, pair: &ComponentPair) -> Result<(String, String), LitmusError> {
    let class_text = fs::read_to_string(&pair.class_path)?;
    let markup_text = fs::read_to_string(&pair.markup_path)?;
    let detected = CSharpParser::with_parameter_marker(options.parameter_marker.clone())
        .detect_class_name(&class_text);
    let name = detected.unwrap_or_else(|| pair.name.clone());
    let text = crate::compose::generate_with(options, &class_text, &markup_text, &name);
    Ok((name, text))
}

fn target_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}Tests.cs"))
}

/// Refuse to write when two components would land on the same file.
fn check_unique_targets(
    dir: &Path,
    pairs: &[ComponentPair],
    results: &[Result<(String, String), LitmusError>],
) -> Result<(), LitmusError> {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::new();
    for (pair, result) in pairs.iter().zip(results) {
        let Ok((name, _)) = result else {
            continue;
        };
        let path = target_path(dir, name);
        if let Some(first) = seen.get(&path) {
            return Err(LitmusError::DuplicateOutput {
                path,
                first: first.display().to_string(),
                second: pair.markup_path.display().to_string(),
            });
        }
        seen.insert(path, &pair.markup_path);
    }
    Ok(())
}

fn run_batch(
    options: &ComposeOptions,
    root: &Path,
    no_ignore: bool,
    out_dir: Option<&Path>,
    quiet: bool,
) -> Result<(), LitmusError> {
    let pairs = file_walker::component_pairs(root, no_ignore);
    tracing::info!(root = %root.display(), components = pairs.len(), "batch discovery");
    if pairs.is_empty() {
        return Err(LitmusError::NoComponents { dir: root.to_path_buf() });
    }
    // Each job owns its inputs and outputs; results are emitted in discovery order.
    let results: Vec<Result<(String, String), LitmusError>> =
        pairs.par_iter().map(|pair| generate_pair(options, pair)).collect();
    if let Some(dir) = out_dir {
        check_unique_targets(dir, &pairs, &results)?;
        fs::create_dir_all(dir)?;
    }

    let mut failures = 0usize;
    for (pair, result) in pairs.iter().zip(results) {
        match result {
            Ok((name, text)) => match out_dir {
                Some(dir) => {
                    let path = target_path(dir, &name);
                    fs::write(&path, text)?;
                    if !quiet {
                        eprintln!("Wrote {}", path.display());
                    }
                }
                None => {
                    println!("// ---- {name} ({}) ----", pair.markup_path.display());
                    print!("{text}");
                    println!();
                }
            },
            Err(e) => {
                failures += 1;
                eprintln!("Failed {}: {e}", pair.markup_path.display());
            }
        }
    }
    if !quiet {
        eprintln!("Batch completed: {} component(s), {failures} failure(s)", pairs.len());
    }
    if failures > 0 {
        return Err(LitmusError::BatchFailed { failures });
    }
    Ok(())
}
