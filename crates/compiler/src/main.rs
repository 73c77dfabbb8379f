use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use flatgen::{
    emit, format_diagnostics, translate_file, EmitFormat, TranslatorError, TranslatorOptions,
};
use flatgen_project::{discover_project, load_project_from_manifest, Project};
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Lowers nested native declarations into flat structure definitions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Declaration tree to translate (JSON); defaults to the manifest's input
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file; defaults to the manifest's output, then stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: listing or json
    #[arg(long)]
    emit: Option<EmitFormat>,

    /// Explicit path to a flatgen.toml manifest
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Fail when any warning is produced
    #[arg(long)]
    deny_warnings: bool,
}

/// Inputs of one run after merging the manifest with the command line
#[derive(Debug)]
struct Invocation {
    input: PathBuf,
    output: Option<PathBuf>,
    emit: EmitFormat,
}

impl Args {
    fn project(&self) -> Result<Option<Project>> {
        if let Some(manifest) = &self.manifest {
            return load_project_from_manifest(manifest).map(Some);
        }
        let start = match &self.input {
            Some(input) => input.clone(),
            None => std::env::current_dir().context("Failed to read current directory")?,
        };
        discover_project(&start)
    }

    /// Command-line flags take precedence over manifest values
    fn resolve(self) -> Result<Invocation> {
        let project = self.project()?;
        if let Some(project) = &project {
            debug!(
                "Using project '{}' from {}",
                project.name,
                project.manifest_path.display()
            );
        }

        let input = match (self.input, &project) {
            (Some(input), _) => input,
            (None, Some(project)) => project.input_path(),
            (None, None) => bail!("No --input given and no flatgen.toml found"),
        };
        let output = self
            .output
            .or_else(|| project.as_ref().and_then(Project::output_path));
        let emit = self
            .emit
            .or_else(|| project.as_ref().map(|p| p.emit))
            .unwrap_or_default();

        Ok(Invocation {
            input,
            output,
            emit,
        })
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let options = TranslatorOptions {
        deny_warnings: args.deny_warnings,
    };
    let invocation = args.resolve()?;
    info!("Reading declarations: {}", invocation.input.display());

    let output = match translate_file(&invocation.input, &options) {
        Ok(output) => output,
        Err(TranslatorError::WarningsDenied(diagnostics)) => {
            eprintln!("{}", format_diagnostics(&diagnostics));
            eprintln!("{}", diagnostics.summary());
            bail!(
                "{} warning(s) denied by --deny-warnings",
                diagnostics.errors().len()
            );
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to translate {}", invocation.input.display()));
        }
    };

    if !output.diagnostics.is_empty() {
        eprintln!("{}", format_diagnostics(&output.diagnostics));
        eprintln!("{}", output.diagnostics.summary());
    }

    let rendered = emit(&output.units, invocation.emit)?;
    match &invocation.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} units to {}", output.units.len(), path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
