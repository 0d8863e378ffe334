use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use scg_core::config::{self, CONFIG_FILE_NAME, ScgConfig};
use scg_core::history::{HistoryStore, JsonFileStore};
use scg_core::inspect::{DirectoryInspector, FsInspector};
use scg_core::state::rederive_jvm_params;
use scg_core::{BlockSignal, ConfigState, Format, SwaggerFormData};

#[derive(Parser)]
#[command(
    name = "scg",
    about = "Edit the settings handed to the Swagger client-code generator",
    version
)]
struct Cli {
    /// History file (overrides the config file and the default location)
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Update the last configuration and save it
    Configure {
        /// URL of the swagger.json to generate from
        #[arg(short, long)]
        url: Option<String>,

        /// Output format, by id or label (see `scg formats`)
        #[arg(short, long)]
        format: Option<Format>,

        /// Folder where files will be generated
        #[arg(short, long)]
        output: Option<String>,

        /// JVM package, e.g. com.acme.api
        #[arg(long)]
        package_path: Option<String>,

        /// Path to build.gradle or build.gradle.kts
        #[arg(long)]
        gradle_build: Option<String>,

        /// Controller to include in the TypeScript REST test suite (repeatable)
        #[arg(long = "controller")]
        controllers: Vec<String>,

        /// Print the result without saving it
        #[arg(long)]
        dry_run: bool,

        /// Print JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// Print the saved configuration
    Show {
        /// Print JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// List the available output formats
    Formats,

    /// Show the JVM parameters derived from a folder
    Inspect {
        /// Output folder to inspect
        dir: PathBuf,
    },

    /// Initialize a new scg configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Edits requested on the command line, applied in field order.
struct Edits {
    url: Option<String>,
    format: Option<Format>,
    output: Option<String>,
    package_path: Option<String>,
    gradle_build: Option<String>,
    controllers: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Configure {
            url,
            format,
            output,
            package_path,
            gradle_build,
            controllers,
            dry_run,
            json,
        } => {
            let edits = Edits {
                url,
                format,
                output,
                package_path,
                gradle_build,
                controllers,
            };
            cmd_configure(cli.history, edits, dry_run, json)
        }

        Commands::Show { json } => cmd_show(cli.history, json),

        Commands::Formats => {
            for format in Format::ALL {
                println!("{:<22} {}", format.id(), format.label());
            }
            Ok(())
        }

        Commands::Inspect { dir } => {
            let params = FsInspector.inspect(&dir);
            print!("{}", serde_yaml_ng::to_string(&params)?);
            Ok(())
        }

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "scg", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<ScgConfig> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let cfg = config::load_config(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    Ok(cfg.unwrap_or_default())
}

fn open_store(history: Option<PathBuf>, cfg: &ScgConfig) -> Result<JsonFileStore> {
    let path = history
        .or_else(|| cfg.history_path())
        .context("no history location: pass --history or set history_file in .scg.yaml")?;
    log::debug!("using history {}", path.display());
    Ok(JsonFileStore::new(path))
}

fn print_data(data: &SwaggerFormData, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(data)?);
    } else {
        print!("{}", serde_yaml_ng::to_string(data)?);
    }
    Ok(())
}

fn cmd_configure(history: Option<PathBuf>, edits: Edits, dry_run: bool, json: bool) -> Result<()> {
    let cfg = try_load_config()?;
    let store = open_store(history, &cfg)?;

    let mut state = ConfigState::from_history(FsInspector, &store);
    if cfg.rederive_on_output_change {
        state.on_directory_change(Format::JavaRetrofit2, rederive_jvm_params);
    }
    state.on_block_signal(|signal, _| match signal {
        BlockSignal::Activate(block) => log::info!("showing {:?} parameters", block),
        BlockSignal::Deactivate(block) => log::info!("hiding {:?} parameters", block),
    });

    apply_edits(&mut state, edits)?;

    let data = if dry_run {
        state.build()
    } else {
        let data = state
            .confirm(&store)
            .with_context(|| format!("failed to save {}", store.path().display()))?;
        eprintln!("Saved {}", store.path().display());
        data
    };

    print_data(&data, json)
}

fn apply_edits(state: &mut ConfigState, edits: Edits) -> Result<()> {
    if let Some(url) = edits.url {
        state.set_url(url);
    }
    if let Some(format) = edits.format {
        state.set_format(format);
    }
    if let Some(output) = edits.output {
        state.set_output(output);
    }

    if edits.package_path.is_some() || edits.gradle_build.is_some() {
        let format = state.format();
        let jvm = state
            .jvm_mut()
            .filter(|_| format.is_jvm())
            .with_context(|| format!("{format} has no JVM parameters"))?;
        if let Some(package_path) = edits.package_path {
            jvm.package_path = package_path;
        }
        if let Some(gradle_build) = edits.gradle_build {
            jvm.gradle_build_location = gradle_build;
        }
    }

    if !edits.controllers.is_empty() {
        let format = state.format();
        let unit = state
            .type_script_test_unit_mut()
            .filter(|_| format == Format::TypeScriptRestTest)
            .with_context(|| format!("{format} has no controller list"))?;
        unit.controllers = edits.controllers;
    }

    Ok(())
}

fn cmd_show(history: Option<PathBuf>, json: bool) -> Result<()> {
    let cfg = try_load_config()?;
    let store = open_store(history, &cfg)?;
    match store
        .load()
        .with_context(|| format!("failed to read {}", store.path().display()))?
    {
        Some(data) => print_data(&data, json),
        None => {
            eprintln!("No saved configuration in {}", store.path().display());
            Ok(())
        }
    }
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
