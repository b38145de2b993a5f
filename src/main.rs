use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use transmission_operator::charm::TransmissionCharm;
use transmission_operator::config::CharmConfig;
use transmission_operator::harness::RecordingIngress;
use transmission_operator::pebble::{ContainerApi, LocalContainer};
use transmission_operator::state::{FileStateStore, StateStore};
use transmission_operator::status::UnitStatus;
use transmission_operator::Error;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dispatch a config-changed notification against a simulated unit
    ConfigChanged(EventArgs),
    /// Invoke the get-password action
    GetPassword(EventArgs),
    /// Show version information
    Version,
}

#[derive(Parser, Debug)]
struct EventArgs {
    /// Charm configuration file (YAML); omit for an empty configuration
    #[arg(long, env = "CHARM_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the unit's durable state and simulated container
    #[arg(long, env = "CHARM_STATE_DIR", default_value = ".transmission-operator")]
    state_dir: PathBuf,

    /// Application name, used for ingress defaults and stored-state init
    #[arg(long, env = "CHARM_APP_NAME", default_value = "transmission")]
    app_name: String,
}

fn main() -> Result<(), Error> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();

    let args = Args::parse();
    match args.command {
        Commands::Version => {
            println!("transmission-operator v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::ConfigChanged(event) => run_config_changed(event),
        Commands::GetPassword(event) => run_get_password(event),
    }
}

fn load_config(path: Option<&Path>) -> Result<CharmConfig, Error> {
    match path {
        Some(path) => Ok(serde_yaml::from_str(&fs::read_to_string(path)?)?),
        None => Ok(CharmConfig::default()),
    }
}

fn container_path(state_dir: &Path) -> PathBuf {
    state_dir.join("container.yaml")
}

fn load_container(state_dir: &Path) -> Result<LocalContainer, Error> {
    let path = container_path(state_dir);
    if path.exists() {
        Ok(serde_yaml::from_str(&fs::read_to_string(path)?)?)
    } else {
        Ok(LocalContainer::new())
    }
}

fn run_config_changed(args: EventArgs) -> Result<(), Error> {
    let config = load_config(args.config.as_deref())?;
    let store = FileStateStore::new(&args.state_dir);
    let state = store.load_or_init(&args.app_name)?;
    let container = load_container(&args.state_dir)?;

    let mut charm = TransmissionCharm::new(
        &args.app_name,
        &config,
        state,
        container,
        RecordingIngress::default(),
    )?;
    charm.on_config_changed(&config)?;

    let status = charm.status().cloned();
    let (state, container, ingress) = charm.into_parts();

    store.save(&state)?;
    fs::write(
        container_path(&args.state_dir),
        serde_yaml::to_string(&container)?,
    )?;

    match status {
        Some(UnitStatus::Active) => info!("unit status: active"),
        Some(UnitStatus::Blocked(reason)) => info!("unit status: blocked ({reason})"),
        None => {}
    }
    if let Some(push) = ingress.pushes.last() {
        println!("ingress: {}", serde_json::to_string(push)?);
    }
    print!("{}", serde_yaml::to_string(&container.get_plan()?)?);
    Ok(())
}

fn run_get_password(args: EventArgs) -> Result<(), Error> {
    let config = load_config(args.config.as_deref())?;
    let store = FileStateStore::new(&args.state_dir);
    let state = store.load_or_init(&args.app_name)?;

    let charm = TransmissionCharm::new(
        &args.app_name,
        &config,
        state,
        LocalContainer::new(),
        RecordingIngress::default(),
    )?;
    let result = charm.on_get_password_action(&config);
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
