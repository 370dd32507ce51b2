use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use setenv_cli::config::{Configuration, HOST_CONFIG_FILE, HostOptions, StageSignals, load_host_config};
use setenv_cli::env::OsEnvironment;
use setenv_cli::exec::{execute_command, resolve_command};
use setenv_cli::host::{DefaultHost, LOG_PREFIX, StdFileSystem};
use setenv_cli::resolve::resolve_env_path;
use setenv_cli::{RunReport, run as run_setenv};

#[derive(Parser)]
#[command(name = "setenv")]
#[command(
	author,
	version,
	about = "Load stage-specific .env files into the environment"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Host configuration file with a [dotenv] table
	#[arg(long, short, value_name = "PATH", default_value = HOST_CONFIG_FILE, global = true)]
	config: PathBuf,

	/// Stage to load when NODE_ENV, STAGE and stage are unset
	#[arg(long, global = true)]
	stage: Option<String>,

	/// Fallback stage, used when --stage is not given either
	#[arg(long, global = true)]
	env: Option<String>,

	/// Log variable values as well as names
	#[arg(long, global = true)]
	debug: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Load the dotenv file and print the merged variables
	Show,
	/// Print which dotenv file would be loaded
	Path,
	/// Load the dotenv file, then run a command with the merged environment
	Run {
		/// Command and arguments to run
		#[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
		args: Vec<String>,
	},
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_tracing();

	let options = HostOptions {
		stage: cli.stage.clone(),
		env: cli.env.clone(),
		debug: cli.debug,
	};
	let config = build_configuration(&cli, &options)?;

	match cli.command {
		Commands::Show => handle_show(&config),
		Commands::Path => handle_path(&config),
		Commands::Run { ref args } => handle_run(&config, args),
	}
}

fn init_tracing() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(std::io::stderr().is_terminal())
		.with_target(false)
		.without_time()
		.init();
}

fn build_configuration(cli: &Cli, options: &HostOptions) -> Result<Configuration> {
	let host_config = load_host_config(&cli.config)
		.with_context(|| format!("Failed to load {}", cli.config.display()))?;
	let signals = StageSignals::collect(&OsEnvironment::new(), options);
	tracing::debug!(stage = %signals.resolve_stage(), "resolved stage");

	host_config
		.dotenv
		.into_configuration(&signals)
		.map_err(|e| anyhow::anyhow!("{LOG_PREFIX}{e}"))
}

fn load(config: &Configuration) -> Result<RunReport> {
	let mut env = OsEnvironment::new();
	Ok(run_setenv(&DefaultHost::new(), config, &mut env)?)
}

fn handle_show(config: &Configuration) -> Result<ExitCode> {
	let report = load(config)?;
	tracing::debug!(stage = %report.stage, vars = report.mapping.len(), "loaded");
	for (name, value) in report.mapping.iter() {
		println!("{name}={value}");
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_path(config: &Configuration) -> Result<ExitCode> {
	let resolved = resolve_env_path(config.dir_path.as_deref(), &config.stage, &StdFileSystem)
		.map_err(|e| anyhow::anyhow!("{LOG_PREFIX}{e}"))?;
	if resolved.staged {
		tracing::info!("{LOG_PREFIX}Using the {} stage file", config.stage);
	} else {
		tracing::info!("{LOG_PREFIX}No {} stage file, using the base file", config.stage);
	}
	println!("{}", resolved.path.display());
	Ok(ExitCode::SUCCESS)
}

fn handle_run(config: &Configuration, args: &[String]) -> Result<ExitCode> {
	load(config)?;

	let command_name = &args[0];
	let binary = resolve_command(command_name)
		.ok_or_else(|| anyhow::anyhow!("Command not found: {}", command_name))?;

	let status = execute_command(&binary, &args[1..])
		.with_context(|| format!("Failed to execute: {}", binary.display()))?;

	let exit_code = status.code().unwrap_or(1);
	Ok(ExitCode::from(exit_code as u8))
}
