mod config;
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
mod dump;
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
mod gesture;
mod selection;
#[cfg(target_os = "macos")]
#[allow(unexpected_cfgs)]
mod tap;
mod target;

use clap::Parser;

use config::{AppsCommand, Cli, Command, Config};
use selection::AppSelection;

/// Exit code when the event tap cannot be installed.
const EXIT_TAP_FAILED: i32 = 1;
/// Exit code for invalid configuration.
const EXIT_CONFIG: i32 = 2;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let default_filter = match cli.command {
        Some(Command::Apps { .. }) => "warn",
        _ => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = match Config::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(EXIT_CONFIG);
    }

    match cli.command {
        Some(Command::Apps { action }) => run_apps(&config, action),
        Some(Command::Dump) => run_dump(),
        None => run_translator(&config),
    }
}

fn run_apps(config: &Config, action: AppsCommand) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let path = &config.apps_file;
    let mut selection = AppSelection::load(path)?;

    match action {
        AppsCommand::List => {
            for app in selection.iter() {
                println!("{}", app);
            }
            return Ok(());
        }
        AppsCommand::Add { name } => {
            let name = checked_name(&name)?;
            if !selection.insert(name) {
                log::info!("{} is already selected", name);
            }
        }
        AppsCommand::Remove { name } => {
            let name = checked_name(&name)?;
            if !selection.remove(name) {
                eprintln!("{} is not selected", name);
            }
        }
        AppsCommand::Toggle { name } => {
            let name = checked_name(&name)?;
            let selected = selection.toggle(name);
            println!("{}: {}", name, if selected { "on" } else { "off" });
        }
    }

    selection.save(path)?;
    log::info!("Saved {} application(s) to {}", selection.len(), path.display());
    Ok(())
}

fn checked_name(name: &str) -> Result<&str, &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Application name must not be empty");
    }
    Ok(name)
}

#[cfg(target_os = "macos")]
fn run_translator(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let selection = config.load_selection()?;

    log::info!(
        "deep-click starting (target={}, apps={}, selection={})",
        config.target,
        if selection.is_empty() {
            "none".to_string()
        } else {
            selection.iter().collect::<Vec<_>>().join(", ")
        },
        config.apps_file.display()
    );

    if !tap::accessibility_trusted() {
        log::warn!("Process is not trusted for Accessibility, the event tap will likely be refused");
    }

    let translator = gesture::Translator::new(config.target);
    let event_tap = match tap::EventTap::install(translator, selection) {
        Ok(event_tap) => event_tap,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Failed to create event tap: {}", e);
            eprintln!("Allow this program in System Settings > Privacy & Security > Accessibility and try again.");
            std::process::exit(EXIT_TAP_FAILED);
        }
    };

    log::info!("Start handling deep clicks in selected apps");
    event_tap.run();
    Ok(())
}

#[cfg(target_os = "macos")]
fn run_dump() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Err(e) = dump::run_dump() {
        eprintln!("{}", e);
        eprintln!("Allow this program in System Settings > Privacy & Security > Input Monitoring and try again.");
        std::process::exit(EXIT_TAP_FAILED);
    }
    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn run_translator(_config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    unsupported_platform()
}

#[cfg(not(target_os = "macos"))]
fn run_dump() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    unsupported_platform()
}

#[cfg(not(target_os = "macos"))]
fn unsupported_platform() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    eprintln!("Failed to create event tap: force click translation needs macOS event taps");
    std::process::exit(EXIT_TAP_FAILED);
}
