use std::fs;
use std::path::Path;
use std::sync::Arc;

use heating_profiles::config::Config;
use heating_profiles::io::profiles::{HttpProfileStore, ProfileStore};
use heating_profiles::io::status::{BoostRequest, HttpStatusSource, StatusSource};
use heating_profiles::io::transport::{AuthenticatedTransport, BearerTransport};
use heating_profiles::logging;
use heating_profiles::profile::chunks::compress;
use heating_profiles::profile::Profile;
use log::{error, info};
use tokio::runtime::Builder;

const CONFIG_FILE: &str = "heating_profiles.toml";
const LOGGING_FILE: &str = "logging.env";

enum Command {
    Profiles,
    Status,
    Boost(BoostRequest),
}

fn parse_command(args: &[String]) -> Result<Command, String> {
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["profiles"] => Ok(Command::Profiles),
        ["status"] => Ok(Command::Status),
        ["boost", "heating"] => Ok(Command::Boost(BoostRequest::Heating)),
        ["boost", "water"] => Ok(Command::Boost(BoostRequest::HotWater)),
        ["boost", "cancel"] => Ok(Command::Boost(BoostRequest::Cancel)),
        other => Err(format!(
            "Unknown command {:?}. Usage: heating_profiles [profiles | status | boost heating|water|cancel]",
            other
        )),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_command(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let config = fs::read_to_string(CONFIG_FILE).expect("Unable to read config file. Is it missing?");
    let config: Config = toml::from_str(&config).expect("Error reading config file");

    let logging_handle = logging::init_logging(Path::new(LOGGING_FILE)).expect("Failed to initialize logging");

    let transport: Arc<dyn AuthenticatedTransport> =
        Arc::new(BearerTransport::from_config(&config).expect("Failed to read token"));

    let rt = Builder::new_current_thread()
        .enable_time()
        .enable_io()
        .build()
        .expect("Expected to be able to make runtime");

    let result = rt.block_on(async {
        match command {
            Command::Profiles => list_profiles(transport, &config).await,
            Command::Status => show_status(transport, &config).await,
            Command::Boost(request) => boost(transport, &config, request).await,
        }
    });

    if let Err(e) = result {
        error!("{}", e);
        drop(logging_handle);
        std::process::exit(1);
    }
}

async fn list_profiles(transport: Arc<dyn AuthenticatedTransport>, config: &Config) -> Result<(), String> {
    let store = HttpProfileStore::new(transport, config.get_api().clone());
    let profiles = store.list_profiles().await.map_err(|e| e.to_string())?;
    if profiles.is_empty() {
        info!("No profiles yet");
    }
    for profile in profiles.iter() {
        log_profile(profile);
    }
    Ok(())
}

fn log_profile(profile: &Profile) {
    let span = match profile.get_records().temperature_span() {
        Some((min, max)) => format!("{:.1}-{:.1}C", min, max),
        None => "no temperatures".to_owned(),
    };
    let days: Vec<&str> = profile.get_days().iter().map(|day| day.abbreviation()).collect();
    info!(
        "{} [{} to {}] {} ({})",
        profile,
        profile.get_from_date(),
        profile.get_to_date(),
        days.join(" "),
        span
    );
    for chunk in compress(profile.get_records().records()) {
        info!("    {}", chunk);
    }
}

async fn show_status(transport: Arc<dyn AuthenticatedTransport>, config: &Config) -> Result<(), String> {
    let source = HttpStatusSource::new(transport, config.get_api().clone());
    let status = source.get_status().await.map_err(|e| e.to_string())?;
    info!("Hello {}", status.get_user_name());
    info!("{}", status);
    if let Some(savings) = status.get_weekly_savings() {
        info!("Saved {:.2} this week", savings);
    }
    if let (Some(fraction), Some(level)) = (status.get_tank_fraction(), status.get_tank_level()) {
        info!("{} ({:.0}%)", level, fraction * 100.0);
    }
    Ok(())
}

async fn boost(
    transport: Arc<dyn AuthenticatedTransport>,
    config: &Config,
    wanted: BoostRequest,
) -> Result<(), String> {
    let source = HttpStatusSource::new(transport, config.get_api().clone());
    let current = source.get_status().await.map_err(|e| e.to_string())?.get_boost();
    let request = BoostRequest::toggle(current, wanted);
    source.set_boost(request).await.map_err(|e| e.to_string())?;
    info!("Boost is now {:?}", request.resulting_state());
    Ok(())
}
