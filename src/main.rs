mod cli;

use std::process::ExitCode;

use clap::Parser;
use nimbus_core::{App, AppError, Config};
use nimbus_services::{Route, SettingOutcome};
use nimbus_weather::format;
use nimbus_weather::{CachedSnapshot, ForecastEntry, ForecastSlot};

use crate::cli::{Cli, Commands, LocationAction};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = nimbus_core::init() {
        eprintln!("{:#}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Other(e)) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::debug!("Command failed: {}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let (config, _) = Config::load_validated(cli.config.as_deref())?;
    let app = App::new(config)?;

    match cli.command {
        Commands::Onboard { location } => {
            app.settings().bootstrap_onboarding(&location)?;
            println!("Data saved!");
        }
        Commands::Status { json } => {
            let snapshot = app.settings().snapshot()?;
            if json {
                let text = serde_json::to_string_pretty(&snapshot).map_err(anyhow::Error::from)?;
                println!("{}", text);
            } else {
                let landing = match app.settings().landing_page()? {
                    Route::Weather => "weather",
                    Route::Home | Route::Root => "onboarding",
                };
                println!("Landing page:   {}", landing);
                println!(
                    "Location:       {}",
                    snapshot.default_location.as_deref().unwrap_or("(none)")
                );
                let tracking = if snapshot.tracking_enabled { "on" } else { "off" };
                println!("Tracking:       {}", tracking);
                println!(
                    "Unit:           {} ({})",
                    snapshot.unit_code,
                    snapshot.api_units.temperature_symbol()
                );
            }
        }
        Commands::Location { action } => match action {
            LocationAction::Set { name } => {
                let existed = app.settings().default_location()?.is_some();
                app.settings().set_default_location(&name)?;
                if existed {
                    println!("Location updated successfully!");
                } else {
                    println!("Location saved successfully!");
                }
            }
            LocationAction::Show => match app.settings().default_location()? {
                Some(location) => println!("{}", location),
                None => println!("No saved location found!"),
            },
        },
        Commands::Track { state } => {
            let outcome = app.settings().set_tracking_enabled(state.enabled())?;
            let message = match (outcome, state.enabled()) {
                (SettingOutcome::Created, true) => "Saved location would be tracked by default!",
                (SettingOutcome::Updated, true) => "Saved location would be tracked!",
                (_, false) => "Saved location would not be tracked!",
            };
            println!("{}", message);
        }
        Commands::Unit { selection } => {
            let existed = app.settings().stored_unit()?.is_some();
            let units = app.settings().set_unit(&selection)?;
            if existed {
                println!("Weather unit updated successfully ({})", units.temperature_symbol());
            } else {
                println!("Weather unit stored successfully ({})", units.temperature_symbol());
            }
        }
        Commands::Weather { city, cached } => {
            app.settings().require_onboarded()?;
            let snapshot = match (city, cached) {
                (_, true) => app.cache().snapshot()?,
                (Some(city), false) => {
                    print_tracking_hint(&app)?;
                    app.refresh_city(&city).await?
                }
                (None, false) => app.refresh_saved().await?,
            };
            let symbol = app.settings().api_units()?.temperature_symbol();
            print_snapshot(&snapshot, symbol);
        }
        Commands::Forecast { cached } => {
            app.settings().require_onboarded()?;
            if cached {
                print_cached_forecast(&app.cache().forecast_slots()?);
            } else {
                print_forecast(&app.refresh_forecast().await?);
            }
        }
        Commands::Cities { term } => {
            print_tracking_hint(&app)?;
            let cities = app.cities()?.search(&term).await?;
            if cities.is_empty() {
                println!("No matching cities");
            }
            for city in cities {
                println!(
                    "{:<24} {:<3} {:>9.4} {:>10.4}",
                    city.name, city.country, city.latitude, city.longitude
                );
            }
        }
        Commands::Position { latitude, longitude } => {
            match app.on_position(latitude, longitude).await? {
                Some(snapshot) => {
                    let symbol = app.settings().api_units()?.temperature_symbol();
                    print_snapshot(&snapshot, symbol);
                }
                None => println!("Position saved"),
            }
        }
        Commands::Reset { yes } => {
            if !yes {
                return Err(anyhow::anyhow!("Refusing to reset without --yes").into());
            }
            app.settings().reset_all()?;
            println!("Factory settings restored");
        }
    }

    Ok(())
}

fn print_snapshot(snapshot: &CachedSnapshot, symbol: &str) {
    println!("{}", format::today_label());
    println!("{}", snapshot.location);
    println!(
        "{}{}  {} ({})",
        format::round_up(snapshot.degrees),
        symbol,
        snapshot.description,
        snapshot.condition().description()
    );
    println!("Wind:     {}", snapshot.wind);
    println!("Humidity: {}", snapshot.humidity);
    println!("Pressure: {}", snapshot.pressure);
}

fn print_tracking_hint(app: &App) -> Result<(), AppError> {
    if let Some(hint) = app.settings().tracking_hint()? {
        println!("{}", hint);
    }
    Ok(())
}

fn print_forecast(days: &[Vec<ForecastEntry>]) {
    println!("Your daily forecast");
    for (index, entries) in days.iter().enumerate() {
        println!();
        println!("Day {}", index + 1);
        for entry in entries {
            println!(
                "{:>6}  {:>4}  {:>4}  {}",
                entry.time, entry.code, entry.temperature, entry.description
            );
        }
    }
}

fn print_cached_forecast(slots: &[ForecastSlot]) {
    println!("Your daily forecast");
    for slot in slots {
        println!(
            "{:>6}  {:>4}  {:>4}  {}",
            slot.time,
            slot.icon,
            slot.temperature,
            slot.title.as_deref().unwrap_or("")
        );
    }
}
