//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "nimbus")]
#[command(author, version, long_about = None)]
#[command(about = "Weather lookup with locally saved preferences")]
pub struct Cli {
    /// Config file (defaults to <config dir>/nimbus/config.toml)
    #[arg(short, long, global = true, env = "NIMBUS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Finish first-run setup with a default location
    Onboard {
        /// City to use as the default location
        location: String,
    },

    /// Show onboarding state and saved preferences
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the default location
    Location {
        #[command(subcommand)]
        action: LocationAction,
    },

    /// Turn weather tracking for the saved location on or off
    Track {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Set the unit: 0 = metric, 1 = kelvin, 2 = imperial
    Unit {
        selection: String,
    },

    /// Show current weather
    Weather {
        /// Look up this city instead of the saved location
        #[arg(long)]
        city: Option<String>,

        /// Show the last cached result without fetching
        #[arg(long)]
        cached: bool,
    },

    /// Show today's three-hour forecast for the saved location
    Forecast {
        /// Show the last cached result without fetching
        #[arg(long)]
        cached: bool,
    },

    /// Search cities by name
    Cities {
        term: String,
    },

    /// Report a device position
    #[command(allow_negative_numbers = true)]
    Position {
        latitude: f64,
        longitude: f64,
    },

    /// Erase all saved preferences and cached weather
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum LocationAction {
    /// Save a new default location
    Set { name: String },
    /// Print the default location
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}
