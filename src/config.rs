//! Service configuration.

use std::path::PathBuf;

use clap::Parser;

/// Runtime configuration, from flags or environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "fleetrate", version, about)]
pub struct Config {
    /// Directory holding the booking and tariff CSV tables.
    #[arg(long, env = "FLEETRATE_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory holding encoder and model artifacts
    /// (`encoders/` and `models/` subdirectories).
    #[arg(long, env = "FLEETRATE_ARTIFACTS_DIR", default_value = "artifacts")]
    pub artifacts_dir: PathBuf,

    /// Bookings table filename inside the data directory.
    #[arg(long, env = "FLEETRATE_BOOKINGS_FILE", default_value = "2024 Bookings.csv")]
    pub bookings_file: String,

    /// Bind host.
    #[arg(long, env = "FLEETRATE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Bind port.
    #[arg(long, env = "FLEETRATE_PORT", default_value_t = 8080)]
    pub port: u16,
}

impl Config {
    /// Path to the bookings CSV.
    pub fn bookings_path(&self) -> PathBuf {
        self.data_dir.join(&self.bookings_file)
    }

    /// Path to the tariff CSV.
    pub fn tariffs_path(&self) -> PathBuf {
        self.data_dir.join("Diff Tariffs.csv")
    }

    /// Path to the pre-transformed dataset used for the depot list.
    pub fn transformed_path(&self) -> PathBuf {
        self.data_dir.join("transformed_dataset.csv")
    }

    /// Directory holding fitted encoders and scalers.
    pub fn encoders_dir(&self) -> PathBuf {
        self.artifacts_dir.join("encoders")
    }

    /// Directory holding pretrained model artifacts.
    pub fn models_dir(&self) -> PathBuf {
        self.artifacts_dir.join("models")
    }
}
