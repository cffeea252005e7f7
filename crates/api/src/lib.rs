pub mod db;
pub mod routes;
pub mod service;
mod startup;
mod utils;

pub use db::{Database, DailyTemperature, ObservationAccess, ObservationData, PrecipReading};
pub use routes::*;
pub use service::{ClimateService, TemperatureSummary};
pub use startup::{app, build_app_state, AppState};
pub use utils::{get_config_info, get_log_level, setup_logger, Cli};
