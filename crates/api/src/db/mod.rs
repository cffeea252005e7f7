pub mod observations;
pub mod sqlite;

pub use observations::{DailyTemperature, ObservationAccess, ObservationData, PrecipReading};
pub use sqlite::Database;
