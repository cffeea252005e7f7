//! Read-only access to the station observation dataset.
//!
//! Two tables back the store: `station` (code, optional name, coordinates,
//! elevation) and `measurement` (station code, date, precipitation,
//! temperature). Dates are TEXT in fixed-width `YYYY-MM-DD` form, so every
//! date filter below relies on lexicographic comparison.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
}

#[async_trait]
pub trait ObservationData: Sync + Send {
    /// Latest observation date present, if any rows exist.
    async fn max_observation_date(&self) -> Result<Option<String>, Error>;
    /// Station code with the most observation rows, if any rows exist.
    /// Ties go to the lexicographically smallest code.
    async fn most_active_station(&self) -> Result<Option<String>, Error>;
    /// Every (date, precipitation) reading with `date >= start`. Rows with
    /// unrecorded precipitation are included; a date may repeat.
    async fn precipitation_since(&self, start: &str) -> Result<Vec<PrecipReading>, Error>;
    /// Every station code, in store order.
    async fn station_codes(&self) -> Result<Vec<String>, Error>;
    /// Temperature projection for one station with `date >= start`.
    /// Unrecorded temperatures come back as `None`.
    async fn temperatures_since(
        &self,
        station: &str,
        start: &str,
    ) -> Result<Vec<Option<f64>>, Error>;
    /// Per-date MIN/AVG/MAX of temperature; the `end` bound is inclusive
    /// when present.
    async fn daily_temperature_stats(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<Vec<DailyTemperature>, Error>;
}

/// One precipitation reading. `prcp` is `None` when the station recorded
/// nothing that day, which is distinct from recording zero.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct PrecipReading {
    pub date: String,
    pub prcp: Option<f64>,
}

/// Temperature aggregates for one date-group. Fields are `None` when every
/// temperature in the group was unrecorded.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct DailyTemperature {
    pub date: String,
    pub tmin: Option<f64>,
    pub tavg: Option<f64>,
    pub tmax: Option<f64>,
}

pub struct ObservationAccess {
    pool: SqlitePool,
}

impl ObservationAccess {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ObservationData for ObservationAccess {
    async fn max_observation_date(&self) -> Result<Option<String>, Error> {
        let latest = sqlx::query_scalar("SELECT MAX(date) FROM measurement")
            .fetch_one(&self.pool)
            .await?;
        Ok(latest)
    }

    async fn most_active_station(&self) -> Result<Option<String>, Error> {
        let station = sqlx::query_scalar(
            "SELECT station FROM measurement \
             GROUP BY station \
             ORDER BY COUNT(station) DESC, station ASC \
             LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(station)
    }

    async fn precipitation_since(&self, start: &str) -> Result<Vec<PrecipReading>, Error> {
        let rows = sqlx::query_as::<_, PrecipReading>(
            "SELECT date, prcp FROM measurement WHERE date >= ?",
        )
        .bind(start)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn station_codes(&self) -> Result<Vec<String>, Error> {
        let codes = sqlx::query_scalar("SELECT station FROM station")
            .fetch_all(&self.pool)
            .await?;
        Ok(codes)
    }

    async fn temperatures_since(
        &self,
        station: &str,
        start: &str,
    ) -> Result<Vec<Option<f64>>, Error> {
        let temps =
            sqlx::query_scalar("SELECT tobs FROM measurement WHERE station = ? AND date >= ?")
                .bind(station)
                .bind(start)
                .fetch_all(&self.pool)
                .await?;
        Ok(temps)
    }

    async fn daily_temperature_stats(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<Vec<DailyTemperature>, Error> {
        let rows = match end {
            Some(end) => {
                sqlx::query_as::<_, DailyTemperature>(
                    "SELECT date, MIN(tobs) AS tmin, AVG(tobs) AS tavg, MAX(tobs) AS tmax \
                     FROM measurement \
                     WHERE date >= ? AND date <= ? \
                     GROUP BY date",
                )
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DailyTemperature>(
                    "SELECT date, MIN(tobs) AS tmin, AVG(tobs) AS tavg, MAX(tobs) AS tmax \
                     FROM measurement \
                     WHERE date >= ? \
                     GROUP BY date",
                )
                .bind(start)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }
}
