//! Query service over the observation store.
//!
//! Composes the store into the four public read operations and owns the
//! trailing-window arithmetic and the date-range validation. Everything
//! here is a stateless read; requests share nothing but the store handle.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::{format_description::BorrowedFormatItem, macros::format_description, Date, Duration};
use utoipa::ToSchema;

use crate::db::observations::{self, DailyTemperature, ObservationData, PrecipReading};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Length of the trailing window in days. A fixed offset, not a calendar
/// year: the window start can land on a different day-of-month across a
/// leap day.
const TRAILING_WINDOW_DAYS: i64 = 365;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("no observations available in the dataset")]
    EmptyDataset,
    #[error("Date value must be in 'YYYY-MM-DD' format or date entered is invalid.")]
    BadDate,
    #[error("Start date value must be before end date.")]
    InvalidRange,
    #[error("stored date {0:?} is not a valid YYYY-MM-DD calendar date")]
    StoredDate(String),
    #[error("failed to query the observation store: {0}")]
    Store(#[from] observations::Error),
}

/// Temperature aggregates for one date.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct TemperatureSummary {
    pub tmin: Option<f64>,
    pub tavg: Option<f64>,
    pub tmax: Option<f64>,
}

pub struct ClimateService {
    store: Arc<dyn ObservationData>,
}

impl ClimateService {
    pub fn new(store: Arc<dyn ObservationData>) -> Self {
        Self { store }
    }

    /// Inclusive lower bound of the trailing year: 365 days before the most
    /// recent observation date anywhere in the store. An empty store is an
    /// error, never a silently empty window.
    async fn last_year_start(&self) -> Result<String, Error> {
        let latest = self
            .store
            .max_observation_date()
            .await?
            .ok_or(Error::EmptyDataset)?;
        trailing_year_start(&latest)
    }

    /// Precipitation readings for the trailing year, keyed by date. A date
    /// observed by several stations keeps every recorded value, in the
    /// order the rows were scanned; unrecorded readings contribute nothing.
    pub async fn precipitation_last_year(&self) -> Result<BTreeMap<String, Vec<f64>>, Error> {
        let start = self.last_year_start().await?;
        let rows = self.store.precipitation_since(&start).await?;
        Ok(collect_precipitation(rows))
    }

    /// Every station code, in store order.
    pub async fn station_codes(&self) -> Result<Vec<String>, Error> {
        Ok(self.store.station_codes().await?)
    }

    /// Temperature readings of the busiest station over the trailing year.
    /// Unrecorded readings pass through as `None`.
    pub async fn most_active_station_temperatures(&self) -> Result<Vec<Option<f64>>, Error> {
        let station = self
            .store
            .most_active_station()
            .await?
            .ok_or(Error::EmptyDataset)?;
        let start = self.last_year_start().await?;
        Ok(self.store.temperatures_since(&station, &start).await?)
    }

    /// Per-date min/avg/max temperature over `[start, end]` (both ends
    /// inclusive), or over everything from `start` on when `end` is absent.
    /// Dates with no matching rows are absent from the result.
    pub async fn temperature_summary(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<BTreeMap<String, TemperatureSummary>, Error> {
        validate_range(start, end)?;
        let rows = self.store.daily_temperature_stats(start, end).await?;
        Ok(collect_daily_summaries(rows))
    }
}

/// 365 days before `latest`, formatted `YYYY-MM-DD`.
fn trailing_year_start(latest: &str) -> Result<String, Error> {
    let date =
        Date::parse(latest, DATE_FORMAT).map_err(|_| Error::StoredDate(latest.to_owned()))?;
    let start = date
        .checked_sub(Duration::days(TRAILING_WINDOW_DAYS))
        .ok_or_else(|| Error::StoredDate(latest.to_owned()))?;
    start
        .format(DATE_FORMAT)
        .map_err(|_| Error::StoredDate(latest.to_owned()))
}

/// Validate caller-supplied range parameters, in order: `start` must be a
/// real calendar date, then `end` must be one when supplied, and only when
/// `end` is present is the ordering checked. The ordering comparison is
/// lexicographic, matching how the store compares date strings.
fn validate_range(start: &str, end: Option<&str>) -> Result<(), Error> {
    if Date::parse(start, DATE_FORMAT).is_err() {
        return Err(Error::BadDate);
    }
    if let Some(end) = end {
        if Date::parse(end, DATE_FORMAT).is_err() {
            return Err(Error::BadDate);
        }
        if start > end {
            return Err(Error::InvalidRange);
        }
    }
    Ok(())
}

fn collect_precipitation(rows: Vec<PrecipReading>) -> BTreeMap<String, Vec<f64>> {
    let mut by_date: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in rows {
        if let Some(prcp) = row.prcp {
            by_date.entry(row.date).or_default().push(prcp);
        }
    }
    by_date
}

fn collect_daily_summaries(rows: Vec<DailyTemperature>) -> BTreeMap<String, TemperatureSummary> {
    rows.into_iter()
        .map(|row| {
            (
                row.date,
                TemperatureSummary {
                    tmin: row.tmin,
                    tavg: row.tavg,
                    tmax: row.tmax,
                },
            )
        })
        .collect()
}
