use axum::Router;
use climate_api::{
    app,
    db::observations::{DailyTemperature, Error, ObservationData, PrecipReading},
    AppState, ClimateService,
};
use mockall::mock;
use std::sync::Arc;

mock! {
    pub ObservationStore {}

    #[async_trait::async_trait]
    impl ObservationData for ObservationStore {
        async fn max_observation_date(&self) -> Result<Option<String>, Error>;
        async fn most_active_station(&self) -> Result<Option<String>, Error>;
        async fn precipitation_since(&self, start: &str) -> Result<Vec<PrecipReading>, Error>;
        async fn station_codes(&self) -> Result<Vec<String>, Error>;
        async fn temperatures_since(
            &self,
            station: &str,
            start: &str,
        ) -> Result<Vec<Option<f64>>, Error>;
        #[mockall::concretize]
        async fn daily_temperature_stats(
            &self,
            start: &str,
            end: Option<&str>,
        ) -> Result<Vec<DailyTemperature>, Error>;
    }
}

pub struct TestApp {
    pub app: Router,
}

pub async fn spawn_app(store: Arc<dyn ObservationData>) -> TestApp {
    let service = Arc::new(ClimateService::new(store));
    let app_state = AppState {
        remote_url: String::from("http://localhost:9700"),
        service,
    };

    TestApp {
        app: app(app_state),
    }
}
