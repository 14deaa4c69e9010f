//! HTTP client for the AlAdhan prayer timings API

use std::collections::HashMap;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use serde::Deserialize;

use crate::model::{Location, PrayerTimings};
use super::error::{Result, ServiceError};

/// Default AlAdhan base URL
pub const DEFAULT_API_BASE: &str = "https://api.aladhan.com";

/// Calculation method 2 (Islamic Society of North America)
pub const DEFAULT_METHOD: u8 = 2;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = concat!("chronodeck/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct TimingsResponse {
    data: Option<TimingsData>,
}

#[derive(Deserialize)]
struct TimingsData {
    timings: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct PrayerTimesClient {
    client: Client,
    base_url: String,
    method: u8,
}

impl PrayerTimesClient {
    pub fn new(base_url: impl Into<String>, method: u8) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            method,
        })
    }

    fn timings_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/v1/timings/{}-{}-{}",
            self.base_url.trim_end_matches('/'),
            date.day(),
            date.month(),
            date.year()
        )
    }

    /// Fetch the five daily prayer times for `date` at `location`.
    pub async fn fetch_timings(&self, date: NaiveDate, location: Location) -> Result<PrayerTimings> {
        let url = self.timings_url(date);
        tracing::debug!(url = %url, lat = location.lat, lon = location.lon, "Fetching prayer timings");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", location.lat.to_string()),
                ("longitude", location.lon.to_string()),
                ("method", self.method.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        let body: TimingsResponse = response.json().await?;
        let raw = body.data.ok_or(ServiceError::MissingField("data.timings"))?.timings;
        let timings = PrayerTimings::from_raw(&raw);
        if timings.is_empty() {
            return Err(ServiceError::MissingField("prayer times"));
        }
        tracing::info!(date = %date, count = timings.iter().count(), "Prayer timings fetched");
        Ok(timings)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::model::FALLBACK_LOCATION;
    use crate::model::Prayer;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
    }

    #[tokio::test]
    async fn fetches_and_parses_timings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/timings/7-3-2026"))
            .and(query_param("latitude", "-6.4025"))
            .and(query_param("longitude", "106.7942"))
            .and(query_param("method", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "status": "OK",
                "data": {
                    "timings": {
                        "Fajr": "04:31",
                        "Sunrise": "05:43",
                        "Dhuhr": "11:58",
                        "Asr": "15:03",
                        "Maghrib": "18:05",
                        "Isha": "19:14 (WIB)"
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PrayerTimesClient::new(server.uri(), DEFAULT_METHOD).unwrap();
        let timings = client.fetch_timings(date(), FALLBACK_LOCATION).await.unwrap();
        assert_eq!(timings.iter().count(), 5);
        assert_eq!(timings.get(Prayer::Fajr), NaiveTime::from_hms_opt(4, 31, 0));
        assert_eq!(timings.get(Prayer::Isha), NaiveTime::from_hms_opt(19, 14, 0));
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = PrayerTimesClient::new(server.uri(), DEFAULT_METHOD).unwrap();
        let err = client.fetch_timings(date(), FALLBACK_LOCATION).await.unwrap_err();
        assert!(matches!(err, ServiceError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn response_without_timings_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 400, "data": null })))
            .mount(&server)
            .await;

        let client = PrayerTimesClient::new(server.uri(), DEFAULT_METHOD).unwrap();
        let err = client.fetch_timings(date(), FALLBACK_LOCATION).await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingField(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = PrayerTimesClient::new(server.uri(), DEFAULT_METHOD).unwrap();
        assert!(client.fetch_timings(date(), FALLBACK_LOCATION).await.is_err());
    }
}
