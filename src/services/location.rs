//! Location resolution: configured coordinates, then IP geolocation, then a fixed fallback

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::model::{FALLBACK_LOCATION, Location};
use super::error::{Result, ServiceError};

pub const DEFAULT_IP_LOOKUP_URL: &str = "https://ipapi.co/json/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct IpLookupResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    client: Client,
    configured: Option<Location>,
    ip_lookup_url: String,
}

impl LocationResolver {
    pub fn new(configured: Option<Location>, ip_lookup_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            configured,
            ip_lookup_url: ip_lookup_url.into(),
        })
    }

    /// Best available position. Never fails: lookup problems end at the fallback.
    pub async fn resolve(&self) -> Location {
        if let Some(location) = self.configured {
            tracing::debug!(%location, "Using configured location");
            return location;
        }
        match self.lookup_ip().await {
            Ok(location) => {
                tracing::info!(%location, "Location from IP lookup");
                location
            }
            Err(e) => {
                tracing::warn!(error = %e, "IP location lookup failed, using fallback");
                FALLBACK_LOCATION
            }
        }
    }

    pub async fn lookup_ip(&self) -> Result<Location> {
        let response = self.client.get(&self.ip_lookup_url).send().await?;
        if !response.status().is_success() {
            return Err(ServiceError::Status {
                status: response.status().as_u16(),
                url: self.ip_lookup_url.clone(),
            });
        }
        let body: IpLookupResponse = response.json().await?;
        match (body.latitude, body.longitude) {
            (Some(lat), Some(lon)) => Ok(Location { lat, lon }),
            _ => Err(ServiceError::MissingField("latitude/longitude")),
        }
    }
}
