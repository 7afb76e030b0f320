use std::time::Duration;

use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;

use crate::errors::{MealError, MealResult};

pub const DEFAULT_RANDOM_ORG_URL: &str =
    "https://www.random.org/decimal-fractions/?num=1&dec=2&col=1&format=plain&rnd=new";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of the random fraction used to settle a battle.
#[async_trait]
pub trait RandomSource: Send + Sync {
    async fn get_random(&self) -> MealResult<f64>;
}

/// Fetches decimal fractions from random.org.
pub struct RandomOrgClient {
    client: Client,
    url: String,
}

impl RandomOrgClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

impl Default for RandomOrgClient {
    fn default() -> Self {
        Self::new(DEFAULT_RANDOM_ORG_URL)
    }
}

#[async_trait]
impl RandomSource for RandomOrgClient {
    async fn get_random(&self) -> MealResult<f64> {
        info!("Fetching random number from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                error!("Request to random.org failed: {}", e);
                MealError::Request(format!("Request to random.org failed: {}", e))
            })?;

        let body = response.text().await.map_err(|e| {
            error!("Request to random.org failed: {}", e);
            MealError::Request(format!("Request to random.org failed: {}", e))
        })?;

        let value = parse_random_fraction(&body)?;
        info!("Received random number: {}", value);
        Ok(value)
    }
}

/// Parses a decimal fraction in `[0, 1]`.
pub fn parse_random_fraction(body: &str) -> MealResult<f64> {
    let trimmed = body.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| (0.0..=1.0).contains(value))
        .ok_or_else(|| {
            error!("Invalid response from random.org: {}", trimmed);
            MealError::InvalidResponse(format!("Invalid response from random.org: {}", trimmed))
        })
}
