//! HTTP client for the report card API.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::models::{
    Assessment, CompareResponse, GradeLevel, SchoolDetail, SearchResponse, TopScoresResponse,
};
use crate::comparison::MAX_COMPARE;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Errors surfaced by the API client. `NotFound` is kept separate so the
/// detail view can render a missing school differently from a backend
/// outage.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("school not found")]
    NotFound,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}")]
    Status { status: StatusCode },
    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("comparison requires 2-{MAX_COMPARE} schools, got {0}")]
    BadCompareCount(usize),
}

impl ApiError {
    /// Transport-level failures are the only class worth a silent retry.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

/// Blocking client for the four read endpoints.
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("schoolscope/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        Ok(ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full-text search over school names, cities, and districts.
    pub fn search(&self, query: &str, limit: usize) -> Result<SearchResponse, ApiError> {
        let limit = limit.to_string();
        self.get_json(
            &format!("{}/search", self.base_url),
            &[("q", query), ("limit", &limit)],
        )
    }

    /// Detail for one school; 404 maps to [`ApiError::NotFound`].
    pub fn school_detail(&self, rcdts: &str) -> Result<SchoolDetail, ApiError> {
        self.get_json(&format!("{}/schools/{rcdts}", self.base_url), &[])
    }

    /// Side-by-side details for 2 to [`MAX_COMPARE`] schools. Out-of-range
    /// id counts are rejected without touching the network.
    pub fn compare(&self, ids: &[String]) -> Result<CompareResponse, ApiError> {
        if ids.len() < 2 || ids.len() > MAX_COMPARE {
            return Err(ApiError::BadCompareCount(ids.len()));
        }
        let joined = ids.join(",");
        self.get_json(
            &format!("{}/schools/compare", self.base_url),
            &[("ids", &joined)],
        )
    }

    /// Ranked schools for an assessment and grade level.
    pub fn top_scores(
        &self,
        assessment: Assessment,
        level: GradeLevel,
        limit: usize,
    ) -> Result<TopScoresResponse, ApiError> {
        let limit = limit.to_string();
        self.get_json(
            &format!("{}/top-scores", self.base_url),
            &[
                ("assessment", assessment.as_query()),
                ("level", level.as_query()),
                ("limit", &limit),
            ],
        )
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self.http.get(url).query(query).send()?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            return Err(ApiError::Status { status });
        }
        let body = response.text()?;
        serde_json::from_str(&body).map_err(ApiError::Decode)
    }
}
