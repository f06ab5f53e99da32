//! Data layer: API models, HTTP client, background fetch worker, and the
//! comparison state store.

mod cache;
mod client;
mod fetch;
mod models;
mod store;

pub use client::{ApiClient, ApiError};
pub use fetch::{FetchEvent, FetchRequest, Fetcher};
pub use models::{
    ActScores, Assessment, CompareResponse, Demographics, Diversity, GradeLevel,
    HistoricalMetrics, School, SchoolDetail, SchoolMetrics, SearchResponse, TopScoreEntry,
    TopScoresResponse, TrendMetrics, TrendWindow, YearSeries,
};
pub use store::JsonFileStore;
