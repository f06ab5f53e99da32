//! Background fetch worker.
//!
//! The UI event loop stays on one thread; requests are sent over a channel
//! to a single worker thread and results come back tagged with the sequence
//! number of the request that produced them. The receiver compares that
//! number against the latest dispatched sequence and drops anything stale,
//! so a slow response can never overwrite a newer one.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use super::cache::{CacheKey, CachedValue, ResponseCache};
use super::client::{ApiClient, ApiError};
use super::models::{
    Assessment, CompareResponse, GradeLevel, SchoolDetail, SearchResponse, TopScoresResponse,
};

/// A request dispatched by the UI thread.
pub enum FetchRequest {
    Search {
        seq: u64,
        query: String,
        limit: usize,
    },
    Detail {
        seq: u64,
        rcdts: String,
    },
    Compare {
        seq: u64,
        ids: Vec<String>,
    },
    TopScores {
        seq: u64,
        assessment: Assessment,
        level: GradeLevel,
        limit: usize,
    },
    Shutdown,
}

/// A completed fetch, echoing the originating sequence number.
pub enum FetchEvent {
    Search {
        seq: u64,
        result: Result<SearchResponse, ApiError>,
    },
    Detail {
        seq: u64,
        rcdts: String,
        result: Result<SchoolDetail, ApiError>,
    },
    Compare {
        seq: u64,
        result: Result<CompareResponse, ApiError>,
    },
    TopScores {
        seq: u64,
        result: Result<TopScoresResponse, ApiError>,
    },
}

/// Handle owned by the app; dropping it shuts the worker down.
pub struct Fetcher {
    requests: Sender<FetchRequest>,
    events: Receiver<FetchEvent>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Fetcher {
    pub fn spawn(client: ApiClient) -> Self {
        let (request_tx, request_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let handle = thread::spawn(move || worker(client, request_rx, event_tx));
        Fetcher {
            requests: request_tx,
            events: event_rx,
            handle: Some(handle),
        }
    }

    /// Queue a request. A dead worker is surfaced at poll time, not here.
    pub fn request(&self, request: FetchRequest) {
        let _ = self.requests.send(request);
    }

    /// Drain completed fetches without blocking.
    pub fn poll(&self) -> Vec<FetchEvent> {
        self.events.try_iter().collect()
    }
}

impl Drop for Fetcher {
    fn drop(&mut self) {
        let _ = self.requests.send(FetchRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// One retry on transport errors only; HTTP status and decode failures are
/// deterministic and retried by the user, not the worker.
fn with_retry<T>(mut call: impl FnMut() -> Result<T, ApiError>) -> Result<T, ApiError> {
    match call() {
        Err(err) if err.is_transport() => call(),
        other => other,
    }
}

fn worker(client: ApiClient, requests: Receiver<FetchRequest>, events: Sender<FetchEvent>) {
    let mut cache = ResponseCache::new();

    while let Ok(request) = requests.recv() {
        let event = match request {
            FetchRequest::Shutdown => break,
            FetchRequest::Search { seq, query, limit } => {
                let key = CacheKey::Search {
                    query: query.clone(),
                    limit,
                };
                let result = match cache.get(&key) {
                    Some(CachedValue::Search(hit)) => Ok(hit),
                    _ => {
                        let fetched = with_retry(|| client.search(&query, limit));
                        if let Ok(response) = &fetched {
                            cache.put(key, CachedValue::Search(response.clone()));
                        }
                        fetched
                    }
                };
                FetchEvent::Search { seq, result }
            }
            FetchRequest::Detail { seq, rcdts } => {
                let key = CacheKey::Detail {
                    rcdts: rcdts.clone(),
                };
                let result = match cache.get(&key) {
                    Some(CachedValue::Detail(hit)) => Ok(hit),
                    _ => {
                        let fetched = with_retry(|| client.school_detail(&rcdts));
                        if let Ok(response) = &fetched {
                            cache.put(key, CachedValue::Detail(response.clone()));
                        }
                        fetched
                    }
                };
                FetchEvent::Detail { seq, rcdts, result }
            }
            FetchRequest::Compare { seq, ids } => {
                let key = CacheKey::Compare { ids: ids.join(",") };
                let result = match cache.get(&key) {
                    Some(CachedValue::Compare(hit)) => Ok(hit),
                    _ => {
                        let fetched = with_retry(|| client.compare(&ids));
                        if let Ok(response) = &fetched {
                            cache.put(key, CachedValue::Compare(response.clone()));
                        }
                        fetched
                    }
                };
                FetchEvent::Compare { seq, result }
            }
            FetchRequest::TopScores {
                seq,
                assessment,
                level,
                limit,
            } => {
                let key = CacheKey::TopScores {
                    assessment,
                    level,
                    limit,
                };
                let result = match cache.get(&key) {
                    Some(CachedValue::TopScores(hit)) => Ok(hit),
                    _ => {
                        let fetched = with_retry(|| client.top_scores(assessment, level, limit));
                        if let Ok(response) = &fetched {
                            cache.put(key, CachedValue::TopScores(response.clone()));
                        }
                        fetched
                    }
                };
                FetchEvent::TopScores { seq, result }
            }
        };

        if events.send(event).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_retry_retries_transport_once() {
        let mut calls = 0;
        let result: Result<(), ApiError> = with_retry(|| {
            calls += 1;
            Err(ApiError::Transport(
                // A connect error built without the network: reqwest turns a
                // malformed URL into a transport error at request time.
                reqwest::blocking::get("http://[invalid").unwrap_err(),
            ))
        });
        assert!(result.is_err());
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_with_retry_does_not_retry_not_found() {
        let mut calls = 0;
        let result: Result<(), ApiError> = with_retry(|| {
            calls += 1;
            Err(ApiError::NotFound)
        });
        assert!(matches!(result, Err(ApiError::NotFound)));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_with_retry_passes_success_through() {
        let result = with_retry(|| Ok::<_, ApiError>(42));
        assert_eq!(result.unwrap(), 42);
    }
}
