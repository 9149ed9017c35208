use std::fmt::Debug;

use ehttp::{Request, Response, Result};

/// Transport seam for every network call the client makes.
///
/// Production uses `ehttp`; tests swap in `MockFetcher` so state machines can
/// be driven without a server or a runtime.
pub trait FetchService: Send + Sync + Debug {
    fn fetch(&self, request: Request, on_done: Box<dyn FnOnce(Result<Response>) + Send + 'static>);
}

#[derive(Debug, Default)]
pub struct EhttpFetcher;

impl FetchService for EhttpFetcher {
    fn fetch(&self, request: Request, on_done: Box<dyn FnOnce(Result<Response>) + Send + 'static>) {
        ehttp::fetch(request, on_done);
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockFetcher, json_response};

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use ehttp::{Headers, Request, Response, Result};

    use super::FetchService;

    type Callback = Box<dyn FnOnce(Result<Response>) + Send + 'static>;

    /// Builds an in-memory JSON response for canned fetch results.
    pub fn json_response(status: u16, body: &serde_json::Value) -> Response {
        Response {
            url: String::new(),
            ok: (200..300).contains(&status),
            status,
            status_text: String::new(),
            headers: Headers::new(&[("content-type", "application/json")]),
            bytes: serde_json::to_vec(body).unwrap(),
        }
    }

    #[derive(Default)]
    struct MockInner {
        canned: VecDeque<Result<Response>>,
        held: VecDeque<Callback>,
        requests: Vec<Request>,
        hold: bool,
    }

    /// A `FetchService` that records every request and answers from a queue of
    /// canned results.
    ///
    /// In holding mode the callback is parked instead, and the test decides
    /// when (or whether) to deliver — that is how the drop-mid-flight guard
    /// gets exercised.
    #[derive(Default)]
    pub struct MockFetcher {
        inner: Mutex<MockInner>,
    }

    impl std::fmt::Debug for MockFetcher {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            let inner = self.inner.lock().unwrap();
            f.debug_struct("MockFetcher")
                .field("canned", &inner.canned.len())
                .field("held", &inner.held.len())
                .field("requests", &inner.requests.len())
                .field("hold", &inner.hold)
                .finish()
        }
    }

    impl MockFetcher {
        /// A fetcher that answers every request with `response`-style canned
        /// results, in queue order.
        pub fn with_responses(responses: impl IntoIterator<Item = Result<Response>>) -> Self {
            Self {
                inner: Mutex::new(MockInner {
                    canned: responses.into_iter().collect(),
                    ..MockInner::default()
                }),
            }
        }

        pub fn with_response(response: Result<Response>) -> Self {
            Self::with_responses([response])
        }

        /// A fetcher that parks callbacks until `deliver_next` is called.
        pub fn holding() -> Self {
            Self {
                inner: Mutex::new(MockInner {
                    hold: true,
                    ..MockInner::default()
                }),
            }
        }

        /// Completes the oldest parked request. Returns false if none were
        /// waiting.
        pub fn deliver_next(&self, result: Result<Response>) -> bool {
            let callback = self.inner.lock().unwrap().held.pop_front();
            match callback {
                Some(callback) => {
                    callback(result);
                    true
                }
                None => false,
            }
        }

        /// Drops the oldest parked callback without answering it, as a
        /// transport that lost the request would. Returns false if none were
        /// waiting.
        pub fn abandon_next(&self) -> bool {
            self.inner.lock().unwrap().held.pop_front().is_some()
        }

        /// `(method, url)` of every request seen so far, oldest first.
        pub fn requests(&self) -> Vec<(String, String)> {
            self.inner
                .lock()
                .unwrap()
                .requests
                .iter()
                .map(|r| (r.method.clone(), r.url.clone()))
                .collect()
        }

        /// Header value of the most recent request, if present.
        pub fn last_request_header(&self, name: &str) -> Option<String> {
            let inner = self.inner.lock().unwrap();
            let request = inner.requests.last()?;
            request
                .headers
                .headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.clone())
        }
    }

    impl FetchService for MockFetcher {
        fn fetch(
            &self,
            request: Request,
            on_done: Box<dyn FnOnce(Result<Response>) + Send + 'static>,
        ) {
            let result = {
                let mut inner = self.inner.lock().unwrap();
                inner.requests.push(request);
                if inner.hold {
                    inner.held.push_back(on_done);
                    return;
                }
                inner
                    .canned
                    .pop_front()
                    .unwrap_or_else(|| Err("MockFetcher: no response queued".to_string()))
            };
            on_done(result);
        }
    }
}
