/// Mock transport for testing and demos
///
/// This transport serves scripted responses instead of touching the
/// network. It's useful for:
/// - Testing the session refresh protocol deterministically
/// - Exercising API parsing without a live server
///
/// # Scripting
///
/// Responses are registered per `(method, path)` route:
/// - [`MockTransport::enqueue`]: one-shot responses consumed in order
/// - [`MockTransport::respond_with`]: a sticky response replayed for every
///   call
/// - [`MockTransport::respond_with_fn`]: a closure inspecting the request
///   (e.g. branching on the bearer token)
///
/// Unmatched routes answer 404. Every request is recorded and can be
/// inspected with [`MockTransport::requests`]; per-route call counts come
/// from [`MockTransport::calls_to`].
///
/// # Example
///
/// ```
/// use gramsetu_client::transport::{ApiRequest, ApiResponse, HttpTransport, Method, MockTransport};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mock = MockTransport::new();
/// mock.respond_with(
///     Method::Get,
///     "/issues/i-1",
///     ApiResponse::json_value(200, &serde_json::json!({ "_id": "i-1" })),
/// );
///
/// let response = mock.send(ApiRequest::get("/issues/i-1")).await?;
/// assert_eq!(response.status, 200);
/// assert_eq!(mock.calls_to(Method::Get, "/issues/i-1"), 1);
/// # Ok(())
/// # }
/// ```
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method, TransportError};

type ResponderFn = Box<dyn Fn(&ApiRequest) -> ApiResponse + Send + Sync>;

enum Responder {
    Queue(VecDeque<ApiResponse>),
    Always(ApiResponse),
    Fn(ResponderFn),
    Error(TransportError),
}

struct Route {
    responder: Responder,
    delay: Option<Duration>,
    hits: usize,
}

/// Scripted transport double
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), Route>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    /// Creates a transport with no scripted routes
    pub fn new() -> Self {
        MockTransport::default()
    }

    fn insert(&self, method: Method, path: &str, responder: Responder, delay: Option<Duration>) {
        let mut routes = self.routes.lock().unwrap();
        routes.insert(
            (method, path.to_string()),
            Route {
                responder,
                delay,
                hits: 0,
            },
        );
    }

    /// Queues a one-shot response for a route
    ///
    /// Multiple calls queue multiple responses, consumed in order. A
    /// drained queue answers 404.
    pub fn enqueue(&self, method: Method, path: &str, response: ApiResponse) {
        let mut routes = self.routes.lock().unwrap();
        let route = routes.entry((method, path.to_string())).or_insert(Route {
            responder: Responder::Queue(VecDeque::new()),
            delay: None,
            hits: 0,
        });
        match &mut route.responder {
            Responder::Queue(queue) => queue.push_back(response),
            _ => route.responder = Responder::Queue(VecDeque::from([response])),
        }
    }

    /// Registers a sticky response replayed for every call to the route
    pub fn respond_with(&self, method: Method, path: &str, response: ApiResponse) {
        self.insert(method, path, Responder::Always(response), None);
    }

    /// Registers a sticky response served after an artificial delay
    ///
    /// Useful for holding a refresh in flight while concurrent requests
    /// pile up behind it.
    pub fn respond_with_delay(
        &self,
        method: Method,
        path: &str,
        response: ApiResponse,
        delay: Duration,
    ) {
        self.insert(method, path, Responder::Always(response), Some(delay));
    }

    /// Registers a closure that computes the response per request
    pub fn respond_with_fn<F>(&self, method: Method, path: &str, f: F)
    where
        F: Fn(&ApiRequest) -> ApiResponse + Send + Sync + 'static,
    {
        self.insert(method, path, Responder::Fn(Box::new(f)), None);
    }

    /// Registers a transport-level failure for a route
    pub fn fail_with(&self, method: Method, path: &str, error: TransportError) {
        self.insert(method, path, Responder::Error(error), None);
    }

    /// Number of calls served for a route
    pub fn calls_to(&self, method: Method, path: &str) -> usize {
        self.routes
            .lock()
            .unwrap()
            .get(&(method, path.to_string()))
            .map(|r| r.hits)
            .unwrap_or(0)
    }

    /// All requests received, in arrival order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    /// Requests received for a specific route
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    fn not_found() -> ApiResponse {
        ApiResponse::json_value(404, &serde_json::json!({ "message": "Not found" }))
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.log.lock().unwrap().push(request.clone());

        // Resolve the response inside the lock, then release before any delay
        let (outcome, delay) = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(&(request.method, request.path.clone())) {
                Some(route) => {
                    route.hits += 1;
                    let outcome = match &mut route.responder {
                        Responder::Queue(queue) => {
                            queue.pop_front().map(Ok).unwrap_or_else(|| {
                                Ok(Self::not_found())
                            })
                        }
                        Responder::Always(response) => Ok(response.clone()),
                        Responder::Fn(f) => Ok(f(&request)),
                        Responder::Error(error) => Err(error.clone()),
                    };
                    (outcome, route.delay)
                }
                None => (Ok(Self::not_found()), None),
            }
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        outcome
    }
}
