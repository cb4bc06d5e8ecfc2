//! Ordered request and response stages
//!
//! Every request passes through the request stages in order before it is
//! sent, and every outcome passes through the response stages in order
//! before it reaches the caller. Stages see the outcome once the response
//! headers arrive; a failure while reading the body is fed through them
//! again as an error.

use super::{ClientError, RequestContext};
use reqwest::Response;
use std::sync::Arc;

/// Outcome of a dispatched request as seen by response stages
pub type Outcome = Result<Response, ClientError>;

/// Transformation applied to every outgoing request
pub trait RequestStage: Send + Sync {
    /// Stage name, used for inspection and logging
    fn name(&self) -> &'static str;

    /// Transform the request. An error aborts the request before dispatch.
    fn apply(&self, request: RequestContext) -> Result<RequestContext, ClientError>;
}

/// Transformation applied to every request outcome, success or failure
pub trait ResponseStage: Send + Sync {
    /// Stage name, used for inspection and logging
    fn name(&self) -> &'static str;

    fn apply(&self, outcome: Outcome) -> Outcome;
}

/// The ordered stage lists a client runs
#[derive(Clone, Default)]
pub struct Pipeline {
    request_stages: Vec<Arc<dyn RequestStage>>,
    response_stages: Vec<Arc<dyn ResponseStage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request stage
    pub fn with_request_stage(mut self, stage: Arc<dyn RequestStage>) -> Self {
        self.request_stages.push(stage);
        self
    }

    /// Append a response stage
    pub fn with_response_stage(mut self, stage: Arc<dyn ResponseStage>) -> Self {
        self.response_stages.push(stage);
        self
    }

    /// Request stage names in execution order
    pub fn request_stage_names(&self) -> Vec<&'static str> {
        self.request_stages.iter().map(|stage| stage.name()).collect()
    }

    /// Response stage names in execution order
    pub fn response_stage_names(&self) -> Vec<&'static str> {
        self.response_stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run the request stages, stopping at the first error
    pub fn prepare(&self, request: RequestContext) -> Result<RequestContext, ClientError> {
        self.request_stages
            .iter()
            .try_fold(request, |request, stage| stage.apply(request))
    }

    /// Run every response stage over the outcome
    pub fn complete(&self, outcome: Outcome) -> Outcome {
        self.response_stages
            .iter()
            .fold(outcome, |outcome, stage| stage.apply(outcome))
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("request_stages", &self.request_stage_names())
            .field("response_stages", &self.response_stage_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use reqwest::header::HeaderValue;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Tag(&'static str);

    impl RequestStage for Tag {
        fn name(&self) -> &'static str {
            self.0
        }

        fn apply(&self, mut request: RequestContext) -> Result<RequestContext, ClientError> {
            let trail = match request.headers().get("x-trail") {
                Some(existing) => format!("{},{}", existing.to_str().unwrap(), self.0),
                None => self.0.to_string(),
            };
            request
                .headers_mut()
                .insert("x-trail", HeaderValue::from_str(&trail).unwrap());
            Ok(request)
        }
    }

    struct Reject;

    impl RequestStage for Reject {
        fn name(&self) -> &'static str {
            "reject"
        }

        fn apply(&self, _request: RequestContext) -> Result<RequestContext, ClientError> {
            Err(ClientError::Storage("unavailable".into()))
        }
    }

    #[derive(Default)]
    struct CountFailures(AtomicUsize);

    impl ResponseStage for CountFailures {
        fn name(&self) -> &'static str {
            "count_failures"
        }

        fn apply(&self, outcome: Outcome) -> Outcome {
            if outcome.is_err() {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
            outcome
        }
    }

    fn request() -> RequestContext {
        RequestContext::new(
            Method::GET,
            "http://localhost:4000/api",
            "/students",
            Duration::from_secs(30),
        )
    }

    #[test]
    fn test_request_stages_run_in_order() {
        let pipeline = Pipeline::new()
            .with_request_stage(Arc::new(Tag("first")))
            .with_request_stage(Arc::new(Tag("second")));

        let prepared = pipeline.prepare(request()).unwrap();

        assert_eq!(prepared.headers().get("x-trail").unwrap(), "first,second");
        assert_eq!(pipeline.request_stage_names(), vec!["first", "second"]);
    }

    #[test]
    fn test_request_stage_error_stops_pipeline() {
        let pipeline = Pipeline::new()
            .with_request_stage(Arc::new(Reject))
            .with_request_stage(Arc::new(Tag("never")));

        let result = pipeline.prepare(request());
        assert!(matches!(result, Err(ClientError::Storage(_))));
    }

    #[test]
    fn test_response_stages_see_every_failure() {
        let counter = Arc::new(CountFailures::default());
        let pipeline = Pipeline::new()
            .with_response_stage(counter.clone())
            .with_response_stage(counter.clone());

        let outcome = pipeline.complete(Err(ClientError::Timeout));

        assert!(matches!(outcome, Err(ClientError::Timeout)));
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
        assert_eq!(
            pipeline.response_stage_names(),
            vec!["count_failures", "count_failures"]
        );
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let pipeline = Pipeline::new();
        let prepared = pipeline.prepare(request()).unwrap();
        assert_eq!(prepared.url(), "http://localhost:4000/api/students");
        assert!(matches!(
            pipeline.complete(Err(ClientError::Timeout)),
            Err(ClientError::Timeout)
        ));
    }
}
