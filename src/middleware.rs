use axum::http::{Request, Response};
use log::{error, info};
use std::time::Duration;
use tower_http::classify::{ServerErrorsAsFailures, ServerErrorsFailureClass, SharedClassifier};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnBodyChunk, DefaultOnEos, OnFailure, OnRequest, OnResponse,
    TraceLayer,
};
use tracing::Span;

/// Logs the method and URI of each inbound request
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnRequest;

impl<B> OnRequest<B> for LogOnRequest {
    fn on_request(&mut self, request: &Request<B>, _span: &Span) {
        info!("{} {}", request.method(), request.uri());
    }
}

/// Logs the status and latency of each response
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnResponse;

impl<B> OnResponse<B> for LogOnResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
        info!("Responded {} in {} ms", response.status().as_u16(), latency.as_millis());
    }
}

/// Logs 5xx responses and handler failures
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnFailure;

impl OnFailure<ServerErrorsFailureClass> for LogOnFailure {
    fn on_failure(&mut self, class: ServerErrorsFailureClass, latency: Duration, _span: &Span) {
        error!("Request failed after {} ms: {}", latency.as_millis(), class);
    }
}

pub type LogTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    DefaultMakeSpan,
    LogOnRequest,
    LogOnResponse,
    DefaultOnBodyChunk,
    DefaultOnEos,
    LogOnFailure,
>;

/// HTTP trace layer whose request, response and failure hooks write to `log`
pub fn trace_layer() -> LogTraceLayer {
    TraceLayer::new_for_http()
        .on_request(LogOnRequest)
        .on_response(LogOnResponse)
        .on_failure(LogOnFailure)
}
