use crate::domain::error::RelayError;
use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::JsonPayloadError,
    web, Error, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

/// Logs every failed `/api` request with its status and latency.
#[derive(Clone, Default)]
pub struct ErrorHandlingMiddleware;

impl ErrorHandlingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for ErrorHandlingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = ErrorHandlingService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorHandlingService {
            service: Rc::new(service),
        }))
    }
}

pub struct ErrorHandlingService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ErrorHandlingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let path = req.path().to_string();
        let method = req.method().to_string();
        let start_time = std::time::Instant::now();

        Box::pin(async move {
            let result = service.call(req).await;
            let duration_ms = start_time.elapsed().as_millis() as u64;
            match &result {
                Ok(response) if response.status().is_server_error() => {
                    tracing::error!(%method, %path, status = response.status().as_u16(), duration_ms, "request failed");
                }
                Ok(response) if response.status().is_client_error() => {
                    tracing::warn!(%method, %path, status = response.status().as_u16(), duration_ms, "request rejected");
                }
                Ok(_) => {
                    tracing::debug!(%method, %path, duration_ms, "request completed");
                }
                Err(error) => {
                    tracing::error!(%method, %path, duration_ms, "request errored: {}", error);
                }
            }
            result
        })
    }
}

/// JSON extractor settings: malformed bodies get the same envelope as every
/// other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            let message = match &err {
                JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
                other => format!("Invalid JSON body: {other}"),
            };
            RelayError::InvalidInput(message).into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, post, test, App, HttpResponse};

    #[post("/echo")]
    async fn echo(body: web::Json<serde_json::Value>) -> HttpResponse {
        HttpResponse::Ok().json(body.into_inner())
    }

    #[actix_web::test]
    async fn test_malformed_json_gets_envelope() {
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .wrap(ErrorHandlingMiddleware::new())
                .service(echo),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/echo")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["ok"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    }
}
