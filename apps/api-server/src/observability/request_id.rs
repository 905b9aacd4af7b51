//! Request correlation: every request carries an `x-request-id`.

use std::future::{Ready, ready};

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::middleware::Next;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError};
use tracing::Instrument;
use uuid::Uuid;

use crate::middleware::error::AppError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// ID of the current request, available to handlers as an extractor.
#[derive(Debug, Clone)]
pub struct RequestId(String);

impl RequestId {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Reuse the caller's ID when it is a usable header value.
    fn from_header(value: Option<&HeaderValue>) -> Self {
        value
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| Self(v.to_string()))
            .unwrap_or_else(Self::generate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Middleware: attach the ID to the request, its span and the response.
/// Problem responses built from an `AppError` also carry it in the body.
///
/// Registered with `actix_web::middleware::from_fn`.
pub async fn request_id(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let id = RequestId::from_header(req.headers().get(REQUEST_ID_HEADER));
    req.extensions_mut().insert(id.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %id.as_str(),
        method = %req.method(),
        path = %req.path()
    );
    let res = next.call(req).instrument(span).await?.map_into_boxed_body();

    let problem = res
        .response()
        .error()
        .and_then(|e| e.as_error::<AppError>())
        .map(|e| {
            HttpResponse::build(e.status_code()).json(e.problem().with_request_id(id.as_str()))
        });
    let mut res = match problem {
        Some(rebuilt) => res.into_response(rebuilt),
        None => res,
    };

    if let Ok(value) = HeaderValue::from_str(id.as_str()) {
        res.headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    Ok(res)
}

impl FromRequest for RequestId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let id = req
            .extensions()
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(RequestId::generate);
        ready(Ok(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::middleware::from_fn;
    use actix_web::{App, test, web};
    use serde_json::Value;

    async fn missing() -> Result<HttpResponse, AppError> {
        Err(AppError::NotFound("BlogPost with id 1 not found".to_string()))
    }

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().body("fine")
    }

    #[actix_web::test]
    async fn test_problem_body_carries_request_id() {
        let app = test::init_service(
            App::new()
                .wrap(from_fn(request_id))
                .route("/missing", web::get().to(missing)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/missing")
            .insert_header((REQUEST_ID_HEADER, "req-42"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
        assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "req-42");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["request_id"], "req-42");
        assert_eq!(body["status"], 404);
        assert_eq!(body["detail"], "BlogPost with id 1 not found");
    }

    #[actix_web::test]
    async fn test_success_body_is_untouched() {
        let app = test::init_service(
            App::new()
                .wrap(from_fn(request_id))
                .route("/ok", web::get().to(ok)),
        )
        .await;

        let req = test::TestRequest::get().uri("/ok").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(test::read_body(resp).await, "fine");
    }

    #[::core::prelude::v1::test]
    fn test_incoming_id_is_reused() {
        let header = HeaderValue::from_static(" abc-123 ");
        assert_eq!(RequestId::from_header(Some(&header)).as_str(), "abc-123");
    }

    #[::core::prelude::v1::test]
    fn test_missing_id_is_generated() {
        let id = RequestId::from_header(None);
        assert!(Uuid::parse_str(id.as_str()).is_ok());

        let blank = HeaderValue::from_static("");
        assert_ne!(RequestId::from_header(Some(&blank)).as_str(), "");
    }
}
