//! Signed-in request execution and body draining.
//!
//! Every view operation goes through [`execute_signed_in_get`] followed by
//! [`read_to_end`]; only URL construction and the final conversion differ.

use crate::defaults;
use crate::error::{Operation, ViewError};
use crate::interceptor::HttpRequestContext;
use crate::session::SessionContext;
use crate::transport::{ByteStream, HttpTransport, HttpTransportRequest};
use futures::StreamExt;
use reqwest::StatusCode;

/// Send an authenticated request and return the body of a 2xx response.
///
/// Non-success statuses become [`ViewError::Transport`] carrying the status
/// and a short excerpt of the body. Failures are logged at `warn`.
pub async fn execute_signed_in_get(
    transport: &dyn HttpTransport,
    session: &SessionContext,
    ctx: HttpRequestContext,
) -> Result<ByteStream, ViewError> {
    let headers = session.auth_headers()?;
    tracing::debug!(
        target: "tableau_views::http",
        request_id = %ctx.request_id,
        operation = %ctx.operation,
        url = %ctx.display_url,
        "executing signed-in request"
    );

    let request = HttpTransportRequest {
        ctx: ctx.clone(),
        headers,
    };
    let response = match transport.execute(request).await {
        Ok(response) => response,
        Err(error) => {
            let error = relabel(error, ctx.operation);
            log_failure(&ctx, &error);
            return Err(error);
        }
    };

    if !response.is_success() {
        let status = response.status;
        let excerpt = read_excerpt(response.body, defaults::http::ERROR_BODY_EXCERPT).await;
        let message = if excerpt.trim().is_empty() {
            StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("request failed")
                .to_string()
        } else {
            excerpt
        };
        let error = ViewError::http_status(ctx.operation, status, message);
        log_failure(&ctx, &error);
        return Err(error);
    }

    Ok(response.body)
}

/// Copy a body stream into one buffer, until end-of-stream.
///
/// The stream is consumed and dropped on every exit path. No partial
/// buffer escapes on failure.
pub async fn read_to_end(mut body: ByteStream) -> Result<Vec<u8>, ViewError> {
    let mut buffer = Vec::new();
    while let Some(chunk) = body.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    Ok(buffer)
}

/// Strict UTF-8 decoding of a drained body.
pub fn decode_text(operation: Operation, bytes: Vec<u8>) -> Result<String, ViewError> {
    String::from_utf8(bytes).map_err(|source| ViewError::Decode { operation, source })
}

// Transport failures always carry the operation of the request that failed.
fn relabel(error: ViewError, operation: Operation) -> ViewError {
    match error {
        ViewError::Transport {
            status, message, ..
        } => ViewError::Transport {
            operation,
            status,
            message,
        },
        other => other,
    }
}

// Best effort: read errors end the excerpt instead of replacing the status error.
async fn read_excerpt(mut body: ByteStream, limit: usize) -> String {
    let mut buffer = Vec::new();
    while buffer.len() < limit {
        match body.next().await {
            Some(Ok(chunk)) => buffer.extend_from_slice(&chunk),
            _ => break,
        }
    }
    buffer.truncate(limit);
    String::from_utf8_lossy(&buffer).into_owned()
}

fn log_failure(ctx: &HttpRequestContext, error: &ViewError) {
    tracing::warn!(
        target: "tableau_views::http",
        request_id = %ctx.request_id,
        operation = %ctx.operation,
        url = %ctx.display_url,
        status = ?error.status_code(),
        err = %error,
        "request failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::HttpTransportResponse;
    use async_trait::async_trait;
    use bytes::Bytes;
    use futures::stream;
    use reqwest::Method;
    use std::sync::Mutex;

    struct StubTransport {
        status: u16,
        chunks: Vec<Bytes>,
        seen: Mutex<Vec<HttpTransportRequest>>,
    }

    impl StubTransport {
        fn new(status: u16, chunks: Vec<&'static str>) -> Self {
            Self {
                status,
                chunks: chunks
                    .into_iter()
                    .map(|c| Bytes::from_static(c.as_bytes()))
                    .collect(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpTransport for StubTransport {
        async fn execute(
            &self,
            request: HttpTransportRequest,
        ) -> Result<HttpTransportResponse, ViewError> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpTransportResponse::from_chunks(
                self.status,
                self.chunks.clone(),
            ))
        }
    }

    fn ctx(operation: Operation) -> HttpRequestContext {
        HttpRequestContext::new(operation, Method::GET, "http://stub/view")
    }

    fn session() -> SessionContext {
        SessionContext::signed_in("site", "tok")
    }

    #[test]
    fn drains_all_chunks_in_order() {
        let transport = StubTransport::new(200, vec!["ab", "", "cde"]);
        let bytes = tokio_test::block_on(async {
            let body = execute_signed_in_get(&transport, &session(), ctx(Operation::ViewImage))
                .await
                .unwrap();
            read_to_end(body).await.unwrap()
        });
        assert_eq!(bytes, b"abcde");

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].ctx.method, Method::GET);
        assert_eq!(seen[0].headers.get("x-tableau-auth").unwrap(), "tok");
    }

    #[test]
    fn non_success_status_carries_label_and_excerpt() {
        let transport = StubTransport::new(500, vec!["server exploded"]);
        let err = tokio_test::block_on(execute_signed_in_get(
            &transport,
            &session(),
            ctx(Operation::ViewData),
        ))
        .err()
        .unwrap();
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.operation().unwrap().label(), "get view data");
        assert!(err.to_string().contains("server exploded"));
    }

    #[test]
    fn empty_error_body_falls_back_to_reason_phrase() {
        let transport = StubTransport::new(404, vec![]);
        let err = tokio_test::block_on(execute_signed_in_get(
            &transport,
            &session(),
            ctx(Operation::ViewThumbnail),
        ))
        .err()
        .unwrap();
        assert_eq!(
            err.to_string(),
            "get view thumbnail failed: HTTP 404: Not Found"
        );
    }

    #[test]
    fn read_error_mid_stream_fails_without_partial_data() {
        let body: ByteStream = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(ViewError::connection(Operation::ViewImage, "reset")),
        ])
        .boxed();
        let err = tokio_test::block_on(read_to_end(body)).unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        let err = decode_text(Operation::ViewData, vec![b'a', 0xFF]).unwrap_err();
        assert!(err.is_decode());
        assert_eq!(
            decode_text(Operation::ViewData, "a,b\n1,2\n".into()).unwrap(),
            "a,b\n1,2\n"
        );
    }

    struct RefusingTransport;

    #[async_trait]
    impl HttpTransport for RefusingTransport {
        async fn execute(
            &self,
            _request: HttpTransportRequest,
        ) -> Result<HttpTransportResponse, ViewError> {
            Err(ViewError::connection(Operation::ViewThumbnail, "refused"))
        }
    }

    #[test]
    fn transport_error_takes_the_request_operation() {
        let err = tokio_test::block_on(execute_signed_in_get(
            &RefusingTransport,
            &session(),
            ctx(Operation::ViewData),
        ))
        .err()
        .unwrap();
        assert!(err.is_transport());
        assert_eq!(err.operation(), Some(Operation::ViewData));
        assert_eq!(err.status_code(), None);
        assert!(err.to_string().starts_with("get view data"));
    }

    #[test]
    fn unsigned_session_never_reaches_transport() {
        let transport = StubTransport::new(200, vec!["x"]);
        let unsigned = SessionContext::signed_in("site", "");
        let result = tokio_test::block_on(execute_signed_in_get(
            &transport,
            &unsigned,
            ctx(Operation::ViewImage),
        ));
        assert!(matches!(result, Err(ViewError::Configuration(_))));
        assert!(transport.seen.lock().unwrap().is_empty());
    }
}
