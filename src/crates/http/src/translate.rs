use bytes::Bytes;
use imposter_base::{QueryMultiMap, Request, ResponseState};
use pingora::http::ResponseHeader;
use pingora::proxy::Session;
use pingora::{Error, ErrorType};

/// Bodies larger than this are rejected with 413 rather than buffered in
/// full (spec.md §4.8 "bounded body capture").
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Reads the downstream request into an [`imposter_base::Request`],
/// capturing the body into memory up to [`MAX_BODY_BYTES`].
///
/// Returns `Ok(None)` if the body exceeds the bound; the caller writes 413
/// and never constructs an `Exchange` for it.
pub async fn read_request(session: &mut Session) -> Result<Option<Request>, Box<Error>> {
    let header = session.req_header();
    let method = header.method.as_str().to_string();
    let path = header.uri.path().to_string();
    let query = header
        .uri
        .query()
        .map(QueryMultiMap::parse)
        .unwrap_or_default();

    let mut request = Request::new(method, path);
    request.query = query;
    for (name, value) in header.headers.iter() {
        request
            .headers
            .push(name.as_str(), value.to_str().unwrap_or_default());
    }
    request.remote_addr = session
        .client_addr()
        .and_then(|addr| addr.as_inet())
        .map(|inet| inet.ip());

    let mut body = Vec::new();
    while let Some(chunk) = session.read_request_body().await? {
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Ok(None);
        }
        body.extend_from_slice(&chunk);
    }
    request.body = body;

    Ok(Some(request))
}

/// Writes a [`ResponseState`] to the downstream connection.
pub async fn write_response(
    session: &mut Session,
    response: &ResponseState,
) -> Result<(), Box<Error>> {
    let mut header = ResponseHeader::build(response.effective_status(), Some(response.headers.len()))?;
    for (name, value) in response.headers.iter() {
        header.insert_header(name.to_string(), value.to_string())?;
    }
    session
        .write_response_header(Box::new(header), false)
        .await?;
    session
        .write_response_body(Some(Bytes::from(response.body.clone())), true)
        .await?;
    Ok(())
}

/// Writes a bare status response with no body, for 413/500 short-circuits
/// that occur before the dispatcher runs.
pub async fn write_status(session: &mut Session, status: u16) -> Result<(), Box<Error>> {
    let header = ResponseHeader::build(status, Some(0))?;
    session
        .write_response_header(Box::new(header), false)
        .await?;
    session.write_response_body(None, true).await?;
    Ok(())
}

/// An error constructed for the `fail=CloseConnection` response policy:
/// propagating it up through `request_filter` tells pingora to tear down
/// the connection rather than complete a protocol-conformant response.
pub fn close_connection_error() -> Box<Error> {
    Error::explain(ErrorType::ConnectionClosed, "imposter-go fail=CloseConnection")
}
