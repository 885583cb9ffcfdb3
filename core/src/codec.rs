//! HTTP/1.1 serialization of requests and parsing of responses.
//!
//! Requests are written by hand. Response heads are parsed with `httparse`,
//! and the body is framed by, in order: no body (HEAD, 1xx, 204, 304),
//! `Transfer-Encoding: chunked`, `Content-Length`, or read until the peer
//! closes.

use std::io::{BufRead, Read};

use log::debug;

use crate::error::{GurlError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

const MAX_HEAD_BYTES: usize = 64 * 1024;
const MAX_HEADERS: usize = 128;

/// Serialize `request` exactly as it goes on the wire.
pub fn encode_request(request: &HttpRequest) -> Vec<u8> {
    let url = &request.url;
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut head = format!("{} {} HTTP/1.1\r\n", request.method, target);
    if !request.headers.contains_ignore_case("Host") {
        let host = url.host_str().unwrap_or_default();
        match url.port() {
            Some(port) => head.push_str(&format!("Host: {host}:{port}\r\n")),
            None => head.push_str(&format!("Host: {host}\r\n")),
        }
    }
    for (name, value) in request.headers.iter() {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    if request.method.carries_body() && !request.headers.contains_ignore_case("Content-Length") {
        head.push_str(&format!("Content-Length: {}\r\n", request.body.len()));
    }
    head.push_str("\r\n");

    let mut bytes = head.into_bytes();
    bytes.extend_from_slice(&request.body);
    bytes
}

/// Read one response to a `method` request from `reader`.
///
/// The returned flag is true when the peer closed, or announced it will
/// close, the connection after this response.
pub fn read_response<R: BufRead>(reader: &mut R, method: HttpMethod) -> Result<(HttpResponse, bool)> {
    let mut response = loop {
        let head = read_head(reader)?;
        let response = parse_head(&head)?;
        // Interim responses (100 Continue and friends) precede the real one.
        if (100..200).contains(&response.status) && response.status != 101 {
            debug!("skipping interim response {}", response.status);
            continue;
        }
        break response;
    };

    let mut peer_closed = announces_close(&response);
    if method == HttpMethod::Head || matches!(response.status, 100..=199 | 204 | 304) {
        return Ok((response, peer_closed));
    }

    if is_chunked(&response) {
        response.body = read_chunked(reader)?;
    } else if let Some(length) = response.header("Content-Length") {
        let length: usize = length
            .trim()
            .parse()
            .map_err(|_| GurlError::Protocol(format!("invalid Content-Length {length:?}")))?;
        read_exactly(reader, length, &mut response.body, "body shorter than Content-Length")?;
    } else {
        reader.read_to_end(&mut response.body)?;
        peer_closed = true;
    }
    debug!("read {} byte body", response.body.len());
    Ok((response, peer_closed))
}

/// Bytes up to and including the blank line ending the head.
fn read_head<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut head = Vec::new();
    loop {
        let start = head.len();
        let n = reader.read_until(b'\n', &mut head)?;
        if n == 0 {
            return Err(GurlError::Protocol(if head.is_empty() {
                "connection closed before a response was received".to_string()
            } else {
                "connection closed inside the response head".to_string()
            }));
        }
        if head.len() > MAX_HEAD_BYTES {
            return Err(GurlError::Protocol("response head too large".to_string()));
        }
        let line = &head[start..];
        if start > 0 && (line == b"\r\n" || line == b"\n") {
            return Ok(head);
        }
    }
}

fn parse_head(head: &[u8]) -> Result<HttpResponse> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut parsed = httparse::Response::new(&mut headers);
    match parsed.parse(head) {
        Ok(httparse::Status::Complete(_)) => {}
        Ok(httparse::Status::Partial) => {
            return Err(GurlError::Protocol("incomplete response head".to_string()));
        }
        Err(e) => return Err(GurlError::Protocol(e.to_string())),
    }

    let status = parsed
        .code
        .ok_or_else(|| GurlError::Protocol("missing status code".to_string()))?;
    Ok(HttpResponse {
        version: parsed.version.unwrap_or(1),
        status,
        reason: parsed.reason.unwrap_or_default().to_string(),
        headers: parsed
            .headers
            .iter()
            .map(|h| (h.name.to_string(), String::from_utf8_lossy(h.value).into_owned()))
            .collect(),
        body: Vec::new(),
    })
}

fn is_chunked(response: &HttpResponse) -> bool {
    response
        .header_values("Transfer-Encoding")
        .any(|v| v.to_ascii_lowercase().contains("chunked"))
}

fn announces_close(response: &HttpResponse) -> bool {
    let connection = |token: &str| {
        response.header_values("Connection").any(|v| {
            v.split(',')
                .any(|t| t.trim().eq_ignore_ascii_case(token))
        })
    };
    connection("close") || (response.version == 0 && !connection("keep-alive"))
}

fn read_chunked<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    loop {
        let line = read_line(reader, "connection closed inside a chunk header")?;
        let size = line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size, 16)
            .map_err(|_| GurlError::Protocol(format!("invalid chunk size {size:?}")))?;
        if size == 0 {
            break;
        }
        if body.len().checked_add(size).is_none() {
            return Err(GurlError::Protocol("chunked body too large".to_string()));
        }
        read_exactly(reader, size, &mut body, "connection closed inside a chunk")?;
        let terminator = read_line(reader, "connection closed after a chunk")?;
        if !terminator.trim().is_empty() {
            return Err(GurlError::Protocol("missing CRLF after chunk".to_string()));
        }
    }
    // Trailers are discarded. A peer that closes instead of sending the
    // final blank line has still delivered the whole body.
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 || line.trim().is_empty() {
            break;
        }
    }
    Ok(body)
}

fn read_line<R: BufRead>(reader: &mut R, eof_message: &str) -> Result<String> {
    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line)? == 0 {
        return Err(GurlError::Protocol(eof_message.to_string()));
    }
    Ok(String::from_utf8_lossy(&line).into_owned())
}

/// Append exactly `len` bytes to `buf`. The buffer grows with what actually
/// arrives, so a peer announcing an absurd length cannot force a huge
/// allocation up front.
fn read_exactly<R: BufRead>(reader: &mut R, len: usize, buf: &mut Vec<u8>, short_message: &str) -> Result<()> {
    let wanted = u64::try_from(len).map_err(|_| GurlError::Protocol(short_message.to_string()))?;
    let read = reader.take(wanted).read_to_end(buf)?;
    if read != len {
        return Err(GurlError::Protocol(short_message.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::endpoint::parse_url;
    use crate::headers::HeaderTable;

    fn request(method: HttpMethod, url: &str, body: &[u8]) -> HttpRequest {
        HttpRequest {
            method,
            url: parse_url(url).unwrap(),
            headers: HeaderTable::with_defaults(),
            body: body.to_vec(),
        }
    }

    fn read(raw: &str, method: HttpMethod) -> Result<(HttpResponse, bool)> {
        read_response(&mut Cursor::new(raw.as_bytes().to_vec()), method)
    }

    #[test]
    fn get_request_has_host_and_defaults_and_no_length() {
        let bytes = encode_request(&request(HttpMethod::Get, "http://example.com/a/b?x=1", b""));
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "GET /a/b?x=1 HTTP/1.1\r\nHost: example.com\r\nUser-Agent: Gurl\r\nAccept: */*\r\n\r\n"
        );
    }

    #[test]
    fn post_request_carries_length_and_body() {
        let bytes = encode_request(&request(HttpMethod::Post, "http://example.com:8080", b"name=joe"));
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("POST / HTTP/1.1\r\nHost: example.com:8080\r\n"));
        assert!(text.ends_with("Content-Length: 8\r\n\r\nname=joe"));
    }

    #[test]
    fn explicit_host_header_replaces_derived_one() {
        let mut req = request(HttpMethod::Get, "http://example.com/", b"");
        req.headers.set("Host", "internal.example");
        let text = String::from_utf8(encode_request(&req)).unwrap();
        assert!(!text.contains("Host: example.com"));
        assert!(text.contains("Host: internal.example\r\n"));
    }

    #[test]
    fn content_length_body() {
        let (resp, closed) = read(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nhello",
            HttpMethod::Get,
        )
        .unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.reason, "OK");
        assert_eq!(resp.body, b"hello");
        assert!(!closed);
    }

    #[test]
    fn body_until_eof_reports_close() {
        let (resp, closed) = read("HTTP/1.1 200 OK\r\n\r\nuntil the end", HttpMethod::Get).unwrap();
        assert_eq!(resp.body, b"until the end");
        assert!(closed);
    }

    #[test]
    fn connection_close_header_reports_close() {
        let (_, closed) = read(
            "HTTP/1.1 200 OK\r\nConnection: close\r\nContent-Length: 0\r\n\r\n",
            HttpMethod::Get,
        )
        .unwrap();
        assert!(closed);
    }

    #[test]
    fn chunked_body_is_reassembled() {
        let (resp, _) = read(
            "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n5;ext=1\r\npedia\r\n0\r\nX-Trailer: y\r\n\r\n",
            HttpMethod::Get,
        )
        .unwrap();
        assert_eq!(resp.body, b"Wikipedia");
    }

    #[test]
    fn head_response_has_no_body() {
        let (resp, _) = read("HTTP/1.1 200 OK\r\nContent-Length: 42\r\n\r\n", HttpMethod::Head).unwrap();
        assert!(resp.body.is_empty());
    }

    #[test]
    fn interim_responses_are_skipped() {
        let (resp, _) = read(
            "HTTP/1.1 100 Continue\r\n\r\nHTTP/1.1 201 Created\r\nContent-Length: 2\r\n\r\nok",
            HttpMethod::Post,
        )
        .unwrap();
        assert_eq!(resp.status, 201);
        assert_eq!(resp.body, b"ok");
    }

    #[test]
    fn http_10_without_keep_alive_closes() {
        let (resp, closed) = read("HTTP/1.0 200 OK\r\nContent-Length: 1\r\n\r\nx", HttpMethod::Get).unwrap();
        assert_eq!(resp.version, 0);
        assert!(closed);
    }

    #[test]
    fn eof_before_response_is_a_protocol_error() {
        let err = read("", HttpMethod::Get).unwrap_err();
        assert!(matches!(err, GurlError::Protocol(_)));
    }

    #[test]
    fn truncated_head_is_a_protocol_error() {
        let err = read("HTTP/1.1 200 OK\r\nContent-", HttpMethod::Get).unwrap_err();
        assert_eq!(err.to_string(), "invalid response: connection closed inside the response head");
    }

    #[test]
    fn short_body_is_a_protocol_error() {
        let err = read("HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nabc", HttpMethod::Get).unwrap_err();
        assert_eq!(err.to_string(), "invalid response: body shorter than Content-Length");
    }

    #[test]
    fn garbage_is_a_protocol_error() {
        let err = read("SSH-2.0-OpenSSH\r\n\r\n", HttpMethod::Get).unwrap_err();
        assert!(matches!(err, GurlError::Protocol(_)));
    }

    #[test]
    fn huge_content_length_is_a_protocol_error() {
        let err = read(
            "HTTP/1.1 200 OK\r\nContent-Length: 18446744073709551615\r\n\r\nabc",
            HttpMethod::Get,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid response: body shorter than Content-Length");
    }

    #[test]
    fn huge_chunk_size_is_a_protocol_error() {
        let err = read(
            "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nffffffffffffffff\r\nabc",
            HttpMethod::Get,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid response: connection closed inside a chunk");
    }

    #[test]
    fn chunk_sizes_that_overflow_are_a_protocol_error() {
        let err = read(
            "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n1\r\na\r\nffffffffffffffff\r\n",
            HttpMethod::Get,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid response: chunked body too large");
    }

    #[test]
    fn bad_chunk_size_is_a_protocol_error() {
        let err = read(
            "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nzz\r\n",
            HttpMethod::Get,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid response: invalid chunk size \"zz\"");
    }
}
