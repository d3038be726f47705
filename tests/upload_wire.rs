use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use zerox0_upload::{
    api::HttpTransport,
    config::UploaderConfig,
    uploader::{UploadResult, Uploader},
};

/// What the stub server saw.
struct Captured {
    request_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Accept exactly one request on loopback, answer it with `status`/`body`
/// and hand back what was received.
fn stub_server(status: u16, body: &'static str) -> (String, JoinHandle<Captured>) {
    delayed_stub_server(status, body, Duration::ZERO)
}

/// Like `stub_server`, but waits `delay` after reading the request before
/// answering.
fn delayed_stub_server(
    status: u16,
    body: &'static str,
    delay: Duration,
) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((k, v)) = line.split_once(':') {
                headers.push((k.trim().to_string(), v.trim().to_string()));
            }
        }

        let mut captured = Captured {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: Vec::new(),
        };

        let content_length: Option<usize> = captured
            .header("content-length")
            .map(|len| len.parse().unwrap());
        captured.body = match content_length {
            Some(len) => {
                let mut received = vec![0u8; len];
                reader.read_exact(&mut received).unwrap();
                received
            }
            None => read_chunked(&mut reader),
        };

        thread::sleep(delay);
        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {} Stub\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
        .unwrap();
        stream.flush().unwrap();
        captured
    });

    (endpoint, handle)
}

fn read_chunked<R: BufRead>(reader: &mut R) -> Vec<u8> {
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        reader.read_line(&mut size_line).unwrap();
        let size = usize::from_str_radix(size_line.trim(), 16).unwrap();
        if size == 0 {
            let mut trailer = String::new();
            reader.read_line(&mut trailer).unwrap();
            return body;
        }
        let mut chunk = vec![0u8; size + 2];
        reader.read_exact(&mut chunk).unwrap();
        body.extend_from_slice(&chunk[..size]);
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn uploader_for(endpoint: String) -> Uploader<HttpTransport> {
    let config = UploaderConfig {
        endpoint,
        user_agent: "0x0-upload/test".to_string(),
    };
    let client = HttpTransport::client_builder().no_proxy().build().unwrap();
    Uploader::new(config, HttpTransport::with_client(client))
}

#[test]
fn posts_multipart_file_and_returns_trimmed_url() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.pdf");
    fs::write(&path, b"%PDF-1.4\x00\xff").unwrap();

    let (endpoint, server) = stub_server(200, "https://0x0.st/abc.pdf\n");
    let result = uploader_for(endpoint).upload(&path);
    let seen = server.join().unwrap();

    assert_eq!(
        result,
        UploadResult::Success {
            url: "https://0x0.st/abc.pdf".to_string()
        }
    );
    assert!(seen.request_line.starts_with("POST / "), "{}", seen.request_line);
    assert_eq!(seen.header("user-agent"), Some("0x0-upload/test"));
    assert!(seen
        .header("content-type")
        .unwrap()
        .starts_with("multipart/form-data; boundary="));
    assert!(contains(
        &seen.body,
        b"Content-Disposition: form-data; name=\"file\"; filename=\"report.pdf\""
    ));
    assert!(contains(&seen.body, b"%PDF-1.4\x00\xff"));
}

#[test]
fn server_error_surfaces_status_and_body() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, b"data").unwrap();

    let (endpoint, server) = stub_server(500, "Server error");
    let result = uploader_for(endpoint).upload(&path);
    server.join().unwrap();

    assert_eq!(
        result,
        UploadResult::Failure {
            message: "HTTP error! Status: 500 - Server error".to_string()
        }
    );
}

#[test]
fn blank_success_body_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, b"data").unwrap();

    let (endpoint, server) = stub_server(200, " \n");
    let result = uploader_for(endpoint).upload(&path);
    server.join().unwrap();

    assert_eq!(result.message(), Some("Empty response from server"));
}

#[test]
fn slow_server_is_waited_for_past_thirty_seconds() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("big.iso");
    fs::write(&path, b"data").unwrap();

    let (endpoint, server) =
        delayed_stub_server(200, "https://0x0.st/slow.iso", Duration::from_secs(35));
    let started = Instant::now();
    let result = uploader_for(endpoint).upload(&path);
    server.join().unwrap();

    assert!(started.elapsed() >= Duration::from_secs(35));
    assert_eq!(result.url(), Some("https://0x0.st/slow.iso"));
}
