//! Submission tests against a canned loopback server
//!
//! Each test binds an ephemeral port, answers exactly one request with a
//! fixed response and hands the raw request back for inspection.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use kitabu_publish::{
    Attachment, BookDraft, PublishClient, PublishError, PublishOptions, GENERIC_FAILURE,
};

struct Captured {
    request_line: String,
    body: String,
}

fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let base = format!("http://{}", listener.local_addr().expect("local addr"));
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("request line");
        let mut content_length = None;
        let mut chunked = false;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("header");
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            let lower = line.to_ascii_lowercase();
            if let Some(value) = lower.strip_prefix("content-length:") {
                content_length = value.trim().parse::<usize>().ok();
            }
            if lower.starts_with("transfer-encoding:") && lower.contains("chunked") {
                chunked = true;
            }
        }

        let mut raw = Vec::new();
        if let Some(len) = content_length {
            raw.resize(len, 0);
            reader.read_exact(&mut raw).expect("body");
        } else if chunked {
            while !raw.ends_with(b"0\r\n\r\n") {
                let mut buf = [0u8; 4096];
                let n = reader.read(&mut buf).expect("chunk");
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let mut stream = stream;
        stream.write_all(response.as_bytes()).expect("respond");
        stream.flush().expect("flush");

        Captured {
            request_line: request_line.trim_end().to_string(),
            body: String::from_utf8_lossy(&raw).into_owned(),
        }
    });
    (base, handle)
}

fn client(base: &str) -> PublishClient {
    let options = PublishOptions::default()
        .with_base_url(base)
        .with_timeout(Duration::from_secs(5));
    PublishClient::new(&options).expect("client")
}

fn draft() -> BookDraft {
    let mut draft = BookDraft::new("Tembo Mdogo", "Tembo mdogo anajifunza kuogelea.");
    draft.cover = Some(Attachment::new("cover.png", "image/png", b"PNGDATA".to_vec()));
    let first = draft.add_page();
    draft.set_page_text(first, "Tembo mdogo aliogopa maji.");
    draft.set_page_image(
        first,
        Some(Attachment::new("p1.png", "image/png", b"P1".to_vec())),
    );
    let second = draft.add_page();
    draft.set_page_text(second, "Mama yake alimfundisha kuogelea.");
    draft
}

// -- Success ------------------------------------------------------------------

#[test]
fn test_submit_posts_multipart_form() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"message":"Book created successfully","book_id":7}"#,
    );
    let ack = client(&base).submit(&draft()).expect("accepted");
    assert_eq!(ack.book_id, Some(7));
    assert_eq!(ack.user_message(), "Book created successfully!");

    let captured = server.join().expect("server thread");
    assert_eq!(captured.request_line, "POST /api/books HTTP/1.1");
    for field in [
        r#"name="title""#,
        r#"name="description""#,
        r#"name="coverImage"; filename="cover.png""#,
        r#"name="pages[0][text]""#,
        r#"name="pages[0][image]"; filename="p1.png""#,
        r#"name="pages[1][text]""#,
    ] {
        assert!(captured.body.contains(field), "missing {}", field);
    }
    assert!(!captured.body.contains("pages[1][image]"));
    assert!(captured.body.contains("Mama yake alimfundisha kuogelea."));
}

// -- Failures -----------------------------------------------------------------

#[test]
fn test_server_error_is_surfaced_verbatim() {
    let (base, server) = serve_once("403 Forbidden", r#"{"error":"Not authorized to create books"}"#);
    let err = client(&base).submit(&draft()).expect_err("rejected");
    server.join().expect("server thread");
    assert_eq!(err.user_message(), "Error: Not authorized to create books");
}

#[test]
fn test_non_json_answer_is_generic_failure() {
    let (base, server) = serve_once("200 OK", "created");
    let err = client(&base).submit(&draft()).expect_err("undecodable");
    server.join().expect("server thread");
    assert!(matches!(err, PublishError::Decode(_)));
    assert_eq!(err.user_message(), GENERIC_FAILURE);
}

#[test]
fn test_unreachable_server_is_generic_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let base = format!("http://{}", listener.local_addr().expect("local addr"));
    drop(listener);

    let err = client(&base).submit(&draft()).expect_err("no server");
    assert!(matches!(err, PublishError::Transport(_)));
    assert_eq!(err.user_message(), GENERIC_FAILURE);
}
