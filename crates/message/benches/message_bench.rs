use criterion::{Criterion, criterion_group, criterion_main};
use futures::executor::block_on;
use http::StatusCode;
use micro_message::codec::{RequestDecoder, ResponseEncoder};
use micro_message::connection::HttpConnection;
use micro_message::handler::make_handler;
use micro_message::map::HeaderMap;
use micro_message::protocol::{Request, Response};
use std::hint::black_box;
use std::{
    error::Error,
    io,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio_util::codec::{Decoder, Encoder};

const SIMPLE_REQUEST: &[u8] = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";

const POST_REQUEST: &[u8] = b"POST /api/v1/users HTTP/1.1\r\nHost: example.com\r\nUser-Agent: curl/8.4.0\r\nAccept: */*\r\nContent-Type: application/json\r\nContent-Length: 28\r\n\r\n{\"name\": \"Alice\", \"age\": 30}";

// Mock IO for testing
#[derive(Clone)]
struct MockIO {
    read_data: Vec<u8>,
    write_data: Vec<u8>,
    read_pos: usize,
}

impl MockIO {
    fn new(read_data: Vec<u8>) -> Self {
        Self { read_data, write_data: Vec::new(), read_pos: 0 }
    }
}

impl AsyncRead for MockIO {
    fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let remaining = &self.read_data[self.read_pos..];
        let amt = std::cmp::min(remaining.len(), buf.remaining());
        buf.put_slice(&remaining[..amt]);
        self.read_pos += amt;
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MockIO {
    fn poll_write(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize, io::Error>> {
        self.write_data.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        Poll::Ready(Ok(()))
    }
}

async fn hello_handler(_req: Request) -> Result<Response, Box<dyn Error + Send + Sync>> {
    let mut response = Response::with_status(StatusCode::OK);
    response.set_header("content-length", "12")?;
    response.set_body("Hello World!")?;
    Ok(response)
}

fn sample_response() -> Response {
    let body = "<html><body><h1>Hello World!</h1></body></html>";
    let mut response = Response::with_status(StatusCode::OK);
    response.set_header("connection", "close").unwrap();
    response.set_header("content-length", body.len().to_string()).unwrap();
    response.set_header("content-type", "text/html; charset=UTF-8").unwrap();
    response.set_header("date", "Mon, 27 Jul 2009 12:28:53 GMT").unwrap();
    response.set_body(body).unwrap();
    response
}

fn bench_request_decoder(c: &mut Criterion) {
    c.bench_function("parse_simple_request", |b| {
        b.iter(|| black_box(RequestDecoder::parse(black_box(SIMPLE_REQUEST)).unwrap()));
    });

    c.bench_function("decode_post_request", |b| {
        b.iter(|| {
            let mut decoder = RequestDecoder::new();
            let mut bytes = bytes::BytesMut::from(POST_REQUEST);
            black_box(decoder.decode(&mut bytes).unwrap());
        });
    });
}

fn bench_response_encoder(c: &mut Criterion) {
    let response = sample_response();

    c.bench_function("serialize_response", |b| {
        b.iter(|| black_box(response.serialize().unwrap()));
    });

    c.bench_function("encode_response", |b| {
        b.iter(|| {
            let mut encoder = ResponseEncoder::new();
            let mut bytes = bytes::BytesMut::new();
            black_box(encoder.encode(response.clone(), &mut bytes).unwrap());
        });
    });
}

fn bench_header_map(c: &mut Criterion) {
    let keys: Vec<String> = (0..64).map(|i| format!("x-header-{i}")).collect();

    c.bench_function("header_map_insert_64", |b| {
        b.iter(|| {
            let mut map = HeaderMap::new();
            for key in &keys {
                map.set(key, "value").unwrap();
            }
            black_box(map);
        });
    });
}

fn bench_http_connection(c: &mut Criterion) {
    let handler = Arc::new(make_handler(hello_handler));

    c.bench_function("process_simple_request", |b| {
        b.iter(|| {
            let mock_io = MockIO::new(SIMPLE_REQUEST.to_vec());
            let (reader, writer) = (mock_io.clone(), mock_io);
            let connection = HttpConnection::new(reader, writer);
            black_box(block_on(connection.process(Arc::clone(&handler))).unwrap());
        });
    });
}

criterion_group!(benches, bench_request_decoder, bench_response_encoder, bench_header_map, bench_http_connection);
criterion_main!(benches);
