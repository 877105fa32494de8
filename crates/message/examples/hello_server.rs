use async_trait::async_trait;
use http::StatusCode;
use std::error::Error;
use std::sync::Arc;

use micro_message::connection::{ConnectionConfig, HttpConnection};
use micro_message::handler::Handler;
use micro_message::protocol::{Request, Response, ResponseError};
use tokio::net::TcpListener;

use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!(port = 8080, "start listening");
    let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return Err(e.into());
        }
    };

    let config = ConnectionConfig::default().with_max_body_bytes(64 * 1024);
    let handler = Arc::new(SimpleHandler);
    loop {
        let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        let handler = Arc::clone(&handler);

        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = HttpConnection::with_config(reader, writer, config);
            if let Err(e) = connection.process(handler).await {
                error!(cause = %e, "connection process error");
            }
        });
    }
}

struct SimpleHandler;

#[async_trait]
impl Handler for SimpleHandler {
    type Error = ResponseError;

    async fn call(&self, request: Request) -> Result<Response, Self::Error> {
        let body = match request.header("user-agent") {
            Some(agent) => format!("Hello {}!\r\n", String::from_utf8_lossy(agent)),
            None => "Hello World!\r\n".to_string(),
        };

        let mut response = Response::with_status(StatusCode::OK);
        response.set_header("Connection", "close")?;
        response.set_header("Content-Type", "text/plain; charset=UTF-8")?;
        response.set_header("Content-Length", body.len().to_string())?;
        response.set_body(body)?;

        Ok(response)
    }
}
