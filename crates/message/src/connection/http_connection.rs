use std::error::Error;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{error, info};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::connection::ConnectionConfig;
use crate::handler::Handler;
use crate::protocol::{HttpError, ParseError, Response, ResponseError};

/// A single-exchange HTTP connection.
///
/// Reads exactly one request, hands it to the handler, writes the response and
/// shuts the write side down. All buffers belong to the connection.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    framed_write: FramedWrite<W, ResponseEncoder>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_config(reader, writer, ConnectionConfig::default())
    }

    pub fn with_config(reader: R, writer: W, config: ConnectionConfig) -> Self {
        let decoder = RequestDecoder::with_limits(config.max_header_bytes(), config.max_body_bytes());
        Self {
            framed_read: FramedRead::with_capacity(reader, decoder, config.read_buffer_capacity()),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
        }
    }

    /// Serves one request.
    ///
    /// A request that fails to parse is answered with `400 Bad Request` and the
    /// parse error is returned. A handler error is answered with
    /// `500 Internal Server Error` and is not returned.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
    {
        let request = match self.framed_read.next().await {
            Some(Ok(request)) => request,

            Some(Err(e @ ParseError::Io { .. })) => {
                error!(cause = %e, "can't read request");
                return Err(e.into());
            }

            Some(Err(e)) => {
                error!(cause = %e, "can't parse request");
                self.send_response(error_response(StatusCode::BAD_REQUEST)?).await?;
                return Err(e.into());
            }

            None => {
                info!("connection closed before a request arrived");
                return Ok(());
            }
        };

        info!(
            method = %String::from_utf8_lossy(request.method()),
            uri = %String::from_utf8_lossy(request.uri()),
            "receive request"
        );

        let result: Result<Response, Box<dyn Error + Send + Sync>> = handler.call(request).await.map_err(Into::into);
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                error!(cause = %e, "handle request error");
                error_response(StatusCode::INTERNAL_SERVER_ERROR)?
            }
        };

        match self.send_response(response).await {
            Ok(()) => Ok(()),
            Err(e @ ResponseError::Io { .. }) => Err(e.into()),
            Err(e) => {
                error!(cause = %e, "handler produced an invalid response");
                self.send_response(error_response(StatusCode::INTERNAL_SERVER_ERROR)?).await?;
                Err(e.into())
            }
        }
    }

    async fn send_response(&mut self, response: Response) -> Result<(), ResponseError> {
        self.framed_write.send(response).await?;
        self.framed_write.get_mut().shutdown().await.map_err(ResponseError::io)
    }
}

fn error_response(status: StatusCode) -> Result<Response, ResponseError> {
    let mut response = Response::with_status(status);
    response.set_header("content-length", "0")?;
    Ok(response)
}
