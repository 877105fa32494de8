//! Request handlers.
//!
//! A [`Handler`] turns one parsed [`Request`] into a [`Response`]. Plain async
//! functions become handlers through [`make_handler`].

use async_trait::async_trait;
use std::error::Error;

use crate::protocol::{Request, Response};

#[async_trait]
pub trait Handler: Send + Sync {
    type Error: Into<Box<dyn Error + Send + Sync>>;

    async fn call(&self, req: Request) -> Result<Response, Self::Error>;
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<Err, F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Err: Into<Box<dyn Error + Send + Sync>>,
    Fut: Future<Output = Result<Response, Err>> + Send,
{
    type Error = Err;

    async fn call(&self, req: Request) -> Result<Response, Self::Error> {
        (self.f)(req).await
    }
}

pub fn make_handler<F, Err, Ret>(f: F) -> HandlerFn<F>
where
    Err: Into<Box<dyn Error + Send + Sync>>,
    Ret: Future<Output = Result<Response, Err>>,
    F: Fn(Request) -> Ret,
{
    HandlerFn { f }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    async fn echo_uri(request: Request) -> Result<Response, Box<dyn Error + Send + Sync>> {
        let mut response = Response::with_status(StatusCode::OK);
        response.set_header("content-length", request.uri().len().to_string())?;
        response.set_body(request.uri())?;
        Ok(response)
    }

    #[tokio::test]
    async fn fn_becomes_handler() {
        let handler = make_handler(echo_uri);
        let request = Request::parse(b"GET /echo HTTP/1.1\r\n\r\n").unwrap();

        let response = handler.call(request).await.unwrap();
        assert_eq!(response.status_code(), Some(200));
        assert_eq!(response.body().as_bytes(), b"/echo");
    }
}
