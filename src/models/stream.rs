use std::{
    pin::Pin,
    task::{Context, Poll},
};

use futures::Stream;

use crate::error::GenerationError;

use super::Response;

/// The fragment stream produced by a streaming generation call.
///
/// Yields one [`Response`] per fragment the service sent, in arrival order,
/// and ends when the upstream body ends.
#[derive(Debug)]
pub struct ResponseStream {
    receiver: tokio::sync::mpsc::Receiver<Result<Response, GenerationError>>,
}

impl ResponseStream {
    /// Creates a new ResponseStream over a channel of parsed fragments.
    pub fn new(
        receiver: tokio::sync::mpsc::Receiver<Result<Response, GenerationError>>,
    ) -> Self {
        Self { receiver }
    }
}

impl Stream for ResponseStream {
    type Item = Result<Response, GenerationError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}
