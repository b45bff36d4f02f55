//! The transport seam: anything able to send an [`http::Request`] and hand back an
//! [`http::Response`] can carry signed S3 traffic.

mod error;
#[cfg(feature = "tokio-http")]
pub mod tokio;

use std::{future::Future, pin::Pin};

use bytes::Bytes;
pub use error::HttpError;
use http::{Request, Response};
use http_body::Body;
use http_body_util::BodyExt;

use crate::BoxedError;

pub trait HttpClient: Send + Sync {
    type RespBody: Body<Data: Into<Bytes>, Error: Into<BoxedError>> + Send + Sync + 'static;

    fn send_request<B>(
        &self,
        request: Request<B>,
    ) -> impl Future<Output = Result<Response<Self::RespBody>, HttpError>> + Send
    where
        B: Body + Send + Sync + 'static,
        B::Data: Into<Bytes>,
        B::Error: Into<BoxedError>;
}

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, HttpError>;

/// Object safe form of [`HttpClient`], implemented for every [`HttpClient`].
pub trait DynHttpClient: Send + Sync {
    fn dyn_send_request(
        &self,
        request: Request<BoxBody>,
    ) -> Pin<Box<dyn Future<Output = Result<Response<BoxBody>, HttpError>> + Send + '_>>;
}

impl<C> DynHttpClient for C
where
    C: HttpClient,
{
    fn dyn_send_request(
        &self,
        request: Request<BoxBody>,
    ) -> Pin<Box<dyn Future<Output = Result<Response<BoxBody>, HttpError>> + Send + '_>> {
        Box::pin(async move {
            let (parts, body) = self.send_request(request).await?.into_parts();
            Ok(Response::from_parts(
                parts,
                BoxBody::new(
                    body.map_frame(|f| f.map_data(|data| data.into()))
                        .map_err(|e| HttpError::from(e.into() as BoxedError)),
                ),
            ))
        })
    }
}

impl HttpClient for Box<dyn DynHttpClient> {
    type RespBody = BoxBody;

    async fn send_request<B>(
        &self,
        request: Request<B>,
    ) -> Result<Response<Self::RespBody>, HttpError>
    where
        B: Body + Send + Sync + 'static,
        B::Data: Into<Bytes>,
        B::Error: Into<BoxedError>,
    {
        let (parts, body) = request.into_parts();
        let request = Request::from_parts(
            parts,
            BoxBody::new(
                body.map_frame(|f| f.map_data(|data| data.into()))
                    .map_err(|e| HttpError::from(e.into() as BoxedError)),
            ),
        );
        self.as_ref().dyn_send_request(request).await
    }
}
