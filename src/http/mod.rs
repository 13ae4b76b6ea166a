//! HTTP collaborators: request assembly and the transport seam.
mod client;
mod factory;
mod method;
mod request;
mod response;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{HttpClient, ReqwestClient};
pub use factory::{DefaultRequestFactory, RequestFactory};
pub use method::HttpMethod;
pub use request::{
    CONTENT_TYPE_FORM, CONTENT_TYPE_JSON, CONTENT_TYPE_TEXT, HttpRequest, RequestBody,
    parse_header_line,
};
pub use response::{BodyReader, HttpResponse};
