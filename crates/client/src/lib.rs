#![deny(unsafe_code)]

//! HTTP plumbing and the chat backend client for the chat widget.

/// Session-bound chat backend calls.
pub mod chat;
pub mod error;
/// Widget message handler backed by [`chat::ChatApi`].
pub mod handler;
/// Request/response wrapper over `reqwest`.
pub mod http;

pub use chat::{
    ChatApi, ChatApiConfig, HistoryEntry, HistoryKind, QueryEndpoint, QueryReply, SendOptions,
};
pub use error::{ClientError, ClientResult};
pub use handler::{ChatApiHandler, UNRECOGNIZED_REPLY};
pub use http::{
    HttpClient, HttpClientConfig, HttpResponse, Method, RequestConfig, RequestInterceptor,
    ResponseData, ResponseInterceptor,
};
