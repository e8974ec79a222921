use std::time::Duration;

use chatdock_ui::{InitialMessage, Sender, markdown_to_html};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use snafu::{OptionExt, ResultExt};
use url::form_urlencoded;

use crate::error::{ClientResult, DecodeBodySnafu, EncodeBodySnafu, UnexpectedPayloadSnafu};
use crate::http::{Headers, HttpClient, HttpClientConfig, Method, RequestConfig, ResponseData};

pub const DEFAULT_TEAM_NAME: &str = "OA-TEST";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const HISTORY_PATH: &str = "/chat/history";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryEndpoint {
    #[default]
    Query,
    QueryConfig,
}

impl QueryEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Query => "/chat/query",
            Self::QueryConfig => "/chat/query-config",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChatApiConfig {
    pub base_url: String,
    /// A fresh v4 UUID is used when absent.
    pub session_id: Option<String>,
    pub team_name: String,
    pub version: String,
    pub endpoint: QueryEndpoint,
    pub headers: Headers,
    pub timeout_ms: u64,
}

impl Default for ChatApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            session_id: None,
            team_name: DEFAULT_TEAM_NAME.to_string(),
            version: DEFAULT_VERSION.to_string(),
            endpoint: QueryEndpoint::default(),
            headers: Headers::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ChatApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: QueryEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }
}

/// Per-call extras for [`ChatApi::send_message`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendOptions {
    pub metadata: Option<Map<String, Value>>,
    pub headers: Headers,
}

impl SendOptions {
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }
}

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    session_id: &'a str,
    team_name: &'a str,
    version: &'a str,
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a Map<String, Value>>,
}

/// Decoded reply of a query call.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryReply {
    /// `data.content`, rendered as markdown.
    Markdown(String),
    /// `data.response`, `data.reply`, a bare string, or a text body.
    Plain(String),
    Unrecognized(Value),
}

#[derive(Debug, Deserialize)]
struct ReplyEnvelope {
    data: ReplyData,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplyData {
    Content { content: String },
    Response { response: String },
    Reply { reply: String },
    Bare(String),
}

impl QueryReply {
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value::<ReplyEnvelope>(value.clone()) {
            Ok(ReplyEnvelope {
                data: ReplyData::Content { content },
            }) => Self::Markdown(content),
            Ok(ReplyEnvelope {
                data:
                    ReplyData::Response { response: text }
                    | ReplyData::Reply { reply: text }
                    | ReplyData::Bare(text),
            }) => Self::Plain(text),
            Err(_) => Self::Unrecognized(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryKind {
    UserMessage,
    AssistantMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    pub content: String,
}

impl HistoryEntry {
    /// Assistant entries are markdown and become rendered markup.
    pub fn into_initial_message(self) -> InitialMessage {
        match self.kind {
            HistoryKind::UserMessage => InitialMessage::text(Sender::User, self.content),
            HistoryKind::AssistantMessage => {
                InitialMessage::html(Sender::Bot, markdown_to_html(&self.content), true)
            }
        }
    }
}

/// Session-bound caller for the chat backend.
pub struct ChatApi {
    client: HttpClient,
    session_id: String,
    team_name: String,
    version: String,
    endpoint: QueryEndpoint,
}

impl ChatApi {
    pub fn new(config: ChatApiConfig) -> ClientResult<Self> {
        let mut http_config = HttpClientConfig::new(config.base_url)
            .with_timeout(Duration::from_millis(config.timeout_ms));
        for (name, value) in &config.headers {
            http_config = http_config.with_header(name, value.clone());
        }

        let session_id = config
            .session_id
            .filter(|session_id| !session_id.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        tracing::debug!(
            session_id = %session_id,
            endpoint = config.endpoint.path(),
            "chat API ready"
        );
        Ok(Self {
            client: HttpClient::new(http_config)?,
            session_id,
            team_name: config.team_name,
            version: config.version,
            endpoint: config.endpoint,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn http(&self) -> &HttpClient {
        &self.client
    }

    pub fn http_mut(&mut self) -> &mut HttpClient {
        &mut self.client
    }

    /// Posts `text` to the query endpoint. The configured team and version select the
    /// route through the query string; the body always carries the fixed identifiers.
    pub async fn send_message(&self, text: &str, options: SendOptions) -> ClientResult<QueryReply> {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("team_name", &self.team_name)
            .append_pair("version", &self.version)
            .finish();
        let body = QueryBody {
            session_id: &self.session_id,
            team_name: DEFAULT_TEAM_NAME,
            version: DEFAULT_VERSION,
            query: text,
            metadata: options.metadata.as_ref(),
        };
        let data = serde_json::to_value(&body).context(EncodeBodySnafu {
            stage: "encode-query-body",
        })?;

        let url = format!("{}?{query}", self.endpoint.path());
        let request = RequestConfig::new(Method::Post, url)
            .with_headers(&options.headers)
            .with_data(data);
        let response = self.client.request(request).await?;

        let reply = match response.data {
            ResponseData::Json(value) => QueryReply::from_value(value),
            ResponseData::Text(text) => QueryReply::Plain(text),
        };
        if let QueryReply::Unrecognized(raw) = &reply {
            tracing::warn!(
                session_id = %self.session_id,
                payload = %raw,
                "unrecognized chat reply shape"
            );
        }
        Ok(reply)
    }

    /// Session history in chronological order.
    pub async fn fetch_history(&self, headers: &Headers) -> ClientResult<Vec<HistoryEntry>> {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("session_id", &self.session_id)
            .finish();
        let url = format!("{HISTORY_PATH}?{query}");
        let request = RequestConfig::new(Method::Get, url).with_headers(headers);
        let response = self.client.request(request).await?;

        let value = response
            .data
            .as_json()
            .filter(|value| value.is_array())
            .cloned()
            .context(UnexpectedPayloadSnafu {
                stage: "decode-history",
                message: "history response is not a JSON array",
            })?;
        let mut entries: Vec<HistoryEntry> = serde_json::from_value(value).context(DecodeBodySnafu {
            stage: "decode-history",
        })?;
        entries.reverse();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn reply_shapes_are_classified() {
        assert_eq!(
            QueryReply::from_value(json!({"data": {"content": "**hi**"}})),
            QueryReply::Markdown("**hi**".to_string())
        );
        assert_eq!(
            QueryReply::from_value(json!({"data": {"response": "a"}})),
            QueryReply::Plain("a".to_string())
        );
        assert_eq!(
            QueryReply::from_value(json!({"data": {"reply": "b"}})),
            QueryReply::Plain("b".to_string())
        );
        assert_eq!(
            QueryReply::from_value(json!({"data": "c"})),
            QueryReply::Plain("c".to_string())
        );
        assert_eq!(
            QueryReply::from_value(json!({"data": {"other": 1}})),
            QueryReply::Unrecognized(json!({"data": {"other": 1}}))
        );
    }

    #[test]
    fn session_id_defaults_to_a_fresh_uuid() {
        let api = ChatApi::new(ChatApiConfig::new("http://localhost")).unwrap();
        assert!(uuid::Uuid::parse_str(api.session_id()).is_ok());

        let config = ChatApiConfig::new("http://localhost").with_session_id("s-1");
        let api = ChatApi::new(config).unwrap();
        assert_eq!(api.session_id(), "s-1");
    }

    #[test]
    fn history_entries_hydrate_initial_messages() {
        let user = HistoryEntry {
            kind: HistoryKind::UserMessage,
            content: "hello".to_string(),
        }
        .into_initial_message();
        assert_eq!(user.sender, Sender::User);
        assert_eq!(user.text.as_deref(), Some("hello"));

        let bot = HistoryEntry {
            kind: HistoryKind::AssistantMessage,
            content: "**bold**".to_string(),
        }
        .into_initial_message();
        assert_eq!(bot.sender, Sender::Bot);
        assert!(bot.is_html);
        assert_eq!(bot.html.as_deref(), Some("<p><strong>bold</strong></p>\n"));
    }

    #[test]
    fn config_accepts_camel_case_keys() {
        let config: ChatApiConfig = serde_json::from_value(json!({
            "baseUrl": "http://api",
            "teamName": "T",
            "endpoint": "query-config",
            "timeoutMs": 500
        }))
        .unwrap();

        assert_eq!(config.team_name, "T");
        assert_eq!(config.version, DEFAULT_VERSION);
        assert_eq!(config.endpoint.path(), "/chat/query-config");
        assert_eq!(config.timeout_ms, 500);
    }
}
