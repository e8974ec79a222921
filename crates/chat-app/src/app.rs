use std::path::{Path, PathBuf};
use std::sync::Arc;

use chatdock_client::{
    ChatApi, ChatApiConfig, ChatApiHandler, ClientError, HistoryEntry, QueryEndpoint,
};
use chatdock_ui::dom::ids;
use chatdock_ui::theme::{Appearance, ManualAppearance};
use chatdock_ui::{
    ChatWidget, ConfigError, ConfigLoader, Message, MountTarget, Surface, VirtualHost,
    VirtualSurface, WidgetError, WidgetHooks,
};
use serde_json::json;
use snafu::{ResultExt, Snafu};
use tokio::io::{AsyncBufReadExt, BufReader};

pub const CONFIG_DIRECTORY_NAME: &str = "chatdock";
pub const CONFIG_FILE_NAME: &str = "widget.json";
const QUIT_COMMAND: &str = "/quit";

pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|path| path.join(CONFIG_DIRECTORY_NAME))
        .unwrap_or_else(|| PathBuf::from(".chatdock"))
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join(CONFIG_FILE_NAME)
}

/// Options for one terminal chat session.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Explicit config file; a missing file is an error. Without it the default
    /// path is used when present.
    pub config: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub session_id: Option<String>,
    pub query_config: bool,
    pub history: bool,
    pub theme: Option<String>,
    pub appearance: Option<Appearance>,
    pub out: PathBuf,
}

/// Terminal chat session around an in-memory widget.
pub struct Session {
    widget: ChatWidget<VirtualSurface>,
    api: Option<Arc<ChatApi>>,
    appearance: ManualAppearance,
}

impl Session {
    pub async fn start(options: &SessionOptions) -> Result<Self, AppError> {
        let mut loader = ConfigLoader::new();
        match &options.config {
            Some(path) => loader = loader.merge_file(path).context(ConfigSnafu)?,
            None => {
                let path = default_config_path();
                if path.exists() {
                    loader = loader.merge_file(&path).context(ConfigSnafu)?;
                } else {
                    tracing::debug!(?path, "no widget config file, using defaults");
                }
            }
        }
        if let Some(theme) = &options.theme {
            loader = loader.merge_value(json!({ "theme": theme }));
        }

        let appearance = ManualAppearance::new(options.appearance);
        let mut config = loader.load(options.appearance).context(ConfigSnafu)?;

        let mut host = VirtualHost::new().with_appearance(appearance.clone());
        if let MountTarget::Selector(selector) = &config.target {
            host = host.with_element(selector.clone());
        }

        let api = match &options.endpoint {
            Some(endpoint) => {
                let mut api_config = ChatApiConfig::new(endpoint.clone());
                api_config.session_id = options.session_id.clone();
                if options.query_config {
                    api_config = api_config.with_endpoint(QueryEndpoint::QueryConfig);
                }
                Some(Arc::new(ChatApi::new(api_config).context(ClientSnafu {
                    stage: "create-chat-api",
                })?))
            }
            None => None,
        };

        // History seeds the initial messages, which take the greeting's place.
        if options.history
            && let Some(api) = &api
        {
            let entries = api
                .fetch_history(&Default::default())
                .await
                .context(ClientSnafu {
                    stage: "fetch-history",
                })?;
            tracing::info!(count = entries.len(), "loaded chat history");
            config
                .initial_messages
                .extend(entries.into_iter().map(HistoryEntry::into_initial_message));
        }

        let mut hooks = WidgetHooks::new()
            .on_open(|| tracing::debug!("widget opened"))
            .on_close(|| tracing::debug!("widget closed"));
        if let Some(api) = &api {
            hooks = hooks.on_message(ChatApiHandler::new(Arc::clone(api)));
        }

        let widget = ChatWidget::mount(config, hooks, &host).context(MountSnafu)?;

        Ok(Self {
            widget,
            api,
            appearance,
        })
    }

    pub fn widget(&self) -> &ChatWidget<VirtualSurface> {
        &self.widget
    }

    pub fn session_id(&self) -> Option<&str> {
        self.api.as_deref().map(ChatApi::session_id)
    }

    /// Runs one send cycle for `line` and returns the messages it added.
    pub async fn send(&mut self, line: &str) -> &[Message] {
        let before = self.widget.messages().len();
        self.widget.surface().set_input_value(ids::INPUT, line);
        self.widget.send_message().await;
        &self.widget.messages()[before..]
    }

    /// Switches the simulated system appearance.
    pub fn set_appearance(&self, appearance: Appearance) {
        self.appearance.set(appearance);
    }

    /// Reads lines from stdin until EOF or `/quit`, echoing every new message.
    pub async fn run_stdin(&mut self) -> Result<(), AppError> {
        for message in self.widget.messages() {
            println!("{}", describe(message));
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await.context(ReadInputSnafu {
            stage: "read-stdin-line",
        })? {
            match line.trim() {
                QUIT_COMMAND => break,
                "/dark" => self.set_appearance(Appearance::Dark),
                "/light" => self.set_appearance(Appearance::Light),
                _ => {
                    for message in self.send(&line).await {
                        println!("{}", describe(message));
                    }
                }
            }
        }
        Ok(())
    }

    /// Writes the rendered widget as a standalone page and tears the widget down.
    pub fn finish(self, out: &Path) -> Result<(), AppError> {
        write_preview(out, &self.widget.surface().to_html())?;
        self.widget.destroy();
        Ok(())
    }
}

fn describe(message: &Message) -> String {
    format!(
        "[{}] {}: {}",
        message.time_label(),
        message.sender.as_str(),
        message.content.as_str()
    )
}

/// Shadow content is emitted as a declarative shadow root so `:host` rules apply.
pub fn preview_document(shadow_html: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>chatdock preview</title>\n</head>\n<body>\n\
         <div id=\"chatdock-host\"><template shadowrootmode=\"open\">{shadow_html}</template></div>\n\
         </body>\n</html>\n"
    )
}

pub fn write_preview(path: &Path, shadow_html: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context(CreateDirSnafu {
            stage: "create-preview-directory",
            path: parent.to_path_buf(),
        })?;
    }

    let temp_path = path.with_extension("html.tmp");
    std::fs::write(&temp_path, preview_document(shadow_html)).context(WriteFileSnafu {
        stage: "write-temporary-preview-file",
        path: temp_path.clone(),
    })?;

    std::fs::rename(&temp_path, path).context(RenameTempFileSnafu {
        stage: "rename-temporary-preview-file",
        from: temp_path,
        to: path.to_path_buf(),
    })?;

    tracing::info!(?path, "saved widget preview");
    Ok(())
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AppError {
    #[snafu(display("failed to load widget config: {source}"))]
    Config { source: ConfigError },
    #[snafu(display("failed to mount widget: {source}"))]
    Mount { source: WidgetError },
    #[snafu(display("chat backend call failed on `{stage}`: {source}"))]
    Client {
        stage: &'static str,
        source: ClientError,
    },
    #[snafu(display("failed to read input on `{stage}`: {source}"))]
    ReadInput {
        stage: &'static str,
        source: std::io::Error,
    },
    #[snafu(display("failed to create preview directory at {path:?} on `{stage}`: {source}"))]
    CreateDir {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("failed to write preview file at {path:?} on `{stage}`: {source}"))]
    WriteFile {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "failed to replace preview file from {from:?} to {to:?} on `{stage}`: {source}"
    ))]
    RenameTempFile {
        stage: &'static str,
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use chatdock_ui::Sender;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn options() -> SessionOptions {
        SessionOptions {
            config: None,
            appearance: Some(Appearance::Light),
            out: PathBuf::from("unused.html"),
            ..SessionOptions::default()
        }
    }

    #[tokio::test]
    async fn session_without_backend_only_records_user_messages() {
        let mut session = Session::start(&options()).await.unwrap();
        let greeting = session.widget().messages().len();

        let added = session.send("hello").await.to_vec();

        assert_eq!(added.len(), 1);
        assert_eq!(added[0].sender, Sender::User);
        assert_eq!(session.widget().messages().len(), greeting + 1);
        assert_eq!(session.session_id(), None);
    }

    #[tokio::test]
    async fn explicit_missing_config_is_an_error() {
        let options = SessionOptions {
            config: Some(PathBuf::from("/definitely/not/here/widget.json")),
            ..options()
        };

        let error = Session::start(&options).await.err().unwrap();
        assert!(matches!(error, AppError::Config { .. }));
    }

    #[tokio::test]
    async fn theme_flag_overrides_config() {
        let options = SessionOptions {
            theme: Some("dark".to_string()),
            ..options()
        };
        let session = Session::start(&options).await.unwrap();

        assert_eq!(session.widget().config().theme.to_string(), "dark");
    }

    #[tokio::test]
    async fn history_replaces_the_greeting() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chat/history"))
            .and(query_param("session_id", "s-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"type": "AssistantMessage", "content": "an answer"},
                {"type": "UserMessage", "content": "old question"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let options = SessionOptions {
            endpoint: Some(server.uri()),
            session_id: Some("s-1".to_string()),
            history: true,
            ..options()
        };
        let session = Session::start(&options).await.unwrap();

        let log = session
            .widget()
            .messages()
            .iter()
            .map(|message| (message.sender, message.content.as_str().to_string()))
            .collect::<Vec<_>>();
        assert_eq!(
            log,
            vec![
                (Sender::User, "old question".to_string()),
                (Sender::Bot, "<p>an answer</p>\n".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn greeting_is_shown_without_history() {
        let session = Session::start(&options()).await.unwrap();

        let first = &session.widget().messages()[0];
        assert_eq!(first.sender, Sender::Bot);
        assert_eq!(first.content.as_str(), session.widget().config().greeting);
    }

    #[test]
    fn preview_is_written_atomically() {
        let dir = std::env::temp_dir().join(format!("chatdock-preview-{}", std::process::id()));
        let path = dir.join("nested").join("preview.html");

        write_preview(&path, "<div id=\"chatbot-root\"></div>").unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let expected = "<template shadowrootmode=\"open\"><div id=\"chatbot-root\"></div>";
        assert!(written.contains(expected));
        assert!(!path.with_extension("html.tmp").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
