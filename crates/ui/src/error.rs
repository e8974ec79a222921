use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("failed to extract widget config on `{stage}`: {source}"))]
    Extract {
        stage: &'static str,
        source: figment::Error,
    },
    #[snafu(display("widget config file {path:?} does not exist"))]
    MissingFile { stage: &'static str, path: PathBuf },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum WidgetError {
    #[snafu(display("target element not found: {target}"))]
    TargetNotFound { stage: &'static str, target: String },
    #[snafu(display("invalid widget configuration on `{stage}`: {source}"))]
    Config {
        stage: &'static str,
        source: ConfigError,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type WidgetResult<T> = Result<T, WidgetError>;
