//! Errors raised while locating, reading, or writing `config.ron`.

/// Configuration I/O failure. Gameplay code never sees these: the binary
/// logs them and falls back to [`Config::default`](crate::Config).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The platform exposes no per-user config directory.
    #[error("no config directory available on this platform")]
    NoConfigDir,

    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    /// The file exists but is not valid RON for [`Config`](crate::Config).
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),
}
