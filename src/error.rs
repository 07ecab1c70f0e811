use std::fmt::Display;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Command line could not be parsed (also carries `--help`/`--version`)
    #[error(transparent)]
    Args(#[from] clap::Error),

    /// A parsed option has a value outside its accepted range
    #[error("invalid configuration: {0}")]
    Config(String),

    /// PortAudio reported a failure
    #[error("audio backend: {0}")]
    Audio(#[from] portaudio::Error),

    /// No input device matched the request
    #[error("no usable input device: {0}")]
    NoInputDevice(String),

    /// SDL failed to create or update a drawing resource
    #[error("graphics backend: {0}")]
    Graphics(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Error {
        Error::Config(msg.into())
    }

    /// SDL reports most failures as plain strings or ad-hoc error types.
    pub fn graphics<E: Display>(err: E) -> Error {
        Error::Graphics(err.to_string())
    }
}
