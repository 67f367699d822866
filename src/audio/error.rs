use std::io;
use std::path::PathBuf;

/// A source could not be turned into sound.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode audio: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("no audio output: {0}")]
    Output(#[from] rodio::StreamError),

    #[error("source '{0}' is not a local file")]
    Unsupported(String),
}
