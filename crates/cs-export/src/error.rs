use thiserror::Error;

/// Errors originating from the export module.
#[derive(Error, Debug)]
pub enum ExportError {
    /// ffmpeg refused or failed to encode a chunk.
    #[error("Erreur d'encodage : {0}")]
    EncodeError(String),

    /// The figure could not be rendered or written.
    #[error("Erreur de rendu : {0}")]
    Render(String),
}
