use thiserror::Error;

/// Errors originating from the audio module.
#[derive(Error, Debug)]
pub enum AudioError {
    /// The container could not be probed (not audio, or unknown format).
    #[error("Format audio non supporté : {0}")]
    UnsupportedFormat(String),

    /// The container holds no decodable audio track.
    #[error("Aucune piste audio décodable")]
    NoTrack,

    /// Audio decode error.
    #[error("Erreur de décodage : {0}")]
    DecodeError(String),
}
