use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Referenced file or folder does not exist.
    #[error("Fichier introuvable : {path}")]
    FileNotFound {
        /// Path that was not found.
        path: String,
    },

    /// An external executable required at runtime could not be located.
    #[error("Dépendance externe introuvable : {name} ({hint})")]
    DependencyUnavailable {
        /// Executable name, e.g. `ffmpeg`.
        name: String,
        /// How to make it available.
        hint: String,
    },
}
