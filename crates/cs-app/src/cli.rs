use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// chunkscope : découpe audio en chunks et figures d'analyse par lot.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Exécutable ffmpeg (sinon recherché dans le PATH).
    #[arg(long, global = true)]
    pub ffmpeg: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Découpe un fichier audio en chunks de durée fixe.
    Split {
        /// Fichier audio source.
        input: PathBuf,

        /// Dossier de sortie (doit exister).
        output_dir: PathBuf,

        /// Durée d'un chunk en millisecondes.
        #[arg(long)]
        chunk_ms: Option<u64>,

        /// Format de sortie des chunks (mp3, wav, flac, ogg…).
        #[arg(long)]
        format: Option<String>,
    },

    /// Produit une figure waveform/spectrogramme/RMS par fichier d'un dossier.
    Analyze {
        /// Dossier contenant les fichiers audio.
        folder: PathBuf,

        /// Dossier des PNG (créé si absent).
        output_dir: PathBuf,

        /// Extension des fichiers à analyser, sans point.
        #[arg(long)]
        extension: Option<String>,

        /// Continuer le lot quand un fichier échoue.
        #[arg(long, default_value_t = false)]
        skip_failures: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_split_with_overrides() {
        let cli = Cli::try_parse_from([
            "chunkscope",
            "--log-level",
            "info",
            "split",
            "talk.mp3",
            "out",
            "--chunk-ms",
            "1000",
            "--format",
            "wav",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
        match cli.command {
            Command::Split {
                input,
                chunk_ms,
                format,
                ..
            } => {
                assert_eq!(input, PathBuf::from("talk.mp3"));
                assert_eq!(chunk_ms, Some(1000));
                assert_eq!(format.as_deref(), Some("wav"));
            }
            Command::Analyze { .. } => panic!("expected split"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "chunkscope",
            "analyze",
            "chunks",
            "figs",
            "--skip-failures",
            "--ffmpeg",
            "/opt/ffmpeg",
        ])
        .unwrap();
        assert_eq!(cli.ffmpeg, Some(PathBuf::from("/opt/ffmpeg")));
        assert!(matches!(
            cli.command,
            Command::Analyze {
                skip_failures: true,
                extension: None,
                ..
            }
        ));
    }

    #[test]
    fn progress_is_logged_by_default() {
        let cli = Cli::try_parse_from(["chunkscope", "split", "talk.mp3", "out"]).unwrap();
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.log_level.parse::<log::LevelFilter>().unwrap(), log::LevelFilter::Info);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["chunkscope"]).is_err());
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
