use anyhow::Result;
use clap::Parser;
use cs_core::config::{FailurePolicy, ToolConfig};
use cs_export::encoder::FfmpegSink;
use cs_export::ffmpeg::require_ffmpeg;
use cs_export::text::TextRasterizer;

pub mod analyze;
pub mod cli;
pub mod split;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    // 3. Charger la config puis appliquer les overrides CLI
    let mut config = resolve_config(&cli)?;
    apply_overrides(&mut config, &cli);
    config.validate()?;

    // 4. Commande
    match &cli.command {
        cli::Command::Split { input, output_dir, .. } => {
            // ffmpeg est résolu avant tout décodage
            let ffmpeg = require_ffmpeg(config.ffmpeg_path.as_deref())?;
            let mut sink = FfmpegSink::new(ffmpeg, &config.chunk_format, config.chunk_bitrate.clone());
            let written = split::split_file(input, output_dir, config.chunk_length_ms, &mut sink)?;
            log::info!("{} chunk(s) écrit(s) dans {}", written.len(), output_dir.display());
        }
        cli::Command::Analyze { folder, output_dir, .. } => {
            let text = TextRasterizer::discover(config.font_path.as_deref());
            let report = analyze::analyze_folder(folder, output_dir, &config, text)?;
            log::info!(
                "Analyse terminée : {} figure(s), {} échec(s)",
                report.written.len(),
                report.failed.len()
            );
            for (path, err) in &report.failed {
                log::warn!("Échec : {} ({err})", path.display());
            }
        }
    }
    Ok(())
}

/// Config file if present, defaults otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<ToolConfig> {
    if cli.config.exists() {
        cs_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(ToolConfig::default())
    }
}

fn apply_overrides(config: &mut ToolConfig, cli: &cli::Cli) {
    if let Some(ref ffmpeg) = cli.ffmpeg {
        config.ffmpeg_path = Some(ffmpeg.clone());
    }
    match &cli.command {
        cli::Command::Split { chunk_ms, format, .. } => {
            if let Some(ms) = *chunk_ms {
                config.chunk_length_ms = ms;
            }
            if let Some(format) = format {
                config.chunk_format.clone_from(format);
            }
        }
        cli::Command::Analyze {
            extension,
            skip_failures,
            ..
        } => {
            if let Some(ext) = extension {
                config.audio_extension = ext.trim_start_matches('.').to_string();
            }
            if *skip_failures {
                config.on_error = FailurePolicy::Skip;
            }
        }
    }
}
