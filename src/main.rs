//! Command-line entry point: opens the showcase window.

use std::{io::Write, path::PathBuf, process::ExitCode};

use atrium::{
    asset::{AssetSource, FsFetcher, HttpFetcher},
    manifest::Manifest,
    options::Options,
    theme::Theme,
    viewer::ViewerConfig,
    ShowcaseError, Viewer,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "atrium")]
#[command(about = "Multi-scene showcase for architectural 3D models", long_about = None)]
struct Cli {
    /// Scene manifest (TOML)
    #[arg(long, default_value = "assets/showcase.toml")]
    manifest: PathBuf,
    /// Rendering options (TOML); built-in defaults when omitted
    #[arg(long)]
    options: Option<PathBuf>,
    /// Directory models and skybox images are read from
    #[arg(long, default_value = "assets", conflicts_with = "base_url")]
    assets: PathBuf,
    /// Fetch models and skybox images from this URL instead
    #[arg(long)]
    base_url: Option<String>,
    /// Scene to open first, counting from 1
    #[arg(long, default_value_t = 1)]
    scene: usize,
    /// Force and remember the dark or light theme
    #[arg(long)]
    theme: Option<Theme>,
    /// Print the options JSON schema and exit
    #[arg(long)]
    print_schema: bool,
}

fn run(cli: Cli) -> Result<(), ShowcaseError> {
    if cli.print_schema {
        let schema = serde_json::to_string_pretty(&Options::json_schema())
            .map_err(|e| ShowcaseError::OptionsParse(e.to_string()))?;
        writeln!(std::io::stdout().lock(), "{schema}")?;
        return Ok(());
    }

    let options = match &cli.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    let manifest = Manifest::load(&cli.manifest)?;
    if manifest.scenes.is_empty() {
        log::warn!("{} lists no scenes", cli.manifest.display());
    }

    let source = match cli.base_url {
        Some(url) => AssetSource::Http(HttpFetcher::new(url)),
        None => AssetSource::Fs(FsFetcher::new(cli.assets)),
    };

    Viewer::new(ViewerConfig {
        manifest,
        options,
        source,
        start_scene: cli.scene.saturating_sub(1),
        theme: cli.theme,
    })
    .run()
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
