// SPDX-License-Identifier: MPL-2.0
use pixel_lens::app::{self, paths, Flags};
use pixel_lens::config;
use pixel_lens::domain::{MaxDimension, QuantizationMode};
use pixel_lens::export::{self, ExportOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
Usage: pixel_lens [OPTIONS] [IMAGE]

Options:
  --config-dir DIR       Directory holding settings.toml
  --max-dimension N      Longest grid side in cells (16-100)
  --mode MODE            Color depth: bit1, bit4, bit8 or bit24
  --export OUT.png       Render one frame to OUT.png instead of opening a window
  --width W              Export width in logical pixels (default 800)
  --height H             Export height in logical pixels (default 600)
  --scale S              Export device pixel ratio (default 1)
  --active INDEX         Cell to select and center on in the export
  -h, --help             Print this help
";

struct Args {
    config_dir: Option<String>,
    max_dimension: Option<u32>,
    mode: Option<QuantizationMode>,
    export: Option<PathBuf>,
    width: Option<u32>,
    height: Option<u32>,
    scale: Option<f32>,
    active: Option<usize>,
    image: Option<PathBuf>,
}

fn parse_args() -> Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let parsed = Args {
        config_dir: args.opt_value_from_str("--config-dir")?,
        max_dimension: args.opt_value_from_str("--max-dimension")?,
        mode: args.opt_value_from_str("--mode")?,
        export: args.opt_value_from_str("--export")?,
        width: args.opt_value_from_str("--width")?,
        height: args.opt_value_from_str("--height")?,
        scale: args.opt_value_from_str("--scale")?,
        active: args.opt_value_from_str("--active")?,
        image: args.opt_free_from_str()?,
    };

    let rest = args.finish();
    if !rest.is_empty() {
        tracing::warn!(?rest, "ignoring unexpected arguments");
    }
    Ok(Some(parsed))
}

fn run_export(args: Args, output: PathBuf) -> ExitCode {
    let Some(image) = args.image else {
        eprintln!("--export needs an IMAGE to render");
        return ExitCode::FAILURE;
    };

    let (settings, warning) = config::load();
    if let Some(warning) = warning {
        tracing::warn!("{warning}");
    }

    let mut options = ExportOptions::new(output);
    options.max_dimension = args
        .max_dimension
        .map(MaxDimension::new)
        .unwrap_or_else(|| settings.grid.max_dimension());
    options.mode = args.mode.unwrap_or_else(|| settings.grid.mode());
    options.cell_size = settings.view.cell_size();
    options.width = args.width.unwrap_or(options.width);
    options.height = args.height.unwrap_or(options.height);
    options.scale = args.scale.unwrap_or(options.scale);
    options.active = args.active;

    match export::export(&image, &options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("export failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{err}\n\n{HELP}");
            return ExitCode::FAILURE;
        }
    };

    paths::init_cli_overrides(args.config_dir.clone());

    if let Some(output) = args.export.clone() {
        return run_export(args, output);
    }

    let flags = Flags {
        file_path: args.image,
        max_dimension: args.max_dimension.map(|n| MaxDimension::new(n).value()),
        mode: args.mode,
    };
    match app::run(flags) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
