// This is free and unencumbered software released into the public domain.

#[cfg(not(feature = "std"))]
compile_error!("asimov-camera-cataloger requires the 'std' feature");

use asimov_camera_preview::{
    cli::{self, handle_error},
    shared::{CameraError, CameraInfo, PreviewSize},
};
use asimov_module::SysexitsError::{self, *};
use clap::Parser;
use clientele::StandardOptions;
use serde_json::json;
use std::{error::Error as StdError, path::PathBuf};

#[derive(Debug, Parser)]
struct Options {
    #[clap(flatten)]
    flags: StandardOptions,

    /// JSON camera profile (defaults to the platform's cameras, or a
    /// built-in phone profile)
    #[arg(long)]
    profile: Option<PathBuf>,

    #[arg(
        value_name = "FORMAT",
        short = 'o',
        long = "output",
        value_enum,
        default_value = "text"
    )]
    output: OutputFormat,
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Jsonl,
}

pub fn main() -> Result<SysexitsError, Box<dyn StdError>> {
    asimov_module::dotenv().ok();
    let args = asimov_module::args_os()?;
    let options = Options::parse_from(args);

    if options.flags.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(EX_OK);
    }

    if options.flags.license {
        print!("{}", include_str!("../../UNLICENSE"));
        return Ok(EX_OK);
    }

    #[cfg(feature = "tracing")]
    asimov_module::init_tracing_subscriber(&options.flags).expect("failed to initialize logging");

    let exit_code = match run_cataloger(&options) {
        Ok(()) => EX_OK,
        Err(err) => handle_error(&err, &options.flags),
    };

    Ok(exit_code)
}

struct CameraEntry {
    id: String,
    info: CameraInfo,
    preview_sizes: Vec<PreviewSize>,
}

fn run_cataloger(options: &Options) -> Result<(), CameraError> {
    cli::info_user(&options.flags, "enumerating cameras");

    let mut provider = cli::load_provider(&options.flags, options.profile.as_deref())?;

    let mut ids = provider.camera_ids()?;
    if ids.is_empty() {
        cli::warn_user(&options.flags, "no cameras found");
        return Ok(());
    }
    ids.sort();

    let mut entries = Vec::with_capacity(ids.len());
    for id in ids {
        let info = provider.camera_info(&id)?;
        // Sizes are only known once the camera is open; a busy camera is
        // listed without them.
        let preview_sizes = match provider.open(&id) {
            Ok(camera) => camera.supported_preview_sizes()?,
            Err(err @ CameraError::CameraUnavailable { .. }) => {
                cli::warn_user(&options.flags, &err.to_string());
                Vec::new()
            },
            Err(err) => return Err(err),
        };
        entries.push(CameraEntry {
            id,
            info,
            preview_sizes,
        });
    }

    for entry in entries {
        match options.output {
            OutputFormat::Text => {
                let sizes: Vec<String> =
                    entry.preview_sizes.iter().map(ToString::to_string).collect();
                println!(
                    "{}: {}, mounted at {}° [{}]",
                    entry.id,
                    entry.info.facing,
                    entry.info.mount_angle,
                    sizes.join(", ")
                );
            },
            OutputFormat::Jsonl => {
                println!(
                    "{}",
                    json!({
                        "id": entry.id,
                        "facing": entry.info.facing,
                        "mount_angle": entry.info.mount_angle,
                        "preview_sizes": entry.preview_sizes,
                    })
                );
            },
        }
    }

    Ok(())
}
