// This is free and unencumbered software released into the public domain.

#[cfg(not(feature = "std"))]
compile_error!("asimov-camera-previewer requires the 'std' feature");

use asimov_camera_preview::{
    cli::{self, handle_error, info_user, parse_dimensions, parse_rotation, parse_sizing},
    shared::{
        CameraError, CameraProvider, PreviewConfig, PreviewEvent, PreviewSession, PreviewSize,
        PreviewSizing, PreviewView, ScreenRotation, SurfaceEvent, SurfaceHandle,
        SurfaceViewAdapter, TextureViewAdapter, ViewBounds,
    },
};
use asimov_module::SysexitsError::{self, *};
use clap::Parser;
use clientele::StandardOptions;
use serde_json::json;
use std::{error::Error as StdError, path::PathBuf};

/// Simulates a preview session and prints the chosen rotation, preview size,
/// and view layout.
#[derive(Debug, Parser)]
struct Options {
    #[clap(flatten)]
    flags: StandardOptions,

    /// JSON camera profile (defaults to the platform's cameras, or a
    /// built-in phone profile)
    #[arg(long)]
    profile: Option<PathBuf>,

    #[arg(short, long, default_value = "0")]
    camera: String,

    /// Size of the container the preview is laid out in
    #[arg(long, value_parser = parse_dimensions, default_value = "1080x1920")]
    container: PreviewSize,

    /// Screen rotation in degrees
    #[arg(short = 'r', long, value_parser = parse_rotation, default_value = "0")]
    screen_rotation: i32,

    /// `first`, `container`, or a `WxH` aspect ratio
    #[arg(short, long, value_parser = parse_sizing, default_value = "container")]
    sizing: PreviewSizing,

    /// Pin the display orientation instead of computing it
    #[arg(long, value_parser = parse_rotation)]
    fixed_rotation: Option<i32>,

    #[arg(long, value_enum, default_value = "texture")]
    variant: Variant,

    #[arg(
        value_name = "FORMAT",
        short = 'o',
        long = "output",
        value_enum,
        default_value = "text"
    )]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Variant {
    Texture,
    Surface,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
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

    let exit_code = match run_previewer(&options) {
        Ok(()) => EX_OK,
        Err(err) => handle_error(&err, &options.flags),
    };

    Ok(exit_code)
}

fn run_previewer(opts: &Options) -> Result<(), CameraError> {
    let provider = cli::load_provider(&opts.flags, opts.profile.as_deref())?;
    info_user(&opts.flags, &format!("camera backend: {:?}", provider.backend()));

    let mut config = PreviewConfig::new(opts.camera.clone())
        .with_sizing(opts.sizing)
        .with_diagnostics(opts.flags.debug || opts.flags.verbose >= 3);
    if let Some(degrees) = opts.fixed_rotation {
        config = config.with_fixed_rotation(degrees);
    }

    let container = ViewBounds::new(opts.container.width, opts.container.height);
    match opts.variant {
        Variant::Texture => {
            let session = PreviewSession::new(config, provider, TextureViewAdapter::default());
            simulate(opts, session, container, |_| None)
        },
        Variant::Surface => {
            let bounds = SurfaceViewAdapter::measure(container.width);
            info_user(
                &opts.flags,
                &format!("surface view measures {}x{}", bounds.width, bounds.height),
            );
            let session = PreviewSession::new(config, provider, SurfaceViewAdapter::default());
            simulate(opts, session, bounds, |view| view.label().map(str::to_string))
        },
    }
}

fn simulate<V: PreviewView>(
    opts: &Options,
    mut session: PreviewSession<V>,
    container: ViewBounds,
    label: impl Fn(&V) -> Option<String>,
) -> Result<(), CameraError> {
    let screen_rotation = ScreenRotation::from_degrees(opts.screen_rotation);

    // The host measures the container before the surface appears.
    session.view_mut().set_container(container);
    session.handle(SurfaceEvent::Available {
        surface: SurfaceHandle::detached(),
        screen_rotation,
    })?;
    session.handle(SurfaceEvent::SizeChanged { bounds: container })?;

    let camera = session
        .camera()
        .map(|c| (c.id().to_string(), c.info()))
        .ok_or(CameraError::NoCamera)?;
    let orientation = session.orientation();
    let preview = session.preview_size().ok_or(CameraError::NoCandidate)?;
    let layout = session.view().layout_params();
    let label = label(session.view());

    session.handle(SurfaceEvent::Destroyed)?;

    for event in session.events().try_iter() {
        log_event(opts, &event);
    }

    match opts.output {
        OutputFormat::Text => {
            println!(
                "camera: {} ({}, mounted at {}°)",
                camera.0, camera.1.facing, camera.1.mount_angle
            );
            println!("screen rotation: {}°", screen_rotation.degrees());
            println!("display orientation: {orientation}°");
            println!("preview size: {preview}");
            match layout {
                Some(layout) => println!("layout: {}x{}", layout.width, layout.height),
                None => println!("layout: unchanged"),
            }
            if let Some(label) = &label {
                println!("label: {label}");
            }
        },
        OutputFormat::Jsonl => {
            println!(
                "{}",
                json!({
                    "camera": camera.0,
                    "facing": camera.1.facing,
                    "mount_angle": camera.1.mount_angle,
                    "screen_rotation": screen_rotation.degrees(),
                    "orientation": orientation.degrees(),
                    "preview": preview,
                    "container": container,
                    "layout": layout,
                    "label": label,
                })
            );
        },
    }

    Ok(())
}

fn log_event(opts: &Options, event: &PreviewEvent) {
    match event {
        PreviewEvent::Warning { message } => cli::warn_user(&opts.flags, message),
        PreviewEvent::Error { error } => cli::warn_user(&opts.flags, &error.to_string()),
        other => {
            if opts.flags.verbose >= 2 || opts.flags.debug {
                info_user(&opts.flags, &format!("{other:?}"));
            }
        },
    }
}
