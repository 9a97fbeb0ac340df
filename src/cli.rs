// This is free and unencumbered software released into the public domain.

//! CLI helpers (error reporting, verbosity handling, argument parsing).
//!
//! This module must compile even when the crate feature `cli` is disabled,
//! because the library is built in non-CLI configurations.

use crate::shared::{CameraError, PreviewSize, PreviewSizing};

#[cfg(feature = "cli")]
use crate::shared::{CameraProvider, drivers::profile::*};

#[cfg(feature = "cli")]
use asimov_module::SysexitsError::{self, *};

#[cfg(feature = "cli")]
use clientele::StandardOptions;

#[cfg(feature = "cli")]
pub fn handle_error(err: &CameraError, flags: &StandardOptions) -> SysexitsError {
    #[cfg(feature = "tracing")]
    {
        use asimov_module::tracing::{debug, error};

        error!(target: "asimov_camera_preview", %err, "camera command failed");

        if flags.debug || flags.verbose >= 2 {
            debug!(target: "asimov_camera_preview", ?err, "detailed error");
        }
    }

    report_error(err, flags);
    map_error_to_sysexit(err)
}

#[cfg(feature = "cli")]
pub fn info_user(flags: &StandardOptions, msg: &str) {
    if flags.debug || flags.verbose >= 1 {
        eprintln!("INFO: {msg}");
    }

    #[cfg(feature = "tracing")]
    asimov_module::tracing::info!(target: "asimov_camera_preview", "{msg}");
}

#[cfg(feature = "cli")]
pub fn warn_user(flags: &StandardOptions, msg: &str) {
    if flags.debug || flags.verbose >= 1 {
        eprintln!("WARN: {msg}");
    }

    #[cfg(feature = "tracing")]
    asimov_module::tracing::warn!(target: "asimov_camera_preview", "{msg}");
}

/// The platform provider when there is one, else the given (or built-in)
/// device profile.
#[cfg(feature = "cli")]
pub fn load_provider(
    flags: &StandardOptions,
    profile: Option<&std::path::Path>,
) -> Result<Box<dyn CameraProvider>, CameraError> {
    if let Some(path) = profile {
        info_user(flags, &format!("loading camera profile {}", path.display()));
        return Ok(Box::new(ProfileCameraProvider::new(DeviceProfile::from_path(
            path,
        )?)));
    }

    match crate::shared::open_provider() {
        Ok(provider) => Ok(provider),
        Err(CameraError::NoDriver) => {
            warn_user(flags, "no camera backend on this platform, using built-in profile");
            Ok(Box::new(ProfileCameraProvider::builtin()))
        },
        Err(err) => Err(err),
    }
}

#[cfg(feature = "cli")]
fn report_error(err: &CameraError, flags: &StandardOptions) {
    use std::error::Error as _;
    use std::io::Write;

    let mut stderr = std::io::stderr();
    let _ = writeln!(stderr, "ERROR: {err}");

    if flags.debug || flags.verbose >= 2 {
        let mut source = err.source();
        while let Some(cause) = source {
            let _ = writeln!(stderr, "  Caused by: {}", cause);
            source = cause.source();
        }
    }
}

#[cfg(feature = "cli")]
fn map_error_to_sysexit(err: &CameraError) -> SysexitsError {
    match err {
        CameraError::NoDriver => EX_UNAVAILABLE,
        CameraError::NoCamera => EX_USAGE,
        CameraError::NoCandidate => EX_DATAERR,
        CameraError::CameraUnavailable { .. } => EX_UNAVAILABLE,
        CameraError::InvalidConfig(_) => EX_USAGE,
        CameraError::Unsupported(_) => EX_UNAVAILABLE,
        CameraError::DriverError { .. } => EX_SOFTWARE,
        CameraError::Other(_) => EX_SOFTWARE,
    }
}

/// Parses `WxH` for clap.
pub fn parse_dimensions(s: &str) -> Result<PreviewSize, String> {
    let size: PreviewSize = s.parse().map_err(|e: CameraError| e.to_string())?;
    if size.width == 0 || size.height == 0 {
        return Err(format!("dimensions must be positive, got {size}"));
    }
    if size.width > 16_384 || size.height > 16_384 {
        return Err(format!("{size} is out of reasonable range (max 16384)"));
    }
    Ok(size)
}

/// Parses a rotation in degrees; only quarter turns are accepted.
pub fn parse_rotation(s: &str) -> Result<i32, String> {
    let degrees: i32 = s
        .trim()
        .trim_end_matches('°')
        .parse()
        .map_err(|_| format!("invalid rotation: {s}"))?;
    if degrees.rem_euclid(90) != 0 {
        return Err(format!("rotation {degrees} is not a multiple of 90"));
    }
    Ok(degrees)
}

/// Parses `first`, `container`, or a `WxH` aspect for clap.
pub fn parse_sizing(s: &str) -> Result<PreviewSizing, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "first" => Ok(PreviewSizing::FirstSupported),
        "container" => Ok(PreviewSizing::Container),
        other => {
            let aspect = parse_dimensions(other)?;
            Ok(PreviewSizing::Aspect(aspect.width, aspect.height))
        },
    }
}

// When `cli` is disabled, keep the module linkable without exposing CLI-only types.
#[cfg(not(feature = "cli"))]
#[inline]
pub fn info_user(_msg: &str) {}

#[cfg(not(feature = "cli"))]
#[inline]
pub fn warn_user(_msg: &str) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_must_be_positive() {
        assert_eq!(parse_dimensions("1080x1920"), Ok(PreviewSize::new(1080, 1920)));
        assert!(parse_dimensions("0x1920").is_err());
        assert!(parse_dimensions("99999x10").is_err());
    }

    #[test]
    fn rotation_accepts_quarter_turns_only() {
        assert_eq!(parse_rotation("270"), Ok(270));
        assert_eq!(parse_rotation("90°"), Ok(90));
        assert_eq!(parse_rotation("-90"), Ok(-90));
        assert!(parse_rotation("45").is_err());
        assert!(parse_rotation("up").is_err());
    }

    #[test]
    fn sizing_keywords_and_aspects() {
        assert_eq!(parse_sizing("first"), Ok(PreviewSizing::FirstSupported));
        assert_eq!(parse_sizing("Container"), Ok(PreviewSizing::Container));
        assert_eq!(parse_sizing("16x9"), Ok(PreviewSizing::Aspect(16, 9)));
        assert!(parse_sizing("wide").is_err());
    }
}
