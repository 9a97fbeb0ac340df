// This is free and unencumbered software released into the public domain.

use super::{CameraResult, CameraStatus};
use crate::shared::{CameraInfo, Facing, PreviewSize};
use core::{mem::zeroed, ptr::null_mut};
use ndk_sys::{
    ACameraMetadata, ACameraMetadata_const_entry, ACameraMetadata_free,
    ACameraMetadata_getConstEntry, acamera_metadata_tag,
};

const LENS_FACING_FRONT: u8 = 0;
const LENS_FACING_EXTERNAL: u8 = 2;

/// `AIMAGE_FORMAT_PRIVATE`, what preview surfaces consume.
const FORMAT_PRIVATE: i32 = 0x22;
/// `AIMAGE_FORMAT_YUV_420_888`
const FORMAT_YUV_420_888: i32 = 0x23;

/// Camera characteristics, freed on drop.
#[derive(Debug)]
pub struct CameraMetadata {
    pub(crate) handle: *mut ACameraMetadata,
}

impl Drop for CameraMetadata {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { ACameraMetadata_free(self.handle) };
            self.handle = null_mut();
        }
    }
}

impl CameraMetadata {
    fn entry(&self, tag: acamera_metadata_tag) -> CameraResult<ACameraMetadata_const_entry> {
        let mut entry: ACameraMetadata_const_entry = unsafe { zeroed() };
        CameraStatus::check(unsafe {
            ACameraMetadata_getConstEntry(self.handle, tag.0, &mut entry)
        })?;
        Ok(entry)
    }

    pub fn facing(&self) -> CameraResult<Facing> {
        let entry = self.entry(acamera_metadata_tag::ACAMERA_LENS_FACING)?;
        let value = if entry.count > 0 {
            unsafe { *entry.data.u8_ }
        } else {
            1
        };
        Ok(match value {
            LENS_FACING_FRONT => Facing::Front,
            LENS_FACING_EXTERNAL => Facing::External,
            _ => Facing::Back,
        })
    }

    pub fn sensor_orientation(&self) -> CameraResult<i32> {
        let entry = self.entry(acamera_metadata_tag::ACAMERA_SENSOR_ORIENTATION)?;
        Ok(if entry.count > 0 {
            unsafe { *entry.data.i32_ }
        } else {
            0
        })
    }

    pub fn info(&self) -> CameraResult<CameraInfo> {
        Ok(CameraInfo {
            facing: self.facing()?,
            mount_angle: self.sensor_orientation()?,
        })
    }

    /// Output sizes in the order the HAL lists them. Prefers the private
    /// format, falling back to YUV when a camera lists no private outputs.
    pub fn preview_sizes(&self) -> CameraResult<Vec<PreviewSize>> {
        let configs = self.stream_configurations()?;
        let sizes = output_sizes(&configs, FORMAT_PRIVATE);
        if !sizes.is_empty() {
            return Ok(sizes);
        }
        Ok(output_sizes(&configs, FORMAT_YUV_420_888))
    }

    /// JPEG output sizes.
    pub fn picture_sizes(&self) -> CameraResult<Vec<PreviewSize>> {
        const FORMAT_JPEG: i32 = 0x100;
        Ok(output_sizes(&self.stream_configurations()?, FORMAT_JPEG))
    }

    /// `(format, width, height, is_input)` quadruples.
    fn stream_configurations(&self) -> CameraResult<Vec<[i32; 4]>> {
        let entry =
            self.entry(acamera_metadata_tag::ACAMERA_SCALER_AVAILABLE_STREAM_CONFIGURATIONS)?;
        if entry.count == 0 {
            return Ok(Vec::new());
        }
        let raw = unsafe { core::slice::from_raw_parts(entry.data.i32_, entry.count as usize) };
        Ok(raw
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect())
    }
}

fn output_sizes(configs: &[[i32; 4]], format: i32) -> Vec<PreviewSize> {
    let mut sizes: Vec<PreviewSize> = Vec::new();
    for &[fmt, width, height, is_input] in configs {
        if fmt != format || is_input != 0 || width <= 0 || height <= 0 {
            continue;
        }
        let size = PreviewSize::new(width as u32, height as u32);
        if !sizes.contains(&size) {
            sizes.push(size);
        }
    }
    sizes
}
