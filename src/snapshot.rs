//! PNG dumps of the surface fields for offline inspection.

use std::path::Path;

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::error::{OceanError, Result};
use crate::ocean::SurfaceFields;
use crate::params::SnapshotConfig;

/// Create the snapshot directory if needed
pub fn prepare_output_dir(config: &SnapshotConfig) -> Result<()> {
    std::fs::create_dir_all(&config.output_dir).map_err(|source| OceanError::CreateDir {
        path: config.output_dir.clone(),
        source,
    })
}

/// Grayscale height map, normalised from the field's own min and max
pub fn height_image(surface: &SurfaceFields) -> GrayImage {
    let size = surface.resolution as u32;
    let (lowest, highest) = surface
        .heights()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), h| {
            (lo.min(h), hi.max(h))
        });
    let range = highest - lowest;

    let mut img = GrayImage::new(size, size);
    for (i, height) in surface.heights().enumerate() {
        let value = if range > 0.0 {
            (height - lowest) / range
        } else {
            0.5
        };
        let x = i as u32 % size;
        let z = i as u32 / size;
        img.put_pixel(x, z, Luma([(value * 255.0).round().clamp(0.0, 255.0) as u8]));
    }
    img
}

/// Normal map with each component mapped from [-1, 1] to [0, 255]
pub fn normal_image(surface: &SurfaceFields) -> RgbImage {
    let size = surface.resolution as u32;
    let to_byte = |v: f32| ((v + 1.0) * 127.5).round().clamp(0.0, 255.0) as u8;

    let mut img = RgbImage::new(size, size);
    for (i, normal) in surface.normals.iter().enumerate() {
        let x = i as u32 % size;
        let z = i as u32 / size;
        img.put_pixel(
            x,
            z,
            Rgb([to_byte(normal[0]), to_byte(normal[1]), to_byte(normal[2])]),
        );
    }
    img
}

fn save(img_result: image::ImageResult<()>, path: &Path) -> Result<()> {
    img_result.map_err(|source| OceanError::Snapshot {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the height and normal maps of one frame
pub fn write_snapshot(config: &SnapshotConfig, frame: usize, surface: &SurfaceFields) -> Result<()> {
    let height_path = config.height_path(frame);
    save(height_image(surface).save(&height_path), &height_path)?;

    let normal_path = config.normal_path(frame);
    save(normal_image(surface).save(&normal_path), &normal_path)?;

    log::debug!(
        "Wrote snapshot {} and {}",
        height_path.display(),
        normal_path.display()
    );
    Ok(())
}
