//! Diagnostic overlays: buffer rings and detection outlines drawn on the
//! fetched image.

use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};
use solar_common::BufferTier;
use verifier::{BufferZone, BufferZones, Detection};

const INNER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const OUTER_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const DETECTION_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Stroke width in pixels.
const THICKNESS: i32 = 2;

fn zone_color(zone: &BufferZone) -> Rgb<u8> {
    match zone.tier {
        BufferTier::Sqft1200 => INNER_COLOR,
        BufferTier::Sqft2400 => OUTER_COLOR,
    }
}

fn draw_zone(img: &mut RgbImage, zone: &BufferZone) {
    let center = (zone.center.0 as i32, zone.center.1 as i32);
    let color = zone_color(zone);
    for offset in 0..THICKNESS {
        let radius = zone.radius_px as i32 + offset;
        if radius > 0 {
            draw_hollow_circle_mut(img, center, radius, color);
        }
    }
}

fn draw_outline(img: &mut RgbImage, points: &[[f64; 2]]) {
    for (i, start) in points.iter().enumerate() {
        let end = points[(i + 1) % points.len()];
        for offset in 0..THICKNESS {
            let d = offset as f32;
            draw_line_segment_mut(
                img,
                (start[0] as f32 + d, start[1] as f32),
                (end[0] as f32 + d, end[1] as f32),
                DETECTION_COLOR,
            );
            draw_line_segment_mut(
                img,
                (start[0] as f32, start[1] as f32 + d),
                (end[0] as f32, end[1] as f32 + d),
                DETECTION_COLOR,
            );
        }
    }
}

/// Draw the zones and every detection outline onto `img`.
pub fn draw_overlay(img: &mut RgbImage, zones: &BufferZones, detections: &[Detection]) {
    for zone in zones.in_order() {
        draw_zone(img, zone);
    }
    for detection in detections.iter().filter(|d| d.points.len() >= 2) {
        draw_outline(img, &detection.points);
    }
}

/// Load `image_path`, draw the overlay and save it to `out_path`.
///
/// The output format follows the extension of `out_path`.
pub fn render_overlay(
    image_path: &Path,
    out_path: &Path,
    zones: &BufferZones,
    detections: &[Detection],
) -> Result<()> {
    let mut img = image::open(image_path)
        .with_context(|| format!("Failed to open {}", image_path.display()))?
        .to_rgb8();

    draw_overlay(&mut img, zones, detections);

    img.save(out_path)
        .with_context(|| format!("Failed to save overlay {}", out_path.display()))?;
    Ok(())
}
