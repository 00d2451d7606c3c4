//! Tensor conversion and matte handling around the inference call.

use image::{imageops, RgbImage, RgbaImage};
use ndarray::Array4;

use crate::segmentation::catalog::ModelSpec;

/// Convert an RGB frame into the normalized NCHW tensor a model expects
///
/// Steps:
/// 1. Resize to the model's input resolution
/// 2. Scale to [0, 1] and apply per-channel mean/std normalization
/// 3. Transpose from HWC to NCHW
///
/// Returns: Array4<f32> with shape [1, 3, height, width]
pub fn image_to_tensor(image: &RgbImage, spec: &ModelSpec) -> Array4<f32> {
    let (target_width, target_height) = spec.input_size;

    let resized = if image.dimensions() != spec.input_size {
        imageops::resize(image, target_width, target_height, imageops::FilterType::Lanczos3)
    } else {
        image.clone()
    };

    let mut tensor = Array4::<f32>::zeros((1, 3, target_height as usize, target_width as usize));

    for y in 0..target_height {
        for x in 0..target_width {
            let pixel = resized.get_pixel(x, y);

            for channel in 0..3 {
                let value = pixel[channel] as f32 / 255.0;
                let normalized = (value - spec.mean[channel]) / spec.std[channel];
                tensor[[0, channel, y as usize, x as usize]] = normalized;
            }
        }
    }

    tensor
}

/// Stretch a raw probability map to span [0, 1]
///
/// Salient-object models emit relative scores; min-max normalization turns
/// them into a usable opacity ramp. A flat map (constant-color input) has no
/// range to stretch, so values are clamped as-is and the segmentation
/// degenerates to uniformly foreground or background.
pub fn normalize_matte(raw: &[f32]) -> Vec<f32> {
    let min = raw.iter().copied().fold(f32::INFINITY, f32::min);
    let max = raw.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    if !min.is_finite() || !max.is_finite() || (max - min) < f32::EPSILON {
        return raw.iter().map(|v| v.clamp(0.0, 1.0)).collect();
    }

    raw.iter().map(|v| (v - min) / (max - min)).collect()
}

/// Resize a matte from the model's resolution back to the frame's resolution
///
/// The matte is treated as a grayscale image so the resize gets the same
/// Lanczos3 filtering as the forward resize.
pub fn resize_matte(matte: &[f32], from: (u32, u32), to: (u32, u32)) -> Vec<f32> {
    let (from_width, from_height) = from;
    let (to_width, to_height) = to;

    if from == to {
        return matte.to_vec();
    }

    let gray = image::GrayImage::from_fn(from_width, from_height, |x, y| {
        let idx = (y * from_width + x) as usize;
        let value = (matte[idx] * 255.0).clamp(0.0, 255.0) as u8;
        image::Luma([value])
    });

    let resized = imageops::resize(&gray, to_width, to_height, imageops::FilterType::Lanczos3);

    resized.pixels().map(|p| p[0] as f32 / 255.0).collect()
}

/// Apply a matte to a frame as its alpha channel
///
/// The RGB pixels are untouched; the matte value becomes per-pixel opacity
/// (0 = background, 255 = foreground). The matte must be `width * height`
/// values in row-major order.
pub fn attach_alpha(image: &RgbImage, matte: &[f32]) -> RgbaImage {
    let (width, height) = image.dimensions();
    debug_assert_eq!(matte.len(), (width * height) as usize);

    RgbaImage::from_fn(width, height, |x, y| {
        let pixel = image.get_pixel(x, y);
        let idx = (y * width + x) as usize;
        let alpha = (matte[idx] * 255.0).clamp(0.0, 255.0).round() as u8;
        image::Rgba([pixel[0], pixel[1], pixel[2], alpha])
    })
}
