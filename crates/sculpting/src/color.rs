//! Vertex color compositing.
//!
//! Colors are linear RGBA in `[f32; 4]`. The source color of a blend is
//! premultiplied: its alpha is the blend factor and its RGB channels are
//! already scaled by that factor.

use sculpting_config::BlendMode;

/// Linear RGBA color.
pub type Rgba = [f32; 4];

/// Composite `src` over `dst` with the given mode.
///
/// A fully transparent source leaves `dst` untouched in every mode.
pub fn blend_color(dst: Rgba, src: Rgba, mode: BlendMode) -> Rgba {
    let t = src[3];
    if t == 0.0 {
        return dst;
    }
    let mt = 1.0 - t;

    match mode {
        BlendMode::Mix => [
            src[0] + dst[0] * mt,
            src[1] + dst[1] * mt,
            src[2] + dst[2] * mt,
            t + dst[3] * mt,
        ],
        BlendMode::Add => [dst[0] + src[0], dst[1] + src[1], dst[2] + src[2], dst[3]],
        BlendMode::Sub => [
            (dst[0] - src[0]).max(0.0),
            (dst[1] - src[1]).max(0.0),
            (dst[2] - src[2]).max(0.0),
            dst[3],
        ],
        BlendMode::Mul => [
            dst[0] * (mt + src[0]),
            dst[1] * (mt + src[1]),
            dst[2] * (mt + src[2]),
            dst[3],
        ],
        BlendMode::Lighten => [
            dst[0] * mt + (dst[0] * t).max(src[0]),
            dst[1] * mt + (dst[1] * t).max(src[1]),
            dst[2] * mt + (dst[2] * t).max(src[2]),
            dst[3],
        ],
        BlendMode::Darken => [
            dst[0] * mt + (dst[0] * t).min(src[0]),
            dst[1] * mt + (dst[1] * t).min(src[1]),
            dst[2] * mt + (dst[2] * t).min(src[2]),
            dst[3],
        ],
        BlendMode::EraseAlpha => rescale_alpha(dst, (dst[3] - t).max(0.0)),
        BlendMode::AddAlpha => rescale_alpha(dst, (dst[3] + t).min(1.0)),
    }
}

/// Set the alpha of `color`, scaling RGB by the same ratio.
fn rescale_alpha(color: Rgba, alpha: f32) -> Rgba {
    if color[3] <= 0.0 {
        return [color[0], color[1], color[2], alpha];
    }
    let ratio = alpha / color[3];
    [color[0] * ratio, color[1] * ratio, color[2] * ratio, alpha]
}

/// Scale every channel of a color.
#[inline]
pub fn scale_color(color: Rgba, factor: f32) -> Rgba {
    [
        color[0] * factor,
        color[1] * factor,
        color[2] * factor,
        color[3] * factor,
    ]
}

/// Convert one sRGB channel to linear.
pub fn srgb_to_linear(channel: f32) -> f32 {
    if channel <= 0.04045 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

/// Opaque linear color from an sRGB triple.
pub fn linear_fill_color(srgb: [f32; 3]) -> Rgba {
    [
        srgb_to_linear(srgb[0]),
        srgb_to_linear(srgb[1]),
        srgb_to_linear(srgb[2]),
        1.0,
    ]
}
