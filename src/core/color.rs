use nalgebra::Vector3;

/// Clamps each channel to [0, 1].
#[inline]
pub fn clamp_unit(color: Vector3<f32>) -> Vector3<f32> {
    color.map(|c| c.clamp(0.0, 1.0))
}

/// Packs a linear [0, 1] color into a 0x00RRGGBB pixel, clamping per channel.
#[inline]
pub fn pack_rgb(color: Vector3<f32>) -> u32 {
    let c = clamp_unit(color);
    let r = (c.x * 255.0) as u32;
    let g = (c.y * 255.0) as u32;
    let b = (c.z * 255.0) as u32;
    (r << 16) | (g << 8) | b
}

/// Splits a 0x00RRGGBB pixel into its 8-bit channels.
#[inline]
pub fn unpack_rgb(pixel: u32) -> [u8; 3] {
    [
        ((pixel >> 16) & 0xFF) as u8,
        ((pixel >> 8) & 0xFF) as u8,
        (pixel & 0xFF) as u8,
    ]
}

#[inline]
pub fn grayscale(value: f32) -> Vector3<f32> {
    Vector3::new(value, value, value)
}

/// Linearly maps `value` from [min, max] to [0, 1], clamped.
#[inline]
pub fn remap(value: f32, min: f32, max: f32) -> f32 {
    if max <= min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}
