//! Planar YUV to packed RGBA conversion
//!
//! BT.601 limited-range conversion matching the sensor's output. The
//! constants and the clamp order are load-bearing: downstream visual
//! parity checks compare against reference output byte for byte.

use crate::capture::frame::PixelFormat;
use crate::error::ConvertError;

/// Convert a planar chroma-subsampled buffer to packed RGBA8888.
///
/// The luma plane is `width*height` bytes, followed by interleaved chroma
/// pairs at half vertical resolution. YUV420 stores the pair as (V, U);
/// YV12 swaps them. Output is `width*height` pixels, alpha fixed at 255.
pub fn yuv_to_rgba(
    data: &[u8],
    width: u32,
    height: u32,
    format: PixelFormat,
) -> Result<Vec<u8>, ConvertError> {
    match format {
        PixelFormat::Yuv420 | PixelFormat::Yv12 => {}
        other => return Err(ConvertError::UnsupportedFormat(other)),
    }

    // Chroma is sampled at half resolution in both axes; odd dimensions
    // would read past the chroma plane.
    if width % 2 != 0 || height % 2 != 0 {
        return Err(ConvertError::OddDimensions { width, height });
    }

    let expected = format.expected_len(width, height);
    if data.len() != expected {
        return Err(ConvertError::BufferSize {
            expected,
            actual: data.len(),
        });
    }

    let w = width as usize;
    let h = height as usize;
    let frame_size = w * h;
    let mut rgba = vec![0u8; frame_size * 4];

    for i in 0..h {
        for j in 0..w {
            let y = data[i * w + j];
            let chroma = frame_size + (i >> 1) * w + (j & !1);
            let (v, u) = match format {
                PixelFormat::Yuv420 => (data[chroma], data[chroma + 1]),
                PixelFormat::Yv12 => (data[chroma + 1], data[chroma]),
                _ => unreachable!(),
            };

            let y = f32::from(y.max(16)) - 16.0;
            let u = f32::from(u) - 128.0;
            let v = f32::from(v) - 128.0;

            let r = (1.164 * y + 1.596 * v).round();
            let g = (1.164 * y - 0.813 * v - 0.391 * u).round();
            let b = (1.164 * y + 2.018 * u).round();

            let out = (i * w + j) * 4;
            rgba[out] = r.clamp(0.0, 255.0) as u8;
            rgba[out + 1] = g.clamp(0.0, 255.0) as u8;
            rgba[out + 2] = b.clamp(0.0, 255.0) as u8;
            rgba[out + 3] = 255;
        }
    }

    Ok(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_yuv(w: u32, h: u32, y: u8, first: u8, second: u8) -> Vec<u8> {
        let luma = (w * h) as usize;
        let mut data = vec![y; luma];
        for _ in 0..luma / 4 {
            data.push(first);
            data.push(second);
        }
        data
    }

    #[test]
    fn output_length_and_alpha() {
        let data = flat_yuv(6, 4, 128, 128, 128);
        let rgba = yuv_to_rgba(&data, 6, 4, PixelFormat::Yuv420).unwrap();
        assert_eq!(rgba.len(), 6 * 4 * 4);
        assert!(rgba.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn black_and_white_extremes() {
        // y=16 with neutral chroma is black, y=235 is full white
        let black = flat_yuv(4, 2, 16, 128, 128);
        let rgba = yuv_to_rgba(&black, 4, 2, PixelFormat::Yuv420).unwrap();
        assert_eq!(&rgba[..4], &[0, 0, 0, 255]);

        let white = flat_yuv(4, 2, 235, 128, 128);
        let rgba = yuv_to_rgba(&white, 4, 2, PixelFormat::Yuv420).unwrap();
        assert_eq!(&rgba[..4], &[255, 255, 255, 255]);
    }

    #[test]
    fn luma_floor_at_16() {
        // y below 16 clamps up before the matrix is applied
        let low = flat_yuv(4, 2, 0, 128, 128);
        let floor = flat_yuv(4, 2, 16, 128, 128);
        assert_eq!(
            yuv_to_rgba(&low, 4, 2, PixelFormat::Yuv420).unwrap(),
            yuv_to_rgba(&floor, 4, 2, PixelFormat::Yuv420).unwrap()
        );
    }

    #[test]
    fn known_red_pixel() {
        // y=81 v=240 u=90 is the BT.601 pure-red sample
        let data = flat_yuv(2, 2, 81, 240, 90);
        let rgba = yuv_to_rgba(&data, 2, 2, PixelFormat::Yuv420).unwrap();
        let r = rgba[0] as i32;
        let g = rgba[1] as i32;
        let b = rgba[2] as i32;
        assert!(r >= 250, "r={r}");
        assert!(g <= 5, "g={g}");
        assert!(b <= 5, "b={b}");
    }

    #[test]
    fn yv12_swaps_chroma_order() {
        let yuv420 = flat_yuv(4, 2, 128, 240, 90);
        let yv12 = flat_yuv(4, 2, 128, 90, 240);
        assert_eq!(
            yuv_to_rgba(&yuv420, 4, 2, PixelFormat::Yuv420).unwrap(),
            yuv_to_rgba(&yv12, 4, 2, PixelFormat::Yv12).unwrap()
        );
    }

    #[test]
    fn deterministic() {
        let data = flat_yuv(8, 8, 77, 200, 60);
        let a = yuv_to_rgba(&data, 8, 8, PixelFormat::Yuv420).unwrap();
        let b = yuv_to_rgba(&data, 8, 8, PixelFormat::Yuv420).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_rgba_input() {
        let data = vec![0u8; 4 * 2 * 4];
        assert_eq!(
            yuv_to_rgba(&data, 4, 2, PixelFormat::Rgba8888),
            Err(ConvertError::UnsupportedFormat(PixelFormat::Rgba8888))
        );
    }

    #[test]
    fn rejects_odd_dimensions() {
        // 5x2 yields 15 bytes, which satisfies the w*h*3/2 size contract
        // but leaves no room for the last chroma pair.
        let data = vec![128u8; 15];
        assert_eq!(
            yuv_to_rgba(&data, 5, 2, PixelFormat::Yuv420),
            Err(ConvertError::OddDimensions {
                width: 5,
                height: 2
            })
        );

        let data = vec![128u8; 4 * 3 * 3 / 2];
        assert_eq!(
            yuv_to_rgba(&data, 4, 3, PixelFormat::Yv12),
            Err(ConvertError::OddDimensions {
                width: 4,
                height: 3
            })
        );
    }

    #[test]
    fn rejects_short_buffer() {
        let data = vec![0u8; 5];
        assert_eq!(
            yuv_to_rgba(&data, 4, 2, PixelFormat::Yuv420),
            Err(ConvertError::BufferSize {
                expected: 12,
                actual: 5
            })
        );
    }
}
