use crate::foundation::core::linearize_pixel_coords;
use crate::foundation::error::{InvertError, InvertResult};
use crate::media::frame::Frame;

/// Invert the first three bytes of every `pix_bytes`-sized pixel in a row-major buffer.
///
/// Bytes past the third in each pixel (alpha in RGBA layouts) and row padding are untouched.
pub fn invert_packed(
    data: &mut [u8],
    width: usize,
    height: usize,
    linesize: usize,
    pix_bytes: usize,
) -> InvertResult<()> {
    if pix_bytes < 3 {
        return Err(InvertError::validation(format!(
            "invert_packed needs at least 3 bytes per pixel, got {pix_bytes}"
        )));
    }
    if width == 0 || height == 0 {
        return Ok(());
    }
    let overflow = || InvertError::validation("pixel buffer layout overflows usize");
    let row = width.checked_mul(pix_bytes).ok_or_else(overflow)?;
    if linesize < row {
        return Err(InvertError::validation(format!(
            "linesize {linesize} is smaller than {width} pixels of {pix_bytes} bytes"
        )));
    }
    // Offset of the last pixel plus its size; linesize >= row keeps every earlier pixel in range.
    let required = (height - 1)
        .checked_mul(linesize)
        .and_then(|n| n.checked_add(row))
        .ok_or_else(overflow)?;
    if data.len() < required {
        return Err(InvertError::validation(format!(
            "buffer too small: got {} bytes, need {required}",
            data.len()
        )));
    }

    for y in 0..height {
        for x in 0..width {
            let off = linearize_pixel_coords(x, y, linesize, pix_bytes);
            for v in &mut data[off..off + 3] {
                *v = 255 - *v;
            }
        }
    }
    Ok(())
}

/// Invert the colour channels of `frame` in place, following its pixel format.
///
/// Alpha is preserved. Applying this twice restores the original frame.
pub fn invert_frame(frame: &mut Frame) {
    let format = frame.format();
    let bpp = format.bytes_per_pixel();
    let channels = format.color_channels();
    let row_len = frame.width() as usize * bpp;
    let linesize = frame.linesize();
    let height = frame.height() as usize;

    for y in 0..height {
        let start = linearize_pixel_coords(0, y, linesize, bpp);
        let row = &mut frame.data_mut()[start..start + row_len];
        for px in row.chunks_exact_mut(bpp) {
            for &c in channels {
                px[c] = 255 - px[c];
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/invert.rs"]
mod tests;
