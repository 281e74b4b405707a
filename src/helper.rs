use crate::qrcode::EncodedBits;

use image::error::{ImageError, ParameterError, ParameterErrorKind};
use image::{ImageBuffer, Luma};
use std::fs;
use std::path::Path;

/*---- Utilities ----*/

/// Cells of light margin drawn around bit grids.
const BORDER: u32 = 1;

const DARK: Luma<u8> = Luma([0u8]);
const LIGHT: Luma<u8> = Luma([255u8]);
/// Cells past the last data bit in the final row.
const PADDING: Luma<u8> = Luma([200u8]);

/// Largest width or height, in pixels, of a rendered image.
pub const MAX_IMAGE_SIDE: u32 = 1 << 15;

fn rows(encoded: &EncodedBits, columns: usize) -> usize {
    encoded.bits().div_ceil(columns)
}

// Returns a string of SVG code for an image depicting the data bits of
// `encoded`, `columns` bits per row, with the given number of border cells.
// The string always uses Unix newlines (\n), regardless of the platform.
pub fn to_svg_string(encoded: &EncodedBits, columns: usize, border: usize) -> String {
    assert!(columns > 0, "Columns must be positive");
    let width = columns + border * 2;
    let height = rows(encoded, columns) + border * 2;

    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {width} {height}\" stroke=\"none\">\n"
    );
    result += "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n";
    result += "\t<path d=\"";
    let mut first = true;
    for i in 0..encoded.bits() {
        if encoded.bit(i) == Some(true) {
            if !first {
                result += " ";
            }
            first = false;
            result += &format!("M{},{}h1v1h-1z", i % columns + border, i / columns + border);
        }
    }
    result += "\" fill=\"#000000\"/>\n";
    result += "</svg>\n";
    result
}

/// Formats the data bits of `encoded` as text, `columns` bits per row.
///
/// Set bits are drawn as `█`, clear bits as `·`. Every row is prefixed with
/// the offset of its first bit.
pub fn format_bits(encoded: &EncodedBits, columns: usize) -> String {
    assert!(columns > 0, "Columns must be positive");
    let mut out = String::new();
    for row in 0..rows(encoded, columns) {
        let start = row * columns;
        out += &format!("{start:>6} ");
        for i in start..(start + columns).min(encoded.bits()) {
            out.push(if encoded.bit(i) == Some(true) { '█' } else { '·' });
        }
        out.push('\n');
    }
    out
}

/// Prints the data bits of `encoded` to the console, one byte per row.
pub fn print_bits(encoded: &EncodedBits) {
    print!("{}", format_bits(encoded, 8));
    println!();
}

/// Returns the pixel length of `cells` cells plus the border at `scale`,
/// or `None` if it does not fit in [`MAX_IMAGE_SIDE`].
fn image_side(cells: usize, scale: u32) -> Option<u32> {
    u32::try_from(cells)
        .ok()?
        .checked_add(2 * BORDER)?
        .checked_mul(scale)
        .filter(|side| *side <= MAX_IMAGE_SIDE)
}

fn dimension_error(message: String) -> ImageError {
    ImageError::Parameter(ParameterError::from_kind(ParameterErrorKind::Generic(message)))
}

/// Renders the data bits of `encoded` as a grayscale image.
///
/// # Arguments
///
/// * `encoded` - The bits to draw.
/// * `columns` - Bits per row.
/// * `scale` - Width and height of one cell, in pixels.
///
/// # Returns
///
/// An `ImageBuffer` with one black cell per set bit and one white cell per
/// clear bit, surrounded by a white border. Cells after the last bit are gray.
///
/// # Errors
///
/// Returns `ImageError::Parameter` if `columns` or `scale` is zero, or if
/// either side of the image would exceed [`MAX_IMAGE_SIDE`] pixels.
///
/// # Example
///
/// ```
/// use qrbits::helper::to_image_buffer;
/// use qrbits::qrcode::{encode_segment, Version};
/// use qrbits::segment::Segment;
///
/// let encoded = encode_segment(&Segment::from_number(673), Version::MIN).unwrap();
/// let img = to_image_buffer(&encoded, 8, 4).unwrap();
/// assert_eq!(img.dimensions(), (40, 20));
/// ```
pub fn to_image_buffer(
    encoded: &EncodedBits,
    columns: usize,
    scale: u32,
) -> Result<ImageBuffer<Luma<u8>, Vec<u8>>, ImageError> {
    if columns == 0 || scale == 0 {
        return Err(dimension_error("columns and scale must be positive".to_string()));
    }
    let too_large = || {
        dimension_error(format!(
            "{columns} columns at scale {scale} exceed {MAX_IMAGE_SIDE} pixels per side"
        ))
    };
    let width = image_side(columns, scale).ok_or_else(too_large)?;
    let height = image_side(rows(encoded, columns), scale).ok_or_else(too_large)?;
    // Fits, since `width` was computed from it.
    let cols = width / scale - 2 * BORDER;

    let mut img = ImageBuffer::from_pixel(width, height, LIGHT);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let (cx, cy) = (x / scale, y / scale);
        if cx < BORDER || cy < BORDER || cx >= cols + BORDER {
            continue;
        }
        let index = ((cy - BORDER) * cols + (cx - BORDER)) as usize;
        *pixel = match encoded.bit(index) {
            Some(true) => DARK,
            Some(false) => LIGHT,
            None if cy < height / scale - BORDER => PADDING,
            None => LIGHT,
        };
    }

    Ok(img)
}

/// Renders the data bits of `encoded` and saves them as an image file.
///
/// The format follows the extension of `path`. Missing parent directories
/// are created.
///
/// # Errors
///
/// Returns an `image::ImageError` if the dimensions are rejected by
/// [`to_image_buffer`], the directory cannot be created or the image cannot
/// be written.
pub fn save_image(
    encoded: &EncodedBits,
    columns: usize,
    scale: u32,
    path: impl AsRef<Path>,
) -> Result<(), image::ImageError> {
    let img = to_image_buffer(encoded, columns, scale)?;
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }

    img.save(path)
}
