//! Simple RGBA8 image container used for compositing the final texture.

use std::io::{Read, Write};

use thiserror::Error;

const STRIDE: usize = 4;

/// Byte length of an RGBA8 buffer, widened before multiplying so canvases of
/// 2^16 px per axis don't overflow 32-bit math.
fn buffer_len(size: (u32, u32)) -> usize {
    (size.0 as usize) * (size.1 as usize) * STRIDE
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Png {
        #[from]
        source: png::DecodingError,
    },

    #[error("unsupported PNG color type {color_type:?}; expected RGB or RGBA")]
    UnsupportedColorType { color_type: png::ColorType },

    #[error("unsupported PNG bit depth {bit_depth:?}; expected 8 bits per channel")]
    UnsupportedBitDepth { bit_depth: png::BitDepth },
}

/// Reads just enough of a PNG stream to learn its dimensions, without
/// decoding any pixel data.
pub fn probe_png<R: Read>(input: R) -> Result<(u32, u32), png::DecodingError> {
    let decoder = png::Decoder::new(input);
    let (info, _reader) = decoder.read_info()?;

    Ok((info.width, info.height))
}

#[derive(Debug, Clone)]
pub struct Image {
    size: (u32, u32),
    data: Vec<u8>,
}

impl Image {
    pub fn new_rgba8<D: Into<Vec<u8>>>(size: (u32, u32), data: D) -> Self {
        let data = data.into();

        assert!(data.len() == buffer_len(size));

        Self { size, data }
    }

    pub fn new_empty_rgba8(size: (u32, u32)) -> Self {
        let data = vec![0; buffer_len(size)];
        Self::new_rgba8(size, data)
    }

    /// Decodes a PNG stream into RGBA8, expanding RGB sources with an opaque
    /// alpha channel. Other color types are rejected.
    pub fn decode_png<R: Read>(input: R) -> Result<Self, DecodeError> {
        let decoder = png::Decoder::new(input);
        let (info, mut reader) = decoder.read_info()?;

        if info.bit_depth != png::BitDepth::Eight {
            return Err(DecodeError::UnsupportedBitDepth {
                bit_depth: info.bit_depth,
            });
        }

        let mut data = vec![0; info.buffer_size()];
        reader.next_frame(&mut data)?;

        let size = (info.width, info.height);

        let data = match info.color_type {
            png::ColorType::RGBA => data,
            png::ColorType::RGB => {
                let mut expanded = Vec::with_capacity(buffer_len(size));
                for rgb in data.chunks_exact(3) {
                    expanded.extend_from_slice(rgb);
                    expanded.push(0xff);
                }
                expanded
            }
            color_type => return Err(DecodeError::UnsupportedColorType { color_type }),
        };

        Ok(Self::new_rgba8(size, data))
    }

    pub fn encode_png<W: Write>(&self, output: W) -> Result<(), png::EncodingError> {
        let mut encoder = png::Encoder::new(output, self.size.0, self.size.1);
        encoder.set_color(png::ColorType::RGBA);
        encoder.set_depth(png::BitDepth::Eight);

        let mut output_writer = encoder.write_header()?;
        output_writer.write_image_data(&self.data)?;

        // On drop, output_writer will write the last chunk of the PNG file.
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Copies `other` into this image with its top-left corner at `pos`. The
    /// entire source must land in bounds.
    pub fn blit(&mut self, other: &Image, pos: (u32, u32)) {
        assert!(pos.0 + other.size.0 <= self.size.0);
        assert!(pos.1 + other.size.1 <= self.size.1);

        let other_width_bytes = (other.size.0 as usize) * STRIDE;
        let other_rows = other.data.chunks_exact(other_width_bytes);

        for (other_y, other_row) in other_rows.enumerate() {
            let self_y = (pos.1 as usize) + other_y;

            let start_px = (pos.0 as usize) + (self.size.0 as usize) * self_y;

            let start_in_bytes = STRIDE * start_px;
            let end_in_bytes = start_in_bytes + other_row.len();

            let self_row = &mut self.data[start_in_bytes..end_in_bytes];
            self_row.copy_from_slice(other_row);
        }
    }
}
