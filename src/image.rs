use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use crate::PDFError;
use id_arena::Id;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};
use std::path::Path;

/// How the raster data will be stored in the PDF
pub enum RasterImage {
    /// A baseline RGB JPEG, copied into the PDF byte-for-byte
    Jpeg(Vec<u8>),
    /// Any other decoded image, re-encoded with Flate compression
    Decoded(DynamicImage),
}

/// A decoded raster image. Its natural size is its pixel size, which layout
/// treats as points unless told otherwise.
pub struct Image {
    pub image: RasterImage,
    pub width: f32,
    pub height: f32,
}

/// A reference to an image stored in a document, along with its natural size
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    pub id: Id<Image>,
    pub width: u32,
    pub height: u32,
}

impl ImageHandle {
    pub fn natural_width(&self) -> Pt {
        Pt(self.width as f32)
    }

    pub fn natural_height(&self) -> Pt {
        Pt(self.height as f32)
    }
}

struct EncodeOutput<'a> {
    filter: Filter,
    bytes: std::borrow::Cow<'a, [u8]>,
    mask: Option<Vec<u8>>,
}

impl Image {
    /// Load and decode an image file. TGA files can't be sniffed from their
    /// contents, so they are recognised by extension.
    pub fn new_from_disk<P: AsRef<Path>>(path: P) -> Result<Image, PDFError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let is_tga = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("tga"));
        if is_tga {
            let image = image::load_from_memory_with_format(&data, ImageFormat::Tga)?;
            return Ok(Self::new_raster(image));
        }
        Self::from_bytes(data)
    }

    /// Decode an image from its encoded bytes (PNG, JPEG, ...)
    pub fn from_bytes(data: Vec<u8>) -> Result<Image, PDFError> {
        let format = image::guess_format(&data)?;
        let image = image::load_from_memory_with_format(&data, format)?;

        match (format, image.color()) {
            (ImageFormat::Jpeg, ColorType::Rgb8) => Ok(Image {
                width: image.width() as f32,
                height: image.height() as f32,
                image: RasterImage::Jpeg(data),
            }),
            _ => Ok(Self::new_raster(image)),
        }
    }

    /// Wrap an already-decoded image
    pub fn new_raster(image: DynamicImage) -> Image {
        Image {
            width: image.width() as f32,
            height: image.height() as f32,
            image: RasterImage::Decoded(image),
        }
    }

    fn encode(&self) -> EncodeOutput<'_> {
        match &self.image {
            RasterImage::Jpeg(bytes) => EncodeOutput {
                filter: Filter::DctDecode,
                bytes: std::borrow::Cow::Borrowed(bytes.as_slice()),
                mask: None,
            },
            RasterImage::Decoded(image) => {
                let level = CompressionLevel::DefaultLevel as u8;
                let mask = image.color().has_alpha().then(|| {
                    let alphas: Vec<u8> = image.pixels().map(|(_, _, px)| px.0[3]).collect();
                    compress_to_vec_zlib(&alphas, level)
                });
                let bytes = compress_to_vec_zlib(image.to_rgb8().as_raw(), level);
                EncodeOutput {
                    filter: Filter::FlateDecode,
                    bytes: std::borrow::Cow::Owned(bytes),
                    mask,
                }
            }
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(image_index));
        let encoded = self.encode();
        let mask_id = encoded
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));

        let mut image = writer.image_xobject(id, &encoded.bytes);
        image.filter(encoded.filter);
        image.width(self.width as i32);
        image.height(self.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        // the soft mask carries the alpha channel
        if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask.as_ref()) {
            let mut s_mask = writer.image_xobject(mask_id, mask);
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn natural_size_comes_from_pixels() {
        let image = Image::new_raster(DynamicImage::ImageRgba8(RgbaImage::new(40, 20)));
        assert_eq!(image.width, 40.0);
        assert_eq!(image.height, 20.0);
    }

    #[test]
    fn alpha_channel_becomes_a_mask() {
        let mut pixels = RgbaImage::new(2, 1);
        pixels.put_pixel(0, 0, Rgba([255, 0, 0, 128]));
        let image = Image::new_raster(DynamicImage::ImageRgba8(pixels));
        let encoded = image.encode();
        assert!(encoded.mask.is_some());
        assert!(matches!(encoded.filter, Filter::FlateDecode));
    }

    #[test]
    fn undecodable_bytes_are_an_error() {
        assert!(matches!(
            Image::from_bytes(b"definitely not an image".to_vec()),
            Err(PDFError::Image(_))
        ));
    }
}
