use std::path::Path;

use image::{ColorType, DynamicImage, ImageFormat};
use pdf_writer::{Filter, Pdf, Ref};

use crate::error::Error;

enum LogoData {
    /// JPEG bytes passed through untouched.
    Jpeg { data: Vec<u8>, gray: bool },
    /// Decoded pixels, zlib-compressed RGB plus optional alpha soft mask.
    Flate {
        rgb: Vec<u8>,
        alpha: Option<Vec<u8>>,
    },
}

/// A decoded logo image, ready to embed once and draw on every page.
pub struct Logo {
    pixel_width: u32,
    pixel_height: u32,
    data: LogoData,
}

impl Logo {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::MissingAsset(format!("{}: {e}", path.display())))?;
        Self::from_bytes(bytes)
            .map_err(|e| Error::MissingAsset(format!("{}: {e}", path.display())))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Error> {
        let format = image::guess_format(&bytes)
            .map_err(|e| Error::MissingAsset(format!("unrecognised image: {e}")))?;
        let decoded = image::load_from_memory_with_format(&bytes, format)
            .map_err(|e| Error::MissingAsset(format!("undecodable image: {e}")))?;
        let (pixel_width, pixel_height) = (decoded.width(), decoded.height());

        let data = match (format, decoded.color()) {
            (ImageFormat::Jpeg, ColorType::Rgb8) => LogoData::Jpeg {
                data: bytes,
                gray: false,
            },
            (ImageFormat::Jpeg, ColorType::L8) => LogoData::Jpeg {
                data: bytes,
                gray: true,
            },
            _ => flate(&decoded),
        };

        Ok(Self {
            pixel_width,
            pixel_height,
            data,
        })
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (self.pixel_width, self.pixel_height)
    }

    /// Write the image XObject (and its soft mask, if any) and return its ref.
    pub(super) fn embed(&self, pdf: &mut Pdf, alloc: &mut impl FnMut() -> Ref) -> Ref {
        let xobj_ref = alloc();
        match &self.data {
            LogoData::Jpeg { data, gray } => {
                let mut xobj = pdf.image_xobject(xobj_ref, data);
                xobj.filter(Filter::DctDecode);
                xobj.width(self.pixel_width as i32);
                xobj.height(self.pixel_height as i32);
                if *gray {
                    xobj.color_space().device_gray();
                } else {
                    xobj.color_space().device_rgb();
                }
                xobj.bits_per_component(8);
            }
            LogoData::Flate { rgb, alpha } => {
                let smask_ref = alpha.as_ref().map(|alpha| {
                    let mask_ref = alloc();
                    let mut mask = pdf.image_xobject(mask_ref, alpha);
                    mask.filter(Filter::FlateDecode);
                    mask.width(self.pixel_width as i32);
                    mask.height(self.pixel_height as i32);
                    mask.color_space().device_gray();
                    mask.bits_per_component(8);
                    mask_ref
                });

                let mut xobj = pdf.image_xobject(xobj_ref, rgb);
                xobj.filter(Filter::FlateDecode);
                xobj.width(self.pixel_width as i32);
                xobj.height(self.pixel_height as i32);
                xobj.color_space().device_rgb();
                xobj.bits_per_component(8);
                if let Some(mask_ref) = smask_ref {
                    xobj.s_mask(mask_ref);
                }
            }
        }
        xobj_ref
    }
}

fn flate(decoded: &DynamicImage) -> LogoData {
    let rgba = decoded.to_rgba8();
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

    let rgb_data: Vec<u8> = rgba
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

    let alpha = has_alpha.then(|| {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6)
    });

    LogoData::Flate { rgb, alpha }
}
