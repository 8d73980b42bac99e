//! Decoded image storage.
//!
//! The decoder never owns its output: it describes the image once through
//! [`ImageSink::construct`] and then writes level data through the sink.
//! [`Image`] is the in-memory sink used by [`decode`](crate::decode) and
//! the CLI.

use half::f16;
use texcodec_bcn::for_each_clipped;
use texcodec_format::{ColorMasks, GlFormat, GlLayout, GlType, TextureFormat};

use crate::fourcc::PixelLayout;
use crate::{Error, Result};

/// Shape and format of an image, handed to [`ImageSink::construct`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDesc {
    /// Name of the source the image was decoded from.
    pub name: String,
    pub format: TextureFormat,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    /// 1, or the number of stored cube faces.
    pub face_count: u32,
    /// Mip levels beyond the base level.
    pub mip_count: u32,
    /// Storage layout of the level data the sink receives.
    pub layout: PixelLayout,
    /// Native upload layout; `None` for compressed data.
    pub gl_layout: Option<GlLayout>,
}

impl ImageDesc {
    #[inline]
    pub fn is_cube_map(&self) -> bool {
        self.face_count > 1
    }

    #[inline]
    pub fn level_count(&self) -> u32 {
        self.mip_count.saturating_add(1)
    }

    /// Dimensions of mip level `mip`, each halved per level with a floor of 1.
    pub fn level_dimensions(&self, mip: u32) -> (u32, u32, u32) {
        let shrink = |v: u32| v.checked_shr(mip).unwrap_or(0).max(1);
        (shrink(self.width), shrink(self.height), shrink(self.depth))
    }

    /// Bytes of one depth slice of mip level `mip`.
    ///
    /// Size queries return `None` when the count overflows `usize`.
    pub fn slice_size(&self, mip: u32) -> Option<usize> {
        let (w, h, _) = self.level_dimensions(mip);
        self.layout.slice_size(w, h)
    }

    /// Bytes of mip level `mip`, all slices included.
    pub fn level_size(&self, mip: u32) -> Option<usize> {
        let (_, _, d) = self.level_dimensions(mip);
        self.slice_size(mip)?.checked_mul(d as usize)
    }

    /// Bytes of the whole image, every face and level included.
    pub fn total_size(&self) -> Option<usize> {
        let per_face = (0..self.level_count())
            .try_fold(0usize, |sum, mip| sum.checked_add(self.level_size(mip)?))?;
        per_face.checked_mul(self.face_count as usize)
    }

    /// Byte offset of texel `(x, y, z)` inside a level. Block layouts
    /// address the block containing the texel.
    pub fn texel_offset(&self, x: u32, y: u32, z: u32, mip: u32) -> Option<usize> {
        let (w, _, _) = self.level_dimensions(mip);
        let slice = (z as usize).checked_mul(self.slice_size(mip)?)?;
        let (index, unit) = match self.layout {
            PixelLayout::Compressed(family) => {
                let row = w.div_ceil(4) as usize;
                ((y / 4) as usize * row + (x / 4) as usize, family.block_bytes())
            }
            PixelLayout::Masks(_) | PixelLayout::Fixed(_) => (
                y as usize * w as usize + x as usize,
                self.layout.bits_per_texel() as usize / 8,
            ),
        };
        index.checked_mul(unit)?.checked_add(slice)
    }
}

/// Destination of decoded image data.
pub trait ImageSink {
    /// Prepare storage for an image. Called once, before any level data.
    fn construct(&mut self, desc: &ImageDesc) -> Result<()>;

    /// Writable bytes of a level, starting at texel `(x, y, z)`.
    ///
    /// For block layouts `x` and `y` address the containing block. Returns
    /// an empty slice for coordinates outside the image.
    fn pixel_data(&mut self, x: u32, y: u32, z: u32, face: u32, mip: u32) -> &mut [u8];

    /// Store one linear RGBA sample at texel `(x, y, z)`.
    fn set_pixel(&mut self, x: u32, y: u32, z: u32, face: u32, mip: u32, rgba: [f32; 4]);
}

/// In-memory image: one buffer per face and mip level.
#[derive(Debug, Clone, Default)]
pub struct Image {
    desc: Option<ImageDesc>,
    /// Indexed by `face * level_count + mip`.
    levels: Vec<Vec<u8>>,
}

impl Image {
    pub fn new() -> Self {
        Self::default()
    }

    /// Description of the constructed image.
    pub fn desc(&self) -> Option<&ImageDesc> {
        self.desc.as_ref()
    }

    fn level_index(&self, face: u32, mip: u32) -> Option<usize> {
        let desc = self.desc.as_ref()?;
        (face < desc.face_count && mip < desc.level_count())
            .then(|| (face * desc.level_count() + mip) as usize)
    }

    /// Data of one level.
    pub fn level(&self, face: u32, mip: u32) -> Option<&[u8]> {
        let index = self.level_index(face, mip)?;
        self.levels.get(index).map(Vec::as_slice)
    }

    /// Convert one depth slice of a level to 8-bit RGBA, row-major.
    pub fn to_rgba8(&self, face: u32, mip: u32, z: u32) -> Result<Vec<u8>> {
        let desc = self
            .desc
            .as_ref()
            .ok_or_else(|| Error::Sink("image has not been constructed".into()))?;
        let level = self
            .level(face, mip)
            .ok_or_else(|| Error::Sink(format!("no level {mip} on face {face}")))?;
        let (w, h, d) = desc.level_dimensions(mip);
        if z >= d {
            return Err(Error::Sink(format!("slice {z} out of range for depth {d}")));
        }

        let slice = desc
            .slice_size(mip)
            .and_then(|size| {
                let start = z as usize * size;
                level.get(start..start + size)
            })
            .ok_or_else(|| Error::Sink("level buffer is shorter than its slices".into()))?;

        let texel_bytes = desc.layout.bits_per_texel() as usize / 8;
        if texel_bytes == 0 && !matches!(desc.layout, PixelLayout::Compressed(_)) {
            return Err(Error::Sink(format!("{} has no whole-byte texel size", desc.format)));
        }

        let mut out = vec![0u8; w as usize * h as usize * 4];
        let grey = matches!(desc.format, TextureFormat::L8 | TextureFormat::La8 | TextureFormat::L16);

        match desc.layout {
            PixelLayout::Compressed(family) => {
                let row = w.div_ceil(4);
                for (i, block) in slice.chunks_exact(family.block_bytes()).enumerate() {
                    let bx = (i as u32 % row) * 4;
                    let by = (i as u32 / row) * 4;
                    let samples = family.decode(block)?;
                    for_each_clipped(bx, by, w, h, |x, y, s| {
                        let offset = (y as usize * w as usize + x as usize) * 4;
                        out[offset..offset + 4].copy_from_slice(&to_unorm8(samples[s]));
                    });
                }
            }
            PixelLayout::Masks(masks) => {
                let native = desc.gl_layout.is_some_and(|l| l.swap_unit > 1);
                for (dst, texel) in out.chunks_exact_mut(4).zip(slice.chunks_exact(texel_bytes)) {
                    let mut rgba = masks.expand_rgba8(load_texel(texel, native));
                    if grey {
                        rgba = [rgba[0], rgba[0], rgba[0], rgba[3]];
                    }
                    dst.copy_from_slice(&rgba);
                }
            }
            PixelLayout::Fixed(layout) => {
                let grey = grey
                    || matches!(layout.gl_format, GlFormat::DepthComponent | GlFormat::DepthStencil);
                for (dst, texel) in out.chunks_exact_mut(4).zip(slice.chunks_exact(texel_bytes)) {
                    let rgba = expand_grey(fixed_texel(layout, texel), grey);
                    dst.copy_from_slice(&to_unorm8(rgba));
                }
            }
        }

        Ok(out)
    }
}

impl ImageSink for Image {
    fn construct(&mut self, desc: &ImageDesc) -> Result<()> {
        let too_large = || Error::Sink(format!("{} does not fit in memory", desc.name));
        desc.total_size().ok_or_else(too_large)?;

        let mut levels = Vec::with_capacity((desc.face_count * desc.level_count()) as usize);
        for _face in 0..desc.face_count {
            for mip in 0..desc.level_count() {
                let size = desc.level_size(mip).ok_or_else(too_large)?;
                levels.push(vec![0u8; size]);
            }
        }
        self.levels = levels;
        self.desc = Some(desc.clone());
        Ok(())
    }

    fn pixel_data(&mut self, x: u32, y: u32, z: u32, face: u32, mip: u32) -> &mut [u8] {
        let (Some(desc), Some(index)) = (self.desc.as_ref(), self.level_index(face, mip)) else {
            return &mut [];
        };
        let Some(offset) = desc.texel_offset(x, y, z, mip) else {
            return &mut [];
        };
        self.levels
            .get_mut(index)
            .and_then(|level| level.get_mut(offset..))
            .unwrap_or_default()
    }

    fn set_pixel(&mut self, x: u32, y: u32, z: u32, face: u32, mip: u32, rgba: [f32; 4]) {
        let Some(PixelLayout::Masks(masks)) = self.desc.as_ref().map(|d| d.layout) else {
            return;
        };
        let bytes = (masks.bit_count() / 8) as usize;
        let packed = pack_texel(masks, rgba).to_le_bytes();
        if let Some(dst) = self.pixel_data(x, y, z, face, mip).get_mut(..bytes) {
            dst.copy_from_slice(&packed[..bytes]);
        }
    }
}

/// Pack a linear RGBA sample into the bits of `masks`.
pub fn pack_texel(masks: ColorMasks, rgba: [f32; 4]) -> u32 {
    masks
        .to_array()
        .into_iter()
        .zip(rgba)
        .filter(|(mask, _)| *mask != 0)
        .fold(0, |texel, (mask, value)| {
            let max = mask >> mask.trailing_zeros();
            let scaled = (value.clamp(0.0, 1.0) * max as f32).round() as u32;
            texel | ((scaled << mask.trailing_zeros()) & mask)
        })
}

fn load_texel(bytes: &[u8], native: bool) -> u32 {
    let mut buf = [0u8; 4];
    let len = bytes.len().min(4);
    if native && cfg!(target_endian = "big") {
        buf[4 - len..].copy_from_slice(&bytes[..len]);
        u32::from_be_bytes(buf)
    } else {
        buf[..len].copy_from_slice(&bytes[..len]);
        u32::from_le_bytes(buf)
    }
}

fn fixed_texel(layout: GlLayout, texel: &[u8]) -> [f32; 4] {
    let unit = layout.swap_unit as usize;
    let component = |i: usize| -> f32 {
        let Some(raw) = texel.get(i * unit..(i + 1) * unit) else {
            return 0.0;
        };
        match (layout.gl_type, raw) {
            (GlType::Float, &[a, b, c, d]) => f32::from_ne_bytes([a, b, c, d]),
            (GlType::HalfFloat, &[a, b]) => f16::from_bits(u16::from_ne_bytes([a, b])).to_f32(),
            (GlType::UnsignedShort, &[a, b]) => f32::from(u16::from_ne_bytes([a, b])) / 65535.0,
            (GlType::Short, &[a, b]) => (f32::from(i16::from_ne_bytes([a, b])) / 32767.0).max(-1.0),
            (GlType::UnsignedInt248, &[a, b, c, d]) => {
                (u32::from_ne_bytes([a, b, c, d]) >> 8) as f32 / 16_777_215.0
            }
            _ => 0.0,
        }
    };

    match layout.gl_format {
        GlFormat::Rg => [component(0), component(1), 0.0, 1.0],
        GlFormat::Rgba => [component(0), component(1), component(2), component(3)],
        _ => [component(0), 0.0, 0.0, 1.0],
    }
}

fn expand_grey(rgba: [f32; 4], grey: bool) -> [f32; 4] {
    if grey {
        [rgba[0], rgba[0], rgba[0], rgba[3]]
    } else {
        rgba
    }
}

fn to_unorm8(rgba: [f32; 4]) -> [u8; 4] {
    rgba.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use texcodec_bcn::BlockFormat;

    use super::*;

    fn desc(format: TextureFormat, layout: PixelLayout, width: u32, height: u32) -> ImageDesc {
        ImageDesc {
            name: "test".into(),
            format,
            width,
            height,
            depth: 1,
            face_count: 1,
            mip_count: 0,
            layout,
            gl_layout: None,
        }
    }

    const RGBA8: ColorMasks = ColorMasks::new(0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000);

    #[test]
    fn test_construct_allocates_every_level() {
        let mut d = desc(TextureFormat::RgbaDxt1, PixelLayout::Compressed(BlockFormat::Dxt1), 16, 8);
        d.mip_count = 4;
        d.face_count = 6;
        let mut image = Image::new();
        image.construct(&d).unwrap();

        assert_eq!(image.level(0, 0).unwrap().len(), 4 * 2 * 8);
        assert_eq!(image.level(5, 3).unwrap().len(), 8);
        assert_eq!(image.level(5, 4).unwrap().len(), 8);
        assert!(image.level(6, 0).is_none());
        assert!(image.level(0, 5).is_none());
        assert_eq!(d.total_size(), Some(6 * (64 + 16 + 8 + 8 + 8)));
    }

    #[test]
    fn test_pixel_data_offsets() {
        let mut image = Image::new();
        image
            .construct(&desc(TextureFormat::Rgba8, PixelLayout::Masks(RGBA8), 4, 4))
            .unwrap();
        assert_eq!(image.pixel_data(0, 0, 0, 0, 0).len(), 64);
        assert_eq!(image.pixel_data(1, 2, 0, 0, 0).len(), 64 - 36);
        assert!(image.pixel_data(0, 0, 0, 1, 0).is_empty());
    }

    #[test]
    fn test_block_offsets() {
        let d = desc(TextureFormat::RgbaDxt5, PixelLayout::Compressed(BlockFormat::Dxt5), 8, 8);
        assert_eq!(d.texel_offset(0, 0, 0, 0), Some(0));
        assert_eq!(d.texel_offset(5, 1, 0, 0), Some(16));
        assert_eq!(d.texel_offset(0, 4, 0, 0), Some(32));
    }

    #[test]
    fn test_sizes_overflow_to_none() {
        let mut d = desc(TextureFormat::Rgba8, PixelLayout::Masks(RGBA8), u32::MAX, u32::MAX);
        d.depth = u32::MAX;
        assert!(d.slice_size(0).is_none());
        assert!(d.level_size(0).is_none());
        assert_eq!(d.slice_size(31), Some(4));
        assert!(d.total_size().is_none());
        assert!(Image::new().construct(&d).is_err());

        d.mip_count = u32::MAX;
        assert_eq!(d.level_count(), u32::MAX);
    }

    #[test]
    fn test_set_pixel_packs_masks() {
        let mut image = Image::new();
        image
            .construct(&desc(TextureFormat::Rgba8, PixelLayout::Masks(RGBA8), 2, 2))
            .unwrap();
        image.set_pixel(1, 1, 0, 0, 0, [1.0, 0.5, 0.0, 1.0]);
        assert_eq!(&image.level(0, 0).unwrap()[12..16], &[255, 128, 0, 255]);
    }

    #[test]
    fn test_pack_texel_narrow_channels() {
        let masks = ColorMasks::new(0xF800, 0x07E0, 0x001F, 0);
        assert_eq!(pack_texel(masks, [1.0, 0.0, 1.0, 1.0]), 0xF81F);
        let la = ColorMasks::new(0xFF, 0, 0, 0xFF00);
        assert_eq!(pack_texel(la, [1.0, 0.0, 0.0, 0.0]), 0x00FF);
    }

    #[test]
    fn test_rgba8_from_blocks() {
        let mut image = Image::new();
        image
            .construct(&desc(TextureFormat::RgbaDxt1, PixelLayout::Compressed(BlockFormat::Dxt1), 4, 4))
            .unwrap();
        image.pixel_data(0, 0, 0, 0, 0)[..2].copy_from_slice(&0xF800u16.to_le_bytes());

        let rgba = image.to_rgba8(0, 0, 0).unwrap();
        assert_eq!(rgba.len(), 64);
        assert!(rgba.chunks_exact(4).all(|t| t == [255, 0, 0, 255]));
    }

    #[test]
    fn test_rgba8_from_bgra_masks() {
        let bgra = ColorMasks::new(0xFF_0000, 0xFF00, 0xFF, 0xFF00_0000);
        let mut image = Image::new();
        image
            .construct(&desc(TextureFormat::Rgba8, PixelLayout::Masks(bgra), 1, 1))
            .unwrap();
        image.pixel_data(0, 0, 0, 0, 0).copy_from_slice(&[10, 20, 30, 40]);
        assert_eq!(image.to_rgba8(0, 0, 0).unwrap(), vec![30, 20, 10, 40]);
    }

    #[test]
    fn test_rgba8_from_half_floats() {
        let layout = GlLayout {
            gl_type: GlType::HalfFloat,
            gl_format: GlFormat::Rgba,
            bytes_per_texel: 8,
            swap_unit: 2,
        };
        let mut image = Image::new();
        image
            .construct(&desc(TextureFormat::Rgba16f, PixelLayout::Fixed(layout), 1, 1))
            .unwrap();
        let texel: Vec<u8> = [1.0f32, 0.5, 0.0, 1.0]
            .into_iter()
            .flat_map(|v| f16::from_f32(v).to_bits().to_ne_bytes())
            .collect();
        image.pixel_data(0, 0, 0, 0, 0).copy_from_slice(&texel);
        assert_eq!(image.to_rgba8(0, 0, 0).unwrap(), vec![255, 128, 0, 255]);
    }

    #[test]
    fn test_unconstructed_image() {
        let mut image = Image::new();
        assert!(image.pixel_data(0, 0, 0, 0, 0).is_empty());
        assert!(matches!(image.to_rgba8(0, 0, 0), Err(Error::Sink(_))));
    }
}
