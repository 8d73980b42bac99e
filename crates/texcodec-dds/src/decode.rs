//! DDS image decoding.
//!
//! A decode runs parse, resolve, plan and stream in that order. The plan
//! is fixed once per image: compressed data is either handed to the sink
//! untouched or decompressed block by block, and uncompressed data is
//! copied in a layout the negotiator knows.

use std::fmt;

use texcodec_bcn::{for_each_clipped, BlockFormat, BlockSamples};
use texcodec_common::ByteReader;
use texcodec_format::{
    supports_compressed, ColorMasks, Compressions, FormatVariants, GlLayout,
    PixelFormatNegotiator, TextureFormat,
};

use crate::fourcc::{resolve_dxgi, resolve_fourcc, PixelLayout, ResolvedFormat};
use crate::header::{parse_header, DdsHeader, HeaderWarning};
use crate::image::{Image, ImageDesc, ImageSink};
use crate::{Error, Result};

/// Caller configuration of a decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    /// Compression families the consumer can ingest directly. Anything
    /// else is decompressed on the CPU.
    pub compressions: Compressions,
    /// Prefer red/red-green formats over luminance/luminance-alpha.
    pub rg_formats: bool,
    /// Prefer sRGB formats where one exists.
    pub srgb: bool,
}

impl DecodeOptions {
    /// Options accepting every supported compression family.
    pub fn passthrough() -> Self {
        Self {
            compressions: Compressions::all(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn variants(&self) -> FormatVariants {
        FormatVariants {
            rg_formats: self.rg_formats,
            srgb: self.srgb,
        }
    }
}

/// How the level data of an image reaches the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePlan {
    /// Compressed blocks are copied as-is.
    UploadCompressed(BlockFormat),
    /// Compressed blocks are decoded to texels.
    Uncompress(BlockFormat),
    /// Uncompressed texels are copied.
    UploadRaw,
}

impl fmt::Display for DecodePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UploadCompressed(family) => write!(f, "upload {family} blocks"),
            Self::Uncompress(family) => write!(f, "decompress {family} blocks"),
            Self::UploadRaw => f.write_str("upload texels"),
        }
    }
}

/// Outcome of a successful [`decode_into`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeSummary {
    pub plan: DecodePlan,
    /// Format stored in the file.
    pub source_format: TextureFormat,
    /// Format handed to the sink.
    pub format: TextureFormat,
    /// Bytes of level data consumed.
    pub data_size: usize,
    pub warnings: Vec<HeaderWarning>,
}

/// Header-level description of an image, without its level data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub name: String,
    /// Format stored in the file.
    pub format: TextureFormat,
    /// Format a decode with the same options produces.
    pub decoded_format: TextureFormat,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    /// Mip levels beyond the base level.
    pub mip_count: u32,
    pub face_count: u32,
    pub plan: DecodePlan,
    /// Bytes of level data the header describes.
    pub data_size: usize,
    pub warnings: Vec<HeaderWarning>,
}

impl ImageInfo {
    #[inline]
    pub fn is_cube_map(&self) -> bool {
        self.face_count > 1
    }
}

/// Everything decided before level data is read.
struct Prepared {
    header: DdsHeader,
    warnings: Vec<HeaderWarning>,
    source: ResolvedFormat,
    plan: DecodePlan,
    desc: ImageDesc,
    data_size: usize,
}

/// Resolve the stored format of a parsed header.
pub fn resolve_format(header: &DdsHeader, variants: FormatVariants) -> Result<ResolvedFormat> {
    if let Some(dx10) = &header.dx10 {
        return resolve_dxgi(dx10.dxgi_format, variants);
    }

    let pixel_format = &header.pixel_format;
    if pixel_format.uses_fourcc() {
        return resolve_fourcc(pixel_format.four_cc, variants);
    }

    let masks = pixel_format.masks;
    if masks.bytes_per_texel().is_none() || !masks.is_disjoint() {
        return Err(Error::UnsupportedFormat(format!(
            "masks {masks} do not describe a whole-byte texel"
        )));
    }
    Ok(ResolvedFormat {
        format: TextureFormat::from_masks(masks, variants),
        layout: PixelLayout::Masks(masks),
    })
}

/// Masks of the byte-per-channel layout a decompressed format is stored in.
fn decompressed_masks(format: TextureFormat) -> ColorMasks {
    format
        .byte_channel_masks()
        .unwrap_or(ColorMasks::new(0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000))
}

fn too_large(width: u32, height: u32, depth: u32) -> Error {
    Error::ContainerFormat(format!("{width}x{height}x{depth} image does not fit in memory"))
}

fn prepare<R: ByteReader + ?Sized>(reader: &mut R, options: &DecodeOptions) -> Result<Prepared> {
    let parsed = parse_header(reader)?;
    let header = parsed.header;
    let variants = options.variants();
    let negotiator = PixelFormatNegotiator::global();

    let source = resolve_format(&header, variants)?;
    log::debug!("{}: resolved {} ({:?})", reader.name(), source.format, source.layout);

    let (plan, format, layout, gl_layout) = match source.layout {
        PixelLayout::Compressed(family) => {
            let accepted = source
                .format
                .compression()
                .is_some_and(|c| options.compressions.contains(c));
            if accepted && supports_compressed(source.format) {
                (
                    DecodePlan::UploadCompressed(family),
                    source.format,
                    source.layout,
                    None,
                )
            } else {
                let format = source.format.decompressed(options.rg_formats);
                let masks = decompressed_masks(format);
                (
                    DecodePlan::Uncompress(family),
                    format,
                    PixelLayout::Masks(masks),
                    negotiator.is_fast_load_supported(masks, variants),
                )
            }
        }
        PixelLayout::Masks(masks) => {
            let (upload, gl_layout) = negotiator
                .native_layout(masks, source.format, variants)
                .ok_or_else(|| {
                    Error::UnsupportedFormat(format!("no native layout for masks {masks}"))
                })?;
            (
                DecodePlan::UploadRaw,
                source.format,
                PixelLayout::Masks(upload),
                Some(gl_layout),
            )
        }
        PixelLayout::Fixed(gl_layout) => {
            (DecodePlan::UploadRaw, source.format, source.layout, Some(gl_layout))
        }
    };
    log::debug!("{}: plan {} -> {}", reader.name(), plan, format);

    let desc = ImageDesc {
        name: reader.name().to_string(),
        format,
        width: header.width,
        height: header.height,
        depth: header.depth,
        face_count: header.face_count(),
        mip_count: header.mip_count,
        layout,
        gl_layout,
    };

    // Size of the stored data, in the source layout. The decoded size is
    // checked too, so later size queries on `desc` cannot overflow.
    let stored = ImageDesc {
        layout: source.layout,
        ..desc.clone()
    };
    let data_size = stored
        .total_size()
        .filter(|_| desc.total_size().is_some())
        .ok_or_else(|| too_large(header.width, header.height, header.depth))?;

    Ok(Prepared {
        header,
        warnings: parsed.warnings,
        source,
        plan,
        desc,
        data_size,
    })
}

/// Describe an image from its header alone.
pub fn image_information<R: ByteReader + ?Sized>(
    reader: &mut R,
    options: &DecodeOptions,
) -> Result<ImageInfo> {
    let name = reader.name().to_string();
    let prepared = prepare(reader, options).map_err(|e| e.in_file(&name))?;
    let header = &prepared.header;

    Ok(ImageInfo {
        name,
        format: prepared.source.format,
        decoded_format: prepared.desc.format,
        width: header.width,
        height: header.height,
        depth: header.depth,
        mip_count: header.mip_count,
        face_count: header.face_count(),
        plan: prepared.plan,
        data_size: prepared.data_size,
        warnings: prepared.warnings,
    })
}

/// Decode an image into a new in-memory [`Image`].
pub fn decode<R: ByteReader + ?Sized>(reader: &mut R, options: &DecodeOptions) -> Result<Image> {
    let mut image = Image::new();
    decode_into(reader, options, &mut image)?;
    Ok(image)
}

/// Decode an image into `sink`.
///
/// The reader must hold every level the header describes; a short file
/// fails before the sink is constructed. Levels are streamed per face, from
/// the largest mip to the smallest. Errors carry the reader's name.
pub fn decode_into<R, S>(reader: &mut R, options: &DecodeOptions, sink: &mut S) -> Result<DecodeSummary>
where
    R: ByteReader + ?Sized,
    S: ImageSink + ?Sized,
{
    let name = reader.name().to_string();
    decode_prepared(reader, options, sink).map_err(|e| e.in_file(name))
}

fn decode_prepared<R, S>(reader: &mut R, options: &DecodeOptions, sink: &mut S) -> Result<DecodeSummary>
where
    R: ByteReader + ?Sized,
    S: ImageSink + ?Sized,
{
    let prepared = prepare(reader, options)?;

    let header = &prepared.header;
    if matches!(prepared.plan, DecodePlan::Uncompress(_))
        && (header.width % 4 != 0 || header.height % 4 != 0)
    {
        return Err(Error::InvalidBlockGeometry {
            width: header.width,
            height: header.height,
        });
    }

    let available = reader.remaining();
    if available < prepared.data_size {
        return Err(Error::Truncated {
            needed: prepared.data_size,
            available,
        });
    }

    sink.construct(&prepared.desc)?;

    let desc = &prepared.desc;
    for face in 0..desc.face_count {
        for mip in 0..desc.level_count() {
            let (width, height, depth) = desc.level_dimensions(mip);
            log::trace!("{}: face {face} mip {mip} {width}x{height}x{depth}", desc.name);

            for z in 0..depth {
                match prepared.plan {
                    DecodePlan::Uncompress(family) => {
                        uncompress_slice(reader, sink, family, desc.format, (width, height), (z, face, mip))?;
                    }
                    DecodePlan::UploadCompressed(_) | DecodePlan::UploadRaw => {
                        let size = prepared
                            .source
                            .layout
                            .slice_size(width, height)
                            .ok_or_else(|| too_large(width, height, depth))?;
                        copy_slice(reader, sink, size, desc.gl_layout, (z, face, mip))?;
                    }
                }
            }
        }
    }

    log::debug!(
        "{}: decoded {} bytes into {}",
        desc.name,
        prepared.data_size,
        desc.format
    );

    Ok(DecodeSummary {
        plan: prepared.plan,
        source_format: prepared.source.format,
        format: prepared.desc.format,
        data_size: prepared.data_size,
        warnings: prepared.warnings,
    })
}

fn copy_slice<R, S>(
    reader: &mut R,
    sink: &mut S,
    size: usize,
    gl_layout: Option<GlLayout>,
    (z, face, mip): (u32, u32, u32),
) -> Result<()>
where
    R: ByteReader + ?Sized,
    S: ImageSink + ?Sized,
{
    let dst = sink.pixel_data(0, 0, z, face, mip);
    let dst_len = dst.len();
    let dst = dst.get_mut(..size).ok_or_else(|| {
        Error::Sink(format!(
            "face {face} mip {mip} slice {z} holds {dst_len} bytes, {size} needed"
        ))
    })?;
    reader.read_into(dst)?;

    if let Some(layout) = gl_layout {
        swap_to_native(dst, layout.swap_unit as usize);
    }
    Ok(())
}

fn uncompress_slice<R, S>(
    reader: &mut R,
    sink: &mut S,
    family: BlockFormat,
    target: TextureFormat,
    (width, height): (u32, u32),
    (z, face, mip): (u32, u32, u32),
) -> Result<()>
where
    R: ByteReader + ?Sized,
    S: ImageSink + ?Sized,
{
    let mut block = [0u8; 16];
    let block = &mut block[..family.block_bytes()];

    for y in (0..height).step_by(4) {
        for x in (0..width).step_by(4) {
            reader.read_into(block)?;
            let samples = remap_samples(family.decode(block)?, target);
            for_each_clipped(x, y, width, height, |px, py, i| {
                sink.set_pixel(px, py, z, face, mip, samples[i]);
            });
        }
    }
    Ok(())
}

/// Move decoded channels to where the target format keeps them.
fn remap_samples(samples: BlockSamples, target: TextureFormat) -> BlockSamples {
    match target {
        // Second channel is alpha.
        TextureFormat::La8 => samples.map(|[l, a, _, _]| [l, 0.0, 0.0, a]),
        _ => samples,
    }
}

/// Reorder little-endian units of `unit` bytes to host order.
fn swap_to_native(data: &mut [u8], unit: usize) {
    if cfg!(target_endian = "big") && unit > 1 {
        for chunk in data.chunks_exact_mut(unit) {
            chunk.reverse();
        }
    }
}
