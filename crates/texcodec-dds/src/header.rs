//! DDS header structures and validation.
//!
//! The on-disk records are read as zerocopy structs, then validated and
//! normalized into a [`DdsHeader`]. Violations of the container format are
//! errors; suspicious but recoverable flag combinations are reported as
//! [`HeaderWarning`]s and parsing continues.

use std::fmt;

use bitflags::bitflags;
use texcodec_common::ByteReader;
use texcodec_format::ColorMasks;
use zerocopy::little_endian::U32;
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::fourcc::FourCC;
use crate::{Error, Result, DDS_MAGIC};

bitflags! {
    /// Which header members contain valid data.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HeaderFlags: u32 {
        const CAPS = 0x1;
        const HEIGHT = 0x2;
        const WIDTH = 0x4;
        const PITCH = 0x8;
        const PIXEL_FORMAT = 0x1000;
        const MIPMAP_COUNT = 0x2_0000;
        const LINEAR_SIZE = 0x8_0000;
        const DEPTH = 0x80_0000;

        /// Members every readable header must declare.
        const REQUIRED = Self::CAPS.bits()
            | Self::HEIGHT.bits()
            | Self::WIDTH.bits()
            | Self::PIXEL_FORMAT.bits();
    }
}

bitflags! {
    /// Pixel format description flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PixelFormatFlags: u32 {
        const ALPHA_PIXELS = 0x1;
        const ALPHA = 0x2;
        const FOURCC = 0x4;
        const RGB = 0x40;
        const YUV = 0x200;
        const LUMINANCE = 0x2_0000;
    }
}

bitflags! {
    /// Surface complexity.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Caps: u32 {
        const COMPLEX = 0x8;
        const TEXTURE = 0x1000;
        const MIPMAP = 0x40_0000;
    }
}

bitflags! {
    /// Cube map and volume details.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Caps2: u32 {
        const CUBEMAP = 0x200;
        const CUBEMAP_POSITIVE_X = 0x400;
        const CUBEMAP_NEGATIVE_X = 0x800;
        const CUBEMAP_POSITIVE_Y = 0x1000;
        const CUBEMAP_NEGATIVE_Y = 0x2000;
        const CUBEMAP_POSITIVE_Z = 0x4000;
        const CUBEMAP_NEGATIVE_Z = 0x8000;
        const VOLUME = 0x20_0000;

        const CUBEMAP_ALL_FACES = Self::CUBEMAP_POSITIVE_X.bits()
            | Self::CUBEMAP_NEGATIVE_X.bits()
            | Self::CUBEMAP_POSITIVE_Y.bits()
            | Self::CUBEMAP_NEGATIVE_Y.bits()
            | Self::CUBEMAP_POSITIVE_Z.bits()
            | Self::CUBEMAP_NEGATIVE_Z.bits();
    }
}

/// On-disk pixel format record.
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct RawPixelFormat {
    /// Structure size (should be 32).
    pub size: U32,
    pub flags: U32,
    pub four_cc: U32,
    pub rgb_bit_count: U32,
    pub r_bit_mask: U32,
    pub g_bit_mask: U32,
    pub b_bit_mask: U32,
    pub a_bit_mask: U32,
}

/// On-disk DDS header, following the magic.
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct RawHeader {
    /// Header size (should be 124).
    pub size: U32,
    pub flags: U32,
    pub height: U32,
    pub width: U32,
    pub pitch_or_linear_size: U32,
    pub depth: U32,
    pub mipmap_count: U32,
    pub reserved1: [U32; 11],
    pub pixel_format: RawPixelFormat,
    pub caps: U32,
    pub caps2: U32,
    pub caps3: U32,
    pub caps4: U32,
    pub reserved2: U32,
}

/// On-disk DX10 extended header.
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct RawDx10Header {
    pub dxgi_format: U32,
    pub resource_dimension: U32,
    pub misc_flag: U32,
    pub array_size: U32,
    pub misc_flags2: U32,
}

impl RawHeader {
    pub const SIZE: u32 = 124;
}

impl RawPixelFormat {
    pub const SIZE: u32 = 32;
}

impl RawDx10Header {
    pub const SIZE: usize = 20;
    /// `misc_flag` bit marking a 2D resource as a cube map.
    pub const MISC_TEXTURECUBE: u32 = 0x4;
}

/// Resource dimension of a DX10 texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceDimension {
    Texture1D,
    Texture2D,
    Texture3D,
}

impl ResourceDimension {
    fn from_raw(raw: u32) -> Result<Self> {
        match raw {
            2 => Ok(Self::Texture1D),
            3 => Ok(Self::Texture2D),
            4 => Ok(Self::Texture3D),
            other => Err(Error::ContainerFormat(format!(
                "unsupported DX10 resource dimension {other}"
            ))),
        }
    }
}

/// Normalized pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub flags: PixelFormatFlags,
    pub four_cc: FourCC,
    pub rgb_bit_count: u32,
    pub masks: ColorMasks,
}

impl PixelFormat {
    /// Whether the format is named by a FOURCC rather than masks.
    #[inline]
    pub fn uses_fourcc(&self) -> bool {
        self.flags.contains(PixelFormatFlags::FOURCC)
    }
}

/// DX10 extension fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dx10Header {
    pub dxgi_format: u32,
    pub resource_dimension: ResourceDimension,
    pub misc_flag: u32,
    pub array_size: u32,
}

/// Validated and normalized DDS header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsHeader {
    pub flags: HeaderFlags,
    pub width: u32,
    pub height: u32,
    /// Slice count; 1 for anything but a volume.
    pub depth: u32,
    /// Mip levels beyond the base level.
    pub mip_count: u32,
    pub pixel_format: PixelFormat,
    pub caps: Caps,
    pub caps2: Caps2,
    pub dx10: Option<Dx10Header>,
}

impl DdsHeader {
    #[inline]
    pub fn is_cubemap(&self) -> bool {
        self.caps2.contains(Caps2::CUBEMAP)
    }

    #[inline]
    pub fn is_volume(&self) -> bool {
        self.caps2.contains(Caps2::VOLUME)
    }

    /// Number of stored faces. Partial cube maps store only their present
    /// faces.
    pub fn face_count(&self) -> u32 {
        if self.is_cubemap() {
            self.caps2.intersection(Caps2::CUBEMAP_ALL_FACES).bits().count_ones()
        } else {
            1
        }
    }

    /// Total number of mip levels, base included.
    #[inline]
    pub fn level_count(&self) -> u32 {
        self.mip_count.saturating_add(1)
    }

    /// Byte offset of the first level's data.
    pub fn data_offset(&self) -> usize {
        let base = DDS_MAGIC.len() + RawHeader::SIZE as usize;
        if self.dx10.is_some() {
            base + RawDx10Header::SIZE
        } else {
            base
        }
    }

    /// Dimensions of mip level `mip`, each halved per level with a floor of 1.
    pub fn level_dimensions(&self, mip: u32) -> (u32, u32, u32) {
        let shrink = |v: u32| v.checked_shr(mip).unwrap_or(0).max(1);
        (shrink(self.width), shrink(self.height), shrink(self.depth))
    }
}

/// Recoverable oddity found while parsing a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderWarning {
    /// The texture cap is not set.
    TextureCapMissing,
    /// The depth flag is set on something that is not a volume.
    DepthWithoutVolume,
    /// A mipmapped, cube or volume texture lacks the complex cap.
    ComplexCapMissing,
    /// The complex cap is set on a single-surface texture.
    ComplexCapUnneeded,
    /// The RGB bit count disagrees with the masks; an alpha mask was
    /// inferred.
    AlphaMaskInferred {
        bit_count: u32,
        mask_bits: u32,
        alpha: u32,
    },
    /// The mipmap count runs past the 1x1 level and was cut to the full
    /// chain.
    MipCountClamped { declared: u32, levels: u32 },
}

impl fmt::Display for HeaderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TextureCapMissing => f.write_str("texture cap is not set"),
            Self::DepthWithoutVolume => f.write_str("depth flag set without the volume cap"),
            Self::ComplexCapMissing => {
                f.write_str("complex cap missing on a mipmapped, cube or volume texture")
            }
            Self::ComplexCapUnneeded => f.write_str("complex cap set on a single surface"),
            Self::AlphaMaskInferred {
                bit_count,
                mask_bits,
                alpha,
            } => write!(
                f,
                "bit count {bit_count} disagrees with {mask_bits} mask bits, inferred alpha mask {alpha:#010x}"
            ),
            Self::MipCountClamped { declared, levels } => {
                write!(f, "mipmap count {declared} exceeds the {levels} levels of a full chain")
            }
        }
    }
}

/// A header together with the warnings raised while parsing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeader {
    pub header: DdsHeader,
    pub warnings: Vec<HeaderWarning>,
}

/// Read and validate the DDS header at the start of `reader`.
///
/// The reader is rewound to offset 0 first and is left positioned at the
/// start of the level data.
pub fn parse_header<R: ByteReader + ?Sized>(reader: &mut R) -> Result<ParsedHeader> {
    reader.seek(0)?;

    let magic: [u8; 4] = reader.read_array()?;
    if &magic != DDS_MAGIC {
        return Err(Error::InvalidMagic(magic));
    }

    let raw: RawHeader = reader.read_struct()?;
    if raw.size.get() != RawHeader::SIZE {
        return Err(Error::ContainerFormat(format!(
            "header size {} is not {}",
            raw.size.get(),
            RawHeader::SIZE
        )));
    }
    let raw_pf = &raw.pixel_format;
    if raw_pf.size.get() != RawPixelFormat::SIZE {
        return Err(Error::ContainerFormat(format!(
            "pixel format size {} is not {}",
            raw_pf.size.get(),
            RawPixelFormat::SIZE
        )));
    }

    let mut flags = HeaderFlags::from_bits_retain(raw.flags.get());
    let caps = Caps::from_bits_retain(raw.caps.get());
    let mut caps2 = Caps2::from_bits_retain(raw.caps2.get());
    let mut pixel_format = PixelFormat {
        flags: PixelFormatFlags::from_bits_retain(raw_pf.flags.get()),
        four_cc: FourCC(raw_pf.four_cc.get()),
        rgb_bit_count: raw_pf.rgb_bit_count.get(),
        masks: ColorMasks::new(
            raw_pf.r_bit_mask.get(),
            raw_pf.g_bit_mask.get(),
            raw_pf.b_bit_mask.get(),
            raw_pf.a_bit_mask.get(),
        ),
    };

    if !flags.contains(HeaderFlags::REQUIRED) {
        return Err(Error::ContainerFormat(format!(
            "required flags missing: {:?}",
            HeaderFlags::REQUIRED.difference(flags)
        )));
    }

    let is_dx10 = pixel_format.uses_fourcc() && pixel_format.four_cc == FourCC::DX10;
    let dx10 = if is_dx10 {
        let ext: RawDx10Header = reader.read_struct()?;
        let resource_dimension = ResourceDimension::from_raw(ext.resource_dimension.get())?;
        if ext.array_size.get() > 1 {
            return Err(Error::UnsupportedFormat(format!(
                "texture arrays are not supported ({} elements)",
                ext.array_size.get()
            )));
        }
        match resource_dimension {
            ResourceDimension::Texture2D
                if ext.misc_flag.get() & RawDx10Header::MISC_TEXTURECUBE != 0 =>
            {
                caps2 |= Caps2::CUBEMAP | Caps2::CUBEMAP_ALL_FACES;
            }
            ResourceDimension::Texture3D => {
                flags |= HeaderFlags::DEPTH;
                caps2 |= Caps2::VOLUME;
            }
            _ => {}
        }
        Some(Dx10Header {
            dxgi_format: ext.dxgi_format.get(),
            resource_dimension,
            misc_flag: ext.misc_flag.get(),
            array_size: ext.array_size.get(),
        })
    } else {
        None
    };

    let mut warnings = Vec::new();

    if !caps.contains(Caps::TEXTURE) {
        warnings.push(HeaderWarning::TextureCapMissing);
    }

    let is_cubemap = caps2.contains(Caps2::CUBEMAP);
    let is_volume = caps2.contains(Caps2::VOLUME);
    if is_cubemap && !caps2.intersects(Caps2::CUBEMAP_ALL_FACES) {
        return Err(Error::ContainerFormat("cube map without any faces".into()));
    }
    if is_cubemap && is_volume {
        return Err(Error::ContainerFormat(
            "texture is both a cube map and a volume".into(),
        ));
    }

    if flags.contains(HeaderFlags::DEPTH) && !is_volume {
        warnings.push(HeaderWarning::DepthWithoutVolume);
    }

    let needs_complex = is_cubemap || is_volume || caps.contains(Caps::MIPMAP);
    match (needs_complex, caps.contains(Caps::COMPLEX)) {
        (true, false) => warnings.push(HeaderWarning::ComplexCapMissing),
        (false, true) => warnings.push(HeaderWarning::ComplexCapUnneeded),
        _ => {}
    }

    let pf_flags = pixel_format.flags;
    match (
        pf_flags.contains(PixelFormatFlags::FOURCC),
        pf_flags.contains(PixelFormatFlags::RGB),
    ) {
        (true, true) if !is_dx10 => {
            return Err(Error::ContainerFormat(
                "pixel format sets both FOURCC and RGB".into(),
            ));
        }
        (false, false) => {
            if pf_flags.contains(PixelFormatFlags::LUMINANCE) {
                pixel_format.masks.green = 0;
                pixel_format.masks.blue = 0;
            } else if !pf_flags.intersects(PixelFormatFlags::ALPHA | PixelFormatFlags::ALPHA_PIXELS) {
                return Err(Error::ContainerFormat(
                    "pixel format sets neither FOURCC, RGB, luminance nor alpha".into(),
                ));
            }
        }
        _ => {}
    }

    if pf_flags.contains(PixelFormatFlags::RGB) && !is_dx10 {
        let masks = pixel_format.masks;
        let mask_bits = masks.bit_count();
        let bit_count = pixel_format.rgb_bit_count;
        if bit_count != mask_bits {
            let mut alpha = !(masks.red ^ masks.green ^ masks.blue);
            if bit_count < 32 {
                alpha &= (1u32 << bit_count) - 1;
            }
            pixel_format.masks.alpha = alpha;
            warnings.push(HeaderWarning::AlphaMaskInferred {
                bit_count,
                mask_bits,
                alpha,
            });
        }
    }

    let depth = if is_volume && flags.contains(HeaderFlags::DEPTH) {
        match raw.depth.get() {
            0 => return Err(Error::ContainerFormat("volume texture with depth 0".into())),
            depth => depth,
        }
    } else {
        1
    };

    let mip_count = if caps.contains(Caps::MIPMAP) {
        let declared = raw.mipmap_count.get();
        let largest = raw.width.get().max(raw.height.get()).max(depth).max(1);
        let levels = u32::BITS - largest.leading_zeros();
        if declared > levels {
            warnings.push(HeaderWarning::MipCountClamped { declared, levels });
        }
        declared.clamp(1, levels) - 1
    } else {
        0
    };

    for warning in &warnings {
        log::warn!("{}: {}", reader.name(), warning);
    }

    let header = DdsHeader {
        flags,
        width: raw.width.get(),
        height: raw.height.get(),
        depth,
        mip_count,
        pixel_format,
        caps,
        caps2,
        dx10,
    };

    log::debug!(
        "{}: {}x{}x{} faces={} mips={} fourcc={} dx10={}",
        reader.name(),
        header.width,
        header.height,
        header.depth,
        header.face_count(),
        header.level_count(),
        header.pixel_format.four_cc,
        header.dx10.is_some()
    );

    Ok(ParsedHeader { header, warnings })
}
