//! OpenGL pixel transfer enums.
//!
//! Only the values the catalog and the fixed layouts refer to are listed.

use std::fmt;

/// Pixel data type of a GL upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum GlType {
    UnsignedByte = 0x1401,
    Short = 0x1402,
    UnsignedShort = 0x1403,
    Float = 0x1406,
    HalfFloat = 0x140B,
    UnsignedByte332 = 0x8032,
    UnsignedShort4444 = 0x8033,
    UnsignedShort5551 = 0x8034,
    UnsignedInt8888 = 0x8035,
    UnsignedInt1010102 = 0x8036,
    UnsignedByte233Rev = 0x8362,
    UnsignedShort565 = 0x8363,
    UnsignedShort565Rev = 0x8364,
    UnsignedShort4444Rev = 0x8365,
    UnsignedShort1555Rev = 0x8366,
    UnsignedInt8888Rev = 0x8367,
    UnsignedInt2101010Rev = 0x8368,
    UnsignedInt248 = 0x84FA,
}

impl GlType {
    /// Raw GL enum value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Whether one value of this type holds a whole texel.
    ///
    /// Packed types are byte swapped per texel; plain component types per
    /// component.
    pub const fn is_packed(self) -> bool {
        !matches!(
            self,
            Self::UnsignedByte | Self::Short | Self::UnsignedShort | Self::Float | Self::HalfFloat
        )
    }

    /// GL constant name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::UnsignedByte => "GL_UNSIGNED_BYTE",
            Self::Short => "GL_SHORT",
            Self::UnsignedShort => "GL_UNSIGNED_SHORT",
            Self::Float => "GL_FLOAT",
            Self::HalfFloat => "GL_HALF_FLOAT",
            Self::UnsignedByte332 => "GL_UNSIGNED_BYTE_3_3_2",
            Self::UnsignedShort4444 => "GL_UNSIGNED_SHORT_4_4_4_4",
            Self::UnsignedShort5551 => "GL_UNSIGNED_SHORT_5_5_5_1",
            Self::UnsignedInt8888 => "GL_UNSIGNED_INT_8_8_8_8",
            Self::UnsignedInt1010102 => "GL_UNSIGNED_INT_10_10_10_2",
            Self::UnsignedByte233Rev => "GL_UNSIGNED_BYTE_2_3_3_REV",
            Self::UnsignedShort565 => "GL_UNSIGNED_SHORT_5_6_5",
            Self::UnsignedShort565Rev => "GL_UNSIGNED_SHORT_5_6_5_REV",
            Self::UnsignedShort4444Rev => "GL_UNSIGNED_SHORT_4_4_4_4_REV",
            Self::UnsignedShort1555Rev => "GL_UNSIGNED_SHORT_1_5_5_5_REV",
            Self::UnsignedInt8888Rev => "GL_UNSIGNED_INT_8_8_8_8_REV",
            Self::UnsignedInt2101010Rev => "GL_UNSIGNED_INT_2_10_10_10_REV",
            Self::UnsignedInt248 => "GL_UNSIGNED_INT_24_8",
        }
    }
}

impl fmt::Display for GlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pixel format (channel set and order) of a GL upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum GlFormat {
    DepthComponent = 0x1902,
    Red = 0x1903,
    Alpha = 0x1906,
    Rgb = 0x1907,
    Rgba = 0x1908,
    Luminance = 0x1909,
    LuminanceAlpha = 0x190A,
    Bgr = 0x80E0,
    Bgra = 0x80E1,
    Rg = 0x8227,
    DepthStencil = 0x84F9,
}

impl GlFormat {
    /// Raw GL enum value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Number of components per texel.
    pub const fn components(self) -> u32 {
        match self {
            Self::DepthComponent | Self::Red | Self::Alpha | Self::Luminance => 1,
            Self::LuminanceAlpha | Self::Rg | Self::DepthStencil => 2,
            Self::Rgb | Self::Bgr => 3,
            Self::Rgba | Self::Bgra => 4,
        }
    }

    /// GL constant name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::DepthComponent => "GL_DEPTH_COMPONENT",
            Self::Red => "GL_RED",
            Self::Alpha => "GL_ALPHA",
            Self::Rgb => "GL_RGB",
            Self::Rgba => "GL_RGBA",
            Self::Luminance => "GL_LUMINANCE",
            Self::LuminanceAlpha => "GL_LUMINANCE_ALPHA",
            Self::Bgr => "GL_BGR",
            Self::Bgra => "GL_BGRA",
            Self::Rg => "GL_RG",
            Self::DepthStencil => "GL_DEPTH_STENCIL",
        }
    }
}

impl fmt::Display for GlFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A complete upload description: component type, channel order, texel
/// size and byte swap unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlLayout {
    pub gl_type: GlType,
    pub gl_format: GlFormat,
    pub bytes_per_texel: u32,
    pub swap_unit: u32,
}

impl fmt::Display for GlLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({} bytes, swap {})",
            self.gl_type, self.gl_format, self.bytes_per_texel, self.swap_unit
        )
    }
}
