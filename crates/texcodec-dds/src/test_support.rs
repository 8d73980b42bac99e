//! DDS fixture builder shared by unit and integration tests.

#![allow(dead_code)]

pub const DDSD_CAPS: u32 = 0x1;
pub const DDSD_HEIGHT: u32 = 0x2;
pub const DDSD_WIDTH: u32 = 0x4;
pub const DDSD_PIXELFORMAT: u32 = 0x1000;
pub const DDSD_MIPMAPCOUNT: u32 = 0x20000;
pub const DDSD_DEPTH: u32 = 0x80_0000;

pub const DDPF_ALPHAPIXELS: u32 = 0x1;
pub const DDPF_ALPHA: u32 = 0x2;
pub const DDPF_FOURCC: u32 = 0x4;
pub const DDPF_RGB: u32 = 0x40;
pub const DDPF_LUMINANCE: u32 = 0x2_0000;

pub const DDSCAPS_COMPLEX: u32 = 0x8;
pub const DDSCAPS_TEXTURE: u32 = 0x1000;
pub const DDSCAPS_MIPMAP: u32 = 0x40_0000;

pub const DDSCAPS2_CUBEMAP: u32 = 0x200;
pub const DDSCAPS2_ALL_FACES: u32 = 0xFC00;
pub const DDSCAPS2_VOLUME: u32 = 0x20_0000;

/// Little-endian FOURCC value of a four-character code.
pub const fn fourcc(code: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*code)
}

/// Builder for in-memory DDS files.
#[derive(Debug, Clone)]
pub struct DdsBuilder {
    pub size: u32,
    pub flags: u32,
    pub height: u32,
    pub width: u32,
    pub depth: u32,
    pub mipmap_count: u32,
    pub pf_size: u32,
    pub pf_flags: u32,
    pub four_cc: u32,
    pub bit_count: u32,
    pub masks: [u32; 4],
    pub caps: u32,
    pub caps2: u32,
    pub dx10: Option<[u32; 5]>,
    pub data: Vec<u8>,
}

impl DdsBuilder {
    /// A minimal valid 2D header with no pixel format yet.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: 124,
            flags: DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT,
            height,
            width,
            depth: 0,
            mipmap_count: 0,
            pf_size: 32,
            pf_flags: 0,
            four_cc: 0,
            bit_count: 0,
            masks: [0; 4],
            caps: DDSCAPS_TEXTURE,
            caps2: 0,
            dx10: None,
            data: Vec::new(),
        }
    }

    pub fn fourcc(mut self, code: u32) -> Self {
        self.pf_flags |= DDPF_FOURCC;
        self.four_cc = code;
        self
    }

    pub fn rgb(mut self, bit_count: u32, masks: [u32; 4]) -> Self {
        self.pf_flags |= DDPF_RGB;
        if masks[3] != 0 {
            self.pf_flags |= DDPF_ALPHAPIXELS;
        }
        self.bit_count = bit_count;
        self.masks = masks;
        self
    }

    /// Raw mipmap count; also sets the mipmap flag and caps.
    pub fn mipmaps(mut self, count: u32) -> Self {
        self.flags |= DDSD_MIPMAPCOUNT;
        self.caps |= DDSCAPS_MIPMAP | DDSCAPS_COMPLEX;
        self.mipmap_count = count;
        self
    }

    pub fn cubemap(mut self) -> Self {
        self.caps |= DDSCAPS_COMPLEX;
        self.caps2 |= DDSCAPS2_CUBEMAP | DDSCAPS2_ALL_FACES;
        self
    }

    pub fn volume(mut self, depth: u32) -> Self {
        self.flags |= DDSD_DEPTH;
        self.caps |= DDSCAPS_COMPLEX;
        self.caps2 |= DDSCAPS2_VOLUME;
        self.depth = depth;
        self
    }

    pub fn dx10(mut self, dxgi_format: u32, dimension: u32, misc_flag: u32) -> Self {
        self = self.fourcc(fourcc(b"DX10"));
        self.dx10 = Some([dxgi_format, dimension, misc_flag, 1, 0]);
        self
    }

    pub fn data(mut self, data: &[u8]) -> Self {
        self.data = data.to_vec();
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut words = vec![
            self.size,
            self.flags,
            self.height,
            self.width,
            0,
            self.depth,
            self.mipmap_count,
        ];
        words.extend([0u32; 11]);
        words.extend([self.pf_size, self.pf_flags, self.four_cc, self.bit_count]);
        words.extend(self.masks);
        words.extend([self.caps, self.caps2, 0, 0, 0]);
        if let Some(dx10) = self.dx10 {
            words.extend(dx10);
        }

        let mut out = b"DDS ".to_vec();
        for word in words {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out.extend_from_slice(&self.data);
        out
    }
}

/// A DXT1 block with a single opaque 5:6:5 color.
pub fn solid_dxt1_block(color: u16) -> [u8; 8] {
    let [lo, hi] = color.to_le_bytes();
    [lo, hi, 0, 0, 0, 0, 0, 0]
}
