//! Common utilities for texcodec.
//!
//! This crate provides the low-level reading primitives shared by the codec crates:
//!
//! - [`ByteReader`] - Sequential little-endian reads with absolute seeking
//! - [`BinaryReader`] - Zero-copy reader over byte slices
//! - [`StreamReader`] - Reader over any `Read + Seek` source
//! - [`BitCursor`] - LSB-first bit extraction for packed texel indices

mod bits;
mod error;
mod reader;

pub use bits::BitCursor;
pub use error::{Error, Result};
pub use reader::{BinaryReader, ByteReader, StreamReader};

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
