//! Core FAT32 volume engine: boot-sector parsing, FAT table management,
//! directory-entry caching, short-name encoding, and the high-level
//! operations the shell front-end dispatches to.
//!
//! The binary crate (`src/main.rs`) is a thin `clap`-driven REPL over
//! [`session::Session`]; everything that touches the on-disk format lives
//! here so it can be unit tested without a terminal.

pub mod bpb;
pub mod cli;
pub mod direntry;
pub mod error;
pub mod fat;
pub mod dirframe;
pub mod image;
pub mod ops;
pub mod pathstack;
pub mod session;
pub mod shortname;

pub use error::{FatError, FatResult};

/// Attribute bits (FAT32 on-disk format).
pub const ATTR_READ_ONLY: u8 = 0x01;
pub const ATTR_HIDDEN: u8 = 0x02;
pub const ATTR_SYSTEM: u8 = 0x04;
pub const ATTR_VOLUME_ID: u8 = 0x08;
pub const ATTR_DIRECTORY: u8 = 0x10;
pub const ATTR_ARCHIVE: u8 = 0x20;
/// A directory entry whose attribute byte equals this mask (exactly) is a
/// long-name fragment; the core recognizes it only to skip over it.
pub const ATTR_LONG_NAME_MASK: u8 = 0x0F;

/// Status byte values for a short directory entry's name[0].
pub const DIR_ENTRY_FREE: u8 = 0xE5;
pub const DIR_ENTRY_END: u8 = 0x00;

/// FAT entry sentinels (28 meaningful bits; high 4 bits reserved).
pub const FAT_FREE: u32 = 0x0000_0000;
pub const FAT_EOC_MIN: u32 = 0x0FFF_FFF8;
/// Canonical end-of-chain value this core writes when terminating a chain.
pub const FAT_EOC: u32 = 0x0FFF_FFFF;
pub const FAT_ENTRY_MASK: u32 = 0x0FFF_FFFF;

pub const DIRENT_SIZE: u64 = 32;
pub const FAT_ENTRY_SIZE: u64 = 4;

/// Characters disallowed in the base and extension of an 8.3 short name.
pub const SHORT_NAME_PROHIBITED: &[u8] = b"+,;=[]. ";
