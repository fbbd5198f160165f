//! Byte-addressable access to the backing image file.
//!
//! Generalized from the teacher's `BlockFile`, which only allows
//! block-aligned reads/writes: FAT cells are 4 bytes and directory entries
//! are 32 bytes, so this type seeks to an arbitrary absolute offset instead.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::error::FatResult;

pub struct Image {
    file: File,
}

impl Image {
    pub fn open(file: File) -> Self {
        Self { file }
    }

    pub fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> FatResult<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(buf)?;
        Ok(())
    }

    /// Writes `buf` at `offset` and fsyncs before returning: a write must be
    /// durable before the operation that issued it returns.
    pub fn write_at(&mut self, offset: u64, buf: &[u8]) -> FatResult<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(buf)?;
        self.file.sync_data()?;
        Ok(())
    }

    pub fn len(&self) -> FatResult<u64> {
        Ok(self.file.metadata()?.len())
    }
}
