//! Directory cache: materializes one directory's raw entries from its
//! cluster chain into a resizable in-memory array, and routes individual
//! entry writes back to their on-disk position.

use crate::bpb::{BiosParameterBlock, FsInfo};
use crate::direntry::{RawEntry, RAW_ENTRY_SIZE};
use crate::error::FatResult;
use crate::fat::FatTable;
use crate::image::Image;

pub struct DirectoryFrame {
    pub start_cluster: u32,
    pub display_name: String,
    pub entries: Vec<RawEntry>,
}

impl DirectoryFrame {
    /// Walks the chain and reads `cluster_size / 32` entries from every
    /// cluster in it, in chain order.
    pub fn load(
        image: &mut Image,
        fat: &FatTable,
        bpb: &BiosParameterBlock,
        start_cluster: u32,
        display_name: String,
    ) -> FatResult<Self> {
        let clusters = fat.walk_chain(image, start_cluster)?;
        let per_cluster = bpb.cluster_size_bytes() as usize / RAW_ENTRY_SIZE;
        let mut entries = Vec::with_capacity(clusters.len() * per_cluster);
        for &cluster in &clusters {
            let base = bpb.cluster_byte_offset(cluster);
            for i in 0..per_cluster {
                let mut buf = [0u8; RAW_ENTRY_SIZE];
                image.read_at(base + (i * RAW_ENTRY_SIZE) as u64, &mut buf)?;
                entries.push(RawEntry(buf));
            }
        }
        Ok(Self {
            start_cluster,
            display_name,
            entries,
        })
    }

    pub fn reload(&mut self, image: &mut Image, fat: &FatTable, bpb: &BiosParameterBlock) -> FatResult<()> {
        let reloaded = Self::load(image, fat, bpb, self.start_cluster, self.display_name.clone())?;
        self.entries = reloaded.entries;
        Ok(())
    }

    /// Given a cached entry index, finds which cluster of the chain holds
    /// it and adds the in-cluster byte offset.
    fn entry_offset(
        &self,
        image: &mut Image,
        fat: &FatTable,
        bpb: &BiosParameterBlock,
        index: usize,
    ) -> FatResult<u64> {
        let per_cluster = bpb.cluster_size_bytes() as usize / RAW_ENTRY_SIZE;
        let hop = index / per_cluster;
        let in_cluster_offset = (index % per_cluster) * RAW_ENTRY_SIZE;
        let mut cluster = self.start_cluster;
        for _ in 0..hop {
            cluster = fat.read_entry(image, cluster)?;
        }
        Ok(bpb.cluster_byte_offset(cluster) + in_cluster_offset as u64)
    }

    pub fn flush_entry(
        &mut self,
        image: &mut Image,
        fat: &FatTable,
        bpb: &BiosParameterBlock,
        index: usize,
        raw: RawEntry,
    ) -> FatResult<()> {
        let offset = self.entry_offset(image, fat, bpb, index)?;
        image.write_at(offset, &raw.0)?;
        self.entries[index] = raw;
        Ok(())
    }

    /// First slot whose status byte is `0xE5` or `0x00`, whichever comes
    /// first by index — a deleted slot earlier in the directory wins over
    /// reaching the terminator.
    pub fn find_free_slot(&self) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.is_free() || e.is_end())
    }

    /// Allocates one more cluster, links it onto the chain's tail, and
    /// reloads the cache. Returns the index of the first new slot.
    pub fn grow(
        &mut self,
        image: &mut Image,
        fat: &FatTable,
        bpb: &BiosParameterBlock,
        fs_info: &mut FsInfo,
    ) -> FatResult<usize> {
        let last = fat.last_cluster_in_chain(image, self.start_cluster)?;
        let first_new_index = self.entries.len();
        let new_cluster = fat.allocate(image, fs_info, 1)?;
        fat.write_entry(image, last, new_cluster)?;
        self.reload(image, fat, bpb)?;
        Ok(first_new_index)
    }

    /// Live entries in on-disk order: stops at the first `0x00` terminator,
    /// skips `0xE5` and long-name slots.
    pub fn live_short_entries(&self) -> impl Iterator<Item = (usize, &RawEntry)> {
        self.entries
            .iter()
            .enumerate()
            .take_while(|(_, e)| !e.is_end())
            .filter(|(_, e)| !e.is_free() && !e.is_long_name())
    }
}
