//! FAT manager: reads and writes mirrored 32-bit FAT entries, walks and
//! allocates cluster chains.
//!
//! Allocation tie-break is lowest free cluster number wins: a linear scan
//! from cluster 2 that is deterministic given the FAT state. This design
//! is deliberately conservative like the one it's modeled on — it does not
//! consult FSInfo's "next free" hint to pick a starting point, though this
//! core does keep that hint up to date for any other tool that trusts it.

use crate::bpb::{BiosParameterBlock, FsInfo};
use crate::error::{FatError, FatResult};
use crate::image::Image;
use crate::{FAT_EOC, FAT_ENTRY_MASK, FAT_EOC_MIN, FAT_FREE};

#[derive(Clone, Copy)]
pub struct FatTable {
    bpb: BiosParameterBlock,
}

impl FatTable {
    pub fn new(bpb: BiosParameterBlock) -> Self {
        Self { bpb }
    }

    /// Raw read, normalizing any reserved/bad marker `>= 0x0FFF_FFF8` to the
    /// single end-of-chain sentinel this core uses throughout.
    pub fn read_entry(&self, image: &mut Image, cluster: u32) -> FatResult<u32> {
        let mut buf = [0u8; 4];
        image.read_at(self.bpb.fat_entry_offset(cluster), &mut buf)?;
        let raw = u32::from_le_bytes(buf) & FAT_ENTRY_MASK;
        Ok(if raw >= FAT_EOC_MIN { FAT_EOC } else { raw })
    }

    /// Writes `value` to both FAT copies; by the time this returns, a
    /// subsequent read sees the new value in either copy.
    pub fn write_entry(&self, image: &mut Image, cluster: u32, value: u32) -> FatResult<()> {
        let bytes = (value & FAT_ENTRY_MASK).to_le_bytes();
        image.write_at(self.bpb.fat_entry_offset(cluster), &bytes)?;
        image.write_at(self.bpb.fat2_entry_offset(cluster), &bytes)?;
        Ok(())
    }

    /// Clusters of the chain starting at `start`, inclusive of `start`,
    /// ending at (but not including) the end-of-chain sentinel.
    pub fn walk_chain(&self, image: &mut Image, start: u32) -> FatResult<Vec<u32>> {
        let mut clusters = Vec::new();
        let mut current = start;
        loop {
            clusters.push(current);
            let next = self.read_entry(image, current)?;
            if next == FAT_EOC || next == FAT_FREE {
                break;
            }
            current = next;
        }
        Ok(clusters)
    }

    pub fn last_cluster_in_chain(&self, image: &mut Image, start: u32) -> FatResult<u32> {
        Ok(*self
            .walk_chain(image, start)?
            .last()
            .expect("a chain always contains its start cluster"))
    }

    /// Finds `n` free clusters by ascending linear scan from cluster 2,
    /// links them in discovery order, zero-fills each (per this core's
    /// resolution to uphold the "clusters after the 0x00 terminator stay
    /// 0x00" invariant), and updates the FSInfo hints. Leaves the FAT
    /// completely unmodified if fewer than `n` are free.
    pub fn allocate(
        &self,
        image: &mut Image,
        fs_info: &mut FsInfo,
        n: u32,
    ) -> FatResult<u32> {
        if n == 0 {
            return Err(FatError::OutOfSpace);
        }
        let total_clusters = self.bpb.data_cluster_count() as u32 + 2;
        let mut found = Vec::with_capacity(n as usize);
        let mut cluster = 2u32;
        while cluster < total_clusters && (found.len() as u32) < n {
            if self.read_entry(image, cluster)? == FAT_FREE {
                found.push(cluster);
            }
            cluster += 1;
        }
        if (found.len() as u32) < n {
            return Err(FatError::OutOfSpace);
        }

        for pair in found.windows(2) {
            self.write_entry(image, pair[0], pair[1])?;
        }
        self.write_entry(image, *found.last().unwrap(), FAT_EOC)?;

        let zeros = vec![0u8; self.bpb.cluster_size_bytes() as usize];
        for &c in &found {
            image.write_at(self.bpb.cluster_byte_offset(c), &zeros)?;
        }

        let free_before = fs_info.free_cluster_count();
        if free_before != u32::MAX {
            fs_info.set_free_cluster_count(free_before.saturating_sub(n));
        }
        fs_info.set_next_free_cluster(*found.last().unwrap());

        Ok(found[0])
    }

    /// Walks the chain and frees every cluster in it. Data bytes are left
    /// untouched; only the FAT cells are cleared.
    pub fn free_chain(&self, image: &mut Image, fs_info: &mut FsInfo, start: u32) -> FatResult<()> {
        let clusters = self.walk_chain(image, start)?;
        for &c in &clusters {
            self.write_entry(image, c, FAT_FREE)?;
        }
        let free_before = fs_info.free_cluster_count();
        if free_before != u32::MAX {
            fs_info.set_free_cluster_count(free_before + clusters.len() as u32);
        }
        Ok(())
    }
}
