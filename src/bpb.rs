//! BIOS Parameter Block (BPB) and Boot Sector
//!
//! The first important data structure on a FAT volume is called the BPB (BIOS Parameter Block), which
//! is located in the first sector of the volume in the Reserved Region. This sector is sometimes called the
//! "boot sector" or the "reserved sector" or the "0th sector", but the important fact is simply that it is the
//! first sector of the volume.
//!
//! [`BiosParameterBlock`] is the main structure of this module. It contains the [`BasicBpb`] and [`Bpb32`] fields.
//!
//! FAT Data Structure
//!
//! The FAT maps the data region of the volume by cluster number. The first data cluster is cluster 2.
//!
//! Functions implemented for [`BiosParameterBlock`]:
//! - [`BiosParameterBlock::first_data_sector`]: the first data sector beyond the reserved+FAT regions
//! - [`BiosParameterBlock::cluster_byte_offset`]: the byte offset of a given cluster in the data region
//! - [`BiosParameterBlock::fat_entry_offset`] / [`BiosParameterBlock::fat2_entry_offset`]: byte offset of a
//!   cluster's FAT cell in each FAT copy
//!
//! Given any valid data cluster number N, the byte offset of that cluster is computed as:
//!     ((N - 2) * BPB_SecPerClus + FirstDataSector) * BPB_BytsPerSec
//!
//! We only realize FAT32, so FAT12/16 fields are not modeled; this crate refuses to mount anything else.

use crate::error::{FatError, FatResult};
use crate::FAT_ENTRY_SIZE;

pub const LEAD_SIGNATURE: u32 = 0x4161_5252;
pub const STRUCT_SIGNATURE: u32 = 0x6141_7272;
pub const TRAIL_SIGNATURE: u32 = 0xAA55_0000;

pub const BASIC_BPB_SIZE: usize = 36;
pub const BPB32_SIZE: usize = 54;
pub const BOOT_SECTOR_SIZE: usize = 512;
pub const FSINFO_SIZE: usize = 512;

/// Parsed boot sector: common BPB fields plus the FAT32-specific extension.
///
/// Read once at mount and cached immutably for the session; this core never
/// rewrites the boot sector.
#[derive(Debug, Clone, Copy)]
pub struct BiosParameterBlock {
    pub(crate) basic: BasicBpb,
    pub(crate) bpb32: Bpb32,
}

impl BiosParameterBlock {
    /// Parses a boot sector out of its raw 512-byte image.
    pub fn parse(sector: &[u8]) -> FatResult<Self> {
        if sector.len() < BOOT_SECTOR_SIZE {
            return Err(FatError::NotFat32);
        }
        let basic = BasicBpb::parse(&sector[0..BASIC_BPB_SIZE]);
        let bpb32 = Bpb32::parse(&sector[BASIC_BPB_SIZE..BASIC_BPB_SIZE + BPB32_SIZE]);
        let bpb = Self { basic, bpb32 };
        if !bpb.is_fat32() {
            return Err(FatError::NotFat32);
        }
        Ok(bpb)
    }

    fn is_fat32(&self) -> bool {
        self.basic.root_ent_cnt == 0
            && self.basic.tot_sec16 == 0
            && self.basic.tot_sec32 != 0
            && self.basic.fat_sz16 == 0
            && self.bpb32.fat_sz32 != 0
    }

    pub fn bytes_per_sector(&self) -> u64 {
        self.basic.byts_per_sec as u64
    }

    pub fn sectors_per_cluster(&self) -> u64 {
        self.basic.sec_per_clus as u64
    }

    pub fn reserved_sector_count(&self) -> u64 {
        self.basic.rsvd_sec_cnt as u64
    }

    pub fn fat_count(&self) -> u64 {
        self.basic.num_fats as u64
    }

    pub fn fat_size_sectors(&self) -> u64 {
        self.bpb32.fat_sz32 as u64
    }

    pub fn total_sector_count(&self) -> u64 {
        self.basic.tot_sec32 as u64
    }

    pub fn root_cluster(&self) -> u32 {
        self.bpb32.root_clus
    }

    pub fn fs_info_sector(&self) -> u64 {
        self.bpb32.fs_info as u64
    }

    pub fn cluster_size_bytes(&self) -> u64 {
        self.sectors_per_cluster() * self.bytes_per_sector()
    }

    /// Sector at which the data region begins: reserved_sectors + num_fats * fat_size_sectors.
    pub fn first_data_sector(&self) -> u64 {
        self.reserved_sector_count() + self.fat_count() * self.fat_size_sectors()
    }

    /// Byte offset of the first byte of FAT copy 1.
    pub fn fat1_offset(&self) -> u64 {
        self.reserved_sector_count() * self.bytes_per_sector()
    }

    /// Byte offset of the first byte of FAT copy 2.
    pub fn fat2_offset(&self) -> u64 {
        self.fat1_offset() + self.fat_size_sectors() * self.bytes_per_sector()
    }

    /// Byte offset of `cluster`'s 32-bit cell within FAT copy 1.
    pub fn fat_entry_offset(&self, cluster: u32) -> u64 {
        self.fat1_offset() + cluster as u64 * FAT_ENTRY_SIZE
    }

    /// Byte offset of `cluster`'s 32-bit cell within FAT copy 2.
    pub fn fat2_entry_offset(&self, cluster: u32) -> u64 {
        self.fat2_offset() + cluster as u64 * FAT_ENTRY_SIZE
    }

    /// Byte offset of the first byte of `cluster` in the data region.
    pub fn cluster_byte_offset(&self, cluster: u32) -> u64 {
        assert!(cluster >= 2, "cluster numbers start at 2");
        (cluster as u64 - 2) * self.sectors_per_cluster() * self.bytes_per_sector()
            + self.first_data_sector() * self.bytes_per_sector()
    }

    pub fn data_sector_count(&self) -> u64 {
        self.total_sector_count() - self.first_data_sector()
    }

    pub fn data_cluster_count(&self) -> u64 {
        self.data_sector_count() / self.sectors_per_cluster()
    }
}

/// Boot Sector and BPB Structure common to FAT12/16/32, offsets 0x00-0x23.
#[derive(Debug, Clone, Copy)]
pub struct BasicBpb {
    pub(crate) bs_jmp_boot: [u8; 3],
    pub(crate) bs_oem_name: [u8; 8],
    pub(crate) byts_per_sec: u16,
    pub(crate) sec_per_clus: u8,
    pub(crate) rsvd_sec_cnt: u16,
    pub(crate) num_fats: u8,
    /// Always 0 on FAT32; the root directory is a normal cluster chain there.
    pub(crate) root_ent_cnt: u16,
    pub(crate) tot_sec16: u16,
    pub(crate) media: u8,
    /// Always 0 on FAT32; see `Bpb32::fat_sz32`.
    pub(crate) fat_sz16: u16,
    pub(crate) sec_per_trk: u16,
    pub(crate) num_heads: u16,
    pub(crate) hidd_sec: u32,
    pub(crate) tot_sec32: u32,
}

impl BasicBpb {
    fn parse(b: &[u8]) -> Self {
        Self {
            bs_jmp_boot: [b[0], b[1], b[2]],
            bs_oem_name: b[3..11].try_into().unwrap(),
            byts_per_sec: u16::from_le_bytes(b[11..13].try_into().unwrap()),
            sec_per_clus: b[13],
            rsvd_sec_cnt: u16::from_le_bytes(b[14..16].try_into().unwrap()),
            num_fats: b[16],
            root_ent_cnt: u16::from_le_bytes(b[17..19].try_into().unwrap()),
            tot_sec16: u16::from_le_bytes(b[19..21].try_into().unwrap()),
            media: b[21],
            fat_sz16: u16::from_le_bytes(b[22..24].try_into().unwrap()),
            sec_per_trk: u16::from_le_bytes(b[24..26].try_into().unwrap()),
            num_heads: u16::from_le_bytes(b[26..28].try_into().unwrap()),
            hidd_sec: u32::from_le_bytes(b[28..32].try_into().unwrap()),
            tot_sec32: u32::from_le_bytes(b[32..36].try_into().unwrap()),
        }
    }
}

/// FAT32-specific extension of the boot sector, offsets 0x24-0x59.
#[derive(Debug, Clone, Copy)]
pub struct Bpb32 {
    pub(crate) fat_sz32: u32,
    pub(crate) ext_flags: u16,
    pub(crate) fs_ver: u16,
    pub(crate) root_clus: u32,
    pub(crate) fs_info: u16,
    pub(crate) bk_boot_sec: u16,
    pub(crate) reserved: [u8; 12],
    pub(crate) bs_drv_num: u8,
    pub(crate) bs_reserved1: u8,
    pub(crate) bs_boot_sig: u8,
    pub(crate) bs_vol_id: u32,
    pub(crate) bs_vol_lab: [u8; 11],
    pub(crate) bs_fil_sys_type: [u8; 8],
}

impl Bpb32 {
    fn parse(b: &[u8]) -> Self {
        Self {
            fat_sz32: u32::from_le_bytes(b[0..4].try_into().unwrap()),
            ext_flags: u16::from_le_bytes(b[4..6].try_into().unwrap()),
            fs_ver: u16::from_le_bytes(b[6..8].try_into().unwrap()),
            root_clus: u32::from_le_bytes(b[8..12].try_into().unwrap()),
            fs_info: u16::from_le_bytes(b[12..14].try_into().unwrap()),
            bk_boot_sec: u16::from_le_bytes(b[14..16].try_into().unwrap()),
            reserved: b[16..28].try_into().unwrap(),
            bs_drv_num: b[28],
            bs_reserved1: b[29],
            bs_boot_sig: b[30],
            bs_vol_id: u32::from_le_bytes(b[31..35].try_into().unwrap()),
            bs_vol_lab: b[35..46].try_into().unwrap(),
            bs_fil_sys_type: b[46..54].try_into().unwrap(),
        }
    }
}

/// FAT32 FSInfo sector: free-cluster count and next-free-cluster hint.
///
/// Read at mount and kept up to date by the FAT manager on every allocate
/// and free, then flushed back on session close.
#[derive(Debug, Clone, Copy)]
pub struct FsInfo {
    lead_sig: u32,
    struc_sig: u32,
    free_count: u32,
    nxt_free: u32,
    trail_sig: u32,
}

impl FsInfo {
    pub fn parse(sector: &[u8]) -> Self {
        Self {
            lead_sig: u32::from_le_bytes(sector[0..4].try_into().unwrap()),
            struc_sig: u32::from_le_bytes(sector[484..488].try_into().unwrap()),
            free_count: u32::from_le_bytes(sector[488..492].try_into().unwrap()),
            nxt_free: u32::from_le_bytes(sector[492..496].try_into().unwrap()),
            trail_sig: u32::from_le_bytes(sector[508..512].try_into().unwrap()),
        }
    }

    pub fn check_signature(&self) -> bool {
        self.lead_sig == LEAD_SIGNATURE
            && self.struc_sig == STRUCT_SIGNATURE
            && self.trail_sig == TRAIL_SIGNATURE
    }

    pub fn free_cluster_count(&self) -> u32 {
        self.free_count
    }

    pub fn set_free_cluster_count(&mut self, count: u32) {
        self.free_count = count;
    }

    pub fn next_free_cluster(&self) -> u32 {
        self.nxt_free
    }

    pub fn set_next_free_cluster(&mut self, cluster: u32) {
        self.nxt_free = cluster;
    }

    /// Serializes back into a full 512-byte FSInfo sector image, preserving
    /// the reserved ranges as zero.
    pub fn to_bytes(&self) -> [u8; FSINFO_SIZE] {
        let mut out = [0u8; FSINFO_SIZE];
        out[0..4].copy_from_slice(&self.lead_sig.to_le_bytes());
        out[484..488].copy_from_slice(&self.struc_sig.to_le_bytes());
        out[488..492].copy_from_slice(&self.free_count.to_le_bytes());
        out[492..496].copy_from_slice(&self.nxt_free.to_le_bytes());
        out[508..512].copy_from_slice(&self.trail_sig.to_le_bytes());
        out
    }
}
