//! Builds a small synthetic FAT32 image for integration tests: 512-byte
//! sectors, 1 sector per cluster, 16 data clusters, an empty root directory
//! in cluster 2.

use std::fs::File;
use std::io::Write as _;
use std::path::PathBuf;

use tempfile::TempDir;

pub const BYTES_PER_SECTOR: u64 = 512;
pub const RESERVED_SECTORS: u64 = 32;
pub const FAT_SIZE_SECTORS: u64 = 1;
pub const NUM_FATS: u64 = 2;
pub const DATA_SECTORS: u64 = 16;
pub const ROOT_CLUSTER: u32 = 2;

pub fn fat1_offset() -> u64 {
    RESERVED_SECTORS * BYTES_PER_SECTOR
}

pub fn fat2_offset() -> u64 {
    fat1_offset() + FAT_SIZE_SECTORS * BYTES_PER_SECTOR
}

pub fn first_data_sector() -> u64 {
    RESERVED_SECTORS + NUM_FATS * FAT_SIZE_SECTORS
}

pub fn cluster_offset(cluster: u32) -> u64 {
    (cluster as u64 - 2) * BYTES_PER_SECTOR + first_data_sector() * BYTES_PER_SECTOR
}

/// Writes a fresh image to a file inside a fresh temp directory and returns
/// both, so the caller can keep the directory alive for the test's duration.
pub fn build_image() -> (TempDir, PathBuf) {
    let total_sectors = RESERVED_SECTORS + NUM_FATS * FAT_SIZE_SECTORS + DATA_SECTORS;
    let mut bytes = vec![0u8; (total_sectors * BYTES_PER_SECTOR) as usize];

    // BasicBpb, offsets 0..36
    bytes[11..13].copy_from_slice(&(BYTES_PER_SECTOR as u16).to_le_bytes());
    bytes[13] = 1; // sec_per_clus
    bytes[14..16].copy_from_slice(&(RESERVED_SECTORS as u16).to_le_bytes());
    bytes[16] = NUM_FATS as u8;
    bytes[17..19].copy_from_slice(&0u16.to_le_bytes()); // root_ent_cnt
    bytes[19..21].copy_from_slice(&0u16.to_le_bytes()); // tot_sec16
    bytes[22..24].copy_from_slice(&0u16.to_le_bytes()); // fat_sz16
    bytes[32..36].copy_from_slice(&(total_sectors as u32).to_le_bytes());

    // Bpb32, offsets 36..90
    bytes[36..40].copy_from_slice(&(FAT_SIZE_SECTORS as u32).to_le_bytes());
    bytes[44..48].copy_from_slice(&ROOT_CLUSTER.to_le_bytes());
    bytes[48..50].copy_from_slice(&1u16.to_le_bytes()); // fs_info sector

    // FSInfo sector (sector 1)
    let fsinfo_off = BYTES_PER_SECTOR as usize;
    bytes[fsinfo_off..fsinfo_off + 4].copy_from_slice(&0x4161_5252u32.to_le_bytes());
    bytes[fsinfo_off + 484..fsinfo_off + 488].copy_from_slice(&0x6141_7272u32.to_le_bytes());
    bytes[fsinfo_off + 488..fsinfo_off + 492]
        .copy_from_slice(&(DATA_SECTORS as u32 - 1).to_le_bytes());
    bytes[fsinfo_off + 492..fsinfo_off + 496].copy_from_slice(&ROOT_CLUSTER.to_le_bytes());
    bytes[fsinfo_off + 508..fsinfo_off + 512].copy_from_slice(&0xAA55_0000u32.to_le_bytes());

    // Mark the root's own cluster as end-of-chain in both FAT copies so
    // allocation never hands it back out.
    let eoc = 0x0FFF_FFFFu32.to_le_bytes();
    let root_entry = (fat1_offset() + ROOT_CLUSTER as u64 * 4) as usize;
    bytes[root_entry..root_entry + 4].copy_from_slice(&eoc);
    let root_entry2 = (fat2_offset() + ROOT_CLUSTER as u64 * 4) as usize;
    bytes[root_entry2..root_entry2 + 4].copy_from_slice(&eoc);

    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("volume.img");
    let mut file = File::create(&path).expect("create image file");
    file.write_all(&bytes).expect("write image bytes");

    (dir, path)
}
