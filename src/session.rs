//! A single mounted volume: the image handle, cached BPB/FSInfo, the FAT
//! manager, and the directory-frame stack, bundled into one owned value
//! instead of the process-global singletons this crate's ancestor used.
//! No locking: nothing here is reentrant, and only one operation ever runs
//! at a time.

use std::fs::OpenOptions;
use std::path::Path;

use crate::bpb::{BiosParameterBlock, FsInfo, BOOT_SECTOR_SIZE, FSINFO_SIZE};
use crate::dirframe::DirectoryFrame;
use crate::error::FatResult;
use crate::fat::FatTable;
use crate::image::Image;
use crate::pathstack::PathStack;

pub struct Session {
    pub image: Image,
    pub bpb: BiosParameterBlock,
    pub fs_info: FsInfo,
    pub fat: FatTable,
    pub path: PathStack,
}

impl Session {
    pub fn mount(image_path: &Path) -> FatResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(image_path)?;
        let mut image = Image::open(file);

        let mut boot_sector = [0u8; BOOT_SECTOR_SIZE];
        image.read_at(0, &mut boot_sector)?;
        let bpb = BiosParameterBlock::parse(&boot_sector)?;
        log::info!("mounted {:?}: {} bytes/sector, {} sectors/cluster", image_path, bpb.bytes_per_sector(), bpb.sectors_per_cluster());

        let mut fs_info_sector = [0u8; FSINFO_SIZE];
        image.read_at(bpb.fs_info_sector() * bpb.bytes_per_sector(), &mut fs_info_sector)?;
        let fs_info = FsInfo::parse(&fs_info_sector);

        let fat = FatTable::new(bpb);

        let root = DirectoryFrame::load(&mut image, &fat, &bpb, bpb.root_cluster(), String::from("img"))?;
        let path = PathStack::new(root);

        Ok(Self {
            image,
            bpb,
            fs_info,
            fat,
            path,
        })
    }

    /// Flushes the FSInfo hints back to disk. Called on clean `exit`.
    pub fn close(&mut self) -> FatResult<()> {
        let offset = self.bpb.fs_info_sector() * self.bpb.bytes_per_sector();
        self.image.write_at(offset, &self.fs_info.to_bytes())?;
        Ok(())
    }

    /// Display name for the shell prompt: the current frame's name, or
    /// `img` at the root.
    pub fn prompt_dir(&self) -> &str {
        &self.path.current().display_name
    }
}
