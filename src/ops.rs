//! Entry operations: the shell-facing verbs, composed from the lower
//! components. Each method takes the whole [`Session`] and returns either
//! display text or a [`FatError`] the CLI boundary turns into one line.

use crate::dirframe::DirectoryFrame;
use crate::direntry::{dot_entries, validate_not_volume_and_directory, RawEntry, ShortDirEntry};
use crate::error::{FatError, FatResult};
use crate::session::Session;
use crate::shortname;
use crate::{ATTR_ARCHIVE, ATTR_DIRECTORY};

fn find_live(
    frame: &DirectoryFrame,
    name_bytes: &[u8; 11],
) -> Option<(usize, ShortDirEntry)> {
    frame.live_short_entries().find_map(|(i, raw)| {
        let entry = raw.as_short();
        if &entry.name_bytes() == name_bytes {
            Some((i, entry))
        } else {
            None
        }
    })
}

/// Reports BPB fields and the addresses derived from them. Performs no
/// mutation.
pub fn info(session: &Session) -> String {
    let bpb = &session.bpb;
    format!(
        "bytes per sector: {}\n\
         sectors per cluster: {}\n\
         reserved sectors: {}\n\
         number of FATs: {}\n\
         FAT size (sectors): {}\n\
         total sectors: {}\n\
         root cluster: {}\n\
         FSInfo sector: {}\n\
         FAT1 offset: {}\n\
         FAT2 offset: {}\n\
         first data sector: {}\n\
         cluster size (bytes): {}\n\
         free clusters (FSInfo hint): {}",
        bpb.bytes_per_sector(),
        bpb.sectors_per_cluster(),
        bpb.reserved_sector_count(),
        bpb.fat_count(),
        bpb.fat_size_sectors(),
        bpb.total_sector_count(),
        bpb.root_cluster(),
        bpb.fs_info_sector(),
        bpb.fat1_offset(),
        bpb.fat2_offset(),
        bpb.first_data_sector(),
        bpb.cluster_size_bytes(),
        session.fs_info.free_cluster_count(),
    )
}

/// Lists the current directory: name, type flag, size, and all three
/// timestamps (creation, last write, last access date).
pub fn ls(session: &Session) -> Vec<String> {
    session
        .path
        .current()
        .live_short_entries()
        .map(|(_, raw)| {
            let entry = raw.as_short();
            let kind = if entry.is_directory() { 'd' } else { '-' };
            let (cy, cmo, cday, ch, cmi, cs) = entry.creation_time().components();
            let (wy, wmo, wd, wh, wmi, ws) = entry.write_time().components();
            let access = crate::direntry::FatTimestamp {
                time: 0,
                date: entry.last_access_date(),
            };
            let (ay, amo, ad, ..) = access.components();
            format!(
                "{} {:>10} created {:04}-{:02}-{:02} {:02}:{:02}:{:02} \
                 written {:04}-{:02}-{:02} {:02}:{:02}:{:02} \
                 accessed {:04}-{:02}-{:02} {}",
                kind,
                entry.file_size(),
                cy, cmo, cday, ch, cmi, cs,
                wy, wmo, wd, wh, wmi, ws,
                ay, amo, ad,
                entry.decoded_name(),
            )
        })
        .collect()
}

/// Hex+ASCII dump of cluster `cluster`'s raw bytes. `\b \t \n \v \f \r` are
/// shown as a space and zero bytes as `.`; every other byte, printable or
/// not, is shown as-is.
pub fn cluster_dump(session: &mut Session, cluster: u32) -> FatResult<String> {
    let total_clusters = session.bpb.data_cluster_count() as u32 + 2;
    if cluster < 2 || cluster >= total_clusters {
        return Err(FatError::NotFound);
    }
    let size = session.bpb.cluster_size_bytes() as usize;
    let mut buf = vec![0u8; size];
    session
        .image
        .read_at(session.bpb.cluster_byte_offset(cluster), &mut buf)?;

    let mut out = String::new();
    for (row, chunk) in buf.chunks(16).enumerate() {
        out.push_str(&format!("{:08x}  ", row * 16));
        for b in chunk {
            out.push_str(&format!("{:02x} ", b));
        }
        out.push_str(" ");
        for &b in chunk {
            let c = match b {
                0x00 => '.',
                0x08 | 0x09 | 0x0A | 0x0B | 0x0C | 0x0D => ' ',
                _ => b as char,
            };
            out.push(c);
        }
        out.push('\n');
    }
    Ok(out)
}

/// `.` is a no-op, `..` pops (no-op at root), any other name resolves a
/// subdirectory by short name, case-insensitively.
pub fn cd(session: &mut Session, name: &str) -> FatResult<()> {
    match name {
        "." => Ok(()),
        ".." => {
            session.path.pop();
            Ok(())
        }
        _ => {
            let name_bytes = shortname::encode(name)?;
            let (_, entry) =
                find_live(session.path.current(), &name_bytes).ok_or(FatError::NotFound)?;
            if !entry.is_directory() {
                return Err(FatError::WrongKind);
            }
            let frame = DirectoryFrame::load(
                &mut session.image,
                &session.fat,
                &session.bpb,
                entry.first_cluster(),
                entry.decoded_name(),
            )?;
            session.path.push(frame);
            Ok(())
        }
    }
}

/// Path from root to the current directory; an empty stack prints `/`.
pub fn pwd(session: &Session) -> String {
    let names = session.path.path_names();
    if names.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", names.join("/"))
    }
}

/// All fields of the named entry, including each attribute bit individually.
pub fn attr(session: &Session, name: &str) -> FatResult<String> {
    let name_bytes = shortname::encode(name)?;
    let (_, entry) = find_live(session.path.current(), &name_bytes).ok_or(FatError::NotFound)?;
    let raw = entry.attr();
    Ok(format!(
        "name: {}\n\
         read_only: {}\n\
         hidden: {}\n\
         system: {}\n\
         volume_id: {}\n\
         directory: {}\n\
         archive: {}\n\
         first cluster: {}\n\
         file size: {}",
        entry.decoded_name(),
        raw & crate::ATTR_READ_ONLY != 0,
        raw & crate::ATTR_HIDDEN != 0,
        raw & crate::ATTR_SYSTEM != 0,
        raw & crate::ATTR_VOLUME_ID != 0,
        raw & ATTR_DIRECTORY != 0,
        raw & ATTR_ARCHIVE != 0,
        entry.first_cluster(),
        entry.file_size(),
    ))
}

/// Renames `old` to `new`. A no-op (no error, no write) if both encode to
/// the same 11 bytes.
pub fn rename(session: &mut Session, old: &str, new: &str) -> FatResult<()> {
    let old_bytes = shortname::encode(old)?;
    let new_bytes = shortname::encode(new)?;
    if old_bytes == new_bytes {
        return Ok(());
    }
    let (index, mut entry) =
        find_live(session.path.current(), &old_bytes).ok_or(FatError::NotFound)?;
    if find_live(session.path.current(), &new_bytes).is_some() {
        return Err(FatError::AlreadyExists);
    }
    entry.set_name_bytes(new_bytes);
    entry.set_write_time(crate::direntry::FatTimestamp::now());
    let raw = RawEntry(entry.into_raw());
    session.path.current_mut().flush_entry(
        &mut session.image,
        &session.fat,
        &session.bpb,
        index,
        raw,
    )?;
    Ok(())
}

fn alloc_free_slot(session: &mut Session) -> FatResult<usize> {
    if let Some(index) = session.path.current().find_free_slot() {
        return Ok(index);
    }
    session.path.current_mut().grow(
        &mut session.image,
        &session.fat,
        &session.bpb,
        &mut session.fs_info,
    )
}

/// Creates a regular-file entry with one allocated (empty) data cluster.
pub fn touch(session: &mut Session, name: &str) -> FatResult<()> {
    let name_bytes = shortname::encode(name)?;
    if find_live(session.path.current(), &name_bytes).is_some() {
        return Err(FatError::AlreadyExists);
    }

    let cluster = session
        .fat
        .allocate(&mut session.image, &mut session.fs_info, 1)?;

    let result = (|| -> FatResult<()> {
        let index = alloc_free_slot(session)?;
        let entry = ShortDirEntry::new(name_bytes, ATTR_ARCHIVE, cluster, 0);
        session.path.current_mut().flush_entry(
            &mut session.image,
            &session.fat,
            &session.bpb,
            index,
            RawEntry(entry.into_raw()),
        )
    })();

    if result.is_err() {
        session
            .fat
            .free_chain(&mut session.image, &mut session.fs_info, cluster)?;
    }
    result
}

/// Creates a directory entry whose data cluster is seeded with `.` and `..`.
pub fn mkdir(session: &mut Session, name: &str) -> FatResult<()> {
    let name_bytes = shortname::encode(name)?;
    if find_live(session.path.current(), &name_bytes).is_some() {
        return Err(FatError::AlreadyExists);
    }

    let parent_cluster = if session.path.is_root() {
        0
    } else {
        session.path.current().start_cluster
    };

    let cluster = session
        .fat
        .allocate(&mut session.image, &mut session.fs_info, 1)?;

    let result = (|| -> FatResult<()> {
        let (dot, dotdot) = dot_entries(cluster, parent_cluster);
        let base = session.bpb.cluster_byte_offset(cluster);
        session.image.write_at(base, &dot.into_raw())?;
        session
            .image
            .write_at(base + crate::DIRENT_SIZE, &dotdot.into_raw())?;

        let index = alloc_free_slot(session)?;
        let entry = ShortDirEntry::new(name_bytes, ATTR_DIRECTORY, cluster, 0);
        session.path.current_mut().flush_entry(
            &mut session.image,
            &session.fat,
            &session.bpb,
            index,
            RawEntry(entry.into_raw()),
        )
    })();

    if result.is_err() {
        session
            .fat
            .free_chain(&mut session.image, &mut session.fs_info, cluster)?;
    }
    result
}

fn remove_entry(session: &mut Session, index: usize, mut entry: ShortDirEntry) -> FatResult<()> {
    entry.mark_deleted();
    session.path.current_mut().flush_entry(
        &mut session.image,
        &session.fat,
        &session.bpb,
        index,
        RawEntry(entry.into_raw()),
    )?;
    session
        .fat
        .free_chain(&mut session.image, &mut session.fs_info, entry.first_cluster())
}

/// Deletes a file entry; errors if `name` is a directory.
pub fn rm(session: &mut Session, name: &str) -> FatResult<()> {
    let name_bytes = shortname::encode(name)?;
    let (index, entry) = find_live(session.path.current(), &name_bytes).ok_or(FatError::NotFound)?;
    if entry.is_directory() {
        return Err(FatError::WrongKind);
    }
    remove_entry(session, index, entry)
}

/// Deletes an empty directory entry; errors if `name` is a file or holds
/// more than the two dot entries.
pub fn rmdir(session: &mut Session, name: &str) -> FatResult<()> {
    let name_bytes = shortname::encode(name)?;
    let (index, entry) = find_live(session.path.current(), &name_bytes).ok_or(FatError::NotFound)?;
    validate_not_volume_and_directory(entry.attr())?;
    if !entry.is_directory() {
        return Err(FatError::WrongKind);
    }

    let child = DirectoryFrame::load(
        &mut session.image,
        &session.fat,
        &session.bpb,
        entry.first_cluster(),
        entry.decoded_name(),
    )?;
    if child.live_short_entries().count() > 2 {
        return Err(FatError::DirectoryNotEmpty);
    }

    remove_entry(session, index, entry)
}
