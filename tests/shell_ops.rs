mod support;

use fatshell::error::FatError;
use fatshell::ops;
use fatshell::session::Session;

#[test]
fn fresh_image_has_empty_root() {
    let (_dir, path) = support::build_image();
    let session = Session::mount(&path).unwrap();
    assert!(ops::ls(&session).is_empty());
    assert_eq!(ops::pwd(&session), "/");
}

#[test]
fn mkdir_then_ls_shows_directory_entry() {
    let (_dir, path) = support::build_image();
    let mut session = Session::mount(&path).unwrap();
    ops::mkdir(&mut session, "SUBDIR").unwrap();
    let listing = ops::ls(&session);
    assert_eq!(listing.len(), 1);
    assert!(listing[0].starts_with('d'));
    assert!(listing[0].ends_with("SUBDIR"));
}

#[test]
fn mkdir_duplicate_name_is_rejected() {
    let (_dir, path) = support::build_image();
    let mut session = Session::mount(&path).unwrap();
    ops::mkdir(&mut session, "SUBDIR").unwrap();
    let err = ops::mkdir(&mut session, "subdir").unwrap_err();
    assert!(matches!(err, FatError::AlreadyExists));
}

#[test]
fn touch_then_attr_reports_archive_and_zero_size() {
    let (_dir, path) = support::build_image();
    let mut session = Session::mount(&path).unwrap();
    ops::touch(&mut session, "FOO.TXT").unwrap();
    let report = ops::attr(&session, "FOO.TXT").unwrap();
    assert!(report.contains("name: FOO.TXT"));
    assert!(report.contains("archive: true"));
    assert!(report.contains("directory: false"));
    assert!(report.contains("file size: 0"));
}

#[test]
fn touch_allocates_a_zero_filled_cluster() {
    let (_dir, path) = support::build_image();
    let mut session = Session::mount(&path).unwrap();
    ops::touch(&mut session, "FOO.TXT").unwrap();
    // cluster 2 is root; the first free cluster handed out is 3.
    let dump = ops::cluster_dump(&mut session, 3).unwrap();
    assert!(dump.starts_with("00000000"));
    for line in dump.lines() {
        let ascii_column: String = line.chars().rev().take(16).collect();
        assert!(ascii_column.chars().all(|c| c == '.'), "line not zero-filled: {}", line);
    }
}

#[test]
fn cluster_dump_rejects_out_of_range_cluster_numbers() {
    let (_dir, path) = support::build_image();
    let mut session = Session::mount(&path).unwrap();
    assert!(matches!(ops::cluster_dump(&mut session, 0).unwrap_err(), FatError::NotFound));
    assert!(matches!(ops::cluster_dump(&mut session, 1).unwrap_err(), FatError::NotFound));
    assert!(matches!(ops::cluster_dump(&mut session, 1000).unwrap_err(), FatError::NotFound));
    assert!(ops::cluster_dump(&mut session, 2).is_ok());
}

#[test]
fn deleted_slot_is_reused_before_the_terminator() {
    let (_dir, path) = support::build_image();
    let mut session = Session::mount(&path).unwrap();
    ops::touch(&mut session, "A.TXT").unwrap();
    ops::touch(&mut session, "B.TXT").unwrap();
    ops::rm(&mut session, "A.TXT").unwrap();
    ops::touch(&mut session, "C.TXT").unwrap();

    let listing = ops::ls(&session);
    assert_eq!(listing.len(), 2);
    assert!(listing[0].ends_with("C.TXT"));
    assert!(listing[1].ends_with("B.TXT"));
}

#[test]
fn rename_preserves_cluster_and_rejects_collisions() {
    let (_dir, path) = support::build_image();
    let mut session = Session::mount(&path).unwrap();
    ops::touch(&mut session, "OLD.TXT").unwrap();
    ops::touch(&mut session, "TAKEN.TXT").unwrap();

    let before: Vec<String> = ops::attr(&session, "OLD.TXT")
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect();
    ops::rename(&mut session, "OLD.TXT", "NEW.TXT").unwrap();
    let after: Vec<String> = ops::attr(&session, "NEW.TXT")
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect();
    assert_eq!(before[before.len() - 2], after[after.len() - 2], "first cluster must survive a rename");
    assert_eq!(before[before.len() - 1], after[after.len() - 1], "file size must survive a rename");
    assert!(ops::attr(&session, "OLD.TXT").is_err());

    let err = ops::rename(&mut session, "NEW.TXT", "TAKEN.TXT").unwrap_err();
    assert!(matches!(err, FatError::AlreadyExists));
}

#[test]
fn rename_to_identical_name_is_a_no_op() {
    let (_dir, path) = support::build_image();
    let mut session = Session::mount(&path).unwrap();
    ops::touch(&mut session, "SAME.TXT").unwrap();
    ops::rename(&mut session, "SAME.TXT", "same.txt").unwrap();
    assert!(ops::attr(&session, "SAME.TXT").is_ok());
}

#[test]
fn cd_and_pwd_track_the_current_directory() {
    let (_dir, path) = support::build_image();
    let mut session = Session::mount(&path).unwrap();
    ops::mkdir(&mut session, "A").unwrap();
    ops::cd(&mut session, "A").unwrap();
    assert_eq!(ops::pwd(&session), "/A");
    ops::cd(&mut session, ".").unwrap();
    assert_eq!(ops::pwd(&session), "/A");
    ops::cd(&mut session, "..").unwrap();
    assert_eq!(ops::pwd(&session), "/");
    // popping at the root is a no-op, not an error
    ops::cd(&mut session, "..").unwrap();
    assert_eq!(ops::pwd(&session), "/");
}

#[test]
fn cd_into_a_file_is_rejected() {
    let (_dir, path) = support::build_image();
    let mut session = Session::mount(&path).unwrap();
    ops::touch(&mut session, "FILE.TXT").unwrap();
    let err = ops::cd(&mut session, "FILE.TXT").unwrap_err();
    assert!(matches!(err, FatError::WrongKind));
}

#[test]
fn rmdir_refuses_a_non_empty_directory_then_succeeds_once_empty() {
    let (_dir, path) = support::build_image();
    let mut session = Session::mount(&path).unwrap();
    ops::mkdir(&mut session, "D").unwrap();
    ops::cd(&mut session, "D").unwrap();
    ops::touch(&mut session, "F.TXT").unwrap();
    ops::cd(&mut session, "..").unwrap();

    let err = ops::rmdir(&mut session, "D").unwrap_err();
    assert!(matches!(err, FatError::DirectoryNotEmpty));

    ops::cd(&mut session, "D").unwrap();
    ops::rm(&mut session, "F.TXT").unwrap();
    ops::cd(&mut session, "..").unwrap();
    ops::rmdir(&mut session, "D").unwrap();
    assert!(ops::ls(&session).is_empty());
}

#[test]
fn rm_refuses_a_directory() {
    let (_dir, path) = support::build_image();
    let mut session = Session::mount(&path).unwrap();
    ops::mkdir(&mut session, "D").unwrap();
    let err = ops::rm(&mut session, "D").unwrap_err();
    assert!(matches!(err, FatError::WrongKind));
}

#[test]
fn info_reports_the_geometry_this_image_was_built_with() {
    let (_dir, path) = support::build_image();
    let session = Session::mount(&path).unwrap();
    let report = ops::info(&session);
    assert!(report.contains("bytes per sector: 512"));
    assert!(report.contains("sectors per cluster: 1"));
    assert!(report.contains("root cluster: 2"));
}

#[test]
fn close_flushes_fs_info_back_to_disk() {
    let (_dir, path) = support::build_image();
    let mut session = Session::mount(&path).unwrap();
    ops::touch(&mut session, "FOO.TXT").unwrap();
    session.close().unwrap();
    drop(session);

    let reopened = Session::mount(&path).unwrap();
    // one cluster (for FOO.TXT) consumed out of the original free count
    assert_eq!(reopened.fs_info.free_cluster_count(), support::DATA_SECTORS as u32 - 2);
}
