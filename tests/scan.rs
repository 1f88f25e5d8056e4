use fastq_inventory::{
    CancelToken, Candidate, FailureKind, FileRecord, Format, MemoryDiagnostics, RecordBuilder,
    ScanError, ScanOptions, Scanner,
};
use std::cell::RefCell;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write_gz(path: &Path, data: &[u8]) {
    let f = File::create(path).unwrap();
    let mut enc = flate2::write::GzEncoder::new(f, flate2::Compression::fast());
    enc.write_all(data).unwrap();
    enc.finish().unwrap();
}

fn md5_hex(data: &[u8]) -> String {
    use md5::{Digest, Md5};
    format!("{:x}", Md5::digest(data))
}

fn scan_all(root: &Path, opts: &ScanOptions) -> Vec<FileRecord> {
    let diag = MemoryDiagnostics::new();
    let cancel = CancelToken::new();
    Scanner::new(opts, &diag, &cancel)
        .scan([root])
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

const A: &[u8] = b"@SEQ1\nACGT\n+\n!!!!\n";
const B: &[u8] = b"@SEQ2\nGGCC\n+\n####\n";

fn data_dir() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.fastq"), A).unwrap();
    write_gz(&dir.path().join("b.fastq.gz"), B);
    dir
}

#[test]
fn two_file_scan_with_checksums() {
    let dir = data_dir();
    let opts = ScanOptions {
        compute_checksum: true,
        block_size: 4096,
        ..ScanOptions::default()
    };
    let records = scan_all(dir.path(), &opts);
    assert_eq!(records.len(), 2);

    let a = &records[0];
    assert_eq!(a.name(), "a.fastq");
    assert_eq!(a.directory(), dir.path().to_string_lossy());
    assert_eq!(a.format(), Format::Plain);
    assert_eq!(a.header(), Some("@SEQ1"));
    assert_eq!(a.disk_size(), Some(A.len() as u64));
    assert_eq!(a.logical_size(), Some(A.len() as u64));
    assert_eq!(a.checksum(), Some(md5_hex(A).as_str()));
    assert!(a.failures().is_empty());

    let b = &records[1];
    assert_eq!(b.name(), "b.fastq.gz");
    assert_eq!(b.format(), Format::Compressed);
    assert_eq!(b.header(), Some("@SEQ2"));
    assert_eq!(b.logical_size(), Some(B.len() as u64));
    assert_eq!(b.checksum(), Some(md5_hex(B).as_str()));
    let on_disk = fs::metadata(dir.path().join("b.fastq.gz")).unwrap().len();
    assert_eq!(b.disk_size(), Some(on_disk));
}

#[test]
fn no_checksum_means_no_logical_size() {
    let dir = data_dir();
    fs::write(dir.path().join("bad.fastq"), b"not fastq\n").unwrap();
    let records = scan_all(dir.path(), &ScanOptions::default());
    assert_eq!(records.len(), 3);
    for r in &records {
        assert_eq!(r.logical_size(), None);
        assert_eq!(r.checksum(), None);
    }
    assert!(records.iter().filter(|r| r.format() != Format::Unknown).all(|r| r.header().is_some()));
}

#[test]
fn unknown_records_carry_only_location_and_size() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("empty.fastq")).unwrap();
    let opts = ScanOptions {
        compute_checksum: true,
        ..ScanOptions::default()
    };
    let records = scan_all(dir.path(), &opts);
    assert_eq!(records.len(), 1);
    let r = &records[0];
    assert_eq!(r.format(), Format::Unknown);
    assert_eq!(r.disk_size(), Some(0));
    assert_eq!(r.logical_size(), None);
    assert_eq!(r.checksum(), None);
    assert_eq!(r.header(), None);
    assert_eq!(r.failures()[0].kind, FailureKind::Probe);
}

#[test]
fn extension_filter_selects_candidates() {
    let dir = data_dir();
    fs::write(dir.path().join("notes.txt"), b"@looks like fastq\n").unwrap();
    fs::write(dir.path().join("reads.fq"), A).unwrap();

    let names: Vec<String> = scan_all(dir.path(), &ScanOptions::default())
        .iter()
        .map(|r| r.name().to_string())
        .collect();
    assert_eq!(names, ["a.fastq", "b.fastq.gz"]);

    let opts = ScanOptions {
        extensions: vec![".fq".into()],
        ..ScanOptions::default()
    };
    let names: Vec<String> = scan_all(dir.path(), &opts)
        .iter()
        .map(|r| r.name().to_string())
        .collect();
    assert_eq!(names, ["reads.fq"]);
}

#[test]
fn non_recursive_skips_nested_files() {
    let dir = data_dir();
    let nested = dir.path().join("sub");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join("c.fastq"), A).unwrap();

    let flat = scan_all(dir.path(), &ScanOptions::default());
    assert!(flat.iter().all(|r| r.name() != "c.fastq"));
    assert_eq!(flat.len(), 2);

    let opts = ScanOptions {
        recursive: true,
        ..ScanOptions::default()
    };
    let deep = scan_all(dir.path(), &opts);
    assert_eq!(deep.len(), 3);
    let c = deep.iter().find(|r| r.name() == "c.fastq").unwrap();
    assert_eq!(c.directory(), nested.to_string_lossy());
}

#[test]
fn rescans_are_identical() {
    let dir = data_dir();
    let nested = dir.path().join("sub");
    fs::create_dir(&nested).unwrap();
    write_gz(&nested.join("d.fastq.gz"), B);
    let opts = ScanOptions {
        compute_checksum: true,
        recursive: true,
        ..ScanOptions::default()
    };
    assert_eq!(scan_all(dir.path(), &opts), scan_all(dir.path(), &opts));
}

#[test]
fn duplicate_roots_yield_duplicate_records() {
    let dir = data_dir();
    let diag = MemoryDiagnostics::new();
    let cancel = CancelToken::new();
    let opts = ScanOptions::default();
    let records: Vec<_> = Scanner::new(&opts, &diag, &cancel)
        .scan([dir.path(), dir.path()])
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0], records[2]);
}

#[test]
fn root_may_be_a_file() {
    let dir = data_dir();
    let records = scan_all(&dir.path().join("a.fastq"), &ScanOptions::default());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].header(), Some("@SEQ1"));
}

#[cfg(unix)]
#[test]
fn walk_errors_go_to_callback_and_scan_continues() {
    let dir = data_dir();
    std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling.fastq")).unwrap();

    let opts = ScanOptions {
        follow_links: true,
        ..ScanOptions::default()
    };
    let diag = MemoryDiagnostics::new();
    let cancel = CancelToken::new();
    let errors = RefCell::new(Vec::new());
    let records: Vec<_> = Scanner::new(&opts, &diag, &cancel)
        .on_walk_error(|e| errors.borrow_mut().push(e.path.clone()))
        .scan([dir.path()])
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(records.len(), 2);
    let errors = errors.into_inner();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].as_deref(), Some(dir.path().join("dangling.fastq").as_path()));
}

#[cfg(unix)]
#[test]
fn unreadable_directory_does_not_stop_scan() {
    use std::os::unix::fs::PermissionsExt;

    let dir = data_dir();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("hidden.fastq"), A).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    // Privileged users can still list the directory.
    let enforced = fs::read_dir(&locked).is_err();

    let opts = ScanOptions {
        recursive: true,
        ..ScanOptions::default()
    };
    let diag = MemoryDiagnostics::new();
    let cancel = CancelToken::new();
    let records: Vec<_> = Scanner::new(&opts, &diag, &cancel)
        .scan([dir.path()])
        .collect::<Result<_, _>>()
        .unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    if enforced {
        assert_eq!(records.len(), 2);
        assert_eq!(diag.at_least(log::Level::Warn).len(), 1);
    } else {
        assert_eq!(records.len(), 3);
    }
}

#[test]
fn cancelled_scan_yields_one_error_then_ends() {
    let dir = data_dir();
    let opts = ScanOptions::default();
    let diag = MemoryDiagnostics::new();
    let cancel = CancelToken::new();
    let mut records = Scanner::new(&opts, &diag, &cancel).scan([dir.path()]);

    assert!(records.next().unwrap().is_ok());
    cancel.cancel();
    assert!(matches!(records.next(), Some(Err(ScanError::Cancelled(_)))));
    assert!(records.next().is_none());
}

#[test]
fn builder_reports_metadata_failure() {
    let dir = tempdir().unwrap();
    let opts = ScanOptions::default();
    let diag = MemoryDiagnostics::new();
    let cancel = CancelToken::new();
    let builder = RecordBuilder::new(&opts, &diag, &cancel);

    let record = builder
        .build(&Candidate::new(dir.path().join("missing.fastq"), ".fastq"))
        .unwrap();
    assert_eq!(record.name(), "missing.fastq");
    assert_eq!(record.format(), Format::Unknown);
    assert_eq!(record.disk_size(), None);
    assert_eq!(record.failures()[0].kind, FailureKind::Metadata);
    assert!(!diag.at_least(log::Level::Warn).is_empty());
}

#[test]
fn builder_notes_extension_mismatch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mislabelled.fastq.gz");
    fs::write(&path, A).unwrap();
    let opts = ScanOptions::default();
    let diag = MemoryDiagnostics::new();
    let cancel = CancelToken::new();

    let record = RecordBuilder::new(&opts, &diag, &cancel)
        .build(&Candidate::new(&path, ".fastq.gz"))
        .unwrap();
    assert_eq!(record.format(), Format::Plain);
    assert!(
        diag.at_least(log::Level::Info)
            .iter()
            .any(|m| m.contains("content is plain"))
    );
}

#[test]
fn builder_stops_when_cancelled() {
    let dir = data_dir();
    let opts = ScanOptions::default();
    let diag = MemoryDiagnostics::new();
    let cancel = CancelToken::new();
    cancel.cancel();
    let result = RecordBuilder::new(&opts, &diag, &cancel)
        .build(&Candidate::new(dir.path().join("a.fastq"), ".fastq"));
    assert!(result.is_err());
}

#[test]
fn truncated_gzip_loses_checksum_but_keeps_header() {
    let dir = tempdir().unwrap();
    let mut content = Vec::new();
    for i in 0..3000 {
        content.extend_from_slice(format!("@r{i}\nACGTACGT\n+\nIIIIIIII\n").as_bytes());
    }
    let full = dir.path().join("full.fastq.gz");
    write_gz(&full, &content);
    let bytes = fs::read(&full).unwrap();
    fs::write(dir.path().join("cut.fastq.gz"), &bytes[..bytes.len() / 2]).unwrap();

    let opts = ScanOptions {
        compute_checksum: true,
        ..ScanOptions::default()
    };
    let diag = MemoryDiagnostics::new();
    let cancel = CancelToken::new();
    let records: Vec<_> = Scanner::new(&opts, &diag, &cancel)
        .scan([dir.path()])
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 2);

    let cut = &records[0];
    assert_eq!(cut.name(), "cut.fastq.gz");
    assert_eq!(cut.format(), Format::Compressed);
    assert_eq!(cut.checksum(), None);
    assert_eq!(cut.logical_size(), None);
    assert_eq!(cut.header(), Some("@r0"));
    assert!(cut.failures().iter().any(|f| f.kind == FailureKind::Digest));
    assert!(diag.at_least(log::Level::Warn).iter().any(|m| m.contains("checksum failed")));

    let whole = &records[1];
    assert_eq!(whole.name(), "full.fastq.gz");
    assert_eq!(whole.checksum(), Some(md5_hex(&content).as_str()));
    assert_eq!(whole.logical_size(), Some(content.len() as u64));
    assert!(whole.failures().is_empty());
}

#[cfg(unix)]
#[test]
fn linked_files_are_listed_without_following_links() {
    let dir = data_dir();
    let elsewhere = tempdir().unwrap();
    fs::write(elsewhere.path().join("target.fastq"), A).unwrap();
    std::os::unix::fs::symlink(elsewhere.path().join("target.fastq"), dir.path().join("link.fastq"))
        .unwrap();
    let linked_dir = dir.path().join("linked_dir");
    std::os::unix::fs::symlink(elsewhere.path(), &linked_dir).unwrap();

    let opts = ScanOptions {
        recursive: true,
        ..ScanOptions::default()
    };
    let records = scan_all(dir.path(), &opts);
    let names: Vec<&str> = records.iter().map(|r| r.name()).collect();
    assert_eq!(names, ["a.fastq", "b.fastq.gz", "link.fastq"]);
    assert_eq!(records[2].header(), Some("@SEQ1"));
    assert_eq!(records[2].format(), Format::Plain);
}
