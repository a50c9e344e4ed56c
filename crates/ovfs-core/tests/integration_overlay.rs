//! Integration tests for the overlay filesystem.
//!
//! Exercises the public API end to end: embedded trees over real
//! directories, gzip payloads, overlapping mounts, and configuration.

use flate2::read::GzDecoder;
use ovfs_core::{EmbeddedFile, MountConfig, Vfs, VfsBuilder, VfsConfig, VfsError, WalkAction};
use std::fs;
use std::io::{Read, Seek, SeekFrom};
use tempfile::TempDir;

fn names(vfs: &Vfs, path: &str) -> Vec<String> {
    vfs.read_dir(path)
        .unwrap()
        .iter()
        .map(|m| m.name().to_string())
        .collect()
}

/// Disk-only root mount serves real files
#[test]
fn test_root_mount_serves_disk_file() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("file1.txt"), "hello").unwrap();

    let vfs = VfsBuilder::new().mount("/", temp.path()).build().unwrap();

    let mut file = vfs.open("/file1.txt").unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    assert_eq!(content, "hello");
    assert!(!file.is_embedded());
    assert!(file.raw_bytes().is_none());
}

/// Gzip nodes expose the stored payload untouched
#[test]
fn test_gzip_node_exposes_raw_bytes() {
    let temp = TempDir::new().unwrap();
    let payload = EmbeddedFile::new("body{}").compress().unwrap();
    let compressed = payload.bytes().to_vec();

    let vfs = VfsBuilder::new()
        .mount("/static", temp.path())
        .add_file("/static/app.css", payload)
        .build()
        .unwrap();

    let file = vfs.open("/static/app.css").unwrap();
    let info = file.stat().unwrap();
    assert!(info.is_gzip());
    assert!(file.is_gzip());
    assert_eq!(file.raw_bytes().unwrap(), compressed.as_slice());

    // The stored payload is a valid gzip stream of the original bytes
    let mut decoded = String::new();
    GzDecoder::new(file.raw_bytes().unwrap())
        .read_to_string(&mut decoded)
        .unwrap();
    assert_eq!(decoded, "body{}");

    // Reading through the handle decompresses
    assert_eq!(vfs.read_file("/static/app.css").unwrap(), b"body{}");
}

/// A wrong declared size does not affect decoding
#[test]
fn test_gzip_with_mismatched_declared_size() {
    let temp = TempDir::new().unwrap();
    let compressed = EmbeddedFile::new("body{}").compress().unwrap().bytes().to_vec();

    let vfs = VfsBuilder::new()
        .mount("/static", temp.path())
        .add_file("/static/app.css", EmbeddedFile::gzipped(compressed, u64::MAX))
        .build()
        .unwrap();

    let mut content = Vec::new();
    vfs.open("/static/app.css")
        .unwrap()
        .read_to_end(&mut content)
        .unwrap();
    assert_eq!(content, b"body{}");
    assert_eq!(vfs.stat("/static/app.css").unwrap().size(), u64::MAX);
}

/// Concatenated gzip members decode in full
#[test]
fn test_gzip_multi_member_payload() {
    let temp = TempDir::new().unwrap();
    let mut payload = EmbeddedFile::new("body{").compress().unwrap().bytes().to_vec();
    payload.extend_from_slice(EmbeddedFile::new("}").compress().unwrap().bytes());

    let vfs = VfsBuilder::new()
        .mount("/static", temp.path())
        .add_file("/static/app.css", EmbeddedFile::gzipped(payload, 6))
        .build()
        .unwrap();

    assert_eq!(vfs.read_file("/static/app.css").unwrap(), b"body{}");
}

/// Listings are sorted regardless of insertion order
#[test]
fn test_read_dir_sorted_regardless_of_insertion() {
    let temp = TempDir::new().unwrap();
    let vfs = VfsBuilder::new()
        .mount("/", temp.path())
        .add_dir("/docs")
        .add_file("/docs/b.txt", EmbeddedFile::new("b"))
        .add_file("/docs/a.txt", EmbeddedFile::new("a"))
        .build()
        .unwrap();

    assert_eq!(names(&vfs, "/docs"), ["a.txt", "b.txt"]);
}

/// Disk listings use the same ordering as tree listings
#[test]
fn test_read_dir_sorted_on_disk() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("docs")).unwrap();
    for name in ["c.txt", "a.txt", "b.txt"] {
        fs::write(temp.path().join("docs").join(name), name).unwrap();
    }

    let vfs = VfsBuilder::new().mount("/", temp.path()).build().unwrap();
    assert_eq!(names(&vfs, "/docs"), ["a.txt", "b.txt", "c.txt"]);
}

/// Mounting a missing physical directory fails
#[test]
fn test_add_mount_nonexistent_physical_root() {
    let mut vfs = Vfs::new();
    let err = vfs.add_mount("/static", "/nonexistent").unwrap_err();
    assert!(err.is_physical_root_invalid());
}

/// Nested mounts resolve to the most specific root
#[test]
fn test_nested_mount_resolution() {
    let app = TempDir::new().unwrap();
    let vendor = TempDir::new().unwrap();
    fs::create_dir(app.path().join("vendor")).unwrap();
    fs::write(app.path().join("vendor").join("lib.js"), "from app").unwrap();
    fs::write(vendor.path().join("lib.js"), "from vendor").unwrap();

    // Registration order must not matter
    for order in [["/app", "/app/vendor"], ["/app/vendor", "/app"]] {
        let mut vfs = Vfs::new();
        for root in order {
            let physical = if root == "/app" { app.path() } else { vendor.path() };
            vfs.add_mount(root, physical).unwrap();
        }

        let mount = vfs.find_mount("/app/vendor/lib.js").unwrap();
        assert_eq!(mount.virtual_root().as_str(), "/app/vendor");
        assert_eq!(vfs.read_file("/app/vendor/lib.js").unwrap(), b"from vendor");
    }
}

/// A path missing from both tree and disk is classified as not found
#[test]
fn test_missing_everywhere_is_not_found() {
    let temp = TempDir::new().unwrap();
    let vfs = VfsBuilder::new()
        .mount("/static", temp.path())
        .add_file("/static/app.css", EmbeddedFile::new("body{}"))
        .build()
        .unwrap();

    let err = vfs.open("/static/missing.txt").unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, VfsError::NotFound { .. }));

    let err = vfs.open("/elsewhere/missing.txt").unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, VfsError::MountNotFound { .. }));
}

/// Embedded content always wins over disk
#[test]
fn test_tree_precedence_over_disk() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("index.html"), "disk").unwrap();
    fs::write(temp.path().join("robots.txt"), "disk robots").unwrap();

    let vfs = VfsBuilder::new()
        .mount("/site", temp.path())
        .add_file("/site/index.html", EmbeddedFile::new("tree"))
        .build()
        .unwrap();

    assert_eq!(vfs.read_file("/site/index.html").unwrap(), b"tree");
    assert_eq!(vfs.read_file("/site/robots.txt").unwrap(), b"disk robots");
    assert_eq!(vfs.stat("/site/index.html").unwrap().size(), 4);
}

/// Paths translate to disk and back
#[test]
fn test_translation_round_trip() {
    let temp = TempDir::new().unwrap();
    let vfs = VfsBuilder::new()
        .mount("/app", temp.path())
        .build()
        .unwrap();
    let mount = vfs.find_mount("/app").unwrap();

    for path in ["/app", "/app/x", "/app/x/y/z.txt", "/app/with space.txt"] {
        let vpath = ovfs_core::VfsPath::new(path).unwrap();
        let physical = mount.to_physical_path(&vpath).unwrap();
        assert_eq!(mount.to_virtual_path(&physical).unwrap(), vpath);
    }
}

/// Nothing leaks across unrelated mounts
#[test]
fn test_no_cross_mount_leakage() {
    let temp = TempDir::new().unwrap();
    let vfs = VfsBuilder::new()
        .mount("/c", temp.path())
        .mount("/a", temp.path())
        .mount("/a/b", temp.path())
        .build()
        .unwrap();

    assert_eq!(vfs.find_mount("/a/b").unwrap().virtual_root().as_str(), "/a/b");
    assert_eq!(vfs.find_mount("/a/b/x").unwrap().virtual_root().as_str(), "/a/b");
    assert_eq!(vfs.find_mount("/a/bc").unwrap().virtual_root().as_str(), "/a");
    assert_ne!(vfs.find_mount("/a/b").unwrap().virtual_root().as_str(), "/c");
}

/// Registering a root twice keeps the first mount
#[test]
fn test_duplicate_mount_keeps_first() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    fs::write(first.path().join("who"), "first").unwrap();
    fs::write(second.path().join("who"), "second").unwrap();

    let mut vfs = Vfs::new();
    vfs.add_mount("/m", first.path()).unwrap();
    assert!(vfs.add_mount("/m", second.path()).unwrap_err().is_mount_conflict());
    assert_eq!(vfs.read_file("/m/who").unwrap(), b"first");
}

/// Handles support seeking and paginated directory reads
#[test]
fn test_file_handle_seek_and_readdir() {
    let temp = TempDir::new().unwrap();
    let vfs = VfsBuilder::new()
        .mount("/", temp.path())
        .add_dir("/d")
        .add_file("/d/one", EmbeddedFile::new("0123456789"))
        .add_file("/d/two", EmbeddedFile::new(""))
        .add_file("/d/three", EmbeddedFile::new(""))
        .build()
        .unwrap();

    let mut file = vfs.open("/d/one").unwrap();
    file.seek(SeekFrom::Start(7)).unwrap();
    let mut tail = String::new();
    file.read_to_string(&mut tail).unwrap();
    assert_eq!(tail, "789");
    assert!(file.seek(SeekFrom::Start(11)).is_err());
    file.close().unwrap();

    let mut dir = vfs.open("/d").unwrap();
    let first: Vec<_> = dir.readdir(2).unwrap().iter().map(|m| m.name().to_string()).collect();
    assert_eq!(first, ["one", "three"]);
    let rest: Vec<_> = dir.readdir(2).unwrap().iter().map(|m| m.name().to_string()).collect();
    assert_eq!(rest, ["two"]);
    assert!(dir.readdir(2).unwrap().is_empty());
}

/// Kind mismatches in the tree never fall back to disk
#[test]
fn test_kind_mismatch_is_reported() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("conf")).unwrap();
    fs::write(temp.path().join("conf").join("app.toml"), "x").unwrap();

    let vfs = VfsBuilder::new()
        .mount("/", temp.path())
        .add_file("/conf", EmbeddedFile::new("a file in the tree"))
        .build()
        .unwrap();

    assert!(vfs.read_dir("/conf").unwrap_err().is_not_directory());
    assert!(vfs.open("/conf/app.toml").unwrap_err().is_not_directory());
}

/// Glob covers tree and disk and never exposes physical paths
#[test]
fn test_glob_tree_and_disk() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("img")).unwrap();
    fs::write(temp.path().join("img").join("a.png"), "").unwrap();
    fs::write(temp.path().join("img").join("b.jpg"), "").unwrap();

    let vfs = VfsBuilder::new()
        .mount("/static", temp.path())
        .add_dir("/static/css")
        .add_file("/static/css/app.css", EmbeddedFile::new(""))
        .add_file("/static/css/theme.css", EmbeddedFile::new(""))
        .build()
        .unwrap();

    assert_eq!(
        vfs.glob("/static/css/*.css").unwrap(),
        ["/static/css/app.css", "/static/css/theme.css"]
    );
    assert_eq!(vfs.glob("/static/img/*.png").unwrap(), ["/static/img/a.png"]);
}

/// Physical roots with glob metacharacters are matched literally
#[test]
fn test_glob_escapes_physical_root() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("we[ir]d");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("x.txt"), "").unwrap();

    let vfs = VfsBuilder::new().mount("/w", &root).build().unwrap();
    assert_eq!(vfs.glob("/w/*.txt").unwrap(), ["/w/x.txt"]);
}

/// Embedding a directory mirrors its layout
#[test]
fn test_embed_dir_then_walk() {
    let root = TempDir::new().unwrap();
    let assets = TempDir::new().unwrap();
    fs::create_dir(assets.path().join("js")).unwrap();
    fs::write(assets.path().join("js").join("app.js"), "let x;").unwrap();
    fs::write(assets.path().join("index.html"), "<html>").unwrap();

    let vfs = VfsBuilder::new()
        .mount("/", root.path())
        .with_gzip_extensions(["js"])
        .embed_dir("/", assets.path())
        .build()
        .unwrap();

    let mut seen = Vec::new();
    vfs.walk("/", |path, info| {
        seen.push((path.to_string(), info.is_gzip()));
        Ok(WalkAction::Continue)
    })
    .unwrap();

    assert_eq!(
        seen,
        [
            ("/".to_string(), false),
            ("/index.html".to_string(), false),
            ("/js".to_string(), false),
            ("/js/app.js".to_string(), true),
        ]
    );
    assert_eq!(vfs.read_file("/js/app.js").unwrap(), b"let x;");
}

/// Configuration files drive mount registration
#[test]
fn test_vfs_from_config_file() {
    let temp = TempDir::new().unwrap();
    let public = temp.path().join("public");
    fs::create_dir(&public).unwrap();
    fs::write(public.join("robots.txt"), "ok").unwrap();

    let config_path = temp.path().join("mounts.toml");
    let config = VfsConfig {
        mounts: vec![MountConfig::new("/static", &public)],
    };
    fs::write(&config_path, config.to_toml_string().unwrap()).unwrap();

    let vfs = Vfs::from_config(&VfsConfig::load(&config_path).unwrap()).unwrap();
    assert_eq!(vfs.read_file("/static/robots.txt").unwrap(), b"ok");
    assert!(vfs.is_exists("/static/robots.txt"));
}

/// A built VFS serves concurrent readers without locking
#[test]
fn test_concurrent_readers() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("disk.txt"), "disk").unwrap();
    let vfs = VfsBuilder::new()
        .mount("/", temp.path())
        .add_file("/tree.txt", EmbeddedFile::new("tree").compress().unwrap())
        .build()
        .unwrap();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..50 {
                    assert_eq!(vfs.read_file("/tree.txt").unwrap(), b"tree");
                    assert_eq!(vfs.read_file("/disk.txt").unwrap(), b"disk");
                }
            });
        }
    });
}

#[cfg(unix)]
#[test]
fn test_lstat_does_not_follow_symlink() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("target.txt"), "a longer target body").unwrap();
    std::os::unix::fs::symlink("target.txt", temp.path().join("link.txt")).unwrap();

    let vfs = VfsBuilder::new().mount("/", temp.path()).build().unwrap();
    assert_eq!(vfs.stat("/link.txt").unwrap().size(), 20);
    assert_eq!(vfs.lstat("/link.txt").unwrap().size(), 10);
}
