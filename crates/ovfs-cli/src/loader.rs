//! Mount table assembly from configuration files and flags.
//!
//! Mounts from `--config` are registered first, then every `--mount` flag.
//! Without either, the per-user default configuration is used if present:
//! - Linux: `~/.config/ovfs/mounts.toml`
//! - macOS: `~/Library/Application Support/ovfs/mounts.toml`
//! - Windows: `%APPDATA%\ovfs\mounts.toml`

use anyhow::{Context, Result, bail};
use ovfs_core::{MountConfig, Vfs, VfsConfig, VfsError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Returns the default configuration file path, if the platform has a
/// configuration directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ovfs").join("mounts.toml"))
}

/// Parses a `VIRTUAL=PHYSICAL` mount flag.
///
/// # Errors
///
/// Returns `VfsError::Config` if the separator is missing or either side is
/// empty.
///
/// # Examples
///
/// ```
/// use ovfs_cli::loader::parse_mount_spec;
///
/// let mount = parse_mount_spec("/static=./public").unwrap();
/// assert_eq!(mount.virtual_path, "/static");
/// assert_eq!(mount.physical_path.to_str(), Some("./public"));
///
/// assert!(parse_mount_spec("/static").is_err());
/// ```
pub fn parse_mount_spec(spec: &str) -> Result<MountConfig, VfsError> {
    let invalid = || VfsError::Config {
        message: format!("invalid mount '{spec}' (expected VIRTUAL=PHYSICAL)"),
    };
    let (virtual_path, physical_path) = spec.split_once('=').ok_or_else(invalid)?;
    if virtual_path.trim().is_empty() || physical_path.trim().is_empty() {
        return Err(invalid());
    }
    Ok(MountConfig::new(virtual_path.trim(), physical_path.trim()))
}

/// Collects the mount table from an optional config file and mount flags.
///
/// `fallback` is consulted only when neither `config` nor `mounts` is given,
/// and only if the file exists.
///
/// # Errors
///
/// Returns an error if a config file cannot be loaded, a flag is malformed,
/// or the combined table is invalid.
pub fn collect_config(
    config: Option<&Path>,
    mounts: &[String],
    fallback: Option<&Path>,
) -> Result<VfsConfig> {
    let mut combined = match (config, fallback) {
        (Some(path), _) => VfsConfig::load(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        (None, Some(path)) if mounts.is_empty() && path.is_file() => {
            debug!(path = %path.display(), "using default mount configuration");
            VfsConfig::load(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?
        }
        _ => VfsConfig::default(),
    };

    for spec in mounts {
        combined.mounts.push(parse_mount_spec(spec)?);
    }
    combined.validate().context("invalid mount table")?;
    Ok(combined)
}

/// Builds the VFS for a command.
///
/// # Errors
///
/// Returns an error if no mounts are configured or any mount fails to
/// register.
pub fn load_vfs(config: Option<&Path>, mounts: &[String]) -> Result<Vfs> {
    let fallback = default_config_path();
    let table = collect_config(config, mounts, fallback.as_deref())?;
    if table.mounts.is_empty() {
        bail!(VfsError::Config {
            message: "no mounts configured (use --mount VIRTUAL=PHYSICAL or --config FILE)"
                .to_string(),
        });
    }

    let vfs = Vfs::from_config(&table).context("failed to register mounts")?;
    debug!(mounts = vfs.mounts().len(), "mount table ready");
    Ok(vfs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_mount_spec() {
        let mount = parse_mount_spec("/a = /srv/a").unwrap();
        assert_eq!(mount, MountConfig::new("/a", "/srv/a"));
    }

    #[test]
    fn test_parse_mount_spec_invalid() {
        assert!(parse_mount_spec("").is_err());
        assert!(parse_mount_spec("/a").is_err());
        assert!(parse_mount_spec("=/srv").is_err());
        assert!(parse_mount_spec("/a=").is_err());
    }

    #[test]
    fn test_parse_mount_spec_keeps_later_equals() {
        let mount = parse_mount_spec("/a=/srv/x=y").unwrap();
        assert_eq!(mount.physical_path, PathBuf::from("/srv/x=y"));
    }

    #[test]
    fn test_collect_config_flags_after_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mounts.toml");
        fs::write(
            &path,
            "[[mounts]]\nvirtual_path = \"/from-file\"\nphysical_path = \"/srv/file\"\n",
        )
        .unwrap();

        let flags = ["/from-flag=/srv/flag".to_string()];
        let config = collect_config(Some(path.as_path()), &flags, None).unwrap();
        let roots: Vec<_> = config.mounts.iter().map(|m| m.virtual_path.as_str()).collect();
        assert_eq!(roots, ["/from-file", "/from-flag"]);
    }

    #[test]
    fn test_collect_config_uses_fallback_only_without_input() {
        let temp = TempDir::new().unwrap();
        let fallback = temp.path().join("mounts.toml");
        fs::write(
            &fallback,
            "[[mounts]]\nvirtual_path = \"/default\"\nphysical_path = \"/srv\"\n",
        )
        .unwrap();

        let config = collect_config(None, &[], Some(fallback.as_path())).unwrap();
        assert_eq!(config.mounts.len(), 1);

        let flags = ["/x=/srv/x".to_string()];
        let config = collect_config(None, &flags, Some(fallback.as_path())).unwrap();
        assert_eq!(config.mounts, vec![MountConfig::new("/x", "/srv/x")]);
    }

    #[test]
    fn test_collect_config_missing_fallback() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("none.toml");
        let config = collect_config(None, &[], Some(missing.as_path())).unwrap();
        assert!(config.mounts.is_empty());
    }

    #[test]
    fn test_collect_config_duplicate_flags() {
        let flags = ["/a=/x".to_string(), "/a/=/y".to_string()];
        assert!(collect_config(None, &flags, None).is_err());
    }

    #[test]
    fn test_load_vfs_from_flags() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("hello.txt"), "hi").unwrap();
        let flag = format!("/data={}", temp.path().display());

        let vfs = load_vfs(None, &[flag]).unwrap();
        assert_eq!(vfs.read_file("/data/hello.txt").unwrap(), b"hi");
    }

    #[test]
    fn test_load_vfs_bad_physical_root() {
        let err = load_vfs(None, &["/data=/nonexistent/ovfs".to_string()]).unwrap_err();
        let vfs_error = err.chain().find_map(|e| e.downcast_ref::<VfsError>()).unwrap();
        assert!(vfs_error.is_physical_root_invalid());
    }
}
