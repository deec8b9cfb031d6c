//! # sbe-vault
//!
//! Storage for uploaded recipe files.
//!
//! The vault is a single flat directory. Every file is keyed by the name
//! it was uploaded under; storing the same name again replaces the old
//! content (last writer wins). Nothing is ever deleted.

mod name;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

pub use name::FileName;

/// Errors produced by vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("io error on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

impl VaultError {
    fn io(name: &FileName, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(name.to_string())
        } else {
            Self::Io {
                name: name.to_string(),
                source,
            }
        }
    }
}

/// A directory of uploaded files.
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    /// Open the vault at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`] if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, VaultError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| VaultError::Io {
            name: root.display().to_string(),
            source,
        })?;
        tracing::debug!(root = %root.display(), "vault opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// On-disk location of `name`.
    pub fn path_for(&self, name: &FileName) -> PathBuf {
        self.root.join(name.as_str())
    }

    /// Store an uploaded payload verbatim under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`] if the payload cannot be written.
    pub fn store(&self, name: &FileName, bytes: &[u8]) -> Result<(), VaultError> {
        self.replace(name, bytes)?;
        tracing::debug!(file = %name, bytes = bytes.len(), "stored upload");
        Ok(())
    }

    /// Overwrite `name` with `contents`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`] if the file cannot be written.
    pub fn write(&self, name: &FileName, contents: &str) -> Result<(), VaultError> {
        self.replace(name, contents.as_bytes())?;
        tracing::debug!(file = %name, bytes = contents.len(), "rewrote file");
        Ok(())
    }

    /// Read `name` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::NotFound`] if nothing is stored under `name`,
    /// or [`VaultError::Io`] if the file cannot be read or is not UTF-8.
    pub fn read_to_string(&self, name: &FileName) -> Result<String, VaultError> {
        fs::read_to_string(self.path_for(name)).map_err(|e| VaultError::io(name, e))
    }

    /// Read the raw bytes of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::NotFound`] if nothing is stored under `name`.
    pub fn read_bytes(&self, name: &FileName) -> Result<Vec<u8>, VaultError> {
        fs::read(self.path_for(name)).map_err(|e| VaultError::io(name, e))
    }

    /// Write through a temp file in the vault directory and rename it into
    /// place, so readers never observe a half-written file.
    fn replace(&self, name: &FileName, bytes: &[u8]) -> Result<(), VaultError> {
        let mut tmp = NamedTempFile::new_in(&self.root).map_err(|e| VaultError::io(name, e))?;
        tmp.write_all(bytes).map_err(|e| VaultError::io(name, e))?;
        tmp.as_file().sync_all().map_err(|e| VaultError::io(name, e))?;
        self.carry_permissions(name, &tmp)?;
        tmp.persist(self.path_for(name))
            .map_err(|e| VaultError::io(name, e.error))?;
        Ok(())
    }

    /// Temp files are created owner-only. Give the replacement the mode of
    /// the file it overwrites, or `0644` for a new file.
    #[cfg(unix)]
    fn carry_permissions(&self, name: &FileName, tmp: &NamedTempFile) -> Result<(), VaultError> {
        use std::os::unix::fs::PermissionsExt;

        let permissions = match fs::metadata(self.path_for(name)) {
            Ok(meta) => meta.permissions(),
            Err(_) => fs::Permissions::from_mode(NEW_FILE_MODE),
        };
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| VaultError::io(name, e))
    }

    #[cfg(not(unix))]
    fn carry_permissions(&self, _name: &FileName, _tmp: &NamedTempFile) -> Result<(), VaultError> {
        Ok(())
    }
}

/// Mode of a newly stored file.
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Whether `name` ends in one of `allowed` (case-insensitive, no dot).
pub fn has_allowed_extension(name: &FileName, allowed: &[String]) -> bool {
    Path::new(name.as_str())
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault() -> (tempfile::TempDir, Vault) {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::open(dir.path().join("uploads")).unwrap();
        (dir, vault)
    }

    fn name(raw: &str) -> FileName {
        FileName::parse(raw).unwrap()
    }

    #[test]
    fn open_creates_missing_directory() {
        let (dir, vault) = vault();
        assert!(dir.path().join("uploads").is_dir());
        assert_eq!(vault.root(), dir.path().join("uploads").as_path());
    }

    #[test]
    fn store_then_read_returns_verbatim_bytes() {
        let (_dir, vault) = vault();
        let payload = b"{ \"a\" : 1 }\n";
        vault.store(&name("a.json"), payload).unwrap();
        assert_eq!(vault.read_bytes(&name("a.json")).unwrap(), payload);
        assert!(vault.path_for(&name("a.json")).is_file());
    }

    #[test]
    fn storing_same_name_overwrites() {
        let (_dir, vault) = vault();
        vault.store(&name("r.json"), b"first").unwrap();
        vault.store(&name("r.json"), b"second").unwrap();
        assert_eq!(vault.read_to_string(&name("r.json")).unwrap(), "second");
    }

    #[test]
    fn write_leaves_no_temp_files_behind() {
        let (_dir, vault) = vault();
        vault.write(&name("r.json"), "{}").unwrap();
        vault.write(&name("r.json"), "[]").unwrap();
        let entries: Vec<_> = fs::read_dir(vault.root()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn reading_unknown_name_is_not_found() {
        let (_dir, vault) = vault();
        let err = vault.read_to_string(&name("missing.json")).unwrap_err();
        assert!(matches!(err, VaultError::NotFound(ref n) if n == "missing.json"));
        assert!(!vault.path_for(&name("missing.json")).exists());
    }

    #[test]
    fn non_utf8_content_is_an_io_error() {
        let (_dir, vault) = vault();
        vault.store(&name("bin.json"), &[0xff, 0xfe, 0x00]).unwrap();
        let err = vault.read_to_string(&name("bin.json")).unwrap_err();
        assert!(matches!(err, VaultError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn stored_files_are_not_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, vault) = vault();
        let path = vault.path_for(&name("r.json"));
        vault.store(&name("r.json"), b"{}").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, NEW_FILE_MODE);

        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        vault.write(&name("r.json"), "[]").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let allowed = vec!["json".to_string()];
        assert!(has_allowed_extension(&name("a.json"), &allowed));
        assert!(has_allowed_extension(&name("A.JSON"), &allowed));
        assert!(!has_allowed_extension(&name("a.txt"), &allowed));
        assert!(!has_allowed_extension(&name("json"), &allowed));
    }
}
