//! Validated vault file names.

use std::fmt;

use crate::VaultError;

/// A bare file name that is safe to join onto the vault root.
///
/// Rejects empty names, `.` and `..`, anything containing a path
/// separator, and NUL bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileName(String);

impl FileName {
    /// Validate a client-supplied file name.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidName`] if `raw` could escape the vault
    /// directory or is not a usable file name.
    pub fn parse(raw: &str) -> Result<Self, VaultError> {
        let invalid = raw.is_empty()
            || raw == "."
            || raw == ".."
            || raw.contains(['/', '\\', '\0']);
        if invalid {
            return Err(VaultError::InvalidName(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_plain_names() {
        for raw in ["recipe.json", "run 7 (copy).json", ".hidden.json", "a..b.json"] {
            assert_eq!(FileName::parse(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn rejects_traversal_and_empty() {
        for raw in ["", ".", "..", "../etc/passwd", "dir/file.json", "..\\x.json", "a\0b"] {
            assert!(
                matches!(FileName::parse(raw), Err(VaultError::InvalidName(_))),
                "accepted {raw:?}"
            );
        }
    }

    proptest! {
        #[test]
        fn names_with_separators_never_parse(prefix in "[a-z.]{0,8}", suffix in "[a-z.]{0,8}") {
            let slash = format!("{prefix}/{suffix}");
            let backslash = format!("{prefix}\\{suffix}");
            prop_assert!(FileName::parse(&slash).is_err());
            prop_assert!(FileName::parse(&backslash).is_err());
        }

        #[test]
        fn accepted_names_round_trip(raw in "[A-Za-z0-9_ -]{1,16}\\.json") {
            let name = FileName::parse(&raw).unwrap();
            prop_assert_eq!(name.to_string(), raw);
        }
    }
}
