//! Schema versions, byte order and decoder options.

use serde::{Deserialize, Serialize};

/// On-disk schema version of a shader archive.
///
/// | Feature | v10 | v11 |
/// |---------|-----|-----|
/// | Variation records | opaque blobs | declarations |
/// | Variation default list | absent | present |
/// | Trailing unknown list | optional | absent |
/// | Cross-reference validation | no | yes |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SchemaVersion {
    /// Legacy layout.
    V10,
    /// Current layout (default).
    #[default]
    V11,
}

impl SchemaVersion {
    /// Map the raw header value onto a supported version.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            10 => Some(Self::V10),
            11 => Some(Self::V11),
            _ => None,
        }
    }

    /// The value written into the header.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        match self {
            Self::V10 => 10,
            Self::V11 => 11,
        }
    }

    /// Whether programs carry a variation default list after the declarations.
    #[must_use]
    pub const fn has_variation_defaults(self) -> bool {
        matches!(self, Self::V11)
    }

    /// Whether the archive may end with an opaque third list.
    #[must_use]
    pub const fn has_unknown_list(self) -> bool {
        matches!(self, Self::V10)
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.as_raw())
    }
}

/// Byte order of every integer field in an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ByteOrder {
    /// Little endian (every known archive).
    #[default]
    Little,
    /// Big endian.
    Big,
}

/// Options for decoding archives.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Byte order used to read the header and everything after it.
    pub byte_order: ByteOrder,
    /// Fail when the validator reports warning-level diagnostics.
    pub strict: bool,
    /// Run the cross-reference validator after decoding (default: true).
    pub validate: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Little,
            strict: false,
            validate: true,
        }
    }
}

impl DecodeOptions {
    /// Create decoder options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the archive as big endian.
    #[must_use]
    pub fn big_endian(mut self) -> Self {
        self.byte_order = ByteOrder::Big;
        self
    }

    /// Set the byte order.
    #[must_use]
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Promote warning-level diagnostics to a decode error.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Skip the cross-reference validator entirely.
    #[must_use]
    pub fn without_validation(mut self) -> Self {
        self.validate = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_from_raw() {
        assert_eq!(SchemaVersion::from_raw(10), Some(SchemaVersion::V10));
        assert_eq!(SchemaVersion::from_raw(11), Some(SchemaVersion::V11));
        assert_eq!(SchemaVersion::from_raw(9), None);
        assert_eq!(SchemaVersion::from_raw(12), None);
    }

    #[test]
    fn test_version_features() {
        assert!(SchemaVersion::V11.has_variation_defaults());
        assert!(!SchemaVersion::V10.has_variation_defaults());
        assert!(SchemaVersion::V10.has_unknown_list());
        assert_eq!(SchemaVersion::V10.to_string(), "v10");
    }

    #[test]
    fn test_decode_options() {
        let opts = DecodeOptions::new().big_endian().strict();
        assert_eq!(opts.byte_order, ByteOrder::Big);
        assert!(opts.strict);
        assert!(opts.validate);

        let opts = DecodeOptions::default().without_validation();
        assert!(!opts.validate);
        assert_eq!(opts.byte_order, ByteOrder::Little);
    }
}
