//! Avatar upload payload.

use crate::constants::AVATAR_FILE_PREFIX;

/// Binary image payload with its declared media type (e.g. `image/png`).
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarFile {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

// Keep image bytes out of logs
impl std::fmt::Debug for AvatarFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarFile")
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .field("media_type", &self.media_type)
            .finish()
    }
}

impl AvatarFile {
    pub fn new(bytes: impl Into<Vec<u8>>, media_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: media_type.into(),
        }
    }

    /// Media subtype used as file extension: `image/png` -> `png`.
    ///
    /// Parameters (`; charset=...`) are dropped. A media type without a
    /// `/` is used as a whole.
    pub fn subtype(&self) -> &str {
        let essence = self.media_type.split(';').next().unwrap_or_default().trim();
        match essence.split_once('/') {
            Some((_, subtype)) => subtype,
            None => essence,
        }
    }

    /// Stored file name for the given account: `avatar-{id}.{subtype}`
    pub fn file_name_for(&self, account_id: &str) -> String {
        format!("{}-{}.{}", AVATAR_FILE_PREFIX, account_id, self.subtype())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_uses_media_subtype() {
        let file = AvatarFile::new(vec![1, 2, 3], "image/png");
        assert_eq!(
            file.file_name_for("507f1f77bcf86cd799439011"),
            "avatar-507f1f77bcf86cd799439011.png"
        );
    }

    #[test]
    fn test_subtype_ignores_parameters() {
        let file = AvatarFile::new(Vec::new(), "image/svg+xml; charset=utf-8");
        assert_eq!(file.subtype(), "svg+xml");
    }

    #[test]
    fn test_subtype_without_slash() {
        let file = AvatarFile::new(Vec::new(), "jpeg");
        assert_eq!(file.subtype(), "jpeg");
    }

    #[test]
    fn test_debug_hides_bytes() {
        let file = AvatarFile::new(vec![0u8; 2048], "image/jpeg");
        let rendered = format!("{:?}", file);

        assert!(rendered.contains("2048 bytes"));
        assert!(!rendered.contains("[0, 0"));
    }
}
