use std::path::Path;

use bytes::Bytes;
use sha2::{Digest, Sha256};

/// Directory inside the storage backend that holds post images.
pub const IMAGES_DIR: &str = "images";

/// A file received in a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Browsers send an unnamed, empty part when no file was chosen.
    pub fn is_blank(&self) -> bool {
        self.filename.is_empty() && self.bytes.is_empty()
    }

    /// Lower-cased extension of the original filename, if it is plain alphanumeric.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| ext.to_ascii_lowercase())
    }

    /// Content-derived storage name: hex SHA-256 of the bytes plus the original extension.
    pub fn hash_name(&self) -> String {
        let digest = hex::encode(Sha256::digest(&self.bytes));
        match self.extension() {
            Some(ext) => format!("{digest}.{ext}"),
            None => digest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn hash_name_is_sha256_plus_extension() {
        let file = UploadedFile::new("my_image.jpg", Vec::new());
        assert_eq!(file.hash_name(), format!("{EMPTY_SHA256}.jpg"));
    }

    #[test]
    fn same_bytes_give_same_name() {
        let a = UploadedFile::new("a.png", b"pixels".to_vec());
        let b = UploadedFile::new("b.png", b"pixels".to_vec());
        let c = UploadedFile::new("c.png", b"other pixels".to_vec());

        assert_eq!(a.hash_name(), b.hash_name());
        assert_ne!(a.hash_name(), c.hash_name());
    }

    #[test]
    fn extension_is_lowercased() {
        let file = UploadedFile::new("Photo.JPEG", b"x".to_vec());
        assert!(file.hash_name().ends_with(".jpeg"));
    }

    #[test]
    fn odd_extensions_are_dropped() {
        assert_eq!(UploadedFile::new("noext", b"x".to_vec()).extension(), None);
        assert_eq!(UploadedFile::new("weird.j-pg", b"x".to_vec()).extension(), None);
        assert_eq!(UploadedFile::new("trailing.", b"x".to_vec()).extension(), None);
    }

    #[test]
    fn blank_part_is_detected() {
        assert!(UploadedFile::new("", Vec::new()).is_blank());
        assert!(!UploadedFile::new("empty.txt", Vec::new()).is_blank());
    }
}
