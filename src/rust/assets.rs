use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// File name of the model shipped with the app.
pub const BUNDLED_MODEL_NAME: &str = "model_pca200.onnx";

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Model asset not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Hash mismatch for {name}: expected {expected}, got {actual}")]
    HashMismatch {
        name: String,
        expected: String,
        actual: String,
    },
}

/// A serialized model read fully into memory. The bytes are opaque here; only
/// an inference engine knows how to interpret them.
#[derive(Debug, Clone)]
pub struct ModelAsset {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ModelAsset {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AssetError::NotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path)?;
        log::info!("Read {} bytes of model data from {:?}", bytes.len(), path);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Ok(Self { name, bytes })
    }

    /// Lowercase hex SHA-256 of the model bytes
    pub fn sha256(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        format!("{:x}", hasher.finalize())
    }

    pub fn verify(&self, expected_hash: &str) -> Result<(), AssetError> {
        let actual = self.sha256();
        log::debug!("Calculated hash: {}", actual);
        log::debug!("Expected hash:   {}", expected_hash);
        if actual.eq_ignore_ascii_case(expected_hash.trim()) {
            Ok(())
        } else {
            log::error!("{} hash mismatch: expected {}, got {}", self.name, expected_hash, actual);
            Err(AssetError::HashMismatch {
                name: self.name.clone(),
                expected: expected_hash.to_string(),
                actual,
            })
        }
    }
}

/// A directory of bundled model files.
#[derive(Debug, Clone)]
pub struct AssetStore {
    assets_dir: PathBuf,
}

impl AssetStore {
    /// Creates an AssetStore rooted at the default assets directory
    pub fn new_default() -> Self {
        Self::new(Self::get_default_assets_dir())
    }

    /// Returns the default assets directory path
    pub fn get_default_assets_dir() -> PathBuf {
        // 1. Platform-specific data directory
        if let Some(data_dir) = dirs::data_dir() {
            return data_dir.join("pca200").join("assets");
        }

        // 2. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".local").join("share").join("pca200").join("assets");
        }

        // 3. Relative to the working directory
        PathBuf::from("assets")
    }

    pub fn new<P: AsRef<Path>>(assets_dir: P) -> Self {
        Self {
            assets_dir: assets_dir.as_ref().to_path_buf(),
        }
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    pub fn model_path(&self, name: &str) -> PathBuf {
        self.assets_dir.join(name)
    }

    pub fn has_model(&self, name: &str) -> bool {
        let path = self.model_path(name);
        log::debug!("Checking for model asset {:?} (exists: {})", path, path.is_file());
        path.is_file()
    }

    /// Reads a model asset, checking its SHA-256 when a hash is given.
    pub fn load(&self, name: &str, expected_hash: Option<&str>) -> Result<ModelAsset, AssetError> {
        let asset = ModelAsset::open(self.model_path(name))?;
        if let Some(hash) = expected_hash {
            asset.verify(hash)?;
            log::info!("Model asset {} verified", name);
        }
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // SHA-256 of the ASCII bytes "abc"
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_sha256() {
        let asset = ModelAsset::from_bytes("abc", b"abc".to_vec());
        assert_eq!(asset.sha256(), ABC_SHA256);
        assert!(asset.verify(ABC_SHA256).is_ok());
        assert!(asset.verify(&ABC_SHA256.to_uppercase()).is_ok());
    }

    #[test]
    fn test_hash_mismatch() {
        let asset = ModelAsset::from_bytes("abc", b"abd".to_vec());
        assert!(matches!(asset.verify(ABC_SHA256), Err(AssetError::HashMismatch { .. })));
    }

    #[test]
    fn test_missing_asset() {
        let store = AssetStore::new("/nonexistent/pca200/assets");
        assert!(!store.has_model(BUNDLED_MODEL_NAME));
        assert!(matches!(
            store.load(BUNDLED_MODEL_NAME, None),
            Err(AssetError::NotFound(_))
        ));
    }

    #[test]
    fn test_default_assets_dir() {
        let path = AssetStore::get_default_assets_dir();
        assert!(path.ends_with("assets"));
    }
}
