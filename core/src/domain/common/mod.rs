use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rand::RngCore;

pub mod entities;
pub mod services;

#[derive(Clone, Debug)]
pub struct FridgeChefConfig {
    pub llm: LLMConfig,
    pub storage: StorageConfig,
}

#[derive(Clone, Debug)]
pub struct LLMConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub model_name: String,
}

/// Where request artifacts live. Chosen once at startup.
#[derive(Clone, Debug)]
pub enum StorageConfig {
    Local { results_dir: PathBuf },
    ObjectStorage(ObjectStorageConfig),
}

#[derive(Clone, Debug)]
pub struct ObjectStorageConfig {
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub key_prefix: String,
}

pub fn generate_timestamp() -> (DateTime<Utc>, i64) {
    let now = Utc::now();
    (now, now.timestamp())
}

/// Random lowercase hex token, two characters per byte.
pub fn generate_random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_hex_length_and_charset() {
        let token = generate_random_hex(4);
        assert_eq!(token.len(), 8);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(generate_random_hex(8), generate_random_hex(8));
    }
}
