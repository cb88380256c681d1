//! Utility functions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version information for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        build_time: option_env!("BUILD_TIME").unwrap_or("unknown").to_string(),
    }
}

/// Calculate the SHA-256 digest of data as lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    use std::fmt::Write;

    let mut hasher = Sha256::new();
    hasher.update(data);
    let mut out = String::with_capacity(64);
    for byte in hasher.finalize() {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

/// Format a UTC instant for display
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sha256_hex() {
        let digest = sha256_hex(b"hello world");
        assert_eq!(digest.len(), 64);
        assert_eq!(
            digest,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_format_timestamp() {
        let time = Utc.with_ymd_and_hms(2015, 9, 30, 9, 9, 17).unwrap();
        assert_eq!(format_timestamp(&time), "2015-09-30 09:09:17 UTC");
    }
}
