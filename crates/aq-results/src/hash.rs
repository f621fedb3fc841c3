//! Content-based hashing for run IDs.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Run ID from the input artifact bytes, the run settings and a salt.
///
/// The salt (typically a timestamp) keeps repeated runs of identical inputs
/// apart in the store; pass an empty salt for a pure content hash.
pub fn compute_run_id<S: Serialize>(input: &[u8], settings: &S, salt: &str) -> String {
    let mut hasher = Sha256::new();

    hasher.update(input);

    let settings_json = serde_json::to_string(settings).unwrap_or_default();
    hasher.update(settings_json.as_bytes());

    hasher.update(salt.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Settings {
        prefix: &'static str,
        pdd: bool,
    }

    #[test]
    fn hash_stability() {
        let settings = Settings {
            prefix: "temp",
            pdd: true,
        };
        let hash1 = compute_run_id(b"[TITLE]", &settings, "");
        let hash2 = compute_run_id(b"[TITLE]", &settings, "");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let a = Settings {
            prefix: "temp",
            pdd: true,
        };
        let b = Settings {
            prefix: "temp",
            pdd: false,
        };
        assert_ne!(
            compute_run_id(b"[TITLE]", &a, ""),
            compute_run_id(b"[TITLE]", &b, "")
        );
        assert_ne!(
            compute_run_id(b"[TITLE]", &a, ""),
            compute_run_id(b"[JUNCTIONS]", &a, "")
        );
        assert_ne!(
            compute_run_id(b"[TITLE]", &a, "t0"),
            compute_run_id(b"[TITLE]", &a, "t1")
        );
    }
}
