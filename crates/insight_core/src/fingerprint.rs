use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Deterministic content fingerprint over (feedback_text, instructions),
/// used as the cache-key component. Identical inputs always produce the same
/// digest; distinct inputs produce distinct digests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(feedback_text: &str, instructions: &str) -> Self {
        let mut hasher = Sha256::new();
        // Length-prefix the first field so ("ab", "c") and ("a", "bc")
        // never share a digest.
        hasher.update((feedback_text.len() as u64).to_le_bytes());
        hasher.update(feedback_text.as_bytes());
        hasher.update(instructions.as_bytes());
        Fingerprint(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_match() {
        let a = Fingerprint::of("the box was damaged", "summarize");
        let b = Fingerprint::of("the box was damaged", "summarize");
        assert_eq!(a, b);
    }

    #[test]
    fn either_field_changes_the_digest() {
        let base = Fingerprint::of("the box was damaged", "summarize");
        assert_ne!(base, Fingerprint::of("the box was fine", "summarize"));
        assert_ne!(base, Fingerprint::of("the box was damaged", ""));
    }

    #[test]
    fn field_boundary_is_unambiguous() {
        assert_ne!(Fingerprint::of("ab", "c"), Fingerprint::of("a", "bc"));
        assert_ne!(Fingerprint::of("x_and_y", "z"), Fingerprint::of("x", "y_and_z"));
    }

    #[test]
    fn digest_is_lowercase_hex() {
        let fp = Fingerprint::of("hello", "");
        assert_eq!(fp.as_str().len(), 64);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
