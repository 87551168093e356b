use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Short code identifying a room; uppercase letters and digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Normalizes user input: surrounding whitespace is dropped and letters
    /// are uppercased, so `" k3x9qz"` and `"K3X9QZ"` name the same room.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase())
    }

    pub fn generate(rng: &mut impl Rng, len: usize) -> Self {
        let code = (0..len)
            .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RoomCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_codes_are_uppercase_alphanumeric() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let code = RoomCode::generate(&mut rng, 6);
            assert_eq!(code.as_str().len(), 6);
            assert!(
                code.as_str()
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
            );
        }
    }

    #[test]
    fn input_is_normalized() {
        assert_eq!(RoomCode::new(" k3x9qz "), RoomCode::new("K3X9QZ"));
        let parsed: RoomCode = serde_json::from_str(r#""ab12cd""#).unwrap();
        assert_eq!(parsed.as_str(), "AB12CD");
    }
}
