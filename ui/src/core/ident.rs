//! Session identifiers attached to every response record.
//!
//! The identifier follows the short template `xxxx-4xxx-yxxx-xxxx`: `x` is any
//! hex digit, `4` is literal and `y` carries the variant bits `10` (so it is one
//! of `8 9 a b`). It is generated once per page load and never persisted.
//! Collisions are possible and not checked.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

const TEMPLATE: &str = "xxxx-4xxx-yxxx-xxxx";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Draw a fresh identifier from the thread-local RNG.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = TEMPLATE
            .chars()
            .map(|c| match c {
                'x' => hex_digit(rng.gen_range(0..16)),
                'y' => hex_digit((rng.gen_range(0..16) & 0x3) | 0x8),
                other => other,
            })
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `raw` has the template shape, including the variant nibble.
    pub fn is_well_formed(raw: &str) -> bool {
        raw.len() == TEMPLATE.len()
            && raw.chars().zip(TEMPLATE.chars()).all(|(c, t)| match t {
                'x' => c.is_ascii_hexdigit() && !c.is_ascii_uppercase(),
                'y' => matches!(c, '8' | '9' | 'a' | 'b'),
                literal => c == literal,
            })
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn hex_digit(value: u32) -> char {
    char::from_digit(value, 16).unwrap_or('0')
}
