//! Webhook signing secret generation.

use rand::Rng;
use rand::seq::SliceRandom;

/// Digits a secret draws from.
pub const DIGITS: &str = "0123456789";
/// Lowercase letters a secret draws from.
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
/// Uppercase letters a secret draws from.
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Symbols a secret draws from.
pub const SPECIAL: &str = r"!@#$%^&*()_+=-}{[}]\|;:<>?/";

/// Number of padding characters on top of the four guaranteed ones.
const EXTRA_MIN: usize = 8;
const EXTRA_MAX: usize = 12;

/// Shortest secret [`SecretGenerator::generate`] produces.
pub const MIN_LENGTH: usize = 4 + EXTRA_MIN;
/// Longest secret [`SecretGenerator::generate`] produces.
pub const MAX_LENGTH: usize = 4 + EXTRA_MAX;

/// Generates webhook signing secrets.
///
/// Each secret holds at least one digit, one lowercase letter, one uppercase
/// letter and one symbol from [`SPECIAL`], padded with 8 to 12 distinct
/// characters of the combined alphabet and shuffled. Randomness comes from
/// the operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretGenerator;

impl SecretGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Generate a new secret.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut rng = rand::rngs::OsRng;
        let alphabet = combined_alphabet();

        let mut chars = Vec::with_capacity(MAX_LENGTH);
        for class in [DIGITS, LOWERCASE, UPPERCASE, SPECIAL] {
            let class: Vec<char> = class.chars().collect();
            if let Some(c) = class.choose(&mut rng) {
                chars.push(*c);
            }
        }

        let extra = rng.gen_range(EXTRA_MIN..=EXTRA_MAX);
        chars.extend(alphabet.choose_multiple(&mut rng, extra).copied());

        chars.shuffle(&mut rng);
        chars.into_iter().collect()
    }
}

/// Every character a secret may contain, each once.
fn combined_alphabet() -> Vec<char> {
    let mut alphabet: Vec<char> = Vec::new();
    for c in [DIGITS, LOWERCASE, UPPERCASE, SPECIAL].concat().chars() {
        if !alphabet.contains(&c) {
            alphabet.push(c);
        }
    }
    alphabet
}

/// Check that `secret` has the shape [`SecretGenerator`] guarantees.
#[must_use]
pub fn satisfies_policy(secret: &str) -> bool {
    let length = secret.chars().count();

    (MIN_LENGTH..=MAX_LENGTH).contains(&length)
        && secret.chars().any(|c| c.is_ascii_digit())
        && secret.chars().any(|c| c.is_ascii_lowercase())
        && secret.chars().any(|c| c.is_ascii_uppercase())
        && secret.chars().any(|c| SPECIAL.contains(c))
        && secret.chars().all(|c| c.is_ascii_alphanumeric() || SPECIAL.contains(c))
}
