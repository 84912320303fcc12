use crate::Generator;
use relink_core::ShortCode;
use std::iter;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Draws short codes uniformly from the 62-character alphanumeric alphabet.
///
/// With six characters the keyspace holds 62^6 (about 5.7e10) codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGenerator;

impl RandomGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let code: String =
            iter::repeat_with(|| ALPHABET[rand::random_range(0..ALPHABET.len())] as char)
                .take(ShortCode::LENGTH)
                .collect();
        ShortCode::new_unchecked(code)
    }
}
