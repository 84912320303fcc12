pub mod random;

pub use random::RandomGenerator;

use relink_core::ShortCode;

/// Trait for generating candidate short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// A generated code is only a candidate: uniqueness is settled by the
/// store at insert time, so implementations may collide occasionally.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;
    /// Generates a type that can be converted into a candidate short code.
    fn generate(&self) -> Self::Output;
}
