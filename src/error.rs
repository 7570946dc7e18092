use ark_serialize::SerializationError;

/// Failures surfaced by key construction, signing and adaptation.
///
/// Verification never produces one of these; it folds every problem
/// into a `false` result.
#[derive(thiserror::Error, Debug)]
pub enum SpsEqError {
    /// The message length differs from the key capacity.
    #[error("message has {found} elements but the key capacity is {expected}")]
    CapacityMismatch { expected: usize, found: usize },
    /// A key must hold at least one component.
    #[error("keys need a capacity of at least one")]
    EmptyKey,
    /// Message component at this index is the group identity.
    #[error("message component {0} is the identity")]
    IdentityMessage(usize),
    /// Key component at this index is zero, or the group identity.
    #[error("key component {0} is zero")]
    InvalidKey(usize),
    /// Nonzero scalar sampling gave up after this many draws.
    #[error("no nonzero scalar after {0} draws, the randomness source is broken")]
    RandomnessExhausted(usize),
    /// A caller supplied blinding factor was zero.
    #[error("blinding factors must be nonzero")]
    ZeroRandomizer,
    #[error("serialization failed: {0}")]
    Serialization(SerializationError),
}

impl From<SerializationError> for SpsEqError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
