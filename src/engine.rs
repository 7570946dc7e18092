//! ## Adaptation of `ark_ec::pairing::Pairing` to SPS-EQ signatures.
//!
//! We provide an `EngineSPS` trait that adapts `Pairing` to
//! structure-preserving signatures on equivalence classes by
//! naming the group where messages live and the group where
//! public keys live, so that the two roles may be transposed
//! while retaining the correct pairing orientation.
//!
//! `UsualSPS` places messages, `Z` and `Y` in `G1` with public
//! keys and `Ŷ` in `G2`.  `TinySPS` swaps the two roles, which
//! shrinks public keys at the cost of larger messages and signatures.

use core::fmt::Debug;
use core::iter::once;

use ark_ec::pairing::{Pairing, PairingOutput};
use ark_ec::{CurveGroup, Group};
use ark_ff::{PrimeField, Zero};
use ark_std::UniformRand;
use rand_core::{CryptoRng, RngCore};

use crate::error::SpsEqError;

/// A weakening of `Pairing` to permit transposing the groups.
///
/// Scalar sampling demands a `CryptoRng`.  Secret keys and all
/// blinding factors flow through `generate_nonzero`, so a general
/// purpose generator is rejected at compile time.
pub trait EngineSPS: Sized + 'static {
    type Engine: Pairing<ScalarField = Self::Scalar>;
    type Scalar: PrimeField;

    /// Group where messages, `Z` and `Y` live.
    type MessageGroup: CurveGroup<ScalarField = Self::Scalar>;

    /// Group where public keys and `Ŷ` live.
    type PublicKeyGroup: CurveGroup<ScalarField = Self::Scalar>;

    /// Message group points made ready for the Miller loop.
    type MessagePrepared: Clone + Debug + Send + Sync;

    /// Public key group points made ready for the Miller loop.
    type PublicKeyPrepared: Clone + Debug + Send + Sync;

    /// Draws allowed before `generate_nonzero` gives up.
    const MAX_SAMPLING_ATTEMPTS: usize = 64;

    /// Sample a uniform scalar, possibly zero.
    fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Scalar {
        Self::Scalar::rand(rng)
    }

    /// Sample a uniform nonzero scalar by bounded rejection.
    fn generate_nonzero<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self::Scalar, SpsEqError> {
        for _ in 0..Self::MAX_SAMPLING_ATTEMPTS {
            let s = Self::generate(rng);
            if !s.is_zero() {
                return Ok(s);
            }
        }
        log::warn!(
            "randomness source produced {} zero scalars in a row",
            Self::MAX_SAMPLING_ATTEMPTS
        );
        Err(SpsEqError::RandomnessExhausted(Self::MAX_SAMPLING_ATTEMPTS))
    }

    fn message_generator() -> Self::MessageGroup {
        <Self::MessageGroup as Group>::generator()
    }

    fn public_key_generator() -> Self::PublicKeyGroup {
        <Self::PublicKeyGroup as Group>::generator()
    }

    fn prepare_message(point: &Self::MessageGroup) -> Self::MessagePrepared;

    fn prepare_public_key(point: &Self::PublicKeyGroup) -> Self::PublicKeyPrepared;

    /// Product of pairings `Π e(m_i, pk_i)`, written additively in `GT`.
    ///
    /// Both iterators are consumed in lock step and must have equal length.
    fn multi_pairing<I, J>(messages: I, public_keys: J) -> PairingOutput<Self::Engine>
    where
        I: IntoIterator<Item = Self::MessagePrepared>,
        J: IntoIterator<Item = Self::PublicKeyPrepared>;

    /// Performs a single pairing `e(m, pk)` oriented as message group
    /// by public key group.
    fn pairing(message: &Self::MessageGroup, public_key: &Self::PublicKeyGroup) -> PairingOutput<Self::Engine> {
        Self::multi_pairing(
            once(Self::prepare_message(message)),
            once(Self::prepare_public_key(public_key)),
        )
    }
}

/// SPS-EQ on ZCash's BLS12-381 curve with messages in `G1`.
pub type ZSPS = UsualSPS<ark_bls12_381::Bls12_381>;

/// SPS-EQ on ZCash's BLS12-381 curve with messages in `G2`.
pub type TinyZSPS = TinySPS<ark_bls12_381::Bls12_381>;

/// Usual orientation with messages in `G1` and public keys in `G2`.
///
/// Signing and adaptation then only touch `G1`, except for `Ŷ`,
/// which keeps both operations cheap.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsualSPS<E: Pairing>(pub E);

impl<E: Pairing> EngineSPS for UsualSPS<E> {
    type Engine = E;
    type Scalar = E::ScalarField;
    type MessageGroup = E::G1;
    type PublicKeyGroup = E::G2;
    type MessagePrepared = E::G1Prepared;
    type PublicKeyPrepared = E::G2Prepared;

    fn prepare_message(point: &E::G1) -> E::G1Prepared {
        E::G1Prepared::from(*point)
    }

    fn prepare_public_key(point: &E::G2) -> E::G2Prepared {
        E::G2Prepared::from(*point)
    }

    fn multi_pairing<I, J>(messages: I, public_keys: J) -> PairingOutput<E>
    where
        I: IntoIterator<Item = E::G1Prepared>,
        J: IntoIterator<Item = E::G2Prepared>,
    {
        E::multi_pairing(messages, public_keys)
    }
}

/// Transposed orientation with messages in `G2` and public keys in `G1`.
///
/// We swap the two group roles relative to `UsualSPS` here, so
/// the pairing arguments are swapped too.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TinySPS<E: Pairing>(pub E);

impl<E: Pairing> EngineSPS for TinySPS<E> {
    type Engine = E;
    type Scalar = E::ScalarField;
    type MessageGroup = E::G2;
    type PublicKeyGroup = E::G1;
    type MessagePrepared = E::G2Prepared;
    type PublicKeyPrepared = E::G1Prepared;

    fn prepare_message(point: &E::G2) -> E::G2Prepared {
        E::G2Prepared::from(*point)
    }

    fn prepare_public_key(point: &E::G1) -> E::G1Prepared {
        E::G1Prepared::from(*point)
    }

    fn multi_pairing<I, J>(messages: I, public_keys: J) -> PairingOutput<E>
    where
        I: IntoIterator<Item = E::G2Prepared>,
        J: IntoIterator<Item = E::G1Prepared>,
    {
        E::multi_pairing(public_keys, messages)
    }
}
