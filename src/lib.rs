//! # Structure-preserving signatures on equivalence classes
//!
//! An SPS-EQ signs a vector of group elements `M = (m_1, .., m_ℓ)`
//! such that anyone holding a valid signature may, without the secret
//! key, derive a valid signature on any representative `ψ·M` of the
//! class of `M`.  Adapted pairs are distributed like fresh signatures
//! on the new representative, so they cannot be linked to the original.
//!
//! We follow the construction of Fuchsbauer, Hanser and Slamanig,
//! ["Structure-Preserving Signatures on Equivalence Classes and Constant-Size Anonymous Credentials"](https://eprint.iacr.org/2014/944.pdf),
//! in the form used by mercurial signatures.
//!
//! Group arithmetic and pairings come from arkworks through the
//! `EngineSPS` trait, which fixes which curve group holds messages and
//! which holds public keys.  `ZSPS` uses BLS12-381 with messages in `G1`.
//!
//! ```rust
//! use sps_eq::{Keypair, ZSPS, EngineSPS};
//! use ark_std::UniformRand;
//!
//! let mut rng = rand::thread_rng();
//! let keypair = Keypair::<ZSPS>::generate(2, &mut rng).unwrap();
//! let messages = vec![
//!     <ZSPS as EngineSPS>::MessageGroup::rand(&mut rng),
//!     <ZSPS as EngineSPS>::MessageGroup::rand(&mut rng),
//! ];
//! let signature = keypair.sign(&messages, &mut rng).unwrap();
//! assert!(keypair.verify(&messages, &signature));
//!
//! let (signature, messages) = signature.adapt(&messages, &mut rng).unwrap();
//! assert!(keypair.verify(&messages, &signature));
//! ```
//!
//! All randomness must come from a `CryptoRng`, including the secret
//! key, the signing randomness and both blinding factors of an
//! adaptation.

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

extern crate alloc;

pub mod engine;
pub mod error;
pub mod keys;
pub mod serialize;
pub mod signature;

use alloc::vec::Vec;
use rand_core::{CryptoRng, RngCore};

pub use crate::engine::{EngineSPS, TinySPS, TinyZSPS, UsualSPS, ZSPS};
pub use crate::error::SpsEqError;
pub use crate::keys::{Keypair, PreparedPublicKey, PublicKey, SigningKey};
pub use crate::serialize::SerializableToBytes;
pub use crate::signature::Signature;

/// Generate a signing key for messages of length `capacity`.
pub fn generate_key<E: EngineSPS, R: RngCore + CryptoRng>(
    capacity: usize,
    rng: &mut R,
) -> Result<SigningKey<E>, SpsEqError> {
    SigningKey::generate(capacity, rng)
}

pub fn derive_public_key<E: EngineSPS>(secret: &SigningKey<E>) -> PublicKey<E> {
    PublicKey::derive(secret)
}

pub fn sign<E: EngineSPS, R: RngCore + CryptoRng>(
    secret: &SigningKey<E>,
    messages: &[E::MessageGroup],
    rng: &mut R,
) -> Result<Signature<E>, SpsEqError> {
    secret.sign(messages, rng)
}

/// Total predicate, mismatched lengths yield `false`.
pub fn verify<E: EngineSPS>(
    public_key: &PublicKey<E>,
    messages: &[E::MessageGroup],
    signature: &Signature<E>,
) -> bool {
    signature.verify(messages, public_key)
}

/// Change the representative of `(messages, signature)`.
///
/// Returns the adapted pair.  With `mutate` set, the caller's signature
/// and messages are overwritten by that pair as well, otherwise they are
/// left untouched.
pub fn adapt<E: EngineSPS, R: RngCore + CryptoRng>(
    signature: &mut Signature<E>,
    messages: &mut Vec<E::MessageGroup>,
    rng: &mut R,
    mutate: bool,
) -> Result<(Signature<E>, Vec<E::MessageGroup>), SpsEqError> {
    if mutate {
        signature.adapt_in_place(messages, rng)?;
        Ok((*signature, messages.clone()))
    } else {
        signature.adapt(messages, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::UniformRand;
    use rand::thread_rng;

    #[test]
    fn adapt_honours_mutation_choice() {
        let mut rng = thread_rng();
        let sk = generate_key::<ZSPS, _>(2, &mut rng).unwrap();
        let pk = derive_public_key(&sk);
        let mut msgs = (0..2)
            .map(|_| <ZSPS as EngineSPS>::MessageGroup::rand(&mut rng))
            .collect::<Vec<_>>();
        let mut sig = sign(&sk, &msgs, &mut rng).unwrap();
        let (msgs_before, sig_before) = (msgs.clone(), sig);

        let (fresh_sig, fresh_msgs) = adapt(&mut sig, &mut msgs, &mut rng, false).unwrap();
        assert_eq!((sig, &msgs), (sig_before, &msgs_before));
        assert!(verify(&pk, &fresh_msgs, &fresh_sig));

        let (mutated_sig, mutated_msgs) = adapt(&mut sig, &mut msgs, &mut rng, true).unwrap();
        assert_eq!((sig, &msgs), (mutated_sig, &mutated_msgs));
        assert_ne!(msgs, msgs_before);
        assert!(verify(&pk, &msgs, &sig));
        assert!(verify(&pk, &msgs_before, &sig_before));
    }
}
