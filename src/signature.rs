//! ## SPS-EQ signatures and representative changes
//!
//! A signature `(Z, Y, Ŷ)` on `M = (m_1, .., m_ℓ)` under secret key
//! `(x_1, .., x_ℓ)` and randomness `r` is
//! `Z = r · Σ x_i m_i`, `Y = r⁻¹ · P`, `Ŷ = r⁻¹ · P̂`, where `P` and `P̂`
//! generate the message and public key groups.  Verification checks
//!
//! ```text
//! Π e(m_i, X̂_i) = e(Z, Ŷ)        e(Y, P̂) = e(P, Ŷ)
//! ```
//!
//! Anyone may move a valid pair `(M, σ)` to `(ψ·M, σ')` with
//! `σ' = (μψ·Z, μ⁻¹·Y, μ⁻¹·Ŷ)`, which verifies under the same key.
//! Both `μ` and `ψ` are sampled fresh on every call.

use core::fmt;

use ark_ff::{Field, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use alloc::vec::Vec;
use ark_std::cfg_iter_mut;
use rand_core::{CryptoRng, RngCore};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::engine::EngineSPS;
use crate::error::SpsEqError;
use crate::keys::{PreparedPublicKey, PublicKey, SigningKey};

/// Detached SPS-EQ signature
#[derive(CanonicalSerialize, CanonicalDeserialize)]
pub struct Signature<E: EngineSPS> {
    pub Z: E::MessageGroup,
    pub Y: E::MessageGroup,
    pub Y_tilde: E::PublicKeyGroup,
}

impl<E: EngineSPS> Clone for Signature<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: EngineSPS> Copy for Signature<E> {}

impl<E: EngineSPS> PartialEq<Self> for Signature<E> {
    fn eq(&self, other: &Self) -> bool {
        self.Z == other.Z && self.Y == other.Y && self.Y_tilde == other.Y_tilde
    }
}

impl<E: EngineSPS> Eq for Signature<E> {}

impl<E: EngineSPS> fmt::Debug for Signature<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("Z", &self.Z)
            .field("Y", &self.Y)
            .field("Y_tilde", &self.Y_tilde)
            .finish()
    }
}

impl<E: EngineSPS> SigningKey<E> {
    /// Sign `messages`, which must hold exactly `capacity` elements,
    /// none of them the identity.
    pub fn sign<R: RngCore + CryptoRng>(
        &self,
        messages: &[E::MessageGroup],
        rng: &mut R,
    ) -> Result<Signature<E>, SpsEqError> {
        self.check_capacity(messages.len())?;
        let r = E::generate_nonzero(rng)?;
        self.sign_with_given_randomness(&r, messages)
    }

    /// Sign with the randomness `r` provided externally.
    pub fn sign_with_given_randomness(
        &self,
        r: &E::Scalar,
        messages: &[E::MessageGroup],
    ) -> Result<Signature<E>, SpsEqError> {
        self.check_capacity(messages.len())?;
        if let Some(i) = messages.iter().position(|m| m.is_zero()) {
            return Err(SpsEqError::IdentityMessage(i));
        }
        let r_inv = r.inverse().ok_or(SpsEqError::ZeroRandomizer)?;

        // Z = r * \sum_{i}(m_i * sk_i)
        let Z = messages
            .iter()
            .zip(self.secrets.iter())
            .fold(E::MessageGroup::zero(), |acc, (m, x)| acc + *m * x)
            * r;
        Ok(Signature {
            Z,
            Y: E::message_generator() * r_inv,
            Y_tilde: E::public_key_generator() * r_inv,
        })
    }
}

impl<E: EngineSPS> Signature<E> {
    /// Verify against `public_key`, preparing its components first.
    pub fn verify(&self, messages: &[E::MessageGroup], public_key: &PublicKey<E>) -> bool {
        if messages.len() != public_key.capacity() {
            log::trace!(
                "rejecting {} messages under a key of capacity {}",
                messages.len(),
                public_key.capacity()
            );
            return false;
        }
        self.verify_prepared(messages, &public_key.prepare())
    }

    /// Verify against an already prepared public key.
    ///
    /// Never fails, malformed input yields `false`.
    pub fn verify_prepared(&self, messages: &[E::MessageGroup], public_key: &PreparedPublicKey<E>) -> bool {
        if messages.len() != public_key.capacity() {
            log::trace!(
                "rejecting {} messages under a key of capacity {}",
                messages.len(),
                public_key.capacity()
            );
            return false;
        }
        if public_key.is_degenerate() {
            log::trace!("rejecting key with an identity component");
            return false;
        }
        if messages.iter().any(|m| m.is_zero()) {
            log::trace!("rejecting message with an identity component");
            return false;
        }
        if self.Y.is_zero() || self.Y_tilde.is_zero() {
            log::trace!("rejecting signature with an identity randomizer");
            return false;
        }

        let y_tilde = E::prepare_public_key(&self.Y_tilde);

        // \prod_i e(m_i, pk_i) * e(-Z, Y_tilde) == 1
        let lhs = messages
            .iter()
            .map(E::prepare_message)
            .chain(core::iter::once(E::prepare_message(&-self.Z)));
        let rhs = public_key.keys.iter().cloned().chain(core::iter::once(y_tilde.clone()));
        if !E::multi_pairing(lhs, rhs).is_zero() {
            log::trace!("signature does not bind the messages");
            return false;
        }

        // e(Y, P_tilde) * e(-P, Y_tilde) == 1
        let lhs = [
            E::prepare_message(&self.Y),
            E::prepare_message(&-E::message_generator()),
        ];
        let rhs = [E::prepare_public_key(&E::public_key_generator()), y_tilde];
        if !E::multi_pairing(lhs, rhs).is_zero() {
            log::trace!("signature randomizers Y and Y_tilde disagree");
            return false;
        }
        true
    }

    /// Move `(messages, self)` to a fresh representative of the same class, in place.
    ///
    /// Samples `μ` then `ψ`, so equal randomness streams give the same
    /// result as `adapt`.
    pub fn adapt_in_place<R: RngCore + CryptoRng>(
        &mut self,
        messages: &mut [E::MessageGroup],
        rng: &mut R,
    ) -> Result<(), SpsEqError> {
        let mu = E::generate_nonzero(rng)?;
        let psi = E::generate_nonzero(rng)?;
        self.adapt_in_place_with_given_randomness(&mu, &psi, messages)
    }

    /// Produce a fresh representative of the class of `messages` with a
    /// matching signature, leaving both inputs untouched.
    pub fn adapt<R: RngCore + CryptoRng>(
        &self,
        messages: &[E::MessageGroup],
        rng: &mut R,
    ) -> Result<(Self, Vec<E::MessageGroup>), SpsEqError> {
        let mu = E::generate_nonzero(rng)?;
        let psi = E::generate_nonzero(rng)?;
        self.adapt_with_given_randomness(&mu, &psi, messages)
    }

    /// `adapt_in_place` with the randomness provided externally.
    ///
    /// Nothing is modified when either scalar is zero.
    pub fn adapt_in_place_with_given_randomness(
        &mut self,
        mu: &E::Scalar,
        psi: &E::Scalar,
        messages: &mut [E::MessageGroup],
    ) -> Result<(), SpsEqError> {
        let mu_inv = mu.inverse().ok_or(SpsEqError::ZeroRandomizer)?;
        if psi.is_zero() {
            return Err(SpsEqError::ZeroRandomizer);
        }
        // Z = Z * mu * psi
        // Y = Y * 1/mu
        // Y_tilde = Y_tilde * 1/mu
        self.Z *= *mu * psi;
        self.Y *= mu_inv;
        self.Y_tilde *= mu_inv;
        cfg_iter_mut!(messages).for_each(|m| *m *= psi);
        Ok(())
    }

    /// `adapt` with the randomness provided externally.
    pub fn adapt_with_given_randomness(
        &self,
        mu: &E::Scalar,
        psi: &E::Scalar,
        messages: &[E::MessageGroup],
    ) -> Result<(Self, Vec<E::MessageGroup>), SpsEqError> {
        let mut signature = *self;
        let mut messages = messages.to_vec();
        signature.adapt_in_place_with_given_randomness(mu, psi, &mut messages)?;
        Ok((signature, messages))
    }
}
