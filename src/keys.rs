//! ## SPS-EQ keys
//!
//! A key pair has a fixed capacity `ℓ`, the length of every message
//! it signs or verifies.  Secret keys hold `ℓ` nonzero scalars and
//! public keys the same scalars lifted into the public key group.

use core::fmt;

use alloc::{vec, vec::Vec};
use ark_ff::field_hashers::{DefaultFieldHasher, HashToField};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::cfg_iter;
use digest::DynDigest;
use rand_core::{CryptoRng, RngCore};
use sha2::Sha256;
use zeroize::Zeroize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::engine::EngineSPS;
use crate::error::SpsEqError;
use crate::signature::Signature;

// //////////////// SECRETS //////////////// //

/// Secret signing key of capacity `ℓ`.
///
/// The scalars are wiped when the key is dropped.
#[derive(CanonicalSerialize, CanonicalDeserialize)]
pub struct SigningKey<E: EngineSPS> {
    pub(crate) secrets: Vec<E::Scalar>,
}

impl<E: EngineSPS> Clone for SigningKey<E> {
    fn clone(&self) -> Self {
        SigningKey { secrets: self.secrets.clone() }
    }
}

impl<E: EngineSPS> PartialEq for SigningKey<E> {
    fn eq(&self, other: &Self) -> bool {
        self.secrets == other.secrets
    }
}

impl<E: EngineSPS> Eq for SigningKey<E> {}

impl<E: EngineSPS> fmt::Debug for SigningKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

impl<E: EngineSPS> Drop for SigningKey<E> {
    fn drop(&mut self) {
        self.secrets.zeroize();
    }
}

impl<E: EngineSPS> SigningKey<E> {
    /// Domain separation tag for seeded key derivation.
    pub const DST: &'static [u8] = b"SPS-EQ-KEYGEN-V01";

    /// Sample `capacity` independent nonzero scalars.
    pub fn generate<R: RngCore + CryptoRng>(capacity: usize, rng: &mut R) -> Result<Self, SpsEqError> {
        if capacity == 0 {
            return Err(SpsEqError::EmptyKey);
        }
        let secrets = (0..capacity)
            .map(|_| E::generate_nonzero(rng))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("generated signing key with capacity {}", capacity);
        Ok(SigningKey { secrets })
    }

    /// Wrap caller supplied scalars, rejecting zeros.
    pub fn from_scalars(secrets: Vec<E::Scalar>) -> Result<Self, SpsEqError> {
        let key = SigningKey { secrets };
        key.validate()?;
        Ok(key)
    }

    /// Derive a key deterministically from `seed` with SHA-256.
    pub fn from_seed(seed: &[u8], capacity: usize) -> Result<Self, SpsEqError> {
        Self::from_seed_with::<Sha256>(seed, capacity)
    }

    /// Derive a key deterministically from `seed` by hashing to the scalar field with `H`.
    pub fn from_seed_with<H>(seed: &[u8], capacity: usize) -> Result<Self, SpsEqError>
    where
        H: DynDigest + Default + Clone,
    {
        if capacity == 0 {
            return Err(SpsEqError::EmptyKey);
        }
        let hasher = <DefaultFieldHasher<H> as HashToField<E::Scalar>>::new(Self::DST);
        Self::from_scalars(hasher.hash_to_field(seed, capacity))
    }

    pub(crate) fn validate(&self) -> Result<(), SpsEqError> {
        if self.secrets.is_empty() {
            return Err(SpsEqError::EmptyKey);
        }
        match self.secrets.iter().position(|s| s.is_zero()) {
            Some(i) => Err(SpsEqError::InvalidKey(i)),
            None => Ok(()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.secrets.len()
    }

    /// Read-only view over the secret scalars, restartable by calling again.
    pub fn iter(&self) -> core::slice::Iter<'_, E::Scalar> {
        self.secrets.iter()
    }

    pub(crate) fn check_capacity(&self, found: usize) -> Result<(), SpsEqError> {
        if found != self.capacity() {
            return Err(SpsEqError::CapacityMismatch {
                expected: self.capacity(),
                found,
            });
        }
        Ok(())
    }

    /// Derive our public key from our secret key
    pub fn public_key(&self) -> PublicKey<E> {
        PublicKey::derive(self)
    }
}

impl<'a, E: EngineSPS> IntoIterator for &'a SigningKey<E> {
    type Item = &'a E::Scalar;
    type IntoIter = core::slice::Iter<'a, E::Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ////////////// NON-SECRETS ////////////// //

/// SPS-EQ public key of capacity `ℓ`.
#[derive(CanonicalSerialize, CanonicalDeserialize)]
pub struct PublicKey<E: EngineSPS> {
    pub(crate) keys: Vec<E::PublicKeyGroup>,
}

impl<E: EngineSPS> Clone for PublicKey<E> {
    fn clone(&self) -> Self {
        PublicKey { keys: self.keys.clone() }
    }
}

impl<E: EngineSPS> PartialEq for PublicKey<E> {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys
    }
}

impl<E: EngineSPS> Eq for PublicKey<E> {}

impl<E: EngineSPS> fmt::Debug for PublicKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.keys).finish()
    }
}

impl<E: EngineSPS> PublicKey<E> {
    /// Lift every secret scalar by the public key group generator.
    pub fn derive(secret: &SigningKey<E>) -> Self {
        let generator = E::public_key_generator();
        let keys = cfg_iter!(secret.secrets)
            .map(|s| generator * s)
            .collect::<Vec<_>>();
        log::debug!("derived public key with capacity {}", keys.len());
        PublicKey { keys }
    }

    /// Placeholder of the given capacity holding only identities,
    /// to be replaced by a derived or decoded key before use.
    pub fn with_capacity(capacity: usize) -> Self {
        PublicKey {
            keys: vec![E::PublicKeyGroup::zero(); capacity],
        }
    }

    /// Wrap caller supplied key components, rejecting identities.
    pub fn from_keys(keys: Vec<E::PublicKeyGroup>) -> Result<Self, SpsEqError> {
        let key = PublicKey { keys };
        key.validate()?;
        Ok(key)
    }

    pub(crate) fn validate(&self) -> Result<(), SpsEqError> {
        if self.keys.is_empty() {
            return Err(SpsEqError::EmptyKey);
        }
        match self.keys.iter().position(|k| k.is_zero()) {
            Some(i) => Err(SpsEqError::InvalidKey(i)),
            None => Ok(()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.keys.len()
    }

    pub fn keys(&self) -> &[E::PublicKeyGroup] {
        &self.keys
    }

    /// Prepare the key components once for repeated verification.
    pub fn prepare(&self) -> PreparedPublicKey<E> {
        PreparedPublicKey::from(self)
    }

    pub fn verify(&self, messages: &[E::MessageGroup], signature: &Signature<E>) -> bool {
        signature.verify(messages, self)
    }
}

/// Public key whose components are already in pairing-ready form.
///
/// Keys that fail `PublicKey` validation, such as unpopulated
/// placeholders, are marked degenerate and verify nothing.
pub struct PreparedPublicKey<E: EngineSPS> {
    pub(crate) keys: Vec<E::PublicKeyPrepared>,
    pub(crate) degenerate: bool,
}

impl<E: EngineSPS> Clone for PreparedPublicKey<E> {
    fn clone(&self) -> Self {
        PreparedPublicKey {
            keys: self.keys.clone(),
            degenerate: self.degenerate,
        }
    }
}

impl<E: EngineSPS> fmt::Debug for PreparedPublicKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedPublicKey")
            .field("keys", &self.keys)
            .field("degenerate", &self.degenerate)
            .finish()
    }
}

impl<E: EngineSPS> From<&PublicKey<E>> for PreparedPublicKey<E> {
    fn from(pk: &PublicKey<E>) -> Self {
        PreparedPublicKey {
            keys: cfg_iter!(pk.keys).map(E::prepare_public_key).collect(),
            degenerate: pk.validate().is_err(),
        }
    }
}

impl<E: EngineSPS> From<PublicKey<E>> for PreparedPublicKey<E> {
    fn from(pk: PublicKey<E>) -> Self {
        PreparedPublicKey::from(&pk)
    }
}

impl<E: EngineSPS> PreparedPublicKey<E> {
    pub fn capacity(&self) -> usize {
        self.keys.len()
    }

    /// Whether some component is the identity, in which case nothing verifies.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn verify(&self, messages: &[E::MessageGroup], signature: &Signature<E>) -> bool {
        signature.verify_prepared(messages, self)
    }
}

/// SPS-EQ key pair
///
/// We keep the public key alongside the secret key to avoid
/// recomputing it, which costs `ℓ` scalar multiplications in
/// the public key group.
pub struct Keypair<E: EngineSPS> {
    pub secret: SigningKey<E>,
    pub public: PublicKey<E>,
}

impl<E: EngineSPS> Clone for Keypair<E> {
    fn clone(&self) -> Self {
        Keypair {
            secret: self.secret.clone(),
            public: self.public.clone(),
        }
    }
}

impl<E: EngineSPS> fmt::Debug for Keypair<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("secret", &self.secret)
            .field("public", &self.public)
            .finish()
    }
}

impl<E: EngineSPS> Keypair<E> {
    /// Generate a `Keypair`
    pub fn generate<R: RngCore + CryptoRng>(capacity: usize, rng: &mut R) -> Result<Self, SpsEqError> {
        let secret = SigningKey::generate(capacity, rng)?;
        let public = secret.public_key();
        Ok(Keypair { secret, public })
    }

    pub fn from_seed(seed: &[u8], capacity: usize) -> Result<Self, SpsEqError> {
        let secret = SigningKey::from_seed(seed, capacity)?;
        let public = secret.public_key();
        Ok(Keypair { secret, public })
    }

    pub fn capacity(&self) -> usize {
        self.secret.capacity()
    }

    pub fn sign<R: RngCore + CryptoRng>(
        &self,
        messages: &[E::MessageGroup],
        rng: &mut R,
    ) -> Result<Signature<E>, SpsEqError> {
        self.secret.sign(messages, rng)
    }

    pub fn verify(&self, messages: &[E::MessageGroup], signature: &Signature<E>) -> bool {
        self.public.verify(messages, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::ZeroRng;
    use crate::engine::{TinyZSPS, ZSPS};
    use ark_ff::One;
    use ark_std::UniformRand;
    use rand::thread_rng;

    type Fr = <ZSPS as EngineSPS>::Scalar;

    #[test]
    fn generated_keys_are_nonzero_and_sized() {
        let mut rng = thread_rng();
        for capacity in 1..6 {
            let sk = SigningKey::<ZSPS>::generate(capacity, &mut rng).unwrap();
            assert_eq!(sk.capacity(), capacity);
            assert!(sk.iter().all(|s| !s.is_zero()));
            let pk = sk.public_key();
            assert_eq!(pk.capacity(), capacity);
            assert_eq!(pk.prepare().capacity(), capacity);
        }
    }

    #[test]
    fn empty_keys_are_rejected() {
        let mut rng = thread_rng();
        assert!(matches!(SigningKey::<ZSPS>::generate(0, &mut rng), Err(SpsEqError::EmptyKey)));
        assert!(matches!(SigningKey::<ZSPS>::from_scalars(vec![]), Err(SpsEqError::EmptyKey)));
        assert!(matches!(SigningKey::<ZSPS>::from_seed(b"seed", 0), Err(SpsEqError::EmptyKey)));
        assert!(matches!(PublicKey::<ZSPS>::from_keys(vec![]), Err(SpsEqError::EmptyKey)));
    }

    #[test]
    fn generation_fails_on_degenerate_randomness() {
        assert!(matches!(
            SigningKey::<ZSPS>::generate(2, &mut ZeroRng),
            Err(SpsEqError::RandomnessExhausted(_))
        ));
    }

    #[test]
    fn zero_secrets_are_rejected() {
        let secrets = vec![Fr::one(), Fr::zero(), Fr::one()];
        assert!(matches!(
            SigningKey::<ZSPS>::from_scalars(secrets),
            Err(SpsEqError::InvalidKey(1))
        ));
    }

    #[test]
    fn identity_public_key_components_are_rejected() {
        let g2 = ZSPS::public_key_generator();
        let keys = vec![g2, g2, <ZSPS as EngineSPS>::PublicKeyGroup::zero()];
        assert!(matches!(PublicKey::<ZSPS>::from_keys(keys), Err(SpsEqError::InvalidKey(2))));

        let placeholder = PublicKey::<ZSPS>::with_capacity(3);
        assert_eq!(placeholder.capacity(), 3);
        assert!(matches!(placeholder.validate(), Err(SpsEqError::InvalidKey(0))));
    }

    #[test]
    fn placeholder_keys_verify_nothing() {
        let mut rng = thread_rng();
        let msgs = (0..2)
            .map(|_| <ZSPS as EngineSPS>::MessageGroup::rand(&mut rng))
            .collect::<Vec<_>>();
        // Without a populated key both sides of the first equation are one.
        let forged = Signature::<ZSPS> {
            Z: <ZSPS as EngineSPS>::MessageGroup::zero(),
            Y: ZSPS::message_generator(),
            Y_tilde: ZSPS::public_key_generator(),
        };

        let placeholder = PublicKey::<ZSPS>::with_capacity(2);
        assert!(!placeholder.verify(&msgs, &forged));
        let prepared = placeholder.prepare();
        assert!(prepared.is_degenerate());
        assert!(!prepared.verify(&msgs, &forged));

        let mut partial = Keypair::<ZSPS>::generate(2, &mut rng).unwrap().public;
        partial.keys[1] = <ZSPS as EngineSPS>::PublicKeyGroup::zero();
        assert!(PreparedPublicKey::from(&partial).is_degenerate());

        let keypair = Keypair::<ZSPS>::generate(2, &mut rng).unwrap();
        assert!(!keypair.public.prepare().is_degenerate());
        let sig = keypair.sign(&msgs, &mut rng).unwrap();
        assert!(keypair.public.prepare().verify(&msgs, &sig));
    }

    #[test]
    fn secret_iteration_is_restartable() {
        let sk = SigningKey::<ZSPS>::from_scalars(vec![Fr::one(); 3]).unwrap();
        assert_eq!(sk.capacity(), 3);
        for key in &sk {
            assert_eq!(*key, Fr::one());
        }
        assert_eq!(sk.iter().count(), 3);
        assert_eq!(sk.iter().count(), 3);
    }

    #[test]
    fn public_key_lifts_secrets() {
        let secrets = vec![Fr::from(3u64), Fr::from(5u64)];
        let sk = SigningKey::<ZSPS>::from_scalars(secrets.clone()).unwrap();
        let pk = PublicKey::derive(&sk);
        let g2 = ZSPS::public_key_generator();
        assert_eq!(pk.keys(), &[g2 * secrets[0], g2 * secrets[1]][..]);
        assert_eq!(PublicKey::from_keys(pk.keys().to_vec()).unwrap(), pk);
    }

    #[test]
    fn seeded_keys_are_deterministic() {
        let a = Keypair::<ZSPS>::from_seed(b"my seed", 4).unwrap();
        let b = Keypair::<ZSPS>::from_seed(b"my seed", 4).unwrap();
        let c = Keypair::<ZSPS>::from_seed(b"other seed", 4).unwrap();
        assert_eq!(a.secret, b.secret);
        assert_eq!(a.public, b.public);
        assert_ne!(a.secret, c.secret);

        let tiny = SigningKey::<TinyZSPS>::from_seed_with::<sha2::Sha512>(b"my seed", 4).unwrap();
        assert_eq!(tiny.capacity(), 4);
    }

    #[test]
    fn debug_hides_secrets() {
        let sk = SigningKey::<ZSPS>::from_scalars(vec![Fr::from(1234567u64)]).unwrap();
        let printed = format!("{:?}", sk);
        assert!(printed.contains("capacity: 1"));
        assert!(!printed.contains("1234567"));
    }
}
