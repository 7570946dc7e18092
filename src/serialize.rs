use alloc::vec::Vec;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::engine::EngineSPS;
use crate::error::SpsEqError;
use crate::keys::{PublicKey, SigningKey};
use crate::signature::Signature;

/// Byte encoding shared by keys and signatures.
///
/// Points are always written in compressed affine form, so projective
/// coordinates that might leak information about the secret key never
/// reach the output.  Decoding checks subgroup membership and then the
/// type's own invariants.
pub trait SerializableToBytes: CanonicalSerialize + CanonicalDeserialize {
    fn to_bytes(&self) -> Result<Vec<u8>, SpsEqError> {
        let mut bytes = Vec::with_capacity(self.compressed_size());
        self.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, SpsEqError> {
        let decoded = Self::deserialize_compressed(bytes)?;
        decoded.check_invariants()?;
        Ok(decoded)
    }

    /// Checks beyond what the curve library validates.
    fn check_invariants(&self) -> Result<(), SpsEqError> {
        Ok(())
    }
}

impl<E: EngineSPS> SerializableToBytes for SigningKey<E> {
    fn check_invariants(&self) -> Result<(), SpsEqError> {
        self.validate()
    }
}

impl<E: EngineSPS> SerializableToBytes for PublicKey<E> {
    fn check_invariants(&self) -> Result<(), SpsEqError> {
        self.validate()
    }
}

impl<E: EngineSPS> SerializableToBytes for Signature<E> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{TinyZSPS, ZSPS};
    use crate::keys::Keypair;
    use ark_ff::{One, Zero};
    use ark_std::UniformRand;
    use rand::thread_rng;

    type Fr = <ZSPS as EngineSPS>::Scalar;

    #[test]
    fn keys_and_signatures_survive_encoding() {
        let mut rng = thread_rng();
        let keypair = Keypair::<ZSPS>::generate(3, &mut rng).unwrap();
        let msgs = (0..3)
            .map(|_| <ZSPS as EngineSPS>::MessageGroup::rand(&mut rng))
            .collect::<Vec<_>>();
        let sig = keypair.sign(&msgs, &mut rng).unwrap();

        let secret = SigningKey::<ZSPS>::from_bytes(&keypair.secret.to_bytes().unwrap()).unwrap();
        let public = PublicKey::<ZSPS>::from_bytes(&keypair.public.to_bytes().unwrap()).unwrap();
        let decoded = Signature::<ZSPS>::from_bytes(&sig.to_bytes().unwrap()).unwrap();
        assert_eq!(secret, keypair.secret);
        assert_eq!(public, keypair.public);
        assert_eq!(decoded, sig);
        assert!(public.verify(&msgs, &decoded));
    }

    #[test]
    fn truncated_input_is_rejected() {
        let mut rng = thread_rng();
        let keypair = Keypair::<TinyZSPS>::generate(2, &mut rng).unwrap();
        let bytes = keypair.public.to_bytes().unwrap();
        assert!(matches!(
            PublicKey::<TinyZSPS>::from_bytes(&bytes[..bytes.len() - 1]),
            Err(SpsEqError::Serialization(_))
        ));
    }

    #[test]
    fn decoded_keys_are_revalidated() {
        // Encode a zero secret by hand, bypassing `from_scalars`.
        let mut bytes = Vec::new();
        vec![Fr::one(), Fr::zero()].serialize_compressed(&mut bytes).unwrap();
        assert!(matches!(SigningKey::<ZSPS>::from_bytes(&bytes), Err(SpsEqError::InvalidKey(1))));

        let placeholder = PublicKey::<ZSPS>::with_capacity(2).to_bytes().unwrap();
        assert!(matches!(PublicKey::<ZSPS>::from_bytes(&placeholder), Err(SpsEqError::InvalidKey(0))));
    }
}
