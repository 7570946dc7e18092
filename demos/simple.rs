use ark_std::UniformRand;
use sps_eq::{EngineSPS, Keypair, ZSPS};

/// Run using
/// ```sh
/// cargo run --example simple
/// ```
fn main() -> Result<(), sps_eq::SpsEqError> {
    let mut rng = ::rand::thread_rng();
    let keypair = Keypair::<ZSPS>::generate(2, &mut rng)?;
    let messages = (0..2)
        .map(|_| <ZSPS as EngineSPS>::MessageGroup::rand(&mut rng))
        .collect::<Vec<_>>();

    let mut signature = keypair.sign(&messages, &mut rng)?;
    println!("Signature is valid: {}", keypair.verify(&messages, &signature));

    let mut representative = messages.clone();
    signature.adapt_in_place(&mut representative, &mut rng)?;
    println!(
        "Changed representative is valid: {}",
        keypair.verify(&representative, &signature)
    );

    let (new_signature, new_representative) = signature.adapt(&representative, &mut rng)?;
    println!(
        "Fresh representative is valid: {}",
        keypair.verify(&new_representative, &new_signature)
    );
    Ok(())
}
