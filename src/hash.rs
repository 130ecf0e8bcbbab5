use argon2rs::{verifier::Encoded, Argon2, Variant};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::warn;
use ring::error::Unspecified;
use ring::rand::{SecureRandom, SystemRandom};
use std::panic;

/// Generate a random 16-byte value.
fn random_bytes(rng: &SystemRandom) -> Result<[u8; 16], Unspecified> {
    let mut bytes = [0; 16];
    rng.fill(&mut bytes)?;
    Ok(bytes)
}

/// The user salt is appended to the plaintext before hashing.
fn salted(password: &str, salt: &str) -> String {
    let mut input = String::with_capacity(password.len() + salt.len());
    input.push_str(password);
    input.push_str(salt);
    input
}

/// The `salt` and `salted_password_hash` column values for one user.
pub struct SaltedHash {
    pub salt: String,
    pub hash: String,
}

impl SaltedHash {
    /// Generate a random salt, then hash the salted password with Argon2i.
    pub fn from_password(rng: &SystemRandom, password: &str) -> Result<SaltedHash, Unspecified> {
        SaltedHash::with_params(rng, Argon2::default(Variant::Argon2i), password)
    }

    pub fn with_params(
        rng: &SystemRandom,
        argon: Argon2,
        password: &str,
    ) -> Result<SaltedHash, Unspecified> {
        let salt = STANDARD.encode(random_bytes(rng)?);
        // Argon2 wants its own salt as well; it ends up inside the encoded string.
        let argon_salt = random_bytes(rng)?;
        let session = Encoded::new(
            argon,
            salted(password, &salt).as_bytes(),
            &argon_salt,
            b"",
            b"",
        );
        let hash = String::from_utf8_lossy(&session.to_u8()).into_owned();

        Ok(SaltedHash { salt, hash })
    }
}

/// argon2rs asserts instead of erroring on truncated input, and asserts
/// again in `verify` on a short decoded salt. The shape is checked first and
/// any remaining panic is contained. `None` means the hash is unusable.
fn verify_argon2(stored_hash: &str, input: &[u8]) -> Option<bool> {
    // $argon2i$m=..,t=..,p=..$salt$hash
    if !stored_hash.starts_with("$argon2") || stored_hash.split('$').count() != 5 {
        return None;
    }
    let bytes = stored_hash.as_bytes();
    panic::catch_unwind(|| Encoded::from_u8(bytes).ok().map(|e| e.verify(input)))
        .ok()
        .flatten()
}

fn is_bcrypt(stored_hash: &str) -> bool {
    ["$2a$", "$2b$", "$2x$", "$2y$"]
        .iter()
        .any(|prefix| stored_hash.starts_with(prefix))
}

/// Check `password ++ salt` against a stored hash. Argon2 encoded strings
/// and bcrypt hashes are both accepted; anything undecodable never verifies.
pub fn verify(stored_hash: &str, salt: &str, password: &str) -> bool {
    let input = salted(password, salt);

    if is_bcrypt(stored_hash) {
        return match bcrypt::verify(&input, stored_hash) {
            Ok(ok) => ok,
            Err(e) => {
                warn!("Stored bcrypt hash could not be decoded: {}", e);
                false
            }
        };
    }

    match verify_argon2(stored_hash, input.as_bytes()) {
        Some(ok) => ok,
        None => {
            warn!("Stored password hash could not be decoded");
            false
        }
    }
}
