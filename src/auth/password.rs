use pbkdf2::pbkdf2_hmac;
use rand_core::{OsRng, RngCore};
use sha2::Sha512;
use subtle::ConstantTimeEq;

const SALT_LEN: usize = 16;
const KDF_ITERATIONS: u32 = 10_000;
const KDF_OUTPUT_LEN: usize = 512;

/// Salt and hash pair as stored on the user record, both hex-encoded.
#[derive(Debug, Clone)]
pub struct Derived {
    pub salt: String,
    pub hash: String,
}

/// Derives a fresh salt + hash from a plaintext password. Every call
/// draws a new salt, so two calls with the same password disagree.
pub fn derive(password: &str) -> Derived {
    let mut salt_bytes = [0u8; SALT_LEN];
    let mut rng = OsRng;
    rng.fill_bytes(&mut salt_bytes);
    let salt = hex::encode(salt_bytes);
    let hash = derive_with_salt(password, &salt);
    Derived { salt, hash }
}

/// PBKDF2-HMAC-SHA512 over the password with the stored (hex) salt.
pub fn derive_with_salt(password: &str, salt: &str) -> String {
    let mut out = vec![0u8; KDF_OUTPUT_LEN];
    pbkdf2_hmac::<Sha512>(password.as_bytes(), salt.as_bytes(), KDF_ITERATIONS, &mut out);
    hex::encode(out)
}

/// Recomputes the digest with the stored salt and compares in constant
/// time. Length mismatch short-circuits to false inside `ct_eq`.
pub fn verify(password: &str, salt: &str, hash: &str) -> bool {
    let computed = derive_with_salt(password, salt);
    bool::from(computed.as_bytes().ct_eq(hash.as_bytes()))
}
