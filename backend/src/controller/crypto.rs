use blake2::{Blake2b512, Digest};

pub struct CryptoController {
    salt: Vec<u8>,
}

impl CryptoController {
    pub fn new(salt: &str) -> Self {
        Self {
            salt: salt.as_bytes().to_vec(),
        }
    }
    /// hash `src` and compare hash value with `hashed`
    ///
    /// Every byte is compared even after a mismatch.
    pub fn hash_eq(&self, src: &str, hashed: &[u8]) -> bool {
        let src_hashed: Vec<u8> = self.hash(src);
        if src_hashed.len() != hashed.len() {
            return false;
        }
        src_hashed
            .iter()
            .zip(hashed.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
    /// get BLAKE2b-512 hashed bytes with salt
    pub fn hash(&self, src: &str) -> Vec<u8> {
        let mut hasher = Blake2b512::new();
        hasher.update([src.as_bytes(), self.salt.as_slice()].concat());

        let hashed = hasher.finalize();
        hashed.to_vec()
    }
}
