//! Pseudonymous customer keys.

use sha2::{Digest, Sha256};

/// Hex characters kept from the digest.
const KEY_LENGTH: usize = 12;

/// Buyer columns of one order line, already trimmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuyerIdentity<'a> {
    pub name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub buyer_id: Option<&'a str>,
}

/// Derive a stable key for the buyer.
///
/// Name + phone hash first, raw buyer id second, `None` otherwise. Phone
/// formatting (`010-1234-5678` vs `01012345678`) does not change the key.
pub fn customer_key(identity: &BuyerIdentity<'_>) -> Option<String> {
    if let (Some(name), Some(phone)) = (identity.name, identity.phone) {
        let name = name.trim();
        let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
        if !name.is_empty() && !digits.is_empty() {
            return Some(hash_key(name, &digits));
        }
    }

    identity
        .buyer_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn hash_key(name: &str, phone_digits: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(b"_");
    hasher.update(phone_digits.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..KEY_LENGTH].to_string()
}
