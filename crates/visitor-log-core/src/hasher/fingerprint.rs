use deunicode::deunicode;
use sha1::{Digest, Sha1};

/// Fields that make up a visit's identity.
///
/// Optional fields that are `None` contribute nothing to the digest input,
/// not even a separator, so callers should always pass the full set.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashInput<'a> {
    pub institution: &'a str,
    pub full_name: Option<&'a str>,
    pub id_document: Option<&'a str>,
    pub id_number: Option<&'a str>,
    pub date: &'a str,
    pub time_start: Option<&'a str>,
}

/// SHA-1 over the ASCII-folded identity fields, as 40 lowercase hex chars.
///
/// Folding makes "José" and "Jose" the same visitor, which is how the same
/// person shows up across exports with and without diacritics.
pub fn compute_hash(input: &HashInput<'_>) -> String {
    let parts = [
        Some(input.institution),
        input.full_name,
        input.id_document,
        input.id_number,
        Some(input.date),
        input.time_start,
    ];

    let mut hasher = Sha1::new();
    for part in parts.into_iter().flatten() {
        hasher.update(deunicode(part).as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
