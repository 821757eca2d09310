//! Object id hashing.
//!
//! Event ids in a soundbank are the 32-bit FNV-1 hash of the lower-cased
//! event name.

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Hashes a name the way the sound engine derives object ids from names.
pub const fn fnv1_32(name: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < name.len() {
        hash = hash.wrapping_mul(FNV_PRIME);
        hash ^= name[i].to_ascii_lowercase() as u32;
        i += 1;
    }

    hash
}

pub fn name_hash(name: &str) -> u32 {
    fnv1_32(name.as_bytes())
}

#[test]
fn known_hashes() {
    assert_eq!(name_hash(""), 0x811C_9DC5);
    assert_eq!(name_hash("a"), 0x050C_5D7E);
    assert_eq!(name_hash("Play_sfx_Ahri_Attack"), 2_202_466_809);
    assert_eq!(name_hash("PLAY_MUSIC"), name_hash("play_music"));
    assert_eq!(name_hash("play_music"), 0xAEC3_63DF);
}
