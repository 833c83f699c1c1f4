//! Reversible voyage codes for sharing and replaying a seeded route.
//! Code format: <HEMI>-<WORD><NN>, e.g., AR-NARWHAL42, AN-PETREL07

use crate::data::PolarRegion;

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

fn sanitize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub const WORD_LIST: [&str; 64] = [
    "NARWHAL", "BELUGA", "WALRUS", "PETREL", "PENGUIN", "ORCA", "SKUA", "TERN", "FULMAR", "AUK",
    "PUFFIN", "SEAL", "HUSKY", "CARIBOU", "LEMMING", "FOX", "OWL", "ERMINE", "KRILL", "ALBATROS",
    "FLOE", "PACK", "GROWLER", "BERG", "FIRN", "NEVE", "SASTRUGI", "POLYNYA", "LEAD", "RIDGE",
    "SHELF", "GLACIER", "FJORD", "SOUND", "STRAIT", "CAPE", "BAY", "INLET", "TUNDRA", "TAIGA",
    "AURORA", "BOREAL", "AUSTRAL", "SOLSTICE", "EQUINOX", "MIDNIGHT", "TWILIGHT", "BLIZZARD",
    "SQUALL", "GALE", "FROST", "RIME", "HOAR", "SLUSH", "NILAS", "PANCAKE", "FRAZIL", "GREASE",
    "KEEL", "BOW", "STERN", "RUDDER", "COMPASS", "SEXTANT",
];

#[inline]
fn pack(word_index: u16, nn: u8) -> u16 {
    (word_index & 0x003F) | ((u16::from(nn) & 0x7F) << 6)
}

#[inline]
fn unpack(packed: u16) -> (usize, u8) {
    let word_index = usize::from(packed & 0x003F);
    let nn = u8::try_from((packed >> 6) & 0x7F).unwrap_or(0);
    (word_index, nn)
}

const fn hemisphere_tag(region: PolarRegion) -> &'static str {
    match region {
        PolarRegion::Arctic => "AR",
        PolarRegion::Antarctic => "AN",
    }
}

fn compose_seed(region: PolarRegion, word_index: u16, nn: u8) -> u64 {
    let packed = pack(word_index, nn);
    let [lo, hi] = packed.to_le_bytes();
    let mut buf = [0u8; 11];
    buf[..6].copy_from_slice(b"POLAR-");
    buf[6..8].copy_from_slice(hemisphere_tag(region).as_bytes());
    buf[8] = lo;
    buf[9] = hi;
    buf[10] = 0x5A;
    let h = fnv1a64(&buf);
    (h & 0xFFFF_FFFF_FFFF_0000) | u64::from(packed)
}

/// Render a seed as a voyage code. Only the low 16 bits select the word and number.
#[must_use]
pub fn encode_friendly(region: PolarRegion, seed: u64) -> String {
    let packed = u16::try_from(seed & 0xFFFF).unwrap_or(0);
    let (word_index, nn) = unpack(packed);
    let word = WORD_LIST.get(word_index).copied().unwrap_or(WORD_LIST[0]);
    format!("{}-{word}{:02}", hemisphere_tag(region), nn % 100)
}

/// Decode a voyage code back into its hemisphere and seed.
///
/// Matching is case-insensitive and tolerant of surrounding whitespace.
#[must_use]
pub fn decode_to_seed(code: &str) -> Option<(PolarRegion, u64)> {
    let (tag, rest) = code.trim().split_once('-')?;
    let region = match tag.to_ascii_uppercase().as_str() {
        "AR" => PolarRegion::Arctic,
        "AN" => PolarRegion::Antarctic,
        _ => return None,
    };
    if rest.len() < 3 || !rest.is_char_boundary(rest.len() - 2) {
        return None;
    }
    let (word_part, nn_part) = rest.split_at(rest.len() - 2);
    let nn: u8 = nn_part.parse().ok()?;
    let word = sanitize_word(word_part);
    let index = WORD_LIST.iter().position(|w| *w == word)?;
    let word_index = u16::try_from(index).ok()?;
    Some((region, compose_seed(region, word_index, nn)))
}

/// Fresh code for `region` built from arbitrary entropy.
#[must_use]
pub fn generate_code_from_entropy(region: PolarRegion, entropy: u64) -> String {
    let word_index = u16::try_from(entropy % WORD_LIST.len() as u64).unwrap_or(0);
    let nn = u8::try_from((entropy >> 17) % 100).unwrap_or(0);
    encode_friendly(region, compose_seed(region, word_index, nn))
}

/// Seed from either a plain integer or a voyage code.
#[must_use]
pub fn parse_voyage_code(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    trimmed
        .parse::<u64>()
        .ok()
        .or_else(|| decode_to_seed(trimmed).map(|(_, seed)| seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrips_code() {
        let seed = 0xDEAD_BEEF_CAFE_BABE;
        let code = encode_friendly(PolarRegion::Antarctic, seed);
        let (region, new_seed) = decode_to_seed(&code).unwrap();
        assert_eq!(region, PolarRegion::Antarctic);
        assert_eq!(encode_friendly(region, new_seed), code);
    }

    #[test]
    fn ar_narwhal_42_is_stable() {
        let (region, seed) = decode_to_seed("AR-NARWHAL42").unwrap();
        assert_eq!(region, PolarRegion::Arctic);
        assert_eq!(encode_friendly(region, seed), "AR-NARWHAL42");
        assert_eq!(decode_to_seed(" ar-narwhal42 "), Some((region, seed)));
    }

    #[test]
    fn hemisphere_changes_the_seed() {
        let (_, arctic) = decode_to_seed("AR-PETREL07").unwrap();
        let (_, antarctic) = decode_to_seed("AN-PETREL07").unwrap();
        assert_ne!(arctic, antarctic);
        assert_eq!(arctic & 0xFFFF, antarctic & 0xFFFF);
    }

    #[test]
    fn rejects_malformed_codes() {
        assert!(decode_to_seed("XX-NARWHAL42").is_none());
        assert!(decode_to_seed("AR-NOTAWORD42").is_none());
        assert!(decode_to_seed("AR-NARWHALxx").is_none());
        assert!(decode_to_seed("AR-7").is_none());
        assert!(decode_to_seed("NARWHAL42").is_none());
    }

    #[test]
    fn parse_accepts_numbers_and_codes() {
        assert_eq!(parse_voyage_code("1234"), Some(1234));
        assert_eq!(
            parse_voyage_code("AN-ORCA11"),
            decode_to_seed("AN-ORCA11").map(|(_, seed)| seed)
        );
        assert!(parse_voyage_code("abc").is_none());
    }

    #[test]
    fn entropy_codes_decode() {
        for entropy in [0_u64, 1, 99, 0xFFFF_FFFF, u64::MAX] {
            let code = generate_code_from_entropy(PolarRegion::Arctic, entropy);
            assert!(code.starts_with("AR-"));
            assert!(decode_to_seed(&code).is_some(), "{code}");
        }
    }
}
