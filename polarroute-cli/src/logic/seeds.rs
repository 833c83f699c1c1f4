use anyhow::{Context, Result};
use polarroute_core::seed::WORD_LIST;
use polarroute_core::{PolarRegion, decode_to_seed, parse_voyage_code};
use std::collections::HashMap;

pub const DEFAULT_SEED: u64 = 1337;

/// Seed metadata used for route planning and scenario runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub code: Option<String>,
    pub region: Option<PolarRegion>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self {
            seed,
            code: None,
            region: None,
        }
    }

    #[must_use]
    pub const fn from_voyage_code(seed: u64, region: PolarRegion, code: String) -> Self {
        Self {
            seed,
            code: Some(code),
            region: Some(region),
        }
    }

    /// Hemisphere of the voyage code when it differs from `departure`.
    #[must_use]
    pub fn hemisphere_mismatch(&self, departure: PolarRegion) -> Option<PolarRegion> {
        self.region.filter(|region| *region != departure)
    }
}

/// Parse a single seed token: a plain integer or a voyage code.
pub fn parse_seed_token(token: &str) -> Result<SeedInfo> {
    let token = token.trim();
    if let Ok(value) = token.parse::<i64>()
        && value < 0
    {
        return Ok(SeedInfo::from_numeric(value.unsigned_abs()));
    }
    if let Some((region, seed)) = decode_to_seed(token) {
        return Ok(SeedInfo::from_voyage_code(
            seed,
            region,
            token.to_uppercase(),
        ));
    }
    parse_voyage_code(token)
        .map(SeedInfo::from_numeric)
        .with_context(|| format!("Unrecognized seed token: {token}"))
}

/// Resolve a list of CLI seed arguments into canonical seed metadata.
///
/// Supports literal integers, voyage codes, and the keyword `all` which
/// expands to every voyage code in both hemispheres.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut pending: Vec<SeedInfo> = Vec::new();
    let mut request_all = false;

    for token in tokens {
        if token.is_empty() {
            continue;
        }
        if token.eq_ignore_ascii_case("all") {
            request_all = true;
            continue;
        }
        pending.push(parse_seed_token(token)?);
    }

    if request_all {
        pending.extend(generate_all_voyage_seeds()?);
    }

    let mut deduped: Vec<SeedInfo> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();

    for info in pending {
        if let Some(&existing) = index.get(&info.seed) {
            if deduped[existing].code.is_none() && info.code.is_some() {
                deduped[existing] = info;
            }
        } else {
            index.insert(info.seed, deduped.len());
            deduped.push(info);
        }
    }

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }

    Ok(deduped)
}

fn generate_all_voyage_seeds() -> Result<Vec<SeedInfo>> {
    let mut seeds = Vec::with_capacity(WORD_LIST.len() * 100 * 2);
    for word in WORD_LIST {
        for suffix in 0..100 {
            for tag in ["AR", "AN"] {
                let code = format!("{tag}-{word}{suffix:02}");
                let (region, seed) = decode_to_seed(&code)
                    .with_context(|| format!("failed to parse voyage code: {code}"))?;
                seeds.push(SeedInfo::from_voyage_code(seed, region, code));
            }
        }
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_numeric_and_voyage_code() {
        let raw = vec![
            "42".to_string(),
            "-7".to_string(),
            "ar-narwhal42".to_string(),
        ];
        let seeds = resolve_seed_inputs(&raw).unwrap();
        assert!(seeds.iter().any(|s| s.seed == 42 && s.code.is_none()));
        assert!(seeds.iter().any(|s| s.seed == 7 && s.code.is_none()));
        assert!(seeds.iter().any(|s| {
            s.code.as_deref() == Some("AR-NARWHAL42") && s.region == Some(PolarRegion::Arctic)
        }));
    }

    #[test]
    fn empty_input_falls_back_to_default() {
        let seeds = resolve_seed_inputs(&[]).unwrap();
        assert_eq!(seeds, vec![SeedInfo::from_numeric(DEFAULT_SEED)]);
    }

    #[test]
    fn duplicates_prefer_the_coded_entry() {
        let (_, seed) = decode_to_seed("AN-ORCA05").unwrap();
        let raw = vec![seed.to_string(), "AN-ORCA05".to_string()];
        let seeds = resolve_seed_inputs(&raw).unwrap();
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].code.as_deref(), Some("AN-ORCA05"));
        assert_eq!(seeds[0].region, Some(PolarRegion::Antarctic));
    }

    #[test]
    fn expands_all_voyage_codes() {
        let seeds = resolve_seed_inputs(&["all".to_string()]).unwrap();
        assert_eq!(seeds.len(), WORD_LIST.len() * 100 * 2);
        assert!(seeds.iter().all(|s| s.code.is_some()));
    }

    #[test]
    fn hemisphere_mismatch_only_for_codes_from_the_other_pole() {
        let arctic = parse_seed_token("AR-WALRUS19").unwrap();
        assert_eq!(arctic.hemisphere_mismatch(PolarRegion::Arctic), None);
        assert_eq!(
            arctic.hemisphere_mismatch(PolarRegion::Antarctic),
            Some(PolarRegion::Arctic)
        );
        let numeric = parse_seed_token("99").unwrap();
        assert_eq!(numeric.hemisphere_mismatch(PolarRegion::Antarctic), None);
    }

    #[test]
    fn large_unsigned_seeds_parse() {
        let info = parse_seed_token(&u64::MAX.to_string()).unwrap();
        assert_eq!(info, SeedInfo::from_numeric(u64::MAX));
    }

    #[test]
    fn rejects_garbage() {
        assert!(resolve_seed_inputs(&["not-a-seed".to_string()]).is_err());
    }
}
