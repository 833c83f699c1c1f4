pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Unique scratch path under the system temp directory.
#[cfg(test)]
pub fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "polarroute-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn temp_paths_are_unique_per_label() {
        assert_ne!(temp_path("a"), temp_path("b"));
    }
}
