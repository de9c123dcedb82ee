use an_storage::DAY_MS;
use std::path::PathBuf;

pub(crate) const DEFAULT_DATA_PATH: &str = "data/archetypes.json";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EnricherConfig {
    pub(crate) data_path: PathBuf,
    pub(crate) output_path: PathBuf,
    /// RocksDB directory for card-database responses; no caching when unset.
    pub(crate) cache_dir: Option<String>,
    pub(crate) cache_ttl_ms: u64,
}

impl EnricherConfig {
    pub(crate) fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads `ARCHETYPE_DATA`, `ARCHETYPE_OUTPUT`, `ENRICH_CACHE_DIR` and
    /// `ENRICH_CACHE_TTL_HOURS`. The output defaults to rewriting the input.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_path = PathBuf::from(
            lookup("ARCHETYPE_DATA").unwrap_or_else(|| DEFAULT_DATA_PATH.to_owned()),
        );
        let output_path = lookup("ARCHETYPE_OUTPUT")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_path.clone());
        let cache_dir = lookup("ENRICH_CACHE_DIR").filter(|dir| !dir.trim().is_empty());
        let cache_ttl_ms = lookup("ENRICH_CACHE_TTL_HOURS")
            .and_then(|hours| hours.trim().parse::<u64>().ok())
            .map(|hours| hours * 60 * 60 * 1000)
            .unwrap_or(DAY_MS);

        Self {
            data_path,
            output_path,
            cache_dir,
            cache_ttl_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_rewrite_the_input_file() {
        let config = EnricherConfig::from_lookup(|_| None);
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(config.output_path, config.data_path);
        assert_eq!(config.cache_dir, None);
        assert_eq!(config.cache_ttl_ms, DAY_MS);
    }

    #[test]
    fn environment_overrides_are_applied() {
        let vars: HashMap<&str, &str> = [
            ("ARCHETYPE_DATA", "in.json"),
            ("ARCHETYPE_OUTPUT", "out.json"),
            ("ENRICH_CACHE_DIR", "/tmp/enrich-cache"),
            ("ENRICH_CACHE_TTL_HOURS", "6"),
        ]
        .into();
        let config = EnricherConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_owned()));
        assert_eq!(config.output_path, PathBuf::from("out.json"));
        assert_eq!(config.cache_dir.as_deref(), Some("/tmp/enrich-cache"));
        assert_eq!(config.cache_ttl_ms, 6 * 60 * 60 * 1000);
    }
}
