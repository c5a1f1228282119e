use log::warn;

mod loader;
mod timestamp;

pub(crate) use loader::{Mapping, YamlValue};
pub(crate) use timestamp::Timestamp;

pub(crate) const DELIMITER: &str = "---";

/// Extracts the YAML block at the head of `content`.
///
/// Never fails: a missing block, a malformed document or a non-mapping root all yield an
/// empty mapping. Parse errors are logged.
pub(crate) fn parse_front_matter(content: &str) -> Mapping {
    if !content.starts_with(DELIMITER) {
        return Mapping::new();
    }
    let parts: Vec<&str> = content.splitn(3, DELIMITER).collect();
    if parts.len() < 3 {
        return Mapping::new();
    }

    match loader::load(parts[1]) {
        Ok(YamlValue::Map(m)) => m,
        Ok(YamlValue::Null) => Mapping::new(),
        Ok(other) => {
            warn!("Front matter is not a mapping, ignoring: {other:?}");
            Mapping::new()
        }
        Err(e) => {
            warn!("YAML parse error: {e}");
            Mapping::new()
        }
    }
}
