use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialize a piped scenario from stdin.
///
/// Returns None when stdin is a terminal or nothing was piped. A document
/// opening with `{` is read as JSON, anything else as YAML.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(
    buffer: &str,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    log::debug!("read {} bytes of input from stdin", trimmed.len());
    if trimmed.starts_with('{') {
        Ok(Some(serde_json::from_str(trimmed)?))
    } else {
        Ok(Some(serde_yaml::from_str(trimmed)?))
    }
}
