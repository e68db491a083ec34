//! TOML parser with helpful error messages

use std::path::Path;

use super::schema::ConfigFile;
use crate::error::{Error, Result};

/// Parse config.toml from disk.
pub fn parse_config_toml(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_config_toml_str(&content).map_err(|message| Error::ConfigParse {
        path: path.to_path_buf(),
        message,
    })
}

/// Parse config.toml content from string.
///
/// On failure returns a message pointing at the offending line.
pub fn parse_config_toml_str(content: &str) -> std::result::Result<ConfigFile, String> {
    let config: ConfigFile =
        toml::from_str(content).map_err(|e| enhance_toml_error(&e, content))?;

    if let Some(name) = config.dangling_default() {
        tracing::warn!(default = name, "Default server is not defined under [servers]");
    }

    Ok(config)
}

/// Serialize a configuration to a TOML string.
pub fn to_toml(config: &ConfigFile) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}

fn enhance_toml_error(error: &toml::de::Error, content: &str) -> String {
    let detail = error.message();

    match error.span() {
        Some(span) => {
            let line_num = line_of_offset(content, span.start);
            format!(
                "TOML parsing error at line {}:\n{}\n\nError: {}",
                line_num,
                get_line_context(content, line_num),
                detail
            )
        }
        None => format!("TOML parsing error: {detail}"),
    }
}

/// 1-based line number containing byte `offset`.
fn line_of_offset(content: &str, offset: usize) -> usize {
    let end = offset.min(content.len());
    content.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    lines
        .get(start..end)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_valid_config() {
        let toml = r#"
default = "tower"

[servers.tower]
url = "https://192.168.1.100"
api_key = "key-tower"

[servers.backup]
url = "https://192.168.1.101"
api_key = "key-backup"
"#;

        let config = parse_config_toml_str(toml).unwrap();
        assert_eq!(config.default.as_deref(), Some("tower"));
        assert_eq!(config.servers.len(), 2);
        assert_eq!(config.servers["backup"].url, "https://192.168.1.101");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_toml_str("").unwrap();
        assert!(config.default.is_none());
        assert!(config.servers.is_empty());
    }

    #[test]
    fn test_parse_default_without_servers() {
        let config = parse_config_toml_str(r#"default = "myserver""#).unwrap();
        assert_eq!(config.default.as_deref(), Some("myserver"));
        assert!(config.servers.is_empty());
    }

    #[test]
    fn test_parse_missing_api_key_errors() {
        let toml = r#"
[servers.tower]
url = "https://192.168.1.100"
"#;
        let err = parse_config_toml_str(toml).unwrap_err();
        assert!(err.contains("api_key"));
    }

    #[test]
    fn test_parse_invalid_toml_reports_line() {
        let toml = "default = \"tower\"\n[servers.tower\nurl = \"x\"\n";

        let err = parse_config_toml_str(toml).unwrap_err();
        assert!(err.contains("TOML parsing error at line"), "unexpected message: {err}");
        assert!(err.contains(">>>"));
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let mut original = ConfigFile::new();
        original.add_server("tower", "https://192.168.1.100", "key-tower");
        original.add_server("backup", "https://192.168.1.101", "key-backup");

        let toml_str = to_toml(&original).unwrap();
        let parsed = parse_config_toml_str(&toml_str).unwrap();

        assert_eq!(parsed, original);
    }

    #[test]
    fn test_to_toml_omits_unset_default() {
        let toml_str = to_toml(&ConfigFile::new()).unwrap();
        assert!(!toml_str.contains("default"));
    }

    #[test]
    fn test_parse_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[servers.tower]
url = "https://tower.local"
api_key = "abc"
"#
        )
        .unwrap();

        let config = parse_config_toml(temp_file.path()).unwrap();
        assert!(config.contains("tower"));
    }

    #[test]
    fn test_parse_malformed_file_is_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "servers = [unclosed").unwrap();

        let err = parse_config_toml(temp_file.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_parse_nonexistent_file_is_io_error() {
        let err = parse_config_toml(Path::new("/nonexistent/path/config.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigIo { .. }));
    }
}
