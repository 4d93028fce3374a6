use std::io::IsTerminal;

use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub use_color: bool,
}

pub fn detect_color(color_flag: bool) -> bool {
    if !color_flag {
        return false;
    }
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_disabled_by_flag() {
        assert!(!detect_color(false));
    }

    #[test]
    fn to_json_compact_and_pretty() {
        let value = serde_json::json!({"status_code": 200});
        assert_eq!(to_json(&value, false).unwrap(), r#"{"status_code":200}"#);
        assert!(to_json(&value, true).unwrap().contains('\n'));
    }
}
