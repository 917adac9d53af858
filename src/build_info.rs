//! Build identity
//!
//! build.rs stamps each compile with a number and timestamp. They show up in
//! the startup banner, the `smartfood_status` tool and the User-Agent sent to
//! Open Food Facts.

use serde::Serialize;

/// 0 when built without build.rs (e.g. by an IDE analyzer)
pub const BUILD_NUMBER: u64 = match option_env!("SMARTFOOD_BUILD_NUMBER") {
    Some(s) => match parse_u64(s) {
        Some(n) => n,
        None => 0,
    },
    None => 0,
};

pub const BUILD_TIMESTAMP: &str = match option_env!("SMARTFOOD_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

const fn parse_u64(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let mut result: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < b'0' || b > b'9' {
            return None;
        }
        result = result * 10 + (b - b'0') as u64;
        i += 1;
    }
    Some(result)
}

/// Reported by `smartfood_status`
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
        }
    }
}

/// User-Agent for food database requests
pub fn user_agent() -> String {
    format!("{}/{} (build {})", NAME, VERSION, BUILD_NUMBER)
}

/// Banner on stderr; stdout is reserved for the MCP transport
pub fn print_startup_banner() {
    let info = BuildInfo::current();
    eprintln!("===============================================");
    eprintln!("  SmartFood barcode pantry");
    eprintln!("  Version: {} | Build: {}", info.version, info.build_number);
    eprintln!("  Compiled: {}", info.build_timestamp);
    eprintln!("===============================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u64() {
        assert_eq!(parse_u64("42"), Some(42));
        assert_eq!(parse_u64("0"), Some(0));
        assert_eq!(parse_u64(""), None);
        assert_eq!(parse_u64("4x2"), None);
    }

    #[test]
    fn test_user_agent_names_build() {
        let ua = user_agent();
        assert!(ua.starts_with("smartfood/"));
        assert!(ua.ends_with(&format!("(build {})", BUILD_NUMBER)));
    }
}
