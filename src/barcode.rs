//! Scanned barcodes
//!
//! Decoding happens in the camera layer. This type only cleans up the decoded
//! text and records which symbology it most likely came from.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BarcodeError {
    #[error("Barcode is empty")]
    Empty,
}

/// Symbologies accepted by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbology {
    Ean8,
    Ean13,
    Qr,
}

impl Symbology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbology::Ean8 => "ean8",
            Symbology::Ean13 => "ean13",
            Symbology::Qr => "qr",
        }
    }
}

/// Decoded barcode text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Barcode {
    code: String,
    symbology: Symbology,
}

impl Barcode {
    /// Strip surrounding whitespace, BOM and control characters
    pub fn parse(raw: &str) -> Result<Self, BarcodeError> {
        let code = raw
            .trim_matches(|c: char| c.is_whitespace() || c.is_control() || c == '\u{FEFF}')
            .to_string();
        if code.is_empty() {
            return Err(BarcodeError::Empty);
        }

        let all_digits = code.bytes().all(|b| b.is_ascii_digit());
        let symbology = match code.len() {
            8 if all_digits => Symbology::Ean8,
            13 if all_digits => Symbology::Ean13,
            _ => Symbology::Qr,
        };

        Ok(Self { code, symbology })
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn symbology(&self) -> Symbology {
        self.symbology
    }

    /// Whether the EAN check digit matches. Always false for QR text.
    pub fn has_valid_check_digit(&self) -> bool {
        if self.symbology == Symbology::Qr {
            return false;
        }
        let digits: Vec<u32> = self.code.bytes().map(|b| (b - b'0') as u32).collect();
        let (body, check) = digits.split_at(digits.len() - 1);
        // Weights alternate 3,1,... starting from the digit next to the check digit
        let sum: u32 = body
            .iter()
            .rev()
            .enumerate()
            .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
            .sum();
        (10 - sum % 10) % 10 == check[0]
    }
}

impl std::fmt::Display for Barcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_symbologies() {
        assert_eq!(Barcode::parse("96385074").unwrap().symbology(), Symbology::Ean8);
        assert_eq!(Barcode::parse("3017620422003").unwrap().symbology(), Symbology::Ean13);
        assert_eq!(
            Barcode::parse("https://example.com/p/1").unwrap().symbology(),
            Symbology::Qr
        );
        assert_eq!(Barcode::parse("12345").unwrap().symbology(), Symbology::Qr);
    }

    #[test]
    fn test_trims_scanner_noise() {
        let code = Barcode::parse("\u{FEFF} 3017620422003\r\n").unwrap();
        assert_eq!(code.as_str(), "3017620422003");
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(Barcode::parse("  \n"), Err(BarcodeError::Empty));
    }

    #[test]
    fn test_check_digit() {
        assert!(Barcode::parse("3017620422003").unwrap().has_valid_check_digit());
        assert!(Barcode::parse("96385074").unwrap().has_valid_check_digit());
        assert!(!Barcode::parse("3017620422004").unwrap().has_valid_check_digit());
        assert!(!Barcode::parse("hello").unwrap().has_valid_check_digit());
    }
}
