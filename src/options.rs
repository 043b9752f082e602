use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::sheet::LayoutPolicy;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// (width, height) in points, portrait.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.2756, 841.8898),
            PageSize::Letter => (612.0, 792.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoAlignment {
    Left,
    #[default]
    Right,
}

/// Layout switches that distinguished the historical sheet variants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub include_candidate_signature_column: bool,
    pub include_logo: bool,
    pub logo_path: Option<PathBuf>,
    pub logo_alignment: LogoAlignment,
    pub footer_page_number: bool,
    pub page_size: PageSize,
    pub policy: LayoutPolicy,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            include_candidate_signature_column: true,
            include_logo: false,
            logo_path: None,
            logo_alignment: LogoAlignment::default(),
            footer_page_number: false,
            page_size: PageSize::default(),
            policy: LayoutPolicy::default(),
        }
    }
}

impl LayoutOptions {
    /// Read options from a JSON file; absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
        })?;
        serde_json::from_str(&text)
            .map_err(|e| Error::InvalidConfig(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let opts: LayoutOptions =
            serde_json::from_str(r#"{"footer_page_number": true, "policy": {"threshold": 10}}"#)
                .unwrap();
        assert!(opts.footer_page_number);
        assert!(opts.include_candidate_signature_column);
        assert_eq!(opts.page_size, PageSize::A4);
        assert_eq!(opts.policy.threshold, 10);
        assert_eq!(opts.policy.reduced_row_height, 26.0);
    }

    #[test]
    fn logo_alignment_reads_lowercase() {
        let opts: LayoutOptions =
            serde_json::from_str(r#"{"include_logo": true, "logo_alignment": "left"}"#).unwrap();
        assert_eq!(opts.logo_alignment, LogoAlignment::Left);
    }
}
