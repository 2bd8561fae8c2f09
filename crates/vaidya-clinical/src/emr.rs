//! EMR diagnosis coding types.

use serde::{Deserialize, Serialize};

/// Minimum length of a diagnosis submitted for coding.
pub const MIN_DIAGNOSIS_LEN: usize = 3;

/// A diagnosis submitted from an EMR form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmrRequest {
    pub diagnosis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
}

/// The codes assigned to a diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmrCoding {
    pub tm2_code: String,
    pub icd11_code: String,
    pub reasoning: String,
}

/// `TM2-<first three characters, uppercased>-<last four digits of millis>`.
///
/// The code is a local reference, not an authoritative TM2 code.
pub fn tm2_code(diagnosis: &str, unix_millis: i64) -> String {
    let prefix: String = diagnosis.chars().take(3).collect::<String>().to_uppercase();
    format!("TM2-{}-{:04}", prefix, unix_millis.rem_euclid(10_000))
}

/// The first standardized code, or `N/A` when the model returned none or a
/// blank first code.
pub fn icd11_code(standardized_codes: &[String]) -> String {
    standardized_codes
        .first()
        .filter(|code| !code.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::{icd11_code, tm2_code};

    #[test]
    fn tm2_code_uses_prefix_and_last_four_digits() {
        assert_eq!(tm2_code("Agnimandya", 1_718_000_004_821), "TM2-AGN-4821");
        assert_eq!(tm2_code("vata", 1_718_000_000_042), "TM2-VAT-0042");
    }

    #[test]
    fn icd11_code_falls_back_to_na() {
        assert_eq!(icd11_code(&[]), "N/A");
        assert_eq!(icd11_code(&["DA01".to_string(), "DA02".to_string()]), "DA01");
    }

    #[test]
    fn icd11_code_treats_blank_first_code_as_missing() {
        assert_eq!(icd11_code(&["".to_string(), "DA01".to_string()]), "N/A");
        assert_eq!(icd11_code(&["  ".to_string()]), "N/A");
    }
}
