//! PHI category model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of regulated identifier categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhiCategory {
    /// Social Security Numbers
    Ssn,
    /// Email addresses
    Email,
    /// Telephone numbers
    Phone,
    /// Dates of birth
    Dob,
    /// Person names
    Name,
    /// Medical Record Numbers
    Mrn,
    /// Street addresses
    Address,
    /// Payment card numbers
    CreditCard,
    /// Insurance policy / member numbers
    PolicyNumber,
    /// Account numbers
    AccountNumber,
    /// Certificate / license numbers
    LicenseNumber,
    /// Ages
    Age,
    /// Dates other than birth dates
    Date,
    /// Web URLs
    Url,
    /// IP addresses
    IpAddress,
    /// Anything the structural detectors flag without a more specific key
    Other,
}

/// Key-fragment keywords in sniffing order; the first hit wins.
const KEY_SNIFF_TABLE: &[(&[&str], PhiCategory)] = &[
    (&["ssn", "social"], PhiCategory::Ssn),
    (&["dob", "birth"], PhiCategory::Dob),
    (&["mrn", "patient"], PhiCategory::Mrn),
    (&["email"], PhiCategory::Email),
    (&["phone"], PhiCategory::Phone),
    (&["address"], PhiCategory::Address),
    (&["card"], PhiCategory::CreditCard),
    (&["policy", "insurance"], PhiCategory::PolicyNumber),
    (&["account"], PhiCategory::AccountNumber),
    (&["license", "licence"], PhiCategory::LicenseNumber),
];

impl PhiCategory {
    /// All categories, in declaration order
    pub const ALL: [PhiCategory; 16] = [
        Self::Ssn,
        Self::Email,
        Self::Phone,
        Self::Dob,
        Self::Name,
        Self::Mrn,
        Self::Address,
        Self::CreditCard,
        Self::PolicyNumber,
        Self::AccountNumber,
        Self::LicenseNumber,
        Self::Age,
        Self::Date,
        Self::Url,
        Self::IpAddress,
        Self::Other,
    ];

    /// Upper-case label used in redaction markers
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ssn => "SSN",
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::Dob => "DOB",
            Self::Name => "NAME",
            Self::Mrn => "MRN",
            Self::Address => "ADDRESS",
            Self::CreditCard => "CREDIT_CARD",
            Self::PolicyNumber => "POLICY_NUMBER",
            Self::AccountNumber => "ACCOUNT_NUMBER",
            Self::LicenseNumber => "LICENSE_NUMBER",
            Self::Age => "AGE",
            Self::Date => "DATE",
            Self::Url => "URL",
            Self::IpAddress => "IP_ADDRESS",
            Self::Other => "OTHER",
        }
    }

    /// Categorize a captured key fragment (`patient_ssn`, `"homePhone"`, ...)
    ///
    /// Matching is a case-insensitive substring search over the keyword table;
    /// keys that hit nothing fall back to [`PhiCategory::Other`].
    pub fn sniff_key(fragment: &str) -> Self {
        let lowered = fragment.to_ascii_lowercase();
        KEY_SNIFF_TABLE
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|kw| lowered.contains(kw)))
            .map(|(_, category)| *category)
            .unwrap_or(Self::Other)
    }
}

impl fmt::Display for PhiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PhiCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(['-', ' '], "_").as_str() {
            "SSN" | "SOCIAL_SECURITY_NUMBER" => Ok(Self::Ssn),
            "EMAIL" => Ok(Self::Email),
            "PHONE" | "TELEPHONE" => Ok(Self::Phone),
            "DOB" | "DATE_OF_BIRTH" => Ok(Self::Dob),
            "NAME" | "PERSON" => Ok(Self::Name),
            "MRN" | "MEDICAL_RECORD_NUMBER" => Ok(Self::Mrn),
            "ADDRESS" => Ok(Self::Address),
            "CREDIT_CARD" | "CARD" => Ok(Self::CreditCard),
            "POLICY_NUMBER" | "POLICY" => Ok(Self::PolicyNumber),
            "ACCOUNT_NUMBER" | "ACCOUNT" => Ok(Self::AccountNumber),
            "LICENSE_NUMBER" | "LICENSE" => Ok(Self::LicenseNumber),
            "AGE" => Ok(Self::Age),
            "DATE" => Ok(Self::Date),
            "URL" => Ok(Self::Url),
            "IP_ADDRESS" | "IP" => Ok(Self::IpAddress),
            "OTHER" => Ok(Self::Other),
            _ => Err(format!("Unknown PHI category: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("ssn", PhiCategory::Ssn; "plain ssn")]
    #[test_case("patient_social_sec", PhiCategory::Ssn; "ssn wins over patient")]
    #[test_case("DateOfBirth", PhiCategory::Dob; "camel case birth")]
    #[test_case("patient_email", PhiCategory::Mrn; "patient precedes email")]
    #[test_case("homePhone", PhiCategory::Phone; "phone")]
    #[test_case("billing_address", PhiCategory::Address; "address")]
    #[test_case("card_no", PhiCategory::CreditCard; "card")]
    #[test_case("insurance_id", PhiCategory::PolicyNumber; "insurance")]
    #[test_case("account", PhiCategory::AccountNumber; "account")]
    #[test_case("drivers_licence", PhiCategory::LicenseNumber; "british spelling")]
    #[test_case("first_name", PhiCategory::Other; "fallback")]
    fn test_sniff_key(fragment: &str, expected: PhiCategory) {
        assert_eq!(PhiCategory::sniff_key(fragment), expected);
    }

    #[test]
    fn test_serde_names_match_labels() {
        for category in PhiCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.label()));
        }
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("credit-card".parse::<PhiCategory>(), Ok(PhiCategory::CreditCard));
        assert_eq!("ip".parse::<PhiCategory>(), Ok(PhiCategory::IpAddress));
        assert_eq!("Person".parse::<PhiCategory>(), Ok(PhiCategory::Name));
        assert!("fax".parse::<PhiCategory>().is_err());
    }
}
