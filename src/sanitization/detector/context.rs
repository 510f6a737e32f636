//! Domain-context detection and false-positive filters

use crate::sanitization::config::Sensitivity;
use crate::sanitization::models::PhiCategory;

/// Clinical vocabulary that makes context-dependent patterns eligible at
/// medium sensitivity
const CLINICAL_KEYWORDS: &[&str] = &[
    "admitted",
    "allergy",
    "appointment",
    "claim",
    "clinic",
    "clinical",
    "diagnosed",
    "diagnosis",
    "discharge",
    "discharged",
    "doctor",
    "encounter",
    "hospital",
    "insurance",
    "medical",
    "medication",
    "nurse",
    "patient",
    "physician",
    "prescribed",
    "prescription",
    "surgery",
    "symptoms",
    "therapy",
    "treatment",
];

const CALENDAR_WORDS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Greeting and label words that never form part of a person name
const NAME_STOPWORDS: &[&str] = &[
    "attn", "contact", "dear", "doctor", "from", "hello", "hi", "name", "patient", "regards",
    "sincerely", "subject", "thanks", "to",
];

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty())
}

fn contains_word(text: &str, vocabulary: &[&str]) -> bool {
    words(text).any(|w| vocabulary.iter().any(|v| w.eq_ignore_ascii_case(v)))
}

/// True iff the text contains at least one clinical keyword as a whole word
pub fn has_domain_context(text: &str) -> bool {
    contains_word(text, CLINICAL_KEYWORDS)
}

/// Whether a match should be discarded
///
/// Every filter is monotone in `sensitivity`: a match kept at some level is
/// kept at every higher level.
pub fn is_false_positive(
    category: PhiCategory,
    matched: &str,
    has_context: bool,
    sensitivity: Sensitivity,
) -> bool {
    let relaxed = sensitivity == Sensitivity::High;
    match category {
        PhiCategory::Name => {
            contains_word(matched, NAME_STOPWORDS)
                || (!relaxed && !has_context && contains_word(matched, CALENDAR_WORDS))
        }
        PhiCategory::Ssn => !relaxed && !is_valid_ssn(matched),
        PhiCategory::CreditCard => !passes_luhn(matched),
        PhiCategory::Date | PhiCategory::Dob => !is_plausible_date(matched),
        PhiCategory::Phone => is_repeated_digit(matched),
        _ => false,
    }
}

fn digits(text: &str) -> Vec<u32> {
    text.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Area 000, 666 and 9xx, group 00 and serial 0000 are never issued
pub fn is_valid_ssn(text: &str) -> bool {
    let d = digits(text);
    if d.len() != 9 {
        return false;
    }
    let area = d[0] * 100 + d[1] * 10 + d[2];
    let group = d[3] * 10 + d[4];
    let serial = d[5..].iter().fold(0, |acc, x| acc * 10 + x);
    area != 0 && area != 666 && area < 900 && group != 0 && serial != 0
}

/// Luhn checksum over the digits of `text`
pub fn passes_luhn(text: &str) -> bool {
    let d = digits(text);
    if d.len() < 13 || d.len() > 19 {
        return false;
    }
    let sum: u32 = d
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &x)| {
            if i % 2 == 1 {
                let doubled = x * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                x
            }
        })
        .sum();
    sum % 10 == 0
}

/// Rejects month/day values no calendar has
///
/// Accepts `M/D/Y`, `M-D-Y` and `YYYY-MM-DD`; anything else is left alone.
fn is_plausible_date(text: &str) -> bool {
    let parts: Vec<u32> = text
        .split(['/', '-'])
        .filter_map(|p| p.trim().parse().ok())
        .collect();
    if parts.len() != 3 {
        return true;
    }
    let year_first = text.trim().split(['/', '-']).next().map(str::len) == Some(4);
    let (month, day) = if year_first {
        (parts[1], parts[2])
    } else {
        (parts[0], parts[1])
    };
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

fn is_repeated_digit(text: &str) -> bool {
    let d = digits(text);
    match d.first() {
        Some(first) => d.iter().all(|x| x == first),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_domain_context() {
        assert!(has_domain_context("The PATIENT was seen today"));
        assert!(has_domain_context("claim #4 denied"));
        assert!(!has_domain_context("outpatients are welcome"));
        assert!(!has_domain_context("Contact John Smith tomorrow"));
    }

    #[test_case("123-45-6789", true; "valid")]
    #[test_case("000-12-3456", false; "zero area")]
    #[test_case("666-12-3456", false; "area 666")]
    #[test_case("912-12-3456", false; "area 9xx")]
    #[test_case("123-00-4567", false; "zero group")]
    #[test_case("123-45-0000", false; "zero serial")]
    #[test_case("12345", false; "too short")]
    fn test_ssn_validity(ssn: &str, valid: bool) {
        assert_eq!(is_valid_ssn(ssn), valid);
    }

    #[test_case("4111111111111111", true; "visa test number")]
    #[test_case("4111 1111 1111 1111", true; "spaced")]
    #[test_case("4111111111111112", false; "bad checksum")]
    #[test_case("411111", false; "too short")]
    fn test_luhn(number: &str, valid: bool) {
        assert_eq!(passes_luhn(number), valid);
    }

    #[test]
    fn test_name_filters() {
        assert!(is_false_positive(
            PhiCategory::Name,
            "Contact John",
            true,
            Sensitivity::High
        ));
        assert!(is_false_positive(
            PhiCategory::Name,
            "Monday Morning",
            false,
            Sensitivity::Medium
        ));
        assert!(!is_false_positive(
            PhiCategory::Name,
            "Monday Morning",
            false,
            Sensitivity::High
        ));
        assert!(!is_false_positive(
            PhiCategory::Name,
            "April Jones",
            true,
            Sensitivity::Medium
        ));
        assert!(!is_false_positive(
            PhiCategory::Name,
            "John Smith",
            false,
            Sensitivity::Low
        ));
    }

    #[test]
    fn test_ssn_filter_relaxed_at_high() {
        assert!(is_false_positive(PhiCategory::Ssn, "000-12-3456", false, Sensitivity::Medium));
        assert!(!is_false_positive(PhiCategory::Ssn, "000-12-3456", false, Sensitivity::High));
    }

    #[test_case("12/25/1980", false; "valid us date")]
    #[test_case("1980-12-25", false; "valid iso date")]
    #[test_case("13/25/1980", true; "month 13")]
    #[test_case("12/32/1980", true; "day 32")]
    #[test_case("1980-00-10", true; "month zero")]
    fn test_date_filter(date: &str, rejected: bool) {
        assert_eq!(
            is_false_positive(PhiCategory::Date, date, true, Sensitivity::High),
            rejected
        );
    }

    #[test]
    fn test_repeated_digit_phone() {
        assert!(is_false_positive(PhiCategory::Phone, "555-555-5555", false, Sensitivity::High));
        assert!(!is_false_positive(PhiCategory::Phone, "555-123-4567", false, Sensitivity::Low));
    }

    #[test]
    fn test_filters_are_monotone() {
        let samples = [
            (PhiCategory::Name, "Friday Night"),
            (PhiCategory::Name, "Dear Sir"),
            (PhiCategory::Ssn, "999-99-9999"),
            (PhiCategory::CreditCard, "4111111111111112"),
            (PhiCategory::Date, "02/30/2020"),
        ];
        for (category, text) in samples {
            for ctx in [false, true] {
                let low = is_false_positive(category, text, ctx, Sensitivity::Low);
                let medium = is_false_positive(category, text, ctx, Sensitivity::Medium);
                let high = is_false_positive(category, text, ctx, Sensitivity::High);
                assert!(!high || medium, "{category} {text}");
                assert!(!medium || low, "{category} {text}");
            }
        }
    }
}
