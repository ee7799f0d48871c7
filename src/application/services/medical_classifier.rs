use crate::domain::{DocumentTypeHint, MedicalInfo};

pub const MEDICAL_KEYWORDS: &[&str] = &[
    "clinical",
    "medical",
    "patient",
    "treatment",
    "diagnosis",
    "therapeutic",
    "pharmaceutical",
    "fda",
    "trial",
    "study",
    "bmj",
    "nejm",
    "pubmed",
    "medline",
    "clinical trial",
    "randomized",
    "systematic review",
    "meta-analysis",
    "medical device",
    "drug",
    "therapy",
    "intervention",
];

pub const REGULATORY_KEYWORDS: &[&str] = &[
    "510(k)",
    "pma",
    "premarket",
    "fda guidance",
    "ce mark",
    "regulatory",
    "submission",
    "clearance",
    "approval",
    "device classification",
    "quality system",
    "gmp",
    "gcp",
];

const MAX_REPORTED_KEYWORDS: usize = 10;

const TYPE_HINT_RULES: &[(DocumentTypeHint, &[&str])] = &[
    (DocumentTypeHint::ClinicalTrial, &["clinical trial", "randomized"]),
    (DocumentTypeHint::Regulatory, &["fda", "510(k)", "pma"]),
    (DocumentTypeHint::JournalArticle, &["bmj", "nejm"]),
    (DocumentTypeHint::Review, &["systematic review", "meta-analysis"]),
];

/// Scores sampled document text against the medical and regulatory keyword
/// lists. Scores are raw substring occurrence counts, so "clinical trial"
/// also counts towards "clinical" and "trial".
pub fn classify_medical_content(sample: &str) -> MedicalInfo {
    let sample = sample.to_lowercase();

    let (medical_score, found_medical) = score_keywords(&sample, MEDICAL_KEYWORDS);
    let (regulatory_score, found_regulatory) = score_keywords(&sample, REGULATORY_KEYWORDS);

    let document_type_hints = TYPE_HINT_RULES
        .iter()
        .filter(|(_, needles)| needles.iter().any(|n| sample.contains(n)))
        .map(|(hint, _)| *hint)
        .collect();

    MedicalInfo {
        is_medical_content: Some(medical_score > 0 || regulatory_score > 0),
        medical_score,
        regulatory_score,
        found_medical_keywords: found_medical
            .into_iter()
            .take(MAX_REPORTED_KEYWORDS)
            .map(str::to_string)
            .collect(),
        found_regulatory_keywords: found_regulatory
            .into_iter()
            .take(MAX_REPORTED_KEYWORDS)
            .map(str::to_string)
            .collect(),
        document_type_hints,
        sample_length: sample.chars().count(),
        validation_error: None,
    }
}

fn score_keywords<'k>(sample: &str, keywords: &[&'k str]) -> (usize, Vec<&'k str>) {
    let mut score = 0;
    let mut found = Vec::new();

    for keyword in keywords {
        let occurrences = sample.matches(keyword).count();
        if occurrences > 0 {
            score += occurrences;
            found.push(*keyword);
        }
    }

    (score, found)
}
