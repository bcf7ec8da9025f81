use crate::interactions::SynonymTable;
use crate::models::{ContraindicationFinding, Severity};

use super::messages::{
    MessageTemplates, ALLERGY_FINDING_TYPE, ALLERGY_RECOMMENDATION, ALLERGY_SOURCE,
    CONDITION_RECOMMENDATION, CONDITION_SOURCE,
};

/// Condition keyword and the drug name fragments it rules out.
#[derive(Debug)]
pub struct ContraindicationRule {
    pub condition_keyword: &'static str,
    pub drug_substrings: &'static [&'static str],
}

const PREGNANCY_DRUGS: &[&str] = &["methotrexate", "isotretinoin", "warfarin", "valproic acid"];
const RENAL_DRUGS: &[&str] = &["metformin", "nsaid", "lithium"];
const HEPATIC_DRUGS: &[&str] = &["acetaminophen", "paracetamol", "statin"];

/// Evaluated in order. A condition matching several keywords yields one
/// finding per matching rule.
pub static CONDITION_RULES: &[ContraindicationRule] = &[
    ContraindicationRule { condition_keyword: "pregnancy", drug_substrings: PREGNANCY_DRUGS },
    ContraindicationRule { condition_keyword: "pregnant", drug_substrings: PREGNANCY_DRUGS },
    ContraindicationRule { condition_keyword: "gravidez", drug_substrings: PREGNANCY_DRUGS },
    ContraindicationRule { condition_keyword: "gestação", drug_substrings: PREGNANCY_DRUGS },
    ContraindicationRule { condition_keyword: "insuficiência renal", drug_substrings: RENAL_DRUGS },
    ContraindicationRule { condition_keyword: "renal", drug_substrings: RENAL_DRUGS },
    ContraindicationRule { condition_keyword: "kidney", drug_substrings: RENAL_DRUGS },
    ContraindicationRule { condition_keyword: "insuficiência hepática", drug_substrings: HEPATIC_DRUGS },
    ContraindicationRule { condition_keyword: "hepatic", drug_substrings: HEPATIC_DRUGS },
    ContraindicationRule { condition_keyword: "hepática", drug_substrings: HEPATIC_DRUGS },
    ContraindicationRule { condition_keyword: "liver", drug_substrings: HEPATIC_DRUGS },
];

/// Drug families with known cross-reactive allergies.
const DRUG_FAMILIES: &[&[&str]] = &[
    // Penicillins
    &[
        "penicillin",
        "amoxicillin",
        "ampicillin",
        "piperacillin",
        "oxacillin",
        "nafcillin",
        "dicloxacillin",
        "flucloxacillin",
    ],
    // Cephalosporins
    &[
        "cephalexin",
        "cefazolin",
        "ceftriaxone",
        "cefuroxime",
        "cefixime",
        "cefpodoxime",
        "ceftazidime",
    ],
    // Sulfonamides
    &[
        "sulfamethoxazole",
        "sulfasalazine",
        "sulfadiazine",
        "sulfisoxazole",
    ],
    // NSAIDs
    &[
        "ibuprofen",
        "naproxen",
        "diclofenac",
        "indomethacin",
        "piroxicam",
        "meloxicam",
        "celecoxib",
        "acetylsalicylic acid",
    ],
    // Statins
    &[
        "atorvastatin",
        "rosuvastatin",
        "simvastatin",
        "pravastatin",
        "lovastatin",
        "fluvastatin",
        "pitavastatin",
    ],
    // ACE inhibitors
    &[
        "lisinopril",
        "enalapril",
        "ramipril",
        "captopril",
        "benazepril",
        "fosinopril",
        "quinapril",
        "perindopril",
    ],
    // Opioids
    &[
        "morphine",
        "codeine",
        "hydrocodone",
        "oxycodone",
        "tramadol",
        "fentanyl",
        "methadone",
        "hydromorphone",
    ],
    // Fluoroquinolones
    &[
        "ciprofloxacin",
        "levofloxacin",
        "moxifloxacin",
        "norfloxacin",
        "ofloxacin",
    ],
    // Macrolides
    &["azithromycin", "clarithromycin", "erythromycin"],
    // Tetracyclines
    &["tetracycline", "doxycycline", "minocycline"],
];

/// Whether two normalized, non-empty names fall in the same cross-allergy family.
pub fn is_same_drug_family(allergen: &str, drug: &str) -> bool {
    let in_family = |family: &[&str], name: &str| {
        family
            .iter()
            .any(|&member| name.contains(member) || member.contains(name))
    };
    DRUG_FAMILIES
        .iter()
        .any(|family| in_family(family, allergen) && in_family(family, drug))
}

/// Allergy findings first, then condition findings. Empty inputs give an empty result.
pub fn analyze<C, A>(
    drug_name: &str,
    conditions: &[C],
    allergies: &[A],
    synonyms: &SynonymTable,
) -> Vec<ContraindicationFinding>
where
    C: AsRef<str>,
    A: AsRef<str>,
{
    let drug = synonyms.normalize(drug_name);
    let mut findings = check_allergies(&drug, allergies, synonyms);
    findings.extend(check_conditions(&drug, conditions));
    findings
}

fn check_allergies<A: AsRef<str>>(
    drug: &str,
    allergies: &[A],
    synonyms: &SynonymTable,
) -> Vec<ContraindicationFinding> {
    let mut findings = Vec::new();
    if drug.is_empty() {
        return findings;
    }

    for allergy in allergies {
        let allergy = allergy.as_ref().trim();
        let allergen = synonyms.normalize(allergy);
        if allergen.is_empty() {
            continue;
        }

        let description = if allergen.contains(drug) || drug.contains(allergen.as_str()) {
            MessageTemplates::allergy(allergy)
        } else if is_same_drug_family(&allergen, drug) {
            MessageTemplates::allergy_cross_reactive(allergy, drug)
        } else {
            continue;
        };

        findings.push(ContraindicationFinding {
            finding_type: ALLERGY_FINDING_TYPE.to_string(),
            description,
            severity: Severity::Critical,
            source: ALLERGY_SOURCE.to_string(),
            recommendation: ALLERGY_RECOMMENDATION.to_string(),
        });
    }

    findings
}

fn check_conditions<C: AsRef<str>>(drug: &str, conditions: &[C]) -> Vec<ContraindicationFinding> {
    let mut findings = Vec::new();

    for condition in conditions {
        let condition = condition.as_ref().trim();
        let lower = condition.to_lowercase();
        if lower.is_empty() {
            continue;
        }

        for rule in CONDITION_RULES
            .iter()
            .filter(|rule| lower.contains(rule.condition_keyword))
        {
            for contra_drug in rule
                .drug_substrings
                .iter()
                .filter(|fragment| drug.contains(*fragment))
            {
                findings.push(ContraindicationFinding {
                    finding_type: MessageTemplates::condition_type(condition),
                    description: MessageTemplates::condition(contra_drug, condition),
                    severity: Severity::High,
                    source: CONDITION_SOURCE.to_string(),
                    recommendation: CONDITION_RECOMMENDATION.to_string(),
                });
            }
        }
    }

    findings
}
