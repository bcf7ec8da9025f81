//! Built-in adverse reaction knowledge base, keyed by drug class.

use crate::models::AdverseReactionProfile;

#[derive(Debug)]
pub struct ReactionEntry {
    pub reaction: &'static str,
    pub description: &'static str,
    pub frequency: &'static str,
    pub severity: &'static str,
    pub risk_factors: &'static [&'static str],
}

impl ReactionEntry {
    pub fn to_profile(&self) -> AdverseReactionProfile {
        AdverseReactionProfile {
            reaction: self.reaction.to_string(),
            description: self.description.to_string(),
            frequency: self.frequency.to_string(),
            severity: self.severity.to_string(),
            risk_factors: self.risk_factors.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A drug class: name fragments that identify members, and their reactions.
#[derive(Debug)]
pub struct DrugClass {
    pub name: &'static str,
    pub members: &'static [&'static str],
    pub reactions: &'static [ReactionEntry],
}

impl DrugClass {
    pub fn matches(&self, normalized_drug: &str) -> bool {
        self.members.iter().any(|m| normalized_drug.contains(m))
    }
}

/// Checked in order; the first class whose member list matches wins.
pub static DRUG_CLASSES: &[DrugClass] = &[
    DrugClass {
        name: "NSAID",
        members: &[
            "ibuprofen",
            "ibuprofeno",
            "diclofenac",
            "diclofenaco",
            "naproxen",
            "naproxeno",
            "nimesulide",
            "ketoprofen",
            "cetoprofeno",
            "meloxicam",
            "piroxicam",
            "indomethacin",
            "aspirin",
            "acetylsalicylic",
            "nsaid",
        ],
        reactions: &[
            ReactionEntry {
                reaction: "Gastrointestinal irritation",
                description: "Gastritis, peptic ulcer, gastrointestinal bleeding",
                frequency: "Common (1-10%)",
                severity: "Moderate to severe",
                risk_factors: &["prolonged use", "history of ulcer", "concurrent anticoagulant use"],
            },
            ReactionEntry {
                reaction: "Renal dysfunction",
                description: "Reduced glomerular filtration, fluid retention",
                frequency: "Uncommon (0.1-1%)",
                severity: "Moderate",
                risk_factors: &["elderly", "dehydration", "prior renal insufficiency"],
            },
            ReactionEntry {
                reaction: "Blood pressure increase",
                description: "Sodium and water retention raising blood pressure",
                frequency: "Common (1-10%)",
                severity: "Moderate",
                risk_factors: &["hypertension", "heart failure"],
            },
        ],
    },
    DrugClass {
        name: "Anticoagulant",
        members: &["warfarin", "varfarina", "marevan", "coumadin"],
        reactions: &[
            ReactionEntry {
                reaction: "Bleeding",
                description: "Minor to major haemorrhage, including intracranial bleeding",
                frequency: "Common (1-10%)",
                severity: "Severe",
                risk_factors: &["elevated INR", "trauma", "recent surgery", "age>65"],
            },
            ReactionEntry {
                reaction: "Skin necrosis",
                description: "Necrosis of skin and subcutaneous tissue early in therapy",
                frequency: "Rare (<0.1%)",
                severity: "Severe",
                risk_factors: &["protein C deficiency", "high loading doses"],
            },
        ],
    },
    DrugClass {
        name: "Biguanide",
        members: &["metformin", "metformina", "glifage"],
        reactions: &[
            ReactionEntry {
                reaction: "Gastrointestinal disturbances",
                description: "Nausea, diarrhoea, abdominal discomfort, metallic taste",
                frequency: "Very common (>10%)",
                severity: "Mild to moderate",
                risk_factors: &["treatment initiation", "high doses"],
            },
            ReactionEntry {
                reaction: "Lactic acidosis",
                description: "Accumulation of lactic acid in the blood",
                frequency: "Very rare (<0.01%)",
                severity: "Critical",
                risk_factors: &[
                    "renal insufficiency",
                    "hepatic insufficiency",
                    "dehydration",
                    "sepsis",
                ],
            },
            ReactionEntry {
                reaction: "Vitamin B12 deficiency",
                description: "Reduced B12 absorption with long-term use",
                frequency: "Common (1-10%)",
                severity: "Mild",
                risk_factors: &["long-term use", "vegetarian diet"],
            },
        ],
    },
    DrugClass {
        name: "Statin",
        members: &["statin", "estatina", "sinvastatina", "atorvastatina", "rosuvastatina"],
        reactions: &[
            ReactionEntry {
                reaction: "Myalgia",
                description: "Muscle pain and weakness",
                frequency: "Common (1-10%)",
                severity: "Mild to moderate",
                risk_factors: &["high doses", "drug interactions", "elderly"],
            },
            ReactionEntry {
                reaction: "Rhabdomyolysis",
                description: "Breakdown of muscle tissue with risk of renal failure",
                frequency: "Very rare (<0.01%)",
                severity: "Critical",
                risk_factors: &["high doses", "drug interactions", "hypothyroidism"],
            },
            ReactionEntry {
                reaction: "Liver enzyme elevation",
                description: "Raised transaminases",
                frequency: "Uncommon (0.1-1%)",
                severity: "Mild to moderate",
                risk_factors: &["prior liver disease", "alcohol use"],
            },
        ],
    },
    DrugClass {
        name: "SSRI",
        members: &[
            "sertraline",
            "sertralina",
            "fluoxetine",
            "fluoxetina",
            "paroxetine",
            "paroxetina",
            "citalopram",
            "escitalopram",
        ],
        reactions: &[
            ReactionEntry {
                reaction: "Serotonin syndrome",
                description: "Agitation, hyperthermia, tremor, autonomic instability",
                frequency: "Rare (<0.1%)",
                severity: "Severe",
                risk_factors: &["serotonergic drug combinations", "dose increase"],
            },
            ReactionEntry {
                reaction: "Sexual dysfunction",
                description: "Decreased libido, delayed orgasm",
                frequency: "Very common (>10%)",
                severity: "Moderate",
                risk_factors: &["high doses"],
            },
            ReactionEntry {
                reaction: "Insomnia",
                description: "Difficulty falling or staying asleep",
                frequency: "Common (1-10%)",
                severity: "Mild",
                risk_factors: &["evening dosing"],
            },
        ],
    },
    DrugClass {
        name: "Benzodiazepine",
        members: &[
            "diazepam",
            "clonazepam",
            "alprazolam",
            "lorazepam",
            "bromazepam",
            "midazolam",
            "valium",
            "rivotril",
        ],
        reactions: &[
            ReactionEntry {
                reaction: "Sedation",
                description: "Drowsiness, impaired psychomotor performance, fall risk",
                frequency: "Very common (>10%)",
                severity: "Moderate",
                risk_factors: &["elderly", "high doses", "alcohol use"],
            },
            ReactionEntry {
                reaction: "Dependence",
                description: "Physical and psychological dependence, withdrawal on cessation",
                frequency: "Common (1-10%)",
                severity: "Severe",
                risk_factors: &["use longer than 4 weeks", "high doses", "history of dependence"],
            },
            ReactionEntry {
                reaction: "Cognitive impairment",
                description: "Memory and attention deficits",
                frequency: "Common (1-10%)",
                severity: "Moderate",
                risk_factors: &["elderly", "high doses"],
            },
        ],
    },
    DrugClass {
        name: "Analgesic",
        members: &["acetaminophen", "paracetamol", "tylenol"],
        reactions: &[
            ReactionEntry {
                reaction: "Hepatotoxicity",
                description: "Acute liver injury, mainly in overdose",
                frequency: "Rare at therapeutic doses",
                severity: "Critical (in overdose)",
                risk_factors: &["overdose", "alcohol use", "prior liver disease", "fasting"],
            },
            ReactionEntry {
                reaction: "Allergic reactions",
                description: "Rash, urticaria, rarely anaphylaxis",
                frequency: "Rare (<0.1%)",
                severity: "Mild to moderate",
                risk_factors: &["history of drug allergy"],
            },
        ],
    },
    DrugClass {
        name: "Fluoroquinolone",
        members: &[
            "ciprofloxacin",
            "ciprofloxacino",
            "levofloxacin",
            "levofloxacino",
            "moxifloxacin",
            "moxifloxacino",
            "norfloxacin",
            "ofloxacin",
        ],
        reactions: &[
            ReactionEntry {
                reaction: "Tendinitis and tendon rupture",
                description: "Inflammation or rupture of tendons, mainly the Achilles tendon",
                frequency: "Uncommon (0.1-1%)",
                severity: "Severe",
                risk_factors: &["age>60", "corticosteroids", "intense physical activity"],
            },
            ReactionEntry {
                reaction: "Photosensitivity",
                description: "Exaggerated sunburn reaction on exposed skin",
                frequency: "Uncommon (0.1-1%)",
                severity: "Mild to moderate",
                risk_factors: &["sun exposure"],
            },
            ReactionEntry {
                reaction: "QT interval prolongation",
                description: "Risk of ventricular arrhythmia",
                frequency: "Rare (<0.1%)",
                severity: "Severe",
                risk_factors: &["cardiopathy", "electrolyte disturbances", "QT-prolonging drugs"],
            },
        ],
    },
];

/// Returned for drugs outside every known class.
pub static GENERIC_REACTION: ReactionEntry = ReactionEntry {
    reaction: "General adverse reactions",
    description: "Consult the package insert for the complete list of adverse reactions",
    frequency: "Variable",
    severity: "Variable",
    risk_factors: &["individual sensitivity", "drug interactions"],
};

/// First class matching the normalized drug name.
pub fn drug_class(normalized_drug: &str) -> Option<&'static DrugClass> {
    if normalized_drug.is_empty() {
        return None;
    }
    DRUG_CLASSES.iter().find(|class| class.matches(normalized_drug))
}

/// Reaction profiles for the drug's class, or the single generic profile.
pub fn adverse_reactions(normalized_drug: &str) -> Vec<AdverseReactionProfile> {
    match drug_class(normalized_drug) {
        Some(class) => class.reactions.iter().map(ReactionEntry::to_profile).collect(),
        None => vec![GENERIC_REACTION.to_profile()],
    }
}
