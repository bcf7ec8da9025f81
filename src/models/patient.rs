use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder used when no source supplies a medication name.
pub const UNKNOWN_MEDICATION: &str = "medication";

/// Patient attributes for one analysis. Built per call, never persisted by the core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub age: i32,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pregnant: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_medications: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub conditions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub allergies: Vec<String>,
}

impl PatientProfile {
    pub fn is_elderly(&self) -> bool {
        self.age >= 65
    }

    pub fn is_pediatric(&self) -> bool {
        self.age < 18
    }
}

/// A medication currently in use, as sent by the orchestration layer:
/// either a bare name or an object carrying at least `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MedicationEntry {
    Named { name: String },
    Plain(String),
}

impl MedicationEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Named { name } => name,
            Self::Plain(name) => name,
        }
    }
}

/// Fields extracted from a package photo or leaflet by the vision pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisionExtraction {
    #[serde(default)]
    pub drug_name: Option<String>,
    #[serde(default)]
    pub medication_name: Option<String>,
}

/// Triage input as supplied by the orchestration layer.
///
/// Missing or `null` lists deserialize as empty, missing or `null` scalars as
/// their defaults. `conditions` and `allergies` also accept a comma-separated
/// string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub age: i32,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pregnant: bool,
    #[serde(default, deserialize_with = "list_or_comma_separated")]
    pub conditions: Vec<String>,
    #[serde(default, deserialize_with = "list_or_comma_separated")]
    pub allergies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meds_in_use: Vec<MedicationEntry>,
    #[serde(default)]
    pub drug_name: Option<String>,
    #[serde(default)]
    pub vision: Option<VisionExtraction>,
    #[serde(default)]
    pub medication_text: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub evidence_sources: Vec<String>,
}

impl AnalysisRequest {
    /// Resolve the drug under analysis.
    /// Order: vision drug_name, vision medication_name, drug_name, medication_text.
    pub fn medication_name(&self) -> String {
        let vision = self.vision.as_ref();
        [
            vision.and_then(|v| v.drug_name.as_deref()),
            vision.and_then(|v| v.medication_name.as_deref()),
            self.drug_name.as_deref(),
            self.medication_text.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_MEDICATION)
        .to_string()
    }

    pub fn patient(&self) -> PatientProfile {
        PatientProfile {
            age: self.age,
            weight_kg: self.weight,
            pregnant: self.pregnant,
            current_medications: self
                .meds_in_use
                .iter()
                .map(|m| m.name().trim().to_string())
                .filter(|m| !m.is_empty())
                .collect(),
            conditions: self.conditions.clone(),
            allergies: self.allergies.clone(),
        }
    }
}

/// `null` reads as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrText {
    List(Vec<String>),
    Text(String),
}

/// Accept `["a", "b"]`, `"a, b"` or `null`. Blank items are dropped.
fn list_or_comma_separated<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<ListOrText>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(ListOrText::List(items)) => items,
        Some(ListOrText::Text(text)) => text.split(',').map(String::from).collect(),
    };

    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}
