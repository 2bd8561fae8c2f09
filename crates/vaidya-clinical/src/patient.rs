//! Patient dossier types and the operation inputs derived from them.

use std::fmt;

use serde::{Deserialize, Serialize};

use vaidya_contracts::operation::{
    IdentifyInteractionsInput, PredictProgressionInput, SuggestTreatmentInput,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        };
        f.write_str(s)
    }
}

/// Ayurvedic constitutional category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dosha {
    Vata,
    Pitta,
    Kapha,
}

impl fmt::Display for Dosha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dosha::Vata => "Vata",
            Dosha::Pitta => "Pitta",
            Dosha::Kapha => "Kapha",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub name: String,
    pub dosage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Herb {
    pub id: String,
    pub name: String,
    pub form: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllopathicRecord {
    pub id: String,
    pub condition: String,
    /// ISO date, e.g. "2022-01-15".
    pub diagnosis_date: String,
    pub medications: Vec<Medication>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AyushRecord {
    pub id: String,
    pub dosha: Dosha,
    pub diagnosis: String,
    pub treatment: String,
    pub herbs: Vec<Herb>,
    pub notes: String,
}

/// A patient dossier combining allopathic and AYUSH records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub blood_type: String,
    pub contact: String,
    pub address: String,
    pub allopathic_records: Vec<AllopathicRecord>,
    pub ayush_records: Vec<AyushRecord>,
}

impl Patient {
    /// One `condition: notes` line per allopathic record.
    pub fn allopathic_summary(&self) -> String {
        self.allopathic_records
            .iter()
            .map(|r| format!("{}: {}", r.condition, r.notes))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One `diagnosis: notes` line per AYUSH record.
    pub fn ayush_summary(&self) -> String {
        self.ayush_records
            .iter()
            .map(|r| format!("{}: {}", r.diagnosis, r.notes))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Every allopathic medication name, comma separated.
    pub fn allopathic_medications(&self) -> String {
        self.allopathic_records
            .iter()
            .flat_map(|r| r.medications.iter().map(|m| m.name.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Every AYUSH herb name, comma separated.
    pub fn ayush_herbs(&self) -> String {
        self.ayush_records
            .iter()
            .flat_map(|r| r.herbs.iter().map(|h| h.name.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn details(&self) -> String {
        format!(
            "Age: {}, Gender: {}, Blood Type: {}",
            self.age, self.gender, self.blood_type
        )
    }

    pub fn suggest_treatment_input(&self) -> SuggestTreatmentInput {
        SuggestTreatmentInput {
            allopathic_record: self.allopathic_summary(),
            ayush_record: self.ayush_summary(),
        }
    }

    pub fn predict_progression_input(&self) -> PredictProgressionInput {
        PredictProgressionInput {
            allopathic_data: self.allopathic_summary(),
            ayush_data: self.ayush_summary(),
        }
    }

    pub fn identify_interactions_input(&self) -> IdentifyInteractionsInput {
        IdentifyInteractionsInput {
            ayush_medications: self.ayush_herbs(),
            allopathic_medications: self.allopathic_medications(),
            patient_details: self.details(),
        }
    }
}
