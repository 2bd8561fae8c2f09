//! Demo patient dossiers.
//!
//! All data in this module is hardcoded and fictional. It stands in for a
//! clinical records system.

use crate::patient::{AllopathicRecord, AyushRecord, Dosha, Gender, Herb, Medication, Patient};

fn medication(id: &str, name: &str, dosage: &str) -> Medication {
    Medication {
        id: id.to_string(),
        name: name.to_string(),
        dosage: dosage.to_string(),
    }
}

fn herb(id: &str, name: &str, form: &str) -> Herb {
    Herb {
        id: id.to_string(),
        name: name.to_string(),
        form: form.to_string(),
    }
}

fn allopathic(
    id: &str,
    condition: &str,
    diagnosis_date: &str,
    medications: Vec<Medication>,
    notes: &str,
) -> AllopathicRecord {
    AllopathicRecord {
        id: id.to_string(),
        condition: condition.to_string(),
        diagnosis_date: diagnosis_date.to_string(),
        medications,
        notes: notes.to_string(),
    }
}

fn ayush(
    id: &str,
    dosha: Dosha,
    diagnosis: &str,
    treatment: &str,
    herbs: Vec<Herb>,
    notes: &str,
) -> AyushRecord {
    AyushRecord {
        id: id.to_string(),
        dosha,
        diagnosis: diagnosis.to_string(),
        treatment: treatment.to_string(),
        herbs,
        notes: notes.to_string(),
    }
}

/// The three demo patients, in id order.
pub fn patients() -> Vec<Patient> {
    vec![
        Patient {
            id: "1".to_string(),
            name: "Aarav Sharma".to_string(),
            age: 45,
            gender: Gender::Male,
            blood_type: "A+".to_string(),
            contact: "aarav.sharma@example.com".to_string(),
            address: "123 MG Road, Bangalore, India".to_string(),
            allopathic_records: vec![
                allopathic(
                    "allo-1",
                    "Hypertension",
                    "2022-01-15",
                    vec![medication("med-1", "Amlodipine", "5mg daily")],
                    "Blood pressure is moderately controlled.",
                ),
                allopathic(
                    "allo-2",
                    "Type 2 Diabetes",
                    "2021-05-20",
                    vec![medication("med-2", "Metformin", "500mg twice daily")],
                    "Fasting blood sugar levels are stable.",
                ),
            ],
            ayush_records: vec![ayush(
                "ayush-1",
                Dosha::Pitta,
                "Agnimandya (digestive impairment)",
                "Panchakarma therapy suggested.",
                vec![herb("herb-1", "Triphala", "Powder")],
                "Patient reports bloating and indigestion.",
            )],
        },
        Patient {
            id: "2".to_string(),
            name: "Priya Singh".to_string(),
            age: 34,
            gender: Gender::Female,
            blood_type: "O-".to_string(),
            contact: "priya.singh@example.com".to_string(),
            address: "456 Park Street, Kolkata, India".to_string(),
            allopathic_records: vec![allopathic(
                "allo-3",
                "Migraine",
                "2020-03-10",
                vec![medication("med-3", "Sumatriptan", "as needed")],
                "Experiences aura with headaches.",
            )],
            ayush_records: vec![ayush(
                "ayush-2",
                Dosha::Vata,
                "Shirashoola (headache)",
                "Shirodhara and Nasya recommended.",
                vec![
                    herb("herb-2", "Brahmi", "Tablet"),
                    herb("herb-3", "Ashwagandha", "Capsule"),
                ],
                "Stress-induced headaches. Recommends lifestyle changes.",
            )],
        },
        Patient {
            id: "3".to_string(),
            name: "Rohan Mehta".to_string(),
            age: 52,
            gender: Gender::Male,
            blood_type: "B+".to_string(),
            contact: "rohan.mehta@example.com".to_string(),
            address: "789 Juhu Beach Road, Mumbai, India".to_string(),
            allopathic_records: vec![allopathic(
                "allo-4",
                "Arthritis",
                "2019-11-01",
                vec![medication("med-4", "Ibuprofen", "200mg as needed for pain")],
                "Joint stiffness, particularly in the mornings.",
            )],
            ayush_records: vec![ayush(
                "ayush-3",
                Dosha::Kapha,
                "Sandhivata (Osteoarthritis)",
                "Abhyanga (oil massage) with Mahanarayan oil.",
                vec![herb("herb-4", "Guggulu", "Tablet")],
                "Focus on reducing joint inflammation and improving mobility.",
            )],
        },
    ]
}

/// Look up a demo patient by id.
pub fn find_patient(id: &str) -> Option<Patient> {
    patients().into_iter().find(|p| p.id == id)
}
