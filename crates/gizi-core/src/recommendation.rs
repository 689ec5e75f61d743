//! Nutrition status enumeration and the fixed recommendation table

use std::fmt;

use serde::{Deserialize, Serialize};

/// Nutrition classification returned by the predictor.
///
/// Serializes to the storage form (`severely_stunting`); the predictor and
/// the POST response use the label form (`severely stunting`), see
/// [`NutritionStatus::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutritionStatus {
    Normal,
    Stunting,
    Tinggi,
    SeverelyStunting,
}

impl NutritionStatus {
    /// All statuses in table order
    pub const ALL: [NutritionStatus; 4] = [
        NutritionStatus::Normal,
        NutritionStatus::Stunting,
        NutritionStatus::Tinggi,
        NutritionStatus::SeverelyStunting,
    ];

    /// Parse a predictor label. Only the four label forms are recognized.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Parse the stored form (spaces joined with underscores)
    pub fn from_storage(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// Label form as emitted by the predictor
    pub fn label(&self) -> &'static str {
        match self {
            NutritionStatus::Normal => "normal",
            NutritionStatus::Stunting => "stunting",
            NutritionStatus::Tinggi => "tinggi",
            NutritionStatus::SeverelyStunting => "severely stunting",
        }
    }

    /// Storage form (spaces replaced by underscores)
    pub fn as_str(&self) -> &'static str {
        match self {
            NutritionStatus::Normal => "normal",
            NutritionStatus::Stunting => "stunting",
            NutritionStatus::Tinggi => "tinggi",
            NutritionStatus::SeverelyStunting => "severely_stunting",
        }
    }

    /// Recommendations for this status
    pub fn recommendations(&self) -> &'static [&'static str] {
        recommendations(*self)
    }
}

impl fmt::Display for NutritionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

static NORMAL: [&str; 3] = [
    "Pertahankan pola makan sehat dan seimbang",
    "Lanjutkan pemantauan pertumbuhan secara berkala",
    "Pastikan anak cukup istirahat dan aktivitas fisik",
];

static STUNTING: [&str; 3] = [
    "Tingkatkan asupan protein hewani dan nabati",
    "Konsultasikan dengan tenaga medis atau gizi",
    "Pantau tinggi dan berat badan setiap bulan",
];

static TINGGI: [&str; 3] = [
    "Pastikan asupan kalsium dan vitamin D cukup",
    "Lanjutkan aktivitas fisik yang mendukung postur",
    "Berikan nutrisi seimbang agar pertumbuhan proporsional",
];

static SEVERELY_STUNTING: [&str; 4] = [
    "Segera konsultasikan dengan dokter anak atau ahli gizi",
    "Berikan makanan tinggi energi dan zat gizi mikro",
    "Evaluasi kondisi medis yang mendasari secara menyeluruh",
    "Ikuti program pemulihan gizi",
];

/// Ordered recommendation list (Indonesian) for a status
pub fn recommendations(status: NutritionStatus) -> &'static [&'static str] {
    match status {
        NutritionStatus::Normal => &NORMAL,
        NutritionStatus::Stunting => &STUNTING,
        NutritionStatus::Tinggi => &TINGGI,
        NutritionStatus::SeverelyStunting => &SEVERELY_STUNTING,
    }
}
