use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AnalysisStatus, DefectSeverity};

/// AI output for a single product image.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AnalysisResult {
    pub id: String,
    pub product_image_id: String,
    pub model_version: String,
    pub classification_label: Option<String>,
    pub classification_confidence: Option<f64>,
    #[serde(default)]
    pub classification_scores: serde_json::Map<String, serde_json::Value>,
    pub description_text: Option<String>,
    pub description_model: Option<String>,
    pub processing_time_ms: Option<u64>,
    pub status: AnalysisStatus,
    pub error_message: Option<String>,
    pub experiment_id: Option<String>,
    pub variant_id: Option<String>,
    #[serde(default)]
    pub extracted_attributes: Vec<ExtractedAttribute>,
    #[serde(default)]
    pub detected_defects: Vec<DetectedDefect>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Defects at or above `severity`.
    pub fn defects_at_least(&self, severity: DefectSeverity) -> impl Iterator<Item = &DetectedDefect> {
        self.detected_defects
            .iter()
            .filter(move |defect| defect.severity >= severity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ExtractedAttribute {
    pub id: String,
    pub attribute_name: String,
    pub attribute_value: String,
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DetectedDefect {
    pub id: String,
    pub defect_type: String,
    pub severity: DefectSeverity,
    pub confidence: Option<f64>,
    pub bounding_box: Option<BoundingBox>,
    pub description: Option<String>,
}

/// Pixel-space rectangle around a detected defect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}
