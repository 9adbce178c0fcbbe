use imagine_core::entities::AnalysisResult;
use imagine_core::enums::DefectSeverity;
use serde::Serialize;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::{self, heading};
use crate::views::{self, format_confidence, format_processing_time};

/// One analysis as a table row.
#[derive(Serialize)]
pub struct AnalysisRow {
    image_id: String,
    status: String,
    label: String,
    confidence: String,
    defects: usize,
    high_severity: usize,
    processing_time: String,
    model: String,
}

impl AnalysisRow {
    pub const COLUMNS: &'static [&'static str] = &[
        "image_id",
        "status",
        "label",
        "confidence",
        "defects",
        "high_severity",
        "processing_time",
        "model",
    ];
}

impl From<&AnalysisResult> for AnalysisRow {
    fn from(analysis: &AnalysisResult) -> Self {
        Self {
            image_id: analysis.product_image_id.clone(),
            status: analysis.status.to_string(),
            label: analysis
                .classification_label
                .clone()
                .unwrap_or_else(|| "-".into()),
            confidence: format_confidence(analysis.classification_confidence, 1),
            defects: analysis.detected_defects.len(),
            high_severity: analysis.defects_at_least(DefectSeverity::High).count(),
            processing_time: format_processing_time(
                analysis.processing_time_ms.map(|ms| ms as f64),
            ),
            model: analysis.model_version.clone(),
        }
    }
}

#[derive(Serialize)]
struct AttributeRow {
    attribute: String,
    value: String,
    confidence: String,
}

#[derive(Serialize)]
struct DefectRow {
    defect: String,
    severity: String,
    confidence: String,
    location: String,
    description: String,
}

/// Analysis viewer for one product image.
pub async fn handle(image_id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require_session("analysis")?;
    let state = views::load_record("Loading analysis", ctx.client.get_analysis(image_id)).await;
    let Some(analysis) = state.into_result()? else {
        return Ok(());
    };

    if flags.format != OutputFormat::Table {
        return output::output(&analysis, flags.format);
    }

    output::output_rows(&[AnalysisRow::from(&analysis)], AnalysisRow::COLUMNS, flags.format)?;
    if let Some(text) = &analysis.description_text {
        heading("Description", flags.format);
        println!("{text}");
    }
    if let Some(message) = &analysis.error_message {
        heading("Error", flags.format);
        println!("{message}");
    }

    heading("Attributes", flags.format);
    let attributes = analysis
        .extracted_attributes
        .iter()
        .map(|attr| AttributeRow {
            attribute: attr.attribute_name.clone(),
            value: attr.attribute_value.clone(),
            confidence: attr
                .confidence
                .map_or_else(|| "-".into(), |c| format_confidence(Some(c), 0)),
        })
        .collect::<Vec<_>>();
    if attributes.is_empty() {
        output::output_empty("No attributes extracted.", flags.format);
    } else {
        output::output_rows(&attributes, &["attribute", "value", "confidence"], flags.format)?;
    }

    heading("Defects", flags.format);
    let mut defects = analysis.detected_defects.iter().collect::<Vec<_>>();
    defects.sort_by(|a, b| b.severity.cmp(&a.severity));
    let rows = defects
        .into_iter()
        .map(|defect| DefectRow {
            defect: defect.defect_type.clone(),
            severity: defect.severity.to_string(),
            confidence: format_confidence(defect.confidence, 0),
            location: defect.bounding_box.as_ref().map_or_else(
                || "-".into(),
                |b| format!("{:.0},{:.0} {:.0}x{:.0}", b.x, b.y, b.width, b.height),
            ),
            description: defect.description.clone().unwrap_or_else(|| "-".into()),
        })
        .collect::<Vec<_>>();
    if rows.is_empty() {
        output::output_empty("No defects detected.", flags.format);
    } else {
        output::output_rows(
            &rows,
            &["defect", "severity", "confidence", "location", "description"],
            flags.format,
        )?;
    }
    Ok(())
}
