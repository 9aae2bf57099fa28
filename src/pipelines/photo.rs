use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::PantryError;
use crate::model::{NewPantryItem, PantryItem};
use crate::pantry::PantryStore;
use crate::vision::VisionAnalyzer;

pub const NOT_CONFIGURED_MESSAGE: &str =
    "Photo received. Photo analysis is not configured (set GEMINI_API_KEY). Please add items manually.";
pub const NOTHING_DETECTED_MESSAGE: &str =
    "No grocery items were detected in the photo. Please add items manually.";

/// Outcome of analyzing one photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoAnalysis {
    pub message: String,
    pub items: Vec<NewPantryItem>,
}

impl PhotoAnalysis {
    fn detected(items: Vec<NewPantryItem>) -> Self {
        let message = if items.len() == 1 {
            "Detected 1 item. Review before adding to your pantry.".to_string()
        } else {
            format!(
                "Detected {} items. Review before adding to your pantry.",
                items.len()
            )
        };
        Self { message, items }
    }
}

/// Analyze a photo, or explain why nothing could be detected.
///
/// Analyzer failures are returned as errors; a missing analyzer is not one.
pub async fn process(
    analyzer: Option<&dyn VisionAnalyzer>,
    image: &[u8],
    mime_type: &str,
) -> Result<PhotoAnalysis, PantryError> {
    let Some(analyzer) = analyzer else {
        info!("Photo analysis requested without an analyzer");
        return Ok(PhotoAnalysis {
            message: NOT_CONFIGURED_MESSAGE.to_string(),
            items: Vec::new(),
        });
    };

    debug!("Analyzing photo with {}", analyzer.provider_name());
    let items = analyzer.analyze(image, mime_type).await?;

    if items.is_empty() {
        return Ok(PhotoAnalysis {
            message: NOTHING_DETECTED_MESSAGE.to_string(),
            items,
        });
    }
    Ok(PhotoAnalysis::detected(items))
}

/// Add the detected items to the pantry, merging with existing entries
pub fn import(store: &mut PantryStore, analysis: &PhotoAnalysis) -> Result<Vec<PantryItem>, PantryError> {
    if analysis.items.is_empty() {
        return Ok(Vec::new());
    }
    store.bulk_create(analysis.items.clone())
}
