//! Grocery detection in photos of receipts, shelves and bags.
//!
//! Detection is optional: without an API key the analyzer is simply not
//! configured and callers report that to the user instead of failing.

use async_trait::async_trait;
use log::{info, warn};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::config::VisionConfig;
use crate::error::PantryError;
use crate::model::NewPantryItem;

pub mod gemini;
pub mod prompt;

pub use gemini::GeminiVision;

/// A backend able to list the grocery items visible in an image
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    /// Short backend name for logs
    fn provider_name(&self) -> &str;

    /// Detect grocery items in the image bytes.
    ///
    /// An empty vector means the image was understood but holds no groceries.
    async fn analyze(&self, image: &[u8], mime_type: &str) -> Result<Vec<NewPantryItem>, PantryError>;
}

static SHARED_ANALYZER: OnceLock<Option<Arc<GeminiVision>>> = OnceLock::new();

/// The process-wide analyzer, built from `config` on first use.
///
/// Returns `None` when no API key is available.
pub fn shared_analyzer(config: &VisionConfig) -> Option<Arc<GeminiVision>> {
    SHARED_ANALYZER
        .get_or_init(|| match GeminiVision::from_config(config) {
            Ok(Some(vision)) => {
                info!("Photo analysis enabled with model {}", vision.model());
                Some(Arc::new(vision))
            }
            Ok(None) => {
                info!("No Gemini API key configured, photo analysis disabled");
                None
            }
            Err(e) => {
                warn!("Failed to build Gemini client: {}", e);
                None
            }
        })
        .clone()
}

/// Analyze an image with the shared analyzer.
///
/// `Ok(None)` means photo analysis is not configured.
pub async fn analyze_image(
    config: &VisionConfig,
    image: &[u8],
    mime_type: &str,
) -> Result<Option<Vec<NewPantryItem>>, PantryError> {
    let Some(analyzer) = shared_analyzer(config) else {
        return Ok(None);
    };
    analyzer.analyze(image, mime_type).await.map(Some)
}

/// Guess the image MIME type from a file extension
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// MIME type for an image file, or `UnsupportedImage` for other extensions
pub fn image_mime_type(path: &Path) -> Result<&'static str, PantryError> {
    mime_type_for_path(path)
        .ok_or_else(|| PantryError::UnsupportedImage(path.display().to_string()))
}
