use crate::models::{ImageCategory, ImageClassificationRequest, ImageClassificationResponse};

/// Assigns a civic report image to one of the [`ImageCategory`] values
pub trait ImageClassifier: Send + Sync {
    fn classify(&self, request: &ImageClassificationRequest) -> ImageClassificationResponse;
}

/// Stand-in until a trained model is deployed: the image is never fetched
/// and every URL gets the same answer.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderClassifier {
    category: ImageCategory,
    confidence: f64,
}

impl Default for PlaceholderClassifier {
    fn default() -> Self {
        Self {
            category: ImageCategory::Pothole,
            confidence: 0.85,
        }
    }
}

impl ImageClassifier for PlaceholderClassifier {
    fn classify(&self, _request: &ImageClassificationRequest) -> ImageClassificationResponse {
        classification(self.category, self.confidence)
    }
}

/// Build a response, clamping confidence into `[0, 1]`
pub fn classification(category: ImageCategory, confidence: f64) -> ImageClassificationResponse {
    let confidence = if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) };
    ImageClassificationResponse {
        category,
        confidence,
        explanation: format!(
            "Image classified as {} with {:.1}% confidence.",
            category,
            confidence * 100.0
        ),
    }
}
