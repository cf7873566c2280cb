//! Provider payload normalization
//!
//! The only place that knows what a recognition provider's response looks
//! like. Each [`Provider`] maps its own schema onto [`TextFragment`]s; the
//! grouping code never sees provider-specific fields.
//!
//! Supported providers:
//! - Google Cloud Vision `TEXT_DETECTION` responses
//! - Pre-normalized fragment lists (our own JSON shape)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{BoundingBox, OcrResult, TextFragment};
use crate::error::{MenuLensError, Result};

/// Confidence assigned to fragments whose provider omitted one
pub const DEFAULT_CONFIDENCE: f64 = 0.9;

/// Recognition provider whose payload shape should be expected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Google Cloud Vision: first annotation is a whole-page aggregate
    #[default]
    CloudVision,
    /// Already-normalized fragments, no aggregate entry
    Fragments,
}

impl std::str::FromStr for Provider {
    type Err = MenuLensError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cloud_vision" | "cloud-vision" | "google" => Ok(Provider::CloudVision),
            "fragments" => Ok(Provider::Fragments),
            other => Err(MenuLensError::invalid_config(
                "provider",
                format!("unknown provider `{other}`"),
            )),
        }
    }
}

/// Converts provider payloads into [`OcrResult`]s
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    provider: Provider,
    default_confidence: f64,
}

impl Normalizer {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            default_confidence: DEFAULT_CONFIDENCE,
        }
    }

    /// Override the confidence used when the provider omits one
    pub fn with_default_confidence(mut self, confidence: f64) -> Self {
        self.default_confidence = confidence;
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Normalize an already-parsed payload
    pub fn normalize(&self, payload: &Value) -> Result<OcrResult> {
        let result = match self.provider {
            Provider::CloudVision => self.normalize_cloud_vision(payload)?,
            Provider::Fragments => self.normalize_fragments(payload)?,
        };

        debug!(
            "Normalized {:?} payload: {} fragments",
            self.provider,
            result.fragments.len()
        );

        Ok(result)
    }

    /// Parse and normalize a JSON payload
    pub fn normalize_str(&self, payload: &str) -> Result<OcrResult> {
        let value: Value = serde_json::from_str(payload)?;
        self.normalize(&value)
    }

    fn normalize_cloud_vision(&self, payload: &Value) -> Result<OcrResult> {
        if !payload.is_object() {
            return Err(MenuLensError::malformed(
                "Cloud Vision payload must be a JSON object",
            ));
        }

        // Accept either the full `images:annotate` body or a single response
        let response = if payload.get("responses").is_some() {
            let body = AnnotateBody::deserialize(payload)
                .map_err(|e| MenuLensError::malformed(format!("invalid responses: {e}")))?;
            match body.responses.into_iter().next() {
                Some(response) => response,
                None => return Ok(OcrResult::default()),
            }
        } else {
            AnnotateResponse::deserialize(payload)
                .map_err(|e| MenuLensError::malformed(format!("invalid response: {e}")))?
        };

        if let Some(status) = response.error {
            return Err(MenuLensError::Provider {
                message: status.message,
            });
        }

        let mut annotations = response.text_annotations.into_iter();

        // First annotation is the whole-page text, the rest are tokens
        let Some(aggregate) = annotations.next() else {
            return Ok(OcrResult::default());
        };
        let full_text = aggregate.description.unwrap_or_default();

        let fragments = annotations
            .enumerate()
            .map(|(i, annotation)| self.annotation_to_fragment(i + 1, annotation))
            .collect::<Result<Vec<_>>>()?;

        Ok(OcrResult::from_fragments(full_text, fragments))
    }

    fn annotation_to_fragment(&self, index: usize, annotation: EntityAnnotation) -> Result<TextFragment> {
        let text = annotation
            .description
            .ok_or_else(|| MenuLensError::malformed(format!("annotation {index} has no text")))?;

        let poly = annotation.bounding_poly.ok_or_else(|| {
            MenuLensError::malformed(format!("annotation {index} has no bounding polygon"))
        })?;

        if poly.vertices.len() < 4 {
            return Err(MenuLensError::malformed(format!(
                "annotation {index} polygon has {} vertices, expected 4",
                poly.vertices.len()
            )));
        }

        let mut clamped = false;
        let points: Vec<(f64, f64)> = poly
            .vertices
            .iter()
            .map(|v| {
                // Omitted coordinates are zero
                let x = v.x.unwrap_or(0.0);
                let y = v.y.unwrap_or(0.0);
                if x < 0.0 || y < 0.0 {
                    clamped = true;
                }
                (x.max(0.0), y.max(0.0))
            })
            .collect();

        if clamped {
            debug!("Clamped negative vertices of annotation {} ({:?})", index, text);
        }

        let bounding_box = BoundingBox::from_polygon(&points);
        check_geometry(index, &bounding_box)?;

        let confidence = annotation.confidence.unwrap_or(self.default_confidence);
        check_confidence(index, confidence)?;

        Ok(TextFragment::new(text, bounding_box, confidence))
    }

    fn normalize_fragments(&self, payload: &Value) -> Result<OcrResult> {
        let list = match payload {
            Value::Array(_) => payload,
            Value::Object(map) => map.get("fragments").ok_or_else(|| {
                MenuLensError::malformed("fragment payload has no `fragments` array")
            })?,
            _ => {
                return Err(MenuLensError::malformed(
                    "fragment payload must be an array or an object",
                ))
            }
        };

        let raw = Vec::<RawFragment>::deserialize(list)
            .map_err(|e| MenuLensError::malformed(format!("invalid fragment: {e}")))?;

        let fragments = raw
            .into_iter()
            .enumerate()
            .map(|(i, f)| {
                check_geometry(i, &f.bounding_box)?;
                let confidence = f.confidence.unwrap_or(self.default_confidence);
                check_confidence(i, confidence)?;
                Ok(TextFragment::new(f.text, f.bounding_box, confidence))
            })
            .collect::<Result<Vec<_>>>()?;

        if fragments.is_empty() {
            warn!("Fragment payload contained no fragments");
        }

        let full_text = fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(OcrResult::from_fragments(full_text, fragments))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Provider::default())
    }
}

/// Normalize a payload with the provider's default settings
pub fn normalize(provider: Provider, payload: &Value) -> Result<OcrResult> {
    Normalizer::new(provider).normalize(payload)
}

fn check_geometry(index: usize, b: &BoundingBox) -> Result<()> {
    let finite = [b.x, b.y, b.width, b.height].iter().all(|v| v.is_finite());
    if !finite || b.x < 0.0 || b.y < 0.0 || b.width < 0.0 || b.height < 0.0 {
        return Err(MenuLensError::malformed(format!(
            "fragment {index} has invalid bounding box {b:?}"
        )));
    }
    Ok(())
}

fn check_confidence(index: usize, confidence: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err(MenuLensError::malformed(format!(
            "fragment {index} confidence {confidence} outside [0, 1]"
        )));
    }
    Ok(())
}

#[derive(Deserialize)]
struct AnnotateBody {
    #[serde(default)]
    responses: Vec<AnnotateResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResponse {
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    error: Option<Status>,
}

#[derive(Deserialize)]
struct Status {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityAnnotation {
    description: Option<String>,
    bounding_poly: Option<BoundingPoly>,
    confidence: Option<f64>,
}

#[derive(Deserialize)]
struct BoundingPoly {
    #[serde(default)]
    vertices: Vec<Vertex>,
}

#[derive(Deserialize)]
struct Vertex {
    x: Option<f64>,
    y: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFragment {
    text: String,
    bounding_box: BoundingBox,
    confidence: Option<f64>,
}
