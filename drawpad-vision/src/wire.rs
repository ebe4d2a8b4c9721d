//! JSON shapes of the `images:annotate` request and response.

use serde::{Deserialize, Serialize};

use crate::analysis::{confidence, DetectedObject, ImageAnalysis, Label, NormalizedRect};

/// Maximum localized objects requested per image.
pub const MAX_OBJECTS: u32 = 10;

/// Maximum labels requested per image.
pub const MAX_LABELS: u32 = 5;

#[derive(Debug, Serialize)]
pub(crate) struct AnnotateRequest<'a> {
    pub requests: [ImageRequest<'a>; 1],
}

impl<'a> AnnotateRequest<'a> {
    pub fn new(base64_content: &'a str) -> Self {
        Self {
            requests: [ImageRequest {
                image: ImageContent {
                    content: base64_content,
                },
                features: [
                    Feature {
                        kind: "OBJECT_LOCALIZATION",
                        max_results: MAX_OBJECTS,
                    },
                    Feature {
                        kind: "LABEL_DETECTION",
                        max_results: MAX_LABELS,
                    },
                ],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageRequest<'a> {
    pub image: ImageContent<'a>,
    pub features: [Feature; 2],
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageContent<'a> {
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub max_results: u32,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<ImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageResponse {
    #[serde(default)]
    pub localized_object_annotations: Vec<ObjectAnnotation>,
    #[serde(default)]
    pub label_annotations: Vec<LabelAnnotation>,
    #[serde(default)]
    pub error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ObjectAnnotation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub bounding_poly: BoundingPoly,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BoundingPoly {
    #[serde(default)]
    pub normalized_vertices: Vec<Vertex>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Vertex {
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LabelAnnotation {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub score: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl From<ImageResponse> for ImageAnalysis {
    fn from(response: ImageResponse) -> Self {
        let objects = response
            .localized_object_annotations
            .into_iter()
            .map(|object| DetectedObject {
                bounds: NormalizedRect::from_vertices(
                    object
                        .bounding_poly
                        .normalized_vertices
                        .iter()
                        .map(|v| (v.x, v.y)),
                ),
                confidence: confidence(object.score),
                name: object.name,
            })
            .collect();

        let labels = response
            .label_annotations
            .into_iter()
            .map(|label| Label {
                confidence: confidence(label.score),
                label: label.description,
            })
            .collect();

        Self { objects, labels }
    }
}
