//! Core types for skinsight

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Per-class probabilities as returned by a classifier.
///
/// Model servers answer either with a class → probability mapping or with a
/// bare list ordered like the model's class index. Mappings keep the order
/// the model server sent them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Probabilities {
    ByClass(Map<String, Value>),
    Ordered(Vec<f64>),
}

impl Default for Probabilities {
    fn default() -> Self {
        Probabilities::ByClass(Map::new())
    }
}

/// Raw classifier output. `label` is `None` when the model could not decide.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: Option<String>,
    pub probabilities: Probabilities,
}

impl Prediction {
    pub fn new(label: impl Into<String>, probabilities: Probabilities) -> Self {
        Self {
            label: Some(label.into()),
            probabilities,
        }
    }

    pub fn undecided(probabilities: Probabilities) -> Self {
        Self {
            label: None,
            probabilities,
        }
    }
}

/// Outcome of classifying one uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    /// Client-supplied file name
    pub filename: Option<String>,
    /// Client-supplied MIME type
    pub content_type: String,
    /// Predicted label
    #[serde(rename = "prediccion")]
    pub prediction: String,
    /// Per-class probabilities
    #[serde(rename = "probabilidades")]
    #[schema(value_type = Object)]
    pub probabilities: Probabilities,
}

/// Educational content for one skin condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConditionInfo {
    pub name: String,
    pub title: String,
    pub description: String,
    pub causes: Vec<String>,
    pub symptoms: Vec<String>,
    pub treatment: Vec<String>,
    pub prevention: Vec<String>,
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_probabilities_accept_map_and_list() {
        let by_class: Probabilities =
            serde_json::from_value(json!({"benign": 0.7, "malignant": 0.3})).unwrap();
        let Probabilities::ByClass(map) = by_class else {
            panic!("expected a class mapping");
        };
        assert_eq!(map["malignant"], json!(0.3));

        let ordered: Probabilities = serde_json::from_value(json!([0.25, 0.75])).unwrap();
        assert_eq!(ordered, Probabilities::Ordered(vec![0.25, 0.75]));
    }

    #[test]
    fn test_class_order_is_kept() {
        let parsed: Probabilities =
            serde_json::from_str(r#"{"melanoma": 0.1, "nevus": 0.6, "keratosis": 0.3}"#).unwrap();

        assert_eq!(
            serde_json::to_string(&parsed).unwrap(),
            r#"{"melanoma":0.1,"nevus":0.6,"keratosis":0.3}"#
        );
    }

    #[test]
    fn test_analysis_result_wire_names() {
        let result = AnalysisResult {
            filename: Some("photo.png".into()),
            content_type: "image/png".into(),
            prediction: "acne_moderate".into(),
            probabilities: serde_json::from_value(json!({"clear": 0.19, "acne_moderate": 0.81}))
                .unwrap(),
        };

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "filename": "photo.png",
                "content_type": "image/png",
                "prediccion": "acne_moderate",
                "probabilidades": {"clear": 0.19, "acne_moderate": 0.81}
            })
        );
        assert!(serde_json::to_string(&result)
            .unwrap()
            .ends_with(r#""probabilidades":{"clear":0.19,"acne_moderate":0.81}}"#));
    }
}
