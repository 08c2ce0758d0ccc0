//! Classifier served by an external model server over HTTP

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::Classifier;
use crate::error::{Error, Result};
use crate::types::{Prediction, Probabilities};

/// Posts the image as multipart field `file` to a prediction endpoint.
///
/// The server answers with a label (or `null`) and the class probabilities.
pub struct RemoteClassifier {
    http: reqwest::Client,
    endpoint: String,
}

impl RemoteClassifier {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PredictionPayload {
    #[serde(default, alias = "prediction", alias = "prediccion")]
    label: Option<String>,
    #[serde(default, alias = "probabilidades")]
    probabilities: Option<Probabilities>,
}

impl From<PredictionPayload> for Prediction {
    fn from(payload: PredictionPayload) -> Self {
        Prediction {
            label: payload.label,
            probabilities: payload.probabilities.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn predict(&self, image: &[u8]) -> Result<Prediction> {
        let form = Form::new().part("file", Part::bytes(image.to_vec()).file_name("image"));

        let response = self.http.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Classifier(format!(
                "{} returned {}: {}",
                self.endpoint, status, body
            )));
        }

        let payload: PredictionPayload = response.json().await?;
        tracing::debug!(
            "Model server {} answered {:?}",
            self.endpoint,
            payload.label
        );
        Ok(payload.into())
    }
}
