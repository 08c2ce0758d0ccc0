//! Image classifiers

mod remote;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::types::Prediction;

pub use remote::RemoteClassifier;

/// Maps raw image bytes to a label and per-class probabilities
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify one image. `Ok` with no label means the model could not decide.
    async fn predict(&self, image: &[u8]) -> Result<Prediction>;
}

/// The classifiers the service routes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierKind {
    Lunares,
    Acne,
    Rosacea,
}

impl ClassifierKind {
    pub fn name(&self) -> &'static str {
        match self {
            ClassifierKind::Lunares => "lunares",
            ClassifierKind::Acne => "acne",
            ClassifierKind::Rosacea => "rosacea",
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One classifier per kind
#[derive(Clone)]
pub struct Classifiers {
    lunares: Arc<dyn Classifier>,
    acne: Arc<dyn Classifier>,
    rosacea: Arc<dyn Classifier>,
}

impl Classifiers {
    pub fn new(
        lunares: Arc<dyn Classifier>,
        acne: Arc<dyn Classifier>,
        rosacea: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            lunares,
            acne,
            rosacea,
        }
    }

    /// Classifiers backed by the model servers named in the config
    pub fn remote(http: reqwest::Client, config: &ClassifierConfig) -> Self {
        Self::new(
            Arc::new(RemoteClassifier::new(http.clone(), &config.lunares_url)),
            Arc::new(RemoteClassifier::new(http.clone(), &config.acne_url)),
            Arc::new(RemoteClassifier::new(http, &config.rosacea_url)),
        )
    }

    pub fn get(&self, kind: ClassifierKind) -> &dyn Classifier {
        match kind {
            ClassifierKind::Lunares => self.lunares.as_ref(),
            ClassifierKind::Acne => self.acne.as_ref(),
            ClassifierKind::Rosacea => self.rosacea.as_ref(),
        }
    }
}
