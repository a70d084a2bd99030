use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Held-out evaluation of a training run, persisted next to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingMetrics {
    pub samples: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub mean_absolute_error: f64,
}

/// JSON sidecar written next to a model binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    pub trained_at: DateTime<Utc>,
    pub training_metrics: Option<TrainingMetrics>,
}

impl ModelMetadata {
    pub fn new(training_metrics: TrainingMetrics) -> Self {
        Self {
            trained_at: Utc::now(),
            training_metrics: Some(training_metrics),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_use_camel_case_keys() {
        let metrics = TrainingMetrics {
            samples: 1000,
            train_size: 800,
            test_size: 200,
            mean_absolute_error: 0.0012,
        };

        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["trainSize"], 800);
        assert_eq!(json["testSize"], 200);
        assert_eq!(json["meanAbsoluteError"], 0.0012);
    }

    #[test]
    fn test_metadata_parses_sidecar_without_metrics() {
        let json = r#"{"trainedAt": "2024-05-01T12:00:00Z", "trainingMetrics": null}"#;
        let meta: ModelMetadata = serde_json::from_str(json).unwrap();
        assert!(meta.training_metrics.is_none());
        assert_eq!(meta.trained_at.to_rfc3339(), "2024-05-01T12:00:00+00:00");
    }
}
