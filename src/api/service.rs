//! Request boundary: predict and health payloads over one shared gateway.
//!
//! Every failure is turned into a payload here; nothing below this layer
//! escapes to the host as a panic or a process exit.

use std::time::Instant;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::common::config::AppCfg;
use crate::common::error::{
    InferenceError, PricerCode, PricerError, PricerResult, ValidationError,
};
use crate::common::log;
use crate::features::{self, FEATURE_COUNT};
use crate::inference::{InferenceGateway, PredictionResult, Readiness};
use crate::model::FsModelStore;

/// Accuracy label reported with every successful prediction.
pub const MODEL_ACCURACY: &str = "98.09%";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PredictSuccess {
    pub success: bool,
    #[serde(flatten)]
    pub prediction: PredictionResult,
    pub model_accuracy: &'static str,
    pub features_used: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PredictFailure {
    pub success: bool,
    pub error: String,
    #[serde(skip)]
    pub code: PricerCode,
}

/// Payload returned by the predict operation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Success(PredictSuccess),
    Failure(PredictFailure),
}

impl PredictResponse {
    fn success(prediction: PredictionResult) -> Self {
        PredictResponse::Success(PredictSuccess {
            success: true,
            prediction,
            model_accuracy: MODEL_ACCURACY,
            features_used: FEATURE_COUNT,
        })
    }

    fn failure(err: &PricerError) -> Self {
        PredictResponse::Failure(PredictFailure {
            success: false,
            error: err.to_string(),
            code: err.code(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PredictResponse::Success(_))
    }

    pub fn code(&self) -> PricerCode {
        match self {
            PredictResponse::Success(_) => PricerCode::Ok,
            PredictResponse::Failure(failure) => failure.code,
        }
    }

    /// Status a web front-end should answer with.
    pub fn http_status(&self) -> u16 {
        match self.code() {
            PricerCode::Ok => 200,
            PricerCode::NotReady => 500,
            _ => 400,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| FALLBACK_JSON.to_string())
    }
}

pub(crate) const FALLBACK_JSON: &str = r#"{"success":false,"error":"internal error"}"#;

/// Payload returned by the readiness query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub model_loaded: bool,
    pub scaler_loaded: bool,
}

impl From<Readiness> for HealthReport {
    fn from(r: Readiness) -> Self {
        Self {
            status: "healthy",
            model_loaded: r.model_loaded,
            scaler_loaded: r.scaler_loaded,
        }
    }
}

/// Process-wide pricing service. Build it once at start-up and share it.
#[derive(Clone)]
pub struct PriceService {
    gateway: InferenceGateway,
}

impl PriceService {
    pub fn new(gateway: InferenceGateway) -> Self {
        Self { gateway }
    }

    /// Load artefacts from the configured paths. A failed load yields a
    /// service that answers every prediction with "not loaded".
    pub fn from_config(cfg: &AppCfg) -> Self {
        tracing::info!(
            model = %cfg.model_path.display(),
            scaler = %cfg.scaler_path.display(),
            "loading model and scaler"
        );
        let store = FsModelStore::new(cfg);
        Self::new(InferenceGateway::from_store(&store))
    }

    pub fn gateway(&self) -> &InferenceGateway {
        &self.gateway
    }

    pub fn health(&self) -> HealthReport {
        self.gateway.readiness().into()
    }

    /// Predict from a raw request body.
    pub fn predict_json(&self, body: &str) -> PredictResponse {
        self.predict_bytes(body.as_bytes())
    }

    /// Predict from a raw byte body. Bytes that are not UTF-8 make the whole
    /// record malformed, whichever key or value they sit in.
    pub fn predict_bytes(&self, body: &[u8]) -> PredictResponse {
        self.respond(|| {
            let body = std::str::from_utf8(body)
                .map_err(|err| ValidationError::Malformed(format!("body is not UTF-8: {err}")))?;
            let record = features::parse_record(body)?;
            self.run(&record)
        })
    }

    /// Predict from an already decoded mapping.
    pub fn predict_map(&self, record: &Map<String, Value>) -> PredictResponse {
        self.respond(|| self.run(record))
    }

    fn respond(&self, work: impl FnOnce() -> PricerResult<PredictionResult>) -> PredictResponse {
        let start = Instant::now();
        // Readiness is a service-level precondition, checked before the body is looked at.
        let outcome = if self.gateway.is_ready() {
            work()
        } else {
            Err(InferenceError::NotReady.into())
        };

        let response = match outcome {
            Ok(prediction) => PredictResponse::success(prediction),
            Err(err) => {
                tracing::debug!(error = %err, "prediction rejected");
                PredictResponse::failure(&err)
            }
        };
        log::event(
            "api",
            "predict",
            response.code() as u32,
            start.elapsed().as_millis(),
        );
        response
    }

    fn run(&self, record: &Map<String, Value>) -> PricerResult<PredictionResult> {
        let vector = features::assemble(record)?;
        Ok(self.gateway.predict(&vector)?)
    }
}
