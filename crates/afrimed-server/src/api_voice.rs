//! Public voice widget configuration.

use crate::AppState;
use axum::extract::{Extension, Json};
use serde::Serialize;
use std::sync::Arc;

/// Response body for `GET /api/voice/config`.
#[derive(Debug, Serialize)]
pub struct VoiceConfigResponse {
    /// Public client credential for the voice SDK.
    #[serde(rename = "publicApiKey")]
    pub public_api_key: String,
    /// Assistant identifier the widget should connect to.
    #[serde(rename = "assistantId")]
    pub assistant_id: String,
}

/// Handler for `GET /api/voice/config`.
///
/// Serves the client-side voice SDK configuration the original deployment
/// shipped as public build-time variables. Values may be empty when no
/// voice backend is configured; the widget is expected to handle that.
pub async fn voice_config_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<VoiceConfigResponse> {
    Json(VoiceConfigResponse {
        public_api_key: state.voice.public_api_key.clone(),
        assistant_id: state.voice.assistant_id.clone(),
    })
}
