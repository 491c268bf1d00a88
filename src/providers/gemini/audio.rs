//! Gemini Speech Generation
//!
//! TTS goes through `generateContent` with an audio response modality and a
//! prebuilt voice. The audio comes back as base64 inline data.

use async_trait::async_trait;
use base64::Engine;

use super::client::{GeminiClient, PROVIDER_ID};
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    PrebuiltVoiceConfig, SpeechConfig, VoiceConfig,
};
use crate::error::{GenerationError, Result};
use crate::traits::SpeechGenerationCapability;
use crate::types::{SpeechAudio, SpeechRequest};

pub(crate) fn build_speech_request(request: &SpeechRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: None,
            parts: vec![Part::text(request.text.clone())],
        }],
        generation_config: Some(GenerationConfig {
            response_modalities: Some(vec!["AUDIO".to_string()]),
            speech_config: Some(SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: request.voice.as_str().to_string(),
                    },
                },
            }),
        }),
    }
}

#[async_trait]
impl SpeechGenerationCapability for GeminiClient {
    async fn generate_speech(&self, request: SpeechRequest) -> Result<SpeechAudio> {
        if request.text.trim().is_empty() {
            return Err(GenerationError::empty_input("text"));
        }

        let url = super::chat::generate_content_url(self, &self.config().models.speech);
        let body = build_speech_request(&request);
        let response: GenerateContentResponse = self.post_json(&url, &body).await?;

        let blob = response
            .inline_data()
            .ok_or_else(|| GenerationError::ProviderError("no audio in response".to_string()))?;
        let bytes = base64::engine::general_purpose::STANDARD.decode(blob.data.as_bytes())?;
        tracing::debug!(
            provider = PROVIDER_ID,
            voice = %request.voice,
            mime_type = %blob.mime_type,
            bytes = bytes.len(),
            "speech generated"
        );
        Ok(SpeechAudio::new(bytes, blob.mime_type.clone(), request.voice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VoiceName;

    #[test]
    fn request_selects_audio_and_voice() {
        let req = SpeechRequest {
            text: "hello".into(),
            voice: VoiceName::Fenrir,
        };
        let json = serde_json::to_value(build_speech_request(&req)).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            json["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Fenrir"
        );
    }
}
