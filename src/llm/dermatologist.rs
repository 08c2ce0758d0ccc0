//! Dermatologist prompts sent to the language model

use base64::Engine;
use serde_json::{json, Value};

use super::repair::{parse_json_object, RepairOutcome};
use super::types::ChatMessage;
use super::ChatClient;
use crate::error::Result;

const PERSONA: &str = "Eres un dermatólogo experto.";

const IMAGE_PROMPT: &str = "Analiza la imagen de piel que te envío. \
Dime qué tipo de afección ves (acné, lunares, rosácea, mancha solar, etc.). Que inicie con mayusculas. \
Dame una breve descripción educativa de la afección detectada. \
Dame también 5 recomendaciones para esa afección. \
Responde en formato JSON con los campos 'afeccion', 'descripcion' y 'recomendaciones' (lista de strings).";

fn recommendation_prompt(prediction: &str) -> String {
    format!(
        "Tengo un paciente con la siguiente condición dermatológica: '{prediction}'. \
Dame una breve descripción educativa de la condición detectada y 5 recomendaciones para el paciente. \
Responde en formato JSON con los campos 'descripcion' (string) y 'recomendaciones' (lista de strings)."
    )
}

/// Answer returned when an image analysis cannot be parsed
pub fn image_fallback() -> Value {
    json!({
        "afeccion": "No se pudo analizar",
        "recomendaciones": ["Intenta con otra imagen o consulta a un dermatólogo."]
    })
}

/// Answer returned when recommendations cannot be parsed
pub fn recommendation_fallback() -> Value {
    json!({
        "descripcion": "No se pudo generar la descripción.",
        "recomendaciones": ["No se pudieron generar recomendaciones. Intenta nuevamente."]
    })
}

/// Inline `data:` URL for an image
pub fn image_data_url(content_type: &str, image: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(image);
    format!("data:{content_type};base64,{encoded}")
}

/// Ask the model to identify the condition in an image
pub async fn analyze_image(
    client: &dyn ChatClient,
    image: &[u8],
    content_type: &str,
    max_tokens: u32,
) -> Result<RepairOutcome> {
    tracing::info!("Requesting image analysis ({} bytes, {})", image.len(), content_type);

    let messages = [
        ChatMessage::system(PERSONA),
        ChatMessage::user_with_image(IMAGE_PROMPT, image_data_url(content_type, image)),
    ];

    let answer = client.complete(&messages, max_tokens).await?;
    Ok(parse_json_object(&answer))
}

/// Ask the model for a description and recommendations for a known label
pub async fn recommend(
    client: &dyn ChatClient,
    prediction: &str,
    max_tokens: u32,
) -> Result<RepairOutcome> {
    tracing::info!("Requesting recommendations for '{}'", prediction);

    let messages = [
        ChatMessage::system(PERSONA),
        ChatMessage::user(recommendation_prompt(prediction)),
    ];

    let answer = client.complete(&messages, max_tokens).await?;
    Ok(parse_json_object(&answer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_data_url() {
        assert_eq!(image_data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
        assert_eq!(image_data_url("image/jpeg", b""), "data:image/jpeg;base64,");
    }

    #[test]
    fn test_recommendation_prompt_quotes_label() {
        let prompt = recommendation_prompt("acne_moderate");
        assert!(prompt.contains("'acne_moderate'"));
        assert!(prompt.contains("'descripcion'"));
        assert!(prompt.contains("'recomendaciones'"));
    }

    #[test]
    fn test_image_prompt_asks_for_all_fields() {
        for field in ["'afeccion'", "'descripcion'", "'recomendaciones'"] {
            assert!(IMAGE_PROMPT.contains(field), "missing {field}");
        }
    }

    #[test]
    fn test_fallbacks_differ() {
        assert_ne!(image_fallback(), recommendation_fallback());
        assert!(image_fallback()["recomendaciones"].is_array());
        assert!(recommendation_fallback()["recomendaciones"].is_array());
    }
}
