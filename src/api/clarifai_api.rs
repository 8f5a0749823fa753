use crate::config::Config;
use crate::error::ApiError;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tracing::{debug, error};
use url::Url;

/// Clarifai reports success with this status code inside the JSON body.
const CLARIFAI_SUCCESS: u64 = 10000;

/// Fire-once client for Clarifai's model prediction endpoint.
#[derive(Clone)]
pub struct ClarifaiApi {
    client: reqwest::Client,
    predict_url: Url,
}

impl ClarifaiApi {
    pub fn new(cfg: &Config) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&format!("Key {}", cfg.api_clarifai))
            .map_err(|e| ApiError::ExternalService(format!("invalid API key header: {e}")))?;
        headers.insert(AUTHORIZATION, key);

        let mut builder = reqwest::Client::builder()
            .user_agent("smart-brain-api/0.1")
            .default_headers(headers);
        // only the configured proxy is used, never the process environment's
        builder = match cfg.proxy.as_ref() {
            Some(proxy_url) => builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?),
            None => builder.no_proxy(),
        };
        let client = builder.build()?;

        // `join` would replace a last segment that lacks a trailing slash
        let mut base_url = cfg.clarifai_base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let predict_url = base_url
            .join(&format!("v2/models/{}/outputs", cfg.face_model_id))
            .map_err(|e| ApiError::ExternalService(format!("invalid Clarifai url: {e}")))?;

        Ok(Self {
            client,
            predict_url,
        })
    }

    /// Run the face-detection model on `input` and hand back Clarifai's JSON
    /// untouched.
    pub async fn predict(&self, input: &Value) -> Result<Value, ApiError> {
        let inputs = build_inputs(input)
            .ok_or_else(|| ApiError::ExternalService("unsupported input".to_string()))?;

        debug!(url = %self.predict_url, count = inputs.len(), "calling Clarifai predict");
        let resp = self
            .client
            .post(self.predict_url.clone())
            .json(&json!({ "inputs": inputs }))
            .send()
            .await?;

        let status = resp.status();
        let body: Value = resp.json().await?;
        if !status.is_success() {
            error!(%status, "Clarifai returned an error status");
            return Err(ApiError::ExternalService(format!("upstream status {status}")));
        }

        match body.pointer("/status/code").and_then(Value::as_u64) {
            Some(CLARIFAI_SUCCESS) => Ok(body),
            other => Err(ApiError::ExternalService(format!(
                "Clarifai status code {other:?}"
            ))),
        }
    }
}

/// Shape the client payload into Clarifai `inputs`.
///
/// Strings that look like http(s) URLs become `{"url": ..}`, other strings are
/// taken as base64 image bytes, objects are used as the image as-is and
/// arrays yield one input per element.
pub fn build_inputs(input: &Value) -> Option<Vec<Value>> {
    match input {
        Value::Array(items) if !items.is_empty() => items.iter().map(image_input).collect(),
        Value::Array(_) => None,
        other => image_input(other).map(|v| vec![v]),
    }
}

fn image_input(item: &Value) -> Option<Value> {
    let image = match item {
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) if is_http_url(s) => json!({ "url": s }),
        Value::String(s) => json!({ "base64": s }),
        Value::Object(_) => item.clone(),
        _ => return None,
    };
    Some(json!({ "data": { "image": image } }))
}

fn is_http_url(s: &str) -> bool {
    Url::parse(s.trim()).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_string_becomes_url_image() {
        let inputs = build_inputs(&json!("https://example.com/face.jpg")).unwrap();
        assert_eq!(
            inputs,
            vec![json!({"data": {"image": {"url": "https://example.com/face.jpg"}}})]
        );
    }

    #[test]
    fn other_strings_are_base64() {
        let inputs = build_inputs(&json!("iVBORw0KGgo=")).unwrap();
        assert_eq!(inputs[0]["data"]["image"]["base64"], "iVBORw0KGgo=");
    }

    #[test]
    fn arrays_and_objects_pass_through() {
        let inputs =
            build_inputs(&json!([{"url": "https://a.test/1.png"}, "https://a.test/2.png"])).unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0]["data"]["image"]["url"], "https://a.test/1.png");
        assert_eq!(inputs[1]["data"]["image"]["url"], "https://a.test/2.png");
    }

    #[test]
    fn unusable_inputs_are_rejected() {
        assert!(build_inputs(&json!(null)).is_none());
        assert!(build_inputs(&json!(42)).is_none());
        assert!(build_inputs(&json!("")).is_none());
        assert!(build_inputs(&json!([])).is_none());
        assert!(build_inputs(&json!(["https://a.test/x.png", 1])).is_none());
    }

    #[test]
    fn predict_url_includes_model() {
        let cfg = Config::default();
        let api = ClarifaiApi::new(&cfg).unwrap();
        assert_eq!(
            api.predict_url.as_str(),
            format!(
                "https://api.clarifai.com/v2/models/{}/outputs",
                crate::config::FACE_DETECT_MODEL
            )
        );
    }

    #[test]
    fn base_url_path_prefix_is_kept() {
        let cfg = Config {
            clarifai_base_url: Url::parse("https://gw.test/clarifai").unwrap(),
            face_model_id: "face".to_string(),
            ..Config::default()
        };
        let api = ClarifaiApi::new(&cfg).unwrap();
        assert_eq!(
            api.predict_url.as_str(),
            "https://gw.test/clarifai/v2/models/face/outputs"
        );
    }
}
