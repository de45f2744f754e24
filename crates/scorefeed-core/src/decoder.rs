use serde_json::Value;

use crate::error::FetchError;
use crate::http_client::HttpResponse;

/// Turn a raw response into a JSON value.
///
/// Only 2xx bodies are parsed. Any other status is reported as
/// [`FetchError::Http`] with the body kept as text.
pub fn decode(response: &HttpResponse) -> Result<Value, FetchError> {
    if !response.is_success() {
        return Err(FetchError::http(response.status, response.body.clone()));
    }

    serde_json::from_str(&response.body).map_err(|error| FetchError::Parse {
        raw: response.body.clone(),
        cause: error.to_string(),
    })
}
