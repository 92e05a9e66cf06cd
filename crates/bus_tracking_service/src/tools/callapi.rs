use crate::tools::error::AppError;
use reqwest::{Client, Method, Url};
use serde::{de::DeserializeOwned, Serialize};

pub async fn call_api<T, B>(
    method: Method,
    url: &Url,
    headers: Vec<(&str, &str)>,
    body: Option<B>,
) -> Result<T, AppError>
where
    T: DeserializeOwned,
    B: Serialize,
{
    let client = Client::new();

    let mut request_builder = client.request(method, url.to_owned());

    for (header_name, header_value) in headers {
        request_builder = request_builder.header(header_name, header_value);
    }

    if let Some(body) = body {
        let body = serde_json::to_string(&body)
            .map_err(|err| AppError::SerializationError(err.to_string()))?;
        request_builder = request_builder.body(body);
    }

    let resp = request_builder
        .send()
        .await
        .map_err(|err| AppError::ExternalAPICallError(err.to_string()))?;

    if !resp.status().is_success() {
        return Err(AppError::ExternalAPICallError(format!(
            "{} : {}",
            url,
            resp.status()
        )));
    }

    resp.json::<T>()
        .await
        .map_err(|err| AppError::DeserializationError(err.to_string()))
}
