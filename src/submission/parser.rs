use axum::http::HeaderMap;
use serde_json::{Map, Value};

/// Parse a request body based on Content-Type header.
/// Bodies without a recognised form type are treated as JSON.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<Value, String> {
    let ct = content_type
        .unwrap_or("application/json")
        .to_ascii_lowercase();

    if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)
    } else if ct.contains("multipart/form-data") {
        Err("multipart".to_string())
    } else {
        serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))
    }
}

fn parse_form_urlencoded(body: &[u8]) -> Result<Value, String> {
    let body_str = std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;

    let map: Map<String, Value> = form_urlencoded::parse(body_str.as_bytes())
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect();

    Ok(Value::Object(map))
}

/// Parse multipart form data using multer. File parts are rejected.
pub async fn parse_multipart(headers: &HeaderMap, body: bytes::Bytes) -> Result<Value, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut map = Map::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        if field.file_name().is_some() {
            return Err("File uploads are not accepted".to_string());
        }
        let Some(name) = field.name().map(|n| n.to_string()) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| format!("Field read error: {e}"))?;
        map.insert(name, Value::String(value));
    }

    Ok(Value::Object(map))
}
