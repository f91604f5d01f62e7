use rand::{thread_rng, Rng};
use reqwest::blocking::Client;
use reqwest::StatusCode;

use std::{thread, time::Duration};

const MAX_RETRIES: usize = 3;
const BASE_DELAY_MS: u64 = 500;
const TIMEOUT_SECS: u64 = 30;
const ERROR_SNIPPET_CHARS: usize = 400;

pub fn is_remote(origin: &str) -> bool {
    origin.starts_with("http://") || origin.starts_with("https://")
}

fn backoff(attempt: usize) -> Duration {
    let jitter: u64 = thread_rng().gen_range(0..200);
    let ms = BASE_DELAY_MS * (2_u64.pow(attempt as u32)) + jitter;
    Duration::from_millis(ms)
}

pub fn fetch_bytes(url: &str) -> Result<Vec<u8>, String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(TIMEOUT_SECS))
        .build()
        .map_err(|e| e.to_string())?;

    let mut last_err: Option<String> = None;

    for attempt in 0..MAX_RETRIES {
        match client.get(url).send() {
            Ok(resp) => {
                let status = resp.status();

                if status.is_success() {
                    match resp.bytes() {
                        Ok(body) => return Ok(body.to_vec()),
                        Err(err) => {
                            last_err = Some(err.to_string());
                            if attempt + 1 < MAX_RETRIES {
                                thread::sleep(backoff(attempt));
                                continue;
                            }
                            break;
                        }
                    }
                }

                // Corpo de erro pode trazer a mensagem real do servidor
                let text = match resp.text() {
                    Ok(t) => t,
                    Err(err) => {
                        last_err = Some(err.to_string());
                        thread::sleep(backoff(attempt));
                        continue;
                    }
                };

                last_err = Some(extract_error_message(status, &text));
                if should_retry_http(status) && attempt + 1 < MAX_RETRIES {
                    thread::sleep(backoff(attempt));
                    continue;
                }
                break;
            }
            Err(err) => {
                last_err = Some(err.to_string());
                if attempt + 1 < MAX_RETRIES {
                    thread::sleep(backoff(attempt));
                    continue;
                }
            }
        }
    }

    Err(format!(
        "failed to fetch {url}: {}",
        last_err.unwrap_or_else(|| "no response".to_string())
    ))
}

fn should_retry_http(status: StatusCode) -> bool {
    // 408/429/5xx tipicamente são temporários
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

fn extract_error_message(status: StatusCode, body_text: &str) -> String {
    // Tenta padrão comum: { "error": { "message": "..." } } ou { "message": "..." }
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body_text) {
        if let Some(msg) = v
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return format!("HTTP {}: {}", status.as_u16(), msg);
        }
        if let Some(msg) = v.get("message").and_then(|m| m.as_str()) {
            return format!("HTTP {}: {}", status.as_u16(), msg);
        }
    }

    // Fallback: corpo bruto (limitado)
    let trimmed = body_text.trim();
    let snippet: String = trimmed.chars().take(ERROR_SNIPPET_CHARS).collect();
    if snippet.len() < trimmed.len() {
        format!("HTTP {}: {}...", status.as_u16(), snippet)
    } else {
        format!("HTTP {}: {}", status.as_u16(), snippet)
    }
}
