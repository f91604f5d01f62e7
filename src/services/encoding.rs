use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

#[derive(Debug, Serialize)]
pub struct EncodingCandidate {
    pub name: String,
    pub confidence: f32,
}

#[derive(Debug, Serialize)]
pub struct EncodingDetectionResult {
    pub best: String,
    pub confidence: f32,
    pub candidates: Vec<EncodingCandidate>,
}

pub fn detect_from_file(path: &Path) -> Result<EncodingDetectionResult, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    Ok(detect_from_bytes(&bytes))
}

pub fn detect_from_bytes(bytes: &[u8]) -> EncodingDetectionResult {
    // BOM UTF-8 (EF BB BF)
    if bytes.starts_with(&UTF8_BOM) {
        return EncodingDetectionResult {
            best: "utf-8-sig".into(),
            confidence: 0.99,
            candidates: vec![
                EncodingCandidate {
                    name: "utf-8-sig".into(),
                    confidence: 0.99,
                },
                EncodingCandidate {
                    name: "utf-8".into(),
                    confidence: 0.90,
                },
            ],
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);

    let encoding = detector.guess(None, true);
    let best = encoding.name().to_lowercase();
    let confidence = estimate_confidence(bytes, encoding);

    let mut candidates = Vec::new();
    candidates.push(EncodingCandidate {
        name: best.clone(),
        confidence,
    });

    // Ambiguidades comuns em planilhas exportadas por ferramentas Windows
    if best == "windows-1252" {
        candidates.push(EncodingCandidate {
            name: "iso-8859-1".into(),
            confidence: (confidence - 0.03).max(0.0),
        });
        candidates.push(EncodingCandidate {
            name: "iso-8859-15".into(),
            confidence: (confidence - 0.05).max(0.0),
        });
    } else if best == "iso-8859-1" {
        candidates.push(EncodingCandidate {
            name: "windows-1252".into(),
            confidence: (confidence - 0.02).max(0.0),
        });
    }

    if best == "utf-8" {
        candidates.push(EncodingCandidate {
            name: "utf-8-sig".into(),
            confidence: (confidence - 0.20).max(0.0),
        });
    }

    EncodingDetectionResult {
        best,
        confidence,
        candidates,
    }
}

// Decodifica para String com a codificação detectada. Bytes inválidos
// viram U+FFFD em vez de abortar a carga.
pub fn decode_bytes(bytes: &[u8]) -> (String, String) {
    if bytes.starts_with(&UTF8_BOM) {
        let (text, _, _) = UTF_8.decode(&bytes[UTF8_BOM.len()..]);
        return (text.into_owned(), "utf-8-sig".into());
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);

    let encoding = detector.guess(None, true);
    let (text, _, _) = encoding.decode(bytes);

    (text.into_owned(), encoding.name().to_lowercase())
}

fn estimate_confidence(bytes: &[u8], encoding: &'static Encoding) -> f32 {
    let (text, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        return 0.35;
    }

    let len = text.len();
    if len < 64 {
        0.55
    } else if len < 512 {
        0.70
    } else if len < 4096 {
        0.82
    } else {
        0.90
    }
}
