use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::loaders::CorpusFormat;
use crate::model::session::SessionState;
use crate::services::corpus::{CorpusCache, CorpusKind};
use crate::services::matching::matcher::{find_matches, rank_matches};
use crate::services::matching::placeholder;
use crate::services::{encoding, review, session, suggest};

mod command;
use command::Command;

// Todo estado mutável do core mora aqui; o loop do main passa a mesma
// instância para cada linha de comando.
pub struct AppState {
    pub cache: CorpusCache,
    pub sessions_dir: PathBuf,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            cache: CorpusCache::new(),
            sessions_dir: session::default_base_dir(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new()
    }
}

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload<'a>(req: &'a Value) -> &'a Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

fn parse_kind(s: &str) -> Result<CorpusKind, String> {
    match s {
        "" | "text" => Ok(CorpusKind::Text),
        "characters" => Ok(CorpusKind::Characters),
        other => Err(format!("invalid payload.kind: {other:?}")),
    }
}

fn parse_format(s: &str) -> Result<Option<CorpusFormat>, String> {
    match s {
        "" => Ok(None),
        "table" => Ok(Some(CorpusFormat::Table)),
        "sheets" => Ok(Some(CorpusFormat::Sheets)),
        "grid" => Ok(Some(CorpusFormat::Grid)),
        other => Err(format!("invalid payload.format: {other:?}")),
    }
}

fn derive_corpus_name(origin: &str) -> String {
    let origin_path = origin
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or(origin);
    Path::new(origin_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "corpus".to_string())
}

// O índice atual só é limitado quando o corpus da sessão está em cache;
// sem ele o valor pedido fica como está.
fn clamp_index(cache: &CorpusCache, session: &mut SessionState) {
    if let Some(corpus) = cache.get(&session.corpus) {
        let max = corpus.entries.len().saturating_sub(1);
        if session.current_index > max {
            session.current_index = max;
        }
    }
}

fn default_processed_at() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        .to_string()
}

pub fn handle(state: &mut AppState, input: &str) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(_) => {
            return json!({
                "status": "error",
                "message": "invalid json"
            })
            .to_string();
        }
    };

    let id = get_id(&req);
    let cmd_str = get_cmd(&req);
    let payload = get_payload(&req);

    match Command::from(cmd_str) {
        Command::Ping => ok(id, json!({ "message": "vertaal-core alive" })),

        Command::CorpusLoad => {
            let origin = payload.get("origin").and_then(|v| v.as_str()).unwrap_or("");
            if origin.is_empty() {
                return err(id, "payload.origin is required");
            }

            let name = match payload.get("name").and_then(|v| v.as_str()) {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => derive_corpus_name(origin),
            };

            let kind = match parse_kind(payload.get("kind").and_then(|v| v.as_str()).unwrap_or(""))
            {
                Ok(k) => k,
                Err(e) => return err(id, e),
            };

            let format =
                match parse_format(payload.get("format").and_then(|v| v.as_str()).unwrap_or("")) {
                    Ok(f) => f,
                    Err(e) => return err(id, e),
                };

            match state.cache.load(&name, origin, kind, format) {
                Ok(corpus) => ok(id, json!({ "corpus": corpus.summary() })),
                Err(e) => err(id, e),
            }
        }

        Command::CorpusList => ok(id, json!({ "corpora": state.cache.list() })),

        Command::CorpusReload => {
            let name = payload.get("name").and_then(|v| v.as_str()).unwrap_or("");
            if name.is_empty() {
                return err(id, "payload.name is required");
            }

            match state.cache.reload(name) {
                Ok((changed, corpus)) => {
                    ok(id, json!({ "corpus": corpus.summary(), "changed": changed }))
                }
                Err(e) => err(id, e),
            }
        }

        Command::CorpusInvalidate => {
            let name = payload.get("name").and_then(|v| v.as_str()).unwrap_or("");
            if name.is_empty() {
                return err(id, "payload.name is required");
            }

            match state.cache.invalidate(name) {
                Ok(()) => ok(id, json!({ "removed": name })),
                Err(e) => err(id, e),
            }
        }

        Command::CorpusExport => {
            let name = payload.get("name").and_then(|v| v.as_str()).unwrap_or("");
            if name.is_empty() {
                return err(id, "payload.name is required");
            }
            let path_str = payload.get("path").and_then(|v| v.as_str()).unwrap_or("");
            if path_str.is_empty() {
                return err(id, "payload.path is required");
            }

            let processed_at = payload
                .get("processed_at")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(default_processed_at);

            let drafts = match payload.get("session").and_then(|v| v.as_str()) {
                Some(session_name) if !session_name.is_empty() => {
                    match session::open_or_create(&state.sessions_dir, session_name) {
                        Ok(s) => Some(s),
                        Err(e) => return err(id, e),
                    }
                }
                _ => None,
            };

            match state
                .cache
                .export(name, Path::new(path_str), &processed_at, drafts.as_ref())
            {
                Ok(rows) => ok(id, json!({ "path": path_str, "rows": rows })),
                Err(e) => err(id, e),
            }
        }

        Command::MatchFind => {
            let query = payload.get("query").and_then(|v| v.as_str()).unwrap_or("");

            match payload.get("corpus").and_then(|v| v.as_str()) {
                Some(corpus_name) if !corpus_name.is_empty() => {
                    let corpus = match state.cache.get(corpus_name) {
                        Some(c) => c,
                        None => return err(id, format!("unknown corpus: {corpus_name}")),
                    };
                    let mut matches = find_matches(query, &corpus.entries);
                    rank_matches(&mut matches);
                    let group = suggest::CorpusMatches {
                        corpus: corpus.name.clone(),
                        matches,
                    };
                    ok(id, json!({ "results": [group] }))
                }
                _ => ok(
                    id,
                    json!({ "results": suggest::collect_matches(query, &state.cache) }),
                ),
            }
        }

        Command::MatchHighlight => {
            let query = payload.get("query").and_then(|v| v.as_str()).unwrap_or("");
            let (matches, spans) = suggest::collect_spans(query, &state.cache);
            ok(id, json!({ "matches": matches, "spans": spans }))
        }

        Command::PlaceholderExtract => {
            let text = payload.get("text").and_then(|v| v.as_str()).unwrap_or("");
            let marker = payload
                .get("marker")
                .and_then(|v| v.as_str())
                .unwrap_or(placeholder::DEFAULT_NAME_MARKER);

            let characters = suggest::character_entries(&state.cache);
            let candidates = placeholder::extract_with_characters(text, marker, &characters);
            let placeholders: Vec<String> = candidates
                .iter()
                .map(|c| placeholder::bracketed(c))
                .collect();

            ok(
                id,
                json!({ "candidates": candidates, "placeholders": placeholders }),
            )
        }

        Command::DetectEncoding => {
            let path_str = payload.get("path").and_then(|v| v.as_str()).unwrap_or("");
            if path_str.is_empty() {
                return err(id, "payload.path is required");
            }
            let path = PathBuf::from(path_str);
            match encoding::detect_from_file(&path) {
                Ok(result) => ok(id, serde_json::to_value(result).unwrap_or(json!({}))),
                Err(e) => err(id, e),
            }
        }

        Command::SessionOpen => {
            let name = payload.get("name").and_then(|v| v.as_str()).unwrap_or("");
            if name.is_empty() {
                return err(id, "payload.name is required");
            }

            match session::open_or_create(&state.sessions_dir, name) {
                Ok(s) => ok(id, json!({ "session": s })),
                Err(e) => err(id, e),
            }
        }

        Command::SessionSave => {
            let session_val = payload.get("session").cloned().unwrap_or(Value::Null);
            if session_val.is_null() {
                return err(id, "payload.session is required");
            }

            let s: SessionState = match serde_json::from_value(session_val) {
                Ok(v) => v,
                Err(e) => return err(id, format!("invalid payload.session: {e}")),
            };
            if s.name.trim().is_empty() {
                return err(id, "payload.session.name is required");
            }

            match session::save(&state.sessions_dir, &s) {
                Ok(_) => ok(id, json!({ "session": s })),
                Err(e) => err(id, e),
            }
        }

        Command::SessionSubmitRow => {
            let name = payload.get("name").and_then(|v| v.as_str()).unwrap_or("");
            if name.is_empty() {
                return err(id, "payload.name is required");
            }
            let sheet = payload.get("sheet").and_then(|v| v.as_str()).unwrap_or("");
            let row = match payload.get("row").and_then(|v| v.as_u64()) {
                Some(r) => r,
                None => return err(id, "payload.row is required"),
            };
            let translation = match payload.get("translation").and_then(|v| v.as_str()) {
                Some(t) => t,
                None => return err(id, "payload.translation is required"),
            };
            let advance = payload
                .get("advance")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);

            let mut s = match session::open_or_create(&state.sessions_dir, name) {
                Ok(s) => s,
                Err(e) => return err(id, e),
            };

            session::submit_row(&mut s, &format!("{sheet}:{row}"), translation);
            if advance {
                // saturante: um arquivo de sessão pode trazer o índice no teto
                s.current_index = s.current_index.saturating_add(1);
                clamp_index(&state.cache, &mut s);
            }

            if let Err(e) = session::save(&state.sessions_dir, &s) {
                return err(id, e);
            }
            ok(id, json!({ "session": s }))
        }

        Command::SessionSetIndex => {
            let name = payload.get("name").and_then(|v| v.as_str()).unwrap_or("");
            if name.is_empty() {
                return err(id, "payload.name is required");
            }
            let index = match payload.get("index").and_then(|v| v.as_u64()) {
                Some(i) => i as usize,
                None => return err(id, "payload.index is required"),
            };

            let mut s = match session::open_or_create(&state.sessions_dir, name) {
                Ok(s) => s,
                Err(e) => return err(id, e),
            };

            s.current_index = index;
            clamp_index(&state.cache, &mut s);

            if let Err(e) = session::save(&state.sessions_dir, &s) {
                return err(id, e);
            }
            ok(id, json!({ "session": s }))
        }

        Command::SessionList => ok(id, json!({ "sessions": session::list(&state.sessions_dir) })),

        Command::ReviewRun => {
            let corpus_name = payload.get("corpus").and_then(|v| v.as_str()).unwrap_or("");
            if corpus_name.is_empty() {
                return err(id, "payload.corpus is required");
            }
            let marker = payload
                .get("marker")
                .and_then(|v| v.as_str())
                .unwrap_or(placeholder::DEFAULT_NAME_MARKER);

            let session_state = match payload.get("session").and_then(|v| v.as_str()) {
                Some(n) if !n.is_empty() => {
                    match session::open_or_create(&state.sessions_dir, n) {
                        Ok(s) => s,
                        Err(e) => return err(id, e),
                    }
                }
                _ => SessionState::default(),
            };

            let corpus = match state.cache.get(corpus_name) {
                Some(c) => c,
                None => return err(id, format!("unknown corpus: {corpus_name}")),
            };

            let characters = suggest::character_entries(&state.cache);
            let issues = review::run(&corpus.entries, &session_state, &characters, marker);
            ok(id, json!({ "issues": issues }))
        }

        Command::Unknown => err(id, "unknown command"),
    }
}
