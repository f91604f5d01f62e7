use std::fs;
use std::path::{Path, PathBuf};

use crate::model::session::SessionState;

pub fn default_base_dir() -> PathBuf {
    if let Ok(data) = std::env::var("VERTAAL_DATA_DIR") {
        return PathBuf::from(data).join("Sessions");
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("Sessions")
}

/// Converte o nome da sessão (que pode vir zoado como path) em nome
/// seguro de arquivo: basename se parecer caminho, depois só
/// letras/números/espaços/_-.
fn safe_session_file_name(name: &str) -> String {
    let mut n = name.trim().to_string();

    if n.contains('\\') || n.contains('/') {
        if let Some(last) = n
            .rsplit(|c| c == '\\' || c == '/')
            .find(|s| !s.trim().is_empty())
        {
            n = last.trim().to_string();
        }
    }

    let mut out = String::with_capacity(n.len());
    for ch in n.chars() {
        let ok = ch.is_ascii_alphanumeric() || ch == ' ' || ch == '_' || ch == '-' || ch == '.';
        out.push(if ok { ch } else { '_' });
    }

    let out = out.trim().trim_matches('.').to_string();
    if out.is_empty() {
        "Session".to_string()
    } else {
        out
    }
}

fn session_path(base: &Path, name: &str) -> PathBuf {
    base.join(format!("{}.json", safe_session_file_name(name)))
}

pub fn open_or_create(base: &Path, name: &str) -> Result<SessionState, String> {
    let path = session_path(base, name);

    if !path.exists() {
        return Ok(SessionState::new(name));
    }

    let data = fs::read_to_string(&path).map_err(|e| format!("failed to read session: {e}"))?;
    serde_json::from_str::<SessionState>(&data).map_err(|e| format!("invalid session file: {e}"))
}

pub fn save(base: &Path, session: &SessionState) -> Result<PathBuf, String> {
    fs::create_dir_all(base).map_err(|e| format!("failed to create sessions directory: {e}"))?;

    let path = session_path(base, &session.name);
    let json = serde_json::to_string_pretty(session)
        .map_err(|e| format!("failed to serialize session: {e}"))?;

    write_atomic(&path, json.as_bytes())?;

    Ok(path)
}

// Rascunho novo ou revisado entra no mesmo lugar: última escrita vence.
pub fn submit_row(session: &mut SessionState, row_key: &str, draft: &str) {
    session
        .translations
        .insert(row_key.to_string(), draft.to_string());
}

pub fn list(base: &Path) -> Vec<String> {
    let mut names = Vec::new();

    if let Ok(entries) = fs::read_dir(base) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
    }

    names.sort();
    names
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), String> {
    let tmp = tmp_path(path);

    fs::write(&tmp, bytes).map_err(|e| e.to_string())?;

    if path.exists() {
        fs::remove_file(path).map_err(|e| e.to_string())?;
    }

    fs::rename(&tmp, path).map_err(|e| e.to_string())?;

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "session".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}
