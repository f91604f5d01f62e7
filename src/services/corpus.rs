use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::loaders::{self, table, CorpusFormat};
use crate::model::entry::Entry;
use crate::model::session::SessionState;
use crate::services::{encoding, fetch};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CorpusKind {
    Text,
    Characters,
}

#[derive(Debug)]
pub struct LoadedCorpus {
    pub name: String,
    pub origin: String,
    pub kind: CorpusKind,
    pub format: CorpusFormat,
    pub encoding: String,
    pub fingerprint: String,
    pub entries: Vec<Entry>,
}

impl LoadedCorpus {
    pub fn summary(&self) -> CorpusSummary {
        CorpusSummary {
            name: self.name.clone(),
            origin: self.origin.clone(),
            kind: self.kind,
            format: self.format,
            encoding: self.encoding.clone(),
            fingerprint: self.fingerprint.clone(),
            entries: self.entries.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CorpusSummary {
    pub name: String,
    pub origin: String,
    pub kind: CorpusKind,
    pub format: CorpusFormat,
    pub encoding: String,
    pub fingerprint: String,
    pub entries: usize,
}

// Todas as abas carregadas vivem aqui, na ordem de carga. Recarregar um
// nome existente substitui o corpus inteiro, nunca mescla.
#[derive(Debug, Default)]
pub struct CorpusCache {
    corpora: Vec<LoadedCorpus>,
}

impl CorpusCache {
    pub fn new() -> Self {
        CorpusCache::default()
    }

    pub fn load(
        &mut self,
        name: &str,
        origin: &str,
        kind: CorpusKind,
        format: Option<CorpusFormat>,
    ) -> Result<&LoadedCorpus, String> {
        let corpus = load_corpus(name, origin, kind, format)?;

        let idx = match self.corpora.iter().position(|c| c.name == name) {
            Some(i) => {
                self.corpora[i] = corpus;
                i
            }
            None => {
                self.corpora.push(corpus);
                self.corpora.len() - 1
            }
        };

        Ok(&self.corpora[idx])
    }

    // O corpus antigo só sai quando a nova carga inteira deu certo.
    pub fn reload(&mut self, name: &str) -> Result<(bool, &LoadedCorpus), String> {
        let idx = self
            .corpora
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| format!("unknown corpus: {name}"))?;

        let (origin, kind, format) = {
            let current = &self.corpora[idx];
            (current.origin.clone(), current.kind, current.format)
        };

        let fresh = load_corpus(name, &origin, kind, Some(format))?;
        let changed = fresh.fingerprint != self.corpora[idx].fingerprint;
        self.corpora[idx] = fresh;

        Ok((changed, &self.corpora[idx]))
    }

    pub fn invalidate(&mut self, name: &str) -> Result<(), String> {
        let idx = self
            .corpora
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| format!("unknown corpus: {name}"))?;
        self.corpora.remove(idx);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&LoadedCorpus> {
        self.corpora.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoadedCorpus> {
        self.corpora.iter()
    }

    pub fn list(&self) -> Vec<CorpusSummary> {
        self.corpora.iter().map(|c| c.summary()).collect()
    }

    // Exporta no layout de tabela; rascunhos da sessão, quando dados,
    // substituem a tradução da linha correspondente. Rascunho vazio não
    // apaga a tradução armazenada.
    pub fn export(
        &self,
        name: &str,
        path: &Path,
        processed_at: &str,
        drafts: Option<&SessionState>,
    ) -> Result<usize, String> {
        let corpus = self
            .get(name)
            .ok_or_else(|| format!("unknown corpus: {name}"))?;

        let entries: Vec<Entry> = match drafts {
            Some(session) => corpus
                .entries
                .iter()
                .cloned()
                .map(|mut e| {
                    if let Some(draft) = session.translations.get(&e.row_key()) {
                        if !draft.is_empty() {
                            e.translated_text = draft.clone();
                        }
                    }
                    e
                })
                .collect(),
            None => corpus.entries.clone(),
        };

        let text = table::render(&entries, processed_at)?;
        write_atomic(path, text.as_bytes())?;

        Ok(entries.len())
    }
}

fn load_corpus(
    name: &str,
    origin: &str,
    kind: CorpusKind,
    format: Option<CorpusFormat>,
) -> Result<LoadedCorpus, String> {
    let bytes = read_origin(origin)?;
    let (text, encoding_name) = encoding::decode_bytes(&bytes);

    let format = match format {
        Some(f) => f,
        None => {
            // querystring e fragmento não participam da detecção de formato
            let origin_path = origin
                .split(|c| c == '?' || c == '#')
                .next()
                .unwrap_or(origin);
            loaders::detect_format(Path::new(origin_path), &text)?
        }
    };
    let entries = loaders::parse(format, &text)?;

    Ok(LoadedCorpus {
        name: name.to_string(),
        origin: origin.to_string(),
        kind,
        format,
        encoding: encoding_name,
        fingerprint: fingerprint(&bytes),
        entries,
    })
}

fn read_origin(origin: &str) -> Result<Vec<u8>, String> {
    if fetch::is_remote(origin) {
        fetch::fetch_bytes(origin)
    } else {
        fs::read(origin).map_err(|e| format!("failed to read {origin}: {e}"))
    }
}

fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), String> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }

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
        None => "corpus".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    const CSV_V1: &str = "\
RowNumber,SheetName,Context,Key,Utterer,SourceEnglish,TranslatedDutch,ProcessedAt
2,Chapter1,,Chapter1:2,Trusty Ass,Hello there,Hallo daar,
3,Chapter1,,Chapter1:3,,   ,orphan,
4,Chapter1,,Chapter1:4,Wise Ox,Old Sign,Oud bord,
";

    const CSV_V2: &str = "\
RowNumber,SheetName,Context,Key,Utterer,SourceEnglish,TranslatedDutch,ProcessedAt
2,Chapter1,,Chapter1:2,,Goodbye,Vaarwel,
";

    fn temp_file(name: &str) -> PathBuf {
        let mut p = env::temp_dir();
        p.push(format!("vertaal-corpus-{}-{}", std::process::id(), name));
        p
    }

    fn write_with_bom(path: &Path, text: &str) {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(text.as_bytes());
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn load_reads_decodes_and_normalizes() {
        let path = temp_file("load.csv");
        write_with_bom(&path, CSV_V1);

        let mut cache = CorpusCache::new();
        let corpus = cache
            .load("main", path.to_str().unwrap(), CorpusKind::Text, None)
            .unwrap();

        assert_eq!(corpus.entries.len(), 2);
        assert_eq!(corpus.entries[0].source_text, "Hello there");
        assert_eq!(corpus.encoding, "utf-8-sig");
        assert_eq!(corpus.format, CorpusFormat::Table);
        assert_eq!(corpus.fingerprint.len(), 64);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn loading_same_name_replaces_wholesale() {
        let path = temp_file("replace.csv");
        write_with_bom(&path, CSV_V1);

        let mut cache = CorpusCache::new();
        cache
            .load("main", path.to_str().unwrap(), CorpusKind::Text, None)
            .unwrap();
        let first_fp = cache.get("main").unwrap().fingerprint.clone();

        write_with_bom(&path, CSV_V2);
        cache
            .load("main", path.to_str().unwrap(), CorpusKind::Text, None)
            .unwrap();

        let corpus = cache.get("main").unwrap();
        assert_eq!(cache.list().len(), 1);
        assert_eq!(corpus.entries.len(), 1);
        assert_eq!(corpus.entries[0].source_text, "Goodbye");
        assert_ne!(corpus.fingerprint, first_fp);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn reload_reports_whether_content_changed() {
        let path = temp_file("reload.csv");
        write_with_bom(&path, CSV_V1);

        let mut cache = CorpusCache::new();
        cache
            .load("main", path.to_str().unwrap(), CorpusKind::Text, None)
            .unwrap();

        let (changed, _) = cache.reload("main").unwrap();
        assert!(!changed);

        write_with_bom(&path, CSV_V2);
        let (changed, corpus) = cache.reload("main").unwrap();
        assert!(changed);
        assert_eq!(corpus.entries.len(), 1);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn failed_reload_keeps_the_old_corpus() {
        let path = temp_file("reload-gone.csv");
        write_with_bom(&path, CSV_V1);

        let mut cache = CorpusCache::new();
        cache
            .load("main", path.to_str().unwrap(), CorpusKind::Text, None)
            .unwrap();
        fs::remove_file(&path).unwrap();

        assert!(cache.reload("main").is_err());

        let corpus = cache.get("main").unwrap();
        assert_eq!(corpus.entries.len(), 2);
    }

    #[test]
    fn unknown_names_are_errors() {
        let mut cache = CorpusCache::new();
        assert!(cache.reload("nope").unwrap_err().contains("unknown corpus"));
        assert!(cache
            .invalidate("nope")
            .unwrap_err()
            .contains("unknown corpus"));
    }

    #[test]
    fn invalidate_removes_and_list_keeps_load_order() {
        let path_a = temp_file("order-a.csv");
        let path_b = temp_file("order-b.csv");
        write_with_bom(&path_a, CSV_V1);
        write_with_bom(&path_b, CSV_V2);

        let mut cache = CorpusCache::new();
        cache
            .load("b", path_b.to_str().unwrap(), CorpusKind::Text, None)
            .unwrap();
        cache
            .load("a", path_a.to_str().unwrap(), CorpusKind::Characters, None)
            .unwrap();

        let names: Vec<String> = cache.list().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["b", "a"]);

        cache.invalidate("b").unwrap();
        let names: Vec<String> = cache.list().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["a"]);
        assert!(cache.get("b").is_none());

        fs::remove_file(&path_a).ok();
        fs::remove_file(&path_b).ok();
    }

    #[test]
    fn export_writes_the_table_layout_atomically() {
        let src = temp_file("export-src.csv");
        let dst = temp_file("export-dst.csv");
        write_with_bom(&src, CSV_V1);

        let mut cache = CorpusCache::new();
        cache
            .load("main", src.to_str().unwrap(), CorpusKind::Text, None)
            .unwrap();

        let rows = cache.export("main", &dst, "2024-06-01", None).unwrap();
        assert_eq!(rows, 2);

        let written = fs::read_to_string(&dst).unwrap();
        assert!(written.starts_with("RowNumber,SheetName"));
        assert!(written.contains("Hello there"));
        assert!(written.contains("2024-06-01"));
        assert!(!tmp_path(&dst).exists());

        fs::remove_file(&src).ok();
        fs::remove_file(&dst).ok();
    }

    #[test]
    fn export_applies_session_drafts() {
        let src = temp_file("export-draft-src.csv");
        let dst = temp_file("export-draft-dst.csv");
        write_with_bom(&src, CSV_V1);

        let mut cache = CorpusCache::new();
        cache
            .load("main", src.to_str().unwrap(), CorpusKind::Text, None)
            .unwrap();

        let mut session = SessionState::new("s");
        session
            .translations
            .insert("Chapter1:4".to_string(), "Oud uithangbord".to_string());
        session
            .translations
            .insert("Chapter1:2".to_string(), String::new());

        cache.export("main", &dst, "", Some(&session)).unwrap();

        let written = fs::read_to_string(&dst).unwrap();
        assert!(written.contains("Oud uithangbord"));
        assert!(!written.contains("Oud bord"));
        // rascunho vazio não apagou a tradução da linha 2
        assert!(written.contains("Hallo daar"));

        fs::remove_file(&src).ok();
        fs::remove_file(&dst).ok();
    }
}
