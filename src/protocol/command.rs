#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    CorpusLoad,
    CorpusList,
    CorpusReload,
    CorpusInvalidate,
    CorpusExport,
    MatchFind,
    MatchHighlight,
    PlaceholderExtract,
    DetectEncoding,
    SessionOpen,
    SessionSave,
    SessionSubmitRow,
    SessionSetIndex,
    SessionList,
    ReviewRun,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "corpus.load" => Command::CorpusLoad,
            "corpus.list" => Command::CorpusList,
            "corpus.reload" => Command::CorpusReload,
            "corpus.invalidate" => Command::CorpusInvalidate,
            "corpus.export" => Command::CorpusExport,
            "match.find" => Command::MatchFind,
            "match.highlight" => Command::MatchHighlight,
            "placeholder.extract" => Command::PlaceholderExtract,
            "encoding.detect" => Command::DetectEncoding,
            "session.open" => Command::SessionOpen,
            "session.save" => Command::SessionSave,
            "session.submit_row" => Command::SessionSubmitRow,
            "session.set_index" => Command::SessionSetIndex,
            "session.list" => Command::SessionList,
            "review.run" => Command::ReviewRun,
            _ => Command::Unknown,
        }
    }
}
