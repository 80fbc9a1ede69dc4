use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

/// One journal line per submitted prompt.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRecord<'a> {
    pub timestamp: String,
    pub prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_personality: Option<&'a str>,
    /// Caller-supplied opaque metadata, carried through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a serde_json::Value>,
    pub outcome: &'a str,
}

/// Best-effort prompt journal. Writes are append-only JSONL, one file per day;
/// a failed write is logged and swallowed so the generation outcome is never
/// affected.
pub struct PromptLog {
    dir: PathBuf,
}

impl PromptLog {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn record(&self, record: &PromptRecord<'_>) {
        if let Err(e) = self.append(record) {
            warn!(error = %e, "prompt journal write failed");
        }
    }

    fn append(&self, record: &PromptRecord<'_>) -> Result<(), std::io::Error> {
        std::fs::create_dir_all(&self.dir)?;
        let name = format!("prompts-{}.jsonl", chrono::Utc::now().format("%Y%m%d"));
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(name))?;
        let line = serde_json::to_string(record).map_err(std::io::Error::other)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}
