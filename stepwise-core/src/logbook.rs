//! # Logbook
//!
//! Append-only JSONL audit log for agent interactions.
//!
//! ## Design Philosophy
//! - One JSON object per line, one line per interaction
//! - Appends never rewrite earlier lines, so logs survive crashes mid-run
//! - A missing file reads as an empty history, not an error
//! - Records tolerate schema growth: absent optional fields decode as `None`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use stepwise_error::{Error, Result};

use crate::executor::ExecutionOutcome;

// =============================================================================
// LogRecord
// =============================================================================

/// One logged interaction.
///
/// Which optional fields are present depends on the agent mode: chat records
/// carry only an answer, planning records carry the plan and per-step results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// When the interaction finished
    pub timestamp: DateTime<Utc>,
    /// The user's question, verbatim
    pub question: String,
    /// The interpreted plan, or the raw reply when interpretation failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<serde_json::Value>,
    /// Per-step outcomes in plan order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ExecutionOutcome>,
    /// The final answer shown to the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl LogRecord {
    /// Start a record for a question, stamped with the current time
    pub fn now(question: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            question: question.into(),
            plan: None,
            results: None,
            answer: None,
        }
    }

    /// Attach the interpreted plan (or raw reply on interpretation failure)
    pub fn with_plan(mut self, plan: serde_json::Value) -> Self {
        self.plan = Some(plan);
        self
    }

    /// Attach per-step execution results
    pub fn with_results(mut self, results: ExecutionOutcome) -> Self {
        self.results = Some(results);
        self
    }

    /// Attach the final answer
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }
}

// =============================================================================
// Logbook
// =============================================================================

/// Append-only JSONL file of [`LogRecord`]s
#[derive(Debug, Clone)]
pub struct Logbook {
    path: PathBuf,
}

impl Logbook {
    /// Create a logbook backed by the given file path.
    ///
    /// The file is created on first append, not here.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single JSON line
    pub fn append(&self, record: &LogRecord) -> Result<()> {
        let line = serde_json::to_string(record).map_err(|e| {
            Error::serialization_failed("could not serialize log record")
                .with_operation("logbook::append")
                .set_source(e)
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                Error::from(e)
                    .with_operation("logbook::append")
                    .with_context("path", self.path.display().to_string())
            })?;

        writeln!(file, "{}", line).map_err(|e| {
            Error::from(e)
                .with_operation("logbook::append")
                .with_context("path", self.path.display().to_string())
        })
    }

    /// Read every record in file order.
    ///
    /// A missing file yields an empty history. A malformed line is an error
    /// naming the line number.
    pub fn read_all(&self) -> Result<Vec<LogRecord>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::from(e)
                    .with_operation("logbook::read_all")
                    .with_context("path", self.path.display().to_string()))
            }
        };

        let mut records = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(line).map_err(|e| {
                Error::parse_failed(format!("line {}: {}", index + 1, e))
                    .with_operation("logbook::read_all")
                    .with_context("path", self.path.display().to_string())
            })?;
            records.push(record);
        }
        Ok(records)
    }

    /// Read the most recent `limit` records in file order
    pub fn tail(&self, limit: usize) -> Result<Vec<LogRecord>> {
        let mut records = self.read_all()?;
        if records.len() > limit {
            records.drain(..records.len() - limit);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::StepResult;
    use tempfile::TempDir;

    fn logbook_in(dir: &TempDir) -> Logbook {
        Logbook::new(dir.path().join("interactions.jsonl"))
    }

    #[test]
    fn test_append_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let logbook = logbook_in(&dir);

        let record = LogRecord::now("What is 2+2?").with_answer("Use a calculator.");
        logbook.append(&record).unwrap();

        let records = logbook.read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "What is 2+2?");
        assert_eq!(records[0].answer.as_deref(), Some("Use a calculator."));
        assert!(records[0].plan.is_none());
    }

    #[test]
    fn test_append_preserves_earlier_lines() {
        let dir = TempDir::new().unwrap();
        let logbook = logbook_in(&dir);

        for i in 0..3 {
            logbook
                .append(&LogRecord::now(format!("question {}", i)))
                .unwrap();
        }

        let records = logbook.read_all().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].question, "question 0");
        assert_eq!(records[2].question, "question 2");
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let logbook = logbook_in(&dir);
        assert!(logbook.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_record_with_plan_and_results() {
        let dir = TempDir::new().unwrap();
        let logbook = logbook_in(&dir);

        let outcome = ExecutionOutcome::new(vec![StepResult::ok(0, "Answer: Rome")]);
        let record = LogRecord::now("capital of Italy?")
            .with_plan(serde_json::json!({"steps": [{"action": "answer_direct", "response": "Rome"}]}))
            .with_results(outcome)
            .with_answer("Answer: Rome");
        logbook.append(&record).unwrap();

        let records = logbook.read_all().unwrap();
        let results = records[0].results.as_ref().unwrap();
        assert_eq!(results.len(), 1);
        assert!(results.results()[0].is_ok());
    }

    #[test]
    fn test_optional_fields_stay_off_the_wire() {
        let record = LogRecord::now("hi").with_answer("hello");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("plan").is_none());
        assert!(json.get("results").is_none());
        assert_eq!(json["answer"], "hello");
    }

    #[test]
    fn test_tail_keeps_most_recent() {
        let dir = TempDir::new().unwrap();
        let logbook = logbook_in(&dir);

        for i in 0..5 {
            logbook
                .append(&LogRecord::now(format!("question {}", i)))
                .unwrap();
        }

        let tail = logbook.tail(2).unwrap();
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].question, "question 3");
        assert_eq!(tail[1].question, "question 4");

        // Asking for more than exists returns everything.
        assert_eq!(logbook.tail(100).unwrap().len(), 5);
    }

    #[test]
    fn test_malformed_line_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("interactions.jsonl");
        std::fs::write(&path, "not json\n").unwrap();

        let err = Logbook::new(&path).read_all().unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
