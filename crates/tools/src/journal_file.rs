//! Session journals on disk.
//!
//! A journal file is JSON lines. The first line is a `SessionHeader` naming the session
//! (user, seed, tree layout, build). Every following line is one recorded action plus a
//! SHA-256 digest over the previous digest and the action. The chain is anchored on the
//! header line, so editing the seed or user breaks it just like editing an action.
//! Each line is flushed as it is written; a crash leaves at worst one cut-short line.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use grove::journal::{ActionRecord, JOURNAL_FORMAT_VERSION, SessionJournal};
use grove::mapgen::LayoutError;
use grove::{TreeLayout, replay::*};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionHeader {
    pub format_version: u16,
    pub build_id: String,
    pub user: String,
    pub seed: u64,
    pub layout: TreeLayout,
}

impl From<&SessionJournal> for SessionHeader {
    fn from(journal: &SessionJournal) -> Self {
        Self {
            format_version: journal.format_version,
            build_id: journal.build_id.clone(),
            user: journal.user.clone(),
            seed: journal.seed,
            layout: journal.layout.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct LinkedAction {
    record: ActionRecord,
    digest: String,
}

#[derive(Debug, Error)]
pub enum JournalFileError {
    #[error("journal I/O failed")]
    Io(#[from] io::Error),
    #[error("journal entry could not be encoded")]
    Encode(#[from] serde_json::Error),
    #[error("journal file has no header line")]
    MissingHeader,
    #[error("line {line} is cut short")]
    Truncated { line: usize },
    #[error("line {line} is not a valid journal entry")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("journal format version {found} is not supported")]
    UnsupportedVersion { found: u16 },
    #[error("journal layout is invalid")]
    InvalidLayout(#[from] LayoutError),
    #[error("line {line} holds action {found}, expected {expected}")]
    OutOfSequence { line: usize, expected: u64, found: u64 },
    #[error("line {line} does not match the digest chain")]
    Tampered { line: usize },
}

fn chain(previous: &str, line: &str) -> String {
    let digest = Sha256::new().chain_update(previous).chain_update(line).finalize();
    format!("{digest:x}")
}

/// Streams a session to disk one action at a time.
pub struct JournalWriter {
    out: BufWriter<File>,
    digest: String,
    next_seq: u64,
}

impl JournalWriter {
    pub fn create(path: &Path, header: &SessionHeader) -> Result<Self, JournalFileError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = BufWriter::new(File::create(path)?);
        let header_line = serde_json::to_string(header)?;
        writeln!(out, "{header_line}")?;
        out.flush()?;
        Ok(Self { out, digest: chain("", &header_line), next_seq: 0 })
    }

    /// Appends `record`, which must carry the next sequence number.
    pub fn append(&mut self, record: &ActionRecord) -> Result<(), JournalFileError> {
        if record.seq != self.next_seq {
            return Err(JournalFileError::OutOfSequence {
                line: self.line(),
                expected: self.next_seq,
                found: record.seq,
            });
        }
        let digest = chain(&self.digest, &serde_json::to_string(record)?);
        let linked = LinkedAction { record: record.clone(), digest };
        writeln!(self.out, "{}", serde_json::to_string(&linked)?)?;
        self.out.flush()?;

        // Only advance once the line is on disk.
        self.digest = linked.digest;
        self.next_seq += 1;
        Ok(())
    }

    fn line(&self) -> usize {
        self.next_seq as usize + 2
    }
}

pub fn write_journal(path: &Path, journal: &SessionJournal) -> Result<(), JournalFileError> {
    let mut writer = JournalWriter::create(path, &SessionHeader::from(journal))?;
    for record in &journal.actions {
        writer.append(record)?;
    }
    Ok(())
}

/// Reads a journal back, checking the header, the sequence and every digest link.
pub fn read_journal(path: &Path) -> Result<SessionJournal, JournalFileError> {
    let content = fs::read_to_string(path)?;
    let mut lines = (1..).zip(content.split_inclusive('\n'));

    let (_, first) = lines.next().ok_or(JournalFileError::MissingHeader)?;
    let header_line = first.strip_suffix('\n').ok_or(JournalFileError::Truncated { line: 1 })?;
    let header: SessionHeader = serde_json::from_str(header_line)
        .map_err(|source| JournalFileError::Malformed { line: 1, source })?;
    if header.format_version != JOURNAL_FORMAT_VERSION {
        return Err(JournalFileError::UnsupportedVersion { found: header.format_version });
    }
    header.layout.validate()?;

    let mut journal = SessionJournal::with_layout(header.user, header.seed, header.layout);
    journal.build_id = header.build_id;
    let mut digest = chain("", header_line);

    for (line, raw) in lines {
        let text = raw.strip_suffix('\n').ok_or(JournalFileError::Truncated { line })?;
        let linked: LinkedAction = serde_json::from_str(text)
            .map_err(|source| JournalFileError::Malformed { line, source })?;

        let expected = journal.next_seq();
        if linked.record.seq != expected {
            return Err(JournalFileError::OutOfSequence {
                line,
                expected,
                found: linked.record.seq,
            });
        }
        if chain(&digest, &serde_json::to_string(&linked.record)?) != linked.digest {
            return Err(JournalFileError::Tampered { line });
        }

        digest = linked.digest;
        journal.actions.push(linked.record);
    }
    Ok(journal)
}

/// Reads `path` and replays it from scratch.
pub fn replay_file(path: &Path) -> anyhow::Result<(SessionJournal, ReplayResult)> {
    let journal = read_journal(path)?;
    let result = replay_journal(&journal)?;
    Ok((journal, result))
}
