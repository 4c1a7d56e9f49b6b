use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::info;

use crate::errors::Error;
use crate::retry::FetchOutcome;

use super::row;

/// Bytes read from the end of an existing log when looking for the last id.
const TAIL_WINDOW: u64 = 64 * 1024;

struct Sink {
    file: File,
    next_call_id: u64,
    /// The file does not end on a row boundary yet.
    needs_newline: bool,
}

impl Sink {
    async fn append(&mut self, outcome: &FetchOutcome) -> Result<u64, Error> {
        // Taken before writing: a failed write may already have put part of the row on disk.
        let call_id = self.next_call_id;
        self.next_call_id += 1;

        let mut line = String::new();
        if self.needs_newline {
            line.push('\n');
        }
        line.push_str(&row::format_row(call_id, outcome));
        line.push('\n');

        self.needs_newline = true;
        self.file.write_all(line.as_bytes()).await?;
        self.file.flush().await?;
        self.needs_newline = false;
        Ok(call_id)
    }
}

/// What the end of an existing log says about where to continue.
struct Tail {
    len: u64,
    last_call_id: Option<u64>,
    ends_with_newline: bool,
}

/// Append-only call log shared by every logical call of a connector.
///
/// Assigning the id and appending the row happen under one lock, so concurrent
/// callers always observe distinct ids. The append runs on its own task: a
/// caller that stops waiting cannot leave half a row behind.
pub struct CallLogger {
    path: PathBuf,
    sink: Arc<Mutex<Sink>>,
}

impl CallLogger {
    /// Opens the sink. With `overwrite` (or when the file does not exist) it is
    /// recreated with a header and ids start at 1; otherwise rows are appended
    /// and ids continue after the last row found.
    pub async fn open(path: impl AsRef<Path>, overwrite: bool) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let tail = if overwrite { None } else { scan_tail(&path).await? };

        let sink = match tail {
            Some(tail) => {
                let mut file = OpenOptions::new().append(true).open(&path).await?;
                if tail.len == 0 {
                    write_header(&mut file).await?;
                }
                Sink {
                    file,
                    next_call_id: tail.last_call_id.map_or(1, |id| id + 1),
                    needs_newline: tail.len > 0 && !tail.ends_with_newline,
                }
            }
            None => {
                let mut file = File::create(&path).await?;
                write_header(&mut file).await?;
                Sink {
                    file,
                    next_call_id: 1,
                    needs_newline: false,
                }
            }
        };

        info!(
            path = %path.display(),
            overwrite,
            next_call_id = sink.next_call_id,
            "call_log.opened"
        );

        Ok(Self {
            path,
            sink: Arc::new(Mutex::new(sink)),
        })
    }

    #[cfg(test)]
    pub(crate) fn from_file(path: PathBuf, file: File, next_call_id: u64) -> Self {
        Self {
            path,
            sink: Arc::new(Mutex::new(Sink {
                file,
                next_call_id,
                needs_newline: false,
            })),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Id the next recorded outcome will receive.
    pub async fn next_call_id(&self) -> u64 {
        self.sink.lock().await.next_call_id
    }

    /// Appends one row and returns its id.
    ///
    /// Once started, the append finishes even if this future is dropped. An id
    /// is never handed out twice; a failed write uses one up.
    pub async fn record(&self, outcome: &FetchOutcome) -> Result<u64, Error> {
        let sink = Arc::clone(&self.sink);
        let outcome = outcome.clone();
        let append = tokio::spawn(async move {
            let mut sink = sink.lock_owned().await;
            sink.append(&outcome).await
        });
        append
            .await
            .map_err(|err| Error::Io(std::io::Error::other(err)))?
    }
}

async fn write_header(file: &mut File) -> Result<(), Error> {
    let mut header = row::header_line();
    header.push('\n');
    file.write_all(header.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

/// Reads backwards in growing windows until a row with a numeric id turns up
/// or the start of the file is reached. `None` when the file does not exist.
async fn scan_tail(path: &Path) -> Result<Option<Tail>, Error> {
    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let len = file.metadata().await?.len();
    if len == 0 {
        return Ok(Some(Tail {
            len,
            last_call_id: None,
            ends_with_newline: false,
        }));
    }

    let mut window = TAIL_WINDOW;
    loop {
        let start = len.saturating_sub(window);
        file.seek(SeekFrom::Start(start)).await?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).await?;

        let text = String::from_utf8_lossy(&bytes);
        // A window starting mid-file opens with a fragment of some row.
        let complete = if start > 0 {
            text.split_once('\n').map_or("", |(_, rest)| rest)
        } else {
            &*text
        };
        let last_call_id = row::last_call_id(complete);
        if last_call_id.is_some() || start == 0 {
            return Ok(Some(Tail {
                len,
                last_call_id,
                ends_with_newline: bytes.last() == Some(&b'\n'),
            }));
        }
        window = window.saturating_mul(4);
    }
}
