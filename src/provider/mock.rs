//! Scripted transport for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use runtail_protocol::{Cursor, EntityRef, LogChunk, Status, StatusRecord};

use super::{Transport, TransportError};

/// One recorded chunk request: the cursor and limit the caller sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRequest {
    pub cursor: Option<Cursor>,
    pub limit: Option<usize>,
}

/// In-process transport that replays scripted responses.
///
/// Each status fetch pops the next scripted result, repeating the last
/// returned status once the script runs dry. Each chunk fetch pops the next
/// scripted result; a dry chunk script answers with an empty chunk at the
/// last issued cursor, which is exactly what a caught-up server does. Every
/// request is recorded so tests can assert how many requests a poll cycle
/// issued and which cursors it threaded through.
#[derive(Default)]
pub struct ScriptedTransport {
    statuses: Mutex<VecDeque<Result<StatusRecord, TransportError>>>,
    chunks: Mutex<VecDeque<Result<LogChunk, TransportError>>>,
    last_status: Mutex<Option<Status>>,
    last_cursor: Mutex<Option<Cursor>>,
    status_calls: Mutex<usize>,
    chunk_requests: Mutex<Vec<ChunkRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next status response.
    pub fn push_status(&self, status: Status) {
        self.statuses
            .lock()
            .unwrap()
            .push_back(Ok(StatusRecord { status }));
    }

    /// Script the next status fetch to fail.
    pub fn push_status_error(&self, error: TransportError) {
        self.statuses.lock().unwrap().push_back(Err(error));
    }

    /// Script the next log chunk response.
    pub fn push_chunk(&self, text: &str, cursor: &str) {
        self.chunks.lock().unwrap().push_back(Ok(LogChunk {
            text: text.to_string(),
            cursor: Cursor::new(cursor),
        }));
    }

    /// Script the next chunk fetch to fail.
    pub fn push_chunk_error(&self, error: TransportError) {
        self.chunks.lock().unwrap().push_back(Err(error));
    }

    /// Number of status fetches performed.
    pub fn status_calls(&self) -> usize {
        *self.status_calls.lock().unwrap()
    }

    /// Number of chunk fetches performed.
    pub fn chunk_calls(&self) -> usize {
        self.chunk_requests.lock().unwrap().len()
    }

    /// Every chunk request observed, in order.
    pub fn chunk_requests(&self) -> Vec<ChunkRequest> {
        self.chunk_requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn fetch_status(&self, _entity: &EntityRef) -> Result<StatusRecord, TransportError> {
        *self.status_calls.lock().unwrap() += 1;

        match self.statuses.lock().unwrap().pop_front() {
            Some(Ok(record)) => {
                *self.last_status.lock().unwrap() = Some(record.status);
                Ok(record)
            }
            Some(Err(error)) => Err(error),
            None => match *self.last_status.lock().unwrap() {
                Some(status) => Ok(StatusRecord { status }),
                None => Err(TransportError::Connection(
                    "status script exhausted".to_string(),
                )),
            },
        }
    }

    fn fetch_log_chunk(
        &self,
        _entity: &EntityRef,
        cursor: Option<&Cursor>,
        limit: Option<usize>,
    ) -> Result<LogChunk, TransportError> {
        self.chunk_requests.lock().unwrap().push(ChunkRequest {
            cursor: cursor.cloned(),
            limit,
        });

        match self.chunks.lock().unwrap().pop_front() {
            Some(Ok(chunk)) => {
                *self.last_cursor.lock().unwrap() = Some(chunk.cursor.clone());
                Ok(chunk)
            }
            Some(Err(error)) => Err(error),
            None => match self.last_cursor.lock().unwrap().clone() {
                // Caught-up server: nothing new, cursor unchanged.
                Some(cursor) => Ok(LogChunk {
                    text: String::new(),
                    cursor,
                }),
                None => Err(TransportError::Connection(
                    "chunk script exhausted".to_string(),
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_statuses_in_order_then_repeat() {
        let transport = ScriptedTransport::new();
        transport.push_status(Status::Running);
        transport.push_status(Status::Succeeded);

        let entity = EntityRef::run("run-001");
        assert_eq!(
            transport.fetch_status(&entity).unwrap().status,
            Status::Running
        );
        assert_eq!(
            transport.fetch_status(&entity).unwrap().status,
            Status::Succeeded
        );
        // Script dry: the last status repeats.
        assert_eq!(
            transport.fetch_status(&entity).unwrap().status,
            Status::Succeeded
        );
        assert_eq!(transport.status_calls(), 3);
    }

    #[test]
    fn test_dry_chunk_script_reports_caught_up() {
        let transport = ScriptedTransport::new();
        transport.push_chunk("line1\n", "c1");

        let entity = EntityRef::run("run-001");
        let first = transport.fetch_log_chunk(&entity, None, Some(64)).unwrap();
        assert_eq!(first.text, "line1\n");

        let second = transport
            .fetch_log_chunk(&entity, Some(&first.cursor), Some(64))
            .unwrap();
        assert_eq!(second.text, "");
        assert_eq!(second.cursor, Cursor::new("c1"));
    }

    #[test]
    fn test_requests_are_recorded() {
        let transport = ScriptedTransport::new();
        transport.push_chunk("a", "c1");

        let entity = EntityRef::run("run-001");
        transport.fetch_log_chunk(&entity, None, Some(10)).unwrap();

        let requests = transport.chunk_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].cursor, None);
        assert_eq!(requests[0].limit, Some(10));
    }
}
