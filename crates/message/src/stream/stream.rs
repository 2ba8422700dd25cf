use std::fmt;
use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use serde::Serialize;
use tracing::{trace, warn};

use super::OpenMode;
use crate::error::StreamError;
use crate::ensure;

/// Upper bound of the buffer reserved up front by [`Stream::read`].
const READ_CAPACITY: usize = 8 * 1024;

/// The resource backing a [`Stream`], handed out by [`Stream::detach`].
pub enum Resource {
    Memory(Cursor<Vec<u8>>),
    File(File),
    Sink(Box<dyn Write + Send>),
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Memory(cursor) => f.debug_tuple("Memory").field(&cursor.get_ref().len()).finish(),
            Resource::File(file) => f.debug_tuple("File").field(file).finish(),
            Resource::Sink(_) => f.write_str("Sink"),
        }
    }
}

/// Descriptive data about an open stream.
///
/// Serialized with `serde`, the field names double as the keys accepted by
/// [`Stream::metadata_value`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamMetadata {
    pub timed_out: bool,
    pub blocked: bool,
    pub eof: bool,
    pub unread_bytes: u64,
    pub stream_type: &'static str,
    pub wrapper_type: &'static str,
    pub mode: String,
    pub seekable: bool,
    pub uri: String,
}

#[derive(Debug)]
struct State {
    resource: Option<Resource>,
    mode: OpenMode,
    uri: String,
    seekable: bool,
    eof: bool,
    // sinks can not report a position, so the written byte count stands in
    written: u64,
}

/// A shared handle on a readable, writable and possibly seekable resource.
///
/// Cloning a `Stream` does not copy the data: every clone observes the same
/// position and contents, the way a message and its copies share one body.
#[derive(Debug, Clone)]
pub struct Stream {
    inner: Arc<Mutex<State>>,
}

impl Default for Stream {
    fn default() -> Self {
        Self::memory()
    }
}

impl Stream {
    fn from_state(state: State) -> Self {
        Self { inner: Arc::new(Mutex::new(state)) }
    }

    /// Creates an empty, readable and writable in-memory stream.
    pub fn memory() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// Creates an in-memory stream holding `data`, positioned at the start.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::from_state(State {
            resource: Some(Resource::Memory(Cursor::new(data.into()))),
            mode: OpenMode::memory(),
            uri: "memory".into(),
            seekable: true,
            eof: false,
            written: 0,
        })
    }

    /// Opens the file at `path` with an fopen style `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidMode`] if `mode` is not a valid mode string,
    /// and [`StreamError::InvalidIdentifier`] if the path can not be opened.
    pub fn open(path: impl AsRef<Path>, mode: &str) -> Result<Self, StreamError> {
        let path = path.as_ref();
        let mode: OpenMode = mode.parse()?;
        let file = mode.open_options().open(path).map_err(|e| {
            trace!(path = %path.display(), error = %e, "unable to open stream");
            StreamError::invalid_identifier(path.display())
        })?;
        trace!(path = %path.display(), %mode, "opened file stream");

        Ok(Self::from_state(file_state(file, mode, path.display().to_string())))
    }

    /// Wraps an already opened file; `mode` tells which operations it allows.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidMode`] if `mode` is not a valid mode string.
    pub fn from_file(file: File, mode: &str) -> Result<Self, StreamError> {
        let mode: OpenMode = mode.parse()?;
        Ok(Self::from_state(file_state(file, mode, String::new())))
    }

    /// Wraps a write only, non seekable destination such as standard output.
    pub fn sink(writer: impl Write + Send + 'static) -> Self {
        Self::from_state(State {
            resource: Some(Resource::Sink(Box::new(writer))),
            mode: OpenMode::write_only(),
            uri: "sink".into(),
            seekable: false,
            eof: false,
            written: 0,
        })
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true if both handles share the same underlying resource.
    pub fn ptr_eq(&self, other: &Stream) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Closes the stream, releasing the resource. Closing twice is a no-op.
    pub fn close(&self) {
        let mut state = self.state();
        if let Some(resource) = state.resource.take() {
            if let Resource::Sink(mut writer) = resource {
                if let Err(e) = writer.flush() {
                    warn!(error = %e, "failed to flush sink on close");
                }
            }
            trace!(uri = %state.uri, "closed stream");
        }
    }

    /// Separates the resource from the stream, leaving the stream unusable.
    ///
    /// Returns `None` if the resource was already detached or closed.
    pub fn detach(&self) -> Option<Resource> {
        let mut state = self.state();
        let resource = state.resource.take();
        if resource.is_some() {
            trace!(uri = %state.uri, "detached stream");
        }
        resource
    }

    /// Returns the size in bytes, or `0` if the size is unknown or the stream is detached.
    pub fn size(&self) -> u64 {
        let state = self.state();
        match &state.resource {
            Some(Resource::Memory(cursor)) => cursor.get_ref().len() as u64,
            Some(Resource::File(file)) => file.metadata().map(|metadata| metadata.len()).unwrap_or(0),
            Some(Resource::Sink(_)) | None => 0,
        }
    }

    /// Returns the current position of the read/write pointer.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::ResourceNotAvailable`] if the stream is closed or detached.
    pub fn tell(&self) -> Result<u64, StreamError> {
        let mut state = self.state();
        let written = state.written;
        match state.resource.as_mut().ok_or(StreamError::ResourceNotAvailable)? {
            Resource::Memory(cursor) => Ok(cursor.position()),
            Resource::File(file) => Ok(file.stream_position()?),
            Resource::Sink(_) => Ok(written),
        }
    }

    /// Returns true once a read reached the end of the stream, or if no resource is available.
    pub fn eof(&self) -> bool {
        let state = self.state();
        state.resource.is_none() || state.eof
    }

    pub fn is_seekable(&self) -> bool {
        let state = self.state();
        state.resource.is_some() && state.seekable
    }

    /// Moves the pointer, returning its new position.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::ResourceNotAvailable`] if the stream is closed or detached,
    /// [`StreamError::NotSeekable`] if the resource can not seek, or an I/O error.
    pub fn seek(&self, pos: SeekFrom) -> Result<u64, StreamError> {
        self.seek_for("seek", pos)
    }

    /// Moves the pointer back to the start.
    ///
    /// # Errors
    ///
    /// Same as [`Stream::seek`].
    pub fn rewind(&self) -> Result<(), StreamError> {
        self.seek_for("rewind", SeekFrom::Start(0)).map(|_| ())
    }

    fn seek_for(&self, action: &'static str, pos: SeekFrom) -> Result<u64, StreamError> {
        let mut state = self.state();
        ensure!(state.resource.is_some(), StreamError::ResourceNotAvailable);
        ensure!(state.seekable, StreamError::NotSeekable { action });

        let position = match state.resource.as_mut() {
            Some(Resource::Memory(cursor)) => cursor.seek(pos)?,
            Some(Resource::File(file)) => file.seek(pos)?,
            Some(Resource::Sink(_)) => return Err(StreamError::NotSeekable { action }),
            None => return Err(StreamError::ResourceNotAvailable),
        };
        state.eof = false;
        Ok(position)
    }

    pub fn is_writable(&self) -> bool {
        let state = self.state();
        state.resource.is_some() && state.mode.is_writable()
    }

    /// Writes all of `data` at the current position, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::ResourceNotAvailable`] if the stream is closed or detached,
    /// [`StreamError::NotWritable`] if its mode forbids writing, or an I/O error.
    pub fn write(&self, data: &[u8]) -> Result<usize, StreamError> {
        let mut state = self.state();
        ensure!(state.resource.is_some(), StreamError::ResourceNotAvailable);
        ensure!(state.mode.is_writable(), StreamError::NotWritable);

        match state.resource.as_mut() {
            Some(Resource::Memory(cursor)) => cursor.write_all(data)?,
            Some(Resource::File(file)) => file.write_all(data)?,
            Some(Resource::Sink(writer)) => writer.write_all(data)?,
            None => return Err(StreamError::ResourceNotAvailable),
        }
        state.written += data.len() as u64;
        Ok(data.len())
    }

    pub fn is_readable(&self) -> bool {
        let state = self.state();
        state.resource.is_some() && state.mode.is_readable()
    }

    /// Reads up to `len` bytes from the current position.
    ///
    /// Fewer bytes are returned when the end of the stream is reached, which also sets [`Stream::eof`].
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::ResourceNotAvailable`] if the stream is closed or detached,
    /// [`StreamError::NotReadable`] if its mode forbids reading, or an I/O error.
    pub fn read(&self, len: usize) -> Result<Bytes, StreamError> {
        let mut state = self.state();
        let reader = readable(&mut state)?;

        let mut buf = Vec::with_capacity(len.min(READ_CAPACITY));
        reader.take(len as u64).read_to_end(&mut buf)?;
        if buf.len() < len {
            state.eof = true;
        }
        Ok(Bytes::from(buf))
    }

    /// Reads everything from the current position to the end.
    ///
    /// # Errors
    ///
    /// Same as [`Stream::read`].
    pub fn contents(&self) -> Result<Bytes, StreamError> {
        let mut state = self.state();
        let reader = readable(&mut state)?;

        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        state.eof = true;
        Ok(Bytes::from(buf))
    }

    /// Returns all metadata describing the stream.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::ResourceNotAvailable`] if the stream is closed or detached.
    pub fn metadata(&self) -> Result<StreamMetadata, StreamError> {
        let state = self.state();
        let (stream_type, wrapper_type) = match state.resource.as_ref().ok_or(StreamError::ResourceNotAvailable)? {
            Resource::Memory(_) => ("MEMORY", "memory"),
            Resource::File(_) => ("STDIO", "plainfile"),
            Resource::Sink(_) => ("SINK", "writer"),
        };

        Ok(StreamMetadata {
            timed_out: false,
            blocked: true,
            eof: state.eof,
            unread_bytes: 0,
            stream_type,
            wrapper_type,
            mode: state.mode.to_string(),
            seekable: state.seekable,
            uri: state.uri.clone(),
        })
    }

    /// Returns a single metadata entry, or `None` if `key` is not a metadata key.
    ///
    /// # Errors
    ///
    /// Same as [`Stream::metadata`].
    pub fn metadata_value(&self, key: &str) -> Result<Option<serde_json::Value>, StreamError> {
        let metadata = self.metadata()?;
        let serde_json::Value::Object(mut map) = serde_json::to_value(metadata).map_err(StreamError::io)? else {
            return Ok(None);
        };
        Ok(map.remove(key))
    }
}

fn file_state(file: File, mode: OpenMode, uri: String) -> State {
    // pipes and character devices can not seek
    let seekable = file.metadata().map(|metadata| metadata.is_file()).unwrap_or(false);
    State { resource: Some(Resource::File(file)), mode, uri, seekable, eof: false, written: 0 }
}

fn readable<'a>(state: &'a mut MutexGuard<'_, State>) -> Result<&'a mut dyn Read, StreamError> {
    ensure!(state.resource.is_some(), StreamError::ResourceNotAvailable);
    ensure!(state.mode.is_readable(), StreamError::NotReadable);

    match state.resource.as_mut() {
        Some(Resource::Memory(cursor)) => Ok(cursor as &mut dyn Read),
        Some(Resource::File(file)) => Ok(file as &mut dyn Read),
        Some(Resource::Sink(_)) => Err(StreamError::NotReadable),
        None => Err(StreamError::ResourceNotAvailable),
    }
}

impl From<Bytes> for Stream {
    fn from(bytes: Bytes) -> Self {
        Self::from_bytes(bytes.to_vec())
    }
}

impl From<&str> for Stream {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

impl From<String> for Stream {
    fn from(s: String) -> Self {
        Self::from_bytes(s.into_bytes())
    }
}

/// Renders the whole stream from the start, lossily decoded as UTF-8.
///
/// Rendering never fails: an unreadable or unseekable stream renders as an empty string.
impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rewind().and_then(|()| self.contents()) {
            Ok(contents) => f.write_str(&String::from_utf8_lossy(&contents)),
            Err(e) => {
                warn!(error = %e, "unable to render stream");
                Ok(())
            }
        }
    }
}
