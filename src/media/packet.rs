/// A chunk of encoded bytes belonging to one stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    /// Index of the stream inside its container.
    pub stream_index: usize,
    /// Presentation timestamp in stream time-base units.
    pub pts: i64,
    /// Encoded payload.
    pub data: Vec<u8>,
}

impl Packet {
    /// Packet for stream 0.
    pub fn new(pts: i64, data: Vec<u8>) -> Self {
        Self {
            stream_index: 0,
            pts,
            data,
        }
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Outcome of pulling output from a decoder or encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Receive<T> {
    /// One unit of output is ready.
    Ready(T),
    /// More input is needed before output can be produced.
    NeedMore,
    /// The codec has been flushed and holds no more output.
    Eof,
}

impl<T> Receive<T> {
    /// The ready value, if any.
    pub fn ready(self) -> Option<T> {
        match self {
            Receive::Ready(v) => Some(v),
            Receive::NeedMore | Receive::Eof => None,
        }
    }
}
