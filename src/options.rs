#[derive(Clone, Debug)]
pub struct CursorOptions {
    /// Record a read log on the shared reader. Use `SharedReader::take_log` to retrieve it.
    /// Has no effect unless the `logging` feature is enabled.
    pub logging: bool,
    /// Registry size at which subscribing a new stream cursor first sweeps dead subscribers.
    /// After each sweep the threshold becomes twice the number of live subscribers
    /// (but never less than this value).
    pub prune_threshold: usize,
    /// Size of the byte buffer used when decoding a `Read` source.
    pub read_buffer_size: usize,
    /// Replace invalid UTF-8 in a `Read` source with U+FFFD.
    /// When false, the first invalid sequence ends the stream with a fault.
    pub lossy_utf8: bool,
}

impl Default for CursorOptions {
    fn default() -> Self {
        Self {
            logging: false,
            prune_threshold: 64,
            read_buffer_size: 8192,
            lossy_utf8: true,
        }
    }
}
