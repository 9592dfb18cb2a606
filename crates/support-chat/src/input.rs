//! Line input for the terminal client.

use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Reads user input line by line.
///
/// One reader must be kept for the whole session: the underlying buffer
/// may already hold lines that were typed or pasted ahead.
pub struct LineReader<R> {
    lines: Lines<R>,
}

impl LineReader<BufReader<Stdin>> {
    /// Creates a reader over the process's standard input.
    #[inline]
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    /// Creates a reader over any buffered source.
    #[inline]
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Returns the next line without its line ending, or `None` at the
    /// end of input or on a read error.
    pub async fn read_line(&mut self) -> Option<String> {
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(err) => {
                error!("error reading input: {err}");
                None
            }
        }
    }
}
