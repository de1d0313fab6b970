//! Message codec for the stdio wire protocol.
//!
//! One JSON document per line:
//! ```text
//! {"jsonrpc":"2.0","id":1,"method":"tools/list"}\n
//! ```
//! Blank lines are skipped. At most `max_message_bytes + 1` bytes of a line
//! are buffered; the rest of an oversized line is drained in place and only
//! its length is reported, so the caller can answer with an error and keep
//! the session. Lines that are not UTF-8 are reported as malformed rather
//! than decoded lossily.

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// One inbound line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Message(String),
    /// Line longer than the configured cap (length in bytes, newline excluded).
    Oversized(usize),
    /// Line that is not valid UTF-8.
    Malformed(String),
}

/// Read the next non-blank line. Returns `None` on clean EOF.
pub async fn read_message<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    max_message_bytes: usize,
) -> std::io::Result<Option<Inbound>> {
    let limit = max_message_bytes as u64 + 1;
    loop {
        let mut buf = Vec::new();
        let n = (&mut *reader).take(limit).read_until(b'\n', &mut buf).await?;
        if n == 0 {
            return Ok(None);
        }

        if buf.last() != Some(&b'\n') && n as u64 == limit {
            let rest = discard_line(reader).await?;
            return Ok(Some(Inbound::Oversized(n + rest)));
        }

        let line = match String::from_utf8(buf) {
            Ok(line) => line,
            Err(e) => return Ok(Some(Inbound::Malformed(e.utf8_error().to_string()))),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        return Ok(Some(Inbound::Message(line.to_string())));
    }
}

/// Drop bytes up to and including the next newline. Returns the number of
/// bytes dropped before it.
async fn discard_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<usize> {
    let mut discarded = 0;
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(discarded);
        }
        match available.iter().position(|b| *b == b'\n') {
            Some(i) => {
                reader.consume(i + 1);
                return Ok(discarded + i);
            }
            None => {
                let len = available.len();
                reader.consume(len);
                discarded += len;
            }
        }
    }
}

/// Write one message followed by a newline, then flush.
pub async fn write_message<W: AsyncWrite + Unpin, T: Serialize>(
    writer: &mut W,
    message: &T,
) -> std::io::Result<()> {
    let mut payload = serde_json::to_vec(message)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    payload.push(b'\n');
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_reads_lines_and_skips_blanks() {
        let input = b"{\"a\":1}\n\n   \n{\"b\":2}\r\n".to_vec();
        let mut reader = BufReader::new(&input[..]);

        assert_eq!(
            read_message(&mut reader, 1024).await.unwrap(),
            Some(Inbound::Message("{\"a\":1}".to_string()))
        );
        assert_eq!(
            read_message(&mut reader, 1024).await.unwrap(),
            Some(Inbound::Message("{\"b\":2}".to_string()))
        );
        assert_eq!(read_message(&mut reader, 1024).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_last_line_without_newline() {
        let input = b"{\"a\":1}".to_vec();
        let mut reader = BufReader::new(&input[..]);
        assert_eq!(
            read_message(&mut reader, 1024).await.unwrap(),
            Some(Inbound::Message("{\"a\":1}".to_string()))
        );
    }

    #[tokio::test]
    async fn test_oversized_line_is_consumed() {
        let input = format!("{}\n{{}}\n", "x".repeat(64)).into_bytes();
        let mut reader = BufReader::new(&input[..]);
        assert_eq!(
            read_message(&mut reader, 16).await.unwrap(),
            Some(Inbound::Oversized(64))
        );
        assert_eq!(
            read_message(&mut reader, 16).await.unwrap(),
            Some(Inbound::Message("{}".to_string()))
        );
    }

    #[tokio::test]
    async fn test_oversized_line_is_bounded_and_drained() {
        let mut input = vec![b'x'; 4 * 1024 * 1024];
        input.extend_from_slice(b"\n{\"ok\":1}\n");
        // small buffer so the drain spans many fill_buf calls
        let mut reader = BufReader::with_capacity(512, &input[..]);
        assert_eq!(
            read_message(&mut reader, 1024).await.unwrap(),
            Some(Inbound::Oversized(4 * 1024 * 1024))
        );
        assert_eq!(
            read_message(&mut reader, 1024).await.unwrap(),
            Some(Inbound::Message("{\"ok\":1}".to_string()))
        );
    }

    #[tokio::test]
    async fn test_line_at_cap_is_accepted() {
        let input = b"{\"a\":12}\n".to_vec();
        let mut reader = BufReader::new(&input[..]);
        assert_eq!(
            read_message(&mut reader, 8).await.unwrap(),
            Some(Inbound::Message("{\"a\":12}".to_string()))
        );
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_malformed() {
        let input = b"{\"a\":\"\xFF\"}\n{}\n".to_vec();
        let mut reader = BufReader::new(&input[..]);
        assert!(matches!(
            read_message(&mut reader, 1024).await.unwrap(),
            Some(Inbound::Malformed(_))
        ));
        assert_eq!(
            read_message(&mut reader, 1024).await.unwrap(),
            Some(Inbound::Message("{}".to_string()))
        );
    }

    #[tokio::test]
    async fn test_write_appends_newline() {
        let mut out = Vec::new();
        write_message(&mut out, &serde_json::json!({"ok": true}))
            .await
            .unwrap();
        assert_eq!(out, b"{\"ok\":true}\n");
    }
}
