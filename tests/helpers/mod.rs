use std::io;

/// An output that accepts a limited number of bytes and then fails every
/// write, like a full disk.
pub struct Sink {
    buf: Vec<u8>,
    space: usize,
}

impl Sink {
    pub fn with_space(space: usize) -> Self {
        Self {
            buf: Vec::new(),
            space,
        }
    }

    #[track_caller]
    pub fn contents(&self) -> &str {
        std::str::from_utf8(&self.buf).unwrap()
    }
}

impl io::Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.len() > self.space {
            return Err(io::Error::new(io::ErrorKind::Other, "no space left"));
        }
        self.space -= buf.len();
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
