use std::io::{self, ErrorKind, Read};

/// Fixed-size block reader over a streamed input.
///
/// Every call to [`ByteSource::read_block`] fills the given block up to
/// `capacity` bytes, looping over short reads, so a block shorter than
/// `capacity` only ever comes back at end of input. An empty block means
/// the input is exhausted.
pub struct ByteSource<R> {
    reader: R,
    capacity: usize,
}

impl<R: Read> ByteSource<R> {
    pub fn new(reader: R, capacity: usize) -> Self {
        ByteSource {
            reader,
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Replaces the contents of `block` with the next chunk of input and
    /// returns its length.
    pub fn read_block(&mut self, block: &mut Vec<u8>) -> io::Result<usize> {
        block.clear();
        block.resize(self.capacity, 0);

        let mut filled = 0;
        while filled < self.capacity {
            match self.reader.read(&mut block[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    block.clear();
                    return Err(err);
                }
            }
        }

        block.truncate(filled);
        Ok(filled)
    }
}
