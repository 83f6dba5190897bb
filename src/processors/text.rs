//! Text decoding with byte-order-mark detection
//!
//! Files written by different tools arrive as UTF-8 (with or without a BOM) or
//! UTF-16 (LE/BE, with a BOM). [`DecodingReader`] sniffs the BOM and yields
//! UTF-8, so the same logical text reads identically regardless of encoding.

use std::io::{self, BufRead, BufReader, Read};

use encoding_rs::{Decoder, UTF_8};

const CHUNK_SIZE: usize = 8 * 1024;

/// Adapts a byte stream of unknown Unicode encoding into a UTF-8 stream
pub struct DecodingReader<R> {
    inner: R,
    decoder: Decoder,
    input: Vec<u8>,
    output: Vec<u8>,
    pos: usize,
    len: usize,
    finished: bool,
}

impl<R: Read> DecodingReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            // BOM sniffing may switch the decoder to UTF-16LE/BE
            decoder: UTF_8.new_decoder(),
            input: vec![0; CHUNK_SIZE],
            output: Vec::new(),
            pos: 0,
            len: 0,
            finished: false,
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        let n = loop {
            match self.inner.read(&mut self.input) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        let last = n == 0;

        let capacity = self
            .decoder
            .max_utf8_buffer_length(n)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "decode buffer overflow"))?;
        if self.output.len() < capacity {
            self.output.resize(capacity, 0);
        }

        // Output capacity covers the worst case, so all input is consumed
        let (_, _, written, _) =
            self.decoder
                .decode_to_utf8(&self.input[..n], &mut self.output, last);

        self.pos = 0;
        self.len = written;
        self.finished = last;
        Ok(())
    }
}

impl<R: Read> Read for DecodingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pos == self.len {
            if self.finished {
                return Ok(0);
            }
            self.fill()?;
        }

        let n = buf.len().min(self.len - self.pos);
        buf[..n].copy_from_slice(&self.output[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Decode `stream` and iterate over its lines (without line terminators)
pub fn decoded_lines<R: Read>(stream: R) -> io::Lines<BufReader<DecodingReader<R>>> {
    BufReader::new(DecodingReader::new(stream)).lines()
}
