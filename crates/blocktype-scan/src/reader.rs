//! Fixed-size block reads from a file or standard input.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

use blocktype_core::{ClassifyError, InputPath};

/// Underlying byte source of a [`BlockReader`].
enum Source {
    File(File),
    Stdin(io::Stdin),
    Stream(Box<dyn Read + Send>),
}

impl Read for Source {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Source::File(file) => file.read(buf),
            Source::Stdin(stdin) => stdin.read(buf),
            Source::Stream(stream) => stream.read(buf),
        }
    }
}

/// One read from the input.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    /// Offset of the first byte of this block within the input.
    pub offset: u64,
    /// Bytes read. Shorter than the block size only at the end of the input.
    pub data: &'a [u8],
}

impl Block<'_> {
    /// Number of bytes in the block.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the read hit the end of the input.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Reads an input as a sequence of blocks, tracking the running offset.
pub struct BlockReader {
    input: InputPath,
    source: Source,
    buffer: Vec<u8>,
    offset: u64,
}

impl BlockReader {
    /// Open an input for reading in blocks of `block_size` bytes.
    pub fn open(input: &InputPath, block_size: usize) -> Result<Self, ClassifyError> {
        let source = match input {
            InputPath::Stdin => Source::Stdin(io::stdin()),
            InputPath::Path(path) => {
                Source::File(File::open(path).map_err(|e| ClassifyError::open(path, e))?)
            }
        };
        Ok(Self {
            input: input.clone(),
            source,
            buffer: allocate(block_size)?,
            offset: 0,
        })
    }

    /// Read blocks from an arbitrary stream, labelled with `input` for errors.
    ///
    /// Streams are not seekable, so [`skip_header`](Self::skip_header) fails
    /// on them just as it does on standard input.
    pub fn from_reader(
        input: InputPath,
        reader: impl Read + Send + 'static,
        block_size: usize,
    ) -> Result<Self, ClassifyError> {
        Ok(Self {
            input,
            source: Source::Stream(Box::new(reader)),
            buffer: allocate(block_size)?,
            offset: 0,
        })
    }

    /// Seek forward past the first block.
    ///
    /// Only files can seek; requesting this on stdin or a stream is an error.
    pub fn skip_header(&mut self) -> Result<(), ClassifyError> {
        let block_size = self.buffer.len() as u64;
        match &mut self.source {
            Source::File(file) => {
                file.seek(SeekFrom::Start(block_size))
                    .map_err(|e| ClassifyError::seek(self.input.as_path(), e))?;
            }
            Source::Stdin(_) | Source::Stream(_) => {
                return Err(ClassifyError::seek(
                    self.input.as_path(),
                    io::Error::new(io::ErrorKind::Unsupported, "input is not seekable"),
                ));
            }
        }
        self.offset += block_size;
        Ok(())
    }

    /// Read the next block.
    ///
    /// Short reads from the underlying source are retried until the block is
    /// full or the input ends, so a block is shorter than the block size only
    /// when it is the last one with data. An empty block marks the end.
    pub fn read_block(&mut self) -> Result<Block<'_>, ClassifyError> {
        let offset = self.offset;
        let mut filled = 0;
        while filled < self.buffer.len() {
            match self.source.read(&mut self.buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ClassifyError::read(self.input.as_path(), e)),
            }
        }
        self.offset += filled as u64;
        Ok(Block {
            offset,
            data: &self.buffer[..filled],
        })
    }

    /// Offset of the next byte to be read.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Configured block size.
    pub fn block_size(&self) -> usize {
        self.buffer.len()
    }

    /// The input being read.
    pub fn input(&self) -> &InputPath {
        &self.input
    }
}

/// Allocate a zeroed block buffer, reporting failure instead of aborting.
fn allocate(block_size: usize) -> Result<Vec<u8>, ClassifyError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(block_size)
        .map_err(|_| ClassifyError::Allocation { size: block_size })?;
    buffer.resize(block_size, 0);
    Ok(buffer)
}
