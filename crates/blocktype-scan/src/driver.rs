//! The streaming classification driver.
//!
//! For every input the driver feeds each block into the classifier and, at
//! boundary events, asks the sampler whether to finalize. A boundary event is
//! a full block in block mode, or the end of the input in whole-file mode.
//! Accepted boundaries are classified, reported and then cleared; rejected
//! ones leave the accumulated state in place until the next boundary. The
//! classifier is always cleared once an input is exhausted.

use std::io::Write;
use std::path::Path;

use humansize::{BINARY, format_size};
use tracing::{debug, info};

use blocktype_core::{Classifier, ClassifyError, DriverConfig, InputPath};

use crate::reader::BlockReader;
use crate::report::{Classification, Reporter};
use crate::sampler::Sampler;
use crate::walk::for_each_regular_file;

/// Counters collected over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Inputs fully processed.
    pub files: u64,
    /// Bytes fed into the classifier.
    pub bytes_accumulated: u64,
    /// Boundary events reached.
    pub boundaries: u64,
    /// Boundary events accepted by the sampler and classified.
    pub accepted: u64,
    /// Result lines written.
    pub emitted: u64,
}

/// Accumulation state of the classifier for the current input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accumulator {
    Empty,
    Accumulating { since: u64 },
}

/// Drives block reads, sampling, classification and reporting.
pub struct Driver<C, W, D> {
    config: DriverConfig,
    classifier: C,
    reporter: Reporter<W, D>,
    stats: DriverStats,
}

impl<C, W, D> Driver<C, W, D>
where
    C: Classifier,
    W: Write,
    D: Write,
{
    /// Create a driver. The configuration is validated up front.
    pub fn new(
        config: DriverConfig,
        classifier: C,
        reporter: Reporter<W, D>,
    ) -> Result<Self, ClassifyError> {
        config.validate()?;
        Ok(Self {
            config,
            classifier,
            reporter,
            stats: DriverStats::default(),
        })
    }

    /// Process one command line input: stdin, a file, or every regular file
    /// under a directory.
    pub fn process(&mut self, input: &InputPath) -> Result<(), ClassifyError> {
        match input {
            InputPath::Stdin => self.process_input(input),
            InputPath::Path(root) => self.process_tree(root),
        }
    }

    /// Process every regular file under `root`.
    pub fn process_tree(&mut self, root: &Path) -> Result<(), ClassifyError> {
        for_each_regular_file(root, |path| self.process_input(&InputPath::Path(path)))
    }

    /// Open and classify a single input.
    pub fn process_input(&mut self, input: &InputPath) -> Result<(), ClassifyError> {
        let mut reader = BlockReader::open(input, self.config.block_size)?;
        if self.config.skip_header {
            reader.skip_header()?;
        }
        self.classify_stream(&mut reader)
    }

    /// Run the accumulate/classify/clear loop over an opened reader.
    pub fn classify_stream(&mut self, reader: &mut BlockReader) -> Result<(), ClassifyError> {
        let input = reader.input().clone();
        let mut sampler = Sampler::for_path(self.config.percentage, self.config.seed, input.as_bytes());
        debug!(input = %input, start = reader.offset(), "classifying input");

        let result = self.run_blocks(reader, &mut sampler, &input);
        self.classifier.clear();
        result?;

        self.stats.files += 1;
        Ok(())
    }

    fn run_blocks(
        &mut self,
        reader: &mut BlockReader,
        sampler: &mut Sampler,
        input: &InputPath,
    ) -> Result<(), ClassifyError> {
        let block_size = reader.block_size();
        let mut state = Accumulator::Empty;

        loop {
            let block = reader.read_block()?;
            let offset = block.offset;
            let len = block.len();

            if len > 0 {
                self.classifier.update(block.data)?;
                self.stats.bytes_accumulated += len as u64;
                if state == Accumulator::Empty {
                    state = Accumulator::Accumulating { since: offset };
                }
            }

            let boundary = if self.config.block_mode {
                len == block_size
            } else {
                len == 0
            };

            if boundary {
                self.stats.boundaries += 1;
                if sampler.accept() {
                    let (start, end) = if self.config.block_mode {
                        (offset, offset + len as u64)
                    } else {
                        let since = match state {
                            Accumulator::Accumulating { since } => since,
                            Accumulator::Empty => offset,
                        };
                        (since, offset)
                    };
                    self.finalize(input, start, end)?;
                    state = Accumulator::Empty;
                } else {
                    debug!(input = %input, offset, "boundary rejected by sampler");
                }
            }

            if len == 0 {
                return Ok(());
            }
        }
    }

    /// Classify the accumulated bytes, report, and clear.
    fn finalize(&mut self, input: &InputPath, start: u64, end: u64) -> Result<(), ClassifyError> {
        let code = self.classifier.classify()?;
        self.classifier.clear();
        self.stats.accepted += 1;

        if !self.config.training {
            let result = Classification {
                offset: if self.config.block_mode { start } else { 0 },
                code,
                input: input.clone(),
            };
            let name = self.classifier.name_for_type(code);
            self.reporter.emit(&result, name)?;
            self.stats.emitted += 1;
        }
        self.reporter.report_range(start, end)
    }

    /// Flush output and log a summary of the run.
    pub fn finish(&mut self) -> Result<DriverStats, ClassifyError> {
        self.reporter.flush()?;
        info!(
            files = self.stats.files,
            accumulated = %format_size(self.stats.bytes_accumulated, BINARY),
            boundaries = self.stats.boundaries,
            accepted = self.stats.accepted,
            emitted = self.stats.emitted,
            "classification finished"
        );
        Ok(self.stats)
    }

    /// Counters collected so far.
    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    /// Take the classifier and reporter back.
    pub fn into_parts(self) -> (C, Reporter<W, D>) {
        (self.classifier, self.reporter)
    }
}
