//! Output of classification results and sampled ranges.

use std::fmt;
use std::io::{self, Write};

use blocktype_core::{ClassifyError, InputPath, TypeCode};

/// A finalized classification for part of an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Starting offset of the reported range.
    pub offset: u64,
    /// Type code returned by the classifier.
    pub code: TypeCode,
    /// Input the range came from.
    pub input: InputPath,
}

/// Type label of a result: the classifier's name, or the bare code.
#[derive(Debug, Clone, Copy)]
pub struct TypeLabel<'a> {
    pub code: TypeCode,
    pub name: Option<&'a str>,
}

impl fmt::Display for TypeLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.code),
        }
    }
}

/// Writes result lines to an output stream and sampled ranges to a
/// diagnostic stream.
pub struct Reporter<W, D> {
    output: W,
    diagnostics: D,
    report_ranges: bool,
}

impl Reporter<io::Stdout, io::Stderr> {
    /// Reporter on the process's standard output and standard error.
    pub fn stdio(report_ranges: bool) -> Self {
        Self::new(io::stdout(), io::stderr(), report_ranges)
    }
}

impl<W: Write, D: Write> Reporter<W, D> {
    /// Create a reporter over explicit streams.
    pub fn new(output: W, diagnostics: D, report_ranges: bool) -> Self {
        Self {
            output,
            diagnostics,
            report_ranges,
        }
    }

    /// Write one result line: `<offset, left-aligned to 10> <type> # <path>`.
    ///
    /// The path is written as its raw bytes, so names that are not valid
    /// UTF-8 come out unchanged.
    pub fn emit(&mut self, result: &Classification, name: Option<&str>) -> Result<(), ClassifyError> {
        let label = TypeLabel {
            code: result.code,
            name,
        };
        write!(self.output, "{:<10} {} # ", result.offset, label)?;
        self.output.write_all(result.input.as_bytes())?;
        self.output.write_all(b"\n")?;
        Ok(())
    }

    /// Write `start-end` of a sampled range when range reporting is enabled.
    pub fn report_range(&mut self, start: u64, end: u64) -> Result<(), ClassifyError> {
        if self.report_ranges {
            writeln!(self.diagnostics, "{start}-{end}")?;
        }
        Ok(())
    }

    /// Flush both streams.
    pub fn flush(&mut self) -> Result<(), ClassifyError> {
        self.output.flush()?;
        self.diagnostics.flush()?;
        Ok(())
    }

    /// Recover the underlying streams.
    pub fn into_inner(self) -> (W, D) {
        (self.output, self.diagnostics)
    }
}
