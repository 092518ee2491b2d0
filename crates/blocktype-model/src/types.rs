//! Class table: type codes and their names.

use std::path::Path;

use compact_str::CompactString;
use indexmap::IndexSet;

use blocktype_core::TypeCode;

use crate::ModelError;

/// Name of type code 0, present in every table.
pub const UNCLASSIFIED: &str = "UNCLASSIFIED";

const BUILTIN_TYPES: &[&str] = &[
    UNCLASSIFIED, "TEXT", "CSV", "LOG", "HTML", "XML", "JSON", "JS", "JAVA", "CSS", "B64", "A85",
    "B16", "URL", "PS", "RTF", "TBIRD", "PST", "PNG", "GIF", "TIF", "JB2", "GZ", "ZIP", "JAR",
    "RPM", "BZ2", "PDF", "DOCX", "XLSX", "PPTX", "JPG", "MP3", "M4A", "MP4", "AVI", "WMV", "FLV",
    "SWF", "WAV", "MOV", "DOC", "XLS", "PPT", "FAT", "NTFS", "EXT3", "EXE", "DLL", "ELF", "BMP",
    "AES", "RAND", "PPS", "CONSTANT",
];

/// Ordered list of class names; a name's position is its type code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTable {
    names: IndexSet<CompactString>,
}

impl TypeTable {
    /// The builtin class table.
    pub fn builtin() -> Self {
        Self::from_names(BUILTIN_TYPES.iter().copied())
    }

    /// Build a table from names. `UNCLASSIFIED` is always code 0; duplicate
    /// names keep their first code.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = IndexSet::new();
        set.insert(CompactString::new(UNCLASSIFIED));
        for name in names {
            set.insert(CompactString::new(name.as_ref()));
        }
        Self { names: set }
    }

    /// Load a class file with one name per line. Blank lines and lines
    /// starting with `#` are ignored.
    pub fn from_class_file(path: &Path) -> Result<Self, ModelError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;
        Self::parse(&contents).ok_or_else(|| ModelError::EmptyClassTable {
            path: path.to_path_buf(),
        })
    }

    fn parse(contents: &str) -> Option<Self> {
        let names: Vec<&str> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();
        if names.is_empty() {
            return None;
        }
        Some(Self::from_names(names))
    }

    /// Name of a type code.
    pub fn name_for_type(&self, code: TypeCode) -> Option<&str> {
        self.names.get_index(code as usize).map(CompactString::as_str)
    }

    /// Code of a type name, matched exactly first and then ignoring ASCII case.
    pub fn type_for_name(&self, name: &str) -> Option<TypeCode> {
        self.names
            .get_index_of(name)
            .or_else(|| self.names.iter().position(|n| n.eq_ignore_ascii_case(name)))
            .map(|i| i as TypeCode)
    }

    /// Resolve a command line class argument: all digits is a code, anything
    /// else must name a class other than `UNCLASSIFIED`.
    pub fn resolve(&self, arg: &str) -> Result<TypeCode, ModelError> {
        if !arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit()) {
            return arg.parse().map_err(|_| ModelError::UnknownType {
                name: arg.to_string(),
            });
        }
        match self.type_for_name(arg) {
            Some(code) if code > 0 => Ok(code),
            _ => Err(ModelError::UnknownType {
                name: arg.to_string(),
            }),
        }
    }

    /// Number of classes, including `UNCLASSIFIED`.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table holds only `UNCLASSIFIED`.
    pub fn is_empty(&self) -> bool {
        self.names.len() <= 1
    }

    /// Iterate over `(code, name)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeCode, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (i as TypeCode, name.as_str()))
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::builtin()
    }
}
