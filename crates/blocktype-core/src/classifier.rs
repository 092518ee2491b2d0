//! The contract the driver requires from a classifier engine.

use crate::ClassifyError;

/// Integer identifier of a content-type class.
pub type TypeCode = u32;

/// An incremental, stateful content-type classifier.
///
/// Bytes are accumulated with [`update`](Classifier::update) and turned into
/// a type code with [`classify`](Classifier::classify). Classifying does not
/// clear the accumulated state; callers reset it explicitly with
/// [`clear`](Classifier::clear) before feeding new data.
pub trait Classifier {
    /// Accumulate a chunk of bytes into the current feature state.
    fn update(&mut self, bytes: &[u8]) -> Result<(), ClassifyError>;

    /// Finalize the accumulated state into a type code.
    fn classify(&mut self) -> Result<TypeCode, ClassifyError>;

    /// Discard all accumulated state.
    fn clear(&mut self);

    /// Human readable name for a type code, if the code is known.
    fn name_for_type(&self, code: TypeCode) -> Option<&str>;

    /// Type code for a name, if the name is known.
    fn type_for_name(&self, name: &str) -> Option<TypeCode>;
}

impl<C: Classifier + ?Sized> Classifier for &mut C {
    fn update(&mut self, bytes: &[u8]) -> Result<(), ClassifyError> {
        (**self).update(bytes)
    }

    fn classify(&mut self) -> Result<TypeCode, ClassifyError> {
        (**self).classify()
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn name_for_type(&self, code: TypeCode) -> Option<&str> {
        (**self).name_for_type(code)
    }

    fn type_for_name(&self, name: &str) -> Option<TypeCode> {
        (**self).type_for_name(name)
    }
}
