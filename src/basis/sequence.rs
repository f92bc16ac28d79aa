use crate::error::{Error, Result};
use crate::{Basis, Float};

/// A nested path of sub-bases over a master basis
///
/// Every entry is an ordered list of indices into the master basis. Path builders such as
/// least angle regression append one entry per iteration, so entries usually grow by one
/// index at a time; the sequence itself does not enforce it.
#[derive(Clone, Debug)]
pub struct BasisSequence<F> {
    master: Basis<F>,
    indices: Vec<Vec<usize>>,
}

impl<F: Float> BasisSequence<F> {
    /// Create an empty sequence over `master`
    pub fn new(master: Basis<F>) -> Self {
        BasisSequence {
            master,
            indices: Vec::new(),
        }
    }

    /// Append an entry
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if an index is out of range for the master basis.
    pub fn push(&mut self, indices: Vec<usize>) -> Result<()> {
        if let Some(&index) = indices.iter().find(|&&i| i >= self.master.len()) {
            return Err(Error::InvalidArgument(format!(
                "index {} out of range for a master basis of size {}",
                index,
                self.master.len()
            )));
        }
        self.indices.push(indices);

        Ok(())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Input dimension of the master basis
    pub fn dimension(&self) -> usize {
        self.master.dimension()
    }

    pub fn master_basis(&self) -> &Basis<F> {
        &self.master
    }

    /// Indices of entry `index`
    ///
    /// # Panics
    ///
    /// If `index >= self.len()`.
    pub fn indices(&self, index: usize) -> &[usize] {
        &self.indices[index]
    }

    /// Sub-basis selected by entry `index`
    ///
    /// # Panics
    ///
    /// If `index >= self.len()`.
    pub fn basis(&self, index: usize) -> Basis<F> {
        self.master
            .sub_basis(&self.indices[index])
            .expect("indices are checked on push")
    }

    /// Iterate over the index sets, shortest path prefix first
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.indices.iter().map(Vec::as_slice)
    }
}
