//! Structures, names, superposition and alignment held together for output

use lin_alg::f64::Vec3;

use polysup_align::Alignment;
use polysup_mol::Protein;

use crate::error::{SuperposeError, SuperposeResult};
use crate::superposition::Superposition;

/// The result of superposing a set of structures
#[derive(Debug, Clone)]
pub struct SuperpositionContext {
    proteins: Vec<Protein>,
    names: Vec<String>,
    superposition: Superposition,
    alignment: Option<Alignment>,
}

impl SuperpositionContext {
    /// Create a context; names, superposition and alignment must all match the structure count
    pub fn new(
        proteins: Vec<Protein>,
        names: Vec<String>,
        superposition: Superposition,
        alignment: Option<Alignment>,
    ) -> SuperposeResult<Self> {
        if names.len() != proteins.len() {
            return Err(SuperposeError::NameCountMismatch {
                names: names.len(),
                structures: proteins.len(),
            });
        }
        if superposition.num_entries() != proteins.len() {
            return Err(SuperposeError::EntryCountMismatch {
                expected: proteins.len(),
                found: superposition.num_entries(),
            });
        }
        if let Some(alignment) = &alignment {
            if alignment.num_entries() != proteins.len() {
                return Err(SuperposeError::EntryCountMismatch {
                    expected: proteins.len(),
                    found: alignment.num_entries(),
                });
            }
        }
        Ok(SuperpositionContext {
            proteins,
            names,
            superposition,
            alignment,
        })
    }

    pub fn num_entries(&self) -> usize {
        self.proteins.len()
    }

    pub fn proteins(&self) -> &[Protein] {
        &self.proteins
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn superposition(&self) -> &Superposition {
        &self.superposition
    }

    pub fn has_alignment(&self) -> bool {
        self.alignment.is_some()
    }

    /// The alignment, or an error if the context was built without one
    pub fn alignment(&self) -> SuperposeResult<&Alignment> {
        self.alignment.as_ref().ok_or(SuperposeError::NoAlignment)
    }

    /// Alpha-carbon coordinates of an entry after applying its transform
    pub fn superposed_ca_coords(&self, entry: usize) -> SuperposeResult<Vec<Vec3>> {
        let protein = self.proteins.get(entry).ok_or(SuperposeError::EntryOutOfRange {
            entry,
            num_entries: self.proteins.len(),
        })?;
        self.superposition.transform_coords(entry, &protein.ca_coords()?)
    }

    /// Split into structures, names, superposition and alignment
    pub fn into_parts(self) -> (Vec<Protein>, Vec<String>, Superposition, Option<Alignment>) {
        (self.proteins, self.names, self.superposition, self.alignment)
    }
}
