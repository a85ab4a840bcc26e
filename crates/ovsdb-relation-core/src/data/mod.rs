// # Relation Data Implementations
//
// Concrete `RelationData` sources:
// - `StaticRelationData`: values held in memory (embedding, tests)
// - `FileRelationData`: a JSON snapshot written by the hook environment

pub mod file;
pub mod memory;

pub use file::FileRelationData;
pub use memory::StaticRelationData;

/// Treat an empty published value as absent
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
