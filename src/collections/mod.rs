//! Small generic collection types used as building blocks by the rest of
//! the crate: a growable array and a djb2 open-chaining hash map.

mod dynarray;
mod hashmap;

pub use dynarray::DynArray;
pub use hashmap::StringHashMap;
