// TODO:
// - subtree occupancy could be stored as a child bitmask per node to save hash lookups during pruning

pub mod convert;
pub mod octree;
pub mod spatial;
