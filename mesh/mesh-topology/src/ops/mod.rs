//! Local topological operators.
//!
//! Every operator mutates the store by tearing down the affected face
//! patch and rebuilding it through the same resolve-or-create machinery
//! construction uses, then re-pairing twins on the touched edges. That
//! keeps one code path for all mutation, and it makes the non-manifold
//! cases (any number of faces around an edge) uniform with the manifold
//! ones.

mod collapse;
mod flip;
mod smooth;
mod split;
