//! Typed identifiers for the four element arenas.
//!
//! Each arena gets its own id type so a `FaceId` can never be handed to a
//! vertex lookup. Ids are slot indexes; slots are never reused within a
//! mesh's lifetime, so a stale id fails its lookup instead of silently
//! aliasing a newer element.

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Wrap a raw slot index. Lookups with an index that was
            /// never handed out (or whose element was deleted) fail.
            #[inline]
            #[must_use]
            #[allow(clippy::cast_possible_truncation)]
            // Element counts are bounded by u32 by design.
            pub fn new(index: usize) -> Self {
                Self(index as u32)
            }

            /// The raw slot index behind this id.
            #[inline]
            #[must_use]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id!(
    /// Identifier of a vertex in the connectivity store.
    VertexId
);
define_id!(
    /// Identifier of a halfedge in the connectivity store.
    HalfedgeId
);
define_id!(
    /// Identifier of an undirected edge in the connectivity store.
    EdgeId
);
define_id!(
    /// Identifier of a triangular face in the connectivity store.
    FaceId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_indexes() {
        assert_eq!(VertexId::new(7).index(), 7);
        assert_eq!(EdgeId::new(0).index(), 0);
    }

    #[test]
    fn ids_are_distinct_types() {
        // Compile-time property; just confirm equality works per type.
        assert_eq!(FaceId::new(3), FaceId::new(3));
        assert_ne!(HalfedgeId::new(1), HalfedgeId::new(2));
    }
}
