//! Diesel schema for recycle-bin persistence.

diesel::table! {
    /// Live soft-delete markers with their snapshots.
    recycle_bin (id) {
        /// Storage-assigned identifier.
        id -> Int8,
        /// Entity type tag.
        #[max_length = 50]
        entity_type -> Varchar,
        /// Deleted entity's identifier.
        entity_id -> Int8,
        /// Point-in-time JSON snapshot.
        snapshot -> Jsonb,
        /// Deleting user.
        deleted_by -> Int8,
        /// Deletion timestamp.
        deleted_at -> Timestamptz,
    }
}
