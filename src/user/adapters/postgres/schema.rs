//! Diesel schema for user records.

diesel::table! {
    /// Users known to the lab.
    users (id) {
        /// Storage-assigned identifier.
        id -> Int8,
        /// Name shown in listings and snapshots.
        #[max_length = 255]
        display_name -> Varchar,
        /// Role name.
        #[max_length = 50]
        role -> Varchar,
    }
}
