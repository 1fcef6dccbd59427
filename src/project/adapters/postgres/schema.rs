//! Diesel schema for project persistence.

diesel::table! {
    /// Projects supervised by mentors.
    projects (id) {
        /// Storage-assigned identifier.
        id -> Int8,
        /// Project name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Owning mentor.
        mentor_id -> Int8,
        /// Derived or dropped status.
        #[max_length = 50]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Intern membership of projects.
    project_members (project_id, user_id) {
        /// Project reference.
        project_id -> Int8,
        /// Member user reference.
        user_id -> Int8,
        /// Join order within the project.
        position -> Int4,
    }
}

diesel::joinable!(project_members -> projects (project_id));
diesel::allow_tables_to_appear_in_same_query!(projects, project_members);
