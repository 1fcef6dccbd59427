//! Diesel schema for task persistence.

diesel::table! {
    /// Task records, including soft-deleted ones awaiting restore or purge.
    tasks (id) {
        /// Storage-assigned identifier.
        id -> Int8,
        /// Owning project.
        project_id -> Int8,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Optional priority name.
        #[max_length = 20]
        priority -> Nullable<Varchar>,
        /// Board status name.
        #[max_length = 20]
        status -> Varchar,
        /// Optional progress percentage.
        progress -> Nullable<Int2>,
        /// Optional deadline.
        deadline -> Nullable<Timestamptz>,
        /// Parent task for sub-tasks.
        parent_id -> Nullable<Int8>,
        /// Whether the task owns sub-tasks.
        is_parent -> Bool,
        /// Creating user.
        created_by -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Users assigned to tasks.
    task_assignees (task_id, user_id) {
        /// Task reference.
        task_id -> Int8,
        /// Assigned user.
        user_id -> Int8,
        /// Assignment order; the first assignee is the task owner.
        position -> Int4,
    }
}

diesel::joinable!(task_assignees -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, task_assignees);
