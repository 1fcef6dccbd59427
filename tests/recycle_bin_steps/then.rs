//! Then steps for recycle-bin BDD scenarios.

use super::world::{RecycleBinWorld, run_async};
use labtrack::{
    recycle_bin::{domain::EntityType, services::RecycleBinServiceError},
    task::services::TaskLifecycleError,
};
use rstest_bdd_macros::then;

#[then("the recycle bin lists {count:usize} entries")]
fn recycle_bin_lists(world: &RecycleBinWorld, count: usize) -> Result<(), eyre::Report> {
    let listing = run_async(world.bin.list_entries(EntityType::Task))?;
    if listing.len() != count {
        return Err(eyre::eyre!(
            "expected {count} entries, found {}: {listing:?}",
            listing.len()
        ));
    }
    Ok(())
}

#[then(r#"the task "{title}" is active"#)]
fn task_is_active(world: &RecycleBinWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world.task(&title)?.id();
    if run_async(world.tasks.find_active_task(task_id))?.is_none() {
        return Err(eyre::eyre!("expected {title:?} to be active"));
    }
    Ok(())
}

#[then(r#"the task "{title}" is not active"#)]
fn task_is_not_active(world: &RecycleBinWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world.task(&title)?.id();
    if run_async(world.tasks.find_active_task(task_id))?.is_some() {
        return Err(eyre::eyre!("expected {title:?} to be in the recycle bin"));
    }
    Ok(())
}

#[then(r#"the deletion fails because "{title}" is completed"#)]
fn deletion_fails_for_completed(world: &RecycleBinWorld, title: String) -> Result<(), eyre::Report> {
    let expected = world.task(&title)?.id();
    let result = world
        .last_delete
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing delete result"))?;

    if !matches!(result, Err(TaskLifecycleError::CompletedTaskImmutable(id)) if *id == expected) {
        return Err(eyre::eyre!(
            "expected CompletedTaskImmutable for {expected}, got {result:?}"
        ));
    }
    Ok(())
}

#[then("the request is denied")]
fn request_is_denied(world: &RecycleBinWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_bin_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing recycle bin result"))?;

    if !matches!(result, Err(RecycleBinServiceError::Unauthorized(_))) {
        return Err(eyre::eyre!("expected Unauthorized error, got {result:?}"));
    }
    Ok(())
}

#[then(r#"restoring the task "{title}" again fails with not found"#)]
fn restore_again_not_found(world: &RecycleBinWorld, title: String) -> Result<(), eyre::Report> {
    let recycle_id = world.entry(&title)?;
    let result = run_async(world.bin.restore(world.mentor()?, recycle_id));

    if !matches!(result, Err(RecycleBinServiceError::NotFound(id)) if id == recycle_id) {
        return Err(eyre::eyre!("expected NotFound error, got {result:?}"));
    }
    Ok(())
}
