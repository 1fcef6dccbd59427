//! Recycle-bin listing, restore, and purge over in-memory adapters.

use super::helpers::{Lab, lab};
use eyre::ensure;
use labtrack::{
    recycle_bin::{domain::EntityType, services::RecycleBinServiceError},
    task::domain::TaskId,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_shows_most_recent_deletion_first(#[future(awt)] lab: Lab) -> eyre::Result<()> {
    let mut deleted = Vec::new();
    for title in ["Calibrate", "Sample", "Report"] {
        let task = lab.root(title).await?;
        lab.tasks.delete_task(lab.mentor, task.id()).await?;
        deleted.push(task.id().value());
    }

    let listing = lab.bin.list_entries(EntityType::Task).await?;

    let names: Vec<&str> = listing.iter().map(|row| row.name.as_str()).collect();
    ensure!(
        names == ["Report", "Sample", "Calibrate"],
        "unexpected order: {names:?}"
    );
    ensure!(
        listing.windows(2).all(|pair| pair[0].deleted_at >= pair[1].deleted_at),
        "deletion times must not increase down the listing"
    );
    ensure!(
        listing.iter().all(|row| row.deleted_by_name == "Dr. Minh"),
        "deleting user resolved by name"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_shows_owner_at_deletion_time(#[future(awt)] lab: Lab) -> eyre::Result<()> {
    let task = lab.root("Calibrate").await?;
    lab.tasks
        .assign_task(lab.mentor, task.id(), lab.intern.user_id())
        .await?;
    lab.tasks.delete_task(lab.mentor, task.id()).await?;

    let listing = lab.bin.list_entries(EntityType::Task).await?;

    let [row] = listing.as_slice() else {
        eyre::bail!("expected one row, got {listing:?}");
    };
    ensure!(row.owner == "Thu", "owner was {}", row.owner);
    ensure!(row.status == "ToDo", "status was {}", row.status);
    ensure!(row.entity_id == task.id().value(), "entity id");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restore_returns_task_to_active_listings(#[future(awt)] lab: Lab) -> eyre::Result<()> {
    let task = lab.root("Calibrate").await?;
    let stored = lab.tasks.delete_task(lab.mentor, task.id()).await?;
    let entry = stored
        .first()
        .ok_or_else(|| eyre::eyre!("delete stored nothing"))?;

    lab.bin.restore(lab.mentor, entry.id()).await?;

    ensure!(
        lab.bin.list_entries(EntityType::Task).await?.is_empty(),
        "restored entry must leave the listing"
    );
    ensure!(
        lab.tasks.find_active_task(task.id()).await?.is_some(),
        "restored task is active again"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restoring_a_parent_leaves_children_in_the_bin(#[future(awt)] lab: Lab) -> eyre::Result<()> {
    let parent = lab.root("Survey").await?;
    let child = lab.subtask(parent.id(), "North plot").await?;
    let stored = lab.tasks.delete_task(lab.mentor, parent.id()).await?;
    let parent_entry = stored
        .iter()
        .find(|entry| entry.task_id() == Some(parent.id()))
        .ok_or_else(|| eyre::eyre!("parent entry missing"))?;

    lab.bin.restore(lab.mentor, parent_entry.id()).await?;

    ensure!(
        lab.tasks.find_active_task(parent.id()).await?.is_some(),
        "parent restored"
    );
    ensure!(
        lab.tasks.find_active_task(child.id()).await?.is_none(),
        "child keeps its own entry"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn purge_is_final(#[future(awt)] lab: Lab) -> eyre::Result<()> {
    let task = lab.root("Calibrate").await?;
    let stored = lab.tasks.delete_task(lab.mentor, task.id()).await?;
    let recycle_id = stored
        .first()
        .map(|entry| entry.id())
        .ok_or_else(|| eyre::eyre!("delete stored nothing"))?;

    lab.bin.delete_permanent(lab.mentor, recycle_id).await?;

    ensure!(
        lab.tasks.find_active_task(task.id()).await?.is_none(),
        "purged task cannot come back"
    );
    let restore = lab.bin.restore(lab.mentor, recycle_id).await;
    ensure!(
        matches!(restore, Err(RecycleBinServiceError::NotFound(id)) if id == recycle_id),
        "unexpected restore result: {restore:?}"
    );
    let purge = lab.bin.delete_permanent(lab.mentor, recycle_id).await;
    ensure!(
        matches!(purge, Err(RecycleBinServiceError::NotFound(id)) if id == recycle_id),
        "unexpected purge result: {purge:?}"
    );
    ensure!(
        lab.tasks.delete_task(lab.mentor, task.id()).await.is_err(),
        "purged task cannot be deleted again"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn purging_a_parent_detaches_restored_children(#[future(awt)] lab: Lab) -> eyre::Result<()> {
    let parent = lab.root("Survey").await?;
    let child = lab.subtask(parent.id(), "North plot").await?;
    let stored = lab.tasks.delete_task(lab.mentor, parent.id()).await?;
    let id_of = |task: TaskId| {
        stored
            .iter()
            .find(|entry| entry.task_id() == Some(task))
            .map(|entry| entry.id())
            .ok_or_else(|| eyre::eyre!("entry for task {task} missing"))
    };

    lab.bin.delete_permanent(lab.mentor, id_of(parent.id())?).await?;
    lab.bin.restore(lab.mentor, id_of(child.id())?).await?;

    let restored = lab
        .tasks
        .find_active_task(child.id())
        .await?
        .ok_or_else(|| eyre::eyre!("child should be active"))?;
    ensure!(restored.parent_id().is_none(), "child must be detached");
    Ok(())
}
