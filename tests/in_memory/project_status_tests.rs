//! Project status reacting to task creation, completion, deletion, and restore.

use super::helpers::{Lab, lab};
use eyre::ensure;
use labtrack::{
    project::{domain::ProjectStatus, services::ProjectService},
    recycle_bin::domain::EntityType,
    task::{domain::TaskStatus, services::CreateTaskRequest},
};
use mockable::DefaultClock;
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_follows_live_tasks_through_delete_and_restore(
    #[future(awt)] lab: Lab,
) -> eyre::Result<()> {
    let done = lab.root("Done").await?;
    let open = lab.root("Open").await?;
    lab.tasks
        .update_status(lab.mentor, done.id(), TaskStatus::Completed)
        .await?;
    ensure!(lab.project_status().await? == ProjectStatus::InProgress, "open task pending");

    lab.tasks.delete_task(lab.mentor, open.id()).await?;
    ensure!(lab.project_status().await? == ProjectStatus::Completed, "all live tasks done");

    let listing = lab.bin.list_entries(EntityType::Task).await?;
    let row = listing
        .first()
        .ok_or_else(|| eyre::eyre!("entry missing"))?;
    lab.bin.restore(lab.mentor, row.id).await?;
    ensure!(
        lab.project_status().await? == ProjectStatus::InProgress,
        "restored open task reopens the project"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn adding_work_reopens_a_completed_project(#[future(awt)] lab: Lab) -> eyre::Result<()> {
    let only = lab.root("Only").await?;
    lab.tasks
        .update_status(lab.mentor, only.id(), TaskStatus::Completed)
        .await?;
    ensure!(lab.project_status().await? == ProjectStatus::Completed, "completed");

    lab.tasks
        .create_task(lab.mentor, CreateTaskRequest::new(lab.project.id(), "More"))
        .await?;

    ensure!(lab.project_status().await? == ProjectStatus::InProgress, "reopened");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dropped_project_keeps_its_status(#[future(awt)] lab: Lab) -> eyre::Result<()> {
    let projects = ProjectService::new(Arc::clone(&lab.projects), Arc::new(DefaultClock));
    let task = lab.root("Only").await?;
    projects.drop_project(lab.mentor, lab.project.id()).await?;

    lab.tasks
        .update_status(lab.mentor, task.id(), TaskStatus::Completed)
        .await?;

    ensure!(lab.project_status().await? == ProjectStatus::Dropped, "dropped is sticky");
    Ok(())
}
