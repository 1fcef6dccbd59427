//! Given steps for recycle-bin BDD scenarios.

use super::world::{RecycleBinWorld, run_async};
use eyre::WrapErr;
use labtrack::{
    task::{domain::TaskStatus, services::CreateTaskRequest},
    user::domain::{Actor, Role},
};
use rstest_bdd_macros::given;

#[given(r#"a project supervised by mentor "{mentor}" with intern "{intern}""#)]
fn project_with_members(
    world: &mut RecycleBinWorld,
    mentor: String,
    intern: String,
) -> Result<(), eyre::Report> {
    let mentor = Actor::from(&world.directory.register(mentor, Role::Mentor)?);
    let intern = Actor::from(&world.directory.register(intern, Role::Intern)?);
    let project = run_async(world.projects.create_project(mentor, "Soil sensors", None))
        .wrap_err("create scenario project")?;
    run_async(world.projects.add_member(mentor, project.id(), intern.user_id()))
        .wrap_err("add intern to scenario project")?;

    world.mentor = Some(mentor);
    world.intern = Some(intern);
    world.project_id = Some(project.id());
    Ok(())
}

#[given(r#"a task "{title}""#)]
fn a_task(world: &mut RecycleBinWorld, title: String) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(world.project_id()?, title.clone());
    let task = run_async(world.tasks.create_task(world.mentor()?, request))
        .wrap_err("create scenario task")?;
    world.known_tasks.insert(title, task);
    Ok(())
}

#[given(r#"a sub-task "{title}" under "{parent}""#)]
fn a_subtask(
    world: &mut RecycleBinWorld,
    title: String,
    parent: String,
) -> Result<(), eyre::Report> {
    let parent_id = world.task(&parent)?.id();
    let request = CreateTaskRequest::new(world.project_id()?, title.clone()).with_parent(parent_id);
    let task = run_async(world.tasks.create_task(world.mentor()?, request))
        .wrap_err("create scenario sub-task")?;
    world.known_tasks.insert(title, task);
    Ok(())
}

#[given(r#"the task "{title}" is completed"#)]
fn task_is_completed(world: &mut RecycleBinWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world.task(&title)?.id();
    let updated = run_async(world.tasks.update_status(
        world.mentor()?,
        task_id,
        TaskStatus::Completed,
    ))
    .wrap_err("complete scenario task")?;
    world.known_tasks.insert(title, updated);
    Ok(())
}

#[given(r#"the mentor has deleted the task "{title}""#)]
fn mentor_has_deleted(world: &mut RecycleBinWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world.task(&title)?.id();
    let stored = run_async(world.tasks.delete_task(world.mentor()?, task_id))
        .wrap_err("delete scenario task")?;
    world.remember_entries(&stored);
    Ok(())
}
