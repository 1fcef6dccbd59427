//! When steps for recycle-bin BDD scenarios.

use super::world::{RecycleBinWorld, run_async};
use rstest_bdd_macros::when;

#[when(r#"the mentor deletes the task "{title}""#)]
fn mentor_deletes(world: &mut RecycleBinWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world.task(&title)?.id();
    let result = run_async(world.tasks.delete_task(world.mentor()?, task_id));
    if let Ok(ref stored) = result {
        world.remember_entries(stored);
    }
    world.last_delete = Some(result);
    Ok(())
}

#[when(r#"the mentor restores the task "{title}""#)]
fn mentor_restores(world: &mut RecycleBinWorld, title: String) -> Result<(), eyre::Report> {
    let recycle_id = world.entry(&title)?;
    world.last_bin_result = Some(run_async(world.bin.restore(world.mentor()?, recycle_id)));
    Ok(())
}

#[when(r#"the intern restores the task "{title}""#)]
fn intern_restores(world: &mut RecycleBinWorld, title: String) -> Result<(), eyre::Report> {
    let recycle_id = world.entry(&title)?;
    world.last_bin_result = Some(run_async(world.bin.restore(world.intern()?, recycle_id)));
    Ok(())
}

#[when(r#"the mentor permanently deletes the task "{title}""#)]
fn mentor_purges(world: &mut RecycleBinWorld, title: String) -> Result<(), eyre::Report> {
    let recycle_id = world.entry(&title)?;
    world.last_bin_result = Some(run_async(
        world.bin.delete_permanent(world.mentor()?, recycle_id),
    ));
    Ok(())
}
