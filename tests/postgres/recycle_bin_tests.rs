//! Recycle-bin storage guarantees against `PostgreSQL`.

use crate::postgres::helpers::PgLab;
use chrono::{DateTime, Duration, Utc};
use eyre::{Result, ensure};
use labtrack::{
    recycle_bin::{
        domain::{EntityType, NewRecycleBinEntry},
        ports::{RecycleBinRepository, RecycleBinRepositoryError},
    },
    task::domain::Task,
};
use rstest::rstest;
use serde_json::json;

fn entry_for(lab: &PgLab, task: &Task, at: DateTime<Utc>) -> NewRecycleBinEntry {
    NewRecycleBinEntry::for_task(
        task.id(),
        json!({ "TaskId": task.id().value(), "TaskName": task.title() }),
        lab.mentor.user_id(),
        at,
    )
}

#[rstest]
fn batch_rolls_back_when_an_entity_is_already_archived() -> Result<()> {
    let Some(lab) = PgLab::open("rb_batch")? else {
        return Ok(());
    };
    let first = lab.create("Sieve samples", None)?;
    let second = lab.create("Weigh samples", None)?;
    let now = Utc::now();
    lab.rt
        .block_on(lab.recycle_store.archive_all(&[entry_for(&lab, &first, now)]))?;

    let result = lab.rt.block_on(lab.recycle_store.archive_all(&[
        entry_for(&lab, &second, now),
        entry_for(&lab, &first, now),
    ]));

    ensure!(
        matches!(
            result,
            Err(RecycleBinRepositoryError::DuplicateEntry { entity_id, .. })
                if entity_id == first.id().value()
        ),
        "unexpected result: {result:?}"
    );
    let second_entry = lab.rt.block_on(
        lab.recycle_store
            .find_by_entity(EntityType::Task, second.id().value()),
    )?;
    ensure!(second_entry.is_none(), "rolled-back batch left an entry behind");
    let stored = lab
        .rt
        .block_on(lab.recycle_store.list_by_type(EntityType::Task))?;
    ensure!(stored.len() == 1, "expected one entry, got {stored:?}");
    Ok(())
}

#[rstest]
fn concurrent_archives_of_one_task_keep_a_single_entry() -> Result<()> {
    let Some(lab) = PgLab::open("rb_race")? else {
        return Ok(());
    };
    let task = lab.create("Calibrate scale", None)?;
    let left = [entry_for(&lab, &task, Utc::now())];
    let right = [entry_for(&lab, &task, Utc::now())];

    let (first, second) = lab.rt.block_on(async {
        tokio::join!(
            lab.recycle_store.archive_all(&left),
            lab.recycle_store.archive_all(&right),
        )
    });

    let duplicates = [&first, &second]
        .iter()
        .filter(|result| {
            matches!(
                result,
                Err(RecycleBinRepositoryError::DuplicateEntry { entity_id, .. })
                    if *entity_id == task.id().value()
            )
        })
        .count();
    ensure!(duplicates == 1, "results were {first:?} and {second:?}");
    ensure!(first.is_ok() || second.is_ok(), "one archive must succeed");
    let stored = lab
        .rt
        .block_on(lab.recycle_store.list_by_type(EntityType::Task))?;
    ensure!(stored.len() == 1, "expected one entry, got {stored:?}");
    Ok(())
}

#[rstest]
fn listing_orders_by_deletion_time_then_id() -> Result<()> {
    let Some(lab) = PgLab::open("rb_order")? else {
        return Ok(());
    };
    let oldest = lab.create("Oldest", None)?;
    let tied_low = lab.create("Tied low", None)?;
    let tied_high = lab.create("Tied high", None)?;
    let later = Utc::now();
    let earlier = later - Duration::minutes(5);
    for (task, at) in [(&tied_low, later), (&oldest, earlier), (&tied_high, later)] {
        lab.rt
            .block_on(lab.recycle_store.archive_all(&[entry_for(&lab, task, at)]))?;
    }

    let listing = lab.rt.block_on(lab.bin.list_entries(EntityType::Task))?;

    let ids: Vec<i64> = listing.iter().map(|row| row.entity_id).collect();
    ensure!(
        ids == [
            tied_high.id().value(),
            tied_low.id().value(),
            oldest.id().value()
        ],
        "unexpected order: {ids:?}"
    );
    ensure!(
        listing.iter().all(|row| row.deleted_by_name == "Dr. Minh"),
        "unexpected deleter names: {listing:?}"
    );
    Ok(())
}
