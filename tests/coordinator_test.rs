use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use flow_scene::coordinator::{LoadCoordinator, LoadSummary, Progress, TaskState};
use futures::{
    channel::oneshot,
    executor::{LocalPool, block_on},
    task::LocalSpawnExt,
};

/// Registers `n` loads that settle when their sender fires, runs the
/// coordinator on a pool and completes the loads in `order`.
fn complete_in_order(order: &[usize]) -> (usize, Vec<String>) {
    let n = order.len();
    let fired = Rc::new(Cell::new(0));
    let labels = Rc::new(RefCell::new(Vec::new()));
    let mut coordinator: LoadCoordinator<usize, String> = LoadCoordinator::new();
    let mut senders = Vec::new();
    for i in 0..n {
        let (tx, rx) = oneshot::channel::<usize>();
        senders.push(Some(tx));
        coordinator.register(format!("model {i}"), move |_progress| async move {
            rx.await.map_err(|_| "cancelled".to_string())
        });
    }
    {
        let fired = Rc::clone(&fired);
        let labels = Rc::clone(&labels);
        coordinator.on_all_complete(move |outcomes| {
            fired.set(fired.get() + 1);
            labels
                .borrow_mut()
                .extend(outcomes.into_iter().map(|outcome| outcome.label));
        });
    }

    let mut pool = LocalPool::new();
    pool.spawner()
        .spawn_local(async move {
            coordinator.run().await;
        })
        .unwrap();
    pool.run_until_stalled();
    for (step, &index) in order.iter().enumerate() {
        assert_eq!(fired.get(), 0, "fired after {step} of {n} loads");
        senders[index].take().unwrap().send(index).unwrap();
        pool.run_until_stalled();
    }
    let labels = labels.borrow().clone();
    (fired.get(), labels)
}

#[test]
fn fires_exactly_once_in_any_completion_order() {
    for order in [
        vec![0],
        vec![0, 1, 2],
        vec![2, 1, 0],
        vec![1, 2, 0],
        vec![3, 0, 2, 1],
    ] {
        let (fired, labels) = complete_in_order(&order);
        assert_eq!(fired, 1, "order {order:?}");
        let expected: Vec<String> = (0..order.len()).map(|i| format!("model {i}")).collect();
        assert_eq!(labels, expected, "outcomes are in registration order");
    }
}

#[test]
fn failures_count_as_settled() {
    let fired = Rc::new(Cell::new(0));
    let mut coordinator: LoadCoordinator<u32, String> = LoadCoordinator::new();
    coordinator.register("duck", |_| async { Ok(1) });
    coordinator.register("teapot", |_| async { Err("404".to_string()) });
    coordinator.register("mailbox", |_| async { Ok(3) });
    {
        let fired = Rc::clone(&fired);
        coordinator.on_all_complete(move |outcomes| {
            fired.set(fired.get() + 1);
            assert_eq!(outcomes.len(), 3);
            assert!(outcomes[1].result.is_err());
            assert_eq!(outcomes[2].result.as_ref().ok(), Some(&3));
        });
    }

    let summary = block_on(coordinator.run());

    assert_eq!(fired.get(), 1);
    assert_eq!(
        summary,
        Some(LoadSummary {
            registered: 3,
            succeeded: 2,
            failed: 1
        })
    );
}

#[test]
fn nothing_registered_never_fires() {
    let fired = Rc::new(Cell::new(false));
    let mut coordinator: LoadCoordinator<(), String> = LoadCoordinator::new();
    {
        let fired = Rc::clone(&fired);
        coordinator.on_all_complete(move |_| fired.set(true));
    }
    assert!(coordinator.is_empty());

    assert_eq!(block_on(coordinator.run()), None);
    assert!(!fired.get());
}

#[test]
fn loads_do_not_start_before_run() {
    let started = Rc::new(Cell::new(false));
    let mut coordinator: LoadCoordinator<(), String> = LoadCoordinator::new();
    {
        let started = Rc::clone(&started);
        coordinator.register("lazy", move |_| async move {
            started.set(true);
            Ok(())
        });
    }
    assert!(!started.get());

    block_on(coordinator.run());
    assert!(started.get());
}

#[test]
fn registered_loads_start_pending() {
    let mut coordinator: LoadCoordinator<(), String> = LoadCoordinator::new();
    let first = coordinator.register("duck", |progress| async move {
        progress.report(512, Some(2048));
        Ok(())
    });
    let second = coordinator.register("teapot", |_| async { Ok(()) });

    assert_eq!((first, second), (0, 1));
    let tasks = coordinator.tasks();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].label, "duck");
    assert!(tasks.iter().all(|task| task.state == TaskState::Pending));
    assert!(tasks.iter().all(|task| !task.is_terminal()));
    assert!(tasks.iter().all(|task| task.loaded == 0 && task.total.is_none()));

    assert_eq!(block_on(coordinator.run()).map(|summary| summary.succeeded), Some(2));
}

#[test]
fn detached_progress_is_ignored() {
    Progress::detached().report(10, Some(20));
}
