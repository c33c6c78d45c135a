use super::*;
use crate::stack::screen::{Entry, Screen};
use image::RgbaImage;
use std::sync::Mutex;

struct Brittle;

impl Screen<RgbaImage> for Brittle {
    fn render(&self, canvas: &RgbaImage) -> RgbaImage {
        canvas.clone()
    }

    fn teardown(&mut self) {
        panic!("teardown failed");
    }
}

struct Logged {
    tag: u32,
    log: Arc<Mutex<Vec<u32>>>,
}

impl Screen<RgbaImage> for Logged {
    fn render(&self, canvas: &RgbaImage) -> RgbaImage {
        canvas.clone()
    }

    fn teardown(&mut self) {
        self.log.lock().unwrap().push(self.tag);
    }
}

fn shared(n: u32, width: Option<u32>, log: &Arc<Mutex<Vec<u32>>>) -> SharedState<RgbaImage> {
    let entries = (0..n)
        .map(|tag| {
            Entry::<RgbaImage>::new(Box::new(Logged {
                tag,
                log: Arc::clone(log),
            }))
        })
        .collect();
    Arc::new(RwLock::new(StackState::new(entries, width)))
}

fn driver(state: &SharedState<RgbaImage>, cancel: &CancelToken) -> Driver<RgbaImage> {
    Driver {
        state: Arc::clone(state),
        cancel: cancel.clone(),
        width: read(state).width,
        duration: Duration::ZERO,
        step_opts: StepOpts::default(),
    }
}

#[test]
fn cancel_token_is_shared_between_clones() {
    let a = CancelToken::new();
    let b = a.clone();
    assert!(!b.is_cancelled());
    a.cancel();
    assert!(b.is_cancelled());
}

#[test]
fn advance_push_counts_down_to_zero() {
    let t = advance(Transition::Pushing { offset: 10 }, 4, 10);
    assert_eq!(t, Transition::Pushing { offset: 6 });
    assert_eq!(advance(t, 40, 10), Transition::Pushing { offset: 0 });
}

#[test]
fn advance_pop_never_overshoots() {
    let t = Transition::Popping {
        offset: 15,
        elements: 2,
    };
    assert_eq!(
        advance(t, 9, 20),
        Transition::Popping {
            offset: 20,
            elements: 2
        }
    );
    assert_eq!(advance(Transition::Idle, 3, 20), Transition::Idle);
}

#[test]
fn push_commit_goes_idle_and_keeps_screen() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let state = shared(2, Some(16), &log);
    write(&state).transition = Transition::Pushing { offset: 16 };

    let outcome = driver(&state, &CancelToken::new()).run(DriveKind::Push);

    assert_eq!(outcome, DriveOutcome::Committed);
    let st = read(&state);
    assert!(st.transition.is_idle());
    assert_eq!(st.len(), 2);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn pop_commit_evicts_top_first() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let state = shared(4, Some(16), &log);
    write(&state).transition = Transition::Popping {
        offset: 0,
        elements: 2,
    };

    let outcome = driver(&state, &CancelToken::new()).run(DriveKind::Pop { elements: 2 });

    assert_eq!(outcome, DriveOutcome::Committed);
    assert_eq!(*log.lock().unwrap(), vec![3, 2]);
    let st = read(&state);
    assert_eq!(st.len(), 2);
    assert_eq!(st.transition, Transition::Idle);
}

#[test]
fn unknown_width_commits_immediately() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let state = shared(1, None, &log);
    write(&state).transition = Transition::Popping {
        offset: 0,
        elements: 1,
    };

    let outcome = driver(&state, &CancelToken::new()).run(DriveKind::Pop { elements: 1 });

    assert_eq!(outcome, DriveOutcome::Committed);
    assert_eq!(read(&state).len(), 0);
    assert_eq!(*log.lock().unwrap(), vec![0]);
}

#[test]
fn cancelled_driver_leaves_state_untouched() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let state = shared(2, Some(16), &log);
    let pending = Transition::Popping {
        offset: 0,
        elements: 1,
    };
    write(&state).transition = pending;

    let cancel = CancelToken::new();
    cancel.cancel();
    let outcome = driver(&state, &cancel).run(DriveKind::Pop { elements: 1 });

    assert_eq!(outcome, DriveOutcome::Cancelled);
    let st = read(&state);
    assert_eq!(st.len(), 2);
    assert_eq!(st.transition, pending);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn cancelled_with_unknown_width_does_not_commit() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let state = shared(2, None, &log);
    write(&state).transition = Transition::Pushing { offset: 0 };

    let cancel = CancelToken::new();
    cancel.cancel();
    assert_eq!(
        driver(&state, &cancel).run(DriveKind::Push),
        DriveOutcome::Cancelled
    );
    assert_eq!(read(&state).transition, Transition::Pushing { offset: 0 });
}

#[test]
fn panicking_teardown_does_not_skip_screens_below() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let state = shared(2, Some(16), &log);
    {
        let mut st = write(&state);
        st.entries.push(Entry::<RgbaImage>::new(Box::new(Brittle)));
        st.transition = Transition::Popping {
            offset: 0,
            elements: 2,
        };
    }

    let outcome = driver(&state, &CancelToken::new()).run(DriveKind::Pop { elements: 2 });

    assert_eq!(outcome, DriveOutcome::Committed);
    assert_eq!(*log.lock().unwrap(), vec![1]);
    let st = read(&state);
    assert_eq!(st.len(), 1);
    assert!(st.transition.is_idle());
}

#[test]
fn slide_distance_ignores_later_width_changes() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let state = shared(1, Some(10), &log);
    write(&state).transition = Transition::Pushing { offset: 100 };
    let cancel = CancelToken::new();
    // 60 one-second frames over 100px: the first step lands at 1s and moves 2px
    let paced = Driver {
        state: Arc::clone(&state),
        cancel: cancel.clone(),
        width: Some(100),
        duration: Duration::from_secs(60),
        step_opts: StepOpts {
            max_fps: 1,
            ..StepOpts::default()
        },
    };
    let handle = std::thread::spawn(move || paced.run(DriveKind::Push));

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    let moved = loop {
        let t = read(&state).transition;
        if t != (Transition::Pushing { offset: 100 }) || std::time::Instant::now() > deadline {
            break t;
        }
        std::thread::sleep(Duration::from_millis(5));
    };
    cancel.cancel();
    drop(write(&state));

    assert_eq!(moved, Transition::Pushing { offset: 98 });
    assert_eq!(handle.join().unwrap(), DriveOutcome::Cancelled);
    assert_eq!(read(&state).transition, Transition::Pushing { offset: 98 });
}
