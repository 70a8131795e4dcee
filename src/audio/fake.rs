//! In-memory backend for controller tests. Time only moves when a test
//! calls `FakeHandle::advance`.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use crate::library::Track;

use super::backend::{AudioBackend, AudioSession};
use super::error::BackendError;
use super::types::Volume;

pub(crate) const DEFAULT_DURATION: Duration = Duration::from_secs(200);

#[derive(Debug, Default)]
struct SessionState {
    position: Duration,
    duration: Duration,
    playing: bool,
    ended: bool,
    volume: Option<Volume>,
}

#[derive(Default)]
struct Shared {
    opened: Vec<PathBuf>,
    live: usize,
    max_live: usize,
    unreadable: HashSet<PathBuf>,
    device_down: bool,
    fail_seek: bool,
    fail_stop: bool,
    current: Option<Rc<RefCell<SessionState>>>,
}

/// Test-side view of the backend: inspect sessions and drive time.
#[derive(Clone, Default)]
pub(crate) struct FakeHandle {
    shared: Rc<RefCell<Shared>>,
}

impl FakeHandle {
    pub fn mark_unreadable(&self, path: impl AsRef<Path>) {
        self.shared
            .borrow_mut()
            .unreadable
            .insert(path.as_ref().to_path_buf());
    }

    pub fn set_device_down(&self, down: bool) {
        self.shared.borrow_mut().device_down = down;
    }

    pub fn set_fail_seek(&self, fail: bool) {
        self.shared.borrow_mut().fail_seek = fail;
    }

    pub fn set_fail_stop(&self, fail: bool) {
        self.shared.borrow_mut().fail_stop = fail;
    }

    pub fn live(&self) -> usize {
        self.shared.borrow().live
    }

    pub fn max_live(&self) -> usize {
        self.shared.borrow().max_live
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.shared.borrow().opened.clone()
    }

    fn with_current<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> Option<R> {
        let current = self.shared.borrow().current.clone();
        current.map(|s| {
            let mut guard = s.borrow_mut();
            f(&mut guard)
        })
    }

    /// Move the newest session forward by `by` if it is playing; reaching the
    /// end marks it ended.
    pub fn advance(&self, by: Duration) {
        self.with_current(|s| {
            if s.playing && !s.ended {
                s.position = (s.position + by).min(s.duration);
                if s.position == s.duration {
                    s.ended = true;
                }
            }
        });
    }

    pub fn position(&self) -> Option<Duration> {
        self.with_current(|s| s.position)
    }

    pub fn is_playing(&self) -> bool {
        self.with_current(|s| s.playing).unwrap_or(false)
    }

    pub fn volume(&self) -> Option<Volume> {
        self.with_current(|s| s.volume).flatten()
    }
}

pub(crate) struct FakeBackend {
    handle: FakeHandle,
}

impl FakeBackend {
    pub fn new() -> (Self, FakeHandle) {
        let handle = FakeHandle::default();
        (
            Self {
                handle: handle.clone(),
            },
            handle,
        )
    }
}

impl AudioBackend for FakeBackend {
    fn open(&mut self, track: &Track) -> Result<Box<dyn AudioSession>, BackendError> {
        let mut shared = self.handle.shared.borrow_mut();
        if shared.device_down {
            return Err(BackendError::Device("no output device".into()));
        }
        if shared.unreadable.contains(&track.path) {
            return Err(BackendError::Unreadable(format!(
                "{}: not a media file",
                track.path.display()
            )));
        }

        let duration = if track.duration.is_zero() {
            DEFAULT_DURATION
        } else {
            track.duration
        };
        let state = Rc::new(RefCell::new(SessionState {
            duration,
            ..SessionState::default()
        }));

        shared.opened.push(track.path.clone());
        shared.live += 1;
        shared.max_live = shared.max_live.max(shared.live);
        shared.current = Some(state.clone());

        Ok(Box::new(FakeSession {
            state,
            shared: self.handle.shared.clone(),
        }))
    }
}

struct FakeSession {
    state: Rc<RefCell<SessionState>>,
    shared: Rc<RefCell<Shared>>,
}

impl AudioSession for FakeSession {
    fn play(&mut self) {
        self.state.borrow_mut().playing = true;
    }

    fn pause(&mut self) {
        self.state.borrow_mut().playing = false;
    }

    fn stop(&mut self) -> Result<(), BackendError> {
        if self.shared.borrow().fail_stop {
            return Err(BackendError::Device("stop failed".into()));
        }
        let mut s = self.state.borrow_mut();
        s.playing = false;
        s.ended = false;
        s.position = Duration::ZERO;
        Ok(())
    }

    fn set_position(&mut self, position: Duration) -> Result<(), BackendError> {
        if self.shared.borrow().fail_seek {
            return Err(BackendError::Device("seek failed".into()));
        }
        let mut s = self.state.borrow_mut();
        s.position = position.min(s.duration);
        s.ended = false;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.state.borrow().position
    }

    fn duration(&self) -> Duration {
        self.state.borrow().duration
    }

    fn set_volume(&mut self, volume: Volume) {
        self.state.borrow_mut().volume = Some(volume);
    }

    fn has_ended(&self) -> bool {
        self.state.borrow().ended
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        let mut shared = self.shared.borrow_mut();
        shared.live -= 1;
        if shared
            .current
            .as_ref()
            .is_some_and(|c| Rc::ptr_eq(c, &self.state))
        {
            shared.current = None;
        }
    }
}
