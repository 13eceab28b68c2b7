use std::{cell::RefCell, rc::Rc};

use crate::{animation::AnimationMixer, data_structures::scene_graph::SceneGraph, spin::SpinScheduler};

/// Everything the pipeline writes and the frame loop reads.
#[derive(Default)]
pub struct SceneState {
    pub graph: SceneGraph,
    pub spin: SpinScheduler,
    pub mixer: AnimationMixer,
    /// Set once, when every model load has settled.
    pub ready: bool,
}

/// The state is only ever touched from the thread running the event loop.
pub type SharedState = Rc<RefCell<SceneState>>;

impl SceneState {
    pub fn shared() -> SharedState {
        Rc::new(RefCell::new(Self::default()))
    }
}
