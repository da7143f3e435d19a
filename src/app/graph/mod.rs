mod interaction;
mod scene;
mod view;

pub(crate) use scene::Scene;
