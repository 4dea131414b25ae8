use crate::book_loader::LoadToken;

mod appearance;
mod core;
mod library;
mod navigation;

/// Describes work that must be performed outside the pure reducer.
pub(in crate::app) enum Effect {
    SaveConfig,
    SavePosition,
    SetFullscreen(bool),
    LoadBook {
        request_id: u64,
        sources: Vec<String>,
        token: LoadToken,
    },
    QuitSafely,
}
