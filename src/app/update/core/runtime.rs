use super::super::super::messages::Message;
use super::super::super::state::App;
use super::super::Effect;
use crate::book_loader::{LoadToken, load_book};
use crate::cache::{effective_book_config, load_position, remember_book};
use crate::config::{DEFAULT_CONFIG_PATH, load_config};
use iced::Event;
use iced::Task;
use iced::event;
use iced::futures::channel::oneshot;
use iced::keyboard;
use iced::mouse;
use iced::touch;
use iced::window;
use std::path::Path;
use tracing::{info, warn};

impl App {
    pub(in crate::app) fn run_effect(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::SaveConfig => {
                self.save_book_config();
                Task::none()
            }
            Effect::SavePosition => {
                self.persist_position();
                Task::none()
            }
            Effect::SetFullscreen(fullscreen) => {
                let mode = if fullscreen {
                    window::Mode::Fullscreen
                } else {
                    window::Mode::Windowed
                };
                info!(fullscreen, "Changing window mode");
                window::get_latest().and_then(move |id| window::change_mode(id, mode))
            }
            Effect::LoadBook {
                request_id,
                sources,
                token,
            } => Self::spawn_book_load(request_id, sources, token),
            Effect::QuitSafely => {
                self.save_book_config();
                self.persist_position();
                self.session.teardown();
                info!("Safe quit complete");
                iced::exit()
            }
        }
    }

    /// Resolve the book on a worker thread: page downloads and PDF
    /// rasterization block, and must stay off the async executor.
    fn spawn_book_load(request_id: u64, sources: Vec<String>, token: LoadToken) -> Task<Message> {
        let label = sources.join(", ");
        let (sender, receiver) = oneshot::channel();
        let worker_label = label.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("book-load-{request_id}"))
            .spawn(move || {
                let message = load_book_message(request_id, &sources, &token, worker_label);
                let _ = sender.send(message);
            });
        if let Err(err) = spawned {
            warn!("Failed to spawn book loader thread: {err}");
            return Task::done(Message::BookLoadFailed {
                request_id,
                source: label,
                error: err.to_string(),
            });
        }
        Task::perform(
            async move {
                receiver.await.unwrap_or_else(|_| Message::BookLoadFailed {
                    request_id,
                    source: label,
                    error: "book loader stopped unexpectedly".to_string(),
                })
            },
            |message| message,
        )
    }
}

fn load_book_message(
    request_id: u64,
    sources: &[String],
    token: &LoadToken,
    label: String,
) -> Message {
    let base_config = load_config(Path::new(DEFAULT_CONFIG_PATH));
    let cache_root = base_config.cache_root();
    match load_book(sources, &cache_root, token) {
        Ok(book) => {
            remember_book(&cache_root, &book.key, &book.title, book.pages.len());
            let config = effective_book_config(&base_config, &book.key);
            let position = load_position(&cache_root, &book.key);
            Message::BookLoaded {
                request_id,
                book,
                config,
                position,
            }
        }
        Err(err) => Message::BookLoadFailed {
            request_id,
            source: label,
            error: format!("{err:#}"),
        },
    }
}

pub(super) fn runtime_event_to_message(
    event: Event,
    status: event::Status,
    _window_id: window::Id,
) -> Option<Message> {
    if status == event::Status::Captured {
        return None;
    }
    match event {
        Event::Window(window::Event::Opened { size, .. })
        | Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized {
            width: size.width,
            height: size.height,
        }),
        Event::Window(window::Event::Moved(position)) => Some(Message::WindowMoved {
            x: position.x,
            y: position.y,
        }),
        Event::Window(window::Event::CloseRequested) => Some(Message::SafeQuit),
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            Some(Message::KeyPressed { key, modifiers })
        }
        Event::Mouse(mouse::Event::CursorMoved { position }) => {
            Some(Message::CursorMoved { x: position.x })
        }
        Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
            Some(Message::PointerPressed)
        }
        Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
            Some(Message::PointerReleased)
        }
        Event::Touch(touch::Event::FingerPressed { position, .. }) => {
            Some(Message::SwipeStarted { x: position.x })
        }
        Event::Touch(touch::Event::FingerLifted { position, .. }) => {
            Some(Message::SwipeEnded { x: position.x })
        }
        Event::Touch(touch::Event::FingerLost { .. }) => Some(Message::SwipeCancelled),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::Size;

    #[test]
    fn opened_window_reports_its_initial_size() {
        let message = runtime_event_to_message(
            Event::Window(window::Event::Opened {
                position: None,
                size: Size::new(600.0, 800.0),
            }),
            event::Status::Ignored,
            window::Id::unique(),
        );
        assert!(matches!(
            message,
            Some(Message::WindowResized { width, height }) if width == 600.0 && height == 800.0
        ));
    }

    #[test]
    fn close_request_runs_safe_quit() {
        let message = runtime_event_to_message(
            Event::Window(window::Event::CloseRequested),
            event::Status::Ignored,
            window::Id::unique(),
        );
        assert!(matches!(message, Some(Message::SafeQuit)));
    }
}
