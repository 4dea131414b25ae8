use super::messages::Message;
use super::state::{App, PAGE_ASPECT_RATIO, PANEL_WIDTH, TOOLBAR_SPACING};
use crate::theme;
use flipbook_core::flip::{FLAT_ANGLE, FLIPPED_ANGLE};
use flipbook_core::navigation::{MAX_SCALE, MIN_SCALE};
use flipbook_core::{Face, NavAction, Page, ReaderSnapshot, SheetPose};
use iced::alignment::{Horizontal, Vertical};
use iced::widget::image::Handle;
use iced::widget::{
    Column, Row, Space, Stack, button, column, container, horizontal_space, image, row,
    scrollable, text, text_input,
};
use iced::{ContentFit, Element, Length, Theme};

#[derive(Debug, Clone, Copy)]
enum PageSide {
    Left,
    Right,
}

type ContainerStyle = fn(&Theme) -> container::Style;
type ButtonStyle = fn(&Theme, button::Status) -> button::Style;

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let snapshot = self.session.snapshot();
        let toolbar = self.toolbar(&snapshot);

        let mut body = Row::new().height(Length::Fill);
        if let Some(panel) = self.side_panel(&snapshot) {
            body = body.push(panel);
        }
        body = body.push(self.stage(&snapshot));

        column![toolbar, body].into()
    }

    fn toolbar(&self, snapshot: &ReaderSnapshot) -> Element<'_, Message> {
        let has_book = self.session.has_book();
        let scale = snapshot.scale;
        let panels = snapshot.panels;

        let bookmark_label = if snapshot.current_bookmarked {
            "Unbookmark"
        } else {
            "Bookmark"
        };
        let fullscreen_label = if snapshot.is_fullscreen {
            "Exit Fullscreen"
        } else {
            "Fullscreen"
        };
        let theme_label = if matches!(self.config.theme, crate::config::ThemeMode::Night) {
            "Day Mode"
        } else {
            "Night Mode"
        };

        let controls = row![
            nav_button("Previous", NavAction::Prev, snapshot.can_prev),
            text(snapshot.page_label.clone()),
            nav_button("Next", NavAction::Next, snapshot.can_next),
            horizontal_space(),
            nav_button("-", NavAction::ZoomOut, has_book && scale > MIN_SCALE),
            text(format!("{}%", snapshot.scale_percent)),
            nav_button("+", NavAction::ZoomIn, has_book && scale < MAX_SCALE),
            horizontal_space(),
            nav_button(
                bookmark_label,
                NavAction::ToggleBookmarkCurrent,
                has_book && snapshot.total_pages > 0
            ),
            panel_button("Thumbnails", NavAction::ToggleThumbnails, panels.show_thumbnails, has_book),
            panel_button("Bookmarks", NavAction::ToggleBookmarksList, panels.show_bookmarks, has_book),
            panel_button("Library", NavAction::ToggleLibrary, panels.show_library, true),
            nav_button(fullscreen_label, NavAction::ToggleFullscreen, true),
            button(theme_label).on_press(Message::ToggleTheme),
        ]
        .spacing(TOOLBAR_SPACING)
        .align_y(Vertical::Center)
        .width(Length::Fill);

        container(controls).padding(8).into()
    }

    fn side_panel(&self, snapshot: &ReaderSnapshot) -> Option<Element<'_, Message>> {
        let panels = snapshot.panels;
        let content = if panels.show_thumbnails {
            self.thumbnails_view(snapshot)
        } else if panels.show_bookmarks {
            self.bookmarks_view(snapshot)
        } else if panels.show_library && self.session.has_book() {
            self.library_view()
        } else {
            return None;
        };
        Some(
            container(content)
                .width(Length::Fixed(PANEL_WIDTH))
                .height(Length::Fill)
                .padding(8)
                .style(theme::side_panel)
                .into(),
        )
    }

    fn stage(&self, snapshot: &ReaderSnapshot) -> Element<'_, Message> {
        let content: Element<'_, Message> = if !self.session.has_book() {
            if self.loader.loading {
                self.loading_splash()
            } else {
                container(self.library_view())
                    .max_width(560.0)
                    .padding(16)
                    .style(theme::side_panel)
                    .into()
            }
        } else if snapshot.total_pages == 0 {
            text("This book has no pages.").into()
        } else {
            let mut spread = column![self.book_spread()]
                .spacing(10)
                .align_x(Horizontal::Center);
            if self.config.show_page_numbers {
                spread = spread.push(text(snapshot.page_label.clone()).size(14));
            }
            if self.loader.loading {
                spread = spread.push(text(self.loading_label()).size(14));
            }
            spread.into()
        };

        container(scrollable(
            container(content).center_x(Length::Fill).padding(24),
        ))
        .center(Length::Fill)
        .style(theme::stage)
        .into()
    }

    /// Resting pages first, then turning sheets by ascending z-order.
    fn book_spread(&self) -> Element<'_, Message> {
        let (page_width, page_height) = self.page_size();
        let sheets = self.session.sheets();
        let poses = self.flip.poses(self.session.current_sheet(), self.frame_at);
        let mut layers: Vec<Element<'_, Message>> = Vec::new();

        let resting_left = poses
            .iter()
            .filter(|pose| pose.angle <= FLIPPED_ANGLE)
            .max_by_key(|pose| pose.sheet_index);
        if let Some(sheet) = resting_left.and_then(|pose| sheets.get(pose.sheet_index)) {
            layers.push(page_layer(
                &sheet.back,
                PageSide::Left,
                page_width,
                page_width,
                page_height,
                false,
            ));
        }

        let resting_right = poses
            .iter()
            .filter(|pose| pose.angle >= FLAT_ANGLE)
            .min_by_key(|pose| pose.sheet_index);
        if let Some(sheet) = resting_right.and_then(|pose| sheets.get(pose.sheet_index)) {
            layers.push(page_layer(
                &sheet.front,
                PageSide::Right,
                page_width,
                page_width,
                page_height,
                false,
            ));
        }

        let mut turning: Vec<&SheetPose> = poses
            .iter()
            .filter(|pose| pose.angle > FLIPPED_ANGLE && pose.angle < FLAT_ANGLE)
            .collect();
        turning.sort_by_key(|pose| pose.z_index);
        for pose in turning {
            let Some(sheet) = sheets.get(pose.sheet_index) else {
                continue;
            };
            let visible_width = page_width * pose.angle.to_radians().cos().abs();
            let layer = match pose.face {
                Face::Front => page_layer(
                    &sheet.front,
                    PageSide::Right,
                    visible_width,
                    page_width,
                    page_height,
                    true,
                ),
                Face::Back => page_layer(
                    &sheet.back,
                    PageSide::Left,
                    visible_width,
                    page_width,
                    page_height,
                    true,
                ),
            };
            layers.push(layer);
        }

        Stack::with_children(layers)
            .width(Length::Fixed(page_width * 2.0))
            .height(Length::Fixed(page_height))
            .into()
    }

    fn thumbnails_view(&self, snapshot: &ReaderSnapshot) -> Element<'_, Message> {
        let width = self.config.thumbnail_width.min(PANEL_WIDTH - 32.0);
        let height = width * PAGE_ASPECT_RATIO;
        let items: Vec<Element<'_, Message>> = snapshot
            .thumbnails
            .iter()
            .map(|thumb| {
                let label = if thumb.is_bookmarked {
                    format!("{} (bookmarked)", thumb.label)
                } else {
                    thumb.label.clone()
                };
                let content = column![
                    image(Handle::from_path(thumb.content_url.clone()))
                        .content_fit(ContentFit::Contain)
                        .width(Length::Fixed(width))
                        .height(Length::Fixed(height)),
                    text(label).size(12),
                ]
                .spacing(4)
                .align_x(Horizontal::Center);
                let style: ButtonStyle = if thumb.is_current {
                    button::primary
                } else {
                    button::text
                };
                button(content)
                    .style(style)
                    .width(Length::Fill)
                    .on_press(Message::Nav(NavAction::JumpTo(thumb.index)))
                    .into()
            })
            .collect();

        column![
            text("Pages").size(18),
            scrollable(Column::with_children(items).spacing(6)).height(Length::Fill),
        ]
        .spacing(8)
        .into()
    }

    fn bookmarks_view(&self, snapshot: &ReaderSnapshot) -> Element<'_, Message> {
        let mut list = Column::new().spacing(6);
        if snapshot.bookmarks.is_empty() {
            list = list.push(text("No bookmarks yet. Press B to bookmark the current page.").size(14));
        }
        for &page in &snapshot.bookmarks {
            list = list.push(
                row![
                    button(text(format!("Page {}", page + 1)))
                        .style(button::text)
                        .width(Length::Fill)
                        .on_press(Message::Nav(NavAction::JumpTo(page))),
                    button("Remove")
                        .style(button::secondary)
                        .on_press(Message::Nav(NavAction::RemoveBookmark(page))),
                ]
                .spacing(6)
                .align_y(Vertical::Center),
            );
        }
        column![
            text("Bookmarks").size(18),
            scrollable(list).height(Length::Fill)
        ]
        .spacing(8)
        .into()
    }

    fn library_view(&self) -> Element<'_, Message> {
        let open_row = row![
            text_input(
                "Image folder, images, .pdf, .toml or URL",
                &self.library.open_path_input,
            )
            .on_input(Message::OpenPathInputChanged)
            .on_submit(Message::OpenPathRequested),
            button("Open").on_press(Message::OpenPathRequested),
        ]
        .spacing(6)
        .align_y(Vertical::Center);

        let mut content = column![text("Library").size(18), open_row].spacing(8);
        if self.loader.loading {
            content = content.push(text(self.loading_label()).size(14));
        }
        if let Some(error) = &self.loader.error {
            content = content.push(text(error.clone()).size(14).style(text::danger));
        }

        let mut recent = Column::new().spacing(4);
        if self.library.recent.is_empty() {
            recent = recent.push(text("No recent books.").size(14));
        }
        for book in &self.library.recent {
            recent = recent.push(
                button(column![
                    text(book.title.clone()),
                    text(format!("{} pages", book.total_pages)).size(12),
                ])
                .style(button::secondary)
                .width(Length::Fill)
                .on_press(Message::OpenRecentBook(book.source.clone())),
            );
        }
        content
            .push(text("Recent").size(16))
            .push(scrollable(recent).height(Length::Fill))
            .into()
    }

    fn loading_splash(&self) -> Element<'_, Message> {
        column![text("Opening book").size(22), text(self.loading_label()).size(14)]
            .spacing(8)
            .align_x(Horizontal::Center)
            .into()
    }

    fn loading_label(&self) -> String {
        match &self.loader.pending_source {
            Some(source) => format!("Loading {source}..."),
            None => "Loading...".to_string(),
        }
    }
}

fn nav_button<'a>(label: &'a str, action: NavAction, enabled: bool) -> Element<'a, Message> {
    button(text(label))
        .on_press_maybe(enabled.then_some(Message::Nav(action)))
        .into()
}

fn panel_button<'a>(
    label: &'a str,
    action: NavAction,
    active: bool,
    enabled: bool,
) -> Element<'a, Message> {
    let style: ButtonStyle = if active {
        button::primary
    } else {
        button::secondary
    };
    button(text(label))
        .style(style)
        .on_press_maybe(enabled.then_some(Message::Nav(action)))
        .into()
}

/// One page face anchored at the spine: left faces grow leftwards, right
/// faces rightwards. `width` shrinks while the page is edge-on.
fn page_layer<'a>(
    page: &Page,
    side: PageSide,
    width: f32,
    page_width: f32,
    page_height: f32,
    turning: bool,
) -> Element<'a, Message> {
    let face: Element<'a, Message> = if page.is_placeholder() {
        container(Space::new(Length::Fixed(width), Length::Fixed(page_height)))
            .style(theme::blank_page)
            .into()
    } else {
        let style: ContainerStyle = if turning {
            theme::turning_page
        } else {
            theme::page
        };
        container(
            image(Handle::from_path(page.content_url.clone()))
                .content_fit(ContentFit::Fill)
                .width(Length::Fixed(width))
                .height(Length::Fixed(page_height)),
        )
        .style(style)
        .into()
    };
    let offset = match side {
        PageSide::Left => page_width - width,
        PageSide::Right => page_width,
    };
    row![Space::with_width(Length::Fixed(offset)), face].into()
}
