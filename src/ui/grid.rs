/// Responsive thumbnail grid
/// Cells wrap onto as many rows as the window width requires
use iced::widget::{column, container, image, text, Space};
use iced::{Alignment, Background, Color, Element, Length, Pixels, Theme};
use iced_aw::Wrap;

use crate::state::thumbnails::{Thumbnail, ThumbnailState, PLACEHOLDER_SHADES};
use crate::Message;

/// Gap between cells, horizontally and vertically
const CELL_PADDING: f32 = 10.0;

/// Longest failure caption that still fits inside a cell
const CAPTION_CHARS: usize = 60;

/// Pastel background for a cell that has no image yet
pub fn placeholder_color(shade: usize) -> Color {
    match shade % PLACEHOLDER_SHADES {
        0 => Color::from_rgb8(0xE3, 0xF2, 0xFD), // Blue
        1 => Color::from_rgb8(0xFC, 0xE4, 0xEC), // Pink
        2 => Color::from_rgb8(0xFF, 0xFD, 0xE7), // Yellow
        _ => Color::from_rgb8(0xF1, 0xF8, 0xE9), // Green
    }
}

/// Build the grid for the given cells, each `cell_size` pixels square
pub fn view(cells: &[Thumbnail], cell_size: f32) -> Element<'_, Message> {
    let elements: Vec<Element<'_, Message>> = cells
        .iter()
        .map(|cell| cell_view(cell, cell_size))
        .collect();

    Wrap::with_elements(elements)
        .spacing(Pixels(CELL_PADDING))
        .line_spacing(Pixels(CELL_PADDING))
        .into()
}

fn cell_view(cell: &Thumbnail, cell_size: f32) -> Element<'_, Message> {
    match &cell.state {
        ThumbnailState::Ready(handle) => image(handle.clone())
            .width(Length::Fixed(cell_size))
            .height(Length::Fixed(cell_size))
            .into(),
        ThumbnailState::Loading => {
            placeholder(cell.shade, Space::new(Length::Fill, Length::Fill), cell_size)
        }
        ThumbnailState::Failed(message) => {
            let content = column![text("⚠").size(32), text(failure_caption(message)).size(11)]
                .spacing(4)
                .padding(8)
                .align_x(Alignment::Center);
            placeholder(cell.shade, content, cell_size)
        }
    }
}

/// Failure message shortened to fit under the warning glyph
pub fn failure_caption(message: &str) -> String {
    if message.chars().count() <= CAPTION_CHARS {
        return message.to_string();
    }
    let mut caption: String = message.chars().take(CAPTION_CHARS - 1).collect();
    caption.push('…');
    caption
}

fn placeholder<'a>(
    shade: usize,
    content: impl Into<Element<'a, Message>>,
    cell_size: f32,
) -> Element<'a, Message> {
    let color = placeholder_color(shade);

    container(content)
        .center_x(Length::Fixed(cell_size))
        .center_y(Length::Fixed(cell_size))
        .style(move |_theme: &Theme| container::Style {
            background: Some(Background::Color(color)),
            ..container::Style::default()
        })
        .into()
}
