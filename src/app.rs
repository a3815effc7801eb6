use anyhow::Result;
use log::info;
use ratatui::layout::Position;
use unicode_width::UnicodeWidthStr;

use crate::command::Dispatcher;
use crate::context::FilepaneContext;
use crate::editor::{EditOutcome, KeySource, LineEditor, TerminalKeys};
use crate::screen::{ScreenLayout, ScreenSurface, TerminalSurface, clip_to_width, shorten_left};
use crate::session::Session;

const HINT: &str = "cd PATH | ls PATH [-p N] | cp SRC DST | Ctrl-C quits";

pub fn run(context: &FilepaneContext) -> Result<()> {
    let layout = ScreenLayout::from_config(&context.config);
    let dispatcher = Dispatcher::from_config(&context.config);
    let mut session = Session::new(context.start_dir.clone());

    let mut surface = TerminalSurface::open(&layout)?;
    let run_result = run_loop(
        &mut surface,
        &mut TerminalKeys,
        &layout,
        &dispatcher,
        &mut session,
    );
    surface.restore()?;
    run_result
}

/// Repaint, read a line, dispatch it; until the input is interrupted.
pub fn run_loop<S, K>(
    surface: &mut S,
    keys: &mut K,
    layout: &ScreenLayout,
    dispatcher: &Dispatcher,
    session: &mut Session,
) -> Result<()>
where
    S: ScreenSurface,
    K: KeySource,
{
    loop {
        let mut editor = paint(surface, layout, session);
        match editor.read_line(surface, keys)? {
            EditOutcome::Interrupted => {
                info!("filepane exiting");
                return Ok(());
            }
            EditOutcome::Line(line) => {
                dispatcher.execute(session, &line);
            }
        }
    }
}

/// Draws every pane from the session and returns an editor anchored just
/// after the prompt.
pub fn paint<S: ScreenSurface>(
    surface: &mut S,
    layout: &ScreenLayout,
    session: &Session,
) -> LineEditor {
    surface.clear();
    paint_tree(surface, layout, session);
    paint_status(surface, layout, session);
    paint_prompt(surface, layout, session)
}

fn inner_width(width: u16) -> usize {
    width.saturating_sub(2) as usize
}

fn paint_tree<S: ScreenSurface>(surface: &mut S, layout: &ScreenLayout, session: &Session) {
    let pane = layout.tree;
    surface.draw_box(pane);
    let Some(page) = &session.tree else {
        return;
    };

    let width = inner_width(pane.width);
    for (row, line) in page.lines.iter().enumerate() {
        let text = line.to_string();
        surface.write_at(pane.x + 1, pane.y + 1 + row as u16, clip_to_width(&text, width));
    }

    let footer = page.footer();
    let half = (footer.chars().count() / 2) as u16;
    let x = (pane.x + pane.width / 2).saturating_sub(half);
    surface.write_at(x, pane.bottom() - 1, &footer);
}

fn paint_status<S: ScreenSurface>(surface: &mut S, layout: &ScreenLayout, session: &Session) {
    let pane = layout.status;
    surface.draw_box(pane);
    let width = inner_width(pane.width);
    if let Some(status) = &session.status {
        surface.write_at(pane.x + 1, pane.y + 1, clip_to_width(status, width));
    }
    surface.write_at(pane.x + 1, pane.bottom() - 2, clip_to_width(HINT, width));
}

fn paint_prompt<S: ScreenSurface>(
    surface: &mut S,
    layout: &ScreenLayout,
    session: &Session,
) -> LineEditor {
    let pane = layout.prompt;
    surface.draw_box(pane);

    let width = inner_width(pane.width);
    let dir = session.current_dir.display().to_string();
    let prompt = format!("{}>", shorten_left(&dir, (width - width / 3).saturating_sub(1)));
    let y = pane.y + pane.height / 2;
    surface.write_at(pane.x + 1, y, &prompt);

    let anchor = Position::new(pane.x + 1 + prompt.width() as u16, y);
    let field_end = pane.right().saturating_sub(1);
    LineEditor::new(anchor, field_end.saturating_sub(anchor.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::BufferSurface;

    #[test]
    fn prompt_anchor_follows_the_current_dir() {
        let layout = ScreenLayout::default();
        let mut surface = BufferSurface::for_layout(&layout);
        let session = Session::new("/tmp");

        let editor = paint(&mut surface, &layout, &session);

        assert_eq!(editor.cursor(), Position::new(6, 27));
        assert_eq!(surface.text_at(0, 27, 7), "║/tmp> ");
        assert_eq!(surface.text_at(119, 27, 1), "║");
    }

    #[test]
    fn long_current_dir_is_shortened_from_the_left() {
        let layout = ScreenLayout::new(40, 4);
        let mut surface = BufferSurface::for_layout(&layout);
        let session = Session::new(format!("/{}", "d".repeat(100)));

        let editor = paint(&mut surface, &layout, &session);

        // 38 inner cells, two thirds for the prompt.
        let y = layout.prompt.y + 1;
        assert_eq!(surface.text_at(1, y, 1), "…");
        assert_eq!(editor.cursor(), Position::new(27, y));
    }

    #[test]
    fn status_message_and_hint_are_drawn() {
        let layout = ScreenLayout::default();
        let mut surface = BufferSurface::for_layout(&layout);
        let mut session = Session::new("/tmp");
        session.status = Some("cp: /x does not exist".to_string());

        paint(&mut surface, &layout, &session);

        assert!(surface.row_text(19).starts_with("║cp: /x does not exist "));
        assert!(surface.row_text(24).contains("Ctrl-C quits"));
    }
}
