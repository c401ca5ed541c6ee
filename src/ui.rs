use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use time_humanize::HumanTime;
use unicode_width::UnicodeWidthStr;

use kakitori::util::{accuracy_pct, format_clock};

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        match self.state {
            AppState::Practicing => render_practicing(self, area, buf),
            AppState::Results => {
                let session = &self.session;
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints([
                        Constraint::Min(1),
                        Constraint::Length(1),
                        Constraint::Length(1),
                        Constraint::Length(1),
                    ])
                    .split(area);

                let headline = Paragraph::new(Span::styled(
                    if session.session_complete {
                        "session complete"
                    } else {
                        "session ended"
                    },
                    bold_style,
                ))
                .alignment(Alignment::Center);
                headline.render(chunks[0], buf);

                let stats = Paragraph::new(Span::styled(
                    format!(
                        "{} / {} correct   {}% acc",
                        session.score,
                        session.attempts,
                        accuracy_pct(session.score, session.attempts)
                    ),
                    bold_style,
                ))
                .alignment(Alignment::Center);
                stats.render(chunks[1], buf);

                let legend = Paragraph::new(Span::styled(
                    "(r)etry / (p)rogress / (esc)ape",
                    italic_style,
                ));
                legend.render(chunks[3], buf);
            }
            AppState::Progress => {
                let mut lines = vec![Line::from(Span::styled(
                    format!(
                        "{:<12} {:>8} {:>8} {:>9}   last practiced",
                        "prompt", "attempts", "misses", "miss rate"
                    ),
                    bold_style,
                ))];

                for s in &self.summaries {
                    let since = (chrono::Local::now() - s.last_seen).num_seconds();
                    lines.push(Line::from(Span::raw(format!(
                        "{:<12} {:>8} {:>8} {:>8.1}%   {}",
                        s.prompt,
                        s.attempts,
                        s.misses,
                        s.miss_rate,
                        HumanTime::from(-since)
                    ))));
                }
                if self.summaries.is_empty() {
                    lines.push(Line::from(Span::styled(
                        "no practice history yet",
                        dim_bold_style,
                    )));
                }
                lines.push(Line::default());
                lines.push(Line::from(Span::styled("(esc)ape", italic_style)));

                let list = Paragraph::new(lines).wrap(Wrap { trim: false });
                let inner = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints([Constraint::Min(1)])
                    .split(area);
                list.render(inner[0], buf);
            }
        }
    }
}

fn render_practicing(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let session = &app.session;
    let Some(active) = session.current.as_ref() else {
        return;
    };

    let question = active.question();
    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let question_occupied_lines = if question.width() <= max_chars_per_line as usize {
        1
    } else {
        ((question.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),                       // score / timer
            Constraint::Min(1),                          // padding
            Constraint::Length(question_occupied_lines), // question
            Constraint::Length(1),                       // stroke guide
            Constraint::Length(1),                       // status
            Constraint::Min(1),                          // padding
            Constraint::Length(1),                       // input
            Constraint::Length(1),                       // legend
        ])
        .split(area);

    let mut header = format!("{} / {}", session.score, session.config.target_score);
    if let Some(remaining) = session.time_remaining_secs {
        header.push_str(&format!("   {}", format_clock(remaining)));
    }
    Paragraph::new(Span::styled(header, dim_bold_style))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    Paragraph::new(Span::styled(question.to_string(), bold_style))
        .alignment(if question_occupied_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

    if let Some(order) = active.stroke_order {
        let guide = match active.expected_stroke() {
            Some(shape) => format!(
                "stroke {}/{}: draw a {} stroke",
                active.stroke_index + 1,
                order.len(),
                shape.to_string().to_lowercase()
            ),
            None => "all strokes drawn".to_string(),
        };
        Paragraph::new(Span::styled(guide, dim_bold_style))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
    }

    if !app.status.is_empty() {
        Paragraph::new(Span::styled(app.status.clone(), italic_style))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }

    Paragraph::new(Line::from(vec![
        Span::styled("> ", dim_bold_style),
        Span::styled(app.input.clone(), bold_style),
        Span::styled("_", dim_bold_style),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[6], buf);

    Paragraph::new(Span::styled(
        "type the answer and press enter; drag the mouse to draw strokes / (esc)ape",
        italic_style,
    ))
    .render(chunks[7], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use kakitori::prompt::{PracticePrompt, Script, Tier};
    use kakitori::session::{PracticeSession, SessionConfig};
    use ratatui::{buffer::Buffer, layout::Rect};

    fn test_app(native: &str, romaji: &str) -> App {
        let prompt = PracticePrompt {
            native: native.to_string(),
            romaji: Some(romaji.to_string()),
            meaning: format!("{romaji} sound"),
            script: Script::Hiragana,
            tier: Tier::Tier1,
        };
        let pool = vec![prompt];
        App::from_parts(pool, SessionConfig::default()).unwrap()
    }

    fn rendered_text(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_practicing_view_shows_question_and_score() {
        let app = test_app("あ", "a");
        let rendered = rendered_text(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("あ"));
        assert!(rendered.contains("0 / 10"));
    }

    #[test]
    fn test_practicing_view_shows_stroke_guide() {
        let app = test_app("あ", "a");
        let rendered = rendered_text(&app, Rect::new(0, 0, 80, 24));

        // あ is authored with three strokes, starting horizontal
        assert!(rendered.contains("stroke 1/3"));
        assert!(rendered.contains("horizontal"));
    }

    #[test]
    fn test_results_view_shows_counters() {
        let mut app = test_app("あ", "a");
        app.session.submit_typed_answer("a");
        app.state = AppState::Results;

        let rendered = rendered_text(&app, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains("1 / 1 correct"));
        assert!(rendered.contains("(r)etry"));
    }

    #[test]
    fn test_progress_view_without_history() {
        let mut app = test_app("あ", "a");
        app.state = AppState::Progress;

        let rendered = rendered_text(&app, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains("no practice history yet"));
    }

    #[test]
    fn test_render_survives_small_area() {
        let app = test_app("あ", "a");
        let area = Rect::new(0, 0, 12, 4);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        assert!(*buffer.area() == area);
    }

    #[test]
    fn test_render_wraps_wide_question() {
        let prompt = PracticePrompt {
            native: "ありがとうございますありがとうございます".to_string(),
            romaji: Some("arigatou gozaimasu".to_string()),
            meaning: "thank you".to_string(),
            script: Script::Hiragana,
            tier: Tier::Tier1,
        };
        let app = App::from_parts(vec![prompt], SessionConfig::default()).unwrap();

        let area = Rect::new(0, 0, 24, 16);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        assert!(*buffer.area() == area);
    }
}
