use crate::app::{App, AppScreen, SetupItem, MIN_GAME_HEIGHT, MIN_GAME_WIDTH, START_MENU_ITEMS};
use pong_core::{Config, MatchResult, RenderHelper, Side, Status, View};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, BorderType, List, ListItem, Paragraph, Widget},
};

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);

        let title = Paragraph::new("🏓 Pong Terminal Client 🏓")
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center)
            .block(rounded_block("Pong"));
        title.render(chunks[0], buf);

        match self.screen {
            AppScreen::Start => self.render_start_screen(chunks[1], buf),
            AppScreen::Setup => self.render_setup_screen(chunks[1], buf),
            AppScreen::Game => self.render_game_screen(chunks[1], buf),
            AppScreen::GameOver => self.render_game_over_screen(chunks[1], buf),
        }
    }
}

fn rounded_block(title: &str) -> Block<'_> {
    Block::bordered()
        .border_type(BorderType::Rounded)
        .title(title)
        .title_alignment(Alignment::Center)
}

fn menu_list<'a>(items: Vec<String>, selected: usize, title: &'a str) -> List<'a> {
    let items: Vec<ListItem> = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == selected {
                Style::default().fg(Color::Yellow).bg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(item).style(style)
        })
        .collect();

    List::new(items)
        .block(rounded_block(title))
        .highlight_symbol("► ")
}

fn hint(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
}

impl App {
    fn render_start_screen(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(4),    // Menu
                Constraint::Length(3), // Last result
                Constraint::Length(1), // Instructions
            ])
            .split(area);

        let items = START_MENU_ITEMS.iter().map(|item| item.to_string()).collect();
        menu_list(items, self.menu_state.start_selected, "Main Menu").render(chunks[0], buf);

        Paragraph::new(self.last_result_line())
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(rounded_block("Record"))
            .render(chunks[1], buf);

        hint("↑/↓: Move   ENTER: Select   Q: Quit").render(chunks[2], buf);
    }

    fn render_setup_screen(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(6),    // Options
                Constraint::Length(3), // Preset description
                Constraint::Length(1), // Instructions
            ])
            .split(area);

        let opponent = if self.setup.versus_computer {
            "Computer"
        } else {
            "Player"
        };
        let items = SetupItem::ALL
            .iter()
            .map(|item| match item {
                SetupItem::Preset => format!("Preset:   ◄ {} ►", self.setup.preset.name()),
                SetupItem::Opponent => format!("Opponent: ◄ {opponent} ►"),
                SetupItem::Start => "Start".to_string(),
                SetupItem::Back => "Back".to_string(),
            })
            .collect();
        menu_list(items, self.menu_state.setup_selected, "Match Setup").render(chunks[0], buf);

        Paragraph::new(self.setup.preset.description())
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center)
            .block(rounded_block("Rules"))
            .render(chunks[1], buf);

        hint("↑/↓: Move   ←/→: Change   ENTER: Select   ESC: Back").render(chunks[2], buf);
    }

    fn render_game_over_screen(&self, area: Rect, buf: &mut Buffer) {
        let headline = match self.last_result {
            Some(MatchResult::Won { winner, sets }) => format!(
                "{} wins!\n\nSets  {} : {}",
                winner.label(),
                sets[0],
                sets[1]
            ),
            _ => "Match over".to_string(),
        };
        let content = format!("{headline}\n\nENTER: Menu   R: Rematch   Q: Quit");

        Paragraph::new(content)
            .style(Style::default().fg(Color::Green))
            .alignment(Alignment::Center)
            .block(rounded_block("Game Over"))
            .render(area, buf);
    }

    fn render_game_screen(&self, area: Rect, buf: &mut Buffer) {
        if self.ui_paused {
            let message = format!(
                "Terminal too small!\n\nMinimum required: {}×{}\nCurrent size: {}×{}\n\nPlease resize your terminal to continue playing.\nESC: Leave match",
                MIN_GAME_WIDTH, MIN_GAME_HEIGHT, self.terminal_size.0, self.terminal_size.1
            );

            Paragraph::new(message)
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .block(rounded_block("⚠ Resize Required ⚠"))
                .render(area, buf);
            return;
        }

        let (Some(orchestrator), Some(game_area)) = (
            self.orchestrator.as_ref(),
            self.calculate_centered_game_area(area),
        ) else {
            return;
        };
        let game = orchestrator.game();
        let view = game.view();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Score
                Constraint::Min(8),    // Field
                Constraint::Length(3), // Controls
            ])
            .split(game_area);

        Paragraph::new(score_line(&view))
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(rounded_block(&view.status_text()))
            .render(chunks[0], buf);

        self.render_game_field_with_helper(chunks[1], buf, &view, &game.config);

        let players = if view.ai_opponent {
            "You: W/S or ↑/↓"
        } else {
            "P1: W/S  P2: ↑/↓"
        };
        let sound = if self.audio.enabled() { "on" } else { "off" };
        let controls_text = format!("{players}  M: Sound ({sound})  ESC: Leave match");
        Paragraph::new(controls_text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(rounded_block("Controls"))
            .render(chunks[2], buf);
    }

    /// Draw the table; paddle heights come from `RenderHelper` so they never
    /// change while a paddle moves.
    fn render_game_field_with_helper(
        &self,
        area: Rect,
        buf: &mut Buffer,
        view: &View,
        config: &Config,
    ) {
        // Terminal characters are ~2:1 (height:width)
        const CHAR_ASPECT_RATIO: f32 = 0.5;

        let available_width = area.width.saturating_sub(2);
        let available_height = area.height.saturating_sub(2);
        if available_width == 0 || available_height == 0 {
            return;
        }

        let field = view.field;
        let field_width = available_width as usize;
        let ideal_height =
            (available_width as f32 * field.play_height() / field.width * CHAR_ASPECT_RATIO) as usize;
        let field_height = ideal_height.clamp(1, available_height as usize);

        let render_helper = RenderHelper::new(field_width, field_height, config);
        let (ball_x, ball_y) = render_helper.get_ball_position(&view.ball);
        let left_paddle = render_helper.get_paddle_rect(&view.left_paddle, Side::Left);
        let right_paddle = render_helper.get_paddle_rect(&view.right_paddle, Side::Right);
        let show_ball = !matches!(view.status, Status::MatchWon(_) | Status::Aborted);

        let mut field_lines = Vec::with_capacity(field_height);
        for y in 0..field_height {
            let mut line = vec![' '; field_width];

            // Center line
            line[field_width / 2] = '┊';

            for paddle in [left_paddle, right_paddle] {
                if y >= paddle.top && y <= paddle.bottom {
                    for cell in &mut line[paddle.left..=paddle.right] {
                        *cell = '█';
                    }
                }
            }

            if show_ball && y == ball_y {
                line[ball_x] = '●';
            }

            field_lines.push(Line::from(line.into_iter().collect::<String>()));
        }

        let title = if view.serve_countdown > 0 {
            format!(
                "Serve in {}",
                view.serve_countdown / u32::from(config.tick_hz) + 1
            )
        } else {
            "Field".to_string()
        };

        Paragraph::new(field_lines)
            .style(Style::default().fg(Color::White))
            .block(rounded_block(&title))
            .render(area, buf);
    }
}

/// Points with sets in brackets, plus the rules being played
fn score_line(view: &View) -> String {
    format!(
        "{} {:>2} [{}]   to {} · {} set(s)   [{}] {:<2} {}",
        Side::Left.label(),
        view.points[0],
        view.sets[0],
        view.score_limit,
        view.sets_to_win,
        view.sets[1],
        view.points[1],
        if view.ai_opponent {
            "Computer"
        } else {
            Side::Right.label()
        },
    )
}
