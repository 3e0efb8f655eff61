use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use bgg_api::{BoardGame, GameDetails, LinkRef};

static TABS: &[&str; 2] = &["Collection", "Game Detail"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    terminal
        .draw(|f| {
            if app.state.prompt.active {
                draw_user_prompt(f, f.area(), app);
                draw_loading_spinner(f, f.area(), app, loading);
                return;
            }

            layout.update(f.area(), app.settings.full_screen);

            if !app.settings.full_screen {
                draw_tabs(f, layout.tab_bar, app);
                draw_status(f, layout.status, app);
            }

            match app.state.active_tab {
                MenuItem::Collection => draw_collection(f, layout.main, app),
                MenuItem::GameDetail => draw_game_detail(f, layout.main, app),
                MenuItem::Help => draw_placeholder(
                    f,
                    layout.main,
                    "Help: q=quit  1=Collection  2=Game Detail  j/k=move  Enter=details  s=sort  r=reload  u=user  f=fullscreen  \"=logs",
                ),
            }

            if app.state.show_logs {
                draw_logs(f, layout.main);
            }

            draw_loading_spinner(f, f.area(), app, loading);
        })
        .unwrap();
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Collection => 0,
        MenuItem::GameDetail => 1,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_user_prompt(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" BoardGameGeek ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [_top_pad, heading, input_line, error_line, hint, _bottom_pad] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(
        Paragraph::new("Whose game shelf should we load?")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        heading,
    );
    f.render_widget(
        Paragraph::new(format!("> {}_", app.state.prompt.input))
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center),
        input_line,
    );
    if let Some(err) = app.state.last_error.as_deref() {
        f.render_widget(
            Paragraph::new(err)
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            error_line,
        );
    }
    f.render_widget(
        Paragraph::new("Enter to load, Esc to cancel, Ctrl-C to quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        hint,
    );
}

fn draw_collection(f: &mut Frame, area: Rect, app: &mut App) {
    let title = if app.state.collection.username.is_empty() {
        " Collection ".to_owned()
    } else {
        format!(" Collection: {} ", app.state.collection.username)
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.state.collection.games.is_empty() {
        let msg = if let Some(err) = app.state.last_error.as_deref() {
            format!("Collection load failed:\n{err}")
        } else if app.state.collection.loaded_at.is_some() {
            "This shelf is empty.".to_owned()
        } else if app.state.collection.username.is_empty() {
            "Press u to pick a BGG user".to_owned()
        } else {
            "Loading collection...".to_owned()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let [header, key_legend, list_header, list_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    let state = &mut app.state.collection;
    let header_text = format!(
        "{} games | sorted by {}",
        state.games.len(),
        state.sort.label()
    );
    f.render_widget(Paragraph::new(header_text), header);
    f.render_widget(
        Paragraph::new("Keys: j/k=move  Enter=details  s=sort  r=reload  u=user  ?=help  q=quit")
            .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );
    f.render_widget(
        Paragraph::new(format!(
            "    {:<34} {:>6} {:>9} {:>11} {:>7}",
            "NAME", "YEAR", "PLAYERS", "PLAYTIME", "PLAYS"
        ))
        .style(Style::default().fg(Color::DarkGray)),
        list_header,
    );

    // Keep the selection inside the visible window.
    let visible = list_area.height.max(1) as usize;
    if state.selected < state.scroll_offset as usize {
        state.scroll_offset = state.selected as u16;
    } else if state.selected >= state.scroll_offset as usize + visible {
        state.scroll_offset = (state.selected + 1 - visible) as u16;
    }
    let offset = state.scroll_offset as usize;

    let mut lines = Vec::with_capacity(visible);
    for (idx, game) in state.games.iter().enumerate().skip(offset).take(visible) {
        let marker = if idx == state.selected { '>' } else { ' ' };
        let text = format!(
            "{marker}   {:<34} {:>6} {:>9} {:>11} {:>7}",
            truncate_name(&game.name, 34),
            truncate_name(&game.year_published, 6).trim_end(),
            player_range(game),
            playtime_range(game),
            game.num_plays,
        );
        let style = if idx == state.selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(text, style)));
    }

    f.render_widget(Paragraph::new(lines), list_area);
}

fn draw_game_detail(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Game Detail ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(details) = app.state.detail.details.as_ref() else {
        let msg = if let Some(err) = app.state.last_error.as_deref() {
            format!("Load failed:\n{err}")
        } else {
            "Select a game in the Collection tab and press Enter".to_owned()
        };
        f.render_widget(Paragraph::new(msg), inner);
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(
            details.name.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  ({})", details.year_published),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        format!("{} #{}", details.kind, details.id),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));
    lines.push(label_line("Players", details.recommended_players.clone()));
    lines.push(label_line("Playtime", playtime_text(details)));
    lines.push(label_line("Age", format!("{}+", details.min_age)));
    lines.push(label_line(
        "Rating",
        details
            .rating
            .map(|r| format!("{r:.1} / 10"))
            .unwrap_or_else(|| "unrated".to_owned()),
    ));
    lines.push(Line::from(""));
    lines.push(link_line("Categories", &details.categories));
    lines.push(link_line("Mechanics", &details.mechanics));
    lines.push(link_line("Designers", &details.designers));
    lines.push(link_line("Publishers", &details.publishers));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "About: (j/k scroll)",
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(details.description.clone()));

    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .scroll((app.state.detail.scroll_offset, 0)),
        inner,
    );
}

fn label_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label:<11} "),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(value),
    ])
}

fn link_line(label: &str, links: &[LinkRef]) -> Line<'static> {
    let value = if links.is_empty() {
        "-".to_owned()
    } else {
        links
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    label_line(label, value)
}

fn playtime_text(details: &GameDetails) -> String {
    if details.min_playtime == 0 && details.max_playtime == 0 {
        return "-".to_owned();
    }
    if details.min_playtime == details.max_playtime {
        return format!("{} min", details.min_playtime);
    }
    format!(
        "{}-{} min (typically {})",
        details.min_playtime, details.max_playtime, details.playing_time
    )
}

fn player_range(game: &BoardGame) -> String {
    if game.min_players == 0 && game.max_players == 0 {
        return "-".to_owned();
    }
    format!("{}-{}", game.min_players, game.max_players)
}

fn playtime_range(game: &BoardGame) -> String {
    if game.min_playtime == 0 && game.max_playtime == 0 {
        return "-".to_owned();
    }
    if game.min_playtime == game.max_playtime {
        return format!("{}m", game.min_playtime);
    }
    format!("{}-{}m", game.min_playtime, game.max_playtime)
}

fn truncate_name(name: &str, max: usize) -> String {
    let mut s: String = name.chars().take(max).collect();
    while s.chars().count() < max {
        s.push(' ');
    }
    s
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }

    let user = if app.state.collection.username.is_empty() {
        "-"
    } else {
        app.state.collection.username.as_str()
    };
    let mut spans = vec![
        Span::styled(" user ", Style::default().fg(Color::DarkGray)),
        Span::styled(user, Style::default().fg(Color::Gray)),
        Span::styled("  sort ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.state.collection.sort.label(),
            Style::default().fg(Color::Gray),
        ),
    ];
    if let Some(at) = app.state.collection.loaded_at.as_deref() {
        spans.push(Span::styled("  loaded ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(at, Style::default().fg(Color::Gray)));
    }
    if let Some(err) = app.state.last_error.as_deref() {
        spans.push(Span::styled(
            format!("  {err}"),
            Style::default().fg(Color::Red),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    if area.height < 12 {
        return;
    }
    let [_, log_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(10)]).areas(area);
    f.render_widget(Clear, log_area);
    f.render_widget(
        TuiLoggerWidget::default()
            .block(default_border(Color::DarkGray).title(" Logs "))
            .style(Style::default().fg(Color::Gray)),
        log_area,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen || app.state.prompt.active {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
