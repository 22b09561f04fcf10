// File: src/tui/view.rs
use crate::market::{CoinLimit, Trend, format_change, format_price};
use crate::model::{Currency, FontSizeSetting};
use crate::tui::state::{AppState, Screen};
use crate::typography::{FontWeight, TextStyle, TextType, ThemedText, scaled_style};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
};
use strum::IntoEnumIterator;

/// Terminal approximation of a resolved text style: size is dropped, heavy
/// weights become bold and colours map to the nearest terminal colour.
pub fn terminal_style(text: &TextStyle) -> Style {
    let mut style = Style::default();
    if matches!(
        text.font_weight,
        Some(FontWeight::SemiBold | FontWeight::Bold)
    ) {
        style = style.add_modifier(Modifier::BOLD);
    }
    if let Some(color) = text.color.as_deref().and_then(|c| c.parse::<Color>().ok()) {
        style = style.fg(color);
    }
    style
}

fn styled(state: &AppState, text_type: TextType) -> Style {
    terminal_style(&scaled_style(text_type, state.font.scale_factor))
}

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    let selected = match state.screen {
        Screen::Markets => 0,
        Screen::Settings => 1,
    };
    let tabs = Tabs::new(vec![" Markets ", " Settings "])
        .block(Block::default().borders(Borders::ALL).title(" Coindeck "))
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[0]);

    match state.screen {
        Screen::Markets => draw_markets(f, state, chunks[1]),
        Screen::Settings => draw_settings(f, state, chunks[1]),
    }

    let help = match state.screen {
        Screen::Markets => "Tab:Settings  1/2/3:Show 10/20/30  j/k:Scroll  q:Quit",
        Screen::Settings => "Tab:Markets  s/m/l:Font size  j/k:Move  Enter:Currency  q:Quit",
    };
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", state.message),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled(help, Style::default().fg(Color::DarkGray)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[2]);
}

fn limit_selector(state: &AppState) -> Line<'static> {
    let mut spans = vec![Span::raw("Show: ")];
    for (i, limit) in CoinLimit::iter().enumerate() {
        let label = format!("[{}] {}", i + 1, limit);
        let style = if limit == state.coin_limit {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

fn draw_markets(f: &mut Frame, state: &mut AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let title = format!(
        "Top {} Crypto Markets ({})",
        state.coin_limit,
        state.currency.label()
    );
    let header = Paragraph::new(vec![
        Line::from(Span::styled(title, styled(state, TextType::Title))),
        limit_selector(state),
    ]);
    f.render_widget(header, chunks[0]);

    let block = Block::default().borders(Borders::ALL);

    if state.loading {
        let text = format!("Loading top {} coins...", state.coin_limit);
        let p = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(p, chunks[1]);
        return;
    }

    if let Some(error) = &state.error {
        let p = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(p, chunks[1]);
        return;
    }

    let body = styled(state, TextType::Default);
    let rows: Vec<Row> = state
        .coins
        .iter()
        .map(|coin| {
            let rank = coin
                .market_cap_rank
                .map(|r| r.to_string())
                .unwrap_or_default();
            let change = match coin.price_change_percentage_24h {
                Some(p) => {
                    let display = format_change(p);
                    let color = trend_color(display.trend);
                    Cell::from(display.text).style(Style::default().fg(color))
                }
                None => Cell::from("-"),
            };
            let price = coin
                .current_price
                .map(|p| format_price(p, state.currency))
                .unwrap_or_else(|| "-".to_string());
            Row::new(vec![
                Cell::from(rank),
                Cell::from(coin.name.clone()),
                change,
                Cell::from(price),
            ])
            .style(body)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Min(16),
            Constraint::Length(10),
            Constraint::Length(20),
        ],
    )
    .header(
        Row::new(vec!["#", "Coin", "24h %", "Price"])
            .style(styled(state, TextType::DefaultSemiBold)),
    )
    .block(block)
    .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

    f.render_stateful_widget(table, chunks[1], &mut state.table_state);
}

fn trend_color(trend: Trend) -> Color {
    trend.dark_color().parse().unwrap_or(Color::Reset)
}

fn draw_settings(f: &mut Frame, state: &mut AppState, area: Rect) {
    if state.prefs_loading {
        let p = Paragraph::new("Loading Settings...")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(p, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(9),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(Span::styled("App Settings", styled(state, TextType::Title))),
        chunks[0],
    );

    let mut options = vec![Span::raw(" ")];
    for setting in FontSizeSetting::iter() {
        let style = if setting == state.font.setting {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        options.push(Span::styled(format!(" {} ", setting), style));
        options.push(Span::raw("  "));
    }
    let unsaved = unsaved_marker(state);
    let font_block = Paragraph::new(vec![
        Line::from(options),
        Line::from(Span::styled(
            format!(" Scale x{}{}", state.font.scale_factor, unsaved),
            styled(state, TextType::Small),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                " Font Size Preference ",
                styled(state, TextType::Subtitle),
            )),
    );
    f.render_widget(font_block, chunks[1]);

    let items: Vec<ListItem> = Currency::all()
        .map(|c| {
            let marker = if c == state.currency { "●" } else { " " };
            let symbol = c.info().symbol.unwrap_or("");
            ListItem::new(format!(
                "{} {:<5} {:<4} {}",
                marker,
                c.label(),
                symbol,
                c.info().name
            ))
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Currency ", styled(state, TextType::Subtitle))),
        )
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
    f.render_stateful_widget(list, chunks[2], &mut state.currency_state);

    f.render_widget(preview(state), chunks[3]);
}

fn unsaved_marker(state: &AppState) -> &'static str {
    if state.font_changed && !state.font.persisted {
        " (not saved)"
    } else {
        ""
    }
}

fn preview(state: &AppState) -> Paragraph<'static> {
    let factor = state.font.scale_factor;
    let lines: Vec<Line> = TextType::iter()
        .map(|t| {
            let resolved = ThemedText::new(t).effective_style(factor);
            let size = resolved
                .font_size
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string());
            let line_height = resolved
                .line_height
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string());
            Line::from(vec![
                Span::styled(format!(" {:<16}", t.name()), terminal_style(&resolved)),
                Span::styled(
                    format!("size {:>3}  line {:>3}", size, line_height),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();
    Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Preview "))
}
