use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::collections::{HashMap, HashSet};
use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::board::{Board, COLUMN_ORDER, ColumnId, MoveOutcome};
use crate::documents::{DocumentWorker, GenerationUpdate, TemplateBackend};
use crate::feed::FeedScheduler;
use crate::models::{Card, GeneratedDocuments};
use crate::offers;
use crate::theme;

const TICK: Duration = Duration::from_millis(200);
const NOTICE_TTL: Duration = Duration::from_secs(4);
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

#[derive(Clone, Copy, PartialEq)]
enum PreviewTab {
    Resume,
    CoverLetter,
}

struct Preview {
    offer_id: Uuid,
    tab: PreviewTab,
    scroll: u16,
}

struct AppState {
    board: Board,
    feed: FeedScheduler,
    worker: DocumentWorker,
    generated: HashMap<Uuid, GeneratedDocuments>,
    pending: HashSet<Uuid>,
    active_column: usize,
    selected: [usize; 4],
    grabbed: Option<Uuid>,
    notice: Option<(String, Instant)>,
    preview: Option<Preview>,
    info: Option<(Uuid, u16)>,
    spinner_frame: usize,
}

impl AppState {
    fn new(board: Board, feed: FeedScheduler, worker: DocumentWorker) -> Self {
        Self {
            board,
            feed,
            worker,
            generated: HashMap::new(),
            pending: HashSet::new(),
            active_column: 0,
            selected: [0; 4],
            grabbed: None,
            notice: None,
            preview: None,
            info: None,
            spinner_frame: 0,
        }
    }

    fn active_column_id(&self) -> ColumnId {
        COLUMN_ORDER[self.active_column]
    }

    fn displayed_offers(&self) -> usize {
        self.board.column(ColumnId::Offers).cards.len()
    }

    fn notify(&mut self, message: impl Into<String>, now: Instant) {
        self.notice = Some((message.into(), now));
    }

    fn clamp_selection(&mut self) {
        for (i, id) in COLUMN_ORDER.iter().enumerate() {
            let len = self.board.column(*id).cards.len();
            if len == 0 {
                self.selected[i] = 0;
            } else if self.selected[i] >= len {
                self.selected[i] = len - 1;
            }
        }
    }

    fn select_next(&mut self) {
        let len = self.board.column(self.active_column_id()).cards.len();
        if len > 0 && self.selected[self.active_column] < len - 1 {
            self.selected[self.active_column] += 1;
        }
    }

    fn select_prev(&mut self) {
        if self.selected[self.active_column] > 0 {
            self.selected[self.active_column] -= 1;
        }
    }

    /// Pick up the selected Offers card, or drop the grabbed one onto the
    /// active column's tail. Dropping back onto Offers is the same-column
    /// no-op; cancelling the grab is the drop-outside no-op.
    fn grab_or_drop(&mut self, now: Instant) {
        match self.grabbed.take() {
            None => {
                let column = self.active_column_id();
                if column.is_locked() {
                    self.notify(
                        format!("Cards in {} cannot be moved.", column.title()),
                        now,
                    );
                    return;
                }
                if let Some(card) = self.board.column(column).cards.get(self.selected[0]) {
                    self.grabbed = Some(card.id());
                }
            }
            Some(card_id) => {
                let source = self.board.column(ColumnId::Offers);
                let Some(source_index) = source.cards.iter().position(|c| c.id() == card_id)
                else {
                    return;
                };
                let dest = self.active_column_id();
                let dest_index = self.board.column(dest).cards.len();
                let outcome =
                    self.board
                        .move_card(ColumnId::Offers, source_index, dest, dest_index);
                if let MoveOutcome::Applied { offer, .. } = outcome {
                    self.notify(
                        "Application submitted. Cards created for Recruiter and Hiring Manager.",
                        now,
                    );
                    self.pending.insert(offer.id);
                    self.worker.request(offer);
                }
                // Dropping down to two displayed offers re-arms the short delay.
                if self.displayed_offers() == 2 {
                    self.feed.schedule(now, 2);
                }
                self.clamp_selection();
            }
        }
    }

    fn open_preview(&mut self, now: Instant) {
        let column = self.active_column_id();
        let index = self.selected[self.active_column];
        let Some(card) = self.board.column(column).cards.get(index) else {
            return;
        };
        // Contact cards preview the documents of the offer they came from.
        let offer_id = match card {
            Card::Offer(offer) => offer.id,
            Card::Contact(contact) => contact.original_offer_id,
        };
        if self.pending.contains(&offer_id) {
            self.notify("Documents are still being generated.", now);
            return;
        }
        if !self.generated.contains_key(&offer_id) {
            self.notify("No documents generated for this offer yet.", now);
            return;
        }
        self.preview = Some(Preview {
            offer_id,
            tab: PreviewTab::Resume,
            scroll: 0,
        });
    }

    fn open_info(&mut self) {
        let column = self.active_column_id();
        let index = self.selected[self.active_column];
        let Some(card) = self.board.column(column).cards.get(index) else {
            return;
        };
        let offer_id = match card {
            Card::Offer(offer) => offer.id,
            Card::Contact(contact) => contact.original_offer_id,
        };
        if self.board.find_offer(offer_id).is_some() {
            self.info = Some((offer_id, 0));
        }
    }

    fn on_tick(&mut self, now: Instant) {
        let displayed = self.displayed_offers();
        if let Some(offer) = self.feed.poll(now, displayed) {
            self.board.add_offer(offer);
            self.notify("New offer has been added.", now);
        }
        self.feed.tick(now);

        for update in self.worker.poll() {
            match update {
                GenerationUpdate::Ready {
                    offer_id,
                    documents,
                } => {
                    self.pending.remove(&offer_id);
                    // First completed generation wins; documents are never
                    // overwritten once set.
                    self.generated.entry(offer_id).or_insert(documents);
                }
                GenerationUpdate::Failed { offer_id, .. } => {
                    self.pending.remove(&offer_id);
                    self.notify(
                        "Failed to generate documents. Please try again later.",
                        now,
                    );
                }
            }
        }

        if let Some((_, since)) = &self.notice {
            if now.saturating_duration_since(*since) > NOTICE_TTL {
                self.notice = None;
            }
        }
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}

pub fn run_board(seed: Option<u64>, generation_delay: Duration) -> Result<()> {
    let all_offers = offers::load_offers()?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let feed_rng = StdRng::seed_from_u64(rng.gen_range(0..u64::MAX));
    let (visible, pool) = offers::shuffle_split(all_offers, &mut rng);

    let mut board = Board::new();
    let displayed = visible.len();
    for offer in visible {
        board.add_offer(offer);
    }

    let mut feed = FeedScheduler::new(pool, feed_rng);
    feed.schedule(Instant::now(), displayed);

    let worker = DocumentWorker::new(Arc::new(TemplateBackend), generation_delay);
    let mut state = AppState::new(board, feed, worker);

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state);

    state.feed.cancel();
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
) -> Result<()> {
    loop {
        let now = Instant::now();
        state.on_tick(now);
        state.clamp_selection();

        terminal.draw(|frame| draw(frame, state, now))?;

        if !event::poll(TICK)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if state.info.is_some() {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('i') => state.info = None,
                KeyCode::Down | KeyCode::Char('j') => {
                    if let Some((_, scroll)) = &mut state.info {
                        *scroll = scroll.saturating_add(3);
                    }
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    if let Some((_, scroll)) = &mut state.info {
                        *scroll = scroll.saturating_sub(3);
                    }
                }
                _ => {}
            }
            continue;
        }

        if state.preview.is_some() {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('v') => state.preview = None,
                KeyCode::Tab => {
                    if let Some(preview) = &mut state.preview {
                        preview.tab = match preview.tab {
                            PreviewTab::Resume => PreviewTab::CoverLetter,
                            PreviewTab::CoverLetter => PreviewTab::Resume,
                        };
                        preview.scroll = 0;
                    }
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if let Some(preview) = &mut state.preview {
                        preview.scroll = preview.scroll.saturating_add(3);
                    }
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    if let Some(preview) = &mut state.preview {
                        preview.scroll = preview.scroll.saturating_sub(3);
                    }
                }
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') => break,
            KeyCode::Esc => {
                if state.grabbed.take().is_none() {
                    break;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if state.active_column > 0 {
                    state.active_column -= 1;
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if state.active_column < COLUMN_ORDER.len() - 1 {
                    state.active_column += 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => state.select_next(),
            KeyCode::Up | KeyCode::Char('k') => state.select_prev(),
            KeyCode::Char(' ') | KeyCode::Enter => state.grab_or_drop(Instant::now()),
            KeyCode::Char('v') => state.open_preview(Instant::now()),
            KeyCode::Char('i') => state.open_info(),
            _ => {}
        }
    }
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn draw(frame: &mut Frame, state: &AppState, now: Instant) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(outer[0]);

    for (i, column_id) in COLUMN_ORDER.iter().enumerate() {
        let column = state.board.column(*column_id);
        let is_active = i == state.active_column;

        let items: Vec<ListItem> = column
            .cards
            .iter()
            .map(|card| card_item(state, card, column.id, now))
            .collect();

        let title = if state.grabbed.is_some() && is_active {
            if column.id.is_locked() {
                format!(" {} (drop) ", column.id.title())
            } else {
                format!(" {} (cancel) ", column.id.title())
            }
        } else if column.id == ColumnId::Offers && !state.feed.is_idle() {
            format!(
                " {} ({}) +{} incoming ",
                column.id.title(),
                column.cards.len(),
                state.feed.pool_len()
            )
        } else {
            format!(" {} ({}) ", column.id.title(), column.cards.len())
        };

        let border_style = if is_active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(border_style),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        if is_active && !column.cards.is_empty() {
            let mut list_state = ListState::default().with_selected(Some(state.selected[i]));
            frame.render_stateful_widget(list, columns[i], &mut list_state);
        } else {
            frame.render_widget(list, columns[i]);
        }
    }

    let footer = match (&state.notice, state.grabbed) {
        (Some((message, _)), _) => Line::from(Span::styled(
            format!(" {}", message),
            Style::default().fg(Color::Yellow),
        )),
        (None, Some(_)) => Line::from(Span::styled(
            " h/l:target column  space:drop  esc:cancel",
            Style::default().fg(Color::DarkGray),
        )),
        (None, None) => Line::from(Span::styled(
            " h/l:column  j/k:card  space:grab/drop  v:documents  i:info  q:quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(footer), outer[1]);

    if let Some(preview) = &state.preview {
        draw_preview(frame, state, preview);
    }
    if let Some((offer_id, scroll)) = state.info {
        draw_info(frame, state, offer_id, scroll);
    }
}

fn draw_info(frame: &mut Frame, state: &AppState, offer_id: Uuid, scroll: u16) {
    let Some(offer) = state.board.find_offer(offer_id) else {
        return;
    };

    let area = centered_rect(frame.area(), 60, 70);
    let width = area.width.saturating_sub(4) as usize;

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        offer.position.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("at {}", offer.company)));
    lines.push(Line::from(format!("Posted: {}", offer.posted_date)));
    lines.push(Line::from(""));
    for line in textwrap::fill(&offer.description, width).lines() {
        lines.push(Line::from(line.to_string()));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Recruiters",
        Style::default().fg(Color::Cyan),
    )));
    for contact in &offer.recruiters {
        lines.push(Line::from(format!("- {} ({})", contact.name, contact.email)));
    }
    lines.push(Line::from(Span::styled(
        "Hiring Managers",
        Style::default().fg(Color::Cyan),
    )));
    for contact in &offer.hiring_managers {
        lines.push(Line::from(format!("- {} ({})", contact.name, contact.email)));
    }

    if let Some(info) = &offer.company_info {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Company",
            Style::default().fg(Color::Cyan),
        )));
        lines.push(Line::from(format!("Sector: {}", info.sector)));
        lines.push(Line::from(format!("Founded: {}", info.founded)));
        lines.push(Line::from(format!("CEO: {} ({})", info.ceo.name, info.ceo.email)));
        if !info.open_positions.is_empty() {
            lines.push(Line::from(format!(
                "Open positions: {}",
                info.open_positions.join(", ")
            )));
        }
    }

    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", offer.company))
                .title_bottom(" j/k:scroll  esc:close "),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn card_item(state: &AppState, card: &Card, column_id: ColumnId, now: Instant) -> ListItem<'static> {
    let color = theme::company_color(card.company());

    match card {
        Card::Offer(offer) => {
            let mut label = format!("{} | {}", truncate(&offer.position, 24), offer.company);
            let mut style = Style::default().fg(color);

            if column_id == ColumnId::Offers {
                if let Some(secs) = state.feed.seconds_since_added(offer.id, now) {
                    label.push_str(&format!("  {}s ago", secs));
                }
                if state.feed.is_highlighted(offer.id, now) {
                    label.push_str("  NEW");
                    style = style.add_modifier(Modifier::BOLD);
                }
                if state.grabbed == Some(offer.id) {
                    label = format!("[{}]", label);
                    style = style.add_modifier(Modifier::REVERSED);
                }
            }
            if state.pending.contains(&offer.id) {
                let spinner = SPINNER[state.spinner_frame % SPINNER.len()];
                label.push_str(&format!("  {} generating", spinner));
            } else if state.generated.contains_key(&offer.id) {
                label.push_str("  [docs]");
            }

            ListItem::new(label).style(style)
        }
        Card::Contact(contact) => {
            let label = format!(
                "{} | {} ({})",
                truncate(&contact.name, 20),
                contact.kind.label(),
                contact.company
            );
            ListItem::new(label).style(Style::default().fg(color))
        }
    }
}

fn draw_preview(frame: &mut Frame, state: &AppState, preview: &Preview) {
    let Some(documents) = state.generated.get(&preview.offer_id) else {
        return;
    };
    let company = state
        .board
        .find_offer(preview.offer_id)
        .map(|o| o.company.as_str())
        .unwrap_or("?");

    let (title, body) = match preview.tab {
        PreviewTab::Resume => (format!(" Resume - {} ", company), &documents.resume),
        PreviewTab::CoverLetter => {
            (format!(" Cover Letter - {} ", company), &documents.cover_letter)
        }
    };

    let area = centered_rect(frame.area(), 70, 80);
    let wrapped = textwrap::fill(body, area.width.saturating_sub(4) as usize);

    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(wrapped)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_bottom(" tab:switch  j/k:scroll  esc:close "),
        )
        .wrap(Wrap { trim: false })
        .scroll((preview.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
