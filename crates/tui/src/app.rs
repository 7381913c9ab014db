use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gamepick_core::{
    catalog::{page_slice, total_pages, CatalogStore, PageState},
    criteria::{AgeRating, CriteriaSnapshot, FilterCriteria, PriceBucket, GENRE_TAGS},
    models::{Game, OsTag, SpecTier},
    progress::{recommendation_stages, ProgressEvent, ProgressHandle, ProgressSequence, Stage},
    resolve::{Resolution, RELATED_LIMIT},
    AppConfig,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::{process::Command, sync::mpsc};
use tracing::{debug, error, info};

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_PROMPT_LEN: usize = 280;

/// The four routes of the recommendation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Criteria,
    Loading,
    SelectGame,
    Result,
}

/// Focusable rows on the criteria screen, top to bottom. The advanced
/// rows only exist while the section is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CriteriaRow {
    Prompt,
    Genres,
    Price,
    Age,
    Advanced,
    Os,
    Spec,
}

struct CriteriaState {
    criteria: FilterCriteria,
    row: CriteriaRow,
    col: usize,
    editing_prompt: bool,
}

impl CriteriaState {
    fn new() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            row: CriteriaRow::Prompt,
            col: 0,
            editing_prompt: false,
        }
    }

    fn rows(&self) -> Vec<CriteriaRow> {
        let mut rows = vec![
            CriteriaRow::Prompt,
            CriteriaRow::Genres,
            CriteriaRow::Price,
            CriteriaRow::Age,
            CriteriaRow::Advanced,
        ];
        if self.criteria.advanced_visible {
            rows.push(CriteriaRow::Os);
            rows.push(CriteriaRow::Spec);
        }
        rows
    }

    fn pill_count(&self, row: CriteriaRow) -> usize {
        match row {
            CriteriaRow::Prompt | CriteriaRow::Advanced => 1,
            CriteriaRow::Genres => GENRE_TAGS.len(),
            // First pill is the "any" sentinel.
            CriteriaRow::Price => PriceBucket::ALL.len() + 1,
            CriteriaRow::Age => AgeRating::ALL.len() + 1,
            CriteriaRow::Os => OsTag::ALL.len(),
            CriteriaRow::Spec => SpecTier::ALL.len(),
        }
    }

    fn move_row(&mut self, delta: isize) {
        let rows = self.rows();
        let current = rows.iter().position(|r| *r == self.row).unwrap_or(0);
        let len = rows.len() as isize;
        let mut next = current as isize + delta;
        if next < 0 {
            next = 0;
        } else if next >= len {
            next = len - 1;
        }
        self.row = rows[next as usize];
        self.col = self.col.min(self.pill_count(self.row) - 1);
    }

    fn move_col(&mut self, delta: isize) {
        let count = self.pill_count(self.row) as isize;
        let mut next = self.col as isize + delta;
        if next < 0 {
            next = 0;
        } else if next >= count {
            next = count - 1;
        }
        self.col = next as usize;
    }

    /// Apply the highlighted pill to the criteria.
    fn activate(&mut self) {
        match self.row {
            CriteriaRow::Prompt => self.editing_prompt = true,
            CriteriaRow::Genres => self.criteria.toggle_genre(GENRE_TAGS[self.col]),
            CriteriaRow::Price => {
                let value = if self.col == 0 {
                    None
                } else {
                    Some(PriceBucket::ALL[self.col - 1])
                };
                self.criteria.set_price(value);
            }
            CriteriaRow::Age => {
                let value = if self.col == 0 {
                    None
                } else {
                    Some(AgeRating::ALL[self.col - 1])
                };
                self.criteria.set_age(value);
            }
            CriteriaRow::Advanced => self.toggle_advanced(),
            CriteriaRow::Os => {
                // Selecting the active pill clears it back to "any".
                let value = OsTag::ALL[self.col].clone();
                if self.criteria.os.as_ref() == Some(&value) {
                    self.criteria.set_os(None);
                } else {
                    self.criteria.set_os(Some(value));
                }
            }
            CriteriaRow::Spec => {
                let value = SpecTier::ALL[self.col];
                if self.criteria.spec == Some(value) {
                    self.criteria.set_spec(None);
                } else {
                    self.criteria.set_spec(Some(value));
                }
            }
        }
    }

    fn toggle_advanced(&mut self) {
        if self.criteria.advanced_visible {
            self.criteria.hide_advanced();
            if matches!(self.row, CriteriaRow::Os | CriteriaRow::Spec) {
                self.row = CriteriaRow::Advanced;
                self.col = 0;
            }
        } else {
            self.criteria.reveal_advanced();
        }
    }
}

struct LoadingState {
    stages: Vec<Stage>,
    steps_done: usize,
    finished: bool,
}

impl LoadingState {
    fn new(stages: Vec<Stage>) -> Self {
        Self {
            stages,
            steps_done: 0,
            finished: false,
        }
    }
}

struct SelectState {
    page: PageState,
    cursor: usize,
}

impl SelectState {
    fn new() -> Self {
        Self {
            page: PageState::new(),
            cursor: 0,
        }
    }
}

struct ResultState {
    resolution: Resolution,
    side_cursor: usize,
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// High-level application state for the recommendation flow.
pub struct GamepickApp {
    config: AppConfig,
    store: CatalogStore,
    catalog: Vec<Game>,
    screen: Screen,
    criteria: CriteriaState,
    loading: Option<LoadingState>,
    select: SelectState,
    result: Option<ResultState>,
    progress_rx: Option<mpsc::Receiver<ProgressEvent>>,
    progress_handle: Option<ProgressHandle>,
    last_snapshot: Option<CriteriaSnapshot>,
    status: String,
    should_quit: bool,
}

impl GamepickApp {
    pub fn new(config: AppConfig, store: CatalogStore) -> Self {
        Self {
            config,
            store,
            catalog: Vec::new(),
            screen: Screen::Criteria,
            criteria: CriteriaState::new(),
            loading: None,
            select: SelectState::new(),
            result: None,
            progress_rx: None,
            progress_handle: None,
            last_snapshot: None,
            status: "Ready".to_string(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.catalog = self.store.games().context("failed to load catalog")?;
        info!(total = self.catalog.len(), "Catalog loaded");
        self.status = format!("Loaded {} games", self.catalog.len());

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }

            if let Some(mut rx) = self.progress_rx.take() {
                tokio::select! {
                    maybe_event = event_rx.recv() => {
                        self.progress_rx = Some(rx);
                        if !self.process_app_event(maybe_event) {
                            break;
                        }
                    }
                    maybe_progress = rx.recv() => {
                        match maybe_progress {
                            Some(event) => {
                                self.progress_rx = Some(rx);
                                self.handle_progress_event(event);
                            }
                            None => debug!("Progress channel closed"),
                        }
                    }
                }
            } else {
                let maybe_event = event_rx.recv().await;
                if !self.process_app_event(maybe_event) {
                    break;
                }
            }

            if self.should_quit {
                break;
            }
        }

        self.cancel_progress();
        restore_terminal(&mut terminal)?;
        Ok(())
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Event::Key(key) = event {
                    if let Err(err) = self.handle_key(key) {
                        self.status = format!("Error: {err}");
                    }
                }
                true
            }
            Some(AppEvent::Tick) => true,
            None => false,
        }
    }

    fn handle_progress_event(&mut self, event: ProgressEvent) {
        let Some(loading) = self.loading.as_mut() else {
            // Stale event after leaving the screen; the cancel flag makes
            // this unreachable, but never mutate anything regardless.
            debug!(?event, "Progress event without a loading screen");
            return;
        };
        match event {
            ProgressEvent::StepDone(step) => {
                loading.steps_done = (step + 1).min(loading.stages.len());
                debug!(step, "Stage complete");
            }
            ProgressEvent::Finished => {
                loading.finished = true;
                self.status = "Recommendation ready".to_string();
            }
        }
    }

    // ---- navigation ----------------------------------------------------

    fn submit_criteria(&mut self) {
        let snapshot = self.criteria.criteria.snapshot();
        info!(
            prompt_len = snapshot.prompt.len(),
            genres = ?snapshot.genres,
            price = ?snapshot.price,
            age = ?snapshot.age,
            os = ?snapshot.os,
            spec = ?snapshot.spec,
            "Criteria submitted"
        );
        self.last_snapshot = Some(snapshot);
        self.status = if self.criteria.criteria.has_any_filter() {
            "Preparing recommendation".to_string()
        } else {
            "No filters set, recommending freely".to_string()
        };

        let sequence =
            ProgressSequence::new(recommendation_stages(), self.config.step_delay());
        let (tx, rx) = mpsc::channel(8);
        self.loading = Some(LoadingState::new(sequence.stages().to_vec()));
        self.progress_handle = Some(sequence.spawn(tx));
        self.progress_rx = Some(rx);
        self.screen = Screen::Loading;
    }

    fn cancel_progress(&mut self) {
        if let Some(handle) = self.progress_handle.take() {
            handle.cancel();
        }
        self.progress_rx = None;
        self.loading = None;
    }

    fn restart_flow(&mut self) {
        self.cancel_progress();
        self.criteria = CriteriaState::new();
        self.select = SelectState::new();
        self.result = None;
        self.screen = Screen::Criteria;
        self.status = "Starting over".to_string();
    }

    fn goto_select(&mut self) {
        self.cancel_progress();
        self.select = SelectState::new();
        self.screen = Screen::SelectGame;
        let pages = total_pages(self.catalog.len(), self.config.page_size);
        self.status = if self.catalog.is_empty() {
            "No games available".to_string()
        } else {
            format!("{} games across {} pages", self.catalog.len(), pages)
        };
    }

    fn goto_result(&mut self, requested_id: u32) {
        let resolution = Resolution::resolve(requested_id, &self.catalog, RELATED_LIMIT);
        if let Some(active) = resolution.active() {
            self.status = format!("Showing {}", active.name);
        } else {
            self.status = "No games available".to_string();
        }
        self.result = Some(ResultState {
            resolution,
            side_cursor: 0,
        });
        self.screen = Screen::Result;
    }

    // ---- input ---------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.screen {
            Screen::Criteria => self.handle_criteria_key(key),
            Screen::Loading => self.handle_loading_key(key),
            Screen::SelectGame => self.handle_select_key(key),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_criteria_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.criteria.editing_prompt {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    self.criteria.editing_prompt = false;
                    self.status = "Prompt saved".to_string();
                }
                KeyCode::Backspace => {
                    self.criteria.criteria.prompt.pop();
                }
                KeyCode::Char(c) => {
                    if self.criteria.criteria.prompt.chars().count() < MAX_PROMPT_LEN {
                        self.criteria.criteria.prompt.push(c);
                    }
                }
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.criteria.move_row(1),
            KeyCode::Char('k') | KeyCode::Up => self.criteria.move_row(-1),
            KeyCode::Char('h') | KeyCode::Left => self.criteria.move_col(-1),
            KeyCode::Char('l') | KeyCode::Right => self.criteria.move_col(1),
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.submit_criteria()
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.criteria.activate(),
            KeyCode::Char('a') if key.modifiers.is_empty() => self.criteria.toggle_advanced(),
            KeyCode::Char('s') if key.modifiers.is_empty() => self.submit_criteria(),
            _ => {}
        }
        Ok(())
    }

    fn handle_loading_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.should_quit = true,
            KeyCode::Enter => {
                let finished = self.loading.as_ref().map(|l| l.finished).unwrap_or(false);
                if finished {
                    self.goto_select();
                }
            }
            KeyCode::Esc | KeyCode::Char('r') => {
                self.cancel_progress();
                self.screen = Screen::Criteria;
                self.status = "Back to criteria".to_string();
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_select_key(&mut self, key: KeyEvent) -> Result<()> {
        let pages = total_pages(self.catalog.len(), self.config.page_size);
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.should_quit = true,
            KeyCode::Char('h') | KeyCode::Left => {
                self.select.page.go_prev();
                self.select.cursor = 0;
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.select.page.go_next(pages);
                self.select.cursor = 0;
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_select_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_select_cursor(-1),
            KeyCode::Enter => {
                let picked = page_slice(
                    &self.catalog,
                    self.config.page_size,
                    self.select.page.page(),
                )
                .get(self.select.cursor)
                .map(|game| game.id);
                if let Some(id) = picked {
                    self.goto_result(id);
                }
            }
            KeyCode::Char('r') => self.restart_flow(),
            _ => {}
        }
        Ok(())
    }

    fn move_select_cursor(&mut self, delta: isize) {
        let visible = page_slice(
            &self.catalog,
            self.config.page_size,
            self.select.page.page(),
        );
        if visible.is_empty() {
            self.select.cursor = 0;
            return;
        }
        let len = visible.len() as isize;
        let mut next = self.select.cursor as isize + delta;
        if next < 0 {
            next = 0;
        } else if next >= len {
            next = len - 1;
        }
        self.select.cursor = next as usize;
    }

    fn handle_result_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.should_quit = true,
            KeyCode::Esc => {
                self.result = None;
                self.screen = Screen::SelectGame;
                self.status = "Back to catalog".to_string();
            }
            KeyCode::Char('r') => self.restart_flow(),
            KeyCode::Char('j') | KeyCode::Down => self.move_result_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_result_cursor(-1),
            KeyCode::Enter => {
                let picked = self.result.as_ref().and_then(|state| {
                    state
                        .resolution
                        .related()
                        .get(state.side_cursor)
                        .map(|game| game.id)
                });
                if let Some(id) = picked {
                    self.goto_result(id);
                }
            }
            KeyCode::Char('o') => {
                let url = self
                    .result
                    .as_ref()
                    .and_then(|state| state.resolution.active())
                    .map(|game| {
                        game.steam_url
                            .clone()
                            .unwrap_or_else(|| self.config.effective_store_url().to_string())
                    });
                if let Some(url) = url {
                    self.open_external(&url);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn move_result_cursor(&mut self, delta: isize) {
        let Some(state) = self.result.as_mut() else {
            return;
        };
        let len = state.resolution.related().len() as isize;
        if len == 0 {
            return;
        }
        let mut next = state.side_cursor as isize + delta;
        if next < 0 {
            next = 0;
        } else if next >= len {
            next = len - 1;
        }
        state.side_cursor = next as usize;
    }

    /// Launch the platform opener for an external URL, detached from our
    /// own navigation. Failure is logged, never fatal.
    fn open_external(&mut self, url: &str) {
        info!(url, "Opening store page");
        #[cfg(target_os = "macos")]
        let spawned = Command::new("open").arg(url).spawn();
        #[cfg(target_os = "windows")]
        let spawned = Command::new("cmd").args(["/C", "start", "", url]).spawn();
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let spawned = Command::new("xdg-open").arg(url).spawn();

        match spawned {
            Ok(_) => self.status = format!("Opened {url}"),
            Err(err) => {
                error!(?err, url, "Failed to launch opener");
                self.status = format!("Could not open {url}: {err}");
            }
        }
    }

    // ---- drawing -------------------------------------------------------

    fn draw(&mut self, frame: &mut Frame) {
        match self.screen {
            Screen::Criteria => self.draw_criteria(frame),
            Screen::Loading => self.draw_loading(frame),
            Screen::SelectGame => self.draw_select(frame),
            Screen::Result => self.draw_result(frame),
        }
    }

    fn layout_with_status(&self, frame: &Frame) -> (Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(frame.size());
        (chunks[0], chunks[1])
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, hints: &str) {
        let line = Line::from(vec![
            Span::styled(self.status.clone(), Style::default().fg(Color::White)),
            Span::raw("  "),
            Span::styled(hints.to_string(), Style::default().fg(Color::DarkGray)),
        ]);
        let status = Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(status, area);
    }

    fn draw_criteria(&mut self, frame: &mut Frame) {
        let (body, status_area) = self.layout_with_status(frame);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(4),
                Constraint::Min(8),
            ])
            .split(body);

        let title = Paragraph::new(Line::from(vec![
            Span::raw("오늘 같이 놀 "),
            Span::styled(
                "캐릭터는?",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(title, chunks[0]);

        let prompt_focused = self.criteria.row == CriteriaRow::Prompt;
        let prompt_text = if self.criteria.criteria.prompt.is_empty() && !self.criteria.editing_prompt
        {
            Span::styled(
                "네가 만나고 싶은 친구는 누구야?",
                Style::default().fg(Color::DarkGray),
            )
        } else if self.criteria.editing_prompt {
            Span::raw(format!("{}█", self.criteria.criteria.prompt))
        } else {
            Span::raw(self.criteria.criteria.prompt.clone())
        };
        let prompt_style = if prompt_focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let prompt = Paragraph::new(Line::from(prompt_text))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(prompt_style)
                    .title("프롬프트"),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(prompt, chunks[1]);

        let mut lines: Vec<Line> = Vec::new();
        lines.push(self.section_line("🎮 장르", CriteriaRow::Genres));
        lines.push(self.pill_line(CriteriaRow::Genres));
        lines.push(Line::from(""));
        lines.push(self.section_line("💰 가격", CriteriaRow::Price));
        lines.push(self.pill_line(CriteriaRow::Price));
        lines.push(Line::from(""));
        lines.push(self.section_line("👶 연령", CriteriaRow::Age));
        lines.push(self.pill_line(CriteriaRow::Age));
        lines.push(Line::from(""));
        lines.push(self.advanced_toggle_line());
        if self.criteria.criteria.advanced_visible {
            lines.push(Line::from(""));
            lines.push(self.section_line("💻 OS", CriteriaRow::Os));
            lines.push(self.pill_line(CriteriaRow::Os));
            lines.push(Line::from(""));
            lines.push(self.section_line("⚙️ 사양", CriteriaRow::Spec));
            lines.push(self.pill_line(CriteriaRow::Spec));
        }

        let filters = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("조건"))
            .wrap(Wrap { trim: true });
        frame.render_widget(filters, chunks[2]);

        self.render_status(
            frame,
            status_area,
            "[j/k] rows  [h/l] pills  [space] toggle  [a] advanced  [s] 여행 떠나기  [q] quit",
        );
    }

    fn section_line(&self, label: &str, row: CriteriaRow) -> Line<'static> {
        let style = if self.criteria.row == row {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        Line::from(Span::styled(label.to_string(), style))
    }

    fn pill_line(&self, row: CriteriaRow) -> Line<'static> {
        let criteria = &self.criteria.criteria;
        let (labels, active): (Vec<String>, Vec<bool>) = match row {
            CriteriaRow::Genres => GENRE_TAGS
                .iter()
                .map(|tag| (tag.to_string(), criteria.is_selected(tag)))
                .unzip(),
            CriteriaRow::Price => {
                let mut labels = vec![("모든 가격".to_string(), criteria.price.is_none())];
                labels.extend(
                    PriceBucket::ALL
                        .iter()
                        .map(|b| (b.label().to_string(), criteria.price == Some(*b))),
                );
                labels.into_iter().unzip()
            }
            CriteriaRow::Age => {
                let mut labels = vec![("전체".to_string(), criteria.age.is_none())];
                labels.extend(
                    AgeRating::ALL
                        .iter()
                        .map(|a| (a.label(), criteria.age == Some(*a))),
                );
                labels.into_iter().unzip()
            }
            CriteriaRow::Os => OsTag::ALL
                .iter()
                .map(|os| {
                    (
                        os.label().to_string(),
                        criteria.os.as_ref() == Some(os),
                    )
                })
                .unzip(),
            CriteriaRow::Spec => SpecTier::ALL
                .iter()
                .map(|tier| (tier.label().to_string(), criteria.spec == Some(*tier)))
                .unzip(),
            CriteriaRow::Prompt | CriteriaRow::Advanced => (Vec::new(), Vec::new()),
        };

        let focused_row = self.criteria.row == row;
        let mut spans = vec![Span::raw("  ")];
        for (idx, label) in labels.iter().enumerate() {
            let mut style = if active[idx] {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            if focused_row && idx == self.criteria.col {
                style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
            }
            spans.push(Span::styled(format!(" {label} "), style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }

    fn advanced_toggle_line(&self) -> Line<'static> {
        let focused = self.criteria.row == CriteriaRow::Advanced;
        let label = if self.criteria.criteria.advanced_visible {
            "조건 접기 ▲"
        } else {
            "조건 더 설정하기 ▼"
        };
        let mut style = Style::default().fg(Color::Yellow);
        if focused {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        Line::from(Span::styled(label.to_string(), style))
    }

    fn draw_loading(&mut self, frame: &mut Frame) {
        let (body, status_area) = self.layout_with_status(frame);
        let Some(loading) = self.loading.as_ref() else {
            self.render_status(frame, status_area, "[esc] back");
            return;
        };

        let mut lines = vec![
            Line::from(Span::styled(
                "추천을 만들고 있어!",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        if let Some(snapshot) = self.last_snapshot.as_ref() {
            if !snapshot.prompt.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("\"{}\"", snapshot.prompt),
                    Style::default().fg(Color::DarkGray),
                )));
                lines.push(Line::from(""));
            }
        }
        for (idx, stage) in loading.stages.iter().enumerate() {
            let (marker, style) = if idx < loading.steps_done {
                ("✔", Style::default().fg(Color::Green))
            } else if idx == loading.steps_done && !loading.finished {
                ("▶", Style::default().fg(Color::Yellow))
            } else {
                ("·", Style::default().fg(Color::DarkGray))
            };
            lines.push(Line::from(Span::styled(
                format!("{marker} {} {}", stage.icon, stage.text),
                style,
            )));
        }
        if loading.finished {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "이제 보여줄게!  [enter]",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        let card = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        let area = centered_rect(60, (loading.stages.len() as u16 + 6).min(body.height), body);
        frame.render_widget(card, area);

        self.render_status(frame, status_area, "[enter] continue  [esc] 처음부터  [q] quit");
    }

    fn draw_select(&mut self, frame: &mut Frame) {
        let (body, status_area) = self.layout_with_status(frame);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(body);

        let title = Paragraph::new(Line::from(vec![
            Span::raw("우리 중 "),
            Span::styled(
                "누구",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("랑 놀래?"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(title, chunks[0]);

        let pages = total_pages(self.catalog.len(), self.config.page_size);
        if pages == 0 {
            let empty = Paragraph::new("아직 보여줄 게임이 없어요")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center);
            frame.render_widget(empty, chunks[1]);
            self.render_status(frame, status_area, "[r] restart  [q] quit");
            return;
        }

        self.select.page.clamp(pages);
        let visible = page_slice(
            &self.catalog,
            self.config.page_size,
            self.select.page.page(),
        );

        let items: Vec<ListItem> = visible
            .iter()
            .enumerate()
            .map(|(idx, game)| {
                let marker = if idx == self.select.cursor { "▶ " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::raw(marker.to_string()),
                    Span::styled(
                        game.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(game.genre_label(), Style::default().fg(Color::Cyan)),
                    Span::raw("  "),
                    Span::styled(game.price_label(), Style::default().fg(Color::Green)),
                ]))
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.select.cursor.min(visible.len().saturating_sub(1))));
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("추천 게임"))
            .highlight_style(Style::default().bg(Color::DarkGray));
        frame.render_stateful_widget(list, chunks[1], &mut list_state);

        let prev = if self.select.page.page() > 0 { "◀" } else { " " };
        let next = if self.select.page.page() + 1 < pages {
            "▶"
        } else {
            " "
        };
        let indicator = Paragraph::new(Line::from(format!(
            "{prev}  {}  {next}",
            self.select.page.indicator(pages)
        )))
        .alignment(Alignment::Center);
        frame.render_widget(indicator, chunks[2]);

        self.render_status(
            frame,
            status_area,
            "[j/k] cards  [h/l] pages  [enter] pick  [r] restart  [q] quit",
        );
    }

    fn draw_result(&mut self, frame: &mut Frame) {
        let (body, status_area) = self.layout_with_status(frame);
        let Some(state) = self.result.as_ref() else {
            self.render_status(frame, status_area, "[esc] back");
            return;
        };

        let Some(active) = state.resolution.active() else {
            let empty = Paragraph::new("아직 보여줄 게임이 없어요")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center);
            frame.render_widget(empty, body);
            self.render_status(frame, status_area, "[r] restart  [q] quit");
            return;
        };

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(body);

        let mut left_lines = vec![
            Line::from(Span::styled(
                "부담없이 가볍게 같이 놀기 좋은 친구야",
                Style::default().fg(Color::Yellow),
            )),
            Line::from(""),
            Line::from(Span::styled(
                active.name.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                active.image.clone(),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
        ];
        let mut meta = vec![
            Span::styled(
                format!(" {} ", active.genre_label()),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            Span::raw(" "),
            Span::styled(
                format!(" {} ", active.price_label()),
                Style::default().fg(Color::Black).bg(Color::Green),
            ),
        ];
        if let Some(os) = active.os.as_ref() {
            meta.push(Span::raw(" "));
            meta.push(Span::styled(
                format!(" {} ", os.label()),
                Style::default().fg(Color::Black).bg(Color::Gray),
            ));
        }
        left_lines.push(Line::from(meta));
        left_lines.push(Line::from(""));
        left_lines.push(Line::from(Span::styled(
            "이 친구랑 놀기 →  [o]",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )));

        let left = Paragraph::new(left_lines)
            .block(Block::default().borders(Borders::ALL).title("오늘의 추천"))
            .wrap(Wrap { trim: true });
        frame.render_widget(left, columns[0]);

        let related = state.resolution.related();
        let items: Vec<ListItem> = if related.is_empty() {
            vec![ListItem::new(Line::from("  더 보여줄 친구가 없어"))]
        } else {
            related
                .iter()
                .enumerate()
                .map(|(idx, game)| {
                    let marker = if idx == state.side_cursor { "▶ " } else { "  " };
                    ListItem::new(vec![
                        Line::from(vec![
                            Span::raw(marker.to_string()),
                            Span::styled(
                                game.name.clone(),
                                Style::default().add_modifier(Modifier::BOLD),
                            ),
                        ]),
                        Line::from(vec![
                            Span::raw("    "),
                            Span::styled(game.genre_label(), Style::default().fg(Color::Cyan)),
                            Span::raw("  "),
                            Span::styled(game.price_label(), Style::default().fg(Color::Green)),
                        ]),
                    ])
                })
                .collect()
        };
        let side = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title("이 친구는 어때?"),
        );
        frame.render_widget(side, columns[1]);

        self.render_status(
            frame,
            status_area,
            "[j/k] suggestions  [enter] switch  [o] open store  [esc] back  [r] restart  [q] quit",
        );
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}
