//! Maze Chomp entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, KeyboardEvent, TouchEvent};

    use maze_chomp::consts::SIM_DT;
    use maze_chomp::frame::{FixedStep, FpsCounter};
    use maze_chomp::input::{
        InputManager, SUPPRESSED_DEFAULT_EVENTS, is_game_key, parse_direction,
    };
    use maze_chomp::renderer::{CanvasRenderer, HudText, build_scene, overlay_for};
    use maze_chomp::sim::{GameEvent, GamePhase, GameState};
    use maze_chomp::tictactoe::{
        Board, CELL_CLASSES, STATUS_CLASSES, WINNING_CELL_COLOR, WINNING_TEXT_COLOR,
    };
    use maze_chomp::{GameConfig, GameError, HighScore, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        input: InputManager,
        settings: Settings,
        high_score: HighScore,
        step: FixedStep,
        last_time: f64,
        fps: FpsCounter,
    }

    impl Game {
        fn new(
            state: GameState,
            renderer: CanvasRenderer,
            settings: Settings,
            high_score: HighScore,
        ) -> Self {
            Self {
                state,
                renderer,
                input: InputManager::new(settings.swipe_min_distance),
                settings,
                high_score,
                step: FixedStep::new(),
                last_time: 0.0,
                fps: FpsCounter::default(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            self.step.advance(&mut self.state, &mut self.input, dt);
            self.handle_events();
            self.fps.record(time);
        }

        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::NewHighScore(score) => {
                        self.high_score.record(score);
                    }
                    GameEvent::PhaseChanged(change) => {
                        let overlay = overlay_for(change.to, &self.state.data);
                        self.renderer.set_overlay(overlay.as_ref());
                        if change.to != GamePhase::Playing {
                            self.save_high_score();
                        }
                    }
                    GameEvent::LevelCleared(level) => {
                        log::info!("Cleared level {}", level);
                    }
                    GameEvent::PelletCollected { .. } => {}
                }
            }
        }

        /// Write the best score if it improved since the last save
        fn save_high_score(&mut self) {
            match self.high_score.flush() {
                Ok(true) => log::debug!("Saved high score {}", self.high_score.best),
                Ok(false) => {}
                Err(err) => log::warn!("Could not save high score: {}", err),
            }
        }

        /// Render the current frame
        fn render(&self, time: f64) {
            self.renderer.clear();
            let scene = build_scene(&self.state, &self.settings, time);
            if let Err(err) = self.renderer.draw_scene(&scene) {
                log::warn!("Render error: {}", err);
            }
            if self.settings.show_fps {
                self.renderer.draw_fps(self.fps.fps());
            }
            self.renderer.update_hud(&HudText::from(&self.state.data));
        }

        fn toggle_fps(&mut self) {
            self.settings.show_fps = !self.settings.show_fps;
            log::debug!("FPS counter {}", if self.settings.show_fps { "on" } else { "off" });
        }
    }

    fn document() -> Result<Document, JsValue> {
        web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))
    }

    fn to_js(err: GameError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
        }

        log::info!("Maze Chomp starting...");

        let document = document()?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        // The tic-tac-toe widget can live on the same page as the game
        setup_tictactoe(&document);

        let Some(canvas) = document.get_element_by_id("gameCanvas") else {
            log::info!("No game canvas on this page");
            return Ok(());
        };
        let canvas: HtmlCanvasElement = canvas.dyn_into()?;

        let settings = Settings::from_page(canvas.get_attribute("data-settings").as_deref());
        let high_score = HighScore::load();
        let config = GameConfig::default();
        let logical = Vec2::new(config.canvas_width, config.canvas_height);

        let mut state = GameState::try_new(config, high_score.best).map_err(to_js)?;
        state.auto_start = settings.auto_start;
        if let Some(container) = canvas.parent_element() {
            track_phase_class(&mut state, container);
        }

        let renderer = CanvasRenderer::new(canvas, logical).map_err(to_js)?;
        renderer.set_overlay(overlay_for(state.phase(), &state.data).as_ref());

        log::info!(
            "Game initialized: {} pellets, high score {}",
            state.data.total_pellets,
            high_score.best
        );

        let game = Rc::new(RefCell::new(Game::new(state, renderer, settings, high_score)));

        setup_keyboard(&document, game.clone())?;
        setup_touch(&document, game.clone())?;
        setup_controls(&document, game.clone())?;
        setup_resize(game.clone())?;
        setup_auto_pause(&document, game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Maze Chomp running!");
        Ok(())
    }

    /// Keep a `phase-<name>` class on the game container for CSS
    fn track_phase_class(state: &mut GameState, container: Element) {
        let _ = container
            .class_list()
            .add_1(&format!("phase-{}", state.phase().name()));
        for phase in GamePhase::ALL {
            let container = container.clone();
            state.phases.on_enter(phase, move |change| {
                let classes = container.class_list();
                classes
                    .remove_1(&format!("phase-{}", change.from.name()))
                    .and_then(|_| classes.add_1(&format!("phase-{}", change.to.name())))
                    .map_err(|e| GameError::Render {
                        reason: format!("phase class: {e:?}"),
                    })?;
                Ok(())
            });
        }
    }

    fn add_listener<E, F>(target: &web_sys::EventTarget, event: &str, handler: F) -> Result<(), JsValue>
    where
        E: wasm_bindgen::convert::FromWasmAbi + 'static,
        F: FnMut(E) + 'static,
    {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Cancel the browser default for `event`. Non-passive, or mobile browsers
    /// ignore `preventDefault` on touchmove.
    fn suppress_default(target: &web_sys::EventTarget, event: &str) -> Result<(), JsValue> {
        let options = web_sys::AddEventListenerOptions::new();
        options.set_passive(false);
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(|e: web_sys::Event| {
            e.prevent_default();
        });
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        closure.forget();
        Ok(())
    }

    fn setup_keyboard(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        {
            let game = game.clone();
            add_listener(document, "keydown", move |event: KeyboardEvent| {
                let code = event.code();
                let mut g = game.borrow_mut();
                if code == "KeyF" && !event.repeat() {
                    g.toggle_fps();
                    return;
                }
                if g.input.key_down(&code) {
                    event.prevent_default();
                }
            })?;
        }

        add_listener(document, "keyup", move |event: KeyboardEvent| {
            let code = event.code();
            game.borrow_mut().input.key_up(&code);
            if is_game_key(&code) {
                event.prevent_default();
            }
        })
    }

    fn touch_point(game: &Game, touch: &web_sys::Touch) -> Vec2 {
        game.renderer
            .screen_to_game(Vec2::new(touch.client_x() as f32, touch.client_y() as f32))
    }

    fn setup_touch(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        // No page scroll, pull-to-refresh or long-press menu while swiping
        for event in SUPPRESSED_DEFAULT_EVENTS {
            suppress_default(document, event)?;
        }

        {
            let game = game.clone();
            add_listener(document, "touchstart", move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                let touches = event.touches();
                if let Some(touch) = touches.get(0) {
                    let pos = touch_point(&g, &touch);
                    g.input.touch_start(pos, touches.length());
                }
            })?;
        }

        add_listener(document, "touchend", move |event: TouchEvent| {
            let mut g = game.borrow_mut();
            let Some(touch) = event.changed_touches().get(0) else {
                return;
            };
            let pos = touch_point(&g, &touch);
            if g.input.touch_end(pos).is_none() && g.state.phase() == GamePhase::Ready {
                // A tap on the Ready screen starts the round
                g.input.press_start();
            }
        })
    }

    fn setup_controls(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let buttons = document.query_selector_all(".control-btn[data-direction]")?;
        for i in 0..buttons.length() {
            let Some(button) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(direction) = button
                .get_attribute("data-direction")
                .as_deref()
                .and_then(parse_direction)
            else {
                continue;
            };

            for (event, pressed) in [
                ("mousedown", true),
                ("mouseup", false),
                ("touchstart", true),
                ("touchend", false),
            ] {
                let game = game.clone();
                add_listener(&button, event, move |e: web_sys::Event| {
                    e.prevent_default();
                    game.borrow_mut().input.set_direction_input(direction, pressed);
                })?;
            }
        }

        if let Some(btn) = document.get_element_by_id("pauseBtn") {
            let game = game.clone();
            add_listener(&btn, "click", move |e: web_sys::Event| {
                e.prevent_default();
                game.borrow_mut().input.press_pause();
            })?;
        }

        if let Some(btn) = document.get_element_by_id("startButton") {
            add_listener(&btn, "click", move |e: web_sys::Event| {
                e.prevent_default();
                game.borrow_mut().input.press_start();
            })?;
        }
        Ok(())
    }

    fn setup_resize(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        add_listener(&window, "resize", move |_: web_sys::Event| {
            game.borrow_mut().renderer.resize();
        })
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        fn auto_pause(g: &mut Game, reason: &str) {
            // Keys released while hidden never deliver keyup
            g.input.clear();
            if g.state.phase() == GamePhase::Playing {
                g.input.press_pause();
                log::info!("Auto-paused ({})", reason);
            }
            // The tab may never come back
            g.save_high_score();
        }

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            add_listener(document, "visibilitychange", move |_: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    auto_pause(&mut game.borrow_mut(), "tab hidden");
                }
            })?;
        }

        // Window blur (click outside)
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        {
            let game = game.clone();
            add_listener(&window, "blur", move |_: web_sys::FocusEvent| {
                auto_pause(&mut game.borrow_mut(), "window blur");
            })?;
        }

        // Page unload skips visibilitychange on some browsers
        add_listener(&window, "pagehide", move |_: web_sys::Event| {
            game.borrow_mut().save_high_score();
        })
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render(time);
        }

        request_animation_frame(game);
    }

    /// Bind `#game-board` cells to a tic-tac-toe board, if the page has one
    fn setup_tictactoe(document: &Document) {
        if document.get_element_by_id("game-board").is_none() {
            return;
        }
        let Ok(cells) = document.query_selector_all(".cell") else {
            return;
        };
        let cells: Vec<HtmlElement> = (0..cells.length())
            .filter_map(|i| cells.get(i))
            .filter_map(|n| n.dyn_into::<HtmlElement>().ok())
            .collect();
        let board = Rc::new(RefCell::new(Board::new()));
        let cells = Rc::new(cells);

        let refresh = {
            let document = document.clone();
            let board = board.clone();
            let cells = cells.clone();
            move || {
                let board = board.borrow();
                for cell in cells.iter() {
                    let index = cell
                        .get_attribute("data-index")
                        .and_then(|i| i.parse::<usize>().ok());
                    let mark = index.and_then(|i| board.cell(i));
                    cell.set_text_content(mark.map(|m| m.as_str()));

                    let classes = cell.class_list();
                    for class in CELL_CLASSES {
                        let _ = classes.remove_1(class);
                    }
                    if let Some(mark) = mark {
                        let _ = classes.add_2("taken", mark.css_class());
                    }

                    let winning = index.is_some_and(|i| board.is_winning_cell(i));
                    let (background, text) = if winning {
                        (WINNING_CELL_COLOR, WINNING_TEXT_COLOR)
                    } else {
                        ("", "")
                    };
                    let style = cell.style();
                    let _ = style.set_property("background-color", background);
                    let _ = style.set_property("color", text);
                }
                if let Some(el) = document
                    .get_element_by_id("current-player")
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                {
                    let player = board.current_player();
                    el.set_text_content(Some(player.as_str()));
                    let _ = el.style().set_property("color", player.color());
                }
                if let Some(el) = document.get_element_by_id("game-status") {
                    el.set_text_content(Some(&board.status_text()));
                    let classes = el.class_list();
                    for class in STATUS_CLASSES {
                        let _ = classes.remove_1(class);
                    }
                    if let Some(class) = board.status_class() {
                        let _ = classes.add_1(class);
                    }
                }
            }
        };
        let refresh = Rc::new(refresh);
        refresh();

        for cell in cells.iter() {
            let board = board.clone();
            let refresh = refresh.clone();
            let target = cell.clone();
            let result = add_listener(cell, "click", move |_: web_sys::Event| {
                let Some(index) = target
                    .get_attribute("data-index")
                    .and_then(|i| i.parse::<usize>().ok())
                else {
                    return;
                };
                let moved = board.borrow_mut().make_move(index);
                match moved {
                    Ok(outcome) => {
                        log::debug!("Tic-tac-toe move {} -> {:?}", index, outcome);
                        refresh();
                    }
                    Err(err) => log::debug!("Tic-tac-toe move {} ignored: {}", index, err),
                }
            });
            if let Err(err) = result {
                log::warn!("Could not bind tic-tac-toe cell: {:?}", err);
            }
        }

        if let Some(btn) = document.get_element_by_id("reset-button") {
            let result = add_listener(&btn, "click", move |_: web_sys::Event| {
                board.borrow_mut().reset();
                refresh();
            });
            if let Err(err) = result {
                log::warn!("Could not bind reset button: {:?}", err);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Maze Chomp (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    if let Err(err) = headless_demo() {
        log::error!("Demo failed: {}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive the classic maze without a browser: pathfinding, line of sight and a
/// short scripted run.
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo() -> maze_chomp::Result<()> {
    use maze_chomp::consts::SIM_DT;
    use maze_chomp::sim::{Direction, GameEvent, GameState, TickInput, has_line_of_sight, tick};
    use maze_chomp::{GameConfig, pixel_to_grid};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    let config = GameConfig::default();
    let mut state = GameState::try_new(config, 0)?;
    let spawn = state.player.position();
    let spawn_cell = pixel_to_grid(spawn, state.config.grid_size);
    log::info!(
        "Classic maze {}x{}, {} pellets, spawn at ({:.0}, {:.0})",
        state.maze.width(),
        state.maze.height(),
        state.data.total_pellets,
        spawn.x,
        spawn.y
    );

    let mut rng = Pcg32::seed_from_u64(0x6d61_7a65);
    for _ in 0..3 {
        let Some(target) = state.maze.random_spawn_position(&mut rng) else {
            break;
        };
        let path = state.maze.find_path(spawn_cell, target);
        let target_px = maze_chomp::grid_to_pixel(target, state.config.grid_size);
        let visible = has_line_of_sight(
            spawn,
            target_px,
            state.maze.grid(),
            state.config.grid_size,
            maze_chomp::sim::collision::DEFAULT_SIGHT_STEP,
        );
        log::info!(
            "Path to ({}, {}): {} cells, line of sight: {}",
            target.x,
            target.y,
            path.len(),
            visible
        );
    }

    // Menu, Ready, Playing, then wander for a few seconds
    let start = TickInput {
        start: true,
        ..Default::default()
    };
    tick(&mut state, &TickInput::default(), SIM_DT);
    tick(&mut state, &start, SIM_DT);
    tick(&mut state, &start, SIM_DT);

    let route = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
    for direction in route {
        log::debug!("Heading {:?}", direction);
        let input = TickInput {
            direction: Some(direction),
            ..Default::default()
        };
        // Hold each direction for a second
        for _ in 0..60 {
            tick(&mut state, &input, SIM_DT);
        }
    }

    let pellets = state
        .drain_events()
        .iter()
        .filter(|e| matches!(e, GameEvent::PelletCollected { .. }))
        .count();
    log::info!(
        "After {} ticks: phase {}, score {}, {} pellets eaten, {} left",
        state.time_ticks,
        state.phase(),
        state.data.score,
        pellets,
        state.data.pellets_remaining
    );
    Ok(())
}
