//! Weather panel - terminal front end

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{DebugRunOutput, DebugSession, DebugSessionError, ReplayItem};
use weather_panel::action::Action;
use weather_panel::api::WeatherClient;
use weather_panel::components::{Component, WeatherPanel, WeatherPanelProps};
use weather_panel::config::Args;
use weather_panel::effect::Effect;
use weather_panel::logging;
use weather_panel::reducer::reducer;
use weather_panel::state::AppState;

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum PanelComponentId {
    Panel,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum PanelContext {
    Main,
}

impl EventRoutingState<PanelComponentId, PanelContext> for AppState {
    fn focused(&self) -> Option<PanelComponentId> {
        Some(PanelComponentId::Panel)
    }

    fn modal(&self) -> Option<PanelComponentId> {
        None
    }

    fn binding_context(&self, _id: PanelComponentId) -> PanelContext {
        PanelContext::Main
    }

    fn default_context(&self) -> PanelContext {
        PanelContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let (config, debug_args) = Args::parse().into_parts();

    logging::init(&config.log_file)?;
    tracing::info!(
        location = %config.location,
        api_base = %config.api_base,
        stale_responses = ?config.stale_responses,
        "weather panel starting"
    );

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let initial = config.initial_state();
    let state = debug
        .load_state_or_else_async(move || async move { Ok::<AppState, io::Error>(initial) })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &debug,
        store,
        config.client(),
        replay_actions,
    )
    .await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    tracing::info!("weather panel stopped");
    Ok(())
}

#[derive(Default)]
struct PanelUi {
    panel: WeatherPanel,
}

impl PanelUi {
    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<PanelComponentId>,
    ) {
        event_ctx.set_component_area(PanelComponentId::Panel, area);

        let props = WeatherPanelProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.panel.render(frame, area, props);
    }

    fn handle_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = WeatherPanelProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.panel.handle_event(event, props).into_iter().collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    client: WeatherClient,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PanelUi::default()));
    let mut bus: EventBus<AppState, Action, PanelComponentId, PanelContext> = EventBus::new();
    let keybindings: Keybindings<PanelContext> = Keybindings::new();

    let ui_panel = Rc::clone(&ui);
    bus.register(PanelComponentId::Panel, move |event, state| {
        ui_panel.borrow_mut().handle_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            // Fetch for the start-up location, as on mount
            Some(Action::WeatherFetch),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, &client),
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, client: &WeatherClient) {
    match effect {
        Effect::FetchWeather {
            request,
            location,
            lat,
            lon,
        } => {
            let client = client.clone();
            // Keyed per request, so a newer selection does not cancel an older fetch
            ctx.tasks()
                .spawn(TaskKey::new(format!("weather_{request}")), async move {
                    match client.fetch(lat, lon).await {
                        Ok(reading) => {
                            tracing::debug!(request, %location, "weather loaded");
                            Action::WeatherDidLoad {
                                request,
                                location,
                                reading,
                            }
                        }
                        Err(error) => Action::WeatherDidError {
                            request,
                            location,
                            error,
                        },
                    }
                });
        }
        Effect::ReportFetchError { location, error } => {
            logging::report_fetch_error(&location, &error);
        }
    }
}
