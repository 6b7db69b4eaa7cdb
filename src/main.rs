use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{bail, eyre, Result};
use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use safta_admin::action::Action;
use safta_admin::app::{App, Effect, InputMode, Overlay};
use safta_admin::client::{HttpPortalClient, PortalClient};
use safta_admin::config::{Cli, Command, ConfigFile, Settings};
use safta_admin::event::{key_to_action, AppEvent, RawEventHandler};
use safta_admin::nav::parse_deep_link;
use safta_admin::session::SessionStore;
use safta_admin::widgets;
use safta_admin::worker::{PortalHandle, PortalRequest, PortalWorker};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // The guard flushes buffered log lines on drop
    let _log_guard = init_logging(&cli)?;

    let settings = Settings::resolve(&cli, ConfigFile::load());
    let store = match &cli.session_file {
        Some(path) => SessionStore::new(path.clone()),
        None => SessionStore::default_location()?,
    };

    match cli.command.clone() {
        Some(Command::Login { email, password }) => login(&settings, &store, &email, password).await,
        Some(Command::Logout) => {
            store.clear()?;
            println!("Signed out.");
            Ok(())
        }
        Some(Command::ForgotPassword { email }) => {
            let client = HttpPortalClient::new(settings.http(), None)?;
            let message = client
                .request_password_reset(&email)
                .await
                .map_err(|err| eyre!(err.user_message()))?;
            println!("{}", message);
            Ok(())
        }
        None => run_tui(&cli, &settings, &store).await,
    }
}

fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let Some(ref log_file) = cli.log_file else {
        return Ok(None);
    };
    let file = std::fs::File::create(log_file)?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    Ok(Some(guard))
}

async fn login(
    settings: &Settings,
    store: &SessionStore,
    email: &str,
    password: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => {
            print!("Password for {}: ", email);
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    if password.is_empty() {
        bail!("a password is required");
    }

    let client = HttpPortalClient::new(settings.http(), None)?;
    let session = client
        .login(email, &password)
        .await
        .map_err(|err| eyre!(err.user_message()))?;
    store.save(&session)?;
    tracing::info!(email = %session.email, "signed in");

    println!("Welcome, {}.", session.display_name());
    Ok(())
}

async fn run_tui(cli: &Cli, settings: &Settings, store: &SessionStore) -> Result<()> {
    let Some(session) = store.load()? else {
        bail!("Not signed in. Run `safta-admin login <email>` first.");
    };

    let open = cli.open.as_deref().map(parse_deep_link).transpose()?;

    let client: Arc<dyn PortalClient> =
        Arc::new(HttpPortalClient::new(settings.http(), Some(&session.token))?);

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (worker, handle) = PortalWorker::new(client, action_tx);
    tokio::spawn(worker.run());

    let mut app = App::new(
        settings.page_size,
        settings.search_debounce,
        session.display_name().to_string(),
    );
    let effects = app.start(open);
    handle_effects(effects, &handle, store);

    let mut terminal = safta_admin::tui::init()?;
    let mut events = RawEventHandler::new(settings.tick_rate);

    loop {
        terminal.draw(|frame| render(&mut app, frame))?;

        tokio::select! {
            Some(event) = events.next() => {
                let action = match event {
                    AppEvent::Key(key) => key_to_action(
                        key,
                        app.active,
                        &app.input_mode,
                        &app.overlay,
                        &app.input_buffer,
                    ),
                    AppEvent::Tick => Some(Action::Tick),
                };
                if let Some(action) = action {
                    let effects = app.update(action);
                    handle_effects(effects, &handle, store);
                }
            }
            Some(action) = action_rx.recv() => {
                let effects = app.update(action);
                handle_effects(effects, &handle, store);
            }
        }

        if app.should_quit {
            break;
        }
    }

    safta_admin::tui::restore()?;

    if let Some(message) = app.exit_message.take() {
        println!("{}", message);
    }
    Ok(())
}

fn render(app: &mut App, frame: &mut ratatui::Frame) {
    let area = frame.area();

    frame.render_widget(
        ratatui::widgets::Block::default()
            .style(ratatui::style::Style::default().bg(safta_admin::theme::BG_DARK)),
        area,
    );

    let typing = matches!(app.input_mode, InputMode::Command | InputMode::Search);
    let input_rows = if typing { 2 } else { 0 };

    let layout = Layout::vertical([
        Constraint::Length(1),          // Tab bar
        Constraint::Length(1),          // Filter bar
        Constraint::Fill(1),            // Table
        Constraint::Length(1),          // Pagination
        Constraint::Length(input_rows), // Suggestions and input line
        Constraint::Length(1),          // Footer
    ])
    .split(area);

    widgets::tab_bar::render(app, frame, layout[0]);
    widgets::filter_bar::render(app, frame, layout[1]);
    widgets::collection::render(app, frame, layout[2]);
    widgets::pagination::render(app, frame, layout[3]);

    if typing {
        let [suggestions, input] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(layout[4]);
        widgets::command_input::render_suggestions(app, frame, suggestions);
        widgets::command_input::render(app, frame, input);
    }

    widgets::footer::render(app, frame, layout[5]);

    match &app.overlay {
        Overlay::Help => widgets::help_overlay::render(app.active, frame, area),
        Overlay::Confirm(action) => widgets::confirm_modal::render(action, frame, area),
        Overlay::WorkgroupPicker => widgets::workgroup_picker::render(app, frame, area),
        Overlay::None => {}
    }

    widgets::error_toast::render(app, frame, area);
}

fn handle_effects(effects: Vec<Effect>, handle: &PortalHandle, store: &SessionStore) {
    for effect in effects {
        match effect {
            Effect::FetchPage {
                kind,
                token,
                descriptor,
            } => {
                tracing::debug!(kind = kind.slug(), query = %descriptor.query_string(), "fetching page");
                handle.send(PortalRequest::FetchPage {
                    kind,
                    token,
                    descriptor,
                });
            }
            Effect::LoadWorkgroups => handle.send(PortalRequest::LoadWorkgroups),
            Effect::DeleteRecord(target) => handle.send(PortalRequest::DeleteRecord(target)),
            Effect::ClearSession => {
                if let Err(err) = store.clear() {
                    tracing::error!(error = %err, "failed to clear session");
                }
            }
            Effect::Quit => {}
        }
    }
}
