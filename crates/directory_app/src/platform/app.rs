use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use directory_core::{update, DirectoryState, LoadStatus, Msg};
use directory_logging::{directory_info, directory_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::ui::commands::{parse_command, Command, HELP};
use super::ui::render::render;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::init()?;
    directory_logging::initialize(config.log_destination);
    directory_info!(
        "Directory session against {} (timeout {:?})",
        config.source.base_url,
        config.source.request_timeout
    );

    let mut session = Session::new(EffectRunner::new(config.source)?);
    let input_rx = spawn_stdin_reader();
    let mut stdout = io::stdout().lock();
    let mut input_closed = false;

    session.dispatch(Msg::LoadNextRequested);
    loop {
        session.pump();
        session.render_if_dirty(&mut stdout)?;

        if input_closed {
            // Let an in-flight page land before leaving.
            if session.state.status() != &LoadStatus::Loading {
                break;
            }
            if let Some(msg) = session.runner.wait(POLL_INTERVAL) {
                session.dispatch(msg);
            }
            continue;
        }

        match input_rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => match parse_command(&line) {
                Ok(Command::Dispatch(Msg::NoOp)) => session.force_redraw(),
                Ok(Command::Dispatch(msg)) => session.dispatch(msg),
                Ok(Command::Help) => writeln!(stdout, "{HELP}")?,
                Ok(Command::Quit) => break,
                Err(err) => writeln!(stdout, "{err}")?,
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => input_closed = true,
        }
    }

    directory_info!("Directory session ended");
    Ok(())
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    directory_warn!("stdin read failed: {}", err);
                    break;
                }
            }
        }
    });
    rx
}

/// Owns the single state value and routes effects to the engine.
struct Session {
    state: DirectoryState,
    runner: EffectRunner,
    redraw: bool,
}

impl Session {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: DirectoryState::new(),
            runner,
            redraw: true,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Applies every engine completion received so far.
    fn pump(&mut self) {
        for msg in self.runner.poll() {
            self.dispatch(msg);
        }
    }

    fn force_redraw(&mut self) {
        self.redraw = true;
    }

    fn render_if_dirty(&mut self, out: &mut impl Write) -> io::Result<()> {
        let dirty = self.state.consume_dirty();
        let redraw = std::mem::take(&mut self.redraw);
        if !dirty && !redraw {
            return Ok(());
        }
        write!(out, "{}", render(&self.state.view()))?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use directory_engine::{FailureKind, FetchError, FetchedUser, PageNumber, UserPage, UserSource};

    use super::*;

    struct TwoPages;

    #[async_trait::async_trait]
    impl UserSource for TwoPages {
        async fn fetch_page(&self, page: PageNumber) -> Result<UserPage, FetchError> {
            if page > 2 {
                return Err(FetchError {
                    kind: FailureKind::HttpStatus(404),
                    message: String::new(),
                });
            }
            let first_id = u64::from(page - 1) * 6 + 1;
            let records = (first_id..first_id + 6)
                .map(|id| FetchedUser {
                    id,
                    first_name: format!("Name{id:02}"),
                    last_name: "Tester".to_string(),
                    email: format!("name{id}@gmail.com"),
                    avatar_url: format!("https://reqres.in/img/faces/{id}-image.jpg"),
                })
                .collect();
            Ok(UserPage {
                records,
                total_pages: 2,
            })
        }
    }

    fn settle(session: &mut Session) {
        while session.state.status() == &LoadStatus::Loading {
            let msg = session
                .runner
                .wait(Duration::from_secs(5))
                .expect("engine answers");
            session.dispatch(msg);
        }
    }

    #[test]
    fn session_loads_pages_through_engine() {
        let mut session = Session::new(EffectRunner::with_source(Arc::new(TwoPages)));

        session.dispatch(Msg::LoadNextRequested);
        settle(&mut session);
        assert_eq!(session.state.server_page(), 1);
        assert_eq!(session.state.view().visible_records.len(), 6);

        session.dispatch(Msg::MoreRequested);
        settle(&mut session);
        let view = session.state.view();
        assert_eq!(view.server_page, 2);
        assert_eq!(view.visible_records.len(), 12);
        assert!(!view.has_more);
    }

    #[test]
    fn render_happens_only_when_something_changed() {
        let mut session = Session::new(EffectRunner::with_source(Arc::new(TwoPages)));
        let mut out = Vec::new();

        session.render_if_dirty(&mut out).unwrap();
        assert!(!out.is_empty());

        out.clear();
        session.render_if_dirty(&mut out).unwrap();
        assert!(out.is_empty());

        session.dispatch(Msg::LoadNextRequested);
        settle(&mut session);
        session.render_if_dirty(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Showing 6 of 6 users"));
    }
}
