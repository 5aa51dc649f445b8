use std::sync::Arc;
use std::time::Duration;

use directory_core::{Effect, Msg, UserRecord};
use directory_engine::{EngineEvent, EngineHandle, FetchedUser, SourceSettings, UserSource};
use directory_logging::{directory_info, directory_warn};

/// Executes core effects on the engine and turns engine events back into
/// core messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: SourceSettings) -> anyhow::Result<Self> {
        Ok(Self {
            engine: EngineHandle::new(settings)?,
        })
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_source(source: Arc<dyn UserSource>) -> Self {
        Self {
            engine: EngineHandle::with_source(source),
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchPage { page } => {
                    directory_info!("FetchPage page={}", page);
                    self.engine.request_page(page);
                }
            }
        }
    }

    /// Drains every completion that has arrived so far.
    pub fn poll(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(map_event)
            .collect()
    }

    /// Blocks up to `timeout` for the next completion.
    pub fn wait(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PageCompleted { page, result } => match result {
            Ok(fetched) => Msg::PageLoaded {
                page,
                records: fetched.records.into_iter().map(map_user).collect(),
                total_pages: fetched.total_pages,
            },
            Err(err) => {
                directory_warn!("Page {} failed: {}", page, err);
                Msg::PageFailed {
                    page,
                    reason: err.to_string(),
                }
            }
        },
    }
}

fn map_user(user: FetchedUser) -> UserRecord {
    UserRecord {
        id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        avatar_url: user.avatar_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use directory_engine::{FailureKind, FetchError, UserPage};

    #[test]
    fn completed_page_becomes_page_loaded() {
        let msg = map_event(EngineEvent::PageCompleted {
            page: 2,
            result: Ok(UserPage {
                records: vec![FetchedUser {
                    id: 8,
                    first_name: "Lindsay".to_string(),
                    last_name: "Ferguson".to_string(),
                    email: "lindsay.ferguson@reqres.in".to_string(),
                    avatar_url: "https://reqres.in/img/faces/8-image.jpg".to_string(),
                }],
                total_pages: 2,
            }),
        });

        match msg {
            Msg::PageLoaded {
                page,
                records,
                total_pages,
            } => {
                assert_eq!(page, 2);
                assert_eq!(total_pages, 2);
                assert_eq!(records[0].full_name(), "Lindsay Ferguson");
                assert_eq!(records[0].avatar_url, "https://reqres.in/img/faces/8-image.jpg");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failed_page_becomes_page_failed_with_reason() {
        let msg = map_event(EngineEvent::PageCompleted {
            page: 1,
            result: Err(FetchError {
                kind: FailureKind::Timeout,
                message: String::new(),
            }),
        });
        assert_eq!(
            msg,
            Msg::PageFailed {
                page: 1,
                reason: "timeout".to_string()
            }
        );
    }
}
