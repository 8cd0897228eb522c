//! Dedicated owner thread for a [`Computer`]
//!
//! Computer backends are blocking and not thread-safe. The worker builds the
//! computer on its own OS thread and runs every request there, one at a time,
//! in arrival order. Async callers talk to it over a channel.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tokio::sync::{mpsc, oneshot};

use crate::computer::Computer;
use crate::error::{ComputerError, Result};

type Job = Box<dyn FnOnce(&mut dyn Computer) + Send>;

/// Handle to the thread that owns the computer
#[derive(Clone)]
pub struct ComputerWorker {
    jobs: mpsc::UnboundedSender<Job>,
}

impl ComputerWorker {
    /// Spawn the worker thread and build the computer on it
    ///
    /// Returns once construction finished, with its error if it failed.
    pub async fn spawn<C, F>(build: F) -> anyhow::Result<Self>
    where
        C: Computer + 'static,
        F: FnOnce() -> Result<C> + Send + 'static,
    {
        let (jobs, mut queue) = mpsc::unbounded_channel::<Job>();
        let (ready_tx, ready_rx) = oneshot::channel::<Result<()>>();

        std::thread::Builder::new()
            .name("deskpilot-computer".to_string())
            .spawn(move || {
                let mut computer = match build() {
                    Ok(computer) => computer,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));

                while let Some(job) = queue.blocking_recv() {
                    // A panicking action drops its reply; the caller sees an error
                    // and the computer stays available for the next request
                    if catch_unwind(AssertUnwindSafe(|| job(&mut computer))).is_err() {
                        tracing::error!("Computer action panicked");
                    }
                }

                tracing::info!("Computer worker stopped");
            })?;

        ready_rx
            .await
            .map_err(|_| anyhow::anyhow!("Computer worker exited during startup"))??;

        Ok(Self { jobs })
    }

    /// Run `f` against the computer and wait for its result
    pub async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn Computer) -> Result<T> + Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.jobs
            .send(Box::new(move |computer: &mut dyn Computer| {
                let _ = reply_tx.send(f(computer));
            }))
            .map_err(|_| ComputerError::Backend(anyhow::anyhow!("Computer worker is not running")))?;

        reply_rx.await.map_err(|_| {
            ComputerError::Backend(anyhow::anyhow!(
                "Computer worker dropped the request (the action panicked)"
            ))
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EnvState, ScreenSize, ScrollDirection};

    /// Minimal computer that only counts the actions it receives
    struct CountingComputer {
        actions: usize,
    }

    impl CountingComputer {
        fn act(&mut self) -> Result<EnvState> {
            self.actions += 1;
            Ok(EnvState::new(vec![0], self.actions.to_string()))
        }
    }

    impl Computer for CountingComputer {
        fn screen_size(&self) -> ScreenSize {
            ScreenSize::new(10, 10)
        }
        fn open_browser(&mut self) -> Result<EnvState> {
            self.act()
        }
        fn click_at(&mut self, _x: i32, _y: i32) -> Result<EnvState> {
            self.act()
        }
        fn hover_at(&mut self, _x: i32, _y: i32) -> Result<EnvState> {
            self.act()
        }
        fn type_text_at(&mut self, _: i32, _: i32, _: &str, _: bool, _: bool) -> Result<EnvState> {
            self.act()
        }
        fn scroll_document(&mut self, _: ScrollDirection) -> Result<EnvState> {
            self.act()
        }
        fn scroll_at(&mut self, _: i32, _: i32, _: ScrollDirection, _: i32) -> Result<EnvState> {
            self.act()
        }
        fn wait_5_seconds(&mut self) -> Result<EnvState> {
            self.act()
        }
        fn go_back(&mut self) -> Result<EnvState> {
            self.act()
        }
        fn go_forward(&mut self) -> Result<EnvState> {
            self.act()
        }
        fn search(&mut self) -> Result<EnvState> {
            self.act()
        }
        fn navigate(&mut self, _url: &str) -> Result<EnvState> {
            self.act()
        }
        fn key_combination(&mut self, _keys: &[String]) -> Result<EnvState> {
            self.act()
        }
        fn drag_and_drop(&mut self, _: i32, _: i32, _: i32, _: i32) -> Result<EnvState> {
            self.act()
        }
        fn current_state(&mut self) -> Result<EnvState> {
            Ok(EnvState::new(vec![0], self.actions.to_string()))
        }
    }

    #[tokio::test]
    async fn test_requests_run_in_order() {
        let worker = ComputerWorker::spawn(|| Ok(CountingComputer { actions: 0 }))
            .await
            .unwrap();

        for expected in 1..=3 {
            let state = worker.run(|c| c.click_at(1, 1)).await.unwrap();
            assert_eq!(state.url(), expected.to_string());
        }

        let size = worker.run(|c| Ok(c.screen_size())).await.unwrap();
        assert_eq!(size, ScreenSize::new(10, 10));
    }

    #[tokio::test]
    async fn test_construction_error_is_reported() {
        let result = ComputerWorker::spawn(|| -> Result<CountingComputer> {
            Err(ComputerError::Backend(anyhow::anyhow!("no display")))
        })
        .await;

        let err = result.err().unwrap();
        assert!(err.to_string().contains("no display"));
    }

    #[tokio::test]
    async fn test_worker_survives_a_panicking_action() {
        let worker = ComputerWorker::spawn(|| Ok(CountingComputer { actions: 0 }))
            .await
            .unwrap();

        let err = worker
            .run(|_| -> Result<EnvState> { panic!("action blew up") })
            .await
            .unwrap_err();
        assert!(matches!(err, ComputerError::Backend(_)));

        let state = worker.run(|c| c.click_at(1, 1)).await.unwrap();
        assert_eq!(state.url(), "1");
    }

    #[tokio::test]
    async fn test_errors_reach_the_caller() {
        let worker = ComputerWorker::spawn(|| Ok(CountingComputer { actions: 0 }))
            .await
            .unwrap();

        let err = worker
            .run(|_| -> Result<()> { Err(ComputerError::InvalidArgument("bad".to_string())) })
            .await
            .unwrap_err();
        assert!(matches!(err, ComputerError::InvalidArgument(_)));
    }
}
