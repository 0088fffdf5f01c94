//! The API server running in-process on an ephemeral localhost port.

use std::net::Ipv4Addr;

use rocket::config::LogLevel;
use rocket::fairing::AdHoc;
use rocket::{Ignite, Rocket, Shutdown};
use rusqlite::Connection;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::{HarnessError, Result};
use crate::create_rocket;

type ServerTask = JoinHandle<std::result::Result<Rocket<Ignite>, rocket::Error>>;

pub struct TestServer {
    base_url: String,
    shutdown: Shutdown,
    task: Option<ServerTask>,
}

impl TestServer {
    /// Launches the app on `conn` on an OS-assigned port and resolves once
    /// Rocket has lifted off.
    pub async fn spawn(conn: Connection) -> Result<Self> {
        let config = rocket::Config {
            address: Ipv4Addr::LOCALHOST.into(),
            port: 0,
            log_level: LogLevel::Off,
            shutdown: rocket::config::Shutdown {
                ctrlc: false,
                grace: 1,
                mercy: 1,
                ..Default::default()
            },
            ..rocket::Config::debug_default()
        };

        let (ready_tx, ready_rx) = oneshot::channel();
        let rocket = create_rocket(conn)
            .configure(config)
            .attach(AdHoc::on_liftoff("Harness Liftoff", move |orbit| Box::pin(async move {
                let _ = ready_tx.send(orbit.config().port);
            })))
            .ignite()
            .await
            .map_err(|e| HarnessError::Launch(e.to_string()))?;

        let shutdown = rocket.shutdown();
        let task = tokio::spawn(rocket.launch());

        let Ok(port) = ready_rx.await else {
            // The fairing was dropped without firing: launch failed.
            let reason = match task.await {
                Ok(Err(e)) => e.to_string(),
                Ok(Ok(_)) => "server exited before liftoff".to_string(),
                Err(e) => e.to_string(),
            };
            return Err(HarnessError::Launch(reason));
        };

        if port == 0 {
            shutdown.notify();
            return Err(HarnessError::Launch("server did not report its bound port".to_string()));
        }
        let base_url = format!("http://{}:{}", Ipv4Addr::LOCALHOST, port);
        tracing::debug!(%base_url, "Test server lifted off");
        Ok(Self { base_url, shutdown, task: Some(task) })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Graceful shutdown; waits for the server task to finish.
    pub async fn stop(mut self) -> Result<()> {
        self.shutdown.clone().notify();
        let Some(task) = self.task.take() else {
            return Ok(());
        };
        match task.await {
            Ok(Ok(_)) => {
                tracing::debug!(base_url = %self.base_url, "Test server stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(HarnessError::Server(e.to_string())),
            Err(e) => Err(HarnessError::Server(e.to_string())),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.shutdown.clone().notify();
        }
    }
}
