// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Throwaway `MariaDB` containers for backend validation.

use std::thread::sleep;
use std::time::Duration;

use color_eyre::{Result, eyre::Context, eyre::eyre};
use duct::cmd;

use crate::ExpressionExt;

const IMAGE: &str = "mariadb:11";
const READY_ATTEMPTS: u32 = 30;

/// A running `MariaDB` container. Stopped and removed on drop.
pub struct MariaDb {
    container: &'static str,
    database: &'static str,
    user: &'static str,
    password: &'static str,
    port: u16,
}

impl MariaDb {
    /// Starts a fresh container and waits until it accepts queries.
    ///
    /// Any container left over under the same name is removed first.
    pub fn start(
        container: &'static str,
        database: &'static str,
        password: &'static str,
        port: u16,
    ) -> Result<Self> {
        cmd!("docker", "--version")
            .run_with_trace()
            .wrap_err("Docker is not available. Please install Docker.")?;

        let db = Self {
            container,
            database,
            user: "innkeep",
            password,
            port,
        };
        db.remove();

        tracing::info!("Starting MariaDB container: {}", db.container);
        cmd!(
            "docker",
            "run",
            "--name",
            db.container,
            "-e",
            format!("MARIADB_DATABASE={}", db.database),
            "-e",
            format!("MARIADB_USER={}", db.user),
            "-e",
            format!("MARIADB_PASSWORD={}", db.password),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{}:3306", db.port),
            "-d",
            IMAGE
        )
        .run_with_trace()
        .wrap_err("Failed to start MariaDB container")?;

        db.wait_ready()?;
        Ok(db)
    }

    pub const fn database(&self) -> &'static str {
        self.database
    }

    /// Connection URL as seen from the host.
    pub fn url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            self.user, self.password, self.port, self.database
        )
    }

    fn wait_ready(&self) -> Result<()> {
        tracing::info!("Waiting for MariaDB to be ready...");
        for attempt in 1..=READY_ATTEMPTS {
            sleep(Duration::from_secs(1));
            tracing::debug!("Connection attempt {attempt}/{READY_ATTEMPTS}");
            let probe = cmd!(
                "docker",
                "exec",
                self.container,
                "mariadb",
                "-u",
                self.user,
                format!("-p{}", self.password),
                "-e",
                "SELECT 1"
            )
            .stdout_null()
            .stderr_null()
            .run();
            if probe.is_ok() {
                tracing::info!("MariaDB is ready");
                return Ok(());
            }
        }
        Err(eyre!(
            "MariaDB did not become ready within {READY_ATTEMPTS} seconds"
        ))
    }

    fn remove(&self) {
        let _ = cmd!("docker", "stop", self.container)
            .stdout_null()
            .stderr_null()
            .unchecked()
            .run();
        let _ = cmd!("docker", "rm", self.container)
            .stdout_null()
            .stderr_null()
            .unchecked()
            .run();
    }
}

impl Drop for MariaDb {
    fn drop(&mut self) {
        tracing::info!("Removing MariaDB container {}", self.container);
        self.remove();
    }
}
