//! systemd service adapter.
//!
//! Implements [`ServicePort`] by shelling out to `systemctl`. Start and stop
//! exit codes are only logged: the supervisor verifies the outcome itself
//! through `service_status` after the settle interval.

use std::process::{Command, ExitStatus};

use log::{debug, warn};

use crate::app::ports::ServicePort;
use crate::error::{Result, ServiceError};

const SYSTEMCTL: &str = "systemctl";

pub struct SystemctlAdapter {
    program: String,
    unit: String,
}

impl SystemctlAdapter {
    pub fn new(unit: impl Into<String>) -> Self {
        Self::with_program(SYSTEMCTL, unit)
    }

    /// Use a different executable in place of `systemctl`.
    pub fn with_program(program: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            unit: unit.into(),
        }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    fn run(&self, verb: &'static str) -> Result<ExitStatus> {
        debug!("service: {} {} {}", self.program, verb, self.unit);
        Command::new(&self.program)
            .arg(verb)
            .arg(&self.unit)
            .output()
            .map(|out| out.status)
            .map_err(|source| ServiceError::CommandFailed { command: verb, source }.into())
    }

    fn run_action(&self, verb: &'static str) -> Result<()> {
        let status = self.run(verb)?;
        if !status.success() {
            warn!("service: {} {} exited with {}", verb, self.unit, status);
        }
        Ok(())
    }
}

/// Exit code of a finished command; termination by signal counts as failure.
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

impl ServicePort for SystemctlAdapter {
    fn start_service(&mut self) -> Result<()> {
        self.run_action("restart")
    }

    fn stop_service(&mut self) -> Result<()> {
        self.run_action("stop")
    }

    fn service_status(&mut self) -> Result<i32> {
        self.run("status").map(exit_code)
    }
}
