use crate::domain::model::{ModuleSpec, ModuleState};
use crate::domain::ports::Supervised;
use crate::utils::error::{DockrError, Result};
use crate::utils::validation::Validate;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::{Child, Command};

pub const DEFAULT_CONFIG_EXTENSION: &str = "json";

/// An external program run as a child of the current process.
#[derive(Debug, Default)]
pub struct Module {
    name: String,
    pwd: Option<PathBuf>,
    cmd: String,
    args: Vec<String>,
    proc: Option<Child>,
    state: ModuleState,
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.cmd == other.cmd && self.args == other.args
    }
}

impl Eq for Module {}

impl Module {
    /// A blank module.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(name: &str, pwd: impl Into<PathBuf>, cmd: &str, args: Vec<&str>) -> Self {
        Self {
            name: name.to_string(),
            pwd: Some(pwd.into()),
            cmd: cmd.to_string(),
            args: args.into_iter().map(str::to_string).collect(),
            ..Self::default()
        }
    }

    /// Loads a module from a JSON config file.
    ///
    /// The module runs from the directory holding the config file, so a
    /// relative `cmd` or relative paths in `args` are taken from there.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let spec: ModuleSpec = serde_json::from_str(&content)?;
        spec.validate()?;

        let mut module = Module::from(spec);
        module.pwd = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf);
        Ok(module)
    }

    /// Looks for a module config directly inside `path`.
    ///
    /// Candidates are tried in filename order and the first one that loads
    /// wins. Returns `Ok(None)` if `path` is not a directory or holds no
    /// valid config.
    pub fn open_dir<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        Self::open_dir_with(path, DEFAULT_CONFIG_EXTENSION)
    }

    pub fn open_dir_with<P: AsRef<Path>>(path: P, extension: &str) -> Result<Option<Self>> {
        let dir = path.as_ref();
        if !dir.is_dir() {
            return Ok(None);
        }

        let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|candidate| {
                candidate.is_file()
                    && candidate.extension().and_then(|ext| ext.to_str()) == Some(extension)
            })
            .collect();
        candidates.sort();

        for candidate in candidates {
            match Module::open(&candidate) {
                Ok(module) => return Ok(Some(module)),
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", candidate.display(), e);
                }
            }
        }

        Ok(None)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cmd(&self) -> &str {
        &self.cmd
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn pwd(&self) -> Option<&Path> {
        self.pwd.as_deref()
    }

    pub fn state(&self) -> ModuleState {
        self.state
    }

    /// Reaps the child if it has exited since the last look, recording its
    /// exit code, and returns the up-to-date state.
    pub fn refresh(&mut self) -> Result<ModuleState> {
        if let Some(child) = self.proc.as_mut() {
            if let Some(status) = child.try_wait()? {
                tracing::debug!("{} exited on its own ({})", self.name, status);
                self.state = ModuleState::Exited {
                    code: status.code(),
                };
                self.proc = None;
            }
        }
        Ok(self.state)
    }

    /// Whether the child is still alive. Reaps it if it has exited.
    pub fn is_running(&mut self) -> bool {
        match self.refresh() {
            Ok(state) => state.is_running(),
            Err(_) => self.proc.is_some(),
        }
    }
}

impl From<ModuleSpec> for Module {
    fn from(spec: ModuleSpec) -> Self {
        Self {
            name: spec.name,
            cmd: spec.cmd,
            args: spec.args,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Supervised for Module {
    /// Spawns `cmd` with `args`. Does nothing while a previous start is
    /// still running; a child that already exited is reaped and replaced.
    async fn start(&mut self) -> Result<()> {
        if self.refresh()?.is_running() {
            return Ok(());
        }

        tracing::debug!("Starting {} ...", self.name);
        let child = Command::new(&self.cmd)
            .current_dir(self.pwd.as_deref().unwrap_or_else(|| Path::new(".")))
            .args(&self.args)
            .spawn()
            .map_err(|source| DockrError::SpawnError {
                module: self.name.clone(),
                source,
            })?;

        self.state = ModuleState::Running { pid: child.id() };
        self.proc = Some(child);
        tracing::debug!("Successfully started {} !", self.name);
        Ok(())
    }

    async fn wait(&mut self) -> Result<()> {
        if let Some(child) = self.proc.as_mut() {
            tracing::debug!("Waiting on {} ...", self.name);
            let status = child.wait().await?;
            self.state = ModuleState::Exited {
                code: status.code(),
            };
            self.proc = None;
            tracing::debug!("Done waiting on {} ({})", self.name, status);
        }
        Ok(())
    }

    /// Gives the module `timeout` to exit on its own, then kills it.
    async fn stop_in(&mut self, timeout: Duration) -> Result<()> {
        if let Some(child) = self.proc.as_mut() {
            tracing::debug!("Waiting on {} with intent to kill soon...", self.name);
            match tokio::time::timeout(timeout, child.wait()).await {
                Ok(status) => {
                    self.state = ModuleState::Exited {
                        code: status?.code(),
                    };
                }
                Err(_) => {
                    tracing::debug!("Timeout elapsed, killing {} .", self.name);
                    child.kill().await?;
                    self.state = ModuleState::Killed;
                }
            }
            self.proc = None;
            tracing::debug!("Done stopping {} !", self.name);
        }
        Ok(())
    }
}
