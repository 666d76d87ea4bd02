use crate::core::module::{Module, DEFAULT_CONFIG_EXTENSION};
use crate::domain::ports::Supervised;
use crate::utils::error::{DockrError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// An ordered batch of modules. Batch operations walk the modules in
/// insertion order and stop at the first failure.
#[derive(Debug, Default)]
pub struct Collection {
    modules: Vec<Module>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefer the `collection!` macro.
    pub fn create(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    /// Builds a collection from a modules root: every immediate subdirectory
    /// holding a module config contributes one module.
    pub fn open_dir<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::discover(path, DEFAULT_CONFIG_EXTENSION)
    }

    pub fn discover<P: AsRef<Path>>(path: P, extension: &str) -> Result<Self> {
        let root = path.as_ref();
        tracing::debug!("Searching {} for modules...", root.display());

        let mut dirs: Vec<PathBuf> = std::fs::read_dir(root)?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|candidate| candidate.is_dir())
            .collect();
        dirs.sort();

        let mut coll = Collection::new();
        for dir in dirs {
            match Module::open_dir_with(&dir, extension) {
                Ok(Some(module)) => {
                    tracing::debug!(
                        "Adding {} to collection from {} directory!",
                        module.name(),
                        dir.display()
                    );
                    coll.push(module);
                }
                Ok(None) => {}
                Err(e) => tracing::debug!("Could not read {}: {}", dir.display(), e),
            }
        }
        Ok(coll)
    }

    /// A config file yields a one-module collection; a directory is treated
    /// as a modules root. Finding no module at all is an error.
    pub fn load<P: AsRef<Path>>(path: P, extension: &str) -> Result<Self> {
        let path = path.as_ref();
        let coll = if path.is_file() {
            Self::create(vec![Module::open(path)?])
        } else if path.is_dir() {
            Self::discover(path, extension)?
        } else {
            Self::new()
        };

        if coll.is_empty() {
            return Err(DockrError::ModuleNotFound {
                path: path.display().to_string(),
            });
        }
        Ok(coll)
    }

    pub fn push(&mut self, module: Module) {
        self.modules.push(module);
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Module> {
        self.modules.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(Module::name).collect()
    }

    pub async fn start_all(&mut self) -> Result<()> {
        if self.modules.is_empty() {
            tracing::warn!("Attempting to start_all() on an empty collection. Was this intentional?");
        }
        for module in self.modules.iter_mut() {
            module.start().await?;
        }
        Ok(())
    }

    /// Waits for every module in turn until all have exited.
    pub async fn wait_all(&mut self) -> Result<()> {
        for module in self.modules.iter_mut() {
            module.wait().await?;
        }
        Ok(())
    }

    pub async fn stop_all(&mut self) -> Result<()> {
        self.stop_all_in(crate::domain::ports::DEFAULT_STOP_TIMEOUT)
            .await
    }

    /// Each module gets the full `timeout` in turn, so a batch can take up
    /// to `len() * timeout` to finish.
    pub async fn stop_all_in(&mut self, timeout: Duration) -> Result<()> {
        for module in self.modules.iter_mut() {
            module.stop_in(timeout).await?;
        }
        Ok(())
    }

    pub async fn run_all(&mut self) -> Result<()> {
        self.start_all().await?;
        self.wait_all().await
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Module;
    type IntoIter = std::slice::Iter<'a, Module>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Vec<Module>> for Collection {
    fn from(modules: Vec<Module>) -> Self {
        Self::create(modules)
    }
}

#[async_trait]
impl Supervised for Collection {
    async fn start(&mut self) -> Result<()> {
        self.start_all().await
    }

    async fn wait(&mut self) -> Result<()> {
        self.wait_all().await
    }

    async fn stop_in(&mut self, timeout: Duration) -> Result<()> {
        self.stop_all_in(timeout).await
    }
}

/// Builds a [`Collection`] from modules, in argument order.
///
/// ```no_run
/// use acs::{collection, Module};
///
/// let acs = Module::open("acs/acs.json")?;
/// let payload = Module::open("payload/payload.json")?;
/// let coll = collection!(acs, payload);
/// assert_eq!(coll.len(), 2);
/// # Ok::<(), acs::DockrError>(())
/// ```
#[macro_export]
macro_rules! collection {
    () => {
        $crate::Collection::new()
    };
    ($($module:expr),+ $(,)?) => {
        $crate::Collection::create(vec![$($module),+])
    };
}
