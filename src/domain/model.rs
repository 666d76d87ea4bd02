use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};

/// On-disk description of a module.
///
/// ```json
/// {
///     "name": "acs",
///     "cmd": "./acs",
///     "args": ["--quiet"]
/// }
/// ```
///
/// `cmd` holds only the program; its arguments go in `args` and are handed
/// to the child as-is, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub name: String,
    pub cmd: String,
    pub args: Vec<String>,
}

impl Validate for ModuleSpec {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_non_empty_string("cmd", &self.cmd)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleState {
    #[default]
    Idle,
    Running {
        pid: Option<u32>,
    },
    Exited {
        code: Option<i32>,
    },
    Killed,
}

impl ModuleState {
    pub fn is_running(&self) -> bool {
        matches!(self, ModuleState::Running { .. })
    }
}
