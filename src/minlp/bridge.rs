//! External solver invocation.
//!
//! The bridge writes the model into a scratch directory, runs
//!
//! ```text
//! <executable> <args...> <model-file> <solution-file>
//! ```
//!
//! and parses the solution file once the process exits successfully. The
//! child runs in its own process group; on timeout the whole group is
//! killed before [`SchedError::Timeout`] is returned.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use super::model::MinlpModel;
use super::solution::MinlpSolution;
use crate::error::{Result, SchedError};
use crate::models::Graph;

const MODEL_FILE: &str = "model.mod";
const SOLUTION_FILE: &str = "solution.sol";

/// External solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinlpConfig {
    /// Solver executable (looked up on `PATH` when not a path).
    pub executable: PathBuf,
    /// Arguments placed before the model and solution paths.
    pub args: Vec<String>,
    /// Parent of the scratch directory; the system temp dir when `None`.
    pub working_dir: Option<PathBuf>,
    /// Wall-clock limit in seconds.
    pub timeout_secs: u64,
}

impl Default for MinlpConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("couenne"),
            args: Vec::new(),
            working_dir: None,
            timeout_secs: 60,
        }
    }
}

impl MinlpConfig {
    /// Default settings for the given executable.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            ..Self::default()
        }
    }

    /// Sets the arguments placed before the model and solution paths.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the parent of the scratch directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Sets the wall-clock limit in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.executable.as_os_str().is_empty() {
            return Err("executable must not be empty".into());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be positive".into());
        }
        Ok(())
    }
}

/// Runs an external MINLP solver on S-graph models.
#[derive(Debug, Clone, Default)]
pub struct MinlpBridge {
    config: MinlpConfig,
}

impl MinlpBridge {
    /// Creates a bridge with the given configuration.
    pub fn new(config: MinlpConfig) -> Self {
        Self { config }
    }

    /// The bridge configuration.
    pub fn config(&self) -> &MinlpConfig {
        &self.config
    }

    /// Builds the model for `graph`, runs the solver and parses its output.
    ///
    /// # Errors
    /// - [`SchedError::InvalidConfig`] for an invalid configuration
    /// - [`SchedError::SolverUnavailable`] if the executable cannot be started
    /// - [`SchedError::Timeout`] if the solver exceeds the time limit
    /// - [`SchedError::SolverFailed`] on a non-zero exit status
    /// - [`SchedError::EmptySolution`] if no start time was reported
    /// - [`SchedError::Io`] for scratch-file failures
    pub fn solve(&self, graph: &Graph) -> Result<MinlpSolution> {
        self.config.validate().map_err(SchedError::InvalidConfig)?;

        let scratch = match &self.config.working_dir {
            Some(dir) => tempfile::Builder::new().prefix("sgraph-").tempdir_in(dir)?,
            None => tempfile::Builder::new().prefix("sgraph-").tempdir()?,
        };
        let model_path = scratch.path().join(MODEL_FILE);
        let solution_path = scratch.path().join(SOLUTION_FILE);

        let model = MinlpModel::from_graph(graph);
        std::fs::write(&model_path, model.to_text())?;
        debug!(
            model = %model_path.display(),
            variables = model.variables().len(),
            constraints = model.constraints().len(),
            "minlp model written"
        );

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let status = runtime.block_on(self.run(scratch.path(), &model_path, &solution_path))?;

        if !status.success() {
            return Err(SchedError::SolverFailed {
                code: status.code(),
            });
        }

        let text = match std::fs::read_to_string(&solution_path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %solution_path.display(), "solver wrote no solution file");
                return Err(SchedError::EmptySolution);
            }
            Err(e) => return Err(e.into()),
        };
        let solution = MinlpSolution::parse(&text)?;
        info!(nodes = solution.starts().len(), makespan = ?solution.makespan(), "minlp solution read");
        Ok(solution)
    }

    async fn run(&self, cwd: &Path, model: &Path, solution: &Path) -> Result<ExitStatus> {
        let program = self.config.executable.display().to_string();
        let mut std_cmd = std::process::Command::new(&self.config.executable);
        std_cmd
            .args(&self.config.args)
            .arg(model)
            .arg(solution)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            std_cmd.process_group(0);
        }
        let mut cmd = Command::from(std_cmd);
        cmd.kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|source| SchedError::SolverUnavailable {
                program: program.clone(),
                source,
            })?;
        debug!(program = %program, pid = ?child.id(), "minlp solver started");

        let limit = Duration::from_secs(self.config.timeout_secs);
        match tokio::time::timeout(limit, child.wait()).await {
            Ok(status) => Ok(status?),
            Err(_) => {
                warn!(program = %program, timeout_secs = self.config.timeout_secs, "minlp solver timed out");
                kill_tree(&mut child).await;
                Err(SchedError::Timeout {
                    secs: self.config.timeout_secs,
                })
            }
        }
    }
}

/// Kills the child's process group and reaps the child.
#[cfg(unix)]
async fn kill_tree(child: &mut Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    if let Some(pid) = child.id().and_then(|id| i32::try_from(id).ok()) {
        if let Err(e) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
            debug!(pid, error = %e, "killpg failed");
        }
    }
    reap(child).await;
}

#[cfg(not(unix))]
async fn kill_tree(child: &mut Child) {
    reap(child).await;
}

async fn reap(child: &mut Child) {
    if let Err(e) = child.kill().await {
        debug!(error = %e, "kill after timeout failed");
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::models::Node;

    fn graph() -> Graph {
        let mut g = Graph::new();
        g.add_node(Node::new("A_M1").with_duration(2.0));
        g.add_node(Node::new("B_M1").with_duration(1.0));
        g.add_edge("A_M1", "B_M1", 0.0);
        g
    }

    /// Runs `sh <script>` so the test never executes a freshly written file.
    fn shell(dir: &Path, body: &str) -> MinlpConfig {
        let script = dir.join("solver.sh");
        std::fs::write(&script, body).unwrap();
        MinlpConfig::new("sh")
            .with_args([script.display().to_string()])
            .with_working_dir(dir)
            .with_timeout_secs(5)
    }

    #[test]
    fn test_round_trip_through_fake_solver() {
        let dir = tempfile::tempdir().unwrap();
        let config = shell(
            dir.path(),
            "grep -q 'minimize makespan: T;' \"$1\" || exit 7\nprintf 't_B_M1 2\\nt_A_M1 0\\nT 3\\n' > \"$2\"\n",
        );
        let solution = MinlpBridge::new(config).solve(&graph()).unwrap();
        assert_eq!(solution.order(), vec!["A_M1", "B_M1"]);
        assert_eq!(solution.makespan(), Some(3.0));
    }

    #[test]
    fn test_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let config = shell(dir.path(), "exit 3\n");
        assert!(matches!(
            MinlpBridge::new(config).solve(&graph()),
            Err(SchedError::SolverFailed { code: Some(3) })
        ));
    }

    #[test]
    fn test_missing_solution_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = shell(dir.path(), "exit 0\n");
        assert!(matches!(
            MinlpBridge::new(config).solve(&graph()),
            Err(SchedError::EmptySolution)
        ));
    }

    #[test]
    fn test_timeout_kills_solver() {
        let dir = tempfile::tempdir().unwrap();
        let config = shell(dir.path(), "sleep 30\n").with_timeout_secs(1);
        let started = std::time::Instant::now();
        assert!(matches!(
            MinlpBridge::new(config).solve(&graph()),
            Err(SchedError::Timeout { secs: 1 })
        ));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_missing_executable() {
        let config = MinlpConfig::new("/nonexistent/sgraph-solver");
        assert!(matches!(
            MinlpBridge::new(config).solve(&graph()),
            Err(SchedError::SolverUnavailable { .. })
        ));
    }

    #[test]
    fn test_invalid_config() {
        let config = MinlpConfig::new("sh").with_timeout_secs(0);
        assert!(matches!(
            MinlpBridge::new(config).solve(&graph()),
            Err(SchedError::InvalidConfig(_))
        ));
    }
}
