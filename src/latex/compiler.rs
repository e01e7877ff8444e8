use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use log::{debug, error, warn};
use tokio::process::Command;

const LOG_TAIL_LINES: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("Compiler I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("Compiler exited with status {code:?}")]
    Failed { code: Option<i32> },
    #[error("Compiler timed out after {0} seconds")]
    Timeout(u64),
    #[error("Compiler exited cleanly but produced no PDF")]
    MissingOutput,
}

/// Runs the external typesetting compiler on `tex_path`, non-interactively
/// and bounded by `timeout`. All compiler byproducts land in `work_dir`.
///
/// Compiler output never reaches the caller; on failure the tail of the
/// compiler's own log file goes to the server log.
pub async fn compile_pdf(
    compiler: &str,
    work_dir: &Path,
    tex_path: &Path,
    timeout: Duration,
) -> Result<PathBuf, CompileError> {
    debug!("Invoking '{}' on {:?}", compiler, tex_path);

    let mut child = Command::new(compiler)
        .arg("-interaction=nonstopmode")
        .arg("-halt-on-error")
        .arg("-output-directory")
        .arg(work_dir)
        .arg(tex_path)
        .current_dir(work_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()?;

    let status = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(waited) => waited?,
        Err(_) => {
            if let Err(e) = child.kill().await {
                warn!("Failed to kill timed-out compiler: {}", e);
            }
            return Err(CompileError::Timeout(timeout.as_secs()));
        }
    };

    if !status.success() {
        log_compiler_diagnostics(tex_path);
        return Err(CompileError::Failed {
            code: status.code(),
        });
    }

    let pdf_path = tex_path.with_extension("pdf");
    if !pdf_path.is_file() {
        error!("Compiler exited cleanly but {:?} is missing", pdf_path);
        return Err(CompileError::MissingOutput);
    }

    Ok(pdf_path)
}

fn log_compiler_diagnostics(tex_path: &Path) {
    let log_path = tex_path.with_extension("log");
    match std::fs::read_to_string(&log_path) {
        Ok(contents) => {
            let skip = contents.lines().count().saturating_sub(LOG_TAIL_LINES);
            let tail: Vec<&str> = contents.lines().skip(skip).collect();
            error!("Compiler failed, log tail:\n{}", tail.join("\n"));
        }
        Err(e) => {
            error!(
                "Compiler failed and its log {:?} is unreadable: {}",
                log_path, e
            );
        }
    }
}
