use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use actix_web::web;
use tempfile::TempDir;
use texform_server::config::ServerConfig;
use texform_server::AppState;

/// A pdflatex stand-in that writes a minimal PDF next to the source file,
/// honoring the `-output-directory` argument the server passes.
pub const STUB_COMPILER_OK: &str = r#"#!/bin/sh
out="."
prev=""
last=""
for arg in "$@"; do
    if [ "$prev" = "-output-directory" ]; then
        out="$arg"
    fi
    prev="$arg"
    last="$arg"
done
base=$(basename "$last" .tex)
printf '%%PDF-1.4 stub' > "$out/$base.pdf"
exit 0
"#;

/// A compiler that fails the way a LaTeX error does: byproducts written,
/// non-zero exit, no PDF.
pub const STUB_COMPILER_FAIL: &str = r#"#!/bin/sh
out="."
prev=""
last=""
for arg in "$@"; do
    if [ "$prev" = "-output-directory" ]; then
        out="$arg"
    fi
    prev="$arg"
    last="$arg"
done
base=$(basename "$last" .tex)
printf 'stub failure diagnostics' > "$out/$base.log"
exit 1
"#;

/// A compiler that never finishes within a short timeout.
pub const STUB_COMPILER_HANG: &str = "#!/bin/sh\nsleep 5\nexit 0\n";

pub struct TestEnv {
    // Held for its Drop; removes everything the test wrote.
    #[allow(dead_code)]
    pub base: TempDir,
    pub work_dir: PathBuf,
    pub serving_dir: PathBuf,
}

impl TestEnv {
    pub fn work_dir_entries(&self) -> Vec<PathBuf> {
        fs::read_dir(&self.work_dir)
            .expect("read work dir")
            .map(|entry| entry.expect("read work dir entry").path())
            .collect()
    }

    pub fn serving_dir_entries(&self) -> Vec<PathBuf> {
        fs::read_dir(&self.serving_dir)
            .expect("read serving dir")
            .map(|entry| entry.expect("read serving dir entry").path())
            .collect()
    }
}

pub fn write_stub_compiler(dir: &Path, script: &str) -> PathBuf {
    let path = dir.join("stub-compiler.sh");
    let mut file = fs::File::create(&path).expect("create stub compiler");
    file.write_all(script.as_bytes()).expect("write stub compiler");
    drop(file);

    let mut perms = fs::metadata(&path).expect("stub metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod stub compiler");
    path
}

pub fn test_state(script: &str) -> (TestEnv, web::Data<AppState>) {
    test_state_with_timeout(script, Duration::from_secs(10))
}

pub fn test_state_with_timeout(
    script: &str,
    timeout: Duration,
) -> (TestEnv, web::Data<AppState>) {
    let base = TempDir::new().expect("create test base dir");
    let work_dir = base.path().join("work");
    let serving_dir = base.path().join("pdfs");
    let compiler = write_stub_compiler(base.path(), script);

    let config = ServerConfig {
        work_dir: work_dir.clone(),
        serving_dir: serving_dir.clone(),
        compiler: compiler.to_string_lossy().into_owned(),
        compile_timeout: timeout,
        max_concurrent_compiles: 2,
        bind_addr: "127.0.0.1".to_string(),
        bind_port: 0,
    };
    let state = AppState::new(config).expect("build test app state");

    (
        TestEnv {
            base,
            work_dir,
            serving_dir,
        },
        web::Data::new(state),
    )
}
