//! Local launch helpers: preflight checks and opening the dashboard in a
//! browser.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};

use crate::domain::error::DashboardError;
use crate::domain::settings::Settings;

/// Checks that must pass before `launch` touches the database or binds.
pub fn preflight(settings: &Settings) -> Result<(), DashboardError> {
    check_static_dir(&settings.static_dir)?;
    check_db_dir(&settings.db_path)?;
    Ok(())
}

pub fn check_static_dir(dir: &Path) -> Result<(), DashboardError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(DashboardError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("static directory {} not found", dir.display()),
        )))
    }
}

/// The database file may not exist yet, so its parent directory must be
/// writable.
pub fn check_db_dir(db_path: &Path) -> Result<(), DashboardError> {
    let parent = match db_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let meta = fs::metadata(parent).map_err(|e| {
        DashboardError::Io(std::io::Error::new(
            e.kind(),
            format!("database directory {}: {e}", parent.display()),
        ))
    })?;
    if !meta.is_dir() || meta.permissions().readonly() {
        return Err(DashboardError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            format!("database directory {} is not writable", parent.display()),
        )));
    }
    Ok(())
}

/// URL a browser should open for a listener bound to `addr`.
pub fn dashboard_url(addr: SocketAddr) -> String {
    if addr.ip().is_unspecified() {
        format!("http://127.0.0.1:{}/", addr.port())
    } else {
        format!("http://{addr}/")
    }
}

pub fn browser_command(url: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    } else if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

/// Failure only means the user opens the URL by hand.
pub fn open_browser(url: &str) {
    let spawned = browser_command(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    match spawned {
        Ok(child) => {
            log::info!("opened {url} in the default browser");
            reap(child);
        }
        Err(e) => log::warn!("could not open a browser ({e}); visit {url}"),
    }
}

/// Waits on `child` off the calling thread so it never lingers as a zombie.
pub fn reap(mut child: Child) -> std::thread::JoinHandle<Option<ExitStatus>> {
    std::thread::spawn(move || match child.wait() {
        Ok(status) => {
            log::debug!("browser opener exited with {status}");
            Some(status)
        }
        Err(e) => {
            log::debug!("could not wait on browser opener: {e}");
            None
        }
    })
}
