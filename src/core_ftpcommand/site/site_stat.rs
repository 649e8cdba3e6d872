use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::site::helper::respond_with_lines;
use crate::session::Session;
use async_trait::async_trait;
use chrono::Local;
use log::debug;
use std::path::{Path, PathBuf};
use sysinfo::{DiskExt, System, SystemExt};

const MIB: f64 = 1_048_576.0;

/// Free space in MiB of the disk holding `path`: the disk whose mount point
/// is the longest prefix of the path wins.
pub fn free_space_mib(path: &Path) -> Option<f64> {
    let mut sys = System::new();
    sys.refresh_disks_list();

    sys.disks()
        .iter()
        .filter(|disk| path.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())
        .map(|disk| disk.available_space() as f64 / MIB)
}

/// SITE STAT: transfer statistics of this session plus free space of the
/// home volume.
pub struct SiteStat;

#[async_trait]
impl CommandHandler for SiteStat {
    async fn execute(&self, session: &mut Session, _request: &FtpRequest) -> std::io::Result<()> {
        let home: PathBuf = session
            .user()
            .map(|user| user.home_dir.clone())
            .unwrap_or_default();
        let free = tokio::task::spawn_blocking(move || free_space_mib(&home))
            .await
            .unwrap_or_else(|e| {
                debug!("Disk scan task failed: {}", e);
                None
            });

        let online = Local::now().signed_duration_since(session.connect_at());
        let lines = [
            format!("Online     : {}s", online.num_seconds()),
            format!(
                "Uploaded   : {} files, {:.2} MiB",
                session.files_received(),
                session.bytes_received() as f64 / MIB
            ),
            format!(
                "Downloaded : {} files, {:.2} MiB",
                session.files_sent(),
                session.bytes_sent() as f64 / MIB
            ),
            match free {
                Some(mib) => format!("Free space : {:.2} MiB", mib),
                None => String::from("Free space : unknown"),
            },
        ];
        respond_with_lines(session, lines).await
    }
}
